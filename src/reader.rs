use crate::{
    lexer::flag_from_byte, BlockTag, Channels, ColorSpace, Error, ErrorKind, FlagPolicy, LexError,
    Name,
};
use std::io::{self, Read, Take};

/// Default cap on a single name field
pub const DEFAULT_MAX_NAME_LEN: usize = 4 * 1024;

/// Default cap on the bytes consumed for one document
pub const DEFAULT_MAX_DOCUMENT_LEN: usize = 16 * 1024 * 1024;

/// Field decoder that works over a [Read] implementation
///
/// Every read is bounded: names longer than the configured maximum are
/// rejected before their buffer is allocated and the reader never consumes
/// more than one byte past the maximum document length.
///
/// ```rust
/// use colorswatch::{BlockTag, FieldReader};
/// let data = [0x02, 0x00, 0x00, 0x00, 0x01];
/// let mut reader = FieldReader::new(&data[..]);
/// assert_eq!(reader.read_tag().unwrap(), Some(BlockTag::GROUP_START));
/// assert!(reader.read_name().unwrap().is_absent());
/// assert_eq!(reader.read_flag().unwrap(), true);
/// assert_eq!(reader.read_tag().unwrap(), None);
/// assert_eq!(reader.position(), 5);
/// ```
#[derive(Debug)]
pub struct FieldReader<R> {
    reader: Take<R>,
    position: usize,
    max_name_len: usize,
    max_document_len: usize,
    flag_policy: FlagPolicy,
}

impl<R> FieldReader<R>
where
    R: Read,
{
    /// Convenience method for constructing the default field reader
    #[inline]
    pub fn new(reader: R) -> Self {
        FieldReader::builder().build(reader)
    }

    /// Returns the byte position of the data stream that has been processed.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume the field reader and return the underlying reader
    #[inline]
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Read until `buf` is full or the stream ends, returning the number of
    /// bytes read
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    self.position += n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.io_error(e)),
            }
        }

        if self.position > self.max_document_len {
            return Err(Error::new(ErrorKind::DocumentTooLarge {
                max: self.max_document_len,
                offset: self.max_document_len,
            }));
        }

        Ok(filled)
    }

    /// Fill `buf` completely, reporting truncation against `start`
    fn fill_exact(&mut self, buf: &mut [u8], start: usize) -> Result<(), Error> {
        let read = self.fill(buf)?;
        if read < buf.len() {
            Err(Error::from(
                LexError::Eof {
                    needed: buf.len() - read,
                }
                .at(start),
            ))
        } else {
            Ok(())
        }
    }

    fn read_array<const N: usize>(&mut self, start: usize) -> Result<[u8; N], Error> {
        let mut data = [0u8; N];
        self.fill_exact(&mut data, start)?;
        Ok(data)
    }

    /// Read the next tag. Returns none when the stream ends cleanly on a
    /// block boundary.
    #[inline]
    pub fn read_tag(&mut self) -> Result<Option<BlockTag>, Error> {
        let start = self.position;
        let mut data = [0u8; 2];
        match self.fill(&mut data)? {
            0 => Ok(None),
            1 => Err(Error::from(LexError::Eof { needed: 1 }.at(start))),
            _ => Ok(Some(BlockTag::from_bytes(data))),
        }
    }

    /// Read two raw bytes
    #[inline]
    pub fn read_pair(&mut self) -> Result<[u8; 2], Error> {
        let start = self.position;
        self.read_array::<2>(start)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.read_pair().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn read_name(&mut self) -> Result<Name, Error> {
        let start = self.position;
        let len = usize::from(u16::from_le_bytes(self.read_array::<2>(start)?));
        if len > self.max_name_len {
            let err = LexError::NameTooLong {
                len,
                max: self.max_name_len,
            };
            return Err(Error::from(err.at(start)));
        }

        let mut data = vec![0u8; len];
        self.fill_exact(&mut data, start)?;
        Ok(Name::new(data))
    }

    #[inline]
    pub fn read_flag(&mut self) -> Result<bool, Error> {
        let start = self.position;
        let [value] = self.read_array::<1>(start)?;
        flag_from_byte(value, self.flag_policy).map_err(|e| Error::from(e.at(start)))
    }

    /// Read a color field. Errors point at the start of the field.
    #[inline]
    pub fn read_color(&mut self) -> Result<Channels, Error> {
        let start = self.position;
        let selector = u16::from_le_bytes(self.read_array::<2>(start)?);
        let space = ColorSpace::from_selector(selector)
            .ok_or_else(|| Error::from(LexError::UnsupportedColorSpace(selector).at(start)))?;

        match space {
            ColorSpace::Rgb => {
                let r = self.read_f32(start)?;
                let g = self.read_f32(start)?;
                let b = self.read_f32(start)?;
                Ok(Channels::Rgb { r, g, b })
            }
            ColorSpace::Cmyk => {
                let c = self.read_f32(start)?;
                let m = self.read_f32(start)?;
                let y = self.read_f32(start)?;
                let k = self.read_f32(start)?;
                Ok(Channels::Cmyk { c, m, y, k })
            }
        }
    }

    #[inline]
    fn read_f32(&mut self, start: usize) -> Result<f32, Error> {
        self.read_array::<4>(start).map(f32::from_le_bytes)
    }

    #[cold]
    #[inline(never)]
    fn io_error(&self, source: io::Error) -> Error {
        Error::new(ErrorKind::Io {
            offset: self.position,
            source,
        })
    }
}

impl FieldReader<()> {
    /// Initializes a default [FieldReaderBuilder]
    pub fn builder() -> FieldReaderBuilder {
        FieldReaderBuilder::default()
    }
}

/// Creates a field reader
#[derive(Debug, Clone, Copy)]
pub struct FieldReaderBuilder {
    max_name_len: usize,
    max_document_len: usize,
    flag_policy: FlagPolicy,
}

impl Default for FieldReaderBuilder {
    fn default() -> Self {
        FieldReaderBuilder {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_document_len: DEFAULT_MAX_DOCUMENT_LEN,
            flag_policy: FlagPolicy::default(),
        }
    }
}

impl FieldReaderBuilder {
    /// Reject name fields that declare more than the given number of bytes
    #[inline]
    pub fn max_name_len(mut self, val: usize) -> FieldReaderBuilder {
        self.max_name_len = val;
        self
    }

    /// Fail once more than the given number of bytes have been consumed
    #[inline]
    pub fn max_document_len(mut self, val: usize) -> FieldReaderBuilder {
        self.max_document_len = val;
        self
    }

    /// Set how flag bytes outside of 0 and 1 are treated
    #[inline]
    pub fn flag_policy(mut self, val: FlagPolicy) -> FieldReaderBuilder {
        self.flag_policy = val;
        self
    }

    /// Create a field reader around a given reader.
    #[inline]
    pub fn build<R: Read>(self, reader: R) -> FieldReader<R> {
        let limit = u64::try_from(self.max_document_len)
            .unwrap_or(u64::MAX)
            .saturating_add(1);
        FieldReader {
            reader: reader.take(limit),
            position: 0,
            max_name_len: self.max_name_len,
            max_document_len: self.max_document_len,
            flag_policy: self.flag_policy,
        }
    }
}
