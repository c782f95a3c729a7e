use crate::{util::get_split, BlockKind, Channels, ColorSpace, Name};
use std::fmt;

/// The 2 byte discriminator read at the start of a block
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BlockTag(pub u16);

impl BlockTag {
    pub const COLOR: BlockTag = BlockTag::new(0x0001);
    pub const GROUP_START: BlockTag = BlockTag::new(0x0002);
    pub const GROUP_END: BlockTag = BlockTag::new(0x0003);
    pub const MAGIC: BlockTag = BlockTag::from_bytes(*b"CS");

    #[inline]
    pub const fn new(x: u16) -> Self {
        BlockTag(x)
    }

    #[inline]
    pub const fn from_bytes(data: [u8; 2]) -> Self {
        BlockTag(u16::from_le_bytes(data))
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

/// Map a tag to the kind of block it introduces.
///
/// The lookup is an exact match and never looks past the 2 tag bytes.
///
/// ```
/// use colorswatch::{detect_block, BlockKind, BlockTag, LexError};
///
/// assert_eq!(detect_block(BlockTag::new(1)), Ok(BlockKind::Color));
/// assert_eq!(detect_block(BlockTag::from_bytes(*b"CS")), Ok(BlockKind::Magic));
/// assert_eq!(detect_block(BlockTag::new(0xffff)), Err(LexError::UnknownTag([0xff, 0xff])));
/// ```
#[inline]
pub fn detect_block(tag: BlockTag) -> Result<BlockKind, LexError> {
    match tag {
        BlockTag::COLOR => Ok(BlockKind::Color),
        BlockTag::GROUP_START => Ok(BlockKind::GroupStart),
        BlockTag::GROUP_END => Ok(BlockKind::GroupEnd),
        BlockTag::MAGIC => Ok(BlockKind::Magic),
        x => Err(LexError::UnknownTag(x.to_bytes())),
    }
}

/// How flag bytes outside of 0 and 1 are treated
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum FlagPolicy {
    /// Any nonzero byte is true
    #[default]
    Lenient,

    /// Only 0x00 and 0x01 are accepted
    Strict,
}

#[inline]
pub(crate) fn read_u16(data: &[u8]) -> Result<(u16, &[u8]), LexError> {
    let (head, rest) = get_split::<2>(data).ok_or_else(|| LexError::eof(2, data))?;
    Ok((u16::from_le_bytes(head), rest))
}

#[inline]
pub(crate) fn read_f32(data: &[u8]) -> Result<(f32, &[u8]), LexError> {
    let (head, rest) = get_split::<4>(data).ok_or_else(|| LexError::eof(4, data))?;
    Ok((f32::from_le_bytes(head), rest))
}

/// Read a tag, returning none when there is no data left
#[inline]
pub(crate) fn read_tag(data: &[u8]) -> Result<Option<(BlockTag, &[u8])>, LexError> {
    if data.is_empty() {
        return Ok(None);
    }

    let (head, rest) = get_split::<2>(data).ok_or_else(|| LexError::eof(2, data))?;
    Ok(Some((BlockTag::from_bytes(head), rest)))
}

#[inline]
pub(crate) fn read_name(data: &[u8], max_len: usize) -> Result<(Name, &[u8]), LexError> {
    let (len, rest) = read_u16(data)?;
    let len = usize::from(len);
    if len > max_len {
        return Err(LexError::NameTooLong { len, max: max_len });
    }

    if len <= rest.len() {
        let (text, rest) = rest.split_at(len);
        Ok((Name::new(text), rest))
    } else {
        Err(LexError::Eof {
            needed: 2 + len - data.len(),
        })
    }
}

#[inline]
pub(crate) fn flag_from_byte(value: u8, policy: FlagPolicy) -> Result<bool, LexError> {
    match (value, policy) {
        (0, _) => Ok(false),
        (1, _) => Ok(true),
        (_, FlagPolicy::Lenient) => Ok(true),
        (x, FlagPolicy::Strict) => Err(LexError::InvalidFlag(x)),
    }
}

#[inline]
pub(crate) fn read_flag(data: &[u8], policy: FlagPolicy) -> Result<(bool, &[u8]), LexError> {
    let (&first, rest) = data.split_first().ok_or(LexError::Eof { needed: 1 })?;
    Ok((flag_from_byte(first, policy)?, rest))
}

#[inline]
pub(crate) fn read_color_space(data: &[u8]) -> Result<(ColorSpace, &[u8]), LexError> {
    let (selector, rest) = read_u16(data)?;
    let space =
        ColorSpace::from_selector(selector).ok_or(LexError::UnsupportedColorSpace(selector))?;
    Ok((space, rest))
}

#[inline]
pub(crate) fn read_channels(
    data: &[u8],
    space: ColorSpace,
) -> Result<(Channels, &[u8]), LexError> {
    match space {
        ColorSpace::Rgb => {
            let (r, data) = read_f32(data)?;
            let (g, data) = read_f32(data)?;
            let (b, data) = read_f32(data)?;
            Ok((Channels::Rgb { r, g, b }, data))
        }
        ColorSpace::Cmyk => {
            let (c, data) = read_f32(data)?;
            let (m, data) = read_f32(data)?;
            let (y, data) = read_f32(data)?;
            let (k, data) = read_f32(data)?;
            Ok((Channels::Cmyk { c, m, y, k }, data))
        }
    }
}

/// Decode a color field: a selector followed by the channel floats
#[inline]
pub(crate) fn read_color(data: &[u8]) -> Result<(Channels, &[u8]), LexError> {
    let (space, data) = read_color_space(data)?;
    read_channels(data, space)
}

/// The kind of error encountered while decoding a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    /// Not enough data, `needed` more bytes were required
    Eof { needed: usize },

    /// A tag that no block kind is registered for
    UnknownTag([u8; 2]),

    /// A color space selector that is not RGB or CMYK
    UnsupportedColorSpace(u16),

    /// A flag byte rejected under [FlagPolicy::Strict]
    InvalidFlag(u8),

    /// A name longer than the allowed maximum
    NameTooLong { len: usize, max: usize },

    /// A read ended past the maximum document length
    TooLarge { max: usize },
}

impl LexError {
    #[inline]
    fn eof(want: usize, data: &[u8]) -> LexError {
        LexError::Eof {
            needed: want - data.len(),
        }
    }

    #[inline]
    #[must_use]
    pub fn at(self, position: usize) -> LexerError {
        LexerError {
            position,
            kind: self,
        }
    }
}

impl std::error::Error for LexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LexError::Eof { needed } => {
                write!(f, "unexpected end of file, needed {} more bytes", needed)
            }
            LexError::UnknownTag(tag) => {
                write!(f, "unknown block tag: {:02x} {:02x}", tag[0], tag[1])
            }
            LexError::UnsupportedColorSpace(x) => write!(f, "unsupported color space: {}", x),
            LexError::InvalidFlag(x) => write!(f, "invalid flag byte: 0x{:02x}", x),
            LexError::NameTooLong { len, max } => {
                write!(f, "name length {} exceeds maximum of {}", len, max)
            }
            LexError::TooLarge { max } => write!(f, "document exceeds maximum of {}", max),
        }
    }
}

/// A [LexError] with the byte position where the failed read started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerError {
    position: usize,
    kind: LexError,
}

impl LexerError {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> &LexError {
        &self.kind
    }

    pub fn into_kind(self) -> LexError {
        self.kind
    }
}

impl std::error::Error for LexerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.position)
    }
}

/// Zero copy field decoder over a byte slice
///
/// A maximum document length can be set, in which case any read that ends
/// past the maximum fails as if the data had been streamed through a
/// [FieldReader](crate::FieldReader) with the same limit.
///
/// ```
/// use colorswatch::{BlockTag, Lexer};
///
/// let mut lexer = Lexer::new(&[0x01, 0x00, 0x03, 0x00, b'R', b'e', b'd']);
/// assert_eq!(lexer.read_tag().unwrap(), Some(BlockTag::COLOR));
/// assert_eq!(lexer.read_name().unwrap().as_bytes(), Some(&b"Red"[..]));
/// assert_eq!(lexer.read_tag().unwrap(), None);
/// assert_eq!(lexer.position(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    data: &'a [u8],
    original_length: usize,
    max_name_len: usize,
    max_document_len: usize,
    flag_policy: FlagPolicy,
}

impl<'a> Lexer<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            original_length: data.len(),
            max_name_len: usize::from(u16::MAX),
            max_document_len: usize::MAX,
            flag_policy: FlagPolicy::default(),
        }
    }

    /// Reject names longer than the given number of bytes
    #[inline]
    #[must_use]
    pub fn with_max_name_len(mut self, max: usize) -> Self {
        self.max_name_len = max;
        self
    }

    /// Fail any read that ends past the given number of bytes
    #[inline]
    #[must_use]
    pub fn with_max_document_len(mut self, max: usize) -> Self {
        self.max_document_len = max;
        self
    }

    /// Set how flag bytes are interpreted
    #[inline]
    #[must_use]
    pub fn with_flag_policy(mut self, policy: FlagPolicy) -> Self {
        self.flag_policy = policy;
        self
    }

    #[inline]
    pub fn remainder(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.original_length - self.data.len()
    }

    #[cold]
    #[inline(never)]
    fn too_large(&self) -> LexerError {
        LexError::TooLarge {
            max: self.max_document_len,
        }
        .at(self.max_document_len)
    }

    /// Position an error at the start of the field. A streamed read would
    /// have crossed the document limit before it could observe the error
    /// when the input runs past the limit (for truncation) or when the bytes
    /// examined so far do (for everything else).
    #[inline]
    fn err_position(&self, err: LexError, examined: usize) -> LexerError {
        let start = self.position();
        let crossed = match err {
            LexError::Eof { .. } => self.original_length > self.max_document_len,
            _ => start.saturating_add(examined) > self.max_document_len,
        };

        if crossed {
            self.too_large()
        } else {
            err.at(start)
        }
    }

    /// Advance to `rest` unless doing so would end past the document limit
    #[inline]
    fn advance(&mut self, rest: &'a [u8]) -> Result<(), LexerError> {
        if self.original_length - rest.len() > self.max_document_len {
            return Err(self.too_large());
        }

        self.data = rest;
        Ok(())
    }

    /// Read the next tag. Returns none only when no bytes remain; a single
    /// trailing byte is an error.
    #[inline]
    pub fn read_tag(&mut self) -> Result<Option<BlockTag>, LexerError> {
        match read_tag(self.data).map_err(|e| self.err_position(e, 2))? {
            Some((tag, rest)) => {
                self.advance(rest)?;
                Ok(Some(tag))
            }
            None => Ok(None),
        }
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, LexerError> {
        let (result, rest) = read_u16(self.data).map_err(|e| self.err_position(e, 2))?;
        self.advance(rest)?;
        Ok(result)
    }

    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], LexerError> {
        if len > self.data.len() {
            let needed = len - self.data.len();
            return Err(self.err_position(LexError::Eof { needed }, len));
        }

        let (head, rest) = self.data.split_at(len);
        self.advance(rest)?;
        Ok(head)
    }

    #[inline]
    pub fn read_name(&mut self) -> Result<Name, LexerError> {
        let (result, rest) =
            read_name(self.data, self.max_name_len).map_err(|e| self.err_position(e, 2))?;
        self.advance(rest)?;
        Ok(result)
    }

    #[inline]
    pub fn read_flag(&mut self) -> Result<bool, LexerError> {
        let (result, rest) =
            read_flag(self.data, self.flag_policy).map_err(|e| self.err_position(e, 1))?;
        self.advance(rest)?;
        Ok(result)
    }

    /// Read a color field. Errors point at the start of the field.
    #[inline]
    pub fn read_color(&mut self) -> Result<Channels, LexerError> {
        let (result, rest) = read_color(self.data).map_err(|e| self.err_position(e, 2))?;
        self.advance(rest)?;
        Ok(result)
    }
}
