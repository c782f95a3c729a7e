use crate::{
    detect_block, Block, BlockCount, BlockKind, BlockTag, Channels, ColorBlock, Error, ErrorKind,
    FieldReader, GroupEnd, GroupStart, Lexer, MagicHeader, Name,
};
use std::io::Read;

/// A cursor that can decode the individual fields of a swatch document.
///
/// Implemented by [Lexer] for in memory data and [FieldReader] for any
/// [Read]er. Errors report the offset at which the failed field started.
pub trait FieldSource {
    /// Number of bytes consumed so far
    fn position(&self) -> usize;

    /// Read the next tag, or none at a clean end of stream
    fn read_tag(&mut self) -> Result<Option<BlockTag>, Error>;

    /// Read two raw bytes
    fn read_pair(&mut self) -> Result<[u8; 2], Error>;

    /// Read a little endian u16
    fn read_u16(&mut self) -> Result<u16, Error>;

    /// Read a length prefixed name field
    fn read_name(&mut self) -> Result<Name, Error>;

    /// Read a color space selector and its channels
    fn read_color(&mut self) -> Result<Channels, Error>;

    /// Read a single byte flag
    fn read_flag(&mut self) -> Result<bool, Error>;
}

impl FieldSource for Lexer<'_> {
    fn position(&self) -> usize {
        Lexer::position(self)
    }

    fn read_tag(&mut self) -> Result<Option<BlockTag>, Error> {
        Ok(Lexer::read_tag(self)?)
    }

    fn read_pair(&mut self) -> Result<[u8; 2], Error> {
        let data = self.read_bytes(2)?;
        Ok([data[0], data[1]])
    }

    fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(Lexer::read_u16(self)?)
    }

    fn read_name(&mut self) -> Result<Name, Error> {
        Ok(Lexer::read_name(self)?)
    }

    fn read_color(&mut self) -> Result<Channels, Error> {
        Ok(Lexer::read_color(self)?)
    }

    fn read_flag(&mut self) -> Result<bool, Error> {
        Ok(Lexer::read_flag(self)?)
    }
}

impl<R: Read> FieldSource for FieldReader<R> {
    fn position(&self) -> usize {
        FieldReader::position(self)
    }

    fn read_tag(&mut self) -> Result<Option<BlockTag>, Error> {
        FieldReader::read_tag(self)
    }

    fn read_pair(&mut self) -> Result<[u8; 2], Error> {
        FieldReader::read_pair(self)
    }

    fn read_u16(&mut self) -> Result<u16, Error> {
        FieldReader::read_u16(self)
    }

    fn read_name(&mut self) -> Result<Name, Error> {
        FieldReader::read_name(self)
    }

    fn read_color(&mut self) -> Result<Channels, Error> {
        FieldReader::read_color(self)
    }

    fn read_flag(&mut self) -> Result<bool, Error> {
        FieldReader::read_flag(self)
    }
}

fn read_color_block<S: FieldSource>(source: &mut S) -> Result<ColorBlock, Error> {
    let name = source.read_name()?;
    let channels = source.read_color()?;
    let expanded = source.read_flag()?;
    Ok(ColorBlock {
        name,
        channels,
        expanded,
    })
}

fn read_group_start<S: FieldSource>(source: &mut S) -> Result<GroupStart, Error> {
    let name = source.read_name()?;
    let expanded = source.read_flag()?;
    Ok(GroupStart { name, expanded })
}

/// Where a [BlockDecoder] is in the fixed decode sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// Nothing has been read
    Start,

    /// The magic header has been verified
    MagicRead,

    /// The untagged default color has been read
    DefaultColorRead,

    /// The untagged block count has been read
    CountRead,

    /// At least one tagged body block has been read
    Body,

    /// The stream ended on a block boundary
    End,

    /// A fatal error occurred; no more blocks are produced
    Failed,
}

/// Decodes a swatch document one block at a time.
///
/// The first three blocks are always the magic header, the default color and
/// the block count. Tagged body blocks follow until the data runs out. The
/// block count is not used as a loop bound.
///
/// ```rust
/// use colorswatch::{Block, BlockDecoder, DecodeState, Lexer};
///
/// let mut data = b"CS".to_vec();
/// data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
/// data.extend_from_slice(&[0; 12]);
/// data.extend_from_slice(&[0x00, 0x01, 0x00, 0x03, 0x00]);
///
/// let mut decoder = BlockDecoder::new(Lexer::new(&data));
/// let mut kinds = Vec::new();
/// while let Some(block) = decoder.next_block()? {
///     kinds.push(block.kind());
/// }
/// assert_eq!(kinds.len(), 4);
/// assert_eq!(decoder.state(), DecodeState::End);
/// assert_eq!(decoder.declared_count(), Some(1));
/// # Ok::<(), colorswatch::Error>(())
/// ```
#[derive(Debug)]
pub struct BlockDecoder<S> {
    source: S,
    state: DecodeState,
    declared: Option<u16>,
    body_blocks: usize,
}

impl<S> BlockDecoder<S>
where
    S: FieldSource,
{
    /// Create a decoder positioned at the start of a document
    pub fn new(source: S) -> Self {
        BlockDecoder {
            source,
            state: DecodeState::Start,
            declared: None,
            body_blocks: 0,
        }
    }

    /// The current decode state
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// The block count read from the header, once it has been read
    pub fn declared_count(&self) -> Option<u16> {
        self.declared
    }

    /// Number of tagged body blocks decoded so far
    pub fn body_blocks(&self) -> usize {
        self.body_blocks
    }

    /// Consume the decoder and return the field source
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Decode the next block, returning none once the data is exhausted.
    ///
    /// An error moves the decoder into [DecodeState::Failed], after which it
    /// yields no more blocks. There is no attempt to resynchronize.
    pub fn next_block(&mut self) -> Result<Option<Block>, Error> {
        let offset = self.source.position();
        match self.step() {
            Ok(Some(block)) => {
                tracing::trace!(kind = %block.kind(), offset, "decoded block");
                Ok(Some(block))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.state = DecodeState::Failed;
                Err(e)
            }
        }
    }

    fn step(&mut self) -> Result<Option<Block>, Error> {
        match self.state {
            DecodeState::Start => {
                let found = self.source.read_pair()?;
                if found != MagicHeader::BYTES {
                    return Err(Error::new(ErrorKind::MagicMismatch { found }));
                }
                self.state = DecodeState::MagicRead;
                Ok(Some(Block::Magic(MagicHeader)))
            }
            DecodeState::MagicRead => {
                let color = read_color_block(&mut self.source)?;
                self.state = DecodeState::DefaultColorRead;
                Ok(Some(Block::DefaultColor(color)))
            }
            DecodeState::DefaultColorRead => {
                let count = self.source.read_u16()?;
                self.declared = Some(count);
                self.state = DecodeState::CountRead;
                Ok(Some(Block::BlockCount(BlockCount(count))))
            }
            DecodeState::CountRead | DecodeState::Body => {
                let offset = self.source.position();
                let Some(tag) = self.source.read_tag()? else {
                    self.state = DecodeState::End;
                    return Ok(None);
                };

                let kind = detect_block(tag).map_err(|e| Error::from(e.at(offset)))?;
                let block = match kind {
                    BlockKind::Color => Block::Color(read_color_block(&mut self.source)?),
                    BlockKind::GroupStart => Block::GroupStart(read_group_start(&mut self.source)?),
                    BlockKind::GroupEnd => Block::GroupEnd(GroupEnd),
                    BlockKind::Magic | BlockKind::DefaultColor | BlockKind::BlockCount => {
                        return Err(Error::new(ErrorKind::UnknownBlockType {
                            tag: tag.to_bytes(),
                            offset,
                        }));
                    }
                };

                self.state = DecodeState::Body;
                self.body_blocks += 1;
                Ok(Some(block))
            }
            DecodeState::End | DecodeState::Failed => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn header(count: u16) -> Vec<u8> {
        let mut data = b"CS".to_vec();
        data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
        data.extend_from_slice(&[0; 12]);
        data.push(0x00);
        data.extend_from_slice(&count.to_le_bytes());
        data
    }

    fn decode_all<S: FieldSource>(source: S) -> (Vec<BlockKind>, Result<(), Error>, DecodeState) {
        let mut decoder = BlockDecoder::new(source);
        let mut kinds = Vec::new();
        let result = loop {
            match decoder.next_block() {
                Ok(Some(block)) => kinds.push(block.kind()),
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        (kinds, result, decoder.state())
    }

    #[test]
    fn test_state_progression() {
        let data = header(0);
        let mut decoder = BlockDecoder::new(Lexer::new(&data));
        assert_eq!(decoder.state(), DecodeState::Start);
        decoder.next_block().unwrap();
        assert_eq!(decoder.state(), DecodeState::MagicRead);
        decoder.next_block().unwrap();
        assert_eq!(decoder.state(), DecodeState::DefaultColorRead);
        decoder.next_block().unwrap();
        assert_eq!(decoder.state(), DecodeState::CountRead);
        assert_eq!(decoder.next_block().unwrap(), None);
        assert_eq!(decoder.state(), DecodeState::End);
        assert_eq!(decoder.next_block().unwrap(), None);
    }

    #[test]
    fn test_failed_is_absorbing() {
        let mut data = header(1);
        data.extend_from_slice(&[0xff, 0xff, 0x03, 0x00]);
        let mut decoder = BlockDecoder::new(Lexer::new(&data));
        for _ in 0..3 {
            decoder.next_block().unwrap();
        }
        assert!(decoder.next_block().is_err());
        assert_eq!(decoder.state(), DecodeState::Failed);
        assert_eq!(decoder.next_block().unwrap(), None);
    }

    #[rstest]
    #[case(&[0x01, 0x00], BlockKind::Color)]
    #[case(&[0x02, 0x00], BlockKind::GroupStart)]
    #[case(&[0x03, 0x00], BlockKind::GroupEnd)]
    fn test_body_dispatch(#[case] tag: &[u8], #[case] kind: BlockKind) {
        let mut data = header(1);
        data.extend_from_slice(tag);
        match kind {
            BlockKind::Color => {
                data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
                data.extend_from_slice(&[0; 12]);
                data.push(0x01);
            }
            BlockKind::GroupStart => data.extend_from_slice(&[0x00, 0x00, 0x00]),
            _ => {}
        }

        let (kinds, result, state) = decode_all(Lexer::new(&data));
        result.unwrap();
        assert_eq!(state, DecodeState::End);
        assert_eq!(kinds.last(), Some(&kind));

        let (kinds2, result, _) = decode_all(FieldReader::new(data.as_slice()));
        result.unwrap();
        assert_eq!(kinds, kinds2);
    }

    #[test]
    fn test_magic_in_body_is_unknown() {
        let mut data = header(1);
        let offset = data.len();
        data.extend_from_slice(b"CS");
        let (_, result, state) = decode_all(Lexer::new(&data));
        let err = result.unwrap_err();
        assert_eq!(state, DecodeState::Failed);
        assert!(matches!(
            err.kind(),
            ErrorKind::UnknownBlockType { tag, offset: o } if *tag == *b"CS" && *o == offset
        ));
    }

    #[rstest]
    #[case(&b""[..])]
    #[case(&b"C"[..])]
    fn test_missing_magic_is_truncated(#[case] data: &[u8]) {
        let (_, result, _) = decode_all(Lexer::new(data));
        assert!(matches!(
            result.unwrap_err().kind(),
            ErrorKind::TruncatedInput { offset: 0, .. }
        ));
    }

    #[test]
    fn test_wrong_magic() {
        let (kinds, result, _) = decode_all(FieldReader::new(&b"SC\x00\x00"[..]));
        assert!(kinds.is_empty());
        assert!(matches!(
            result.unwrap_err().kind(),
            ErrorKind::MagicMismatch { found } if *found == *b"SC"
        ));
    }
}
