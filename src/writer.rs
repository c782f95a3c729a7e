//! Partial encoder.
//!
//! Only the magic header, the block count, group ends and name fields have
//! an encoding. Colors and group starts are decode only.

use crate::{Block, BlockCount, BlockTag, Error, ErrorKind, GroupEnd, MagicHeader, Name};
use std::io::{self, Write};

/// Write a name field: a little endian u16 length followed by the raw bytes.
/// An absent name is written as two zero bytes.
///
/// Errors with [io::ErrorKind::InvalidInput] for names that do not fit in a
/// u16 length.
pub fn write_name<W: Write>(mut writer: W, name: &Name) -> io::Result<()> {
    match name.as_bytes() {
        None => writer.write_all(&[0, 0]),
        Some(data) => {
            let len = u16::try_from(data.len()).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "name longer than 65535 bytes")
            })?;
            writer.write_all(&len.to_le_bytes())?;
            writer.write_all(data)
        }
    }
}

/// Encode a name field into a new buffer
///
/// ```
/// use colorswatch::{encode_name, Name};
///
/// assert_eq!(encode_name(&Name::absent()).unwrap(), vec![0x00, 0x00]);
/// assert_eq!(encode_name(&Name::new(b"Red")).unwrap(), b"\x03\x00Red".to_vec());
/// ```
pub fn encode_name(name: &Name) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(2 + name.len());
    write_name(&mut out, name)?;
    Ok(out)
}

impl MagicHeader {
    /// Write the `CS` literal
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&Self::BYTES)
    }

    pub fn to_bytes(&self) -> [u8; 2] {
        Self::BYTES
    }
}

impl BlockCount {
    /// Write the count as a little endian u16
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    pub fn to_bytes(&self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl GroupEnd {
    /// Write the group end tag. The block has no payload.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    pub fn to_bytes(&self) -> [u8; 2] {
        BlockTag::GROUP_END.to_bytes()
    }
}

impl Block {
    /// Encode the block if its kind supports encoding
    ///
    /// ```
    /// use colorswatch::{Block, BlockCount, ErrorKind, GroupStart};
    ///
    /// assert_eq!(Block::BlockCount(BlockCount(3)).to_bytes().unwrap(), vec![0x03, 0x00]);
    ///
    /// let err = Block::GroupStart(GroupStart::default()).to_bytes().unwrap_err();
    /// assert!(matches!(err.kind(), ErrorKind::EncodeUnsupported(_)));
    /// ```
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        match self {
            Block::Magic(x) => Ok(x.to_bytes().to_vec()),
            Block::BlockCount(x) => Ok(x.to_bytes().to_vec()),
            Block::GroupEnd(x) => Ok(x.to_bytes().to_vec()),
            Block::DefaultColor(_) | Block::Color(_) | Block::GroupStart(_) => {
                Err(Error::new(ErrorKind::EncodeUnsupported(self.kind())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockDecoder, Lexer};
    use quickcheck_macros::quickcheck;
    use rstest::*;

    #[rstest]
    #[case(Block::Magic(MagicHeader), &[0x43, 0x53])]
    #[case(Block::BlockCount(BlockCount(0)), &[0x00, 0x00])]
    #[case(Block::BlockCount(BlockCount(0x1234)), &[0x34, 0x12])]
    #[case(Block::GroupEnd(GroupEnd), &[0x03, 0x00])]
    fn test_encodable(#[case] block: Block, #[case] expected: &[u8]) {
        assert!(block.kind().is_encodable());
        assert_eq!(block.to_bytes().unwrap(), expected);
    }

    #[test]
    fn absent_name_is_two_zero_bytes() {
        assert_eq!(encode_name(&Name::absent()).unwrap(), vec![0, 0]);
        let mut lexer = Lexer::new(&[0, 0, 0xaa]);
        assert_eq!(lexer.read_name().unwrap(), Name::absent());
        assert_eq!(lexer.position(), 2);
    }

    #[test]
    fn oversized_name_is_rejected() {
        let name = Name::new(vec![b'a'; usize::from(u16::MAX) + 1]);
        assert_eq!(
            encode_name(&name).unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
    }

    #[quickcheck]
    fn block_count_decodes_to_itself(count: u16) -> bool {
        let bytes = BlockCount(count).to_bytes();
        Lexer::new(&bytes).read_u16().unwrap() == count
    }

    #[quickcheck]
    fn name_decodes_to_itself(data: Vec<u8>) -> bool {
        let data: Vec<u8> = data.into_iter().take(usize::from(u16::MAX)).collect();
        let name = Name::new(data);
        let encoded = encode_name(&name).unwrap();
        let mut lexer = Lexer::new(&encoded);
        lexer.read_name().unwrap() == name && lexer.position() == encoded.len()
    }

    #[test]
    fn encodable_blocks_reproduce_their_source_bytes() {
        let data = include_bytes!("../tests/fixtures/sample.cs");
        let mut decoder = BlockDecoder::new(Lexer::new(data));
        let mut checked = 0;
        loop {
            let offset = decoder.position();
            let Some(block) = decoder.next_block().unwrap() else {
                break;
            };

            if block.kind().is_encodable() {
                let encoded = block.to_bytes().unwrap();
                assert_eq!(&data[offset..offset + encoded.len()], encoded.as_slice());
                checked += 1;
            } else {
                assert!(block.to_bytes().is_err());
            }
        }

        // magic, block count and one group end
        assert_eq!(checked, 3);
    }
}
