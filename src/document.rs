use crate::{
    reader::{DEFAULT_MAX_DOCUMENT_LEN, DEFAULT_MAX_NAME_LEN},
    Block, BlockCount, BlockDecoder, ColorBlock, Error, ErrorKind, FieldReader, FieldSource,
    FlagPolicy, Lexer,
};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

/// What to do when the declared block count disagrees with the body
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum CountPolicy {
    /// Keep the count as metadata and log a warning on a mismatch
    #[default]
    Informational,

    /// Fail with [ErrorKind::BlockCountMismatch]
    Strict,
}

/// The ordered sequence of blocks decoded from one swatch file.
///
/// A document always starts with the magic header, the default color and the
/// block count, in that order. Tagged body blocks follow in file order. Group
/// starts and ends are not checked for balance.
///
/// ```rust
/// use colorswatch::{Block, Document};
///
/// let mut data = b"CS".to_vec();
/// data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
/// data.extend_from_slice(&[0; 12]);
/// data.extend_from_slice(&[0x00, 0x00, 0x00]);
///
/// let doc = Document::from_slice(&data)?;
/// assert_eq!(doc.len(), 3);
/// assert_eq!(doc.block_count(), 0);
/// assert!(doc.default_color().name.is_absent());
/// assert!(doc.body().is_empty());
/// # Ok::<(), colorswatch::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Decode a document from a byte slice with the default options
    pub fn from_slice(data: &[u8]) -> Result<Document, Error> {
        DocumentParser::new().parse_slice(data)
    }

    /// Decode a document from a seekable reader with the default options.
    /// The reader is rewound to offset 0 first.
    pub fn from_reader<R>(reader: R) -> Result<Document, Error>
    where
        R: Read + Seek,
    {
        DocumentParser::new().parse_reader(reader)
    }

    /// Open and decode a file with the default options
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Document, Error> {
        DocumentParser::new().parse_path(path)
    }

    /// Create a parser with custom options
    pub fn parser() -> DocumentParser {
        DocumentParser::new()
    }

    /// All blocks in file order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Iterate over all blocks in file order
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Total number of blocks, including the three header blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: a document has at least its header blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The file's default color
    // Documents are only built by `DocumentParser::decode`, which returns
    // an error unless the magic, default color and count blocks were all
    // decoded, so the header lookups below can not fail.
    pub fn default_color(&self) -> &ColorBlock {
        match self.blocks.get(1) {
            Some(Block::DefaultColor(x)) => x,
            _ => unreachable!("document is missing its default color"),
        }
    }

    /// The declared number of body blocks
    pub fn block_count(&self) -> u16 {
        match self.blocks.get(2) {
            Some(Block::BlockCount(BlockCount(x))) => *x,
            _ => unreachable!("document is missing its block count"),
        }
    }

    /// The tagged blocks that follow the block count
    pub fn body(&self) -> &[Block] {
        &self.blocks[3..]
    }

    /// The tagged colors of the body, skipping the default color
    pub fn colors(&self) -> impl Iterator<Item = &ColorBlock> + '_ {
        self.body().iter().filter_map(|x| match x {
            Block::Color(color) => Some(color),
            _ => None,
        })
    }

    /// Serialize the document as JSON
    #[cfg(feature = "json")]
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Decodes documents with customized limits and policies
///
/// ```rust
/// use colorswatch::{CountPolicy, DocumentParser, ErrorKind, FlagPolicy};
///
/// let mut data = b"CS".to_vec();
/// data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
/// data.extend_from_slice(&[0; 12]);
/// data.extend_from_slice(&[0x00, 0x05, 0x00]);
///
/// let parser = DocumentParser::new()
///     .max_name_len(256)
///     .flag_policy(FlagPolicy::Strict)
///     .count_policy(CountPolicy::Strict);
/// let err = parser.parse_slice(&data).unwrap_err();
/// assert!(matches!(err.kind(), ErrorKind::BlockCountMismatch { declared: 5, actual: 0 }));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DocumentParser {
    max_name_len: usize,
    max_document_len: usize,
    flag_policy: FlagPolicy,
    count_policy: CountPolicy,
}

impl Default for DocumentParser {
    fn default() -> Self {
        DocumentParser {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_document_len: DEFAULT_MAX_DOCUMENT_LEN,
            flag_policy: FlagPolicy::default(),
            count_policy: CountPolicy::default(),
        }
    }
}

impl DocumentParser {
    /// A parser with the default options
    pub fn new() -> Self {
        DocumentParser::default()
    }

    /// Reject name fields longer than the given number of bytes
    pub fn max_name_len(mut self, val: usize) -> Self {
        self.max_name_len = val;
        self
    }

    /// Reject documents longer than the given number of bytes
    pub fn max_document_len(mut self, val: usize) -> Self {
        self.max_document_len = val;
        self
    }

    /// Set how flag bytes outside of 0 and 1 are treated
    pub fn flag_policy(mut self, val: FlagPolicy) -> Self {
        self.flag_policy = val;
        self
    }

    /// Set how a block count mismatch is handled
    pub fn count_policy(mut self, val: CountPolicy) -> Self {
        self.count_policy = val;
        self
    }

    /// Decode a document held in memory
    pub fn parse_slice(&self, data: &[u8]) -> Result<Document, Error> {
        let lexer = Lexer::new(data)
            .with_max_name_len(self.max_name_len)
            .with_max_document_len(self.max_document_len)
            .with_flag_policy(self.flag_policy);
        self.decode(lexer)
    }

    /// Rewind a reader to offset 0 and decode a document from it
    pub fn parse_reader<R>(&self, mut reader: R) -> Result<Document, Error>
    where
        R: Read + Seek,
    {
        reader
            .rewind()
            .map_err(|source| Error::new(ErrorKind::Io { offset: 0, source }))?;
        self.parse_stream(reader)
    }

    /// Decode a document from a reader that is positioned at the start of
    /// the document
    pub fn parse_stream<R: Read>(&self, reader: R) -> Result<Document, Error> {
        self.decode(self.field_reader(reader))
    }

    /// Open and decode a file. The file is closed before returning.
    pub fn parse_path<P: AsRef<Path>>(&self, path: P) -> Result<Document, Error> {
        let file = File::open(path.as_ref())
            .map_err(|source| Error::new(ErrorKind::Io { offset: 0, source }))?;
        self.parse_stream(std::io::BufReader::new(file))
    }

    /// Create a field reader that honors this parser's limits and flag
    /// policy, for block at a time decoding with [BlockDecoder]
    pub fn field_reader<R: Read>(&self, reader: R) -> FieldReader<R> {
        FieldReader::builder()
            .max_name_len(self.max_name_len)
            .max_document_len(self.max_document_len)
            .flag_policy(self.flag_policy)
            .build(reader)
    }

    fn decode<S: FieldSource>(&self, source: S) -> Result<Document, Error> {
        let mut decoder = BlockDecoder::new(source);
        let mut blocks = Vec::new();
        while let Some(block) = decoder.next_block()? {
            blocks.push(block);
        }

        let declared = decoder.declared_count().unwrap_or_default();
        let actual = decoder.body_blocks();
        if usize::from(declared) != actual {
            match self.count_policy {
                CountPolicy::Informational => {
                    tracing::warn!(declared, actual, "block count does not match body");
                }
                CountPolicy::Strict => {
                    return Err(Error::new(ErrorKind::BlockCountMismatch { declared, actual }));
                }
            }
        }

        tracing::debug!(
            blocks = blocks.len(),
            bytes = decoder.position(),
            "decoded swatch document"
        );
        Ok(Document { blocks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockKind, Channels, Name};
    use quickcheck_macros::quickcheck;
    use rstest::*;
    use std::io::Cursor;

    fn minimal(count: u16) -> Vec<u8> {
        let mut data = b"CS".to_vec();
        data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
        data.extend_from_slice(&[0; 12]);
        data.push(0x00);
        data.extend_from_slice(&count.to_le_bytes());
        data
    }

    #[test]
    fn test_reader_is_rewound() {
        let data = minimal(0);
        let mut cursor = Cursor::new(data);
        cursor.set_position(5);
        let doc = Document::from_reader(&mut cursor).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.blocks()[0].kind(), BlockKind::Magic);
    }

    #[test]
    fn test_count_mismatch_is_informational_by_default() {
        let data = minimal(7);
        let doc = Document::from_slice(&data).unwrap();
        assert_eq!(doc.block_count(), 7);
        assert!(doc.body().is_empty());
    }

    #[test]
    fn test_document_limit_on_slices() {
        let data = minimal(0);
        let err = Document::parser()
            .max_document_len(4)
            .parse_slice(&data)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::DocumentTooLarge { max: 4, .. }
        ));
    }

    #[test]
    fn test_colors_skip_default_and_groups() {
        let mut data = minimal(3);
        data.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[0x01, 0x00, 0x01, 0x00, b'x', 0x01, 0x00]);
        for x in [0.5f32, 0.25, 0.125] {
            data.extend_from_slice(&x.to_le_bytes());
        }
        data.push(0x00);
        data.extend_from_slice(&[0x03, 0x00]);

        let doc = Document::from_slice(&data).unwrap();
        let colors: Vec<_> = doc.colors().collect();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].name, Name::new(b"x"));
        assert_eq!(
            colors[0].channels,
            Channels::Rgb {
                r: 0.5,
                g: 0.25,
                b: 0.125
            }
        );
        assert_eq!((&doc).into_iter().count(), 6);
    }

    #[quickcheck]
    fn decoding_arbitrary_data_never_panics(data: Vec<u8>) -> bool {
        let _ = Document::from_slice(&data);
        true
    }

    fn paths_agree(parser: DocumentParser, data: &[u8]) -> bool {
        match (parser.parse_slice(data), parser.parse_stream(data)) {
            // debug output so NaN channels still compare equal
            (Ok(a), Ok(b)) => format!("{:?}", a) == format!("{:?}", b),
            (Err(a), Err(b)) => a.offset() == b.offset() && a.to_string() == b.to_string(),
            _ => false,
        }
    }

    #[quickcheck]
    fn slice_and_stream_agree(tail: Vec<u8>) -> bool {
        let mut data = minimal(0);
        data.extend_from_slice(&tail);
        paths_agree(DocumentParser::new(), &data)
    }

    #[quickcheck]
    fn slice_and_stream_agree_under_document_limit(tail: Vec<u8>, max: u8, garbage: bool) -> bool {
        let mut data = if garbage { Vec::new() } else { minimal(0) };
        data.extend_from_slice(&tail);
        let parser = DocumentParser::new()
            .max_document_len(usize::from(max))
            .max_name_len(16);
        paths_agree(parser, &data)
    }

    #[rstest]
    #[case(&[0xff; 64], 16)]
    #[case(&[0xff; 64], 1)]
    #[case(&[0xff; 3], 2)]
    #[case(&[b'C'], 0)]
    fn test_early_errors_win_over_document_limit(#[case] data: &[u8], #[case] max: usize) {
        let parser = DocumentParser::new().max_document_len(max);
        assert!(paths_agree(parser, data));
    }

    #[test]
    fn test_document_limit_is_lazy_on_slices() {
        let mut data = vec![0xffu8; 64];
        let parser = DocumentParser::new().max_document_len(16);
        let err = parser.parse_slice(&data).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MagicMismatch { .. }));

        data = minimal(0);
        data.extend_from_slice(&[0x03, 0x00]);
        let err = DocumentParser::new()
            .max_document_len(22)
            .parse_slice(&data)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::DocumentTooLarge { max: 22, offset: 22 }
        ));
        assert!(DocumentParser::new()
            .max_document_len(23)
            .parse_slice(&data)
            .is_ok());
    }
}
