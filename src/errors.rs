use crate::{BlockKind, LexError, LexerError};
use std::fmt;

/// An error that can occur when decoding a swatch document
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Consume self and return the specific type of error
    #[must_use]
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns the byte offset that the error occurs (if available)
    pub fn offset(&self) -> Option<usize> {
        self.0.offset()
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// The first two bytes were not the `CS` literal
    MagicMismatch { found: [u8; 2] },

    /// A field declared more bytes than remain in the input
    TruncatedInput { offset: usize, needed: usize },

    /// A color space selector other than RGB (1) or CMYK (2)
    UnsupportedColorSpace { selector: u16, offset: usize },

    /// A tag that does not start a body block
    UnknownBlockType { tag: [u8; 2], offset: usize },

    /// A flag byte other than 0 or 1 while decoding with a strict flag policy
    InvalidFlag { value: u8, offset: usize },

    /// A name length exceeding the configured maximum
    NameTooLong { len: usize, max: usize, offset: usize },

    /// The input exceeded the configured maximum document length
    DocumentTooLarge { max: usize, offset: usize },

    /// The declared block count disagreed with the number of body blocks
    /// while decoding with a strict count policy
    BlockCountMismatch { declared: u16, actual: usize },

    /// The block kind has no byte layout to encode to
    EncodeUnsupported(BlockKind),

    /// An underlying error from the byte source
    Io { offset: usize, source: std::io::Error },
}

impl ErrorKind {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ErrorKind::MagicMismatch { .. } => Some(0),
            ErrorKind::TruncatedInput { offset, .. } => Some(offset),
            ErrorKind::UnsupportedColorSpace { offset, .. } => Some(offset),
            ErrorKind::UnknownBlockType { offset, .. } => Some(offset),
            ErrorKind::InvalidFlag { offset, .. } => Some(offset),
            ErrorKind::NameTooLong { offset, .. } => Some(offset),
            ErrorKind::DocumentTooLarge { offset, .. } => Some(offset),
            ErrorKind::Io { offset, .. } => Some(offset),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Io { ref source, .. } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::MagicMismatch { found } => write!(
                f,
                "expected magic header 'CS' but found {:02x} {:02x} (offset: 0)",
                found[0], found[1]
            ),
            ErrorKind::TruncatedInput { offset, needed } => write!(
                f,
                "input truncated, needed {} more bytes (offset: {})",
                needed, offset
            ),
            ErrorKind::UnsupportedColorSpace { selector, offset } => write!(
                f,
                "unsupported color space {} (offset: {})",
                selector, offset
            ),
            ErrorKind::UnknownBlockType { tag, offset } => write!(
                f,
                "unknown block type encountered (tag: {:02x} {:02x}, offset: {})",
                tag[0], tag[1], offset
            ),
            ErrorKind::InvalidFlag { value, offset } => {
                write!(f, "invalid flag byte 0x{:02x} (offset: {})", value, offset)
            }
            ErrorKind::NameTooLong { len, max, offset } => write!(
                f,
                "name of {} bytes exceeds the limit of {} (offset: {})",
                len, max, offset
            ),
            ErrorKind::DocumentTooLarge { max, offset } => write!(
                f,
                "document exceeds the limit of {} bytes (offset: {})",
                max, offset
            ),
            ErrorKind::BlockCountMismatch { declared, actual } => write!(
                f,
                "block count declared {} blocks but {} were decoded",
                declared, actual
            ),
            ErrorKind::EncodeUnsupported(kind) => {
                write!(f, "{} blocks can not be encoded", kind)
            }
            ErrorKind::Io { offset, .. } => {
                write!(f, "failed to read past offset: {}", offset)
            }
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<LexerError> for Error {
    fn from(err: LexerError) -> Self {
        let offset = err.position();
        let kind = match err.into_kind() {
            LexError::Eof { needed } => ErrorKind::TruncatedInput { offset, needed },
            LexError::UnknownTag(tag) => ErrorKind::UnknownBlockType { tag, offset },
            LexError::UnsupportedColorSpace(selector) => {
                ErrorKind::UnsupportedColorSpace { selector, offset }
            }
            LexError::InvalidFlag(value) => ErrorKind::InvalidFlag { value, offset },
            LexError::NameTooLong { len, max } => ErrorKind::NameTooLong { len, max, offset },
            LexError::TooLarge { max } => ErrorKind::DocumentTooLarge { max, offset },
        };
        Error::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexer_errors_keep_their_position() {
        let err = Error::from(LexError::UnknownTag([0xff, 0xff]).at(17));
        assert_eq!(err.offset(), Some(17));
        assert!(matches!(
            err.kind(),
            ErrorKind::UnknownBlockType {
                tag: [0xff, 0xff],
                offset: 17
            }
        ));
    }

    #[test]
    fn display_includes_offset() {
        let err = Error::from(LexError::Eof { needed: 3 }.at(6));
        assert_eq!(
            err.to_string(),
            "input truncated, needed 3 more bytes (offset: 6)"
        );
    }

    #[test]
    fn io_errors_expose_source() {
        use std::error::Error as _;
        let err = Error::new(ErrorKind::Io {
            offset: 4,
            source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        });
        assert!(err.source().is_some());
        assert_eq!(err.offset(), Some(4));
    }
}
