//! Renderers that consume a decoded [Document](crate::Document).
//!
//! Renderers only read the document. Block kinds a renderer has no use for
//! are skipped.

mod gimp;
mod showcase;

pub use self::gimp::GimpPalette;
pub use self::showcase::Showcase;

/// Name used in place of an absent color name
pub const UNTITLED_COLOR: &str = "Untitled";

/// Name used in place of an absent group name
pub const UNTITLED_GROUP: &str = "Untitled Group";
