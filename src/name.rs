use std::borrow::Cow;
use std::fmt;

/// Optional, length prefixed name attached to color and group blocks.
///
/// The bytes are opaque: the format does not declare a character set, so no
/// interpretation happens while decoding. A zero length name and an absent
/// name are the same value.
///
/// ```
/// use colorswatch::Name;
///
/// assert_eq!(Name::new(b""), Name::absent());
/// assert_eq!(Name::new(b"Red").as_bytes(), Some(&b"Red"[..]));
/// assert_eq!(Name::absent().as_bytes(), None);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Name {
    data: Vec<u8>,
}

impl Name {
    /// Create a name from raw bytes
    pub fn new(data: impl Into<Vec<u8>>) -> Name {
        Name { data: data.into() }
    }

    /// The absent name
    pub const fn absent() -> Name {
        Name { data: Vec::new() }
    }

    /// Returns true if the block carries no name
    pub fn is_absent(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of the name in bytes, zero when absent
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the block carries no name
    pub fn is_empty(&self) -> bool {
        self.is_absent()
    }

    /// The raw name bytes, or none when absent
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if self.data.is_empty() {
            None
        } else {
            Some(&self.data)
        }
    }

    /// Convert the name into text for display, replacing invalid UTF-8
    /// sequences. Absent names yield none.
    ///
    /// ```
    /// use colorswatch::Name;
    ///
    /// assert_eq!(Name::new(b"Teal").to_utf8().as_deref(), Some("Teal"));
    /// assert_eq!(Name::new(&[0x66, 0xff][..]).to_utf8().as_deref(), Some("f\u{fffd}"));
    /// ```
    pub fn to_utf8(&self) -> Option<Cow<'_, str>> {
        self.as_bytes().map(String::from_utf8_lossy)
    }

    /// Consume the name and return its bytes (empty when absent)
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_utf8() {
            Some(text) => write!(f, "Name {{ {:?} }}", text),
            None => write!(f, "Name {{ absent }}"),
        }
    }
}

impl From<&[u8]> for Name {
    fn from(value: &[u8]) -> Self {
        Name::new(value)
    }
}

impl From<Option<&[u8]>> for Name {
    fn from(value: Option<&[u8]>) -> Self {
        value.map(Name::new).unwrap_or_default()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.to_utf8() {
            Some(text) => serializer.serialize_some(text.as_ref()),
            None => serializer.serialize_none(),
        }
    }
}
