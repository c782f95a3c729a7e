use crate::util::unit_to_byte;
use std::fmt;

/// Color space selector of a color field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorSpace {
    /// Red, green, blue
    Rgb,

    /// Cyan, magenta, yellow, key
    Cmyk,
}

impl ColorSpace {
    /// Creates a color space from its selector value
    pub fn from_selector(selector: u16) -> Option<ColorSpace> {
        match selector {
            1 => Some(ColorSpace::Rgb),
            2 => Some(ColorSpace::Cmyk),
            _ => None,
        }
    }

    /// Returns the selector value written in the color field
    pub fn selector(&self) -> u16 {
        match self {
            ColorSpace::Rgb => 1,
            ColorSpace::Cmyk => 2,
        }
    }

    /// Channel labels in the order they are stored
    pub fn channel_names(&self) -> &'static [char] {
        match self {
            ColorSpace::Rgb => &['r', 'g', 'b'],
            ColorSpace::Cmyk => &['c', 'm', 'y', 'k'],
        }
    }

    /// Number of float channels stored for the color space
    pub fn channel_count(&self) -> usize {
        self.channel_names().len()
    }

    /// Number of bytes the color field occupies: the selector plus the
    /// channels
    pub fn field_len(&self) -> usize {
        2 + 4 * self.channel_count()
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpace::Rgb => write!(f, "rgb"),
            ColorSpace::Cmyk => write!(f, "cmyk"),
        }
    }
}

/// Decoded float channels of a color, in storage order
///
/// ```
/// use colorswatch::{Channels, ColorSpace};
///
/// let red = Channels::Rgb { r: 1.0, g: 0.0, b: 0.0 };
/// assert_eq!(red.space(), ColorSpace::Rgb);
/// assert_eq!(red.get('r'), Some(1.0));
/// assert_eq!(red.get('k'), None);
/// assert_eq!(red.iter().collect::<Vec<_>>(), vec![('r', 1.0), ('g', 0.0), ('b', 0.0)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "space", rename_all = "lowercase"))]
pub enum Channels {
    /// Red, green and blue channels
    Rgb { r: f32, g: f32, b: f32 },

    /// Cyan, magenta, yellow and key channels
    Cmyk { c: f32, m: f32, y: f32, k: f32 },
}

impl Channels {
    /// The color space of the channels
    pub fn space(&self) -> ColorSpace {
        match self {
            Channels::Rgb { .. } => ColorSpace::Rgb,
            Channels::Cmyk { .. } => ColorSpace::Cmyk,
        }
    }

    /// Channel values in storage order
    pub fn values(&self) -> ChannelValues {
        match *self {
            Channels::Rgb { r, g, b } => ChannelValues::new(&[r, g, b]),
            Channels::Cmyk { c, m, y, k } => ChannelValues::new(&[c, m, y, k]),
        }
    }

    /// Iterate over `(label, value)` pairs in storage order
    pub fn iter(&self) -> impl Iterator<Item = (char, f32)> + '_ {
        let names = self.space().channel_names();
        names.iter().copied().zip(self.values())
    }

    /// Look up a channel by its label
    pub fn get(&self, channel: char) -> Option<f32> {
        self.iter().find(|(x, _)| *x == channel).map(|(_, v)| v)
    }

    /// Approximate the color as 8 bit RGB for display.
    ///
    /// RGB channels scale by 255 and truncate. CMYK goes through the naive
    /// subtractive conversion without a color profile.
    ///
    /// ```
    /// use colorswatch::{Channels, Rgb8};
    ///
    /// let cyan = Channels::Cmyk { c: 1.0, m: 0.0, y: 0.0, k: 0.0 };
    /// assert_eq!(cyan.to_rgb8(), Rgb8 { r: 0, g: 255, b: 255 });
    /// ```
    pub fn to_rgb8(&self) -> Rgb8 {
        match *self {
            Channels::Rgb { r, g, b } => Rgb8 {
                r: unit_to_byte(r),
                g: unit_to_byte(g),
                b: unit_to_byte(b),
            },
            Channels::Cmyk { c, m, y, k } => Rgb8 {
                r: unit_to_byte((1.0 - c) * (1.0 - k)),
                g: unit_to_byte((1.0 - m) * (1.0 - k)),
                b: unit_to_byte((1.0 - y) * (1.0 - k)),
            },
        }
    }
}

/// Fixed capacity list of channel values
#[derive(Debug, Clone)]
pub struct ChannelValues {
    data: [f32; 4],
    len: usize,
    pos: usize,
}

impl ChannelValues {
    fn new(values: &[f32]) -> Self {
        let mut data = [0.0; 4];
        data[..values.len()].copy_from_slice(values);
        ChannelValues {
            data,
            len: values.len(),
            pos: 0,
        }
    }
}

impl Iterator for ChannelValues {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos < self.len {
            let result = self.data[self.pos];
            self.pos += 1;
            Some(result)
        } else {
            None
        }
    }
}

/// 8 bit RGB approximation of a color used by renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8 {
    /// Red channel
    pub r: u8,

    /// Green channel
    pub g: u8,

    /// Blue channel
    pub b: u8,
}
