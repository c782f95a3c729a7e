use super::UNTITLED_COLOR;
use crate::{Block, ColorBlock, Document};
use std::io::{self, Write};

/// Writes the colors of a document as a GIMP palette (`.gpl`)
///
/// ```
/// use colorswatch::{render::GimpPalette, Document};
///
/// let mut data = b"CS".to_vec();
/// data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
/// data.extend_from_slice(&[0; 12]);
/// data.extend_from_slice(&[0x00, 0x01, 0x00]);
/// data.extend_from_slice(&[0x01, 0x00, 0x03, 0x00, b'R', b'e', b'd', 0x01, 0x00]);
/// data.extend_from_slice(&1.0f32.to_le_bytes());
/// data.extend_from_slice(&[0; 8]);
/// data.push(0x00);
///
/// let doc = Document::from_slice(&data)?;
/// let out = GimpPalette::new("warm").to_string(&doc);
/// assert_eq!(out, "GIMP Palette\nName: warm\nColumns: 10\n#\n255 0 0\tRed\n\n");
/// # Ok::<(), colorswatch::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct GimpPalette {
    name: String,
    columns: u16,
}

impl GimpPalette {
    /// A palette with the given display name and 10 columns
    pub fn new(name: impl Into<String>) -> Self {
        GimpPalette {
            name: name.into(),
            columns: 10,
        }
    }

    /// Set the number of columns the palette suggests
    #[must_use]
    pub fn columns(mut self, columns: u16) -> Self {
        self.columns = columns;
        self
    }

    /// Write the palette. Only tagged colors are listed; the default color,
    /// groups and header blocks are skipped.
    pub fn write<W: Write>(&self, doc: &Document, mut writer: W) -> io::Result<()> {
        write!(
            writer,
            "GIMP Palette\nName: {}\nColumns: {}\n#\n",
            self.name, self.columns
        )?;

        for block in doc {
            match block {
                Block::Color(color) => write_color_line(&mut writer, color)?,
                other => tracing::debug!(kind = %other.kind(), "palette skipping block"),
            }
        }

        writer.write_all(b"\n")
    }

    /// Render the palette into a string
    pub fn to_string(&self, doc: &Document) -> String {
        let mut out = Vec::new();
        // writing into a Vec can not fail
        let _ = self.write(doc, &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}

fn write_color_line<W: Write>(writer: &mut W, color: &ColorBlock) -> io::Result<()> {
    let rgb = color.channels.to_rgb8();
    write_channel(writer, rgb.r)?;
    writer.write_all(b" ")?;
    write_channel(writer, rgb.g)?;
    writer.write_all(b" ")?;
    write_channel(writer, rgb.b)?;
    writer.write_all(b"\t")?;
    match color.name.to_utf8() {
        Some(name) => writer.write_all(name.as_bytes())?,
        None => writer.write_all(UNTITLED_COLOR.as_bytes())?,
    }
    writer.write_all(b"\n")
}

#[cfg(feature = "faster_writer")]
#[inline]
fn write_channel<W: Write>(writer: &mut W, x: u8) -> io::Result<()> {
    let mut buffer = itoa::Buffer::new();
    writer.write_all(buffer.format(x).as_bytes())
}

#[cfg(not(feature = "faster_writer"))]
#[inline]
fn write_channel<W: Write>(writer: &mut W, x: u8) -> io::Result<()> {
    write!(writer, "{}", x)
}
