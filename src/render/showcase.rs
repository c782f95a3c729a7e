use super::UNTITLED_GROUP;
use crate::{Block, Document, Rgb8};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::io::{self, Write};

/// Characters left as is in a data URL
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const STYLESHEET: &[&str] = &[
    "html,body{background-color:#222;color:#EEE;font-family:sans-serif;}",
    ".shelf, .shelf2{margin:10px;display:inline-block;min-width:300px;min-height:100px;}",
    ".shelf{background-color:#333;}",
    ".shelf2{background-color:#BBB;color:#222}",
    ".dimension{color:#555;}",
    ".shelf>*,.shelf2>*{display:block;margin:0 auto;text-align:center;}",
];

/// Writes an HTML page that previews every color of a document.
///
/// Each tagged color becomes a `span` with its own background rule and each
/// group start becomes a heading. Group ends and header blocks are skipped.
#[derive(Debug, Clone, Default)]
pub struct Showcase {
    compact: bool,
}

impl Showcase {
    pub fn new() -> Self {
        Showcase::default()
    }

    /// Omit the newlines between elements
    #[must_use]
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn write<W: Write>(&self, doc: &Document, mut writer: W) -> io::Result<()> {
        let nl: &[u8] = if self.compact { b"" } else { b"\n" };

        writer.write_all(b"<!DOCTYPE html>")?;
        writer.write_all(nl)?;
        writer.write_all(b"<html>")?;
        writer.write_all(nl)?;
        writer.write_all(b"<head>")?;
        writer.write_all(nl)?;
        for rule in STYLESHEET {
            write_style(&mut writer, rule)?;
            writer.write_all(nl)?;
        }

        for (id, rgb) in doc.colors().map(|x| x.channels.to_rgb8()).enumerate() {
            let rule = format!(
                "#cb{}{{background-color: rgb({},{},{});}}",
                id, rgb.r, rgb.g, rgb.b
            );
            write_style(&mut writer, &rule)?;
            writer.write_all(nl)?;
        }

        writer.write_all(b"</head>")?;
        writer.write_all(nl)?;
        writer.write_all(b"<body>")?;
        writer.write_all(nl)?;

        let mut id = 0;
        for block in doc {
            match block {
                Block::Color(color) => {
                    write!(writer, "<span id=\"cb{}\">", id)?;
                    match color.name.to_utf8() {
                        Some(name) => write_escaped(&mut writer, &name)?,
                        None => write_rgb_label(&mut writer, color.channels.to_rgb8())?,
                    }
                    writer.write_all(b"</span>")?;
                    writer.write_all(nl)?;
                    id += 1;
                }
                Block::GroupStart(group) => {
                    writer.write_all(b"<h2 class=\"group\">")?;
                    match group.name.to_utf8() {
                        Some(name) => write_escaped(&mut writer, &name)?,
                        None => writer.write_all(UNTITLED_GROUP.as_bytes())?,
                    }
                    writer.write_all(b"</h2>")?;
                    writer.write_all(nl)?;
                }
                other => tracing::debug!(kind = %other.kind(), "showcase skipping block"),
            }
        }

        writer.write_all(b"</body>")?;
        writer.write_all(nl)?;
        writer.write_all(b"</html>")?;
        writer.write_all(nl)
    }

    /// Render the page into a string
    pub fn to_string(&self, doc: &Document) -> String {
        let mut out = Vec::new();
        let _ = self.write(doc, &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Render the compact page as a `data:text/html` URL that a browser can
    /// open directly
    pub fn to_data_url(&self, doc: &Document) -> String {
        let page = self.clone().compact(true).to_string(doc);
        format!(
            "data:text/html;charset=UTF-8,{}",
            utf8_percent_encode(&page, URL_SAFE)
        )
    }
}

fn write_style<W: Write>(writer: &mut W, rule: &str) -> io::Result<()> {
    write!(writer, "<style type=\"text/css\">{}</style>", rule)
}

fn write_rgb_label<W: Write>(writer: &mut W, rgb: Rgb8) -> io::Result<()> {
    write!(writer, "rgb({}, {}, {})", rgb.r, rgb.g, rgb.b)
}

fn write_escaped<W: Write>(writer: &mut W, text: &str) -> io::Result<()> {
    let mut last = 0;
    for (i, c) in text.char_indices() {
        let escaped: &[u8] = match c {
            '&' => b"&amp;",
            '<' => b"&lt;",
            '>' => b"&gt;",
            '"' => b"&quot;",
            '\'' => b"&#39;",
            _ => continue,
        };
        writer.write_all(text[last..i].as_bytes())?;
        writer.write_all(escaped)?;
        last = i + c.len_utf8();
    }
    writer.write_all(text[last..].as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("Red", "Red")]
    #[case("", "")]
    #[case("<b>&</b>", "&lt;b&gt;&amp;&lt;/b&gt;")]
    #[case("say \"hi\"", "say &quot;hi&quot;")]
    #[case("é<", "é&lt;")]
    fn test_escape(#[case] input: &str, #[case] expected: &str) {
        let mut out = Vec::new();
        write_escaped(&mut out, input).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_rgb_label() {
        let mut out = Vec::new();
        write_rgb_label(&mut out, Rgb8 { r: 1, g: 2, b: 255 }).unwrap();
        assert_eq!(out, b"rgb(1, 2, 255)");
    }
}
