//! Convert a swatch document read from stdin into a GIMP palette
//!
//! The first argument, if given, is used as the palette name.

use colorswatch::{render::GimpPalette, DocumentParser};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("Untitled"));

    let stdin = io::stdin();
    let doc = DocumentParser::new().parse_stream(stdin.lock())?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    GimpPalette::new(name).write(&doc, &mut out)?;
    out.flush()?;
    Ok(())
}
