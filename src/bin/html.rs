//! Render a swatch document read from stdin as an HTML color showcase
//!
//! Pass `--compact` to omit newlines between elements.

use colorswatch::{render::Showcase, DocumentParser};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let compact = std::env::args().skip(1).any(|x| x == "--compact");

    let stdin = io::stdin();
    let doc = DocumentParser::new().parse_stream(stdin.lock())?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    Showcase::new().compact(compact).write(&doc, &mut out)?;
    out.flush()?;
    Ok(())
}
