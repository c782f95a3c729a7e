//! Convert a swatch document read from stdin into JSON
//!
//! Pass `--pretty` for indented output.

use colorswatch::DocumentParser;
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let pretty = std::env::args().skip(1).any(|x| x == "--pretty");

    let stdin = io::stdin();
    let doc = DocumentParser::new().parse_stream(stdin.lock())?;
    println!("{}", doc.to_json(pretty)?);
    Ok(())
}
