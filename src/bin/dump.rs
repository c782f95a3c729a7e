//! Dump a swatch document as text with byte offsets for debugging
//!
//! Reads the document from stdin and prints one line per block. Blocks
//! inside a group are indented. Decoding stops at the first error, which is
//! printed with its offset after the blocks that decoded successfully.
//!
//! Here is some sample output:
//!
//! ```text
//!          0: magic 'CS'
//!          2: default_color absent rgb(r=0, g=0, b=0) collapsed
//!         19: block_count 3
//!         21: group_start "Warm" expanded
//!         30:   color "Red" rgb(r=1, g=0, b=0) expanded
//!         52: group_end
//! ```

use colorswatch::{Block, BlockDecoder, ColorBlock, FieldReader, Name};
use std::io::{self, BufReader, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut decoder = BlockDecoder::new(FieldReader::new(BufReader::new(stdin.lock())));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut depth = 0usize;

    loop {
        let position = decoder.position();
        let block = match decoder.next_block() {
            Ok(Some(block)) => block,
            Ok(None) => break,
            Err(e) => {
                out.flush()?;
                return Err(e.into());
            }
        };

        if matches!(block, Block::GroupEnd(_)) {
            depth = depth.saturating_sub(1);
        }

        write!(out, "{:>10}: {:indent$}", position, "", indent = depth * 2)?;
        match &block {
            Block::Magic(_) => writeln!(out, "magic 'CS'")?,
            Block::DefaultColor(color) => {
                write!(out, "default_color ")?;
                write_color(&mut out, color)?;
            }
            Block::BlockCount(count) => writeln!(out, "block_count {}", count.value())?,
            Block::Color(color) => {
                write!(out, "color ")?;
                write_color(&mut out, color)?;
            }
            Block::GroupStart(group) => {
                write!(out, "group_start ")?;
                write_name(&mut out, &group.name)?;
                writeln!(out, " {}", expanded(group.expanded))?;
                depth += 1;
            }
            Block::GroupEnd(_) => writeln!(out, "group_end")?,
        }
    }

    out.flush()?;
    Ok(())
}

fn write_color<W: Write>(out: &mut W, color: &ColorBlock) -> io::Result<()> {
    write_name(out, &color.name)?;
    write!(out, " {}(", color.channels.space())?;
    for (i, (label, value)) in color.channels.iter().enumerate() {
        if i != 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}={}", label, value)?;
    }
    writeln!(out, ") {}", expanded(color.expanded))
}

fn write_name<W: Write>(out: &mut W, name: &Name) -> io::Result<()> {
    match name.to_utf8() {
        Some(text) => write!(out, "{:?}", text),
        None => write!(out, "absent"),
    }
}

fn expanded(flag: bool) -> &'static str {
    if flag {
        "expanded"
    } else {
        "collapsed"
    }
}
