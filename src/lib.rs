/*!

A low level, streaming decoder for color swatch (`.cs`) files.

A swatch file is a small binary container of named colors, optionally
organized into groups. Every file opens with an untagged header (the `CS`
magic, a default color and a declared block count) that is followed by a
sequence of tagged blocks until the end of the input.

## Features

- ✔ Two decode paths: borrow from an in-memory slice or stream from any [Read](std::io::Read)
- ✔ Bounded: name and document length limits are enforced before allocating
- ✔ Precise errors: every failure reports the offset of the field that caused it
- ✔ Safe: fuzzed to ensure both decode paths agree on arbitrary input
- ✔ Serializable: optional [serde](https://serde.rs) and JSON support
- ✔ Consumers: export a document as a GIMP palette or an HTML showcase

## Quick Start

```rust
use colorswatch::{Block, Channels, Document};

let mut data = b"CS".to_vec();

// default color: absent name, rgb black, collapsed
data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
data.extend_from_slice(&[0; 12]);
data.push(0x00);

// one body block
data.extend_from_slice(&[0x01, 0x00]);

// a color named "Red"
data.extend_from_slice(&[0x01, 0x00, 0x03, 0x00, b'R', b'e', b'd', 0x01, 0x00]);
for x in [1.0f32, 0.0, 0.0] {
    data.extend_from_slice(&x.to_le_bytes());
}
data.push(0x01);

let doc = Document::from_slice(&data)?;
assert_eq!(doc.len(), 4);
assert_eq!(doc.block_count(), 1);

let red = doc.colors().next().unwrap();
assert_eq!(red.name.to_utf8().as_deref(), Some("Red"));
assert_eq!(red.channels, Channels::Rgb { r: 1.0, g: 0.0, b: 0.0 });
assert!(red.expanded);
# Ok::<(), colorswatch::Error>(())
```

## Streaming

Large or incrementally available files can be decoded one block at a time
with a [BlockDecoder] over a [FieldReader]. The same decoder drives the
slice based [Lexer], so both paths produce identical blocks and errors.

```rust
use colorswatch::{Block, BlockDecoder, DecodeState, FieldReader};

let mut data = b"CS".to_vec();
data.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
data.extend_from_slice(&[0; 16]);
data.extend_from_slice(&[0x00, 0x01, 0x00]);
data.extend_from_slice(&[0x03, 0x00]);

let mut decoder = BlockDecoder::new(FieldReader::new(data.as_slice()));
let mut kinds = Vec::new();
while let Some(block) = decoder.next_block()? {
    kinds.push(block.kind());
}

assert_eq!(kinds.len(), 4);
assert_eq!(decoder.state(), DecodeState::End);
# Ok::<(), colorswatch::Error>(())
```

## Caveats

- Group starts and ends are reported in file order and are not checked for
  balance.
- The declared block count is informational unless
  [CountPolicy::Strict] is requested.
- Only the magic header, block count, group end and name fields can be
  encoded.

*/

mod block;
mod color;
mod decoder;
mod document;
mod errors;
mod lexer;
mod name;
mod reader;
pub mod render;
pub(crate) mod util;
mod writer;

pub use self::block::*;
pub use self::color::*;
pub use self::decoder::*;
pub use self::document::*;
pub use self::errors::*;
pub use self::lexer::{detect_block, BlockTag, FlagPolicy, LexError, Lexer, LexerError};
pub use self::name::*;
pub use self::reader::*;
pub use self::writer::*;
