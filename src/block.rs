use crate::{BlockTag, Channels, Name};
use std::fmt;

/// The kind of a [Block], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlockKind {
    /// The `CS` literal at offset 0
    Magic,

    /// The untagged color that follows the magic header
    DefaultColor,

    /// The untagged, declared number of body blocks
    BlockCount,

    /// A named color (tag `0x0001`)
    Color,

    /// Opens a group of colors (tag `0x0002`)
    GroupStart,

    /// Closes a group of colors (tag `0x0003`)
    GroupEnd,
}

impl BlockKind {
    /// The tag that introduces the block, if the block is tagged
    pub fn tag(&self) -> Option<BlockTag> {
        match self {
            BlockKind::Magic => Some(BlockTag::MAGIC),
            BlockKind::Color => Some(BlockTag::COLOR),
            BlockKind::GroupStart => Some(BlockTag::GROUP_START),
            BlockKind::GroupEnd => Some(BlockTag::GROUP_END),
            BlockKind::DefaultColor | BlockKind::BlockCount => None,
        }
    }

    /// Returns true for the kinds that may appear after the block count
    pub fn is_body(&self) -> bool {
        matches!(
            self,
            BlockKind::Color | BlockKind::GroupStart | BlockKind::GroupEnd
        )
    }

    /// Returns true for the kinds the partial encoder can write
    pub fn is_encodable(&self) -> bool {
        matches!(
            self,
            BlockKind::Magic | BlockKind::BlockCount | BlockKind::GroupEnd
        )
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Magic => "magic",
            BlockKind::DefaultColor => "default color",
            BlockKind::BlockCount => "block count",
            BlockKind::Color => "color",
            BlockKind::GroupStart => "group start",
            BlockKind::GroupEnd => "group end",
        };
        f.write_str(name)
    }
}

/// The fixed `CS` header at the start of every document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MagicHeader;

impl MagicHeader {
    /// The literal header bytes
    pub const BYTES: [u8; 2] = *b"CS";
}

/// Number of body blocks the file declares.
///
/// The value is informational and may disagree with the body that follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlockCount(pub u16);

impl BlockCount {
    pub fn value(&self) -> u16 {
        self.0
    }
}

/// Payload shared by tagged colors and the default color
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColorBlock {
    /// Optional display name
    pub name: Name,

    /// Channel values in the color's color space
    pub channels: Channels,

    /// Expand/collapse state left to the consumer
    pub expanded: bool,
}

/// Opens a group of colors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupStart {
    /// Optional group name
    pub name: Name,

    /// Expand/collapse state left to the consumer
    pub expanded: bool,
}

/// Closes a group of colors. Carries no payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupEnd;

/// One structural record of a swatch document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "data", rename_all = "snake_case")
)]
pub enum Block {
    Magic(MagicHeader),
    DefaultColor(ColorBlock),
    BlockCount(BlockCount),
    Color(ColorBlock),
    GroupStart(GroupStart),
    GroupEnd(GroupEnd),
}

impl Block {
    /// The kind of the block
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Magic(_) => BlockKind::Magic,
            Block::DefaultColor(_) => BlockKind::DefaultColor,
            Block::BlockCount(_) => BlockKind::BlockCount,
            Block::Color(_) => BlockKind::Color,
            Block::GroupStart(_) => BlockKind::GroupStart,
            Block::GroupEnd(_) => BlockKind::GroupEnd,
        }
    }

    /// Returns true if the block appears after the block count
    pub fn is_body(&self) -> bool {
        self.kind().is_body()
    }

    /// The name of colors and group starts
    pub fn name(&self) -> Option<&Name> {
        match self {
            Block::DefaultColor(x) | Block::Color(x) => Some(&x.name),
            Block::GroupStart(x) => Some(&x.name),
            _ => None,
        }
    }

    /// The expanded flag of colors and group starts
    pub fn expanded(&self) -> Option<bool> {
        match self {
            Block::DefaultColor(x) | Block::Color(x) => Some(x.expanded),
            Block::GroupStart(x) => Some(x.expanded),
            _ => None,
        }
    }

    /// The color payload of colors and the default color
    pub fn as_color(&self) -> Option<&ColorBlock> {
        match self {
            Block::DefaultColor(x) | Block::Color(x) => Some(x),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn red() -> ColorBlock {
        ColorBlock {
            name: Name::new(b"Red"),
            channels: Channels::Rgb {
                r: 1.0,
                g: 0.0,
                b: 0.0,
            },
            expanded: true,
        }
    }

    #[rstest]
    #[case(Block::Magic(MagicHeader), BlockKind::Magic, false)]
    #[case(Block::DefaultColor(red()), BlockKind::DefaultColor, false)]
    #[case(Block::BlockCount(BlockCount(2)), BlockKind::BlockCount, false)]
    #[case(Block::Color(red()), BlockKind::Color, true)]
    #[case(Block::GroupStart(GroupStart::default()), BlockKind::GroupStart, true)]
    #[case(Block::GroupEnd(GroupEnd), BlockKind::GroupEnd, true)]
    fn test_kind(#[case] block: Block, #[case] kind: BlockKind, #[case] body: bool) {
        assert_eq!(block.kind(), kind);
        assert_eq!(block.is_body(), body);
    }

    #[test]
    fn fields_only_exist_where_they_apply() {
        let color = Block::Color(red());
        assert_eq!(color.name(), Some(&Name::new(b"Red")));
        assert_eq!(color.expanded(), Some(true));
        assert!(color.as_color().is_some());

        let end = Block::GroupEnd(GroupEnd);
        assert_eq!(end.name(), None);
        assert_eq!(end.expanded(), None);
        assert!(end.as_color().is_none());

        let group = Block::GroupStart(GroupStart {
            name: Name::absent(),
            expanded: false,
        });
        assert_eq!(group.name(), Some(&Name::absent()));
        assert!(group.as_color().is_none());
    }

    #[test]
    fn tags_of_kinds() {
        assert_eq!(BlockKind::Color.tag(), Some(BlockTag::new(1)));
        assert_eq!(BlockKind::GroupEnd.tag(), Some(BlockTag::new(3)));
        assert_eq!(BlockKind::DefaultColor.tag(), None);
        assert_eq!(BlockKind::BlockCount.tag(), None);
    }
}
