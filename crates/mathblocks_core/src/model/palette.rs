//! Palette catalog of insertable block kinds.
//!
//! # Responsibility
//! - Define the fixed, grouped catalog offered to the user for drag-in.
//! - Resolve palette wire tags and group colors for rendering.
//!
//! # Invariants
//! - Only operator kinds are offered; leaf kinds come from text commit.
//! - Every operator kind appears in exactly one group.

use crate::model::block::BlockKind;

/// Fill used for kinds that belong to no palette group (leaf fields).
pub const DEFAULT_BLOCK_COLOR: &str = "#ffffff";
/// Amount subtracted from each channel for block borders.
pub const BORDER_DARKEN_AMOUNT: u8 = 40;

/// One labeled group of palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteGroup {
    pub label: &'static str,
    /// `#rrggbb` fill shared by every block of the group.
    pub color: &'static str,
    pub kinds: &'static [BlockKind],
}

const PALETTE_GROUPS: &[PaletteGroup] = &[
    PaletteGroup {
        label: "Operators",
        color: "#fbbf24",
        kinds: &[
            BlockKind::Add,
            BlockKind::Subtract,
            BlockKind::Multiply,
            BlockKind::Divide,
            BlockKind::Fraction,
        ],
    },
    PaletteGroup {
        label: "Powers & Roots",
        color: "#a78bfa",
        kinds: &[BlockKind::Power, BlockKind::Root],
    },
    PaletteGroup {
        label: "Logarithms",
        color: "#60a5fa",
        kinds: &[BlockKind::Log, BlockKind::Ln, BlockKind::LogBase],
    },
    PaletteGroup {
        label: "Trigonometric Functions",
        color: "#38bdf8",
        kinds: &[
            BlockKind::Sin,
            BlockKind::Cos,
            BlockKind::Tan,
            BlockKind::Csc,
            BlockKind::Sec,
            BlockKind::Cot,
            BlockKind::Arcsin,
            BlockKind::Arccos,
            BlockKind::Arctan,
        ],
    },
    PaletteGroup {
        label: "Parentheses",
        color: "#f472b6",
        kinds: &[BlockKind::Parenthesis],
    },
];

/// Returns palette groups in display order.
pub fn palette_groups() -> &'static [PaletteGroup] {
    PALETTE_GROUPS
}

/// Returns the group containing `kind`, if it is offered by the palette.
pub fn group_of(kind: BlockKind) -> Option<&'static PaletteGroup> {
    PALETTE_GROUPS
        .iter()
        .find(|group| group.kinds.contains(&kind))
}

/// Resolves a palette wire tag to an insertable kind.
///
/// Tags naming leaf kinds or unknown kinds resolve to `None`.
pub fn lookup_palette_kind(tag: &str) -> Option<BlockKind> {
    let kind = tag.parse::<BlockKind>().ok()?;
    group_of(kind).map(|_| kind)
}

/// Fill color for a block of `kind`.
pub fn group_color(kind: BlockKind) -> &'static str {
    group_of(kind).map_or(DEFAULT_BLOCK_COLOR, |group| group.color)
}

/// Darkens a `#rgb` / `#rrggbb` color by subtracting `amount` per channel.
///
/// Unparseable input is returned as black rather than failing.
pub fn darken_color(hex: &str, amount: u8) -> String {
    let digits = hex.trim().trim_start_matches('#');
    let expanded = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        digits.to_string()
    };
    let value = u32::from_str_radix(&expanded, 16).unwrap_or(0);
    let channel = |shift: u32| ((value >> shift) & 0xff).saturating_sub(u32::from(amount));
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(16),
        channel(8),
        channel(0)
    )
}

/// Border color for a block of `kind`.
pub fn border_color(kind: BlockKind) -> String {
    darken_color(group_color(kind), BORDER_DARKEN_AMOUNT)
}

#[cfg(test)]
mod tests {
    use super::{darken_color, group_color, lookup_palette_kind, palette_groups};
    use crate::model::block::BlockKind;

    #[test]
    fn every_operator_kind_is_offered_exactly_once() {
        for kind in BlockKind::ALL {
            let count = palette_groups()
                .iter()
                .filter(|group| group.kinds.contains(&kind))
                .count();
            let expected = usize::from(!kind.is_leaf());
            assert_eq!(count, expected, "{kind}");
        }
    }

    #[test]
    fn lookup_rejects_leaf_and_unknown_tags() {
        assert_eq!(lookup_palette_kind("log-base"), Some(BlockKind::LogBase));
        assert_eq!(lookup_palette_kind("variable"), None);
        assert_eq!(lookup_palette_kind("matrix"), None);
    }

    #[test]
    fn darken_color_clamps_channels_and_expands_short_form() {
        assert_eq!(darken_color("#fbbf24", 40), "#d39700");
        assert_eq!(darken_color("#fff", 40), "#d7d7d7");
        assert_eq!(darken_color("#102030", 40), "#000008");
    }

    #[test]
    fn leaf_kinds_use_default_color() {
        assert_eq!(group_color(BlockKind::Variable), "#ffffff");
        assert_eq!(group_color(BlockKind::Power), "#a78bfa");
    }
}
