//! # Domain Types
//!
//! Board configuration types shared by the pricing engine and the lead-time
//! estimator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │  BoardConfig    │   one per pricing/ETA call, never persisted here   │
//! │  │  ─────────────  │                                                    │
//! │  │  size ──────────┼──► BoardSize   Small | Regular | Large             │
//! │  │  layout ────────┼──► BoardLayout                                     │
//! │  │  extras ────────┼──► Extras      juice_groove, third_strip,          │
//! │  └─────────────────┘                 brass_feet                         │
//! │                                                                         │
//! │  BoardLayout                                                            │
//! │  ├── strips: [[Cell]]   2 or 3 strips, priced by membership             │
//! │  └── order:  [RowOrder] which strip fills each physical row (display)   │
//! │                                                                         │
//! │  Cell = Option<MaterialToken>                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Board Size
// =============================================================================

/// Board size. Drives the base price and the default production range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BoardSize {
    Small,
    Regular,
    Large,
}

impl BoardSize {
    /// All sizes, smallest first.
    pub const ALL: [BoardSize; 3] = [BoardSize::Small, BoardSize::Regular, BoardSize::Large];

    /// Lowercase wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            BoardSize::Small => "small",
            BoardSize::Regular => "regular",
            BoardSize::Large => "large",
        }
    }

    /// Capitalized name for order summaries.
    pub const fn display_name(&self) -> &'static str {
        match self {
            BoardSize::Small => "Small",
            BoardSize::Regular => "Regular",
            BoardSize::Large => "Large",
        }
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse. Anything outside the three sizes is rejected
/// rather than defaulted.
impl FromStr for BoardSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(BoardSize::Small),
            "regular" => Ok(BoardSize::Regular),
            "large" => Ok(BoardSize::Large),
            _ => Err(ValidationError::NotAllowed {
                field: "size".to_string(),
                allowed: BoardSize::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Material Token
// =============================================================================

/// Opaque material identifier for one cell: a wood key (`"walnut"`) or a raw
/// color (`"#3b2f2f"`, `"rgb(59, 47, 47)"`).
///
/// Tokens compare by [`normalized_key`](MaterialToken::normalized_key), so
/// `" Black  Walnut"` and `"black walnut"` are the same material.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialToken(String);

impl MaterialToken {
    pub fn new(raw: impl Into<String>) -> Self {
        MaterialToken(raw.into())
    }

    /// The token exactly as the caller supplied it.
    pub fn as_raw(&self) -> &str {
        &self.0
    }

    /// Trimmed, lowercased, internal whitespace runs collapsed to one space.
    pub fn normalized_key(&self) -> String {
        normalize_key(&self.0)
    }

    /// True when nothing is left after trimming. Blank tokens count as
    /// empty cells.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl PartialEq for MaterialToken {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_key() == other.normalized_key()
    }
}

impl Eq for MaterialToken {}

impl From<&str> for MaterialToken {
    fn from(raw: &str) -> Self {
        MaterialToken::new(raw)
    }
}

/// Normalizes a material token or catalog key for comparison.
///
/// ## Example
/// ```rust
/// use boardworks_core::types::normalize_key;
///
/// assert_eq!(normalize_key("  Black \t Walnut "), "black walnut");
/// assert_eq!(normalize_key("#AABBCC"), "#aabbcc");
/// ```
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One position in a strip.
pub type Cell = Option<MaterialToken>;

/// Returns the token of a filled cell, or `None` for an empty one.
#[inline]
pub fn filled(cell: &Cell) -> Option<&MaterialToken> {
    cell.as_ref().filter(|token| !token.is_blank())
}

// =============================================================================
// Board Layout
// =============================================================================

/// Which strip supplies one physical row, and whether it is mirrored.
///
/// `strip_no` is 1-based, matching the builder UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RowOrder {
    pub strip_no: usize,
    #[serde(default)]
    pub reflected: bool,
}

/// The per-cell material grid of a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BoardLayout {
    pub strips: Vec<Vec<Cell>>,
    #[serde(default)]
    pub order: Vec<RowOrder>,
}

impl BoardLayout {
    /// Creates a layout with the identity row order.
    pub fn new(strips: Vec<Vec<Cell>>) -> Self {
        BoardLayout {
            strips,
            order: Vec::new(),
        }
    }

    /// Builds a layout from string tokens, `""` meaning an empty cell.
    ///
    /// ## Example
    /// ```rust
    /// use boardworks_core::types::BoardLayout;
    ///
    /// let layout = BoardLayout::from_tokens(&[&["walnut", ""], &["maple", "maple"]]);
    /// assert_eq!(layout.filled_cell_count(false), 3);
    /// ```
    pub fn from_tokens(strips: &[&[&str]]) -> Self {
        BoardLayout::new(
            strips
                .iter()
                .map(|strip| {
                    strip
                        .iter()
                        .map(|raw| (!raw.is_empty()).then(|| MaterialToken::new(*raw)))
                        .collect()
                })
                .collect(),
        )
    }

    /// Number of strips that take part in pricing: 2, or 3 with the third
    /// strip extra.
    #[inline]
    pub const fn active_strip_count(strip3_enabled: bool) -> usize {
        if strip3_enabled {
            3
        } else {
            2
        }
    }

    /// The active strips that are actually present.
    pub fn active_strips(&self, strip3_enabled: bool) -> impl Iterator<Item = &[Cell]> {
        self.strips
            .iter()
            .take(Self::active_strip_count(strip3_enabled))
            .map(Vec::as_slice)
    }

    /// Filled cells across the active strips. Missing strips count as empty.
    pub fn filled_cell_count(&self, strip3_enabled: bool) -> usize {
        self.active_strips(strip3_enabled)
            .flatten()
            .filter(|cell| filled(cell).is_some())
            .count()
    }

    /// Like [`filled_cell_count`](Self::filled_cell_count), but `None` when an
    /// active strip is missing altogether.
    pub fn try_filled_cell_count(&self, strip3_enabled: bool) -> Option<usize> {
        if self.strips.len() < Self::active_strip_count(strip3_enabled) {
            return None;
        }
        Some(self.filled_cell_count(strip3_enabled))
    }

    /// Upper bound on filled cells: every position of the active strips.
    pub fn capacity(&self, strip3_enabled: bool) -> usize {
        self.active_strips(strip3_enabled).map(<[Cell]>::len).sum()
    }

    /// Resolves `order` into physical rows for rendering.
    ///
    /// Reflected rows are mirrored. Entries pointing at a missing or inactive
    /// strip are skipped. An empty `order` means one row per active strip, in
    /// strip order.
    pub fn display_rows(&self, strip3_enabled: bool) -> Vec<Vec<Cell>> {
        let active = Self::active_strip_count(strip3_enabled).min(self.strips.len());

        if self.order.is_empty() {
            return self.strips.iter().take(active).cloned().collect();
        }

        self.order
            .iter()
            .filter_map(|row| {
                let idx = row.strip_no.checked_sub(1)?;
                if idx >= active {
                    return None;
                }
                let mut cells = self.strips[idx].clone();
                if row.reflected {
                    cells.reverse();
                }
                Some(cells)
            })
            .collect()
    }
}

// =============================================================================
// Extras
// =============================================================================

/// Optional structural add-ons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Extras {
    pub juice_groove: bool,
    /// Also switches the active strip set from 2 to 3.
    pub third_strip: bool,
    pub brass_feet: bool,
}

// =============================================================================
// Board Configuration
// =============================================================================

/// Everything needed to price a board or estimate its delivery.
///
/// `layout` is optional: product templates and some saved carts carry only
/// size and extras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    pub size: BoardSize,
    #[serde(default)]
    pub layout: Option<BoardLayout>,
    #[serde(default)]
    pub extras: Extras,
}

impl BoardConfig {
    pub fn new(size: BoardSize) -> Self {
        BoardConfig {
            size,
            layout: None,
            extras: Extras::default(),
        }
    }

    pub fn with_layout(mut self, layout: BoardLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_extras(mut self, extras: Extras) -> Self {
        self.extras = extras;
        self
    }

    /// Strips of the layout, or none when the board has no layout.
    pub fn strips(&self) -> &[Vec<Cell>] {
        self.layout.as_ref().map(|l| l.strips.as_slice()).unwrap_or(&[])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_size_parse() {
        assert_eq!("small".parse::<BoardSize>().unwrap(), BoardSize::Small);
        assert_eq!(" Regular ".parse::<BoardSize>().unwrap(), BoardSize::Regular);
        assert_eq!("LARGE".parse::<BoardSize>().unwrap(), BoardSize::Large);
        assert!(matches!(
            "xl".parse::<BoardSize>(),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert!("".parse::<BoardSize>().is_err());
    }

    #[test]
    fn test_board_size_serde() {
        let json = serde_json::to_string(&BoardSize::Regular).unwrap();
        assert_eq!(json, "\"regular\"");
        assert_eq!(BoardSize::Large.to_string(), "large");
    }

    #[test]
    fn test_token_equality_is_normalized() {
        assert_eq!(MaterialToken::new(" Walnut"), MaterialToken::new("walnut "));
        assert_eq!(
            MaterialToken::new("Black   Walnut"),
            MaterialToken::new("black walnut")
        );
        assert_ne!(MaterialToken::new("walnut"), MaterialToken::new("maple"));
        assert!(MaterialToken::new("   ").is_blank());
    }

    #[test]
    fn test_filled_cell_count_respects_active_strips() {
        let layout = BoardLayout::from_tokens(&[
            &["walnut", "maple"],
            &["", "cherry"],
            &["walnut", "walnut", "walnut"],
        ]);
        assert_eq!(layout.filled_cell_count(false), 3);
        assert_eq!(layout.filled_cell_count(true), 6);
        assert_eq!(layout.capacity(false), 4);
        assert_eq!(layout.capacity(true), 7);
    }

    #[test]
    fn test_blank_tokens_are_empty_cells() {
        let layout = BoardLayout::new(vec![
            vec![Some(MaterialToken::new("  ")), Some(MaterialToken::new("oak"))],
            vec![None],
        ]);
        assert_eq!(layout.filled_cell_count(false), 1);
    }

    #[test]
    fn test_try_filled_cell_count_missing_strip() {
        let layout = BoardLayout::from_tokens(&[&["walnut"], &["maple"]]);
        assert_eq!(layout.try_filled_cell_count(false), Some(2));
        assert_eq!(layout.try_filled_cell_count(true), None);

        let one_strip = BoardLayout::from_tokens(&[&["walnut"]]);
        assert_eq!(one_strip.try_filled_cell_count(false), None);
        assert_eq!(one_strip.filled_cell_count(false), 1);
    }

    #[test]
    fn test_display_rows_identity_order() {
        let layout = BoardLayout::from_tokens(&[&["a"], &["b"], &["c"]]);
        assert_eq!(layout.display_rows(false).len(), 2);
        assert_eq!(layout.display_rows(true).len(), 3);
    }

    #[test]
    fn test_display_rows_reflects_and_skips_inactive() {
        let mut layout = BoardLayout::from_tokens(&[&["a", "b"], &["c", "d"], &["e", "f"]]);
        layout.order = vec![
            RowOrder { strip_no: 1, reflected: false },
            RowOrder { strip_no: 2, reflected: true },
            RowOrder { strip_no: 3, reflected: false },
            RowOrder { strip_no: 1, reflected: true },
            RowOrder { strip_no: 0, reflected: false },
        ];

        let rows = layout.display_rows(false);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], Some(MaterialToken::new("d")));
        assert_eq!(rows[2][0], Some(MaterialToken::new("b")));
    }

    #[test]
    fn test_board_config_deserialize_defaults() {
        let config: BoardConfig = serde_json::from_str(r#"{"size":"small"}"#).unwrap();
        assert_eq!(config.size, BoardSize::Small);
        assert!(config.layout.is_none());
        assert_eq!(config.extras, Extras::default());
        assert!(config.strips().is_empty());
    }

    #[test]
    fn test_board_config_deserialize_layout() {
        let json = r#"{
            "size": "large",
            "layout": {
                "strips": [["walnut", null], ["maple"]],
                "order": [{"stripNo": 2, "reflected": true}]
            },
            "extras": {"juiceGroove": true}
        }"#;
        let config: BoardConfig = serde_json::from_str(json).unwrap();
        let layout = config.layout.as_ref().unwrap();
        assert_eq!(layout.filled_cell_count(false), 2);
        assert_eq!(layout.order[0].strip_no, 2);
        assert!(config.extras.juice_groove);
        assert!(!config.extras.brass_feet);
    }
}
