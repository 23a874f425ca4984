//! # Order Details
//!
//! Turns saved-board JSON from the storefront into a [`BoardConfig`], and a
//! [`BoardPrice`] into display lines and a checkout amount.
//!
//! ## Accepted Board Shape
//! ```json
//! {
//!   "size": "Regular",
//!   "strip3Enabled": true,
//!   "extras": { "grooveEnabled": true, "brassFeet": false },
//!   "boardData": {
//!     "strips": [["walnut", null, "#a0522d"], ["maple"], ["cherry"]],
//!     "order": [{ "stripNo": 1, "reflected": false }, { "stripNo": 2, "reflected": true }]
//!   }
//! }
//! ```
//! Older saves put `grooveEnabled` / `brassFeet` at the top level; both
//! places are read, and `juiceGroove` / `thirdStrip` spellings are accepted.
//!
//! Only `size` is required. Unreadable `boardData.strips` leaves the layout
//! out, which the ETA reports as a degraded complexity estimate.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::{BoardPrice, PricingConfig};
use crate::types::{BoardConfig, BoardLayout, BoardSize, Cell, Extras, MaterialToken, RowOrder};
use crate::validation::validate_quantity;

// =============================================================================
// Normalization
// =============================================================================

/// Builds a board configuration from saved-board JSON.
///
/// ## Errors
/// - [`CoreError::MalformedBoard`] if `raw` is not an object
/// - [`ValidationError::Required`] if `size` is missing
/// - [`ValidationError::NotAllowed`] if `size` is not small/regular/large
///
/// ## Example
/// ```rust
/// use boardworks_core::order::normalize_board_details;
/// use boardworks_core::types::BoardSize;
/// use serde_json::json;
///
/// let board = normalize_board_details(&json!({
///     "size": "Large",
///     "grooveEnabled": true,
///     "boardData": { "strips": [["walnut"], ["maple", null]] }
/// }))
/// .unwrap();
///
/// assert_eq!(board.size, BoardSize::Large);
/// assert!(board.extras.juice_groove);
/// assert_eq!(board.layout.unwrap().filled_cell_count(false), 2);
/// ```
pub fn normalize_board_details(raw: &Value) -> CoreResult<BoardConfig> {
    let root = raw.as_object().ok_or_else(|| CoreError::MalformedBoard {
        reason: "board details must be a JSON object".to_string(),
    })?;

    let size = match root.get("size") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.parse::<BoardSize>()?,
        Some(Value::String(_)) | Some(Value::Null) | None => {
            return Err(ValidationError::Required {
                field: "size".to_string(),
            }
            .into())
        }
        Some(_) => {
            return Err(ValidationError::WrongType {
                field: "size".to_string(),
                expected: "a string".to_string(),
            }
            .into())
        }
    };

    let nested = root.get("extras").and_then(Value::as_object);
    let flag = |names: &[&str]| -> bool {
        names.iter().any(|name| {
            read_flag(root, name) || nested.map(|extras| read_flag(extras, name)).unwrap_or(false)
        })
    };

    let extras = Extras {
        juice_groove: flag(&["grooveEnabled", "juiceGroove"]),
        third_strip: flag(&["strip3Enabled", "thirdStrip"]),
        brass_feet: flag(&["brassFeet", "brassFeetEnabled"]),
    };

    let layout = root
        .get("boardData")
        .and_then(Value::as_object)
        .and_then(read_layout);

    Ok(BoardConfig {
        size,
        layout,
        extras,
    })
}

fn read_flag(map: &Map<String, Value>, name: &str) -> bool {
    map.get(name).and_then(Value::as_bool).unwrap_or(false)
}

fn read_layout(board_data: &Map<String, Value>) -> Option<BoardLayout> {
    let Some(raw_strips) = board_data.get("strips").and_then(Value::as_array) else {
        debug!("boardData.strips missing or not an array");
        return None;
    };

    let mut strips = Vec::with_capacity(raw_strips.len());
    for (idx, raw_strip) in raw_strips.iter().enumerate() {
        let Some(cells) = raw_strip.as_array() else {
            debug!(strip = idx + 1, "Strip is not an array, dropping layout");
            return None;
        };
        strips.push(cells.iter().map(read_cell).collect::<Vec<Cell>>());
    }

    let order = board_data
        .get("order")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(read_row_order).collect())
        .unwrap_or_default();

    Some(BoardLayout { strips, order })
}

fn read_cell(raw: &Value) -> Cell {
    raw.as_str().map(MaterialToken::new)
}

fn read_row_order(raw: &Value) -> Option<RowOrder> {
    let entry = raw.as_object()?;
    let strip_no = entry.get("stripNo")?.as_u64()?;
    if strip_no == 0 {
        return None;
    }
    Some(RowOrder {
        strip_no: usize::try_from(strip_no).ok()?,
        reflected: read_flag(entry, "reflected"),
    })
}

// =============================================================================
// Order Summary
// =============================================================================

/// One printable line of an order summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub label: String,
    pub quantity: u32,
    pub amount: Money,
    pub formatted: String,
}

/// Display-ready breakdown of a board price.
///
/// ```text
/// Regular board            1    $200.00
/// Black Walnut            12     $54.00
/// Custom                   2      $8.00
/// Juice groove             1     $25.00
/// ─────────────────────────────────────
/// Total                         $287.00
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub currency: String,
    pub lines: Vec<SummaryLine>,
    pub total: Money,
    pub formatted_total: String,
}

impl OrderSummary {
    pub fn from_price(price: &BoardPrice, config: &PricingConfig) -> Self {
        let line = |label: String, quantity: u32, amount: Money| SummaryLine {
            label,
            quantity,
            amount,
            formatted: config.format_amount(amount),
        };

        let mut lines = Vec::with_capacity(1 + price.wood_breakdown.len() + price.extras.len());
        lines.push(line(
            format!("{} board", price.size.display_name()),
            1,
            price.base,
        ));
        lines.extend(
            price
                .wood_breakdown
                .iter()
                .map(|m| line(m.label.clone(), m.count, m.total)),
        );
        lines.extend(
            price
                .extras
                .iter()
                .map(|e| line(e.label.clone(), 1, e.amount)),
        );

        OrderSummary {
            currency: price.currency.clone(),
            lines,
            total: price.total,
            formatted_total: config.format_amount(price.total),
        }
    }

    /// Sum of all line amounts. Equals `total` for any summary built by
    /// [`from_price`](Self::from_price).
    pub fn lines_total(&self) -> Money {
        self.lines.iter().map(|l| l.amount).sum()
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Amount to charge in minor currency units for `quantity` identical boards.
///
/// ## Rules
/// - `quantity` must be between 1 and [`MAX_BOARD_QUANTITY`](crate::MAX_BOARD_QUANTITY)
pub fn checkout_amount_minor(price: &BoardPrice, quantity: u32) -> Result<i64, ValidationError> {
    validate_quantity(quantity)?;
    Ok(price.total.multiply_quantity(i64::from(quantity)).cents())
}

// =============================================================================
// Unit Tests
// =============================================================================
