//! # Commands
//!
//! One function per subcommand. Each takes already-loaded inputs and returns
//! a serializable report, so the CLI layer only reads files and prints.

use boardworks_core::leadtime::{
    estimate_board_eta, estimate_cart_eta, estimate_product_eta, BoardEta, CartEta, CartItem,
    EtaRange,
};
use boardworks_core::material::MaterialCatalog;
use boardworks_core::order::{checkout_amount_minor, normalize_board_details, OrderSummary};
use boardworks_core::pricing::{calculate_board_quote, BoardPrice};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::QuoteConfig;
use crate::error::{QuoteError, QuoteResult};

/// Output of `price`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceReport {
    pub price: BoardPrice,
    pub summary: OrderSummary,
    pub quantity: u32,
    /// Charge for `quantity` boards, in minor currency units.
    pub checkout_amount_minor: i64,
}

pub fn price<C: MaterialCatalog + ?Sized>(
    config: &QuoteConfig,
    catalog: &C,
    board: &Value,
    quantity: u32,
) -> QuoteResult<PriceReport> {
    let board = normalize_board_details(board)?;
    let price = calculate_board_quote(&config.pricing, catalog, &board);
    let checkout = checkout_amount_minor(&price, quantity)?;

    info!(
        size = %board.size,
        cells = price.cell_count,
        total = %price.total,
        "Priced board"
    );

    Ok(PriceReport {
        summary: OrderSummary::from_price(&price, &config.pricing),
        price,
        quantity,
        checkout_amount_minor: checkout,
    })
}

pub fn eta(config: &QuoteConfig, board: &Value, today: NaiveDate) -> QuoteResult<BoardEta> {
    let board = normalize_board_details(board)?;
    Ok(estimate_board_eta(&config.lead_time, &board, today))
}

pub fn product_eta(config: &QuoteConfig, today: NaiveDate) -> EtaRange {
    estimate_product_eta(&config.lead_time, today)
}

/// Cart ETA, or `None` for an empty cart.
///
/// Accepts either a bare array of items or `{ "items": [...] }`. An item
/// with a non-null `board` is a saved custom board; anything else ships
/// from stock.
pub fn cart(config: &QuoteConfig, raw: &Value, today: NaiveDate) -> QuoteResult<Option<CartEta>> {
    let entries = match raw {
        Value::Array(entries) => entries,
        Value::Object(map) => map
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| QuoteError::InvalidInput("cart object needs an \"items\" array".into()))?,
        _ => {
            return Err(QuoteError::InvalidInput(
                "cart must be an array of items".into(),
            ))
        }
    };

    let items = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| cart_item(idx, entry))
        .collect::<QuoteResult<Vec<_>>>()?;

    debug!(items = items.len(), "Estimating cart");
    Ok(estimate_cart_eta(&config.lead_time, &items, today))
}

fn cart_item(idx: usize, entry: &Value) -> QuoteResult<CartItem> {
    let Some(map) = entry.as_object() else {
        return Err(QuoteError::InvalidInput(format!(
            "cart item {} must be an object",
            idx + 1
        )));
    };

    let name = map.get("name").and_then(Value::as_str).map(str::to_string);
    let board = match map.get("board") {
        Some(Value::Null) | None => None,
        Some(board) => Some(normalize_board_details(board)?),
    };

    Ok(CartItem { name, board })
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardworks_core::material::StaticCatalog;
    use boardworks_core::money::Money;
    use boardworks_core::CoreError;
    use serde_json::json;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_price_report() {
        let config = QuoteConfig::default();
        let catalog = StaticCatalog::new()
            .with("walnut", Money::from_major(5), "Walnut")
            .with("maple", Money::from_major(7), "Maple");
        let board = json!({
            "size": "regular",
            "boardData": { "strips": [["walnut", "maple"], ["walnut", "maple"]] }
        });

        let report = price(&config, &catalog, &board, 2).unwrap();
        assert_eq!(report.price.total, Money::from_major(224));
        assert_eq!(report.checkout_amount_minor, 44800);
        assert_eq!(report.summary.formatted_total, "$224.00");
    }

    #[test]
    fn test_price_rejects_bad_quantity() {
        let config = QuoteConfig::default();
        let err = price(&config, &StaticCatalog::new(), &json!({ "size": "small" }), 0).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_eta_for_large_board() {
        let config = QuoteConfig::default();
        let board = json!({
            "size": "large",
            "strip3Enabled": true,
            "grooveEnabled": true
        });
        let estimate = eta(&config, &board, monday()).unwrap();
        assert_eq!(estimate.eta.production.min, 9);
        assert_eq!(estimate.eta.production.max, 12);
        assert!(estimate.complexity.is_degraded());
    }

    #[test]
    fn test_eta_unknown_size() {
        let err = eta(&QuoteConfig::default(), &json!({ "size": "xl" }), monday()).unwrap_err();
        assert!(matches!(err, QuoteError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn test_cart_shapes() {
        let config = QuoteConfig::default();

        assert!(cart(&config, &json!([]), monday()).unwrap().is_none());

        let estimate = cart(
            &config,
            &json!({ "items": [
                { "name": "Board oil" },
                { "name": "Custom board", "board": { "size": "small" } }
            ]}),
            monday(),
        )
        .unwrap()
        .unwrap();
        let board_only = eta(&config, &json!({ "size": "small" }), monday()).unwrap();
        assert_eq!(estimate.end_date, board_only.eta.end_date);

        assert!(matches!(
            cart(&config, &json!("nope"), monday()),
            Err(QuoteError::InvalidInput(_))
        ));
        assert!(matches!(
            cart(&config, &json!([1]), monday()),
            Err(QuoteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_product_eta() {
        let estimate = product_eta(&QuoteConfig::default(), monday());
        assert!(estimate.start_date > monday());
        assert!(estimate.start_date <= estimate.end_date);
    }
}
