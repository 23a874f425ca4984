//! # Pricing Engine
//!
//! Prices a custom board from its per-cell material grid plus extras.
//!
//! ## Price Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Board Price Breakdown                              │
//! │                                                                         │
//! │  base(size)            Regular board ................... $200.00        │
//! │        +                                                                │
//! │  variable              Σ unit price of every filled cell                │
//! │                        in the ACTIVE strips                             │
//! │                          strip 1 ─ always                               │
//! │                          strip 2 ─ always                               │
//! │                          strip 3 ─ only with the third-strip extra      │
//! │        +                                                                │
//! │  extras                third strip / juice groove / brass feet          │
//! │                        (flat surcharges, only when enabled)             │
//! │        =                                                                │
//! │  total                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row order and reflection never affect price; only strip membership does.
//!
//! ## Configuration
//! [`PricingConfig`] is a plain value passed into every call. Runtime
//! overrides go through [`PricingConfig::patched`], which returns a new
//! value and reports every rejected field instead of mutating shared state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::material::{fallback_label, MaterialCatalog, CUSTOM_LABEL};
use crate::money::Money;
use crate::types::{filled, BoardConfig, BoardLayout, BoardSize, Cell, Extras};
use crate::validation::{validate_amount, validate_currency};

/// Breakdown key used by the flat-price safety net.
pub const FALLBACK_KEY: &str = "custom";

// =============================================================================
// Configuration
// =============================================================================

/// Base price per board size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BasePriceTable {
    pub small: Money,
    pub regular: Money,
    pub large: Money,
}

impl BasePriceTable {
    #[inline]
    pub fn for_size(&self, size: BoardSize) -> Money {
        match size {
            BoardSize::Small => self.small,
            BoardSize::Regular => self.regular,
            BoardSize::Large => self.large,
        }
    }
}

impl Default for BasePriceTable {
    fn default() -> Self {
        BasePriceTable {
            small: Money::from_major(150),
            regular: Money::from_major(200),
            large: Money::from_major(275),
        }
    }
}

/// Flat surcharge per extra.
///
/// Third strip and brass feet ship at zero, but admins can raise them at
/// runtime and the engine applies whatever is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasSurcharges {
    pub juice_groove: Money,
    pub third_strip: Money,
    pub brass_feet: Money,
}

impl ExtrasSurcharges {
    #[inline]
    pub fn for_extra(&self, kind: ExtraKind) -> Money {
        match kind {
            ExtraKind::JuiceGroove => self.juice_groove,
            ExtraKind::ThirdStrip => self.third_strip,
            ExtraKind::BrassFeet => self.brass_feet,
        }
    }
}

impl Default for ExtrasSurcharges {
    fn default() -> Self {
        ExtrasSurcharges {
            juice_groove: Money::from_major(25),
            third_strip: Money::zero(),
            brass_feet: Money::zero(),
        }
    }
}

/// Everything the pricing engine needs besides the board and the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    /// ISO 4217 code, upper case.
    pub currency: String,
    /// Unit price for cells whose material has no catalog price.
    pub cell_price: Money,
    pub base: BasePriceTable,
    pub extras: ExtrasSurcharges,
}

impl Default for PricingConfig {
    /// ## Default Values
    /// - Currency: USD
    /// - Cell price: $4.00
    /// - Base: small $150, regular $200, large $275
    /// - Extras: juice groove $25, third strip $0, brass feet $0
    fn default() -> Self {
        PricingConfig {
            currency: "USD".to_string(),
            cell_price: Money::from_major(4),
            base: BasePriceTable::default(),
            extras: ExtrasSurcharges::default(),
        }
    }
}

impl PricingConfig {
    /// Display symbol (or code prefix) for the configured currency.
    pub fn currency_symbol(&self) -> String {
        match self.currency.as_str() {
            "USD" | "CAD" | "AUD" | "NZD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            other => format!("{} ", other),
        }
    }

    /// Formats an amount in the configured currency.
    ///
    /// ## Example
    /// ```rust
    /// use boardworks_core::money::Money;
    /// use boardworks_core::pricing::PricingConfig;
    ///
    /// let config = PricingConfig::default();
    /// assert_eq!(config.format_amount(Money::from_cents(22400)), "$224.00");
    /// assert_eq!(config.format_amount(Money::from_cents(-550)), "-$5.50");
    /// ```
    pub fn format_amount(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.currency_symbol(),
            amount.dollars().abs(),
            amount.cents_part()
        )
    }

    /// Applies a partial override and returns the resulting configuration.
    ///
    /// ## Merge Rules
    /// ```text
    /// currency    non-blank → trimmed, upper-cased, assigned
    /// cellPrice   ≥ 0       → assigned
    /// base.*      ≥ 0       → shallow-merged per size
    /// extras.*    ≥ 0       → shallow-merged per extra
    /// ```
    /// A field that breaks its rule is left unchanged and reported in
    /// [`PatchOutcome::rejected`]; the other fields still apply.
    pub fn patched(&self, patch: &PricingPatch) -> PatchOutcome {
        let mut config = self.clone();
        let mut rejected = Vec::new();

        if let Some(currency) = &patch.currency {
            match validate_currency(currency) {
                Ok(code) => config.currency = code,
                Err(err) => rejected.push(err),
            }
        }

        merge_amount(&mut config.cell_price, patch.cell_price, "cellPrice", &mut rejected);

        if let Some(base) = &patch.base {
            merge_amount(&mut config.base.small, base.small, "base.small", &mut rejected);
            merge_amount(&mut config.base.regular, base.regular, "base.regular", &mut rejected);
            merge_amount(&mut config.base.large, base.large, "base.large", &mut rejected);
        }

        if let Some(extras) = &patch.extras {
            merge_amount(
                &mut config.extras.juice_groove,
                extras.juice_groove,
                "extras.juiceGroove",
                &mut rejected,
            );
            merge_amount(
                &mut config.extras.third_strip,
                extras.third_strip,
                "extras.thirdStrip",
                &mut rejected,
            );
            merge_amount(
                &mut config.extras.brass_feet,
                extras.brass_feet,
                "extras.brassFeet",
                &mut rejected,
            );
        }

        for err in &rejected {
            warn!(%err, "Ignoring pricing override");
        }

        PatchOutcome { config, rejected }
    }

    /// Parses a loosely-typed JSON patch and applies it in one step.
    ///
    /// Type errors from parsing and rule violations from merging are both
    /// reported in `rejected`.
    pub fn patched_from_json(&self, raw: &Value) -> PatchOutcome {
        let (patch, mut type_errors) = PricingPatch::from_json(raw);
        for err in &type_errors {
            warn!(%err, "Ignoring pricing override");
        }
        let mut outcome = self.patched(&patch);
        type_errors.append(&mut outcome.rejected);
        outcome.rejected = type_errors;
        outcome
    }
}

fn merge_amount(
    target: &mut Money,
    value: Option<Money>,
    field: &str,
    rejected: &mut Vec<ValidationError>,
) {
    if let Some(amount) = value {
        match validate_amount(field, amount) {
            Ok(amount) => *target = amount,
            Err(err) => rejected.push(err),
        }
    }
}

// =============================================================================
// Patches
// =============================================================================

/// Per-size base price override; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasePricePatch {
    pub small: Option<Money>,
    pub regular: Option<Money>,
    pub large: Option<Money>,
}

/// Per-extra surcharge override; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtrasPatch {
    pub juice_groove: Option<Money>,
    pub third_strip: Option<Money>,
    pub brass_feet: Option<Money>,
}

/// Partial pricing override. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingPatch {
    pub currency: Option<String>,
    pub cell_price: Option<Money>,
    pub base: Option<BasePricePatch>,
    pub extras: Option<ExtrasPatch>,
}

impl PricingPatch {
    /// Reads a patch field by field so one mistyped value does not sink the
    /// whole override.
    ///
    /// Amounts must be integers (cents). `null` counts as absent. Unknown
    /// keys are ignored.
    ///
    /// ## Example
    /// ```rust
    /// use boardworks_core::pricing::PricingPatch;
    /// use serde_json::json;
    ///
    /// let (patch, rejected) = PricingPatch::from_json(&json!({
    ///     "currency": "eur",
    ///     "cellPrice": "cheap",
    /// }));
    /// assert_eq!(patch.currency.as_deref(), Some("eur"));
    /// assert!(patch.cell_price.is_none());
    /// assert_eq!(rejected.len(), 1);
    /// ```
    pub fn from_json(raw: &Value) -> (PricingPatch, Vec<ValidationError>) {
        let mut rejected = Vec::new();
        let mut patch = PricingPatch::default();

        let Some(root) = raw.as_object() else {
            if !raw.is_null() {
                rejected.push(wrong_type("pricing", "an object"));
            }
            return (patch, rejected);
        };

        match root.get("currency") {
            None | Some(Value::Null) => {}
            Some(Value::String(code)) => patch.currency = Some(code.clone()),
            Some(_) => rejected.push(wrong_type("currency", "a string")),
        }

        patch.cell_price = read_amount(root.get("cellPrice"), "cellPrice", &mut rejected);

        match root.get("base") {
            None | Some(Value::Null) => {}
            Some(Value::Object(base)) => {
                patch.base = Some(BasePricePatch {
                    small: read_amount(base.get("small"), "base.small", &mut rejected),
                    regular: read_amount(base.get("regular"), "base.regular", &mut rejected),
                    large: read_amount(base.get("large"), "base.large", &mut rejected),
                });
            }
            Some(_) => rejected.push(wrong_type("base", "an object")),
        }

        match root.get("extras") {
            None | Some(Value::Null) => {}
            Some(Value::Object(extras)) => {
                patch.extras = Some(ExtrasPatch {
                    juice_groove: read_amount(
                        extras.get("juiceGroove"),
                        "extras.juiceGroove",
                        &mut rejected,
                    ),
                    third_strip: read_amount(
                        extras.get("thirdStrip"),
                        "extras.thirdStrip",
                        &mut rejected,
                    ),
                    brass_feet: read_amount(
                        extras.get("brassFeet"),
                        "extras.brassFeet",
                        &mut rejected,
                    ),
                });
            }
            Some(_) => rejected.push(wrong_type("extras", "an object")),
        }

        (patch, rejected)
    }

    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &PricingPatch::default()
    }
}

fn read_amount(
    value: Option<&Value>,
    field: &str,
    rejected: &mut Vec<ValidationError>,
) -> Option<Money> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => match v.as_i64() {
            Some(cents) => Some(Money::from_cents(cents)),
            None => {
                rejected.push(wrong_type(field, "an integer amount in cents"));
                None
            }
        },
    }
}

fn wrong_type(field: &str, expected: &str) -> ValidationError {
    ValidationError::WrongType {
        field: field.to_string(),
        expected: expected.to_string(),
    }
}

/// Result of [`PricingConfig::patched`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub config: PricingConfig,
    /// Fields that were left unchanged, with the reason.
    pub rejected: Vec<ValidationError>,
}

impl PatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

// =============================================================================
// Price Output
// =============================================================================

/// One distinct material on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLine {
    /// Normalized material key.
    pub key: String,
    pub label: String,
    pub count: u32,
    /// `total / count`, for display.
    pub unit_price: Money,
    pub total: Money,
}

/// The extras that carry a surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ExtraKind {
    JuiceGroove,
    ThirdStrip,
    BrassFeet,
}

impl ExtraKind {
    pub const fn label(&self) -> &'static str {
        match self {
            ExtraKind::JuiceGroove => "Juice groove",
            ExtraKind::ThirdStrip => "Third strip",
            ExtraKind::BrassFeet => "Brass feet",
        }
    }

    /// Enabled extras in display order.
    pub fn enabled(extras: &Extras) -> Vec<ExtraKind> {
        [
            (extras.third_strip, ExtraKind::ThirdStrip),
            (extras.juice_groove, ExtraKind::JuiceGroove),
            (extras.brass_feet, ExtraKind::BrassFeet),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .collect()
    }
}

/// An enabled extra and what it added to the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExtraLine {
    pub kind: ExtraKind,
    pub label: String,
    pub amount: Money,
}

/// Which path produced `variable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum PriceBasis {
    /// Each filled cell priced from the catalog or the default cell price.
    PerCell,
    /// No filled cell, but the active strips held blank tokens; each was
    /// charged the flat default cell price.
    FlatFallback,
}

/// Full price of one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BoardPrice {
    pub size: BoardSize,
    pub currency: String,
    pub base: Money,
    /// Sum of all priced cells.
    pub variable: Money,
    pub cell_count: u32,
    pub extras_third_strip: Money,
    pub extras_juice_groove: Money,
    pub extras_brass_feet: Money,
    /// Enabled extras, one line each.
    pub extras: Vec<ExtraLine>,
    /// Per-material breakdown in order of first occurrence.
    pub wood_breakdown: Vec<MaterialLine>,
    pub basis: PriceBasis,
    pub total: Money,
}

impl BoardPrice {
    /// Sum of every enabled extra's surcharge.
    pub fn extras_total(&self) -> Money {
        self.extras_third_strip + self.extras_juice_groove + self.extras_brass_feet
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Prices a board from size, strips and the third-strip flag.
///
/// Juice groove and brass feet are not part of this call; use
/// [`calculate_board_quote`] when they apply.
///
/// ## Example
/// ```rust
/// use boardworks_core::material::StaticCatalog;
/// use boardworks_core::money::Money;
/// use boardworks_core::pricing::{calculate_board_price, PricingConfig};
/// use boardworks_core::types::{BoardLayout, BoardSize};
///
/// let catalog = StaticCatalog::new()
///     .with("walnut", Money::from_major(5), "Walnut")
///     .with("maple", Money::from_major(7), "Maple");
/// let layout = BoardLayout::from_tokens(&[&["walnut", "maple"], &["walnut", "maple"]]);
///
/// let price = calculate_board_price(
///     &PricingConfig::default(),
///     &catalog,
///     BoardSize::Regular,
///     &layout.strips,
///     false,
/// );
/// assert_eq!(price.variable, Money::from_major(24));
/// assert_eq!(price.total, Money::from_major(224));
/// ```
pub fn calculate_board_price<C: MaterialCatalog + ?Sized>(
    config: &PricingConfig,
    catalog: &C,
    size: BoardSize,
    strips: &[Vec<Cell>],
    strip3_enabled: bool,
) -> BoardPrice {
    let extras = Extras {
        third_strip: strip3_enabled,
        ..Extras::default()
    };
    price_board(config, catalog, size, strips, &extras)
}

/// Prices a full board configuration, including juice groove and brass feet.
pub fn calculate_board_quote<C: MaterialCatalog + ?Sized>(
    config: &PricingConfig,
    catalog: &C,
    board: &BoardConfig,
) -> BoardPrice {
    price_board(config, catalog, board.size, board.strips(), &board.extras)
}

fn price_board<C: MaterialCatalog + ?Sized>(
    config: &PricingConfig,
    catalog: &C,
    size: BoardSize,
    strips: &[Vec<Cell>],
    extras: &Extras,
) -> BoardPrice {
    let active = BoardLayout::active_strip_count(extras.third_strip);
    let cells = || strips.iter().take(active).flatten();

    let mut breakdown = Breakdown::default();
    for token in cells().filter_map(filled) {
        let key = token.normalized_key();
        let info = catalog.lookup(&key);

        let unit_price = match info.price.map(|price| validate_amount(&key, price)) {
            Some(Ok(price)) => price,
            Some(Err(e)) => {
                warn!(%key, error = %e, "Unusable catalog price, using default cell price");
                config.cell_price
            }
            None => config.cell_price,
        };

        breakdown.add(&key, unit_price, || {
            info.display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| {
                    debug!(%key, "Material not in catalog");
                    fallback_label(token.as_raw())
                })
        });
    }

    let mut basis = PriceBasis::PerCell;
    if breakdown.is_empty() {
        // Blank tokens are not filled cells, but a board made only of them
        // is still charged at the flat cell price.
        let stray = cells().filter(|cell| cell.is_some()).count();
        if stray > 0 {
            debug!(stray, "No priced cells, charging flat cell price");
            basis = PriceBasis::FlatFallback;
            for _ in 0..stray {
                breakdown.add(FALLBACK_KEY, config.cell_price, || CUSTOM_LABEL.to_string());
            }
        }
    }

    let surcharge = |on: bool, kind: ExtraKind| {
        if on {
            config.extras.for_extra(kind)
        } else {
            Money::zero()
        }
    };
    let extras_third_strip = surcharge(extras.third_strip, ExtraKind::ThirdStrip);
    let extras_juice_groove = surcharge(extras.juice_groove, ExtraKind::JuiceGroove);
    let extras_brass_feet = surcharge(extras.brass_feet, ExtraKind::BrassFeet);

    let extra_lines = ExtraKind::enabled(extras)
        .into_iter()
        .map(|kind| ExtraLine {
            kind,
            label: kind.label().to_string(),
            amount: config.extras.for_extra(kind),
        })
        .collect();

    let base = config.base.for_size(size);
    let (cell_count, variable, wood_breakdown) = breakdown.finish();
    let total = base + variable + extras_third_strip + extras_juice_groove + extras_brass_feet;

    BoardPrice {
        size,
        currency: config.currency.clone(),
        base,
        variable,
        cell_count,
        extras_third_strip,
        extras_juice_groove,
        extras_brass_feet,
        extras: extra_lines,
        wood_breakdown,
        basis,
        total,
    }
}

/// Insertion-ordered material buckets.
#[derive(Default)]
struct Breakdown {
    index: HashMap<String, usize>,
    lines: Vec<MaterialLine>,
}

impl Breakdown {
    fn add(&mut self, key: &str, unit_price: Money, label: impl FnOnce() -> String) {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.lines.push(MaterialLine {
                    key: key.to_string(),
                    label: label(),
                    count: 0,
                    unit_price: Money::zero(),
                    total: Money::zero(),
                });
                self.index.insert(key.to_string(), self.lines.len() - 1);
                self.lines.len() - 1
            }
        };
        let line = &mut self.lines[idx];
        line.count += 1;
        line.total += unit_price;
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns `(cell_count, variable, lines)` with display unit prices set.
    fn finish(mut self) -> (u32, Money, Vec<MaterialLine>) {
        for line in &mut self.lines {
            line.unit_price = line.total.split_evenly(line.count);
        }
        let count = self.lines.iter().map(|l| l.count).sum();
        let variable = self.lines.iter().map(|l| l.total).sum();
        (count, variable, self.lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{EmptyCatalog, MaterialInfo, StaticCatalog};
    use crate::types::MaterialToken;
    use serde_json::json;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with("walnut", Money::from_major(5), "Black Walnut")
            .with("maple", Money::from_major(7), "Hard Maple")
    }

    fn regular_200() -> PricingConfig {
        let mut config = PricingConfig::default();
        config.base.regular = Money::from_major(200);
        config
    }

    #[test]
    fn test_two_by_two_scenario() {
        let layout = BoardLayout::from_tokens(&[&["walnut", "maple"], &["walnut", "maple"]]);
        let price = calculate_board_price(&regular_200(), &catalog(), BoardSize::Regular, &layout.strips, false);

        assert_eq!(price.cell_count, 4);
        assert_eq!(price.variable, Money::from_major(24));
        assert_eq!(price.extras_third_strip, Money::zero());
        assert_eq!(price.total, Money::from_major(224));
        assert_eq!(price.basis, PriceBasis::PerCell);
        assert!(price.extras.is_empty());

        assert_eq!(price.wood_breakdown.len(), 2);
        assert_eq!(price.wood_breakdown[0].key, "walnut");
        assert_eq!(price.wood_breakdown[0].label, "Black Walnut");
        assert_eq!(price.wood_breakdown[0].count, 2);
        assert_eq!(price.wood_breakdown[0].unit_price, Money::from_major(5));
        assert_eq!(price.wood_breakdown[1].total, Money::from_major(14));
    }

    #[test]
    fn test_empty_small_board_is_base_price() {
        let layout = BoardLayout::from_tokens(&[&["", ""], &[""]]);
        let config = PricingConfig::default();
        let price = calculate_board_price(&config, &catalog(), BoardSize::Small, &layout.strips, false);

        assert_eq!(price.cell_count, 0);
        assert_eq!(price.variable, Money::zero());
        assert_eq!(price.total, config.base.small);
        assert!(price.wood_breakdown.is_empty());
    }

    #[test]
    fn test_no_strips_at_all() {
        let config = PricingConfig::default();
        let price = calculate_board_price(&config, &catalog(), BoardSize::Large, &[], true);
        assert_eq!(price.cell_count, 0);
        assert_eq!(price.total, config.base.large + config.extras.third_strip);
    }

    #[test]
    fn test_breakdown_keeps_first_occurrence_order() {
        let layout = BoardLayout::from_tokens(&[&["maple", "walnut", "MAPLE "], &["cherry", "walnut"]]);
        let price = calculate_board_price(&regular_200(), &catalog(), BoardSize::Regular, &layout.strips, false);

        let keys: Vec<&str> = price.wood_breakdown.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["maple", "walnut", "cherry"]);
        assert_eq!(price.wood_breakdown[0].count, 2);
    }

    #[test]
    fn test_unknown_material_uses_default_price_and_custom_label() {
        let config = PricingConfig::default();
        let layout = BoardLayout::from_tokens(&[&["zebrawood"], &["#A0522D"]]);
        let price = calculate_board_price(&config, &catalog(), BoardSize::Regular, &layout.strips, false);

        assert_eq!(price.wood_breakdown[0].label, "Custom");
        assert_eq!(price.wood_breakdown[0].unit_price, config.cell_price);
        assert_eq!(price.wood_breakdown[1].label, "#A0522D");
        assert_eq!(price.wood_breakdown[1].key, "#a0522d");
        assert_eq!(price.variable, config.cell_price * 2_i64);
    }

    #[test]
    fn test_catalog_without_name_or_price() {
        let catalog = |key: &str| match key {
            "ash" => MaterialInfo {
                price: Some(Money::from_cents(350)),
                display_name: None,
            },
            "oak" => MaterialInfo {
                price: None,
                display_name: Some("White Oak".to_string()),
            },
            _ => MaterialInfo::default(),
        };
        let config = PricingConfig::default();
        let layout = BoardLayout::from_tokens(&[&["ash"], &["oak"]]);
        let price = calculate_board_price(&config, &catalog, BoardSize::Small, &layout.strips, false);

        assert_eq!(price.wood_breakdown[0].label, "Custom");
        assert_eq!(price.wood_breakdown[0].total, Money::from_cents(350));
        assert_eq!(price.wood_breakdown[1].label, "White Oak");
        assert_eq!(price.wood_breakdown[1].total, config.cell_price);
    }

    #[test]
    fn test_negative_catalog_price_falls_back() {
        let catalog = StaticCatalog::new().with("oak", Money::from_cents(-100), "Oak");
        let config = PricingConfig::default();
        let layout = BoardLayout::from_tokens(&[&["oak"], &[]]);
        let price = calculate_board_price(&config, &catalog, BoardSize::Small, &layout.strips, false);
        assert_eq!(price.variable, config.cell_price);
    }

    #[test]
    fn test_oversized_catalog_price_falls_back() {
        let catalog = StaticCatalog::new().with("walnut", Money::from_cents(i64::MAX), "Walnut");
        let config = PricingConfig::default();
        let layout = BoardLayout::from_tokens(&[&["walnut"], &["walnut"]]);
        let price = calculate_board_price(&config, &catalog, BoardSize::Small, &layout.strips, false);

        assert_eq!(price.cell_count, 2);
        assert_eq!(price.variable, config.cell_price * 2_i64);
        assert_eq!(price.total, config.base.small + config.cell_price * 2_i64);
    }

    #[test]
    fn test_third_strip_only_counts_when_enabled() {
        let layout = BoardLayout::from_tokens(&[&["walnut"], &["walnut"], &["maple", "maple"]]);
        let config = regular_200();

        let two = calculate_board_price(&config, &catalog(), BoardSize::Regular, &layout.strips, false);
        assert_eq!(two.cell_count, 2);
        assert_eq!(two.variable, Money::from_major(10));

        let three = calculate_board_price(&config, &catalog(), BoardSize::Regular, &layout.strips, true);
        assert_eq!(three.cell_count, 4);
        assert_eq!(three.variable, Money::from_major(24));
        assert_eq!(three.extras.len(), 1);
        assert_eq!(three.extras[0].kind, ExtraKind::ThirdStrip);
    }

    #[test]
    fn test_nonzero_third_strip_surcharge() {
        let mut config = regular_200();
        config.extras.third_strip = Money::from_major(30);
        let layout = BoardLayout::from_tokens(&[&["walnut"], &["walnut"], &[]]);

        let price = calculate_board_price(&config, &catalog(), BoardSize::Regular, &layout.strips, true);
        assert_eq!(price.extras_third_strip, Money::from_major(30));
        assert_eq!(price.total, Money::from_major(200 + 10 + 30));

        let off = calculate_board_price(&config, &catalog(), BoardSize::Regular, &layout.strips, false);
        assert_eq!(off.extras_third_strip, Money::zero());
    }

    #[test]
    fn test_quote_with_groove_and_brass_feet() {
        let mut config = regular_200();
        config.extras.juice_groove = Money::from_major(20);
        config.extras.brass_feet = Money::from_major(15);

        let layout = BoardLayout::from_tokens(&[&["walnut", "maple"], &["walnut", "maple"]]);
        let board = BoardConfig::new(BoardSize::Regular)
            .with_layout(layout)
            .with_extras(Extras {
                juice_groove: true,
                third_strip: false,
                brass_feet: true,
            });

        let price = calculate_board_quote(&config, &catalog(), &board);
        assert_eq!(price.extras_juice_groove, Money::from_major(20));
        assert_eq!(price.extras_brass_feet, Money::from_major(15));
        assert_eq!(price.total, Money::from_major(224 + 20 + 15));
        assert_eq!(price.extras_total(), Money::from_major(35));

        let labels: Vec<&str> = price.extras.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Juice groove", "Brass feet"]);
    }

    #[test]
    fn test_groove_adds_twenty_to_base_scenario() {
        let mut config = regular_200();
        config.extras.juice_groove = Money::from_major(20);
        let layout = BoardLayout::from_tokens(&[&["walnut", "maple"], &["walnut", "maple"]]);

        let plain = calculate_board_quote(
            &config,
            &catalog(),
            &BoardConfig::new(BoardSize::Regular).with_layout(layout.clone()),
        );
        let grooved = calculate_board_quote(
            &config,
            &catalog(),
            &BoardConfig::new(BoardSize::Regular)
                .with_layout(layout)
                .with_extras(Extras {
                    juice_groove: true,
                    ..Extras::default()
                }),
        );
        assert_eq!(grooved.total - plain.total, Money::from_major(20));
    }

    #[test]
    fn test_flat_fallback_for_blank_tokens() {
        let config = PricingConfig::default();
        let strips = vec![
            vec![Some(MaterialToken::new("")), Some(MaterialToken::new("  "))],
            vec![None, Some(MaterialToken::new(""))],
        ];
        let price = calculate_board_price(&config, &EmptyCatalog, BoardSize::Small, &strips, false);

        assert_eq!(price.basis, PriceBasis::FlatFallback);
        assert_eq!(price.cell_count, 3);
        assert_eq!(price.variable, config.cell_price * 3_i64);
        assert_eq!(price.wood_breakdown.len(), 1);
        assert_eq!(price.wood_breakdown[0].key, FALLBACK_KEY);
        assert_eq!(price.wood_breakdown[0].label, "Custom");
    }

    #[test]
    fn test_blank_tokens_ignored_when_real_cells_exist() {
        let config = PricingConfig::default();
        let strips = vec![
            vec![Some(MaterialToken::new("walnut")), Some(MaterialToken::new(" "))],
            vec![],
        ];
        let price = calculate_board_price(&config, &catalog(), BoardSize::Small, &strips, false);
        assert_eq!(price.basis, PriceBasis::PerCell);
        assert_eq!(price.cell_count, 1);
    }

    #[test]
    fn test_row_order_does_not_change_price() {
        let mut layout = BoardLayout::from_tokens(&[&["walnut", "maple"], &["maple", "maple"]]);
        let before = calculate_board_price(&regular_200(), &catalog(), BoardSize::Regular, &layout.strips, false);
        layout.order = vec![
            crate::types::RowOrder { strip_no: 2, reflected: true },
            crate::types::RowOrder { strip_no: 1, reflected: false },
        ];
        let after = calculate_board_price(&regular_200(), &catalog(), BoardSize::Regular, &layout.strips, false);
        assert_eq!(before, after);
    }

    #[test]
    fn test_patch_merges_and_rejects_fields_independently() {
        let patch = PricingPatch {
            currency: Some("  ".to_string()),
            cell_price: Some(Money::from_cents(-1)),
            base: Some(BasePricePatch {
                regular: Some(Money::from_major(210)),
                ..BasePricePatch::default()
            }),
            extras: Some(ExtrasPatch {
                brass_feet: Some(Money::from_major(12)),
                ..ExtrasPatch::default()
            }),
        };
        let original = PricingConfig::default();
        let outcome = original.patched(&patch);

        assert_eq!(outcome.rejected.len(), 2);
        assert!(!outcome.is_clean());
        assert_eq!(outcome.config.currency, "USD");
        assert_eq!(outcome.config.cell_price, original.cell_price);
        assert_eq!(outcome.config.base.regular, Money::from_major(210));
        assert_eq!(outcome.config.base.small, original.base.small);
        assert_eq!(outcome.config.extras.brass_feet, Money::from_major(12));
        assert_eq!(outcome.config.extras.juice_groove, original.extras.juice_groove);
        // The input value is untouched.
        assert_eq!(original, PricingConfig::default());
    }

    #[test]
    fn test_patch_normalizes_currency() {
        let patch = PricingPatch {
            currency: Some(" eur ".to_string()),
            ..PricingPatch::default()
        };
        let outcome = PricingConfig::default().patched(&patch);
        assert!(outcome.is_clean());
        assert_eq!(outcome.config.currency, "EUR");
        assert_eq!(outcome.config.format_amount(Money::from_cents(1050)), "€10.50");
    }

    #[test]
    fn test_patch_from_json_skips_wrong_types() {
        let raw = json!({
            "currency": 42,
            "cellPrice": 350,
            "base": { "small": "cheap", "large": 30000 },
            "extras": "none",
            "somethingElse": true
        });
        let outcome = PricingConfig::default().patched_from_json(&raw);

        assert_eq!(outcome.rejected.len(), 3);
        assert_eq!(outcome.config.currency, "USD");
        assert_eq!(outcome.config.cell_price, Money::from_cents(350));
        assert_eq!(outcome.config.base.small, BasePriceTable::default().small);
        assert_eq!(outcome.config.base.large, Money::from_cents(30000));
    }

    #[test]
    fn test_patch_from_json_fractional_amount_rejected() {
        let (patch, rejected) = PricingPatch::from_json(&json!({ "cellPrice": 4.5 }));
        assert!(patch.cell_price.is_none());
        assert!(matches!(rejected[0], ValidationError::WrongType { .. }));
    }

    #[test]
    fn test_patch_rejects_implausible_amounts() {
        let outcome = PricingConfig::default().patched_from_json(&json!({
            "cellPrice": i64::MAX,
            "base": { "small": 17000 }
        }));

        assert_eq!(outcome.config.cell_price, PricingConfig::default().cell_price);
        assert_eq!(outcome.config.base.small, Money::from_cents(17000));
        assert!(matches!(
            outcome.rejected.as_slice(),
            [ValidationError::OutOfRange { .. }]
        ));
    }

    #[test]
    fn test_patch_from_json_null_and_non_object() {
        let (patch, rejected) = PricingPatch::from_json(&Value::Null);
        assert!(patch.is_empty());
        assert!(rejected.is_empty());

        let (_, rejected) = PricingPatch::from_json(&json!([1, 2]));
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn test_format_amount_other_currency() {
        let config = PricingConfig {
            currency: "SEK".to_string(),
            ..PricingConfig::default()
        };
        assert_eq!(config.format_amount(Money::from_cents(12345)), "SEK 123.45");
    }
}
