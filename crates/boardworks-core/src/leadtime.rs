//! # Lead-Time Estimator
//!
//! Estimates a delivery date range for a custom board, an in-stock product,
//! or a whole cart.
//!
//! ## Estimation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Board ETA Pipeline                                 │
//! │                                                                         │
//! │  base production range      small 3–5 │ regular 5–7 │ large 7–10        │
//! │        │                                                                │
//! │        ├── + juice groove days       (if enabled)                       │
//! │        ├── + third strip days        (if enabled)                       │
//! │        ├── + ⌊filled cells / 60⌋     (0 when strips are unreadable)     │
//! │        ▼                                                                │
//! │  clamp   min ∈ [base.min, base.max + 7]                                 │
//! │          max ∈ [min,      base.max + 10]                                │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  + shipping 3–5                                                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  walk business days from today ──► start/end dates ──► label            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Today" is always an argument. Nothing here reads the clock.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{BoardConfig, BoardSize};

// =============================================================================
// Day Range
// =============================================================================

/// Longest range bound or day addition a rule set may carry.
pub const MAX_LEAD_DAYS: u32 = 365;

/// Inclusive range of days.
///
/// Deserializing rejects `min > max`; in code, `DayRange::new` swaps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct DayRange {
    pub min: u32,
    pub max: u32,
}

impl DayRange {
    /// Creates a range, swapping the bounds if they arrive reversed.
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            DayRange { min, max }
        } else {
            DayRange { min: max, max: min }
        }
    }

    /// Both bounds moved by `days`, saturating at `u32::MAX`.
    pub const fn shifted(&self, days: u32) -> Self {
        DayRange {
            min: self.min.saturating_add(days),
            max: self.max.saturating_add(days),
        }
    }

    /// Bound-wise sum, e.g. production + shipping. Saturates.
    pub const fn plus(&self, other: DayRange) -> Self {
        DayRange {
            min: self.min.saturating_add(other.min),
            max: self.max.saturating_add(other.max),
        }
    }

    pub const fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Same range with the bounds in order.
    pub const fn ordered(&self) -> Self {
        DayRange::new(self.min, self.max)
    }
}

impl<'de> Deserialize<'de> for DayRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Bounds {
            min: u32,
            max: u32,
        }

        let Bounds { min, max } = Bounds::deserialize(deserializer)?;
        if min > max {
            return Err(de::Error::custom(format!(
                "day range min {} exceeds max {}",
                min, max
            )));
        }
        Ok(DayRange { min, max })
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Production and shipping heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadTimeRules {
    pub small: DayRange,
    pub regular: DayRange,
    pub large: DayRange,
    pub groove_days: u32,
    pub third_strip_days: u32,
    /// One extra production day per this many filled cells.
    pub cells_per_extra_day: u32,
    /// Adjusted minimum never exceeds `base.max + min_headroom`.
    pub min_headroom: u32,
    /// Adjusted maximum never exceeds `base.max + max_headroom`.
    pub max_headroom: u32,
    pub shipping: DayRange,
    /// Production range for in-stock products.
    pub in_stock: DayRange,
}

impl Default for LeadTimeRules {
    fn default() -> Self {
        LeadTimeRules {
            small: DayRange::new(3, 5),
            regular: DayRange::new(5, 7),
            large: DayRange::new(7, 10),
            groove_days: 1,
            third_strip_days: 1,
            cells_per_extra_day: 60,
            min_headroom: 7,
            max_headroom: 10,
            shipping: DayRange::new(3, 5),
            in_stock: DayRange::new(0, 1),
        }
    }
}

impl LeadTimeRules {
    #[inline]
    pub fn base_range(&self, size: BoardSize) -> DayRange {
        match size {
            BoardSize::Small => self.small,
            BoardSize::Regular => self.regular,
            BoardSize::Large => self.large,
        }
    }

    /// Checks the rules before they are used.
    ///
    /// ## Rules
    /// - Every range has `min <= max`
    /// - No range bound, day addition or headroom exceeds `MAX_LEAD_DAYS`
    /// - `cells_per_extra_day >= 1`
    /// - `min_headroom <= max_headroom`
    /// - `shipping.min >= 1`, so no delivery date lands on "today"
    pub fn validate(&self) -> CoreResult<()> {
        let ranges = [
            ("small", self.small),
            ("regular", self.regular),
            ("large", self.large),
            ("shipping", self.shipping),
            ("inStock", self.in_stock),
        ];
        for (name, range) in ranges {
            if !range.is_ordered() {
                return Err(invalid(format!(
                    "{} range min {} exceeds max {}",
                    name, range.min, range.max
                )));
            }
            if range.max > MAX_LEAD_DAYS {
                return Err(invalid(format!(
                    "{} range max {} exceeds {} days",
                    name, range.max, MAX_LEAD_DAYS
                )));
            }
        }

        let additions = [
            ("grooveDays", self.groove_days),
            ("thirdStripDays", self.third_strip_days),
            ("minHeadroom", self.min_headroom),
            ("maxHeadroom", self.max_headroom),
        ];
        for (name, days) in additions {
            if days > MAX_LEAD_DAYS {
                return Err(invalid(format!(
                    "{} {} exceeds {} days",
                    name, days, MAX_LEAD_DAYS
                )));
            }
        }

        if self.cells_per_extra_day == 0 {
            return Err(invalid("cellsPerExtraDay must be at least 1".to_string()));
        }

        if self.min_headroom > self.max_headroom {
            return Err(invalid(format!(
                "minHeadroom {} exceeds maxHeadroom {}",
                self.min_headroom, self.max_headroom
            )));
        }

        if self.shipping.min == 0 {
            return Err(invalid("shipping.min must be at least 1".to_string()));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> CoreError {
    CoreError::InvalidLeadTimeRules { reason }
}

// =============================================================================
// Estimates
// =============================================================================

/// Resolved delivery estimate for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EtaRange {
    pub production: DayRange,
    pub shipping: DayRange,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub label: String,
}

/// How the complexity addition was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Complexity {
    /// Counted `cells` filled cells, adding `days`.
    Exact { cells: u32, days: u32 },
    /// Strips missing or incomplete; no days added.
    Degraded,
}

impl Complexity {
    pub const fn extra_days(&self) -> u32 {
        match self {
            Complexity::Exact { days, .. } => *days,
            Complexity::Degraded => 0,
        }
    }

    pub const fn is_degraded(&self) -> bool {
        matches!(self, Complexity::Degraded)
    }
}

/// Board estimate plus how its complexity addition was computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BoardEta {
    pub eta: EtaRange,
    pub complexity: Complexity,
}

/// Cart-wide estimate.
///
/// Only dates and label: production and shipping ranges of different items
/// do not combine into anything meaningful, so they are not reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartEta {
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub label: String,
}

/// One cart entry. Entries with a board configuration are built to order;
/// everything else ships from stock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub board: Option<BoardConfig>,
}

impl CartItem {
    pub fn board(config: BoardConfig) -> Self {
        CartItem {
            name: None,
            board: Some(config),
        }
    }

    pub fn product(name: impl Into<String>) -> Self {
        CartItem {
            name: Some(name.into()),
            board: None,
        }
    }
}

// =============================================================================
// Estimation
// =============================================================================

/// Estimates delivery for a custom board.
///
/// ## Example
/// ```rust
/// use boardworks_core::leadtime::{estimate_board_eta, LeadTimeRules};
/// use boardworks_core::types::{BoardConfig, BoardSize, Extras};
/// use chrono::NaiveDate;
///
/// let board = BoardConfig::new(BoardSize::Large).with_extras(Extras {
///     juice_groove: true,
///     third_strip: true,
///     brass_feet: false,
/// });
/// let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let estimate = estimate_board_eta(&LeadTimeRules::default(), &board, monday);
///
/// assert_eq!((estimate.eta.production.min, estimate.eta.production.max), (9, 12));
/// assert_eq!(estimate.eta.label, "Arrives Nov 4–Nov 11");
/// ```
pub fn estimate_board_eta(rules: &LeadTimeRules, board: &BoardConfig, today: NaiveDate) -> BoardEta {
    let base = rules.base_range(board.size);

    let mut added: u32 = 0;
    if board.extras.juice_groove {
        added = added.saturating_add(rules.groove_days);
    }
    if board.extras.third_strip {
        added = added.saturating_add(rules.third_strip_days);
    }

    let complexity = complexity_of(rules, board);
    added = added.saturating_add(complexity.extra_days());

    let shifted = base.shifted(added);
    let min = clamp_days(shifted.min, base.min, base.max.saturating_add(rules.min_headroom));
    let max = clamp_days(shifted.max, min, base.max.saturating_add(rules.max_headroom));
    let production = DayRange { min, max };

    debug!(
        size = %board.size,
        added,
        min,
        max,
        degraded = complexity.is_degraded(),
        "Board production range"
    );

    BoardEta {
        eta: resolve(production, rules.shipping, today),
        complexity,
    }
}

/// Estimates delivery for an in-stock product.
pub fn estimate_product_eta(rules: &LeadTimeRules, today: NaiveDate) -> EtaRange {
    resolve(rules.in_stock, rules.shipping, today)
}

/// Estimates delivery for a whole cart: the slowest item sets both dates.
///
/// Returns `None` for an empty cart.
pub fn estimate_cart_eta(rules: &LeadTimeRules, items: &[CartItem], today: NaiveDate) -> Option<CartEta> {
    let (start_date, end_date) = items
        .iter()
        .map(|item| match &item.board {
            Some(board) => estimate_board_eta(rules, board, today).eta,
            None => estimate_product_eta(rules, today),
        })
        .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, eta| match acc {
            None => Some((eta.start_date, eta.end_date)),
            Some((start, end)) => Some((start.max(eta.start_date), end.max(eta.end_date))),
        })?;

    Some(CartEta {
        start_date,
        end_date,
        label: format_label(start_date, end_date),
    })
}

fn complexity_of(rules: &LeadTimeRules, board: &BoardConfig) -> Complexity {
    let cells = board
        .layout
        .as_ref()
        .and_then(|layout| layout.try_filled_cell_count(board.extras.third_strip));

    match cells {
        Some(cells) => {
            let cells = u32::try_from(cells).unwrap_or(u32::MAX);
            Complexity::Exact {
                cells,
                days: cells / rules.cells_per_extra_day.max(1),
            }
        }
        None => {
            debug!(size = %board.size, "Board strips unavailable, no complexity days");
            Complexity::Degraded
        }
    }
}

/// `value` limited to `[lo, hi]`; `lo` wins if the bounds cross.
fn clamp_days(value: u32, lo: u32, hi: u32) -> u32 {
    value.min(hi).max(lo)
}

fn resolve(production: DayRange, shipping: DayRange, today: NaiveDate) -> EtaRange {
    let production = production.ordered();
    let shipping = shipping.ordered();
    let total = production.plus(shipping);
    let start_date = add_business_days(today, total.min);
    let end_date = add_business_days(today, total.max);

    EtaRange {
        production,
        shipping,
        start_date,
        end_date,
        label: format_label(start_date, end_date),
    }
}

// =============================================================================
// Calendar
// =============================================================================

/// Monday through Friday.
#[inline]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Walks forward counting only business days until `days` have been
/// counted. `start` itself is never counted.
///
/// Any seven consecutive days hold exactly five business days, so whole
/// weeks are skipped in one step and only the last few days are walked.
/// Stops at the last representable date instead of overflowing.
///
/// ## Example
/// ```rust
/// use boardworks_core::leadtime::add_business_days;
/// use chrono::NaiveDate;
///
/// let friday = NaiveDate::from_ymd_opt(2026, 10, 23).unwrap();
/// let monday = NaiveDate::from_ymd_opt(2026, 10, 26).unwrap();
/// assert_eq!(add_business_days(friday, 1), monday);
/// ```
pub fn add_business_days(start: NaiveDate, days: u32) -> NaiveDate {
    if days == 0 {
        return start;
    }

    // Keep at least one day to walk so a weekend start still lands on a weekday.
    let weeks = (days - 1) / 5;
    let Some(mut date) = start.checked_add_days(Days::new(u64::from(weeks) * 7)) else {
        return NaiveDate::MAX;
    };
    let mut remaining = days - weeks * 5;
    while remaining > 0 {
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
        if is_business_day(date) {
            remaining -= 1;
        }
    }
    date
}

/// `"Arrives by Oct 24"` when both bounds print the same, otherwise
/// `"Arrives Oct 22–Oct 27"`.
pub fn format_label(start: NaiveDate, end: NaiveDate) -> String {
    let from = short_date(start);
    let to = short_date(end);
    if from == to {
        format!("Arrives by {}", to)
    } else {
        format!("Arrives {}–{}", from, to)
    }
}

fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
