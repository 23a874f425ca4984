//! # Material Catalog
//!
//! The pricing engine never knows where material prices come from. It asks
//! an injected [`MaterialCatalog`] by normalized key and treats a miss as
//! "use the default cell price and a best-effort label".
//!
//! ## Lookup Flow
//! ```text
//! cell token " Walnut " ──► normalize_key ──► "walnut" ──► catalog.lookup()
//!                                                              │
//!                  ┌───────────────────────────────────────────┤
//!                  ▼                                           ▼
//!        MaterialInfo { price: Some, name: Some }    MaterialInfo::default()
//!                  │                                           │
//!                  ▼                                           ▼
//!        catalog price + catalog name            config.cell_price + fallback_label()
//!                                                   "#aabbcc" → "#aabbcc"
//!                                                   "zebrawood" → "Custom"
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::normalize_key;
use crate::validation::validate_amount;

/// Label used for materials the catalog does not know.
pub const CUSTOM_LABEL: &str = "Custom";

/// What the catalog knows about one material. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialInfo {
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl MaterialInfo {
    pub fn new(price: Money, display_name: impl Into<String>) -> Self {
        MaterialInfo {
            price: Some(price),
            display_name: Some(display_name.into()),
        }
    }
}

/// Source of per-material unit prices and display names.
///
/// `key` is always a normalized key (see [`normalize_key`]). Returning
/// `MaterialInfo::default()` means "unknown material", which is not an
/// error.
pub trait MaterialCatalog {
    fn lookup(&self, key: &str) -> MaterialInfo;
}

/// Any `Fn(&str) -> MaterialInfo` is a catalog.
impl<F> MaterialCatalog for F
where
    F: Fn(&str) -> MaterialInfo,
{
    fn lookup(&self, key: &str) -> MaterialInfo {
        self(key)
    }
}

/// A catalog that knows nothing. Every material prices at the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl MaterialCatalog for EmptyCatalog {
    fn lookup(&self, _key: &str) -> MaterialInfo {
        MaterialInfo::default()
    }
}

/// In-memory catalog keyed by normalized material key.
///
/// Deserializes from a JSON object:
/// ```json
/// { "walnut": { "price": 450, "displayName": "Black Walnut" } }
/// ```
/// Keys are normalized on the way in. Loading fails when two keys
/// normalize to the same material (`"Black Walnut"` and `"black walnut"`)
/// or when a price is negative or above
/// [`MAX_AMOUNT_CENTS`](crate::MAX_AMOUNT_CENTS).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, MaterialInfo>",
    into = "BTreeMap<String, MaterialInfo>"
)]
pub struct StaticCatalog {
    entries: HashMap<String, MaterialInfo>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a material.
    pub fn insert(&mut self, key: &str, info: MaterialInfo) {
        self.entries.insert(normalize_key(key), info);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: &str, price: Money, display_name: &str) -> Self {
        self.insert(key, MaterialInfo::new(price, display_name));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MaterialCatalog for StaticCatalog {
    fn lookup(&self, key: &str) -> MaterialInfo {
        self.entries.get(key).cloned().unwrap_or_default()
    }
}

impl TryFrom<BTreeMap<String, MaterialInfo>> for StaticCatalog {
    type Error = ValidationError;

    fn try_from(raw: BTreeMap<String, MaterialInfo>) -> Result<Self, Self::Error> {
        let mut sources: HashMap<String, String> = HashMap::with_capacity(raw.len());
        let mut catalog = StaticCatalog::new();

        for (raw_key, info) in raw {
            let key = normalize_key(&raw_key);
            if let Some(first) = sources.get(&key) {
                return Err(ValidationError::Duplicate {
                    field: key,
                    first: first.clone(),
                    second: raw_key,
                });
            }
            if let Some(price) = info.price {
                validate_amount(&key, price)?;
            }
            sources.insert(key.clone(), raw_key);
            catalog.entries.insert(key, info);
        }

        Ok(catalog)
    }
}

impl From<StaticCatalog> for BTreeMap<String, MaterialInfo> {
    fn from(catalog: StaticCatalog) -> Self {
        catalog.entries.into_iter().collect()
    }
}

// =============================================================================
// Labels
// =============================================================================

/// True for raw color values the builder stores directly in a cell:
/// `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(...)`, `rgba(...)`.
///
/// ## Example
/// ```rust
/// use boardworks_core::material::is_color_literal;
///
/// assert!(is_color_literal("#A0522D"));
/// assert!(is_color_literal("rgb(160, 82, 45)"));
/// assert!(!is_color_literal("sienna"));
/// ```
pub fn is_color_literal(raw: &str) -> bool {
    let s = raw.trim().to_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    let inner = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'));

    match inner {
        Some(args) => {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            matches!(parts.len(), 3 | 4)
                && parts
                    .iter()
                    .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '%'))
        }
        None => false,
    }
}

/// Label for a material the catalog has no name for: the trimmed literal
/// for color values, otherwise [`CUSTOM_LABEL`].
pub fn fallback_label(raw: &str) -> String {
    if is_color_literal(raw) {
        raw.trim().to_string()
    } else {
        CUSTOM_LABEL.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
