//! # boardworks-core: Pricing and Lead-Time Engine for Custom Boards
//!
//! This crate holds the quoting rules for made-to-order cutting boards as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Boardworks Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront / Board Builder                   │   │
//! │  │    saved board JSON ──► cart ──► checkout                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                boardworks-quote (CLI)                           │   │
//! │  │    config files, env overrides, catalog loading, output         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ boardworks-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │ leadtime  │  │   order   │  │   │
//! │  │   │BoardConfig│  │ BoardPrice│  │  BoardEta │  │ normalize │  │   │
//! │  │   │  Layout   │  │  Patches  │  │  CartEta  │  │  summary  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • CALLER SUPPLIES "TODAY"           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Board size, layout grid, extras
//! - [`money`] - Money type with integer arithmetic
//! - [`material`] - Material catalog trait and label fallbacks
//! - [`pricing`] - Pricing config, overrides, price calculation
//! - [`leadtime`] - Business-day ETA for boards, products and carts
//! - [`order`] - Saved-board normalization, order summary, checkout amount
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules shared by overrides and checkout
//!
//! ## Example Usage
//!
//! ```rust
//! use boardworks_core::material::StaticCatalog;
//! use boardworks_core::pricing::{calculate_board_quote, PricingConfig};
//! use boardworks_core::types::{BoardConfig, BoardLayout, BoardSize};
//! use boardworks_core::Money;
//!
//! let catalog = StaticCatalog::new().with("walnut", Money::from_cents(450), "Black Walnut");
//! let board = BoardConfig::new(BoardSize::Regular)
//!     .with_layout(BoardLayout::from_tokens(&[&["walnut", "maple"], &["walnut"]]));
//!
//! let price = calculate_board_quote(&PricingConfig::default(), &catalog, &board);
//!
//! // $200 base + 2 × $4.50 walnut + 1 × $4.00 default
//! assert_eq!(price.total.cents(), 21300);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod leadtime;
pub mod material;
pub mod money;
pub mod order;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use leadtime::{BoardEta, CartEta, CartItem, Complexity, EtaRange, LeadTimeRules};
pub use material::{MaterialCatalog, MaterialInfo, StaticCatalog};
pub use money::Money;
pub use order::OrderSummary;
pub use pricing::{BoardPrice, PricingConfig, PricingPatch};
pub use types::{BoardConfig, BoardLayout, BoardSize, Extras};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of identical boards on one checkout line.
pub const MAX_BOARD_QUANTITY: u32 = 99;

/// Largest amount, in minor units, accepted for any configured or catalog
/// price: $1,000,000.00.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;
