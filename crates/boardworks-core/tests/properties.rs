use boardworks_core::leadtime::{estimate_board_eta, estimate_cart_eta, CartItem, LeadTimeRules};
use boardworks_core::material::StaticCatalog;
use boardworks_core::money::Money;
use boardworks_core::pricing::{calculate_board_quote, ExtrasPatch, PricingConfig, PricingPatch};
use boardworks_core::types::{BoardConfig, BoardLayout, BoardSize, Cell, Extras, MaterialToken, RowOrder};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with("walnut", Money::from_cents(450), "Black Walnut")
        .with("maple", Money::from_cents(375), "Hard Maple")
        .with("cherry", Money::from_cents(0), "Cherry")
}

fn cell() -> impl Strategy<Value = Cell> {
    prop::sample::select(vec![
        None,
        Some(""),
        Some("  "),
        Some("walnut"),
        Some(" Walnut "),
        Some("maple"),
        Some("cherry"),
        Some("zebrawood"),
        Some("#a0522d"),
        Some("rgb(1, 2, 3)"),
    ])
    .prop_map(|token| token.map(MaterialToken::new))
}

fn strips() -> impl Strategy<Value = Vec<Vec<Cell>>> {
    prop::collection::vec(prop::collection::vec(cell(), 0..12), 0..4)
}

/// Strips holding only empty positions and whitespace tokens, which end up
/// on the flat-price path.
fn blank_strips() -> impl Strategy<Value = Vec<Vec<Cell>>> {
    let blank = prop::sample::select(vec![None, Some(""), Some(" "), Some("\t")])
        .prop_map(|token: Option<&str>| token.map(MaterialToken::new));
    prop::collection::vec(prop::collection::vec(blank, 0..12), 0..4)
}

fn size() -> impl Strategy<Value = BoardSize> {
    prop::sample::select(BoardSize::ALL.to_vec())
}

fn extras() -> impl Strategy<Value = Extras> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(juice_groove, third_strip, brass_feet)| Extras {
        juice_groove,
        third_strip,
        brass_feet,
    })
}

fn board() -> impl Strategy<Value = BoardConfig> {
    (size(), prop::option::of(strips()), extras()).prop_map(|(size, strips, extras)| BoardConfig {
        size,
        layout: strips.map(BoardLayout::new),
        extras,
    })
}

fn today() -> impl Strategy<Value = NaiveDate> {
    (0_i64..730).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date") + Duration::days(offset)
    })
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn total_is_base_plus_variable_plus_extras(board in board()) {
        let price = calculate_board_quote(&PricingConfig::default(), &catalog(), &board);
        prop_assert_eq!(price.total, price.base + price.variable + price.extras_total());
    }

    #[test]
    fn breakdown_sums_to_variable(board in board()) {
        let price = calculate_board_quote(&PricingConfig::default(), &catalog(), &board);
        let total: Money = price.wood_breakdown.iter().map(|line| line.total).sum();
        let count: u32 = price.wood_breakdown.iter().map(|line| line.count).sum();
        prop_assert_eq!(total, price.variable);
        prop_assert_eq!(count, price.cell_count);
    }

    #[test]
    fn cell_count_is_bounded_by_active_capacity(board in board()) {
        let price = calculate_board_quote(&PricingConfig::default(), &catalog(), &board);
        let capacity = board
            .layout
            .as_ref()
            .map_or(0, |layout| layout.capacity(board.extras.third_strip));
        prop_assert!(price.cell_count as usize <= capacity);
    }

    #[test]
    fn blank_only_boards_stay_within_capacity(
        size in size(),
        strips in blank_strips(),
        extras in extras(),
    ) {
        let board = BoardConfig {
            size,
            layout: Some(BoardLayout::new(strips)),
            extras,
        };
        let price = calculate_board_quote(&PricingConfig::default(), &catalog(), &board);
        let layout = board.layout.as_ref().expect("layout set above");
        let capacity = layout.capacity(extras.third_strip);
        let tokens = layout
            .active_strips(extras.third_strip)
            .flatten()
            .filter(|cell| cell.is_some())
            .count();

        prop_assert!(price.cell_count as usize <= capacity);
        prop_assert_eq!(price.cell_count as usize, tokens);
    }

    #[test]
    fn pricing_is_deterministic(board in board()) {
        let config = PricingConfig::default();
        let first = calculate_board_quote(&config, &catalog(), &board);
        let second = calculate_board_quote(&config, &catalog(), &board);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn row_order_never_changes_price(board in board(), reflected in any::<bool>()) {
        let config = PricingConfig::default();
        let before = calculate_board_quote(&config, &catalog(), &board);

        let mut reordered = board.clone();
        if let Some(layout) = reordered.layout.as_mut() {
            layout.order = (1..=layout.strips.len())
                .rev()
                .map(|strip_no| RowOrder { strip_no, reflected })
                .collect();
        }
        let after = calculate_board_quote(&config, &catalog(), &reordered);
        prop_assert_eq!(before.total, after.total);
    }

    #[test]
    fn patch_is_idempotent(cell_price in 0_i64..10_000, groove in 0_i64..10_000) {
        let patch = PricingPatch {
            cell_price: Some(Money::from_cents(cell_price)),
            extras: Some(ExtrasPatch {
                juice_groove: Some(Money::from_cents(groove)),
                ..ExtrasPatch::default()
            }),
            ..PricingPatch::default()
        };
        let once = PricingConfig::default().patched(&patch);
        let twice = once.config.patched(&patch);
        prop_assert!(once.is_clean());
        prop_assert_eq!(once.config, twice.config);
    }

    #[test]
    fn board_eta_is_ordered_and_in_future(board in board(), today in today()) {
        let estimate = estimate_board_eta(&LeadTimeRules::default(), &board, today);
        prop_assert!(estimate.eta.production.min <= estimate.eta.production.max);
        prop_assert!(estimate.eta.start_date <= estimate.eta.end_date);
        prop_assert!(estimate.eta.start_date > today);
    }

    #[test]
    fn single_board_cart_matches_board(board in board(), today in today()) {
        let rules = LeadTimeRules::default();
        let estimate = estimate_board_eta(&rules, &board, today).eta;
        let cart = estimate_cart_eta(&rules, &[CartItem::board(board)], today).expect("one item");
        prop_assert_eq!(cart.start_date, estimate.start_date);
        prop_assert_eq!(cart.end_date, estimate.end_date);
        prop_assert_eq!(cart.label, estimate.label);
    }

    #[test]
    fn cart_takes_the_slowest_item(boards in prop::collection::vec(board(), 1..5), today in today()) {
        let rules = LeadTimeRules::default();
        let items: Vec<CartItem> = boards.iter().cloned().map(CartItem::board).collect();
        let cart = estimate_cart_eta(&rules, &items, today).expect("non-empty cart");
        for board in &boards {
            let eta = estimate_board_eta(&rules, board, today).eta;
            prop_assert!(cart.start_date >= eta.start_date);
            prop_assert!(cart.end_date >= eta.end_date);
        }
    }
}

#[test]
fn empty_cart_has_no_estimate() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");
    assert!(estimate_cart_eta(&LeadTimeRules::default(), &[], today).is_none());
}
