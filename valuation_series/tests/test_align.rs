use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use valuation_series::align::{build_multiple_series, FundamentalPoint, PricePoint};
use valuation_series::loader::valid_points;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn monthly_prices(year: i32, months: std::ops::RangeInclusive<u32>, price: f64) -> Vec<PricePoint> {
    months
        .map(|m| PricePoint {
            date: date(year, m, 28),
            price,
        })
        .collect()
}

#[test]
fn test_forward_fill_uses_latest_fundamental_on_or_before_month() {
    let prices = monthly_prices(2020, 1..=12, 100.0);
    let fundamentals = vec![
        FundamentalPoint {
            date: date(2019, 12, 31),
            value: 5.0,
        },
        FundamentalPoint {
            date: date(2020, 6, 30),
            value: 8.0,
        },
    ];

    let observations = build_multiple_series(&prices, &fundamentals);
    assert_eq!(observations.len(), 12);

    // Months are floored to month start, so the June report date
    // (2020-06-30) only reaches July onward.
    for obs in &observations[..6] {
        assert_eq!(obs.multiple, Some(100.0 / 5.0));
        assert_eq!(obs.implied_value, Some(5.0));
    }
    for obs in &observations[6..] {
        assert_eq!(obs.multiple, Some(100.0 / 8.0));
        assert_eq!(obs.implied_value, Some(8.0));
    }
}

#[test]
fn test_months_before_first_fundamental_have_no_multiple() {
    let prices = monthly_prices(2020, 1..=6, 100.0);
    let fundamentals = vec![FundamentalPoint {
        date: date(2020, 3, 31),
        value: 4.0,
    }];

    let observations = build_multiple_series(&prices, &fundamentals);

    for obs in &observations[..3] {
        assert_eq!(obs.price, Some(100.0));
        assert_eq!(obs.multiple, None);
        assert_eq!(obs.implied_value, None);
    }
    for obs in &observations[3..] {
        assert_eq!(obs.multiple, Some(25.0));
    }
}

#[test]
fn test_non_positive_fundamental_leaves_multiple_undefined() {
    // A loss-making year: the negative EPS forward-fills but produces
    // no multiple until a positive value arrives.
    let prices = monthly_prices(2020, 1..=12, 50.0);
    let fundamentals = vec![
        FundamentalPoint {
            date: date(2019, 12, 31),
            value: -2.0,
        },
        FundamentalPoint {
            date: date(2020, 5, 31),
            value: 2.0,
        },
    ];

    let observations = build_multiple_series(&prices, &fundamentals);

    for obs in &observations[..5] {
        assert_eq!(obs.price, Some(50.0));
        assert_eq!(obs.multiple, None);
    }
    for obs in &observations[5..] {
        assert_eq!(obs.multiple, Some(25.0));
        assert_eq!(obs.implied_value, Some(2.0));
    }
}

#[test]
fn test_non_positive_price_is_nulled() {
    let prices = vec![
        PricePoint {
            date: date(2020, 1, 31),
            price: -1.0,
        },
        PricePoint {
            date: date(2020, 2, 28),
            price: 100.0,
        },
    ];
    let fundamentals = vec![FundamentalPoint {
        date: date(2019, 12, 31),
        value: 5.0,
    }];

    let observations = build_multiple_series(&prices, &fundamentals);
    assert_eq!(observations[0].price, None);
    assert_eq!(observations[0].multiple, None);
    assert_eq!(observations[1].multiple, Some(20.0));
}

#[test]
fn test_duplicate_price_months_keep_last() {
    let prices = vec![
        PricePoint {
            date: date(2020, 1, 2),
            price: 90.0,
        },
        PricePoint {
            date: date(2020, 1, 31),
            price: 110.0,
        },
    ];
    let fundamentals = vec![FundamentalPoint {
        date: date(2019, 12, 31),
        value: 10.0,
    }];

    let observations = build_multiple_series(&prices, &fundamentals);
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].date, date(2020, 1, 1));
    assert_eq!(observations[0].price, Some(110.0));
    assert_eq!(observations[0].multiple, Some(11.0));
}

#[test]
fn test_unsorted_fundamentals_are_handled() {
    let prices = monthly_prices(2020, 1..=4, 100.0);
    let fundamentals = vec![
        FundamentalPoint {
            date: date(2020, 2, 15),
            value: 10.0,
        },
        FundamentalPoint {
            date: date(2019, 12, 31),
            value: 5.0,
        },
    ];

    let observations = build_multiple_series(&prices, &fundamentals);
    assert_eq!(observations[0].multiple, Some(20.0));
    assert_eq!(observations[1].multiple, Some(20.0));
    assert_eq!(observations[2].multiple, Some(10.0));
    assert_eq!(observations[3].multiple, Some(10.0));
}

#[test]
fn test_aligned_series_feeds_decomposition() {
    // The aligned output satisfies the same invariants as loader
    // output, so it can flow straight into the valid-row filter.
    let prices = vec![
        PricePoint {
            date: date(2020, 1, 31),
            price: 100.0,
        },
        PricePoint {
            date: date(2020, 12, 31),
            price: 150.0,
        },
    ];
    let fundamentals = vec![
        FundamentalPoint {
            date: date(2019, 12, 31),
            value: 10.0,
        },
        FundamentalPoint {
            date: date(2020, 6, 30),
            value: 12.0,
        },
    ];

    let observations = build_multiple_series(&prices, &fundamentals);
    let points = valid_points(&observations);

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].multiple, 10.0);
    assert_eq!(points[1].multiple, 12.5);
    let d = decomp_math::decompose_endpoints(&points).unwrap();
    assert!((d.log_price - (d.log_value + d.log_multiple)).abs() < 1e-12);
}
