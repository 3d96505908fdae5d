/// Normalized two-part split for a proportional bar. Shares are percentages
/// in `[0, 100]` and always sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonSplit {
    pub home_share: f64,
    pub away_share: f64,
}

impl ComparisonSplit {
    pub const NEUTRAL: ComparisonSplit = ComparisonSplit { home_share: 50.0, away_share: 50.0 };
}

/// Split `home` and `away` into percentage shares.
///
/// Both inputs must be finite and non-negative; anything else is an upstream
/// data bug and panics. A `0 / 0` comparison yields the neutral 50/50 split.
/// The away share is computed as the complement of the home share so the
/// pair sums to exactly 100.
pub fn split(home: f64, away: f64) -> ComparisonSplit {
    assert!(
        home.is_finite() && home >= 0.0,
        "comparison input must be finite and non-negative, got home={home}"
    );
    assert!(
        away.is_finite() && away >= 0.0,
        "comparison input must be finite and non-negative, got away={away}"
    );

    let total = home + away;
    if total == 0.0 {
        return ComparisonSplit::NEUTRAL;
    }
    let home_share = 100.0 * home / total;
    ComparisonSplit { home_share, away_share: 100.0 - home_share }
}

/// Whole terminal cells for each side of a `width`-cell bar. The home share
/// is rounded and away takes the rest, so the two always fill `width`.
pub fn bar_cells(split: ComparisonSplit, width: u16) -> (u16, u16) {
    let home = ((split.home_share / 100.0) * f64::from(width)).round() as u16;
    let home = home.min(width);
    (home, width - home)
}

/// One decimal place, rounding half away from zero on the value scaled by 10:
/// `6.25 → "6.3"`, `8 → "8.0"`. Panics on a non-finite rating.
pub fn format_rating(rating: f64) -> String {
    assert!(rating.is_finite(), "rating must be finite, got {rating}");
    let tenths = (rating * 10.0).round();
    // -0.04 rounds to -0.0
    let tenths = if tenths == 0.0 { 0.0 } else { tenths };
    format!("{:.1}", tenths / 10.0)
}

/// Raw stat value as shown under a bar: whole numbers without a decimal part.
pub fn format_stat_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
