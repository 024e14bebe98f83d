//! Incline tag interpretation
//!
//! OSM `incline` values are either the words `up`/`down` or a signed
//! percentage such as `12%` or `-8%`. Positive values climb in the direction
//! of the way's node order. A steep way gets an arrow pointing uphill, so a
//! steep descent has its points reversed before rendering.

/// Outcome of analysing an `incline` tag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Incline {
    /// The slope exceeds the configured threshold (or is tagged up/down)
    pub steep: bool,
    /// The point order must be reversed so that it runs uphill
    pub reversed: bool,
}

impl Incline {
    const FLAT: Self = Self {
        steep: false,
        reversed: false,
    };
}

/// Numeric percentage of an incline tag.
///
/// Only the text before the first `%` is considered. Tags without a `%`, or
/// whose prefix is not a finite number, have no percentage.
pub fn parse_percentage(tag: &str) -> Option<f64> {
    let (number, _) = tag.split_once('%')?;
    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Decide steepness and direction for an optional `incline` tag.
///
/// `threshold` is a percentage; slopes strictly above it (in either
/// direction) are steep. Anything that is neither `up`, `down` nor a
/// parseable percentage is treated as flat.
pub fn analyze_incline(tag: Option<&str>, threshold: f64) -> Incline {
    let Some(tag) = tag else {
        return Incline::FLAT;
    };

    let percentage = parse_percentage(tag);
    let is_up = tag == "up" || percentage.is_some_and(|p| p > threshold);
    let is_down = tag == "down" || percentage.is_some_and(|p| p < -threshold);

    if is_up {
        Incline {
            steep: true,
            reversed: false,
        }
    } else if is_down {
        Incline {
            steep: true,
            reversed: true,
        }
    } else {
        Incline::FLAT
    }
}
