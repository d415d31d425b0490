use crate::models::{Level, MAX_NOVELTY};

/// Publication year that maps to the midpoint of the novelty scale
const PAPER_BASE_YEAR: i32 = 2020;

/// Novelty assigned to papers whose publication date is unknown
pub const PAPER_BASELINE_NOVELTY: f64 = 5.0;

/// Novelty score for a repository (0-10)
///
/// score = clamp(stars / 200 + 2, 0, 10), rounded to one decimal
pub fn repository_novelty(stars: u64) -> f64 {
    let raw = stars as f64 / 200.0 + 2.0;
    round_one_decimal(clamp_novelty(raw))
}

/// Novelty score for a paper from its publication year (0-10)
///
/// score = clamp((year - 2020) / 5 * 5 + 5, 0, 10)
pub fn paper_novelty(year: Option<i32>) -> f64 {
    match year {
        Some(year) => {
            let raw = (year - PAPER_BASE_YEAR) as f64 / 5.0 * 5.0 + PAPER_BASELINE_NOVELTY;
            round_one_decimal(clamp_novelty(raw))
        }
        None => PAPER_BASELINE_NOVELTY,
    }
}

/// Difficulty level implied by a paper's novelty score
pub fn paper_level(novelty: f64) -> Level {
    if novelty > 7.0 {
        Level::Advanced
    } else if novelty > 5.0 {
        Level::Intermediate
    } else {
        Level::Easy
    }
}

#[inline]
pub fn clamp_novelty(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, MAX_NOVELTY)
}

#[inline]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
