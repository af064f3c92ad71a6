//! Difficulty estimation for vanity problems
//!
//! All counting is exact over the `16^40` space of address bodies. Per-problem
//! spaces are summed without removing overlap between problems, so an address
//! matching two problems is counted twice and multi-problem estimates are
//! slightly optimistic.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::problem::{Problem, ProblemId, ADDRESS_BODY_LEN, MAX_SNAKE_PAIRS};

const HEX_SYMBOLS: u32 = 16;
const LETTER_SYMBOLS: u32 = 6;
const DIGIT_SYMBOLS: u32 = 10;

/// `16^40`, the number of distinct address bodies
pub fn total_address_space() -> BigUint {
    BigUint::from(HEX_SYMBOLS).pow(ADDRESS_BODY_LEN)
}

/// "n choose k", zero when `k > n`
pub fn combinations(n: u32, k: u32) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    let k = k.min(n - k);

    let mut result = BigUint::from(1u32);
    for i in 1..=k {
        // exact: the running product is always divisible by i here
        result = result * (n - i + 1) / i;
    }
    result
}

/// Bodies of length `total` with exactly `letters` characters in a-f
pub fn exactly_letters(letters: u32, total: u32) -> BigUint {
    if letters > total {
        return BigUint::zero();
    }
    BigUint::from(LETTER_SYMBOLS).pow(letters)
        * BigUint::from(DIGIT_SYMBOLS).pow(total - letters)
        * combinations(total, letters)
}

/// Bodies of length `total` with exactly `pairs` adjacent equal characters
pub fn exactly_snake_pairs(pairs: u32, total: u32) -> BigUint {
    if total == 0 || pairs >= total {
        return BigUint::zero();
    }
    // first char is free, every other position either repeats or picks one of 15
    BigUint::from(HEX_SYMBOLS)
        * BigUint::from(HEX_SYMBOLS - 1).pow(total - 1 - pairs)
        * combinations(total - 1, pairs)
}

fn fixed_chars_space(threshold: u32) -> BigUint {
    BigUint::from(HEX_SYMBOLS).pow(ADDRESS_BODY_LEN - threshold)
}

/// Number of address bodies meeting `threshold` for the given problem kind.
///
/// Thresholds outside the legal range never fail: literal and run problems
/// fall back to the full space, counting problems above their range count
/// nothing.
pub fn probability_space(id: ProblemId, threshold: u32) -> BigUint {
    let in_range = (1..=ADDRESS_BODY_LEN).contains(&threshold);

    match id {
        ProblemId::UserPrefix | ProblemId::UserSuffix | ProblemId::UserMask => {
            if !in_range {
                return total_address_space();
            }
            fixed_chars_space(threshold)
        }
        ProblemId::LeadingAny | ProblemId::TrailingAny => {
            if !in_range {
                return total_address_space();
            }
            BigUint::from(HEX_SYMBOLS) * fixed_chars_space(threshold)
        }
        ProblemId::LettersHeavy => (threshold..=ADDRESS_BODY_LEN)
            .map(|k| exactly_letters(k, ADDRESS_BODY_LEN))
            .sum(),
        // at least k digits means exactly 40 - k letters
        ProblemId::NumbersHeavy => (threshold..=ADDRESS_BODY_LEN)
            .map(|k| exactly_letters(ADDRESS_BODY_LEN - k, ADDRESS_BODY_LEN))
            .sum(),
        ProblemId::SnakeScoreNoCase => (threshold..=MAX_SNAKE_PAIRS)
            .map(|k| exactly_snake_pairs(k, ADDRESS_BODY_LEN))
            .sum(),
    }
}

/// Sum of every problem's space, overlap not removed
pub fn total_probability_space(problems: &[Problem]) -> BigUint {
    problems
        .iter()
        .map(|p| probability_space(p.id(), p.threshold()))
        .sum()
}

/// Expected number of random addresses to examine before one matches any of
/// `problems`: `floor(16^40 / total_space)`.
///
/// An empty list (or a zero total) uses the full space, giving 1.
pub fn calculate_work_unit(problems: &[Problem]) -> f64 {
    let full = total_address_space();
    let mut total = total_probability_space(problems);
    if total.is_zero() {
        total = full.clone();
    }

    (full / total).to_f64().unwrap_or(f64::MAX)
}

/// Probability of at least one match after `attempts` tries
pub fn probability_after(attempts: f64, difficulty: f64) -> f64 {
    if difficulty <= 0.0 {
        return 0.0;
    }
    1.0 - (-attempts / difficulty).exp()
}

/// Format difficulty as human-readable string
pub fn format_difficulty(difficulty: f64) -> String {
    const UNITS: [(f64, &str); 6] = [
        (1e18, "E"),
        (1e15, "P"),
        (1e12, "T"),
        (1e9, "G"),
        (1e6, "M"),
        (1e3, "K"),
    ];

    UNITS
        .iter()
        .find(|(scale, _)| difficulty >= *scale)
        .map(|(scale, unit)| format!("{:.2}{}", difficulty / scale, unit))
        .unwrap_or_else(|| format!("{:.0}", difficulty))
}

/// Seconds until a 50% chance of a match at the given rate
pub fn estimate_time_50pct(difficulty: f64, addresses_per_second: f64) -> f64 {
    if addresses_per_second <= 0.0 {
        return f64::INFINITY;
    }
    difficulty * std::f64::consts::LN_2 / addresses_per_second
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    const MINUTE: f64 = 60.0;
    const HOUR: f64 = 60.0 * MINUTE;
    const DAY: f64 = 24.0 * HOUR;
    const YEAR: f64 = 365.0 * DAY;

    if !seconds.is_finite() {
        "never".to_string()
    } else if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < MINUTE {
        format!("{:.1}s", seconds)
    } else if seconds < HOUR {
        format!("{:.1}m", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{:.1}h", seconds / HOUR)
    } else if seconds < YEAR {
        format!("{:.1}d", seconds / DAY)
    } else {
        format!("{:.1}y", seconds / YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pow16(exp: u32) -> BigUint {
        BigUint::from(16u32).pow(exp)
    }

    #[test]
    fn test_combinations_symmetry() {
        for n in 0..=40 {
            for k in 0..=n {
                assert_eq!(combinations(n, k), combinations(n, n - k), "C({n},{k})");
            }
        }
    }

    #[test]
    fn test_combinations_known_values() {
        assert_eq!(combinations(40, 0), BigUint::from(1u32));
        assert_eq!(combinations(40, 40), BigUint::from(1u32));
        assert_eq!(combinations(40, 1), BigUint::from(40u32));
        assert_eq!(combinations(40, 20), BigUint::from(137_846_528_820u64));
        assert_eq!(combinations(5, 6), BigUint::zero());
    }

    #[test]
    fn test_letters_threshold_zero_is_full_space() {
        assert_eq!(probability_space(ProblemId::LettersHeavy, 0), total_address_space());
    }

    #[test]
    fn test_snake_threshold_zero_is_full_space() {
        assert_eq!(
            probability_space(ProblemId::SnakeScoreNoCase, 0),
            total_address_space()
        );
        assert_eq!(
            probability_space(ProblemId::SnakeScoreNoCase, 39),
            BigUint::from(16u32)
        );
    }

    #[test]
    fn test_numbers_heavy_monotonic() {
        let mut prev = probability_space(ProblemId::NumbersHeavy, 0);
        assert_eq!(prev, total_address_space());
        for t in 1..=40 {
            let space = probability_space(ProblemId::NumbersHeavy, t);
            assert!(space <= prev, "threshold {t} increased the space");
            prev = space;
        }
        assert_eq!(prev, BigUint::from(10u32).pow(40));
    }

    #[test]
    fn test_empty_problems() {
        assert_eq!(total_probability_space(&[]), BigUint::zero());
        assert_eq!(calculate_work_unit(&[]), 1.0);
    }

    #[test]
    fn test_leading_any_eight() {
        let problems = [Problem::LeadingAny { length: 8 }];
        assert_eq!(total_probability_space(&problems), pow16(1) * pow16(32));
        assert_eq!(calculate_work_unit(&problems), 268_435_456.0);
    }

    #[test]
    fn test_user_prefix_scenario() {
        let problems = [Problem::UserPrefix {
            specifier: "0xC0FFEE00".into(),
        }];
        assert_eq!(total_probability_space(&problems), pow16(32));
        assert_eq!(calculate_work_unit(&problems), 4_294_967_296.0);
    }

    #[test]
    fn test_overlap_is_not_removed() {
        let problems = [
            Problem::LeadingAny { length: 8 },
            Problem::TrailingAny { length: 8 },
        ];
        assert_eq!(calculate_work_unit(&problems), 134_217_728.0);
    }

    #[test]
    fn test_each_problem_uses_its_own_threshold() {
        let problems = [
            Problem::UserPrefix { specifier: "0xC0FFEE00".into() },
            Problem::UserPrefix { specifier: "0xC0FFEE".into() },
        ];
        assert_eq!(total_probability_space(&problems), pow16(32) + pow16(34));
    }

    #[test]
    fn test_counting_problems() {
        assert_eq!(calculate_work_unit(&[Problem::NumbersHeavy]), 146_150_163.0);
        assert_eq!(
            calculate_work_unit(&[Problem::LettersHeavy { count: 32 }]),
            20_488_889.0
        );
        assert_eq!(
            calculate_work_unit(&[Problem::SnakeScoreNoCase { count: 15 }]),
            194_473_166.0
        );
    }

    #[test]
    fn test_boundary_thresholds() {
        // full run of one character: 16 addresses
        assert_eq!(
            calculate_work_unit(&[Problem::LeadingAny { length: 40 }]),
            2f64.powi(156)
        );
        assert_eq!(calculate_work_unit(&[Problem::LeadingAny { length: 0 }]), 1.0);
        assert_eq!(calculate_work_unit(&[Problem::TrailingAny { length: 41 }]), 1.0);
        assert_eq!(
            calculate_work_unit(&[Problem::UserPrefix { specifier: "0x".into() }]),
            1.0
        );
    }

    #[test]
    fn test_counting_thresholds_above_range_count_nothing() {
        assert_eq!(probability_space(ProblemId::LettersHeavy, 41), BigUint::zero());
        assert_eq!(probability_space(ProblemId::NumbersHeavy, 41), BigUint::zero());
        assert_eq!(probability_space(ProblemId::SnakeScoreNoCase, 40), BigUint::zero());

        // alone, the zero total falls back to the full space
        assert_eq!(calculate_work_unit(&[Problem::LettersHeavy { count: 41 }]), 1.0);
        assert_eq!(calculate_work_unit(&[Problem::SnakeScoreNoCase { count: 40 }]), 1.0);

        // in a mix, the out-of-range problem adds nothing
        let problems = [
            Problem::LeadingAny { length: 8 },
            Problem::SnakeScoreNoCase { count: 40 },
        ];
        assert_eq!(total_probability_space(&problems), pow16(1) * pow16(32));
        assert_eq!(calculate_work_unit(&problems), 268_435_456.0);
    }

    #[test]
    fn test_probability_after() {
        assert_eq!(probability_after(0.0, 100.0), 0.0);
        assert!((probability_after(100.0, 100.0) - 0.632).abs() < 1e-3);
        assert_eq!(probability_after(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_format_difficulty() {
        assert_eq!(format_difficulty(999.0), "999");
        assert_eq!(format_difficulty(1500000.0), "1.50M");
        assert_eq!(format_difficulty(4_294_967_296.0), "4.29G");
        assert_eq!(format_difficulty(2e18), "2.00E");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.5), "500ms");
        assert_eq!(format_duration(30.0), "30.0s");
        assert_eq!(format_duration(7200.0), "2.0h");
        assert_eq!(format_duration(f64::INFINITY), "never");
        assert_eq!(format_duration(estimate_time_50pct(100.0, 0.0)), "never");
    }
}
