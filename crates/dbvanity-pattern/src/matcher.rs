//! Classification of found addresses against problems

use crate::problem::{is_wildcard, strip_hex_prefix, Problem, ADDRESS_BODY_LEN};

impl Problem {
    /// Check whether an address (with or without `0x`) satisfies this problem.
    ///
    /// Prefix, suffix and snake comparisons ignore case. Masks and character
    /// runs compare exactly, so a checksummed address must match their case.
    pub fn matches(&self, address: &str) -> bool {
        let body = strip_hex_prefix(address).as_bytes();

        match self {
            Problem::UserPrefix { specifier } => {
                let pat = strip_hex_prefix(specifier).as_bytes();
                body.len() >= pat.len() && body[..pat.len()].eq_ignore_ascii_case(pat)
            }
            Problem::UserSuffix { specifier } => {
                let pat = specifier.as_bytes();
                body.len() >= pat.len() && body[body.len() - pat.len()..].eq_ignore_ascii_case(pat)
            }
            Problem::UserMask { specifier } => {
                strip_hex_prefix(specifier)
                    .bytes()
                    .enumerate()
                    .all(|(i, m)| {
                        is_wildcard(m as char)
                            || body.get(i) == Some(&m)
                    })
            }
            Problem::LeadingAny { length } => run_len(body.iter()) >= *length as usize,
            Problem::TrailingAny { length } => run_len(body.iter().rev()) >= *length as usize,
            Problem::LettersHeavy { count } => {
                let letters = body
                    .iter()
                    .filter(|b| b.is_ascii_hexdigit() && !b.is_ascii_digit())
                    .count();
                letters >= *count as usize
            }
            Problem::NumbersHeavy => {
                body.len() == ADDRESS_BODY_LEN as usize && body.iter().all(|b| b.is_ascii_digit())
            }
            Problem::SnakeScoreNoCase { count } => {
                let pairs = body
                    .windows(2)
                    .filter(|w| w[0].eq_ignore_ascii_case(&w[1]))
                    .count();
                pairs >= *count as usize
            }
        }
    }
}

/// Length of the run of characters equal to the first one
fn run_len<'a>(mut chars: impl Iterator<Item = &'a u8>) -> usize {
    match chars.next() {
        Some(first) => 1 + chars.take_while(|c| *c == first).count(),
        None => 0,
    }
}

/// Return the first problem the address satisfies
pub fn match_problem<'a>(address: &str, problems: &'a [Problem]) -> Option<&'a Problem> {
    problems.iter().find(|p| p.matches(address))
}

/// Problem matcher for classifying addresses
#[derive(Debug, Clone, Default)]
pub struct ProblemMatcher {
    problems: Vec<Problem>,
}

impl ProblemMatcher {
    /// Create a new matcher with given problems
    pub fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    /// Create a matcher with a single problem
    pub fn single(problem: Problem) -> Self {
        Self {
            problems: vec![problem],
        }
    }

    /// Index of the first matching problem, or None
    pub fn matches(&self, address: &str) -> Option<usize> {
        self.problems.iter().position(|p| p.matches(address))
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }
}
