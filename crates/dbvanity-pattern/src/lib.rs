//! DbVanity Problem Engine
//!
//! Problem types: leading/trailing runs, letters/numbers heavy, snake,
//! user prefix/suffix/mask. Provides difficulty estimation, address
//! classification and order requests.

mod difficulty;
mod matcher;
mod order;
mod problem;

pub use difficulty::{
    calculate_work_unit, combinations, estimate_time_50pct, exactly_letters,
    exactly_snake_pairs, format_difficulty, format_duration, probability_after,
    probability_space, total_address_space, total_probability_space,
};
pub use matcher::{match_problem, ProblemMatcher};
pub use order::{
    fetch_order, list_orders, order_query, OrderError, VanityRequest,
    VanityRequestWithTimestamp, ORDER_ANNOTATION_KEY, TIMESTAMP_ANNOTATION_KEY,
};
pub use problem::{Problem, ProblemError, ProblemId, ADDRESS_BODY_LEN, MAX_SNAKE_PAIRS};
