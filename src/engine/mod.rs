//! Streak and completion-rate computations over the completion ledger.
//!
//! Everything here is a pure function of its inputs; "today" is always
//! passed in, and dates are naive calendar days.

pub mod dates;
pub mod report;
pub mod streak;

pub use dates::ROLLING_WINDOW_DAYS;
pub use streak::current_streak;
