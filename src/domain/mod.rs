//! Expense domain models and custom-period calendar arithmetic.

pub mod period;
pub mod transaction;

pub use period::{
    advance_period, custom_month_end, custom_month_start, custom_month_window,
    days_in_custom_month, in_period, is_in_custom_period, is_same_year, month_abbreviation,
    period_title, reference_for_today, shift_period, window_for, CalendarDay, Direction,
    Granularity, PeriodWindow, PERIOD_END_DAY, PERIOD_START_DAY,
};
pub use transaction::{
    parse_amount, parse_date, Transaction, TransactionDraft, TransactionId, TransactionKind,
};
