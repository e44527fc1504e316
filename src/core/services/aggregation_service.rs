//! Chart bucket aggregation.
//!
//! Month view yields one bucket per day of the financial month, labelled by
//! day-of-month (so a December/January window reads 26..31, 1..25). Year
//! view yields twelve calendar-month buckets. Buckets are always returned in
//! index order, never re-sorted by value.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::{
    custom_month_window, is_same_year, month_abbreviation, window_for, CalendarDay, Granularity,
    PeriodWindow, Transaction, TransactionKind,
};

use super::selection_service::TypeFilter;

/// One aggregation slot. `sum` covers every admitted transaction; `income`
/// and `expense` split it by kind so callers can draw two series for the
/// `all` filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub start: NaiveDate,
    pub sum: f64,
    pub income: f64,
    pub expense: f64,
}

impl Bucket {
    fn empty(label: String, start: NaiveDate) -> Self {
        Self {
            label,
            start,
            sum: 0.0,
            income: 0.0,
            expense: 0.0,
        }
    }

    fn accumulate(&mut self, txn: &Transaction) {
        self.sum += txn.amount;
        match txn.kind {
            TransactionKind::Income => self.income += txn.amount,
            TransactionKind::Expense => self.expense += txn.amount,
        }
    }

    /// Bar height after an optional display cap. `sum` itself is untouched.
    pub fn display_value(&self, cap: Option<f64>) -> f64 {
        match cap {
            Some(limit) => self.sum.min(limit),
            None => self.sum,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub granularity: Granularity,
    pub type_filter: TypeFilter,
    pub window: PeriodWindow,
    pub buckets: Vec<Bucket>,
}

impl ChartSeries {
    pub fn total(&self) -> f64 {
        self.buckets.iter().map(|bucket| bucket.sum).sum()
    }

    pub fn peak(&self) -> f64 {
        self.buckets
            .iter()
            .map(|bucket| bucket.sum)
            .fold(0.0, f64::max)
    }

    pub fn display_values(&self, cap: Option<f64>) -> Vec<f64> {
        self.buckets
            .iter()
            .map(|bucket| bucket.display_value(cap))
            .collect()
    }
}

pub struct AggregationService;

impl AggregationService {
    pub fn build_buckets(
        transactions: &[Transaction],
        reference: &impl CalendarDay,
        granularity: Granularity,
        type_filter: TypeFilter,
    ) -> ChartSeries {
        let admitted = transactions
            .iter()
            .filter(|txn| type_filter.admits(txn.kind));
        let buckets = match granularity {
            Granularity::Month => Self::daily_buckets(admitted, reference),
            Granularity::Year => Self::monthly_buckets(admitted, reference),
        };
        ChartSeries {
            granularity,
            type_filter,
            window: window_for(reference, granularity),
            buckets,
        }
    }

    fn daily_buckets<'a>(
        transactions: impl Iterator<Item = &'a Transaction>,
        reference: &impl CalendarDay,
    ) -> Vec<Bucket> {
        let window = custom_month_window(reference);
        let mut buckets: Vec<Bucket> = window
            .dates()
            .map(|day| Bucket::empty(day.day().to_string(), day))
            .collect();
        for txn in transactions.filter(|txn| window.contains(&txn.date)) {
            let offset = (txn.date.date() - window.start).num_days() as usize;
            if let Some(bucket) = buckets.get_mut(offset) {
                bucket.accumulate(txn);
            }
        }
        buckets
    }

    fn monthly_buckets<'a>(
        transactions: impl Iterator<Item = &'a Transaction>,
        reference: &impl CalendarDay,
    ) -> Vec<Bucket> {
        let year = reference.calendar_day().year();
        let mut buckets: Vec<Bucket> = (0..12u32)
            .filter_map(|index| {
                NaiveDate::from_ymd_opt(year, index + 1, 1)
                    .map(|start| Bucket::empty(month_abbreviation(index).to_string(), start))
            })
            .collect();
        for txn in transactions.filter(|txn| is_same_year(&txn.date, reference)) {
            if let Some(bucket) = buckets.get_mut(txn.date.month0() as usize) {
                bucket.accumulate(txn);
            }
        }
        buckets
    }
}
