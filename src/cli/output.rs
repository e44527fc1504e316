use colored::Colorize;

use crate::core::services::{ChartSeries, PeriodTotals, Selection, TypeFilter};
use crate::domain::{Transaction, TransactionKind};

const BAR_WIDTH: usize = 40;

/// `$12.50`, or `-$12.50` for negative values.
pub fn format_money(amount: f64, symbol: &str) -> String {
    if amount < 0.0 {
        format!("-{symbol}{:.2}", amount.abs())
    } else {
        format!("{symbol}{:.2}", amount)
    }
}

/// Row amount with the sign implied by the kind: `+$50.00` / `-$30.00`.
pub fn format_signed_amount(txn: &Transaction, symbol: &str) -> String {
    let sign = match txn.kind {
        TransactionKind::Income => '+',
        TransactionKind::Expense => '-',
    };
    format!("{sign}{symbol}{:.2}", txn.amount)
}

/// Row date: `Mar 5, 2024`.
pub fn format_row_date(txn: &Transaction) -> String {
    txn.date.format("%b %-d, %Y").to_string()
}

pub fn render_totals(totals: &PeriodTotals, symbol: &str) -> String {
    format!(
        "Income: {}  Expense: {}  Total: {}",
        format_money(totals.income, symbol),
        format_money(totals.expense, symbol),
        format_money(totals.total, symbol)
    )
}

pub fn render_row(txn: &Transaction, symbol: &str) -> String {
    let amount = format!("{:>12}", format_signed_amount(txn, symbol));
    let amount = match txn.kind {
        TransactionKind::Income => amount.green().to_string(),
        TransactionKind::Expense => amount.red().to_string(),
    };
    let mut row = format!(
        "{:<13} {:<24} {}  {}",
        format_row_date(txn),
        truncate(&txn.title, 24),
        amount,
        txn.id.to_string().dimmed()
    );
    if !txn.description.is_empty() {
        row.push_str(&format!("\n{:<13} {}", "", txn.description.italic()));
    }
    row
}

pub fn render_list(selection: &Selection, symbol: &str) -> Vec<String> {
    if selection.transactions.is_empty() {
        return vec!["No transactions in this period.".to_string()];
    }
    selection
        .transactions
        .iter()
        .map(|txn| render_row(txn, symbol))
        .collect()
}

/// Horizontal bar per bucket, scaled to the tallest displayed bar.
pub fn render_chart(series: &ChartSeries, cap: Option<f64>, symbol: &str) -> Vec<String> {
    let values = series.display_values(cap);
    let tallest = values.iter().cloned().fold(0.0, f64::max);
    series
        .buckets
        .iter()
        .zip(values)
        .map(|(bucket, shown)| {
            let width = if tallest > 0.0 {
                ((shown / tallest) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let bar = "#".repeat(width);
            let mut line = format!(
                "{:>3} | {:<width$} {}",
                bucket.label,
                bar,
                format_money(bucket.sum, symbol),
                width = BAR_WIDTH
            );
            if series.type_filter == TypeFilter::All && bucket.sum > 0.0 {
                line.push_str(&format!(
                    " ({} / {})",
                    format!("+{}", format_money(bucket.income, symbol)).green(),
                    format!("-{}", format_money(bucket.expense, symbol)).red()
                ));
            }
            line
        })
        .collect()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}
