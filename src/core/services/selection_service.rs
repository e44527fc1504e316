use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{in_period, Granularity, Transaction, TransactionKind};
use crate::errors::ExpenseError;

/// Which kinds a view admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TypeFilter {
    pub fn admits(self, kind: TransactionKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => kind == TransactionKind::Income,
            TypeFilter::Expense => kind == TransactionKind::Expense,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TypeFilter::All => "all",
            TypeFilter::Income => "income",
            TypeFilter::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for TypeFilter {
    type Err = ExpenseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "income" => Ok(TypeFilter::Income),
            "expense" => Ok(TypeFilter::Expense),
            other => Err(ExpenseError::InvalidInput(format!(
                "unknown type filter `{other}` (expected all, income or expense)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Amount,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortField::Date => "date",
            SortField::Amount => "amount",
        })
    }
}

impl FromStr for SortField {
    type Err = ExpenseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortField::Date),
            "amount" => Ok(SortField::Amount),
            other => Err(ExpenseError::InvalidInput(format!(
                "unknown sort field `{other}` (expected date or amount)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

impl FromStr for SortDirection {
    type Err = ExpenseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(ExpenseError::InvalidInput(format!(
                "unknown sort direction `{other}` (expected asc or desc)"
            ))),
        }
    }
}

/// Everything the list and chart views filter on.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionQuery {
    pub keyword: String,
    pub type_filter: TypeFilter,
    pub reference: NaiveDate,
    pub granularity: Granularity,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl SelectionQuery {
    /// Empty keyword, all kinds, month view, newest first.
    pub fn new(reference: NaiveDate) -> Self {
        Self {
            keyword: String::new(),
            type_filter: TypeFilter::default(),
            reference,
            granularity: Granularity::default(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
        }
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub fn type_filter(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.sort_direction = direction;
        self
    }
}

/// Period aggregates over a filtered set. `total` is always `income - expense`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PeriodTotals {
    pub income: f64,
    pub expense: f64,
    pub total: f64,
}

impl PeriodTotals {
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let (income, expense) =
            transactions
                .into_iter()
                .fold((0.0, 0.0), |(income, expense), txn| match txn.kind {
                    TransactionKind::Income => (income + txn.amount, expense),
                    TransactionKind::Expense => (income, expense + txn.amount),
                });
        Self {
            income,
            expense,
            total: income - expense,
        }
    }
}

/// Filtered, sorted records plus the totals derived from exactly that set.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub transactions: Vec<Transaction>,
    pub totals: PeriodTotals,
}

pub struct SelectionService;

impl SelectionService {
    /// Keyword AND type AND period filter, then a stable sort. Totals are
    /// recomputed from the surviving records on every call.
    pub fn select(transactions: &[Transaction], query: &SelectionQuery) -> Selection {
        let needle = query.keyword.to_lowercase();
        let mut selected: Vec<Transaction> = transactions
            .iter()
            .filter(|txn| Self::matches(txn, &needle, query))
            .cloned()
            .collect();
        Self::sort(&mut selected, query.sort_field, query.sort_direction);
        let totals = PeriodTotals::from_transactions(&selected);
        Selection {
            transactions: selected,
            totals,
        }
    }

    fn matches(txn: &Transaction, needle: &str, query: &SelectionQuery) -> bool {
        txn.matches_keyword(needle)
            && query.type_filter.admits(txn.kind)
            && in_period(&txn.date, &query.reference, query.granularity)
    }

    /// Stable sort; equal keys keep their insertion order in both directions.
    pub fn sort(transactions: &mut [Transaction], field: SortField, direction: SortDirection) {
        transactions.sort_by(|a, b| {
            let ordering = Self::compare(a, b, field);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    fn compare(a: &Transaction, b: &Transaction, field: SortField) -> Ordering {
        match field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.total_cmp(&b.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn txn(title: &str, amount: f64, date: NaiveDateTime, kind: TransactionKind) -> Transaction {
        Transaction::new(title, amount, date, kind)
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("Salary", 3000.0, at(2024, 2, 28), TransactionKind::Income),
            txn("Groceries", 120.0, at(2024, 3, 2), TransactionKind::Expense)
                .with_description("weekly market"),
            txn("Rent", 900.0, at(2024, 3, 1), TransactionKind::Expense),
            txn("Old rent", 850.0, at(2024, 1, 1), TransactionKind::Expense),
            txn("Refund", 20.0, at(2024, 3, 25), TransactionKind::Income),
            txn("Late coffee", 4.0, at(2024, 3, 26), TransactionKind::Expense),
        ]
    }

    fn march() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn titles(selection: &Selection) -> Vec<&str> {
        selection
            .transactions
            .iter()
            .map(|txn| txn.title.as_str())
            .collect()
    }

    #[test]
    fn month_view_keeps_only_the_custom_window() {
        let selection = SelectionService::select(&sample(), &SelectionQuery::new(march()));
        assert_eq!(
            titles(&selection),
            vec!["Refund", "Groceries", "Rent", "Salary"]
        );
    }

    #[test]
    fn year_view_uses_calendar_year() {
        let query = SelectionQuery::new(march())
            .granularity(Granularity::Year)
            .sort(SortField::Date, SortDirection::Asc);
        let selection = SelectionService::select(&sample(), &query);
        assert_eq!(selection.transactions.len(), 6);
        assert_eq!(selection.transactions[0].title, "Old rent");
    }

    #[test]
    fn keyword_is_case_insensitive_over_title_and_description() {
        let query = SelectionQuery::new(march()).keyword("MARKET");
        assert_eq!(
            titles(&SelectionService::select(&sample(), &query)),
            vec!["Groceries"]
        );
        let query = SelectionQuery::new(march()).keyword("rEnT");
        assert_eq!(
            titles(&SelectionService::select(&sample(), &query)),
            vec!["Rent"]
        );
    }

    #[test]
    fn type_filter_is_exact() {
        let query = SelectionQuery::new(march()).type_filter(TypeFilter::Income);
        let selection = SelectionService::select(&sample(), &query);
        assert!(selection.transactions.iter().all(Transaction::is_income));
        assert_eq!(selection.totals.expense, 0.0);
        assert_eq!(selection.totals.income, 3020.0);
    }

    #[test]
    fn totals_come_from_the_filtered_set() {
        let selection = SelectionService::select(&sample(), &SelectionQuery::new(march()));
        assert_eq!(selection.totals.income, 3020.0);
        assert_eq!(selection.totals.expense, 1020.0);
        assert_eq!(selection.totals.total, 2000.0);

        let narrowed = SelectionService::select(
            &sample(),
            &SelectionQuery::new(march()).keyword("rent"),
        );
        assert_eq!(narrowed.totals.income, 0.0);
        assert_eq!(narrowed.totals.expense, 900.0);
        assert_eq!(narrowed.totals.total, -900.0);
    }

    #[test]
    fn total_identity_holds_for_every_filter_combination() {
        let data = sample();
        for keyword in ["", "r", "salary", "zzz"] {
            for type_filter in [TypeFilter::All, TypeFilter::Income, TypeFilter::Expense] {
                for granularity in [Granularity::Month, Granularity::Year] {
                    let query = SelectionQuery::new(march())
                        .keyword(keyword)
                        .type_filter(type_filter)
                        .granularity(granularity);
                    let totals = SelectionService::select(&data, &query).totals;
                    assert_eq!(totals.income - totals.expense, totals.total);
                }
            }
        }
    }

    #[test]
    fn sort_is_stable_for_equal_keys_in_both_directions() {
        let day = at(2024, 3, 5);
        let data = vec![
            txn("first", 10.0, day, TransactionKind::Expense),
            txn("second", 10.0, day, TransactionKind::Expense),
            txn("third", 10.0, day, TransactionKind::Income),
        ];
        for field in [SortField::Date, SortField::Amount] {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let query = SelectionQuery::new(march()).sort(field, direction);
                assert_eq!(
                    titles(&SelectionService::select(&data, &query)),
                    vec!["first", "second", "third"],
                    "{field} {direction}"
                );
            }
        }
    }

    #[test]
    fn amount_sort_orders_numerically() {
        let query = SelectionQuery::new(march()).sort(SortField::Amount, SortDirection::Asc);
        let amounts: Vec<f64> = SelectionService::select(&sample(), &query)
            .transactions
            .iter()
            .map(|txn| txn.amount)
            .collect();
        assert_eq!(amounts, vec![20.0, 120.0, 900.0, 3000.0]);
    }

    #[test]
    fn filters_parse_from_text() {
        assert_eq!("Expense".parse::<TypeFilter>().unwrap(), TypeFilter::Expense);
        assert_eq!("amount".parse::<SortField>().unwrap(), SortField::Amount);
        assert_eq!("ascending".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
