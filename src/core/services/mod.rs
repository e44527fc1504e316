pub mod aggregation_service;
pub mod selection_service;

pub use aggregation_service::{AggregationService, Bucket, ChartSeries};
pub use selection_service::{
    PeriodTotals, Selection, SelectionQuery, SelectionService, SortDirection, SortField,
    TypeFilter,
};
