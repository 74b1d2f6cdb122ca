//! Loan Request Analytics
//!
//! Builds exploratory chart data (Plotly figure JSON) and summary statistics
//! over the stored loan requests.

mod charts;
mod dashboard;

pub use charts::{Figure, Trace, ValueCounts};
pub use dashboard::{build_dashboard, ColumnSummary, Dashboard, NO_DATA_MESSAGE};
