//! Lens Analytics Query Compiler
//!
//! Compiles GA4-style analytics requests into BigQuery SQL.
//!
//! # Overview
//!
//! A request names dimensions, metrics, a date range, a dimension filter
//! (WHERE), a metric filter (HAVING) and an ordering. This crate turns it
//! into one SQL statement over a day-sharded event table:
//!
//! - **Catalog**: metric identifiers and dimension names → SQL fragments
//! - **Filters**: recursive, depth-bounded boolean filter trees
//! - **Query Compiler**: two-stage SELECT (per-event inner, aggregating outer)
//!
//! The crate is pure: it never talks to the warehouse. Executing the SQL
//! is up to the caller.
//!
//! # Usage
//!
//! ```
//! use lens_analytics::{DateRange, Dimension, Metric, QueryCompiler, QueryRequest, TableRef};
//!
//! let range = DateRange::parse("2024-01-01,2024-01-31").unwrap();
//! let request = QueryRequest::new(range)
//!     .with_dimension(Dimension::new("device.category"))
//!     .with_metric(Metric::new("users"));
//!
//! let table = TableRef::new("my-project", "analytics_123", "events");
//! let sql = QueryCompiler::default().build_query(&request, &table).unwrap();
//! assert!(sql.contains("`my-project.analytics_123.events_*`"));
//! ```

pub mod builder;
pub mod catalog;
pub mod daterange;
pub mod error;
pub mod expression;
pub mod filter;
pub mod query;
pub mod request;
pub mod sql;
pub mod statement;

#[cfg(test)]
mod catalog_test;
#[cfg(test)]
mod daterange_test;

// Re-exports for convenience
pub use builder::QueryBuilder;
pub use catalog::Catalog;
pub use daterange::DateRange;
pub use error::{AnalyticsError, Result};
pub use expression::{DEFAULT_MAX_DEPTH, FilterCompiler};
pub use filter::{
    BetweenFilter, Filter, FilterExpression, FilterKind, InListFilter, MatchType, NumericFilter,
    NumericOperation, StringFilter,
};
pub use query::{CompilerOptions, QueryCompiler};
pub use request::{Dimension, Metric, OrderBy, QueryRequest, TableRef};
pub use sql::ValueQuoting;
pub use statement::Statement;
