//! Resolved SQL fragments for a single dimension or metric

/// A dimension or metric lowered to the two query stages
///
/// The inner fragment goes into the per-event SELECT, the outer fragment
/// into the aggregating SELECT that wraps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Whether the name takes part in GROUP BY
    pub groupable: bool,
    /// Column name as produced by the inner stage
    pub name: String,
    /// Column name as seen by the outer stage
    pub pseudo_name: String,
    /// Inner stage SELECT fragment
    pub inner: String,
    /// Outer stage SELECT fragment
    pub outer: String,
}

impl Statement {
    /// Create a statement
    pub fn new(
        groupable: bool,
        name: impl Into<String>,
        pseudo_name: impl Into<String>,
        inner: impl Into<String>,
        outer: impl Into<String>,
    ) -> Self {
        Self {
            groupable,
            name: name.into(),
            pseudo_name: pseudo_name.into(),
            inner: inner.into(),
            outer: outer.into(),
        }
    }
}
