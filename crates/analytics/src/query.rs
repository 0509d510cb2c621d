//! Two-stage query assembly
//!
//! The inner SELECT extracts one row per event (or per distinct entity
//! when a groupable metric asks for it) from the sharded event table. The
//! outer SELECT aggregates those rows per dimension combination.
//!
//! Dimensions are grouped in both stages. Groupable metrics (`sessions`,
//! `users`) are grouped in the inner stage only, so each entity appears
//! once per dimension combination and the outer `COUNT(DISTINCT ...)`
//! counts it once.

use crate::builder::QueryBuilder;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::expression::{DEFAULT_MAX_DEPTH, FilterCompiler};
use crate::request::{OrderBy, QueryRequest, TableRef};
use crate::sql::{ValueQuoting, normalize_name};

/// Options controlling SQL generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Maximum filter expression nesting depth
    pub max_filter_depth: usize,
    /// Literal and identifier quoting policy
    pub quoting: ValueQuoting,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            max_filter_depth: DEFAULT_MAX_DEPTH,
            quoting: ValueQuoting::Verbatim,
        }
    }
}

/// Fragments collected from dimensions and metrics
#[derive(Debug, Default)]
struct Projection {
    inners: Vec<String>,
    outers: Vec<String>,
    inner_groups: Vec<String>,
    outer_groups: Vec<String>,
}

/// Compiles query requests into BigQuery SQL
#[derive(Debug, Clone, Copy)]
pub struct QueryCompiler {
    catalog: &'static Catalog,
    options: CompilerOptions,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}

impl QueryCompiler {
    /// Create a compiler backed by the global catalog
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            catalog: Catalog::global(),
            options,
        }
    }

    /// Options in effect
    pub fn options(&self) -> CompilerOptions {
        self.options
    }

    fn filters(&self) -> FilterCompiler {
        FilterCompiler::new(self.options.max_filter_depth, self.options.quoting)
    }

    /// Compile a request against a table into a single SQL statement
    ///
    /// The result always ends with `;`. Nothing partial is returned on error.
    pub fn build_query(&self, request: &QueryRequest, table: &TableRef) -> Result<String> {
        let quoting = self.options.quoting;
        let projection = self.project(request)?;

        let source = format!(
            "{}.{}.{}_*",
            quoting.table_part(&table.project)?,
            quoting.table_part(&table.dataset)?,
            quoting.table_part(&table.table)?
        );

        let filters = self.filters();
        let mut inner = QueryBuilder::new(source)
            .select_all(projection.inners)
            .where_clause(request.date_range.table_suffix_predicate());
        if let Some(predicate) = non_empty(filters.compile(request.dimension_filter.as_ref())?) {
            inner = inner.where_clause(predicate);
        }
        let inner = inner.group_by(projection.inner_groups).build();

        let mut outer = QueryBuilder::from_subquery(inner)
            .select_all(projection.outers)
            .group_by(projection.outer_groups);
        if let Some(predicate) = non_empty(filters.compile(request.metric_filter.as_ref())?) {
            outer = outer.having(predicate);
        }
        for term in self.order_terms(&request.order_bys)? {
            outer = outer.order_by(term);
        }

        let mut sql = outer.build();
        sql.push(';');

        tracing::debug!(
            dimensions = request.dimensions.len(),
            metrics = request.metrics.len(),
            dimension_filter = request.dimension_filter.is_some(),
            metric_filter = request.metric_filter.is_some(),
            date_range = %request.date_range,
            bytes = sql.len(),
            "compiled analytics query"
        );

        Ok(sql)
    }

    fn project(&self, request: &QueryRequest) -> Result<Projection> {
        let mut projection = Projection::default();

        for dimension in &request.dimensions {
            let statement = self
                .catalog
                .resolve_dimension(dimension, self.options.quoting)?;
            projection.inners.push(statement.inner);
            projection.outers.push(statement.outer);
            if statement.groupable {
                projection.inner_groups.push(statement.name);
                projection.outer_groups.push(statement.pseudo_name);
            }
        }

        for metric in &request.metrics {
            let statement = self.catalog.resolve_metric(&metric.api_name)?;
            projection.inners.push(statement.inner.clone());
            projection.outers.push(statement.outer.clone());
            // Inner stage only; see module docs.
            if statement.groupable {
                projection.inner_groups.push(statement.name.clone());
            }
        }

        Ok(projection)
    }

    fn order_terms(&self, order_bys: &[OrderBy]) -> Result<Vec<String>> {
        order_bys
            .iter()
            .map(|order_by| {
                let name = normalize_name(&order_by.field_name);
                self.options.quoting.identifier(&name)?;
                let direction = if order_by.descending { "DESC" } else { "ASC" };
                Ok(format!("{} {}", name, direction))
            })
            .collect()
    }
}

fn non_empty(predicate: Option<String>) -> Option<String> {
    predicate.filter(|p| !p.trim().is_empty())
}
