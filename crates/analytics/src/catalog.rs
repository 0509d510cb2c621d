//! Dimension and metric resolution
//!
//! Metrics come from a fixed table built once per process. Dimensions are
//! resolved structurally: any column name is accepted, custom dimensions
//! are pulled out of the `event_params` key/value array.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::error::{AnalyticsError, Result};
use crate::request::Dimension;
use crate::sql::{ValueQuoting, normalize_name};
use crate::statement::Statement;

/// Per-event key/value array holding custom parameters
pub const EVENT_PARAMS: &str = "event_params";

/// Dimension whose `YYYYMMDD` string column is parsed into a DATE
pub const EVENT_DATE: &str = "event_date";

static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::builtin);

/// Read-only mapping from metric identifiers to their statements
#[derive(Debug, Clone)]
pub struct Catalog {
    metrics: BTreeMap<&'static str, Statement>,
}

impl Catalog {
    /// The process-wide catalog
    pub fn global() -> &'static Catalog {
        &CATALOG
    }

    fn builtin() -> Self {
        let mut metrics = BTreeMap::new();

        // One inner row per session id; the outer stage counts them.
        metrics.insert(
            "sessions",
            Statement::new(
                true,
                "sessions",
                "sessions",
                format!(
                    "CONCAT(user_pseudo_id, CAST((SELECT value.int_value FROM UNNEST({}) WHERE key = 'ga_session_id') AS STRING)) AS sessions",
                    EVENT_PARAMS
                ),
                "COUNT(DISTINCT sessions) AS sessions",
            ),
        );
        metrics.insert(
            "revenue",
            Statement::new(
                false,
                "revenue",
                "revenue",
                "SUM(ecommerce.purchase_revenue) AS revenue",
                "SUM(revenue) AS revenue",
            ),
        );
        metrics.insert(
            "events",
            Statement::new(
                false,
                "events",
                "events",
                "COUNT(event_name) AS events",
                "SUM(events) AS events",
            ),
        );
        // Grouped on the raw id in the inner stage, exposed as `users` outside.
        metrics.insert(
            "users",
            Statement::new(
                true,
                "user_pseudo_id",
                "users",
                "user_pseudo_id",
                "COUNT(DISTINCT user_pseudo_id) AS users",
            ),
        );

        Self { metrics }
    }

    /// Look up a metric by identifier
    pub fn resolve_metric(&self, key: &str) -> Result<&Statement> {
        self.metrics.get(key).ok_or_else(|| {
            tracing::warn!(metric = key, "unsupported metric");
            AnalyticsError::unsupported_metric(key)
        })
    }

    /// Resolve a dimension into its statement
    ///
    /// Never fails for [`ValueQuoting::Verbatim`]. Escaped quoting rejects
    /// names that are not plain identifiers.
    pub fn resolve_dimension(
        &self,
        dimension: &Dimension,
        quoting: ValueQuoting,
    ) -> Result<Statement> {
        let alias = normalize_name(&dimension.api_name);
        quoting.identifier(&alias)?;

        let inner = if dimension.custom {
            format!(
                "(SELECT value.string_value FROM UNNEST({}) WHERE key = {}) AS {}",
                EVENT_PARAMS,
                quoting.string(&dimension.api_name),
                alias
            )
        } else if dimension.api_name == EVENT_DATE {
            format!("PARSE_DATE('%Y%m%d', {}) AS {}", EVENT_DATE, alias)
        } else {
            format!("{} AS {}", quoting.identifier(&dimension.api_name)?, alias)
        };

        Ok(Statement::new(true, alias.clone(), alias.clone(), inner, alias))
    }

    /// Known metric identifiers, sorted
    pub fn metric_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.metrics.keys().copied()
    }

    /// Known metrics with their statements, sorted by identifier
    pub fn metrics(&self) -> impl Iterator<Item = (&'static str, &Statement)> {
        self.metrics.iter().map(|(k, v)| (*k, v))
    }
}
