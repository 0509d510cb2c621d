//! Query request model
//!
//! Requests arrive as JSON documents produced by an upstream validation
//! layer. Decoding goes through loose wire structs first so that shape
//! violations surface as [`AnalyticsError::Construction`].

use serde::{Deserialize, Serialize};

use crate::daterange::{DateRange, parse_bound};
use crate::error::{AnalyticsError, Result};
use crate::filter::{FilterExpression, RawFilterExpression};

/// A reporting dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    /// Value comes from the `event_params` key/value array
    #[serde(default)]
    pub custom: bool,
    /// Column name (possibly dotted) or custom parameter key
    pub api_name: String,
    /// Human readable label
    #[serde(default, rename = "name")]
    pub display_name: String,
}

impl Dimension {
    /// Top-level column dimension
    pub fn new(api_name: impl Into<String>) -> Self {
        let api_name = api_name.into();
        Self {
            custom: false,
            display_name: api_name.clone(),
            api_name,
        }
    }

    /// Custom event parameter dimension
    pub fn custom(api_name: impl Into<String>) -> Self {
        Self {
            custom: true,
            ..Self::new(api_name)
        }
    }
}

/// A reporting metric; `api_name` must be a catalog key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Ignored: every metric comes from the catalog
    #[serde(default)]
    pub custom: bool,
    /// Catalog key
    pub api_name: String,
    /// Human readable label
    #[serde(default, rename = "name")]
    pub display_name: String,
}

impl Metric {
    /// Create a metric reference
    pub fn new(api_name: impl Into<String>) -> Self {
        let api_name = api_name.into();
        Self {
            custom: false,
            display_name: api_name.clone(),
            api_name,
        }
    }
}

/// Result ordering entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    /// Column to order by (dotted names are normalized)
    pub field_name: String,
    /// Descending order
    #[serde(default, rename = "desc")]
    pub descending: bool,
}

impl OrderBy {
    /// Ascending order
    pub fn asc(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            descending: false,
        }
    }

    /// Descending order
    pub fn desc(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            descending: true,
        }
    }
}

/// Coordinates of the sharded event table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    /// Cloud project id
    pub project: String,
    /// Dataset (analytics property) id
    pub dataset: String,
    /// Table prefix, without the date suffix
    pub table: String,
}

impl TableRef {
    /// Create a table reference
    pub fn new(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            dataset: dataset.into(),
            table: table.into(),
        }
    }
}

/// A complete analytics query request
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Grouping dimensions
    pub dimensions: Vec<Dimension>,
    /// Aggregated metrics
    pub metrics: Vec<Metric>,
    /// Inclusive date range
    pub date_range: DateRange,
    /// Predicate on dimensions (WHERE)
    pub dimension_filter: Option<FilterExpression>,
    /// Predicate on metrics (HAVING)
    pub metric_filter: Option<FilterExpression>,
    /// Result ordering
    pub order_bys: Vec<OrderBy>,
}

impl QueryRequest {
    /// Create a request covering a date range
    pub fn new(date_range: DateRange) -> Self {
        Self {
            dimensions: Vec::new(),
            metrics: Vec::new(),
            date_range,
            dimension_filter: None,
            metric_filter: None,
            order_bys: Vec::new(),
        }
    }

    /// Add a dimension
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Add a metric
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Set the dimension filter
    pub fn with_dimension_filter(mut self, filter: FilterExpression) -> Self {
        self.dimension_filter = Some(filter);
        self
    }

    /// Set the metric filter
    pub fn with_metric_filter(mut self, filter: FilterExpression) -> Self {
        self.metric_filter = Some(filter);
        self
    }

    /// Add an ordering entry
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_bys.push(order_by);
        self
    }

    /// Decode a request from its JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawQueryRequest = serde_json::from_str(json)?;
        raw.try_into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQueryRequest {
    #[serde(default)]
    dimensions: Vec<Dimension>,
    #[serde(default)]
    metrics: Vec<Metric>,
    date_range: RawDateRange,
    metric_filter: Option<RawFilterExpression>,
    dimension_filter: Option<RawFilterExpression>,
    order_bys: Option<Vec<OrderBy>>,
}

#[derive(Debug, Deserialize)]
struct RawDateRange {
    start: String,
    end: String,
}

impl TryFrom<RawQueryRequest> for QueryRequest {
    type Error = AnalyticsError;

    fn try_from(raw: RawQueryRequest) -> Result<Self> {
        let date_range = DateRange::new(
            parse_bound(&raw.date_range.start)?,
            parse_bound(&raw.date_range.end)?,
        )?;

        Ok(Self {
            dimensions: raw.dimensions,
            metrics: raw.metrics,
            date_range,
            dimension_filter: raw.dimension_filter.map(FilterExpression::try_from).transpose()?,
            metric_filter: raw.metric_filter.map(FilterExpression::try_from).transpose()?,
            order_bys: raw.order_bys.unwrap_or_default(),
        })
    }
}
