//! Filter expression trees
//!
//! A filter expression is an AND group, an OR group or a single leaf
//! filter. The sum types make "exactly one variant" structural; the wire
//! decoding in this module enforces it for client documents, where every
//! variant arrives as an optional field.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Boolean filter tree
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    /// All children must hold
    And(Vec<FilterExpression>),
    /// At least one child must hold
    Or(Vec<FilterExpression>),
    /// Leaf comparison
    Filter(Filter),
}

impl FilterExpression {
    /// Create an AND group (must not be empty)
    pub fn and(expressions: Vec<FilterExpression>) -> Result<Self> {
        non_empty(&expressions)?;
        Ok(Self::And(expressions))
    }

    /// Create an OR group (must not be empty)
    pub fn or(expressions: Vec<FilterExpression>) -> Result<Self> {
        non_empty(&expressions)?;
        Ok(Self::Or(expressions))
    }

    /// Create a leaf expression
    pub fn filter(filter: Filter) -> Self {
        Self::Filter(filter)
    }
}

fn non_empty(expressions: &[FilterExpression]) -> Result<()> {
    if expressions.is_empty() {
        return Err(AnalyticsError::construction(
            "filter group must contain at least one expression",
        ));
    }
    Ok(())
}

/// A comparison on a single field
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column name, or custom parameter key when `custom` is set
    pub field_name: String,
    /// Field lives in the `event_params` key/value array
    pub custom: bool,
    /// The comparison itself
    pub kind: FilterKind,
}

impl Filter {
    /// Create a filter on a top-level column
    pub fn new(field_name: impl Into<String>, kind: impl Into<FilterKind>) -> Self {
        Self {
            field_name: field_name.into(),
            custom: false,
            kind: kind.into(),
        }
    }

    /// Create a filter on a custom event parameter
    pub fn custom(field_name: impl Into<String>, kind: impl Into<FilterKind>) -> Self {
        Self {
            field_name: field_name.into(),
            custom: true,
            kind: kind.into(),
        }
    }
}

/// The sub-filter of a [`Filter`]
#[derive(Debug, Clone, PartialEq)]
pub enum FilterKind {
    /// String comparison
    String(StringFilter),
    /// Numeric comparison
    Numeric(NumericFilter),
    /// Membership in a list of values (no compiled form)
    InList(InListFilter),
    /// Numeric range (no compiled form)
    Between(BetweenFilter),
}

impl FilterKind {
    /// Wire name of this sub-filter
    pub fn name(&self) -> &'static str {
        match self {
            Self::String(_) => "stringFilter",
            Self::Numeric(_) => "numericFilter",
            Self::InList(_) => "inListFilter",
            Self::Between(_) => "betweenFilter",
        }
    }
}

impl From<StringFilter> for FilterKind {
    fn from(f: StringFilter) -> Self {
        Self::String(f)
    }
}

impl From<NumericFilter> for FilterKind {
    fn from(f: NumericFilter) -> Self {
        Self::Numeric(f)
    }
}

impl From<InListFilter> for FilterKind {
    fn from(f: InListFilter) -> Self {
        Self::InList(f)
    }
}

impl From<BetweenFilter> for FilterKind {
    fn from(f: BetweenFilter) -> Self {
        Self::Between(f)
    }
}

/// String match semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    /// Equal
    #[serde(alias = "MATCH_EXACT")]
    Exact,
    /// Not equal
    #[serde(alias = "NOT_MATCH_EXACT")]
    NotExact,
    /// Regular expression matches
    MatchRegex,
    /// Regular expression does not match
    NotMatchRegex,
    /// Prefix
    BeginsWith,
    /// Suffix
    EndsWith,
    /// Substring
    Contains,
}

/// String comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFilter {
    /// How the value is compared
    pub match_type: MatchType,
    /// Value to compare against
    pub value: String,
    /// Accepted but not applied; comparisons follow the column collation
    #[serde(default)]
    pub case_sensitive: bool,
}

impl StringFilter {
    /// Create a case-insensitive string filter
    pub fn new(match_type: MatchType, value: impl Into<String>) -> Self {
        Self {
            match_type,
            value: value.into(),
            case_sensitive: false,
        }
    }
}

/// Numeric comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumericOperation {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
}

impl NumericOperation {
    /// SQL comparison operator
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
        }
    }
}

/// Numeric comparison
///
/// The value stays a pre-stringified literal; it is never parsed into a
/// number unless escaped quoting asks for validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericFilter {
    /// Comparison operator
    pub operation: NumericOperation,
    /// Numeric literal
    pub value: String,
}

impl NumericFilter {
    /// Create a numeric filter
    pub fn new(operation: NumericOperation, value: impl Into<String>) -> Self {
        Self {
            operation,
            value: value.into(),
        }
    }
}

/// List membership
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InListFilter {
    /// Accepted values
    #[serde(default)]
    pub values: Vec<String>,
    /// Case sensitivity flag
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Numeric range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetweenFilter {
    /// Lower bound
    pub from_value: f64,
    /// Upper bound
    pub to_value: f64,
}

// Wire decoding

/// Filter expression as sent by clients: one optional field per variant
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawFilterExpression {
    and_group: Option<RawExpressionList>,
    or_group: Option<RawExpressionList>,
    filter: Option<RawFilter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawExpressionList {
    #[serde(default)]
    expressions: Vec<RawFilterExpression>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawFilter {
    field_name: String,
    #[serde(default)]
    custom: bool,
    string_filter: Option<StringFilter>,
    numeric_filter: Option<NumericFilter>,
    in_list_filter: Option<InListFilter>,
    between_filter: Option<BetweenFilter>,
}

impl TryFrom<RawFilterExpression> for FilterExpression {
    type Error = AnalyticsError;

    fn try_from(raw: RawFilterExpression) -> Result<Self> {
        match (raw.and_group, raw.or_group, raw.filter) {
            (Some(group), None, None) => Self::and(decode_list(group)?),
            (None, Some(group), None) => Self::or(decode_list(group)?),
            (None, None, Some(filter)) => Ok(Self::Filter(filter.try_into()?)),
            _ => Err(AnalyticsError::construction(
                "exactly one of andGroup, orGroup or filter must be set",
            )),
        }
    }
}

fn decode_list(list: RawExpressionList) -> Result<Vec<FilterExpression>> {
    list.expressions
        .into_iter()
        .map(FilterExpression::try_from)
        .collect()
}

impl TryFrom<RawFilter> for Filter {
    type Error = AnalyticsError;

    fn try_from(raw: RawFilter) -> Result<Self> {
        let mut kinds: Vec<FilterKind> = Vec::with_capacity(1);
        kinds.extend(raw.string_filter.map(FilterKind::String));
        kinds.extend(raw.numeric_filter.map(FilterKind::Numeric));
        kinds.extend(raw.in_list_filter.map(FilterKind::InList));
        kinds.extend(raw.between_filter.map(FilterKind::Between));

        if kinds.len() > 1 {
            return Err(AnalyticsError::construction(format!(
                "filter on '{}' sets more than one filter type",
                raw.field_name
            )));
        }
        let kind = kinds.pop().ok_or_else(|| {
            AnalyticsError::construction(format!(
                "filter on '{}' sets no filter type",
                raw.field_name
            ))
        })?;

        Ok(Self {
            field_name: raw.field_name,
            custom: raw.custom,
            kind,
        })
    }
}
