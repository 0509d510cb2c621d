//! Filter expression compiler
//!
//! Lowers a [`FilterExpression`] tree into a SQL predicate. Recursion is
//! bounded by an explicit depth counter so hostile nesting fails with
//! [`AnalyticsError::DepthExceeded`] instead of exhausting the stack.
//!
//! Group rules:
//! - children compiling to an empty predicate are dropped
//! - no survivors: the group compiles to an empty predicate
//! - one survivor: returned as is, without parentheses
//! - several: joined with the group operator and parenthesized

use crate::catalog::EVENT_PARAMS;
use crate::error::{AnalyticsError, Result};
use crate::filter::{Filter, FilterExpression, FilterKind, MatchType, NumericFilter, StringFilter};
use crate::sql::ValueQuoting;

/// Default maximum nesting depth of a filter expression
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Compiles filter expressions into SQL predicates
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler {
    max_depth: usize,
    quoting: ValueQuoting,
}

impl Default for FilterCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH, ValueQuoting::default())
    }
}

impl FilterCompiler {
    /// Create a compiler
    pub fn new(max_depth: usize, quoting: ValueQuoting) -> Self {
        Self { max_depth, quoting }
    }

    /// Maximum nesting depth
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Compile an optional expression
    ///
    /// `None` means no filter and yields `None`. A tree whose groups all
    /// vanish yields `Some("")`.
    pub fn compile(&self, expression: Option<&FilterExpression>) -> Result<Option<String>> {
        self.compile_at(expression, 0)
    }

    /// Compile an expression found at `depth` (root callers pass 0)
    ///
    /// Every node, leaves included, counts as one level. An absent
    /// expression is not a node and never fails.
    pub fn compile_at(
        &self,
        expression: Option<&FilterExpression>,
        depth: usize,
    ) -> Result<Option<String>> {
        let Some(expression) = expression else {
            return Ok(None);
        };

        let depth = depth + 1;
        if depth > self.max_depth {
            tracing::warn!(max_depth = self.max_depth, "filter expression too deep");
            return Err(AnalyticsError::DepthExceeded {
                max: self.max_depth,
            });
        }

        match expression {
            FilterExpression::And(children) => self.group(children, "AND", depth).map(Some),
            FilterExpression::Or(children) => self.group(children, "OR", depth).map(Some),
            FilterExpression::Filter(filter) => self.leaf(filter).map(Some),
        }
    }

    fn group(&self, children: &[FilterExpression], operator: &str, depth: usize) -> Result<String> {
        let mut parts = Vec::with_capacity(children.len());
        for child in children {
            match self.compile_at(Some(child), depth)? {
                Some(sql) if !sql.is_empty() => parts.push(sql),
                _ => {}
            }
        }

        Ok(match parts.len() {
            0 => String::new(),
            1 => parts.swap_remove(0),
            _ => format!("({})", parts.join(&format!(" {} ", operator))),
        })
    }

    /// Compile a single leaf filter
    pub fn leaf(&self, filter: &Filter) -> Result<String> {
        match &filter.kind {
            FilterKind::String(string_filter) if filter.custom => Ok(format!(
                "EXISTS(SELECT 1 FROM UNNEST({}) WHERE key = {} AND {})",
                EVENT_PARAMS,
                self.quoting.string(&filter.field_name),
                self.string_predicate(string_filter, "value.string_value")
            )),
            FilterKind::String(string_filter) => {
                let field = self.quoting.identifier(&filter.field_name)?;
                Ok(self.string_predicate(string_filter, field))
            }
            FilterKind::Numeric(numeric) => self.numeric_predicate(numeric, &filter.field_name),
            kind @ (FilterKind::InList(_) | FilterKind::Between(_)) => {
                tracing::warn!(
                    field = %filter.field_name,
                    kind = kind.name(),
                    "unsupported filter kind"
                );
                Err(AnalyticsError::UnsupportedFilterKind(kind.name()))
            }
        }
    }

    fn string_predicate(&self, filter: &StringFilter, field: &str) -> String {
        let q = &self.quoting;
        let value = filter.value.as_str();
        match filter.match_type {
            MatchType::Exact => format!("{} = {}", field, q.string(value)),
            MatchType::NotExact => format!("{} != {}", field, q.string(value)),
            MatchType::MatchRegex => format!("REGEXP_CONTAINS({}, {})", field, q.regex(value)),
            MatchType::NotMatchRegex => {
                format!("NOT REGEXP_CONTAINS({}, {})", field, q.regex(value))
            }
            MatchType::BeginsWith => format!("{} LIKE {}", field, q.like("", value, "%")),
            MatchType::EndsWith => format!("{} LIKE {}", field, q.like("%", value, "")),
            MatchType::Contains => format!("{} LIKE {}", field, q.like("%", value, "%")),
        }
    }

    fn numeric_predicate(&self, filter: &NumericFilter, field: &str) -> Result<String> {
        Ok(format!(
            "{} {} {}",
            self.quoting.identifier(field)?,
            filter.operation.as_sql(),
            self.quoting.number(&filter.value)?
        ))
    }
}
