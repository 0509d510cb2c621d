//! SELECT statement builder
//!
//! Builds one BigQuery SELECT with support for:
//! - a table or a derived table as source
//! - WHERE clauses (joined with AND)
//! - GROUP BY and HAVING
//! - ORDER BY

/// Row source of a SELECT
#[derive(Debug, Clone)]
enum Source {
    /// Backtick-quoted table reference
    Table(String),
    /// Parenthesized derived table
    Subquery(String),
}

/// Builder for a single SELECT statement
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    source: Source,
    select: Vec<String>,
    where_clauses: Vec<String>,
    group_by: Vec<String>,
    having: Option<String>,
    order_by: Vec<String>,
}

impl QueryBuilder {
    /// Create a builder reading from a table
    pub fn new(table: impl Into<String>) -> Self {
        Self::with_source(Source::Table(table.into()))
    }

    /// Create a builder reading from a derived table
    pub fn from_subquery(sql: impl Into<String>) -> Self {
        Self::with_source(Source::Subquery(sql.into()))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            select: Vec::new(),
            where_clauses: Vec::new(),
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
        }
    }

    /// Add a SELECT column
    pub fn select(mut self, column: impl Into<String>) -> Self {
        self.select.push(column.into());
        self
    }

    /// Add several SELECT columns
    pub fn select_all<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a WHERE clause
    pub fn where_clause(mut self, clause: impl Into<String>) -> Self {
        self.where_clauses.push(clause.into());
        self
    }

    /// Add GROUP BY columns
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Set the HAVING predicate
    pub fn having(mut self, predicate: impl Into<String>) -> Self {
        self.having = Some(predicate.into());
        self
    }

    /// Add an ORDER BY term
    pub fn order_by(mut self, term: impl Into<String>) -> Self {
        self.order_by.push(term.into());
        self
    }

    /// Build the SQL text (no trailing semicolon)
    pub fn build(self) -> String {
        let mut sql = String::new();

        // SELECT
        sql.push_str("SELECT ");
        if self.select.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select.join(", "));
        }

        // FROM
        sql.push_str(" FROM ");
        match &self.source {
            Source::Table(table) => {
                sql.push('`');
                sql.push_str(table);
                sql.push('`');
            }
            Source::Subquery(inner) => {
                sql.push('(');
                sql.push_str(inner);
                sql.push(')');
            }
        }

        // WHERE
        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        // GROUP BY
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        // HAVING
        if let Some(having) = &self.having {
            sql.push_str(" HAVING ");
            sql.push_str(having);
        }

        // ORDER BY
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        sql
    }
}
