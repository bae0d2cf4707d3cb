//! Listing query construction for themes, theses, favorites and comments.
//!
//! # Responsibility
//! - Map typed filter specifications to SQL predicates and bind values.
//! - Produce a page statement and a count statement from one predicate set.
//!
//! # Invariants
//! - Every [`ListQuery`] starts from a mandatory visibility predicate; call
//!   sites cannot build a read that forgets suspension.
//! - Count and page statements share the exact same `WHERE`/`GROUP BY` text
//!   and bind values. Skip/limit exist only on the page statement.
//! - Every ordering ends with an `id` tie-break so pages partition the result.

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;

pub mod pagination;
pub mod theme_query;
pub mod thesis_query;

pub use pagination::{PageSummary, PageWindow, Pagination, PAGE_SIZE};
pub use theme_query::{build_theme_lookup, build_theme_query, NullOrder, ThemeFilter, ThemeSort};
pub use thesis_query::{
    build_comment_lookup, build_comment_query, build_favorite_query, build_theme_theses_query,
    build_thesis_lookup, build_thesis_query, ThesisFilter, ThesisSort,
};

static LIKE_META_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\\%_]").expect("valid like-escape regex"));

pub(crate) const THEME_COLUMNS: &str = "themes.id AS id,
    themes.username AS username,
    themes.title AS title,
    themes.description AS description,
    themes.start_at AS start_at,
    themes.expire_at AS expire_at,
    themes.min_length AS min_length,
    themes.max_length AS max_length,
    themes.is_suspended AS is_suspended,
    themes.created_at AS created_at,
    themes.updated_at AS updated_at";

pub(crate) const THESIS_COLUMNS: &str = "theses.id AS id,
    theses.theme_id AS theme_id,
    theses.username AS username,
    theses.content AS content,
    theses.works_cited AS works_cited,
    theses.is_suspended AS is_suspended,
    theses.created_at AS created_at,
    theses.updated_at AS updated_at";

pub(crate) const COMMENT_COLUMNS: &str = "comments.id AS id,
    comments.thesis_id AS thesis_id,
    comments.username AS username,
    comments.content AS content,
    comments.is_suspended AS is_suspended,
    comments.created_at AS created_at,
    comments.updated_at AS updated_at";

/// SQL text plus positional bind values, ready for `params_from_iter`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<Value>,
}

/// Composable filtered listing over one source relation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    source: String,
    conditions: Vec<String>,
    binds: Vec<Value>,
    group_by: Option<&'static str>,
    order_by: Vec<String>,
}

impl ListQuery {
    /// Starts a query over `source` (a `SELECT ... FROM ... JOIN ...`
    /// fragment) constrained by the mandatory `visibility` predicate.
    pub(crate) fn new(source: impl Into<String>, visibility: &str) -> Self {
        Self {
            source: source.into(),
            conditions: vec![visibility.to_string()],
            binds: Vec::new(),
            group_by: None,
            order_by: Vec::new(),
        }
    }

    pub(crate) fn and_where(
        &mut self,
        clause: impl Into<String>,
        binds: impl IntoIterator<Item = Value>,
    ) {
        self.conditions.push(clause.into());
        self.binds.extend(binds);
    }

    pub(crate) fn group_by(&mut self, column: &'static str) {
        self.group_by = Some(column);
    }

    pub(crate) fn order_by(&mut self, term: impl Into<String>) {
        self.order_by.push(term.into());
    }

    /// Predicates in application order, visibility first.
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Ordering terms in application order.
    pub fn ordering(&self) -> &[String] {
        &self.order_by
    }

    /// Statement returning the ordered rows, optionally windowed.
    pub fn page_statement(&self, window: Option<PageWindow>) -> Statement {
        let mut sql = self.filtered_sql();
        let mut binds = self.binds.clone();

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if let Some(window) = window {
            sql.push_str(" LIMIT ? OFFSET ?");
            binds.push(Value::Integer(window.limit_i64()));
            binds.push(Value::Integer(window.offset_i64()));
        }

        Statement { sql, binds }
    }

    /// Statement returning the total number of rows the page statement
    /// would yield without a window.
    pub fn count_statement(&self) -> Statement {
        Statement {
            sql: format!("SELECT COUNT(*) FROM ({}) AS filtered", self.filtered_sql()),
            binds: self.binds.clone(),
        }
    }

    fn filtered_sql(&self) -> String {
        let mut sql = format!("{} WHERE {}", self.source, self.conditions.join(" AND "));
        if let Some(column) = self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(column);
        }
        sql
    }
}

/// Escapes LIKE metacharacters so a free word matches literally.
pub fn escape_like(word: &str) -> String {
    LIKE_META_RE.replace_all(word, r"\${0}").into_owned()
}

/// Builds `(col1 LIKE ? OR col2 LIKE ? ...)` for one free word.
///
/// Returns `None` for all-whitespace words. Other words match as given,
/// surrounding spaces included.
pub(crate) fn free_word_clause(columns: &[&str], word: &str) -> Option<(String, Vec<Value>)> {
    if word.trim().is_empty() {
        return None;
    }

    let pattern = format!("%{}%", escape_like(word));
    let clause = columns
        .iter()
        .map(|column| format!("{column} LIKE ? ESCAPE '\\'"))
        .collect::<Vec<_>>()
        .join(" OR ");
    let binds = columns
        .iter()
        .map(|_| Value::Text(pattern.clone()))
        .collect();
    Some((format!("({clause})"), binds))
}

/// Builds `column IN (?, ?, ...)` for a non-empty id set.
pub(crate) fn id_set_clause(column: &str, ids: &[i64]) -> Option<(String, Vec<Value>)> {
    if ids.is_empty() {
        return None;
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    Some((
        format!("{column} IN ({placeholders})"),
        ids.iter().map(|id| Value::Integer(*id)).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::{escape_like, free_word_clause, id_set_clause, ListQuery, PageWindow};
    use rusqlite::types::Value;

    #[test]
    fn escape_like_neutralizes_wildcards_and_escape_char() {
        assert_eq!(escape_like("100%"), r"100\%");
        assert_eq!(escape_like("a_b"), r"a\_b");
        assert_eq!(escape_like(r"c\d"), r"c\\d");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn free_word_clause_ors_columns_and_skips_blank_words() {
        let (clause, binds) = free_word_clause(&["a.x", "a.y"], "abc").unwrap();
        assert_eq!(clause, "(a.x LIKE ? ESCAPE '\\' OR a.y LIKE ? ESCAPE '\\')");
        assert_eq!(binds, vec![Value::Text("%abc%".into()), Value::Text("%abc%".into())]);
        assert!(free_word_clause(&["a.x"], "   ").is_none());
        assert!(free_word_clause(&["a.x"], "").is_none());
    }

    #[test]
    fn free_word_clause_keeps_surrounding_spaces() {
        let (_, binds) = free_word_clause(&["a.x"], " abc").unwrap();
        assert_eq!(binds, vec![Value::Text("% abc%".into())]);
    }

    #[test]
    fn id_set_clause_expands_placeholders() {
        let (clause, binds) = id_set_clause("t.id", &[3, 5]).unwrap();
        assert_eq!(clause, "t.id IN (?, ?)");
        assert_eq!(binds.len(), 2);
        assert!(id_set_clause("t.id", &[]).is_none());
    }

    #[test]
    fn count_and_page_share_predicate_and_binds() {
        let mut query = ListQuery::new("SELECT t.id AS id FROM t", "t.hidden = 0");
        query.and_where("t.owner = ?", [Value::Text("bob".into())]);
        query.order_by("t.id ASC");

        let page = query.page_statement(Some(PageWindow::new(200, 100)));
        let count = query.count_statement();

        assert_eq!(
            page.sql,
            "SELECT t.id AS id FROM t WHERE t.hidden = 0 AND t.owner = ? ORDER BY t.id ASC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            count.sql,
            "SELECT COUNT(*) FROM (SELECT t.id AS id FROM t WHERE t.hidden = 0 AND t.owner = ?) AS filtered"
        );
        assert_eq!(count.binds, vec![Value::Text("bob".into())]);
        assert_eq!(
            page.binds,
            vec![
                Value::Text("bob".into()),
                Value::Integer(100),
                Value::Integer(200)
            ]
        );
    }

    #[test]
    fn page_statement_without_window_has_no_limit() {
        let query = ListQuery::new("SELECT 1 FROM t", "t.hidden = 0");
        let page = query.page_statement(None);
        assert!(!page.sql.contains("LIMIT"));
        assert!(page.binds.is_empty());
    }
}
