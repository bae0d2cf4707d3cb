//! Comment persistence and listing execution.

use super::{
    datetime_to_ms, flag_from_db, ms_to_datetime, optional_ms_to_datetime, query_count,
    query_first, query_rows, RepoError, RepoResult, SqliteStore,
};
use crate::model::comment::{Comment, CommentId, NewComment};
use crate::model::thesis::ThesisId;
use crate::query::{build_comment_lookup, build_comment_query, PageWindow};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

pub trait CommentRepository {
    fn list_comments(
        &self,
        thesis_id: ThesisId,
        window: Option<PageWindow>,
    ) -> RepoResult<Vec<Comment>>;
    fn count_comments(&self, thesis_id: ThesisId) -> RepoResult<u64>;
    /// Visible comment by id.
    fn get_comment(&self, comment_id: CommentId) -> RepoResult<Option<Comment>>;
    fn create_comment(&self, comment: &NewComment, now: DateTime<Utc>) -> RepoResult<Comment>;
}

impl CommentRepository for SqliteStore<'_> {
    fn list_comments(
        &self,
        thesis_id: ThesisId,
        window: Option<PageWindow>,
    ) -> RepoResult<Vec<Comment>> {
        let statement = build_comment_query(thesis_id).page_statement(window);
        query_rows(self.conn(), &statement, parse_comment_row)
    }

    fn count_comments(&self, thesis_id: ThesisId) -> RepoResult<u64> {
        query_count(self.conn(), &build_comment_query(thesis_id).count_statement())
    }

    fn get_comment(&self, comment_id: CommentId) -> RepoResult<Option<Comment>> {
        let statement = build_comment_lookup(comment_id).page_statement(None);
        query_first(self.conn(), &statement, parse_comment_row)
    }

    fn create_comment(&self, comment: &NewComment, now: DateTime<Utc>) -> RepoResult<Comment> {
        self.conn().execute(
            "INSERT INTO comments (thesis_id, username, content, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                comment.thesis_id,
                comment.username.as_str(),
                comment.content.as_str(),
                datetime_to_ms(now),
            ],
        )?;

        let comment_id = self.conn().last_insert_rowid();
        self.get_comment(comment_id)?.ok_or(RepoError::NotFound {
            entity: "comment",
            id: comment_id,
        })
    }
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        thesis_id: row.get("thesis_id")?,
        username: row.get("username")?,
        content: row.get("content")?,
        is_suspended: flag_from_db(row.get("is_suspended")?, "comments.is_suspended")?,
        created_at: ms_to_datetime(row.get("created_at")?, "comments.created_at")?,
        updated_at: optional_ms_to_datetime(row.get("updated_at")?, "comments.updated_at")?,
    })
}
