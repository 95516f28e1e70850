//! Post service - listing, search, detail reads, and author-owned edits.
//!
//! # Counter discipline
//!
//! `view_count` is bumped in the same database transaction that reads the
//! detail row, so the count a reader sees always includes their own visit.
//!
//! # Search and sort safety
//!
//! The search term is bound as a query parameter with LIKE wildcards
//! escaped; the sort column and direction go through the
//! [`SortColumn`]/[`SortOrder`] allowlists. No user input is ever spliced
//! into SQL text.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::post::{PostDetailResponse, PostListItem, PostListResponse, SortColumn, SortOrder},
    pagination::{Pagination, page_window},
};

/// Escape LIKE wildcards in a user-supplied search term.
///
/// Postgres treats backslash as the default LIKE escape character, so
/// escaping `\`, `%`, and `_` is enough to make the term literal.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// List posts with optional search, configurable sort, and pagination.
///
/// `search` must already be validated/trimmed (see `ListPostsQuery::validate`).
pub async fn list_posts(
    pool: &DbPool,
    search: Option<&str>,
    sort: SortColumn,
    order: SortOrder,
    page: i64,
) -> Result<PostListResponse, AppError> {
    // NULL pattern disables the filter; ILIKE makes the search case-insensitive
    let pattern = search.map(|term| format!("%{}%", escape_like(term)));

    let total_items: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM posts
        WHERE ($1::TEXT IS NULL OR title ILIKE $1 OR content ILIKE $1)
        "#,
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    let window = page_window(total_items, page);

    // Sort column and direction come from the enum allowlists, never from
    // raw user input; `id` breaks ties so pages are stable
    let query = format!(
        r#"
        SELECT p.id, p.author_id, u.nickname AS author_nickname, p.title,
               p.view_count, p.like_count, p.comment_count, p.created_at
        FROM posts p
        LEFT JOIN users u ON u.id = p.author_id
        WHERE ($1::TEXT IS NULL OR p.title ILIKE $1 OR p.content ILIKE $1)
        ORDER BY p.{} {}, p.id ASC
        LIMIT $2 OFFSET $3
        "#,
        sort.as_sql(),
        order.as_sql(),
    );

    let data = sqlx::query_as::<_, PostListItem>(&query)
        .bind(&pattern)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(pool)
        .await?;

    Ok(PostListResponse {
        data,
        pagination: Pagination::from(window),
    })
}

/// List the authenticated user's own posts, newest first.
pub async fn list_my_posts(
    pool: &DbPool,
    user_id: Uuid,
    page: i64,
) -> Result<PostListResponse, AppError> {
    let total_items: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    let window = page_window(total_items, page);

    let data = sqlx::query_as::<_, PostListItem>(
        r#"
        SELECT p.id, p.author_id, u.nickname AS author_nickname, p.title,
               p.view_count, p.like_count, p.comment_count, p.created_at
        FROM posts p
        LEFT JOIN users u ON u.id = p.author_id
        WHERE p.author_id = $1
        ORDER BY p.created_at DESC, p.id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(pool)
    .await?;

    Ok(PostListResponse {
        data,
        pagination: Pagination::from(window),
    })
}

/// Create a post and return its full detail view.
///
/// `title`/`content` must already be validated.
pub async fn create_post(
    pool: &DbPool,
    author_id: Uuid,
    title: &str,
    content: &str,
) -> Result<PostDetailResponse, AppError> {
    let post_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO posts (author_id, title, content)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await?;

    fetch_detail(pool, post_id).await
}

/// Fetch a post's detail view and count the visit.
///
/// The view-count increment and the read happen in one database transaction
/// so the returned `view_count` already includes this visit.
pub async fn read_post(pool: &DbPool, post_id: Uuid) -> Result<PostDetailResponse, AppError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if updated == 0 {
        tx.rollback().await?;
        return Err(AppError::PostNotFound);
    }

    let detail = sqlx::query_as::<_, PostDetailResponse>(
        r#"
        SELECT p.id, p.author_id, u.nickname AS author_nickname, p.title, p.content,
               p.view_count, p.like_count, p.comment_count, p.created_at, p.updated_at
        FROM posts p
        LEFT JOIN users u ON u.id = p.author_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(detail)
}

/// Update a post's title and/or content. Author only.
///
/// COALESCE keeps columns untouched when the corresponding field was absent
/// from the request, so a single statement covers every partial update.
pub async fn update_post(
    pool: &DbPool,
    post_id: Uuid,
    user_id: Uuid,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<PostDetailResponse, AppError> {
    let updated = sqlx::query(
        r#"
        UPDATE posts
        SET title = COALESCE($1, title),
            content = COALESCE($2, content),
            updated_at = NOW()
        WHERE id = $3 AND author_id = $4
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(post_id)
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(not_found_or_forbidden(pool, post_id).await?);
    }

    fetch_detail(pool, post_id).await
}

/// Delete a post. Author only. Comments and likes cascade in the database.
pub async fn delete_post(pool: &DbPool, post_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let deleted = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(not_found_or_forbidden(pool, post_id).await?);
    }

    Ok(())
}

/// Distinguish "no such post" (404) from "not your post" (403) after a
/// guarded write matched zero rows.
async fn not_found_or_forbidden(pool: &DbPool, post_id: Uuid) -> Result<AppError, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    Ok(if exists {
        AppError::Forbidden
    } else {
        AppError::PostNotFound
    })
}

/// Detail view without touching the view counter (used after writes).
async fn fetch_detail(pool: &DbPool, post_id: Uuid) -> Result<PostDetailResponse, AppError> {
    sqlx::query_as::<_, PostDetailResponse>(
        r#"
        SELECT p.id, p.author_id, u.nickname AS author_nickname, p.title, p.content,
               p.view_count, p.like_count, p.comment_count, p.created_at, p.updated_at
        FROM posts p
        LEFT JOIN users u ON u.id = p.author_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::PostNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn escaped_term_round_trips_through_pattern() {
        let pattern = format!("%{}%", escape_like("50%_off"));
        assert_eq!(pattern, "%50\\%\\_off%");
    }
}
