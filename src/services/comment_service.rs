//! Comment service - listings and author-owned edits.
//!
//! Creating or deleting a comment moves the post's `comment_count` in the
//! same database transaction, keeping the denormalized counter exact.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::comment::{CommentListResponse, CommentResponse},
    pagination::{Pagination, page_window},
};

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.author_id, u.nickname AS author_nickname,
           c.content, c.created_at, c.updated_at
    FROM comments c
    LEFT JOIN users u ON u.id = c.author_id
"#;

/// List a post's comments, oldest first (conversation order).
pub async fn list_comments(
    pool: &DbPool,
    post_id: Uuid,
    page: i64,
) -> Result<CommentListResponse, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    if !exists {
        return Err(AppError::PostNotFound);
    }

    let total_items: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(pool)
            .await?;

    let window = page_window(total_items, page);

    let query = format!(
        "{COMMENT_SELECT} WHERE c.post_id = $1 ORDER BY c.created_at ASC, c.id ASC LIMIT $2 OFFSET $3"
    );

    let data = sqlx::query_as::<_, CommentResponse>(&query)
        .bind(post_id)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(pool)
        .await?;

    Ok(CommentListResponse {
        data,
        pagination: Pagination::from(window),
    })
}

/// List the authenticated user's own comments, newest first.
pub async fn list_my_comments(
    pool: &DbPool,
    user_id: Uuid,
    page: i64,
) -> Result<CommentListResponse, AppError> {
    let total_items: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE author_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    let window = page_window(total_items, page);

    let query = format!(
        "{COMMENT_SELECT} WHERE c.author_id = $1 ORDER BY c.created_at DESC, c.id ASC LIMIT $2 OFFSET $3"
    );

    let data = sqlx::query_as::<_, CommentResponse>(&query)
        .bind(user_id)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(pool)
        .await?;

    Ok(CommentListResponse {
        data,
        pagination: Pagination::from(window),
    })
}

/// Create a comment under a post.
///
/// # Process
///
/// 1. Start database transaction
/// 2. Lock the post row (also proves it exists)
/// 3. Insert the comment
/// 4. Increment the post's `comment_count`
/// 5. Commit (or rollback on error)
pub async fn create_comment(
    pool: &DbPool,
    post_id: Uuid,
    author_id: Uuid,
    content: &str,
) -> Result<CommentResponse, AppError> {
    let mut tx = pool.begin().await?;

    // FOR UPDATE serializes concurrent counter changes on the same post
    let post: Option<Uuid> = sqlx::query_scalar("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?;

    if post.is_none() {
        tx.rollback().await?;
        return Err(AppError::PostNotFound);
    }

    let comment_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO comments (post_id, author_id, content)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    let query = format!("{COMMENT_SELECT} WHERE c.id = $1");
    let comment = sqlx::query_as::<_, CommentResponse>(&query)
        .bind(comment_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(comment)
}

/// Edit a comment's content. Author only; stamps `updated_at`.
pub async fn update_comment(
    pool: &DbPool,
    post_id: Uuid,
    comment_id: Uuid,
    user_id: Uuid,
    content: &str,
) -> Result<CommentResponse, AppError> {
    let updated = sqlx::query(
        r#"
        UPDATE comments
        SET content = $1, updated_at = NOW()
        WHERE id = $2 AND post_id = $3 AND author_id = $4
        "#,
    )
    .bind(content)
    .bind(comment_id)
    .bind(post_id)
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(not_found_or_forbidden(pool, post_id, comment_id).await?);
    }

    let query = format!("{COMMENT_SELECT} WHERE c.id = $1");
    let comment = sqlx::query_as::<_, CommentResponse>(&query)
        .bind(comment_id)
        .fetch_one(pool)
        .await?;

    Ok(comment)
}

/// Delete a comment. Author only; decrements the post's `comment_count`
/// in the same transaction.
pub async fn delete_comment(
    pool: &DbPool,
    post_id: Uuid,
    comment_id: Uuid,
    user_id: Uuid,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query(
        "DELETE FROM comments WHERE id = $1 AND post_id = $2 AND author_id = $3",
    )
    .bind(comment_id)
    .bind(post_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if deleted == 0 {
        tx.rollback().await?;
        return Err(not_found_or_forbidden(pool, post_id, comment_id).await?);
    }

    // GREATEST guards the CHECK constraint against historical drift
    sqlx::query("UPDATE posts SET comment_count = GREATEST(comment_count - 1, 0) WHERE id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Distinguish "no such comment under this post" (404) from "not your
/// comment" (403) after a guarded write matched zero rows.
async fn not_found_or_forbidden(
    pool: &DbPool,
    post_id: Uuid,
    comment_id: Uuid,
) -> Result<AppError, AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1 AND post_id = $2)",
    )
    .bind(comment_id)
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(if exists {
        AppError::Forbidden
    } else {
        AppError::CommentNotFound
    })
}
