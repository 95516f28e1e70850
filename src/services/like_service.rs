//! Like service - like/unlike with exact counters, status, liked listings.
//!
//! The `likes` composite primary key makes "at most one like per user per
//! post" a database guarantee; the unique violation on a double-like is
//! translated to 409 instead of being treated as an internal error.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::like::{LikeStatusResponse, LikedPostItem, LikedPostsResponse},
    pagination::{Pagination, page_window},
};

/// Like a post.
///
/// # Process
///
/// 1. Start database transaction
/// 2. Lock the post row (also proves it exists)
/// 3. Insert the like; a unique violation means "already liked" (409)
/// 4. Increment the post's `like_count`
/// 5. Commit and return the fresh count
pub async fn like_post(
    pool: &DbPool,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<LikeStatusResponse, AppError> {
    let mut tx = pool.begin().await?;

    let post: Option<Uuid> = sqlx::query_scalar("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?;

    if post.is_none() {
        tx.rollback().await?;
        return Err(AppError::PostNotFound);
    }

    let inserted = sqlx::query("INSERT INTO likes (post_id, user_id) VALUES ($1, $2)")
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await;

    if let Err(err) = inserted {
        tx.rollback().await?;
        // Composite PK violation: this user already liked this post
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Err(AppError::AlreadyLiked);
            }
        }
        return Err(err.into());
    }

    let like_count: i64 = sqlx::query_scalar(
        "UPDATE posts SET like_count = like_count + 1 WHERE id = $1 RETURNING like_count",
    )
    .bind(post_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(LikeStatusResponse {
        liked: true,
        like_count,
    })
}

/// Remove the current user's like from a post.
///
/// 404 distinguishes in the error code whether the post or the like was
/// missing (`post_not_found` vs `like_not_found`).
pub async fn unlike_post(
    pool: &DbPool,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<LikeStatusResponse, AppError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&mut *tx)
                .await?;
        tx.rollback().await?;

        return Err(if exists {
            AppError::LikeNotFound
        } else {
            AppError::PostNotFound
        });
    }

    // GREATEST guards the CHECK constraint against historical drift
    let like_count: i64 = sqlx::query_scalar(
        "UPDATE posts SET like_count = GREATEST(like_count - 1, 0) WHERE id = $1 RETURNING like_count",
    )
    .bind(post_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(LikeStatusResponse {
        liked: false,
        like_count,
    })
}

/// Whether the current user likes a post, plus the total count.
pub async fn like_status(
    pool: &DbPool,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<LikeStatusResponse, AppError> {
    let like_count: Option<i64> = sqlx::query_scalar("SELECT like_count FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    let like_count = like_count.ok_or(AppError::PostNotFound)?;

    let liked: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE post_id = $1 AND user_id = $2)",
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(LikeStatusResponse { liked, like_count })
}

/// Posts the current user liked, most recently liked first.
pub async fn list_liked_posts(
    pool: &DbPool,
    user_id: Uuid,
    page: i64,
) -> Result<LikedPostsResponse, AppError> {
    let total_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let window = page_window(total_items, page);

    let data = sqlx::query_as::<_, LikedPostItem>(
        r#"
        SELECT p.id AS post_id, p.author_id, u.nickname AS author_nickname,
               p.title, p.view_count, p.like_count, p.created_at
        FROM likes l
        JOIN posts p ON p.id = l.post_id
        LEFT JOIN users u ON u.id = p.author_id
        WHERE l.user_id = $1
        ORDER BY l.created_at DESC, p.id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(pool)
    .await?;

    Ok(LikedPostsResponse {
        data,
        pagination: Pagination::from(window),
    })
}
