//! Database operations for posts
//!
//! A `Post` is assembled from three tables: the `posts` row joined with its
//! author, the ordered `post_likes` ids, and the `comments` joined with their
//! authors. Likes and comments are deleted with their post (ON DELETE CASCADE).

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::backend::error::BackendResult;
use crate::shared::models::{Comment, Post, PublicUser};

const SELECT_POST: &str = r#"
    SELECT p.id, p.text, p.image, p.shared_from, p.created_at, p.updated_at,
           u.id AS author_id, u.full_name AS author_name, u.headline AS author_headline,
           u.profile_image AS author_image
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

/// A post row with its author but without likes or comments
#[derive(Debug, Clone)]
pub struct PostRow {
    pub id: Uuid,
    pub author: PublicUser,
    pub text: String,
    pub image: Option<String>,
    pub shared_from: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn post_row_from_row(row: &SqliteRow) -> Result<PostRow, sqlx::Error> {
    Ok(PostRow {
        id: row.try_get("id")?,
        author: PublicUser {
            id: row.try_get("author_id")?,
            full_name: row.try_get("author_name")?,
            headline: row.try_get("author_headline")?,
            profile_image: row.try_get("author_image")?,
        },
        text: row.try_get("text")?,
        image: row.try_get("image")?,
        shared_from: row.try_get("shared_from")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn insert_post(
    pool: &SqlitePool,
    user_id: Uuid,
    text: &str,
    image: Option<&str>,
    shared_from: Option<Uuid>,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO posts (id, user_id, text, image, shared_from, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(text)
    .bind(image)
    .bind(shared_from)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn get_post_row(pool: &SqlitePool, id: Uuid) -> Result<Option<PostRow>, sqlx::Error> {
    let row = sqlx::query(&format!("{} WHERE p.id = ?", SELECT_POST))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(post_row_from_row).transpose()
}

/// Liker ids in the order the likes were added
pub async fn likes_of(pool: &SqlitePool, post_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows: Vec<(Uuid,)> =
        sqlx::query_as("SELECT user_id FROM post_likes WHERE post_id = ? ORDER BY created_at, rowid")
            .bind(post_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn comments_of(pool: &SqlitePool, post_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.text, c.created_at,
               u.id AS author_id, u.full_name, u.headline, u.profile_image
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = ?
        ORDER BY c.created_at, c.rowid
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<Comment, sqlx::Error> {
            Ok(Comment {
                id: row.try_get("id")?,
                user: PublicUser {
                    id: row.try_get("author_id")?,
                    full_name: row.try_get("full_name")?,
                    headline: row.try_get("headline")?,
                    profile_image: row.try_get("profile_image")?,
                },
                text: row.try_get("text")?,
                created_at: row.try_get("created_at")?,
            })
        })
        .collect()
}

/// Attach likes and comments to a post row
pub async fn hydrate(pool: &SqlitePool, row: PostRow) -> BackendResult<Post> {
    let likes = likes_of(pool, row.id).await?;
    let comments = comments_of(pool, row.id).await?;
    Ok(Post {
        id: row.id,
        user: row.author,
        text: row.text,
        image: row.image,
        likes,
        comments,
        shared_from: row.shared_from,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub async fn get_post(pool: &SqlitePool, id: Uuid) -> BackendResult<Option<Post>> {
    match get_post_row(pool, id).await? {
        Some(row) => Ok(Some(hydrate(pool, row).await?)),
        None => Ok(None),
    }
}

async fn hydrate_all(pool: &SqlitePool, rows: Vec<SqliteRow>) -> BackendResult<Vec<Post>> {
    let mut posts = Vec::with_capacity(rows.len());
    for row in &rows {
        posts.push(hydrate(pool, post_row_from_row(row)?).await?);
    }
    Ok(posts)
}

/// The caller's own posts plus posts of everyone they follow, newest first
pub async fn list_feed(pool: &SqlitePool, user_id: Uuid) -> BackendResult<Vec<Post>> {
    let rows = sqlx::query(&format!(
        r#"{}
        WHERE p.user_id = ?
           OR p.user_id IN (SELECT followee_id FROM follows WHERE follower_id = ?)
        ORDER BY p.created_at DESC, p.rowid DESC
        "#,
        SELECT_POST
    ))
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    hydrate_all(pool, rows).await
}

pub async fn list_by_user(pool: &SqlitePool, user_id: Uuid) -> BackendResult<Vec<Post>> {
    let rows = sqlx::query(&format!(
        "{} WHERE p.user_id = ? ORDER BY p.created_at DESC, p.rowid DESC",
        SELECT_POST
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    hydrate_all(pool, rows).await
}

/// Record a like; returns false if the user already liked the post
pub async fn add_like(pool: &SqlitePool, post_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO post_likes (post_id, user_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(post_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn add_comment(
    pool: &SqlitePool,
    post_id: Uuid,
    user_id: Uuid,
    text: &str,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO comments (id, post_id, user_id, text, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(post_id)
        .bind(user_id)
        .bind(text)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(id)
}

pub async fn update_post(
    pool: &SqlitePool,
    id: Uuid,
    text: &str,
    image: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE posts SET text = ?, image = ?, updated_at = ? WHERE id = ?")
        .bind(text)
        .bind(image)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_post(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
