/**
 * User Model and Database Operations
 *
 * This module handles user rows, the follow graph, and hydration of the
 * `UserProfile` / `PublicUser` views served to clients.
 *
 * # Storage
 *
 * - `users` holds one row per account; `skills` is a JSON array in a TEXT
 *   column and `category` is the snake_case name of `DeveloperCategory`
 * - `follows` holds one directed edge per `(follower, followee)` pair
 *
 * Followers and following lists are never stored on the user row; they are
 * derived from `follows` whenever a profile is loaded.
 */

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::models::{DeveloperCategory, PublicUser, UpdateProfileRequest, UserProfile};

/// User struct representing a row in the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub headline: String,
    pub location: String,
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// JSON array of skill names
    pub skills: String,
    pub category: String,
    pub profile_image: Option<String>,
    pub experience: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            full_name: self.full_name.clone(),
            headline: self.headline.clone(),
            profile_image: self.profile_image.clone(),
        }
    }

    pub fn skill_list(&self) -> BackendResult<Vec<String>> {
        Ok(serde_json::from_str(&self.skills)?)
    }

    pub fn developer_category(&self) -> BackendResult<DeveloperCategory> {
        Ok(self.category.parse()?)
    }

    /// Build the full profile view from this row and its follow edges
    pub fn into_profile(self, followers: Vec<Uuid>, following: Vec<Uuid>) -> BackendResult<UserProfile> {
        let skills = self.skill_list()?;
        let category = self.developer_category()?;
        Ok(UserProfile {
            id: self.id,
            full_name: self.full_name,
            headline: self.headline,
            location: self.location,
            email: self.email,
            skills,
            category,
            profile_image: self.profile_image,
            experience: self.experience,
            followers,
            following,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Fields supplied at registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub headline: String,
    pub location: String,
    pub skills: Vec<String>,
    pub category: DeveloperCategory,
}

const USER_COLUMNS: &str = "id, full_name, headline, location, email, password_hash, skills, \
     category, profile_image, experience, created_at, updated_at";

/// Create a new user
///
/// Returns `Conflict` when the email is already registered.
pub async fn create_user(pool: &SqlitePool, new_user: NewUser) -> BackendResult<User> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let skills = serde_json::to_string(&new_user.skills)?;

    let result = sqlx::query(
        r#"
        INSERT INTO users (id, full_name, headline, location, email, password_hash, skills, category, experience, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, '', ?, ?)
        "#,
    )
    .bind(id)
    .bind(&new_user.full_name)
    .bind(&new_user.headline)
    .bind(&new_user.location)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(&skills)
    .bind(new_user.category.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(BackendError::conflict("Email is already registered"));
        }
        Err(e) => return Err(e.into()),
    }

    get_user_by_id(pool, id)
        .await?
        .ok_or_else(|| BackendError::internal("User row missing after insert"))
}

/// Get user by email
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Get a user or fail with `NotFound`
pub async fn require_user(pool: &SqlitePool, id: Uuid) -> BackendResult<User> {
    get_user_by_id(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))
}

pub async fn user_exists(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Public view of a user, if present
pub async fn get_public_user(pool: &SqlitePool, id: Uuid) -> Result<Option<PublicUser>, sqlx::Error> {
    Ok(get_user_by_id(pool, id).await?.map(|user| user.public()))
}

/// Apply a partial profile edit; absent fields are left untouched
pub async fn update_user(
    pool: &SqlitePool,
    id: Uuid,
    changes: &UpdateProfileRequest,
) -> BackendResult<User> {
    let mut user = require_user(pool, id).await?;

    if let Some(full_name) = &changes.full_name {
        user.full_name = full_name.trim().to_string();
    }
    if let Some(headline) = &changes.headline {
        user.headline = headline.clone();
    }
    if let Some(location) = &changes.location {
        user.location = location.clone();
    }
    if let Some(skills) = &changes.skills {
        user.skills = serde_json::to_string(skills)?;
    }
    if let Some(category) = changes.category {
        user.category = category.as_str().to_string();
    }
    if let Some(image) = &changes.profile_image {
        user.profile_image = Some(image.clone()).filter(|url| !url.is_empty());
    }
    if let Some(experience) = &changes.experience {
        user.experience = experience.clone();
    }
    user.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE users
        SET full_name = ?, headline = ?, location = ?, skills = ?, category = ?,
            profile_image = ?, experience = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.full_name)
    .bind(&user.headline)
    .bind(&user.location)
    .bind(&user.skills)
    .bind(&user.category)
    .bind(&user.profile_image)
    .bind(&user.experience)
    .bind(user.updated_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(user)
}

/// List users, optionally filtered by category and excluding one id
pub async fn list_users(
    pool: &SqlitePool,
    category: Option<DeveloperCategory>,
    exclude: Option<Uuid>,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {} FROM users
        WHERE (? IS NULL OR category = ?)
          AND (? IS NULL OR id <> ?)
        ORDER BY created_at DESC, rowid DESC
        "#,
        USER_COLUMNS
    ))
    .bind(category.map(|c| c.as_str()))
    .bind(category.map(|c| c.as_str()))
    .bind(exclude)
    .bind(exclude)
    .fetch_all(pool)
    .await
}

/// Insert a follow edge; returns false if it already existed
pub async fn follow(pool: &SqlitePool, follower: Uuid, followee: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO follows (follower_id, followee_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(follower)
    .bind(followee)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove a follow edge; returns false if there was none
pub async fn unfollow(pool: &SqlitePool, follower: Uuid, followee: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
        .bind(follower)
        .bind(followee)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn followers_of(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
        "SELECT follower_id FROM follows WHERE followee_id = ? ORDER BY created_at, rowid",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn following_of(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
        "SELECT followee_id FROM follows WHERE follower_id = ? ORDER BY created_at, rowid",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Hydrate a row into a profile with follow lists
pub async fn profile_from_user(pool: &SqlitePool, user: User) -> BackendResult<UserProfile> {
    let followers = followers_of(pool, user.id).await?;
    let following = following_of(pool, user.id).await?;
    user.into_profile(followers, following)
}

/// Load a profile by id or fail with `NotFound`
pub async fn load_profile(pool: &SqlitePool, id: Uuid) -> BackendResult<UserProfile> {
    let user = require_user(pool, id).await?;
    profile_from_user(pool, user).await
}
