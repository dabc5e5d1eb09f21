use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{is_foreign_key_violation, is_unique_violation, AppError, Result};
use crate::features::auth::model::SessionUser;
use crate::features::auth::password::hash_password;
use crate::features::users::dtos::{CreateUserDto, UpdateProfileDto, UserQueryParams};
use crate::features::users::models::{CreateUser, ProfileView, User, UserRole};
use crate::shared::validation::{non_blank, normalize_email};

/// Service for accounts and their profiles
pub struct UserService {
    pool: PgPool,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(pool: PgPool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// E-mail lookups are case-insensitive
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, avatar, google_id, created_at, updated_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user by email: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, avatar, google_id, created_at, updated_at
            FROM users
            WHERE google_id = $1
            "#,
        )
        .bind(google_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user by google id: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check email: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Insert an account. A duplicate e-mail or Google id is a Conflict.
    pub async fn insert(&self, data: CreateUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, avatar, google_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, role, avatar, google_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&data.name)
        .bind(normalize_email(&data.email))
        .bind(&data.password_hash)
        .bind(data.role)
        .bind(&data.avatar)
        .bind(&data.google_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::Conflict("Email already registered".to_string());
            }
            tracing::error!("Failed to create user: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Created user {} with role {}", user.id, user.role);
        Ok(user)
    }

    /// Attach a Google account id to an existing account
    pub async fn link_google_id(&self, id: Uuid, google_id: &str) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET google_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, avatar, google_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(google_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to link google id to user {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// List accounts with optional search and role filters (admin)
    pub async fn list(&self, params: &UserQueryParams) -> Result<(Vec<User>, i64)> {
        let search = non_blank(params.search.as_deref());
        let pagination = params.pagination();

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%')
              AND ($2::user_role IS NULL OR role = $2)
            "#,
        )
        .bind(&search)
        .bind(params.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count users: {:?}", e);
            AppError::Database(e)
        })?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, avatar, google_id, created_at, updated_at
            FROM users
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%')
              AND ($2::user_role IS NULL OR role = $2)
            ORDER BY created_at DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(&search)
        .bind(params.role)
        .bind(pagination.offset())
        .bind(pagination.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((users, total))
    }

    /// Admin-created account with a password and any role
    pub async fn create(&self, dto: CreateUserDto) -> Result<User> {
        let password_hash = hash_password(dto.password, self.bcrypt_cost).await?;
        self.insert(CreateUser {
            name: dto.name.trim().to_string(),
            email: dto.email,
            password_hash: Some(password_hash),
            role: dto.role,
            avatar: None,
            google_id: None,
        })
        .await
    }

    /// Change an account's role. The new role reaches the user with their next token.
    pub async fn update_role(&self, actor: &SessionUser, id: Uuid, role: &str) -> Result<User> {
        let role: UserRole = role.trim().parse()?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, avatar, google_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update role of user {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        tracing::info!("User {} set role of {} to {}", actor.id, id, role);
        Ok(user)
    }

    /// Delete an account. Comments, reports, saved posts and the profile go with it.
    pub async fn delete(&self, actor: &SessionUser, id: Uuid) -> Result<()> {
        if actor.id == id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::Conflict(format!(
                        "User {} still authors posts and cannot be deleted",
                        id
                    ));
                }
                tracing::error!("Failed to delete user {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        tracing::info!("User {} deleted user {}", actor.id, id);
        Ok(())
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<ProfileView> {
        sqlx::query_as::<_, ProfileView>(
            r#"
            SELECT u.id AS user_id, u.name, u.email, u.avatar,
                   p.gender, p.address, p.phone, p.birth_date, p.updated_at
            FROM users u
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch profile of {}: {:?}", user_id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Update name/avatar on the account and upsert the profile row.
    /// Fields left out of the request keep their current value.
    pub async fn update_profile(&self, user_id: Uuid, dto: UpdateProfileDto) -> Result<ProfileView> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let updated = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), avatar = COALESCE($3, avatar), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(non_blank(dto.name.as_deref()))
        .bind(non_blank(dto.avatar.as_deref()))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, gender, address, phone, birth_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                gender = COALESCE(EXCLUDED.gender, profiles.gender),
                address = COALESCE(EXCLUDED.address, profiles.address),
                phone = COALESCE(EXCLUDED.phone, profiles.phone),
                birth_date = COALESCE(EXCLUDED.birth_date, profiles.birth_date),
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(dto.gender)
        .bind(non_blank(dto.address.as_deref()))
        .bind(non_blank(dto.phone.as_deref()))
        .bind(dto.birth_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert profile of {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit profile update: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Updated profile of user {}", user_id);
        self.get_profile(user_id).await
    }
}
