//! PostgreSQL Repository Implementations

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use kernel::id::{DepartmentId, UserId};
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::email_policy::{EMAIL_FIELD, EMAIL_TAKEN};
use crate::domain::entity::{
    auth_session::AuthSession, department::Department, profile::Profile, user::User,
};
use crate::domain::repository::{AuthSessionRepository, DepartmentRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    phone_number::PhoneNumber,
    user_name::{USER_NAME_TAKEN, UserName},
};
use crate::error::{AccountsError, AccountsResult};

const USER_COLUMNS: &str = r#"
    user_id,
    user_name,
    email,
    first_name,
    last_name,
    password_hash,
    is_active,
    is_superuser,
    last_login_at,
    created_at,
    updated_at
"#;

const SESSION_COLUMNS: &str = r#"
    session_id,
    user_id,
    expires_at_ms,
    remember_me,
    client_fingerprint_hash,
    client_ip,
    user_agent,
    active_role,
    created_at,
    last_activity_at
"#;

/// PostgreSQL-backed accounts repository
#[derive(Clone)]
pub struct PgAccountsRepository {
    pool: PgPool,
}

impl PgAccountsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_user_where(&self, clause: &str, value: &str) -> AccountsResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {clause} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }
}

/// Unique constraint hits become the same field errors the forms show
fn map_unique_violation(err: sqlx::Error) -> AccountsError {
    if is_unique_violation(&err, Some("users_user_name_key")) {
        AccountsError::field("username", USER_NAME_TAKEN)
    } else if is_unique_violation(&err, Some("users_email_key")) {
        AccountsError::field(EMAIL_FIELD, EMAIL_TAKEN)
    } else {
        AccountsError::Database(err)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAccountsRepository {
    async fn create_user(&self, user: &User, profile: &Profile) -> AccountsResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                user_name,
                email,
                first_name,
                last_name,
                password_hash,
                is_active,
                is_superuser,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_name.as_str())
        .bind(user.email.as_ref().map(|e| e.as_str()))
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.is_active)
        .bind(user.is_superuser)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query("INSERT INTO profiles (user_id, phone_number) VALUES ($1, $2)")
            .bind(profile.user_id.as_uuid())
            .bind(profile.phone_number.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AccountsResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_user_by_name(&self, user_name: &UserName) -> AccountsResult<Option<User>> {
        self.find_user_where("user_name", user_name.as_str()).await
    }

    async fn find_user_by_email(&self, email: &Email) -> AccountsResult<Option<User>> {
        self.find_user_where("email", email.as_str()).await
    }

    async fn user_name_exists(&self, user_name: &UserName) -> AccountsResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_name = $1)",
        )
        .bind(user_name.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn email_exists(&self, email: &Email, except: Option<&UserId>) -> AccountsResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR user_id <> $2)
            )
            "#,
        )
        .bind(email.as_str())
        .bind(except.map(|id| *id.as_uuid()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update_user(&self, user: &User) -> AccountsResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                password_hash = $2,
                is_active = $3,
                is_superuser = $4,
                last_login_at = $5,
                updated_at = $6
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.password_hash.as_phc_string())
        .bind(user.is_active)
        .bind(user.is_superuser)
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_profile(&self, user_id: &UserId) -> AccountsResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT user_id, phone_number FROM profiles WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_profile()))
    }

    async fn save_profile(&self, user: &User, profile: &Profile) -> AccountsResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE users SET
                first_name = $2,
                last_name = $3,
                email = $4,
                updated_at = $5
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.email.as_ref().map(|e| e.as_str()))
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, phone_number) VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET phone_number = EXCLUDED.phone_number
            "#,
        )
        .bind(profile.user_id.as_uuid())
        .bind(profile.phone_number.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn permissions_for(&self, user_id: &UserId) -> AccountsResult<BTreeSet<String>> {
        let codenames = sqlx::query_scalar::<_, String>(
            "SELECT codename FROM user_permissions WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(codenames.into_iter().collect())
    }

    async fn grant_permission(&self, user_id: &UserId, codename: &str) -> AccountsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_permissions (user_id, codename) VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(codename)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Department Repository Implementation
// ============================================================================

impl DepartmentRepository for PgAccountsRepository {
    async fn create_department(&self, department: &Department) -> AccountsResult<()> {
        sqlx::query("INSERT INTO departments (department_id, name) VALUES ($1, $2)")
            .bind(department.department_id.as_uuid())
            .bind(&department.name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, Some("departments_name_key")) {
                    AccountsError::field("name", "Department with this Name already exists.")
                } else {
                    AccountsError::Database(e)
                }
            })?;

        Ok(())
    }

    async fn find_department_by_name(&self, name: &str) -> AccountsResult<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            "SELECT department_id, name FROM departments WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_department()))
    }

    async fn add_member(
        &self,
        department_id: &DepartmentId,
        user_id: &UserId,
    ) -> AccountsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profile_departments (department_id, user_id) VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(department_id.as_uuid())
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn department_names_for(&self, user_id: &UserId) -> AccountsResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT d.name
            FROM departments d
            JOIN profile_departments pd ON pd.department_id = d.department_id
            WHERE pd.user_id = $1
            ORDER BY d.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}

// ============================================================================
// Auth Session Repository Implementation
// ============================================================================

impl AuthSessionRepository for PgAccountsRepository {
    async fn create_session(&self, session: &AuthSession) -> AccountsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                expires_at_ms,
                remember_me,
                client_fingerprint_hash,
                client_ip,
                user_agent,
                active_role,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.as_uuid())
        .bind(session.expires_at_ms)
        .bind(session.remember_me)
        .bind(&session.client_fingerprint_hash)
        .bind(&session.client_ip)
        .bind(&session.user_agent)
        .bind(&session.active_role)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AccountsResult<Option<AuthSession>> {
        let now_ms = Utc::now().timestamp_millis();

        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM auth_sessions WHERE session_id = $1 AND expires_at_ms > $2"
        );
        let row = sqlx::query_as::<_, AuthSessionRow>(&sql)
            .bind(session_id)
            .bind(now_ms)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => {
                if r.client_fingerprint_hash != fingerprint_hash {
                    tracing::warn!(
                        session_id = %session_id,
                        "Auth session fingerprint mismatch"
                    );
                    return Err(AccountsError::SessionFingerprintMismatch);
                }
                Ok(Some(r.into_session()))
            }
            None => Ok(None),
        }
    }

    async fn update_session(&self, session: &AuthSession) -> AccountsResult<()> {
        sqlx::query(
            r#"
            UPDATE auth_sessions SET
                expires_at_ms = $2,
                last_activity_at = $3
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id)
        .bind(session.expires_at_ms)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_session_role(&self, session_id: Uuid, role: Option<&str>) -> AccountsResult<()> {
        sqlx::query("UPDATE auth_sessions SET active_role = $2 WHERE session_id = $1")
            .bind(session_id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> AccountsResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AccountsResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    email: Option<String>,
    first_name: String,
    last_name: String,
    password_hash: String,
    is_active: bool,
    is_superuser: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AccountsResult<User> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AccountsError::Internal(format!("Invalid password hash: {e}")))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            user_name: UserName::from_db(self.user_name),
            email: self.email.map(Email::from_db),
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            password_hash,
            is_active: self.is_active,
            is_superuser: self.is_superuser,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    phone_number: String,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            user_id: UserId::from_uuid(self.user_id),
            phone_number: PhoneNumber::from_db(self.phone_number),
        }
    }
}

#[derive(sqlx::FromRow)]
struct DepartmentRow {
    department_id: Uuid,
    name: String,
}

impl DepartmentRow {
    fn into_department(self) -> Department {
        Department {
            department_id: DepartmentId::from_uuid(self.department_id),
            name: self.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AuthSessionRow {
    session_id: Uuid,
    user_id: Uuid,
    expires_at_ms: i64,
    remember_me: bool,
    client_fingerprint_hash: Vec<u8>,
    client_ip: Option<String>,
    user_agent: Option<String>,
    active_role: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl AuthSessionRow {
    fn into_session(self) -> AuthSession {
        AuthSession {
            session_id: self.session_id,
            user_id: UserId::from_uuid(self.user_id),
            expires_at_ms: self.expires_at_ms,
            remember_me: self.remember_me,
            client_fingerprint_hash: self.client_fingerprint_hash,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            active_role: self.active_role,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        }
    }
}
