//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - Emails are looked up in normalized form.
//! - A second user with the same email is rejected as `RepoError::Duplicate`.

use crate::model::user::{normalize_email, User, UserId};
use crate::repo::{is_unique_violation, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, name, email, password_hash, created_at FROM users";

/// Repository interface for registered users.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn find_user_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

impl<T: UserRepository + ?Sized> UserRepository for &T {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        (**self).create_user(user)
    }

    fn find_user_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        (**self).find_user_by_id(id)
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        (**self).find_user_by_email(email)
    }
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;

        let result = self.conn.execute(
            "INSERT INTO users (id, name, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.id.to_string(),
                user.name.as_str(),
                user.email.as_str(),
                user.password_hash.as_str(),
                user.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(user.id),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Duplicate {
                entity: "user",
                field: "email",
                value: user.email.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn find_user_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                read_user_columns,
            )
            .optional()?;
        row.map(UserColumns::into_user).transpose()
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE email = ?1;"),
                [normalize_email(email)],
                read_user_columns,
            )
            .optional()?;
        row.map(UserColumns::into_user).transpose()
    }
}

struct UserColumns {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: i64,
}

impl UserColumns {
    fn into_user(self) -> RepoResult<User> {
        let user = User {
            id: parse_uuid(&self.id, "users.id")?,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        };
        user.validate()?;
        Ok(user)
    }
}

fn read_user_columns(row: &Row<'_>) -> rusqlite::Result<UserColumns> {
    Ok(UserColumns {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
    })
}
