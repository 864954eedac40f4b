//! User registration, authentication and profile use cases.
//!
//! # Invariants
//! - Passwords are stored only as bcrypt hashes.
//! - Unknown email and wrong password are indistinguishable to callers.

use crate::clock::{Clock, SystemClock};
use crate::model::user::{normalize_email, User, UserId};
use crate::model::validation::ValidationError;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// bcrypt work factor for stored password hashes.
pub const PASSWORD_HASH_COST: u32 = 6;
/// Minimum accepted password length in characters.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Errors from user use cases.
#[derive(Debug)]
pub enum UserServiceError {
    /// Another account already uses this (normalized) email.
    UserAlreadyExists(String),
    InvalidCredentials,
    UserNotFound(UserId),
    PasswordTooShort { min_len: usize },
    Validation(ValidationError),
    PasswordHash(bcrypt::BcryptError),
    Repo(RepoError),
}

impl UserServiceError {
    pub fn is_resource_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserAlreadyExists(email) => write!(f, "email already exists: {email}"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::UserNotFound(id) => write!(f, "resource not found: user {id}"),
            Self::PasswordTooShort { min_len } => {
                write!(f, "password must have at least {min_len} characters")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::PasswordHash(err) => write!(f, "password hashing failed: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::PasswordHash(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Duplicate { value, .. } => Self::UserAlreadyExists(value),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for UserServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User use-case service.
pub struct UserService<U: UserRepository, T: Clock = SystemClock> {
    repo: U,
    clock: T,
}

impl<U: UserRepository> UserService<U, SystemClock> {
    pub fn new(repo: U) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<U: UserRepository, T: Clock> UserService<U, T> {
    pub fn with_clock(repo: U, clock: T) -> Self {
        Self { repo, clock }
    }

    /// Registers a new user with a hashed password.
    ///
    /// # Contract
    /// - Fails with `UserAlreadyExists` when the normalized email is taken.
    /// - Never stores the raw password.
    pub fn register(&self, request: &RegisterRequest) -> Result<User, UserServiceError> {
        if request.password.chars().count() < PASSWORD_MIN_LEN {
            return Err(UserServiceError::PasswordTooShort {
                min_len: PASSWORD_MIN_LEN,
            });
        }

        let email = normalize_email(&request.email);
        if self.repo.find_user_by_email(&email)?.is_some() {
            warn!("event=user_register module=service status=rejected reason=email_taken");
            return Err(UserServiceError::UserAlreadyExists(email));
        }

        let mut user = User::new(request.name.trim(), &email, "", self.clock.now_ms());
        user.validate()?;
        user.password_hash = bcrypt::hash(&request.password, PASSWORD_HASH_COST)
            .map_err(UserServiceError::PasswordHash)?;

        self.repo.create_user(&user)?;
        info!(
            "event=user_register module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Verifies credentials and returns the matching user.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, UserServiceError> {
        let Some(user) = self.repo.find_user_by_email(email)? else {
            warn!("event=user_authenticate module=service status=rejected");
            return Err(UserServiceError::InvalidCredentials);
        };

        let matches =
            bcrypt::verify(password, &user.password_hash).map_err(UserServiceError::PasswordHash)?;
        if !matches {
            warn!(
                "event=user_authenticate module=service status=rejected user_id={}",
                user.id
            );
            return Err(UserServiceError::InvalidCredentials);
        }

        info!(
            "event=user_authenticate module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    pub fn get_user_profile(&self, user_id: UserId) -> Result<User, UserServiceError> {
        self.repo
            .find_user_by_id(user_id)?
            .ok_or(UserServiceError::UserNotFound(user_id))
    }
}
