//! User service
//!
//! Registration, login/logout and password reset. Successful authentication
//! opens a session in the session store; the caller turns the returned
//! session id into a cookie.
//!
//! Bad input is reported as field errors (returned to the client as data)
//! rather than as failures, so a form can show each message next to its field.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::app::password::{hash_password, verify_password};
use crate::domain::entities::{NewUser, User, UserId};
use crate::domain::ports::{Email, Mailer, SessionData, SessionId, SessionStore, UserRepository};
use crate::error::{AppError, DomainError};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// A problem with one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result of an operation that logs a user in
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Authenticated { user: User, session: SessionId },
    Rejected(Vec<FieldError>),
}

impl AuthOutcome {
    fn rejected(field: &str, message: &str) -> Self {
        AuthOutcome::Rejected(vec![FieldError::new(field, message)])
    }
}

/// Service for user accounts and sessions
pub struct UserService<UR, SS, M>
where
    UR: UserRepository + ?Sized,
    SS: SessionStore + ?Sized,
    M: Mailer + ?Sized,
{
    users: Arc<UR>,
    sessions: Arc<SS>,
    mailer: Arc<M>,
    frontend_url: String,
}

impl<UR, SS, M> UserService<UR, SS, M>
where
    UR: UserRepository + ?Sized,
    SS: SessionStore + ?Sized,
    M: Mailer + ?Sized,
{
    pub fn new(users: Arc<UR>, sessions: Arc<SS>, mailer: Arc<M>, frontend_url: String) -> Self {
        Self {
            users,
            sessions,
            mailer,
            frontend_url,
        }
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Resolve a session id to the session's user id
    pub async fn resolve_session(&self, id: &SessionId) -> Result<Option<UserId>, AppError> {
        Ok(self.sessions.get(id).await?.map(|data| data.user_id))
    }

    /// Register a new user and log them in
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, AppError> {
        let username = username.trim();
        let email = email.trim();

        let errors = validate_registration(username, email, password);
        if !errors.is_empty() {
            return Ok(AuthOutcome::Rejected(errors));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Ok(AuthOutcome::rejected("username", "username already exists"));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Ok(AuthOutcome::rejected("email", "email already exists"));
        }

        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };

        // A concurrent registration can still win the unique constraint
        let user = match self.users.create(&new_user).await {
            Ok(user) => user,
            Err(DomainError::AlreadyExists(_)) => {
                return Ok(AuthOutcome::rejected("username", "username already exists"));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        self.start_session(user).await
    }

    /// Log in with a username (or an email address) and password
    pub async fn login(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> Result<AuthOutcome, AppError> {
        let login = username_or_email.trim();
        let user = if login.contains('@') {
            self.users.find_by_email(login).await?
        } else {
            self.users.find_by_username(login).await?
        };

        let Some(user) = user else {
            return Ok(AuthOutcome::rejected(
                "usernameOrEmail",
                "that username does not exist",
            ));
        };

        if !verify_password(password, &user.password_hash)? {
            return Ok(AuthOutcome::rejected("password", "incorrect password"));
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.start_session(user).await
    }

    /// End a session
    pub async fn logout(&self, session: &SessionId) -> Result<(), AppError> {
        self.sessions.destroy(session).await?;
        Ok(())
    }

    /// Send a password reset link if an account uses this email.
    /// Whether it does is never revealed to the caller.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = Uuid::new_v4().to_string();
        self.sessions.put_reset_token(&token, user.id).await?;

        let link = format!(
            "{}/change-password/{}",
            self.frontend_url.trim_end_matches('/'),
            token
        );
        self.mailer
            .send(Email {
                to: user.email.clone(),
                subject: "Reset your password".to_string(),
                html: format!("<a href=\"{}\">reset password</a>", link),
            })
            .await?;

        tracing::info!(user_id = %user.id, "Password reset link sent");
        Ok(())
    }

    /// Set a new password using a reset token, then log the user in
    pub async fn change_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<AuthOutcome, AppError> {
        if let Some(error) = validate_password("newPassword", new_password) {
            return Ok(AuthOutcome::Rejected(vec![error]));
        }

        let Some(user_id) = self.sessions.take_reset_token(token).await? else {
            return Ok(AuthOutcome::rejected("token", "token expired"));
        };

        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(AuthOutcome::rejected("token", "user no longer exists"));
        };

        let hash = hash_password(new_password)?;
        self.users.update_password(user.id, &hash).await?;

        tracing::info!(user_id = %user.id, "Password changed");
        let user = User {
            password_hash: hash,
            ..user
        };
        self.start_session(user).await
    }

    async fn start_session(&self, user: User) -> Result<AuthOutcome, AppError> {
        let session = self
            .sessions
            .create(&SessionData { user_id: user.id })
            .await?;
        Ok(AuthOutcome::Authenticated { user, session })
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if username.chars().count() <= 2 {
        errors.push(FieldError::new("username", "length must be greater than 2"));
    } else if username.contains('@') {
        errors.push(FieldError::new("username", "cannot include an @"));
    }

    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "invalid email"));
    }

    errors.extend(validate_password("password", password));
    errors
}

fn validate_password(field: &str, password: &str) -> Option<FieldError> {
    if password.chars().count() <= 3 {
        Some(FieldError::new(field, "length must be greater than 3"))
    } else {
        None
    }
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}
