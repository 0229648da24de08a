//! User types, `me` and the account mutations

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result, SimpleObject};
use axum::http::header::SET_COOKIE;

use super::{request_context, timestamp};
use crate::app::{AuthOutcome, DynUserService, FieldError};
use crate::auth::SessionCookies;
use crate::domain::entities::User;
use crate::error::AppError;

pub struct UserObject(User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> i32 {
        self.0.id.0
    }

    async fn username(&self) -> &str {
        &self.0.username
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn created_at(&self) -> String {
        timestamp(self.0.created_at)
    }

    async fn updated_at(&self) -> String {
        timestamp(self.0.updated_at)
    }
}

#[derive(SimpleObject)]
#[graphql(name = "FieldError")]
pub struct FieldErrorObject {
    field: String,
    message: String,
}

impl From<FieldError> for FieldErrorObject {
    fn from(error: FieldError) -> Self {
        Self {
            field: error.field,
            message: error.message,
        }
    }
}

/// Either the logged-in user or the reasons the input was refused
#[derive(SimpleObject)]
pub struct UserResponse {
    errors: Option<Vec<FieldErrorObject>>,
    user: Option<UserObject>,
}

#[derive(InputObject)]
pub struct RegisterInput {
    username: String,
    email: String,
    password: String,
}

/// Turn an auth outcome into a response, setting the session cookie on success
fn respond(ctx: &Context<'_>, outcome: AuthOutcome) -> Result<UserResponse> {
    match outcome {
        AuthOutcome::Authenticated { user, session } => {
            let cookies = ctx.data::<SessionCookies>()?;
            let cookie = cookies.set_cookie(&session).ok_or_else(|| {
                AppError::Internal("failed to sign session cookie".to_string()).extend()
            })?;
            ctx.append_http_header(SET_COOKIE, cookie);

            Ok(UserResponse {
                errors: None,
                user: Some(UserObject(user)),
            })
        }
        AuthOutcome::Rejected(errors) => Ok(UserResponse {
            errors: Some(errors.into_iter().map(Into::into).collect()),
            user: None,
        }),
    }
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The logged-in user, or null
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        let Some(user_id) = request_context(ctx).user_id else {
            return Ok(None);
        };

        let users = ctx.data::<Arc<DynUserService>>()?;
        let user = users.find_by_id(user_id).await.map_err(|e| e.extend())?;
        Ok(user.map(UserObject))
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn register(&self, ctx: &Context<'_>, options: RegisterInput) -> Result<UserResponse> {
        let users = ctx.data::<Arc<DynUserService>>()?;
        let outcome = users
            .register(&options.username, &options.email, &options.password)
            .await
            .map_err(|e| e.extend())?;
        respond(ctx, outcome)
    }

    async fn login(
        &self,
        ctx: &Context<'_>,
        username_or_email: String,
        password: String,
    ) -> Result<UserResponse> {
        let users = ctx.data::<Arc<DynUserService>>()?;
        let outcome = users
            .login(&username_or_email, &password)
            .await
            .map_err(|e| e.extend())?;
        respond(ctx, outcome)
    }

    /// End the current session. `false` if the session store could not be reached.
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let users = ctx.data::<Arc<DynUserService>>()?;
        let cookies = ctx.data::<SessionCookies>()?;
        ctx.append_http_header(SET_COOKIE, cookies.clear_cookie());

        let Some(session_id) = request_context(ctx).session_id else {
            return Ok(true);
        };

        match users.logout(&session_id).await {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to destroy session");
                Ok(false)
            }
        }
    }

    /// Email a password reset link. Always true, whether or not the address
    /// belongs to an account.
    async fn forgot_password(&self, ctx: &Context<'_>, email: String) -> Result<bool> {
        let users = ctx.data::<Arc<DynUserService>>()?;
        users
            .forgot_password(&email)
            .await
            .map_err(|e| e.extend())?;
        Ok(true)
    }

    async fn change_password(
        &self,
        ctx: &Context<'_>,
        token: String,
        new_password: String,
    ) -> Result<UserResponse> {
        let users = ctx.data::<Arc<DynUserService>>()?;
        let outcome = users
            .change_password(&token, &new_password)
            .await
            .map_err(|e| e.extend())?;
        respond(ctx, outcome)
    }
}
