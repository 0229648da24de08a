//! Session cookie authentication
//!
//! The `qid` cookie carries `<session id>.<hex HMAC-SHA256 of the id>`. The
//! middleware verifies it, looks the session up in the session store and
//! injects a [`RequestContext`] into the request extensions.

use std::time::Duration;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::CookieJar;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::entities::UserId;
use crate::domain::ports::SessionId;
use crate::error::AppError;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

pub const COOKIE_NAME: &str = "qid";

/// Who is making the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Option<UserId>,
    pub session_id: Option<SessionId>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: UserId, session_id: SessionId) -> Self {
        Self {
            user_id: Some(user_id),
            session_id: Some(session_id),
        }
    }

    /// The session user, or `Unauthorized`
    pub fn require_user(&self) -> Result<UserId, AppError> {
        self.user_id.ok_or(AppError::Unauthorized)
    }
}

/// Signs, verifies and renders session cookies
#[derive(Clone)]
pub struct SessionCookies {
    secret: String,
    secure: bool,
    max_age: Duration,
}

impl SessionCookies {
    pub fn new(secret: impl Into<String>, secure: bool, max_age: Duration) -> Self {
        Self {
            secret: secret.into(),
            secure,
            max_age,
        }
    }

    fn mac(&self, id: &str) -> Option<HmacSha256> {
        match HmacSha256::new_from_slice(self.secret.as_bytes()) {
            Ok(mut mac) => {
                mac.update(id.as_bytes());
                Some(mac)
            }
            Err(_) => {
                tracing::error!("Invalid session secret");
                None
            }
        }
    }

    /// Signed cookie value for a session
    pub fn encode(&self, id: &SessionId) -> Option<String> {
        let signature = self.mac(&id.0)?.finalize().into_bytes();
        Some(format!("{}.{}", id, hex::encode(signature)))
    }

    /// Session id from a cookie value; `None` if the signature does not match
    pub fn decode(&self, value: &str) -> Option<SessionId> {
        let (id, signature) = value.rsplit_once('.')?;
        let expected = hex::decode(signature).ok()?;
        self.mac(id)?.verify_slice(&expected).ok()?;
        Some(SessionId(id.to_string()))
    }

    /// `Set-Cookie` header value that starts a session
    pub fn set_cookie(&self, id: &SessionId) -> Option<String> {
        let value = self.encode(id)?;
        Some(self.render(&value, self.max_age.as_secs()))
    }

    /// `Set-Cookie` header value that removes the session cookie
    pub fn clear_cookie(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age_secs: u64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            COOKIE_NAME, value, max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Session middleware
///
/// Never rejects a request: a missing, forged or expired cookie makes the
/// request anonymous. Handlers that need a user call [`RequestContext::require_user`].
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let session_id = jar
        .get(COOKIE_NAME)
        .and_then(|cookie| state.cookies.decode(cookie.value()));

    let context = match session_id {
        None => RequestContext::anonymous(),
        Some(session_id) => match state.user_service.resolve_session(&session_id).await {
            Ok(Some(user_id)) => RequestContext::authenticated(user_id, session_id),
            Ok(None) => RequestContext::anonymous(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load session, treating request as anonymous");
                RequestContext::anonymous()
            }
        },
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}
