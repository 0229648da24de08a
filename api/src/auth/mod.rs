//! Authentication
//!
//! Cookie sessions backed by the session store.

pub mod session;

pub use session::{session_middleware, RequestContext, SessionCookies};
