//! Caller identification.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the authenticated user name.
pub const REMOTE_USER_HEADER: &str = "x-remote-user";

/// The authenticated caller, if any.
///
/// Authentication happens upstream; this only reads the user name the
/// proxy forwarded. A missing, blank or non-UTF-8 header means anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteUser(pub Option<String>);

impl RemoteUser {
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RemoteUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(REMOTE_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(str::to_string);
        Ok(Self(user))
    }
}
