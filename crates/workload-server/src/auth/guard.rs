use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::session::SessionStore;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Checks the `Authorization` header against the session store.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGuard {
    require_bearer_prefix: bool,
}

impl AuthGuard {
    pub fn new(require_bearer_prefix: bool) -> Self {
        Self {
            require_bearer_prefix,
        }
    }

    /// Candidate token from the headers.
    ///
    /// Without the (case-sensitive) `Bearer ` prefix the whole header value is
    /// used as the token, unless the guard was built to require the prefix.
    pub fn extract_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        if value.is_empty() {
            return None;
        }
        match value.strip_prefix(BEARER_PREFIX) {
            Some(token) => Some(token),
            None if self.require_bearer_prefix => None,
            None => Some(value),
        }
    }

    pub fn authenticate(&self, headers: &HeaderMap, sessions: &SessionStore) -> bool {
        self.extract_token(headers)
            .map(|token| sessions.is_valid(token))
            .unwrap_or(false)
    }
}
