//! # Access Policy
//!
//! Per-route authorization parameterized by configuration.
//!
//! A bearer credential, when present, is always verified; a bad token is
//! rejected even on routes that would admit anonymous callers.

use axum::http::Method;
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use super::jwt::JwtManager;

/// Who may call which routes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    /// Every request is allowed
    AllowAny,
    /// Safe methods are open, writes need a credential
    #[default]
    ReadOnlyOrAuthenticated,
    /// Every request needs a credential
    Authenticated,
}

impl AccessPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPolicy::AllowAny => "allow_any",
            AccessPolicy::ReadOnlyOrAuthenticated => "read_only_or_authenticated",
            AccessPolicy::Authenticated => "authenticated",
        }
    }

    /// Whether a request with `method` must carry a credential
    pub fn requires_credentials(&self, method: &Method) -> bool {
        match self {
            AccessPolicy::AllowAny => false,
            AccessPolicy::ReadOnlyOrAuthenticated => !is_safe(method),
            AccessPolicy::Authenticated => true,
        }
    }

    /// Whether any route can require a credential
    pub fn uses_credentials(&self) -> bool {
        !matches!(self, AccessPolicy::AllowAny)
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Caller identity established for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Token subject, `None` for anonymous callers
    pub subject: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { subject: None }
    }

    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }

    /// Subject for log fields, `anonymous` when unauthenticated
    pub fn caller(&self) -> &str {
        self.subject.as_deref().unwrap_or("anonymous")
    }
}

/// Verifies credentials and applies the access policy
#[derive(Debug, Clone)]
pub struct Authenticator {
    policy: AccessPolicy,
    jwt: JwtManager,
}

impl Authenticator {
    pub fn new(policy: AccessPolicy, jwt: JwtManager) -> Self {
        Self { policy, jwt }
    }

    /// Authenticates a request from its `Authorization` header value.
    ///
    /// Headers using a scheme other than `Bearer` are treated as absent.
    pub fn authenticate(
        &self,
        method: &Method,
        authorization: Option<&str>,
    ) -> AuthResult<RequestContext> {
        let context = match authorization.and_then(bearer_token) {
            Some(token) => {
                let claims = self.jwt.validate_token(token)?;
                RequestContext::authenticated(claims.sub)
            }
            None => RequestContext::anonymous(),
        };

        if self.policy.requires_credentials(method) && !context.is_authenticated() {
            return Err(AuthError::MissingCredentials);
        }
        Ok(context)
    }
}

/// Extracts the token from a `Bearer <token>` header value
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ').unwrap_or((header.trim(), ""));
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}
