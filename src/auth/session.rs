use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use super::claims::Claims;
use super::AuthError;

/// Session shared between the auth context and the API client
pub type SharedSession = Arc<RwLock<Session>>;

/// Tokens of the signed-in user, plus the decoded access-token claims
#[derive(Debug, Clone, Default)]
pub struct Session {
    access_token: Option<String>,
    refresh_token: Option<String>,
    claims: Option<Claims>,
}

impl Session {
    /// An empty, signed-out session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    /// Build a session from tokens, decoding the access-token claims
    pub fn from_tokens(access_token: String, refresh_token: Option<String>) -> Result<Self, AuthError> {
        let claims = Claims::decode(&access_token)?;
        Ok(Self {
            access_token: Some(access_token),
            refresh_token,
            claims: Some(claims),
        })
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.claims
            .as_ref()
            .map(|c| c.is_expired_at(now))
            .unwrap_or(false)
    }

    /// Forget both tokens and the claims
    pub fn clear(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.claims = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::encode_test_token;
    use serde_json::json;

    #[test]
    fn test_from_tokens_decodes_claims() {
        let token = encode_test_token(&json!({ "sub": "u1", "name": "Ada" }));
        let session = Session::from_tokens(token.clone(), Some("refresh".into())).unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.access_token(), Some(token.as_str()));
        assert_eq!(session.refresh_token(), Some("refresh"));
        assert_eq!(session.claims().unwrap().display_name(), "Ada");
        assert!(!session.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_clear() {
        let token = encode_test_token(&json!({ "sub": "u1" }));
        let mut session = Session::from_tokens(token, None).unwrap();
        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.claims().is_none());
    }

    #[test]
    fn test_invalid_token_rejected() {
        assert!(Session::from_tokens("garbage".into(), None).is_err());
    }
}
