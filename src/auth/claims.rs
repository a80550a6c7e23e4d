//! Decoding of access-token claims
//!
//! Tokens are JWTs issued by the server. The client never verifies the
//! signature; it only reads the payload to know who is signed in and when
//! the token expires.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::AuthError;

const SUB_KEYS: &[&str] = &[
    "sub",
    "nameid",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier",
];
const EMAIL_KEYS: &[&str] = &[
    "email",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress",
];
const NAME_KEYS: &[&str] = &[
    "name",
    "unique_name",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name",
];
const ROLE_KEYS: &[&str] = &[
    "role",
    "roles",
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
];
const EXP_KEYS: &[&str] = &["exp"];
const EMAIL_VERIFIED_KEYS: &[&str] = &["emailVerified", "email_verified"];

/// Claims the client cares about
///
/// ASP.NET Identity issuers often send both the short and the long claim
/// type for the same value. Each field takes the first key present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "role")]
    pub roles: Vec<String>,
    /// Expiry, seconds since the epoch
    pub exp: Option<i64>,
    pub email_verified: bool,
}

impl<'de> Deserialize<'de> for Claims {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let payload = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_payload(&payload))
    }
}

fn first<'a>(payload: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| payload.get(*key))
        .find(|value| !value.is_null())
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Claims {
    fn from_payload(payload: &Map<String, Value>) -> Self {
        let roles = match first(payload, ROLE_KEYS) {
            Some(Value::Array(roles)) => roles.iter().filter_map(text).collect(),
            Some(role) => text(role).into_iter().collect(),
            None => Vec::new(),
        };
        let email_verified = match first(payload, EMAIL_VERIFIED_KEYS) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true") || s == "1",
            _ => false,
        };

        Self {
            sub: first(payload, SUB_KEYS).and_then(text),
            email: first(payload, EMAIL_KEYS).and_then(text),
            name: first(payload, NAME_KEYS).and_then(text),
            roles,
            exp: first(payload, EXP_KEYS).and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))),
            email_verified,
        }
    }

    /// Decode the payload segment of a JWT
    pub fn decode(token: &str) -> Result<Self, AuthError> {
        let mut segments = token.trim().split('.');
        let payload = match (segments.next(), segments.next()) {
            (Some(_header), Some(payload)) if !payload.is_empty() => payload,
            _ => return Err(AuthError::MalformedToken("expected three segments".into())),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::MalformedToken(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedToken(e.to_string()))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Tokens without an `exp` claim are treated as non-expiring
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expiry) => now >= expiry,
            None => false,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Best display name available
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .or(self.sub.as_deref())
            .unwrap_or("unknown user")
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{}.{}.signature", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_standard_claims() {
        let token = encode_test_token(&json!({
            "sub": "user-1",
            "email": "ada@example.com",
            "name": "Ada",
            "role": "Teacher",
            "exp": 4_102_444_800i64,
            "emailVerified": true
        }));

        let claims = Claims::decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("user-1"));
        assert_eq!(claims.roles, vec!["Teacher".to_string()]);
        assert!(claims.has_role("teacher"));
        assert!(claims.email_verified);
        assert!(!claims.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_decode_long_claim_names() {
        let token = encode_test_token(&json!({
            "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier": "42",
            "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress": "bo@example.com",
            "http://schemas.microsoft.com/ws/2008/06/identity/claims/role": ["Admin", "Teacher"],
            "email_verified": "True",
            "exp": 1
        }));

        let claims = Claims::decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("42"));
        assert_eq!(claims.display_name(), "bo@example.com");
        assert_eq!(claims.roles.len(), 2);
        assert!(claims.email_verified);
        assert!(claims.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_decode_short_and_long_forms_together() {
        let token = encode_test_token(&json!({
            "sub": "user-7",
            "nameid": "7",
            "email": "cy@example.com",
            "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress": "cy@example.com",
            "role": "Student",
            "http://schemas.microsoft.com/ws/2008/06/identity/claims/role": "Student",
            "exp": 4_102_444_800i64
        }));

        let claims = Claims::decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("user-7"));
        assert_eq!(claims.email.as_deref(), Some("cy@example.com"));
        assert_eq!(claims.roles, vec!["Student".to_string()]);
        assert_eq!(claims.exp, Some(4_102_444_800));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Claims::decode("not-a-token").is_err());
        assert!(Claims::decode("a.!!!.c").is_err());
        assert!(Claims::decode("a.bm90IGpzb24.c").is_err());
    }
}
