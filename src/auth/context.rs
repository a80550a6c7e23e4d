use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::claims::Claims;
use super::session::{Session, SharedSession};
use super::AuthError;
use crate::api::ApiClient;
use crate::models::validation::{Checks, FieldError, Validate};
use crate::storage::{keys, LocalStore};

const LOGIN_PATH: &str = "auth/login";
const REGISTER_PATH: &str = "auth/register";
const VERIFY_EMAIL_PATH: &str = "auth/verify-email";
const RESEND_VERIFICATION_PATH: &str = "auth/resend-verification";
const REFRESH_PATH: &str = "auth/refresh-token";
const LOGOUT_PATH: &str = "auth/logout";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Vec<FieldError> {
        Checks::new()
            .email("email", &self.email)
            .required("password", "Password", &self.password)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Validate for RegisterForm {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Checks::new()
            .required("fullName", "Full name", &self.full_name)
            .email("email", &self.email)
            .min_len("password", "Password", &self.password, 8)
            .finish();
        if self.password != self.confirm_password {
            errors.push(FieldError {
                field: "confirmPassword",
                message: "Passwords do not match".to_string(),
            });
        }
        errors
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyEmailRequest<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    access_token: &'a str,
    refresh_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

/// Owns the sign-in lifecycle
///
/// `init` restores the session from local storage, `login`/`refresh` write
/// tokens to both the shared session and storage, and `logout` clears both.
pub struct AuthContext {
    api: ApiClient,
    store: LocalStore,
}

impl AuthContext {
    /// Restore the stored session, dropping tokens that no longer decode or
    /// have expired
    pub fn init(api: ApiClient, store: LocalStore) -> Result<Self, AuthError> {
        let context = Self { api, store };

        let access = context.store.get(keys::ACCESS_TOKEN)?;
        let refresh = context.store.get(keys::REFRESH_TOKEN)?;

        let restored = match access {
            Some(token) => match Session::from_tokens(token, refresh) {
                Ok(session) if session.is_expired_at(Utc::now()) => {
                    log::info!("Stored access token has expired, signing out");
                    None
                }
                Ok(session) => Some(session),
                Err(e) => {
                    log::warn!("Discarding stored access token: {}", e);
                    None
                }
            },
            None => None,
        };

        match restored {
            Some(session) => {
                log::debug!(
                    "Restored session for {}",
                    session.claims().map(Claims::display_name).unwrap_or("unknown user")
                );
                *context.session_mut()? = session;
            }
            None => context.clear()?,
        }

        Ok(context)
    }

    pub fn session(&self) -> &SharedSession {
        self.api.session()
    }

    fn session_mut(&self) -> Result<std::sync::RwLockWriteGuard<'_, Session>, AuthError> {
        self.api.session().write().map_err(|_| AuthError::SessionPoisoned)
    }

    /// Claims of the signed-in user
    pub fn current_user(&self) -> Option<Claims> {
        self.api
            .session()
            .read()
            .ok()
            .and_then(|s| s.claims().cloned())
    }

    pub fn is_authenticated(&self) -> bool {
        self.api
            .session()
            .read()
            .map(|s| s.is_authenticated())
            .unwrap_or(false)
    }

    pub async fn login(&self, form: &LoginForm) -> Result<Claims, AuthError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }

        let tokens: TokenPair = self.api.post_json(LOGIN_PATH, form).await?;
        let claims = self.adopt(tokens)?;
        log::info!("Signed in as {}", claims.display_name());
        Ok(claims)
    }

    /// Create an account; the server sends a verification code by email
    pub async fn register(&self, form: &RegisterForm) -> Result<Option<String>, AuthError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }
        Ok(self.api.post_ack(REGISTER_PATH, form).await?)
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> Result<Option<String>, AuthError> {
        let errors = Checks::new()
            .email("email", email)
            .required("code", "Verification code", code)
            .finish();
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }
        Ok(self
            .api
            .post_ack(VERIFY_EMAIL_PATH, &VerifyEmailRequest { email, code })
            .await?)
    }

    pub async fn resend_verification(&self, email: &str) -> Result<Option<String>, AuthError> {
        let errors = Checks::new().email("email", email).finish();
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }
        Ok(self
            .api
            .post_ack(RESEND_VERIFICATION_PATH, &EmailRequest { email })
            .await?)
    }

    /// Exchange the refresh token for a new pair. Only ever called
    /// explicitly; requests failing with 401 are not retried.
    pub async fn refresh(&self) -> Result<Claims, AuthError> {
        let (access, refresh) = {
            let session = self.api.session().read().map_err(|_| AuthError::SessionPoisoned)?;
            match (session.access_token(), session.refresh_token()) {
                (Some(a), Some(r)) => (a.to_string(), r.to_string()),
                _ => return Err(AuthError::NotSignedIn),
            }
        };

        let tokens: TokenPair = self
            .api
            .post_json(
                REFRESH_PATH,
                &RefreshRequest {
                    access_token: &access,
                    refresh_token: &refresh,
                },
            )
            .await?;

        // Servers that don't rotate refresh tokens omit it; keep the old one
        let tokens = TokenPair {
            refresh_token: tokens.refresh_token.or(Some(refresh)),
            ..tokens
        };
        let claims = self.adopt(tokens)?;
        log::info!("Refreshed session for {}", claims.display_name());
        Ok(claims)
    }

    /// Sign out. The server call is best-effort; local state is always cleared.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let refresh = self
            .api
            .session()
            .read()
            .ok()
            .and_then(|s| s.refresh_token().map(str::to_string));

        if self.is_authenticated() {
            let request = LogoutRequest {
                refresh_token: refresh.as_deref(),
            };
            if let Err(e) = self.api.post_ack(LOGOUT_PATH, &request).await {
                log::warn!("Server logout failed, clearing local session anyway: {}", e);
            }
        }

        self.clear()?;
        log::info!("Signed out");
        Ok(())
    }

    fn adopt(&self, tokens: TokenPair) -> Result<Claims, AuthError> {
        let session = Session::from_tokens(tokens.access_token.clone(), tokens.refresh_token.clone())?;
        let claims = session.claims().cloned().ok_or(AuthError::NotSignedIn)?;

        self.store.set(keys::ACCESS_TOKEN, &tokens.access_token)?;
        match &tokens.refresh_token {
            Some(refresh) => self.store.set(keys::REFRESH_TOKEN, refresh)?,
            None => {
                self.store.remove(keys::REFRESH_TOKEN)?;
            }
        }

        *self.session_mut()? = session;
        Ok(claims)
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.store.remove_all(&[keys::ACCESS_TOKEN, keys::REFRESH_TOKEN])?;
        self.session_mut()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;
    use crate::api::test_support;
    use crate::auth::claims::encode_test_token;

    const FUTURE: i64 = 4_102_444_800;

    #[derive(Clone, Default)]
    struct Calls {
        paths: Arc<Mutex<Vec<String>>>,
        bodies: Arc<Mutex<Vec<Value>>>,
    }

    impl Calls {
        fn record(&self, path: &str, body: Value) {
            self.paths.lock().unwrap().push(path.to_string());
            self.bodies.lock().unwrap().push(body);
        }
    }

    fn token(name: &str) -> String {
        encode_test_token(&json!({ "sub": "u1", "name": name, "exp": FUTURE }))
    }

    async fn login(State(calls): State<Calls>, Json(body): Json<Value>) -> Json<Value> {
        calls.record("login", body.clone());
        if body["password"] == "correct-horse" {
            Json(json!({ "isSuccess": true, "result": { "accessToken": token("Ada"), "refreshToken": "r1" } }))
        } else {
            Json(json!({ "isSuccess": false, "message": "Invalid email or password" }))
        }
    }

    async fn refresh(State(calls): State<Calls>, Json(body): Json<Value>) -> Json<Value> {
        calls.record("refresh", body);
        Json(json!({ "isSuccess": true, "result": { "accessToken": token("Ada Lovelace") } }))
    }

    async fn logout(State(calls): State<Calls>, Json(body): Json<Value>) -> Json<Value> {
        calls.record("logout", body);
        Json(json!({ "isSuccess": true, "message": "Logged out" }))
    }

    async fn register(State(calls): State<Calls>, Json(body): Json<Value>) -> Json<Value> {
        calls.record("register", body);
        Json(json!({ "isSuccess": true, "message": "Check your inbox" }))
    }

    async fn verify_email(State(calls): State<Calls>, Json(body): Json<Value>) -> Json<Value> {
        calls.record("verify-email", body.clone());
        if body["code"] == "123456" {
            Json(json!({ "isSuccess": true, "message": "Email verified" }))
        } else {
            Json(json!({ "isSuccess": false, "message": "Code has expired" }))
        }
    }

    async fn resend_verification(State(calls): State<Calls>, Json(body): Json<Value>) -> Json<Value> {
        calls.record("resend-verification", body);
        Json(json!({ "isSuccess": true, "message": "Code sent" }))
    }

    async fn setup(dir: &TempDir) -> (AuthContext, Calls) {
        let calls = Calls::default();
        let router = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/refresh-token", post(refresh))
            .route("/api/auth/logout", post(logout))
            .route("/api/auth/register", post(register))
            .route("/api/auth/verify-email", post(verify_email))
            .route("/api/auth/resend-verification", post(resend_verification))
            .with_state(calls.clone());
        let base = test_support::serve(router).await;
        let api = test_support::client(&base, Session::new().shared());
        let context = AuthContext::init(api, LocalStore::new(dir.path())).unwrap();
        (context, calls)
    }

    fn credentials(password: &str) -> LoginForm {
        LoginForm {
            email: "ada@example.com".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_tokens() {
        let dir = TempDir::new().unwrap();
        let (context, _) = setup(&dir).await;

        let claims = context.login(&credentials("correct-horse")).await.unwrap();
        assert_eq!(claims.display_name(), "Ada");
        assert!(context.is_authenticated());

        let store = LocalStore::new(dir.path());
        assert_eq!(store.get(keys::REFRESH_TOKEN).unwrap().as_deref(), Some("r1"));
        assert!(store.get(keys::ACCESS_TOKEN).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_empty() {
        let dir = TempDir::new().unwrap();
        let (context, _) = setup(&dir).await;

        let err = context.login(&credentials("wrong")).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid email or password");
        assert!(!context.is_authenticated());
        assert!(LocalStore::new(dir.path()).get(keys::ACCESS_TOKEN).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_login_form_makes_no_call() {
        let dir = TempDir::new().unwrap();
        let (context, calls) = setup(&dir).await;

        let form = LoginForm {
            email: "not-an-email".into(),
            password: String::new(),
        };
        assert!(matches!(context.login(&form).await, Err(AuthError::Invalid(_))));
        assert!(calls.paths.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_restores_and_discards() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        store.set(keys::ACCESS_TOKEN, &token("Stored")).unwrap();

        let api = test_support::client("http://127.0.0.1:9", Session::new().shared());
        let context = AuthContext::init(api, store.clone()).unwrap();
        assert_eq!(context.current_user().unwrap().display_name(), "Stored");

        let expired = encode_test_token(&json!({ "sub": "u1", "exp": 1 }));
        store.set(keys::ACCESS_TOKEN, &expired).unwrap();
        store.set(keys::REFRESH_TOKEN, "r").unwrap();
        let api = test_support::client("http://127.0.0.1:9", Session::new().shared());
        let context = AuthContext::init(api, store.clone()).unwrap();
        assert!(!context.is_authenticated());
        assert!(store.get(keys::REFRESH_TOKEN).unwrap().is_none());

        store.set(keys::ACCESS_TOKEN, "garbage").unwrap();
        let api = test_support::client("http://127.0.0.1:9", Session::new().shared());
        let context = AuthContext::init(api, store.clone()).unwrap();
        assert!(!context.is_authenticated());
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token_when_not_rotated() {
        let dir = TempDir::new().unwrap();
        let (context, calls) = setup(&dir).await;
        context.login(&credentials("correct-horse")).await.unwrap();

        let claims = context.refresh().await.unwrap();
        assert_eq!(claims.display_name(), "Ada Lovelace");
        assert_eq!(calls.bodies.lock().unwrap()[1]["refreshToken"], json!("r1"));
        assert_eq!(
            context.session().read().unwrap().refresh_token(),
            Some("r1")
        );
    }

    #[tokio::test]
    async fn test_refresh_requires_session() {
        let dir = TempDir::new().unwrap();
        let (context, _) = setup(&dir).await;
        assert!(matches!(context.refresh().await, Err(AuthError::NotSignedIn)));
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let dir = TempDir::new().unwrap();
        let (context, calls) = setup(&dir).await;
        context.login(&credentials("correct-horse")).await.unwrap();

        context.logout().await.unwrap();
        assert!(!context.is_authenticated());
        assert_eq!(calls.paths.lock().unwrap().last().map(String::as_str), Some("logout"));
        assert!(LocalStore::new(dir.path()).keys_with_prefix("").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_survives_unreachable_server() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        store.set(keys::ACCESS_TOKEN, &token("Offline")).unwrap();

        let api = test_support::client("http://127.0.0.1:9", Session::new().shared());
        let context = AuthContext::init(api, store.clone()).unwrap();
        context.logout().await.unwrap();
        assert!(store.get(keys::ACCESS_TOKEN).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_validates_passwords() {
        let dir = TempDir::new().unwrap();
        let (context, calls) = setup(&dir).await;

        let mut form = RegisterForm {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "difference-engine".into(),
            confirm_password: "analytical-engine".into(),
        };
        match context.register(&form).await {
            Err(AuthError::Invalid(errors)) => assert_eq!(errors[0].field, "confirmPassword"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(calls.paths.lock().unwrap().is_empty());

        form.confirm_password = form.password.clone();
        let message = context.register(&form).await.unwrap();
        assert_eq!(message.as_deref(), Some("Check your inbox"));
    }

    #[tokio::test]
    async fn test_verify_email_posts_code() {
        let dir = TempDir::new().unwrap();
        let (context, calls) = setup(&dir).await;

        let message = context.verify_email("ada@example.com", "123456").await.unwrap();
        assert_eq!(message.as_deref(), Some("Email verified"));
        assert_eq!(calls.paths.lock().unwrap()[0], "verify-email");
        assert_eq!(
            calls.bodies.lock().unwrap()[0],
            json!({ "email": "ada@example.com", "code": "123456" })
        );

        let err = context.verify_email("ada@example.com", "000000").await.unwrap_err();
        assert_eq!(err.user_message(), "Code has expired");
    }

    #[tokio::test]
    async fn test_verify_email_validates_before_calling() {
        let dir = TempDir::new().unwrap();
        let (context, calls) = setup(&dir).await;

        match context.verify_email("ada@example.com", "").await {
            Err(AuthError::Invalid(errors)) => assert_eq!(errors[0].field, "code"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(matches!(
            context.resend_verification("nope").await,
            Err(AuthError::Invalid(_))
        ));
        assert!(calls.paths.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resend_verification_posts_email() {
        let dir = TempDir::new().unwrap();
        let (context, calls) = setup(&dir).await;

        let message = context.resend_verification("ada@example.com").await.unwrap();
        assert_eq!(message.as_deref(), Some("Code sent"));
        assert_eq!(calls.paths.lock().unwrap()[0], "resend-verification");
        assert_eq!(calls.bodies.lock().unwrap()[0], json!({ "email": "ada@example.com" }));
    }
}
