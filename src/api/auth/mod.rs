//! Authentication API endpoints
//!
//! Registration, login and a protected probe endpoint. Tokens are
//! stateless JWTs; there is no logout or refresh.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::api::middleware::RequireUser;
use crate::api::state::AuthState;
use crate::api::types::{ApiError, ApiErrorResponse, Json};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_login, record_registration, AuthOutcome};

/// Message for any failed login; never reveals which part was wrong
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Create the authentication router
pub fn create_auth_router() -> Router<AuthState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/protected", get(protected))
}

/// Credentials submitted to register and login
///
/// Both fields are optional so that an absent field is a domain condition
/// rather than a body parse failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    #[schema(example = "pw123")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    /// Compact HS256 JWS
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedResponse {
    pub message: String,
    pub user_id: i64,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Missing or invalid field, or email already registered", body = ApiErrorResponse),
        (status = 500, description = "Store failure", body = ApiErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let result = state
        .user_service
        .register(request.email.as_deref(), request.password.as_deref())
        .await;

    match result {
        Ok(user) => {
            record_registration(AuthOutcome::Success);
            info!(user_id = %user.id(), "User registered");

            Ok((
                StatusCode::CREATED,
                Json(RegisterResponse {
                    message: "User registered successfully".to_string(),
                    user_id: user.id().value(),
                }),
            ))
        }
        Err(e @ DomainError::Validation { .. }) => {
            record_registration(AuthOutcome::Rejected);
            Err(e.into())
        }
        Err(e) => {
            record_registration(AuthOutcome::Error);
            Err(e.into())
        }
    }
}

/// Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ApiErrorResponse),
        (status = 500, description = "Store failure", body = ApiErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(request.email.as_deref(), request.password.as_deref())
        .await
        .inspect_err(|_| record_login(AuthOutcome::Error))?;

    let Some(user) = user else {
        record_login(AuthOutcome::Rejected);
        warn!("Login rejected");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS_MESSAGE));
    };

    let issued = state.token_service.issue(user.id()).map_err(|e| {
        record_login(AuthOutcome::Error);
        ApiError::from(DomainError::internal(e.to_string()))
    })?;

    record_login(AuthOutcome::Success);
    info!(user_id = %user.id(), "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: issued.token,
        user_id: user.id().value(),
        expires_at: issued.expires_at,
    }))
}

/// Confirm a bearer token is valid
#[utoipa::path(
    get,
    path = "/auth/protected",
    responses(
        (status = 200, description = "Token accepted", body = ProtectedResponse),
        (status = 401, description = "Invalid or missing token", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn protected(RequireUser(user_id): RequireUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Access granted".to_string(),
        user_id: user_id.value(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use chrono::Duration;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::middleware::INVALID_TOKEN_MESSAGE;
    use crate::api::types::INTERNAL_ERROR_MESSAGE;
    use crate::domain::user::{MockUserRepository, UserId};
    use crate::infrastructure::auth::{JwtConfig, JwtService, TokenService};
    use crate::infrastructure::user::{Argon2Hasher, UserService};

    const SECRET: &str = "test-secret";

    fn app_with(state: AuthState) -> Router {
        Router::new().nest("/auth", create_auth_router()).with_state(state)
    }

    fn app() -> Router {
        app_with(AuthState::in_memory(JwtConfig::with_secret(SECRET)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/auth/protected");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn parse(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    fn credentials(email: &str, password: &str) -> Value {
        json!({ "email": email, "password": password })
    }

    #[tokio::test]
    async fn test_register_login_protected_scenario() {
        let app = app();

        let (status, body) = send(&app, post_json("/auth/register", credentials("a@x.com", "pw123"))).await;
        assert_eq!(status, StatusCode::CREATED);
        let registered = parse(&body);
        assert_eq!(registered["message"], "User registered successfully");
        let user_id = registered["userId"].as_i64().unwrap();

        let (status, body) = send(&app, post_json("/auth/login", credentials("a@x.com", "pw123"))).await;
        assert_eq!(status, StatusCode::OK);
        let login = parse(&body);
        assert_eq!(login["userId"].as_i64(), Some(user_id));
        let token = login["token"].as_str().unwrap().to_string();

        let (status, body) = send(&app, get_with_token(Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["userId"].as_i64(), Some(user_id));

        let (status, body) = send(&app, get_with_token(Some("garbage"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(parse(&body)["error"]["message"], INVALID_TOKEN_MESSAGE);
    }

    #[tokio::test]
    async fn test_token_verifies_to_registered_user() {
        let app = app();

        let (_, body) = send(&app, post_json("/auth/register", credentials("a@x.com", "pw123"))).await;
        let user_id = parse(&body)["userId"].as_i64().unwrap();
        let (_, body) = send(&app, post_json("/auth/login", credentials("a@x.com", "pw123"))).await;
        let token = parse(&body)["token"].as_str().unwrap().to_string();

        let verifier = JwtService::new(JwtConfig::with_secret(SECRET));
        assert_eq!(verifier.verify(&token).unwrap().value(), user_id);

        let other = JwtService::new(JwtConfig::with_secret("another-secret"));
        assert!(other.verify(&token).is_err());
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let app = app();

        for body in [
            json!({ "password": "pw123" }),
            json!({ "email": "a@x.com" }),
            json!({}),
            credentials("", "pw123"),
        ] {
            let (status, bytes) = send(&app, post_json("/auth/register", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                parse(&bytes)["error"]["message"],
                "Email and password are required"
            );
        }
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let state = AuthState::in_memory(JwtConfig::with_secret(SECRET));
        let app = app_with(state.clone());

        let (status, _) = send(&app, post_json("/auth/register", credentials("a@x.com", "pw123"))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, post_json("/auth/register", credentials("a@x.com", "other"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&body)["error"]["message"], "User already registered");

        assert_eq!(state.user_service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let app = app();
        send(&app, post_json("/auth/register", credentials("a@x.com", "pw123"))).await;

        let (wrong_status, wrong_body) =
            send(&app, post_json("/auth/login", credentials("a@x.com", "nope"))).await;
        let (unknown_status, unknown_body) =
            send(&app, post_json("/auth/login", credentials("b@x.com", "pw123"))).await;
        let (missing_status, missing_body) =
            send(&app, post_json("/auth/login", json!({ "email": "a@x.com" }))).await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);
        assert_eq!(wrong_body, missing_body);
        assert_eq!(parse(&wrong_body)["error"]["message"], INVALID_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_protected_accepts_lowercase_scheme() {
        let app = app();
        let token = JwtService::new(JwtConfig::with_secret(SECRET))
            .issue(UserId::new(5).unwrap())
            .unwrap()
            .token;

        let request = Request::builder()
            .uri("/auth/protected")
            .header(header::AUTHORIZATION, format!("bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["userId"].as_i64(), Some(5));
    }

    #[tokio::test]
    async fn test_protected_rejections_share_one_body() {
        let app = app();
        let service = JwtService::new(JwtConfig::with_secret(SECRET));
        let user = UserId::new(1).unwrap();

        let expired = service
            .issue_at(user, Utc::now() - Duration::hours(2))
            .unwrap()
            .token;
        let foreign = JwtService::new(JwtConfig::with_secret("other"))
            .issue(user)
            .unwrap()
            .token;

        let (_, reference) = send(&app, get_with_token(None)).await;

        for token in [Some(expired.as_str()), Some(foreign.as_str()), Some("")] {
            let (status, body) = send(&app, get_with_token(token)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, reference);
        }
    }

    #[tokio::test]
    async fn test_protected_does_not_consult_store() {
        let repository = Arc::new(MockUserRepository::new());
        repository.set_should_fail(true).await;
        let state = AuthState::new(
            Arc::new(UserService::new(repository, Arc::new(Argon2Hasher::new()))),
            Arc::new(JwtService::new(JwtConfig::with_secret(SECRET))),
        );
        let token = state
            .token_service
            .issue(UserId::new(5).unwrap())
            .unwrap()
            .token;
        let app = app_with(state);

        let (status, body) = send(&app, get_with_token(Some(&token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["userId"], 5);
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_500() {
        let repository = Arc::new(MockUserRepository::new());
        repository.set_should_fail(true).await;
        let state = AuthState::new(
            Arc::new(UserService::new(repository, Arc::new(Argon2Hasher::new()))),
            Arc::new(JwtService::new(JwtConfig::with_secret(SECRET))),
        );
        let app = app_with(state);

        let (status, body) = send(&app, post_json("/auth/login", credentials("a@x.com", "pw123"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse(&body)["error"]["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&body)["error"]["type"], "invalid_request_error");
    }
}
