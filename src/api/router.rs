use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::admin;
use super::auth;
use super::health;
use super::state::AppState;
use crate::config::CorsConfig;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .nest("/api/auth", auth::create_auth_router())
        .nest("/api", admin::create_admin_router())
        .with_state(state)
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy; an empty origin list allows any origin
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::notification::{MockOnboardingNotifier, NotificationOutcome};
    use crate::domain::RoleRepository;
    use crate::infrastructure::auth::{JwtConfig, JwtService};
    use crate::infrastructure::branch::{BranchService, InMemoryBranchRepository};
    use crate::infrastructure::role::InMemoryRoleRepository;
    use crate::infrastructure::user::{
        AdminAccount, Argon2Hasher, CredentialGenerator, InMemoryUserRepository, UserService,
        UserServiceTrait,
    };

    const TEMP_PASSWORD: &str = "Welcome7";

    #[derive(Debug)]
    struct FixedGenerator;

    impl CredentialGenerator for FixedGenerator {
        fn temporary_password(&self) -> String {
            TEMP_PASSWORD.to_string()
        }
    }

    async fn test_app() -> Router {
        let mut notifier = MockOnboardingNotifier::new();
        notifier
            .expect_send()
            .returning(|_| NotificationOutcome::Delivered { message_id: None });
        notifier.expect_name().return_const("mock");

        let roles: Arc<dyn RoleRepository> = Arc::new(InMemoryRoleRepository::seeded());
        let user_service = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            roles.clone(),
            Arc::new(Argon2Hasher::fast()),
            Arc::new(FixedGenerator),
            Arc::new(notifier),
        ));

        user_service
            .ensure_admin(AdminAccount {
                full_name: "System Admin".to_string(),
                username: "admin".to_string(),
                email: "admin@eyecare.com".to_string(),
                password: "admin-pass".to_string(),
            })
            .await
            .unwrap();

        let state = AppState::new(
            user_service,
            Arc::new(BranchService::new(Arc::new(InMemoryBranchRepository::new()))),
            Arc::new(JwtService::new(JwtConfig::new("router-test-secret", 1)).unwrap()),
            roles,
        );

        create_router_with_state(state, &CorsConfig::default())
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn login(app: &Router, username: &str, password: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    fn doctor_body(username: &str) -> Value {
        json!({
            "fullName": "Dr. Iris Lens",
            "username": username,
            "email": format!("{}@example.com", username),
            "roleName": "DOCTOR",
            "licenseNumber": "LIC-100",
            "specialization": "Retina"
        })
    }

    #[tokio::test]
    async fn test_banner_and_health() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Eye Care System API is running");

        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, "GET", "/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "role_directory");
    }

    #[tokio::test]
    async fn test_login_flow() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "validation_error");

        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid credentials");

        let token = login(&app, "admin", "admin-pass").await;
        let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "admin");
        assert_eq!(body["user"]["roleName"], "ADMIN");
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_user_routes_require_admin() {
        let app = test_app().await;

        let (status, _) = send(&app, "GET", "/api/users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "GET", "/api/users", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin = login(&app, "admin", "admin-pass").await;
        let (status, _) = send(
            &app,
            "POST",
            "/api/users",
            Some(&admin),
            Some(json!({
                "fullName": "Rita Desk",
                "username": "rita",
                "email": "rita@example.com",
                "roleName": "RECEPTIONIST"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let receptionist = login(&app, "rita", TEMP_PASSWORD).await;
        let (status, body) = send(&app, "GET", "/api/users", Some(&receptionist), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["kind"], "permission_error");
    }

    #[tokio::test]
    async fn test_create_doctor() {
        let app = test_app().await;
        let admin = login(&app, "admin", "admin-pass").await;

        let (status, body) =
            send(&app, "POST", "/api/users", Some(&admin), Some(doctor_body("iris"))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User created successfully");
        assert_eq!(body["emailSent"], true);
        assert_eq!(body["user"]["roleName"], "DOCTOR");
        assert_eq!(body["user"]["doctor"]["licenseNumber"], "LIC-100");
    }

    #[tokio::test]
    async fn test_create_errors() {
        let app = test_app().await;
        let admin = login(&app, "admin", "admin-pass").await;

        let mut missing_license = doctor_body("nolicense");
        missing_license["licenseNumber"] = Value::Null;
        let (status, body) =
            send(&app, "POST", "/api/users", Some(&admin), Some(missing_license)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "validation_error");

        let mut unknown_role = doctor_body("nurse");
        unknown_role["roleName"] = json!("NURSE");
        let (status, body) =
            send(&app, "POST", "/api/users", Some(&admin), Some(unknown_role)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "invalid_role");

        let mut duplicate = doctor_body("admin");
        duplicate["email"] = json!("someone-else@example.com");
        let (status, body) = send(&app, "POST", "/api/users", Some(&admin), Some(duplicate)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "conflict");

        let (status, body) = send(&app, "GET", "/api/users", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["username"], "admin");
        assert!(users[0].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let app = test_app().await;
        let admin = login(&app, "admin", "admin-pass").await;

        let (_, created) =
            send(&app, "POST", "/api/users", Some(&admin), Some(doctor_body("iris"))).await;
        let id = created["user"]["id"].as_str().unwrap().to_string();
        let uri = format!("/api/users/{}", id);

        let (status, body) = send(
            &app,
            "PUT",
            &uri,
            Some(&admin),
            Some(json!({ "roleName": "RECEPTIONIST" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["user"]["roleName"], "RECEPTIONIST");
        assert!(body["user"].get("doctor").is_none());

        let (status, body) = send(
            &app,
            "PUT",
            &uri,
            Some(&admin),
            Some(json!({ "password": "12345" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "validation_error");

        let (status, body) = send(&app, "DELETE", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted successfully");

        let (status, body) = send(&app, "GET", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["kind"], "not_found");

        let (status, _) = send(&app, "GET", "/api/users/not-a-uuid", Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_branch_routes() {
        let app = test_app().await;
        let admin = login(&app, "admin", "admin-pass").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/branches",
            Some(&admin),
            Some(json!({ "branchName": "Downtown", "address": "1 Main St", "phone": "555-0100" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Branch created successfully");
        let id = body["branch"]["id"].as_i64().unwrap();
        let uri = format!("/api/branches/{}", id);

        let (status, body) = send(
            &app,
            "POST",
            "/api/branches",
            Some(&admin),
            Some(json!({ "branchName": "Uptown" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "validation_error");

        let (status, body) = send(
            &app,
            "PUT",
            &uri,
            Some(&admin),
            Some(json!({ "phone": "555-0199" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["branch"]["phone"], "555-0199");
        assert_eq!(body["branch"]["branchName"], "Downtown");

        let (status, body) = send(&app, "GET", "/api/branches", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let branches = body.as_array().unwrap();
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0]["branchName"], "Downtown");

        let (status, _) = send(&app, "DELETE", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_shape() {
        let app = test_app().await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["kind"], "validation_error");
    }
}
