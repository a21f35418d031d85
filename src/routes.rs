//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod auth;
mod catalog;
mod extract;
mod newsletter;
mod options;
mod quotes;
mod translations;

use crate::auth::admin_guard;
use crate::config::Settings;
use crate::error::AppError;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Public site
        .route("/api/quotes", post(quotes::submit_quote))
        .route("/api/catalog/featured", get(catalog::featured))
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/{slug}", get(catalog::get_product))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/newsletter/subscribe", post(newsletter::subscribe))
        .route("/api/newsletter/unsubscribe", post(newsletter::unsubscribe))
        .route("/api/translations", get(translations::get_translations))
        .route("/api/languages", get(translations::list_languages))
        .route("/api/languages/current", post(translations::set_current_language))
        .route("/api/options", get(options::list_options))
        .route("/api/admin/auth/login", post(auth::login))
        // Back office
        .merge(admin_routes(state.clone()))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        // Apply middleware and state
        .layer(middleware)
        .with_state(state)
}

/// Routes behind the admin guard
fn admin_routes(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/api/admin/auth/me", get(auth::me))
        .route(
            "/api/admin/quotes",
            get(quotes::list_quotes).post(quotes::create_quote),
        )
        .route(
            "/api/admin/quotes/{id}",
            get(quotes::get_quote)
                .put(quotes::update_quote)
                .delete(quotes::delete_quote),
        )
        .route(
            "/api/admin/products",
            get(catalog::admin_list_products).post(catalog::create_product),
        )
        .route(
            "/api/admin/products/{id}",
            get(catalog::admin_get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route(
            "/api/admin/categories",
            get(catalog::admin_list_categories).post(catalog::create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            get(catalog::admin_get_category)
                .put(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .route("/api/admin/newsletter/subscribers", get(newsletter::list_subscribers))
        .route(
            "/api/admin/newsletter/subscribers/{id}",
            axum::routing::delete(newsletter::delete_subscriber),
        )
        .route("/api/admin/options/{key}", put(options::put_option))
        .route_layer(middleware::from_fn_with_state(state, admin_guard))
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

#[derive(Serialize)]
struct HealthBody {
    timestamp: String,
    version: &'static str,
}

/// Health check endpoint
async fn health_check() -> Json<SuccessResponse<HealthBody>> {
    Json(SuccessResponse::with_data(
        "Server is running fine.",
        HealthBody {
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        },
    ))
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{hash_password, JwtKeys};
    use crate::repository::memory::{
        MemoryAdmins, MemoryCatalog, MemoryOptions, MemoryQuotes, MemorySubscribers,
        MemoryTranslations,
    };
    use crate::repository::AdminUserRepository;
    use crate::state::{AppState, Repositories};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Harness {
        app: Router,
        quotes: Arc<MemoryQuotes>,
        token: String,
    }

    async fn harness() -> Harness {
        let quotes = Arc::new(MemoryQuotes::default());
        let catalog = Arc::new(MemoryCatalog::default());
        let translations = Arc::new(MemoryTranslations::default());
        translations.add_language("en", "English", true, true).await;
        translations.add_entry("en", "common", "hello", "Hello").await;

        let admins = Arc::new(MemoryAdmins::default());
        let hash = hash_password("s3cret-pass").unwrap();
        let admin = admins.insert("admin@example.com", &hash, None).await.unwrap();
        admins.insert("legacy@example.com", "not-a-bcrypt-hash", None).await.unwrap();

        let jwt = JwtKeys::new("router-test-secret", 60);
        let token = jwt.create_token(admin.id, &admin.email).unwrap();

        let repos = Repositories {
            quotes: quotes.clone(),
            products: catalog.clone(),
            categories: catalog,
            subscribers: Arc::new(MemorySubscribers::default()),
            translations,
            options: Arc::new(MemoryOptions::default()),
            admins,
        };
        let state = Arc::new(AppState::new(repos, jwt));

        Harness {
            app: create_router(state, &Settings::default()),
            quotes,
            token,
        }
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn quote_payload() -> Value {
        json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "items": [{ "productName": "Server rack", "quantity": 2 }]
        })
    }

    #[tokio::test]
    async fn test_health_uses_success_envelope() {
        let h = harness().await;
        let (status, body) = send(&h.app, request("GET", "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_submit_quote_returns_receipt() {
        let h = harness().await;
        let (status, body) = send(&h.app, request("POST", "/api/quotes", None, Some(quote_payload()))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "success");
        assert_eq!(body["quote"]["status"], "PENDING");
        assert!(body["quote"]["reference"].as_str().unwrap().starts_with("QR-"));
        assert_eq!(h.quotes.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_quote_is_422_without_storage() {
        let h = harness().await;
        let mut payload = quote_payload();
        payload.as_object_mut().unwrap().remove("email");

        let (status, body) = send(&h.app, request("POST", "/api/quotes", None, Some(payload))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "error");
        assert_eq!(body["field"], "email");
        assert_eq!(body["rule"], "required");
        assert_eq!(h.quotes.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let h = harness().await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/quotes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&h.app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_admin_routes_reject_missing_token_without_side_effects() {
        let h = harness().await;
        let (_, body) = send(&h.app, request("POST", "/api/quotes", None, Some(quote_payload()))).await;
        let id = body["quote"]["id"].as_str().unwrap().to_string();
        let calls_before = h.quotes.calls();

        for _ in 0..2 {
            let uri = format!("/api/admin/quotes/{}", id);
            let (status, body) = send(&h.app, request("DELETE", &uri, None, None)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["code"], "UNAUTHORIZED");
        }

        let (status, _) = send(&h.app, request("GET", "/api/admin/quotes", Some("garbage"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        assert_eq!(h.quotes.calls(), calls_before);
        assert_eq!(h.quotes.len().await, 1);
    }

    #[tokio::test]
    async fn test_admin_quote_lifecycle() {
        let h = harness().await;
        let token = Some(h.token.as_str());
        let (_, body) = send(&h.app, request("POST", "/api/quotes", None, Some(quote_payload()))).await;
        let id = body["quote"]["id"].as_str().unwrap().to_string();
        let uri = format!("/api/admin/quotes/{}", id);

        let (status, body) = send(&h.app, request("GET", "/api/admin/quotes?status=PENDING", token, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);

        let (status, body) = send(
            &h.app,
            request("PUT", &uri, token, Some(json!({ "status": "CLOSED" }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quote"]["status"], "CLOSED");

        let (status, body) = send(
            &h.app,
            request("PUT", &uri, token, Some(json!({ "status": "REVIEWED" }))),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["rule"], "transition");

        let (status, _) = send(&h.app, request("DELETE", &uri, token, None)).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&h.app, request("DELETE", &uri, token, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_bad_path_id_is_400() {
        let h = harness().await;
        let (status, _) = send(
            &h.app,
            request("GET", "/api/admin/quotes/not-a-uuid", Some(h.token.as_str()), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let h = harness().await;

        let (status, body) = send(
            &h.app,
            request(
                "POST",
                "/api/admin/auth/login",
                None,
                Some(json!({ "email": "Admin@Example.com", "password": "s3cret-pass" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokenType"], "Bearer");
        assert!(body["admin"].get("passwordHash").is_none());
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(&h.app, request("GET", "/api/admin/auth/me", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["admin"]["email"], "admin@example.com");

        let (status, _) = send(
            &h.app,
            request(
                "POST",
                "/api/admin/auth/login",
                None,
                Some(json!({ "email": "admin@example.com", "password": "wrong" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_with_corrupt_stored_hash_is_500() {
        let h = harness().await;

        let (status, body) = send(
            &h.app,
            request(
                "POST",
                "/api/admin/auth/login",
                None,
                Some(json!({ "email": "legacy@example.com", "password": "anything" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(body.get("token").is_none());
    }

    #[tokio::test]
    async fn test_newsletter_status_codes() {
        let h = harness().await;
        let payload = json!({ "email": "reader@example.com" });

        let (status, body) = send(&h.app, request("POST", "/api/newsletter/subscribe", None, Some(payload.clone()))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["alreadySubscribed"], false);

        let (status, body) = send(&h.app, request("POST", "/api/newsletter/subscribe", None, Some(payload))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alreadySubscribed"], true);
    }

    #[tokio::test]
    async fn test_language_selection_sets_cookie() {
        let h = harness().await;
        let response = h
            .app
            .clone()
            .oneshot(request("POST", "/api/languages/current", None, Some(json!({ "language": "en" }))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("lang=en;"));

        let (status, body) = send(&h.app, request("GET", "/api/translations?lang=en", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translations"]["common"]["hello"], "Hello");

        let (status, _) = send(&h.app, request("GET", "/api/translations?lang=zz", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_options_are_public_to_read_and_admin_to_write() {
        let h = harness().await;
        let payload = Some(json!({ "value": "Vitrine" }));

        let (status, _) = send(&h.app, request("PUT", "/api/admin/options/site_title", None, payload.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &h.app,
            request("PUT", "/api/admin/options/site_title", Some(h.token.as_str()), payload),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&h.app, request("GET", "/api/options", None, None)).await;
        assert_eq!(body["options"][0]["key"], "site_title");
        assert_eq!(body["options"][0]["value"], "Vitrine");
    }

    #[tokio::test]
    async fn test_unknown_route_and_wrong_method() {
        let h = harness().await;

        let (status, body) = send(&h.app, request("GET", "/api/nope", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");

        let (status, body) = send(&h.app, request("DELETE", "/api/products", None, None)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
    }
}
