use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::TokenService;
use crate::photos::processing::sample_png;
use crate::store::MemoryStore;
use crate::AppState;

const BOUNDARY: &str = "potluck-test-boundary";
const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

fn app_with_store(store: Arc<MemoryStore>) -> (Router, Arc<TokenService>) {
    let tokens = Arc::new(TokenService::new("router-test", chrono::Duration::hours(1)));
    let state = AppState {
        store,
        tokens: tokens.clone(),
        max_upload_bytes: MAX_UPLOAD_BYTES,
    };
    (
        crate::app(state, HeaderValue::from_static("http://localhost:5173")),
        tokens,
    )
}

fn test_app() -> Router {
    app_with_store(Arc::new(MemoryStore::new())).0
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn bare_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn multipart_body(fields: &[(&str, &str)], image: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(data) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"dish.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: Method, uri: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

const PANCAKES: &[(&str, &str)] = &[
    ("name", "Pancakes"),
    ("ingredients", "eggs, milk, flour"),
    ("timeToCook", "20 min"),
    ("steps", "Mix well. Bake for 20 min."),
];

async fn register(app: &Router, username: &str) -> (String, String) {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/register",
            None,
            json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "secret1",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

async fn create_pancakes(app: &Router, token: &str) -> Value {
    let (status, body) = send(
        app,
        multipart_request(
            Method::POST,
            "/recipes",
            Some(token),
            multipart_body(PANCAKES, Some(&sample_png(64, 48))),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["recipe"].clone()
}

#[tokio::test]
async fn test_owner_delete_clears_other_users_favorites() {
    let app = test_app();
    let (alice, alice_id) = register(&app, "alice").await;
    let (bob, _) = register(&app, "bob").await;

    let recipe = create_pancakes(&app, &alice).await;
    let recipe_id = recipe["id"].as_str().unwrap().to_string();
    assert_eq!(recipe["user"], alice_id.as_str());
    assert_eq!(recipe["ingredients"], json!(["eggs", "milk", "flour"]));
    assert_eq!(recipe["steps"], json!(["Mix well", "Bake for 20 min"]));

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/favorites/toggle",
            Some(&bob),
            json!({ "recipeId": recipe_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Added to favorites");
    assert_eq!(body["data"]["recipeId"], recipe_id.as_str());

    let (_, body) = send(&app, bare_request(Method::GET, "/favorites", Some(&bob))).await;
    assert_eq!(body["data"][0]["recipeId"]["name"], "Pancakes");

    let (status, body) = send(
        &app,
        bare_request(Method::DELETE, &format!("/recipes/{}", recipe_id), Some(&alice)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Recipe deleted successfully and removed from favorites"
    );

    let (status, body) = send(&app, bare_request(Method::GET, "/favorites", Some(&bob))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(
        &app,
        bare_request(Method::GET, &format!("/recipes/{}", recipe_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        bare_request(Method::GET, recipe["image"].as_str().unwrap(), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_twice_removes_favorite() {
    let app = test_app();
    let (token, _) = register(&app, "carol").await;
    let recipe = create_pancakes(&app, &token).await;
    let toggle = || {
        json_request(
            Method::POST,
            "/favorites/toggle",
            Some(&token),
            json!({ "recipeId": recipe["id"] }),
        )
    };

    send(&app, toggle()).await;
    let (status, body) = send(&app, toggle()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Removed from favorites");
    assert!(body.get("data").is_none());

    let (_, body) = send(&app, bare_request(Method::GET, "/favorites", Some(&token))).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_toggle_requires_recipe_id() {
    let app = test_app();
    let (token, _) = register(&app, "dave").await;

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/favorites/toggle", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Recipe ID is required");

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/favorites/toggle",
            Some(&token),
            json!({ "recipeId": "not-a-uuid" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app();

    for request in [
        bare_request(Method::GET, "/favorites", None),
        bare_request(Method::GET, "/my-recipes", None),
        bare_request(Method::DELETE, "/recipes/00000000-0000-0000-0000-000000000000", None),
        json_request(Method::POST, "/favorites/toggle", None, json!({})),
        multipart_request(Method::POST, "/recipes", None, multipart_body(PANCAKES, None)),
        bare_request(Method::GET, "/my-recipes", Some("not-a-jwt")),
    ] {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_non_owner_cannot_modify_recipe() {
    let app = test_app();
    let (alice, _) = register(&app, "erin").await;
    let (mallory, _) = register(&app, "mallory").await;
    let recipe = create_pancakes(&app, &alice).await;
    let uri = format!("/recipes/{}", recipe["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        multipart_request(
            Method::PUT,
            &uri,
            Some(&mallory),
            multipart_body(&[("name", "Stolen")], None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized to update this recipe");

    let (status, body) = send(&app, bare_request(Method::DELETE, &uri, Some(&mallory))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized to delete this recipe");

    let (_, body) = send(&app, bare_request(Method::GET, &uri, None)).await;
    assert_eq!(body["data"]["name"], "Pancakes");
}

#[tokio::test]
async fn test_owner_updates_recipe() {
    let app = test_app();
    let (token, _) = register(&app, "frank").await;
    let recipe = create_pancakes(&app, &token).await;
    let uri = format!("/recipes/{}", recipe["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        multipart_request(
            Method::PUT,
            &uri,
            Some(&token),
            multipart_body(&[("name", "Crepes"), ("ingredients", "eggs, milk")], None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Recipe updated successfully");
    assert_eq!(body["data"]["name"], "Crepes");
    assert_eq!(body["data"]["ingredients"], json!(["eggs", "milk"]));
    assert_eq!(body["data"]["timeToCook"], "20 min");
    assert_eq!(body["data"]["image"], recipe["image"]);

    let (status, body) = send(
        &app,
        multipart_request(
            Method::PUT,
            &uri,
            Some(&token),
            multipart_body(&[], Some(&sample_png(32, 32))),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let new_image = body["data"]["image"].as_str().unwrap().to_string();
    assert_ne!(new_image, recipe["image"].as_str().unwrap());

    let (status, _) = send(
        &app,
        bare_request(Method::GET, recipe["image"].as_str().unwrap(), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(bare_request(Method::GET, &new_image, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_endpoints_keep_array_shape_on_store_failure() {
    let store = Arc::new(MemoryStore::new());
    store.poison();
    let (app, tokens) = app_with_store(store);
    let token = tokens.issue(Uuid::new_v4()).unwrap();

    for uri in ["/favorites", "/my-recipes"] {
        let (status, body) = send(&app, bare_request(Method::GET, uri, Some(&token))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Server Error");
        assert_eq!(body["data"], json!([]));
    }

    let (status, body) = send(&app, bare_request(Method::GET, "/recipes", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_unbounded_upload_limit_still_builds_router() {
    let tokens = Arc::new(TokenService::new("router-test", chrono::Duration::hours(1)));
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        tokens,
        max_upload_bytes: usize::MAX,
    };
    let app = crate::app(state, HeaderValue::from_static("http://localhost:5173"));

    let (status, body) = send(&app, bare_request(Method::GET, "/ping", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn test_create_recipe_validation() {
    let app = test_app();
    let (token, _) = register(&app, "grace").await;

    let (status, body) = send(
        &app,
        multipart_request(
            Method::POST,
            "/recipes",
            Some(&token),
            multipart_body(PANCAKES, None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");

    let oversized = vec![0u8; MAX_UPLOAD_BYTES + 1];
    let (status, body) = send(
        &app,
        multipart_request(
            Method::POST,
            "/recipes",
            Some(&token),
            multipart_body(PANCAKES, Some(&oversized)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["maxSize"], "1MB");
}

#[tokio::test]
async fn test_my_recipes_is_always_a_list() {
    let app = test_app();
    let (token, _) = register(&app, "heidi").await;

    let (status, body) = send(&app, bare_request(Method::GET, "/my-recipes", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    create_pancakes(&app, &token).await;
    let (other, _) = register(&app, "ivan").await;
    create_pancakes(&app, &other).await;

    let (_, body) = send(&app, bare_request(Method::GET, "/my-recipes", Some(&token))).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, bare_request(Method::GET, "/recipes", None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_registration_errors_name_the_field() {
    let app = test_app();
    register(&app, "judy").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/register",
            None,
            json!({ "username": "judy", "email": "other@example.com", "password": "secret1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "username");
    assert_eq!(body["message"], "username already in use");

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/register", None, json!({ "username": "kim" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!({ "username": false, "email": true, "password": true }));
}

#[tokio::test]
async fn test_login_returns_working_token() {
    let app = test_app();
    let (_, user_id) = register(&app, "leo").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/login",
            None,
            json!({ "email": "leo@example.com", "password": "secret1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert!(body["user"].get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, _) = send(&app, bare_request(Method::GET, "/my-recipes", Some(token))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/login",
            None,
            json!({ "email": "leo@example.com", "password": "wrong-one" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_recipe_image_is_served() {
    let app = test_app();
    let (token, _) = register(&app, "mia").await;
    let recipe = create_pancakes(&app, &token).await;
    let image_path = recipe["image"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(bare_request(Method::GET, &image_path, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let response = app
        .clone()
        .oneshot(bare_request(
            Method::GET,
            &format!("{}/thumbnail?size=32", image_path),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");

    let (status, _) = send(&app, bare_request(Method::GET, "/photos/missing", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn test_openapi_lists_every_route() {
    let spec = super::openapi();
    for path in [
        "/",
        "/ping",
        "/register",
        "/login",
        "/recipes",
        "/recipes/{id}",
        "/my-recipes",
        "/favorites",
        "/favorites/toggle",
        "/favorites/{recipe_id}",
        "/photos/{id}",
        "/photos/{id}/thumbnail",
    ] {
        assert!(spec.paths.paths.contains_key(path), "missing {}", path);
    }
}
