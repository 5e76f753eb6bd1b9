use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use configs::DatabaseConfig;
use models::user::{self, UserRole};
use server::routes::{self, auth};

const SECRET: &str = "test-secret";

struct TestApp {
    router: Router,
    db: DatabaseConnection,
}

async fn app() -> anyhow::Result<TestApp> {
    let db = models::db::connect_with_config(&DatabaseConfig::sqlite_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    let state = auth::ServerState::new(db.clone(), auth::ServerAuthConfig { jwt_secret: SECRET.into() }, 50);
    Ok(TestApp { router: routes::build_router(state, CorsLayer::very_permissive()), db })
}

fn token_for(uid: Uuid, secret: &str, ttl_secs: i64) -> anyhow::Result<String> {
    let exp = (chrono::Utc::now().timestamp() + ttl_secs) as usize;
    let claims = auth::Claims { sub: Some("tester".into()), uid, exp };
    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))?)
}

async fn user_token(db: &DatabaseConnection, name: &str, role: UserRole) -> anyhow::Result<(Uuid, String)> {
    let u = user::create(db, name, &format!("{name}@example.com"), role).await?;
    Ok((u.id, token_for(u.id, SECRET, 3600)?))
}

async fn call(app: &TestApp, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(b.to_string()))?,
        None => req.body(Body::empty())?,
    };
    let res = app.router.clone().oneshot(req).await?;
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

#[tokio::test]
async fn health_and_docs_are_public() -> anyhow::Result<()> {
    let app = app().await?;
    let (status, body) = call(&app, Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&app, Method::GET, "/api-docs/openapi.json", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/products"].is_object());
    let params: Vec<&str> = body["paths"]["/api/products"]["get"]["parameters"]
        .as_array()
        .map(|ps| ps.iter().filter_map(|p| p["name"].as_str()).collect())
        .unwrap_or_default();
    for name in ["page", "size", "sortBy", "isAsc"] {
        assert!(params.contains(&name), "listing parameter {name} undocumented");
    }
    let folder_params = &body["paths"]["/api/folders/{id}/products"]["get"]["parameters"];
    assert_eq!(folder_params.as_array().map(Vec::len), Some(5));
    Ok(())
}

#[tokio::test]
async fn api_requires_valid_token() -> anyhow::Result<()> {
    let app = app().await?;
    let (status, _) = call(&app, Method::GET, "/api/products", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (uid, _) = user_token(&app.db, "token_owner", UserRole::User).await?;
    let forged = token_for(uid, "wrong-secret", 3600)?;
    let (status, _) = call(&app, Method::GET, "/api/products", Some(&forged), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = token_for(uid, SECRET, -3600)?;
    let (status, _) = call(&app, Method::GET, "/api/products", Some(&expired), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let ghost = token_for(Uuid::new_v4(), SECRET, 3600)?;
    let (status, body) = call(&app, Method::GET, "/api/products", Some(&ghost), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn product_lifecycle_over_http() -> anyhow::Result<()> {
    let app = app().await?;
    let (uid, tok) = user_token(&app.db, "shopper_one", UserRole::User).await?;

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/products",
        Some(&tok),
        Some(json!({"title": "Desk Lamp", "image": "https://img/lamp", "link": "https://shop/lamp", "lprice": 4200})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["owner_id"], uid.to_string());
    assert_eq!(created["myprice"], 0);
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = call(&app, Method::PUT, &format!("/api/products/{id}"), Some(&tok), Some(json!({"myprice": 99}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2001);

    let (status, updated) = call(&app, Method::PUT, &format!("/api/products/{id}"), Some(&tok), Some(json!({"myprice": 3900}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["myprice"], 3900);
    assert_eq!(updated["lprice"], 4200);

    let missing = Uuid::new_v4();
    let (status, _) = call(&app, Method::PUT, &format!("/api/products/{missing}"), Some(&tok), Some(json!({"myprice": 3900}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn listing_respects_role_and_paging() -> anyhow::Result<()> {
    let app = app().await?;
    let (_, u1) = user_token(&app.db, "lister_one", UserRole::User).await?;
    let (_, u2) = user_token(&app.db, "lister_two", UserRole::User).await?;
    let (_, admin) = user_token(&app.db, "lister_admin", UserRole::Admin).await?;

    for (tok, title, price) in [(&u1, "A", 100), (&u1, "B", 300), (&u1, "C", 200), (&u2, "D", 900)] {
        let (status, _) = call(&app, Method::POST, "/api/products", Some(tok), Some(json!({"title": title, "lprice": price}))).await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = call(&app, Method::GET, "/api/products?page=1&size=2&sortBy=lprice&isAsc=true", Some(&u1), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_elements"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["page"], 0);
    assert_eq!(page["content"][0]["lprice"], 100);
    assert_eq!(page["content"][1]["lprice"], 200);

    let (_, page) = call(&app, Method::GET, "/api/products?page=2&size=2&sortBy=lprice&isAsc=true", Some(&u1), None).await?;
    assert_eq!(page["content"][0]["lprice"], 300);

    let (_, page) = call(&app, Method::GET, "/api/products?sortBy=lprice", Some(&admin), None).await?;
    assert_eq!(page["total_elements"], 4);
    assert_eq!(page["content"][0]["lprice"], 900);

    let (status, body) = call(&app, Method::GET, "/api/products?page=18446744073709551615", Some(&u1), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2001);

    let (status, body) = call(&app, Method::GET, "/api/products?sortBy=password", Some(&u1), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    Ok(())
}

#[tokio::test]
async fn folders_and_membership_over_http() -> anyhow::Result<()> {
    let app = app().await?;
    let (_, u1) = user_token(&app.db, "folder_one", UserRole::User).await?;
    let (_, u2) = user_token(&app.db, "folder_two", UserRole::User).await?;

    let (status, folders) = call(&app, Method::POST, "/api/folders", Some(&u1), Some(json!({"folderNames": ["Gifts", "Tech"]}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let folder_id = folders[0]["id"].as_str().unwrap_or_default().to_string();

    let (status, _) = call(&app, Method::POST, "/api/folders", Some(&u1), Some(json!({"folderNames": ["Gifts"]}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, listed) = call(&app, Method::GET, "/api/folders", Some(&u1), None).await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));

    let (_, product) = call(&app, Method::POST, "/api/products", Some(&u1), Some(json!({"title": "Speaker", "lprice": 8000}))).await?;
    let product_id = product["id"].as_str().unwrap_or_default().to_string();
    call(&app, Method::POST, "/api/products", Some(&u1), Some(json!({"title": "Loose", "lprice": 10}))).await?;

    let link_uri = format!("/api/products/{product_id}/folder?folderId={folder_id}");
    let (status, _) = call(&app, Method::POST, &link_uri, Some(&u2), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, link) = call(&app, Method::POST, &link_uri, Some(&u1), None).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(link["folder_id"], folder_id);

    let (status, _) = call(&app, Method::POST, &format!("/api/products/{product_id}/folder"), Some(&u1), Some(json!({"folderId": folder_id}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, page) = call(&app, Method::GET, &format!("/api/folders/{folder_id}/products"), Some(&u1), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_elements"], 1);
    assert_eq!(page["content"][0]["id"], product_id);

    let (status, _) = call(&app, Method::GET, &format!("/api/folders/{folder_id}/products"), Some(&u2), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, Method::POST, &format!("/api/products/{product_id}/folder"), Some(&u1), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
