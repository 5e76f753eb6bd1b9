use std::sync::Arc;

use axum::{extract::{Request, State}, middleware::Next, response::Response};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::shop::{
    domain::Requester,
    repo::seaorm::SeaOrmShopRepository,
    FolderService, ProductService,
};

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub products: Arc<ProductService<SeaOrmShopRepository>>,
    pub folders: Arc<FolderService<SeaOrmShopRepository>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth: ServerAuthConfig, max_page_size: u64) -> Self {
        let repo = Arc::new(SeaOrmShopRepository::new(db.clone()));
        Self {
            db,
            auth,
            products: Arc::new(ProductService::new(Arc::clone(&repo)).with_max_page_size(max_page_size)),
            folders: Arc::new(FolderService::new(repo)),
        }
    }
}

/// Token claims; `uid` names the user row.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub uid: Uuid,
    pub exp: usize,
}

/// Verify `Authorization: Bearer <token>`, resolve the user and attach a
/// [`Requester`] to the request extensions.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();

    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);
    let Some(token) = token else {
        tracing::warn!(path = %path, "missing or malformed Authorization header");
        return Err(JsonApiError::unauthorized("bearer token required"));
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let claims = match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => data.claims,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "token rejected");
            return Err(JsonApiError::unauthorized("invalid or expired token"));
        }
    };

    let user = models::user::find(&state.db, claims.uid)
        .await
        .map_err(|e| JsonApiError::from(service::errors::ServiceError::from(e)))?;
    let Some(user) = user else {
        tracing::warn!(path = %path, uid = %claims.uid, "token for unknown user");
        return Err(JsonApiError::unauthorized("unknown user"));
    };
    let requester = Requester::try_from(&user)?;

    req.extensions_mut().insert(requester);
    Ok(next.run(req).await)
}
