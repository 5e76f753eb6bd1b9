use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::pagination::Page;
use service::shop::domain::{Folder, Product, Requester};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;
use crate::routes::products::ListQuery;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoldersInput {
    pub folder_names: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/folders",
    request_body = crate::openapi::CreateFoldersDoc,
    responses(
        (status = 201, description = "Folders created", body = [crate::openapi::FolderDoc]),
        (status = 409, description = "Name already in use")
    ),
    security(("bearer" = [])),
    tag = "folders"
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    Json(input): Json<CreateFoldersInput>,
) -> Result<(StatusCode, Json<Vec<Folder>>), JsonApiError> {
    let folders = state.folders.create_folders(&input.folder_names, &requester).await?;
    Ok((StatusCode::CREATED, Json(folders)))
}

#[utoipa::path(
    get,
    path = "/api/folders",
    responses((status = 200, description = "Caller's folders", body = [crate::openapi::FolderDoc])),
    security(("bearer" = [])),
    tag = "folders"
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
) -> Result<Json<Vec<Folder>>, JsonApiError> {
    Ok(Json(state.folders.list_folders(&requester).await?))
}

#[utoipa::path(
    get,
    path = "/api/folders/{id}/products",
    params(
        ("id" = Uuid, Path, description = "Folder id"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Page of products in the folder", body = crate::openapi::ProductPageDoc),
        (status = 403, description = "Folder belongs to another user"),
        (status = 404, description = "No such folder")
    ),
    security(("bearer" = [])),
    tag = "folders"
)]
pub async fn products(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    Path(id): Path<Uuid>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page<Product>>, JsonApiError> {
    let req = q.to_page_request()?;
    Ok(Json(state.products.list_products_in_folder(id, &req, &requester).await?))
}
