use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use service::pagination::{Page, PageRequest};
use service::shop::domain::{MyPriceUpdate, NewProduct, Product, ProductFolderLink, Requester, SortField};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

/// Listing query as sent by clients; `page` counts from 1.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size, clamped to the configured maximum
    #[serde(default = "default_size")]
    pub size: u64,
    /// id, title, lprice, myprice, createdAt or modifiedAt
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub is_asc: bool,
}

fn default_page() -> u64 { 1 }
fn default_size() -> u64 { 10 }

impl ListQuery {
    pub fn to_page_request(&self) -> Result<PageRequest, JsonApiError> {
        let sort = match self.sort_by.as_deref() {
            Some(s) => s.parse::<SortField>()?,
            None => SortField::default(),
        };
        Ok(PageRequest::new(self.page.saturating_sub(1), self.size, sort, self.is_asc))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderTarget {
    pub folder_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = crate::openapi::NewProductDoc,
    responses((status = 201, description = "Product registered", body = crate::openapi::ProductDoc)),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), JsonApiError> {
    let product = state.products.create_product(&input, &requester).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = crate::openapi::MyPriceUpdateDoc,
    responses(
        (status = 200, description = "Target price updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Target price below minimum"),
        (status = 404, description = "No such product")
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn update_myprice(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<MyPriceUpdate>,
) -> Result<Json<Product>, JsonApiError> {
    Ok(Json(state.products.update_myprice(&input, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ListQuery),
    responses((status = 200, description = "Page of products", body = crate::openapi::ProductPageDoc)),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page<Product>>, JsonApiError> {
    let req = q.to_page_request()?;
    Ok(Json(state.products.list_products(&requester, &req).await?))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/folder",
    params(
        ("id" = Uuid, Path, description = "Product id"),
        ("folderId" = Option<Uuid>, Query, description = "Target folder; may also be sent in the body")
    ),
    responses(
        (status = 201, description = "Product added to folder", body = crate::openapi::ProductFolderLinkDoc),
        (status = 403, description = "Product or folder belongs to another user"),
        (status = 404, description = "No such product or folder"),
        (status = 409, description = "Already in folder")
    ),
    security(("bearer" = [])),
    tag = "folders"
)]
pub async fn add_to_folder(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    Path(id): Path<Uuid>,
    Query(query): Query<FolderTarget>,
    body: Option<Json<FolderTarget>>,
) -> Result<(StatusCode, Json<ProductFolderLink>), JsonApiError> {
    let folder_id = query
        .folder_id
        .or_else(|| body.and_then(|Json(b)| b.folder_id))
        .ok_or_else(|| JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some("folderId is required".into())))?;
    let link = state.folders.add_product_to_folder(id, folder_id, &requester).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::pagination::Direction;

    #[test]
    fn wire_page_is_one_based() {
        let q = ListQuery { page: 3, size: 20, sort_by: Some("lprice".into()), is_asc: true };
        let req = q.to_page_request().unwrap();
        assert_eq!(req.page, 2);
        assert_eq!(req.sort, SortField::Lprice);
        assert_eq!(req.direction, Direction::Asc);

        let q = ListQuery { page: 0, size: 20, sort_by: None, is_asc: false };
        assert_eq!(q.to_page_request().unwrap().page, 0);
    }

    #[test]
    fn unknown_sort_field_is_bad_request() {
        let q = ListQuery { page: 1, size: 10, sort_by: Some("price; drop table".into()), is_asc: false };
        let err = q.to_page_request().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
