use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub service: String }

#[derive(ToSchema)]
pub struct NewProductDoc { pub title: String, pub image: String, pub link: String, pub lprice: i32 }

#[derive(ToSchema)]
pub struct MyPriceUpdateDoc { pub myprice: i32 }

#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub image: String,
    pub link: String,
    pub lprice: i32,
    pub myprice: i32,
    pub created_at: String,
    pub modified_at: String,
}

#[derive(ToSchema)]
pub struct ProductPageDoc {
    pub content: Vec<ProductDoc>,
    /// Zero-based page index.
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateFoldersDoc { pub folder_names: Vec<String> }

#[derive(ToSchema)]
pub struct FolderDoc { pub id: Uuid, pub owner_id: Uuid, pub name: String, pub created_at: String }

#[derive(ToSchema)]
pub struct ProductFolderLinkDoc { pub id: Uuid, pub product_id: Uuid, pub folder_id: Uuid, pub created_at: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String, pub code: Option<u16>, pub detail: Option<String> }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::create,
        crate::routes::products::update_myprice,
        crate::routes::products::list,
        crate::routes::products::add_to_folder,
        crate::routes::folders::create,
        crate::routes::folders::list,
        crate::routes::folders::products,
    ),
    components(
        schemas(
            HealthResponse,
            NewProductDoc,
            MyPriceUpdateDoc,
            ProductDoc,
            ProductPageDoc,
            CreateFoldersDoc,
            FolderDoc,
            ProductFolderLinkDoc,
            ErrorDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "products"),
        (name = "folders"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/api/products", "/api/products/{id}", "/api/products/{id}/folder", "/api/folders", "/api/folders/{id}/products"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
