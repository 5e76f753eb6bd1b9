use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::domain::{Folder, ProductFolderLink, Requester};
use super::repository::ShopRepository;
use crate::errors::ServiceError;

/// Folder management and product/folder association.
pub struct FolderService<R: ShopRepository> {
    repo: Arc<R>,
}

impl<R: ShopRepository> FolderService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Link a product to a folder.
    ///
    /// Checks run in a fixed order: product exists, folder exists, requester
    /// owns both, pair not linked yet.
    #[instrument(skip(self), fields(product_id = %product_id, folder_id = %folder_id, user_id = %requester.user_id))]
    pub async fn add_product_to_folder(
        &self,
        product_id: Uuid,
        folder_id: Uuid,
        requester: &Requester,
    ) -> Result<ProductFolderLink, ServiceError> {
        let product = self.repo.find_product(product_id).await?.ok_or_else(|| ServiceError::not_found("product"))?;
        let folder = self.repo.find_folder(folder_id).await?.ok_or_else(|| ServiceError::not_found("folder"))?;

        if !requester.owns(product.owner_id) || !requester.owns(folder.owner_id) {
            warn!("folder_link_forbidden");
            return Err(ServiceError::Forbidden("product or folder belongs to another user".into()));
        }

        if self.repo.find_link(product_id, folder_id).await?.is_some() {
            return Err(ServiceError::Conflict("product already in folder".into()));
        }

        // a concurrent insert of the same pair is rejected by the store as Conflict
        let link = self.repo.insert_link(product_id, folder_id).await?;
        info!(link_id = %link.id, "product_added_to_folder");
        Ok(link)
    }

    /// Create several folders at once; all are created or none.
    ///
    /// # Examples
    /// ```
    /// use service::shop::{FolderService, repository::mock::InMemoryShopRepository};
    /// use service::shop::domain::Requester;
    /// use models::user::UserRole;
    /// use std::sync::Arc;
    /// let svc = FolderService::new(Arc::new(InMemoryShopRepository::default()));
    /// let owner = Requester::new(uuid::Uuid::new_v4(), UserRole::User);
    /// let names = vec!["Gifts".to_string(), "Tech".to_string()];
    /// let folders = tokio_test::block_on(svc.create_folders(&names, &owner)).unwrap();
    /// assert_eq!(folders.len(), 2);
    /// ```
    #[instrument(skip(self, names), fields(user_id = %requester.user_id, count = names.len()))]
    pub async fn create_folders(&self, names: &[String], requester: &Requester) -> Result<Vec<Folder>, ServiceError> {
        if names.is_empty() {
            return Err(ServiceError::Validation("at least one folder name required".into()));
        }
        let mut seen = HashSet::with_capacity(names.len());
        let mut cleaned = Vec::with_capacity(names.len());
        for raw in names {
            let name = raw.trim();
            models::folder::validate_name(name)?;
            if !seen.insert(name.to_string()) {
                return Err(ServiceError::Conflict(format!("duplicate folder name in request: {name}")));
            }
            cleaned.push(name.to_string());
        }

        let existing = self.repo.list_folders_by_owner(requester.user_id).await?;
        if let Some(taken) = existing.iter().find(|f| seen.contains(&f.name)) {
            return Err(ServiceError::Conflict(format!("folder name already in use: {}", taken.name)));
        }

        let folders = self.repo.insert_folders(requester.user_id, &cleaned).await?;
        info!(created = folders.len(), "folders_created");
        Ok(folders)
    }

    pub async fn list_folders(&self, requester: &Requester) -> Result<Vec<Folder>, ServiceError> {
        self.repo.list_folders_by_owner(requester.user_id).await
    }
}
