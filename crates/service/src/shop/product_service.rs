use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::domain::{ExternalItem, MyPriceUpdate, NewProduct, Product, Requester, MIN_MY_PRICE};
use super::repository::ShopRepository;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest, DEFAULT_MAX_PAGE_SIZE};

/// Product lifecycle: registration, target-price changes, listings and the
/// external price-sync hook.
pub struct ProductService<R: ShopRepository> {
    repo: Arc<R>,
    max_page_size: u64,
}

impl<R: ShopRepository> ProductService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo, max_page_size: DEFAULT_MAX_PAGE_SIZE } }

    pub fn with_max_page_size(mut self, max_page_size: u64) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    /// Register a product of interest for `owner`.
    ///
    /// # Examples
    /// ```
    /// use service::shop::{ProductService, repository::mock::InMemoryShopRepository};
    /// use service::shop::domain::{NewProduct, Requester};
    /// use models::user::UserRole;
    /// use std::sync::Arc;
    /// let svc = ProductService::new(Arc::new(InMemoryShopRepository::default()));
    /// let owner = Requester::new(uuid::Uuid::new_v4(), UserRole::User);
    /// let input = NewProduct { title: "Widget".into(), image: "img".into(), link: "link".into(), lprice: 700 };
    /// let product = tokio_test::block_on(svc.create_product(&input, &owner)).unwrap();
    /// assert_eq!(product.owner_id, owner.user_id);
    /// assert_eq!(product.myprice, 0);
    /// ```
    #[instrument(skip(self, input), fields(owner_id = %owner.user_id, title = %input.title))]
    pub async fn create_product(&self, input: &NewProduct, owner: &Requester) -> Result<Product, ServiceError> {
        let product = self.repo.insert_product(owner.user_id, input).await?;
        info!(product_id = %product.id, "product_created");
        Ok(product)
    }

    /// Set the target price. Rejected below `MIN_MY_PRICE` before any lookup.
    #[instrument(skip(self, input), fields(product_id = %product_id, myprice = input.myprice))]
    pub async fn update_myprice(&self, input: &MyPriceUpdate, product_id: Uuid) -> Result<Product, ServiceError> {
        if input.myprice < MIN_MY_PRICE {
            warn!("myprice_below_minimum");
            return Err(ServiceError::Validation(format!(
                "invalid target price; must be at least {MIN_MY_PRICE}"
            )));
        }
        let product = self
            .repo
            .update_myprice(product_id, input.myprice)
            .await?
            .ok_or_else(|| ServiceError::not_found("product"))?;
        info!("myprice_updated");
        Ok(product)
    }

    /// Page through products visible to `requester`: their own, or all for elevated roles.
    #[instrument(skip(self, req), fields(user_id = %requester.user_id, role = %requester.role))]
    pub async fn list_products(&self, requester: &Requester, req: &PageRequest) -> Result<Page<Product>, ServiceError> {
        let req = req.normalize(self.max_page_size)?;
        if requester.can_view_all() {
            self.repo.page_all(&req).await
        } else {
            self.repo.page_by_owner(requester.user_id, &req).await
        }
    }

    /// Page through the requester's products linked to `folder_id`.
    /// The folder must exist and belong to the requester.
    #[instrument(skip(self, req), fields(folder_id = %folder_id, user_id = %requester.user_id))]
    pub async fn list_products_in_folder(
        &self,
        folder_id: Uuid,
        req: &PageRequest,
        requester: &Requester,
    ) -> Result<Page<Product>, ServiceError> {
        let folder = self.repo.find_folder(folder_id).await?.ok_or_else(|| ServiceError::not_found("folder"))?;
        if !requester.owns(folder.owner_id) {
            warn!("folder_listing_forbidden");
            return Err(ServiceError::Forbidden("folder belongs to another user".into()));
        }
        let req = req.normalize(self.max_page_size)?;
        self.repo.page_by_owner_and_folder(requester.user_id, folder_id, &req).await
    }

    /// Apply a search result to a tracked product. Only `lprice` is taken from the item.
    /// Trusted internal callers only: there is no ownership check.
    #[instrument(skip(self, item), fields(product_id = %product_id, lprice = item.lprice))]
    pub async fn apply_external_price(&self, product_id: Uuid, item: &ExternalItem) -> Result<Product, ServiceError> {
        let product = self
            .repo
            .update_lprice(product_id, item.lprice)
            .await?
            .ok_or_else(|| ServiceError::not_found("product"))?;
        info!("lprice_synced");
        Ok(product)
    }
}
