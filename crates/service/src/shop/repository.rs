use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Folder, NewProduct, Product, ProductFolderLink};
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};

/// Product store.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert_product(&self, owner_id: Uuid, input: &NewProduct) -> Result<Product, ServiceError>;
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, ServiceError>;
    /// Atomically set `myprice`; `None` when the id has no row.
    async fn update_myprice(&self, id: Uuid, myprice: i32) -> Result<Option<Product>, ServiceError>;
    /// Atomically set `lprice`; `None` when the id has no row.
    async fn update_lprice(&self, id: Uuid, lprice: i32) -> Result<Option<Product>, ServiceError>;
    async fn page_all(&self, req: &PageRequest) -> Result<Page<Product>, ServiceError>;
    async fn page_by_owner(&self, owner_id: Uuid, req: &PageRequest) -> Result<Page<Product>, ServiceError>;
    async fn page_by_owner_and_folder(&self, owner_id: Uuid, folder_id: Uuid, req: &PageRequest) -> Result<Page<Product>, ServiceError>;
}

/// Folder store.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// Insert all folders or none.
    async fn insert_folders(&self, owner_id: Uuid, names: &[String]) -> Result<Vec<Folder>, ServiceError>;
    async fn find_folder(&self, id: Uuid) -> Result<Option<Folder>, ServiceError>;
    async fn list_folders_by_owner(&self, owner_id: Uuid) -> Result<Vec<Folder>, ServiceError>;
}

/// Product/folder association store.
#[async_trait]
pub trait ProductFolderRepository: Send + Sync {
    async fn find_link(&self, product_id: Uuid, folder_id: Uuid) -> Result<Option<ProductFolderLink>, ServiceError>;
    /// Fails with `Conflict` when the pair already exists.
    async fn insert_link(&self, product_id: Uuid, folder_id: Uuid) -> Result<ProductFolderLink, ServiceError>;
}

/// Everything the shop services need from persistence.
pub trait ShopRepository: ProductRepository + FolderRepository + ProductFolderRepository {}

impl<T> ShopRepository for T where T: ProductRepository + FolderRepository + ProductFolderRepository {}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::{Mutex, MutexGuard};

    use crate::pagination::Direction;

    #[derive(Default)]
    struct State {
        products: Vec<Product>,
        folders: Vec<Folder>,
        links: Vec<ProductFolderLink>,
    }

    #[derive(Default)]
    pub struct InMemoryShopRepository {
        state: Mutex<State>,
    }

    impl InMemoryShopRepository {
        fn state(&self) -> Result<MutexGuard<'_, State>, ServiceError> {
            self.state.lock().map_err(|_| ServiceError::Db("in-memory store poisoned".into()))
        }

        /// Number of stored associations.
        pub fn link_count(&self) -> usize {
            self.state.lock().map(|s| s.links.len()).unwrap_or_default()
        }

        /// Store a folder directly, bypassing service rules.
        pub fn seed_folder(&self, owner_id: Uuid, name: &str) -> Folder {
            let folder = Folder { id: Uuid::now_v7(), owner_id, name: name.to_string(), created_at: Utc::now().into() };
            if let Ok(mut s) = self.state.lock() {
                s.folders.push(folder.clone());
            }
            folder
        }
    }

    fn page_of<'a>(rows: impl Iterator<Item = &'a Product>, req: &PageRequest) -> Page<Product> {
        let mut rows: Vec<Product> = rows.cloned().collect();
        rows.sort_by(|a, b| {
            let ord = req.sort.compare(a, b).then_with(|| a.id.cmp(&b.id));
            match req.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });
        let total = rows.len() as u64;
        let content = rows
            .into_iter()
            .skip(usize::try_from(req.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(req.size).unwrap_or(usize::MAX))
            .collect();
        Page::new(content, req, total)
    }

    fn update_product(s: &mut State, id: Uuid, apply: impl FnOnce(&mut Product)) -> Option<Product> {
        let p = s.products.iter_mut().find(|p| p.id == id)?;
        apply(p);
        p.modified_at = Utc::now().into();
        Some(p.clone())
    }

    #[async_trait]
    impl ProductRepository for InMemoryShopRepository {
        async fn insert_product(&self, owner_id: Uuid, input: &NewProduct) -> Result<Product, ServiceError> {
            models::product::validate_title(&input.title)?;
            models::product::validate_lprice(input.lprice)?;
            let now = Utc::now().into();
            let product = Product {
                id: Uuid::now_v7(),
                owner_id,
                title: input.title.clone(),
                image: input.image.clone(),
                link: input.link.clone(),
                lprice: input.lprice,
                myprice: 0,
                created_at: now,
                modified_at: now,
            };
            self.state()?.products.push(product.clone());
            Ok(product)
        }

        async fn find_product(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
            Ok(self.state()?.products.iter().find(|p| p.id == id).cloned())
        }

        async fn update_myprice(&self, id: Uuid, myprice: i32) -> Result<Option<Product>, ServiceError> {
            models::product::validate_myprice(myprice)?;
            let mut s = self.state()?;
            Ok(update_product(&mut s, id, |p| p.myprice = myprice))
        }

        async fn update_lprice(&self, id: Uuid, lprice: i32) -> Result<Option<Product>, ServiceError> {
            models::product::validate_lprice(lprice)?;
            let mut s = self.state()?;
            Ok(update_product(&mut s, id, |p| p.lprice = lprice))
        }

        async fn page_all(&self, req: &PageRequest) -> Result<Page<Product>, ServiceError> {
            let s = self.state()?;
            Ok(page_of(s.products.iter(), req))
        }

        async fn page_by_owner(&self, owner_id: Uuid, req: &PageRequest) -> Result<Page<Product>, ServiceError> {
            let s = self.state()?;
            Ok(page_of(s.products.iter().filter(|p| p.owner_id == owner_id), req))
        }

        async fn page_by_owner_and_folder(&self, owner_id: Uuid, folder_id: Uuid, req: &PageRequest) -> Result<Page<Product>, ServiceError> {
            let s = self.state()?;
            let linked = |p: &&Product| s.links.iter().any(|l| l.folder_id == folder_id && l.product_id == p.id);
            Ok(page_of(s.products.iter().filter(|p| p.owner_id == owner_id).filter(linked), req))
        }
    }

    #[async_trait]
    impl FolderRepository for InMemoryShopRepository {
        async fn insert_folders(&self, owner_id: Uuid, names: &[String]) -> Result<Vec<Folder>, ServiceError> {
            let mut s = self.state()?;
            for name in names {
                models::folder::validate_name(name)?;
                if s.folders.iter().any(|f| f.owner_id == owner_id && &f.name == name) {
                    return Err(ServiceError::Conflict(format!("folder name already in use: {name}")));
                }
            }
            let created: Vec<Folder> = names
                .iter()
                .map(|name| Folder { id: Uuid::now_v7(), owner_id, name: name.clone(), created_at: Utc::now().into() })
                .collect();
            s.folders.extend(created.iter().cloned());
            Ok(created)
        }

        async fn find_folder(&self, id: Uuid) -> Result<Option<Folder>, ServiceError> {
            Ok(self.state()?.folders.iter().find(|f| f.id == id).cloned())
        }

        async fn list_folders_by_owner(&self, owner_id: Uuid) -> Result<Vec<Folder>, ServiceError> {
            Ok(self.state()?.folders.iter().filter(|f| f.owner_id == owner_id).cloned().collect())
        }
    }

    #[async_trait]
    impl ProductFolderRepository for InMemoryShopRepository {
        async fn find_link(&self, product_id: Uuid, folder_id: Uuid) -> Result<Option<ProductFolderLink>, ServiceError> {
            let s = self.state()?;
            Ok(s.links.iter().find(|l| l.product_id == product_id && l.folder_id == folder_id).cloned())
        }

        async fn insert_link(&self, product_id: Uuid, folder_id: Uuid) -> Result<ProductFolderLink, ServiceError> {
            let mut s = self.state()?;
            if s.links.iter().any(|l| l.product_id == product_id && l.folder_id == folder_id) {
                return Err(ServiceError::Conflict("product already in folder".into()));
            }
            let link = ProductFolderLink { id: Uuid::now_v7(), product_id, folder_id, created_at: Utc::now().into() };
            s.links.push(link.clone());
            Ok(link)
        }
    }
}
