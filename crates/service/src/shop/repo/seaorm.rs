use async_trait::async_trait;
use sea_orm::{
    sea_query::Query, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, Select, SqlErr, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use models::{folder, product, product_folder};

use crate::errors::ServiceError;
use crate::pagination::{Direction, Page, PageRequest};
use crate::shop::domain::{Folder, NewProduct, Product, ProductFolderLink, SortField};
use crate::shop::repository::{FolderRepository, ProductFolderRepository, ProductRepository};

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmShopRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmShopRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn fetch_page(&self, select: Select<product::Entity>, req: &PageRequest) -> Result<Page<Product>, ServiceError> {
        req.checked_offset()?;
        let order = match req.direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        };
        let paginator = select
            .order_by(sort_column(req.sort), order.clone())
            .order_by(product::Column::Id, order)
            .paginate(&self.db, req.size);
        let totals = paginator.num_items_and_pages().await?;
        let rows = paginator.fetch_page(req.page).await?;
        debug!(page = req.page, size = req.size, total = totals.number_of_items, sort = %req.sort, "product_page_fetched");
        Ok(Page::new(rows.into_iter().map(Product::from).collect(), req, totals.number_of_items))
    }

    async fn reload(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
        Ok(product::Entity::find_by_id(id).one(&self.db).await?.map(Product::from))
    }
}

fn sort_column(field: SortField) -> product::Column {
    match field {
        SortField::Id => product::Column::Id,
        SortField::Title => product::Column::Title,
        SortField::Lprice => product::Column::Lprice,
        SortField::Myprice => product::Column::Myprice,
        SortField::CreatedAt => product::Column::CreatedAt,
        SortField::ModifiedAt => product::Column::ModifiedAt,
    }
}

#[async_trait]
impl ProductRepository for SeaOrmShopRepository {
    async fn insert_product(&self, owner_id: Uuid, input: &NewProduct) -> Result<Product, ServiceError> {
        let created = product::create(&self.db, owner_id, &input.title, &input.image, &input.link, input.lprice).await?;
        Ok(created.into())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
        self.reload(id).await
    }

    async fn update_myprice(&self, id: Uuid, myprice: i32) -> Result<Option<Product>, ServiceError> {
        if !product::set_myprice(&self.db, id, myprice).await? {
            return Ok(None);
        }
        self.reload(id).await
    }

    async fn update_lprice(&self, id: Uuid, lprice: i32) -> Result<Option<Product>, ServiceError> {
        if !product::set_lprice(&self.db, id, lprice).await? {
            return Ok(None);
        }
        self.reload(id).await
    }

    async fn page_all(&self, req: &PageRequest) -> Result<Page<Product>, ServiceError> {
        self.fetch_page(product::Entity::find(), req).await
    }

    async fn page_by_owner(&self, owner_id: Uuid, req: &PageRequest) -> Result<Page<Product>, ServiceError> {
        self.fetch_page(product::Entity::find().filter(product::Column::UserId.eq(owner_id)), req).await
    }

    async fn page_by_owner_and_folder(&self, owner_id: Uuid, folder_id: Uuid, req: &PageRequest) -> Result<Page<Product>, ServiceError> {
        let members = Query::select()
            .column(product_folder::Column::ProductId)
            .from(product_folder::Entity)
            .and_where(product_folder::Column::FolderId.eq(folder_id))
            .to_owned();
        let select = product::Entity::find()
            .filter(product::Column::UserId.eq(owner_id))
            .filter(product::Column::Id.in_subquery(members));
        self.fetch_page(select, req).await
    }
}

#[async_trait]
impl FolderRepository for SeaOrmShopRepository {
    async fn insert_folders(&self, owner_id: Uuid, names: &[String]) -> Result<Vec<Folder>, ServiceError> {
        let txn = self.db.begin().await?;
        let mut created = Vec::with_capacity(names.len());
        for name in names {
            match folder::create(&txn, owner_id, name).await {
                Ok(m) => created.push(Folder::from(m)),
                Err(e) => {
                    txn.rollback().await?;
                    return Err(e.into());
                }
            }
        }
        txn.commit().await?;
        Ok(created)
    }

    async fn find_folder(&self, id: Uuid) -> Result<Option<Folder>, ServiceError> {
        Ok(folder::Entity::find_by_id(id).one(&self.db).await?.map(Folder::from))
    }

    async fn list_folders_by_owner(&self, owner_id: Uuid) -> Result<Vec<Folder>, ServiceError> {
        let rows = folder::Entity::find()
            .filter(folder::Column::UserId.eq(owner_id))
            .order_by_asc(folder::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Folder::from).collect())
    }
}

#[async_trait]
impl ProductFolderRepository for SeaOrmShopRepository {
    async fn find_link(&self, product_id: Uuid, folder_id: Uuid) -> Result<Option<ProductFolderLink>, ServiceError> {
        Ok(product_folder::find_pair(&self.db, product_id, folder_id).await?.map(ProductFolderLink::from))
    }

    async fn insert_link(&self, product_id: Uuid, folder_id: Uuid) -> Result<ProductFolderLink, ServiceError> {
        match product_folder::create(&self.db, product_id, folder_id).await {
            Ok(m) => Ok(m.into()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ServiceError::Conflict("product already in folder".into())),
                _ => Err(e.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::user::{self, UserRole};

    fn new_product(title: &str, lprice: i32) -> NewProduct {
        NewProduct { title: title.into(), image: "img".into(), link: "link".into(), lprice }
    }

    #[tokio::test]
    async fn owner_paging_and_sorting() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmShopRepository::new(db.clone());
        let u = user::create(&db, "pager_one", "p1@example.com", UserRole::User).await?;
        let other = user::create(&db, "pager_two", "p2@example.com", UserRole::User).await?;

        for (t, price) in [("B", 300), ("A", 100), ("C", 200)] {
            repo.insert_product(u.id, &new_product(t, price)).await?;
        }
        repo.insert_product(other.id, &new_product("X", 999)).await?;

        let page = repo.page_by_owner(u.id, &PageRequest::new(0, 2, SortField::Lprice, true)).await?;
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        let prices: Vec<i32> = page.content.iter().map(|p| p.lprice).collect();
        assert_eq!(prices, vec![100, 200]);

        let page = repo.page_by_owner(u.id, &PageRequest::new(1, 2, SortField::Lprice, true)).await?;
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].lprice, 300);

        let desc = repo.page_by_owner(u.id, &PageRequest::new(0, 10, SortField::Title, false)).await?;
        let titles: Vec<&str> = desc.content.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);

        let all = repo.page_all(&PageRequest::new(0, 10, SortField::Id, true)).await?;
        assert_eq!(all.total_elements, 4);
        Ok(())
    }

    #[tokio::test]
    async fn folder_membership_filter() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmShopRepository::new(db.clone());
        let u = user::create(&db, "member_one", "m1@example.com", UserRole::User).await?;

        let in_folder = repo.insert_product(u.id, &new_product("Kept", 500)).await?;
        repo.insert_product(u.id, &new_product("Loose", 600)).await?;
        let folders = repo.insert_folders(u.id, &["Picks".to_string()]).await?;
        repo.insert_link(in_folder.id, folders[0].id).await?;

        let page = repo
            .page_by_owner_and_folder(u.id, folders[0].id, &PageRequest::new(0, 10, SortField::Id, true))
            .await?;
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].id, in_folder.id);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_link_maps_to_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmShopRepository::new(db.clone());
        let u = user::create(&db, "linker_one", "l1@example.com", UserRole::User).await?;
        let p = repo.insert_product(u.id, &new_product("Chair", 7000)).await?;
        let f = repo.insert_folders(u.id, &["Home".to_string()]).await?.remove(0);

        repo.insert_link(p.id, f.id).await?;
        let err = repo.insert_link(p.id, f.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert!(repo.find_link(p.id, f.id).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn insert_folders_is_all_or_nothing() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmShopRepository::new(db.clone());
        let u = user::create(&db, "folder_one", "f1@example.com", UserRole::User).await?;
        repo.insert_folders(u.id, &["Existing".to_string()]).await?;

        // a name taken between the service check and the insert
        let err = repo.insert_folders(u.id, &["Fresh".to_string(), "Existing".to_string()]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        let names: Vec<String> = repo.list_folders_by_owner(u.id).await?.into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Existing".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn default_listing_is_newest_first() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmShopRepository::new(db.clone());
        let u = user::create(&db, "recent_one", "r1@example.com", UserRole::User).await?;

        let mut inserted = Vec::new();
        for i in 0..12 {
            inserted.push(repo.insert_product(u.id, &new_product(&format!("item{i}"), 100 + i)).await?.id);
        }

        let page = repo.page_by_owner(u.id, &PageRequest { size: 20, ..PageRequest::default() }).await?;
        let listed: Vec<Uuid> = page.content.iter().map(|p| p.id).collect();
        inserted.reverse();
        assert_eq!(listed, inserted);
        Ok(())
    }

    #[tokio::test]
    async fn unaddressable_page_is_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmShopRepository::new(db.clone());
        let u = user::create(&db, "far_pager", "far@example.com", UserRole::User).await?;
        repo.insert_product(u.id, &new_product("Only", 100)).await?;

        let err = repo
            .page_by_owner(u.id, &PageRequest::new(u64::MAX - 1, 100, SortField::Id, true))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        Ok(())
    }

    #[tokio::test]
    async fn price_updates_on_missing_row_return_none() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmShopRepository::new(db);
        assert!(repo.update_myprice(Uuid::new_v4(), 500).await?.is_none());
        assert!(repo.update_lprice(Uuid::new_v4(), 500).await?.is_none());
        Ok(())
    }
}
