use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::user::UserRole;

use crate::errors::ServiceError;

pub use models::product::MIN_MY_PRICE;

/// Whether `role` may read every user's products.
pub fn can_view_all(role: UserRole) -> bool {
    match role {
        UserRole::User => false,
        UserRole::Admin => true,
    }
}

/// Authenticated caller identity handed in by the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Requester {
    pub fn new(user_id: Uuid, role: UserRole) -> Self { Self { user_id, role } }

    pub fn can_view_all(&self) -> bool { can_view_all(self.role) }

    pub fn owns(&self, owner_id: Uuid) -> bool { self.user_id == owner_id }
}

impl TryFrom<&models::user::Model> for Requester {
    type Error = ServiceError;

    fn try_from(user: &models::user::Model) -> Result<Self, Self::Error> {
        Ok(Self { user_id: user.id, role: user.role()? })
    }
}

/// Payload for registering a product of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
    pub lprice: i32,
}

/// Payload for changing the target price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyPriceUpdate {
    pub myprice: i32,
}

/// Already-fetched search result used by the price-sync hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalItem {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub image: String,
    pub lprice: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub image: String,
    pub link: String,
    pub lprice: i32,
    pub myprice: i32,
    pub created_at: DateTime<FixedOffset>,
    pub modified_at: DateTime<FixedOffset>,
}

impl From<models::product::Model> for Product {
    fn from(m: models::product::Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.user_id,
            title: m.title,
            image: m.image,
            link: m.link,
            lprice: m.lprice,
            myprice: m.myprice,
            created_at: m.created_at,
            modified_at: m.modified_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<models::folder::Model> for Folder {
    fn from(m: models::folder::Model) -> Self {
        Self { id: m.id, owner_id: m.user_id, name: m.name, created_at: m.created_at }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFolderLink {
    pub id: Uuid,
    pub product_id: Uuid,
    pub folder_id: Uuid,
    pub created_at: DateTime<FixedOffset>,
}

impl From<models::product_folder::Model> for ProductFolderLink {
    fn from(m: models::product_folder::Model) -> Self {
        Self { id: m.id, product_id: m.product_id, folder_id: m.folder_id, created_at: m.created_at }
    }
}

/// Product fields a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    #[default]
    Id,
    Title,
    Lprice,
    Myprice,
    CreatedAt,
    ModifiedAt,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::Title,
        SortField::Lprice,
        SortField::Myprice,
        SortField::CreatedAt,
        SortField::ModifiedAt,
    ];

    /// Wire name accepted in `sortBy`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Lprice => "lprice",
            SortField::Myprice => "myprice",
            SortField::CreatedAt => "createdAt",
            SortField::ModifiedAt => "modifiedAt",
        }
    }

    /// Ascending comparison on this field.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Lprice => a.lprice.cmp(&b.lprice),
            SortField::Myprice => a.myprice.cmp(&b.myprice),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::ModifiedAt => a.modified_at.cmp(&b.modified_at),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SortField {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ServiceError::Validation(format!("unsupported sort field: {s}")))
    }
}
