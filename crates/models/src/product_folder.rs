//! Association linking one product to one folder.
use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{folder, product};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_folder")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub folder_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Product, Folder }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Product => Entity::belongs_to(product::Entity)
                .from(Column::ProductId)
                .to(product::Column::Id)
                .into(),
            Relation::Folder => Entity::belongs_to(folder::Entity)
                .from(Column::FolderId)
                .to(folder::Column::Id)
                .into(),
        }
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl Related<folder::Entity> for Entity {
    fn to() -> RelationDef { Relation::Folder.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a link. A duplicate pair surfaces as the raw `DbErr` so callers can
/// recognise the unique violation via `DbErr::sql_err`.
pub async fn create<C: ConnectionTrait>(db: &C, product_id: Uuid, folder_id: Uuid) -> Result<Model, DbErr> {
    let am = ActiveModel {
        id: Set(Uuid::now_v7()),
        product_id: Set(product_id),
        folder_id: Set(folder_id),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await
}

pub async fn find_pair<C: ConnectionTrait>(db: &C, product_id: Uuid, folder_id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::ProductId.eq(product_id))
        .filter(Column::FolderId.eq(folder_id))
        .one(db)
        .await
}
