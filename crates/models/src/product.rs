//! Tracked product: a user's interest in an external item.
use sea_orm::{entity::prelude::*, sea_query::Expr, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

/// Lowest accepted target price (`myprice`).
pub const MIN_MY_PRICE: i32 = 100;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub image: String,
    pub link: String,
    /// Lowest price reported by the external search
    pub lprice: i32,
    /// Target price set by the owner
    pub myprice: i32,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    if title.trim().is_empty() {
        return Err(errors::ModelError::Validation("title required".into()));
    }
    Ok(())
}

pub fn validate_lprice(lprice: i32) -> Result<(), errors::ModelError> {
    if lprice < 0 {
        return Err(errors::ModelError::Validation("lprice must be >= 0".into()));
    }
    Ok(())
}

pub fn validate_myprice(myprice: i32) -> Result<(), errors::ModelError> {
    if myprice < MIN_MY_PRICE {
        return Err(errors::ModelError::Validation(format!(
            "myprice must be at least {MIN_MY_PRICE}"
        )));
    }
    Ok(())
}

/// Insert a product owned by `user_id`; `myprice` starts at 0 until the owner sets a target.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    title: &str,
    image: &str,
    link: &str,
    lprice: i32,
) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    validate_lprice(lprice)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(user_id),
        title: Set(title.to_string()),
        image: Set(image.to_string()),
        link: Set(link.to_string()),
        lprice: Set(lprice),
        myprice: Set(0),
        created_at: Set(now),
        modified_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Single-statement update of one price column; returns false when no row matched.
async fn set_price_column<C: ConnectionTrait>(db: &C, id: Uuid, column: Column, value: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(column, Expr::value(value))
        .col_expr(Column::ModifiedAt, Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

pub async fn set_myprice<C: ConnectionTrait>(db: &C, id: Uuid, myprice: i32) -> Result<bool, errors::ModelError> {
    validate_myprice(myprice)?;
    set_price_column(db, id, Column::Myprice, myprice).await
}

pub async fn set_lprice<C: ConnectionTrait>(db: &C, id: Uuid, lprice: i32) -> Result<bool, errors::ModelError> {
    validate_lprice(lprice)?;
    set_price_column(db, id, Column::Lprice, lprice).await
}
