use migration::MigratorTrait;
use sea_orm::DatabaseConnection;



/// Fresh migrated in-memory database; each call gets its own schema.
pub(crate) async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    let db = crate::db::connect_with_config(&configs::DatabaseConfig::sqlite_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
