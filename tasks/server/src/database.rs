use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens the single shared connection and brings the schema up to date.
///
/// The pool is pinned to exactly one connection, which also keeps `sqlite::memory:`
/// databases alive for as long as the returned handle is.
#[tracing::instrument]
pub async fn connect(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(db_url.to_owned());
    options.max_connections(1).min_connections(1);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");
    Ok(db)
}

/// Closes the connection. Clones of the handle stop working afterwards.
#[tracing::instrument(skip(db))]
pub async fn close(db: DatabaseConnection) -> Result<(), DbErr> {
    db.close().await?;
    tracing::info!("Database connection closed");
    Ok(())
}
