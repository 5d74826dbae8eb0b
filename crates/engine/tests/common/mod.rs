use engine::Engine;
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

pub async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

/// Resolves a test identity to a user id, creating it on first call.
pub async fn login(engine: &Engine, subject: &str) -> Uuid {
    engine
        .resolve_or_create_user("wechat", subject)
        .await
        .unwrap()
        .id
}
