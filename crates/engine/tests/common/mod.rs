#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, RegisterCmd};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Engine with `alice`, `bob` and `carol` registered (password `secret`).
pub async fn engine_with_users() -> (Engine, DatabaseConnection) {
    let (engine, db) = engine_with_db().await;
    for username in ["alice", "bob", "carol"] {
        engine
            .register(RegisterCmd::new(username, "secret"))
            .await
            .unwrap();
    }
    (engine, db)
}
