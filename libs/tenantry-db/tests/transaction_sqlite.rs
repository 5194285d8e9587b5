#![allow(clippy::unwrap_used, clippy::expect_used)]

use sea_orm::{ConnectionTrait, DbBackend, Statement};
use tenantry_db::{Db, DbConfig, DbError, InfraError, TxConfig, TxError};

async fn db_with_table() -> Db {
    let db = Db::connect(&DbConfig::sqlite_memory()).await.unwrap();
    db.conn()
        .unwrap()
        .execute_unprepared("CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE)")
        .await
        .unwrap();
    db
}

async fn count_items(db: &Db) -> i64 {
    let row = db
        .conn()
        .unwrap()
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT COUNT(*) AS n FROM items",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

#[tokio::test]
async fn commit_persists_writes() {
    let db = db_with_table().await;

    let out: Result<u32, TxError<String>> = db
        .in_transaction(TxConfig::default(), |tx| {
            Box::pin(async move {
                tx.execute_unprepared("INSERT INTO items (name) VALUES ('a')")
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(7)
            })
        })
        .await;

    assert_eq!(out.unwrap(), 7);
    assert_eq!(count_items(&db).await, 1);
}

#[tokio::test]
async fn domain_error_rolls_back() {
    let db = db_with_table().await;

    let out: Result<(), TxError<String>> = db
        .in_transaction(TxConfig::default(), |tx| {
            Box::pin(async move {
                tx.execute_unprepared("INSERT INTO items (name) VALUES ('a')")
                    .await
                    .map_err(|e| e.to_string())?;
                Err("later step failed".to_owned())
            })
        })
        .await;

    assert!(matches!(out, Err(TxError::Domain(ref m)) if m == "later step failed"));
    assert_eq!(count_items(&db).await, 0);
}

#[tokio::test]
async fn conn_is_refused_inside_transaction() {
    let db = db_with_table().await;
    let inner = db.clone();

    let out: Result<bool, TxError<String>> = db
        .in_transaction(TxConfig::default(), move |_tx| {
            Box::pin(async move { Ok(matches!(inner.conn(), Err(DbError::ConnRequestedInsideTx))) })
        })
        .await;

    assert!(out.unwrap());
    assert!(db.conn().is_ok());
}

#[tokio::test]
async fn ping_answers_outside_and_is_refused_inside_transaction() {
    let db = db_with_table().await;
    db.ping().await.unwrap();

    let inner = db.clone();
    let out: Result<bool, TxError<String>> = db
        .in_transaction(TxConfig::default(), move |_tx| {
            Box::pin(async move {
                Ok(matches!(
                    inner.ping().await,
                    Err(DbError::ConnRequestedInsideTx)
                ))
            })
        })
        .await;
    assert!(out.unwrap());
}

#[tokio::test]
async fn unique_violation_is_classified() {
    let db = db_with_table().await;
    let conn = db.conn().unwrap();
    conn.execute_unprepared("INSERT INTO items (name) VALUES ('dup')")
        .await
        .unwrap();

    let err = conn
        .execute_unprepared("INSERT INTO items (name) VALUES ('dup')")
        .await
        .unwrap_err();

    assert!(tenantry_db::is_unique_violation(&err));
    assert!(InfraError::from(err).is_unique_violation());
}

#[tokio::test]
async fn transaction_folds_infra_errors_into_domain() {
    #[derive(Debug)]
    #[allow(dead_code)]
    enum AppError {
        Infra(String),
    }
    impl From<InfraError> for AppError {
        fn from(e: InfraError) -> Self {
            Self::Infra(e.message().to_owned())
        }
    }

    let db = db_with_table().await;
    let out: Result<(), AppError> = db
        .transaction(TxConfig::read_only(), |tx| {
            Box::pin(async move {
                tx.execute_unprepared("SELECT 1")
                    .await
                    .map_err(|e| AppError::Infra(e.to_string()))?;
                Ok(())
            })
        })
        .await;
    assert!(out.is_ok());
}
