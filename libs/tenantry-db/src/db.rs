//! Shared database handle with scoped transactions.
//!
//! Repositories take `&C where C: ConnectionTrait`, so the same repository call
//! runs on a plain connection from [`Db::conn`] or on the transaction handed to
//! a [`Db::in_transaction`] closure. While a closure runs, a task-local guard
//! makes [`Db::conn`] fail, so nothing inside a transaction can write outside
//! of it by accident.

use std::{cell::Cell, future::Future, pin::Pin, sync::Arc};

use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbBackend,
    TransactionTrait,
};
use sea_orm_migration::MigratorTrait;

use crate::{DbConfig, DbError, InfraError, TxConfig, TxError};

tokio::task_local! {
    static IN_TX: Cell<bool>;
}

fn is_in_transaction() -> bool {
    IN_TX.try_with(Cell::get).unwrap_or(false)
}

async fn with_tx_guard<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    IN_TX.scope(Cell::new(true), f).await
}

/// Boxed transaction body.
pub type TxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Cheaply cloneable database handle.
#[derive(Clone, Debug)]
pub struct Db {
    conn: Arc<DatabaseConnection>,
}

impl Db {
    /// Open a pool described by `cfg`.
    pub async fn connect(cfg: &DbConfig) -> Result<Self, DbError> {
        let opts = cfg.to_connect_options()?;
        let conn = Database::connect(opts).await?;
        tracing::debug!(backend = ?conn.get_database_backend(), "database pool ready");
        Ok(Self::from_connection(conn))
    }

    #[must_use]
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self {
            conn: Arc::new(conn),
        }
    }

    /// Non-transactional connection.
    ///
    /// # Errors
    /// `DbError::ConnRequestedInsideTx` when called from inside a transaction body.
    pub fn conn(&self) -> Result<&DatabaseConnection, DbError> {
        if is_in_transaction() {
            return Err(DbError::ConnRequestedInsideTx);
        }
        Ok(&self.conn)
    }

    #[must_use]
    pub fn backend(&self) -> DbBackend {
        self.conn.get_database_backend()
    }

    /// Apply all pending migrations of `M`.
    pub async fn run_migrations<M: MigratorTrait>(&self) -> Result<(), DbError> {
        M::up(self.conn()?, None).await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), DbError> {
        self.conn()?.ping().await?;
        Ok(())
    }

    /// Run `f` inside one transaction.
    ///
    /// Commits when `f` returns `Ok`, rolls back when it returns `Err`. If the
    /// returned future is dropped mid-flight the transaction handle is dropped
    /// with it and the backend discards the uncommitted work.
    pub async fn in_transaction<T, E, F>(&self, cfg: TxConfig, f: F) -> Result<T, TxError<E>>
    where
        F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T, E> + Send,
        T: Send,
        E: Send,
    {
        let txn = self.begin(cfg).await.map_err(TxError::Infra)?;

        let res = with_tx_guard(f(&txn)).await;

        match res {
            Ok(v) => {
                txn.commit()
                    .await
                    .map_err(|e| TxError::Infra(InfraError::from(e)))?;
                Ok(v)
            }
            Err(e) => {
                if let Err(rb) = txn.rollback().await {
                    tracing::warn!(error = %rb, "transaction rollback failed");
                }
                Err(TxError::Domain(e))
            }
        }
    }

    /// Like [`Db::in_transaction`] but folds infrastructure failures into `E`.
    pub async fn transaction<T, E, F>(&self, cfg: TxConfig, f: F) -> Result<T, E>
    where
        F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T, E> + Send,
        T: Send,
        E: From<InfraError> + Send,
    {
        self.in_transaction(cfg, f)
            .await
            .map_err(|e| e.into_domain(E::from))
    }

    async fn begin(&self, cfg: TxConfig) -> Result<DatabaseTransaction, InfraError> {
        if is_in_transaction() {
            return Err(InfraError::new(DbError::ConnRequestedInsideTx.to_string()));
        }
        // SQLite transactions are always serializable and reject SET TRANSACTION.
        let txn = if cfg.is_default() || self.backend() == DbBackend::Sqlite {
            self.conn.begin().await?
        } else {
            self.conn
                .begin_with_config(None, cfg.sea_access_mode())
                .await?
        };
        Ok(txn)
    }
}
