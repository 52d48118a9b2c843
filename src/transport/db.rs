//! Database transactions threaded through [`StateTaskResult`].
//!
//! A [`DbTransactionState`] carries the current transaction and whether this
//! chain owns it. Only the owner commits, rolls back or disposes; a
//! transaction handed in by a caller is used and left alone.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::{TransportError, failure_message};
use crate::config::TransportConfig;
use crate::data::Unit;
use crate::effect::{CancellationToken, StateTaskResult, TaskResult};

/// Failure message when no transaction is present and none may be begun.
pub const NO_ACTIVE_TRANSACTION: &str = "No active transaction.";

/// Transaction isolation level requested from [`DbConnection::begin_transaction`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IsolationLevel {
    /// Dirty reads allowed.
    ReadUncommitted,
    /// Only committed data is read.
    #[default]
    ReadCommitted,
    /// Rows read stay stable until the end of the transaction.
    RepeatableRead,
    /// Full serializability.
    Serializable,
    /// Reads see a snapshot taken at the start.
    Snapshot,
}

/// An open transaction.
pub trait DbTransaction: Send + Sync + 'static {
    /// Makes the transaction's changes permanent.
    fn commit(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Discards the transaction's changes.
    fn rollback(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Releases the transaction handle.
    fn dispose(&self) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// A connection able to begin transactions.
pub trait DbConnection: Send + Sync + 'static {
    /// The transaction type this connection begins.
    type Transaction: DbTransaction;

    /// `true` once the connection is usable.
    fn is_open(&self) -> bool;

    /// Opens the connection.
    fn open(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Begins a transaction at `isolation_level`.
    fn begin_transaction(
        &self,
        isolation_level: IsolationLevel,
    ) -> impl Future<Output = Result<Self::Transaction, TransportError>> + Send;
}

/// The transaction threaded through a chain of database steps.
///
/// Two states are equal when they hold the same transaction (by identity)
/// with the same ownership.
pub struct DbTransactionState<Tx> {
    transaction: Option<Arc<Tx>>,
    owns_transaction: bool,
}

impl<Tx> DbTransactionState<Tx> {
    /// No transaction, not owned.
    pub const fn empty() -> Self {
        Self {
            transaction: None,
            owns_transaction: false,
        }
    }

    /// A state holding `transaction`.
    pub const fn new(transaction: Arc<Tx>, owns_transaction: bool) -> Self {
        Self {
            transaction: Some(transaction),
            owns_transaction,
        }
    }

    /// A transaction this chain began and must finish.
    pub const fn owned(transaction: Arc<Tx>) -> Self {
        Self::new(transaction, true)
    }

    /// A transaction supplied by the caller.
    pub const fn borrowed(transaction: Arc<Tx>) -> Self {
        Self::new(transaction, false)
    }

    /// The current transaction.
    pub const fn transaction(&self) -> Option<&Arc<Tx>> {
        self.transaction.as_ref()
    }

    /// Whether this chain began the transaction.
    pub const fn owns_transaction(&self) -> bool {
        self.owns_transaction
    }

    /// Whether a transaction is present.
    pub const fn has_transaction(&self) -> bool {
        self.transaction.is_some()
    }
}

impl<Tx> Default for DbTransactionState<Tx> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<Tx> Clone for DbTransactionState<Tx> {
    fn clone(&self) -> Self {
        Self {
            transaction: self.transaction.clone(),
            owns_transaction: self.owns_transaction,
        }
    }
}

impl<Tx> PartialEq for DbTransactionState<Tx> {
    fn eq(&self, other: &Self) -> bool {
        let same_transaction = match (&self.transaction, &other.transaction) {
            (Some(left), Some(right)) => Arc::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        };
        same_transaction && self.owns_transaction == other.owns_transaction
    }
}

impl<Tx> Eq for DbTransactionState<Tx> {}

impl<Tx> fmt::Debug for DbTransactionState<Tx> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DbTransactionState")
            .field("has_transaction", &self.has_transaction())
            .field("owns_transaction", &self.owns_transaction)
            .finish()
    }
}

/// Runs `action` inside the state's transaction, beginning one when the
/// state is empty and `begin_if_missing` is set.
///
/// The connection is opened first if needed. When `action` fails (or
/// panics) and the transaction is owned, it is rolled back and disposed
/// before the action's error is returned; problems during that cleanup are
/// logged and otherwise ignored.
pub fn to_state_task_result<C, T, F, Fut>(
    connection: Arc<C>,
    action: F,
    begin_if_missing: bool,
) -> StateTaskResult<DbTransactionState<C::Transaction>, T>
where
    C: DbConnection,
    T: Send + 'static,
    F: Fn(Arc<C>, Arc<C::Transaction>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
{
    let config = TransportConfig {
        begin_if_missing,
        ..TransportConfig::default()
    };
    to_state_task_result_with(connection, action, &config, CancellationToken::none())
}

/// [`to_state_task_result`] with isolation level and `begin_if_missing`
/// taken from `config`, handing `cancellation` to the action.
pub fn to_state_task_result_with<C, T, F, Fut>(
    connection: Arc<C>,
    action: F,
    config: &TransportConfig,
    cancellation: CancellationToken,
) -> StateTaskResult<DbTransactionState<C::Transaction>, T>
where
    C: DbConnection,
    T: Send + 'static,
    F: Fn(Arc<C>, Arc<C::Transaction>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
{
    let action = Arc::new(action);
    let isolation_level = config.isolation_level;
    let begin_if_missing = config.begin_if_missing;
    StateTaskResult::new(move |state: DbTransactionState<C::Transaction>| {
        let connection = Arc::clone(&connection);
        let action = Arc::clone(&action);
        let cancellation = cancellation.clone();
        TaskResult::new(async move {
            if !connection.is_open() {
                connection
                    .open()
                    .await
                    .map_err(|error| failure_message("db open", &error))?;
            }

            let state = if state.has_transaction() {
                state
            } else if begin_if_missing {
                let transaction = connection
                    .begin_transaction(isolation_level)
                    .await
                    .map_err(|error| failure_message("db begin", &error))?;
                DbTransactionState::owned(Arc::new(transaction))
            } else {
                return Err(NO_ACTIVE_TRANSACTION.to_string());
            };
            let Some(transaction) = state.transaction().cloned() else {
                return Err(NO_ACTIVE_TRANSACTION.to_string());
            };

            let outcome = TaskResult::from_fallible(move || action(connection, transaction, cancellation)).await;
            match outcome {
                Ok(value) => Ok((value, state)),
                Err(error) => {
                    if let Some(transaction) = state.transaction().filter(|_| state.owns_transaction()) {
                        abandon(transaction).await;
                    }
                    Err(error)
                }
            }
        })
    })
}

/// Rolls back and disposes after a failed action, logging what goes wrong.
async fn abandon<Tx: DbTransaction>(transaction: &Arc<Tx>) {
    if let Err(error) = transaction.rollback().await {
        tracing::warn!(%error, "rollback of an owned transaction failed");
    }
    if let Err(error) = transaction.dispose().await {
        tracing::warn!(%error, "dispose of an owned transaction failed");
    }
}

#[derive(Clone, Copy, Debug)]
enum Completion {
    Commit,
    Rollback,
}

/// Commits an owned transaction and resets the state to empty.
///
/// An empty state is a successful no-op; a borrowed transaction is left
/// untouched and the state returned unchanged. The transaction is disposed
/// afterwards unless `dispose` is `false`.
pub fn commit_transaction<Tx: DbTransaction>(dispose: bool) -> StateTaskResult<DbTransactionState<Tx>, Unit> {
    complete(Completion::Commit, dispose)
}

/// Rolls back an owned transaction and resets the state to empty.
///
/// Follows the same rules as [`commit_transaction`].
pub fn rollback_transaction<Tx: DbTransaction>(dispose: bool) -> StateTaskResult<DbTransactionState<Tx>, Unit> {
    complete(Completion::Rollback, dispose)
}

fn complete<Tx: DbTransaction>(completion: Completion, dispose: bool) -> StateTaskResult<DbTransactionState<Tx>, Unit> {
    StateTaskResult::new(move |state: DbTransactionState<Tx>| {
        TaskResult::new(async move {
            let Some(transaction) = state.transaction().cloned() else {
                return Ok((Unit, state));
            };
            if !state.owns_transaction() {
                tracing::debug!(?completion, "leaving a borrowed transaction open");
                return Ok((Unit, state));
            }

            let finished = match completion {
                Completion::Commit => transaction.commit().await,
                Completion::Rollback => transaction.rollback().await,
            };
            let disposed = if dispose {
                transaction.dispose().await
            } else {
                Ok(())
            };
            finished
                .and(disposed)
                .map(|()| (Unit, DbTransactionState::empty()))
                .map_err(|error| failure_message("db completion", &error))
        })
    })
}
