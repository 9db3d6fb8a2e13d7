use std::future::Future;

use deadpool_diesel::postgres::Pool;
use diesel::PgConnection;

use crate::errors::DatabaseError;

/// Runs a blocking diesel closure on a pooled connection.
///
/// Every failure carries `operation` so handlers and logs can tell which
/// query broke. Missing rows are routine and only logged at debug level.
///
/// ```ignore
/// let clients = pool
///     .interact_with_context("search clients".to_string(), |conn| Client::search(None, 20, conn))
///     .await?;
/// ```
pub trait DeskPool {
    fn interact_with_context<F, T, E>(
        &self,
        operation: String,
        f: F,
    ) -> impl Future<Output = Result<T, DatabaseError>> + Send
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<DatabaseError> + Send + 'static;
}

fn report(error: &DatabaseError) {
    if error.is_not_found() {
        tracing::debug!(operation = error.operation(), "Record not found");
    } else {
        tracing::error!(operation = error.operation(), error = %error, "Database operation failed");
    }
}

impl DeskPool for Pool {
    async fn interact_with_context<F, T, E>(
        &self,
        operation: String,
        f: F,
    ) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<DatabaseError> + Send + 'static,
    {
        let result = match self.get().await {
            Ok(conn) => match conn.interact(f).await {
                Ok(outcome) => {
                    outcome.map_err(|e| Into::<DatabaseError>::into(e).with_operation(&operation))
                }
                Err(e) => Err(DatabaseError::InteractionError {
                    operation,
                    message: e.to_string(),
                }),
            },
            Err(e) => Err(DatabaseError::PoolError {
                operation,
                message: e.to_string(),
            }),
        };

        result.inspect_err(report)
    }
}
