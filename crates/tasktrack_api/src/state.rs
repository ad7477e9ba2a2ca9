use crate::error::{ApiError, ApiResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tasktrack_core::SessionService;

/// Shared handler state: one migrated connection and the session service.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    sessions: SessionService,
}

impl AppState {
    /// `conn` must come from `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection, sessions: SessionService) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    /// Runs `op` on the blocking pool with exclusive access to the
    /// connection.
    ///
    /// Id allocation and the insert that uses it happen inside one `op`, so
    /// concurrent requests cannot allocate the same id.
    pub(crate) async fn with_conn<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&Connection) -> ApiResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        run_blocking(move || {
            let conn = db
                .lock()
                .map_err(|_| ApiError::internal("database lock poisoned"))?;
            op(&conn)
        })
        .await
    }
}

/// Runs slow synchronous work (store calls, password hashing) off the async
/// workers.
pub(crate) async fn run_blocking<T, F>(op: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|err| ApiError::internal(&format!("blocking task failed: {err}")))?
}
