use crate::cancellation::CancellationToken;
use crate::errors::QueryError;

use super::ResultCursor;

/// A handle able to run read queries.
///
/// The cursor only lives for the duration of `visit`, which lets drivers hand
/// out cursors that borrow their prepared statement.
pub trait DbConnection: Send + Sync {
    /// Run `sql` and pass its cursor to `visit`.
    ///
    /// Implementations should stop a running statement once `cancel` fires
    /// and report it as [`QueryError::Cancelled`].
    fn query(
        &self,
        sql: &str,
        cancel: &CancellationToken,
        visit: &mut dyn FnMut(&mut dyn ResultCursor) -> Result<(), QueryError>,
    ) -> Result<(), QueryError>;
}
