pub mod connection;
pub mod cursor;
pub mod report_store;

pub use connection::DbConnection;
pub use cursor::{ResultCursor, RowFetch};
pub use report_store::ReportStore;
