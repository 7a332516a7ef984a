pub mod db;
pub mod error;

pub use db::DbClient;
pub use error::StoreError;
