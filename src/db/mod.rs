pub mod schema;
pub mod sqlite;
pub mod store;

pub use store::Store;
