pub mod error;
pub mod file;
pub mod memory;
pub mod query;
pub mod store;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use query::{DesignQuery, SortOrder};
pub use store::{DesignStore, Designs};
