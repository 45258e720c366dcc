pub mod design;
pub mod error;
pub mod id;
pub mod model;

pub use design::DesignRecord;
pub use error::ModelError;
pub use id::ElementId;
pub use model::*;
