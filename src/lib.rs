pub mod document;
pub mod error;
pub mod isolate;
pub mod raw;
pub mod refs;
pub mod schema;
pub mod snapshot;

pub use document::{EffDir, Section};
pub use error::{EffDirError, Result};
pub use isolate::isolate;
pub use schema::{Record, Value};
