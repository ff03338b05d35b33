pub mod executor;
pub mod source;

pub use executor::{Executor, SyncExecutor};
pub use source::{ElementSource, SourceError};
