pub mod loader;

pub use loader::{BracketRecord, BracketTableLoader, BracketTableLoaderError};
