pub mod catalog;
pub mod sample;

pub use catalog::{CatalogRepo, RepoError, RepoResult};
pub use sample::SampleCatalog;
