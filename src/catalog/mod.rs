//! Catalog store: immutable reference data loaded once per process

pub mod data;
pub mod service;
pub mod source;

pub use data::{parse_catalog, CatalogData, PlaybookArticle, Resource, Template};
pub use service::{CatalogService, LoadState};
pub use source::{CatalogSource, FileCatalogSource, StaticCatalogSource};
