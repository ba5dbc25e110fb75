//! Where catalog data comes from

use std::future::Future;
use std::path::{Path, PathBuf};

use super::data::{parse_catalog, CatalogData};
use crate::core::error::Result;

/// A provider of catalog data
///
/// Implementations may fail; [`super::CatalogService`] turns failures into
/// the empty fallback catalog so callers never see them.
pub trait CatalogSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<CatalogData>> + Send;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Catalog read from a JSON or TOML file
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<CatalogData> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let is_toml = self.path.extension().map_or(false, |ext| ext == "toml");
        parse_catalog(&content, is_toml)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Catalog held in memory (embedding and tests)
#[derive(Debug, Clone)]
pub struct StaticCatalogSource {
    data: CatalogData,
}

impl StaticCatalogSource {
    pub fn new(data: CatalogData) -> Self {
        Self { data }
    }
}

impl CatalogSource for StaticCatalogSource {
    async fn fetch(&self) -> Result<CatalogData> {
        Ok(self.data.clone())
    }

    fn describe(&self) -> String {
        "in-memory catalog".to_string()
    }
}
