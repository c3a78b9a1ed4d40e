//! Game data loaded from files named on the command line, falling back to the
//! tables compiled into `ecohk-game`.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ecohk_game::{Catalog, CatalogError, ContentData, ContentError, ContentLoader, GameRules};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog in {}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
    #[error("invalid content in {}", path.display())]
    Content {
        path: PathBuf,
        #[source]
        source: ContentError,
    },
}

/// Reads the catalog and content from optional override files.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    catalog: Option<PathBuf>,
    content: Option<PathBuf>,
}

impl FileLoader {
    pub const fn new(catalog: Option<PathBuf>, content: Option<PathBuf>) -> Self {
        Self { catalog, content }
    }
}

fn read(path: &Path) -> Result<String, AssetError> {
    fs::read_to_string(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })
}

impl ContentLoader for FileLoader {
    type Error = AssetError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        let Some(path) = &self.catalog else {
            return Ok(Catalog::embedded());
        };
        log::debug!("loading catalog from {}", path.display());
        Catalog::from_json(&read(path)?).map_err(|source| AssetError::Catalog {
            path: path.clone(),
            source,
        })
    }

    fn load_content(&self) -> Result<ContentData, Self::Error> {
        let Some(path) = &self.content else {
            return Ok(ContentData::embedded());
        };
        log::debug!("loading content from {}", path.display());
        ContentData::from_json(&read(path)?).map_err(|source| AssetError::Content {
            path: path.clone(),
            source,
        })
    }
}

/// Rules from `path`, or the defaults.
pub fn load_rules(path: Option<&Path>) -> Result<GameRules> {
    let Some(path) = path else {
        return Ok(GameRules::default());
    };
    let json =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    GameRules::from_json(&json).with_context(|| format!("invalid rules in {}", path.display()))
}
