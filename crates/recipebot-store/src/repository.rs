use crate::book::RecipeBook;
use async_trait::async_trait;
use recipebot_core::{BotError, BotResult, Recipe};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Append-only storage for the recipe collection.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Appends one recipe after all existing ones.
    async fn append(&self, recipe: Recipe) -> BotResult<()>;

    /// Reads the current collection.
    async fn load(&self) -> BotResult<RecipeBook>;
}

/// Stores the collection as one JSON document on disk.
///
/// `append` is a read-modify-write of the whole file with no locking: two
/// appends racing on the same file can lose one of the records (last writer
/// wins).
pub struct JsonRecordRepository {
    path: PathBuf,
    require_existing: bool,
}

impl JsonRecordRepository {
    /// A repository backed by `path`. A missing file reads as an empty collection.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            require_existing: false,
        }
    }

    /// When set, a missing file is a read error instead of an empty collection.
    pub fn require_existing(mut self, require: bool) -> Self {
        self.require_existing = require;
        self
    }

    /// Location of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_book(&self) -> BotResult<RecipeBook> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound && !self.require_existing => {
                debug!(path = %self.path.display(), "Recipe document missing, starting empty");
                return Ok(RecipeBook::default());
            }
            Err(source) => {
                return Err(BotError::PersistenceRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RecipeBook::default());
        }

        serde_json::from_slice(&bytes).map_err(|source| BotError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_book(&self, book: &RecipeBook) -> BotResult<()> {
        let json = serde_json::to_vec(book)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| BotError::PersistenceWrite {
                path: self.path.clone(),
                source,
            })
    }
}

#[async_trait]
impl RecordRepository for JsonRecordRepository {
    async fn append(&self, recipe: Recipe) -> BotResult<()> {
        let mut book = self.read_book().await?;
        let title = recipe.title.clone();
        book.push(recipe);
        self.write_book(&book).await?;
        info!(
            path = %self.path.display(),
            title = %title,
            total = book.len(),
            "Recipe appended"
        );
        Ok(())
    }

    async fn load(&self) -> BotResult<RecipeBook> {
        self.read_book().await
    }
}

/// Volatile repository keeping the collection in memory.
#[derive(Default)]
pub struct InMemoryRecordRepository {
    book: RwLock<RecipeBook>,
}

impl InMemoryRecordRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn append(&self, recipe: Recipe) -> BotResult<()> {
        self.book.write().await.push(recipe);
        Ok(())
    }

    async fn load(&self) -> BotResult<RecipeBook> {
        Ok(self.book.read().await.clone())
    }
}
