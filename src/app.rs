use std::error::Error;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::config::ConfigError;
use crate::directory::{CategoryRemoval, Directory, LinkDraft};
use crate::domain::category::{self, Category};
use crate::domain::link::{Link, LinkRecord};
use crate::ids;
use crate::migration;
use crate::seed::{SeedData, SeedError};
use crate::store::{
    read_json_or, write_json, KeyValueStore, SqliteStore, StoreError, CATEGORIES_KEY, LINKS_KEY,
};
use crate::view::LinkGroup;

pub struct App<S: KeyValueStore = SqliteStore> {
    store: S,
    directory: Directory,
    migrated: bool,
}

impl App<SqliteStore> {
    pub fn open(db_path: &str, defaults: SeedData) -> Result<Self, AppError> {
        ensure_parent_dir(db_path)?;
        let store = SqliteStore::open(db_path)?;
        Self::load(store, defaults)
    }
}

impl<S: KeyValueStore> App<S> {
    pub fn load(mut store: S, defaults: SeedData) -> Result<Self, AppError> {
        let SeedData {
            links: default_links,
            categories: default_categories,
        } = defaults;
        let records = match read_json_or(&store, LINKS_KEY, || None::<Vec<Value>>)? {
            Some(values) => decode_records(values),
            None => default_links.into_iter().map(LinkRecord::from).collect(),
        };
        let categories: Vec<Category> =
            read_json_or(&store, CATEGORIES_KEY, || default_categories)?;

        let legacy_count = records.iter().filter(|record| record.is_legacy()).count();
        if legacy_count > 0 {
            tracing::info!(legacy_links = legacy_count, "migrating legacy link records");
        }

        let outcome = migration::migrate(records, categories, |known| {
            ids::generate_id(ids::CATEGORY_PREFIX, |candidate| {
                category::find_by_id(known, candidate).is_some()
            })
        });
        if outcome.migrated {
            if outcome.created_categories > 0 {
                write_json(&mut store, CATEGORIES_KEY, &outcome.categories)?;
            }
            write_json(&mut store, LINKS_KEY, &outcome.links)?;
            tracing::info!(
                links = outcome.links.len(),
                created_categories = outcome.created_categories,
                "legacy migration complete"
            );
        }

        Ok(Self {
            store,
            directory: Directory::new(outcome.links, outcome.categories),
            migrated: outcome.migrated,
        })
    }

    pub fn migrated_on_load(&self) -> bool {
        self.migrated
    }

    pub fn links(&self) -> &[Link] {
        self.directory.links()
    }

    pub fn categories(&self) -> &[Category] {
        self.directory.categories()
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.directory.link(id)
    }

    pub fn view(&self, query: &str) -> Vec<LinkGroup> {
        self.directory.view(query)
    }

    pub fn add_link(&mut self, draft: LinkDraft) -> Result<Option<Link>, AppError> {
        let Some(link) = self.directory.add_link(draft).cloned() else {
            return Ok(None);
        };
        self.persist_links()?;
        tracing::info!(id = %link.id, "added link");
        Ok(Some(link))
    }

    pub fn update_link(&mut self, id: &str, draft: LinkDraft) -> Result<Option<Link>, AppError> {
        let Some(link) = self.directory.update_link(id, draft).cloned() else {
            return Ok(None);
        };
        self.persist_links()?;
        tracing::info!(id, "updated link");
        Ok(Some(link))
    }

    pub fn delete_link(&mut self, id: &str) -> Result<Option<Link>, AppError> {
        let Some(link) = self.directory.delete_link(id) else {
            return Ok(None);
        };
        self.persist_links()?;
        tracing::info!(id, "deleted link");
        Ok(Some(link))
    }

    pub fn add_category(&mut self, name: &str) -> Result<Option<Category>, AppError> {
        let Some(category) = self.directory.add_category(name).cloned() else {
            return Ok(None);
        };
        self.persist_categories()?;
        tracing::info!(id = %category.id, "added category");
        Ok(Some(category))
    }

    pub fn rename_category(&mut self, id: &str, name: &str) -> Result<Option<Category>, AppError> {
        let Some(category) = self.directory.rename_category(id, name).cloned() else {
            return Ok(None);
        };
        self.persist_categories()?;
        tracing::info!(id, "renamed category");
        Ok(Some(category))
    }

    pub fn delete_category(&mut self, id: &str) -> Result<Option<CategoryRemoval>, AppError> {
        let Some(removal) = self.directory.delete_category(id) else {
            return Ok(None);
        };
        self.persist_categories()?;
        if !removal.reassigned.is_empty() {
            self.persist_links()?;
        }
        tracing::info!(
            id,
            reassigned = removal.reassigned.len(),
            "deleted category"
        );
        Ok(Some(removal))
    }

    // Id first, then a name that matches exactly one category.
    pub fn resolve_category(&self, reference: &str) -> Result<String, AppError> {
        let reference = reference.trim();
        if let Some(found) = self.directory.category(reference) {
            return Ok(found.id.clone());
        }
        let matches: Vec<&Category> = self
            .categories()
            .iter()
            .filter(|candidate| candidate.name == reference)
            .collect();
        match matches.as_slice() {
            [only] => Ok(only.id.clone()),
            [] => Err(AppError::NotFound {
                kind: "category",
                id: reference.to_string(),
            }),
            many => Err(AppError::InvalidArgument(format!(
                "category name '{}' is ambiguous ({}); use an id",
                reference,
                many.iter()
                    .map(|candidate| candidate.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    fn persist_links(&mut self) -> Result<(), AppError> {
        write_json(&mut self.store, LINKS_KEY, self.directory.links())?;
        Ok(())
    }

    fn persist_categories(&mut self) -> Result<(), AppError> {
        write_json(&mut self.store, CATEGORIES_KEY, self.directory.categories())?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

fn decode_records(values: Vec<Value>) -> Vec<LinkRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match LinkRecord::deserialize(value) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping malformed link record");
                None
            }
        })
        .collect()
}

fn ensure_parent_dir(path: &str) -> Result<(), AppError> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Store(StoreError),
    Config(ConfigError),
    Seed(SeedError),
    InvalidArgument(String),
    NotFound { kind: &'static str, id: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Store(err) => write!(f, "store error: {}", err),
            AppError::Config(err) => write!(f, "{}", err),
            AppError::Seed(err) => write!(f, "{}", err),
            AppError::InvalidArgument(message) => write!(f, "{}", message),
            AppError::NotFound { kind, id } => write!(f, "{} '{}' not found", kind, id),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::Seed(err) => Some(err),
            AppError::InvalidArgument(_) => None,
            AppError::NotFound { .. } => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::Store(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<SeedError> for AppError {
    fn from(value: SeedError) -> Self {
        AppError::Seed(value)
    }
}
