use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use serde::Deserialize;

use crate::domain::category::Category;
use crate::domain::link::Link;

const SEED_TOML: &str = include_str!("seed.toml");

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedData {
    pub links: Vec<Link>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSeedFile {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    links: Vec<RawSeedLink>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSeedLink {
    id: String,
    title: String,
    url: String,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    special: bool,
}

impl From<RawSeedLink> for Link {
    fn from(value: RawSeedLink) -> Self {
        Link {
            id: value.id,
            title: value.title,
            url: value.url,
            category_id: value.category_id,
            is_special: value.special,
        }
    }
}

impl SeedData {
    pub fn builtin() -> Result<Self, SeedError> {
        Self::from_toml(SEED_TOML)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_toml(raw: &str) -> Result<Self, SeedError> {
        let file: RawSeedFile = toml::from_str(raw)?;
        ensure_unique("category", file.categories.iter().map(|c| c.id.as_str()))?;
        ensure_unique("link", file.links.iter().map(|l| l.id.as_str()))?;
        Ok(Self {
            links: file.links.into_iter().map(Link::from).collect(),
            categories: file.categories,
        })
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), SeedError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SeedError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug)]
pub enum SeedError {
    Toml(toml::de::Error),
    DuplicateId { kind: &'static str, id: String },
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::Toml(err) => write!(f, "invalid seed data: {}", err),
            SeedError::DuplicateId { kind, id } => {
                write!(f, "seed data repeats {} id '{}'", kind, id)
            }
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SeedError::Toml(err) => Some(err),
            SeedError::DuplicateId { .. } => None,
        }
    }
}

impl From<toml::de::Error> for SeedError {
    fn from(value: toml::de::Error) -> Self {
        SeedError::Toml(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{SeedData, SeedError};
    use crate::domain::category;

    #[test]
    fn builtin_seed_loads() {
        let seed = SeedData::builtin().expect("embedded seed should load");
        assert_eq!(seed.categories.len(), 4);
        assert_eq!(seed.links.len(), 9);
        assert!(seed.links[0].is_special);
        assert!(seed.links.iter().skip(1).all(|link| !link.is_special));
    }

    #[test]
    fn builtin_links_reference_builtin_categories() {
        let seed = SeedData::builtin().expect("embedded seed should load");
        for link in &seed.links {
            let id = link.category_id.as_deref().expect("seed links are categorized");
            assert!(
                category::find_by_id(&seed.categories, id).is_some(),
                "link {} points at unknown category {}",
                link.id,
                id
            );
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = r#"
[[categories]]
id = "c1"
name = "A"

[[categories]]
id = "c1"
name = "B"
"#;
        let err = SeedData::from_toml(raw).expect_err("duplicate ids should fail");
        assert!(matches!(err, SeedError::DuplicateId { kind: "category", .. }));
        assert!(err.to_string().contains("'c1'"));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let seed = SeedData::from_toml("").expect("empty seed should load");
        assert_eq!(seed, SeedData::empty());
    }
}
