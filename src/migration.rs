use std::collections::{HashMap, HashSet};

use crate::domain::category::{self, Category};
use crate::domain::link::{LegacyLinkRecord, Link, LinkRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub links: Vec<Link>,
    pub categories: Vec<Category>,
    pub migrated: bool,
    pub created_categories: usize,
}

pub fn needs_migration(records: &[LinkRecord]) -> bool {
    records.iter().any(LinkRecord::is_legacy)
}

/// Upgrades name-referenced links to id-referenced ones, creating each
/// missing category once. `next_category_id` sees every category known so
/// far, including ones created earlier in the same run.
pub fn migrate<F>(
    records: Vec<LinkRecord>,
    mut categories: Vec<Category>,
    mut next_category_id: F,
) -> MigrationOutcome
where
    F: FnMut(&[Category]) -> String,
{
    if !needs_migration(&records) {
        return MigrationOutcome {
            links: records
                .into_iter()
                .filter_map(LinkRecord::into_current)
                .collect(),
            categories,
            migrated: false,
            created_categories: 0,
        };
    }

    let existing_len = categories.len();
    let existing_names: HashSet<String> = categories
        .iter()
        .map(|category| category.name.clone())
        .collect();
    let mut created: HashMap<String, String> = HashMap::new();

    for record in &records {
        let LinkRecord::Legacy(legacy) = record else {
            continue;
        };
        let Some(name) = legacy.category_name() else {
            continue;
        };
        if created.contains_key(name) || existing_names.contains(name) {
            continue;
        }
        let id = next_category_id(&categories);
        created.insert(name.to_string(), id.clone());
        categories.push(Category::new(id, name));
    }

    let links = records
        .into_iter()
        .map(|record| match record {
            LinkRecord::Current(link) => link,
            LinkRecord::Legacy(legacy) => {
                let category_id =
                    resolve_legacy_category(&legacy, &created, &categories[..existing_len]);
                rebuild(legacy, category_id)
            }
        })
        .collect();

    MigrationOutcome {
        links,
        categories,
        migrated: true,
        created_categories: created.len(),
    }
}

fn resolve_legacy_category(
    legacy: &LegacyLinkRecord,
    created: &HashMap<String, String>,
    existing: &[Category],
) -> Option<String> {
    let name = legacy.category_name()?;
    created
        .get(name)
        .cloned()
        .or_else(|| category::find_by_name(existing, name).map(|found| found.id.clone()))
}

fn rebuild(legacy: LegacyLinkRecord, category_id: Option<String>) -> Link {
    Link {
        id: legacy.id,
        title: legacy.title,
        url: legacy.url,
        category_id,
        is_special: legacy.is_special,
    }
}
