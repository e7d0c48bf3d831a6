use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

pub fn find_by_id<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find(|category| category.id == id)
}

pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    categories.iter().find(|category| category.name == name)
}

pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{find_by_id, find_by_name, normalize_name, Category};

    #[test]
    fn lookups_return_first_match() {
        let categories = vec![
            Category::new("c1", "Finance"),
            Category::new("c2", "Reading"),
            Category::new("c3", "Finance"),
        ];
        assert_eq!(find_by_id(&categories, "c2").map(|c| c.name.as_str()), Some("Reading"));
        assert_eq!(find_by_name(&categories, "Finance").map(|c| c.id.as_str()), Some("c1"));
        assert!(find_by_name(&categories, "finance").is_none());
        assert!(find_by_id(&categories, "missing").is_none());
    }

    #[test]
    fn normalize_name_trims_and_rejects_blank() {
        assert_eq!(normalize_name("  News "), Some("News".to_string()));
        assert_eq!(normalize_name("   "), None);
        assert_eq!(normalize_name(""), None);
    }
}
