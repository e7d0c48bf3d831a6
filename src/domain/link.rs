use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const LEGACY_CATEGORY_FIELD: &str = "category";
const CATEGORY_ID_FIELD: &str = "categoryId";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_special: bool,
}

/// Older stores referenced a category by its display name.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLinkRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_special: bool,
}

impl LegacyLinkRecord {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref().filter(|name| !name.is_empty())
    }
}

/// A link as it comes off the store, before migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRecord {
    Legacy(LegacyLinkRecord),
    Current(Link),
}

impl LinkRecord {
    pub fn is_legacy(&self) -> bool {
        matches!(self, LinkRecord::Legacy(_))
    }

    pub fn into_current(self) -> Option<Link> {
        match self {
            LinkRecord::Current(link) => Some(link),
            LinkRecord::Legacy(_) => None,
        }
    }
}

impl From<Link> for LinkRecord {
    fn from(value: Link) -> Self {
        LinkRecord::Current(value)
    }
}

impl<'de> Deserialize<'de> for LinkRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let legacy =
            fields.contains_key(LEGACY_CATEGORY_FIELD) && !fields.contains_key(CATEGORY_ID_FIELD);
        let object = Value::Object(fields);
        if legacy {
            LegacyLinkRecord::deserialize(object)
                .map(LinkRecord::Legacy)
                .map_err(de::Error::custom)
        } else {
            Link::deserialize(object)
                .map(LinkRecord::Current)
                .map_err(de::Error::custom)
        }
    }
}

/// Prefixes `https://` unless the value already carries an http(s) scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_prefix_ignore_ascii_case(trimmed, "http://")
        || has_prefix_ignore_ascii_case(trimmed, "https://")
    {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn has_prefix_ignore_ascii_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

fn is_false(value: &bool) -> bool {
    !*value
}
