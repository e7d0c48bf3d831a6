use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::category::Category;
use crate::domain::link::Link;

pub const UNCATEGORIZED_LABEL: &str = "no category";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkGroup {
    pub group_key: Option<String>,
    pub display_name: String,
    pub links: Vec<Link>,
}

impl LinkGroup {
    pub fn is_uncategorized(&self) -> bool {
        self.group_key.is_none()
    }
}

pub fn build_view(links: &[Link], categories: &[Category], query: &str) -> Vec<LinkGroup> {
    let query = normalize_query(query);
    let filtered: Vec<&Link> = links
        .iter()
        .filter(|link| {
            query
                .as_deref()
                .map_or(true, |needle| matches_query(link, needle))
        })
        .collect();

    let known_ids: HashSet<&str> = categories
        .iter()
        .map(|category| category.id.as_str())
        .collect();

    let mut sorted: Vec<&Category> = categories.iter().collect();
    sorted.sort_by(|left, right| compare_names(&left.name, &right.name));

    let uncategorized = LinkGroup {
        group_key: None,
        display_name: UNCATEGORIZED_LABEL.to_string(),
        links: collect_group(&filtered, &known_ids, None),
    };
    let named = sorted.into_iter().map(|category| LinkGroup {
        group_key: Some(category.id.clone()),
        display_name: category.name.clone(),
        links: collect_group(&filtered, &known_ids, Some(category.id.as_str())),
    });

    std::iter::once(uncategorized)
        .chain(named)
        .filter(|group| is_visible(group, query.is_some()))
        .collect()
}

pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn matches_query(link: &Link, needle: &str) -> bool {
    link.title.to_lowercase().contains(needle) || link.url.to_lowercase().contains(needle)
}

fn effective_key<'a>(link: &'a Link, known_ids: &HashSet<&str>) -> Option<&'a str> {
    link.category_id
        .as_deref()
        .filter(|id| known_ids.contains(id))
}

fn collect_group(links: &[&Link], known_ids: &HashSet<&str>, key: Option<&str>) -> Vec<Link> {
    let mut members: Vec<Link> = links
        .iter()
        .filter(|link| effective_key(link, known_ids) == key)
        .map(|link| (*link).clone())
        .collect();
    members.sort_by_key(|link| !link.is_special);
    members
}

fn is_visible(group: &LinkGroup, searching: bool) -> bool {
    if searching || group.is_uncategorized() {
        !group.links.is_empty()
    } else {
        true
    }
}

// Base letters, then accents, then case with lowercase first.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    collation_key(left)
        .cmp(&collation_key(right))
        .then_with(|| accent_key(left).cmp(&accent_key(right)))
        .then_with(|| case_key(left).cmp(&case_key(right)))
        .then_with(|| left.cmp(right))
}

fn collation_key(value: &str) -> String {
    value
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

fn accent_key(value: &str) -> String {
    value.nfkd().flat_map(char::to_lowercase).collect()
}

fn case_key(value: &str) -> String {
    value
        .chars()
        .flat_map(|ch| -> Vec<char> {
            if ch.is_lowercase() {
                ch.to_uppercase().collect()
            } else {
                ch.to_lowercase().collect()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{build_view, LinkGroup, UNCATEGORIZED_LABEL};
    use crate::domain::category::Category;
    use crate::domain::link::Link;

    fn link(id: &str, title: &str, url: &str, category_id: Option<&str>) -> Link {
        Link {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            category_id: category_id.map(str::to_string),
            is_special: false,
        }
    }

    fn scenario() -> (Vec<Link>, Vec<Category>) {
        (
            vec![
                link("l1", "Report", "x.com", Some("c1")),
                link("l2", "Notes", "y.com", None),
            ],
            vec![Category::new("c1", "Finance")],
        )
    }

    #[test]
    fn groups_uncategorized_first_then_categories() {
        let (links, categories) = scenario();
        let groups = build_view(&links, &categories, "");
        assert_eq!(
            groups,
            vec![
                LinkGroup {
                    group_key: None,
                    display_name: UNCATEGORIZED_LABEL.to_string(),
                    links: vec![links[1].clone()],
                },
                LinkGroup {
                    group_key: Some("c1".to_string()),
                    display_name: "Finance".to_string(),
                    links: vec![links[0].clone()],
                },
            ]
        );
    }

    #[test]
    fn search_drops_empty_groups() {
        let (links, categories) = scenario();
        let groups = build_view(&links, &categories, "report");
        assert_eq!(
            groups,
            vec![LinkGroup {
                group_key: Some("c1".to_string()),
                display_name: "Finance".to_string(),
                links: vec![links[0].clone()],
            }]
        );
    }

    #[test]
    fn whitespace_query_counts_as_no_query() {
        let (links, categories) = scenario();
        assert_eq!(
            build_view(&links, &categories, "   "),
            build_view(&links, &categories, "")
        );
    }

    #[test]
    fn search_is_case_insensitive_over_title_or_url() {
        let links = vec![
            link("l1", "Weekly REPORT", "a.com", None),
            link("l2", "Other", "https://Reports.example", None),
            link("l3", "Unrelated", "b.com", None),
        ];
        let groups = build_view(&links, &[], "  rePort ");
        assert_eq!(groups.len(), 1);
        let ids: Vec<&str> = groups[0].links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2"]);
    }

    #[test]
    fn empty_named_categories_stay_without_query() {
        let links = vec![link("l1", "A", "a.com", Some("c1"))];
        let categories = vec![Category::new("c1", "Alpha"), Category::new("c2", "Empty")];
        let groups = build_view(&links, &categories, "");
        let names: Vec<&str> = groups.iter().map(|g| g.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Empty"]);
        assert!(groups[1].links.is_empty());
    }

    #[test]
    fn uncategorized_group_appears_only_when_non_empty() {
        let categories = vec![Category::new("c1", "Alpha")];
        assert!(build_view(&[], &categories, "")
            .iter()
            .all(|group| !group.is_uncategorized()));
        assert!(build_view(&[], &[], "").is_empty());
    }

    #[test]
    fn dangling_category_reference_falls_back_to_uncategorized() {
        let links = vec![
            link("l1", "A", "a.com", Some("deleted")),
            link("l2", "B", "b.com", Some("c1")),
        ];
        let categories = vec![Category::new("c1", "Alpha")];
        let groups = build_view(&links, &categories, "");
        assert!(groups[0].is_uncategorized());
        assert_eq!(groups[0].links[0].id, "l1");
        assert_eq!(groups[1].links[0].id, "l2");
        let total: usize = groups.iter().map(|g| g.links.len()).sum();
        assert_eq!(total, links.len());
    }

    #[test]
    fn special_links_are_pinned_and_order_is_otherwise_stable() {
        let mut links = vec![
            link("l1", "one", "1.com", Some("c1")),
            link("l2", "two", "2.com", Some("c1")),
            link("l3", "three", "3.com", Some("c1")),
            link("l4", "four", "4.com", Some("c1")),
        ];
        links[2].is_special = true;
        links[3].is_special = true;
        let groups = build_view(&links, &[Category::new("c1", "Alpha")], "");
        let ids: Vec<&str> = groups[0].links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l3", "l4", "l1", "l2"]);
    }

    #[test]
    fn categories_sort_by_name_ignoring_case_and_accents() {
        let categories = vec![
            Category::new("c1", "zeta"),
            Category::new("c2", "Émile"),
            Category::new("c3", "alpha"),
            Category::new("c4", "Beta"),
            Category::new("c5", "eagle"),
        ];
        let groups = build_view(&[], &categories, "");
        let names: Vec<&str> = groups.iter().map(|g| g.display_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Beta", "eagle", "Émile", "zeta"]);
    }

    #[test]
    fn duplicate_names_keep_input_order() {
        let categories = vec![Category::new("c2", "Same"), Category::new("c1", "Same")];
        let groups = build_view(&[], &categories, "");
        let keys: Vec<Option<&str>> = groups.iter().map(|g| g.group_key.as_deref()).collect();
        assert_eq!(keys, vec![Some("c2"), Some("c1")]);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let (links, categories) = scenario();
        let groups = build_view(&links, &categories, "");
        let value = serde_json::to_value(&groups).expect("groups should serialize");
        assert_eq!(value[0]["groupKey"], serde_json::Value::Null);
        assert_eq!(value[0]["displayName"], UNCATEGORIZED_LABEL);
        assert_eq!(value[1]["groupKey"], "c1");
    }
}

#[cfg(test)]
#[path = "view_tests_ext.rs"]
mod tests_ext;
