use std::cmp::Ordering;
use std::collections::HashSet;

use super::{build_view, compare_names, normalize_query};
use crate::domain::category::Category;
use crate::domain::link::Link;

fn sample_links() -> Vec<Link> {
    let titles = [
        ("Daily Report", "reports.example.com"),
        ("Notes", "https://notes.example"),
        ("Bank", "https://bank.example/REPORT"),
        ("Music", "https://music.example"),
        ("Recipes", "http://food.example"),
        ("Map", "https://maps.example"),
    ];
    let categories = [Some("c1"), None, Some("c2"), Some("missing"), Some("c1"), None];
    titles
        .iter()
        .zip(categories)
        .enumerate()
        .map(|(index, ((title, url), category_id))| Link {
            id: format!("l{index}"),
            title: title.to_string(),
            url: url.to_string(),
            category_id: category_id.map(str::to_string),
            is_special: index % 3 == 1,
        })
        .collect()
}

fn sample_categories() -> Vec<Category> {
    vec![
        Category::new("c1", "Work"),
        Category::new("c2", "banking"),
        Category::new("c3", "Archive"),
    ]
}

#[test]
fn special_links_precede_regular_links_in_every_group() {
    let links = sample_links();
    for query in ["", "e", "example", "report", "zzz"] {
        for group in build_view(&links, &sample_categories(), query) {
            let first_regular = group.links.iter().position(|link| !link.is_special);
            if let Some(boundary) = first_regular {
                assert!(
                    group.links[boundary..].iter().all(|link| !link.is_special),
                    "special link after regular link in {:?} for query {query:?}",
                    group.group_key
                );
            }
        }
    }
}

#[test]
fn filtering_never_adds_links_and_matches_exactly() {
    let links = sample_links();
    for query in ["", "E", "report", "HTTP", "notes", "nothing"] {
        let groups = build_view(&links, &sample_categories(), query);
        let shown: HashSet<&str> = groups
            .iter()
            .flat_map(|group| group.links.iter().map(|link| link.id.as_str()))
            .collect();
        let needle = normalize_query(query);
        for link in &links {
            let expected = needle.as_deref().map_or(true, |needle| {
                link.title.to_lowercase().contains(needle)
                    || link.url.to_lowercase().contains(needle)
            });
            assert_eq!(
                shown.contains(link.id.as_str()),
                expected,
                "link {} with query {query:?}",
                link.id
            );
        }
    }
}

#[test]
fn every_link_appears_exactly_once_without_query() {
    let links = sample_links();
    let groups = build_view(&links, &sample_categories(), "");
    let mut seen = Vec::new();
    for group in &groups {
        seen.extend(group.links.iter().map(|link| link.id.clone()));
    }
    seen.sort();
    let mut expected: Vec<String> = links.iter().map(|link| link.id.clone()).collect();
    expected.sort();
    assert_eq!(seen, expected);
}

#[test]
fn view_is_deterministic() {
    let links = sample_links();
    let categories = sample_categories();
    assert_eq!(
        build_view(&links, &categories, "example"),
        build_view(&links, &categories, "example")
    );
}

#[test]
fn group_order_follows_sorted_names() {
    let groups = build_view(&sample_links(), &sample_categories(), "");
    let names: Vec<&str> = groups
        .iter()
        .map(|group| group.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["no category", "Archive", "banking", "Work"]);
}

#[test]
fn compare_names_orders_hangul_by_syllable() {
    let mut names = vec!["재밌는 사이트", "보험체크", "웹소설 추천", "생활정보"];
    names.sort_by(|left, right| compare_names(left, right));
    assert_eq!(names, vec!["보험체크", "생활정보", "웹소설 추천", "재밌는 사이트"]);
}

#[test]
fn compare_names_puts_lowercase_before_uppercase() {
    assert_eq!(compare_names("a", "A"), Ordering::Less);
    assert_eq!(compare_names("A", "a"), Ordering::Greater);
    assert_eq!(compare_names("a", "a"), Ordering::Equal);

    let mut names = vec!["B", "é", "A", "b", "E", "a", "e"];
    names.sort_by(|left, right| compare_names(left, right));
    assert_eq!(names, vec!["a", "A", "b", "B", "e", "E", "é"]);
}
