use crate::domain::category::{self, Category};
use crate::domain::link::{normalize_url, Link};
use crate::ids;
use crate::view::{build_view, LinkGroup};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    links: Vec<Link>,
    categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDraft {
    pub title: String,
    pub url: String,
    pub category_id: Option<String>,
    /// `None` keeps the current flag on update and means `false` on add.
    pub is_special: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRemoval {
    pub category: Category,
    pub reassigned: Vec<String>,
}

struct ValidDraft {
    title: String,
    url: String,
}

impl LinkDraft {
    fn validate(&self) -> Option<ValidDraft> {
        let title = self.title.trim();
        let url = self.url.trim();
        if title.is_empty() || url.is_empty() {
            return None;
        }
        Some(ValidDraft {
            title: title.to_string(),
            url: normalize_url(url),
        })
    }
}

impl Directory {
    pub fn new(links: Vec<Link>, categories: Vec<Category>) -> Self {
        Self { links, categories }
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        category::find_by_id(&self.categories, id)
    }

    pub fn view(&self, query: &str) -> Vec<LinkGroup> {
        build_view(&self.links, &self.categories, query)
    }

    pub fn add_link(&mut self, draft: LinkDraft) -> Option<&Link> {
        let valid = draft.validate()?;
        let id = ids::generate_id(ids::LINK_PREFIX, |candidate| self.link(candidate).is_some());
        let category_id = self.known_category_id(draft.category_id);
        self.links.push(Link {
            id,
            title: valid.title,
            url: valid.url,
            category_id,
            is_special: draft.is_special.unwrap_or(false),
        });
        self.links.last()
    }

    pub fn update_link(&mut self, id: &str, draft: LinkDraft) -> Option<&Link> {
        let valid = draft.validate()?;
        let category_id = self.known_category_id(draft.category_id);
        let link = self.links.iter_mut().find(|link| link.id == id)?;
        link.title = valid.title;
        link.url = valid.url;
        link.category_id = category_id;
        if let Some(is_special) = draft.is_special {
            link.is_special = is_special;
        }
        Some(&*link)
    }

    pub fn delete_link(&mut self, id: &str) -> Option<Link> {
        let index = self.links.iter().position(|link| link.id == id)?;
        Some(self.links.remove(index))
    }

    pub fn add_category(&mut self, name: &str) -> Option<&Category> {
        let name = category::normalize_name(name)?;
        let id = ids::generate_id(ids::CATEGORY_PREFIX, |candidate| {
            self.category(candidate).is_some()
        });
        self.categories.push(Category::new(id, name));
        self.categories.last()
    }

    pub fn rename_category(&mut self, id: &str, name: &str) -> Option<&Category> {
        let name = category::normalize_name(name)?;
        let category = self.categories.iter_mut().find(|category| category.id == id)?;
        category.name = name;
        Some(&*category)
    }

    pub fn delete_category(&mut self, id: &str) -> Option<CategoryRemoval> {
        let index = self
            .categories
            .iter()
            .position(|category| category.id == id)?;
        let category = self.categories.remove(index);

        let mut reassigned = Vec::new();
        for link in &mut self.links {
            if link.category_id.as_deref() == Some(id) {
                link.category_id = None;
                reassigned.push(link.id.clone());
            }
        }
        Some(CategoryRemoval {
            category,
            reassigned,
        })
    }

    fn known_category_id(&self, requested: Option<String>) -> Option<String> {
        requested.filter(|id| self.category(id).is_some())
    }
}
