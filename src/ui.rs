use std::io::{self, BufRead, IsTerminal, Write};

use crate::config::ColorMode;
use crate::domain::category::Category;
use crate::domain::link::Link;
use crate::view::{normalize_query, LinkGroup};

pub fn print_view(groups: &[LinkGroup], total_links: usize, query: &str, palette: &Palette) {
    for line in render_view(groups, total_links, query, palette) {
        println!("{line}");
    }
}

pub fn render_view(
    groups: &[LinkGroup],
    total_links: usize,
    query: &str,
    palette: &Palette,
) -> Vec<String> {
    if total_links == 0 {
        return vec![palette.dim("no links yet")];
    }
    if normalize_query(query).is_some() && groups.iter().all(|group| group.links.is_empty()) {
        return vec![palette.dim(&format!("no links matched '{}'", query.trim()))];
    }

    let mut lines = Vec::new();
    let mut shown = 0usize;
    for group in groups.iter().filter(|group| !group.links.is_empty()) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format_group_heading(group, palette));
        for link in &group.links {
            lines.push(format_link_row(link, palette));
        }
        shown += group.links.len();
    }
    lines.push(String::new());
    lines.push(palette.dim(&format!("{shown} link(s)")));
    lines
}

fn format_group_heading(group: &LinkGroup, palette: &Palette) -> String {
    match group.group_key.as_deref() {
        Some(id) => format!(
            "{} {}",
            palette.heading(&group.display_name),
            palette.dim(&format!("[{id}]"))
        ),
        None => palette.heading(&group.display_name),
    }
}

pub fn format_link_row(link: &Link, palette: &Palette) -> String {
    let marker = if link.is_special { "★" } else { "-" };
    let title = if link.is_special {
        palette.special(&link.title)
    } else {
        link.title.clone()
    };
    format!(
        "  {} {} {} {}",
        marker,
        title,
        palette.url(&link.url),
        palette.id(&link.id)
    )
}

pub fn print_link(link: &Link, category: Option<&Category>, palette: &Palette) {
    println!("{}", format_link_row(link, palette).trim_start());
    let category = category.map_or_else(
        || crate::view::UNCATEGORIZED_LABEL.to_string(),
        |category| format!("{} [{}]", category.name, category.id),
    );
    println!("  category: {category}");
}

pub fn print_categories(categories: &[Category], links: &[Link], palette: &Palette) {
    if categories.is_empty() {
        println!("{}", palette.dim("no categories"));
        return;
    }
    let mut sorted: Vec<&Category> = categories.iter().collect();
    sorted.sort_by(|left, right| crate::view::compare_names(&left.name, &right.name));
    for category in sorted {
        let count = links
            .iter()
            .filter(|link| link.category_id.as_deref() == Some(category.id.as_str()))
            .count();
        println!(
            "{} {} {}",
            palette.id(&category.id),
            category.name,
            palette.dim(&format!("({count} link(s))"))
        );
    }
}

pub fn confirm(question: &str) -> io::Result<bool> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{question} [y/N] ")?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

pub fn stdin_is_terminal() -> bool {
    io::stdin().is_terminal()
}

pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(mode: ColorMode) -> Self {
        let enabled = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
        };
        Self { enabled }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    pub fn id(&self, text: &str) -> String {
        self.paint("1;94", &format!("({text})"))
    }

    pub fn url(&self, text: &str) -> String {
        self.paint("4;90", text)
    }

    pub fn special(&self, text: &str) -> String {
        self.paint("1;33", text)
    }
}
