//! Final-screen breakdown of everything the user picked.

use crate::copy;
use crate::selection::{Category, SelectionRecord};

/// `"movie-night"` -> `"Movie Night"`.
pub fn format_label(token: &str) -> String {
    token
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn heading(category: Category) -> &'static str {
    match category {
        Category::Dates => "📅 When we'll celebrate:",
        Category::Food => "🍕 Food choices:",
        Category::Desserts => "🍰 Sweet treats:",
        Category::Activities => "💻 Virtual date activities:",
        Category::Gift => "🎁 Your chosen gift:",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryGroup {
    pub category: Category,
    pub heading: &'static str,
    pub items: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Summary {
    /// Nothing was selected.
    Empty,
    /// Non-empty categories in fixed order: dates, food, desserts, activities, gift.
    Groups(Vec<SummaryGroup>),
}

impl Summary {
    pub fn from_record(record: &SelectionRecord) -> Self {
        let groups: Vec<SummaryGroup> = Category::ALL
            .iter()
            .filter_map(|&category| {
                let tokens = record.tokens(category);
                if tokens.is_empty() {
                    return None;
                }
                Some(SummaryGroup {
                    category,
                    heading: heading(category),
                    items: tokens.into_iter().map(format_label).collect(),
                })
            })
            .collect();
        if groups.is_empty() {
            Summary::Empty
        } else {
            Summary::Groups(groups)
        }
    }

    pub fn to_html(&self) -> String {
        let groups = match self {
            Summary::Empty => {
                return format!(
                    "<p style=\"text-align: center; color: var(--light-text);\">{}</p>",
                    escape_html(copy::SUMMARY_EMPTY)
                );
            }
            Summary::Groups(groups) => groups,
        };
        let mut html = String::new();
        for group in groups {
            html.push_str("<div class=\"summary-item\"><strong>");
            html.push_str(&escape_html(group.heading));
            html.push_str("</strong><ul>");
            for item in &group.items {
                html.push_str("<li>");
                html.push_str(&escape_html(item));
                html.push_str("</li>");
            }
            html.push_str("</ul></div>");
        }
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
