//! Screen view models and their renderers.
//!
//! Builders in [`admin`] and [`portal`] turn API records into a [`Page`];
//! [`render`] prints it as Markdown or JSON.

pub mod admin;
pub mod markdown;
pub mod portal;

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;

pub use markdown::render_markdown;

/// A rendered screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Section {
    Cards {
        heading: Option<String>,
        cards: Vec<Card>,
    },
    Table {
        heading: Option<String>,
        table: Table,
    },
    Fields {
        heading: Option<String>,
        fields: Vec<Field>,
    },
    List {
        heading: Option<String>,
        items: Vec<ListItem>,
        empty_message: String,
    },
    Text {
        heading: Option<String>,
        body: String,
    },
    Message {
        text: String,
    },
}

impl Section {
    pub fn message(text: impl Into<String>) -> Self {
        Section::Message { text: text.into() }
    }

    pub fn text(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Section::Text {
            heading: Some(heading.into()),
            body: body.into(),
        }
    }

    pub fn fields(heading: Option<&str>, fields: Vec<Field>) -> Self {
        Section::Fields {
            heading: heading.map(str::to_string),
            fields,
        }
    }

    pub fn table(heading: Option<&str>, table: Table) -> Self {
        Section::Table {
            heading: heading.map(str::to_string),
            table,
        }
    }
}

/// A headline number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub label: String,
    pub value: String,
}

impl Card {
    pub fn new(label: &str, value: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    pub fn new(label: &str, value: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub depth: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Shown instead of the table when there are no rows.
    pub empty_message: String,
}

impl Table {
    pub fn new(headers: &[&str], empty_message: &str) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            empty_message: empty_message.to_string(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Pretty-printed JSON of a page.
pub fn render_json(page: &Page) -> Result<String> {
    serde_json::to_string_pretty(page).context("Failed to serialize page")
}

/// Render a page in the requested format.
pub fn render(page: &Page, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(page)),
        OutputFormat::Json => render_json(page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_tags_sections() {
        let page = Page::new("공지사항").section(Section::message("공지사항이 없습니다."));
        let json: serde_json::Value = serde_json::from_str(&render_json(&page).unwrap()).unwrap();
        assert_eq!(json["title"], "공지사항");
        assert_eq!(json["sections"][0]["kind"], "message");
        assert_eq!(json["sections"][0]["text"], "공지사항이 없습니다.");
    }

    #[test]
    fn test_render_dispatch() {
        let page = Page::new("x");
        assert!(render(&page, OutputFormat::Markdown).unwrap().starts_with("# x"));
        assert!(render(&page, OutputFormat::Json).unwrap().starts_with('{'));
    }
}
