//! Markdown rendering of view pages.

use super::{Card, Field, ListItem, Page, Section, Table};

/// Render a page as Markdown.
pub fn render_markdown(page: &Page) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", page.title));

    for section in &page.sections {
        output.push_str(&render_section(section));
    }

    output
}

fn render_heading(heading: &Option<String>) -> String {
    match heading {
        Some(heading) => format!("## {}\n\n", heading),
        None => String::new(),
    }
}

fn render_section(section: &Section) -> String {
    match section {
        Section::Cards { heading, cards } => {
            format!("{}{}", render_heading(heading), render_cards(cards))
        }
        Section::Table { heading, table } => {
            format!("{}{}", render_heading(heading), render_table(table))
        }
        Section::Fields { heading, fields } => {
            format!("{}{}", render_heading(heading), render_fields(fields))
        }
        Section::List {
            heading,
            items,
            empty_message,
        } => {
            if items.is_empty() {
                format!("{}_{}_\n\n", render_heading(heading), empty_message)
            } else {
                format!("{}{}", render_heading(heading), render_list(items))
            }
        }
        Section::Text { heading, body } => {
            format!("{}{}\n\n", render_heading(heading), body.trim_end())
        }
        Section::Message { text } => format!("> {}\n\n", text),
    }
}

fn render_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    let labels: Vec<&str> = cards.iter().map(|c| c.label.as_str()).collect();
    let values: Vec<String> = cards.iter().map(|c| format!("**{}**", escape_cell(&c.value))).collect();

    section.push_str(&format!("| {} |\n", labels.join(" | ")));
    section.push_str(&format!("|{}\n", ":---:|".repeat(cards.len())));
    section.push_str(&format!("| {} |\n\n", values.join(" | ")));
    section
}

fn render_fields(fields: &[Field]) -> String {
    let mut section = String::new();
    for field in fields {
        section.push_str(&format!("- **{}:** {}\n", field.label, field.value));
    }
    section.push('\n');
    section
}

fn render_list(items: &[ListItem]) -> String {
    let mut section = String::new();
    for item in items {
        let indent = "  ".repeat(item.depth);
        let mut lines = item.text.lines();
        let first = lines.next().unwrap_or_default();
        section.push_str(&format!("{}- {}\n", indent, first));
        for line in lines {
            section.push_str(&format!("{}  {}\n", indent, line));
        }
    }
    section.push('\n');
    section
}

/// Table cells cannot hold pipes or line breaks.
fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace('\n', " ")
}

fn render_table(table: &Table) -> String {
    if table.is_empty() {
        return format!("_{}_\n\n", table.empty_message);
    }

    let mut section = String::new();
    section.push_str(&format!("| {} |\n", table.headers.join(" | ")));
    section.push_str(&format!("|{}\n", "---|".repeat(table.headers.len())));
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
        section.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    section.push('\n');
    section
}
