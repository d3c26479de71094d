//! Turns document markup into terminal text.

use colored::{ColoredString, Colorize};
use story_application::{Alert, AlertLevel};

/// Strips tags, decodes the entities the templates emit and collapses
/// whitespace. Block-level closing tags become line breaks.
pub fn plain_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for c in markup.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if breaks_line(&tag) {
                    text.push('\n');
                } else {
                    text.push(' ');
                }
            }
            c if in_tag => tag.push(c),
            c => text.push(c),
        }
    }

    let text = decode_entities(&text);
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn breaks_line(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(
        name.as_str(),
        "p" | "div" | "section" | "article" | "h1" | "h2" | "h3" | "br" | "li" | "form" | "header"
    )
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&times;", "x")
        .replace("&amp;", "&")
}

pub fn alert_line(alert: &Alert) -> ColoredString {
    let line = format!("[{}] {}", alert.level, alert.message);
    match alert.level {
        AlertLevel::Info => line.cyan(),
        AlertLevel::Success => line.green(),
        AlertLevel::Warning => line.yellow(),
        AlertLevel::Error => line.red(),
    }
}
