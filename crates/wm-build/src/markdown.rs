//! Markdown to HTML conversion.
//!
//! Uses pulldown-cmark with tables, footnotes, strikethrough, task lists and
//! `{#id .class}` heading attributes. Headings without an explicit id get one
//! derived from their text, deduplicated per page.

use std::collections::HashMap;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html::push_html};

/// Render a Markdown document to HTML.
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let events = inject_heading_ids(parser);

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    push_html(&mut html, events.into_iter());
    html
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Buffer the event stream, filling in `id` on headings that lack one.
fn inject_heading_ids<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events: Vec<Event<'a>> = Vec::new();
    let mut ids = HeadingIds::default();
    // Index of the open heading's start event, and its text so far
    let mut heading: Option<(usize, String)> = None;

    for event in parser {
        match &event {
            Event::Start(Tag::Heading { id: None, .. }) => {
                heading = Some((events.len(), String::new()));
            }
            Event::Start(Tag::Heading { id: Some(id), .. }) => ids.reserve(id),
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = &mut heading {
                    buf.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, text)) = heading.take()
                    && let Some(slug) = ids.next(&slugify(&text))
                    && let Some(Event::Start(Tag::Heading { id, .. })) = events.get_mut(start)
                {
                    *id = Some(slug.into());
                }
            }
            _ => {}
        }
        events.push(event);
    }

    events
}

/// Tracks heading ids already used on a page.
#[derive(Default)]
struct HeadingIds {
    counts: HashMap<String, usize>,
}

impl HeadingIds {
    /// Mark an explicit id as taken.
    fn reserve(&mut self, id: &str) {
        *self.counts.entry(id.to_owned()).or_default() += 1;
    }

    /// Unique id for `slug`, or `None` if the slug is empty.
    fn next(&mut self, slug: &str) -> Option<String> {
        if slug.is_empty() {
            return None;
        }
        let count = self.counts.entry(slug.to_owned()).or_default();
        let id = match *count {
            0 => slug.to_owned(),
            n => format!("{slug}-{n}"),
        };
        *count += 1;
        Some(id)
    }
}

/// Convert heading text to a URL-safe slug.
///
/// Lowercases ASCII alphanumerics, turns whitespace, dashes and underscores
/// into single dashes, and drops everything else.
fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}
