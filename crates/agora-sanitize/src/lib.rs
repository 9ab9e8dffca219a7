//! # Agora Sanitize
//!
//! Converts user-submitted Markdown into an HTML fragment that is safe to
//! render directly.
//!
//! The pipeline is parse-then-clean: pulldown-cmark renders the Markdown to
//! HTML, and ammonia reduces that HTML to an explicit allow-list of tags and
//! attributes. Allow-listing (rather than stripping known-bad constructs)
//! degrades safely against attack vectors the deny-list author never thought
//! of: anything not explicitly permitted is removed.
//!
//! [`render_markdown`] is total: malformed markup renders as literal text,
//! it never fails. Callers must store and serve the returned HTML and must
//! never feed already-sanitized HTML back through this function as Markdown
//! input; the raw submission is the only valid input.

use std::collections::{HashMap, HashSet};

use ammonia::Builder;
use pulldown_cmark::{Options, Parser, html};

/// Tags that survive sanitization. Everything else is stripped.
const ALLOWED_TAGS: [&str; 25] = [
    "a", "blockquote", "br", "code", "del", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "img",
    "li", "ol", "p", "pre", "strong", "table", "tbody", "td", "th", "thead", "tr",
];

/// Renders untrusted Markdown to a safe HTML fragment.
///
/// The output never contains `<script>` elements, `on*` event-handler
/// attributes, or `javascript:`-scheme URLs, for any input. The result is
/// the only form of the content that may be persisted or sent to clients.
pub fn render_markdown(raw: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(raw, options);
    let mut unsafe_html = String::new();
    html::push_html(&mut unsafe_html, parser);

    let clean = clean_html(&unsafe_html);

    if clean != unsafe_html {
        // Informational only: the content still renders, minus whatever the
        // allow-list rejected.
        tracing::debug!(
            raw_len = unsafe_html.len(),
            clean_len = clean.len(),
            "sanitizer stripped disallowed markup"
        );
    }

    clean
}

fn clean_html(html: &str) -> String {
    let mut tag_attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    tag_attributes.insert("a", ["href", "title"].into_iter().collect());
    tag_attributes.insert("img", ["src", "alt", "title"].into_iter().collect());

    Builder::new()
        .tags(ALLOWED_TAGS.into_iter().collect())
        .tag_attributes(tag_attributes)
        .url_schemes(["http", "https", "mailto"].into_iter().collect())
        .link_rel(Some("noopener noreferrer"))
        .clean(html)
        .to_string()
}
