//! Response normalization: sentinel detection and markdown → HTML for list sections.

use pulldown_cmark::{html, Event, Options, Parser};

use crate::llm_client::prompts::NA_SENTINEL;

/// Maps a raw section response to the value handed to the template.
///
/// Empty text or a case-insensitive `NA` becomes the literal `"NA"`;
/// anything else is converted from markdown to an HTML fragment.
pub fn normalize_section(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NA_SENTINEL) {
        return NA_SENTINEL.to_string();
    }
    markdown_to_html(raw)
}

/// Renders markdown to HTML. Raw HTML in the model output is emitted as escaped text.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}
