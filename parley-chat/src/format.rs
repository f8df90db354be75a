//! Reply formatting for the chat page.
//!
//! Fenced code blocks become `<pre><code>` blocks, with a leading language
//! tag line removed when it is a known language. The whole reply sits in a
//! single `bot-message` container. All model text is HTML-escaped.
//!
//! Unpaired fences are not handled specially: a trailing unterminated block
//! renders as code.

const FENCE: &str = "```";

/// Language tags stripped from the first line of a fenced block.
pub const LANGUAGE_TAGS: &[&str] = &[
    "python",
    "cpp",
    "javascript",
    "java",
    "html",
    "css",
    "bash",
    "csharp",
    "go",
    "ruby",
    "php",
    "swift",
    "r",
    "typescript",
    "kotlin",
    "dart",
];

/// Check whether `tag` is a recognised language annotation.
pub fn is_language_tag(tag: &str) -> bool {
    LANGUAGE_TAGS.contains(&tag)
}

/// Render a raw model reply as chat markup.
pub fn format_response(raw: &str) -> String {
    if !raw.contains(FENCE) {
        return wrap_message(&escape_html(raw));
    }

    let mut body = String::with_capacity(raw.len() + 32);
    for (i, part) in raw.split(FENCE).enumerate() {
        if i % 2 == 0 {
            body.push_str(&escape_html(part));
        } else {
            body.push_str("<pre><code>");
            body.push_str(&escape_html(code_block_body(part)));
            body.push_str("</code></pre>");
        }
    }

    wrap_message(&body)
}

/// Content of a fenced block with the language line removed.
fn code_block_body(block: &str) -> &str {
    let block = block.trim();
    match block.split_once('\n') {
        Some((first, rest)) if is_language_tag(first.trim()) => rest.trim(),
        _ => block,
    }
}

fn wrap_message(inner: &str) -> String {
    format!("<div class=\"bot-message\">{inner}</div>")
}

/// Escape HTML special characters.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
