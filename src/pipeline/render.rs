//! HTML rendering: Markdown text in, complete styled HTML document out.
//!
//! Parsing is delegated to `pulldown-cmark` with GFM tables and
//! strikethrough enabled (fenced code blocks are part of CommonMark and
//! need no opt-in). The resulting fragment is wrapped in a fixed HTML5
//! template carrying the default stylesheet, so the staged document is
//! self-contained — wkhtmltopdf needs no network access and no external
//! assets to render it.

use pulldown_cmark::{html, Options, Parser};

/// Default styling embedded into every document: readable body typography,
/// shaded code blocks, a left-ruled blockquote, and bordered tables.
const DOCUMENT_CSS: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; margin: 2em; }
h1, h2, h3 { color: #333; }
code { background-color: #f4f4f4; border-radius: 3px; padding: 2px 5px; }
pre { background-color: #f4f4f4; border-radius: 5px; padding: 10px; overflow-x: auto; }
blockquote { border-left: 5px solid #ddd; padding-left: 15px; color: #555; }
img { max-width: 100%; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 8px; }";

/// Render Markdown into a complete HTML document with the given title.
pub fn render_document(markdown: &str, title: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut body = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut body, parser);

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>\n{css}\n</style>\n\
         </head>\n\
         <body>\n{body}</body>\n\
         </html>\n",
        title = escape_text(title),
        css = DOCUMENT_CSS,
        body = body,
    )
}

/// Minimal HTML text escaping for the `<title>` element.
///
/// The body is produced by pulldown-cmark and already escaped; only the
/// title is interpolated from a raw string (file stem or `--title` flag).
fn escape_text(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
