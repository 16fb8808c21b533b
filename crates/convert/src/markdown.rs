use pulldown_cmark::{Options, Parser, html};

/// Render CommonMark source to an HTML fragment.
///
/// Input that is not valid UTF-8 is decoded lossily.
pub(crate) fn render_html(source: &[u8]) -> String {
    let text = String::from_utf8_lossy(source);
    let parser = Parser::new_ext(&text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
