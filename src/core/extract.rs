use scraper::{Html, Selector};

use crate::error::{Result, WatchError};

/// Concatenate the text of every region matching `rule`, in document order.
///
/// Text is taken verbatim from the descendant text nodes of each match. A rule
/// that matches nothing yields an empty block. `url` only labels errors.
pub fn extract_block(document: &str, rule: &str, url: &str) -> Result<String> {
    let selector = Selector::parse(rule).map_err(|e| WatchError::ParseFailed {
        url: url.to_string(),
        reason: format!("invalid selector {:?}: {}", rule, e),
    })?;

    let html = Html::parse_document(document);
    let mut block = String::new();
    for element in html.select(&selector) {
        for piece in element.text() {
            block.push_str(piece);
        }
    }
    Ok(block)
}

/// Newlines in a content block, reported in baseline mode.
pub fn newline_count(block: &str) -> usize {
    block.matches('\n').count()
}
