//! Response text sanitization
//!
//! The recognition service tends to wrap its answer in quotes or narration
//! ("The image shows a handwritten letter A"). These rules strip the known
//! framing so only the recognized content remains. The rules are an ordered
//! best-effort list, not a grammar; each group removes at most one match.

/// Narration the service prepends to the answer
const LEADING_PHRASES: &[&str] = &[
    "The image shows ",
    "I see ",
    "This is ",
    "The image contains ",
    "The letter ",
    "The character ",
    "The text ",
    "It appears to be ",
    "It shows ",
    "It is ",
    "This looks like ",
];

/// Narration the service appends to the answer
const TRAILING_PHRASES: &[&str] = &[
    " drawn in the image",
    " in the image",
    " appears",
    " is shown",
];

const LEADING_ARTICLES: &[&str] = &["a ", "an ", "the "];

const LEADING_STYLE_WORDS: &[&str] = &["hand-drawn ", "handwritten "];

const LEADING_LETTER_WORDS: &[&str] = &["uppercase letter ", "lowercase letter ", "letter "];

const LEADING_KIND_WORDS: &[&str] = &["character ", "symbol "];

/// Strip known framing from a raw recognition response.
pub fn clean_response(raw: &str) -> String {
    let mut text = raw.trim();

    // One surrounding quote on each end
    text = text.strip_prefix(['"', '\'']).unwrap_or(text);
    text = text.strip_suffix(['"', '\'']).unwrap_or(text);

    text = strip_one_prefix(text, LEADING_PHRASES);
    text = strip_one_suffix(text, TRAILING_PHRASES);
    text = strip_one_prefix(text, LEADING_ARTICLES);
    text = strip_one_prefix(text, LEADING_STYLE_WORDS);
    text = strip_one_prefix(text, LEADING_LETTER_WORDS);
    text = strip_one_prefix(text, LEADING_KIND_WORDS);

    text.trim().to_string()
}

fn strip_one_prefix<'a>(text: &'a str, prefixes: &[&str]) -> &'a str {
    for prefix in prefixes {
        if let Some(rest) = text.strip_prefix(prefix) {
            return rest;
        }
    }
    text
}

fn strip_one_suffix<'a>(text: &'a str, suffixes: &[&str]) -> &'a str {
    for suffix in suffixes {
        if let Some(rest) = text.strip_suffix(suffix) {
            return rest;
        }
    }
    text
}
