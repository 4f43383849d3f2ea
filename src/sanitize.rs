use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const MAX_TEXT_LEN: usize = 1_000;

/// Clean a feed-supplied text fragment for storage: strip markup, unescape
/// the common entities, collapse whitespace, and cap the length.
pub fn sanitize(input: &str) -> String {
    let stripped = TAG_RE.replace_all(input, " ");
    // `&amp;` is unescaped last so it cannot re-form another entity.
    let unescaped = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    let collapsed = WHITESPACE_RE.replace_all(&unescaped, " ");
    let trimmed = collapsed.trim();
    if trimmed.chars().count() > MAX_TEXT_LEN {
        trimmed.chars().take(MAX_TEXT_LEN).collect()
    } else {
        trimmed.to_string()
    }
}
