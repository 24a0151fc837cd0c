//! Reply link extraction.

use std::sync::LazyLock;

use regex::Regex;

/// The reply text shown when the generation call fails outright.
pub const GENERATION_FAILED_TEXT: &str = "Error getting response.";

static IMAGE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://\S+?\.(?:jpe?g|png|gif)")
        .expect("image pattern must compile")
});

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://\S+").expect("url pattern must compile")
});

/// A reply decomposed into renderable parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedReply {
    /// The full reply text, links included.
    pub text: String,
    /// URLs ending in an image file extension, in order of appearance.
    pub images: Vec<String>,
    /// Every URL, in order of appearance.
    pub urls: Vec<String>,
}

/// Splits a raw reply into its text plus the links embedded in it.
///
/// `images` collects whitespace-delimited URLs ending in
/// `jpg`/`jpeg`/`png`/`gif` (case-insensitive); `urls` collects every
/// `http(s)` URL. The two scans are independent, so an image link shows
/// up in both.
pub fn parse_reply(raw: &str) -> ParsedReply {
    let images = IMAGE_URL_PATTERN
        .find_iter(raw)
        .map(|m| m.as_str().to_owned())
        .collect();
    let urls = URL_PATTERN
        .find_iter(raw)
        .map(|m| m.as_str().to_owned())
        .collect();
    ParsedReply {
        text: raw.to_owned(),
        images,
        urls,
    }
}

/// The absorbed form of a failed generation call: a plain placeholder
/// reply, indistinguishable in shape from a normal one.
pub fn failure_reply() -> ParsedReply {
    ParsedReply {
        text: GENERATION_FAILED_TEXT.to_owned(),
        images: Vec::new(),
        urls: Vec::new(),
    }
}
