use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::news::config::DEFAULT_CLAN_IMAGE_BASE;
use crate::news::markup::{
    BRACKET_IMAGE_RE, LITERAL_IMAGE_RE, attribute, bracket_image_source, parse_attributes,
    resolve_media_url, unescape_attribute,
};

static VIDEO_ELEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<video\b(?P<attrs>[^>]*)>").expect("video element regex"));
static VIDEO_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\[video\b(?P<attrs>[^\]]*)\]").expect("video block regex"));
static CAROUSEL_DATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*\bclass="image-carousel"[^>]*\sdata-images="(?P<data>[^"]*)""#)
        .expect("carousel data regex")
});

/// Finds image and poster URLs in raw announcement text or in formatted markup.
///
/// Passes run in a fixed order (literal `<img>`, video posters, bracket images
/// and gallery data). Results are concatenated pass by pass and deduplicated
/// keeping the first occurrence.
pub struct MediaExtractor<'a> {
    clan_image_base: &'a str,
}

impl Default for MediaExtractor<'static> {
    fn default() -> Self {
        Self::new(DEFAULT_CLAN_IMAGE_BASE)
    }
}

impl<'a> MediaExtractor<'a> {
    pub fn new(clan_image_base: &'a str) -> Self {
        Self { clan_image_base }
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        found.extend(self.literal_images(text));
        found.extend(self.video_posters(text));
        found.extend(self.bracket_images(text));
        found.extend(self.carousel_images(text));

        let mut seen = HashSet::new();
        found.retain(|url| seen.insert(url.clone()));
        found
    }

    fn resolve(&self, raw: &str) -> Option<String> {
        resolve_media_url(raw, self.clan_image_base)
    }

    fn literal_images(&self, text: &str) -> Vec<String> {
        LITERAL_IMAGE_RE
            .captures_iter(text)
            .filter_map(|cap| self.resolve(&unescape_attribute(&cap["src"])))
            .collect()
    }

    fn video_posters(&self, text: &str) -> Vec<String> {
        let literal = VIDEO_ELEMENT_RE.captures_iter(text).map(|cap| (true, cap));
        let bracket = VIDEO_BLOCK_RE.captures_iter(text).map(|cap| (false, cap));

        literal
            .chain(bracket)
            .filter_map(|(escaped, cap)| {
                let attrs = parse_attributes(&cap["attrs"]);
                for key in ["src", "mp4", "webm"] {
                    if let Some(source) = attribute(&attrs, key) {
                        debug!("video source {key}={source}");
                    }
                }
                let poster = attribute(&attrs, "poster")?;
                if escaped {
                    self.resolve(&unescape_attribute(poster))
                } else {
                    self.resolve(poster)
                }
            })
            .collect()
    }

    fn bracket_images(&self, text: &str) -> Vec<String> {
        BRACKET_IMAGE_RE
            .captures_iter(text)
            .filter_map(|cap| self.resolve(&bracket_image_source(&cap)))
            .collect()
    }

    fn carousel_images(&self, text: &str) -> Vec<String> {
        CAROUSEL_DATA_RE
            .captures_iter(text)
            .flat_map(|cap| {
                let data = unescape_attribute(&cap["data"]);
                match serde_json::from_str::<Vec<String>>(&data) {
                    Ok(images) => images,
                    Err(err) => {
                        debug!("ignoring unreadable carousel data: {err}");
                        Vec::new()
                    }
                }
            })
            .filter_map(|url| self.resolve(&url))
            .collect()
    }
}

/// Extract with the default clan image base.
pub fn extract_images(text: &str) -> Vec<String> {
    MediaExtractor::default().extract(text)
}
