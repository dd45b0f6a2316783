use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::news::markup::{
    BRACKET_IMAGE_RE, LITERAL_IMAGE_RE, bracket_image_source, image_element, resolve_media_url,
    unescape_attribute,
};
use crate::news::types::CarouselDescriptor;

use super::traits::{Rule, RuleContext};

static CAROUSEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\[carousel\](.*?)\[/carousel\]").expect("carousel regex"));

pub const EMPTY_GALLERY_TEXT: &str = r#"<p class="carousel-placeholder">Image gallery unavailable</p>"#;

/// `[carousel]` galleries. Two or more images become a hydration placeholder;
/// fewer degrade to a single image or a line of text.
pub struct Carousels;

impl Rule for Carousels {
    fn name(&self) -> &'static str {
        "carousel"
    }

    fn apply(&self, input: &str, ctx: &mut RuleContext<'_>) -> String {
        let base = ctx.config.clan_image_base.clone();
        let mut found = Vec::new();

        let out = CAROUSEL_RE
            .replace_all(input, |caps: &Captures| {
                let images = gallery_images(&caps[1], &base);
                match images.len() {
                    0 => EMPTY_GALLERY_TEXT.to_string(),
                    1 => image_element(&images[0]),
                    _ => {
                        let carousel = CarouselDescriptor::new(ctx.carousels.len() + found.len(), images);
                        let html = carousel.placeholder();
                        found.push(carousel);
                        html
                    }
                }
            })
            .into_owned();

        ctx.carousels.extend(found);
        out
    }
}

/// Every image inside a gallery in document order. Repeats are kept.
fn gallery_images(body: &str, base: &str) -> Vec<String> {
    let mut positioned: Vec<(usize, String)> = Vec::new();

    for cap in BRACKET_IMAGE_RE.captures_iter(body) {
        let start = cap.get(0).map(|m| m.start()).unwrap_or(0);
        if let Some(url) = resolve_media_url(&bracket_image_source(&cap), base) {
            positioned.push((start, url));
        }
    }
    for cap in LITERAL_IMAGE_RE.captures_iter(body) {
        let start = cap.get(0).map(|m| m.start()).unwrap_or(0);
        if let Some(url) = resolve_media_url(&unescape_attribute(&cap["src"]), base) {
            positioned.push((start, url));
        }
    }

    positioned.sort_by_key(|(start, _)| *start);
    positioned.into_iter().map(|(_, url)| url).collect()
}
