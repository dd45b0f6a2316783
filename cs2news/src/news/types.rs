use serde::Serialize;
use uuid::Uuid;

use crate::news::config::FormatterConfig;
use crate::news::markup::{attribute, escape_attribute, parse_attributes, parse_flag, resolve_media_url};

/// Markup produced by the rule pipeline together with every carousel it emitted.
#[derive(Clone, Debug, Serialize, Default, PartialEq)]
pub struct FormattedContent {
    pub html: String,
    pub carousels: Vec<CarouselDescriptor>,
}

/// A gallery with two or more images. The rendering layer mounts a carousel
/// on the element whose id matches.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CarouselDescriptor {
    pub id: String,
    pub images: Vec<String>,
}

impl CarouselDescriptor {
    /// Ids are derived from the occurrence index and the image list so the
    /// same input always yields the same markup.
    pub fn new(index: usize, images: Vec<String>) -> Self {
        let seed = format!("{index}:{}", images.join("\n"));
        let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, seed.as_bytes());
        Self {
            id: format!("carousel-{}", id.simple()),
            images,
        }
    }

    pub fn placeholder(&self) -> String {
        let data = serde_json::to_string(&self.images).unwrap_or_else(|_| "[]".into());
        format!(
            r#"<div class="image-carousel" id="{id}" data-carousel-id="{id}" data-images="{data}"></div>"#,
            id = self.id,
            data = escape_attribute(&data),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VideoDescriptor {
    /// `webm` source, listed first.
    pub source: Option<String>,
    /// `mp4` source.
    pub alt_source: Option<String>,
    pub poster: Option<String>,
    pub autoplay: bool,
    pub controls: bool,
}

impl VideoDescriptor {
    /// Build from `[video ...]` attributes. Returns `None` when no source is
    /// present so the construct can pass through untouched.
    pub fn from_attributes(raw: &str, config: &FormatterConfig) -> Option<Self> {
        let attrs = parse_attributes(raw);
        let base = config.clan_image_base.as_str();

        let source = attribute(&attrs, "webm")
            .or_else(|| attribute(&attrs, "src"))
            .and_then(|v| resolve_media_url(v, base));
        let alt_source = attribute(&attrs, "mp4").and_then(|v| resolve_media_url(v, base));
        if source.is_none() && alt_source.is_none() {
            return None;
        }

        Some(Self {
            source,
            alt_source,
            poster: attribute(&attrs, "poster").and_then(|v| resolve_media_url(v, base)),
            autoplay: parse_flag(attribute(&attrs, "autoplay"), config.video_autoplay),
            controls: parse_flag(attribute(&attrs, "controls"), config.video_controls),
        })
    }

    pub fn render(&self) -> String {
        let mut flags = vec!["muted", "loop", "playsinline"];
        if self.autoplay {
            flags.insert(0, "autoplay");
        }
        if self.controls {
            flags.push("controls");
        }

        let mut html = String::from(VIDEO_CONTAINER_OPEN);
        html.push_str(r#"<video class="bb-video" "#);
        html.push_str(&flags.join(" "));
        if let Some(poster) = &self.poster {
            html.push_str(&format!(r#" poster="{}""#, escape_attribute(poster)));
        }
        html.push('>');
        if let Some(src) = &self.source {
            html.push_str(&source_element(src));
        }
        if let Some(src) = &self.alt_source {
            html.push_str(&source_element(src));
        }
        html.push_str("</video></div>");
        html
    }
}

pub const VIDEO_CONTAINER_OPEN: &str = r#"<div class="video-container">"#;

fn source_element(src: &str) -> String {
    let lower = src.to_ascii_lowercase();
    let mime = if lower.contains(".mp4") {
        "video/mp4"
    } else {
        "video/webm"
    };
    format!(
        r#"<source src="{}" type="{}">"#,
        escape_attribute(src),
        mime
    )
}
