use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::news::config::FormatterConfig;
use crate::news::media::MediaExtractor;
use crate::news::preview::preview_with_limit;
use crate::news::rules::RulePipeline;
use crate::news::types::CarouselDescriptor;

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct AnnouncementBody {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub clanid: Option<String>,
}

/// One entry of Steam's partner event feed. Only the fields the viewer reads.
#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct SteamEvent {
    #[serde(default, deserialize_with = "string_or_number")]
    pub gid: Option<String>,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub event_description: Option<String>,
    #[serde(default)]
    pub announcement_body: Option<AnnouncementBody>,
    #[serde(default)]
    pub rtime32_start_time: Option<i64>,
    /// JSON document embedded as a string.
    #[serde(default)]
    pub jsondata: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct EventMetadata {
    #[serde(default)]
    pub localized_capsule_image: Vec<Option<String>>,
    #[serde(default)]
    pub localized_title_image: Vec<Option<String>>,
}

impl SteamEvent {
    /// The announcement body when present, else the event description.
    pub fn body(&self) -> &str {
        self.announcement_body
            .as_ref()
            .and_then(|a| a.body.as_deref())
            .filter(|b| !b.trim().is_empty())
            .or(self.event_description.as_deref())
            .unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        if !self.event_name.trim().is_empty() {
            return &self.event_name;
        }
        self.announcement_body
            .as_ref()
            .and_then(|a| a.headline.as_deref())
            .unwrap_or_default()
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.rtime32_start_time
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
    }

    pub fn metadata(&self) -> Result<EventMetadata> {
        match self.jsondata.as_deref().map(str::trim) {
            None | Some("") => Ok(EventMetadata::default()),
            Some(raw) => serde_json::from_str(raw).context("parsing event jsondata"),
        }
    }

    fn clan_id(&self) -> Option<&str> {
        self.announcement_body.as_ref().and_then(|a| a.clanid.as_deref())
    }
}

/// Everything a card or detail view needs for one event.
#[derive(Clone, Debug, Serialize)]
pub struct EventCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_image: Option<String>,
    pub html: String,
    pub images: Vec<String>,
    pub carousels: Vec<CarouselDescriptor>,
}

impl EventCard {
    pub fn from_event(event: &SteamEvent, config: &FormatterConfig) -> Self {
        let body = event.body();
        let formatted = RulePipeline::standard().run(body, config);
        let images = MediaExtractor::new(&config.clan_image_base).extract(body);
        let display_image = select_display_image(event, &images, config);

        Self {
            gid: event.gid.clone(),
            title: event.title().to_string(),
            published: event.published(),
            preview: preview_with_limit(body, config.preview_length),
            display_image,
            html: formatted.html,
            images,
            carousels: formatted.carousels,
        }
    }
}

/// Capsule art declared in `jsondata`, then title art, then the first image
/// found in the body.
pub fn select_display_image(
    event: &SteamEvent,
    images: &[String],
    config: &FormatterConfig,
) -> Option<String> {
    let metadata = event.metadata().unwrap_or_else(|err| {
        warn!(
            "event {}: {err:#}",
            event.gid.as_deref().unwrap_or("<unknown>")
        );
        EventMetadata::default()
    });

    metadata
        .localized_capsule_image
        .iter()
        .chain(metadata.localized_title_image.iter())
        .flatten()
        .find_map(|hash| declared_image_url(hash, event.clan_id(), config))
        .or_else(|| images.first().cloned())
}

fn declared_image_url(hash: &str, clan_id: Option<&str>, config: &FormatterConfig) -> Option<String> {
    let hash = hash.trim();
    if hash.is_empty() {
        return None;
    }
    if hash.starts_with("http://") || hash.starts_with("https://") {
        return Some(hash.to_string());
    }
    clan_id.map(|clan| {
        format!(
            "{}/{}/{}",
            config.clan_image_base.trim_end_matches('/'),
            clan,
            hash
        )
    })
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
