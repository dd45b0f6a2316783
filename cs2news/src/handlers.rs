use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::news::config::FormatterConfig;
use crate::news::event::{EventCard, SteamEvent};
use crate::news::media::MediaExtractor;
use crate::news::preview::preview_with_limit;
use crate::news::rules::RulePipeline;

pub fn config(conf: &mut web::ServiceConfig) {
    let api_scope = web::scope("/api")
        .service(healthcheck_handler)
        .service(format_handler)
        .service(images_handler)
        .service(preview_handler)
        .service(events_handler);

    conf.service(api_scope);
}

/// JSON extractor settings: payload limit plus a JSON error body on bad input.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            let body = json!({ "error": err.to_string() });
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}

#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    #[serde(default)]
    pub description: Option<String>,
}

impl DescriptionRequest {
    fn text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EventsRequest {
    Feed { events: Vec<SteamEvent> },
    Single(SteamEvent),
}

#[derive(Serialize)]
struct EventsResponse {
    events: Vec<EventCard>,
}

#[get("/health")]
pub async fn healthcheck_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "pong" }))
}

#[post("/format")]
pub async fn format_handler(
    formatter: web::Data<FormatterConfig>,
    body: web::Json<DescriptionRequest>,
) -> impl Responder {
    let formatted = RulePipeline::standard().run(body.text(), formatter.get_ref());
    debug!(
        "formatted {} bytes into {} bytes, {} carousel(s)",
        body.text().len(),
        formatted.html.len(),
        formatted.carousels.len()
    );
    HttpResponse::Ok().json(formatted)
}

#[post("/images")]
pub async fn images_handler(
    formatter: web::Data<FormatterConfig>,
    body: web::Json<DescriptionRequest>,
) -> impl Responder {
    let images = MediaExtractor::new(&formatter.clan_image_base).extract(body.text());
    HttpResponse::Ok().json(json!({ "images": images }))
}

#[post("/preview")]
pub async fn preview_handler(
    formatter: web::Data<FormatterConfig>,
    body: web::Json<DescriptionRequest>,
) -> impl Responder {
    let preview = preview_with_limit(body.text(), formatter.preview_length);
    HttpResponse::Ok().json(json!({ "preview": preview }))
}

#[post("/events")]
pub async fn events_handler(
    formatter: web::Data<FormatterConfig>,
    body: web::Json<EventsRequest>,
) -> impl Responder {
    let events = match body.into_inner() {
        EventsRequest::Feed { events } => events,
        EventsRequest::Single(event) => vec![event],
    };

    let cards = events
        .iter()
        .map(|event| EventCard::from_event(event, formatter.get_ref()))
        .collect();

    HttpResponse::Ok().json(EventsResponse { events: cards })
}
