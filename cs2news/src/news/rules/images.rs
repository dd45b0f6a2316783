use regex::Captures;

use crate::news::markup::{BRACKET_IMAGE_RE, bracket_image_source, image_element, resolve_media_url};

use super::traits::{Rule, RuleContext};

/// Bracket images outside galleries. Empty sources emit nothing.
pub struct Images;

impl Rule for Images {
    fn name(&self) -> &'static str {
        "images"
    }

    fn apply(&self, input: &str, ctx: &mut RuleContext<'_>) -> String {
        let base = ctx.config.clan_image_base.as_str();
        BRACKET_IMAGE_RE
            .replace_all(input, |caps: &Captures| {
                resolve_media_url(&bracket_image_source(caps), base)
                    .map(|src| image_element(&src))
                    .unwrap_or_default()
            })
            .into_owned()
    }
}
