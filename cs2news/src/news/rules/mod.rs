pub mod carousel;
pub mod code;
pub mod emphasis;
pub mod headings;
pub mod images;
pub mod links;
pub mod lists;
pub mod quotes;
pub mod repair;
pub mod sections;
pub mod styling;
pub mod traits;
pub mod video;

use log::trace;

use crate::news::config::FormatterConfig;
use crate::news::types::FormattedContent;

use self::carousel::Carousels;
use self::code::CodeBlocks;
use self::emphasis::Emphasis;
use self::headings::Headings;
use self::images::Images;
use self::links::Links;
use self::lists::Lists;
use self::quotes::Quotes;
use self::repair::StructuralRepair;
use self::sections::SectionHeaders;
use self::styling::InlineStyles;
use self::traits::{Rule, RuleContext};
use self::video::{EmbeddedVideos, VideoBlocks};

pub struct RulePipeline {
    rules: Vec<Box<dyn Rule>>,
}

impl RulePipeline {
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Box::new(NormalizeLineEndings),
                // Bracket videos first; the literal-video pass skips what they emit.
                Box::new(VideoBlocks),
                Box::new(EmbeddedVideos),
                Box::new(Links),
                Box::new(Emphasis),
                Box::new(Quotes),
                Box::new(CodeBlocks),
                // Must claim its nested [img] tags before the image rule does.
                Box::new(Carousels),
                Box::new(InlineStyles),
                Box::new(Headings),
                Box::new(Lists),
                // Generic sweep: every specific tag rule has to run before it.
                Box::new(SectionHeaders),
                Box::new(Images),
                Box::new(StructuralRepair),
            ],
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule in order over `raw`.
    pub fn run(&self, raw: &str, config: &FormatterConfig) -> FormattedContent {
        if raw.is_empty() {
            return FormattedContent::default();
        }

        let mut ctx = RuleContext::new(config);
        let mut text = raw.to_string();
        for rule in &self.rules {
            let next = rule.apply(&text, &mut ctx);
            if next != text {
                trace!("rule {} rewrote {} -> {} bytes", rule.name(), text.len(), next.len());
            }
            text = next;
        }

        FormattedContent {
            html: text,
            carousels: ctx.carousels,
        }
    }
}

struct NormalizeLineEndings;

impl Rule for NormalizeLineEndings {
    fn name(&self) -> &'static str {
        "line-endings"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        input.replace("\r\n", "\n").replace('\r', "\n")
    }
}

/// Format with the default configuration. `None` and `""` both yield `""`.
pub fn format<'a>(raw: impl Into<Option<&'a str>>) -> String {
    format_document(raw).html
}

pub fn format_document<'a>(raw: impl Into<Option<&'a str>>) -> FormattedContent {
    format_with(raw, &FormatterConfig::default())
}

pub fn format_with<'a>(raw: impl Into<Option<&'a str>>, config: &FormatterConfig) -> FormattedContent {
    match raw.into() {
        Some(text) => RulePipeline::standard().run(text, config),
        None => FormattedContent::default(),
    }
}
