use crate::news::config::FormatterConfig;
use crate::news::types::CarouselDescriptor;

/// Per-call state threaded through the pipeline.
pub struct RuleContext<'a> {
    pub config: &'a FormatterConfig,
    pub carousels: Vec<CarouselDescriptor>,
}

impl<'a> RuleContext<'a> {
    pub fn new(config: &'a FormatterConfig) -> Self {
        Self {
            config,
            carousels: Vec::new(),
        }
    }
}

/// One rewrite step. Rules are total: input they cannot make sense of is
/// returned unchanged.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, input: &str, ctx: &mut RuleContext<'_>) -> String;
}
