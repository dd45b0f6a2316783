use once_cell::sync::Lazy;
use regex::Regex;

use super::traits::{Rule, RuleContext};

static HEADING_RES: Lazy<Vec<(u8, Regex)>> = Lazy::new(|| {
    (1..=6)
        .map(|level| {
            let re = Regex::new(&format!(r"(?is)\[h{level}\](.*?)\[/h{level}\]"))
                .expect("heading regex");
            (level, re)
        })
        .collect()
});

pub fn heading_tier(level: u8) -> u8 {
    4u8.saturating_sub(level.min(3)).max(1)
}

pub struct Headings;

impl Rule for Headings {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        HEADING_RES
            .iter()
            .fold(input.to_string(), |text, (level, re)| {
                let replacement = format!(
                    r#"<h{level} class="bb-heading bb-size-{tier}">$1</h{level}>"#,
                    tier = heading_tier(*level)
                );
                re.replace_all(&text, replacement.as_str()).into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::config::FormatterConfig;

    #[test]
    fn tier_formula() {
        let tiers: Vec<u8> = (1..=6).map(heading_tier).collect();
        assert_eq!(tiers, vec![3, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn headings_render_with_tier_class() {
        let config = FormatterConfig::default();
        let mut ctx = RuleContext::new(&config);
        assert_eq!(
            Headings.apply("[h1]Release Notes[/h1][h4]Maps[/h4]", &mut ctx),
            r#"<h1 class="bb-heading bb-size-3">Release Notes</h1><h4 class="bb-heading bb-size-1">Maps</h4>"#
        );
    }
}
