use once_cell::sync::Lazy;
use regex::Regex;

use super::traits::{Rule, RuleContext};

static STRUCTURE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(?P<close>/?)(?P<kind>ul|ol|li)\b[^>]*>").expect("structure tag regex")
});

/// Balance list and item tags left over by the substitution rules.
///
/// - An open item is closed right before the next item open, list open or
///   list close.
/// - Closers with nothing open are dropped.
/// - Whatever is still open at the end is closed there, items before lists.
///
/// This patches counts; it never re-nests content.
pub struct StructuralRepair;

impl Rule for StructuralRepair {
    fn name(&self) -> &'static str {
        "structural-repair"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        repair_structure(input)
    }
}

pub fn repair_structure(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 32);
    let mut lists: Vec<&'static str> = Vec::new();
    let mut item_open = false;
    let mut last = 0;

    for caps in STRUCTURE_TAG_RE.captures_iter(input) {
        let Some(tag) = caps.get(0) else {
            continue;
        };
        out.push_str(&input[last..tag.start()]);
        last = tag.end();

        let closing = !caps["close"].is_empty();
        let kind = caps["kind"].to_ascii_lowercase();

        match (kind.as_str(), closing) {
            ("li", false) => {
                if item_open {
                    out.push_str("</li>");
                }
                out.push_str(tag.as_str());
                item_open = true;
            }
            ("li", true) => {
                if item_open {
                    out.push_str(tag.as_str());
                    item_open = false;
                }
            }
            (list, false) => {
                if item_open {
                    out.push_str("</li>");
                    item_open = false;
                }
                out.push_str(tag.as_str());
                lists.push(if list == "ol" { "</ol>" } else { "</ul>" });
            }
            (_, true) => {
                // The closer always matches the list it ends, whatever the source wrote.
                if let Some(close) = lists.pop() {
                    if item_open {
                        out.push_str("</li>");
                        item_open = false;
                    }
                    out.push_str(close);
                }
            }
        }
    }

    out.push_str(&input[last..]);

    if item_open {
        out.push_str("</li>");
    }
    while let Some(close) = lists.pop() {
        out.push_str(close);
    }

    out
}

/// Opening and closing counts for items and lists, in that order.
pub fn structure_counts(html: &str) -> ((usize, usize), (usize, usize)) {
    let mut items = (0, 0);
    let mut lists = (0, 0);
    for caps in STRUCTURE_TAG_RE.captures_iter(html) {
        let closing = !caps["close"].is_empty();
        let counter = if caps["kind"].eq_ignore_ascii_case("li") {
            &mut items
        } else {
            &mut lists
        };
        if closing {
            counter.1 += 1;
        } else {
            counter.0 += 1;
        }
    }
    (items, lists)
}
