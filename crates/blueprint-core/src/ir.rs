//! Solution IR and the IR-to-card compiler.

use crate::template::TemplateId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What kind of statement an IR step is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Declare,
    Loop,
    Branch,
    Compute,
    Update,
    Return,
    #[default]
    Step,
}

/// One ordered step of a reference solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrNode {
    /// Template slot id, or a canonical role the template maps onto a slot
    pub slot: String,
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub op: Op,
}

impl IrNode {
    pub fn new(slot: &str, key: &str, text: &str, op: Op) -> Self {
        Self {
            slot: slot.to_string(),
            key: key.to_string(),
            text: text.to_string(),
            op,
        }
    }
}

/// A reorderable puzzle piece built from one IR node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub text: String,
    pub correct_slot: String,
    pub correct_order: usize,
    pub key: String,
    pub hint: String,
    pub op: Op,
}

/// `window-check` -> `Window Check`
pub fn title_case_slot(slot: &str) -> String {
    slot.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text that carries no executable content: empty, or a line/block comment
pub fn is_comment_only(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || trimmed.starts_with("//")
        || trimmed.starts_with('#')
        || trimmed.starts_with('*')
        || (trimmed.starts_with("/*") && trimmed.ends_with("*/"))
}

/// Compile IR into cards for `template_id`.
///
/// Nodes whose slot does not resolve to one of the template's slots, and
/// nodes with no executable text, are dropped. `correct_order` counts up per
/// slot in encounter order.
pub fn compile(level_id: &str, template_id: TemplateId, ir: &[IrNode]) -> Vec<Card> {
    let mut next_order: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut cards = Vec::new();

    for node in ir {
        let Some(slot) = template_id.resolve_slot(&node.slot) else {
            continue;
        };
        let text = node.text.trim();
        if is_comment_only(text) {
            continue;
        }

        let order = next_order.entry(slot).or_insert(0);
        cards.push(Card {
            id: format!("{}-c{}", level_id, cards.len() + 1),
            text: text.to_string(),
            correct_slot: slot.to_string(),
            correct_order: *order,
            key: if node.key.is_empty() {
                format!("ir-{}-{}", slot, cards.len() + 1)
            } else {
                node.key.clone()
            },
            hint: title_case_slot(slot),
            op: node.op,
        });
        *order += 1;
    }

    cards
}

/// Number of cards per slot
pub fn slot_limits(cards: &[Card]) -> BTreeMap<String, usize> {
    let mut limits = BTreeMap::new();
    for card in cards {
        *limits.entry(card.correct_slot.clone()).or_insert(0) += 1;
    }
    limits
}

/// Canonical arrangement as `slot:key>key|slot:...`, slots in template order.
/// Used as the expected value when grading a user's arrangement.
pub fn expected_signature(template_id: TemplateId, cards: &[Card]) -> String {
    template_id
        .slot_ids()
        .into_iter()
        .map(|slot| {
            let mut in_slot: Vec<&Card> = cards.iter().filter(|c| c.correct_slot == slot).collect();
            in_slot.sort_by_key(|c| c.correct_order);
            let keys: Vec<&str> = in_slot.iter().map(|c| c.key.as_str()).collect();
            format!("{}:{}", slot, keys.join(">"))
        })
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(slot: &str, key: &str, text: &str) -> IrNode {
        IrNode::new(slot, key, text, Op::Step)
    }

    #[test]
    fn test_compile_orders_per_slot() {
        let ir = vec![
            node("setup", "a", "x = 0"),
            node("loop", "b", "for n in nums:"),
            node("setup", "c", "y = 1"),
            node("return", "d", "return x"),
        ];
        let cards = compile("q-1", TemplateId::StandardFlow, &ir);
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].id, "q-1-c1");
        assert_eq!(cards[2].id, "q-1-c3");
        assert_eq!((cards[0].correct_slot.as_str(), cards[0].correct_order), ("setup", 0));
        assert_eq!((cards[2].correct_slot.as_str(), cards[2].correct_order), ("setup", 1));
        assert_eq!(cards[1].correct_order, 0);
        assert_eq!(cards[3].hint, "Return");
    }

    #[test]
    fn test_compile_drops_foreign_slots_and_blank_text() {
        let ir = vec![
            node("setup", "a", "   "),
            node("nowhere", "b", "x = 1"),
            node("setup", "c", "# comment"),
            node("setup", "d", "// comment"),
            node("setup", "e", "/* block */"),
            node("setup", "f", "  total = 0  "),
        ];
        let cards = compile("lvl", TemplateId::StandardFlow, &ir);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].key, "f");
        assert_eq!(cards[0].text, "total = 0");
        assert_eq!(cards[0].id, "lvl-c1");
    }

    #[test]
    fn test_compile_maps_canonical_roles() {
        let ir = vec![
            node("setup", "a", "seen = set()"),
            node("check", "b", "if x in seen:"),
            node("window-check", "c", "best = max(best, size)"),
        ];
        let cards = compile("q", TemplateId::SlidingWindow, &ir);
        let slots: Vec<&str> = cards.iter().map(|c| c.correct_slot.as_str()).collect();
        assert_eq!(slots, vec!["bootstrap", "window-check", "window-check"]);
        assert_eq!(cards[2].correct_order, 1);
        assert_eq!(cards[1].hint, "Window Check");
    }

    #[test]
    fn test_slot_limits_and_signature() {
        let ir = vec![
            node("setup", "a", "x = 0"),
            node("setup", "b", "y = 0"),
            node("return", "r", "return x"),
        ];
        let cards = compile("q", TemplateId::StandardFlow, &ir);
        let limits = slot_limits(&cards);
        assert_eq!(limits.get("setup"), Some(&2));
        assert_eq!(limits.get("return"), Some(&1));
        assert_eq!(
            expected_signature(TemplateId::StandardFlow, &cards),
            "setup:a>b|loop:|update:|check:|return:r"
        );
    }

    #[test]
    fn test_title_case_slot() {
        assert_eq!(title_case_slot("push-pop"), "Push Pop");
        assert_eq!(title_case_slot("setup"), "Setup");
        assert_eq!(title_case_slot(""), "");
    }
}
