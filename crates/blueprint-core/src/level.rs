//! Level records handed to the puzzle UI.

use crate::contract::TestCase;
use crate::ir::{compile, expected_signature, slot_limits, Card, IrNode, Op};
use crate::pipeline::{
    FallbackSolution, GenerationRequest, SolutionPipeline, SolutionSource, SolutionVerification,
};
use crate::problem::{Difficulty, Problem};
use crate::strategy::StrategyKind;
use crate::taxonomy::profile_for;
use crate::template::{TemplateFamily, TemplateId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::info;

const DEFAULT_DESCRIPTION: &str = "Assemble the canonical solution flow.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: String,
    pub problem_id: u32,
    pub template_id: TemplateId,
    pub title: String,
    pub pattern: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub cards: Vec<Card>,
    pub slots: Vec<String>,
    pub slot_limits: BTreeMap<String, usize>,
    /// First case's `expected` is the canonical arrangement signature
    pub test_cases: Vec<TestCase>,
    pub generation_source: SolutionSource,
    pub generation_strategy_id: Option<String>,
    pub generation_strategy_kind: Option<StrategyKind>,
    pub generation_contract_id: String,
    pub snippet_name: String,
    pub verification: SolutionVerification,
}

impl Level {
    pub fn expected_signature(&self) -> Option<&str> {
        self.test_cases.first().and_then(|c| c.expected.as_str())
    }
}

/// First sentence of a description, always ending in a period
pub fn summarize_description(description: &str) -> String {
    let first = description.split(". ").next().unwrap_or_default().trim();
    if first.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else if first.ends_with('.') {
        first.to_string()
    } else {
        format!("{}.", first)
    }
}

fn generic_steps(family: TemplateFamily) -> &'static [(&'static str, &'static str, &'static str)] {
    match family {
        TemplateFamily::Standard => &[
            ("setup", "std-setup-state", "initialize core state"),
            ("setup", "std-setup-best", "initialize best answer"),
            ("loop", "std-loop-iterate", "iterate through candidates"),
            ("update", "std-update-state", "update running state"),
            ("check", "std-check-answer", "check invariant / improve answer"),
            ("return", "std-return-answer", "return the best answer"),
        ],
        TemplateFamily::Backtracking => &[
            ("choose", "bt-choose-options", "generate next choices"),
            ("constrain", "bt-constrain-prune", "prune invalid choices"),
            ("base", "bt-base-record", "if complete solution: record it"),
            ("explore", "bt-explore-recurse", "choose -> recurse -> unchoose"),
            ("return", "bt-return-results", "return collected results"),
        ],
        TemplateFamily::Recursive => &[
            ("base", "rt-base-case", "handle base case / memo hit"),
            ("choose", "rt-choose-branches", "select branches / subproblems"),
            ("constrain", "rt-constrain-prune", "prune invalid branch"),
            ("explore", "rt-explore-recurse", "recurse into next state"),
            ("combine", "rt-combine-results", "combine child results"),
        ],
    }
}

/// Generic cards for a template, used as the fallback when generation fails
/// and fallback is allowed.
pub fn template_fallback(level_id: &str, template_id: TemplateId) -> FallbackSolution {
    let ir: Vec<IrNode> = generic_steps(template_id.family())
        .iter()
        .map(|&(slot, key, text)| IrNode::new(slot, key, text, Op::Step))
        .collect();
    FallbackSolution {
        template_id,
        cards: compile(level_id, template_id, &ir),
        snippet_name: "template fallback".to_string(),
    }
}

/// Generate the level for one problem
pub fn build_level(pipeline: &SolutionPipeline<'_>, problem: &Problem) -> Level {
    let level_id = problem.level_id();
    let fallback_template = profile_for(&problem.pattern).template_id;
    let provider = || template_fallback(&level_id, fallback_template);
    let request = GenerationRequest::new(problem, &level_id).with_fallback(&provider);
    let solution = pipeline.generate_solution(&request);

    let signature = expected_signature(solution.template_id, &solution.cards);
    Level {
        id: level_id.clone(),
        problem_id: problem.id,
        template_id: solution.template_id,
        title: problem.name.clone(),
        pattern: problem.pattern.clone(),
        difficulty: problem.difficulty,
        description: summarize_description(&problem.description),
        slots: solution
            .template_id
            .slot_ids()
            .into_iter()
            .map(str::to_string)
            .collect(),
        slot_limits: slot_limits(&solution.cards),
        test_cases: vec![TestCase::new(json!({}), Value::String(signature))],
        cards: solution.cards,
        generation_source: solution.source,
        generation_strategy_id: solution.strategy_id,
        generation_strategy_kind: solution.strategy_kind,
        generation_contract_id: solution.contract_id,
        snippet_name: solution.snippet_name,
        verification: solution.verification,
    }
}

/// Generate levels for a whole catalog, in catalog order
pub fn build_levels(pipeline: &SolutionPipeline<'_>, problems: &[Problem]) -> Vec<Level> {
    let levels: Vec<Level> = problems.iter().map(|p| build_level(pipeline, p)).collect();
    let from_strategy = levels
        .iter()
        .filter(|l| l.generation_source == SolutionSource::Strategy)
        .count();
    info!(
        levels = levels.len(),
        from_strategy,
        "built catalog levels"
    );
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::contract::ContractRegistry;
    use crate::pipeline::GenerationStatus;
    use crate::strategy::StrategyRegistry;

    #[test]
    fn test_summarize_description() {
        assert_eq!(summarize_description(""), DEFAULT_DESCRIPTION);
        assert_eq!(summarize_description("Find it. Then more."), "Find it.");
        assert_eq!(summarize_description("Only one sentence"), "Only one sentence.");
        assert_eq!(summarize_description("Ends here."), "Ends here.");
    }

    #[test]
    fn test_fallback_cards_fit_every_template() {
        for id in TemplateId::ALL {
            let fallback = template_fallback("lvl", id);
            assert!(!fallback.cards.is_empty(), "{}", id);
            for card in &fallback.cards {
                assert!(id.has_slot(&card.correct_slot), "{} {}", id, card.correct_slot);
            }
        }
    }

    #[test]
    fn test_standard_fallback_shape() {
        let fallback = template_fallback("q-1", TemplateId::ArrayHashing);
        assert_eq!(fallback.cards.len(), 6);
        assert_eq!(fallback.cards[1].correct_slot, "seed");
        assert_eq!(fallback.cards[1].correct_order, 1);
        assert_eq!(fallback.cards[5].text, "return the best answer");
    }

    #[test]
    fn test_failed_level_carries_sentinel_signature() {
        let contracts = ContractRegistry::default();
        let strategies = StrategyRegistry::default();
        let pipeline = SolutionPipeline::new(&contracts, &strategies, PipelineConfig::default());
        let problem = Problem::new(3, "Lost", "Hash Map", Difficulty::Easy, "Lost. Really.");
        let level = build_level(&pipeline, &problem);
        assert_eq!(level.id, "q-3");
        assert_eq!(level.generation_source, SolutionSource::StrategyError);
        assert_eq!(level.verification.status, GenerationStatus::MissingStrategy);
        assert_eq!(level.description, "Lost.");
        assert_eq!(
            level.expected_signature(),
            Some("setup:|loop:|update:|check:|return:strategy-error-missing-strategy")
        );
    }

    #[test]
    fn test_fallback_level_uses_pattern_template() {
        let contracts = ContractRegistry::default();
        let strategies = StrategyRegistry::default();
        let config = PipelineConfig::default().with_fallback(true);
        let pipeline = SolutionPipeline::new(&contracts, &strategies, config);
        let problem = Problem::new(4, "Subsets", "Backtracking", Difficulty::Medium, "");
        let level = build_level(&pipeline, &problem);
        assert_eq!(level.generation_source, SolutionSource::TemplateFallback);
        assert_eq!(level.template_id, TemplateId::Backtracking);
        assert_eq!(level.slot_limits.values().sum::<usize>(), level.cards.len());
    }
}
