//! Strategies: pluggable providers of verifiable solution plans.
//!
//! A strategy is either problem-specific (one exact problem with authored IR
//! and a real reference solution) or a wave template (a development
//! placeholder covering a whole wave with a structural probe). The registry
//! keeps them in one ordered list, specific before generic, and selection is
//! a first-match scan over that list.

pub mod input;
pub mod problem;
pub mod structures;
pub mod wave_template;

pub use problem::{ProblemSpec, ProblemStrategy};
pub use wave_template::WaveTemplateStrategy;

use crate::comparators::Normalizer;
use crate::contract::{Contract, TestCase};
use crate::error::{BlueprintError, BlueprintResult, SolveResult};
use crate::ir::IrNode;
use crate::problem::Problem;
use crate::rng::VerifierRng;
use crate::taxonomy::Wave;
use crate::template::TemplateId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Reference solution or oracle over a JSON case input
pub type SolveFn = fn(&Value) -> SolveResult<Value>;

/// Generates one random case input from the shared verifier generator
pub type CaseFactory = fn(&mut VerifierRng) -> Value;

/// Custom case check: `(input, got, expected) -> matched`
pub type CaseCheck = fn(&Value, &Value, &Value) -> bool;

/// A reference solution paired with the text of its own body. The
/// disallowed-substring scan reads this text, so a constraint binds the code
/// that actually runs and not only the card listing.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceSolution {
    pub solve: SolveFn,
    pub source: &'static str,
}

/// Defines a [`ReferenceSolution`] constant from a closure-like body.
///
/// ```ignore
/// reference_solution!(SOLVE_DOUBLE, |input| {
///     Ok(json!(input.int("n")? * 2))
/// });
/// ```
macro_rules! reference_solution {
    ($(#[$meta:meta])* $name:ident, |$input:ident| $body:block) => {
        $(#[$meta])*
        const $name: $crate::strategy::ReferenceSolution = $crate::strategy::ReferenceSolution {
            solve: {
                fn solve(
                    $input: &::serde_json::Value,
                ) -> $crate::error::SolveResult<::serde_json::Value> $body
                solve
            },
            source: stringify!($body),
        };
    };
}
pub(crate) use reference_solution;

/// Everything the verifier needs to judge one strategy on one contract,
/// plus the IR the cards are compiled from.
#[derive(Debug, Clone)]
pub struct Plan {
    pub template_id: TemplateId,
    pub snippet_name: String,
    pub ir: Vec<IrNode>,
    pub solve: Option<SolveFn>,
    /// Card listing plus the solve body's text, scanned for disallowed
    /// substrings
    pub source: String,
    pub deterministic_cases: Vec<TestCase>,
    pub random_trials: u32,
    pub random_case_factory: Option<CaseFactory>,
    pub random_oracle: Option<SolveFn>,
    pub normalize_result: Option<Normalizer>,
    pub assert_case: Option<CaseCheck>,
}

impl Plan {
    /// Listing built from the IR text, one step per line
    pub fn listing(ir: &[IrNode]) -> String {
        ir.iter()
            .map(|node| node.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    ProblemSpecific,
    WaveTemplate,
}

#[derive(Debug, Clone)]
pub enum Strategy {
    ProblemSpecific(ProblemStrategy),
    WaveTemplate(WaveTemplateStrategy),
}

impl Strategy {
    pub fn id(&self) -> &str {
        match self {
            Strategy::ProblemSpecific(s) => s.id,
            Strategy::WaveTemplate(s) => s.id(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Strategy::ProblemSpecific(s) => s.snippet_name.to_string(),
            Strategy::WaveTemplate(s) => s.name(),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::ProblemSpecific(_) => StrategyKind::ProblemSpecific,
            Strategy::WaveTemplate(_) => StrategyKind::WaveTemplate,
        }
    }

    pub fn applies_to(&self, contract: &Contract) -> bool {
        match self {
            Strategy::ProblemSpecific(s) => s.applies_to(contract),
            Strategy::WaveTemplate(s) => s.applies_to(contract),
        }
    }

    pub fn build_plan(&self, contract: &Contract, problem: &Problem) -> Plan {
        match self {
            Strategy::ProblemSpecific(s) => s.build_plan(contract),
            Strategy::WaveTemplate(s) => s.build_plan(contract, problem),
        }
    }
}

/// Ordered strategy list with first-match selection
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    /// Build the ordered list: every problem-specific strategy first, in the
    /// given order, then the wave templates. Ids must be unique.
    pub fn new(
        specific: impl IntoIterator<Item = ProblemStrategy>,
        generic: impl IntoIterator<Item = WaveTemplateStrategy>,
    ) -> BlueprintResult<Self> {
        let strategies: Vec<Strategy> = specific
            .into_iter()
            .map(Strategy::ProblemSpecific)
            .chain(generic.into_iter().map(Strategy::WaveTemplate))
            .collect();

        let mut seen = HashSet::new();
        for strategy in &strategies {
            if !seen.insert(strategy.id().to_string()) {
                return Err(BlueprintError::DuplicateStrategy(strategy.id().to_string()));
            }
        }
        Ok(Self { strategies })
    }

    /// Registry holding only the six wave templates
    pub fn wave_templates_only() -> Self {
        Self {
            strategies: WaveTemplateStrategy::all()
                .into_iter()
                .map(Strategy::WaveTemplate)
                .collect(),
        }
    }

    /// First strategy in list order that claims `contract`
    pub fn select(&self, contract: &Contract) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.applies_to(contract))
    }

    pub fn get(&self, id: &str) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn count_kind(&self, kind: StrategyKind) -> usize {
        self.strategies.iter().filter(|s| s.kind() == kind).count()
    }

    /// Wave templates currently registered, in list order
    pub fn template_waves(&self) -> Vec<Wave> {
        self.strategies
            .iter()
            .filter_map(|s| match s {
                Strategy::WaveTemplate(t) => Some(t.wave),
                Strategy::ProblemSpecific(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Complexity, Constraints};
    use crate::ir::Op;
    use crate::problem::Difficulty;
    use serde_json::json;

    fn echo(input: &Value) -> SolveResult<Value> {
        Ok(input.clone())
    }

    reference_solution!(ECHO, |input| { Ok(input.clone()) });

    fn factory(rng: &mut VerifierRng) -> Value {
        json!(rng.int(0, 9))
    }

    fn specific(id: &'static str, problem_id: u32) -> ProblemStrategy {
        ProblemStrategy {
            id,
            snippet_name: "Echo",
            problem_id,
            template_id: TemplateId::StandardFlow,
            ir: vec![IrNode::new("return", "ret", "return x", Op::Return)],
            solve: ECHO,
            oracle: echo,
            factory,
            normalize: None,
            assert_case: None,
        }
    }

    fn contract(hint: Option<&str>) -> Contract {
        Contract {
            id: "c".to_string(),
            problem_id: 7,
            strategy_hint: hint.map(str::to_string),
            complexity: Complexity::default(),
            deterministic_cases: vec![],
            random_trials: 0,
            constraints: Constraints::default(),
        }
    }

    #[test]
    fn test_specific_before_generic() {
        let registry =
            StrategyRegistry::new(vec![specific("echo", 7)], WaveTemplateStrategy::all()).unwrap();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.iter().next().map(Strategy::kind), Some(StrategyKind::ProblemSpecific));
        assert_eq!(registry.count_kind(StrategyKind::WaveTemplate), 6);

        let chosen = registry.select(&contract(Some("echo"))).unwrap();
        assert_eq!(chosen.id(), "echo");

        let chosen = registry.select(&contract(Some("wave-3-template-family"))).unwrap();
        assert_eq!(chosen.kind(), StrategyKind::WaveTemplate);

        assert!(registry.select(&contract(None)).is_none());
        assert!(registry.select(&contract(Some("nope"))).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = StrategyRegistry::new(vec![specific("echo", 1), specific("echo", 2)], vec![]);
        assert!(matches!(result, Err(BlueprintError::DuplicateStrategy(id)) if id == "echo"));
    }

    #[test]
    fn test_build_plan_carries_contract_cases() {
        let strategy = Strategy::ProblemSpecific(specific("echo", 7));
        let mut c = contract(Some("echo"));
        c.random_trials = 12;
        c.deterministic_cases = vec![TestCase::new(json!(1), json!(1))];
        let problem = Problem::new(7, "Echo", "Hash Map", Difficulty::Easy, "");
        let plan = strategy.build_plan(&c, &problem);
        assert_eq!(plan.random_trials, 12);
        assert_eq!(plan.deterministic_cases.len(), 1);
        assert!(plan.source.starts_with("return x\n"));
        assert!(plan.source.contains("clone"));
        assert!(plan.solve.is_some());
    }

    #[test]
    fn test_wave_templates_only() {
        let registry = StrategyRegistry::wave_templates_only();
        assert_eq!(registry.template_waves(), Wave::ALL.to_vec());
    }
}
