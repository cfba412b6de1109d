//! Problem-specific strategies and the catalog entries that define them.

use super::{CaseCheck, CaseFactory, Plan, ReferenceSolution, SolveFn};
use crate::comparators::{Normalizer, OutputMode};
use crate::contract::{Complexity, Constraints, Contract, TestCase};
use crate::ir::{IrNode, Op};
use crate::problem::{Difficulty, Problem};
use crate::template::TemplateId;

/// Strategy bound to one exact problem: authored IR, a reference solution,
/// an independent oracle and a random case factory.
#[derive(Debug, Clone)]
pub struct ProblemStrategy {
    pub id: &'static str,
    pub snippet_name: &'static str,
    pub problem_id: u32,
    pub template_id: TemplateId,
    pub ir: Vec<IrNode>,
    pub solve: ReferenceSolution,
    pub oracle: SolveFn,
    pub factory: CaseFactory,
    pub normalize: Option<Normalizer>,
    pub assert_case: Option<CaseCheck>,
}

impl ProblemStrategy {
    pub fn applies_to(&self, contract: &Contract) -> bool {
        contract.problem_id == self.problem_id && contract.strategy_hint.as_deref() == Some(self.id)
    }

    pub fn build_plan(&self, contract: &Contract) -> Plan {
        Plan {
            template_id: self.template_id,
            snippet_name: self.snippet_name.to_string(),
            ir: self.ir.clone(),
            solve: Some(self.solve.solve),
            source: format!("{}\n{}", Plan::listing(&self.ir), self.solve.source),
            deterministic_cases: contract.deterministic_cases.clone(),
            random_trials: contract.random_trials,
            random_case_factory: Some(self.factory),
            random_oracle: Some(self.oracle),
            normalize_result: self.normalize,
            assert_case: self.assert_case,
        }
    }
}

/// A catalog entry: the problem, its authored contract and its strategy
#[derive(Debug, Clone)]
pub struct ProblemSpec {
    pub problem: Problem,
    pub contract: Contract,
    pub strategy: ProblemStrategy,
}

/// `(slot, key, text, op)`
pub type Step = (&'static str, &'static str, &'static str, Op);

/// Static description of one catalog entry. Cases are supplied separately
/// since they are built from JSON values.
pub struct SpecDef {
    pub problem_id: u32,
    pub name: &'static str,
    pub pattern: &'static str,
    pub difficulty: Difficulty,
    pub description: &'static str,
    pub strategy_id: &'static str,
    pub template_id: TemplateId,
    pub complexity: (&'static str, &'static str),
    pub output_mode: OutputMode,
    pub disallowed: &'static [&'static str],
    pub random_trials: u32,
    pub ir: &'static [Step],
    pub solve: ReferenceSolution,
    pub oracle: SolveFn,
    pub factory: CaseFactory,
    pub normalize: Option<Normalizer>,
    pub assert_case: Option<CaseCheck>,
}

impl SpecDef {
    pub fn with_cases(self, cases: Vec<TestCase>) -> ProblemSpec {
        let problem = Problem::new(
            self.problem_id,
            self.name,
            self.pattern,
            self.difficulty,
            self.description,
        );
        let contract = Contract {
            id: format!("q-{}-contract", self.problem_id),
            problem_id: self.problem_id,
            strategy_hint: Some(self.strategy_id.to_string()),
            complexity: Complexity::new(self.complexity.0, self.complexity.1),
            deterministic_cases: cases,
            random_trials: self.random_trials,
            constraints: Constraints {
                output_mode: Some(self.output_mode),
                disallowed_substrings: self.disallowed.iter().map(|s| s.to_string()).collect(),
            },
        };
        let strategy = ProblemStrategy {
            id: self.strategy_id,
            snippet_name: self.name,
            problem_id: self.problem_id,
            template_id: self.template_id,
            ir: self
                .ir
                .iter()
                .map(|&(slot, key, text, op)| IrNode::new(slot, key, text, op))
                .collect(),
            solve: self.solve,
            oracle: self.oracle,
            factory: self.factory,
            normalize: self.normalize,
            assert_case: self.assert_case,
        };
        ProblemSpec {
            problem,
            contract,
            strategy,
        }
    }
}

/// Shorthand for a deterministic case
pub fn case(input: serde_json::Value, expected: serde_json::Value) -> TestCase {
    TestCase::new(input, expected)
}
