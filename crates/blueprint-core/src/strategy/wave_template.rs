//! Wave-template strategies.
//!
//! One per wave. They only verify a synthetic structural probe (sum of two
//! integers, mirrored alphanumerics of a string), never the target algorithm,
//! and exist to keep generation unblocked until a problem-specific strategy
//! is authored. Coverage reporting counts every use as probe usage.

use super::Plan;
use crate::contract::{probe_output, Contract};
use crate::error::SolveResult;
use crate::ir::{IrNode, Op};
use crate::problem::Problem;
use crate::rng::VerifierRng;
use crate::taxonomy::{profile_for, Wave};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveTemplateStrategy {
    pub wave: Wave,
}

impl WaveTemplateStrategy {
    pub fn new(wave: Wave) -> Self {
        Self { wave }
    }

    pub fn all() -> Vec<Self> {
        Wave::ALL.into_iter().map(Self::new).collect()
    }

    pub fn id(&self) -> &'static str {
        self.wave.template_strategy_id()
    }

    pub fn name(&self) -> String {
        format!("{} template family", self.wave.display_name())
    }

    pub fn applies_to(&self, contract: &Contract) -> bool {
        contract.strategy_hint.as_deref() == Some(self.id())
    }

    pub fn build_plan(&self, contract: &Contract, problem: &Problem) -> Plan {
        let template_id = profile_for(&problem.pattern).template_id;
        let ir: Vec<IrNode> = template_id
            .template()
            .slots
            .iter()
            .map(|slot| {
                let op = if slot.id == "return" || slot.id == "emit" {
                    Op::Return
                } else {
                    Op::Step
                };
                IrNode::new(slot.id, &format!("probe-{}", slot.id), &slot.desc.to_lowercase(), op)
            })
            .collect();

        Plan {
            template_id,
            snippet_name: format!("{} | {} probe", problem.name, self.name()),
            source: Plan::listing(&ir),
            ir,
            solve: Some(solve_probe),
            deterministic_cases: contract.deterministic_cases.clone(),
            random_trials: contract.random_trials,
            random_case_factory: Some(random_probe_case),
            random_oracle: Some(probe_oracle),
            normalize_result: None,
            assert_case: None,
        }
    }
}

fn probe_fields(input: &Value) -> (i64, i64, String) {
    (
        input.get("left").and_then(Value::as_i64).unwrap_or(0),
        input.get("right").and_then(Value::as_i64).unwrap_or(0),
        input
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    )
}

fn solve_probe(input: &Value) -> SolveResult<Value> {
    let (left, right, text) = probe_fields(input);
    Ok(probe_output(left, right, &text))
}

fn probe_oracle(input: &Value) -> SolveResult<Value> {
    let (left, right, text) = probe_fields(input);
    let mut kept: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        if c.is_ascii_alphanumeric() {
            kept.push(c.to_ascii_lowercase());
        }
    }
    Ok(json!({
        "sum": left.saturating_add(right),
        "mirrored": kept.iter().collect::<String>(),
        "length": kept.len(),
    }))
}

fn random_probe_case(rng: &mut VerifierRng) -> Value {
    json!({
        "left": rng.int(-40, 40),
        "right": rng.int(-40, 40),
        "text": rng.word(0, 8),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Contract;
    use crate::problem::Difficulty;
    use crate::template::TemplateId;

    #[test]
    fn test_probe_plan_uses_pattern_template() {
        let problem = Problem::new(500, "Probe", "Backtracking", Difficulty::Medium, "");
        let contract = Contract::synthesize(&problem);
        let strategy = WaveTemplateStrategy::new(Wave::Wave4);
        assert!(strategy.applies_to(&contract));

        let plan = strategy.build_plan(&contract, &problem);
        assert_eq!(plan.template_id, TemplateId::Backtracking);
        assert_eq!(plan.ir.len(), 5);
        assert_eq!(plan.deterministic_cases.len(), 3);
    }

    #[test]
    fn test_probe_solve_and_oracle_agree() {
        let mut rng = VerifierRng::with_seed(3);
        for _ in 0..50 {
            let input = random_probe_case(&mut rng);
            assert_eq!(solve_probe(&input).unwrap(), probe_oracle(&input).unwrap());
        }
    }

    #[test]
    fn test_extreme_operands_agree() {
        let input = json!({"left": i64::MAX, "right": i64::MAX, "text": "Ab-C"});
        let got = solve_probe(&input).unwrap();
        assert_eq!(got, probe_oracle(&input).unwrap());
        assert_eq!(got["sum"], json!(i64::MAX));
        assert_eq!(got["mirrored"], json!("cba"));
    }

    #[test]
    fn test_wave_ids() {
        let ids: Vec<&str> = WaveTemplateStrategy::all().iter().map(|s| s.id()).collect();
        assert_eq!(ids[0], "wave-1-template-family");
        assert_eq!(ids[5], "wave-6-template-family");
    }
}
