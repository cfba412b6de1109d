//! Semantic verifier: the gate a plan must pass before its cards ship.
//!
//! A run replays every deterministic case, then draws `random_trials` inputs
//! from one seeded generator shared across the whole run and compares the
//! plan's solve against its oracle. Errors raised by either side are recorded
//! per case; the run always completes and always returns a result.

use crate::comparators::compare_by_output_mode;
use crate::contract::Contract;
use crate::rng::{VerifierRng, DEFAULT_VERIFIER_SEED};
use crate::strategy::Plan;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Cases needed for medium confidence
pub const MEDIUM_CONFIDENCE_CASES: usize = 40;
/// Cases needed for high confidence
pub const HIGH_CONFIDENCE_CASES: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierConfig {
    pub seed: u64,
    /// Failures kept in the result; the count is never truncated
    pub max_failures: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_VERIFIER_SEED,
            max_failures: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_totals(total: usize, failed: usize) -> Self {
        if total == 0 || failed > 0 {
            Confidence::Low
        } else if total >= HIGH_CONFIDENCE_CASES {
            Confidence::High
        } else if total >= MEDIUM_CONFIDENCE_CASES {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidPlan,
    ConstraintViolation,
    DeterministicException,
    DeterministicMismatch,
    RandomConfigMissing,
    RandomOracleException,
    RandomException,
    RandomMismatch,
}

/// One recorded failure with whatever context its kind carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub got: Option<Value>,
}

impl Failure {
    fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            message: None,
            token: None,
            index: None,
            input: None,
            expected: None,
            got: None,
        }
    }

    fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn input(mut self, input: &Value) -> Self {
        self.input = Some(input.clone());
        self
    }

    fn index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    fn outputs(mut self, expected: Value, got: Value) -> Self {
        self.expected = Some(expected);
        self.got = Some(got);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseTally {
    pub passed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub passed: bool,
    pub confidence: Confidence,
    pub deterministic: CaseTally,
    pub random: CaseTally,
    pub total: usize,
    pub failed_count: usize,
    pub failures: Vec<Failure>,
}

impl VerificationResult {
    /// Result for a problem that never reached the verifier
    pub fn not_run() -> Self {
        Self {
            passed: false,
            confidence: Confidence::Low,
            deterministic: CaseTally::default(),
            random: CaseTally::default(),
            total: 0,
            failed_count: 0,
            failures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: VerifierConfig,
}

impl Verifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn verify(&self, contract: &Contract, plan: &Plan) -> VerificationResult {
        let det_total = plan.deterministic_cases.len();
        let rnd_total = plan.random_trials as usize;

        let Some(solve) = plan.solve else {
            return VerificationResult {
                passed: false,
                confidence: Confidence::Low,
                deterministic: CaseTally {
                    passed: 0,
                    total: det_total,
                },
                random: CaseTally {
                    passed: 0,
                    total: rnd_total,
                },
                total: det_total + rnd_total,
                failed_count: 1,
                failures: vec![Failure::new(FailureKind::InvalidPlan)
                    .message("solve function is required")],
            };
        };

        let mode = contract.constraints.output_mode;
        let agrees = |input: &Value, got: &Value, expected: &Value| match plan.assert_case {
            Some(check) => check(input, got, expected),
            None => compare_by_output_mode(mode, input, got, expected, plan.normalize_result),
        };

        let mut failures = Vec::new();

        for token in &contract.constraints.disallowed_substrings {
            if !token.is_empty() && plan.source.contains(token.as_str()) {
                let mut failure = Failure::new(FailureKind::ConstraintViolation);
                failure.token = Some(token.clone());
                failures.push(failure);
            }
        }

        let mut det_passed = 0;
        for case in &plan.deterministic_cases {
            match solve(&case.input) {
                Err(e) => failures.push(
                    Failure::new(FailureKind::DeterministicException)
                        .input(&case.input)
                        .message(e.to_string()),
                ),
                Ok(got) if agrees(&case.input, &got, &case.expected) => det_passed += 1,
                Ok(got) => failures.push(
                    Failure::new(FailureKind::DeterministicMismatch)
                        .input(&case.input)
                        .outputs(case.expected.clone(), got),
                ),
            }
        }

        let mut rnd_passed = 0;
        if rnd_total > 0 {
            match (plan.random_case_factory, plan.random_oracle) {
                (Some(factory), Some(oracle)) => {
                    let mut rng = VerifierRng::with_seed(self.config.seed);
                    for index in 0..rnd_total {
                        let input = factory(&mut rng);
                        let expected = match oracle(&input) {
                            Ok(v) => v,
                            Err(e) => {
                                failures.push(
                                    Failure::new(FailureKind::RandomOracleException)
                                        .input(&input)
                                        .index(index)
                                        .message(e.to_string()),
                                );
                                continue;
                            }
                        };
                        match solve(&input) {
                            Err(e) => failures.push(
                                Failure::new(FailureKind::RandomException)
                                    .input(&input)
                                    .index(index)
                                    .message(e.to_string()),
                            ),
                            Ok(got) if agrees(&input, &got, &expected) => rnd_passed += 1,
                            Ok(got) => failures.push(
                                Failure::new(FailureKind::RandomMismatch)
                                    .input(&input)
                                    .index(index)
                                    .outputs(expected, got),
                            ),
                        }
                    }
                }
                (factory, oracle) => failures.push(
                    Failure::new(FailureKind::RandomConfigMissing).message(format!(
                        "has_factory={} has_oracle={}",
                        factory.is_some(),
                        oracle.is_some()
                    )),
                ),
            }
        }

        let total = det_total + rnd_total;
        let failed_count = failures.len();
        let passed = failed_count == 0 && det_passed == det_total && rnd_passed == rnd_total;
        failures.truncate(self.config.max_failures);

        debug!(
            contract = %contract.id,
            passed,
            total,
            failed_count,
            "verified plan"
        );

        VerificationResult {
            passed,
            confidence: Confidence::from_totals(total, failed_count),
            deterministic: CaseTally {
                passed: det_passed,
                total: det_total,
            },
            random: CaseTally {
                passed: rnd_passed,
                total: rnd_total,
            },
            total,
            failed_count,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparators::OutputMode;
    use crate::contract::{Complexity, Constraints, TestCase};
    use crate::error::{SolveError, SolveResult};
    use crate::template::TemplateId;
    use serde_json::json;

    fn double(input: &Value) -> SolveResult<Value> {
        let n = input.as_i64().ok_or(SolveError::Evaluation("not a number".into()))?;
        Ok(json!(n * 2))
    }

    fn double_wrong_for_thirds(input: &Value) -> SolveResult<Value> {
        let n = input.as_i64().unwrap_or(0);
        Ok(json!(if n % 3 == 0 { -1 } else { n * 2 }))
    }

    fn failing_oracle(_: &Value) -> SolveResult<Value> {
        Err(SolveError::Evaluation("oracle down".into()))
    }

    fn small_int(rng: &mut VerifierRng) -> Value {
        json!(rng.int(0, 20))
    }

    fn contract(trials: u32, cases: Vec<TestCase>) -> Contract {
        Contract {
            id: "double".into(),
            problem_id: 1,
            strategy_hint: Some("double".into()),
            complexity: Complexity::default(),
            deterministic_cases: cases,
            random_trials: trials,
            constraints: Constraints {
                output_mode: Some(OutputMode::Normalized),
                disallowed_substrings: vec![],
            },
        }
    }

    fn plan(contract: &Contract, solve: Option<crate::strategy::SolveFn>) -> Plan {
        Plan {
            template_id: TemplateId::StandardFlow,
            snippet_name: "double".into(),
            ir: vec![],
            solve,
            source: "return n * 2".into(),
            deterministic_cases: contract.deterministic_cases.clone(),
            random_trials: contract.random_trials,
            random_case_factory: Some(small_int),
            random_oracle: Some(double),
            normalize_result: None,
            assert_case: None,
        }
    }

    fn cases() -> Vec<TestCase> {
        vec![
            TestCase::new(json!(1), json!(2)),
            TestCase::new(json!(4), json!(8)),
        ]
    }

    #[test]
    fn test_passing_plan_high_confidence() {
        let c = contract(120, cases());
        let result = Verifier::default().verify(&c, &plan(&c, Some(double)));
        assert!(result.passed);
        assert_eq!(result.total, 122);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.deterministic, CaseTally { passed: 2, total: 2 });
        assert_eq!(result.random, CaseTally { passed: 120, total: 120 });
    }

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(Confidence::from_totals(0, 0), Confidence::Low);
        assert_eq!(Confidence::from_totals(39, 0), Confidence::Low);
        assert_eq!(Confidence::from_totals(40, 0), Confidence::Medium);
        assert_eq!(Confidence::from_totals(119, 0), Confidence::Medium);
        assert_eq!(Confidence::from_totals(120, 0), Confidence::High);
        assert_eq!(Confidence::from_totals(500, 1), Confidence::Low);
    }

    #[test]
    fn test_missing_solve_is_invalid_plan() {
        let c = contract(10, cases());
        let result = Verifier::default().verify(&c, &plan(&c, None));
        assert!(!result.passed);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.failures[0].kind, FailureKind::InvalidPlan);
        assert_eq!(result.total, 12);
    }

    #[test]
    fn test_constraint_violation_does_not_stop_evaluation() {
        let mut c = contract(0, cases());
        c.constraints.disallowed_substrings = vec!["*".into(), "sort(".into()];
        let result = Verifier::default().verify(&c, &plan(&c, Some(double)));
        assert!(!result.passed);
        assert_eq!(result.deterministic.passed, 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].kind, FailureKind::ConstraintViolation);
        assert_eq!(result.failures[0].token.as_deref(), Some("*"));
    }

    #[test]
    fn test_deterministic_errors_are_per_case() {
        let c = contract(
            0,
            vec![
                TestCase::new(json!("x"), json!(0)),
                TestCase::new(json!(3), json!(7)),
                TestCase::new(json!(3), json!(6)),
            ],
        );
        let result = Verifier::default().verify(&c, &plan(&c, Some(double)));
        let kinds: Vec<FailureKind> = result.failures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FailureKind::DeterministicException, FailureKind::DeterministicMismatch]
        );
        assert_eq!(result.deterministic.passed, 1);
    }

    #[test]
    fn test_random_config_missing() {
        let c = contract(5, cases());
        let mut p = plan(&c, Some(double));
        p.random_oracle = None;
        let result = Verifier::default().verify(&c, &p);
        assert!(!result.passed);
        assert_eq!(result.failures[0].kind, FailureKind::RandomConfigMissing);
    }

    #[test]
    fn test_oracle_exceptions_recorded() {
        let c = contract(3, vec![]);
        let mut p = plan(&c, Some(double));
        p.random_oracle = Some(failing_oracle);
        let result = Verifier::default().verify(&c, &p);
        assert_eq!(result.failed_count, 3);
        assert!(result
            .failures
            .iter()
            .all(|f| f.kind == FailureKind::RandomOracleException));
        assert_eq!(result.failures[2].index, Some(2));
    }

    #[test]
    fn test_failures_capped_but_counted() {
        let c = contract(200, vec![]);
        let result = Verifier::default().verify(&c, &plan(&c, Some(double_wrong_for_thirds)));
        assert!(!result.passed);
        assert!(result.failed_count > 8);
        assert_eq!(result.failures.len(), 8);
        assert!(result.failures.iter().all(|f| f.kind == FailureKind::RandomMismatch));
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn test_same_seed_reproduces() {
        let c = contract(150, vec![]);
        let verifier = Verifier::new(VerifierConfig {
            seed: 99,
            max_failures: 8,
        });
        let a = verifier.verify(&c, &plan(&c, Some(double_wrong_for_thirds)));
        let b = verifier.verify(&c, &plan(&c, Some(double_wrong_for_thirds)));
        assert_eq!(a, b);
    }

    crate::strategy::reference_solution!(SORTED_COPY, |input| {
        let mut values: Vec<i64> = input
            .as_array()
            .map(|items| items.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default();
        values.sort_unstable();
        Ok(json!(values))
    });

    fn ascending(input: &Value) -> SolveResult<Value> {
        let values: std::collections::BTreeSet<i64> = input
            .as_array()
            .map(|items| items.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default();
        Ok(json!(values.into_iter().collect::<Vec<_>>()))
    }

    fn distinct_ints(rng: &mut VerifierRng) -> Value {
        let mut seen = std::collections::BTreeSet::new();
        while seen.len() < 5 {
            seen.insert(rng.int(-30, 30));
        }
        let mut values: Vec<i64> = seen.into_iter().collect();
        rng.shuffle(&mut values);
        json!(values)
    }

    #[test]
    fn test_disallowed_token_in_solve_body_is_caught() {
        use crate::ir::{IrNode, Op};
        use crate::strategy::ProblemStrategy;

        let strategy = ProblemStrategy {
            id: "counting-order",
            snippet_name: "Counting Order",
            problem_id: 1,
            template_id: TemplateId::ArrayHashing,
            ir: vec![
                IrNode::new("setup", "count", "buckets = counting pass", Op::Declare),
                IrNode::new("return", "ret", "return buckets", Op::Return),
            ],
            solve: SORTED_COPY,
            oracle: ascending,
            factory: distinct_ints,
            normalize: None,
            assert_case: None,
        };
        let mut c = contract(20, vec![TestCase::new(json!([3, 1, 2]), json!([1, 2, 3]))]);
        c.constraints.disallowed_substrings = vec!["sort".into()];

        let plan = strategy.build_plan(&c);
        assert!(!Plan::listing(&plan.ir).contains("sort"));
        assert!(plan.source.contains("sort_unstable"));

        let result = Verifier::default().verify(&c, &plan);
        assert!(!result.passed);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.failures[0].kind, FailureKind::ConstraintViolation);
        assert_eq!(result.failures[0].token.as_deref(), Some("sort"));
        assert_eq!(result.deterministic, CaseTally { passed: 1, total: 1 });
        assert_eq!(result.random, CaseTally { passed: 20, total: 20 });
    }
}
