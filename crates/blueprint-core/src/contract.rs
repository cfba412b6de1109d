//! Contracts: what a correct solution to each problem must do.
//!
//! A contract bundles deterministic cases, a random-trial count, the output
//! comparator and forbidden-construct constraints. Authored contracts come
//! from the problem catalog; every other problem gets a synthesized default
//! built from its taxonomy profile and generic structural probes.

use crate::comparators::OutputMode;
use crate::error::{BlueprintError, BlueprintResult};
use crate::problem::Problem;
use crate::taxonomy::profile_for;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

/// One deterministic case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Value,
    pub expected: Value,
}

impl TestCase {
    pub fn new(input: Value, expected: Value) -> Self {
        Self { input, expected }
    }

    /// True for the synthetic `{left, right, text}` probe input
    pub fn is_probe(&self) -> bool {
        is_probe_input(&self.input)
    }
}

/// Target complexity, informational only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    pub time: String,
    pub space: String,
}

impl Default for Complexity {
    fn default() -> Self {
        Self {
            time: "pattern-dependent".to_string(),
            space: "pattern-dependent".to_string(),
        }
    }
}

impl Complexity {
    pub fn new(time: &str, space: &str) -> Self {
        Self {
            time: time.to_string(),
            space: space.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Comparator for this contract's cases. Absent means structural equality,
    /// which production contracts are not allowed to rely on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_mode: Option<OutputMode>,
    /// Substrings the solution's source listing must not contain
    #[serde(default, alias = "disallowTokens")]
    pub disallowed_substrings: Vec<String>,
}

/// Testable requirements for one problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    pub problem_id: u32,
    #[serde(default)]
    pub strategy_hint: Option<String>,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub deterministic_cases: Vec<TestCase>,
    #[serde(default)]
    pub random_trials: u32,
    #[serde(default)]
    pub constraints: Constraints,
}

/// True when `input` is exactly the `{left, right, text}` structural probe
pub fn is_probe_input(input: &Value) -> bool {
    match input.as_object() {
        Some(map) => {
            map.len() == 3
                && map.contains_key("left")
                && map.contains_key("right")
                && map.contains_key("text")
        }
        None => false,
    }
}

/// Expected output of the structural probe for a given input
pub fn probe_output(left: i64, right: i64, text: &str) -> Value {
    let chars: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    json!({
        "sum": left.saturating_add(right),
        "mirrored": chars.chars().rev().collect::<String>(),
        "length": chars.len(),
    })
}

fn probe_case(left: i64, right: i64, text: &str) -> TestCase {
    TestCase::new(
        json!({"left": left, "right": right, "text": text}),
        probe_output(left, right, text),
    )
}

/// Random trials given to synthesized contracts
pub const SYNTHESIZED_RANDOM_TRIALS: u32 = 40;

/// Validate a raw contract document. Returns every violation found; an empty
/// list means the document is well-formed.
pub fn validate_contract_schema(contract: &Value) -> Vec<String> {
    let Some(obj) = contract.as_object() else {
        return vec!["contract must be an object".to_string()];
    };
    let mut errors = Vec::new();

    match obj.get("id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => {}
        _ => errors.push("id must be a non-empty string".to_string()),
    }
    match obj.get("problemId").and_then(Value::as_u64) {
        Some(id) if id > 0 && id <= u32::MAX as u64 => {}
        _ => errors.push("problemId must be a positive integer".to_string()),
    }
    match obj.get("strategyHint") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => errors.push("strategyHint must be string or null".to_string()),
    }
    if !obj.get("deterministicCases").is_some_and(Value::is_array) {
        errors.push("deterministicCases must be an array".to_string());
    }
    match obj.get("randomTrials").and_then(Value::as_u64) {
        Some(n) if n <= u32::MAX as u64 => {}
        _ => errors.push("randomTrials must be a non-negative integer".to_string()),
    }
    if !obj.get("constraints").is_some_and(Value::is_object) {
        errors.push("constraints must be an object".to_string());
    }

    errors
}

impl Contract {
    /// Validate and deserialize an authored contract document
    pub fn from_value(value: Value) -> BlueprintResult<Self> {
        let errors = validate_contract_schema(&value);
        if !errors.is_empty() {
            return Err(BlueprintError::InvalidContract(errors));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Default contract for a problem with no authored one. Known patterns
    /// are routed to their wave's template family; unknown patterns get no
    /// strategy hint at all.
    pub fn synthesize(problem: &Problem) -> Self {
        let profile = profile_for(&problem.pattern);
        Self {
            id: format!("generic-contract-q-{}", problem.id),
            problem_id: problem.id,
            strategy_hint: profile
                .matched
                .then(|| profile.strategy_family_id.to_string()),
            complexity: Complexity::default(),
            deterministic_cases: vec![
                probe_case(2, 3, "Level"),
                probe_case(-7, 4, "A man, a plan"),
                probe_case(0, 0, ""),
            ],
            random_trials: SYNTHESIZED_RANDOM_TRIALS,
            constraints: Constraints {
                output_mode: Some(OutputMode::Normalized),
                disallowed_substrings: Vec::new(),
            },
        }
    }

    /// True when every deterministic case is a generic structural probe
    pub fn is_placeholder(&self) -> bool {
        !self.deterministic_cases.is_empty() && self.deterministic_cases.iter().all(TestCase::is_probe)
    }

    /// Extra checks a contract must pass before its problem can ship
    pub fn production_violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.deterministic_cases.is_empty() {
            errors.push("production contracts require deterministic cases".to_string());
        }
        if self.random_trials == 0 {
            errors.push("production contracts require positive randomTrials".to_string());
        }
        if self.deterministic_cases.iter().any(TestCase::is_probe) {
            errors.push("production contracts may not use probe placeholder inputs".to_string());
        }
        if self.constraints.output_mode.is_none() {
            errors.push("production contracts must declare an outputMode".to_string());
        }
        errors
    }
}

/// Which catalog problems have an authored contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCoverage {
    pub total_problems: usize,
    pub covered_problems: usize,
    pub missing_problem_ids: Vec<u32>,
}

/// Contracts keyed by problem id
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    authored: BTreeMap<u32, Contract>,
}

impl ContractRegistry {
    /// Build a registry from authored contracts. Two contracts for the same
    /// problem are rejected.
    pub fn new(authored: impl IntoIterator<Item = Contract>) -> BlueprintResult<Self> {
        let mut map = BTreeMap::new();
        for contract in authored {
            let problem_id = contract.problem_id;
            if map.insert(problem_id, contract).is_some() {
                return Err(BlueprintError::DuplicateContract(problem_id));
            }
        }
        Ok(Self { authored: map })
    }

    /// Authored contract for `problem`, or a synthesized default
    pub fn resolve(&self, problem: &Problem) -> Cow<'_, Contract> {
        match self.authored.get(&problem.id) {
            Some(contract) => Cow::Borrowed(contract),
            None => Cow::Owned(Contract::synthesize(problem)),
        }
    }

    pub fn get(&self, problem_id: u32) -> Option<&Contract> {
        self.authored.get(&problem_id)
    }

    pub fn len(&self) -> usize {
        self.authored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authored.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contract> {
        self.authored.values()
    }

    pub fn coverage_summary(&self, problems: &[Problem]) -> ContractCoverage {
        let ids: BTreeSet<u32> = problems.iter().map(|p| p.id).collect();
        let missing: Vec<u32> = ids
            .iter()
            .copied()
            .filter(|id| !self.authored.contains_key(id))
            .collect();
        ContractCoverage {
            total_problems: ids.len(),
            covered_problems: ids.len() - missing.len(),
            missing_problem_ids: missing,
        }
    }

    /// Production-check violations for every catalog problem, keyed by id
    pub fn production_violations(&self, problems: &[Problem]) -> BTreeMap<u32, Vec<String>> {
        problems
            .iter()
            .filter_map(|problem| {
                let errors = self.resolve(problem).production_violations();
                (!errors.is_empty()).then_some((problem.id, errors))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Difficulty;

    fn valid_doc() -> Value {
        json!({
            "id": "q-1-contract",
            "problemId": 1,
            "strategyHint": "two-sum",
            "deterministicCases": [{"input": {"nums": [1, 2], "target": 3}, "expected": [0, 1]}],
            "randomTrials": 120,
            "constraints": {"outputMode": "unordered-number-members", "disallowTokens": ["sort("]}
        })
    }

    #[test]
    fn test_schema_accepts_valid_contract() {
        assert!(validate_contract_schema(&valid_doc()).is_empty());
        let contract = Contract::from_value(valid_doc()).unwrap();
        assert_eq!(contract.problem_id, 1);
        assert_eq!(contract.constraints.disallowed_substrings, vec!["sort(".to_string()]);
        assert_eq!(
            contract.constraints.output_mode,
            Some(OutputMode::UnorderedNumberMembers)
        );
    }

    #[test]
    fn test_schema_reports_every_violation() {
        let doc = json!({
            "id": "",
            "problemId": 0,
            "strategyHint": 5,
            "deterministicCases": {},
            "randomTrials": -1,
            "constraints": []
        });
        let errors = validate_contract_schema(&doc);
        assert_eq!(
            errors,
            vec![
                "id must be a non-empty string",
                "problemId must be a positive integer",
                "strategyHint must be string or null",
                "deterministicCases must be an array",
                "randomTrials must be a non-negative integer",
                "constraints must be an object",
            ]
        );
        assert!(matches!(
            Contract::from_value(doc),
            Err(BlueprintError::InvalidContract(v)) if v.len() == 6
        ));
    }

    #[test]
    fn test_schema_rejects_non_object() {
        assert_eq!(validate_contract_schema(&json!([1])), vec!["contract must be an object"]);
    }

    #[test]
    fn test_null_strategy_hint_is_valid() {
        let mut doc = valid_doc();
        doc["strategyHint"] = Value::Null;
        assert!(validate_contract_schema(&doc).is_empty());
    }

    #[test]
    fn test_synthesized_contract_is_placeholder() {
        let problem = Problem::new(900, "Mystery", "Hash Map", Difficulty::Easy, "");
        let contract = Contract::synthesize(&problem);
        assert!(contract.is_placeholder());
        assert_eq!(contract.strategy_hint.as_deref(), Some("wave-1-template-family"));
        let errors = contract.production_violations();
        assert!(errors.contains(&"production contracts may not use probe placeholder inputs".to_string()));

        let unknown = Problem::new(901, "Mystery", "Quantum Annealing", Difficulty::Easy, "");
        assert_eq!(Contract::synthesize(&unknown).strategy_hint, None);
    }

    #[test]
    fn test_production_violations_for_missing_output_mode() {
        let mut contract = Contract::from_value(valid_doc()).unwrap();
        assert!(contract.production_violations().is_empty());
        contract.constraints.output_mode = None;
        contract.random_trials = 0;
        assert_eq!(contract.production_violations().len(), 2);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let a = Contract::from_value(valid_doc()).unwrap();
        let b = a.clone();
        assert!(matches!(
            ContractRegistry::new(vec![a, b]),
            Err(BlueprintError::DuplicateContract(1))
        ));
    }

    #[test]
    fn test_registry_resolve_and_coverage() {
        let registry = ContractRegistry::new(vec![Contract::from_value(valid_doc()).unwrap()]).unwrap();
        let covered = Problem::new(1, "Two Sum", "Hash Map", Difficulty::Easy, "");
        let missing = Problem::new(2, "Other", "Stack", Difficulty::Easy, "");
        assert!(matches!(registry.resolve(&covered), Cow::Borrowed(_)));
        assert!(matches!(registry.resolve(&missing), Cow::Owned(_)));

        let summary = registry.coverage_summary(&[covered.clone(), missing.clone()]);
        assert_eq!(summary.total_problems, 2);
        assert_eq!(summary.covered_problems, 1);
        assert_eq!(summary.missing_problem_ids, vec![2]);

        let violations = registry.production_violations(&[covered, missing]);
        assert!(!violations.contains_key(&1));
        assert!(violations.contains_key(&2));
    }

    #[test]
    fn test_probe_output() {
        assert_eq!(
            probe_output(2, 3, "Level!"),
            json!({"sum": 5, "mirrored": "level", "length": 5})
        );
    }

    #[test]
    fn test_structural_sum_saturates() {
        assert_eq!(probe_output(i64::MAX, 1, "")["sum"], json!(i64::MAX));
        assert_eq!(probe_output(i64::MIN, -1, "")["sum"], json!(i64::MIN));
    }

    #[test]
    fn test_constraints_serialize_without_absent_mode() {
        let constraints = Constraints::default();
        assert_eq!(
            serde_json::to_value(&constraints).unwrap(),
            json!({"disallowedSubstrings": []})
        );

        let contract = Contract::from_value(valid_doc()).unwrap();
        let value = serde_json::to_value(&contract).unwrap();
        assert_eq!(value["constraints"]["outputMode"], json!("unordered-number-members"));
        assert_eq!(Contract::from_value(value).unwrap(), contract);
    }
}
