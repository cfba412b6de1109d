//! End-to-end pipeline behavior on hand-built registries.

use blueprint_core::contract::{Complexity, Constraints};
use blueprint_core::level::template_fallback;
use blueprint_core::pipeline::FallbackSolution;
use blueprint_core::strategy::{ProblemStrategy, ReferenceSolution, WaveTemplateStrategy};
use blueprint_core::verifier::FailureKind;
use blueprint_core::{
    build_levels, Contract, ContractRegistry, CoverageReport, Difficulty, GenerationRequest,
    GenerationStatus, IrNode, Op, OutputMode, PipelineConfig, Problem, SolutionPipeline,
    SolutionSource, SolveResult, StrategyKind, StrategyRegistry, TemplateId, TestCase,
    VerifierRng,
};
use serde_json::{json, Value};

fn double(input: &Value) -> SolveResult<Value> {
    Ok(json!(input["n"].as_i64().unwrap_or(0) * 2))
}

fn off_by_one(input: &Value) -> SolveResult<Value> {
    Ok(json!(input["n"].as_i64().unwrap_or(0) * 2 + 1))
}

fn any_n(rng: &mut VerifierRng) -> Value {
    json!({"n": rng.int(-50, 50)})
}

fn problem() -> Problem {
    Problem::new(100, "Double It", "Hash Map", Difficulty::Easy, "Double n. Simple.")
}

fn contract() -> Contract {
    Contract {
        id: "q-100-contract".into(),
        problem_id: 100,
        strategy_hint: Some("double-it".into()),
        complexity: Complexity::new("O(1)", "O(1)"),
        deterministic_cases: vec![TestCase::new(json!({"n": 3}), json!(6))],
        random_trials: 120,
        constraints: Constraints {
            output_mode: Some(OutputMode::Normalized),
            disallowed_substrings: vec![],
        },
    }
}

fn strategy(solve: fn(&Value) -> SolveResult<Value>, ir: Vec<IrNode>) -> ProblemStrategy {
    ProblemStrategy {
        id: "double-it",
        snippet_name: "Double It",
        problem_id: 100,
        template_id: TemplateId::ArrayHashing,
        ir,
        solve: ReferenceSolution {
            solve,
            source: "Ok(json!(n * 2))",
        },
        oracle: double,
        factory: any_n,
        normalize: None,
        assert_case: None,
    }
}

fn ir() -> Vec<IrNode> {
    vec![
        IrNode::new("setup", "read-n", "n = input.n", Op::Declare),
        IrNode::new("return", "ret-double", "return n * 2", Op::Return),
    ]
}

fn generate(
    strategies: &StrategyRegistry,
    config: PipelineConfig,
    allow: bool,
) -> blueprint_core::GeneratedSolution {
    let contracts = ContractRegistry::new(vec![contract()]).unwrap();
    let pipeline = SolutionPipeline::new(&contracts, strategies, config);
    let problem = problem();
    let provider = || template_fallback("q-100", TemplateId::ArrayHashing);
    let request = GenerationRequest::new(&problem, "q-100")
        .with_fallback(&provider)
        .allow_fallback(allow);
    pipeline.generate_solution(&request)
}

#[test]
fn test_verified_strategy_compiles_cards() {
    let strategies = StrategyRegistry::new(vec![strategy(double, ir())], vec![]).unwrap();
    let solution = generate(&strategies, PipelineConfig::default(), false);
    assert_eq!(solution.source, SolutionSource::Strategy);
    assert_eq!(solution.verification.status, GenerationStatus::PassedSemanticGate);
    assert_eq!(solution.snippet_name, "Double It");
    assert_eq!(solution.cards.len(), 2);
    assert_eq!(solution.cards[0].correct_slot, "seed");
    assert_eq!(solution.cards[1].correct_slot, "emit");
    assert_eq!(solution.cards[1].hint, "Emit");
}

#[test]
fn test_wrong_strategy_fails_closed() {
    let strategies = StrategyRegistry::new(vec![strategy(off_by_one, ir())], vec![]).unwrap();
    let solution = generate(&strategies, PipelineConfig::default(), false);
    assert_eq!(solution.source, SolutionSource::StrategyError);
    assert_eq!(solution.verification.status, GenerationStatus::FailedSemanticGate);
    assert_eq!(solution.cards.len(), 1);
    assert_eq!(solution.cards[0].text, "return unresolved(failed-semantic-gate)");
    assert_eq!(solution.strategy_id.as_deref(), Some("double-it"));

    let result = &solution.verification.result;
    assert_eq!(result.failed_count, 121);
    assert_eq!(result.failures.len(), 8);
    assert_eq!(result.failures[0].kind, FailureKind::DeterministicMismatch);
    assert_eq!(result.failures[1].kind, FailureKind::RandomMismatch);
}

#[test]
fn test_wrong_strategy_with_fallback_is_tagged() {
    let strategies = StrategyRegistry::new(vec![strategy(off_by_one, ir())], vec![]).unwrap();
    let solution = generate(&strategies, PipelineConfig::default().with_fallback(true), false);
    assert_eq!(solution.source, SolutionSource::TemplateFallback);
    assert_eq!(solution.verification.status, GenerationStatus::FailedSemanticGate);
    assert!(!solution.verification.passed());
    assert_eq!(solution.snippet_name, "template fallback");
}

#[test]
fn test_comment_only_ir_is_empty_ir_failure() {
    let comments = vec![
        IrNode::new("setup", "c1", "// nothing here", Op::Step),
        IrNode::new("return", "c2", "# still nothing", Op::Step),
    ];
    let strategies = StrategyRegistry::new(vec![strategy(double, comments)], vec![]).unwrap();
    let solution = generate(&strategies, PipelineConfig::default(), false);
    assert!(solution.verification.passed());
    assert_eq!(solution.verification.status, GenerationStatus::EmptyIrFallback);
    assert_eq!(solution.source, SolutionSource::StrategyError);
    assert_eq!(solution.cards[0].key, "strategy-error-empty-ir-fallback");
}

#[test]
fn test_missing_strategy_with_and_without_fallback() {
    let strategies = StrategyRegistry::new(vec![], WaveTemplateStrategy::all()).unwrap();

    let closed = generate(&strategies, PipelineConfig::default(), false);
    assert_eq!(closed.source, SolutionSource::StrategyError);
    assert_eq!(closed.verification.status, GenerationStatus::MissingStrategy);
    assert_eq!(closed.template_id, TemplateId::StandardFlow);
    assert_eq!(closed.snippet_name, "strategy enforcement");

    let open = generate(&strategies, PipelineConfig::default(), true);
    assert_eq!(open.source, SolutionSource::TemplateFallback);
    assert_eq!(open.verification.status, GenerationStatus::MissingStrategy);
    assert_eq!(open.template_id, TemplateId::ArrayHashing);
    assert!(open.cards.len() > 1);
}

#[test]
fn test_fallback_provider_output_is_used_verbatim() {
    let contracts = ContractRegistry::default();
    let strategies = StrategyRegistry::default();
    let pipeline = SolutionPipeline::new(&contracts, &strategies, PipelineConfig::default());
    let problem = problem();
    let provider = || FallbackSolution {
        template_id: TemplateId::DpState,
        cards: template_fallback("q-100", TemplateId::DpState).cards,
        snippet_name: String::new(),
    };
    let request = GenerationRequest::new(&problem, "q-100")
        .with_fallback(&provider)
        .allow_fallback(true);
    let solution = pipeline.generate_solution(&request);
    assert_eq!(solution.template_id, TemplateId::DpState);
    assert_eq!(solution.snippet_name, "template fallback");
    assert_eq!(solution.strategy_kind, None);
}

#[test]
fn test_probe_strategies_do_not_pass_the_gate() {
    let contracts = ContractRegistry::default();
    let strategies = StrategyRegistry::wave_templates_only();
    let pipeline = SolutionPipeline::new(&contracts, &strategies, PipelineConfig::default());
    let problems = vec![
        Problem::new(1, "A", "Stack", Difficulty::Easy, ""),
        Problem::new(2, "B", "Dynamic Programming", Difficulty::Medium, ""),
    ];
    let levels = build_levels(&pipeline, &problems);
    assert!(levels.iter().all(|l| l.generation_strategy_kind == Some(StrategyKind::WaveTemplate)));

    let report = CoverageReport::build(&levels, &problems, &contracts);
    assert_eq!(report.strategy_generated, 2);
    assert_eq!(report.semantic_probe_usage_count, 2);
    assert_eq!(report.placeholder_contract_count, 2);
    let violations = report.gate_violations();
    assert!(violations.iter().any(|v| v.starts_with("semantic_probe_usage_count")));
    assert!(violations.iter().any(|v| v.starts_with("placeholder_contract_count")));
}
