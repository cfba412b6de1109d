//! Solution pipeline: contract -> strategy -> plan -> verifier -> cards.
//!
//! Fail-closed. Any failure produces a single visible error card naming the
//! failure status, unless fallback is explicitly allowed, in which case the
//! caller's fallback cards are used and tagged as such. Either way the
//! original status is kept for audit.

use crate::config::PipelineConfig;
use crate::contract::ContractRegistry;
use crate::ir::{compile, Card, Op};
use crate::problem::Problem;
use crate::strategy::{StrategyKind, StrategyRegistry};
use crate::template::TemplateId;
use crate::verifier::{VerificationResult, Verifier};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationStatus {
    PassedSemanticGate,
    MissingStrategy,
    FailedSemanticGate,
    EmptyIrFallback,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::PassedSemanticGate => "passed-semantic-gate",
            GenerationStatus::MissingStrategy => "missing-strategy",
            GenerationStatus::FailedSemanticGate => "failed-semantic-gate",
            GenerationStatus::EmptyIrFallback => "empty-ir-fallback",
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a solution's cards came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolutionSource {
    Strategy,
    TemplateFallback,
    StrategyError,
}

impl SolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolutionSource::Strategy => "strategy",
            SolutionSource::TemplateFallback => "template-fallback",
            SolutionSource::StrategyError => "strategy-error",
        }
    }
}

/// Verification outcome plus the pipeline status it led to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionVerification {
    #[serde(flatten)]
    pub result: VerificationResult,
    pub status: GenerationStatus,
}

impl SolutionVerification {
    pub fn passed(&self) -> bool {
        self.result.passed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSolution {
    pub template_id: TemplateId,
    pub cards: Vec<Card>,
    pub snippet_name: String,
    pub source: SolutionSource,
    pub strategy_id: Option<String>,
    pub strategy_kind: Option<StrategyKind>,
    pub contract_id: String,
    pub verification: SolutionVerification,
}

/// Cards substituted when generation fails and fallback is allowed
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackSolution {
    pub template_id: TemplateId,
    pub cards: Vec<Card>,
    pub snippet_name: String,
}

pub struct GenerationRequest<'a> {
    pub problem: &'a Problem,
    pub level_id: &'a str,
    pub fallback: Option<&'a dyn Fn() -> FallbackSolution>,
    /// Allows fallback for this request even if the config does not
    pub allow_fallback: bool,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(problem: &'a Problem, level_id: &'a str) -> Self {
        Self {
            problem,
            level_id,
            fallback: None,
            allow_fallback: false,
        }
    }

    pub fn with_fallback(mut self, fallback: &'a dyn Fn() -> FallbackSolution) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn allow_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }
}

/// Sentinel card emitted for a failed generation
pub fn unresolved_card(level_id: &str, status: GenerationStatus) -> Card {
    Card {
        id: format!("{}-c1", level_id),
        text: format!("return unresolved({})", status),
        correct_slot: "return".to_string(),
        correct_order: 0,
        key: format!("strategy-error-{}", status),
        hint: "Return".to_string(),
        op: Op::Return,
    }
}

pub struct SolutionPipeline<'a> {
    contracts: &'a ContractRegistry,
    strategies: &'a StrategyRegistry,
    verifier: Verifier,
    config: PipelineConfig,
}

struct Failed {
    status: GenerationStatus,
    strategy: Option<(String, StrategyKind)>,
    contract_id: String,
    result: VerificationResult,
}

impl<'a> SolutionPipeline<'a> {
    pub fn new(
        contracts: &'a ContractRegistry,
        strategies: &'a StrategyRegistry,
        config: PipelineConfig,
    ) -> Self {
        Self {
            contracts,
            strategies,
            verifier: Verifier::new(config.verifier),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn generate_solution(&self, request: &GenerationRequest<'_>) -> GeneratedSolution {
        let problem = request.problem;
        let contract = self.contracts.resolve(problem);

        let Some(strategy) = self.strategies.select(&contract) else {
            return self.fail(
                request,
                Failed {
                    status: GenerationStatus::MissingStrategy,
                    strategy: None,
                    contract_id: contract.id.clone(),
                    result: VerificationResult::not_run(),
                },
            );
        };
        let strategy_ref = Some((strategy.id().to_string(), strategy.kind()));

        let plan = strategy.build_plan(&contract, problem);
        let result = self.verifier.verify(&contract, &plan);
        if !result.passed {
            return self.fail(
                request,
                Failed {
                    status: GenerationStatus::FailedSemanticGate,
                    strategy: strategy_ref,
                    contract_id: contract.id.clone(),
                    result,
                },
            );
        }

        let cards = compile(request.level_id, plan.template_id, &plan.ir);
        if cards.is_empty() {
            return self.fail(
                request,
                Failed {
                    status: GenerationStatus::EmptyIrFallback,
                    strategy: strategy_ref,
                    contract_id: contract.id.clone(),
                    result,
                },
            );
        }

        debug!(
            level = request.level_id,
            strategy = strategy.id(),
            cards = cards.len(),
            "generated solution"
        );

        GeneratedSolution {
            template_id: plan.template_id,
            cards,
            snippet_name: if plan.snippet_name.is_empty() {
                strategy.name()
            } else {
                plan.snippet_name
            },
            source: SolutionSource::Strategy,
            strategy_id: Some(strategy.id().to_string()),
            strategy_kind: Some(strategy.kind()),
            contract_id: contract.id.clone(),
            verification: SolutionVerification {
                result,
                status: GenerationStatus::PassedSemanticGate,
            },
        }
    }

    fn fail(&self, request: &GenerationRequest<'_>, failed: Failed) -> GeneratedSolution {
        let allow = request.allow_fallback || self.config.allow_fallback;
        let (strategy_id, strategy_kind) = match failed.strategy {
            Some((id, kind)) => (Some(id), Some(kind)),
            None => (None, None),
        };
        let verification = SolutionVerification {
            result: failed.result,
            status: failed.status,
        };

        if allow {
            if let Some(provider) = request.fallback {
                let fallback = provider();
                warn!(
                    level = request.level_id,
                    status = %failed.status,
                    "substituting fallback cards"
                );
                return GeneratedSolution {
                    template_id: fallback.template_id,
                    cards: fallback.cards,
                    snippet_name: if fallback.snippet_name.is_empty() {
                        "template fallback".to_string()
                    } else {
                        fallback.snippet_name
                    },
                    source: SolutionSource::TemplateFallback,
                    strategy_id,
                    strategy_kind,
                    contract_id: failed.contract_id,
                    verification,
                };
            }
            warn!(
                level = request.level_id,
                "fallback allowed but no fallback provided"
            );
        }

        warn!(
            level = request.level_id,
            problem = request.problem.id,
            status = %failed.status,
            "generation failed closed"
        );
        GeneratedSolution {
            template_id: TemplateId::StandardFlow,
            cards: vec![unresolved_card(request.level_id, failed.status)],
            snippet_name: "strategy enforcement".to_string(),
            source: SolutionSource::StrategyError,
            strategy_id,
            strategy_kind,
            contract_id: failed.contract_id,
            verification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Difficulty;
    use crate::strategy::WaveTemplateStrategy;

    fn unknown_problem() -> Problem {
        Problem::new(9001, "Mystery", "Quantum Annealing", Difficulty::Hard, "")
    }

    fn fallback() -> FallbackSolution {
        FallbackSolution {
            template_id: TemplateId::StandardFlow,
            cards: vec![Card {
                id: "fb-c1".into(),
                text: "do the thing".into(),
                correct_slot: "setup".into(),
                correct_order: 0,
                key: "fb".into(),
                hint: "Setup".into(),
                op: Op::Step,
            }],
            snippet_name: "custom fallback".into(),
        }
    }

    #[test]
    fn test_missing_strategy_fails_closed() {
        let contracts = ContractRegistry::default();
        let strategies = StrategyRegistry::wave_templates_only();
        let pipeline = SolutionPipeline::new(&contracts, &strategies, PipelineConfig::default());
        let problem = unknown_problem();

        let provider = fallback;
        let solution = pipeline
            .generate_solution(&GenerationRequest::new(&problem, "q-9001").with_fallback(&provider));
        assert_eq!(solution.source, SolutionSource::StrategyError);
        assert_eq!(solution.verification.status, GenerationStatus::MissingStrategy);
        assert_eq!(solution.cards.len(), 1);
        assert_eq!(solution.cards[0].text, "return unresolved(missing-strategy)");
        assert_eq!(solution.cards[0].id, "q-9001-c1");
        assert_eq!(solution.cards[0].key, "strategy-error-missing-strategy");
        assert_eq!(solution.strategy_id, None);
    }

    #[test]
    fn test_missing_strategy_with_fallback() {
        let contracts = ContractRegistry::default();
        let strategies = StrategyRegistry::wave_templates_only();
        let pipeline = SolutionPipeline::new(&contracts, &strategies, PipelineConfig::default());
        let problem = unknown_problem();

        let provider = fallback;
        let request = GenerationRequest::new(&problem, "q-9001")
            .with_fallback(&provider)
            .allow_fallback(true);
        let solution = pipeline.generate_solution(&request);
        assert_eq!(solution.source, SolutionSource::TemplateFallback);
        assert_eq!(solution.verification.status, GenerationStatus::MissingStrategy);
        assert_eq!(solution.cards, fallback().cards);
        assert_eq!(solution.snippet_name, "custom fallback");
    }

    #[test]
    fn test_config_fallback_without_provider_still_fails_closed() {
        let contracts = ContractRegistry::default();
        let strategies = StrategyRegistry::wave_templates_only();
        let config = PipelineConfig::default().with_fallback(true);
        let pipeline = SolutionPipeline::new(&contracts, &strategies, config);
        let problem = unknown_problem();
        let solution = pipeline.generate_solution(&GenerationRequest::new(&problem, "x"));
        assert_eq!(solution.source, SolutionSource::StrategyError);
    }

    #[test]
    fn test_wave_probe_generates_but_is_tagged() {
        let contracts = ContractRegistry::default();
        let strategies = StrategyRegistry::new(vec![], WaveTemplateStrategy::all()).unwrap();
        let pipeline = SolutionPipeline::new(&contracts, &strategies, PipelineConfig::default());
        let problem = Problem::new(77, "Probe", "Greedy", Difficulty::Easy, "");
        let solution = pipeline.generate_solution(&GenerationRequest::new(&problem, "q-77"));
        assert_eq!(solution.source, SolutionSource::Strategy);
        assert!(solution.verification.passed());
        assert_eq!(solution.strategy_kind, Some(StrategyKind::WaveTemplate));
        assert_eq!(solution.strategy_id.as_deref(), Some("wave-3-template-family"));
        assert_eq!(solution.cards.len(), 5);
    }
}
