//! Engine: a problem catalog with its registries and configuration,
//! constructed once and shared by every generation call.

use crate::catalog::production_registries;
use crate::config::PipelineConfig;
use crate::contract::ContractRegistry;
use crate::coverage::CoverageReport;
use crate::error::{BlueprintError, BlueprintResult};
use crate::level::{build_level, build_levels, Level};
use crate::pipeline::SolutionPipeline;
use crate::problem::Problem;
use crate::strategy::StrategyRegistry;

#[derive(Debug, Clone)]
pub struct Engine {
    problems: Vec<Problem>,
    contracts: ContractRegistry,
    strategies: StrategyRegistry,
    config: PipelineConfig,
}

impl Engine {
    pub fn new(
        problems: Vec<Problem>,
        contracts: ContractRegistry,
        strategies: StrategyRegistry,
        config: PipelineConfig,
    ) -> Self {
        Self {
            problems,
            contracts,
            strategies,
            config,
        }
    }

    /// The shipped catalog with its authored contracts and strategies
    pub fn production(config: PipelineConfig) -> BlueprintResult<Self> {
        let (problems, contracts, strategies) = production_registries()?;
        Ok(Self::new(problems, contracts, strategies, config))
    }

    /// Swap the problem list, keeping the registries. Problems without an
    /// authored contract get a synthesized one at generation time.
    pub fn with_problems(mut self, problems: Vec<Problem>) -> Self {
        self.problems = problems;
        self
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn contracts(&self) -> &ContractRegistry {
        &self.contracts
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn problem(&self, id: u32) -> BlueprintResult<&Problem> {
        self.problems
            .iter()
            .find(|p| p.id == id)
            .ok_or(BlueprintError::UnknownProblem(id))
    }

    pub fn pipeline(&self) -> SolutionPipeline<'_> {
        SolutionPipeline::new(&self.contracts, &self.strategies, self.config)
    }

    pub fn level(&self, problem_id: u32) -> BlueprintResult<Level> {
        let problem = self.problem(problem_id)?;
        Ok(build_level(&self.pipeline(), problem))
    }

    pub fn levels(&self) -> Vec<Level> {
        build_levels(&self.pipeline(), &self.problems)
    }

    /// Coverage of already-built levels against this engine's catalog
    pub fn report_for(&self, levels: &[Level]) -> CoverageReport {
        CoverageReport::build(levels, &self.problems, &self.contracts)
    }

    pub fn coverage_report(&self) -> CoverageReport {
        self.report_for(&self.levels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SolutionSource;
    use crate::problem::Difficulty;

    #[test]
    fn test_unknown_problem() {
        let engine = Engine::production(PipelineConfig::default()).unwrap();
        assert!(matches!(engine.level(999), Err(BlueprintError::UnknownProblem(999))));
    }

    #[test]
    fn test_single_level() {
        let engine = Engine::production(PipelineConfig::default()).unwrap();
        let level = engine.level(1).unwrap();
        assert_eq!(level.id, "q-1");
        assert_eq!(level.generation_source, SolutionSource::Strategy);
        assert_eq!(level.generation_strategy_id.as_deref(), Some("two-sum-hash-map"));
    }

    #[test]
    fn test_foreign_catalog_fails_closed() {
        let engine = Engine::production(PipelineConfig::default())
            .unwrap()
            .with_problems(vec![Problem::new(500, "New", "Quantum Annealing", Difficulty::Hard, "")]);
        let report = engine.coverage_report();
        assert_eq!(report.total_questions, 1);
        assert_eq!(report.strategy_generated, 0);
        assert!(!report.gate_violations().is_empty());
    }
}
