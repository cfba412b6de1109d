//! Production catalog: the problems shipped with the engine, their authored
//! contracts and the strategies that solve them.

use crate::contract::{Contract, ContractRegistry};
use crate::error::BlueprintResult;
use crate::problem::Problem;
use crate::solutions;
use crate::strategy::{ProblemSpec, StrategyRegistry, WaveTemplateStrategy};

/// Every authored catalog entry, ordered by problem id
pub fn production_catalog() -> Vec<ProblemSpec> {
    solutions::all()
}

pub fn production_problems() -> Vec<Problem> {
    production_catalog().into_iter().map(|s| s.problem).collect()
}

pub fn production_contracts() -> BlueprintResult<ContractRegistry> {
    ContractRegistry::new(production_catalog().into_iter().map(|s| s.contract))
}

/// Problem-specific strategies first, then the wave templates
pub fn production_strategies() -> BlueprintResult<StrategyRegistry> {
    StrategyRegistry::new(
        production_catalog().into_iter().map(|s| s.strategy),
        WaveTemplateStrategy::all(),
    )
}

/// Contracts and strategies built from one pass over the catalog
pub fn production_registries() -> BlueprintResult<(Vec<Problem>, ContractRegistry, StrategyRegistry)> {
    let mut problems = Vec::new();
    let mut contracts: Vec<Contract> = Vec::new();
    let mut strategies = Vec::new();
    for spec in production_catalog() {
        problems.push(spec.problem);
        contracts.push(spec.contract);
        strategies.push(spec.strategy);
    }
    Ok((
        problems,
        ContractRegistry::new(contracts)?,
        StrategyRegistry::new(strategies, WaveTemplateStrategy::all())?,
    ))
}
