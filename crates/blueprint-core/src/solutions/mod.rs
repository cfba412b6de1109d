//! Authored reference solutions for the production catalog, one module per
//! wave. Each entry bundles the problem, its contract and its strategy.

mod wave1;
mod wave2;
mod wave3;
mod wave4;
mod wave5;
mod wave6;

use crate::strategy::ProblemSpec;

/// Every authored entry, ordered by problem id
pub fn all() -> Vec<ProblemSpec> {
    let mut specs = Vec::new();
    specs.extend(wave1::specs());
    specs.extend(wave2::specs());
    specs.extend(wave3::specs());
    specs.extend(wave4::specs());
    specs.extend(wave5::specs());
    specs.extend(wave6::specs());
    specs
}
