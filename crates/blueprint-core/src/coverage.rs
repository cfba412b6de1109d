//! Coverage report: how much of the catalog ships verified, problem-specific
//! content. This is the artifact the build gate asserts against.

use crate::contract::ContractRegistry;
use crate::level::Level;
use crate::pipeline::SolutionSource;
use crate::problem::Problem;
use crate::strategy::StrategyKind;
use crate::taxonomy::profile_for;
use crate::verifier::Confidence;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

/// Percentage rounded to two decimals; zero when `total` is zero
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((part as f64 / total as f64) * 10_000.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    total: usize,
    strategy: usize,
    problem_specific: usize,
    probe: usize,
    placeholder: usize,
    passed: usize,
    fallback: usize,
    low_confidence: usize,
}

impl Tally {
    fn summary(&self) -> CompletionSummary {
        CompletionSummary {
            total: self.total,
            strategy_generated: self.strategy,
            semantic_passed: self.passed,
            fallback_count: self.fallback,
            problem_specific_strategy: self.problem_specific,
            semantic_probe_usage: self.probe,
            placeholder_contracts: self.placeholder,
            strategy_coverage_pct: percent(self.strategy, self.total),
            semantic_pass_pct: percent(self.passed, self.total),
            remediation_complete: self.strategy == self.total
                && self.problem_specific == self.total
                && self.probe == 0
                && self.placeholder == 0
                && self.fallback == 0,
        }
    }
}

/// Roll-up for one pattern or one wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub total: usize,
    pub strategy_generated: usize,
    pub semantic_passed: usize,
    pub fallback_count: usize,
    pub problem_specific_strategy: usize,
    pub semantic_probe_usage: usize,
    pub placeholder_contracts: usize,
    pub strategy_coverage_pct: f64,
    pub semantic_pass_pct: f64,
    pub remediation_complete: bool,
}

/// How one problem's level was classified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemCoverage {
    pub problem_id: u32,
    pub pattern: String,
    pub wave: String,
    pub strategy_generated: bool,
    pub problem_specific: bool,
    pub semantic_probe: bool,
    pub placeholder_contract: bool,
    pub semantic_passed: bool,
    pub fallback: bool,
    pub low_confidence: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub total_questions: usize,
    pub strategy_generated: usize,
    pub semantic_passed: usize,
    pub fallback_count: usize,
    pub low_confidence_count: usize,
    pub problem_specific_strategy_count: usize,
    pub placeholder_contract_count: usize,
    pub semantic_probe_usage_count: usize,
    pub strategy_coverage_pct: f64,
    pub semantic_pass_pct: f64,
    pub per_problem: Vec<ProblemCoverage>,
    pub per_pattern_completion: BTreeMap<String, CompletionSummary>,
    pub per_wave_completion: BTreeMap<String, CompletionSummary>,
    pub per_wave_remediation_status: BTreeMap<String, bool>,
}

impl CoverageReport {
    /// Classify every catalog problem by its generated level. A problem with
    /// no level counts against every metric.
    pub fn build(levels: &[Level], problems: &[Problem], contracts: &ContractRegistry) -> Self {
        let by_problem: HashMap<u32, &Level> = levels.iter().map(|l| (l.problem_id, l)).collect();

        let mut overall = Tally::default();
        let mut per_pattern: BTreeMap<String, Tally> = BTreeMap::new();
        let mut per_wave: BTreeMap<String, Tally> = BTreeMap::new();
        let mut per_problem = Vec::with_capacity(problems.len());

        for problem in problems {
            let level = by_problem.get(&problem.id).copied();
            let wave = profile_for(&problem.pattern).wave.as_str().to_string();

            let from_strategy =
                level.is_some_and(|l| l.generation_source == SolutionSource::Strategy);
            let kind = level.and_then(|l| l.generation_strategy_kind);
            let row = ProblemCoverage {
                problem_id: problem.id,
                pattern: problem.pattern.clone(),
                wave: wave.clone(),
                strategy_generated: from_strategy,
                problem_specific: from_strategy && kind == Some(StrategyKind::ProblemSpecific),
                semantic_probe: kind == Some(StrategyKind::WaveTemplate),
                placeholder_contract: contracts.resolve(problem).is_placeholder(),
                semantic_passed: level.is_some_and(|l| l.verification.passed()),
                fallback: level
                    .is_some_and(|l| l.generation_source == SolutionSource::TemplateFallback),
                low_confidence: level
                    .map_or(true, |l| l.verification.result.confidence == Confidence::Low),
            };

            for tally in [
                &mut overall,
                per_pattern.entry(problem.pattern.clone()).or_default(),
                per_wave.entry(wave).or_default(),
            ] {
                tally.total += 1;
                tally.strategy += row.strategy_generated as usize;
                tally.problem_specific += row.problem_specific as usize;
                tally.probe += row.semantic_probe as usize;
                tally.placeholder += row.placeholder_contract as usize;
                tally.passed += row.semantic_passed as usize;
                tally.fallback += row.fallback as usize;
                tally.low_confidence += row.low_confidence as usize;
            }
            per_problem.push(row);
        }

        let per_wave_completion: BTreeMap<String, CompletionSummary> = per_wave
            .into_iter()
            .map(|(wave, tally)| (wave, tally.summary()))
            .collect();
        let per_wave_remediation_status = per_wave_completion
            .iter()
            .map(|(wave, summary)| (wave.clone(), summary.remediation_complete))
            .collect();

        Self {
            total_questions: overall.total,
            strategy_generated: overall.strategy,
            semantic_passed: overall.passed,
            fallback_count: overall.fallback,
            low_confidence_count: overall.low_confidence,
            problem_specific_strategy_count: overall.problem_specific,
            placeholder_contract_count: overall.placeholder,
            semantic_probe_usage_count: overall.probe,
            strategy_coverage_pct: percent(overall.strategy, overall.total),
            semantic_pass_pct: percent(overall.passed, overall.total),
            per_problem,
            per_pattern_completion: per_pattern
                .into_iter()
                .map(|(pattern, tally)| (pattern, tally.summary()))
                .collect(),
            per_wave_completion,
            per_wave_remediation_status,
        }
    }

    /// Every reason the catalog fails the build gate; empty means it passes
    pub fn gate_violations(&self) -> Vec<String> {
        let total = self.total_questions;
        let mut out = Vec::new();
        if self.strategy_generated != total {
            out.push(format!(
                "strategy_generated {} != total_questions {}",
                self.strategy_generated, total
            ));
        }
        if self.semantic_passed != total {
            out.push(format!(
                "semantic_passed {} != total_questions {}",
                self.semantic_passed, total
            ));
        }
        if self.problem_specific_strategy_count != total {
            out.push(format!(
                "problem_specific_strategy_count {} != total_questions {}",
                self.problem_specific_strategy_count, total
            ));
        }
        if self.fallback_count > 0 {
            out.push(format!("fallback_count {} > 0", self.fallback_count));
        }
        if self.placeholder_contract_count > 0 {
            out.push(format!(
                "placeholder_contract_count {} > 0",
                self.placeholder_contract_count
            ));
        }
        if self.semantic_probe_usage_count > 0 {
            out.push(format!(
                "semantic_probe_usage_count {} > 0",
                self.semantic_probe_usage_count
            ));
        }
        for (wave, complete) in &self.per_wave_remediation_status {
            if !complete {
                out.push(format!("{} remediation incomplete", wave));
            }
        }
        out
    }

    /// Deterministic plain-text rendering
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "total_questions: {}", self.total_questions);
        let _ = writeln!(out, "strategy_generated: {}", self.strategy_generated);
        let _ = writeln!(out, "semantic_passed: {}", self.semantic_passed);
        let _ = writeln!(out, "strategy_coverage_pct: {}", self.strategy_coverage_pct);
        let _ = writeln!(out, "semantic_pass_pct: {}", self.semantic_pass_pct);
        let _ = writeln!(out, "fallback_count: {}", self.fallback_count);
        let _ = writeln!(out, "low_confidence_count: {}", self.low_confidence_count);
        let _ = writeln!(
            out,
            "problem_specific_strategy_count: {}",
            self.problem_specific_strategy_count
        );
        let _ = writeln!(out, "placeholder_contract_count: {}", self.placeholder_contract_count);
        let _ = writeln!(out, "semantic_probe_usage_count: {}", self.semantic_probe_usage_count);

        let _ = writeln!(out, "per_wave_completion:");
        for (wave, s) in &self.per_wave_completion {
            let _ = writeln!(out, "- {}: {}", wave, summary_line(s));
        }
        let _ = writeln!(out, "per_wave_remediation_status:");
        for (wave, complete) in &self.per_wave_remediation_status {
            let _ = writeln!(out, "- {}: {}", wave, if *complete { "complete" } else { "incomplete" });
        }
        let _ = writeln!(out, "per_pattern_completion:");
        for (pattern, s) in &self.per_pattern_completion {
            let _ = writeln!(out, "- {}: {}", pattern, summary_line(s));
        }
        out
    }
}

fn summary_line(s: &CompletionSummary) -> String {
    format!(
        "strategy {}/{}, semantic {}/{}, problem_specific {}/{}, fallback {}, probe {}, placeholder {}",
        s.strategy_generated,
        s.total,
        s.semantic_passed,
        s.total,
        s.problem_specific_strategy,
        s.total,
        s.fallback_count,
        s.semantic_probe_usage,
        s.placeholder_contracts
    )
}

/// Levels whose cards were substituted from a fallback
pub fn fallback_count(levels: &[Level]) -> usize {
    levels
        .iter()
        .filter(|l| l.generation_source == SolutionSource::TemplateFallback)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::level::build_levels;
    use crate::pipeline::SolutionPipeline;
    use crate::problem::Difficulty;
    use crate::strategy::StrategyRegistry;

    fn problems() -> Vec<Problem> {
        vec![
            Problem::new(1, "A", "Hash Map", Difficulty::Easy, ""),
            Problem::new(2, "B", "Hash Map", Difficulty::Easy, ""),
            Problem::new(3, "C", "Stack", Difficulty::Medium, ""),
            Problem::new(4, "D", "Unknown Pattern", Difficulty::Hard, ""),
        ]
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 3), 33.33);
        assert_eq!(percent(2, 3), 66.67);
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(5, 5), 100.0);
    }

    #[test]
    fn test_probe_only_catalog_fails_gate() {
        let contracts = ContractRegistry::default();
        let strategies = StrategyRegistry::wave_templates_only();
        let pipeline = SolutionPipeline::new(&contracts, &strategies, PipelineConfig::default());
        let problems = problems();
        let levels = build_levels(&pipeline, &problems);
        let report = CoverageReport::build(&levels, &problems, &contracts);

        assert_eq!(report.total_questions, 4);
        // the unknown pattern has no hint, so only three reach a strategy
        assert_eq!(report.strategy_generated, 3);
        assert_eq!(report.semantic_passed, 3);
        assert_eq!(report.semantic_probe_usage_count, 3);
        assert_eq!(report.problem_specific_strategy_count, 0);
        assert_eq!(report.placeholder_contract_count, 4);
        assert_eq!(report.fallback_count, 0);
        assert_eq!(report.strategy_coverage_pct, 75.0);
        assert_eq!(report.per_wave_completion["wave-1"].total, 3);
        assert_eq!(report.per_pattern_completion["Hash Map"].total, 2);
        assert_eq!(report.per_wave_remediation_status.get("wave-2"), Some(&false));
        assert!(!report.gate_violations().is_empty());
    }

    #[test]
    fn test_missing_level_counts_against_problem() {
        let contracts = ContractRegistry::default();
        let problems = problems();
        let report = CoverageReport::build(&[], &problems, &contracts);
        assert_eq!(report.strategy_generated, 0);
        assert_eq!(report.low_confidence_count, 4);
        assert_eq!(fallback_count(&[]), 0);
    }

    #[test]
    fn test_render_text_is_stable() {
        let contracts = ContractRegistry::default();
        let problems = problems();
        let report = CoverageReport::build(&[], &problems, &contracts);
        let text = report.render_text();
        assert_eq!(text, report.render_text());
        assert!(text.starts_with("total_questions: 4\n"));
        for field in [
            "strategy_generated: 0",
            "semantic_passed: 0",
            "fallback_count: 0",
            "per_wave_completion:",
            "per_wave_remediation_status:",
            "- wave-2: incomplete",
        ] {
            assert!(text.contains(field), "missing {}", field);
        }
    }
}
