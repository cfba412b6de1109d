//! Plain-text rendering for CLI output

use blueprint_core::{ContractRegistry, Level, Problem};
use std::fmt::Write;

/// A level header followed by its cards grouped slot by slot
pub fn level(level: &Level) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {} ({}, {})", level.id, level.title, level.pattern, level.difficulty);
    let _ = writeln!(out, "template: {}", level.template_id);
    let _ = writeln!(
        out,
        "source: {} / {}",
        level.generation_source.as_str(),
        level.generation_strategy_id.as_deref().unwrap_or("-")
    );
    let _ = writeln!(out, "contract: {}", level.generation_contract_id);
    let result = &level.verification.result;
    let _ = writeln!(
        out,
        "verification: {} deterministic {}/{} random {}/{} confidence {}",
        level.verification.status,
        result.deterministic.passed,
        result.deterministic.total,
        result.random.passed,
        result.random.total,
        result.confidence.as_str()
    );
    for failure in &result.failures {
        let _ = writeln!(out, "  failure: {:?}", failure.kind);
    }

    for slot in &level.slots {
        let mut cards: Vec<_> = level.cards.iter().filter(|c| &c.correct_slot == slot).collect();
        if cards.is_empty() {
            continue;
        }
        cards.sort_by_key(|c| c.correct_order);
        let _ = writeln!(out, "\n[{}]", cards[0].hint);
        for card in cards {
            let _ = writeln!(out, "  {}. {}", card.correct_order + 1, card.text);
        }
    }
    out
}

/// One row per level: id, status, confidence, random trials run
pub fn verification_table(levels: &[Level]) -> String {
    let mut out = String::new();
    let width = levels.iter().map(|l| l.title.len()).max().unwrap_or(0);
    for level in levels {
        let result = &level.verification.result;
        let _ = writeln!(
            out,
            "{:>6}  {:<width$}  {:<22} {:<6} {}/{}",
            level.id,
            level.title,
            level.verification.status.as_str(),
            result.confidence.as_str(),
            result.deterministic.passed + result.random.passed,
            result.total,
            width = width
        );
    }
    let passed = levels.iter().filter(|l| l.verification.passed()).count();
    let _ = writeln!(out, "\n{}/{} passed", passed, levels.len());
    out
}

/// Authored contracts for a catalog plus coverage and production checks
pub fn contracts(registry: &ContractRegistry, problems: &[Problem]) -> String {
    let mut out = String::new();
    for problem in problems {
        let contract = registry.resolve(problem);
        let mode = contract
            .constraints
            .output_mode
            .map(|m| m.as_str())
            .unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<20} {:<28} cases {:>2} trials {:>3} {} {}",
            contract.id,
            contract.strategy_hint.as_deref().unwrap_or("-"),
            contract.deterministic_cases.len(),
            contract.random_trials,
            contract.complexity.time,
            mode
        );
    }

    let coverage = registry.coverage_summary(problems);
    let _ = writeln!(
        out,
        "\nauthored: {}/{}",
        coverage.covered_problems, coverage.total_problems
    );
    if !coverage.missing_problem_ids.is_empty() {
        let ids: Vec<String> = coverage.missing_problem_ids.iter().map(u32::to_string).collect();
        let _ = writeln!(out, "missing: {}", ids.join(", "));
    }
    for (id, errors) in registry.production_violations(problems) {
        let _ = writeln!(out, "q-{}: {}", id, errors.join("; "));
    }
    out
}
