//! Basic example of using the blueprint engine

use blueprint_core::{
    profile_for, Difficulty, Engine, GenerationRequest, PipelineConfig, Problem,
};

fn main() -> Result<(), blueprint_core::BlueprintError> {
    let engine = Engine::production(PipelineConfig::default())?;
    println!("Catalog: {} problems\n", engine.problems().len());

    // Generate one level
    let level = engine.level(10)?;
    println!("{} ({}, {})", level.title, level.pattern, level.difficulty);
    println!("Template: {}", level.template_id);
    println!(
        "Verification: {} ({} deterministic, {} random, confidence {})\n",
        level.verification.status,
        level.verification.result.deterministic.total,
        level.verification.result.random.total,
        level.verification.result.confidence.as_str()
    );
    for card in &level.cards {
        println!("  [{} #{}] {}", card.hint, card.correct_order, card.text);
    }

    // Classify a pattern tag
    let profile = profile_for("Sliding Window");
    println!(
        "\n\"Sliding Window\" -> {} / {}",
        profile.wave.display_name(),
        profile.template_id
    );

    // A problem nobody wrote a strategy for fails closed
    println!("\n--- Unknown problem ---\n");
    let problem = Problem::new(900, "Mystery", "Quantum Annealing", Difficulty::Hard, "");
    let pipeline = engine.pipeline();
    let solution = pipeline.generate_solution(&GenerationRequest::new(&problem, "q-900"));
    println!("Source: {}", solution.source.as_str());
    println!("Card: {}", solution.cards[0].text);

    // Coverage of the whole catalog
    println!("\n--- Coverage ---\n");
    let report = engine.coverage_report();
    print!("{}", report.render_text());
    let violations = report.gate_violations();
    if violations.is_empty() {
        println!("\nGate: pass");
    } else {
        println!("\nGate: {} violation(s)", violations.len());
    }
    Ok(())
}
