//! Tests for the JS-facing engine, run with wasm-pack test

#[cfg(test)]
mod tests {
    use crate::BlueprintEngine;
    use wasm_bindgen_test::*;

    fn engine() -> BlueprintEngine {
        BlueprintEngine::new(false).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_engine_exposes_every_level() {
        let engine = engine();
        assert_eq!(engine.level_count(), 35);
        assert!(engine.levels().is_ok());
        assert!(engine.coverage_report().is_ok());
    }

    #[wasm_bindgen_test]
    fn test_level_json_round_trips() {
        let engine = engine();
        let json = engine.level_json(1).unwrap();
        let level: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(level["problemId"], 1);
        assert!(engine.level_json(404).is_err());
    }

    #[wasm_bindgen_test]
    fn test_coverage_text_reports_gate() {
        let text = engine().coverage_report_text();
        assert!(text.contains("total_questions: 35"));
    }
}
