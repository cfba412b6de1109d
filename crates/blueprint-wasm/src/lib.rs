//! WebAssembly surface of the blueprint engine
//!
//! Hands generated levels and the coverage report to the browser puzzle as
//! plain JS values, and grades the player's arrangements.

use blueprint_core::PipelineConfig;
use wasm_bindgen::prelude::*;

mod session;

// Engine surface tests run under wasm-pack test; session grading is tested on the host
#[cfg(all(test, target_arch = "wasm32"))]
mod tests;

pub use session::{solved_arrangement, Arrangement, Grade, Session};

// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

#[wasm_bindgen]
pub struct BlueprintEngine {
    session: Session,
}

#[wasm_bindgen]
impl BlueprintEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(allow_fallback: bool) -> Result<BlueprintEngine, JsValue> {
        let config = PipelineConfig::default().with_fallback(allow_fallback);
        let session = Session::new(config).map_err(js_error)?;
        Ok(BlueprintEngine { session })
    }

    #[wasm_bindgen]
    pub fn level_count(&self) -> usize {
        self.session.levels().len()
    }

    /// Every level record, in catalog order
    #[wasm_bindgen]
    pub fn levels(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.levels())
    }

    #[wasm_bindgen]
    pub fn level(&self, problem_id: u32) -> Result<JsValue, JsValue> {
        to_js(self.session.level(problem_id).map_err(js_error)?)
    }

    #[wasm_bindgen]
    pub fn level_json(&self, problem_id: u32) -> Result<String, JsValue> {
        let level = self.session.level(problem_id).map_err(js_error)?;
        serde_json::to_string(level).map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn coverage_report(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.coverage_report())
    }

    #[wasm_bindgen]
    pub fn coverage_report_text(&self) -> String {
        self.session.coverage_report().render_text()
    }

    /// Grade `{ slot: [cardId, ...] }` against a level's expected arrangement
    #[wasm_bindgen]
    pub fn grade(&self, problem_id: u32, arrangement: JsValue) -> Result<JsValue, JsValue> {
        let arrangement: Arrangement =
            serde_wasm_bindgen::from_value(arrangement).map_err(js_error)?;
        let grade = self.session.grade(problem_id, &arrangement).map_err(js_error)?;
        to_js(&grade)
    }
}
