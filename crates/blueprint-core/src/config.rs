use crate::verifier::VerifierConfig;

/// Environment variable that turns on fallback substitution
pub const ALLOW_FALLBACK_ENV: &str = "BLUEPRINT_ALLOW_FALLBACK";

/// Configuration for solution generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Substitute caller-supplied cards when generation fails instead of
    /// emitting a visible error card. Off by default.
    pub allow_fallback: bool,
    pub verifier: VerifierConfig,
}

impl PipelineConfig {
    /// Default config with `allow_fallback` read from the environment
    pub fn from_env() -> Self {
        Self {
            allow_fallback: allow_fallback_from_env(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.verifier.seed = seed;
        self
    }

    pub fn with_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }
}

fn allow_fallback_from_env() -> bool {
    std::env::var(ALLOW_FALLBACK_ENV)
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

/// `1` and `true` (any case) enable a flag; everything else disables it
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}
