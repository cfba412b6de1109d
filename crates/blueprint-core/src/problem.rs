use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty label carried by a catalog problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// One entry of the problem catalog. Supplied from outside the engine and
/// never modified by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: u32,
    pub pattern: String,
    pub difficulty: Difficulty,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Problem {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        pattern: impl Into<String>,
        difficulty: Difficulty,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            pattern: pattern.into(),
            difficulty,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Level id used for this problem's generated level
    pub fn level_id(&self) -> String {
        format!("q-{}", self.id)
    }

    /// Parse a catalog from a JSON array of problems
    pub fn catalog_from_json(json: &str) -> crate::BlueprintResult<Vec<Problem>> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_id() {
        let p = Problem::new(12, "Example", "Hash Map", Difficulty::Easy, "");
        assert_eq!(p.level_id(), "q-12");
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            {"id": 1, "pattern": "Hash Map", "difficulty": "Easy", "name": "Two Sum"},
            {"id": 2, "pattern": "Stack", "difficulty": "Medium", "name": "X", "description": "d"}
        ]"#;
        let problems = Problem::catalog_from_json(json).unwrap();
        assert_eq!(problems.len(), 2);
        assert_eq!(problems[0].description, "");
        assert_eq!(problems[1].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_catalog_from_bad_json() {
        assert!(Problem::catalog_from_json("{").is_err());
    }
}
