//! Level set held by the browser for one puzzle session

use blueprint_core::{BlueprintError, BlueprintResult, CoverageReport, Engine, Level, PipelineConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A player's arrangement: card ids placed in each slot, in order
pub type Arrangement = BTreeMap<String, Vec<String>>;

/// Outcome of grading one arrangement against a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub solved: bool,
    /// Cards missing from the arrangement or placed in the wrong slot
    pub misplaced: Vec<String>,
    pub signature: String,
}

/// Levels are generated once, when the session starts
pub struct Session {
    engine: Engine,
    levels: Vec<Level>,
}

impl Session {
    pub fn new(config: PipelineConfig) -> BlueprintResult<Self> {
        let engine = Engine::production(config)?;
        let levels = engine.levels();
        Ok(Self { engine, levels })
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, problem_id: u32) -> BlueprintResult<&Level> {
        self.levels
            .iter()
            .find(|l| l.problem_id == problem_id)
            .ok_or(BlueprintError::UnknownProblem(problem_id))
    }

    pub fn coverage_report(&self) -> CoverageReport {
        self.engine.report_for(&self.levels)
    }

    /// Grade an arrangement by rebuilding its signature from card keys
    pub fn grade(&self, problem_id: u32, arrangement: &Arrangement) -> BlueprintResult<Grade> {
        let level = self.level(problem_id)?;
        let key_of = |card_id: &str| {
            level
                .cards
                .iter()
                .find(|c| c.id == card_id)
                .map(|c| c.key.as_str())
        };

        let signature = level
            .slots
            .iter()
            .map(|slot| {
                let keys: Vec<&str> = arrangement
                    .get(slot)
                    .map(|ids| ids.iter().filter_map(|id| key_of(id)).collect())
                    .unwrap_or_default();
                format!("{}:{}", slot, keys.join(">"))
            })
            .collect::<Vec<_>>()
            .join("|");

        let misplaced = level
            .cards
            .iter()
            .filter(|card| {
                !arrangement
                    .get(&card.correct_slot)
                    .is_some_and(|ids| ids.contains(&card.id))
            })
            .map(|card| card.id.clone())
            .collect();

        Ok(Grade {
            solved: level.expected_signature() == Some(signature.as_str()),
            misplaced,
            signature,
        })
    }
}

/// Arrangement that solves `level`
pub fn solved_arrangement(level: &Level) -> Arrangement {
    let mut arrangement = Arrangement::new();
    let mut cards: Vec<_> = level.cards.iter().collect();
    cards.sort_by_key(|c| c.correct_order);
    for card in cards {
        arrangement
            .entry(card.correct_slot.clone())
            .or_default()
            .push(card.id.clone());
    }
    arrangement
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::SolutionSource;

    fn session() -> Session {
        Session::new(PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_session_builds_every_level() {
        let session = session();
        assert_eq!(session.levels().len(), 35);
        assert!(session
            .levels()
            .iter()
            .all(|l| l.generation_source == SolutionSource::Strategy));
        assert!(session.coverage_report().gate_violations().is_empty());
    }

    #[test]
    fn test_unknown_level() {
        let session = session();
        assert!(matches!(session.level(404), Err(BlueprintError::UnknownProblem(404))));
        assert!(matches!(
            session.grade(404, &Arrangement::new()),
            Err(BlueprintError::UnknownProblem(404))
        ));
    }

    #[test]
    fn test_solved_arrangement_grades_solved() {
        let session = session();
        for level in session.levels() {
            let grade = session.grade(level.problem_id, &solved_arrangement(level)).unwrap();
            assert!(grade.solved, "{}", level.id);
            assert!(grade.misplaced.is_empty(), "{}", level.id);
            assert_eq!(level.expected_signature(), Some(grade.signature.as_str()));
        }
    }

    #[test]
    fn test_empty_arrangement_lists_every_card() {
        let session = session();
        let level = session.level(1).unwrap();
        let grade = session.grade(1, &Arrangement::new()).unwrap();
        assert!(!grade.solved);
        assert_eq!(grade.misplaced.len(), level.cards.len());
    }

    #[test]
    fn test_swapped_order_is_not_solved() {
        let session = session();
        let level = session.level(11).unwrap();
        let mut arrangement = solved_arrangement(level);
        let slot = arrangement
            .iter()
            .find(|(_, ids)| ids.len() > 1)
            .map(|(slot, _)| slot.clone())
            .unwrap();
        if let Some(ids) = arrangement.get_mut(&slot) {
            ids.reverse();
        }
        let grade = session.grade(11, &arrangement).unwrap();
        assert!(!grade.solved);
        assert!(grade.misplaced.is_empty());
    }

    #[test]
    fn test_card_in_wrong_slot_is_misplaced() {
        let session = session();
        let level = session.level(1).unwrap();
        let mut arrangement = solved_arrangement(level);
        let card = &level.cards[0];
        if let Some(ids) = arrangement.get_mut(&card.correct_slot) {
            ids.retain(|id| id != &card.id);
        }
        arrangement
            .entry("not-a-slot".to_string())
            .or_default()
            .push(card.id.clone());

        let grade = session.grade(1, &arrangement).unwrap();
        assert!(!grade.solved);
        assert_eq!(grade.misplaced, vec![card.id.clone()]);
    }

    #[test]
    fn test_unknown_card_ids_are_ignored() {
        let session = session();
        let level = session.level(1).unwrap();
        let mut arrangement = solved_arrangement(level);
        let slot = level.cards[0].correct_slot.clone();
        if let Some(ids) = arrangement.get_mut(&slot) {
            ids.push("no-such-card".to_string());
        }
        let grade = session.grade(1, &arrangement).unwrap();
        assert!(grade.solved);
        assert!(grade.misplaced.is_empty());
    }
}
