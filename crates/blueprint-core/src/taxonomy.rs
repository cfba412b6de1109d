//! Pattern taxonomy: maps a problem's pattern tag to its generation profile.
//!
//! Resolution is total. Patterns outside the table resolve to the default
//! profile (wave 1, arrays/hashing, standard flow) with `matched = false`.

use crate::template::TemplateId;
use serde::{Deserialize, Serialize};

/// Coarse grouping of patterns sharing one template family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Wave {
    #[serde(rename = "wave-1")]
    Wave1,
    #[serde(rename = "wave-2")]
    Wave2,
    #[serde(rename = "wave-3")]
    Wave3,
    #[serde(rename = "wave-4")]
    Wave4,
    #[serde(rename = "wave-5")]
    Wave5,
    #[serde(rename = "wave-6")]
    Wave6,
}

impl Wave {
    pub const ALL: [Wave; 6] = [
        Wave::Wave1,
        Wave::Wave2,
        Wave::Wave3,
        Wave::Wave4,
        Wave::Wave5,
        Wave::Wave6,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Wave::Wave1 => "wave-1",
            Wave::Wave2 => "wave-2",
            Wave::Wave3 => "wave-3",
            Wave::Wave4 => "wave-4",
            Wave::Wave5 => "wave-5",
            Wave::Wave6 => "wave-6",
        }
    }

    /// Id of the generic template strategy family serving this wave
    pub fn template_strategy_id(&self) -> &'static str {
        match self {
            Wave::Wave1 => "wave-1-template-family",
            Wave::Wave2 => "wave-2-template-family",
            Wave::Wave3 => "wave-3-template-family",
            Wave::Wave4 => "wave-4-template-family",
            Wave::Wave5 => "wave-5-template-family",
            Wave::Wave6 => "wave-6-template-family",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Wave::Wave1 => "Wave 1",
            Wave::Wave2 => "Wave 2",
            Wave::Wave3 => "Wave 3",
            Wave::Wave4 => "Wave 4",
            Wave::Wave5 => "Wave 5",
            Wave::Wave6 => "Wave 6",
        }
    }
}

impl std::fmt::Display for Wave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named algorithmic shape that fixes the slot set steps are sorted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    ArraysHashing,
    StackHeapSearch,
    LinkedListIntervalsGreedy,
    TreeTrieBacktracking,
    PureBacktracking,
    Graphs,
    DpBitMatrix,
}

impl Archetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::ArraysHashing => "arrays-hashing",
            Archetype::StackHeapSearch => "stack-heap-search",
            Archetype::LinkedListIntervalsGreedy => "linked-list-intervals-greedy",
            Archetype::TreeTrieBacktracking => "tree-trie-backtracking",
            Archetype::PureBacktracking => "pure-backtracking",
            Archetype::Graphs => "graphs",
            Archetype::DpBitMatrix => "dp-bit-matrix",
        }
    }

    pub fn template_id(&self) -> TemplateId {
        match self {
            Archetype::ArraysHashing
            | Archetype::StackHeapSearch
            | Archetype::LinkedListIntervalsGreedy => TemplateId::StandardFlow,
            Archetype::PureBacktracking => TemplateId::Backtracking,
            Archetype::TreeTrieBacktracking | Archetype::Graphs | Archetype::DpBitMatrix => {
                TemplateId::RecursiveTopDown
            }
        }
    }
}

/// Generation profile derived from a pattern tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyProfile {
    pub wave: Wave,
    pub archetype_id: Archetype,
    pub template_id: TemplateId,
    pub strategy_family_id: &'static str,
    /// False when the pattern fell through to the default profile
    pub matched: bool,
}

const PATTERN_PROFILES: &[(&str, Wave, Archetype)] = &[
    ("Hash Map", Wave::Wave1, Archetype::ArraysHashing),
    ("Hash Set", Wave::Wave1, Archetype::ArraysHashing),
    ("Bucket Sort", Wave::Wave1, Archetype::ArraysHashing),
    ("Prefix/Suffix", Wave::Wave1, Archetype::ArraysHashing),
    ("Design", Wave::Wave1, Archetype::ArraysHashing),
    ("Two Pointers", Wave::Wave1, Archetype::ArraysHashing),
    ("Sliding Window", Wave::Wave1, Archetype::ArraysHashing),
    ("Expand Around Center", Wave::Wave1, Archetype::ArraysHashing),
    ("Stack", Wave::Wave2, Archetype::StackHeapSearch),
    ("Monotonic Stack", Wave::Wave2, Archetype::StackHeapSearch),
    ("Binary Search", Wave::Wave2, Archetype::StackHeapSearch),
    ("Heap / Divide & Conquer", Wave::Wave2, Archetype::StackHeapSearch),
    ("Two Heaps", Wave::Wave2, Archetype::StackHeapSearch),
    ("Heap / Sorting", Wave::Wave2, Archetype::StackHeapSearch),
    ("BST Property / Binary Search", Wave::Wave2, Archetype::StackHeapSearch),
    ("Linked List", Wave::Wave3, Archetype::LinkedListIntervalsGreedy),
    ("Fast & Slow Pointers", Wave::Wave3, Archetype::LinkedListIntervalsGreedy),
    ("Intervals", Wave::Wave3, Archetype::LinkedListIntervalsGreedy),
    ("Sorting", Wave::Wave3, Archetype::LinkedListIntervalsGreedy),
    ("Greedy", Wave::Wave3, Archetype::LinkedListIntervalsGreedy),
    ("Kadane's Algorithm", Wave::Wave3, Archetype::LinkedListIntervalsGreedy),
    ("DFS", Wave::Wave4, Archetype::TreeTrieBacktracking),
    ("BFS", Wave::Wave4, Archetype::TreeTrieBacktracking),
    ("BFS / DFS", Wave::Wave4, Archetype::TreeTrieBacktracking),
    ("DFS (Inorder)", Wave::Wave4, Archetype::TreeTrieBacktracking),
    ("DFS + Hash Map", Wave::Wave4, Archetype::TreeTrieBacktracking),
    ("Trie", Wave::Wave4, Archetype::TreeTrieBacktracking),
    ("Backtracking", Wave::Wave4, Archetype::PureBacktracking),
    ("Trie + Backtracking", Wave::Wave4, Archetype::PureBacktracking),
    ("DFS / BFS", Wave::Wave5, Archetype::Graphs),
    ("Topological Sort", Wave::Wave5, Archetype::Graphs),
    ("Union Find / DFS", Wave::Wave5, Archetype::Graphs),
    ("Dynamic Programming", Wave::Wave6, Archetype::DpBitMatrix),
    ("DP + Binary Search (Patience Sorting)", Wave::Wave6, Archetype::DpBitMatrix),
    ("Bit Manipulation", Wave::Wave6, Archetype::DpBitMatrix),
    ("Matrix", Wave::Wave6, Archetype::DpBitMatrix),
];

fn make_profile(wave: Wave, archetype: Archetype, matched: bool) -> TaxonomyProfile {
    TaxonomyProfile {
        wave,
        archetype_id: archetype,
        template_id: archetype.template_id(),
        strategy_family_id: wave.template_strategy_id(),
        matched,
    }
}

/// Profile used for patterns the table does not know
pub fn default_profile() -> TaxonomyProfile {
    make_profile(Wave::Wave1, Archetype::ArraysHashing, false)
}

/// Resolve the generation profile for a pattern tag. Never fails.
pub fn profile_for(pattern: &str) -> TaxonomyProfile {
    PATTERN_PROFILES
        .iter()
        .find(|(name, _, _)| *name == pattern)
        .map(|&(_, wave, archetype)| make_profile(wave, archetype, true))
        .unwrap_or_else(default_profile)
}

/// Every pattern tag the taxonomy recognizes, in table order
pub fn known_patterns() -> impl Iterator<Item = &'static str> {
    PATTERN_PROFILES.iter().map(|(name, _, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_patterns() {
        let p = profile_for("Sliding Window");
        assert_eq!(p.wave, Wave::Wave1);
        assert_eq!(p.template_id, TemplateId::StandardFlow);
        assert!(p.matched);

        let p = profile_for("Backtracking");
        assert_eq!(p.wave, Wave::Wave4);
        assert_eq!(p.archetype_id, Archetype::PureBacktracking);
        assert_eq!(p.template_id, TemplateId::Backtracking);

        let p = profile_for("Topological Sort");
        assert_eq!(p.wave, Wave::Wave5);
        assert_eq!(p.template_id, TemplateId::RecursiveTopDown);
        assert_eq!(p.strategy_family_id, "wave-5-template-family");
    }

    #[test]
    fn test_unknown_pattern_falls_back() {
        let p = profile_for("Quantum Annealing");
        assert_eq!(p, default_profile());
        assert!(!p.matched);
        assert_eq!(p.strategy_family_id, "wave-1-template-family");
        assert_eq!(profile_for(""), default_profile());
    }

    #[test]
    fn test_every_wave_has_patterns() {
        for wave in Wave::ALL {
            assert!(
                known_patterns().any(|p| profile_for(p).wave == wave),
                "{} has no patterns",
                wave
            );
        }
    }

    #[test]
    fn test_pattern_table_has_no_duplicates() {
        let mut names: Vec<&str> = known_patterns().collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
