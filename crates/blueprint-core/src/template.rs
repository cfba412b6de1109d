//! Template catalog: the ordered slot sets cards are sorted into.
//!
//! Templates fall into three families. Standard-family templates share the
//! canonical roles `setup / loop / update / check / return`, recursive-family
//! templates share `base / choose / constrain / explore / combine`, and the
//! backtracking flow stands alone. IR may name either a template's own slot
//! id or its canonical role; the compiler maps roles onto slots.

use serde::{Deserialize, Serialize};

/// Identifier of a template in the fixed catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TemplateId {
    #[serde(rename = "standard_algo_flow")]
    StandardFlow,
    #[serde(rename = "array_hashing_flow")]
    ArrayHashing,
    #[serde(rename = "two_pointers_flow")]
    TwoPointers,
    #[serde(rename = "sliding_window_flow")]
    SlidingWindow,
    #[serde(rename = "stack_heap_flow")]
    StackHeap,
    #[serde(rename = "binary_search_flow")]
    BinarySearch,
    #[serde(rename = "linked_list_flow")]
    LinkedList,
    #[serde(rename = "interval_greedy_flow")]
    IntervalGreedy,
    #[serde(rename = "backtracking_flow")]
    Backtracking,
    #[serde(rename = "recursive_top_down_flow")]
    RecursiveTopDown,
    #[serde(rename = "tree_graph_flow")]
    TreeGraph,
    #[serde(rename = "dp_state_flow")]
    DpState,
}

/// Classification family of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateFamily {
    Standard,
    Backtracking,
    Recursive,
}

/// One named stage of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotDef {
    pub id: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
}

/// A template: id, display name and its ordered slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: &'static str,
    pub slots: &'static [SlotDef],
}

const fn slot(id: &'static str, name: &'static str, desc: &'static str) -> SlotDef {
    SlotDef { id, name, desc }
}

pub const STANDARD_ROLES: [&str; 5] = ["setup", "loop", "update", "check", "return"];
pub const RECURSIVE_ROLES: [&str; 5] = ["base", "choose", "constrain", "explore", "combine"];

const STANDARD_SLOTS: [SlotDef; 5] = [
    slot("setup", "Setup", "Initialize variables"),
    slot("loop", "Loop", "Define iteration"),
    slot("update", "Update", "Update state each step"),
    slot("check", "Check", "Conditions and invariants"),
    slot("return", "Return", "Return the answer"),
];

const ARRAY_HASHING_SLOTS: [SlotDef; 5] = [
    slot("seed", "SEED", "Initialize map/set/counter state"),
    slot("scan", "SCAN", "Iterate values or keys once"),
    slot("record", "RECORD", "Write hash/frequency/prefix updates"),
    slot("match", "MATCH", "Check complement/signature/invariant"),
    slot("emit", "EMIT", "Return answer structure"),
];

const TWO_POINTERS_SLOTS: [SlotDef; 5] = [
    slot("anchors", "ANCHORS", "Initialize pointer anchors"),
    slot("converge", "CONVERGE", "Advance until pointers meet"),
    slot("shift", "SHIFT", "Move left/right pointer(s)"),
    slot("compare", "COMPARE", "Evaluate pair/triplet condition"),
    slot("emit", "EMIT", "Return best pair/result"),
];

const SLIDING_WINDOW_SLOTS: [SlotDef; 5] = [
    slot("bootstrap", "BOOTSTRAP", "Initialize bounds and counters"),
    slot("expand", "EXPAND", "Grow window with right bound"),
    slot("shrink", "SHRINK", "Shrink left bound when invalid"),
    slot("window-check", "WINDOW CHECK", "Check validity and update answer"),
    slot("emit", "EMIT", "Return best window metric"),
];

const STACK_HEAP_SLOTS: [SlotDef; 5] = [
    slot("init-structure", "INIT STRUCTURE", "Initialize stack/heap/deque"),
    slot("iterate", "ITERATE", "Scan incoming elements/events"),
    slot("push-pop", "PUSH/POP", "Maintain structure invariants"),
    slot("resolve", "RESOLVE", "Resolve waiting indices/tasks"),
    slot("emit", "EMIT", "Return extracted answer"),
];

const BINARY_SEARCH_SLOTS: [SlotDef; 5] = [
    slot("bounds", "BOUNDS", "Initialize low/high search bounds"),
    slot("halve", "HALVE", "Iteratively split search range"),
    slot("move-bounds", "MOVE BOUNDS", "Move left/right boundary"),
    slot("mid-check", "MID CHECK", "Check midpoint predicate"),
    slot("emit", "EMIT", "Return found index/answer bound"),
];

const LINKED_LIST_SLOTS: [SlotDef; 5] = [
    slot("anchors", "ANCHORS", "Initialize prev/slow/fast pointers"),
    slot("walk", "WALK", "Traverse node by node"),
    slot("relink", "RELINK", "Mutate next pointers safely"),
    slot("guard", "GUARD", "Handle edge cases and stop conditions"),
    slot("emit", "EMIT", "Return new head/result node"),
];

const INTERVAL_GREEDY_SLOTS: [SlotDef; 5] = [
    slot("order", "ORDER", "Sort by start/end or prepare state"),
    slot("sweep", "SWEEP", "Sweep through ordered candidates"),
    slot("commit", "COMMIT", "Accept/merge current candidate"),
    slot("overlap", "OVERLAP CHECK", "Check overlap/conflict feasibility"),
    slot("emit", "EMIT", "Return merged/optimal count"),
];

const BACKTRACKING_SLOTS: [SlotDef; 5] = [
    slot("choose", "CHOOSE", "Define the choices at each step"),
    slot("constrain", "CONSTRAIN", "Filter out invalid choices (pruning)"),
    slot("base", "BASE", "When to stop recursing and collect a result"),
    slot("explore", "EXPLORE", "Make a choice, recurse, undo the choice"),
    slot("return", "RETURN", "Aggregate or return results"),
];

const RECURSIVE_SLOTS: [SlotDef; 5] = [
    slot("base", "BASE", "Solution found / dead end; null node / leaf; memo hit"),
    slot("choose", "CHOOSE", "Pick branches or subproblems to try"),
    slot("constrain", "CONSTRAIN", "Skip invalid or already-visited states"),
    slot("explore", "EXPLORE", "Recurse or expand into the next state"),
    slot("combine", "COMBINE", "Merge child results into the answer"),
];

const TREE_GRAPH_SLOTS: [SlotDef; 5] = [
    slot("base-case", "BASE CASE", "Stop at null nodes, leaves or visited vertices"),
    slot("branch", "BRANCH", "Enumerate children or neighbours"),
    slot("prune", "PRUNE", "Skip out-of-bounds or visited states"),
    slot("traverse", "TRAVERSE", "Recurse or enqueue the next frontier"),
    slot("aggregate", "AGGREGATE", "Fold child results into the answer"),
];

const DP_STATE_SLOTS: [SlotDef; 5] = [
    slot("base-state", "BASE STATE", "Seed the smallest subproblems"),
    slot("subproblem", "SUBPROBLEM", "Iterate states in dependency order"),
    slot("state-guard", "STATE GUARD", "Skip unreachable or invalid transitions"),
    slot("transition", "TRANSITION", "Derive a state from earlier states"),
    slot("memoize", "MEMOIZE", "Store and return the final state"),
];

impl TemplateId {
    pub const ALL: [TemplateId; 12] = [
        TemplateId::StandardFlow,
        TemplateId::ArrayHashing,
        TemplateId::TwoPointers,
        TemplateId::SlidingWindow,
        TemplateId::StackHeap,
        TemplateId::BinarySearch,
        TemplateId::LinkedList,
        TemplateId::IntervalGreedy,
        TemplateId::Backtracking,
        TemplateId::RecursiveTopDown,
        TemplateId::TreeGraph,
        TemplateId::DpState,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::StandardFlow => "standard_algo_flow",
            TemplateId::ArrayHashing => "array_hashing_flow",
            TemplateId::TwoPointers => "two_pointers_flow",
            TemplateId::SlidingWindow => "sliding_window_flow",
            TemplateId::StackHeap => "stack_heap_flow",
            TemplateId::BinarySearch => "binary_search_flow",
            TemplateId::LinkedList => "linked_list_flow",
            TemplateId::IntervalGreedy => "interval_greedy_flow",
            TemplateId::Backtracking => "backtracking_flow",
            TemplateId::RecursiveTopDown => "recursive_top_down_flow",
            TemplateId::TreeGraph => "tree_graph_flow",
            TemplateId::DpState => "dp_state_flow",
        }
    }

    pub fn family(&self) -> TemplateFamily {
        match self {
            TemplateId::Backtracking => TemplateFamily::Backtracking,
            TemplateId::RecursiveTopDown | TemplateId::TreeGraph | TemplateId::DpState => {
                TemplateFamily::Recursive
            }
            _ => TemplateFamily::Standard,
        }
    }

    pub fn template(&self) -> Template {
        let (name, slots): (&'static str, &'static [SlotDef]) = match self {
            TemplateId::StandardFlow => ("Standard Algorithm Flow", &STANDARD_SLOTS),
            TemplateId::ArrayHashing => ("Array / Hashing Flow", &ARRAY_HASHING_SLOTS),
            TemplateId::TwoPointers => ("Two Pointers Flow", &TWO_POINTERS_SLOTS),
            TemplateId::SlidingWindow => ("Sliding Window Flow", &SLIDING_WINDOW_SLOTS),
            TemplateId::StackHeap => ("Stack / Heap Flow", &STACK_HEAP_SLOTS),
            TemplateId::BinarySearch => ("Binary Search Flow", &BINARY_SEARCH_SLOTS),
            TemplateId::LinkedList => ("Linked List Flow", &LINKED_LIST_SLOTS),
            TemplateId::IntervalGreedy => ("Intervals / Greedy Flow", &INTERVAL_GREEDY_SLOTS),
            TemplateId::Backtracking => ("Backtracking Flow", &BACKTRACKING_SLOTS),
            TemplateId::RecursiveTopDown => ("Recursive Top-down Flow", &RECURSIVE_SLOTS),
            TemplateId::TreeGraph => ("Tree / Graph Flow", &TREE_GRAPH_SLOTS),
            TemplateId::DpState => ("DP State Flow", &DP_STATE_SLOTS),
        };
        Template {
            id: *self,
            name,
            slots,
        }
    }

    /// Slot ids in canonical order
    pub fn slot_ids(&self) -> Vec<&'static str> {
        self.template().slots.iter().map(|s| s.id).collect()
    }

    pub fn has_slot(&self, slot_id: &str) -> bool {
        self.template().slots.iter().any(|s| s.id == slot_id)
    }

    /// Resolve a slot name that may be either this template's own slot id
    /// or one of its family's canonical roles.
    pub fn resolve_slot(&self, name: &str) -> Option<&'static str> {
        let slots = self.template().slots;
        if let Some(own) = slots.iter().find(|s| s.id == name) {
            return Some(own.id);
        }
        let roles: &[&str] = match self.family() {
            TemplateFamily::Standard => &STANDARD_ROLES,
            TemplateFamily::Recursive => &RECURSIVE_ROLES,
            // Backtracking slot ids are already the canonical roles
            TemplateFamily::Backtracking => return None,
        };
        roles
            .iter()
            .position(|role| *role == name)
            .map(|idx| slots[idx].id)
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_has_five_unique_slots() {
        for id in TemplateId::ALL {
            let slots = id.slot_ids();
            assert_eq!(slots.len(), 5, "{}", id);
            let mut dedup = slots.clone();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), 5, "{}", id);
        }
    }

    #[test]
    fn test_canonical_role_mapping() {
        assert_eq!(TemplateId::ArrayHashing.resolve_slot("setup"), Some("seed"));
        assert_eq!(TemplateId::ArrayHashing.resolve_slot("return"), Some("emit"));
        assert_eq!(TemplateId::SlidingWindow.resolve_slot("check"), Some("window-check"));
        assert_eq!(TemplateId::DpState.resolve_slot("combine"), Some("memoize"));
        assert_eq!(TemplateId::TreeGraph.resolve_slot("base"), Some("base-case"));
        assert_eq!(TemplateId::StandardFlow.resolve_slot("loop"), Some("loop"));
    }

    #[test]
    fn test_own_slot_and_unknown_slot() {
        assert_eq!(TemplateId::TwoPointers.resolve_slot("converge"), Some("converge"));
        assert_eq!(TemplateId::Backtracking.resolve_slot("explore"), Some("explore"));
        assert_eq!(TemplateId::Backtracking.resolve_slot("setup"), None);
        assert_eq!(TemplateId::StandardFlow.resolve_slot("base"), None);
    }

    #[test]
    fn test_serde_ids_match_as_str() {
        for id in TemplateId::ALL {
            let json = serde_json::to_value(id).unwrap();
            assert_eq!(json, serde_json::Value::String(id.as_str().to_string()));
        }
    }
}
