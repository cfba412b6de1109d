//! Output-equivalence checks.
//!
//! Many algorithm answers have more than one valid representation, so each
//! contract names the comparator its cases are judged with.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

/// Canonicalizer applied to both sides before structural comparison
pub type Normalizer = fn(&Value) -> Value;

/// Equivalence rule used to compare a solution's output with the expected one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Multiset equality of a flat list
    UnorderedNumberMembers,
    /// Group order and member order within groups are irrelevant
    UnorderedNestedMembers,
    /// List of triplets, order-insensitive at both levels
    UnorderedTriplets,
    /// Pointer chain and flat sequence compare equal
    LinkedListEquivalent,
    /// Pointer tree and level-order encoding compare equal
    TreeStructureEquivalent,
    /// Any order respecting the input's precedence edges
    TopologicalOrder,
    /// Structural equality, through the plan's normalizer when it has one
    Normalized,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::UnorderedNumberMembers => "unordered-number-members",
            OutputMode::UnorderedNestedMembers => "unordered-nested-members",
            OutputMode::UnorderedTriplets => "unordered-triplets",
            OutputMode::LinkedListEquivalent => "linked-list-equivalent",
            OutputMode::TreeStructureEquivalent => "tree-structure-equivalent",
            OutputMode::TopologicalOrder => "topological-order",
            OutputMode::Normalized => "normalized",
        }
    }
}

/// Compare `got` against `expected` under `mode`.
///
/// `None` behaves like [`OutputMode::Normalized`]: the normalizer if one is
/// given, plain structural equality otherwise.
pub fn compare_by_output_mode(
    mode: Option<OutputMode>,
    input: &Value,
    got: &Value,
    expected: &Value,
    normalize: Option<Normalizer>,
) -> bool {
    match mode {
        Some(OutputMode::UnorderedNumberMembers) => same_members(got, expected),
        Some(OutputMode::UnorderedNestedMembers) | Some(OutputMode::UnorderedTriplets) => {
            both_equal(canonical_groups(got), canonical_groups(expected))
        }
        Some(OutputMode::LinkedListEquivalent) => {
            both_equal(flatten_list(got), flatten_list(expected))
        }
        Some(OutputMode::TreeStructureEquivalent) => {
            both_equal(level_order(got), level_order(expected))
        }
        Some(OutputMode::TopologicalOrder) => is_valid_topological_order(input, got),
        Some(OutputMode::Normalized) | None => match normalize {
            Some(f) => f(got) == f(expected),
            None => got == expected,
        },
    }
}

/// Total order over JSON values: by kind first, then by content.
/// Numbers compare numerically regardless of their integer/float encoding.
pub fn cmp_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = cmp_values(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => {
            // serde_json maps iterate in key order
            let xs: Vec<(&String, &Value)> = x.iter().collect();
            let ys: Vec<(&String, &Value)> = y.iter().collect();
            for ((kx, vx), (ky, vy)) in xs.iter().zip(ys.iter()) {
                let ord = kx.cmp(ky).then_with(|| cmp_values(vx, vy));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            xs.len().cmp(&ys.len())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn as_items(value: &Value) -> Option<&[Value]> {
    value.as_array().map(Vec::as_slice)
}

fn sorted(items: &[Value]) -> Vec<Value> {
    let mut items = items.to_vec();
    items.sort_by(cmp_values);
    items
}

fn numerically_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| cmp_values(x, y) == Ordering::Equal)
}

/// Both sides normalized and equal. A side that fails to normalize never
/// matches, not even another malformed side.
fn both_equal<T: PartialEq>(got: Option<T>, expected: Option<T>) -> bool {
    matches!((got, expected), (Some(g), Some(e)) if g == e)
}

/// Multiset equality of two flat lists; anything but two arrays mismatches
pub fn same_members(got: &Value, expected: &Value) -> bool {
    match (as_items(got), as_items(expected)) {
        (Some(g), Some(e)) => numerically_equal(&sorted(g), &sorted(e)),
        _ => false,
    }
}

/// Sort every inner group, then sort the outer list lexicographically.
/// `None` unless the value is an array of arrays.
pub fn canonical_groups(value: &Value) -> Option<Vec<Vec<Value>>> {
    let mut groups = as_items(value)?
        .iter()
        .map(|group| as_items(group).map(sorted))
        .collect::<Option<Vec<_>>>()?;
    groups.sort_by(|a, b| {
        a.iter()
            .zip(b)
            .map(|(x, y)| cmp_values(x, y))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    });
    Some(groups)
}

fn node_value(node: &serde_json::Map<String, Value>) -> Option<Value> {
    node.get("val").or_else(|| node.get("value")).cloned()
}

/// Flatten a `{val, next}` chain or an already-flat list into a sequence.
/// `None` for scalars, nodes without a value, a `next` that is neither a
/// node nor null, and chains longer than 10 000 nodes.
pub fn flatten_list(value: &Value) -> Option<Vec<Value>> {
    const MAX_NODES: usize = 10_000;

    match value {
        Value::Null => Some(Vec::new()),
        Value::Array(items) => Some(items.clone()),
        Value::Object(_) => {
            let mut out = Vec::new();
            let mut cursor = value;
            loop {
                match cursor {
                    Value::Null => return Some(out),
                    Value::Object(node) if out.len() < MAX_NODES => {
                        out.push(node_value(node)?);
                        cursor = node.get("next").unwrap_or(&Value::Null);
                    }
                    _ => return None,
                }
            }
        }
        _ => None,
    }
}

/// Level-order encoding of a `{val, left, right}` tree or a flat list,
/// with trailing nulls trimmed. `None` for scalars and for nodes whose
/// value or children are malformed.
pub fn level_order(value: &Value) -> Option<Vec<Value>> {
    let mut out = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.clone(),
        Value::Object(_) => {
            let mut out = Vec::new();
            let mut queue = VecDeque::from([value]);
            while let Some(node) = queue.pop_front() {
                match node {
                    Value::Null => out.push(Value::Null),
                    Value::Object(fields) => {
                        out.push(node_value(fields)?);
                        queue.push_back(fields.get("left").unwrap_or(&Value::Null));
                        queue.push_back(fields.get("right").unwrap_or(&Value::Null));
                    }
                    _ => return None,
                }
            }
            out
        }
        _ => return None,
    };
    while out.last() == Some(&Value::Null) {
        out.pop();
    }
    Some(out)
}

/// Edge list of a precedence input, `[node, prerequisite]` pairs read from
/// either `edges` or `prerequisites`.
pub fn precedence_edges(input: &Value) -> Vec<(i64, i64)> {
    let list = input
        .get("edges")
        .or_else(|| input.get("prerequisites"))
        .and_then(Value::as_array);
    let Some(list) = list else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|edge| {
            let pair = edge.as_array()?;
            Some((pair.first()?.as_i64()?, pair.get(1)?.as_i64()?))
        })
        .collect()
}

/// True when `order` lists every node `0..numCourses` exactly once and
/// places each prerequisite before its dependent.
pub fn is_valid_topological_order(input: &Value, order: &Value) -> bool {
    let nodes = input
        .get("numCourses")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let Some(list) = as_items(order) else {
        return false;
    };
    if nodes <= 0 {
        return list.is_empty();
    }
    if list.len() as i64 != nodes {
        return false;
    }

    let mut position: HashMap<i64, usize> = HashMap::new();
    for (idx, item) in list.iter().enumerate() {
        match item.as_i64() {
            Some(n) if (0..nodes).contains(&n) && !position.contains_key(&n) => {
                position.insert(n, idx);
            }
            _ => return false,
        }
    }

    precedence_edges(input).into_iter().all(|(node, prereq)| {
        match (position.get(&node), position.get(&prereq)) {
            (Some(n), Some(p)) => p < n,
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cmp(mode: OutputMode, input: Value, got: Value, expected: Value) -> bool {
        compare_by_output_mode(Some(mode), &input, &got, &expected, None)
    }

    #[test]
    fn test_unordered_triplets() {
        assert!(cmp(
            OutputMode::UnorderedTriplets,
            Value::Null,
            json!([[2, -1, -1]]),
            json!([[-1, -1, 2]])
        ));
        assert!(cmp(
            OutputMode::UnorderedTriplets,
            Value::Null,
            json!([[0, 1, -1], [2, -1, -1]]),
            json!([[-1, -1, 2], [-1, 0, 1]])
        ));
        assert!(!cmp(
            OutputMode::UnorderedTriplets,
            Value::Null,
            json!([[0, 1, -1]]),
            json!([[-1, -1, 2]])
        ));
    }

    #[test]
    fn test_topological_order() {
        let input = json!({"numCourses": 4, "edges": [[1, 0], [2, 0], [3, 1], [3, 2]]});
        assert!(cmp(OutputMode::TopologicalOrder, input.clone(), json!([0, 1, 2, 3]), Value::Null));
        assert!(cmp(OutputMode::TopologicalOrder, input.clone(), json!([0, 2, 1, 3]), Value::Null));
        assert!(!cmp(OutputMode::TopologicalOrder, input, json!([1, 0, 2, 3]), Value::Null));
    }

    #[test]
    fn test_topological_order_rejects_duplicates_and_short_lists() {
        let input = json!({"numCourses": 3, "prerequisites": [[1, 0], [2, 1]]});
        assert!(is_valid_topological_order(&input, &json!([0, 1, 2])));
        assert!(!is_valid_topological_order(&input, &json!([0, 1, 1])));
        assert!(!is_valid_topological_order(&input, &json!([0, 1])));
        assert!(!is_valid_topological_order(&input, &json!([0, 1, 3])));
    }

    #[test]
    fn test_topological_order_empty_graph() {
        let input = json!({"numCourses": 0, "edges": []});
        assert!(is_valid_topological_order(&input, &json!([])));
        assert!(!is_valid_topological_order(&input, &json!([0])));
    }

    #[test]
    fn test_number_members() {
        assert!(cmp(OutputMode::UnorderedNumberMembers, Value::Null, json!([3, 1, 2]), json!([1, 2, 3])));
        assert!(!cmp(OutputMode::UnorderedNumberMembers, Value::Null, json!([1, 1, 2]), json!([1, 2, 2])));
    }

    #[test]
    fn test_nested_members() {
        assert!(cmp(
            OutputMode::UnorderedNestedMembers,
            Value::Null,
            json!([["tan", "nat"], ["bat"]]),
            json!([["bat"], ["nat", "tan"]])
        ));
        assert!(!cmp(
            OutputMode::UnorderedNestedMembers,
            Value::Null,
            json!([["tan"], ["nat", "bat"]]),
            json!([["bat"], ["nat", "tan"]])
        ));
    }

    #[test]
    fn test_linked_list_equivalence() {
        let chain = json!({"val": 1, "next": {"val": 2, "next": {"val": 3, "next": null}}});
        assert!(cmp(OutputMode::LinkedListEquivalent, Value::Null, chain, json!([1, 2, 3])));

        let truncated = json!({"val": 1, "next": {"val": 2, "next": null}});
        assert!(!cmp(OutputMode::LinkedListEquivalent, Value::Null, truncated, json!([1, 2, 3])));
        assert!(cmp(OutputMode::LinkedListEquivalent, Value::Null, Value::Null, json!([])));
    }

    #[test]
    fn test_tree_equivalence() {
        let tree = json!({
            "val": 1,
            "left": {"val": 2, "left": null, "right": null},
            "right": {"val": 3, "left": null, "right": null}
        });
        assert!(cmp(OutputMode::TreeStructureEquivalent, Value::Null, tree, json!([1, 2, 3])));

        let skewed = json!({"val": 1, "left": null, "right": {"val": 2, "left": null, "right": null}});
        assert!(!cmp(OutputMode::TreeStructureEquivalent, Value::Null, skewed.clone(), json!([1, 2])));
        assert!(cmp(OutputMode::TreeStructureEquivalent, Value::Null, skewed, json!([1, null, 2, null])));
    }

    #[test]
    fn test_wrong_typed_output_never_matches() {
        let unordered = [
            OutputMode::UnorderedNumberMembers,
            OutputMode::UnorderedNestedMembers,
            OutputMode::UnorderedTriplets,
        ];
        for mode in unordered {
            for got in [json!(42), json!("oops"), json!({"a": 1}), Value::Null] {
                assert!(!cmp(mode, Value::Null, got.clone(), json!([])), "{:?} {}", mode, got);
            }
        }
        assert!(!cmp(OutputMode::UnorderedNumberMembers, Value::Null, json!(7), json!([7])));
    }

    #[test]
    fn test_scalar_group_is_not_an_empty_group() {
        assert!(!cmp(
            OutputMode::UnorderedTriplets,
            Value::Null,
            json!([5, [-1, 0, 1]]),
            json!([[], [-1, 0, 1]])
        ));
        assert!(!cmp(
            OutputMode::UnorderedNestedMembers,
            Value::Null,
            json!(["eat"]),
            json!([["eat"]])
        ));
        assert_eq!(canonical_groups(&json!([[1], "x"])), None);
    }

    #[test]
    fn test_scalars_are_not_lists_or_trees() {
        for got in [json!(3), json!("3"), json!(true)] {
            assert!(!cmp(OutputMode::LinkedListEquivalent, Value::Null, got.clone(), json!([3])));
            assert!(!cmp(OutputMode::TreeStructureEquivalent, Value::Null, got, json!([3])));
        }
        assert_eq!(flatten_list(&json!({"val": 1, "next": 2})), None);
        assert_eq!(flatten_list(&json!({"next": null})), None);
        assert_eq!(level_order(&json!({"val": 1, "left": 2, "right": null})), None);
        assert!(!is_valid_topological_order(&json!({"numCourses": 0}), &json!("")));
    }

    #[test]
    fn test_malformed_sides_do_not_match_each_other() {
        assert!(!cmp(OutputMode::UnorderedTriplets, Value::Null, json!(1), json!(1)));
        assert!(!cmp(OutputMode::LinkedListEquivalent, Value::Null, json!("a"), json!("a")));
    }

    #[test]
    fn test_default_uses_normalizer() {
        fn lower(v: &Value) -> Value {
            Value::String(v.as_str().unwrap_or_default().to_lowercase())
        }
        let got = json!("ABC");
        let expected = json!("abc");
        assert!(!compare_by_output_mode(None, &Value::Null, &got, &expected, None));
        assert!(compare_by_output_mode(None, &Value::Null, &got, &expected, Some(lower)));
        assert!(compare_by_output_mode(
            Some(OutputMode::Normalized),
            &Value::Null,
            &got,
            &expected,
            Some(lower)
        ));
    }

    #[test]
    fn test_mode_wire_names() {
        let mode: OutputMode = serde_json::from_value(json!("unordered-triplets")).unwrap();
        assert_eq!(mode, OutputMode::UnorderedTriplets);
        assert_eq!(
            serde_json::to_value(OutputMode::TopologicalOrder).unwrap(),
            json!(OutputMode::TopologicalOrder.as_str())
        );
    }
}
