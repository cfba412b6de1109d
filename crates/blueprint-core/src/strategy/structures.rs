//! Pointer structures used by list and tree reference solutions, with their
//! JSON encodings: `{val, next}` chains and `{val, left, right}` trees.

use serde_json::{json, Value};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode {
    pub val: i64,
    pub next: Option<Box<ListNode>>,
}

/// Build a list from values, head first
pub fn list_from_values(values: &[i64]) -> Option<Box<ListNode>> {
    let mut head = None;
    for &val in values.iter().rev() {
        head = Some(Box::new(ListNode { val, next: head }));
    }
    head
}

/// Encode as a nested `{val, next}` chain; an empty list is `null`
pub fn list_to_json(head: &Option<Box<ListNode>>) -> Value {
    let mut values = Vec::new();
    let mut cursor = head;
    while let Some(node) = cursor {
        values.push(node.val);
        cursor = &node.next;
    }
    values
        .into_iter()
        .rev()
        .fold(Value::Null, |next, val| json!({"val": val, "next": next}))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub val: i64,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(val: i64) -> Self {
        Self {
            val,
            left: None,
            right: None,
        }
    }
}

/// Decode a level-order encoding where `null` marks a missing child
pub fn tree_from_level_order(values: &[Option<i64>]) -> Option<Box<TreeNode>> {
    // Children are attached by walking a path of left/right turns from the
    // root, since boxed nodes cannot be queued while borrowed.
    let root_val = (*values.first()?)?;
    let mut root = Box::new(TreeNode::leaf(root_val));
    let mut queue: VecDeque<Vec<bool>> = VecDeque::from([Vec::new()]);
    let mut idx = 1;

    while let Some(path) = queue.pop_front() {
        if idx >= values.len() {
            break;
        }
        for go_right in [false, true] {
            let Some(slot) = values.get(idx) else {
                break;
            };
            idx += 1;
            if let Some(val) = *slot {
                if let Some(parent) = node_at(&mut root, &path) {
                    let child = Some(Box::new(TreeNode::leaf(val)));
                    if go_right {
                        parent.right = child;
                    } else {
                        parent.left = child;
                    }
                    let mut child_path = path.clone();
                    child_path.push(go_right);
                    queue.push_back(child_path);
                }
            }
        }
    }
    Some(root)
}

fn node_at<'a>(root: &'a mut TreeNode, path: &[bool]) -> Option<&'a mut TreeNode> {
    let mut node = root;
    for &go_right in path {
        node = if go_right {
            node.right.as_deref_mut()?
        } else {
            node.left.as_deref_mut()?
        };
    }
    Some(node)
}

/// Read a level-order array of integers and nulls
pub fn level_order_values(value: &Value) -> Option<Vec<Option<i64>>> {
    value
        .as_array()?
        .iter()
        .map(|v| match v {
            Value::Null => Some(None),
            other => other.as_i64().map(Some),
        })
        .collect()
}

/// Encode as nested `{val, left, right}`; an empty tree is `null`
pub fn tree_to_json(node: &Option<Box<TreeNode>>) -> Value {
    match node {
        None => Value::Null,
        Some(n) => json!({
            "val": n.val,
            "left": tree_to_json(&n.left),
            "right": tree_to_json(&n.right),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparators::{flatten_list, level_order};

    #[test]
    fn test_list_round_trip_shape() {
        let head = list_from_values(&[1, 2, 3]);
        let json = list_to_json(&head);
        assert_eq!(json["val"], 1);
        assert_eq!(json["next"]["next"]["val"], 3);
        assert_eq!(json["next"]["next"]["next"], Value::Null);
        assert_eq!(flatten_list(&json), Some(vec![json!(1), json!(2), json!(3)]));
        assert_eq!(list_to_json(&None), Value::Null);
    }

    #[test]
    fn test_tree_decode_with_gaps() {
        let values = level_order_values(&json!([1, null, 2, 3])).unwrap();
        let tree = tree_from_level_order(&values).unwrap();
        assert!(tree.left.is_none());
        let right = tree.right.as_ref().unwrap();
        assert_eq!(right.val, 2);
        assert_eq!(right.left.as_ref().map(|n| n.val), Some(3));
        assert_eq!(
            level_order(&tree_to_json(&Some(tree))),
            Some(vec![json!(1), Value::Null, json!(2), json!(3)])
        );
    }

    #[test]
    fn test_empty_tree() {
        assert!(tree_from_level_order(&[]).is_none());
        assert!(tree_from_level_order(&[None]).is_none());
        assert_eq!(tree_to_json(&None), Value::Null);
    }
}
