//! Wave 4: trees, tries and backtracking.

use crate::comparators::OutputMode;
use crate::error::{SolveError, SolveResult};
use crate::ir::Op;
use crate::problem::Difficulty;
use crate::rng::VerifierRng;
use crate::strategy::input::CaseInput;
use crate::strategy::problem::{case, ProblemSpec, SpecDef};
use crate::strategy::reference_solution;
use crate::strategy::structures::{
    level_order_values, tree_from_level_order, tree_to_json, TreeNode,
};
use crate::template::TemplateId;
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

pub fn specs() -> Vec<ProblemSpec> {
    vec![
        max_depth(),
        invert_tree(),
        level_order_traversal(),
        subsets(),
        implement_trie(),
    ]
}

fn read_tree(input: &Value) -> SolveResult<Option<Box<TreeNode>>> {
    let values = input
        .field("root")
        .map(level_order_values)?
        .ok_or_else(|| SolveError::invalid("root", "a level-order array of integers and nulls"))?;
    Ok(tree_from_level_order(&values))
}

/// Random level-order encoding; children of missing nodes are never emitted
fn random_level_order(rng: &mut VerifierRng) -> Value {
    let target = rng.len(0, 9);
    if target == 0 {
        return json!({"root": []});
    }
    let mut out: Vec<Value> = vec![json!(rng.int(-9, 9))];
    let mut open = 1;
    let mut nodes = 1;
    while open > 0 && nodes < target {
        open -= 1;
        for _ in 0..2 {
            if nodes < target && rng.chance(0.7) {
                out.push(json!(rng.int(-9, 9)));
                nodes += 1;
                open += 1;
            } else {
                out.push(Value::Null);
            }
        }
    }
    while out.last() == Some(&Value::Null) {
        out.pop();
    }
    json!({"root": out})
}

// ==================== Maximum Depth of Binary Tree ====================

fn max_depth() -> ProblemSpec {
    SpecDef {
        problem_id: 23,
        name: "Maximum Depth of Binary Tree",
        pattern: "DFS",
        difficulty: Difficulty::Easy,
        description: "Return the number of nodes along the longest root-to-leaf path.",
        strategy_id: "max-depth-recursive",
        template_id: TemplateId::TreeGraph,
        complexity: ("O(n)", "O(h)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "null-node", "if node is None: return 0", Op::Branch),
            ("choose", "pick-children", "children = [node.left, node.right]", Op::Declare),
            ("explore", "recurse-children", "depths = [depth(child) for child in children]", Op::Compute),
            ("combine", "ret-depth", "return 1 + max(depths)", Op::Return),
        ],
        solve: SOLVE_MAX_DEPTH,
        oracle: max_depth_oracle,
        factory: random_level_order,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"root": [3, 9, 20, null, null, 15, 7]}), json!(3)),
        case(json!({"root": [1, null, 2]}), json!(2)),
        case(json!({"root": []}), json!(0)),
    ])
}

fn depth(node: &Option<Box<TreeNode>>) -> usize {
    match node {
        None => 0,
        Some(n) => 1 + depth(&n.left).max(depth(&n.right)),
    }
}

reference_solution!(SOLVE_MAX_DEPTH, |input| {
    Ok(json!(depth(&read_tree(input)?)))
});

fn max_depth_oracle(input: &Value) -> SolveResult<Value> {
    let root = read_tree(input)?;
    let mut levels = 0;
    let mut frontier: Vec<&TreeNode> = root.as_deref().into_iter().collect();
    while !frontier.is_empty() {
        levels += 1;
        frontier = frontier
            .into_iter()
            .flat_map(|n| [n.left.as_deref(), n.right.as_deref()])
            .flatten()
            .collect();
    }
    Ok(json!(levels))
}

// ==================== Invert Binary Tree ====================

fn invert_tree() -> ProblemSpec {
    SpecDef {
        problem_id: 24,
        name: "Invert Binary Tree",
        pattern: "DFS",
        difficulty: Difficulty::Easy,
        description: "Mirror the tree by swapping every node's children and return its root.",
        strategy_id: "invert-tree-recursive",
        template_id: TemplateId::TreeGraph,
        complexity: ("O(n)", "O(h)"),
        output_mode: OutputMode::TreeStructureEquivalent,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "null-node", "if node is None: return None", Op::Branch),
            ("choose", "swap-children", "node.left, node.right = node.right, node.left", Op::Update),
            ("explore", "recurse-left", "invert(node.left)", Op::Step),
            ("explore", "recurse-right", "invert(node.right)", Op::Step),
            ("combine", "ret-node", "return node", Op::Return),
        ],
        solve: SOLVE_INVERT_TREE,
        oracle: invert_tree_oracle,
        factory: random_level_order,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"root": [4, 2, 7, 1, 3, 6, 9]}), json!([4, 7, 2, 9, 6, 3, 1])),
        case(json!({"root": [2, 1, 3]}), json!([2, 3, 1])),
        case(json!({"root": []}), json!([])),
    ])
}

fn invert(node: &mut Option<Box<TreeNode>>) {
    if let Some(n) = node {
        std::mem::swap(&mut n.left, &mut n.right);
        invert(&mut n.left);
        invert(&mut n.right);
    }
}

reference_solution!(SOLVE_INVERT_TREE, |input| {
    let mut root = read_tree(input)?;
    invert(&mut root);
    Ok(tree_to_json(&root))
});

/// Level order of the mirror: breadth-first, right child queued first
fn invert_tree_oracle(input: &Value) -> SolveResult<Value> {
    let root = read_tree(input)?;
    let mut out = Vec::new();
    let mut queue: VecDeque<Option<&TreeNode>> = VecDeque::from([root.as_deref()]);
    while let Some(slot) = queue.pop_front() {
        match slot {
            None => out.push(Value::Null),
            Some(node) => {
                out.push(json!(node.val));
                queue.push_back(node.right.as_deref());
                queue.push_back(node.left.as_deref());
            }
        }
    }
    while out.last() == Some(&Value::Null) {
        out.pop();
    }
    Ok(json!(out))
}

// ==================== Binary Tree Level Order Traversal ====================

fn level_order_traversal() -> ProblemSpec {
    SpecDef {
        problem_id: 25,
        name: "Binary Tree Level Order Traversal",
        pattern: "BFS",
        difficulty: Difficulty::Medium,
        description: "Return node values level by level, left to right.",
        strategy_id: "level-order-bfs",
        template_id: TemplateId::TreeGraph,
        complexity: ("O(n)", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "empty-tree", "if root is None: return []", Op::Branch),
            ("choose", "init-queue", "queue, levels = deque([root]), []", Op::Declare),
            ("explore", "while-queue", "while queue:", Op::Loop),
            ("explore", "drain-level", "level = [queue.popleft() for _ in range(len(queue))]", Op::Compute),
            ("constrain", "enqueue-children", "queue.extend(child for n in level for child in (n.left, n.right) if child)", Op::Update),
            ("combine", "record-level", "levels.append([n.val for n in level])", Op::Update),
            ("combine", "ret-levels", "return levels", Op::Return),
        ],
        solve: SOLVE_LEVEL_ORDER,
        oracle: level_order_oracle,
        factory: random_level_order,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(
            json!({"root": [3, 9, 20, null, null, 15, 7]}),
            json!([[3], [9, 20], [15, 7]]),
        ),
        case(json!({"root": [1]}), json!([[1]])),
        case(json!({"root": []}), json!([])),
    ])
}

reference_solution!(SOLVE_LEVEL_ORDER, |input| {
    let root = read_tree(input)?;
    let mut levels: Vec<Vec<i64>> = Vec::new();
    let mut queue: VecDeque<&TreeNode> = root.as_deref().into_iter().collect();
    while !queue.is_empty() {
        let mut level = Vec::with_capacity(queue.len());
        for _ in 0..queue.len() {
            let Some(node) = queue.pop_front() else {
                break;
            };
            level.push(node.val);
            queue.extend(node.left.as_deref());
            queue.extend(node.right.as_deref());
        }
        levels.push(level);
    }
    Ok(json!(levels))
});

fn collect_by_depth(node: &Option<Box<TreeNode>>, depth: usize, levels: &mut Vec<Vec<i64>>) {
    if let Some(n) = node {
        if levels.len() == depth {
            levels.push(Vec::new());
        }
        levels[depth].push(n.val);
        collect_by_depth(&n.left, depth + 1, levels);
        collect_by_depth(&n.right, depth + 1, levels);
    }
}

fn level_order_oracle(input: &Value) -> SolveResult<Value> {
    let mut levels = Vec::new();
    collect_by_depth(&read_tree(input)?, 0, &mut levels);
    Ok(json!(levels))
}

// ==================== Subsets ====================

fn subsets() -> ProblemSpec {
    SpecDef {
        problem_id: 26,
        name: "Subsets",
        pattern: "Backtracking",
        difficulty: Difficulty::Medium,
        description: "Return every subset of a set of distinct integers, in any order.",
        strategy_id: "subsets-backtracking",
        template_id: TemplateId::Backtracking,
        complexity: ("O(n * 2^n)", "O(n)"),
        output_mode: OutputMode::UnorderedNestedMembers,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "record-subset", "out.append(path[:])", Op::Update),
            ("choose", "for-next", "for i in range(start, len(nums)):", Op::Loop),
            ("constrain", "only-forward", "indices below start are already decided", Op::Step),
            ("explore", "take-recurse-undo", "path.append(nums[i]); backtrack(i + 1); path.pop()", Op::Step),
            ("return", "ret-all", "return out", Op::Return),
        ],
        solve: SOLVE_SUBSETS,
        oracle: subsets_oracle,
        factory: random_distinct_small,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(
            json!({"nums": [1, 2, 3]}),
            json!([[], [1], [2], [1, 2], [3], [1, 3], [2, 3], [1, 2, 3]]),
        ),
        case(json!({"nums": [0]}), json!([[], [0]])),
    ])
}

fn backtrack(nums: &[i64], start: usize, path: &mut Vec<i64>, out: &mut Vec<Vec<i64>>) {
    out.push(path.clone());
    for i in start..nums.len() {
        path.push(nums[i]);
        backtrack(nums, i + 1, path, out);
        path.pop();
    }
}

reference_solution!(SOLVE_SUBSETS, |input| {
    let nums = input.ints("nums")?;
    let mut out = Vec::new();
    backtrack(&nums, 0, &mut Vec::new(), &mut out);
    Ok(json!(out))
});

fn subsets_oracle(input: &Value) -> SolveResult<Value> {
    let nums = input.ints("nums")?;
    if nums.len() > 16 {
        return Err(SolveError::invalid("nums", "at most 16 values"));
    }
    let out: Vec<Vec<i64>> = (0u32..1 << nums.len())
        .map(|mask| {
            nums.iter()
                .enumerate()
                .filter(|&(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, &v)| v)
                .collect()
        })
        .collect();
    Ok(json!(out))
}

fn random_distinct_small(rng: &mut VerifierRng) -> Value {
    let len = rng.len(0, 6);
    let mut pool: Vec<i64> = (-8..=8).collect();
    rng.shuffle(&mut pool);
    pool.truncate(len);
    json!({"nums": pool})
}

// ==================== Implement Trie ====================

fn implement_trie() -> ProblemSpec {
    SpecDef {
        problem_id: 27,
        name: "Implement Trie (Prefix Tree)",
        pattern: "Trie",
        difficulty: Difficulty::Medium,
        description: "Support insert, search and startsWith over lowercase words. Each operation is answered in order, with null for insert.",
        strategy_id: "trie-children-map",
        template_id: TemplateId::TreeGraph,
        complexity: ("O(m) per operation", "O(total characters)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "init-root", "root = {}", Op::Declare),
            ("choose", "for-char", "for ch in word: node = node.setdefault(ch, {})", Op::Loop),
            ("constrain", "missing-child", "if ch not in node: return False", Op::Branch),
            ("explore", "mark-end", "node['$'] = True", Op::Update),
            ("combine", "ret-answer", "return '$' in node if exact else True", Op::Return),
        ],
        solve: SOLVE_TRIE,
        oracle: trie_oracle,
        factory: random_trie_ops,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(
            json!({
                "operations": ["insert", "search", "search", "startsWith", "insert", "search"],
                "arguments": ["apple", "apple", "app", "app", "app", "app"]
            }),
            json!([null, true, false, true, null, true]),
        ),
        case(
            json!({"operations": ["search", "startsWith"], "arguments": ["a", "a"]}),
            json!([false, false]),
        ),
    ])
}

#[derive(Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    end: bool,
}

impl TrieNode {
    fn insert(&mut self, word: &str) {
        let mut node = self;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.end = true;
    }

    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = self;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }
}

fn read_ops(input: &Value) -> SolveResult<Vec<(String, String)>> {
    let ops = input.strings("operations")?;
    let args = input.strings("arguments")?;
    if ops.len() != args.len() {
        return Err(SolveError::invalid("arguments", "one argument per operation"));
    }
    Ok(ops.into_iter().zip(args).collect())
}

fn unknown_op(op: &str) -> SolveError {
    SolveError::Evaluation(format!("unknown trie operation {:?}", op))
}

reference_solution!(SOLVE_TRIE, |input| {
    let mut root = TrieNode::default();
    let mut out = Vec::new();
    for (op, word) in read_ops(input)? {
        out.push(match op.as_str() {
            "insert" => {
                root.insert(&word);
                Value::Null
            }
            "search" => json!(root.find(&word).is_some_and(|n| n.end)),
            "startsWith" => json!(root.find(&word).is_some()),
            other => return Err(unknown_op(other)),
        });
    }
    Ok(Value::Array(out))
});

fn trie_oracle(input: &Value) -> SolveResult<Value> {
    let mut words: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for (op, word) in read_ops(input)? {
        out.push(match op.as_str() {
            "insert" => {
                words.insert(word);
                Value::Null
            }
            "search" => json!(words.contains(&word)),
            "startsWith" => json!(words.iter().any(|w| w.starts_with(word.as_str()))),
            other => return Err(unknown_op(other)),
        });
    }
    Ok(Value::Array(out))
}

fn random_trie_ops(rng: &mut VerifierRng) -> Value {
    let n = rng.len(1, 10);
    let mut inserted: BTreeSet<String> = BTreeSet::new();
    let mut operations = Vec::with_capacity(n);
    let mut arguments = Vec::with_capacity(n);
    for _ in 0..n {
        let op = ["insert", "search", "startsWith"][rng.len(0, 2)];
        // Reuse earlier words often so hits are as likely as misses
        let word = match inserted.iter().nth(rng.len(0, inserted.len().max(1) - 1)) {
            Some(known) if op != "insert" && rng.chance(0.5) => {
                let keep = rng.len(0, known.len());
                if op == "startsWith" {
                    known[..keep].to_string()
                } else {
                    known.clone()
                }
            }
            _ => rng.word_from("abc", 1, 4),
        };
        if op == "insert" {
            inserted.insert(word.clone());
        }
        operations.push(op);
        arguments.push(word);
    }
    json!({"operations": operations, "arguments": arguments})
}
