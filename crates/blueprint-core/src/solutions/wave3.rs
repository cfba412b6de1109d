//! Wave 3: linked lists, intervals and greedy scans.

use crate::comparators::OutputMode;
use crate::error::{SolveError, SolveResult};
use crate::ir::Op;
use crate::problem::Difficulty;
use crate::rng::VerifierRng;
use crate::strategy::input::CaseInput;
use crate::strategy::problem::{case, ProblemSpec, SpecDef};
use crate::strategy::reference_solution;
use crate::strategy::structures::{list_from_values, list_to_json, ListNode};
use crate::template::TemplateId;
use serde_json::{json, Value};
use std::collections::HashSet;

pub fn specs() -> Vec<ProblemSpec> {
    vec![
        reverse_linked_list(),
        linked_list_cycle(),
        merge_intervals(),
        maximum_subarray(),
        jump_game(),
    ]
}

// ==================== Reverse Linked List ====================

fn reverse_linked_list() -> ProblemSpec {
    SpecDef {
        problem_id: 18,
        name: "Reverse Linked List",
        pattern: "Linked List",
        difficulty: Difficulty::Easy,
        description: "Reverse a singly linked list and return the new head.",
        strategy_id: "reverse-list-iterative",
        template_id: TemplateId::LinkedList,
        complexity: ("O(n)", "O(1)"),
        output_mode: OutputMode::LinkedListEquivalent,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("anchors", "init-prev", "prev, curr = None, head", Op::Declare),
            ("walk", "while-curr", "while curr:", Op::Loop),
            ("guard", "save-next", "nxt = curr.next", Op::Compute),
            ("relink", "flip-pointer", "curr.next = prev", Op::Update),
            ("relink", "advance", "prev, curr = curr, nxt", Op::Update),
            ("emit", "ret-prev", "return prev", Op::Return),
        ],
        solve: SOLVE_REVERSE_LIST,
        oracle: reverse_list_oracle,
        factory: random_list,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"head": [1, 2, 3, 4, 5]}), json!([5, 4, 3, 2, 1])),
        case(json!({"head": [1, 2]}), json!([2, 1])),
        case(json!({"head": []}), json!([])),
    ])
}

reference_solution!(SOLVE_REVERSE_LIST, |input| {
    let mut curr: Option<Box<ListNode>> = list_from_values(&input.ints("head")?);
    let mut prev: Option<Box<ListNode>> = None;
    while let Some(mut node) = curr {
        curr = node.next.take();
        node.next = prev;
        prev = Some(node);
    }
    Ok(list_to_json(&prev))
});

fn reverse_list_oracle(input: &Value) -> SolveResult<Value> {
    let mut values = input.ints("head")?;
    values.reverse();
    Ok(json!(values))
}

fn random_list(rng: &mut VerifierRng) -> Value {
    let len = rng.len(0, 10);
    json!({"head": rng.ints(len, -9, 9)})
}

// ==================== Linked List Cycle ====================

fn linked_list_cycle() -> ProblemSpec {
    SpecDef {
        problem_id: 19,
        name: "Linked List Cycle",
        pattern: "Fast & Slow Pointers",
        difficulty: Difficulty::Easy,
        description: "Return true if the list has a cycle. `pos` is the index the tail links back to, or -1.",
        strategy_id: "list-cycle-floyd",
        template_id: TemplateId::LinkedList,
        complexity: ("O(n)", "O(1)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("anchors", "init-runners", "slow = fast = head", Op::Declare),
            ("walk", "while-fast", "while fast and fast.next:", Op::Loop),
            ("relink", "step-runners", "slow, fast = slow.next, fast.next.next", Op::Update),
            ("guard", "runners-meet", "if slow is fast: return True", Op::Branch),
            ("emit", "ret-acyclic", "return False", Op::Return),
        ],
        solve: SOLVE_LIST_CYCLE,
        oracle: list_cycle_oracle,
        factory: random_cycle_list,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"head": [3, 2, 0, -4], "pos": 1}), json!(true)),
        case(json!({"head": [1, 2], "pos": 0}), json!(true)),
        case(json!({"head": [1], "pos": -1}), json!(false)),
        case(json!({"head": [], "pos": -1}), json!(false)),
    ])
}

/// `next` index of every node; the tail links to `pos` when it is in range
fn successor_table(input: &Value) -> SolveResult<Vec<Option<usize>>> {
    let len = input.ints("head")?.len();
    let pos = input.int("pos")?;
    let cycle_to = usize::try_from(pos).ok().filter(|&p| p < len);
    if pos >= 0 && cycle_to.is_none() {
        return Err(SolveError::invalid("pos", "-1 or an index into head"));
    }
    Ok((0..len)
        .map(|i| if i + 1 < len { Some(i + 1) } else { cycle_to })
        .collect())
}

reference_solution!(SOLVE_LIST_CYCLE, |input| {
    let next = successor_table(input)?;
    let step = |node: Option<usize>| node.and_then(|i| next[i]);
    let head = if next.is_empty() { None } else { Some(0) };
    let (mut slow, mut fast) = (head, head);
    while fast.is_some() && step(fast).is_some() {
        slow = step(slow);
        fast = step(step(fast));
        if slow.is_some() && slow == fast {
            return Ok(json!(true));
        }
    }
    Ok(json!(false))
});

fn list_cycle_oracle(input: &Value) -> SolveResult<Value> {
    let next = successor_table(input)?;
    let mut visited = HashSet::new();
    let mut cursor = if next.is_empty() { None } else { Some(0) };
    while let Some(i) = cursor {
        if !visited.insert(i) {
            return Ok(json!(true));
        }
        cursor = next[i];
    }
    Ok(json!(false))
}

fn random_cycle_list(rng: &mut VerifierRng) -> Value {
    let len = rng.len(0, 10);
    let head = rng.ints(len, -5, 5);
    let pos = if len > 0 && rng.chance(0.5) {
        rng.int(0, len as i64 - 1)
    } else {
        -1
    };
    json!({"head": head, "pos": pos})
}

// ==================== Merge Intervals ====================

fn merge_intervals() -> ProblemSpec {
    SpecDef {
        problem_id: 20,
        name: "Merge Intervals",
        pattern: "Intervals",
        difficulty: Difficulty::Medium,
        description: "Merge all overlapping intervals and return the non-overlapping result sorted by start.",
        strategy_id: "merge-intervals-sweep",
        template_id: TemplateId::IntervalGreedy,
        complexity: ("O(n log n)", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("order", "sort-starts", "intervals.sort(key=lambda it: it[0]); merged = []", Op::Declare),
            ("sweep", "for-interval", "for start, end in intervals:", Op::Loop),
            ("overlap", "overlaps-last", "if merged and start <= merged[-1][1]:", Op::Branch),
            ("commit", "extend-last", "merged[-1][1] = max(merged[-1][1], end)", Op::Update),
            ("commit", "append-new", "else: merged.append([start, end])", Op::Update),
            ("emit", "ret-merged", "return merged", Op::Return),
        ],
        solve: SOLVE_MERGE_INTERVALS,
        oracle: merge_intervals_oracle,
        factory: random_intervals,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(
            json!({"intervals": [[1, 3], [2, 6], [8, 10], [15, 18]]}),
            json!([[1, 6], [8, 10], [15, 18]]),
        ),
        case(json!({"intervals": [[1, 4], [4, 5]]}), json!([[1, 5]])),
        case(json!({"intervals": [[1, 4], [0, 4]]}), json!([[0, 4]])),
    ])
}

fn read_intervals(input: &Value) -> SolveResult<Vec<(i64, i64)>> {
    input
        .int_grid("intervals")?
        .into_iter()
        .map(|pair| match pair.as_slice() {
            &[start, end] if start <= end => Ok((start, end)),
            _ => Err(SolveError::invalid("intervals", "[start, end] pairs with start <= end")),
        })
        .collect()
}

reference_solution!(SOLVE_MERGE_INTERVALS, |input| {
    let mut intervals = read_intervals(input)?;
    intervals.sort_unstable();
    let mut merged: Vec<(i64, i64)> = Vec::new();
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    Ok(json!(merged.iter().map(|&(s, e)| [s, e]).collect::<Vec<_>>()))
});

fn merge_intervals_oracle(input: &Value) -> SolveResult<Value> {
    let mut pending = read_intervals(input)?;
    // Merge any overlapping pair until nothing changes
    let mut changed = true;
    while changed {
        changed = false;
        'outer: for i in 0..pending.len() {
            for j in i + 1..pending.len() {
                let (a, b) = (pending[i], pending[j]);
                if a.0 <= b.1 && b.0 <= a.1 {
                    pending[i] = (a.0.min(b.0), a.1.max(b.1));
                    pending.swap_remove(j);
                    changed = true;
                    break 'outer;
                }
            }
        }
    }
    pending.sort_unstable();
    Ok(json!(pending.iter().map(|&(s, e)| [s, e]).collect::<Vec<_>>()))
}

fn random_intervals(rng: &mut VerifierRng) -> Value {
    let n = rng.len(1, 8);
    let intervals: Vec<[i64; 2]> = (0..n)
        .map(|_| {
            let start = rng.int(0, 20);
            [start, start + rng.int(0, 5)]
        })
        .collect();
    json!({"intervals": intervals})
}

// ==================== Maximum Subarray ====================

fn maximum_subarray() -> ProblemSpec {
    SpecDef {
        problem_id: 21,
        name: "Maximum Subarray",
        pattern: "Kadane's Algorithm",
        difficulty: Difficulty::Medium,
        description: "Return the largest sum of a non-empty contiguous subarray.",
        strategy_id: "maximum-subarray-kadane",
        template_id: TemplateId::IntervalGreedy,
        complexity: ("O(n)", "O(1)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("order", "init-best", "best = current = nums[0]", Op::Declare),
            ("sweep", "for-rest", "for value in nums[1:]:", Op::Loop),
            ("overlap", "extend-or-restart", "current = max(value, current + value)", Op::Compute),
            ("commit", "track-best", "best = max(best, current)", Op::Update),
            ("emit", "ret-best", "return best", Op::Return),
        ],
        solve: SOLVE_MAX_SUBARRAY,
        oracle: max_subarray_oracle,
        factory: random_signed,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [-2, 1, -3, 4, -1, 2, 1, -5, 4]}), json!(6)),
        case(json!({"nums": [1]}), json!(1)),
        case(json!({"nums": [5, 4, -1, 7, 8]}), json!(23)),
        case(json!({"nums": [-3, -1, -2]}), json!(-1)),
    ])
}

reference_solution!(SOLVE_MAX_SUBARRAY, |input| {
    let nums = input.ints("nums")?;
    let (&first, rest) = nums
        .split_first()
        .ok_or_else(|| SolveError::invalid("nums", "a non-empty integer array"))?;
    let (mut best, mut current) = (first, first);
    for &value in rest {
        current = value.max(current + value);
        best = best.max(current);
    }
    Ok(json!(best))
});

fn max_subarray_oracle(input: &Value) -> SolveResult<Value> {
    let nums = input.ints("nums")?;
    (0..nums.len())
        .flat_map(|i| (i + 1..=nums.len()).map(move |j| (i, j)))
        .map(|(i, j)| nums[i..j].iter().sum::<i64>())
        .max()
        .map(|best| json!(best))
        .ok_or_else(|| SolveError::invalid("nums", "a non-empty integer array"))
}

fn random_signed(rng: &mut VerifierRng) -> Value {
    let len = rng.len(1, 12);
    json!({"nums": rng.ints(len, -10, 10)})
}

// ==================== Jump Game ====================

fn jump_game() -> ProblemSpec {
    SpecDef {
        problem_id: 22,
        name: "Jump Game",
        pattern: "Greedy",
        difficulty: Difficulty::Medium,
        description: "Each element is the maximum jump length from that position. Return true if the last index is reachable.",
        strategy_id: "jump-game-reach",
        template_id: TemplateId::IntervalGreedy,
        complexity: ("O(n)", "O(1)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("order", "init-reach", "reach = 0", Op::Declare),
            ("sweep", "for-index", "for i, jump in enumerate(nums):", Op::Loop),
            ("overlap", "stranded", "if i > reach: return False", Op::Branch),
            ("commit", "extend-reach", "reach = max(reach, i + jump)", Op::Update),
            ("emit", "ret-reached", "return True", Op::Return),
        ],
        solve: SOLVE_JUMP_GAME,
        oracle: jump_game_oracle,
        factory: random_jumps,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [2, 3, 1, 1, 4]}), json!(true)),
        case(json!({"nums": [3, 2, 1, 0, 4]}), json!(false)),
        case(json!({"nums": [0]}), json!(true)),
    ])
}

reference_solution!(SOLVE_JUMP_GAME, |input| {
    let mut reach = 0i64;
    for (i, jump) in input.ints("nums")?.into_iter().enumerate() {
        let i = i as i64;
        if i > reach {
            return Ok(json!(false));
        }
        reach = reach.max(i + jump);
    }
    Ok(json!(true))
});

fn jump_game_oracle(input: &Value) -> SolveResult<Value> {
    let nums = input.ints("nums")?;
    if nums.is_empty() {
        return Ok(json!(true));
    }
    let mut reachable = vec![false; nums.len()];
    reachable[0] = true;
    for i in 0..nums.len() {
        if !reachable[i] {
            continue;
        }
        let furthest = (i as i64 + nums[i].max(0)).min(nums.len() as i64 - 1) as usize;
        for slot in reachable.iter_mut().take(furthest + 1).skip(i + 1) {
            *slot = true;
        }
    }
    Ok(json!(reachable[nums.len() - 1]))
}

fn random_jumps(rng: &mut VerifierRng) -> Value {
    let len = rng.len(1, 10);
    json!({"nums": rng.ints(len, 0, 3)})
}
