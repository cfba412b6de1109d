//! Wave 2: stacks, heaps and binary search.

use crate::comparators::OutputMode;
use crate::error::{SolveError, SolveResult};
use crate::ir::Op;
use crate::problem::Difficulty;
use crate::rng::VerifierRng;
use crate::strategy::input::CaseInput;
use crate::strategy::problem::{case, ProblemSpec, SpecDef};
use crate::strategy::reference_solution;
use crate::template::TemplateId;
use serde_json::{json, Value};
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

pub fn specs() -> Vec<ProblemSpec> {
    vec![
        valid_parentheses(),
        daily_temperatures(),
        binary_search(),
        find_min_rotated(),
        kth_largest(),
    ]
}

// ==================== Valid Parentheses ====================

fn valid_parentheses() -> ProblemSpec {
    SpecDef {
        problem_id: 13,
        name: "Valid Parentheses",
        pattern: "Stack",
        difficulty: Difficulty::Easy,
        description: "Return true if every bracket is closed by the same type in the correct order.",
        strategy_id: "valid-parentheses-stack",
        template_id: TemplateId::StackHeap,
        complexity: ("O(n)", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("init-structure", "init-stack", "stack = []", Op::Declare),
            ("init-structure", "init-pairs", "pairs = {')': '(', ']': '[', '}': '{'}", Op::Declare),
            ("iterate", "for-char", "for ch in s:", Op::Loop),
            ("push-pop", "push-open", "if ch not in pairs: stack.append(ch); continue", Op::Update),
            ("resolve", "match-close", "if not stack or stack.pop() != pairs[ch]: return False", Op::Branch),
            ("emit", "ret-empty", "return not stack", Op::Return),
        ],
        solve: SOLVE_VALID_PARENTHESES,
        oracle: valid_parentheses_oracle,
        factory: random_brackets,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"s": "()"}), json!(true)),
        case(json!({"s": "()[]{}"}), json!(true)),
        case(json!({"s": "(]"}), json!(false)),
        case(json!({"s": "([)]"}), json!(false)),
        case(json!({"s": "{[]}"}), json!(true)),
        case(json!({"s": "("}), json!(false)),
    ])
}

fn opener(close: char) -> Option<char> {
    match close {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

reference_solution!(SOLVE_VALID_PARENTHESES, |input| {
    let mut stack = Vec::new();
    for ch in input.text("s")?.chars() {
        match opener(ch) {
            None => stack.push(ch),
            Some(open) => {
                if stack.pop() != Some(open) {
                    return Ok(json!(false));
                }
            }
        }
    }
    Ok(json!(stack.is_empty()))
});

fn valid_parentheses_oracle(input: &Value) -> SolveResult<Value> {
    let mut s = input.text("s")?.to_string();
    loop {
        let reduced = s.replace("()", "").replace("[]", "").replace("{}", "");
        if reduced.len() == s.len() {
            return Ok(json!(s.is_empty()));
        }
        s = reduced;
    }
}

fn random_brackets(rng: &mut VerifierRng) -> Value {
    let s = if rng.chance(0.4) {
        // Build a balanced string so the true branch is exercised
        let mut out = String::new();
        let mut open = Vec::new();
        for _ in 0..rng.len(1, 10) {
            if !open.is_empty() && rng.chance(0.5) {
                if let Some(close) = open.pop() {
                    out.push(close);
                }
            } else {
                let (o, c) = [('(', ')'), ('[', ']'), ('{', '}')][rng.len(0, 2)];
                out.push(o);
                open.push(c);
            }
        }
        out.extend(open.into_iter().rev());
        out
    } else {
        rng.word_from("()[]{}", 0, 8)
    };
    json!({"s": s})
}

// ==================== Daily Temperatures ====================

fn daily_temperatures() -> ProblemSpec {
    SpecDef {
        problem_id: 14,
        name: "Daily Temperatures",
        pattern: "Monotonic Stack",
        difficulty: Difficulty::Medium,
        description: "For each day, return how many days until a warmer temperature, or 0 if none.",
        strategy_id: "daily-temperatures-monotonic-stack",
        template_id: TemplateId::StackHeap,
        complexity: ("O(n)", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("init-structure", "init-answer", "answer = [0] * len(temperatures)", Op::Declare),
            ("init-structure", "init-stack", "stack = []", Op::Declare),
            ("iterate", "for-day", "for day, temp in enumerate(temperatures):", Op::Loop),
            ("resolve", "pop-colder", "while stack and temperatures[stack[-1]] < temp:", Op::Loop),
            ("resolve", "write-wait", "prev = stack.pop(); answer[prev] = day - prev", Op::Update),
            ("push-pop", "push-day", "stack.append(day)", Op::Update),
            ("emit", "ret-answer", "return answer", Op::Return),
        ],
        solve: SOLVE_DAILY_TEMPERATURES,
        oracle: daily_temperatures_oracle,
        factory: random_temperatures,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(
            json!({"temperatures": [73, 74, 75, 71, 69, 72, 76, 73]}),
            json!([1, 1, 4, 2, 1, 1, 0, 0]),
        ),
        case(json!({"temperatures": [30, 40, 50, 60]}), json!([1, 1, 1, 0])),
        case(json!({"temperatures": [30, 60, 90]}), json!([1, 1, 0])),
    ])
}

reference_solution!(SOLVE_DAILY_TEMPERATURES, |input| {
    let temps = input.ints("temperatures")?;
    let mut answer = vec![0usize; temps.len()];
    let mut stack: Vec<usize> = Vec::new();
    for (day, &temp) in temps.iter().enumerate() {
        while let Some(&prev) = stack.last() {
            if temps[prev] >= temp {
                break;
            }
            stack.pop();
            answer[prev] = day - prev;
        }
        stack.push(day);
    }
    Ok(json!(answer))
});

fn daily_temperatures_oracle(input: &Value) -> SolveResult<Value> {
    let temps = input.ints("temperatures")?;
    let answer: Vec<usize> = (0..temps.len())
        .map(|i| {
            (i + 1..temps.len())
                .find(|&j| temps[j] > temps[i])
                .map_or(0, |j| j - i)
        })
        .collect();
    Ok(json!(answer))
}

fn random_temperatures(rng: &mut VerifierRng) -> Value {
    let len = rng.len(1, 12);
    json!({"temperatures": rng.ints(len, 30, 45)})
}

// ==================== Binary Search ====================

fn binary_search() -> ProblemSpec {
    SpecDef {
        problem_id: 15,
        name: "Binary Search",
        pattern: "Binary Search",
        difficulty: Difficulty::Easy,
        description: "Return the index of target in a sorted array of distinct integers, or -1.",
        strategy_id: "binary-search-halving",
        template_id: TemplateId::BinarySearch,
        complexity: ("O(log n)", "O(1)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("bounds", "init-bounds", "lo, hi = 0, len(nums) - 1", Op::Declare),
            ("halve", "while-range", "while lo <= hi:", Op::Loop),
            ("halve", "pick-mid", "mid = lo + (hi - lo) // 2", Op::Compute),
            ("mid-check", "mid-hit", "if nums[mid] == target: return mid", Op::Branch),
            ("move-bounds", "move-lo", "if nums[mid] < target: lo = mid + 1", Op::Update),
            ("move-bounds", "move-hi", "else: hi = mid - 1", Op::Update),
            ("emit", "ret-missing", "return -1", Op::Return),
        ],
        solve: SOLVE_BINARY_SEARCH,
        oracle: binary_search_oracle,
        factory: random_sorted_distinct,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [-1, 0, 3, 5, 9, 12], "target": 9}), json!(4)),
        case(json!({"nums": [-1, 0, 3, 5, 9, 12], "target": 2}), json!(-1)),
        case(json!({"nums": [5], "target": 5}), json!(0)),
        case(json!({"nums": [], "target": 1}), json!(-1)),
    ])
}

reference_solution!(SOLVE_BINARY_SEARCH, |input| {
    let nums = input.ints("nums")?;
    let target = input.int("target")?;
    // Half-open bounds keep the indices unsigned
    let (mut lo, mut hi) = (0usize, nums.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match nums[mid].cmp(&target) {
            std::cmp::Ordering::Equal => return Ok(json!(mid)),
            std::cmp::Ordering::Less => lo = mid + 1,
            std::cmp::Ordering::Greater => hi = mid,
        }
    }
    Ok(json!(-1))
});

fn binary_search_oracle(input: &Value) -> SolveResult<Value> {
    let nums = input.ints("nums")?;
    let target = input.int("target")?;
    Ok(match nums.iter().position(|&n| n == target) {
        Some(i) => json!(i),
        None => json!(-1),
    })
}

fn random_sorted_distinct(rng: &mut VerifierRng) -> Value {
    let len = rng.len(0, 12);
    let nums: BTreeSet<i64> = rng.ints(len, -30, 30).into_iter().collect();
    let nums: Vec<i64> = nums.into_iter().collect();
    let target = if !nums.is_empty() && rng.chance(0.6) {
        nums[rng.len(0, nums.len() - 1)]
    } else {
        rng.int(-32, 32)
    };
    json!({"nums": nums, "target": target})
}

// ==================== Find Minimum in Rotated Sorted Array ====================

fn find_min_rotated() -> ProblemSpec {
    SpecDef {
        problem_id: 16,
        name: "Find Minimum in Rotated Sorted Array",
        pattern: "Binary Search",
        difficulty: Difficulty::Medium,
        description: "Return the minimum of a rotated sorted array of distinct values in O(log n).",
        strategy_id: "rotated-minimum-binary-search",
        template_id: TemplateId::BinarySearch,
        complexity: ("O(log n)", "O(1)"),
        output_mode: OutputMode::Normalized,
        disallowed: &["min"],
        random_trials: 120,
        ir: &[
            ("bounds", "init-bounds", "lo, hi = 0, len(nums) - 1", Op::Declare),
            ("halve", "while-open", "while lo < hi:", Op::Loop),
            ("halve", "pick-mid", "mid = (lo + hi) // 2", Op::Compute),
            ("mid-check", "right-unsorted", "if nums[mid] > nums[hi]:", Op::Branch),
            ("move-bounds", "go-right", "lo = mid + 1", Op::Update),
            ("move-bounds", "keep-mid", "else: hi = mid", Op::Update),
            ("emit", "ret-min", "return nums[lo]", Op::Return),
        ],
        solve: SOLVE_FIND_MIN,
        oracle: find_min_oracle,
        factory: random_rotated,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [3, 4, 5, 1, 2]}), json!(1)),
        case(json!({"nums": [4, 5, 6, 7, 0, 1, 2]}), json!(0)),
        case(json!({"nums": [11, 13, 15, 17]}), json!(11)),
    ])
}

reference_solution!(SOLVE_FIND_MIN, |input| {
    let nums = input.ints("nums")?;
    if nums.is_empty() {
        return Err(SolveError::invalid("nums", "a non-empty integer array"));
    }
    let (mut lo, mut hi) = (0, nums.len() - 1);
    while lo < hi {
        let mid = (lo + hi) / 2;
        if nums[mid] > nums[hi] {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    Ok(json!(nums[lo]))
});

fn find_min_oracle(input: &Value) -> SolveResult<Value> {
    input
        .ints("nums")?
        .into_iter()
        .min()
        .map(|m| json!(m))
        .ok_or_else(|| SolveError::invalid("nums", "a non-empty integer array"))
}

fn random_rotated(rng: &mut VerifierRng) -> Value {
    let len = rng.len(1, 12);
    let sorted: BTreeSet<i64> = rng.ints(len, -40, 40).into_iter().collect();
    let mut nums: Vec<i64> = sorted.into_iter().collect();
    let pivot = rng.len(0, nums.len() - 1);
    nums.rotate_left(pivot);
    json!({"nums": nums})
}

// ==================== Kth Largest Element in an Array ====================

fn kth_largest() -> ProblemSpec {
    SpecDef {
        problem_id: 17,
        name: "Kth Largest Element in an Array",
        pattern: "Heap / Sorting",
        difficulty: Difficulty::Medium,
        description: "Return the kth largest element in the array, counting duplicates.",
        strategy_id: "kth-largest-min-heap",
        template_id: TemplateId::StackHeap,
        complexity: ("O(n log k)", "O(k)"),
        output_mode: OutputMode::Normalized,
        disallowed: &["sort"],
        random_trials: 120,
        ir: &[
            ("init-structure", "init-heap", "heap = []", Op::Declare),
            ("iterate", "for-num", "for value in nums:", Op::Loop),
            ("push-pop", "push-value", "heappush(heap, value)", Op::Update),
            ("resolve", "trim-heap", "if len(heap) > k: heappop(heap)", Op::Branch),
            ("emit", "ret-root", "return heap[0]", Op::Return),
        ],
        solve: SOLVE_KTH_LARGEST,
        oracle: kth_largest_oracle,
        factory: random_kth,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [3, 2, 1, 5, 6, 4], "k": 2}), json!(5)),
        case(json!({"nums": [3, 2, 3, 1, 2, 4, 5, 5, 6], "k": 4}), json!(4)),
        case(json!({"nums": [1], "k": 1}), json!(1)),
    ])
}

reference_solution!(SOLVE_KTH_LARGEST, |input| {
    let nums = input.ints("nums")?;
    let k = input.count("k")?;
    if k == 0 || k > nums.len() {
        return Err(SolveError::invalid("k", "an integer in 1..=len(nums)"));
    }
    let mut heap = BinaryHeap::with_capacity(k + 1);
    for value in nums {
        heap.push(Reverse(value));
        if heap.len() > k {
            heap.pop();
        }
    }
    heap.peek()
        .map(|Reverse(v)| json!(v))
        .ok_or_else(|| SolveError::Evaluation("heap unexpectedly empty".into()))
});

fn kth_largest_oracle(input: &Value) -> SolveResult<Value> {
    let mut nums = input.ints("nums")?;
    let k = input.count("k")?;
    nums.sort_unstable_by(|a, b| b.cmp(a));
    k.checked_sub(1)
        .and_then(|i| nums.get(i))
        .map(|v| json!(v))
        .ok_or_else(|| SolveError::invalid("k", "an integer in 1..=len(nums)"))
}

fn random_kth(rng: &mut VerifierRng) -> Value {
    let len = rng.len(1, 12);
    let nums = rng.ints(len, -10, 10);
    let k = rng.len(1, len);
    json!({"nums": nums, "k": k})
}
