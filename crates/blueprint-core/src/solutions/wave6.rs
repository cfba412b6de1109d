//! Wave 6: dynamic programming, bit manipulation and matrices.

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
use std::collections::VecDeque;

pub fn specs() -> Vec<ProblemSpec> {
    vec![
        climbing_stairs(),
        coin_change(),
        longest_increasing_subsequence(),
        counting_bits(),
        rotate_image(),
    ]
}

// ==================== Climbing Stairs ====================

fn climbing_stairs() -> ProblemSpec {
    SpecDef {
        problem_id: 31,
        name: "Climbing Stairs",
        pattern: "Dynamic Programming",
        difficulty: Difficulty::Easy,
        description: "Count the distinct ways to climb n steps taking 1 or 2 steps at a time.",
        strategy_id: "climbing-stairs-rolling-dp",
        template_id: TemplateId::DpState,
        complexity: ("O(n)", "O(1)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "seed-ways", "prev, curr = 1, 1", Op::Declare),
            ("choose", "for-step", "for _ in range(2, n + 1):", Op::Loop),
            ("constrain", "small-n", "if n <= 1: return 1", Op::Branch),
            ("explore", "roll-forward", "prev, curr = curr, prev + curr", Op::Update),
            ("combine", "ret-ways", "return curr", Op::Return),
        ],
        solve: SOLVE_CLIMBING_STAIRS,
        oracle: climbing_stairs_oracle,
        factory: random_stairs,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"n": 2}), json!(2)),
        case(json!({"n": 3}), json!(3)),
        case(json!({"n": 5}), json!(8)),
        case(json!({"n": 1}), json!(1)),
    ])
}

reference_solution!(SOLVE_CLIMBING_STAIRS, |input| {
    let n = input.count("n")?;
    let (mut prev, mut curr) = (1u64, 1u64);
    for _ in 1..n {
        (prev, curr) = (curr, prev + curr);
    }
    Ok(json!(curr))
});

/// Sum over the number of double steps: C(n - k, k)
fn climbing_stairs_oracle(input: &Value) -> SolveResult<Value> {
    let n = input.count("n")? as u64;
    let binomial = |n: u64, k: u64| (0..k).fold(1u64, |acc, i| acc * (n - i) / (i + 1));
    let ways: u64 = (0..=n / 2).map(|k| binomial(n - k, k)).sum();
    Ok(json!(ways))
}

fn random_stairs(rng: &mut VerifierRng) -> Value {
    json!({"n": rng.len(1, 45)})
}

// ==================== Coin Change ====================

fn coin_change() -> ProblemSpec {
    SpecDef {
        problem_id: 32,
        name: "Coin Change",
        pattern: "Dynamic Programming",
        difficulty: Difficulty::Medium,
        description: "Return the fewest coins needed to make amount, or -1 if it cannot be made.",
        strategy_id: "coin-change-bottom-up",
        template_id: TemplateId::DpState,
        complexity: ("O(amount * coins)", "O(amount)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "seed-table", "dp = [0] + [inf] * amount", Op::Declare),
            ("choose", "for-total", "for total in range(1, amount + 1):", Op::Loop),
            ("constrain", "coin-fits", "for coin in coins: if coin <= total:", Op::Branch),
            ("explore", "relax", "dp[total] = min(dp[total], dp[total - coin] + 1)", Op::Update),
            ("combine", "ret-count", "return dp[amount] if dp[amount] != inf else -1", Op::Return),
        ],
        solve: SOLVE_COIN_CHANGE,
        oracle: coin_change_oracle,
        factory: random_coins,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"coins": [1, 2, 5], "amount": 11}), json!(3)),
        case(json!({"coins": [2], "amount": 3}), json!(-1)),
        case(json!({"coins": [1], "amount": 0}), json!(0)),
    ])
}

fn read_coins(input: &Value) -> SolveResult<(Vec<usize>, usize)> {
    let coins = input
        .ints("coins")?
        .into_iter()
        .map(|c| usize::try_from(c).ok().filter(|&c| c > 0))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| SolveError::invalid("coins", "positive integers"))?;
    Ok((coins, input.count("amount")?))
}

reference_solution!(SOLVE_COIN_CHANGE, |input| {
    let (coins, amount) = read_coins(input)?;
    let mut dp: Vec<Option<u32>> = vec![None; amount + 1];
    dp[0] = Some(0);
    for total in 1..=amount {
        dp[total] = coins
            .iter()
            .filter(|&&coin| coin <= total)
            .filter_map(|&coin| dp[total - coin])
            .min()
            .map(|fewest| fewest + 1);
    }
    Ok(match dp[amount] {
        Some(count) => json!(count),
        None => json!(-1),
    })
});

/// Breadth-first over running totals; the first level reaching `amount`
/// is the fewest coins.
fn coin_change_oracle(input: &Value) -> SolveResult<Value> {
    let (coins, amount) = read_coins(input)?;
    let mut seen = vec![false; amount + 1];
    let mut queue = VecDeque::from([(0usize, 0i64)]);
    seen[0] = true;
    while let Some((total, used)) = queue.pop_front() {
        if total == amount {
            return Ok(json!(used));
        }
        for &coin in &coins {
            let next = total + coin;
            if next <= amount && !seen[next] {
                seen[next] = true;
                queue.push_back((next, used + 1));
            }
        }
    }
    Ok(json!(-1))
}

fn random_coins(rng: &mut VerifierRng) -> Value {
    let count = rng.len(1, 4);
    let coins: Vec<i64> = (0..count).map(|_| rng.int(1, 12)).collect();
    json!({"coins": coins, "amount": rng.len(0, 40)})
}

// ==================== Longest Increasing Subsequence ====================

fn longest_increasing_subsequence() -> ProblemSpec {
    SpecDef {
        problem_id: 33,
        name: "Longest Increasing Subsequence",
        pattern: "DP + Binary Search (Patience Sorting)",
        difficulty: Difficulty::Medium,
        description: "Return the length of the longest strictly increasing subsequence.",
        strategy_id: "lis-patience-tails",
        template_id: TemplateId::DpState,
        complexity: ("O(n log n)", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "init-tails", "tails = []", Op::Declare),
            ("choose", "for-value", "for value in nums:", Op::Loop),
            ("constrain", "find-pile", "i = bisect_left(tails, value)", Op::Compute),
            ("explore", "place-value", "if i == len(tails): tails.append(value) else: tails[i] = value", Op::Update),
            ("combine", "ret-length", "return len(tails)", Op::Return),
        ],
        solve: SOLVE_LIS,
        oracle: lis_oracle,
        factory: random_sequence,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [10, 9, 2, 5, 3, 7, 101, 18]}), json!(4)),
        case(json!({"nums": [0, 1, 0, 3, 2, 3]}), json!(4)),
        case(json!({"nums": [7, 7, 7, 7]}), json!(1)),
        case(json!({"nums": []}), json!(0)),
    ])
}

reference_solution!(SOLVE_LIS, |input| {
    let mut tails: Vec<i64> = Vec::new();
    for value in input.ints("nums")? {
        let i = tails.partition_point(|&t| t < value);
        if i == tails.len() {
            tails.push(value);
        } else {
            tails[i] = value;
        }
    }
    Ok(json!(tails.len()))
});

fn lis_oracle(input: &Value) -> SolveResult<Value> {
    let nums = input.ints("nums")?;
    let mut best_ending = vec![1usize; nums.len()];
    for i in 0..nums.len() {
        for j in 0..i {
            if nums[j] < nums[i] {
                best_ending[i] = best_ending[i].max(best_ending[j] + 1);
            }
        }
    }
    Ok(json!(best_ending.into_iter().max().unwrap_or(0)))
}

fn random_sequence(rng: &mut VerifierRng) -> Value {
    let len = rng.len(0, 14);
    json!({"nums": rng.ints(len, -10, 10)})
}

// ==================== Counting Bits ====================

fn counting_bits() -> ProblemSpec {
    SpecDef {
        problem_id: 34,
        name: "Counting Bits",
        pattern: "Bit Manipulation",
        difficulty: Difficulty::Easy,
        description: "For every i in 0..=n return the number of 1 bits in i.",
        strategy_id: "counting-bits-dp",
        template_id: TemplateId::DpState,
        complexity: ("O(n)", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &["count_ones", "popcount", "bin("],
        random_trials: 120,
        ir: &[
            ("base", "seed-zero", "bits = [0] * (n + 1)", Op::Declare),
            ("choose", "for-i", "for i in range(1, n + 1):", Op::Loop),
            ("constrain", "drop-low-bit", "half = i >> 1", Op::Compute),
            ("explore", "reuse-half", "bits[i] = bits[half] + (i & 1)", Op::Update),
            ("combine", "ret-bits", "return bits", Op::Return),
        ],
        solve: SOLVE_COUNTING_BITS,
        oracle: counting_bits_oracle,
        factory: random_bit_limit,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"n": 2}), json!([0, 1, 1])),
        case(json!({"n": 5}), json!([0, 1, 1, 2, 1, 2])),
        case(json!({"n": 0}), json!([0])),
    ])
}

reference_solution!(SOLVE_COUNTING_BITS, |input| {
    let n = input.count("n")?;
    let mut bits = vec![0usize; n + 1];
    for i in 1..=n {
        bits[i] = bits[i >> 1] + (i & 1);
    }
    Ok(json!(bits))
});

fn counting_bits_oracle(input: &Value) -> SolveResult<Value> {
    let n = input.count("n")?;
    Ok(json!((0..=n).map(usize::count_ones).collect::<Vec<_>>()))
}

fn random_bit_limit(rng: &mut VerifierRng) -> Value {
    json!({"n": rng.len(0, 64)})
}

// ==================== Rotate Image ====================

fn rotate_image() -> ProblemSpec {
    SpecDef {
        problem_id: 35,
        name: "Rotate Image",
        pattern: "Matrix",
        difficulty: Difficulty::Medium,
        description: "Rotate an n x n matrix 90 degrees clockwise in place and return it.",
        strategy_id: "rotate-image-transpose-reverse",
        template_id: TemplateId::StandardFlow,
        complexity: ("O(n^2)", "O(1)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("setup", "size", "n = len(matrix)", Op::Declare),
            ("loop", "for-upper", "for i in range(n): for j in range(i + 1, n):", Op::Loop),
            ("update", "transpose", "matrix[i][j], matrix[j][i] = matrix[j][i], matrix[i][j]", Op::Update),
            ("check", "mirror-rows", "for row in matrix: row.reverse()", Op::Update),
            ("return", "ret-matrix", "return matrix", Op::Return),
        ],
        solve: SOLVE_ROTATE_IMAGE,
        oracle: rotate_image_oracle,
        factory: random_square,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(
            json!({"matrix": [[1, 2, 3], [4, 5, 6], [7, 8, 9]]}),
            json!([[7, 4, 1], [8, 5, 2], [9, 6, 3]]),
        ),
        case(
            json!({"matrix": [[5, 1, 9, 11], [2, 4, 8, 10], [13, 3, 6, 7], [15, 14, 12, 16]]}),
            json!([[15, 13, 2, 5], [14, 3, 4, 1], [12, 6, 8, 9], [16, 7, 10, 11]]),
        ),
        case(json!({"matrix": [[1]]}), json!([[1]])),
    ])
}

fn read_square(input: &Value) -> SolveResult<Vec<Vec<i64>>> {
    let matrix = input.int_grid("matrix")?;
    if matrix.iter().any(|row| row.len() != matrix.len()) {
        return Err(SolveError::invalid("matrix", "a square integer matrix"));
    }
    Ok(matrix)
}

reference_solution!(SOLVE_ROTATE_IMAGE, |input| {
    let mut matrix = read_square(input)?;
    let n = matrix.len();
    for i in 0..n {
        for j in i + 1..n {
            let upper = matrix[i][j];
            matrix[i][j] = matrix[j][i];
            matrix[j][i] = upper;
        }
    }
    for row in &mut matrix {
        row.reverse();
    }
    Ok(json!(matrix))
});

fn rotate_image_oracle(input: &Value) -> SolveResult<Value> {
    let m = read_square(input)?;
    let n = m.len();
    let rotated: Vec<Vec<i64>> = (0..n)
        .map(|i| (0..n).map(|j| m[n - 1 - j][i]).collect())
        .collect();
    Ok(json!(rotated))
}

fn random_square(rng: &mut VerifierRng) -> Value {
    let n = rng.len(1, 5);
    let matrix: Vec<Vec<i64>> = (0..n).map(|_| rng.ints(n, -9, 9)).collect();
    json!({"matrix": matrix})
}
