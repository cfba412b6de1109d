//! Wave 1: arrays, hashing, two pointers, sliding window.

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
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub fn specs() -> Vec<ProblemSpec> {
    vec![
        two_sum(),
        valid_anagram(),
        contains_duplicate(),
        group_anagrams(),
        top_k_frequent(),
        product_except_self(),
        encode_decode_strings(),
        longest_consecutive(),
        valid_palindrome(),
        three_sum(),
        longest_substring(),
        longest_palindromic_substring(),
    ]
}

// ==================== Two Sum ====================

fn two_sum() -> ProblemSpec {
    SpecDef {
        problem_id: 1,
        name: "Two Sum",
        pattern: "Hash Map",
        difficulty: Difficulty::Easy,
        description: "Return indices of the two numbers that add up to target. Each input has at most one answer.",
        strategy_id: "two-sum-hash-map",
        template_id: TemplateId::ArrayHashing,
        complexity: ("O(n)", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("setup", "init-index-map", "index_by_value = {}", Op::Declare),
            ("loop", "for-i", "for i, num in enumerate(nums):", Op::Loop),
            ("check", "need-target", "need = target - num", Op::Compute),
            ("check", "found-match", "if need in index_by_value: return [index_by_value[need], i]", Op::Branch),
            ("update", "save-index", "index_by_value[num] = i", Op::Update),
            ("return", "ret-not-found", "return None", Op::Return),
        ],
        solve: SOLVE_TWO_SUM,
        oracle: two_sum_oracle,
        factory: random_two_sum,
        normalize: None,
        assert_case: Some(valid_two_sum),
    }
    .with_cases(vec![
        case(json!({"nums": [2, 7, 11, 15], "target": 9}), json!([0, 1])),
        case(json!({"nums": [3, 2, 4], "target": 6}), json!([1, 2])),
        case(json!({"nums": [3, 3], "target": 6}), json!([0, 1])),
        case(json!({"nums": [-1, -2, -3, -4, -5], "target": -8}), json!([2, 4])),
    ])
}

reference_solution!(SOLVE_TWO_SUM, |input| {
    let nums = input.ints("nums")?;
    let target = input.int("target")?;
    let mut index_by_value: HashMap<i64, usize> = HashMap::new();
    for (i, &num) in nums.iter().enumerate() {
        if let Some(&j) = index_by_value.get(&(target - num)) {
            return Ok(json!([j, i]));
        }
        index_by_value.insert(num, i);
    }
    Ok(Value::Null)
});

fn two_sum_oracle(input: &Value) -> SolveResult<Value> {
    let nums = input.ints("nums")?;
    let target = input.int("target")?;
    for i in 0..nums.len() {
        for j in i + 1..nums.len() {
            if nums[i] + nums[j] == target {
                return Ok(json!([i, j]));
            }
        }
    }
    Ok(Value::Null)
}

/// Any pair of distinct in-range indices hitting the target is accepted
fn valid_two_sum(input: &Value, got: &Value, expected: &Value) -> bool {
    if expected.is_null() {
        return got.is_null();
    }
    let (Ok(nums), Ok(target)) = (input.ints("nums"), input.int("target")) else {
        return false;
    };
    let indices: Option<Vec<usize>> = got
        .as_array()
        .map(|pair| pair.iter().filter_map(|v| v.as_u64()).map(|n| n as usize).collect());
    match indices.as_deref() {
        Some(&[i, j]) => i != j && i < nums.len() && j < nums.len() && nums[i] + nums[j] == target,
        _ => false,
    }
}

fn random_two_sum(rng: &mut VerifierRng) -> Value {
    let len = rng.len(2, 10);
    let nums = rng.ints(len, -20, 20);
    let i = rng.len(0, len - 2);
    let j = rng.len(i + 1, len - 1);
    json!({"nums": nums, "target": nums[i] + nums[j]})
}

// ==================== Valid Anagram ====================

fn valid_anagram() -> ProblemSpec {
    SpecDef {
        problem_id: 2,
        name: "Valid Anagram",
        pattern: "Hash Map",
        difficulty: Difficulty::Easy,
        description: "Return true if t is an anagram of s.",
        strategy_id: "valid-anagram-frequency",
        template_id: TemplateId::ArrayHashing,
        complexity: ("O(n)", "O(k)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("check", "len-check", "if len(s) != len(t): return False", Op::Branch),
            ("setup", "init-freq", "freq = {}", Op::Declare),
            ("loop", "for-s", "for ch in s:", Op::Loop),
            ("update", "inc-freq", "freq[ch] = freq.get(ch, 0) + 1", Op::Update),
            ("loop", "for-t", "for ch in t:", Op::Loop),
            ("update", "dec-freq", "freq[ch] = freq.get(ch, 0) - 1", Op::Update),
            ("check", "negative-count", "if freq[ch] < 0: return False", Op::Branch),
            ("return", "ret-true", "return True", Op::Return),
        ],
        solve: SOLVE_VALID_ANAGRAM,
        oracle: valid_anagram_oracle,
        factory: random_anagram_pair,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"s": "anagram", "t": "nagaram"}), json!(true)),
        case(json!({"s": "rat", "t": "car"}), json!(false)),
        case(json!({"s": "a", "t": "ab"}), json!(false)),
        case(json!({"s": "", "t": ""}), json!(true)),
    ])
}

reference_solution!(SOLVE_VALID_ANAGRAM, |input| {
    let s = input.text("s")?;
    let t = input.text("t")?;
    if s.chars().count() != t.chars().count() {
        return Ok(json!(false));
    }
    let mut freq: HashMap<char, i64> = HashMap::new();
    for ch in s.chars() {
        *freq.entry(ch).or_insert(0) += 1;
    }
    for ch in t.chars() {
        let count = freq.entry(ch).or_insert(0);
        *count -= 1;
        if *count < 0 {
            return Ok(json!(false));
        }
    }
    Ok(json!(true))
});

fn valid_anagram_oracle(input: &Value) -> SolveResult<Value> {
    let mut s: Vec<char> = input.text("s")?.chars().collect();
    let mut t: Vec<char> = input.text("t")?.chars().collect();
    s.sort_unstable();
    t.sort_unstable();
    Ok(json!(s == t))
}

fn random_anagram_pair(rng: &mut VerifierRng) -> Value {
    let s = rng.word(0, 6);
    let t = if rng.chance(0.5) {
        let mut chars: Vec<char> = s.chars().collect();
        rng.shuffle(&mut chars);
        chars.into_iter().collect()
    } else {
        rng.word(0, 6)
    };
    json!({"s": s, "t": t})
}

// ==================== Contains Duplicate ====================

fn contains_duplicate() -> ProblemSpec {
    SpecDef {
        problem_id: 3,
        name: "Contains Duplicate",
        pattern: "Hash Set",
        difficulty: Difficulty::Easy,
        description: "Return true if any value appears at least twice in the array.",
        strategy_id: "contains-duplicate-set",
        template_id: TemplateId::ArrayHashing,
        complexity: ("O(n)", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("setup", "init-seen", "seen = set()", Op::Declare),
            ("loop", "for-num", "for value in nums:", Op::Loop),
            ("check", "seen-before", "if value in seen: return True", Op::Branch),
            ("update", "add-seen", "seen.add(value)", Op::Update),
            ("return", "ret-false", "return False", Op::Return),
        ],
        solve: SOLVE_CONTAINS_DUPLICATE,
        oracle: contains_duplicate_oracle,
        factory: random_small_ints,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [1, 2, 3, 1]}), json!(true)),
        case(json!({"nums": [1, 2, 3, 4]}), json!(false)),
        case(json!({"nums": [1, 1, 1, 3, 3, 4, 3, 2, 4, 2]}), json!(true)),
        case(json!({"nums": []}), json!(false)),
    ])
}

reference_solution!(SOLVE_CONTAINS_DUPLICATE, |input| {
    let mut seen = HashSet::new();
    for value in input.ints("nums")? {
        if !seen.insert(value) {
            return Ok(json!(true));
        }
    }
    Ok(json!(false))
});

fn contains_duplicate_oracle(input: &Value) -> SolveResult<Value> {
    let mut nums = input.ints("nums")?;
    nums.sort_unstable();
    Ok(json!(nums.windows(2).any(|w| w[0] == w[1])))
}

fn random_small_ints(rng: &mut VerifierRng) -> Value {
    let len = rng.len(0, 10);
    json!({"nums": rng.ints(len, 0, 15)})
}

// ==================== Group Anagrams ====================

fn group_anagrams() -> ProblemSpec {
    SpecDef {
        problem_id: 4,
        name: "Group Anagrams",
        pattern: "Hash Map",
        difficulty: Difficulty::Medium,
        description: "Group the strings that are anagrams of each other. Groups may be returned in any order.",
        strategy_id: "group-anagrams-signature",
        template_id: TemplateId::ArrayHashing,
        complexity: ("O(n * k)", "O(n * k)"),
        output_mode: OutputMode::UnorderedNestedMembers,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("setup", "init-groups", "groups = {}", Op::Declare),
            ("loop", "for-word", "for word in strs:", Op::Loop),
            ("check", "build-signature", "key = tuple(count_letters(word))", Op::Compute),
            ("check", "create-group", "if key not in groups: groups[key] = []", Op::Branch),
            ("update", "push-group", "groups[key].append(word)", Op::Update),
            ("return", "ret-groups", "return list(groups.values())", Op::Return),
        ],
        solve: SOLVE_GROUP_ANAGRAMS,
        oracle: group_anagrams_oracle,
        factory: random_word_list,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(
            json!({"strs": ["eat", "tea", "tan", "ate", "nat", "bat"]}),
            json!([["bat"], ["nat", "tan"], ["ate", "eat", "tea"]]),
        ),
        case(json!({"strs": [""]}), json!([[""]])),
        case(json!({"strs": ["a"]}), json!([["a"]])),
    ])
}

fn letter_counts(word: &str) -> SolveResult<[u32; 26]> {
    let mut counts = [0u32; 26];
    for ch in word.chars() {
        if !ch.is_ascii_lowercase() {
            return Err(SolveError::invalid("strs", "lowercase ASCII words"));
        }
        counts[(ch as u8 - b'a') as usize] += 1;
    }
    Ok(counts)
}

reference_solution!(SOLVE_GROUP_ANAGRAMS, |input| {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut slot_by_key: HashMap<[u32; 26], usize> = HashMap::new();
    for word in input.strings("strs")? {
        let key = letter_counts(&word)?;
        let slot = *slot_by_key.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(word);
    }
    Ok(json!(groups))
});

fn group_anagrams_oracle(input: &Value) -> SolveResult<Value> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for word in input.strings("strs")? {
        let mut chars: Vec<char> = word.chars().collect();
        chars.sort_unstable();
        groups.entry(chars.into_iter().collect()).or_default().push(word);
    }
    Ok(json!(groups.into_values().collect::<Vec<_>>()))
}

fn random_word_list(rng: &mut VerifierRng) -> Value {
    let n = rng.len(0, 8);
    let strs: Vec<String> = (0..n).map(|_| rng.word_from("abc", 0, 4)).collect();
    json!({"strs": strs})
}

// ==================== Top K Frequent Elements ====================

fn top_k_frequent() -> ProblemSpec {
    SpecDef {
        problem_id: 5,
        name: "Top K Frequent Elements",
        pattern: "Bucket Sort",
        difficulty: Difficulty::Medium,
        description: "Return the k most frequent elements in any order, in better than O(n log n) time.",
        strategy_id: "top-k-frequent-buckets",
        template_id: TemplateId::ArrayHashing,
        complexity: ("O(n)", "O(n)"),
        output_mode: OutputMode::UnorderedNumberMembers,
        disallowed: &["sort"],
        random_trials: 120,
        ir: &[
            ("setup", "init-freq", "freq = {}", Op::Declare),
            ("loop", "for-num", "for value in nums:", Op::Loop),
            ("update", "count-num", "freq[value] = freq.get(value, 0) + 1", Op::Update),
            ("setup", "init-buckets", "buckets = [[] for _ in range(len(nums) + 1)]", Op::Declare),
            ("loop", "for-freq", "for value, count in freq.items():", Op::Loop),
            ("update", "push-bucket", "buckets[count].append(value)", Op::Update),
            ("loop", "walk-buckets", "for count in range(len(buckets) - 1, 0, -1):", Op::Loop),
            ("check", "collect-topk", "out.extend(buckets[count]); if len(out) >= k: return out[:k]", Op::Branch),
            ("return", "ret-topk", "return out", Op::Return),
        ],
        solve: SOLVE_TOP_K,
        oracle: top_k_oracle,
        factory: random_distinct_frequencies,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [1, 1, 1, 2, 2, 3], "k": 2}), json!([1, 2])),
        case(json!({"nums": [1], "k": 1}), json!([1])),
        case(json!({"nums": [4, 4, 4, 5, 5, 6, 6, 6, 6], "k": 2}), json!([6, 4])),
    ])
}

reference_solution!(SOLVE_TOP_K, |input| {
    let nums = input.ints("nums")?;
    let k = input.count("k")?;
    let mut freq: HashMap<i64, usize> = HashMap::new();
    for &value in &nums {
        *freq.entry(value).or_insert(0) += 1;
    }
    let mut buckets: Vec<Vec<i64>> = vec![Vec::new(); nums.len() + 1];
    for (value, count) in freq {
        buckets[count].push(value);
    }
    let mut out = Vec::with_capacity(k);
    for bucket in buckets.iter().rev() {
        for &value in bucket {
            if out.len() == k {
                return Ok(json!(out));
            }
            out.push(value);
        }
    }
    Ok(json!(out))
});

fn top_k_oracle(input: &Value) -> SolveResult<Value> {
    let nums = input.ints("nums")?;
    let k = input.count("k")?;
    let mut freq: BTreeMap<i64, usize> = BTreeMap::new();
    for value in nums {
        *freq.entry(value).or_insert(0) += 1;
    }
    let mut by_count: Vec<(i64, usize)> = freq.into_iter().collect();
    by_count.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(json!(by_count.into_iter().take(k).map(|(v, _)| v).collect::<Vec<_>>()))
}

/// Every value gets a different frequency, so the top k is unique
fn random_distinct_frequencies(rng: &mut VerifierRng) -> Value {
    let distinct = rng.len(1, 5);
    let mut pool: Vec<i64> = (-10..=10).collect();
    rng.shuffle(&mut pool);
    let mut counts: Vec<usize> = (1..=distinct).collect();
    rng.shuffle(&mut counts);

    let mut nums = Vec::new();
    for (value, count) in pool.iter().zip(counts) {
        nums.extend(std::iter::repeat(*value).take(count));
    }
    rng.shuffle(&mut nums);
    let k = rng.len(1, distinct);
    json!({"nums": nums, "k": k})
}

// ==================== Product of Array Except Self ====================

fn product_except_self() -> ProblemSpec {
    SpecDef {
        problem_id: 6,
        name: "Product of Array Except Self",
        pattern: "Prefix/Suffix",
        difficulty: Difficulty::Medium,
        description: "Return an array where each element is the product of all other elements, without using division.",
        strategy_id: "product-except-self-prefix-suffix",
        template_id: TemplateId::ArrayHashing,
        complexity: ("O(n)", "O(1) extra"),
        output_mode: OutputMode::Normalized,
        disallowed: &["/"],
        random_trials: 120,
        ir: &[
            ("setup", "init-out", "out = [1] * len(nums)", Op::Declare),
            ("setup", "init-prefix", "prefix = 1", Op::Declare),
            ("loop", "for-prefix", "for i in range(len(nums)):", Op::Loop),
            ("update", "write-prefix", "out[i] = prefix", Op::Update),
            ("update", "advance-prefix", "prefix *= nums[i]", Op::Update),
            ("setup", "init-suffix", "suffix = 1", Op::Declare),
            ("loop", "for-suffix", "for i in range(len(nums) - 1, -1, -1):", Op::Loop),
            ("update", "apply-suffix", "out[i] *= suffix", Op::Update),
            ("update", "advance-suffix", "suffix *= nums[i]", Op::Update),
            ("return", "ret-out", "return out", Op::Return),
        ],
        solve: SOLVE_PRODUCT_EXCEPT_SELF,
        oracle: product_except_self_oracle,
        factory: random_small_products,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [1, 2, 3, 4]}), json!([24, 12, 8, 6])),
        case(json!({"nums": [-1, 1, 0, -3, 3]}), json!([0, 0, 9, 0, 0])),
        case(json!({"nums": [2, 3]}), json!([3, 2])),
    ])
}

reference_solution!(SOLVE_PRODUCT_EXCEPT_SELF, |input| {
    let nums = input.ints("nums")?;
    let mut out = vec![1i64; nums.len()];
    let mut prefix = 1i64;
    for i in 0..nums.len() {
        out[i] = prefix;
        prefix *= nums[i];
    }
    let mut suffix = 1i64;
    for i in (0..nums.len()).rev() {
        out[i] *= suffix;
        suffix *= nums[i];
    }
    Ok(json!(out))
});

fn product_except_self_oracle(input: &Value) -> SolveResult<Value> {
    let nums = input.ints("nums")?;
    let out: Vec<i64> = (0..nums.len())
        .map(|i| {
            nums.iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, v)| *v)
                .product()
        })
        .collect();
    Ok(json!(out))
}

fn random_small_products(rng: &mut VerifierRng) -> Value {
    let len = rng.len(2, 8);
    json!({"nums": rng.ints(len, -4, 4)})
}

// ==================== Encode and Decode Strings ====================

fn encode_decode_strings() -> ProblemSpec {
    SpecDef {
        problem_id: 7,
        name: "Encode and Decode Strings",
        pattern: "Design",
        difficulty: Difficulty::Medium,
        description: "Encode a list of strings to one string and decode it back to the original list.",
        strategy_id: "encode-decode-length-prefix",
        template_id: TemplateId::ArrayHashing,
        complexity: ("O(n)", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("setup", "encode-all", "encoded = ''.join(f'{len(s)}:{s}' for s in strs)", Op::Declare),
            ("setup", "init-decode", "out, i = [], 0", Op::Declare),
            ("loop", "while-input", "while i < len(encoded):", Op::Loop),
            ("check", "find-delimiter", "j = encoded.index(':', i)", Op::Compute),
            ("update", "read-length", "size = int(encoded[i:j])", Op::Update),
            ("update", "take-payload", "out.append(encoded[j + 1:j + 1 + size]); i = j + 1 + size", Op::Update),
            ("return", "ret-decoded", "return out", Op::Return),
        ],
        solve: SOLVE_ENCODE_DECODE,
        oracle: encode_decode_oracle,
        factory: random_tricky_strings,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"strs": ["neet", "code", "love", "you"]}), json!(["neet", "code", "love", "you"])),
        case(json!({"strs": ["we", "say", ":", "yes", "4:x"]}), json!(["we", "say", ":", "yes", "4:x"])),
        case(json!({"strs": [""]}), json!([""])),
        case(json!({"strs": []}), json!([])),
    ])
}

reference_solution!(SOLVE_ENCODE_DECODE, |input| {
    let strs = input.strings("strs")?;
    let encoded: String = strs.iter().map(|s| format!("{}:{}", s.len(), s)).collect();

    let mut out = Vec::new();
    let mut i = 0;
    while i < encoded.len() {
        let j = encoded[i..]
            .find(':')
            .map(|offset| i + offset)
            .ok_or_else(|| SolveError::Evaluation("missing length delimiter".into()))?;
        let size: usize = encoded[i..j]
            .parse()
            .map_err(|_| SolveError::Evaluation("corrupt length prefix".into()))?;
        let payload = encoded
            .get(j + 1..j + 1 + size)
            .ok_or_else(|| SolveError::Evaluation("truncated payload".into()))?;
        out.push(payload.to_string());
        i = j + 1 + size;
    }
    Ok(json!(out))
});

fn encode_decode_oracle(input: &Value) -> SolveResult<Value> {
    Ok(json!(input.strings("strs")?))
}

fn random_tricky_strings(rng: &mut VerifierRng) -> Value {
    let n = rng.len(0, 6);
    let strs: Vec<String> = (0..n).map(|_| rng.word_from("ab:1#", 0, 5)).collect();
    json!({"strs": strs})
}

// ==================== Longest Consecutive Sequence ====================

fn longest_consecutive() -> ProblemSpec {
    SpecDef {
        problem_id: 8,
        name: "Longest Consecutive Sequence",
        pattern: "Hash Set",
        difficulty: Difficulty::Medium,
        description: "Return the length of the longest run of consecutive integers, in O(n) time.",
        strategy_id: "longest-consecutive-set-starts",
        template_id: TemplateId::ArrayHashing,
        complexity: ("O(n)", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &["sort"],
        random_trials: 120,
        ir: &[
            ("setup", "init-set", "values = set(nums)", Op::Declare),
            ("setup", "init-best", "best = 0", Op::Declare),
            ("loop", "for-value", "for value in values:", Op::Loop),
            ("check", "is-start", "if value - 1 in values: continue", Op::Branch),
            ("update", "walk-run", "length = 1; while value + length in values: length += 1", Op::Update),
            ("update", "track-best", "best = max(best, length)", Op::Update),
            ("return", "ret-best", "return best", Op::Return),
        ],
        solve: SOLVE_LONGEST_CONSECUTIVE,
        oracle: longest_consecutive_oracle,
        factory: random_spread_ints,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [100, 4, 200, 1, 3, 2]}), json!(4)),
        case(json!({"nums": [0, 3, 7, 2, 5, 8, 4, 6, 0, 1]}), json!(9)),
        case(json!({"nums": []}), json!(0)),
    ])
}

reference_solution!(SOLVE_LONGEST_CONSECUTIVE, |input| {
    let values: HashSet<i64> = input.ints("nums")?.into_iter().collect();
    let mut best = 0;
    for &value in &values {
        if values.contains(&(value - 1)) {
            continue;
        }
        let mut length = 1;
        while values.contains(&(value + length)) {
            length += 1;
        }
        best = best.max(length);
    }
    Ok(json!(best))
});

fn longest_consecutive_oracle(input: &Value) -> SolveResult<Value> {
    let values: BTreeSet<i64> = input.ints("nums")?.into_iter().collect();
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<i64> = None;
    for value in values {
        run = if prev == Some(value - 1) { run + 1 } else { 1 };
        best = best.max(run);
        prev = Some(value);
    }
    Ok(json!(best))
}

fn random_spread_ints(rng: &mut VerifierRng) -> Value {
    let len = rng.len(0, 12);
    json!({"nums": rng.ints(len, -10, 10)})
}

// ==================== Valid Palindrome ====================

fn valid_palindrome() -> ProblemSpec {
    SpecDef {
        problem_id: 9,
        name: "Valid Palindrome",
        pattern: "Two Pointers",
        difficulty: Difficulty::Easy,
        description: "Return true if the string reads the same forward and backward, considering only alphanumerics and ignoring case.",
        strategy_id: "valid-palindrome-two-pointers",
        template_id: TemplateId::TwoPointers,
        complexity: ("O(n)", "O(1)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("anchors", "init-pointers", "left, right = 0, len(s) - 1", Op::Declare),
            ("converge", "while-lt", "while left < right:", Op::Loop),
            ("shift", "skip-left", "if not s[left].isalnum(): left += 1; continue", Op::Update),
            ("shift", "skip-right", "if not s[right].isalnum(): right -= 1; continue", Op::Update),
            ("compare", "mismatch", "if s[left].lower() != s[right].lower(): return False", Op::Branch),
            ("shift", "step-inward", "left, right = left + 1, right - 1", Op::Update),
            ("emit", "ret-true", "return True", Op::Return),
        ],
        solve: SOLVE_VALID_PALINDROME,
        oracle: valid_palindrome_oracle,
        factory: random_palindrome_candidate,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"s": "A man, a plan, a canal: Panama"}), json!(true)),
        case(json!({"s": "race a car"}), json!(false)),
        case(json!({"s": " "}), json!(true)),
        case(json!({"s": "0P"}), json!(false)),
    ])
}

reference_solution!(SOLVE_VALID_PALINDROME, |input| {
    let chars: Vec<char> = input.text("s")?.chars().collect();
    if chars.is_empty() {
        return Ok(json!(true));
    }
    let (mut left, mut right) = (0, chars.len() - 1);
    while left < right {
        if !chars[left].is_ascii_alphanumeric() {
            left += 1;
            continue;
        }
        if !chars[right].is_ascii_alphanumeric() {
            right -= 1;
            continue;
        }
        if chars[left].to_ascii_lowercase() != chars[right].to_ascii_lowercase() {
            return Ok(json!(false));
        }
        left += 1;
        right -= 1;
    }
    Ok(json!(true))
});

fn valid_palindrome_oracle(input: &Value) -> SolveResult<Value> {
    let cleaned: Vec<char> = input
        .text("s")?
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    Ok(json!(cleaned.iter().eq(cleaned.iter().rev())))
}

fn random_palindrome_candidate(rng: &mut VerifierRng) -> Value {
    let s = if rng.chance(0.5) {
        let half = rng.word_from("abAB", 0, 4);
        let middle = if rng.chance(0.5) { rng.word_from("c ,", 1, 1) } else { String::new() };
        let mirrored: String = half
            .chars()
            .rev()
            .map(|c| if rng.chance(0.5) { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
            .collect();
        format!("{}{}{}", half, middle, mirrored)
    } else {
        rng.word_from("aAb1 ,:", 0, 8)
    };
    json!({"s": s})
}

// ==================== 3Sum ====================

fn three_sum() -> ProblemSpec {
    SpecDef {
        problem_id: 10,
        name: "3Sum",
        pattern: "Two Pointers",
        difficulty: Difficulty::Medium,
        description: "Return all unique triplets that sum to zero.",
        strategy_id: "three-sum-sorted-pointers",
        template_id: TemplateId::TwoPointers,
        complexity: ("O(n^2)", "O(1) extra"),
        output_mode: OutputMode::UnorderedTriplets,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("anchors", "sort-nums", "nums.sort(); out = []", Op::Declare),
            ("converge", "for-anchor", "for i in range(len(nums) - 2):", Op::Loop),
            ("compare", "skip-dup-anchor", "if i > 0 and nums[i] == nums[i - 1]: continue", Op::Branch),
            ("anchors", "init-pair", "left, right = i + 1, len(nums) - 1", Op::Declare),
            ("converge", "while-pair", "while left < right:", Op::Loop),
            ("compare", "sum-check", "total = nums[i] + nums[left] + nums[right]", Op::Compute),
            ("shift", "move-pointer", "if total < 0: left += 1 elif total > 0: right -= 1", Op::Update),
            ("shift", "record-and-skip", "else: out.append([nums[i], nums[left], nums[right]]); skip duplicates", Op::Update),
            ("emit", "ret-triplets", "return out", Op::Return),
        ],
        solve: SOLVE_THREE_SUM,
        oracle: three_sum_oracle,
        factory: random_three_sum,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"nums": [-1, 0, 1, 2, -1, -4]}), json!([[-1, -1, 2], [-1, 0, 1]])),
        case(json!({"nums": [0, 1, 1]}), json!([])),
        case(json!({"nums": [0, 0, 0]}), json!([[0, 0, 0]])),
    ])
}

reference_solution!(SOLVE_THREE_SUM, |input| {
    let mut nums = input.ints("nums")?;
    nums.sort_unstable();
    let mut out: Vec<[i64; 3]> = Vec::new();
    for i in 0..nums.len().saturating_sub(2) {
        if i > 0 && nums[i] == nums[i - 1] {
            continue;
        }
        let (mut left, mut right) = (i + 1, nums.len() - 1);
        while left < right {
            let total = nums[i] + nums[left] + nums[right];
            if total < 0 {
                left += 1;
            } else if total > 0 {
                right -= 1;
            } else {
                out.push([nums[i], nums[left], nums[right]]);
                left += 1;
                while left < right && nums[left] == nums[left - 1] {
                    left += 1;
                }
                right -= 1;
            }
        }
    }
    Ok(json!(out))
});

fn three_sum_oracle(input: &Value) -> SolveResult<Value> {
    let nums = input.ints("nums")?;
    let mut found: BTreeSet<[i64; 3]> = BTreeSet::new();
    for i in 0..nums.len() {
        for j in i + 1..nums.len() {
            for k in j + 1..nums.len() {
                if nums[i] + nums[j] + nums[k] == 0 {
                    let mut triplet = [nums[i], nums[j], nums[k]];
                    triplet.sort_unstable();
                    found.insert(triplet);
                }
            }
        }
    }
    Ok(json!(found.into_iter().collect::<Vec<_>>()))
}

fn random_three_sum(rng: &mut VerifierRng) -> Value {
    let len = rng.len(0, 9);
    json!({"nums": rng.ints(len, -6, 6)})
}

// ==================== Longest Substring Without Repeating Characters ====================

fn longest_substring() -> ProblemSpec {
    SpecDef {
        problem_id: 11,
        name: "Longest Substring Without Repeating Characters",
        pattern: "Sliding Window",
        difficulty: Difficulty::Medium,
        description: "Return the length of the longest substring without repeating characters.",
        strategy_id: "longest-substring-window",
        template_id: TemplateId::SlidingWindow,
        complexity: ("O(n)", "O(k)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("bootstrap", "init-last-seen", "last_seen = {}", Op::Declare),
            ("bootstrap", "init-left-best", "left = best = 0", Op::Declare),
            ("expand", "for-right", "for right, ch in enumerate(s):", Op::Loop),
            ("shrink", "jump-left", "if last_seen.get(ch, -1) >= left: left = last_seen[ch] + 1", Op::Update),
            ("expand", "record-last", "last_seen[ch] = right", Op::Update),
            ("window-check", "track-best", "best = max(best, right - left + 1)", Op::Compute),
            ("emit", "ret-best", "return best", Op::Return),
        ],
        solve: SOLVE_LONGEST_SUBSTRING,
        oracle: longest_substring_oracle,
        factory: random_repeating_word,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"s": "abcabcbb"}), json!(3)),
        case(json!({"s": "bbbbb"}), json!(1)),
        case(json!({"s": "pwwkew"}), json!(3)),
        case(json!({"s": ""}), json!(0)),
    ])
}

reference_solution!(SOLVE_LONGEST_SUBSTRING, |input| {
    let mut last_seen: HashMap<char, usize> = HashMap::new();
    let (mut left, mut best) = (0, 0);
    for (right, ch) in input.text("s")?.chars().enumerate() {
        if let Some(&prev) = last_seen.get(&ch) {
            if prev >= left {
                left = prev + 1;
            }
        }
        last_seen.insert(ch, right);
        best = best.max(right + 1 - left);
    }
    Ok(json!(best))
});

fn longest_substring_oracle(input: &Value) -> SolveResult<Value> {
    let chars: Vec<char> = input.text("s")?.chars().collect();
    let mut best = 0;
    for start in 0..chars.len() {
        let mut seen = HashSet::new();
        for &ch in &chars[start..] {
            if !seen.insert(ch) {
                break;
            }
        }
        best = best.max(seen.len());
    }
    Ok(json!(best))
}

fn random_repeating_word(rng: &mut VerifierRng) -> Value {
    json!({"s": rng.word_from("abcd", 0, 12)})
}

// ==================== Longest Palindromic Substring ====================

fn longest_palindromic_substring() -> ProblemSpec {
    SpecDef {
        problem_id: 12,
        name: "Longest Palindromic Substring",
        pattern: "Expand Around Center",
        difficulty: Difficulty::Medium,
        description: "Return the longest palindromic substring. Any one of equal length is accepted.",
        strategy_id: "longest-palindrome-expand-center",
        template_id: TemplateId::TwoPointers,
        complexity: ("O(n^2)", "O(1)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("anchors", "init-best", "best_start, best_len = 0, 0", Op::Declare),
            ("converge", "for-center", "for center in range(2 * len(s) - 1):", Op::Loop),
            ("anchors", "init-span", "left, right = center // 2, center // 2 + center % 2", Op::Declare),
            ("compare", "still-palindrome", "while left >= 0 and right < len(s) and s[left] == s[right]:", Op::Branch),
            ("shift", "expand-span", "left, right = left - 1, right + 1", Op::Update),
            ("compare", "longer-span", "if right - left - 1 > best_len: best_start, best_len = left + 1, right - left - 1", Op::Branch),
            ("emit", "ret-span", "return s[best_start:best_start + best_len]", Op::Return),
        ],
        solve: SOLVE_LONGEST_PALINDROME,
        oracle: longest_palindrome_oracle,
        factory: random_palindrome_source,
        normalize: None,
        assert_case: Some(valid_longest_palindrome),
    }
    .with_cases(vec![
        case(json!({"s": "babad"}), json!("bab")),
        case(json!({"s": "cbbd"}), json!("bb")),
        case(json!({"s": "a"}), json!("a")),
    ])
}

reference_solution!(SOLVE_LONGEST_PALINDROME, |input| {
    let chars: Vec<char> = input.text("s")?.chars().collect();
    let n = chars.len() as i64;
    let (mut best_start, mut best_len) = (0usize, 0usize);
    for center in 0..(2 * n - 1).max(0) {
        let mut left = center / 2;
        let mut right = center / 2 + center % 2;
        while left >= 0 && right < n && chars[left as usize] == chars[right as usize] {
            left -= 1;
            right += 1;
        }
        let len = (right - left - 1) as usize;
        if len > best_len {
            best_start = (left + 1) as usize;
            best_len = len;
        }
    }
    Ok(json!(chars[best_start..best_start + best_len].iter().collect::<String>()))
});

fn is_palindrome(chars: &[char]) -> bool {
    chars.iter().eq(chars.iter().rev())
}

fn longest_palindrome_oracle(input: &Value) -> SolveResult<Value> {
    let chars: Vec<char> = input.text("s")?.chars().collect();
    for len in (1..=chars.len()).rev() {
        if let Some(window) = chars.windows(len).find(|w| is_palindrome(w)) {
            return Ok(json!(window.iter().collect::<String>()));
        }
    }
    Ok(json!(""))
}

/// Any palindromic substring of the expected length is accepted
fn valid_longest_palindrome(input: &Value, got: &Value, expected: &Value) -> bool {
    let (Ok(s), Some(got), Some(expected)) = (input.text("s"), got.as_str(), expected.as_str())
    else {
        return false;
    };
    let chars: Vec<char> = got.chars().collect();
    chars.len() == expected.chars().count() && s.contains(got) && is_palindrome(&chars)
}

fn random_palindrome_source(rng: &mut VerifierRng) -> Value {
    json!({"s": rng.word_from("ab", 1, 10)})
}
