//! Wave 5: graphs.

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
use std::collections::{BTreeSet, VecDeque};

pub fn specs() -> Vec<ProblemSpec> {
    vec![number_of_islands(), course_schedule_order(), redundant_connection()]
}

/// Disjoint-set forest with path halving
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Returns false when `a` and `b` were already connected
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        true
    }
}

// ==================== Number of Islands ====================

fn number_of_islands() -> ProblemSpec {
    SpecDef {
        problem_id: 28,
        name: "Number of Islands",
        pattern: "DFS / BFS",
        difficulty: Difficulty::Medium,
        description: "Count groups of horizontally or vertically connected '1' cells in the grid.",
        strategy_id: "islands-flood-fill",
        template_id: TemplateId::TreeGraph,
        complexity: ("O(m * n)", "O(m * n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "out-of-bounds", "if r < 0 or c < 0 or r >= rows or c >= cols: return", Op::Branch),
            ("constrain", "water-or-seen", "if grid[r][c] != '1': return", Op::Branch),
            ("choose", "sink-cell", "grid[r][c] = '0'", Op::Update),
            ("explore", "flood-neighbours", "for dr, dc in DIRS: sink(r + dr, c + dc)", Op::Loop),
            ("combine", "count-starts", "return sum(1 for r, c in cells if grid[r][c] == '1' and sink(r, c) is None)", Op::Return),
        ],
        solve: SOLVE_ISLANDS,
        oracle: islands_oracle,
        factory: random_island_grid,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(
            json!({"grid": [
                ["1", "1", "1", "1", "0"],
                ["1", "1", "0", "1", "0"],
                ["1", "1", "0", "0", "0"],
                ["0", "0", "0", "0", "0"]
            ]}),
            json!(1),
        ),
        case(
            json!({"grid": [
                ["1", "1", "0", "0", "0"],
                ["1", "1", "0", "0", "0"],
                ["0", "0", "1", "0", "0"],
                ["0", "0", "0", "1", "1"]
            ]}),
            json!(3),
        ),
        case(json!({"grid": []}), json!(0)),
    ])
}

reference_solution!(SOLVE_ISLANDS, |input| {
    let mut grid = input.char_grid("grid")?;
    let mut islands = 0;
    for r in 0..grid.len() {
        for c in 0..grid[r].len() {
            if grid[r][c] != '1' {
                continue;
            }
            islands += 1;
            let mut stack = vec![(r, c)];
            grid[r][c] = '0';
            while let Some((cr, cc)) = stack.pop() {
                let neighbours = [
                    cr.checked_sub(1).map(|up| (up, cc)),
                    Some((cr + 1, cc)),
                    cc.checked_sub(1).map(|left| (cr, left)),
                    Some((cr, cc + 1)),
                ];
                for (nr, nc) in neighbours.into_iter().flatten() {
                    if let Some(cell) = grid.get_mut(nr).and_then(|row| row.get_mut(nc)) {
                        if *cell == '1' {
                            *cell = '0';
                            stack.push((nr, nc));
                        }
                    }
                }
            }
        }
    }
    Ok(json!(islands))
});

fn islands_oracle(input: &Value) -> SolveResult<Value> {
    let grid = input.char_grid("grid")?;
    let cols = grid.first().map_or(0, Vec::len);
    if grid.iter().any(|row| row.len() != cols) {
        return Err(SolveError::invalid("grid", "a rectangular grid"));
    }
    let index = |r: usize, c: usize| r * cols + c;
    let land = |r: usize, c: usize| grid[r][c] == '1';

    let mut sets = UnionFind::new(grid.len() * cols);
    let mut components = 0i64;
    for r in 0..grid.len() {
        for c in 0..cols {
            if !land(r, c) {
                continue;
            }
            components += 1;
            if r > 0 && land(r - 1, c) && sets.union(index(r, c), index(r - 1, c)) {
                components -= 1;
            }
            if c > 0 && land(r, c - 1) && sets.union(index(r, c), index(r, c - 1)) {
                components -= 1;
            }
        }
    }
    Ok(json!(components))
}

fn random_island_grid(rng: &mut VerifierRng) -> Value {
    let rows = rng.len(1, 6);
    let cols = rng.len(1, 6);
    let grid: Vec<Vec<&str>> = (0..rows)
        .map(|_| {
            (0..cols)
                .map(|_| if rng.chance(0.45) { "1" } else { "0" })
                .collect()
        })
        .collect();
    json!({"grid": grid})
}

// ==================== Course Schedule II ====================

fn course_schedule_order() -> ProblemSpec {
    SpecDef {
        problem_id: 29,
        name: "Course Schedule II",
        pattern: "Topological Sort",
        difficulty: Difficulty::Medium,
        description: "Return an order to take all courses given [course, prerequisite] pairs. The prerequisites always form a DAG here.",
        strategy_id: "course-order-kahn",
        template_id: TemplateId::TreeGraph,
        complexity: ("O(V + E)", "O(V + E)"),
        output_mode: OutputMode::TopologicalOrder,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "build-graph", "indegree = [0] * numCourses; graph = [[] for _ in range(numCourses)]", Op::Declare),
            ("choose", "seed-queue", "queue = deque(c for c in range(numCourses) if indegree[c] == 0)", Op::Declare),
            ("explore", "while-queue", "while queue: course = queue.popleft(); order.append(course)", Op::Loop),
            ("constrain", "release-next", "for nxt in graph[course]: indegree[nxt] -= 1", Op::Update),
            ("explore", "enqueue-ready", "if indegree[nxt] == 0: queue.append(nxt)", Op::Branch),
            ("combine", "ret-order", "return order if len(order) == numCourses else []", Op::Return),
        ],
        solve: SOLVE_COURSE_ORDER,
        oracle: course_order_oracle,
        factory: random_dag,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"numCourses": 2, "prerequisites": [[1, 0]]}), json!([0, 1])),
        case(
            json!({"numCourses": 4, "prerequisites": [[1, 0], [2, 0], [3, 1], [3, 2]]}),
            json!([0, 2, 1, 3]),
        ),
        case(json!({"numCourses": 1, "prerequisites": []}), json!([0])),
    ])
}

/// Adjacency lists from prerequisite to dependent
fn read_course_graph(input: &Value) -> SolveResult<Vec<Vec<usize>>> {
    let n = input.count("numCourses")?;
    let mut graph = vec![Vec::new(); n];
    for pair in input.int_grid("prerequisites")? {
        let edge = match pair.as_slice() {
            &[course, prereq] => usize::try_from(course).ok().zip(usize::try_from(prereq).ok()),
            _ => None,
        };
        match edge {
            Some((course, prereq)) if course < n && prereq < n => graph[prereq].push(course),
            _ => {
                return Err(SolveError::invalid(
                    "prerequisites",
                    "[course, prerequisite] pairs of course ids",
                ))
            }
        }
    }
    Ok(graph)
}

reference_solution!(SOLVE_COURSE_ORDER, |input| {
    let graph = read_course_graph(input)?;
    let mut indegree = vec![0usize; graph.len()];
    for &next in graph.iter().flatten() {
        indegree[next] += 1;
    }
    let mut queue: VecDeque<usize> = (0..graph.len()).filter(|&c| indegree[c] == 0).collect();
    let mut order = Vec::with_capacity(graph.len());
    while let Some(course) = queue.pop_front() {
        order.push(course);
        for &next in &graph[course] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                queue.push_back(next);
            }
        }
    }
    if order.len() != graph.len() {
        order.clear();
    }
    Ok(json!(order))
});

fn course_order_oracle(input: &Value) -> SolveResult<Value> {
    fn visit(
        course: usize,
        graph: &[Vec<usize>],
        state: &mut [u8],
        post: &mut Vec<usize>,
    ) -> bool {
        match state[course] {
            1 => return false,
            2 => return true,
            _ => {}
        }
        state[course] = 1;
        for &next in &graph[course] {
            if !visit(next, graph, state, post) {
                return false;
            }
        }
        state[course] = 2;
        post.push(course);
        true
    }

    let graph = read_course_graph(input)?;
    let mut state = vec![0u8; graph.len()];
    let mut post = Vec::with_capacity(graph.len());
    for course in 0..graph.len() {
        if !visit(course, &graph, &mut state, &mut post) {
            return Ok(json!([]));
        }
    }
    post.reverse();
    Ok(json!(post))
}

/// Edges only run from a lower to a higher rank, so the graph is acyclic
fn random_dag(rng: &mut VerifierRng) -> Value {
    let n = rng.len(1, 7);
    let mut rank: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut rank);
    let mut edges = BTreeSet::new();
    for _ in 0..rng.len(0, n * 2) {
        let (a, b) = (rng.len(0, n - 1), rng.len(0, n - 1));
        if a < b {
            edges.insert([rank[b], rank[a]]);
        }
    }
    let mut prerequisites: Vec<[usize; 2]> = edges.into_iter().collect();
    rng.shuffle(&mut prerequisites);
    json!({"numCourses": n, "prerequisites": prerequisites})
}

// ==================== Redundant Connection ====================

fn redundant_connection() -> ProblemSpec {
    SpecDef {
        problem_id: 30,
        name: "Redundant Connection",
        pattern: "Union Find / DFS",
        difficulty: Difficulty::Medium,
        description: "A tree on nodes 1..n had one extra edge added. Return the last edge in the input whose removal leaves a tree.",
        strategy_id: "redundant-connection-union-find",
        template_id: TemplateId::TreeGraph,
        complexity: ("O(n α(n))", "O(n)"),
        output_mode: OutputMode::Normalized,
        disallowed: &[],
        random_trials: 120,
        ir: &[
            ("base", "init-parents", "parent = list(range(len(edges) + 1))", Op::Declare),
            ("choose", "for-edge", "for a, b in edges:", Op::Loop),
            ("explore", "find-roots", "ra, rb = find(a), find(b)", Op::Compute),
            ("constrain", "already-joined", "if ra == rb: return [a, b]", Op::Branch),
            ("combine", "join-roots", "parent[ra] = rb", Op::Update),
        ],
        solve: SOLVE_REDUNDANT_CONNECTION,
        oracle: redundant_connection_oracle,
        factory: random_tree_plus_edge,
        normalize: None,
        assert_case: None,
    }
    .with_cases(vec![
        case(json!({"edges": [[1, 2], [1, 3], [2, 3]]}), json!([2, 3])),
        case(
            json!({"edges": [[1, 2], [2, 3], [3, 4], [1, 4], [1, 5]]}),
            json!([1, 4]),
        ),
    ])
}

fn read_edges(input: &Value) -> SolveResult<Vec<(usize, usize)>> {
    let grid = input.int_grid("edges")?;
    let n = grid.len();
    grid.into_iter()
        .map(|pair| {
            let edge = match pair.as_slice() {
                &[a, b] => usize::try_from(a).ok().zip(usize::try_from(b).ok()),
                _ => None,
            };
            edge.filter(|&(a, b)| (1..=n).contains(&a) && (1..=n).contains(&b))
                .ok_or_else(|| SolveError::invalid("edges", "[u, v] pairs of nodes in 1..=n"))
        })
        .collect()
}

reference_solution!(SOLVE_REDUNDANT_CONNECTION, |input| {
    let edges = read_edges(input)?;
    let mut sets = UnionFind::new(edges.len() + 1);
    for (a, b) in edges {
        if !sets.union(a, b) {
            return Ok(json!([a, b]));
        }
    }
    Ok(Value::Null)
});

/// Try removing each edge from the back; the first removal leaving a
/// connected acyclic graph is the answer.
fn redundant_connection_oracle(input: &Value) -> SolveResult<Value> {
    let edges = read_edges(input)?;
    let n = edges.len();
    for skip in (0..n).rev() {
        let mut adjacency = vec![Vec::new(); n + 1];
        for (i, &(a, b)) in edges.iter().enumerate() {
            if i != skip {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }
        let mut seen = vec![false; n + 1];
        let mut stack = vec![1];
        seen[1] = true;
        let mut reached = 1;
        while let Some(node) = stack.pop() {
            for &next in &adjacency[node] {
                if !seen[next] {
                    seen[next] = true;
                    reached += 1;
                    stack.push(next);
                }
            }
        }
        // n - 1 edges reaching all n nodes form a tree
        if reached == n {
            let (a, b) = edges[skip];
            return Ok(json!([a, b]));
        }
    }
    Ok(Value::Null)
}

fn random_tree_plus_edge(rng: &mut VerifierRng) -> Value {
    let n = rng.len(3, 8);
    let mut edges: Vec<[usize; 2]> = (2..=n).map(|v| [rng.len(1, v - 1), v]).collect();
    let existing: BTreeSet<(usize, usize)> = edges.iter().map(|e| (e[0], e[1])).collect();
    let candidates: Vec<[usize; 2]> = (1..=n)
        .flat_map(|a| (a + 1..=n).map(move |b| [a, b]))
        .filter(|e| !existing.contains(&(e[0], e[1])))
        .collect();
    edges.push(candidates[rng.len(0, candidates.len() - 1)]);
    rng.shuffle(&mut edges);
    json!({"edges": edges})
}
