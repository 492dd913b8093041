//! Execution ordering for remediation actions.
//!
//! Issues form a graph whose edges run from a dependency to its dependents. Cycles are found
//! with a DFS colouring pass; the order itself comes from Kahn's algorithm with a ready queue
//! keyed by `(action priority, issue index)`, so priority decides unless a dependency overrides
//! it and ties keep issue order.

use crate::error::PlanningError;
use std::collections::{BTreeSet, HashMap};
use versionfix_types::issue::ValidationIssue;

/// Issues without an action sort after every real action.
const NO_ACTION_PRIORITY: u32 = u32::MAX;

struct Graph<'a> {
    ids: Vec<&'a str>,
    priorities: Vec<u32>,
    /// `dependency -> dependents`
    downstream: Vec<Vec<usize>>,
    /// `dependent -> dependencies`
    upstream: Vec<Vec<usize>>,
}

impl<'a> Graph<'a> {
    fn build(issues: &'a [ValidationIssue]) -> Result<Self, PlanningError> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, issue) in issues.iter().enumerate() {
            index.entry(issue.id.as_str()).or_insert(i);
        }

        let n = issues.len();
        let mut graph = Graph {
            ids: issues.iter().map(|i| i.id.as_str()).collect(),
            priorities: issues
                .iter()
                .map(|i| {
                    i.remediation_action
                        .as_ref()
                        .map_or(NO_ACTION_PRIORITY, |a| a.priority())
                })
                .collect(),
            downstream: vec![Vec::new(); n],
            upstream: vec![Vec::new(); n],
        };

        for (i, issue) in issues.iter().enumerate() {
            for dep in &issue.dependencies {
                let Some(&d) = index.get(dep.as_str()) else {
                    return Err(PlanningError::UnknownDependency {
                        issue: issue.id.clone(),
                        dependency: dep.clone(),
                    });
                };
                graph.downstream[d].push(i);
                graph.upstream[i].push(d);
            }
        }
        Ok(graph)
    }

    fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Colour {
            White,
            Grey,
            Black,
        }

        let n = self.ids.len();
        let mut colour = vec![Colour::White; n];
        let mut stack: Vec<usize> = Vec::new();

        fn visit(
            g: &Graph<'_>,
            node: usize,
            colour: &mut [Colour],
            stack: &mut Vec<usize>,
        ) -> Option<Vec<String>> {
            colour[node] = Colour::Grey;
            stack.push(node);
            for &next in &g.upstream[node] {
                match colour[next] {
                    Colour::Grey => {
                        let start = stack.iter().position(|&s| s == next).unwrap_or(0);
                        let mut path: Vec<String> =
                            stack[start..].iter().map(|&s| g.ids[s].to_string()).collect();
                        path.push(g.ids[next].to_string());
                        return Some(path);
                    }
                    Colour::White => {
                        if let Some(path) = visit(g, next, colour, stack) {
                            return Some(path);
                        }
                    }
                    Colour::Black => {}
                }
            }
            stack.pop();
            colour[node] = Colour::Black;
            None
        }

        for start in 0..n {
            if colour[start] == Colour::White
                && let Some(path) = visit(self, start, &mut colour, &mut stack)
            {
                return Some(path);
            }
        }
        None
    }
}

/// Order issue indices for execution.
///
/// Every issue appears exactly once, including issues without an action (last, in issue
/// order), so callers can settle their status in the same pass.
pub fn plan_order(issues: &[ValidationIssue]) -> Result<Vec<usize>, PlanningError> {
    let graph = Graph::build(issues)?;
    if let Some(path) = graph.find_cycle() {
        return Err(PlanningError::Cycle { path });
    }

    let n = issues.len();
    let mut pending: Vec<usize> = graph.upstream.iter().map(Vec::len).collect();
    let mut ready: BTreeSet<(u32, usize)> = (0..n)
        .filter(|&i| pending[i] == 0)
        .map(|i| (graph.priorities[i], i))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some((_, node)) = ready.pop_first() {
        order.push(node);
        for &dependent in &graph.downstream[node] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.insert((graph.priorities[dependent], dependent));
            }
        }
    }

    // Unreachable once cycles are ruled out, but never drop issues silently.
    if order.len() != n {
        let stuck = (0..n)
            .filter(|i| !order.contains(i))
            .map(|i| graph.ids[i].to_string())
            .collect();
        return Err(PlanningError::Cycle { path: stuck });
    }
    Ok(order)
}
