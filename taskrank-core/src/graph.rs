//! Dependency graph and circular-dependency detection.
//!
//! Edges run from prerequisite to dependent: if task `t` lists `d` as a
//! dependency (and `d` is in the batch), the graph has `d -> t`. A node's
//! out-degree is therefore the number of tasks it unblocks.
//!
//! Cycle search is an iterative depth-first walk with an explicit
//! three-colour map and path stack, so very long dependency chains cannot
//! overflow the call stack. Start nodes are taken in batch order, which makes
//! cycle numbering reproducible for identical input.

use crate::task::NormalizedTask;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A circular dependency chain. `tasks` lists each member once, in walk
/// order; the last member links back to the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub cycle_id: usize,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Finished,
}

#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    nodes: Vec<&'a str>,
    index: HashMap<&'a str, usize>,
    // edges[d] = dependents of d, one entry per listing (duplicates kept)
    edges: Vec<Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    pub fn build(tasks: &'a [NormalizedTask]) -> Self {
        let mut nodes = Vec::new();
        let mut index = HashMap::new();
        for t in tasks {
            index.entry(t.id.as_str()).or_insert_with(|| {
                nodes.push(t.id.as_str());
                nodes.len() - 1
            });
        }

        let mut edges = vec![Vec::new(); nodes.len()];
        for t in tasks {
            let to = index[t.id.as_str()];
            for dep in &t.dependencies {
                if let Some(&from) = index.get(dep.as_str()) {
                    edges[from].push(to);
                }
            }
        }

        Self { nodes, index, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Number of tasks that list `id` as a dependency. Unknown ids have 0.
    pub fn out_degree(&self, id: &str) -> usize {
        self.index.get(id).map_or(0, |&i| self.edges[i].len())
    }

    /// Whether `dependent` lists `prerequisite` as a dependency.
    pub fn has_edge(&self, prerequisite: &str, dependent: &str) -> bool {
        match (self.index.get(prerequisite), self.index.get(dependent)) {
            (Some(&from), Some(&to)) => self.edges[from].contains(&to),
            _ => false,
        }
    }

    /// All distinct cycles, numbered from 1 in discovery order.
    pub fn find_cycles(&self) -> Vec<Cycle> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        let mut path: Vec<usize> = Vec::new();
        // (node, next edge to follow)
        let mut stack: Vec<(usize, usize)> = Vec::new();
        let mut found: Vec<Vec<usize>> = Vec::new();

        for start in 0..self.nodes.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::OnPath;
            path.push(start);
            stack.push((start, 0));

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let Some(&next) = self.edges[node].get(frame.1) else {
                    marks[node] = Mark::Finished;
                    path.pop();
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match marks[next] {
                    Mark::Unvisited => {
                        marks[next] = Mark::OnPath;
                        path.push(next);
                        stack.push((next, 0));
                    }
                    Mark::OnPath => {
                        if let Some(pos) = path.iter().position(|&n| n == next) {
                            let members = path[pos..].to_vec();
                            if !found.contains(&members) {
                                found.push(members);
                            }
                        }
                    }
                    Mark::Finished => {}
                }
            }
        }

        debug!(
            nodes = self.nodes.len(),
            edges = self.edge_count(),
            cycles = found.len(),
            "dependency cycle search finished"
        );

        found
            .into_iter()
            .enumerate()
            .map(|(i, members)| Cycle {
                cycle_id: i + 1,
                tasks: members.into_iter().map(|n| self.nodes[n].to_string()).collect(),
            })
            .collect()
    }
}

/// Detect circular dependencies in a normalized batch.
pub fn detect_cycles(tasks: &[NormalizedTask]) -> Vec<Cycle> {
    DependencyGraph::build(tasks).find_cycles()
}
