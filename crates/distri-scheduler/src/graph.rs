// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! DAG construction over [`distri_recipe::RecipeNode`] values, staleness
//! filtering, and cycle detection/breaking
//! breaking").

use std::collections::BTreeMap;
use std::time::SystemTime;

use distri_recipe::RecipeNode;

#[cfg(test)]
#[path = "./graph_test.rs"]
mod graph_test;

/// One package in the scheduler's view of the world: an index into the
/// slab plus the ids of its dependency
/// nodes within this same graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedNode {
    pub id: usize,
    pub pkg: String,
    pub full_name: String,
    pub deps: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub nodes: Vec<SchedNode>,
}

/// Drop recipes whose built image is already at least as new as the recipe
/// itself. A recipe with no recorded image, or no recorded
/// recipe mtime, is always kept — staleness is only a reason to skip work,
/// never a reason to silently lose it.
pub fn select_work_set(
    candidates: &[RecipeNode],
    image_mtimes: &BTreeMap<String, SystemTime>,
    recipe_mtimes: &BTreeMap<String, SystemTime>,
    rebuild: bool,
) -> Vec<RecipeNode> {
    candidates
        .iter()
        .filter(|node| {
            if rebuild {
                return true;
            }
            match (image_mtimes.get(&node.full_name), recipe_mtimes.get(&node.pkg)) {
                (Some(image_mtime), Some(recipe_mtime)) => image_mtime < recipe_mtime,
                _ => true,
            }
        })
        .cloned()
        .collect()
}

/// Build the dependency graph over a work set. Dependency
/// names not present in the work set are already-built packages and are
/// dropped; self-edges are dropped.
pub fn build_graph(work_set: &[RecipeNode]) -> Graph {
    let pkg_to_id: BTreeMap<&str, usize> = work_set.iter().enumerate().map(|(id, node)| (node.pkg.as_str(), id)).collect();

    let nodes = work_set
        .iter()
        .enumerate()
        .map(|(id, node)| {
            let deps = node
                .deps
                .iter()
                .filter_map(|dep_pkg| pkg_to_id.get(dep_pkg.as_str()).copied())
                .filter(|&dep_id| dep_id != id)
                .collect();
            SchedNode { id, pkg: node.pkg.clone(), full_name: node.full_name.clone(), deps }
        })
        .collect();

    Graph { nodes }
}

/// For every node, the ids of nodes that depend on it.
pub fn reverse_deps(graph: &Graph) -> Vec<Vec<usize>> {
    let mut reverse = vec![Vec::new(); graph.nodes.len()];
    for node in &graph.nodes {
        for &dep in &node.deps {
            reverse[dep].push(node.id);
        }
    }
    reverse
}

/// A build order where every node's dependencies precede it, or `None` if
/// the graph has a cycle. Ties are broken by insertion order
/// guarantees").
pub fn topo_sort(graph: &Graph) -> Option<Vec<usize>> {
    let reverse = reverse_deps(graph);
    let mut remaining: Vec<usize> = graph.nodes.iter().map(|n| n.deps.len()).collect();
    let mut queue: std::collections::VecDeque<usize> =
        remaining.iter().enumerate().filter(|(_, &deg)| deg == 0).map(|(id, _)| id).collect();

    let mut order = Vec::with_capacity(graph.nodes.len());
    while let Some(id) = queue.pop_front() {
        order.push(id);
        for &dependent in &reverse[id] {
            remaining[dependent] -= 1;
            if remaining[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    (order.len() == graph.nodes.len()).then_some(order)
}

/// Strongly connected components via Tarjan's algorithm, in the order they
/// finish (reverse topological order among components).
fn tarjan_scc(graph: &Graph) -> Vec<Vec<usize>> {
    struct State {
        counter: usize,
        index: Vec<Option<usize>>,
        lowlink: Vec<usize>,
        on_stack: Vec<bool>,
        stack: Vec<usize>,
        sccs: Vec<Vec<usize>>,
    }

    fn strongconnect(v: usize, graph: &Graph, state: &mut State) {
        state.index[v] = Some(state.counter);
        state.lowlink[v] = state.counter;
        state.counter += 1;
        state.stack.push(v);
        state.on_stack[v] = true;

        for &w in &graph.nodes[v].deps {
            if state.index[w].is_none() {
                strongconnect(w, graph, state);
                state.lowlink[v] = state.lowlink[v].min(state.lowlink[w]);
            } else if state.on_stack[w] {
                state.lowlink[v] = state.lowlink[v].min(state.index[w].expect("visited"));
            }
        }

        if state.lowlink[v] == state.index[v].expect("visited") {
            let mut scc = Vec::new();
            loop {
                let w = state.stack.pop().expect("v is on the stack");
                state.on_stack[w] = false;
                scc.push(w);
                if w == v {
                    break;
                }
            }
            state.sccs.push(scc);
        }
    }

    let n = graph.nodes.len();
    let mut state = State {
        counter: 0,
        index: vec![None; n],
        lowlink: vec![0; n],
        on_stack: vec![false; n],
        stack: Vec::new(),
        sccs: Vec::new(),
    };
    for v in 0..n {
        if state.index[v].is_none() {
            strongconnect(v, graph, &mut state);
        }
    }
    state.sccs
}

/// Break cycles by stripping every outgoing edge from the nodes of any
/// strongly connected component larger than one node, then re-sort
/// "Cycle breaking"). Returns the resulting build order, or
/// [`crate::Error::UnbreakableCycle`] if a cycle survives the break.
pub fn break_cycles(graph: &mut Graph) -> crate::Result<Vec<usize>> {
    if let Some(order) = topo_sort(graph) {
        return Ok(order);
    }

    for scc in tarjan_scc(graph) {
        if scc.len() > 1 {
            for id in scc {
                graph.nodes[id].deps.clear();
            }
        }
    }

    topo_sort(graph).ok_or_else(|| {
        let names = graph.nodes.iter().map(|n| n.full_name.clone()).collect();
        crate::Error::UnbreakableCycle(names)
    })
}
