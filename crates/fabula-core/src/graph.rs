use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::locale::LocaleStore;
use crate::reference::{references, resolve_target};

/// Summary of the reference graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceGraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Report for `#{...}` reference ordering within a locale.
///
/// `topo_order` lists referenced paths before the paths referencing them.
/// When the references loop, `cycle` holds every path that could not be
/// ordered instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceGraphReport {
    pub summary: ReferenceGraphSummary,
    pub topo_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
}

/// Build a deterministic reference report for a locale store.
///
/// References that resolve nowhere in `store` are left out; they are
/// reported by `validate_locale`.
pub fn build_reference_graph_report(store: &LocaleStore) -> Result<ReferenceGraphReport> {
    let graph = build_adjacency(store)?;
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = ReferenceGraphSummary { nodes, edges };

    Ok(match toposort(&graph) {
        Ok(order) => ReferenceGraphReport {
            summary,
            topo_order: Some(order),
            cycle: None,
        },
        Err(cycle) => ReferenceGraphReport {
            summary,
            topo_order: None,
            cycle: Some(cycle),
        },
    })
}

fn build_adjacency(store: &LocaleStore) -> Result<BTreeMap<String, BTreeSet<String>>> {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (path, value) in store.leaves() {
        graph.entry(path.clone()).or_default();
        for text in value.strings() {
            for token in references(text)? {
                if let Some(target) = resolve_target(&token, &path, &[store]) {
                    graph.entry(target).or_default().insert(path.clone());
                }
            }
        }
    }

    Ok(graph)
}

fn toposort(graph: &BTreeMap<String, BTreeSet<String>>) -> std::result::Result<Vec<String>, Vec<String>> {
    let mut indegree: BTreeMap<String, usize> = BTreeMap::new();

    for node in graph.keys() {
        indegree.entry(node.clone()).or_insert(0);
    }

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(target.clone()).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<String> = indegree
        .iter()
        .filter_map(|(node, count)| (*count == 0).then(|| node.clone()))
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.pop_first() {
        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(target.clone());
                    }
                }
            }
        }
        order.push(node);
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        let cycle_nodes: Vec<String> = indegree
            .into_iter()
            .filter_map(|(node, count)| (count > 0).then_some(node))
            .collect();
        Err(cycle_nodes)
    }
}
