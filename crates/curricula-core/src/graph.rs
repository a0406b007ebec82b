use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Summary of prerequisite graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrereqGraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Report for prerequisite ordering.
///
/// Courses on a cycle can never have their prerequisites met, whatever the
/// selection looks like. `cycle` lists only courses that lie on a cycle;
/// courses that merely depend on one are listed in `blocked`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrereqGraphReport {
    pub summary: PrereqGraphSummary,
    pub topo_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked: Vec<String>,
}

/// Build a deterministic prerequisite dependency report for a catalog.
pub fn build_prereq_graph_report(catalog: &Catalog) -> PrereqGraphReport {
    let graph = build_adjacency(catalog);
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = PrereqGraphSummary { nodes, edges };

    match toposort(&graph) {
        Ok(order) => PrereqGraphReport {
            summary,
            topo_order: Some(order),
            cycle: None,
            blocked: Vec::new(),
        },
        Err(leftover) => {
            let (cycle, blocked): (Vec<String>, Vec<String>) = leftover
                .into_iter()
                .partition(|node| reaches_itself(&graph, node));
            PrereqGraphReport {
                summary,
                topo_order: None,
                cycle: Some(cycle),
                blocked,
            }
        }
    }
}

/// Whether `start` can be reached again by following its outgoing edges.
fn reaches_itself(graph: &BTreeMap<String, BTreeSet<String>>, start: &str) -> bool {
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut stack: Vec<&str> = graph
        .get(start)
        .map(|targets| targets.iter().map(String::as_str).collect())
        .unwrap_or_default();

    while let Some(node) = stack.pop() {
        if node == start {
            return true;
        }
        if !visited.insert(node) {
            continue;
        }
        if let Some(targets) = graph.get(node) {
            stack.extend(targets.iter().map(String::as_str));
        }
    }
    false
}

/// Edges point from the required course to the course that depends on it.
fn build_adjacency(catalog: &Catalog) -> BTreeMap<String, BTreeSet<String>> {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for course in catalog.courses() {
        if !course.code.is_empty() {
            graph.entry(course.code.clone()).or_default();
        }
    }

    for edge in catalog.prerequisites() {
        if edge.course.is_empty() || edge.required_course.is_empty() {
            continue;
        }
        graph.entry(edge.course.clone()).or_default();
        graph
            .entry(edge.required_course.clone())
            .or_default()
            .insert(edge.course.clone());
    }

    graph
}

fn toposort(graph: &BTreeMap<String, BTreeSet<String>>) -> Result<Vec<String>, Vec<String>> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PrereqKind, PrerequisiteEdge};

    fn edge(course: &str, required: &str) -> PrerequisiteEdge {
        PrerequisiteEdge {
            course: course.to_string(),
            required_course: required.to_string(),
            kind: PrereqKind::Pre,
        }
    }

    #[test]
    fn toposort_orders_required_courses_first() {
        let catalog = Catalog::from_records(
            Vec::new(),
            vec![edge("50.022", "50.008"), edge("50.008", "50.001")],
            Vec::new(),
            Vec::new(),
        );

        let report = build_prereq_graph_report(&catalog);
        let order = report.topo_order.expect("expected toposort");
        let position = |code: &str| order.iter().position(|item| item == code).unwrap();
        assert!(position("50.001") < position("50.008"));
        assert!(position("50.008") < position("50.022"));
        assert_eq!(report.summary.nodes, 3);
        assert_eq!(report.summary.edges, 2);
    }

    #[test]
    fn toposort_reports_cycle() {
        let catalog = Catalog::from_records(
            Vec::new(),
            vec![
                edge("50.021", "50.007"),
                edge("50.007", "50.021"),
                edge("50.030", "50.001"),
            ],
            Vec::new(),
            Vec::new(),
        );

        let report = build_prereq_graph_report(&catalog);
        assert!(report.topo_order.is_none());
        let cycle = report.cycle.expect("cycle reported");
        assert!(cycle.contains(&"50.021".to_string()));
        assert!(cycle.contains(&"50.007".to_string()));
        assert!(!cycle.contains(&"50.001".to_string()));
    }

    #[test]
    fn courses_downstream_of_a_cycle_are_blocked_not_cyclic() {
        let catalog = Catalog::from_records(
            Vec::new(),
            vec![
                edge("A", "B"),
                edge("B", "A"),
                edge("C", "A"),
                edge("D", "C"),
            ],
            Vec::new(),
            Vec::new(),
        );

        let report = build_prereq_graph_report(&catalog);
        assert!(report.topo_order.is_none());
        assert_eq!(report.cycle, Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(report.blocked, ["C", "D"]);
    }

    #[test]
    fn self_prerequisite_is_a_cycle_of_one() {
        let catalog = Catalog::from_records(
            Vec::new(),
            vec![edge("50.001", "50.001"), edge("50.002", "50.001")],
            Vec::new(),
            Vec::new(),
        );

        let report = build_prereq_graph_report(&catalog);
        assert_eq!(report.cycle, Some(vec!["50.001".to_string()]));
        assert_eq!(report.blocked, ["50.002"]);

        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["blocked"], serde_json::json!(["50.002"]));
    }

    #[test]
    fn acyclic_report_omits_blocked() {
        let catalog = Catalog::from_records(
            Vec::new(),
            vec![edge("50.002", "50.001")],
            Vec::new(),
            Vec::new(),
        );

        let json = serde_json::to_value(build_prereq_graph_report(&catalog)).expect("serialize");
        assert!(json.get("blocked").is_none());
        assert!(json["cycle"].is_null());
    }
}
