//! Hierarchical layout algorithm
//!
//! Rank assignment is multi-source BFS from the roots with first-reached
//! semantics (not longest-path Sugiyama ranking); within a rank, nodes are
//! centered symmetrically about the cross-axis origin.

use std::collections::{HashMap, VecDeque};

use crate::layout::{FlowEdge, FlowNode, LayoutOptions, Position};

/// Assign a BFS rank to every node id.
///
/// Roots (no incoming edges) sit at rank 0. A fully cyclic graph has no
/// roots; it degrades to `i mod 3` ranks in input order rather than failing.
/// Nodes unreachable from any root stay at rank 0.
pub fn assign_ranks(nodes: &[FlowNode], edges: &[FlowEdge]) -> HashMap<String, i64> {
    let known: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut incoming: HashMap<&str, usize> = HashMap::new();
    let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        // Edges touching unknown ids carry no layout information
        if !known.contains_key(edge.source.as_str()) || !known.contains_key(edge.target.as_str())
        {
            continue;
        }
        *incoming.entry(edge.target.as_str()).or_default() += 1;
        outgoing
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let roots: Vec<&str> = nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| !incoming.contains_key(id))
        .collect();

    let mut ranks: HashMap<String, i64> = HashMap::new();

    if roots.is_empty() {
        // No root to anchor a BFS on: modulo ranks in input order
        for (i, node) in nodes.iter().enumerate() {
            ranks.insert(node.id.clone(), (i % 3) as i64);
        }
        return ranks;
    }

    let mut queue: VecDeque<&str> = VecDeque::new();
    for root in &roots {
        ranks.insert((*root).to_string(), 0);
        queue.push_back(root);
    }
    while let Some(id) = queue.pop_front() {
        let rank = ranks[id];
        for &next in outgoing.get(id).map(Vec::as_slice).unwrap_or(&[]) {
            // First visit fixes the rank; later edges into the same node
            // cannot move it
            if !ranks.contains_key(next) {
                ranks.insert(next.to_string(), rank + 1);
                queue.push_back(next);
            }
        }
    }

    for node in nodes {
        ranks.entry(node.id.clone()).or_insert(0);
    }
    ranks
}

/// Lay out nodes as a rank diagram. Pure: input nodes are cloned and only
/// their positions change.
pub fn layout(nodes: &[FlowNode], edges: &[FlowEdge], options: &LayoutOptions) -> Vec<FlowNode> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let ranks = assign_ranks(nodes, edges);
    let max_rank = ranks.values().copied().max().unwrap_or(0);

    // Nodes per rank, preserving input order within a rank
    let mut by_rank: HashMap<i64, Vec<usize>> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        by_rank.entry(ranks[&node.id]).or_default().push(i);
    }

    let (cross_dim, rank_dim) = if options.direction.is_horizontal() {
        (options.node_height, options.node_width)
    } else {
        (options.node_width, options.node_height)
    };

    let mut out = nodes.to_vec();
    for (rank, members) in &by_rank {
        let effective_rank = if options.direction.is_reversed() {
            max_rank - rank
        } else {
            *rank
        };
        let rank_offset = effective_rank as f64 * (rank_dim + options.rank_sep);
        let count = members.len();
        for (i, &node_index) in members.iter().enumerate() {
            let cross_offset =
                (i as f64 - (count as f64 - 1.0) / 2.0) * (cross_dim + options.node_sep);
            out[node_index].position = if options.direction.is_horizontal() {
                Position {
                    x: rank_offset,
                    y: cross_offset,
                }
            } else {
                Position {
                    x: cross_offset,
                    y: rank_offset,
                }
            };
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Direction;
    use serde_json::json;

    fn node(id: &str) -> FlowNode {
        FlowNode {
            id: id.to_string(),
            node_type: "resource".to_string(),
            position: Position::default(),
            data: json!({}),
        }
    }

    fn edge(source: &str, target: &str) -> FlowEdge {
        FlowEdge {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn test_unknown_edge_endpoints_are_ignored() {
        let nodes = vec![node("a"), node("b")];
        let edges = vec![edge("ghost", "a"), edge("a", "b")];
        let ranks = assign_ranks(&nodes, &edges);
        assert_eq!(ranks["a"], 0);
        assert_eq!(ranks["b"], 1);
    }

    #[test]
    fn test_unreachable_nodes_default_to_rank_zero() {
        // b and c form a cycle no root reaches; they fall back to rank 0
        let nodes = vec![node("a"), node("b"), node("c")];
        let edges = vec![edge("b", "c"), edge("c", "b")];
        let ranks = assign_ranks(&nodes, &edges);
        assert_eq!(ranks["a"], 0);
        assert_eq!(ranks["b"], 0);
        assert_eq!(ranks["c"], 0);
    }

    #[test]
    fn test_reversed_direction_mirrors_ranks() {
        let nodes = vec![node("a"), node("b")];
        let edges = vec![edge("a", "b")];
        let options = LayoutOptions {
            direction: Direction::BottomTop,
            ..Default::default()
        };
        let laid = layout(&nodes, &edges, &options);
        let a = laid.iter().find(|n| n.id == "a").unwrap();
        let b = laid.iter().find(|n| n.id == "b").unwrap();
        // Root at the bottom, child above it
        assert!(a.position.y > b.position.y);
        assert_eq!(b.position.y, 0.0);
    }

    #[test]
    fn test_horizontal_direction_swaps_axes() {
        let nodes = vec![node("a"), node("b")];
        let edges = vec![edge("a", "b")];
        let options = LayoutOptions {
            direction: Direction::LeftRight,
            ..Default::default()
        };
        let laid = layout(&nodes, &edges, &options);
        let a = laid.iter().find(|n| n.id == "a").unwrap();
        let b = laid.iter().find(|n| n.id == "b").unwrap();
        assert_eq!(a.position.x, 0.0);
        assert_eq!(
            b.position.x,
            options.node_width + options.rank_sep
        );
        assert_eq!(a.position.y, 0.0);
        assert_eq!(b.position.y, 0.0);
    }
}
