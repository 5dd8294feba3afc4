//! Node groups for component coloring.

use graphwalk_graph::{Graph, NodeId, Orientation};

use crate::step::Visited;

/// Group nodes by reachability, in discovery order.
///
/// Each unassigned node in graph order seeds a stack walk; everything the
/// walk reaches joins its group. Under [`Orientation::Undirected`] these are
/// the connected components. Under [`Orientation::Directed`] only outgoing
/// edges are followed, so a later seed never joins an earlier group.
pub fn connected_components(graph: &Graph, orientation: Orientation) -> Vec<Vec<NodeId>> {
    let adjacency = graph.adjacency(orientation);
    let mut assigned = Visited::default();
    let mut components = Vec::new();

    for seed in graph.node_ids() {
        if assigned.contains(seed) {
            continue;
        }

        let mut component = Vec::new();
        let mut stack = vec![seed];
        while let Some(node) = stack.pop() {
            if !assigned.insert(node) {
                continue;
            }
            component.push(node);
            stack.extend(adjacency.neighbor_ids(node).filter(|&n| !assigned.contains(n)));
        }
        components.push(component);
    }

    components
}
