//! Insertion: layer assignment, descent, candidate gathering, connection.

use rand::Rng;

use crate::distance::euclidean_sq;
use crate::hnsw::graph::Graph;
use crate::hnsw::node::Node;
use crate::hnsw::search::search_layer;

/// Draw the top layer for a new node: `⌊-ln(U) · level_mult⌋` with `U`
/// uniform in (0, 1]. No upper bound is imposed.
fn random_level(graph: &mut Graph) -> usize {
    // 1.0 - r maps the generator's [0, 1) onto (0, 1], keeping ln finite.
    let u: f64 = 1.0 - graph.rng.random::<f64>();
    (-u.ln() * graph.level_mult).floor() as usize
}

/// Insert `vector` into the graph. The caller has already validated the
/// dimension and holds the index lock.
pub(crate) fn insert(graph: &mut Graph, vector: Vec<f32>) {
    let level = random_level(graph);
    let id = graph.nodes.len() as u32;
    let node = Node::new(id, vector, level);

    if graph.nodes.is_empty() {
        // Sole member and permanent entry point.
        graph.nodes.push(node);
        return;
    }

    // The node joins the arena up front so the back-references written by
    // `connect` always resolve. It stays unreachable at every layer until
    // connected there, so no search below can return it.
    graph.nodes.push(node);
    let query = graph.nodes[id as usize].vector().to_vec(); // copy: the arena is mutated below

    let ef = graph.params.ef;
    let m = graph.params.m;

    // The first-ever node is the permanent entry point; it is not promoted
    // when a later node draws a higher level, so layers above its top stay
    // unreachable.
    let mut ep: u32 = 0;
    let ep_top = graph.nodes[ep as usize].top_layer();

    // Greedy one-step descent through the layers above the new node's top.
    for layer in ((level + 1)..=ep_top).rev() {
        ep = search_layer(&graph.nodes, ep, &query, 1, layer)[0].0;
    }

    // Gather candidates and connect from the highest shared layer down to
    // the base layer, reseeding the entry from the closest candidate.
    for layer in (0..=level.min(ep_top)).rev() {
        let candidates = search_layer(&graph.nodes, ep, &query, ef, layer);
        ep = candidates[0].0;
        connect(&mut graph.nodes, id, &candidates, layer, m);
    }
}

/// Symmetrically connect the new node `id` to `candidates` at `layer`.
///
/// Candidates arrive in ascending distance order, so the bounded append on
/// the new node's side keeps its `m` closest. A full neighbor only takes
/// the new node when it is strictly closer than the neighbor's farthest
/// current friend, measured from the neighbor's own vector.
fn connect(nodes: &mut [Node], id: u32, candidates: &[(u32, f32)], layer: usize, m: usize) {
    for &(other, _) in candidates {
        let other_idx = other as usize;

        if nodes[other_idx].friends(layer).len() < m {
            nodes[other_idx].push_friend(layer, id, m);
        } else {
            let mut worst_idx = 0;
            let mut worst_dist = 0.0_f32;
            for (i, &w) in nodes[other_idx].friends(layer).iter().enumerate() {
                let d = euclidean_sq(nodes[other_idx].vector(), nodes[w as usize].vector());
                if d > worst_dist {
                    worst_dist = d;
                    worst_idx = i;
                }
            }
            let candidate_dist =
                euclidean_sq(nodes[other_idx].vector(), nodes[id as usize].vector());
            if candidate_dist < worst_dist {
                nodes[other_idx].replace_friend(layer, worst_idx, id);
            }
        }

        nodes[id as usize].push_friend(layer, other, m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(id: u32, x: f32) -> Node {
        Node::new(id, vec![x], 0)
    }

    #[test]
    fn connect_links_both_sides_when_room() {
        let mut nodes = vec![node_at(0, 0.0), node_at(1, 1.0)];
        connect(&mut nodes, 1, &[(0, 1.0)], 0, 4);
        assert_eq!(nodes[0].friends(0), &[1]);
        assert_eq!(nodes[1].friends(0), &[0]);
    }

    #[test]
    fn connect_displaces_the_farthest_friend() {
        // Node 0 is saturated with friends at x = 5 and x = 9; the new
        // node at x = 1 is closer than the farthest (x = 9).
        let mut nodes = vec![node_at(0, 0.0), node_at(1, 5.0), node_at(2, 9.0), node_at(3, 1.0)];
        nodes[0].push_friend(0, 1, 2);
        nodes[0].push_friend(0, 2, 2);

        connect(&mut nodes, 3, &[(0, 1.0)], 0, 2);
        assert_eq!(nodes[0].friends(0), &[1, 3]);
        assert_eq!(nodes[3].friends(0), &[0]);
    }

    #[test]
    fn connect_leaves_a_full_neighbor_when_new_node_is_farther() {
        let mut nodes = vec![node_at(0, 0.0), node_at(1, 1.0), node_at(2, 2.0), node_at(3, 9.0)];
        nodes[0].push_friend(0, 1, 2);
        nodes[0].push_friend(0, 2, 2);

        connect(&mut nodes, 3, &[(0, 9.0)], 0, 2);
        // Node 0 keeps its closer friends; the new node still records 0.
        assert_eq!(nodes[0].friends(0), &[1, 2]);
        assert_eq!(nodes[3].friends(0), &[0]);
    }

    #[test]
    fn new_node_keeps_only_the_closest_m() {
        let mut nodes = vec![
            node_at(0, 1.0),
            node_at(1, 2.0),
            node_at(2, 3.0),
            node_at(3, 0.0),
        ];
        // Candidates ascending by distance to node 3 at x = 0.
        connect(&mut nodes, 3, &[(0, 1.0), (1, 2.0), (2, 3.0)], 0, 2);
        assert_eq!(nodes[3].friends(0), &[0, 1]);
        // Every candidate still received the back-reference.
        assert_eq!(nodes[0].friends(0), &[3]);
        assert_eq!(nodes[1].friends(0), &[3]);
        assert_eq!(nodes[2].friends(0), &[3]);
    }
}
