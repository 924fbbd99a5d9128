use crate::network::HigherOrderNetwork;

/// Degrees of freedom of the order-`order` model over all *possible* k-grams
///
/// A k-gram is possible when it is a walk of k-1 edges in the first-order
/// network. Each possible k-gram ending in entity `v` contributes
/// `outdeg(v) - 1` free parameters, where `outdeg` is the first-order out-degree.
/// Walks are counted per end node, so nothing is enumerated.
///
/// Transitions a higher order rules out in the data still count here, so the
/// value does not shrink when the observed network prunes them.
/// Order 0 counts the entities of `first_order` only; an entity that never
/// appears in a path of length >= 2 is missing there.
pub fn possible_degrees_of_freedom(first_order: &HigherOrderNetwork, order: usize) -> usize {
    let n = first_order.node_count();

    if order == 0 {
        return n.saturating_sub(1);
    }

    // walks[v] = number of walks with k-1 edges ending in v
    let mut walks = vec![1usize; n];
    for _ in 1..order {
        let mut next = vec![0usize; n];
        for edge in first_order.edges() {
            let reached = &mut next[edge.target.index()];
            *reached = reached.saturating_add(walks[edge.source.index()]);
        }
        walks = next;
    }

    first_order
        .nodes()
        .map(|(id, _)| {
            let free = first_order.out_degree(id).saturating_sub(1);
            walks[id.index()].saturating_mul(free)
        })
        .fold(0usize, usize::saturating_add)
}
