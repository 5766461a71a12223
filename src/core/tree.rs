//! Ancestor paths and common-ancestor lookup.
//!
//! Used only while transitions are built; evaluation works from the spans
//! computed here and never walks the tree upwards.

/// Path from the root down to `node`, inclusive.
pub fn ancestors<T: Copy>(node: T, parent: impl Fn(T) -> Option<T>) -> Vec<T> {
    let mut path = vec![node];
    let mut current = node;
    while let Some(next) = parent(current) {
        path.push(next);
        current = next;
    }
    path.reverse();
    path
}

/// Index of the element to leave when moving between two ancestor paths.
///
/// Paths alternate vertex and region, so vertices sit at even indices. The
/// result is the first index at which the paths differ, pulled back onto a
/// vertex: when one path is a prefix of the other it is the last element of
/// the shorter path, and when the paths part ways at a region it is the
/// state owning both regions.
pub fn lca<T: PartialEq>(source: &[T], target: &[T]) -> usize {
    let shortest = source.len().min(target.len());
    let mut index = source
        .iter()
        .zip(target)
        .take_while(|(a, b)| a == b)
        .count();

    if index == shortest {
        index = shortest.saturating_sub(1);
    }

    if index % 2 == 1 {
        index -= 1;
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(node: u32) -> Option<u32> {
        // 0 is the root; every other node's parent is node / 10.
        (node != 0).then_some(node / 10)
    }

    #[test]
    fn ancestors_run_from_root_to_node() {
        assert_eq!(ancestors(123, parent), vec![0, 1, 12, 123]);
        assert_eq!(ancestors(0, parent), vec![0]);
    }

    #[test]
    fn siblings_diverge_at_the_vertex() {
        // root, region, a  vs  root, region, b
        assert_eq!(lca(&[0, 1, 2], &[0, 1, 3]), 2);
    }

    #[test]
    fn orthogonal_regions_diverge_at_their_owner() {
        // root, r, s, r1, a  vs  root, r, s, r2, b
        assert_eq!(lca(&[0, 1, 2, 3, 4], &[0, 1, 2, 5, 6]), 2);
    }

    #[test]
    fn self_transition_leaves_the_vertex_itself() {
        assert_eq!(lca(&[0, 1, 2], &[0, 1, 2]), 2);
    }

    #[test]
    fn descendant_target_leaves_the_source() {
        assert_eq!(lca(&[0, 1, 2], &[0, 1, 2, 3, 4]), 2);
    }

    #[test]
    fn ancestor_target_leaves_the_target() {
        assert_eq!(lca(&[0, 1, 2, 3, 4], &[0, 1, 2]), 2);
    }

    #[test]
    fn root_only_paths_stay_at_root() {
        assert_eq!(lca(&[0], &[0]), 0);
    }
}
