//! All-pairs shortest path distance matrix.

use crate::models::{Cost, LocationId, RoadId, RoadNetwork};

/// A dense n×n shortest-path matrix over a [`RoadNetwork`], stored in
/// row-major order.
///
/// Alongside each distance it keeps the first road of one shortest path, so
/// whole paths can be reconstructed.
///
/// # Algorithm
///
/// Floyd–Warshall over road lengths. Ties keep the earlier path, so results
/// are deterministic for a given network.
///
/// # Complexity
///
/// O(n³) time and O(n²) space for n locations. The matrix is computed once
/// per problem and is read-only afterwards.
///
/// # Examples
///
/// ```
/// use u_transport::models::{Cost, RoadNetwork};
/// use u_transport::distance::DistanceMatrix;
///
/// let network = RoadNetwork::builder()
///     .location("a", 0.0, 0.0)
///     .location("b", 1.0, 0.0)
///     .location("c", 2.0, 0.0)
///     .road("a", "b", 5)
///     .road("b", "c", 7)
///     .road("a", "c", 20)
///     .build()
///     .expect("valid network");
/// let dm = DistanceMatrix::compute(&network);
///
/// let a = network.resolve("a").expect("a");
/// let c = network.resolve("c").expect("c");
/// assert_eq!(dm.get(a, c), Some(Cost::new(12)));
/// assert_eq!(dm.get(c, a), None);
/// assert_eq!(dm.path(a, c).map(|p| p.len()), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    dist: Vec<Option<Cost>>,
    next: Vec<Option<(RoadId, LocationId)>>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes shortest distances between every pair of locations.
    pub fn compute(network: &RoadNetwork) -> Self {
        let n = network.num_locations();
        let mut dist = vec![None; n * n];
        let mut next = vec![None; n * n];
        for i in 0..n {
            dist[i * n + i] = Some(Cost::ZERO);
        }
        for road in network.roads() {
            let cell = road.from().index() * n + road.to().index();
            if dist[cell].is_none_or(|d| road.length() < d) {
                dist[cell] = Some(road.length());
                next[cell] = Some((road.id(), road.to()));
            }
        }

        for k in 0..n {
            for i in 0..n {
                let Some(ik) = dist[i * n + k] else {
                    continue;
                };
                for j in 0..n {
                    let Some(kj) = dist[k * n + j] else {
                        continue;
                    };
                    let through = ik + kj;
                    let cell = i * n + j;
                    if dist[cell].is_none_or(|d| through < d) {
                        dist[cell] = Some(through);
                        next[cell] = next[i * n + k];
                    }
                }
            }
        }

        Self { dist, next, size: n }
    }

    /// Shortest distance from `from` to `to`, or `None` if unreachable.
    ///
    /// # Panics
    ///
    /// Panics if either id is out of bounds.
    pub fn get(&self, from: LocationId, to: LocationId) -> Option<Cost> {
        self.dist[from.index() * self.size + to.index()]
    }

    /// Returns `true` if `to` can be reached from `from`.
    pub fn is_reachable(&self, from: LocationId, to: LocationId) -> bool {
        self.get(from, to).is_some()
    }

    /// Roads of one shortest path from `from` to `to`.
    ///
    /// Returns an empty path when `from == to` and `None` if `to` is
    /// unreachable.
    pub fn path(&self, from: LocationId, to: LocationId) -> Option<Vec<RoadId>> {
        self.get(from, to)?;
        let mut roads = Vec::new();
        let mut at = from;
        while at != to {
            let (road, head) = self.next[at.index() * self.size + to.index()]?;
            roads.push(road);
            at = head;
        }
        Some(roads)
    }

    /// Returns the reachable candidate closest to `from`.
    ///
    /// Ties go to the earlier candidate. Returns `None` if no candidate is
    /// reachable.
    pub fn nearest(&self, from: LocationId, candidates: &[LocationId]) -> Option<LocationId> {
        candidates
            .iter()
            .filter_map(|&c| self.get(from, c).map(|d| (d, c)))
            .min_by_key(|&(d, _)| d)
            .map(|(_, c)| c)
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use proptest::prelude::*;

    #[test]
    fn test_shortest_distances() {
        let net = fixtures::five_location_network();
        let dm = DistanceMatrix::compute(&net);
        let id = |n: &str| net.resolve(n).expect("location");

        assert_eq!(dm.size(), 5);
        assert_eq!(dm.get(id("L1"), id("L1")), Some(Cost::ZERO));
        assert_eq!(dm.get(id("L1"), id("L2")), Some(Cost::new(20)));
        assert_eq!(dm.get(id("L4"), id("L5")), Some(Cost::new(30)));
        assert_eq!(dm.get(id("L1"), id("L5")), Some(Cost::new(30)));
        assert_eq!(dm.get(id("L2"), id("L4")), Some(Cost::new(30)));
    }

    #[test]
    fn test_unreachable() {
        let net = RoadNetwork::builder()
            .location("a", 0.0, 0.0)
            .location("b", 0.0, 0.0)
            .road("a", "b", 3)
            .build()
            .expect("valid");
        let dm = DistanceMatrix::compute(&net);
        let a = LocationId::new(0);
        let b = LocationId::new(1);
        assert!(dm.is_reachable(a, b));
        assert!(!dm.is_reachable(b, a));
        assert!(dm.path(b, a).is_none());
    }

    #[test]
    fn test_path_reconstruction() {
        let net = fixtures::five_location_network();
        let dm = DistanceMatrix::compute(&net);
        let from = net.resolve("L1").expect("L1");
        let to = net.resolve("L5").expect("L5");

        let path = dm.path(from, to).expect("reachable");
        let names: Vec<&str> = path.iter().map(|&r| net.road(r).name()).collect();
        assert_eq!(names, vec!["L1->L3", "L3->L5"]);
        let length: Cost = path.iter().map(|&r| net.road(r).length()).sum();
        assert_eq!(Some(length), dm.get(from, to));
        assert_eq!(dm.path(from, from), Some(Vec::new()));
    }

    #[test]
    fn test_nearest() {
        let net = fixtures::five_location_network();
        let dm = DistanceMatrix::compute(&net);
        let id = |n: &str| net.resolve(n).expect("location");
        assert_eq!(dm.nearest(id("L1"), &[id("L2"), id("L3")]), Some(id("L3")));
        assert_eq!(dm.nearest(id("L1"), &[]), None);
    }

    fn arb_network() -> impl Strategy<Value = RoadNetwork> {
        (2usize..7).prop_flat_map(|n| {
            prop::collection::vec((0..n, 0..n, 0i32..50), 0..(n * n)).prop_map(move |edges| {
                let mut builder = RoadNetwork::builder();
                for i in 0..n {
                    builder = builder.location(format!("v{i}"), 0.0, 0.0);
                }
                let mut seen = std::collections::HashSet::new();
                for (from, to, len) in edges {
                    if from != to && seen.insert((from, to)) {
                        builder = builder.road(format!("v{from}"), format!("v{to}"), len);
                    }
                }
                builder.build().expect("generated network is valid")
            })
        })
    }

    proptest! {
        #[test]
        fn test_triangle_inequality(net in arb_network()) {
            let dm = DistanceMatrix::compute(&net);
            let n = net.num_locations();
            for a in 0..n {
                for b in 0..n {
                    for c in 0..n {
                        let (a, b, c) = (LocationId::new(a), LocationId::new(b), LocationId::new(c));
                        if let (Some(ab), Some(bc)) = (dm.get(a, b), dm.get(b, c)) {
                            let ac = dm.get(a, c);
                            prop_assert!(ac.is_some());
                            prop_assert!(ac.expect("reachable") <= ab + bc);
                        }
                    }
                }
            }
        }

        #[test]
        fn test_paths_match_distances(net in arb_network()) {
            let dm = DistanceMatrix::compute(&net);
            let n = net.num_locations();
            for a in 0..n {
                for b in 0..n {
                    let (a, b) = (LocationId::new(a), LocationId::new(b));
                    if let Some(path) = dm.path(a, b) {
                        let length: Cost = path.iter().map(|&r| net.road(r).length()).sum();
                        prop_assert_eq!(Some(length), dm.get(a, b));
                    }
                }
            }
        }
    }
}
