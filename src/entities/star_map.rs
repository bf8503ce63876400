//! The star map: an undirected jump-lane graph between systems (§3 StarMap).

use crate::core::ids::SystemId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Lane classification gates which fleet compositions may traverse it
/// (§3: restricted lanes exclude capital-class hulls, §4.x movement rules).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneClass {
    Major,
    Minor,
    Restricted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lane {
    pub a: SystemId,
    pub b: SystemId,
    pub class: LaneClass,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StarMap {
    lanes: Vec<Lane>,
    adjacency: HashMap<SystemId, Vec<usize>>,
}

impl StarMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_lane(&mut self, a: SystemId, b: SystemId, class: LaneClass) {
        let index = self.lanes.len();
        self.lanes.push(Lane { a, b, class });
        self.adjacency.entry(a).or_default().push(index);
        self.adjacency.entry(b).or_default().push(index);
    }

    pub fn neighbors(&self, system: SystemId) -> impl Iterator<Item = (SystemId, LaneClass)> + '_ {
        self.adjacency
            .get(&system)
            .into_iter()
            .flatten()
            .map(move |&idx| {
                let lane = &self.lanes[idx];
                let other = if lane.a == system { lane.b } else { lane.a };
                (other, lane.class)
            })
    }

    /// Shortest hop-count path between two systems, honouring `allowed` (a
    /// predicate over lane class reflecting the moving fleet's composition,
    /// e.g. restricted lanes closed to capital hulls). Returns `None` if
    /// unreachable.
    pub fn shortest_path(
        &self,
        from: SystemId,
        to: SystemId,
        allowed: impl Fn(LaneClass) -> bool,
    ) -> Option<Vec<SystemId>> {
        if from == to {
            return Some(vec![from]);
        }
        let mut visited = HashMap::new();
        visited.insert(from, from);
        let mut queue = VecDeque::new();
        queue.push_back(from);
        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to];
                let mut cursor = to;
                while cursor != from {
                    cursor = visited[&cursor];
                    path.push(cursor);
                }
                path.reverse();
                return Some(path);
            }
            for (next, class) in self.neighbors(current) {
                if allowed(class) && !visited.contains_key(&next) {
                    visited.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_shortest_path_across_lanes() {
        let mut map = StarMap::new();
        map.add_lane(SystemId(0), SystemId(1), LaneClass::Major);
        map.add_lane(SystemId(1), SystemId(2), LaneClass::Major);
        map.add_lane(SystemId(0), SystemId(2), LaneClass::Restricted);

        let path = map
            .shortest_path(SystemId(0), SystemId(2), |class| class != LaneClass::Restricted)
            .unwrap();
        assert_eq!(path, vec![SystemId(0), SystemId(1), SystemId(2)]);
    }

    #[test]
    fn unreachable_when_only_lane_is_disallowed() {
        let mut map = StarMap::new();
        map.add_lane(SystemId(0), SystemId(1), LaneClass::Restricted);
        let path = map.shortest_path(SystemId(0), SystemId(1), |class| class != LaneClass::Restricted);
        assert!(path.is_none());
    }
}
