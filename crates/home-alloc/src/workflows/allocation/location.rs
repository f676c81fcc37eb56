//! Road distances between houses and distance-bounded neighbourhood search.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::domain::HouseId;

/// Undirected weighted graph keyed by house id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationGraph {
    links: HashMap<HouseId, Vec<(HouseId, f64)>>,
}

/// A house reachable from the search origin and its shortest road distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyHouse {
    pub house_id: HouseId,
    pub distance: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("distance between {from} and {to} must be finite and non-negative (got {distance})")]
    InvalidDistance {
        from: HouseId,
        to: HouseId,
        distance: f64,
    },
    #[error("{0} cannot be linked to itself")]
    SelfLink(HouseId),
    #[error("invalid location CSV data: {0}")]
    Csv(#[from] csv::Error),
}

impl LocationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a two-way road of `distance` between two houses.
    pub fn link(&mut self, from: HouseId, to: HouseId, distance: f64) -> Result<(), LocationError> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(LocationError::InvalidDistance { from, to, distance });
        }
        if from == to {
            return Err(LocationError::SelfLink(from));
        }
        self.links
            .entry(from.clone())
            .or_default()
            .push((to.clone(), distance));
        self.links.entry(to).or_default().push((from, distance));
        Ok(())
    }

    pub fn contains(&self, house: &HouseId) -> bool {
        self.links.contains_key(house)
    }

    /// Houses within `max_distance` of `start` by shortest road distance,
    /// nearest first. The origin itself is never listed.
    pub fn nearby(&self, start: &HouseId, max_distance: f64) -> Vec<NearbyHouse> {
        let mut best: HashMap<&HouseId, f64> = HashMap::new();
        let mut frontier = BinaryHeap::new();
        best.insert(start, 0.0);
        frontier.push(Frontier {
            distance: 0.0,
            house: start,
        });

        while let Some(Frontier { distance, house }) = frontier.pop() {
            if best.get(house).is_some_and(|known| distance > *known) {
                continue;
            }
            for (next, step) in self.links.get(house).into_iter().flatten() {
                let reached = distance + step;
                if reached > max_distance {
                    continue;
                }
                if best.get(next).map_or(true, |known| reached < *known) {
                    best.insert(next, reached);
                    frontier.push(Frontier {
                        distance: reached,
                        house: next,
                    });
                }
            }
        }

        let mut nearby: Vec<NearbyHouse> = best
            .into_iter()
            .filter(|(house, _)| *house != start)
            .map(|(house, distance)| NearbyHouse {
                house_id: house.clone(),
                distance,
            })
            .collect();
        nearby.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.house_id.cmp(&b.house_id))
        });
        nearby
    }
}

/// Min-heap entry ordered by distance.
struct Frontier<'a> {
    distance: f64,
    house: &'a HouseId,
}

impl PartialEq for Frontier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier<'_> {}

impl PartialOrd for Frontier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.house.cmp(self.house))
    }
}

#[derive(Debug, Deserialize)]
struct LinkRow {
    from: String,
    to: String,
    distance: f64,
}

/// Read `from,to,distance` rows into a graph.
pub fn parse_links<R: Read>(reader: R) -> Result<LocationGraph, LocationError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut graph = LocationGraph::new();
    for record in csv_reader.deserialize::<LinkRow>() {
        let row = record?;
        graph.link(HouseId(row.from), HouseId(row.to), row.distance)?;
    }
    Ok(graph)
}
