//! Candidate beach model and candidate selection

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A candidate beach, identified by its name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Beach {
    pub name: String,
    pub location: GeoPoint,
}

impl Beach {
    #[must_use]
    pub fn new(name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// Keep the first beach of each name, preserving the places ordering, and truncate to `limit`.
#[must_use]
pub fn select_candidates(places: impl IntoIterator<Item = Beach>, limit: usize) -> Vec<Beach> {
    let mut seen = HashSet::new();

    places
        .into_iter()
        .filter(|beach| seen.insert(beach.name.clone()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beach(name: &str, latitude: f64) -> Beach {
        Beach::new(name, GeoPoint::new(latitude, 151.0))
    }

    #[test]
    fn test_duplicate_names_keep_first_occurrence() {
        let places = vec![
            beach("Bondi Beach", -33.89),
            beach("Tamarama Beach", -33.90),
            beach("Bondi Beach", -33.95),
        ];

        let candidates = select_candidates(places, 5);

        assert_eq!(candidates.len(), 2);
        let bondi: Vec<_> = candidates
            .iter()
            .filter(|b| b.name == "Bondi Beach")
            .collect();
        assert_eq!(bondi.len(), 1);
        assert_eq!(bondi[0].location.latitude, -33.89);
    }

    #[test]
    fn test_truncates_without_reordering() {
        let places: Vec<Beach> = (0..8)
            .map(|i| beach(&format!("Beach {i}"), -33.0 - f64::from(i)))
            .collect();

        let candidates = select_candidates(places, 5);

        let names: Vec<&str> = candidates.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Beach 0", "Beach 1", "Beach 2", "Beach 3", "Beach 4"]
        );
    }

    #[test]
    fn test_duplicates_do_not_consume_the_limit() {
        let places = vec![
            beach("A", 0.0),
            beach("A", 0.1),
            beach("A", 0.2),
            beach("B", 0.3),
        ];

        let candidates = select_candidates(places, 2);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].name, "B");
    }
}
