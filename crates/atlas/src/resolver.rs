use std::collections::HashMap;

use model::Stop;

/// Result of joining one direction's path (ordered stop IDs) against the
/// points catalog: the resolved stops in path order, how many path entries
/// had no match in the catalog, and how many resolved stops are "unnamed"
/// (empty name or an inactive status) but still usable for geometry.
pub struct ResolvedPath {
    pub stops: Vec<Stop>,
    pub unresolved_ids: Vec<i64>,
    pub unnamed_count: u32,
}

pub fn resolve_path(path: &[i64], points: &HashMap<i64, Stop>) -> ResolvedPath {
    let mut stops = Vec::with_capacity(path.len());
    let mut unresolved_ids = Vec::new();
    let mut unnamed_count = 0;

    for stop_id in path {
        match points.get(stop_id) {
            Some(stop) => {
                if stop.name.trim().is_empty() || !stop.is_live {
                    unnamed_count += 1;
                }
                stops.push(stop.clone());
            }
            None => unresolved_ids.push(*stop_id),
        }
    }

    ResolvedPath {
        stops,
        unresolved_ids,
        unnamed_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: i64, name: &str, is_live: bool) -> Stop {
        Stop {
            id,
            name: name.to_string(),
            latitude: 50.0,
            longitude: 14.0,
            direction: "forward".to_string(),
            is_live,
        }
    }

    #[test]
    fn drops_ids_missing_from_catalog() {
        let mut catalog = HashMap::new();
        catalog.insert(1, stop(1, "Centre", true));
        let resolved = resolve_path(&[1, 2, 3], &catalog);
        assert_eq!(resolved.stops.len(), 1);
        assert_eq!(resolved.unresolved_ids, vec![2, 3]);
    }

    #[test]
    fn counts_unnamed_and_inactive_stops_but_keeps_them() {
        let mut catalog = HashMap::new();
        catalog.insert(1, stop(1, "", true));
        catalog.insert(2, stop(2, "Depot", false));
        let resolved = resolve_path(&[1, 2], &catalog);
        assert_eq!(resolved.stops.len(), 2);
        assert_eq!(resolved.unnamed_count, 2);
    }
}
