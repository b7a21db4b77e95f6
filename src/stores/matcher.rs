//! Nearby-store search and ingredient availability matching

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::geo::{distance_km, GeoCoordinate};

/// A store from the directory, read-only to the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub coordinates: GeoCoordinate,
    #[serde(default)]
    pub items: Vec<String>,
}

/// A store annotated with its distance from the search origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyStore {
    #[serde(flatten)]
    pub store: Store,
    pub distance_km: f64,
}

/// Ingredient name -> ids of stores carrying it, in store evaluation order
pub type ItemAvailabilityMap = BTreeMap<String, Vec<String>>;

/// Stores within `radius_km` of `origin` (inclusive), nearest first.
///
/// The sort is stable, so equidistant stores keep their input order.
pub fn find_nearby_stores(
    origin: GeoCoordinate,
    radius_km: f64,
    stores: &[Store],
) -> Vec<NearbyStore> {
    let mut nearby: Vec<NearbyStore> = stores
        .iter()
        .filter_map(|store| {
            let distance = distance_km(origin, store.coordinates);
            (distance <= radius_km).then(|| NearbyStore {
                store: store.clone(),
                distance_km: distance,
            })
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearby
}

/// Map every ingredient to the stores whose items contain it.
///
/// Each ingredient becomes a key even with no matches. A store id appears at
/// most once per ingredient no matter how many of its items match.
pub fn match_ingredients_to_stores<'a, S, I>(ingredients: &[S], stores: I) -> ItemAvailabilityMap
where
    S: AsRef<str>,
    I: IntoIterator<Item = &'a Store>,
{
    // Lowercase item names once instead of per ingredient
    let catalog: Vec<(&str, Vec<String>)> = stores
        .into_iter()
        .map(|store| {
            let items = store.items.iter().map(|i| i.to_lowercase()).collect();
            (store.id.as_str(), items)
        })
        .collect();

    let mut availability = ItemAvailabilityMap::new();
    for ingredient in ingredients {
        let ingredient = ingredient.as_ref();
        let needle = ingredient.to_lowercase();

        let mut store_ids: Vec<String> = Vec::new();
        for (store_id, items) in &catalog {
            let matched = items.iter().any(|item| item.contains(&needle));
            if matched && !store_ids.iter().any(|id| id == store_id) {
                store_ids.push((*store_id).to_string());
            }
        }

        availability.insert(ingredient.to_string(), store_ids);
    }

    availability
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::geo::EARTH_RADIUS_KM;

    fn origin() -> GeoCoordinate {
        GeoCoordinate::new(0.0, 0.0).unwrap()
    }

    /// A point `km` due north of the origin
    fn north(km: f64) -> GeoCoordinate {
        GeoCoordinate::new((km / EARTH_RADIUS_KM).to_degrees(), 0.0).unwrap()
    }

    fn store(id: &str, coordinates: GeoCoordinate, items: &[&str]) -> Store {
        Store {
            id: id.to_string(),
            name: format!("Store {}", id),
            address: format!("{} Main St", id),
            coordinates,
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_find_nearby_filters_and_sorts() {
        let stores = vec![
            store("two", north(2.0), &[]),
            store("six", north(6.0), &[]),
            store("one", north(1.0), &[]),
        ];

        let nearby = find_nearby_stores(origin(), 5.0, &stores);
        let ids: Vec<&str> = nearby.iter().map(|n| n.store.id.as_str()).collect();
        assert_eq!(ids, vec!["one", "two"]);
        assert_eq!(nearby[0].distance_km, 1.0);
        assert_eq!(nearby[1].distance_km, 2.0);
    }

    #[test]
    fn test_find_nearby_radius_is_inclusive() {
        let stores = vec![store("edge", north(5.0), &[])];
        assert_eq!(find_nearby_stores(origin(), 5.0, &stores).len(), 1);
        assert!(find_nearby_stores(origin(), 4.9, &stores).is_empty());
    }

    #[test]
    fn test_find_nearby_ties_keep_input_order() {
        let stores = vec![
            store("b", north(3.0), &[]),
            store("a", north(3.0), &[]),
            store("c", north(1.0), &[]),
        ];
        let nearby = find_nearby_stores(origin(), 10.0, &stores);
        let ids: Vec<&str> = nearby.iter().map(|n| n.store.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_match_substring_case_insensitive_no_duplicates() {
        let stores = vec![
            store("fruit", origin(), &["Organic Banana Bunch", "banana", "Apples"]),
            store("hardware", origin(), &["Hammer"]),
        ];

        let availability = match_ingredients_to_stores(&["banana"], &stores);
        assert_eq!(availability.len(), 1);
        assert_eq!(availability["banana"], vec!["fruit".to_string()]);
    }

    #[test]
    fn test_match_every_ingredient_is_a_key() {
        let stores = vec![store("s1", origin(), &["Whole Milk"])];

        let availability = match_ingredients_to_stores(&["milk", "saffron"], &stores);
        assert_eq!(availability["milk"], vec!["s1".to_string()]);
        assert_eq!(availability["saffron"], Vec::<String>::new());
    }

    #[test]
    fn test_match_keeps_store_order() {
        let stores = vec![
            store("z", origin(), &["Brown Rice"]),
            store("a", origin(), &["rice flour"]),
            store("m", origin(), &["Jasmine RICE"]),
        ];
        let availability = match_ingredients_to_stores(&["Rice"], &stores);
        assert_eq!(availability["Rice"], vec!["z", "a", "m"]);
    }

    #[test]
    fn test_match_substring_false_positive_is_kept() {
        let stores = vec![store("s1", origin(), &["Peach"])];
        let availability = match_ingredients_to_stores(&["pea"], &stores);
        assert_eq!(availability["pea"], vec!["s1"]);
    }

    #[test]
    fn test_match_over_nearby_results() {
        let stores = vec![
            store("far", north(8.0), &["eggs"]),
            store("near", north(1.0), &["Free Range Eggs"]),
        ];
        let nearby = find_nearby_stores(origin(), 5.0, &stores);
        let availability =
            match_ingredients_to_stores(&["eggs"], nearby.iter().map(|n| &n.store));
        assert_eq!(availability["eggs"], vec!["near"]);
    }
}
