//! Grouping, sorting and searching over record lists.

use crate::SortDirection;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Partition items by the string form of a key.
///
/// Groups appear in order of their first member and keep input order inside.
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> IndexMap<String, Vec<T>>
where
    F: Fn(&T) -> K,
    K: ToString,
{
    let mut groups: IndexMap<String, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(key(&item).to_string()).or_default().push(item);
    }
    groups
}

/// Stable sort by a key. `Desc` flips the comparison, so equal keys keep
/// their input order in both directions. Incomparable keys count as equal.
pub fn sort_by<T, K, F>(mut items: Vec<T>, key: F, direction: SortDirection) -> Vec<T>
where
    F: Fn(&T) -> K,
    K: PartialOrd,
{
    items.sort_by(|a, b| {
        let ordering = key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    items
}

/// Keep items where any of `keys` contains `query`, ignoring case.
///
/// Despite the name this is plain substring matching. A blank query returns
/// the input untouched.
pub fn fuzzy_search<T>(items: Vec<T>, query: &str, keys: &[fn(&T) -> String]) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }

    items
        .into_iter()
        .filter(|item| {
            keys.iter()
                .any(|key| key(item).to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Species;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        species: Species,
        weight: f64,
    }

    fn row(name: &'static str, species: Species, weight: f64) -> Row {
        Row { name, species, weight }
    }

    fn by_name(r: &Row) -> String {
        r.name.to_string()
    }

    fn by_species(r: &Row) -> String {
        r.species.to_string()
    }

    #[test]
    fn test_group_by_preserves_order() {
        let items = vec![
            row("Bessie", Species::Cattle, 1200.0),
            row("Dolly", Species::Sheep, 150.0),
            row("Duke", Species::Cattle, 1350.0),
        ];

        let groups = group_by(items.clone(), |r| r.species);

        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["cattle", "sheep"]);
        assert_eq!(groups["cattle"], vec![items[0].clone(), items[2].clone()]);
        assert_eq!(groups["sheep"], vec![items[1].clone()]);
    }

    #[test]
    fn test_sort_by_is_stable_in_both_directions() {
        let items = vec![
            row("A", Species::Cattle, 10.0),
            row("B", Species::Swine, 5.0),
            row("C", Species::Goats, 10.0),
            row("D", Species::Sheep, 1.0),
        ];

        let asc: Vec<_> = sort_by(items.clone(), |r| r.weight, SortDirection::Asc)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(asc, vec!["D", "B", "A", "C"]);

        let desc: Vec<_> = sort_by(items, |r| r.weight, SortDirection::Desc)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(desc, vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_fuzzy_search_blank_query_is_identity() {
        let items = vec![row("Bessie", Species::Cattle, 1.0), row("Dolly", Species::Sheep, 1.0)];
        assert_eq!(fuzzy_search(items.clone(), "", &[by_name]), items);
        assert_eq!(fuzzy_search(items.clone(), "   ", &[by_name]), items);
    }

    #[test]
    fn test_fuzzy_search_matches_any_key() {
        let items = vec![
            row("Bessie", Species::Cattle, 1.0),
            row("Dolly", Species::Sheep, 1.0),
            row("Sheba", Species::Goats, 1.0),
        ];

        let found: Vec<_> = fuzzy_search(items.clone(), " SHE ", &[by_name, by_species])
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(found, vec!["Dolly", "Sheba"]);

        let found = fuzzy_search(items, "cattle", &[by_name]);
        assert!(found.is_empty());
    }
}
