//! Free-text search across all three hierarchy levels.
//!
//! A query is matched against state names, LGA names and ward names. The
//! wards of every matched state and LGA, plus every directly matched ward,
//! are unioned into one list with duplicates removed. Order is insertion
//! order: state wards first, then LGA wards, then ward matches.

use std::collections::BTreeSet;

use ward_map_boundary_models::{
    Criteria, FeatureId, Lga, LgaField, State, StateField, WardFeature, WardField,
};

use crate::filter::{filter_lgas, filter_states, filter_wards, wards_by_lga, wards_by_state};

/// The outcome of a free-text search.
#[derive(Debug, Clone, Default)]
pub struct SearchResults<'a> {
    /// States whose name contains the query.
    pub states: Vec<State>,
    /// LGAs whose name contains the query.
    pub lgas: Vec<Lga>,
    /// Wards whose name contains the query.
    pub wards: Vec<&'a WardFeature>,
    /// Union of every ward covered by the matches above, deduplicated.
    pub features: Vec<&'a WardFeature>,
}

impl SearchResults<'_> {
    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Runs a free-text search for `query` over `features`.
///
/// The query is trimmed; an empty query matches nothing.
#[must_use]
pub fn search<'a>(features: &'a [WardFeature], query: &str) -> SearchResults<'a> {
    let query = query.trim();
    if query.is_empty() {
        return SearchResults::default();
    }

    let states = filter_states(features, &Criteria::new().with(StateField::Name, query));
    let lgas = filter_lgas(features, &Criteria::new().with(LgaField::Name, query));
    let wards = filter_wards(features, &Criteria::new().with(WardField::WardName, query));

    let mut seen: BTreeSet<FeatureId> = BTreeSet::new();
    let mut combined: Vec<&'a WardFeature> = Vec::new();
    let mut push = |ward: &'a WardFeature| {
        if seen.insert(ward.id) {
            combined.push(ward);
        }
    };

    for state in &states {
        wards_by_state(features, &state.name)
            .into_iter()
            .for_each(&mut push);
    }
    for lga in &lgas {
        if let Some(state_name) = &lga.state_name {
            wards_by_lga(features, &lga.name, state_name)
                .into_iter()
                .for_each(&mut push);
        }
    }
    wards.iter().copied().for_each(&mut push);

    log::debug!(
        "Search {query:?}: {} states, {} LGAs, {} wards -> {} features",
        states.len(),
        lgas.len(),
        wards.len(),
        combined.len()
    );

    SearchResults {
        states,
        lgas,
        wards,
        features: combined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_map_boundary_models::WardProperties;

    fn ward(id: usize, state: &str, lga: &str, name: &str) -> WardFeature {
        WardFeature {
            id: FeatureId(id),
            properties: WardProperties {
                statename: Some(state.to_string()),
                statecode: Some(state.to_uppercase()),
                lganame: Some(lga.to_string()),
                lgacode: Some(format!("{state}/{lga}")),
                wardname: Some(name.to_string()),
                wardcode: None,
            },
            geometry: None,
        }
    }

    fn sample() -> Vec<WardFeature> {
        vec![
            ward(0, "Kano", "Dala", "Kabuwaya"),
            ward(1, "Kano", "Kano Municipal", "Zaitawa"),
            ward(2, "Lagos", "Ikeja", "Kanokan"),
            ward(3, "Lagos", "Ikeja", "Ojodu"),
            ward(4, "Ogun", "Ikenne", "Ilisan"),
        ]
    }

    fn ids(results: &SearchResults<'_>) -> Vec<usize> {
        results.features.iter().map(|w| w.id.0).collect()
    }

    #[test]
    fn unions_all_levels_without_duplicates() {
        let features = sample();
        let results = search(&features, "kano");

        assert_eq!(results.states.len(), 1);
        assert_eq!(results.lgas.len(), 1);
        assert_eq!(results.wards.len(), 1);
        // Kano state wards, then Kano Municipal (already included), then
        // the Lagos ward "Kanokan".
        assert_eq!(ids(&results), vec![0, 1, 2]);
    }

    #[test]
    fn lga_match_pulls_in_its_wards() {
        let features = sample();
        let results = search(&features, "ikej");
        assert!(results.states.is_empty());
        assert_eq!(ids(&results), vec![2, 3]);
    }

    #[test]
    fn no_match_and_blank_query_are_empty() {
        let features = sample();
        assert!(search(&features, "zzz").is_empty());
        assert!(search(&features, "   ").is_empty());
    }
}
