//! Derives the state and LGA levels from the flat ward collection.
//!
//! States are deduplicated by `statecode` and LGAs by `lgacode`. When a
//! code appears with differing names, the last ward seen wins, but the
//! entity keeps the position where its code first appeared. Wards missing
//! the fields an entity needs are skipped and counted.

use std::collections::BTreeMap;

use ward_map_boundary_models::{Lga, State, WardFeature};

/// Distinct states referenced by the wards, in first-seen order.
#[must_use]
pub fn extract_states(features: &[WardFeature]) -> Vec<State> {
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut states: Vec<State> = Vec::new();
    let mut skipped = 0usize;

    for feature in features {
        let props = &feature.properties;
        let (Some(name), Some(code)) = (&props.statename, &props.statecode) else {
            skipped += 1;
            continue;
        };

        let state = State {
            name: name.clone(),
            code: code.clone(),
        };
        match index.get(code.as_str()) {
            Some(&i) => states[i] = state,
            None => {
                index.insert(code.as_str(), states.len());
                states.push(state);
            }
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} wards without statename/statecode while extracting states");
    }

    states
}

/// Distinct LGAs referenced by the wards, in first-seen order.
///
/// With `state_name`, only LGAs whose ward records name exactly that state
/// (case-sensitive) are returned.
#[must_use]
pub fn extract_lgas(features: &[WardFeature], state_name: Option<&str>) -> Vec<Lga> {
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut lgas: Vec<Lga> = Vec::new();
    let mut skipped = 0usize;

    for feature in features {
        let props = &feature.properties;
        let (Some(name), Some(code)) = (&props.lganame, &props.lgacode) else {
            skipped += 1;
            continue;
        };

        if let Some(wanted) = state_name
            && props.statename.as_deref() != Some(wanted)
        {
            continue;
        }

        let lga = Lga {
            name: name.clone(),
            code: code.clone(),
            state_name: props.statename.clone(),
        };
        match index.get(code.as_str()) {
            Some(&i) => lgas[i] = lga,
            None => {
                index.insert(code.as_str(), lgas.len());
                lgas.push(lga);
            }
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} wards without lganame/lgacode while extracting LGAs");
    }

    lgas
}

/// Sorts entities by display name, the order selection lists use.
///
/// Names compare case-insensitively; names equal apart from case fall
/// back to a plain comparison so the order is total.
pub fn sort_by_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| {
        let (a, b) = (name(a), name(b));
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use ward_map_boundary_models::{FeatureId, WardProperties};

    fn ward(state: (&str, &str), lga: (&str, &str), name: &str) -> WardFeature {
        WardFeature {
            id: FeatureId(0),
            properties: WardProperties {
                statename: Some(state.0.to_string()),
                statecode: Some(state.1.to_string()),
                lganame: Some(lga.0.to_string()),
                lgacode: Some(lga.1.to_string()),
                wardname: Some(name.to_string()),
                wardcode: None,
            },
            geometry: None,
        }
    }

    fn sample() -> Vec<WardFeature> {
        vec![
            ward(("Lagos", "LA"), ("Ikeja", "LA01"), "Anifowoshe"),
            ward(("Lagos", "LA"), ("Ikeja", "LA01"), "Oregun"),
            ward(("Lagos", "LA"), ("Epe", "LA02"), "Ise"),
            ward(("Kano", "KN"), ("Dala", "KN01"), "Kabuwaya"),
            ward(("Ogun", "OG"), ("Ikenne", "OG01"), "Ilisan"),
        ]
    }

    #[test]
    fn states_are_unique_and_come_from_input() {
        let features = sample();
        let states = extract_states(&features);

        let codes: BTreeSet<&str> = states.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes.len(), states.len());
        assert_eq!(states.len(), 3);

        for state in &states {
            assert!(features.iter().any(|f| {
                f.properties.statename.as_deref() == Some(state.name.as_str())
                    && f.properties.statecode.as_deref() == Some(state.code.as_str())
            }));
        }
    }

    #[test]
    fn later_name_wins_but_position_is_kept() {
        let features = vec![
            ward(("Lagos", "LA"), ("Ikeja", "LA01"), "a"),
            ward(("Kano", "KN"), ("Dala", "KN01"), "b"),
            ward(("Lagos State", "LA"), ("Ikeja", "LA01"), "c"),
        ];
        let states = extract_states(&features);
        assert_eq!(states[0].name, "Lagos State");
        assert_eq!(states[1].name, "Kano");
    }

    #[test]
    fn incomplete_wards_are_skipped() {
        let mut features = sample();
        features[0].properties.statecode = None;
        features[3].properties.statename = None;
        features[3].properties.lgacode = None;

        let states = extract_states(&features);
        assert!(states.iter().all(|s| s.code != "KN"));
        assert_eq!(states.len(), 2);

        let lgas = extract_lgas(&features, None);
        assert!(lgas.iter().all(|l| l.code != "KN01"));
    }

    #[test]
    fn lgas_scoped_to_state_by_exact_name() {
        let features = sample();
        let lgas = extract_lgas(&features, Some("Lagos"));
        let names: Vec<&str> = lgas.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Ikeja", "Epe"]);

        assert!(extract_lgas(&features, Some("lagos")).is_empty());
        assert_eq!(extract_lgas(&features, None).len(), 4);
    }

    #[test]
    fn sorts_by_name() {
        let mut lgas = extract_lgas(&sample(), Some("Lagos"));
        sort_by_name(&mut lgas, |l| l.name.as_str());
        assert_eq!(lgas[0].name, "Epe");
    }

    #[test]
    fn sorting_ignores_case() {
        let mut names: Vec<String> = ["ikeja", "Epe", "Ibadan", "IKEJA"]
            .into_iter()
            .map(String::from)
            .collect();
        sort_by_name(&mut names, String::as_str);
        assert_eq!(names, vec!["Epe", "Ibadan", "IKEJA", "ikeja"]);
    }
}
