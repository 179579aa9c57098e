//! Case-insensitive substring filtering over states, LGAs and wards.
//!
//! An entity matches a [`Criteria`] when every non-empty term's value is
//! contained in the corresponding field, ignoring case. A field the entity
//! does not have fails any non-empty term.

use ward_map_boundary_models::{
    Criteria, Lga, LgaField, State, StateField, WardFeature, WardField,
};

use crate::hierarchy::{extract_lgas, extract_states};

/// An entity whose fields can be looked up by a typed field key.
pub trait Filterable {
    /// The field key type.
    type Field;

    /// Returns the value of `field`, if the entity has one.
    fn field(&self, field: &Self::Field) -> Option<&str>;

    /// Whether this entity satisfies every term in `criteria`.
    fn matches(&self, criteria: &Criteria<Self::Field>) -> bool {
        criteria.active_terms().all(|(field, needle)| {
            self.field(field)
                .is_some_and(|value| contains_ignore_case(value, needle))
        })
    }
}

impl Filterable for State {
    type Field = StateField;

    fn field(&self, field: &StateField) -> Option<&str> {
        Some(match field {
            StateField::Name => self.name.as_str(),
            StateField::Code => self.code.as_str(),
        })
    }
}

impl Filterable for Lga {
    type Field = LgaField;

    fn field(&self, field: &LgaField) -> Option<&str> {
        match field {
            LgaField::Name => Some(self.name.as_str()),
            LgaField::Code => Some(self.code.as_str()),
            LgaField::StateName => self.state_name.as_deref(),
        }
    }
}

impl Filterable for WardFeature {
    type Field = WardField;

    fn field(&self, field: &WardField) -> Option<&str> {
        let props = &self.properties;
        match field {
            WardField::WardName => props.wardname.as_deref(),
            WardField::WardCode => props.wardcode.as_deref(),
            WardField::LgaName => props.lganame.as_deref(),
            WardField::LgaCode => props.lgacode.as_deref(),
            WardField::StateName => props.statename.as_deref(),
            WardField::StateCode => props.statecode.as_deref(),
        }
    }
}

/// Case-insensitive substring test.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// States matching `criteria`, in extraction order.
#[must_use]
pub fn filter_states(features: &[WardFeature], criteria: &Criteria<StateField>) -> Vec<State> {
    extract_states(features)
        .into_iter()
        .filter(|state| state.matches(criteria))
        .collect()
}

/// LGAs matching `criteria`, in extraction order.
#[must_use]
pub fn filter_lgas(features: &[WardFeature], criteria: &Criteria<LgaField>) -> Vec<Lga> {
    extract_lgas(features, None)
        .into_iter()
        .filter(|lga| lga.matches(criteria))
        .collect()
}

/// Wards matching `criteria`, in input order.
///
/// Wildcard criteria return every ward unchanged.
#[must_use]
pub fn filter_wards<'a>(
    features: &'a [WardFeature],
    criteria: &Criteria<WardField>,
) -> Vec<&'a WardFeature> {
    features
        .iter()
        .filter(|ward| ward.matches(criteria))
        .collect()
}

/// LGAs belonging to the state named `state_name` (exact match).
#[must_use]
pub fn lgas_by_state(features: &[WardFeature], state_name: &str) -> Vec<Lga> {
    extract_lgas(features, Some(state_name))
}

/// Wards of the LGA `lga_name` in state `state_name`, in input order.
///
/// LGA names repeat across states, so both must match exactly.
#[must_use]
pub fn wards_by_lga<'a>(
    features: &'a [WardFeature],
    lga_name: &str,
    state_name: &str,
) -> Vec<&'a WardFeature> {
    features
        .iter()
        .filter(|ward| {
            ward.properties.lganame.as_deref() == Some(lga_name)
                && ward.properties.statename.as_deref() == Some(state_name)
        })
        .collect()
}

/// Wards of the state named `state_name` (exact match), in input order.
#[must_use]
pub fn wards_by_state<'a>(features: &'a [WardFeature], state_name: &str) -> Vec<&'a WardFeature> {
    features
        .iter()
        .filter(|ward| ward.properties.statename.as_deref() == Some(state_name))
        .collect()
}
