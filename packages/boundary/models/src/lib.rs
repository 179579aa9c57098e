#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward, LGA and state boundary types.
//!
//! The dataset is a flat collection of ward polygons. Every ward carries
//! denormalized copies of its owning LGA and state, so the coarser levels
//! ([`State`], [`Lga`]) are derived from the wards rather than stored.

use std::str::FromStr;

use geojson::{Feature, Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Position of a ward within the loaded dataset.
///
/// The dataset is never mutated after load, so the position is a stable
/// identity for the lifetime of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub usize);

/// The denormalized hierarchy properties carried by every ward.
///
/// Every field is optional because real datasets contain incomplete
/// records; extraction skips records that lack what it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardProperties {
    /// State name (e.g. "Lagos").
    pub statename: Option<String>,
    /// State code (e.g. "LA").
    pub statecode: Option<String>,
    /// LGA name (e.g. "Ikeja").
    pub lganame: Option<String>,
    /// LGA code.
    pub lgacode: Option<String>,
    /// Ward name.
    pub wardname: Option<String>,
    /// Ward code, when the dataset provides one.
    pub wardcode: Option<String>,
}

impl WardProperties {
    /// Converts the properties back to a `GeoJSON` property object,
    /// omitting absent fields.
    #[must_use]
    pub fn to_json_object(&self) -> JsonObject {
        let mut props = JsonObject::new();
        for (key, value) in [
            ("statename", &self.statename),
            ("statecode", &self.statecode),
            ("lganame", &self.lganame),
            ("lgacode", &self.lgacode),
            ("wardname", &self.wardname),
            ("wardcode", &self.wardcode),
        ] {
            if let Some(value) = value {
                props.insert(key.to_string(), serde_json::Value::String(value.clone()));
            }
        }
        props
    }
}

/// A single ward boundary record.
#[derive(Debug, Clone, PartialEq)]
pub struct WardFeature {
    /// Position in the dataset.
    pub id: FeatureId,
    /// Hierarchy properties.
    pub properties: WardProperties,
    /// Ward geometry (`Polygon` or `MultiPolygon`), if present.
    pub geometry: Option<Geometry>,
}

impl WardFeature {
    /// Converts the ward to a `GeoJSON` feature for display.
    #[must_use]
    pub fn to_feature(&self) -> Feature {
        Feature {
            bbox: None,
            geometry: self.geometry.clone(),
            id: None,
            properties: Some(self.properties.to_json_object()),
            foreign_members: None,
        }
    }
}

/// A state derived from the wards that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// State name.
    pub name: String,
    /// State code (the deduplication key).
    pub code: String,
}

/// A local government area derived from the wards that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lga {
    /// LGA name.
    pub name: String,
    /// LGA code (the deduplication key).
    pub code: String,
    /// Name of the owning state, if the ward recorded one.
    pub state_name: Option<String>,
}

/// Level of the administrative hierarchy.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    /// Top-level state.
    State,
    /// Local government area.
    Lga,
    /// Ward (leaf).
    Ward,
}

/// How ward polygons are combined into a state or LGA outline.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Aggregation {
    /// Stack every ward polygon into one `MultiPolygon`. Shared edges
    /// between wards remain visible.
    #[default]
    Concatenate,
    /// Topological union of the ward polygons. Shared edges dissolve.
    Dissolve,
}

/// An aggregate outline for a state or LGA.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Which level this outline represents.
    pub level: Level,
    /// Entity name.
    pub name: String,
    /// Entity code, when known.
    pub code: Option<String>,
    /// Owning state name (LGA and ward outlines only).
    pub state_name: Option<String>,
    /// Combined geometry.
    pub geometry: Geometry,
}

impl Boundary {
    /// Converts the outline to a `GeoJSON` feature whose properties use
    /// the same keys as the ward records (`statename`, `lganame`, ...).
    #[must_use]
    pub fn to_feature(&self) -> Feature {
        let (name_key, code_key) = match self.level {
            Level::State => ("statename", "statecode"),
            Level::Lga => ("lganame", "lgacode"),
            Level::Ward => ("wardname", "wardcode"),
        };

        let mut props = JsonObject::new();
        props.insert(
            name_key.to_string(),
            serde_json::Value::String(self.name.clone()),
        );
        if let Some(code) = &self.code {
            props.insert(code_key.to_string(), serde_json::Value::String(code.clone()));
        }
        if self.level != Level::State
            && let Some(state_name) = &self.state_name
        {
            props.insert(
                "statename".to_string(),
                serde_json::Value::String(state_name.clone()),
            );
        }

        Feature {
            bbox: None,
            geometry: Some(self.geometry.clone()),
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }
}

/// A longitude/latitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

impl Bounds {
    /// Creates a new bounding box.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    /// Center as `[lat, lon]`, the order map surfaces take for views.
    #[must_use]
    pub fn center(&self) -> [f64; 2] {
        [
            f64::midpoint(self.south, self.north),
            f64::midpoint(self.west, self.east),
        ]
    }
}

/// Filterable fields of a [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum StateField {
    /// State name.
    Name,
    /// State code.
    Code,
}

/// Filterable fields of an [`Lga`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum LgaField {
    /// LGA name.
    Name,
    /// LGA code.
    Code,
    /// Owning state name.
    StateName,
}

/// Filterable property fields of a [`WardFeature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum WardField {
    /// Ward name. Also accepts the legacy key `name`.
    #[strum(to_string = "wardname", serialize = "name")]
    WardName,
    /// Ward code.
    WardCode,
    /// LGA name.
    LgaName,
    /// LGA code.
    LgaCode,
    /// State name.
    StateName,
    /// State code.
    StateCode,
}

/// A conjunction of case-insensitive substring terms over the fields `F`.
///
/// Terms with an empty value are wildcards and always pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria<F> {
    terms: Vec<(F, String)>,
}

impl<F> Default for Criteria<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Criteria<F> {
    /// Creates an empty criteria set, which matches everything.
    #[must_use]
    pub const fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Adds a term.
    #[must_use]
    pub fn with(mut self, field: F, value: impl Into<String>) -> Self {
        self.terms.push((field, value.into()));
        self
    }

    /// Iterates the non-wildcard terms.
    pub fn active_terms(&self) -> impl Iterator<Item = (&F, &str)> {
        self.terms
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(field, value)| (field, value.as_str()))
    }

    /// Whether every term is a wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.active_terms().next().is_none()
    }
}

impl<F: FromStr> Criteria<F> {
    /// Builds criteria from `(field name, value)` pairs, e.g. query
    /// string parameters.
    ///
    /// # Errors
    ///
    /// Returns the field's parse error for the first unknown field name.
    pub fn parse<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, F::Err>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(key, value)| -> Result<(F, String), F::Err> {
                Ok((key.as_ref().parse::<F>()?, value.into()))
            })
            .collect()
    }
}

impl<F> FromIterator<(F, String)> for Criteria<F> {
    fn from_iter<I: IntoIterator<Item = (F, String)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ward_field_accepts_legacy_name_key() {
        assert_eq!("name".parse::<WardField>().unwrap(), WardField::WardName);
        assert_eq!("wardname".parse::<WardField>().unwrap(), WardField::WardName);
        assert_eq!(WardField::WardName.to_string(), "wardname");
        assert_eq!("statename".parse::<WardField>().unwrap(), WardField::StateName);
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!("population".parse::<StateField>().is_err());
        assert!(Criteria::<LgaField>::parse([("nme", "x")]).is_err());
    }

    #[test]
    fn empty_values_are_wildcards() {
        let criteria = Criteria::new()
            .with(StateField::Name, "")
            .with(StateField::Code, "");
        assert!(criteria.is_wildcard());

        let criteria = criteria.with(StateField::Name, "lag");
        let active: Vec<_> = criteria.active_terms().collect();
        assert_eq!(active, vec![(&StateField::Name, "lag")]);
    }

    #[test]
    fn bounds_union_and_center() {
        let a = Bounds::new(3.0, 6.0, 4.0, 7.0);
        let b = Bounds::new(2.5, 6.5, 3.5, 8.0);
        let u = a.union(b);
        assert_eq!(u, Bounds::new(2.5, 6.0, 4.0, 8.0));
        assert_eq!(u.center(), [7.0, 3.25]);
    }

    #[test]
    fn lga_boundary_feature_carries_state_name() {
        let boundary = Boundary {
            level: Level::Lga,
            name: "Ikeja".to_string(),
            code: Some("25010".to_string()),
            state_name: Some("Lagos".to_string()),
            geometry: Geometry::new(geojson::Value::MultiPolygon(vec![])),
        };
        let props = boundary.to_feature().properties.unwrap();
        assert_eq!(props["lganame"], "Ikeja");
        assert_eq!(props["lgacode"], "25010");
        assert_eq!(props["statename"], "Lagos");
    }
}
