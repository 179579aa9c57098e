//! Merging ward polygons into state and LGA outlines.
//!
//! [`merge_geometries`] stacks polygons without dissolving shared edges.
//! [`dissolve_geometries`] performs a real topological union and is only
//! used when [`Aggregation::Dissolve`] is configured.

use geo::{BooleanOps as _, BoundingRect as _, MultiPolygon};
use geojson::{Geometry, PolygonType, Value};
use ward_map_boundary_models::{Aggregation, Bounds, WardFeature};

/// Combines ward geometries using the given strategy.
#[must_use]
pub fn aggregate<'a>(
    features: impl IntoIterator<Item = &'a WardFeature>,
    aggregation: Aggregation,
) -> Geometry {
    match aggregation {
        Aggregation::Concatenate => merge_geometries(features),
        Aggregation::Dissolve => dissolve_geometries(features),
    }
}

/// Concatenates the polygons of every feature into one `MultiPolygon`.
///
/// A `Polygon` contributes itself and a `MultiPolygon` contributes each of
/// its parts, so the output nesting is always valid. Features without
/// polygonal geometry contribute nothing; an empty input yields a
/// `MultiPolygon` with no coordinates.
#[must_use]
pub fn merge_geometries<'a>(features: impl IntoIterator<Item = &'a WardFeature>) -> Geometry {
    let mut polygons: Vec<PolygonType> = Vec::new();

    for feature in features {
        match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Polygon(rings)) => polygons.push(rings.clone()),
            Some(Value::MultiPolygon(parts)) => polygons.extend(parts.iter().cloned()),
            Some(_) => {
                log::debug!("Skipping non-polygonal geometry on feature {}", feature.id.0);
            }
            None => {}
        }
    }

    Geometry::new(Value::MultiPolygon(polygons))
}

/// Unions the polygons of every feature, dissolving shared edges.
#[must_use]
pub fn dissolve_geometries<'a>(features: impl IntoIterator<Item = &'a WardFeature>) -> Geometry {
    let dissolved = features
        .into_iter()
        .filter_map(to_multi_polygon)
        .fold(MultiPolygon::new(Vec::new()), |acc, next| acc.union(&next));

    Geometry::new(Value::from(&dissolved))
}

/// Combined bounding box of the features, or `None` if none of them has
/// a geometry with extent.
#[must_use]
pub fn bounds<'a>(features: impl IntoIterator<Item = &'a WardFeature>) -> Option<Bounds> {
    features
        .into_iter()
        .filter_map(|feature| feature.geometry.as_ref().and_then(geometry_bounds))
        .reduce(Bounds::union)
}

/// Bounding box of a single `GeoJSON` geometry.
#[must_use]
pub fn geometry_bounds(geometry: &Geometry) -> Option<Bounds> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;

    geo_geom
        .bounding_rect()
        .map(|rect| Bounds::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
}

fn to_multi_polygon(feature: &WardFeature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;

    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}
