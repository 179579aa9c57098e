//! HTTP handler functions for the ward map API.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use actix_web::{HttpResponse, web};
use ward_map_boundary::filter::{
    Filterable, filter_lgas, filter_states, lgas_by_state, wards_by_lga, wards_by_state,
};
use ward_map_boundary::hierarchy::sort_by_name;
use ward_map_boundary_models::{Criteria, LgaField, StateField, WardFeature, WardField};
use ward_map_server_models::{
    ApiHealth, ApiLga, ApiMapConfig, ApiSearch, ApiState, ApiView, ApiWard, BoundaryQueryParams,
    SearchQueryParams, ViewQueryParams,
};
use ward_map_viewer::controller::Selection;
use ward_map_viewer::notify::LogNotifier;
use ward_map_viewer::surface::SceneSurface;
use ward_map_viewer::{MapController, ViewerError};

use crate::AppState;

type QueryMap = web::Query<BTreeMap<String, String>>;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        features: state.dataset.len(),
    })
}

/// `GET /api/config`
///
/// Initial map center, zoom, tiles and search threshold.
pub async fn map_config(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiMapConfig::from(state.config.as_ref()))
}

/// `GET /api/states?name=&code=`
///
/// States matching the given substrings, sorted by name.
pub async fn states(state: web::Data<AppState>, query: QueryMap) -> HttpResponse {
    let criteria = match criteria::<StateField>(query.into_inner()) {
        Ok(criteria) => criteria,
        Err(resp) => return resp,
    };

    let mut states = filter_states(state.dataset.features(), &criteria);
    sort_by_name(&mut states, |s| s.name.as_str());

    HttpResponse::Ok().json(states.into_iter().map(ApiState::from).collect::<Vec<_>>())
}

/// `GET /api/lgas?state=&name=&code=`
///
/// `state` scopes to one state by exact name; the other keys are
/// substring filters. Sorted by name.
pub async fn lgas(state: web::Data<AppState>, query: QueryMap) -> HttpResponse {
    let mut params = query.into_inner();
    let scope = non_empty(params.remove("state"));

    let criteria = match criteria::<LgaField>(params) {
        Ok(criteria) => criteria,
        Err(resp) => return resp,
    };

    let features = state.dataset.features();
    let mut lgas = match scope {
        Some(state_name) => lgas_by_state(features, &state_name)
            .into_iter()
            .filter(|lga| lga.matches(&criteria))
            .collect(),
        None => filter_lgas(features, &criteria),
    };
    sort_by_name(&mut lgas, |l| l.name.as_str());

    HttpResponse::Ok().json(lgas.into_iter().map(ApiLga::from).collect::<Vec<_>>())
}

/// `GET /api/wards?state=&lga=&wardname=...`
///
/// `state` and `lga` scope by exact name (`lga` requires `state`); any
/// other ward field is a substring filter. Dataset order is kept.
pub async fn wards(state: web::Data<AppState>, query: QueryMap) -> HttpResponse {
    let mut params = query.into_inner();
    let state_name = non_empty(params.remove("state"));
    let lga_name = non_empty(params.remove("lga"));

    let criteria = match criteria::<WardField>(params) {
        Ok(criteria) => criteria,
        Err(resp) => return resp,
    };

    let features = state.dataset.features();
    let scoped: Vec<&WardFeature> = match (state_name.as_deref(), lga_name.as_deref()) {
        (Some(state_name), Some(lga_name)) => wards_by_lga(features, lga_name, state_name),
        (Some(state_name), None) => wards_by_state(features, state_name),
        (None, Some(_)) => return bad_request("'lga' requires 'state'"),
        (None, None) => features.iter().collect(),
    };

    let wards: Vec<ApiWard> = scoped
        .into_iter()
        .filter(|ward| ward.matches(&criteria))
        .map(ApiWard::from)
        .collect();

    HttpResponse::Ok().json(wards)
}

/// `GET /api/search?q=`
pub async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchQueryParams>,
) -> HttpResponse {
    let Some(query) = non_empty(params.into_inner().q.map(|q| q.trim().to_string())) else {
        return bad_request("Missing search query 'q'");
    };

    let results = ward_map_boundary::search::search(state.dataset.features(), &query);

    HttpResponse::Ok().json(ApiSearch {
        feature_count: results.features.len(),
        states: results.states.into_iter().map(ApiState::from).collect(),
        lgas: results.lgas.into_iter().map(ApiLga::from).collect(),
        wards: results.wards.into_iter().map(ApiWard::from).collect(),
        query,
    })
}

/// `GET /api/boundary?state=&lga=`
///
/// The aggregate outline of a state, or of an LGA within it, as a
/// `GeoJSON` feature.
pub async fn boundary(
    state: web::Data<AppState>,
    params: web::Query<BoundaryQueryParams>,
) -> HttpResponse {
    let params = params.into_inner();
    let Some(state_name) = non_empty(params.state) else {
        return bad_request("Missing 'state'");
    };

    let boundary = match non_empty(params.lga) {
        Some(lga_name) => state
            .dataset
            .lga_boundary(&lga_name, &state_name)
            .ok_or_else(|| format!("Unknown LGA {lga_name} in {state_name}")),
        None => state
            .dataset
            .state_boundary(&state_name)
            .ok_or_else(|| format!("Unknown state: {state_name}")),
    };

    match boundary {
        Ok(boundary) => HttpResponse::Ok().json(boundary.to_feature()),
        Err(message) => HttpResponse::NotFound().json(serde_json::json!({ "error": message })),
    }
}

/// `GET /api/view?state=&lga=&ward=&q=`
///
/// Applies the selection (and optional search) to a fresh controller and
/// returns the rendered scene. Notifications are returned and logged.
pub async fn view(state: web::Data<AppState>, params: web::Query<ViewQueryParams>) -> HttpResponse {
    let params = params.into_inner();
    let selection = Selection {
        state: non_empty(params.state),
        lga: non_empty(params.lga),
        ward: non_empty(params.ward),
    };

    let mut controller = match MapController::with_selection(
        Arc::clone(&state.dataset),
        &state.config,
        SceneSurface::new(),
        (Vec::new(), LogNotifier),
        &selection,
    ) {
        Ok(controller) => controller,
        Err(e) => {
            log::debug!("Rejected view request: {e}");
            return viewer_error(&e);
        }
    };

    if let Some(q) = &params.q {
        controller.search(q);
    }

    let view = controller.view();
    let (scene, (notifications, LogNotifier)) = controller.into_parts();

    HttpResponse::Ok().json(ApiView {
        view,
        scene,
        notifications,
    })
}

/// Parses substring criteria from query parameters. Unknown keys are a
/// 400 response naming the key.
fn criteria<F: FromStr>(params: BTreeMap<String, String>) -> Result<Criteria<F>, HttpResponse> {
    params
        .into_iter()
        .map(|(key, value)| match key.parse::<F>() {
            Ok(field) => Ok((field, value)),
            Err(_) => Err(bad_request(&format!("Unknown filter field: {key}"))),
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

fn viewer_error(e: &ViewerError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        ViewerError::UnknownState { .. }
        | ViewerError::UnknownLga { .. }
        | ViewerError::UnknownWard { .. } => HttpResponse::NotFound().json(body),
        ViewerError::NoStateSelected | ViewerError::NoLgaSelected => {
            HttpResponse::BadRequest().json(body)
        }
        ViewerError::Io(_) | ViewerError::Toml(_) => {
            log::error!("Unexpected viewer error: {e}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use ward_map_boundary::Dataset;
    use ward_map_viewer::ViewerConfig;

    use super::*;

    fn square(x: f64, y: f64) -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]]
        })
    }

    fn ward(state: &str, code: &str, lga: &str, lga_code: &str, name: &str, x: f64) -> Value {
        json!({
            "type": "Feature",
            "properties": {
                "statename": state, "statecode": code,
                "lganame": lga, "lgacode": lga_code,
                "wardname": name
            },
            "geometry": square(x, 6.0)
        })
    }

    fn app_state() -> web::Data<AppState> {
        let dataset = Dataset::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                ward("Lagos", "LA", "Ikeja", "LA01", "Ojodu", 3.0),
                ward("Lagos", "LA", "Ikeja", "LA01", "Anifowoshe", 4.0),
                ward("Lagos", "LA", "Epe", "LA02", "Ise", 5.0),
                ward("Abia", "AB", "Aba North", "AB01", "Eziama", 7.0),
                ward("Abia", "AB", "Ikwuano", "AB02", "Ariam", 8.0),
            ]
        }))
        .unwrap();

        web::Data::new(AppState {
            dataset: Arc::new(dataset),
            config: Arc::new(ViewerConfig::default()),
        })
    }

    async fn get(uri: &str) -> (u16, Value) {
        let app =
            test::init_service(App::new().app_data(app_state()).configure(crate::configure)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status().as_u16();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn health_reports_ward_count() {
        let (status, body) = get("/api/health").await;
        assert_eq!(status, 200);
        assert_eq!(body["healthy"], true);
        assert_eq!(body["features"], 5);
    }

    #[actix_web::test]
    async fn states_are_sorted_and_filterable() {
        let (_, body) = get("/api/states").await;
        assert_eq!(body, json!([{"name": "Abia", "code": "AB"}, {"name": "Lagos", "code": "LA"}]));

        let (_, body) = get("/api/states?name=LAG").await;
        assert_eq!(body, json!([{"name": "Lagos", "code": "LA"}]));
    }

    #[actix_web::test]
    async fn unknown_filter_field_is_a_bad_request() {
        let (status, body) = get("/api/states?population=1").await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Unknown filter field: population");
    }

    #[actix_web::test]
    async fn lgas_scope_to_state_exactly() {
        let (_, body) = get("/api/lgas?state=Lagos").await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Epe", "Ikeja"]);

        let (_, body) = get("/api/lgas?state=lagos").await;
        assert_eq!(body, json!([]));

        let (_, body) = get("/api/lgas?name=ik").await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn wards_filter_by_scope_and_fields() {
        let (_, body) = get("/api/wards?state=Lagos&lga=Ikeja").await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["name"], "Ojodu");

        let (_, body) = get("/api/wards?name=ar").await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ariam"]);

        let (status, _) = get("/api/wards?lga=Ikeja").await;
        assert_eq!(status, 400);
    }

    #[actix_web::test]
    async fn search_requires_a_query() {
        let (status, _) = get("/api/search?q=%20").await;
        assert_eq!(status, 400);

        let (status, body) = get("/api/search?q=ikeja").await;
        assert_eq!(status, 200);
        assert_eq!(body["lgas"][0]["name"], "Ikeja");
        assert_eq!(body["featureCount"], 2);
    }

    #[actix_web::test]
    async fn boundary_returns_feature_or_404() {
        let (status, body) = get("/api/boundary?state=Lagos&lga=Ikeja").await;
        assert_eq!(status, 200);
        assert_eq!(body["type"], "Feature");
        assert_eq!(body["properties"]["lganame"], "Ikeja");
        assert_eq!(body["geometry"]["type"], "MultiPolygon");

        let (status, body) = get("/api/boundary?state=Kano").await;
        assert_eq!(status, 404);
        assert_eq!(body["error"], "Unknown state: Kano");
    }

    #[actix_web::test]
    async fn view_replays_selection() {
        let (status, body) = get("/api/view?state=Lagos&lga=Ikeja").await;
        assert_eq!(status, 200);
        assert_eq!(body["state"], "lgaSelected");
        assert_eq!(body["dropdowns"]["ward"]["options"], json!(["Anifowoshe", "Ojodu"]));
        assert_eq!(body["scene"]["layers"][0]["name"], "Ikeja");
        assert_eq!(body["scene"]["viewport"]["type"], "bounds");
    }

    #[actix_web::test]
    async fn view_draws_only_the_selected_level() {
        let (status, body) = get("/api/view?state=Lagos&lga=&ward=").await;
        assert_eq!(status, 200);
        assert_eq!(body["state"], "stateSelected");

        let layers = body["scene"]["layers"].as_array().unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0]["id"], 0);
        assert_eq!(layers[0]["name"], "Lagos");

        let (_, body) = get("/api/view").await;
        assert_eq!(body["state"], "idle");
        assert_eq!(body["scene"]["layers"][0]["id"], 0);
        assert_eq!(body["scene"]["layers"][0]["name"], "States");
        assert_eq!(body["scene"]["viewport"]["type"], "view");
    }

    #[actix_web::test]
    async fn view_reports_unmatched_search_and_bad_selection() {
        let (_, body) = get("/api/view?q=zzz").await;
        assert_eq!(body["searching"], true);
        assert_eq!(body["scene"]["layers"], json!([]));
        assert_eq!(
            body["notifications"],
            json!([{"severity": "info", "message": "No matching results"}])
        );

        let (status, _) = get("/api/view?state=Kano").await;
        assert_eq!(status, 404);

        let (status, _) = get("/api/view?lga=Ikeja").await;
        assert_eq!(status, 400);
    }
}
