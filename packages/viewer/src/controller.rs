//! The drill-down and search state machine.
//!
//! Selection moves `Idle -> StateSelected -> LgaSelected -> WardSelected`.
//! Clearing a level drops everything below it. Free-text search is an
//! orthogonal highlight on top of the current selection.

use std::sync::Arc;

use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use ward_map_boundary::Dataset;
use ward_map_boundary::aggregate::{bounds, geometry_bounds};
use ward_map_boundary::filter::{lgas_by_state, wards_by_lga};
use ward_map_boundary::hierarchy::sort_by_name;
use ward_map_boundary::search::search;
use ward_map_boundary_models::{Boundary, Bounds, WardFeature};

use crate::ViewerConfig;
use crate::ViewerError;
use crate::notify::{Notification, Notifier};
use crate::surface::{Layer, LayerId, LayerStyle, MapSurface};

/// Options and current value of one cascading selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dropdown {
    /// Choices in display order.
    pub options: Vec<String>,
    /// The chosen option, if any.
    pub value: Option<String>,
    /// Whether the selector accepts input.
    pub enabled: bool,
}

impl Dropdown {
    fn enabled(options: Vec<String>) -> Self {
        Self {
            options,
            value: None,
            enabled: true,
        }
    }

    fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// The three cascading selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dropdowns {
    /// Every state in the dataset.
    pub state: Dropdown,
    /// LGAs of the selected state.
    pub lga: Dropdown,
    /// Wards of the selected LGA.
    pub ward: Dropdown,
}

/// Current selection. Always a prefix of the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Selected state name.
    pub state: Option<String>,
    /// Selected LGA name, only with a state.
    pub lga: Option<String>,
    /// Selected ward name, only with an LGA.
    pub ward: Option<String>,
}

/// Which level is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ViewState {
    /// Nothing selected; every state is drawn.
    Idle,
    /// A state outline is highlighted.
    StateSelected,
    /// An LGA outline is highlighted.
    LgaSelected,
    /// A single ward is highlighted.
    WardSelected,
}

impl From<&Selection> for ViewState {
    fn from(selection: &Selection) -> Self {
        match selection {
            Selection { ward: Some(_), .. } => Self::WardSelected,
            Selection { lga: Some(_), .. } => Self::LgaSelected,
            Selection { state: Some(_), .. } => Self::StateSelected,
            Selection { .. } => Self::Idle,
        }
    }
}

/// Everything the controller exposes about its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    /// Deepest selected level.
    pub state: ViewState,
    /// Selected names.
    pub selection: Selection,
    /// Selector options and values.
    pub dropdowns: Dropdowns,
    /// Last search text, untrimmed.
    pub query: String,
    /// Whether a search highlight replaces the selection highlight.
    pub searching: bool,
}

/// Drives a [`MapSurface`] from user selections and search input.
pub struct MapController<S: MapSurface, N: Notifier> {
    dataset: Arc<Dataset>,
    surface: S,
    notifier: N,
    center: [f64; 2],
    zoom: f64,
    min_query_len: usize,
    selection: Selection,
    dropdowns: Dropdowns,
    query: String,
    searching: bool,
    layers: Vec<LayerId>,
}

impl<S: MapSurface, N: Notifier> MapController<S, N> {
    /// Creates a controller, sets the initial view and draws every state.
    pub fn new(dataset: Arc<Dataset>, config: &ViewerConfig, surface: S, notifier: N) -> Self {
        let mut controller = Self::undrawn(dataset, config, surface, notifier);
        controller.surface.set_view(controller.center, controller.zoom);
        controller.draw_overview();
        controller
    }

    /// Creates a controller with `selection` already applied.
    ///
    /// Only the deepest selected level is drawn. With an empty selection
    /// this is the same as [`MapController::new`].
    ///
    /// # Errors
    ///
    /// Returns the first error [`MapController::select_state`],
    /// [`MapController::select_lga`] or [`MapController::select_ward`]
    /// would return for the same names.
    pub fn with_selection(
        dataset: Arc<Dataset>,
        config: &ViewerConfig,
        surface: S,
        notifier: N,
        selection: &Selection,
    ) -> Result<Self, ViewerError> {
        let mut controller = Self::undrawn(dataset, config, surface, notifier);
        if let Some(state) = selection.state.as_deref() {
            controller.apply_state(state)?;
        }
        if let Some(lga) = selection.lga.as_deref() {
            controller.apply_lga(lga)?;
        }
        if let Some(ward) = selection.ward.as_deref() {
            controller.apply_ward(ward)?;
        }

        controller.surface.set_view(controller.center, controller.zoom);
        controller.redraw_selection();
        Ok(controller)
    }

    fn undrawn(dataset: Arc<Dataset>, config: &ViewerConfig, surface: S, notifier: N) -> Self {
        let states = dataset
            .states_by_name()
            .into_iter()
            .map(|s| s.name)
            .collect();

        Self {
            dataset,
            surface,
            notifier,
            center: config.map.center,
            zoom: config.map.zoom,
            min_query_len: config.search.min_query_len,
            selection: Selection::default(),
            dropdowns: Dropdowns {
                state: Dropdown::enabled(states),
                ..Dropdowns::default()
            },
            query: String::new(),
            searching: false,
            layers: Vec::new(),
        }
    }

    /// Selects a state, or clears the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::UnknownState`] if `name` is not a state
    /// option. The controller is left unchanged.
    pub fn select_state(&mut self, name: Option<&str>) -> Result<(), ViewerError> {
        let Some(name) = name else {
            log::debug!("Clearing state selection");
            self.selection = Selection::default();
            self.dropdowns.state.value = None;
            self.dropdowns.lga = Dropdown::default();
            self.dropdowns.ward = Dropdown::default();
            self.searching = false;
            self.surface.set_view(self.center, self.zoom);
            self.draw_overview();
            return Ok(());
        };

        self.apply_state(name)?;
        self.draw_state(name);
        Ok(())
    }

    fn apply_state(&mut self, name: &str) -> Result<(), ViewerError> {
        if !self.dropdowns.state.contains(name) {
            return Err(ViewerError::UnknownState {
                name: name.to_string(),
            });
        }

        log::debug!("Selecting state {name}");
        let mut lgas = lgas_by_state(self.dataset.features(), name);
        sort_by_name(&mut lgas, |l| l.name.as_str());
        let mut options: Vec<String> = lgas.into_iter().map(|l| l.name).collect();
        options.dedup();

        self.selection = Selection {
            state: Some(name.to_string()),
            lga: None,
            ward: None,
        };
        self.dropdowns.state.value = Some(name.to_string());
        self.dropdowns.lga = Dropdown::enabled(options);
        self.dropdowns.ward = Dropdown::default();
        self.searching = false;
        Ok(())
    }

    /// Selects an LGA of the selected state, or returns to the state level
    /// with `None`. Clearing an empty LGA selection does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::NoStateSelected`] if no state is selected, or
    /// [`ViewerError::UnknownLga`] if `name` is not one of its LGAs.
    pub fn select_lga(&mut self, name: Option<&str>) -> Result<(), ViewerError> {
        let Some(name) = name else {
            let (Some(state), Some(_)) = (self.selection.state.clone(), &self.selection.lga)
            else {
                return Ok(());
            };
            log::debug!("Clearing LGA selection");
            self.selection.lga = None;
            self.selection.ward = None;
            self.dropdowns.lga.value = None;
            self.dropdowns.ward = Dropdown::default();
            self.searching = false;
            self.draw_state(&state);
            return Ok(());
        };

        self.apply_lga(name)?;
        self.redraw_selection();
        Ok(())
    }

    fn apply_lga(&mut self, name: &str) -> Result<(), ViewerError> {
        let Some(state) = self.selection.state.clone() else {
            return Err(ViewerError::NoStateSelected);
        };
        if !self.dropdowns.lga.contains(name) {
            return Err(ViewerError::UnknownLga {
                name: name.to_string(),
                state,
            });
        }

        log::debug!("Selecting LGA {name} in {state}");
        let mut options: Vec<String> = wards_by_lga(self.dataset.features(), name, &state)
            .into_iter()
            .filter_map(|w| w.properties.wardname.clone())
            .collect();
        sort_by_name(&mut options, String::as_str);
        options.dedup();

        self.selection.lga = Some(name.to_string());
        self.selection.ward = None;
        self.dropdowns.lga.value = Some(name.to_string());
        self.dropdowns.ward = Dropdown::enabled(options);
        self.searching = false;
        Ok(())
    }

    /// Selects a ward of the selected LGA, or returns to the LGA level with
    /// `None`. Clearing an empty ward selection does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::NoLgaSelected`] if no LGA is selected, or
    /// [`ViewerError::UnknownWard`] if `name` is not one of its wards.
    pub fn select_ward(&mut self, name: Option<&str>) -> Result<(), ViewerError> {
        let Some(name) = name else {
            let (Some(state), Some(lga), Some(_)) = (
                self.selection.state.clone(),
                self.selection.lga.clone(),
                &self.selection.ward,
            ) else {
                return Ok(());
            };
            log::debug!("Clearing ward selection");
            self.selection.ward = None;
            self.dropdowns.ward.value = None;
            self.searching = false;
            self.draw_lga(&lga, &state);
            return Ok(());
        };

        self.apply_ward(name)?;
        self.redraw_selection();
        Ok(())
    }

    fn apply_ward(&mut self, name: &str) -> Result<(), ViewerError> {
        let (Some(state), Some(lga)) = (&self.selection.state, &self.selection.lga) else {
            return Err(ViewerError::NoLgaSelected);
        };
        if !self.dropdowns.ward.contains(name) {
            return Err(ViewerError::UnknownWard {
                name: name.to_string(),
                lga: lga.clone(),
            });
        }

        log::debug!("Selecting ward {name} in {lga}, {state}");
        self.selection.ward = Some(name.to_string());
        self.dropdowns.ward.value = Some(name.to_string());
        self.searching = false;
        Ok(())
    }

    /// Returns to the initial view: no selection, no search text, every
    /// state drawn.
    pub fn reset(&mut self) {
        log::debug!("Resetting map");
        self.selection = Selection::default();
        self.dropdowns.state.value = None;
        self.dropdowns.lga = Dropdown::default();
        self.dropdowns.ward = Dropdown::default();
        self.query.clear();
        self.searching = false;
        self.surface.set_view(self.center, self.zoom);
        self.draw_overview();
        self.notifier
            .notify(Notification::success("Map reset successfully"));
    }

    /// Handles new search text and returns the number of highlighted wards.
    ///
    /// Blank queries and queries shorter than the configured minimum only
    /// drop an active search highlight. Selections are never changed.
    pub fn search(&mut self, query: &str) -> usize {
        query.clone_into(&mut self.query);
        let trimmed = query.trim();

        if trimmed.is_empty() || trimmed.chars().count() < self.min_query_len {
            if self.searching {
                log::debug!("Search text too short, restoring selection");
                self.searching = false;
                self.redraw_selection();
            }
            return 0;
        }

        let dataset = Arc::clone(&self.dataset);
        let results = search(dataset.features(), trimmed);
        self.searching = true;

        if results.is_empty() {
            self.clear_layers();
            self.notifier
                .notify(Notification::info("No matching results"));
            return 0;
        }

        let count = results.features.len();
        log::debug!("Search {trimmed:?} highlighted {count} wards");
        self.draw(
            Layer::new(
                format!("Search: {trimmed}"),
                LayerStyle::search(),
                to_features(results.features.iter().copied()),
            )
            .with_tooltip("wardname"),
            bounds(results.features.iter().copied()),
        );
        count
    }

    /// The current state of the selectors and search.
    #[must_use]
    pub fn view(&self) -> ViewSnapshot {
        ViewSnapshot {
            state: ViewState::from(&self.selection),
            selection: self.selection.clone(),
            dropdowns: self.dropdowns.clone(),
            query: self.query.clone(),
            searching: self.searching,
        }
    }

    /// The selected names.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The surface being drawn on.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface, e.g. to drain its output.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The notification sink.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Consumes the controller, returning the surface and notifier.
    pub fn into_parts(self) -> (S, N) {
        (self.surface, self.notifier)
    }

    fn redraw_selection(&mut self) {
        match self.selection.clone() {
            Selection {
                state: Some(state),
                lga: Some(lga),
                ward: Some(ward),
            } => self.draw_ward(&ward, &lga, &state),
            Selection {
                state: Some(state),
                lga: Some(lga),
                ..
            } => self.draw_lga(&lga, &state),
            Selection {
                state: Some(state),
                ..
            } => self.draw_state(&state),
            Selection { .. } => self.draw_overview(),
        }
    }

    fn draw_overview(&mut self) {
        let dataset = Arc::clone(&self.dataset);
        let features = dataset
            .state_boundaries()
            .iter()
            .map(Boundary::to_feature)
            .collect();
        self.draw(
            Layer::new("States", LayerStyle::base(), features).with_popup("statename"),
            None,
        );
    }

    fn draw_state(&mut self, name: &str) {
        let boundary = self.dataset.state_boundary(name);
        self.draw_boundary(boundary, "statename");
    }

    fn draw_lga(&mut self, name: &str, state: &str) {
        let boundary = self.dataset.lga_boundary(name, state);
        self.draw_boundary(boundary, "lganame");
    }

    fn draw_boundary(&mut self, boundary: Option<Boundary>, label: &str) {
        let Some(boundary) = boundary else {
            self.clear_layers();
            return;
        };
        let fit = geometry_bounds(&boundary.geometry);
        self.draw(
            Layer::new(
                boundary.name.clone(),
                LayerStyle::highlight(),
                vec![boundary.to_feature()],
            )
            .with_popup(label),
            fit,
        );
    }

    fn draw_ward(&mut self, name: &str, lga: &str, state: &str) {
        let dataset = Arc::clone(&self.dataset);
        let wards: Vec<&WardFeature> = wards_by_lga(dataset.features(), lga, state)
            .into_iter()
            .filter(|w| w.properties.wardname.as_deref() == Some(name))
            .collect();
        self.draw(
            Layer::new(
                name,
                LayerStyle::search(),
                to_features(wards.iter().copied()),
            )
            .with_tooltip("wardname"),
            bounds(wards.iter().copied()),
        );
    }

    /// Replaces every highlight layer with `layer` and fits to `fit`.
    fn draw(&mut self, layer: Layer, fit: Option<Bounds>) {
        self.clear_layers();
        self.layers.push(self.surface.add_layer(layer));
        if let Some(fit) = fit {
            self.surface.fit_bounds(fit);
        }
    }

    fn clear_layers(&mut self) {
        for id in self.layers.drain(..) {
            self.surface.remove_layer(id);
        }
    }
}

fn to_features<'a>(wards: impl Iterator<Item = &'a WardFeature>) -> Vec<geojson::Feature> {
    wards.map(WardFeature::to_feature).collect()
}
