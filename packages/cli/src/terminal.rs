//! Text rendering of the map for the interactive browser.

use ward_map_boundary_models::Bounds;
use ward_map_viewer::notify::{Notification, Notifier, Severity};
use ward_map_viewer::surface::{Layer, LayerId, MapSurface};

/// A [`MapSurface`] that describes each change as a line of text.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    next_id: u64,
    lines: Vec<String>,
}

impl TerminalSurface {
    /// Returns and clears the lines written since the last call.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl MapSurface for TerminalSurface {
    fn set_view(&mut self, center: [f64; 2], zoom: f64) {
        self.lines.push(format!(
            "View: {:.4}, {:.4} at zoom {zoom}",
            center[0], center[1]
        ));
    }

    fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        let label = layer
            .label
            .as_ref()
            .map(|l| format!(" ({} by {})", l.kind, l.property))
            .unwrap_or_default();
        self.lines.push(format!(
            "Layer {}: {} [{} feature{}, {}]{label}",
            id.0,
            layer.name,
            layer.len(),
            if layer.len() == 1 { "" } else { "s" },
            layer.style.color,
        ));
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        log::trace!("Removing layer {}", id.0);
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        let [lat, lon] = bounds.center();
        self.lines.push(format!(
            "Fit: W {:.4} S {:.4} E {:.4} N {:.4} (center {lat:.4}, {lon:.4})",
            bounds.west, bounds.south, bounds.east, bounds.north
        ));
    }
}

/// Prints notifications to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        let marker = match notification.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        println!("[{marker}] {}", notification.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_map_viewer::surface::LayerStyle;

    #[test]
    fn describes_layers_and_fits() {
        let mut surface = TerminalSurface::default();
        surface.set_view([9.082, 8.6753], 6.0);
        let id = surface.add_layer(Layer::new("Lagos", LayerStyle::highlight(), vec![]).with_popup("statename"));
        surface.fit_bounds(Bounds::new(3.0, 6.0, 4.0, 7.0));
        surface.remove_layer(id);

        let lines = surface.take_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "View: 9.0820, 8.6753 at zoom 6");
        assert_eq!(
            lines[1],
            "Layer 0: Lagos [0 features, #ff4500] (popup by statename)"
        );
        assert!(lines[2].ends_with("(center 6.5000, 3.5000)"));
        assert!(surface.take_lines().is_empty());
    }
}
