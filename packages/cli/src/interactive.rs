//! Interactive map browser.
//!
//! Drives a [`MapController`] from `dialoguer` prompts. The state, LGA
//! and ward prompts cascade the same way the map's dropdowns do, and each
//! redraw is described as text.

use dialoguer::{Input, Select};
use ward_map_cli_utils::{MultiProgress, select_optional};
use ward_map_viewer::notify::{Notification, Notifier};
use ward_map_viewer::{MapController, ViewerConfig, ViewerError};

use crate::terminal::{ConsoleNotifier, TerminalSurface};

type Controller = MapController<TerminalSurface, ConsoleNotifier>;

/// Top-level actions in the browser menu.
enum Action {
    SelectState,
    SelectLga,
    SelectWard,
    Search,
    Reset,
    Serve,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::SelectState,
        Self::SelectLga,
        Self::SelectWard,
        Self::Search,
        Self::Reset,
        Self::Serve,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::SelectState => "Select state",
            Self::SelectLga => "Select LGA",
            Self::SelectWard => "Select ward",
            Self::Search => "Search",
            Self::Reset => "Reset map",
            Self::Serve => "Start server",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the browser until the user quits.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails or the server cannot start.
pub async fn run(multi: &MultiProgress, config: ViewerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = crate::load_or_exit(multi, &config).await;

    println!("Nigeria Ward Map");
    println!();

    let mut controller = MapController::new(dataset, &config, TerminalSurface::default(), ConsoleNotifier);
    print_changes(&mut controller);

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        print_selection(&controller);

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let view = controller.view();
        let result = match Action::ALL[idx] {
            Action::SelectState => {
                let choice = select_optional(
                    "State",
                    &view.dropdowns.state.options,
                    view.selection.state.as_deref(),
                )?;
                controller.select_state(choice.as_deref())
            }
            Action::SelectLga => {
                if view.dropdowns.lga.enabled {
                    let choice = select_optional(
                        "LGA",
                        &view.dropdowns.lga.options,
                        view.selection.lga.as_deref(),
                    )?;
                    controller.select_lga(choice.as_deref())
                } else {
                    Err(ViewerError::NoStateSelected)
                }
            }
            Action::SelectWard => {
                if view.dropdowns.ward.enabled {
                    let choice = select_optional(
                        "Ward",
                        &view.dropdowns.ward.options,
                        view.selection.ward.as_deref(),
                    )?;
                    controller.select_ward(choice.as_deref())
                } else {
                    Err(ViewerError::NoLgaSelected)
                }
            }
            Action::Search => {
                let query: String = Input::new()
                    .with_prompt("Search states, LGAs and wards")
                    .with_initial_text(view.query)
                    .allow_empty(true)
                    .interact_text()?;
                let count = controller.search(&query);
                if count > 0 {
                    println!("{count} wards highlighted");
                }
                Ok(())
            }
            Action::Reset => {
                controller.reset();
                Ok(())
            }
            Action::Serve => {
                return crate::serve(config, true).await;
            }
            Action::Quit => return Ok(()),
        };

        if let Err(e) = result {
            ConsoleNotifier.notify(Notification::error(e.to_string()));
        }
        print_changes(&mut controller);
    }
}

fn print_changes(controller: &mut Controller) {
    for line in controller.surface_mut().take_lines() {
        println!("  {line}");
    }
}

fn print_selection(controller: &Controller) {
    let selection = controller.selection();
    let path: Vec<&str> = [&selection.state, &selection.lga, &selection.ward]
        .into_iter()
        .filter_map(Option::as_deref)
        .collect();

    println!();
    if path.is_empty() {
        println!("All states");
    } else {
        println!("{}", path.join(" > "));
    }
}
