use super::field_error;
use crate::database;
use crate::database::models::{Store, Unit};
use crate::workflow::catalog;
use crate::workflow::form::FieldErrors;
use crate::workflow::WriteError;
use eframe::egui;

pub enum UpdateEvent {
    Closed,
    CatalogChanged,
}

fn record_error(errors: &mut FieldErrors, field: &str, error: WriteError) {
    if let WriteError::InvalidName(_) = &error {
        errors.required_text(field, "");
    }
    log::error!("error adding {field}: {error}");
}

pub struct CatalogWindow {
    units: Vec<Unit>,
    stores: Vec<Store>,
    new_unit_name: String,
    new_store_name: String,
    errors: FieldErrors,
}

impl CatalogWindow {
    pub fn new(conn: &mut database::Connection) -> Self {
        Self {
            units: catalog::list_units(conn).unwrap_or_else(|e| {
                log::error!("error fetching units: {e}");
                vec![]
            }),
            stores: catalog::list_stores(conn).unwrap_or_else(|e| {
                log::error!("error fetching stores: {e}");
                vec![]
            }),
            new_unit_name: String::new(),
            new_store_name: String::new(),
            errors: FieldErrors::new(),
        }
    }

    fn update_table(ui: &mut egui::Ui, id_salt: &str, names: impl Iterator<Item = String>) {
        egui_extras::TableBuilder::new(ui)
            .id_salt(id_salt)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(egui_extras::Column::remainder())
            .max_scroll_height(160.0)
            .body(|mut body| {
                for name in names {
                    body.row(20.0, |mut row| {
                        row.col(|ui| {
                            ui.label(name);
                        });
                    });
                }
            });
    }

    /// Shows a text box plus button; returns the typed name when the button is clicked.
    fn update_add(
        ui: &mut egui::Ui,
        new_name: &mut String,
        hint_text: &str,
        button: &str,
    ) -> Option<String> {
        let mut added = None;
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(new_name)
                    .hint_text(hint_text)
                    .desired_width(160.0),
            );
            let enabled = !new_name.trim().is_empty();
            if ui.add_enabled(enabled, egui::Button::new(button)).clicked() {
                added = Some(std::mem::take(new_name));
            }
        });
        added
    }

    /// Writes the names typed into the add rows. Errors from this round replace the previous
    /// ones and survive the reload that follows a successful add.
    fn add_names(
        &mut self,
        conn: &mut database::Connection,
        unit: Option<String>,
        store: Option<String>,
    ) -> bool {
        let mut errors = FieldErrors::new();
        let mut changed = false;
        if let Some(name) = unit {
            match catalog::add_unit(conn, &name) {
                Ok(_) => changed = true,
                Err(e) => record_error(&mut errors, "unit", e),
            }
        }
        if let Some(name) = store {
            match catalog::add_store(conn, &name) {
                Ok(_) => changed = true,
                Err(e) => record_error(&mut errors, "store", e),
            }
        }
        if changed {
            *self = Self::new(conn);
        }
        self.errors = errors;
        changed
    }

    pub fn update(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
    ) -> Vec<UpdateEvent> {
        let mut events = vec![];
        let mut open = true;
        let mut added_unit = None;
        let mut added_store = None;

        egui::Window::new("Stores & Units")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.strong("Units");
                Self::update_table(ui, "unit table", self.units.iter().map(|u| u.name.clone()));
                added_unit = Self::update_add(ui, &mut self.new_unit_name, "unit name", "Add Unit");
                field_error(ui, &self.errors, "unit");

                ui.separator();

                ui.strong("Stores");
                Self::update_table(
                    ui,
                    "store table",
                    self.stores.iter().map(|s| s.name.clone()),
                );
                added_store =
                    Self::update_add(ui, &mut self.new_store_name, "store name", "Add Store");
                field_error(ui, &self.errors, "store");
            });

        if (added_unit.is_some() || added_store.is_some())
            && self.add_names(conn, added_unit, added_store)
        {
            events.push(UpdateEvent::CatalogChanged);
        }

        if !open {
            events.push(UpdateEvent::Closed);
        }
        events
    }
}

#[test]
fn failed_add_survives_reload() {
    use crate::workflow::form::REQUIRED;

    let mut conn = database::test_connection();
    let mut window = CatalogWindow::new(&mut conn);
    assert!(window.add_names(&mut conn, Some("  ".into()), Some("Aldi".into())));

    let stores: Vec<_> = window.stores.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(stores, ["Aldi"]);
    assert_eq!(window.errors.get("unit"), Some(REQUIRED));
    assert_eq!(window.errors.get("store"), None);

    assert!(window.add_names(&mut conn, Some("cup".into()), None));
    assert!(window.errors.is_empty());
    assert!(window.units.iter().any(|u| u.name == "cup"));
}
