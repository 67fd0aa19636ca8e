use super::{field_error, new_info_toast};
use crate::database;
use crate::database::models::IngredientId;
use crate::workflow::form::FieldErrors;
use crate::workflow::ingredient::{self, IngredientDetails, IngredientForm, IngredientListing};
use eframe::egui;

struct IngredientBeingEdited {
    existing: Option<IngredientId>,
    form: IngredientForm,
    errors: FieldErrors,
}

impl IngredientBeingEdited {
    fn new() -> Self {
        Self {
            existing: None,
            form: IngredientForm::new(),
            errors: FieldErrors::new(),
        }
    }

    fn edit(details: &IngredientDetails) -> Self {
        Self {
            existing: Some(details.ingredient.id),
            form: IngredientForm::from_details(details),
            errors: FieldErrors::new(),
        }
    }
}

fn number_label(label: &str, value: Option<f32>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{label}: {v}{suffix}"),
        None => format!("{label}: -"),
    }
}

pub struct IngredientListView {
    listing: IngredientListing,
    ingredient_being_edited: Option<IngredientBeingEdited>,
}

impl IngredientListView {
    pub fn new(conn: &mut database::Connection) -> Self {
        Self {
            listing: ingredient::list(conn),
            ingredient_being_edited: None,
        }
    }

    pub fn refresh(&mut self, conn: &mut database::Connection) {
        self.listing = ingredient::list(conn);
    }

    fn update_number(
        ui: &mut egui::Ui,
        errors: &FieldErrors,
        label: &str,
        field: &str,
        value: &mut String,
    ) {
        ui.label(label);
        ui.add(egui::TextEdit::singleline(value).desired_width(80.0));
        field_error(ui, errors, field);
        ui.end_row();
    }

    /// Returns true once the form has been submitted or cancelled.
    fn update_form(
        &mut self,
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) -> bool {
        let Some(e) = &mut self.ingredient_being_edited else {
            return false;
        };
        let mut done = false;

        ui.heading(if e.existing.is_some() {
            "Edit Ingredient"
        } else {
            "New Ingredient"
        });
        egui::Grid::new("ingredient form").show(ui, |ui| {
            ui.label("Name");
            ui.add(egui::TextEdit::singleline(&mut e.form.name));
            field_error(ui, &e.errors, "name");
            ui.end_row();

            ui.label("Image URL");
            ui.add(egui::TextEdit::singleline(&mut e.form.image_url));
            ui.end_row();

            ui.label("Unit");
            let selected_unit = self
                .listing
                .units
                .iter()
                .find(|u| Some(u.id) == e.form.unit_id)
                .map(|u| u.name.clone())
                .unwrap_or("Select a unit".into());
            egui::ComboBox::from_id_salt("ingredient unit")
                .selected_text(selected_unit)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut e.form.unit_id, None, "Select a unit");
                    for unit in &self.listing.units {
                        ui.selectable_value(&mut e.form.unit_id, Some(unit.id), &unit.name);
                    }
                });
            ui.end_row();

            Self::update_number(ui, &e.errors, "Calories", "calories", &mut e.form.calories);
            Self::update_number(ui, &e.errors, "Protein (g)", "protein", &mut e.form.protein);
            Self::update_number(ui, &e.errors, "Carbs (g)", "carbs", &mut e.form.carbs);
            Self::update_number(ui, &e.errors, "Fat (g)", "fat", &mut e.form.fat);
        });

        ui.add_space(6.0);
        ui.strong("Store Prices");
        egui::Grid::new("ingredient store prices").show(ui, |ui| {
            for store in &self.listing.stores {
                let price = e.form.prices.entry(store.id).or_default();
                ui.label(&store.name);
                ui.add(
                    egui::TextEdit::singleline(price)
                        .hint_text("Enter price")
                        .desired_width(80.0),
                );
                field_error(ui, &e.errors, &format!("prices.{}", store.id));
                ui.end_row();
            }
            if self.listing.stores.is_empty() {
                ui.label("No stores yet, add some under File > Stores & Units");
                ui.end_row();
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Save Ingredient").clicked() {
                match e.form.validate() {
                    Ok(input) => {
                        // Failures are logged by the workflow.
                        if let Ok(outcome) =
                            ingredient::save(conn, &input, e.existing, &self.listing.stores)
                        {
                            if outcome.failed_stores.is_empty() {
                                toasts.add(new_info_toast(format!("Saved {}", input.name)));
                            }
                            done = true;
                        }
                    }
                    Err(errors) => {
                        log::debug!(
                            "ingredient form invalid: {:?}",
                            errors.fields().collect::<Vec<_>>()
                        );
                        e.errors = errors;
                    }
                }
            }
            if ui.button("Cancel").clicked() {
                done = true;
            }
        });
        ui.separator();

        done
    }

    fn update_cards(&mut self, ui: &mut egui::Ui) {
        let mut edit = None;
        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .show(ui, |ui| {
                for details in &self.listing.ingredients {
                    let i = &details.ingredient;
                    ui.group(|ui| {
                        ui.set_width(ui.available_width());
                        if let Some(url) = &i.image_url {
                            ui.add(egui::Image::new(url.as_str()).max_height(160.0));
                        }
                        ui.heading(&i.name);
                        ui.label(format!(
                            "Unit: {}",
                            details
                                .unit
                                .as_ref()
                                .map(|u| u.name.as_str())
                                .unwrap_or("Not specified")
                        ));
                        egui::Grid::new(("ingredient nutrition", i.id)).show(ui, |ui| {
                            ui.label(number_label("Calories", i.calories, ""));
                            ui.label(number_label("Protein", i.protein, "g"));
                            ui.end_row();
                            ui.label(number_label("Carbs", i.carbs, "g"));
                            ui.label(number_label("Fat", i.fat, "g"));
                            ui.end_row();
                        });
                        ui.strong("Prices:");
                        for store in &self.listing.stores {
                            if let Some(price) = details.price_at(store.id) {
                                ui.label(format!("{}: €{price:.2}", store.name));
                            }
                        }
                        if ui.button("Edit").clicked() {
                            edit = Some(IngredientBeingEdited::edit(details));
                        }
                    });
                }
                if self.listing.ingredients.is_empty() {
                    ui.label("No ingredients yet");
                }
            });
        if edit.is_some() {
            self.ingredient_being_edited = edit;
        }
    }

    pub fn update(
        &mut self,
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) {
        ui.horizontal(|ui| {
            ui.heading("Ingredients");
            if ui.button("Add Ingredient").clicked() {
                self.ingredient_being_edited = Some(IngredientBeingEdited::new());
            }
        });
        ui.separator();

        if self.update_form(ui, conn, toasts) {
            self.ingredient_being_edited = None;
            self.refresh(conn);
        }
        self.update_cards(ui);
    }
}
