use super::search::IngredientSearch;
use super::{field_error, new_info_toast};
use crate::database;
use crate::database::models::RecipeId;
use crate::workflow::form::FieldErrors;
use crate::workflow::picker::IngredientPicker;
use crate::workflow::recipe::{self, RecipeDetails, RecipeForm, RecipeListing};
use eframe::egui;

struct RecipeBeingEdited {
    existing: Option<RecipeId>,
    form: RecipeForm,
    picker: IngredientPicker,
    errors: FieldErrors,
}

impl RecipeBeingEdited {
    fn new() -> Self {
        Self {
            existing: None,
            form: RecipeForm::new(),
            picker: IngredientPicker::default(),
            errors: FieldErrors::new(),
        }
    }

    fn edit(details: &RecipeDetails) -> Self {
        Self {
            existing: Some(details.recipe.id),
            form: RecipeForm::from_details(details),
            picker: IngredientPicker::default(),
            errors: FieldErrors::new(),
        }
    }
}

pub struct RecipeListView {
    listing: RecipeListing,
    recipe_being_edited: Option<RecipeBeingEdited>,
}

impl RecipeListView {
    pub fn new(conn: &mut database::Connection) -> Self {
        Self {
            listing: recipe::list(conn),
            recipe_being_edited: None,
        }
    }

    pub fn refresh(&mut self, conn: &mut database::Connection) {
        self.listing = recipe::list(conn);
    }

    fn update_selected_ingredients(ui: &mut egui::Ui, e: &mut RecipeBeingEdited) {
        if e.form.selected.is_empty() {
            ui.label("No ingredients selected");
            return;
        }
        ui.label(format!("{} selected", e.form.selected.len()));
        let mut remove = None;
        egui::Grid::new("recipe selected ingredients").show(ui, |ui| {
            for (i, s) in e.form.selected.iter_mut().enumerate() {
                ui.label(&s.ingredient.name);
                ui.add(
                    egui::TextEdit::singleline(&mut s.quantity)
                        .hint_text("Quantity")
                        .desired_width(80.0),
                );
                if ui.button("Remove").clicked() {
                    remove = Some(i);
                }
                field_error(ui, &e.errors, &format!("ingredients.{i}.quantity"));
                ui.end_row();
            }
        });
        if let Some(i) = remove {
            e.form.selected.remove(i);
        }
    }

    /// Returns true once the form has been submitted or cancelled.
    fn update_form(
        &mut self,
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) -> bool {
        let Some(e) = &mut self.recipe_being_edited else {
            return false;
        };
        let mut done = false;

        ui.heading(if e.existing.is_some() {
            "Edit Recipe"
        } else {
            "New Recipe"
        });
        egui::Grid::new("recipe form").show(ui, |ui| {
            ui.label("Name");
            ui.add(egui::TextEdit::singleline(&mut e.form.name));
            field_error(ui, &e.errors, "name");
            ui.end_row();

            ui.label("Servings");
            ui.add(egui::TextEdit::singleline(&mut e.form.servings).desired_width(80.0));
            field_error(ui, &e.errors, "servings");
            ui.end_row();
        });

        ui.add_space(6.0);
        ui.strong("Ingredients");
        let mut picked = None;
        ui.add(
            IngredientSearch::new(
                "recipe ingredient search",
                &mut e.picker,
                &self.listing.catalog,
                &mut picked,
            )
            .hint_text("Search ingredients")
            .desired_width(240.0),
        );
        if let Some(ingredient) = picked {
            e.form.selected.select(&mut e.picker, &ingredient);
        }
        Self::update_selected_ingredients(ui, e);

        ui.add_space(6.0);
        ui.strong("Steps");
        for (i, step) in e.form.steps.iter_mut().enumerate() {
            ui.label(format!("Step {}", i + 1));
            ui.add(
                egui::TextEdit::multiline(step)
                    .desired_rows(2)
                    .desired_width(f32::INFINITY),
            );
        }
        if ui.button("Add Step").clicked() {
            e.form.add_step();
        }

        ui.horizontal(|ui| {
            if ui.button("Save Recipe").clicked() {
                match e.form.validate() {
                    Ok(input) => {
                        // Failures are logged and rolled back by the workflow.
                        if recipe::save(conn, &input, e.existing).is_ok() {
                            toasts.add(new_info_toast(format!("Saved {}", input.name)));
                            done = true;
                        }
                    }
                    Err(errors) => {
                        log::debug!(
                            "recipe form invalid: {:?}",
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
        for details in &self.listing.recipes {
            ui.group(|ui| {
                ui.set_width(ui.available_width());
                ui.heading(&details.recipe.name);
                ui.label(format!("Servings: {}", details.recipe.servings));

                ui.strong("Ingredients:");
                for l in &details.ingredients {
                    let unit = l.unit.as_ref().map(|u| u.name.as_str()).unwrap_or("");
                    ui.label(format!("{} {unit} {}", l.line.quantity, l.ingredient.name));
                }

                ui.strong("Steps:");
                for (i, step) in details.sorted_steps().into_iter().enumerate() {
                    ui.label(format!("{}. {}", i + 1, step.description));
                }

                if ui.button("Edit").clicked() {
                    edit = Some(RecipeBeingEdited::edit(details));
                }
            });
        }
        if self.listing.recipes.is_empty() {
            ui.label("No recipes yet");
        }
        if edit.is_some() {
            self.recipe_being_edited = edit;
        }
    }

    pub fn update(
        &mut self,
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) {
        ui.horizontal(|ui| {
            ui.heading("Recipes");
            if ui.button("Add Recipe").clicked() {
                self.recipe_being_edited = Some(RecipeBeingEdited::new());
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .show(ui, |ui| {
                if self.update_form(ui, conn, toasts) {
                    self.recipe_being_edited = None;
                    self.refresh(conn);
                }
                self.update_cards(ui);
            });
    }
}
