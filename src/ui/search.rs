use crate::database::models::Ingredient;
use crate::workflow::picker::IngredientPicker;
use eframe::egui;
use std::hash::Hash;

/// A text box that pops up the catalog ingredients matching what has been typed. Clicking one
/// stores it in `picked`.
pub struct IngredientSearch<'a> {
    picker: &'a mut IngredientPicker,
    catalog: &'a [Ingredient],
    picked: &'a mut Option<Ingredient>,
    pop_up_id: egui::Id,
    hint_text: Option<egui::WidgetText>,
    desired_width: Option<f32>,
}

impl<'a> IngredientSearch<'a> {
    pub fn new(
        id_source: impl Hash,
        picker: &'a mut IngredientPicker,
        catalog: &'a [Ingredient],
        picked: &'a mut Option<Ingredient>,
    ) -> Self {
        Self {
            picker,
            catalog,
            picked,
            pop_up_id: egui::Id::new(id_source),
            hint_text: None,
            desired_width: None,
        }
    }

    pub fn hint_text(mut self, hint_text: impl Into<egui::WidgetText>) -> Self {
        self.hint_text = Some(hint_text.into());
        self
    }

    pub fn desired_width(mut self, desired_width: f32) -> Self {
        self.desired_width = Some(desired_width);
        self
    }
}

impl<'a> egui::Widget for IngredientSearch<'a> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let Self {
            picker,
            catalog,
            picked,
            pop_up_id,
            hint_text,
            desired_width,
        } = self;

        let mut edit = egui::TextEdit::singleline(&mut picker.search_term);
        if let Some(hint_text) = hint_text {
            edit = edit.hint_text(hint_text);
        }
        if let Some(desired_width) = desired_width {
            edit = edit.desired_width(desired_width);
        }
        let mut r = edit.show(ui).response;

        if picker.is_open() && (r.changed() || r.gained_focus()) {
            ui.memory_mut(|m| m.open_popup(pop_up_id));
        } else if !picker.is_open() && ui.memory(|m| m.is_popup_open(pop_up_id)) {
            ui.memory_mut(|m| m.close_popup());
        }

        let mut changed = false;
        egui::popup_below_widget(
            ui,
            pop_up_id,
            &r,
            egui::PopupCloseBehavior::CloseOnClickOutside,
            |ui| {
                egui::ScrollArea::vertical()
                    .max_height(240.0)
                    .show(ui, |ui| {
                        let matches = picker.matches(catalog);
                        if matches.is_empty() {
                            ui.label("No matching ingredients");
                        }
                        for ingredient in matches {
                            if ui.selectable_label(false, &ingredient.name).clicked() {
                                *picked = Some(ingredient.clone());
                                changed = true;
                            }
                        }
                    });
            },
        );

        if changed {
            ui.memory_mut(|m| m.close_popup());
            r.mark_changed();
        }

        r
    }
}
