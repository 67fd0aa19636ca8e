// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::workflow::form::FieldErrors;
use derive_more::Display;
use eframe::egui;
use strum::EnumIter;

mod catalog;
mod home;
mod ingredient_list;
mod recipe_list;
mod search;

use catalog::CatalogWindow;
use ingredient_list::IngredientListView;
use recipe_list::RecipeListView;

#[derive(Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq)]
pub enum Route {
    #[display("Recipe Manager")]
    Home,
    #[display("Ingredients")]
    Ingredients,
    #[display("Recipes")]
    Recipes,
}

impl Route {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

pub fn new_info_toast(text: impl Into<egui::WidgetText>) -> egui_toast::Toast {
    egui_toast::Toast {
        text: text.into(),
        kind: egui_toast::ToastKind::Success,
        options: egui_toast::ToastOptions::default()
            .duration_in_seconds(3.0)
            .show_progress(false)
            .show_icon(true),
        ..Default::default()
    }
}

/// Shows the validation message for `field`, if there is one.
fn field_error(ui: &mut egui::Ui, errors: &FieldErrors, field: &str) {
    if let Some(message) = errors.get(field) {
        ui.colored_label(ui.visuals().error_fg_color, message);
    }
}

pub struct RecipeManager {
    conn: database::Connection,
    route: Route,
    ingredients: IngredientListView,
    recipes: RecipeListView,
    catalog_window: Option<CatalogWindow>,
    toasts: egui_toast::Toasts,
}

impl RecipeManager {
    pub fn new(mut conn: database::Connection) -> Self {
        Self {
            ingredients: IngredientListView::new(&mut conn),
            recipes: RecipeListView::new(&mut conn),
            conn,
            route: Route::Home,
            catalog_window: None,
            toasts: egui_toast::Toasts::new()
                .anchor(egui::Align2::RIGHT_BOTTOM, (-10.0, -10.0))
                .direction(egui::Direction::BottomUp),
        }
    }

    fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        log::debug!("navigating to {route}");
        match route {
            Route::Home => {}
            Route::Ingredients => self.ingredients.refresh(&mut self.conn),
            Route::Recipes => self.recipes.refresh(&mut self.conn),
        }
        self.route = route;
    }

    fn update_menu(&mut self, ctx: &egui::Context) {
        let mut next_route = self.route;
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Stores & Units").clicked() && self.catalog_window.is_none() {
                        self.catalog_window = Some(CatalogWindow::new(&mut self.conn));
                        ui.close_menu();
                    }
                });
                ui.separator();
                for route in Route::iter() {
                    ui.selectable_value(&mut next_route, route, route.to_string());
                }
            });
        });
        self.navigate(next_route);
    }

    fn update_catalog_window(&mut self, ctx: &egui::Context) {
        let Some(window) = &mut self.catalog_window else {
            return;
        };
        for event in window.update(ctx, &mut self.conn) {
            match event {
                catalog::UpdateEvent::Closed => {
                    self.catalog_window = None;
                    break;
                }
                catalog::UpdateEvent::CatalogChanged => {
                    self.ingredients.refresh(&mut self.conn);
                }
            }
        }
    }

    fn update_route(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| match self.route {
            Route::Home => home::update(ui),
            Route::Ingredients => self.ingredients.update(ui, &mut self.conn, &mut self.toasts),
            Route::Recipes => self.recipes.update(ui, &mut self.conn, &mut self.toasts),
        });
    }
}

impl eframe::App for RecipeManager {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_menu(ctx);
        self.update_catalog_window(ctx);
        self.update_route(ctx);
        self.toasts.show(ctx);
    }
}
