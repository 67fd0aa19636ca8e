use eframe::egui;

pub fn update(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading("Welcome to Recipe Manager");
        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
        ui.add_space(10.0);
        ui.label("Use Ingredients to keep track of nutrition facts and store prices,");
        ui.label("and Recipes to put them together.");
    });
}
