use eframe::egui;

use realtime_chat::ConnectionStatus;

pub fn render(ui: &mut egui::Ui, status: &ConnectionStatus) {
    ui.horizontal(|ui| {
        let color = if status.is_connected() {
            egui::Color32::GREEN
        } else {
            egui::Color32::RED
        };
        ui.colored_label(color, "●");
        ui.heading(format!("Chat App - {status}"));
    });
}
