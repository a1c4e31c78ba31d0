use eframe::egui;

use realtime_chat::ChatMessage;

pub fn render(ui: &mut egui::Ui, messages: &[ChatMessage]) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if messages.is_empty() {
                ui.label(egui::RichText::new("No messages yet").weak());
            }
            for message in messages {
                // Tin của mình căn phải, tin của người lạ căn trái
                let layout = if message.is_local() {
                    egui::Layout::right_to_left(egui::Align::TOP)
                } else {
                    egui::Layout::left_to_right(egui::Align::TOP)
                };
                ui.with_layout(layout, |ui| {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.vertical(|ui| {
                            ui.label(&message.content);
                            ui.label(
                                egui::RichText::new(format!(
                                    "{} · {}",
                                    message.sender.label(),
                                    message.display_time()
                                ))
                                .small()
                                .weak(),
                            );
                        });
                    });
                });
            }
        });
}
