use eframe::egui;

const EMOJIS: [&str; 8] = ["😀", "😂", "😍", "👍", "🙏", "🎉", "😢", "❤"];

/// Appends the picked glyph to the pending input.
pub fn render(ui: &mut egui::Ui, input_text: &mut String) {
    ui.horizontal(|ui| {
        for emoji in EMOJIS {
            if ui.small_button(emoji).clicked() {
                input_text.push_str(emoji);
            }
        }
    });
}
