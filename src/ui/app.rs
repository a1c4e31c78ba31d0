use std::time::Duration;

use eframe::egui;

use realtime_chat::{ChatCore, Libp2pSession};

use super::components::{chat_area, emoji_bar, input_bar, status_bar};

const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Desktop shell over one [`ChatCore`]. Holds nothing but the input buffer.
pub struct ChatApp {
    core: ChatCore<Libp2pSession>,
    input_text: String,
}

impl ChatApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, core: ChatCore<Libp2pSession>) -> Self {
        Self {
            core,
            input_text: String::new(),
        }
    }

    fn send_input(&mut self) {
        if let Err(err) = self.core.submit(&mut self.input_text) {
            log::warn!("Failed to send message: {err}");
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.core.poll_events();

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            status_bar::render(ui, self.core.status());
        });

        let mut send = false;
        egui::TopBottomPanel::bottom("input_panel").show(ctx, |ui| {
            emoji_bar::render(ui, &mut self.input_text);
            send = input_bar::render(ui, &mut self.input_text);
        });
        if send {
            self.send_input();
        }

        let messages = self.core.snapshot();
        egui::CentralPanel::default().show(ctx, |ui| {
            chat_area::render(ui, &messages);
        });

        // Sự kiện mạng đến từ task khác nên phải tự vẽ lại định kỳ
        ctx.request_repaint_after(REFRESH_INTERVAL);
    }
}
