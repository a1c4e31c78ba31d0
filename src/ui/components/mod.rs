pub mod chat_area;
pub mod emoji_bar;
pub mod input_bar;
pub mod status_bar;
