mod ui;

use clap::Parser;
use dotenvy::dotenv;
use realtime_chat::config;
use realtime_chat::{ChatCore, Libp2pSession};
use tokio::runtime::Handle;
use ui::ChatApp;

#[derive(Parser)]
#[command(
    name = "realtime-chat",
    version,
    about = "Two-party realtime chat over libp2p"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Multiaddr of the other party to dial
    #[arg(long, value_name = "MULTIADDR")]
    peer: Option<String>,
    /// Local listen multiaddr
    #[arg(long, value_name = "MULTIADDR")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config_or_default(&cli.config);
    app_config.apply_env();
    app_config.apply_overrides(cli.peer, cli.listen);

    // 1. Mở phiên chat (task mạng chạy ngầm trên runtime hiện tại)
    let mut core = ChatCore::new(Libp2pSession::new(app_config, Handle::current()));
    if let Err(err) = core.open() {
        log::error!("Failed to open chat session: {err}");
    }

    // 2. Khởi chạy UI (Chạy trên Main Thread)
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Realtime Chat",
        options,
        Box::new(move |cc| Ok(Box::new(ChatApp::new(cc, core)))),
    )
}
