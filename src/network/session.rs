use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::common::{TransportCommand, TransportEvent};
use crate::config::AppConfig;
use crate::error::ChatError;

use super::TransportSession;
use super::client::P2PClient;

/// [`TransportSession`] backed by the libp2p event loop in [`P2PClient`].
///
/// The loop runs as a task on `runtime`; this handle only owns the two
/// channel ends.
pub struct Libp2pSession {
    config: AppConfig,
    runtime: Handle,
    command_sender: Option<mpsc::UnboundedSender<TransportCommand>>,
    task: Option<JoinHandle<()>>,
}

impl Libp2pSession {
    pub fn new(config: AppConfig, runtime: Handle) -> Self {
        Self {
            config,
            runtime,
            command_sender: None,
            task: None,
        }
    }
}

impl TransportSession for Libp2pSession {
    fn open(&mut self) -> Result<mpsc::Receiver<TransportEvent>, ChatError> {
        if self.command_sender.is_some() {
            return Err(ChatError::Transport(
                "network client already running".to_string(),
            ));
        }

        // Lõi chat -> mạng: không giới hạn, một tin đã vào log thì phải được gửi đi
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        // Mạng -> lõi chat
        let (event_tx, event_rx) = mpsc::channel(self.config.channel_capacity.max(1));

        let client = P2PClient::new(self.config.clone(), event_tx, cmd_rx);
        self.task = Some(self.runtime.spawn(async move {
            if let Err(err) = client.run().await {
                log::error!("Network client terminated: {err}");
            }
        }));
        self.command_sender = Some(cmd_tx);

        Ok(event_rx)
    }

    fn send(&self, payload: &str) {
        let Some(sender) = &self.command_sender else {
            log::warn!("Dropping outbound message; network client is not running");
            return;
        };
        if let Err(err) = sender.send(TransportCommand::Send(payload.to_string())) {
            log::warn!("Failed to queue outbound message: {err}");
        }
    }

    fn close(&mut self) {
        let Some(sender) = self.command_sender.take() else {
            return;
        };
        let task = self.task.take();
        if sender.send(TransportCommand::Shutdown).is_err() {
            if let Some(task) = task {
                task.abort();
            }
        }
        log::info!("Network client shutting down");
    }
}

impl Drop for Libp2pSession {
    fn drop(&mut self) {
        self.close();
    }
}
