use std::fs;
use std::io;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";

pub const ENV_PEER: &str = "REALTIME_CHAT_PEER";
pub const ENV_LISTEN: &str = "REALTIME_CHAT_LISTEN";
pub const ENV_TOPIC: &str = "REALTIME_CHAT_TOPIC";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub listen_addr: String,
    /// Multiaddr of the other party; `None` waits for them to dial in.
    pub peer_addr: Option<String>,
    /// Relay nodes, each ending in `/p2p/<PeerId>`.
    pub relay_addrs: Vec<String>,
    /// Gossipsub topic carrying the `message` channel.
    pub topic: String,
    pub channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "/ip4/0.0.0.0/tcp/0".to_string(),
            peer_addr: None,
            relay_addrs: Vec::new(),
            topic: "realtime-chat".to_string(),
            channel_capacity: 100,
        }
    }
}

impl AppConfig {
    /// Applies `REALTIME_CHAT_*` variables from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(peer) = lookup(ENV_PEER) {
            self.peer_addr = Some(peer);
        }
        if let Some(listen) = lookup(ENV_LISTEN) {
            self.listen_addr = listen;
        }
        if let Some(topic) = lookup(ENV_TOPIC) {
            self.topic = topic;
        }
    }

    /// Command line values win over file and environment.
    pub fn apply_overrides(&mut self, peer: Option<String>, listen: Option<String>) {
        if peer.is_some() {
            self.peer_addr = peer;
        }
        if let Some(listen) = listen {
            self.listen_addr = listen;
        }
    }
}

/// A missing file yields the defaults; a malformed one is an error.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::info!("Config file {path} not found; using defaults");
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_string(),
                source,
            });
        }
    };

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

pub fn load_config_or_default(path: &str) -> AppConfig {
    load_config(path).unwrap_or_else(|err| {
        log::warn!("{err}; using defaults");
        AppConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn write_config(content: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        fs::write(&path, content).unwrap();
        let path = path.to_string_lossy().into_owned();
        (dir, path)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let config = load_config(&path.to_string_lossy()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let (_dir, path) = write_config(r#"{ "peer_addr": "/ip4/10.0.0.2/tcp/4001" }"#);
        let config = load_config(&path).unwrap();
        assert_eq!(config.peer_addr.as_deref(), Some("/ip4/10.0.0.2/tcp/4001"));
        assert_eq!(config.topic, "realtime-chat");
        assert_eq!(config.channel_capacity, 100);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let (_dir, path) = write_config("{ not json");
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(load_config_or_default(&path), AppConfig::default());
    }

    #[test]
    fn env_then_cli_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_PEER, "/ip4/10.0.0.3/tcp/1"),
            (ENV_TOPIC, "pair-42"),
        ]);
        let mut config = AppConfig::default();
        config.apply_env_with(|key| env.get(key).map(|value| value.to_string()));
        assert_eq!(config.peer_addr.as_deref(), Some("/ip4/10.0.0.3/tcp/1"));
        assert_eq!(config.topic, "pair-42");

        config.apply_overrides(None, Some("/ip4/127.0.0.1/tcp/9000".to_string()));
        assert_eq!(config.peer_addr.as_deref(), Some("/ip4/10.0.0.3/tcp/1"));
        assert_eq!(config.listen_addr, "/ip4/127.0.0.1/tcp/9000");

        config.apply_overrides(Some("/ip4/10.0.0.4/tcp/2".to_string()), None);
        assert_eq!(config.peer_addr.as_deref(), Some("/ip4/10.0.0.4/tcp/2"));
    }
}
