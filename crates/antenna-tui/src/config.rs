//! Command-line configuration.
//!
//! [`Args`] is the only configuration surface of the binary. It is turned
//! into the typed [`ChatConfig`] and [`WsEngineConfig`] the runtime and
//! engine consume.

use std::{path::PathBuf, time::Duration};

use antenna_app::{
    ChatConfig, DEFAULT_ACCESS_TOKEN, DEFAULT_HOST, Deployment, RoomPlacement, UrlLocation,
};
use antenna_client::{IceServer, transport::WsEngineConfig};
use clap::{Parser, ValueEnum};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--url` is not a valid URL.
    #[error("invalid location {url:?}: {source}")]
    InvalidUrl {
        /// Rejected input.
        url: String,
        /// Parse failure.
        source: url::ParseError,
    },
}

/// Deployment variant selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// One implicit room; no join form.
    Global,
    /// Visitor picks a room.
    MultiRoom,
    /// Visitor picks a room; the transport gets connectivity-assist
    /// endpoints.
    PeerAssisted,
}

/// Antenna terminal chat client
#[derive(Parser, Debug, Clone)]
#[command(name = "antenna-tui")]
#[command(about = "Terminal client for Antenna chat rooms")]
#[command(version)]
pub struct Args {
    /// Hosting location. Its host selects the backend, `https` selects
    /// `wss`, and its `room` query parameter is the persisted room.
    #[arg(short, long, default_value = "http://localhost:3000/")]
    pub url: String,

    /// Deployment variant
    #[arg(short, long, value_enum, default_value_t = Mode::MultiRoom)]
    pub mode: Mode,

    /// Carry the room as a path segment of the connection address
    /// (multi-room mode only)
    #[arg(long)]
    pub room_in_path: bool,

    /// Pre-shared access token
    #[arg(long, default_value = DEFAULT_ACCESS_TOKEN)]
    pub token: String,

    /// STUN/TURN URL (peer-assisted mode, repeatable)
    #[arg(long = "ice-url")]
    pub ice_urls: Vec<String>,

    /// TURN username
    #[arg(long, requires = "ice_credential")]
    pub ice_username: Option<String>,

    /// TURN credential
    #[arg(long, requires = "ice_username")]
    pub ice_credential: Option<String>,

    /// Seconds allowed for the connection handshake
    #[arg(long, default_value = "10")]
    pub handshake_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write logs to this file. Logging is off without it, since the
    /// terminal belongs to the UI.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Parse the hosting location.
    pub fn location(&self) -> Result<UrlLocation, ConfigError> {
        UrlLocation::parse(&self.url)
            .map_err(|source| ConfigError::InvalidUrl { url: self.url.clone(), source })
    }

    /// Client configuration for `location`.
    pub fn chat_config(&self, location: &UrlLocation) -> ChatConfig {
        ChatConfig {
            host: location.host().unwrap_or_else(|| DEFAULT_HOST.to_string()),
            secure: location.is_secure(),
            token: self.token.clone(),
            deployment: self.deployment(),
        }
    }

    /// Engine configuration.
    pub fn engine_config(&self) -> WsEngineConfig {
        WsEngineConfig { handshake_timeout: Duration::from_secs(self.handshake_timeout) }
    }

    fn deployment(&self) -> Deployment {
        match self.mode {
            Mode::Global => Deployment::Global,
            Mode::MultiRoom if self.room_in_path => {
                Deployment::MultiRoom { placement: RoomPlacement::Path }
            },
            Mode::MultiRoom => Deployment::MultiRoom { placement: RoomPlacement::Argument },
            Mode::PeerAssisted => Deployment::PeerAssisted { ice_servers: self.ice_servers() },
        }
    }

    fn ice_servers(&self) -> Vec<IceServer> {
        if self.ice_urls.is_empty() {
            return Vec::new();
        }

        let server = IceServer::new(self.ice_urls.iter().cloned());
        match (&self.ice_username, &self.ice_credential) {
            (Some(username), Some(credential)) => vec![server.with_credentials(username, credential)],
            _ => vec![server],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("antenna-tui").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_local_multi_room() {
        let args = parse(&[]);
        let location = args.location().unwrap();
        let config = args.chat_config(&location);

        assert_eq!(config, ChatConfig::default());
        assert_eq!(args.engine_config().handshake_timeout, Duration::from_secs(10));
        assert!(args.log_file.is_none());
    }

    #[test]
    fn https_location_selects_secure_host() {
        let args = parse(&["--url", "https://chat.example.org/?room=general"]);
        let config = args.chat_config(&args.location().unwrap());

        assert_eq!(config.host, "chat.example.org");
        assert!(config.secure);
    }

    #[test]
    fn room_in_path_selects_path_placement() {
        let args = parse(&["--room-in-path"]);
        let config = args.chat_config(&args.location().unwrap());

        assert_eq!(config.deployment, Deployment::MultiRoom { placement: RoomPlacement::Path });
    }

    #[test]
    fn global_mode() {
        let args = parse(&["--mode", "global"]);
        let config = args.chat_config(&args.location().unwrap());

        assert_eq!(config.deployment, Deployment::Global);
    }

    #[test]
    fn peer_assisted_collects_ice_servers() {
        let args = parse(&[
            "--mode",
            "peer-assisted",
            "--ice-url",
            "stun:stun.example.org:3478",
            "--ice-url",
            "turn:turn.example.org:3478",
            "--ice-username",
            "visitor",
            "--ice-credential",
            "secret",
        ]);
        let config = args.chat_config(&args.location().unwrap());

        let expected = IceServer::new(["stun:stun.example.org:3478", "turn:turn.example.org:3478"])
            .with_credentials("visitor", "secret");
        assert_eq!(config.deployment, Deployment::PeerAssisted { ice_servers: vec![expected] });
    }

    #[test]
    fn ice_username_requires_credential() {
        let result = Args::try_parse_from(["antenna-tui", "--ice-username", "visitor"]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_url_is_rejected() {
        let args = parse(&["--url", "not a url"]);
        assert!(matches!(args.location(), Err(ConfigError::InvalidUrl { .. })));
    }
}
