//! Shopfront client entry point.
//!
//! Runs the client pipeline headless: notifications are logged instead of
//! posted to an OS tray and in-app messages are logged instead of drawn.
//!
//! # Usage
//!
//! ```text
//! shop-client [OPTIONS]
//!
//! Options:
//!   --config <PATH>        Config file [default: platform config dir]
//!   --api-url <URL>        REST base URL (overrides [api] base_url)
//!   --socket-url <URL>     Realtime server URL (overrides [realtime] socket_url)
//!   --email <EMAIL>        Log in with these credentials
//!   --password <PASSWORD>
//!   --user-id <ID>         Skip login and attach the channel to this user
//! ```
//!
//! Every option can also come from the environment (`SHOP_API_URL`,
//! `SHOP_SOCKET_URL`, `SHOP_EMAIL`, `SHOP_PASSWORD`, `SHOP_USER_ID`).
//!
//! # Lifecycle
//!
//! ```text
//! main()
//!  └─ load config, init tracing
//!  └─ AppContext::new()        -- real transports, log adapters
//!  └─ notifications.init()     -- permission + push token, once
//!  └─ login / resume           -- opens the realtime channel
//!  └─ wait for Ctrl-C
//!  └─ logout / close           -- unregisters and closes the channel
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shop_client::application::context::{AppContext, AppDependencies};
use shop_client::application::event_bus::ConnectionEvent;
use shop_client::application::request_client::CredentialStore;
use shop_client::application::session::LoginOutcome;
use shop_client::infrastructure::http::ReqwestTransport;
use shop_client::infrastructure::push::{LogAlertSink, LogPushProvider};
use shop_client::infrastructure::socket::WsChannelTransport;
use shop_client::infrastructure::storage::config::{self, ClientConfig, ConfigError};
use shop_client::infrastructure::storage::credentials::{
    MemoryCredentialStore, TomlCredentialStore,
};
use shop_client::infrastructure::surface::LogSurface;

const CREDENTIALS_FILE: &str = "credentials.toml";

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Shopfront client: order updates as notifications and in-app messages.
#[derive(Debug, Parser)]
#[command(name = "shop-client", version)]
struct Cli {
    /// Path to `config.toml`.  Defaults to the platform config directory.
    #[arg(long, env = "SHOP_CONFIG")]
    config: Option<PathBuf>,

    /// REST base URL, e.g. `http://192.168.1.20:8082/api/v1`.
    #[arg(long, env = "SHOP_API_URL")]
    api_url: Option<String>,

    /// Realtime server URL, e.g. `ws://192.168.1.20:8083`.
    #[arg(long, env = "SHOP_SOCKET_URL")]
    socket_url: Option<String>,

    #[arg(long, env = "SHOP_EMAIL", requires = "password")]
    email: Option<String>,

    #[arg(long, env = "SHOP_PASSWORD", requires = "email", hide_env_values = true)]
    password: Option<String>,

    /// Attach the realtime channel to this user without logging in.
    #[arg(long, env = "SHOP_USER_ID", conflicts_with = "email")]
    user_id: Option<String>,
}

impl Cli {
    /// Applies command-line overrides on top of the file config.
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(url) = &self.socket_url {
            config.realtime.socket_url = url.clone();
        }
    }

    fn load_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut cfg = match &self.config {
            Some(path) => config::load_config_from(path)?,
            None => match config::load_config() {
                Err(ConfigError::NoPlatformConfigDir) => ClientConfig::default(),
                other => other?,
            },
        };
        self.apply(&mut cfg);
        Ok(cfg)
    }

    /// Credentials live next to the config file.
    fn credentials_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(
                path.parent()
                    .map(|dir| dir.join(CREDENTIALS_FILE))
                    .unwrap_or_else(|| PathBuf::from(CREDENTIALS_FILE)),
            ),
            None => config::config_dir().ok().map(|dir| dir.join(CREDENTIALS_FILE)),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str())),
        )
        .init();

    info!(
        api = %config.api.base_url,
        socket = %config.realtime.socket_url,
        "Shopfront client starting"
    );

    let credentials: Arc<dyn CredentialStore> = match cli.credentials_path() {
        Some(path) => Arc::new(TomlCredentialStore::new(path)),
        None => {
            warn!("no config directory; credentials kept in memory only");
            Arc::new(MemoryCredentialStore::default())
        }
    };

    let http = ReqwestTransport::new(config.request_timeout())
        .context("failed to build HTTP client")?;
    let ctx = AppContext::new(
        config.app_settings(),
        AppDependencies {
            http: Arc::new(http),
            channel: Arc::new(WsChannelTransport::new(config.ws_transport())),
            credentials,
            push: Arc::new(LogPushProvider::new()),
            alerts: Arc::new(LogAlertSink),
            surface: Arc::new(LogSurface),
        },
    );

    ctx.bus.on_lifecycle(|event| match event {
        ConnectionEvent::Connected { connection_id } => info!(%connection_id, "channel up"),
        ConnectionEvent::Disconnected { reason } => warn!(?reason, "channel down"),
        ConnectionEvent::ConnectFailed { reason } => error!(%reason, "channel failed"),
    });

    let outcome = ctx.notifications.init().await;
    info!(?outcome, "notifications initialised");

    // ── Session ───────────────────────────────────────────────────────────────
    let mut logged_in = None;
    let mut attached = None;
    if let (Some(email), Some(password)) = (&cli.email, &cli.password) {
        match ctx.session.login(email, password).await {
            LoginOutcome::LoggedIn { user_id, channel } => {
                info!(%user_id, ?channel, "session started");
                logged_in = Some(user_id);
            }
            LoginOutcome::OtpRequired { message } => {
                warn!("account needs OTP confirmation: {message}");
            }
            LoginOutcome::Rejected { message } => error!("login failed: {message}"),
        }
    } else if let Some(user_id) = &cli.user_id {
        let state = ctx.session.resume(user_id).await;
        info!(%user_id, ?state, "channel attached");
        attached = Some(user_id.clone());
    } else {
        info!("no user given; realtime channel stays closed");
    }

    // ── Run until Ctrl-C ──────────────────────────────────────────────────────
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C; shutting down"),
        Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
    }

    if let Some(user_id) = logged_in {
        ctx.session.logout(&user_id).await;
    } else if let Some(user_id) = attached {
        ctx.connection.close(&user_id).await;
    }

    info!("Shopfront client stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
