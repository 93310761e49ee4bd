//! LaTeX2AI debug panel
//!
//! Shows why a LaTeX compilation failed and forwards the user's choice
//! (edit again, cancel, open log, create debug files) to the host plug-in.

mod bridge;
mod config;
mod error;
mod host;
mod panel;
mod protocol;
mod window;

use anyhow::Result;
use clap::Parser;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::bridge::{ChannelTransport, EventBridge, JsonLinesTransport};
use crate::config::PanelConfig;
use crate::host::DemoHost;
use crate::panel::PanelController;
use crate::protocol::{Action, Routing};
use crate::window::DebugPanelApp;

/// LaTeX2AI debug panel
#[derive(Parser, Debug)]
#[command(name = "latex2ai-debug-panel")]
#[command(about = "Debug status panel for LaTeX2AI compilation errors")]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run against a built-in host that reports this action
    /// (redo_items, item_create, item_edit)
    #[arg(long, value_name = "ACTION")]
    demo: Option<String>,

    /// Build token the host must report, overrides the configuration
    #[arg(long)]
    expected_token: Option<String>,

    /// Write the default configuration file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the host protocol
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    if args.init_config {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => config::default_config_path()?,
        };
        config::save_config(&PanelConfig::default(), &path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = load_panel_config(args.config.as_deref())?;
    if args.expected_token.is_some() {
        config.verification.expected_token = args.expected_token.clone();
    }

    let result = match &args.demo {
        Some(action) => run_demo(&config, Action::from(action.as_str())),
        None => run_stdio(&config),
    };

    check_panel_result(result)?;
    info!("Debug panel shutdown complete");

    Ok(())
}

/// Turn a window failure into a non-zero exit
fn check_panel_result(result: Result<(), eframe::Error>) -> Result<()> {
    result.map_err(|e| {
        error!("Panel error: {}", e);
        anyhow::anyhow!("Panel error: {e}")
    })
}

/// Load configuration from an explicit path, the default location, or defaults
fn load_panel_config(path: Option<&std::path::Path>) -> Result<PanelConfig> {
    if let Some(path) = path {
        let config = config::load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    if let Ok(config_path) = config::default_config_path() {
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return Ok(config);
            }
        }
    }
    info!("Using default configuration");
    Ok(PanelConfig::default())
}

/// Talk to the host over JSON lines on stdin/stdout
fn run_stdio(config: &PanelConfig) -> Result<(), eframe::Error> {
    info!("Running against host on stdin/stdout");

    let routing = Routing::from(&config.bridge);
    let expected_token = config.verification.expected_token.clone();

    window::run_panel(&config.window, move |ctx| {
        let (sender, inbound) = crossbeam_channel::unbounded();
        let repaint = ctx.clone();
        bridge::transport::spawn_line_reader(BufReader::new(std::io::stdin()), sender, move || {
            repaint.request_repaint()
        });

        let transport = JsonLinesTransport::new(std::io::stdout());
        start_panel(EventBridge::new(routing, transport), expected_token, inbound)
    })
}

/// Run against the built-in loopback host
fn run_demo(config: &PanelConfig, action: Action) -> Result<(), eframe::Error> {
    info!("Running in demo mode with action {}", action.as_str());

    let routing = Routing::from(&config.bridge);
    let expected_token = config.verification.expected_token.clone();

    window::run_panel(&config.window, move |ctx| {
        let (transport, inbound, endpoint) = ChannelTransport::pair();
        let repaint = ctx.clone();
        DemoHost::new(routing.namespace.clone(), action, expected_token.clone())
            .spawn(endpoint, move || repaint.request_repaint());

        start_panel(EventBridge::new(routing, transport), expected_token, inbound)
    })
}

fn start_panel<T: bridge::Transport>(
    bridge: EventBridge<T>,
    expected_token: Option<String>,
    inbound: crossbeam_channel::Receiver<protocol::InboundEvent>,
) -> DebugPanelApp<T> {
    let mut controller = PanelController::new(bridge, expected_token);
    if let Err(e) = controller.start() {
        error!("Failed to announce panel to host: {}", e);
    }
    DebugPanelApp::new(controller, inbound)
}
