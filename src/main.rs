//! Teleop - robot speech control panel
//!
//! Main entry point for the panel.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use eframe::egui;
use std::io::{self, BufReader};
use std::path::PathBuf;
use teleop::config::{TeleopConfig, DEFAULT_CONFIG_FILE};
use teleop::dispatch::{DispatchHandle, Dispatcher};
use teleop::robot::{
    spawn_status_reader, JsonLinesLink, RobotLink, SharedRobotStatus, SimConfig, SimulatedRobot,
};
use teleop::session::Session;
use teleop::testconfig::{Scenario, ScenarioRunner};
use teleop::ui::TeleopApp;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Where robot messages go and status comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LinkKind {
    /// In-process simulated robot
    Sim,
    /// JSON lines: messages on stdout, status updates on stdin
    Jsonl,
}

#[derive(Parser, Debug)]
#[command(version, about = "Speech and motion control panel for a social robot")]
struct Cli {
    /// Panel configuration file (JSON)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Route speech through the audio entrainer
    #[arg(long)]
    entrainer: bool,

    /// Robot link
    #[arg(long, value_enum, default_value_t = LinkKind::Sim)]
    link: LinkKind,

    /// Play a scenario file and exit with its result
    #[arg(long)]
    scenario: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the jsonl link owns stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teleop=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting teleop panel");

    let mut config = TeleopConfig::load_or_default(&cli.config);
    if cli.entrainer {
        config = config.with_entrainer();
    }

    let scenario = match &cli.scenario {
        Some(path) => Some(
            Scenario::load(path)
                .with_context(|| format!("Could not load scenario {}", path.display()))?,
        ),
        None => None,
    };

    let status = SharedRobotStatus::new(config.poll_interval());
    let link: Box<dyn RobotLink> = match cli.link {
        LinkKind::Sim => {
            let (link, robot) = SimulatedRobot::new(status.clone(), SimConfig::default());
            robot.start();
            Box::new(link)
        }
        LinkKind::Jsonl => {
            spawn_status_reader(BufReader::new(io::stdin()), status.clone());
            Box::new(JsonLinesLink::new(io::stdout()))
        }
    };
    info!("Robot link: {:?}", cli.link);

    let dispatcher = Dispatcher::new(link, status.clone(), config.dispatch_settings());
    let (handle, worker) = DispatchHandle::new(dispatcher);
    worker.start();

    let mut session = Session::new(&config, handle);
    session.load_initial(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("Teleop"),
        ..Default::default()
    };

    let simulated = cli.link == LinkKind::Sim;
    eframe::run_native(
        "Teleop",
        options,
        Box::new(move |cc| {
            let mut app = TeleopApp::new(cc, session, status, &config).simulated(simulated);
            if let Some(scenario) = scenario {
                app = app.with_scenario(ScenarioRunner::new(scenario));
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow!("Panel exited with error: {}", e))
}
