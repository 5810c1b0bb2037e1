//! Main panel application and eframe integration

use crate::config::TeleopConfig;
use crate::robot::SharedRobotStatus;
use crate::script::list_scripts;
use crate::session::Session;
use crate::testconfig::{AssertionContext, AssertionResult, ScenarioCommand, ScenarioRunner};
use crate::ui::components::{
    EntrainerBox, NavBar, OptionList, ScriptPicker, StaticPanel, StatusStrip,
};
use crate::ui::theme::Theme;
use egui::{CentralPanel, RichText, SidePanel, TopBottomPanel};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Repaint interval so dispatch progress shows without input events
const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// The teleoperation panel
pub struct TeleopApp {
    initialized: bool,
    session: Session,
    status: SharedRobotStatus,
    theme: Theme,
    script_dir: PathBuf,
    static_script_dir: PathBuf,
    script_choices: Vec<PathBuf>,
    static_choices: Vec<PathBuf>,
    use_entrainer: bool,
    /// Robot is simulated, so the operator may toggle attention by hand
    simulated: bool,
    scenario: Option<ScenarioRunner>,
    pending_exit: Option<i32>,
}

impl TeleopApp {
    /// Create the panel and apply the theme
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        session: Session,
        status: SharedRobotStatus,
        config: &TeleopConfig,
    ) -> Self {
        let app = Self::from_parts(session, status, config);
        app.theme.apply(&cc.egui_ctx);
        app
    }

    /// Create the panel without an eframe context
    pub fn from_parts(session: Session, status: SharedRobotStatus, config: &TeleopConfig) -> Self {
        Self {
            initialized: false,
            session,
            status,
            theme: Theme::dark(),
            script_dir: config.script_dir.clone(),
            static_script_dir: config.static_script_dir.clone(),
            script_choices: Vec::new(),
            static_choices: Vec::new(),
            use_entrainer: config.use_entrainer,
            simulated: false,
            scenario: None,
            pending_exit: None,
        }
    }

    pub fn with_scenario(mut self, runner: ScenarioRunner) -> Self {
        self.scenario = Some(runner);
        self
    }

    pub fn simulated(mut self, simulated: bool) -> Self {
        self.simulated = simulated;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn status(&self) -> &SharedRobotStatus {
        &self.status
    }

    pub fn script_choices(&self) -> &[PathBuf] {
        &self.script_choices
    }

    pub fn static_choices(&self) -> &[PathBuf] {
        &self.static_choices
    }

    fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.rescan_scripts();

        if let Some(runner) = &mut self.scenario {
            runner.start();
        }
        info!("Teleop panel initialized");
    }

    /// Re-read both script directories
    pub fn rescan_scripts(&mut self) {
        self.script_choices = list_scripts(&self.script_dir);
        self.static_choices = list_scripts(&self.static_script_dir);
        info!(
            "Found {} scripts and {} static scripts",
            self.script_choices.len(),
            self.static_choices.len()
        );
    }

    fn process_scenario_commands(&mut self, ctx: &egui::Context) {
        let mut pending = Vec::new();
        if let Some(runner) = &mut self.scenario {
            while let Some(due) = runner.poll() {
                pending.push(due);
            }
        }

        for (command, assertion) in pending {
            self.execute(command);

            if let Some(assertion) = assertion {
                // Pick up anything the command already produced
                self.session.poll_events();
                let context = AssertionContext {
                    current_line: self.session.current_line(),
                    is_paused: self.session.is_paused(),
                    is_busy: self.session.is_busy(),
                    advisory: self.session.advisory(),
                    tone: self.session.tone(),
                };
                if let Some(runner) = &mut self.scenario {
                    let result = runner.check_assertion(&assertion, &context);
                    if matches!(result, AssertionResult::Failed(_)) && self.pending_exit == Some(0)
                    {
                        self.pending_exit = Some(1);
                    }
                }
            }
        }

        let Some(runner) = &self.scenario else {
            return;
        };
        if !runner.is_completed() {
            return;
        }
        if let Some(code) = self.pending_exit.take() {
            info!("{}", runner.summary());
            let code = if runner.passed() { code } else { 1 };
            info!("[SCENARIO] Exiting with code {}", code);
            self.session.shutdown();
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            std::process::exit(code);
        }
    }

    fn execute(&mut self, command: ScenarioCommand) {
        info!("[SCENARIO] Executing: {:?}", command);
        match command {
            ScenarioCommand::PressOption(slot) => {
                self.session.press_option(slot);
            }
            ScenarioCommand::PressStatic(index) => {
                self.session.press_static(index);
            }
            ScenarioCommand::Forward => {
                self.session.forward();
            }
            ScenarioCommand::Back => {
                self.session.back();
            }
            ScenarioCommand::JumpStart => self.session.jump_start(),
            ScenarioCommand::JumpEnd => self.session.jump_end(),
            ScenarioCommand::TogglePause => {
                self.session.toggle_pause();
            }
            ScenarioCommand::ParticipantTurn => self.session.send_participant_turn(),
            ScenarioCommand::Noop => {}
            ScenarioCommand::Exit { code } => self.pending_exit = Some(code),
        }
    }

    /// Run one frame: drain dispatch events, play the scenario, draw
    pub fn show(&mut self, ctx: &egui::Context) {
        self.initialize();
        self.session.poll_events();
        self.process_scenario_commands(ctx);

        TopBottomPanel::top("script_header").show(ctx, |ui| self.show_header(ui));

        TopBottomPanel::bottom("status_strip").show(ctx, |ui| {
            StatusStrip::new(&self.status, &self.theme)
                .allow_override(self.simulated)
                .show(ui);
        });

        SidePanel::right("static_options")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Static");
                let picked = ScriptPicker::new(
                    "static_script_picker",
                    &self.static_choices,
                    self.session.static_source(),
                )
                .show(ui);
                if let Some(path) = picked {
                    // Failure already lands in the advisory
                    let _ = self.session.load_static_script(path);
                }
                ui.separator();
                StaticPanel::new(&mut self.session, &self.theme).show(ui);
            });

        CentralPanel::default().show(ctx, |ui| {
            ui.label(
                RichText::new(self.session.advisory())
                    .size(18.0)
                    .color(self.theme.text_primary),
            );
            ui.add_space(self.theme.spacing);

            OptionList::new(&mut self.session, &self.theme).show(ui);
            ui.add_space(self.theme.spacing);
            NavBar::new(&mut self.session, &self.theme).show(ui);

            if self.use_entrainer {
                ui.add_space(self.theme.spacing);
                EntrainerBox::new(&mut self.session, &self.theme).show(ui);
            }
        });

        if self.scenario.is_some() || self.session.is_busy() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(REFRESH_INTERVAL);
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Script:");
            let picked =
                ScriptPicker::new("script_picker", &self.script_choices, self.session.script_source())
                    .show(ui);
            if let Some(path) = picked {
                if self.session.is_busy() {
                    warn!("Ignoring script change while a command is in flight");
                } else {
                    let _ = self.session.load_script(path);
                }
            }
            if ui.button("Rescan").clicked() {
                self.rescan_scripts();
            }

            ui.separator();
            let position = if self.session.has_script() {
                format!(
                    "Line {} of {}",
                    self.session.current_line() + 1,
                    self.session.line_count()
                )
            } else {
                "No script".to_string()
            };
            ui.label(RichText::new(position).color(self.theme.text_secondary));

            if self.session.is_paused() {
                ui.label(RichText::new("PAUSED").strong().color(self.theme.paused));
            }
        });
    }
}

impl eframe::App for TeleopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Panel closing, stopping dispatcher");
        self.session.shutdown();
    }
}
