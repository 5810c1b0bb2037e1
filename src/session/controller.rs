//! The operator's session
//!
//! Holds everything the panel shows and exposes one method per thing the
//! operator can do. The view renders from the accessors and calls the
//! operations; it makes no decisions of its own.

use super::cursor::Cursor;
use crate::config::TeleopConfig;
use crate::dispatch::{DispatchEvent, DispatchHandle, EntrainSettings, StaticTone, Trigger};
use crate::script::{Script, ScriptOption, StaticOption, StaticScript};
use crate::Result;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const BUSY: &str = "Still sending, please wait.";
const NO_SCRIPT: &str = "No script loaded.";

#[derive(Clone, Copy, Debug)]
struct InFlight {
    trigger: Trigger,
    /// Script generation the command was pressed on
    generation: u64,
}

/// Operator session state and operations
pub struct Session {
    option_slots: usize,
    script: Option<Script>,
    generation: u64,
    static_script: StaticScript,
    cursor: Cursor,
    entrain: EntrainSettings,
    tone: StaticTone,
    advisory: String,
    in_flight: Option<InFlight>,
    dispatch: DispatchHandle,
}

impl Session {
    pub fn new(config: &TeleopConfig, dispatch: DispatchHandle) -> Self {
        Self {
            option_slots: config.options.max(1),
            script: None,
            generation: 0,
            static_script: StaticScript::default(),
            cursor: Cursor::new(0),
            entrain: config.entrain_settings(),
            tone: StaticTone::default(),
            advisory: "---".to_string(),
            in_flight: None,
            dispatch,
        }
    }

    /// Load the startup scripts named in the config
    pub fn load_initial(&mut self, config: &TeleopConfig) {
        match &config.script {
            Some(path) => {
                let _ = self.load_script(path);
            }
            None => {
                warn!("No script in config file");
                self.advisory = "Could not load script!".to_string();
            }
        }
        if let Some(path) = &config.static_script {
            let _ = self.load_static_script(path);
        }
    }

    // === Script loading ===

    /// Replace the script; on failure the previous one stays active
    pub fn load_script<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        match Script::load(path.as_ref()) {
            Ok(script) => {
                self.cursor.reset(script.len());
                self.script = Some(script);
                self.generation += 1;
                self.advisory = "Script loaded!".to_string();
                Ok(())
            }
            Err(e) => {
                warn!("Could not load script {}: {}", path.as_ref().display(), e);
                self.advisory = e.user_message();
                Err(e)
            }
        }
    }

    /// Replace the static options; on failure the previous ones stay active
    pub fn load_static_script<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        match StaticScript::load(path.as_ref()) {
            Ok(script) => {
                self.static_script = script;
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Could not load static script {}: {}",
                    path.as_ref().display(),
                    e
                );
                self.advisory = "Could not read static script file!".to_string();
                Err(e)
            }
        }
    }

    // === Dispatch ===

    /// Press option `slot` of the current line
    ///
    /// Returns whether a command was queued.
    pub fn press_option(&mut self, slot: usize) -> bool {
        if self.script.is_none() {
            self.advisory = NO_SCRIPT.to_string();
            return false;
        }
        if slot >= self.option_slots {
            return false;
        }
        let option = self.option(slot);
        self.submit(option.command, Trigger::Line(slot))
    }

    /// Press static option `index`
    pub fn press_static(&mut self, index: usize) -> bool {
        let Some(option) = self.static_script.get(index) else {
            return false;
        };
        let command = option.command.clone();
        self.submit(command, Trigger::Static(index))
    }

    /// Send the turn signal on its own
    pub fn send_participant_turn(&mut self) {
        match self.dispatch.participant_turn() {
            Ok(()) => self.advisory = "Sending participant turn message.".to_string(),
            Err(e) => {
                error!("Could not queue participant turn: {}", e);
                self.advisory = e.user_message();
            }
        }
    }

    fn submit(&mut self, command: String, trigger: Trigger) -> bool {
        if self.in_flight.is_some() {
            self.advisory = BUSY.to_string();
            return false;
        }
        debug!("Pressed {:?}: {:?}", trigger, command);
        match self.dispatch.run(command, trigger, self.entrain) {
            Ok(()) => {
                self.in_flight = Some(InFlight {
                    trigger,
                    generation: self.generation,
                });
                true
            }
            Err(e) => {
                error!("Could not queue command: {}", e);
                self.advisory = e.user_message();
                false
            }
        }
    }

    /// Apply all pending dispatch events; returns how many were handled
    pub fn poll_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.dispatch.try_recv_event() {
            self.apply_event(event);
            handled += 1;
        }
        handled
    }

    /// Block until the in-flight command (if any) completes or `timeout` elapses
    ///
    /// Returns `true` if the session is idle afterwards.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight.is_some() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            match self.dispatch.recv_event_timeout(deadline - now) {
                Ok(Some(event)) => self.apply_event(event),
                Ok(None) => return false,
                Err(e) => {
                    error!("{}", e);
                    self.in_flight = None;
                    self.advisory = e.user_message();
                }
            }
        }
        true
    }

    fn apply_event(&mut self, event: DispatchEvent) {
        match event {
            DispatchEvent::Sending(action) => {
                self.advisory = action.advisory().to_string();
            }
            DispatchEvent::Completed(report) => {
                let in_flight = self.in_flight.take();
                self.tone = report.tone;

                if let Some(e) = &report.error {
                    self.advisory = e.user_message();
                    return;
                }

                let same_script = in_flight.is_some_and(|f| {
                    f.trigger == report.trigger && f.generation == self.generation
                });
                if report.should_advance() && same_script && !self.cursor.is_paused() {
                    self.forward();
                }
            }
            DispatchEvent::TurnSignalled(Err(e)) => {
                self.advisory = e.user_message();
            }
            DispatchEvent::TurnSignalled(Ok(())) => {}
            DispatchEvent::Shutdown => {
                warn!("Dispatch worker stopped");
                self.in_flight = None;
                self.advisory = "Dispatcher stopped.".to_string();
            }
        }
    }

    // === Navigation ===

    pub fn back(&mut self) -> bool {
        if self.refuse_while_busy() {
            return false;
        }
        match self.cursor.back() {
            Ok(line) => {
                info!("Moved back to line {}", line);
                self.advisory = "Next speech.".to_string();
                true
            }
            Err(blocked) => {
                self.advisory = blocked.to_string();
                false
            }
        }
    }

    pub fn forward(&mut self) -> bool {
        if self.refuse_while_busy() {
            return false;
        }
        match self.cursor.forward() {
            Ok(line) => {
                info!("Moved forward to line {}", line);
                self.advisory = "Next speech.".to_string();
                true
            }
            Err(blocked) => {
                self.advisory = blocked.to_string();
                false
            }
        }
    }

    pub fn jump_start(&mut self) {
        if self.refuse_while_busy() {
            return;
        }
        self.cursor.jump_start();
        self.advisory = "At beginning of script.".to_string();
    }

    pub fn jump_end(&mut self) {
        if self.refuse_while_busy() {
            return;
        }
        self.cursor.jump_end();
        self.advisory = "At end of script.".to_string();
    }

    /// Pause or unpause auto-advance and stepping
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.cursor.toggle_pause();
        self.advisory = if paused { "Paused." } else { "Un-paused." }.to_string();
        paused
    }

    fn refuse_while_busy(&mut self) -> bool {
        if self.in_flight.is_some() {
            self.advisory = BUSY.to_string();
            true
        } else {
            false
        }
    }

    // === Entrainer settings ===

    pub fn set_speaker_age(&mut self, age: u32) {
        self.entrain.speaker_age = age;
    }

    pub fn set_entrain(&mut self, entrain: bool) {
        self.entrain.entrain = entrain;
    }

    // === Accessors ===

    /// Options for the current line, one per configured slot
    pub fn options(&self) -> Vec<ScriptOption> {
        match &self.script {
            Some(script) => script.options(self.cursor.line(), self.option_slots),
            None => vec![ScriptOption::absent(); self.option_slots],
        }
    }

    fn option(&self, slot: usize) -> ScriptOption {
        match &self.script {
            Some(script) => script
                .line(self.cursor.line())
                .map(|line| line.option(slot))
                .unwrap_or_else(ScriptOption::absent),
            None => ScriptOption::absent(),
        }
    }

    pub fn static_options(&self) -> &[StaticOption] {
        self.static_script.options()
    }

    pub fn option_slots(&self) -> usize {
        self.option_slots
    }

    pub fn has_script(&self) -> bool {
        self.script.is_some()
    }

    pub fn script_source(&self) -> Option<&Path> {
        self.script.as_ref().and_then(|s| s.source())
    }

    pub fn static_source(&self) -> Option<&Path> {
        self.static_script.source()
    }

    pub fn current_line(&self) -> usize {
        self.cursor.line()
    }

    pub fn line_count(&self) -> usize {
        self.cursor.len()
    }

    pub fn is_paused(&self) -> bool {
        self.cursor.is_paused()
    }

    /// A command is being dispatched
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn advisory(&self) -> &str {
        &self.advisory
    }

    pub fn tone(&self) -> StaticTone {
        self.tone
    }

    pub fn entrain(&self) -> EntrainSettings {
        self.entrain
    }

    /// Stop the dispatch worker
    pub fn shutdown(&self) {
        if let Err(e) = self.dispatch.shutdown() {
            debug!("Dispatch worker already gone: {}", e);
        }
    }
}
