//! Session context: owns all mutable state for one visit and exposes the
//! synchronous command surface the browser glue drives.
//!
//! Commands never touch the DOM. They queue `UiEvent`s which the host drains
//! with `take_events` and applies, and they hand deferred work to the
//! `Scheduler`, which reports back through `fire`.

use rand::Rng;

use crate::config::Config;
use crate::copy;
use crate::error::FlowError;
use crate::evasive::{Bounds, EvasiveButton, Placement};
use crate::flow::{FlowController, Step};
use crate::scheduler::{MessageId, Scheduler, Task, TaskId};
use crate::selection::{InputSnapshot, KeyValueStore, SelectionRecord, SelectionStore};
use crate::summary::Summary;

/// Instructions for the rendering collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// Hide every section and show this one.
    ShowStep(Step),
    ScrollToTop,
    RenderSummary(Summary),
    MoveButton(Placement),
    SetButtonLabel(String),
    ButtonShake(bool),
    ShowMessage { id: MessageId, text: String },
    /// Removing an already removed message is harmless.
    DismissMessage(MessageId),
    /// Yes-button celebration: confetti, hearts, music.
    Celebrate,
    /// Uncheck every checkbox and radio.
    ClearInputs,
}

pub struct Session<K, S, R> {
    config: Config,
    flow: FlowController,
    selections: SelectionStore<K>,
    button: EvasiveButton,
    scheduler: S,
    rng: R,
    events: Vec<UiEvent>,
    settle_task: Option<TaskId>,
    message: Option<(MessageId, TaskId)>,
    next_message: u32,
    step_task: Option<TaskId>,
}

impl<K: KeyValueStore, S: Scheduler, R: Rng> Session<K, S, R> {
    pub fn new(config: Config, storage: K, scheduler: S, rng: R) -> Self {
        let selections = SelectionStore::new(storage, config.storage_key.clone());
        let button = EvasiveButton::new(&config);
        Self {
            config,
            flow: FlowController::default(),
            selections,
            button,
            scheduler,
            rng,
            events: Vec::new(),
            settle_task: None,
            message: None,
            next_message: 0,
            step_task: None,
        }
    }

    /// Restore saved selections and show the first step.
    pub fn start(&mut self) {
        self.selections.restore();
        self.activate(Step::FIRST.get());
        log::info!("valentine session started");
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn current_step(&self) -> Step {
        self.flow.current()
    }

    pub fn selections(&self) -> &SelectionRecord {
        self.selections.record()
    }

    pub fn storage(&self) -> &K {
        self.selections.storage()
    }

    pub fn button(&self) -> &EvasiveButton {
        &self.button
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn take_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    /// Show step `n`. Unknown steps are logged and ignored.
    pub fn activate(&mut self, n: u8) -> bool {
        let step = match self.flow.activate(n) {
            Ok(step) => step,
            Err(err) => {
                log::warn!("{err}; staying on step {}", self.flow.current().get());
                return false;
            }
        };
        self.events.push(UiEvent::ShowStep(step));
        self.events.push(UiEvent::ScrollToTop);
        if step.is_terminal() {
            let summary = Summary::from_record(self.selections.record());
            self.events.push(UiEvent::RenderSummary(summary));
        }
        true
    }

    /// Capture the on-screen inputs, then show step `n`.
    pub fn advance(&mut self, n: u8, inputs: &InputSnapshot) -> bool {
        self.selections.snapshot(inputs);
        self.activate(n)
    }

    /// Forget everything and return to the first step.
    pub fn reset(&mut self) {
        for id in [self.settle_task.take(), self.step_task.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(id);
        }
        if let Some((message, task)) = self.message.take() {
            self.scheduler.cancel(task);
            self.events.push(UiEvent::DismissMessage(message));
        }
        self.selections.clear();
        self.button.reset();
        self.events.push(UiEvent::ClearInputs);
        self.events.push(UiEvent::ButtonShake(false));
        self.events.push(UiEvent::MoveButton(Placement::Natural));
        self.events.push(UiEvent::SetButtonLabel(copy::BUTTON_INITIAL.to_string()));
        self.activate(Step::FIRST.get());
        log::info!("session reset");
    }

    /// Pointer is about to reach the No button. Returns whether it moved.
    pub fn on_approach(&mut self, bounds: Bounds) -> bool {
        let Some(relocation) = self.button.approach(&bounds, &mut self.rng) else {
            return false;
        };
        self.events.push(UiEvent::MoveButton(relocation.placement));
        self.events.push(UiEvent::SetButtonLabel(relocation.label));
        self.events.push(UiEvent::ButtonShake(true));
        self.settle_task = Some(
            self.scheduler
                .schedule(self.config.settle_delay_ms, Task::SettleRelocation),
        );
        if relocation.discourage {
            self.show_discouragement();
        }
        true
    }

    /// The No button was clicked.
    pub fn on_confirm(&mut self) -> Result<(), FlowError> {
        match self.button.confirm() {
            Ok(()) => {
                log::info!("no button accepted after {} moves", self.button.move_count());
                self.events.push(UiEvent::MoveButton(Placement::Natural));
                self.events.push(UiEvent::SetButtonLabel(self.button.label()));
                Ok(())
            }
            Err(err) => {
                log::debug!("{err}");
                self.show_discouragement();
                Err(err)
            }
        }
    }

    /// The Yes button was clicked: celebrate, then move on after a pause.
    pub fn accept(&mut self) -> bool {
        if self.step_task.is_some() {
            return false;
        }
        let Some(next) = self.flow.current().next() else {
            return false;
        };
        self.events.push(UiEvent::Celebrate);
        self.step_task = Some(
            self.scheduler
                .schedule(self.config.celebration_delay_ms, Task::ShowStep(next)),
        );
        true
    }

    /// A scheduled task expired.
    pub fn fire(&mut self, task: Task) {
        match task {
            Task::SettleRelocation => {
                self.settle_task = None;
                self.button.settle();
                self.events.push(UiEvent::ButtonShake(false));
            }
            Task::DismissMessage(id) => {
                if matches!(self.message, Some((current, _)) if current == id) {
                    self.message = None;
                    self.events.push(UiEvent::DismissMessage(id));
                }
            }
            Task::ShowStep(step) => {
                self.step_task = None;
                self.activate(step.get());
            }
        }
    }

    fn show_discouragement(&mut self) {
        if self.button.remaining() <= 0 {
            return;
        }
        if let Some((previous, task)) = self.message.take() {
            self.scheduler.cancel(task);
            self.events.push(UiEvent::DismissMessage(previous));
        }
        let text = copy::DISCOURAGEMENTS[self.rng.gen_range(0..copy::DISCOURAGEMENTS.len())];
        let id = MessageId(self.next_message);
        self.next_message = self.next_message.wrapping_add(1);
        self.events.push(UiEvent::ShowMessage {
            id,
            text: text.to_string(),
        });
        let task = self
            .scheduler
            .schedule(self.config.message_duration_ms, Task::DismissMessage(id));
        self.message = Some((id, task));
    }
}

impl<K: KeyValueStore, R: Rng> Session<K, crate::scheduler::ManualScheduler, R> {
    /// Advance the virtual clock by `ms`, firing every task that comes due.
    pub fn run_for(&mut self, ms: u64) {
        let until = self.scheduler.now_ms() + ms;
        while let Some(task) = self.scheduler.pop_due(until) {
            self.fire(task);
        }
        self.scheduler.set_now(until);
    }
}
