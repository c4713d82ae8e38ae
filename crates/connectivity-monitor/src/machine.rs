//! Pure connectivity alert state machine.
//!
//! Transitions are edge-triggered on the usable fact. The machine owns no
//! clock: it asks its driver to start/cancel the dwell timer through
//! [`Effect`]s and is told about expiry through [`Input::DwellElapsed`].

use std::time::Duration;

use serde::Serialize;

/// How long the "connection restored" banner stays up.
pub const RESTORED_DWELL: Duration = Duration::from_millis(2000);

/// Reconciled connectivity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    #[default]
    Unknown,
    Connected,
    Disconnected,
    RestoredTransient,
}

/// Which banner is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertVariant {
    NoConnection,
    Restored,
}

/// Animation drive signal for the banner surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "slide", content = "variant", rename_all = "snake_case")]
pub enum AnimationCue {
    SlideIn(AlertVariant),
    SlideOut,
}

/// Presentation-facing view of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AlertView {
    pub state: ConnectivityState,
    pub visible: bool,
    pub variant: Option<AlertVariant>,
}

/// Inputs accepted by [`AlertMachine::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Result of the one-shot fetch at start.
    Initial(bool),
    /// A usable fact from the change subscription.
    Changed(bool),
    /// A dwell timer fired.
    DwellElapsed(u64),
    /// The user closed the banner.
    Dismiss,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Start the dwell timer; replaces any pending one.
    StartDwell(u64),
    /// Drop the pending dwell timer.
    CancelDwell,
    Animate(AnimationCue),
}

/// Connectivity alert state machine.
#[derive(Debug, Default)]
pub struct AlertMachine {
    state: ConnectivityState,
    previous_usable: Option<bool>,
    visible: bool,
    pending_dwell: Option<u64>,
    next_dwell_id: u64,
}

impl AlertMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    /// Last recorded usable fact, `None` before the first observation.
    pub fn previous_usable(&self) -> Option<bool> {
        self.previous_usable
    }

    pub fn pending_dwell(&self) -> Option<u64> {
        self.pending_dwell
    }

    pub fn view(&self) -> AlertView {
        let variant = match (self.visible, self.state) {
            (true, ConnectivityState::Disconnected) => Some(AlertVariant::NoConnection),
            (true, ConnectivityState::RestoredTransient) => Some(AlertVariant::Restored),
            _ => None,
        };
        AlertView {
            state: self.state,
            visible: variant.is_some(),
            variant,
        }
    }

    /// Apply one input and return the effects the driver must perform, in order.
    pub fn apply(&mut self, input: Input) -> Vec<Effect> {
        match input {
            // A snapshot that lands after the first change event is stale.
            Input::Initial(usable) if self.previous_usable.is_none() => self.first_fact(usable),
            Input::Initial(_) => Vec::new(),
            Input::Changed(usable) => match self.previous_usable {
                None => self.first_fact(usable),
                Some(previous) if previous == usable => Vec::new(),
                Some(_) if usable => self.enter_restored(),
                Some(_) => self.enter_disconnected(),
            },
            Input::DwellElapsed(id) if self.pending_dwell == Some(id) => {
                self.pending_dwell = None;
                self.state = ConnectivityState::Connected;
                self.hide()
            }
            Input::DwellElapsed(_) => Vec::new(),
            Input::Dismiss => self.dismiss(),
        }
    }

    fn first_fact(&mut self, usable: bool) -> Vec<Effect> {
        if usable {
            self.previous_usable = Some(true);
            self.state = ConnectivityState::Connected;
            Vec::new()
        } else {
            self.enter_disconnected()
        }
    }

    fn enter_restored(&mut self) -> Vec<Effect> {
        let mut effects = self.cancel_dwell();
        self.previous_usable = Some(true);
        self.state = ConnectivityState::RestoredTransient;
        self.visible = true;

        let id = self.next_dwell_id;
        self.next_dwell_id += 1;
        self.pending_dwell = Some(id);

        effects.push(Effect::Animate(AnimationCue::SlideIn(AlertVariant::Restored)));
        effects.push(Effect::StartDwell(id));
        effects
    }

    fn enter_disconnected(&mut self) -> Vec<Effect> {
        let mut effects = self.cancel_dwell();
        self.previous_usable = Some(false);
        self.state = ConnectivityState::Disconnected;
        self.visible = true;
        effects.push(Effect::Animate(AnimationCue::SlideIn(
            AlertVariant::NoConnection,
        )));
        effects
    }

    /// Hide the banner without touching the recorded usable fact.
    fn dismiss(&mut self) -> Vec<Effect> {
        if !self.visible {
            return Vec::new();
        }
        let mut effects = self.cancel_dwell();
        if self.state == ConnectivityState::RestoredTransient {
            self.state = ConnectivityState::Connected;
        }
        effects.extend(self.hide());
        effects
    }

    fn hide(&mut self) -> Vec<Effect> {
        if !self.visible {
            return Vec::new();
        }
        self.visible = false;
        vec![Effect::Animate(AnimationCue::SlideOut)]
    }

    fn cancel_dwell(&mut self) -> Vec<Effect> {
        match self.pending_dwell.take() {
            Some(_) => vec![Effect::CancelDwell],
            None => Vec::new(),
        }
    }
}
