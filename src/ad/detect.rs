use crate::notice::Notice;
use crate::session::SessionState;
use crate::view::{MessageTone, PageView};
use std::time::{Duration, Instant};

pub const SDK_NOT_REFERENCED: &str = "SDK script not loaded";
pub const SDK_FUNCTION_MISSING: &str = "SDK function not found";
pub const SDK_UNAVAILABLE_MESSAGE: &str =
    "Ad service temporarily unavailable. You can still proceed.";

/// Presence checks for the ad provider SDK.
pub trait SdkProbe {
    /// Whether the configuration references the provider's SDK at all.
    fn script_referenced(&self) -> bool;
    /// Whether the provider's show function can be called right now.
    fn callable_present(&self) -> bool;
    fn callable_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Rechecking { at: Instant },
    Done,
}

/// One-shot SDK availability check with a single delayed re-check.
#[derive(Debug, Clone)]
pub struct SdkDetector {
    state: State,
    recheck_delay: Duration,
}

impl SdkDetector {
    pub fn new(recheck_delay: Duration) -> Self {
        Self {
            state: State::Idle,
            recheck_delay,
        }
    }

    /// Run the startup check.
    pub fn start(
        &mut self,
        now: Instant,
        probe: &dyn SdkProbe,
        session: &mut SessionState,
    ) -> Vec<Notice> {
        tracing::debug!("checking ad SDK status");
        if !probe.script_referenced() {
            tracing::error!("ad SDK reference not configured for the provider domain");
            session.sdk_error = Some(SDK_NOT_REFERENCED.into());
            self.state = State::Done;
            return Vec::new();
        }
        if probe.callable_present() {
            tracing::info!("ad SDK loaded: {}() is available", probe.callable_name());
            session.sdk_available = true;
            self.state = State::Done;
        } else {
            tracing::warn!(
                "{}() not found yet; the SDK might still be loading",
                probe.callable_name()
            );
            self.schedule_recheck(now);
        }
        Vec::new()
    }

    /// Arm a single re-check `recheck_delay` from `now`.
    pub fn schedule_recheck(&mut self, now: Instant) {
        self.state = State::Rechecking {
            at: now + self.recheck_delay,
        };
    }

    pub fn poll(
        &mut self,
        now: Instant,
        probe: &dyn SdkProbe,
        session: &mut SessionState,
        view: &mut PageView,
    ) -> Vec<Notice> {
        let State::Rechecking { at } = self.state else {
            return Vec::new();
        };
        if now < at {
            return Vec::new();
        }
        self.state = State::Done;
        if probe.callable_present() {
            tracing::info!("ad SDK loaded after delay");
            session.sdk_available = true;
            session.sdk_error = None;
            return Vec::new();
        }
        tracing::error!("ad SDK failed to load");
        session.sdk_error = Some(SDK_FUNCTION_MISSING.into());
        if let Some(overlay) = view.countdown_mut() {
            overlay.set_message(SDK_UNAVAILABLE_MESSAGE, MessageTone::Warning);
        }
        vec![Notice::info(SDK_UNAVAILABLE_MESSAGE)]
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Rechecking { .. })
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            State::Rechecking { at } => Some(at),
            _ => None,
        }
    }
}
