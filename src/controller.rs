use crate::ad::detect::{SdkDetector, SdkProbe};
use crate::dispatch::{LinkDispatch, LinkOpener};
use crate::gate::{AdGate, AttemptOutcome, AttemptResolution};
use crate::notice::Notice;
use crate::session::SessionState;
use crate::view::PageView;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Watch(AttemptOutcome),
    Dispatch { started: bool },
}

/// Routes user actions and timer ticks to the gate and the dispatcher.
#[derive(Debug)]
pub struct Controller {
    session: SessionState,
    view: PageView,
    gate: AdGate,
    dispatch: LinkDispatch,
    detector: SdkDetector,
}

impl Controller {
    pub fn new(session: SessionState, view: PageView, gate: AdGate, detector: SdkDetector) -> Self {
        Self {
            session,
            view,
            gate,
            dispatch: LinkDispatch::new(),
            detector,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    /// The single click handler of the call-to-action control.
    pub fn on_cta_click(&mut self, now: Instant) -> ClickOutcome {
        if self.session.reward_granted() {
            let started = self
                .dispatch
                .dispatch(now, &self.session, &mut self.view);
            ClickOutcome::Dispatch { started }
        } else {
            ClickOutcome::Watch(self.watch_ad(now))
        }
    }

    pub fn watch_ad(&mut self, now: Instant) -> AttemptOutcome {
        self.gate.attempt(now, &mut self.session, &mut self.view)
    }

    pub fn force_unlock(&mut self) {
        self.gate.force_unlock(&mut self.session, &mut self.view);
    }

    pub fn schedule_sdk_recheck(&mut self, now: Instant) {
        self.detector.schedule_recheck(now);
    }

    /// Run the startup SDK check.
    pub fn start_detection(&mut self, now: Instant, probe: &dyn SdkProbe) -> Vec<Notice> {
        self.detector.start(now, probe, &mut self.session)
    }

    /// Advance every timer to `now`.
    pub fn tick(
        &mut self,
        now: Instant,
        probe: &dyn SdkProbe,
        opener: &mut dyn LinkOpener,
    ) -> Vec<Notice> {
        if let Some(overlay) = self.view.countdown_mut() {
            overlay.tick(now);
        }
        let mut notices = self
            .detector
            .poll(now, probe, &mut self.session, &mut self.view);
        notices.extend(self.gate.poll(now, &mut self.session, &mut self.view));
        notices.extend(
            self.dispatch
                .poll(now, &self.session, &mut self.view, opener),
        );
        notices
    }

    /// Whether any timer is still running and the display needs refreshing.
    pub fn wants_repaint(&self) -> bool {
        self.gate.is_busy()
            || self.dispatch.is_busy()
            || self.detector.is_pending()
            || self
                .view
                .countdown
                .as_ref()
                .is_some_and(|c| c.is_running())
    }

    pub fn last_resolution(&self) -> Option<&AttemptResolution> {
        self.gate.last_resolution()
    }
}
