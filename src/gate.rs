//! The watch-ad gate.
//!
//! [`AdGate::attempt`] starts an ad and [`AdGate::poll`] drives it to the
//! unlock. Both success and failure end in the same unlock; failure only
//! delays it until the countdown has run its full length. The gate is the
//! error boundary for the ad path: no [`AdError`] escapes it.

use crate::ad::{AdError, AdMode, AdPlayback, AdPresenter};
use crate::notice::Notice;
use crate::session::SessionState;
use crate::view::{MessageTone, PageView};
use std::task::Poll;
use std::time::{Duration, Instant};

pub const AD_WATCHED_MESSAGE: &str = "You have seen an ad!";
pub const AD_FAILED_MESSAGE: &str = "Ad failed. Continuing to next step...";
pub const DEMO_AD_MESSAGE: &str = "Demo Ad - Testing Mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Started(AdMode),
    /// An attempt was already in flight; nothing happened.
    Ignored,
}

/// How the last attempt reached the unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResolution {
    Watched,
    Recovered(AdError),
    Skipped,
}

enum Phase {
    Idle,
    Playing {
        started: Instant,
        mode: AdMode,
        playback: Box<dyn AdPlayback>,
    },
    /// Failed; waiting for the countdown floor before unlocking.
    Settling { started: Instant, error: AdError },
}

impl std::fmt::Debug for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Playing { started, mode, .. } => f
                .debug_struct("Playing")
                .field("started", started)
                .field("mode", mode)
                .finish_non_exhaustive(),
            Phase::Settling { started, error } => f
                .debug_struct("Settling")
                .field("started", started)
                .field("error", error)
                .finish(),
        }
    }
}

#[derive(Debug)]
pub struct AdGate {
    phase: Phase,
    duration: Duration,
    timeout: Duration,
    sdk: Box<dyn AdPresenter>,
    fallback: Box<dyn AdPresenter>,
    notices: Vec<Notice>,
    last_resolution: Option<AttemptResolution>,
}

impl AdGate {
    /// `duration` is the visible countdown and the failure floor. `timeout`
    /// bounds a pending SDK call and is raised to `duration` if shorter.
    pub fn new(
        sdk: Box<dyn AdPresenter>,
        fallback: Box<dyn AdPresenter>,
        duration: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            phase: Phase::Idle,
            duration,
            timeout: timeout.max(duration),
            sdk,
            fallback,
            notices: Vec::new(),
            last_resolution: None,
        }
    }

    /// Start a watch-ad attempt unless one is already running.
    pub fn attempt(
        &mut self,
        now: Instant,
        session: &mut SessionState,
        view: &mut PageView,
    ) -> AttemptOutcome {
        if session.ad_in_progress {
            tracing::debug!("ad already playing; ignoring trigger");
            return AttemptOutcome::Ignored;
        }
        tracing::info!("starting ad process");
        session.ad_in_progress = true;
        view.set_cta_enabled(false);
        if let Some(overlay) = view.countdown_mut() {
            overlay.start(self.duration, now);
        }

        let presenter = if session.sdk_available {
            &mut self.sdk
        } else {
            tracing::warn!("SDK not available, using fallback");
            if let Some(overlay) = view.countdown_mut() {
                overlay.set_message(DEMO_AD_MESSAGE, MessageTone::Warning);
            }
            &mut self.fallback
        };
        let mode = presenter.mode();
        match presenter.attempt_play(now) {
            Ok(playback) => {
                self.phase = Phase::Playing {
                    started: now,
                    mode,
                    playback,
                };
            }
            Err(e) => self.fail(now, e),
        }
        AttemptOutcome::Started(mode)
    }

    /// Advance the running attempt. Returns notices produced since the
    /// previous call.
    pub fn poll(
        &mut self,
        now: Instant,
        session: &mut SessionState,
        view: &mut PageView,
    ) -> Vec<Notice> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::Playing {
                started,
                mode,
                mut playback,
            } => {
                if now.saturating_duration_since(started) >= self.timeout {
                    tracing::warn!(?mode, "ad did not resolve within {:?}", self.timeout);
                    self.fail(started, AdError::TimedOut);
                } else {
                    match playback.poll(now) {
                        Poll::Ready(Ok(())) => {
                            tracing::info!(?mode, "ad completed");
                            self.notices.push(Notice::info(AD_WATCHED_MESSAGE));
                            self.unlock(session, view, AttemptResolution::Watched);
                        }
                        Poll::Ready(Err(e)) => self.fail(started, e),
                        Poll::Pending => {
                            self.phase = Phase::Playing {
                                started,
                                mode,
                                playback,
                            };
                        }
                    }
                }
            }
            settling @ Phase::Settling { .. } => self.phase = settling,
        }

        if let Phase::Settling { started, error } = &self.phase {
            if now.saturating_duration_since(*started) >= self.duration {
                let error = error.clone();
                if let Some(overlay) = view.countdown_mut() {
                    overlay.hide();
                }
                self.unlock(session, view, AttemptResolution::Recovered(error));
            }
        }

        std::mem::take(&mut self.notices)
    }

    fn fail(&mut self, started: Instant, error: AdError) {
        tracing::error!("ad error: {error}");
        self.notices.push(Notice::warning(AD_FAILED_MESSAGE));
        self.phase = Phase::Settling { started, error };
    }

    /// Grant the reward and switch the page to the get step. Abandons any
    /// attempt still in flight.
    pub fn force_unlock(&mut self, session: &mut SessionState, view: &mut PageView) {
        self.unlock(session, view, AttemptResolution::Skipped);
    }

    fn unlock(
        &mut self,
        session: &mut SessionState,
        view: &mut PageView,
        resolution: AttemptResolution,
    ) {
        if session.grant_reward() {
            tracing::info!(?resolution, "ad process completed, activating get link button");
        }
        session.ad_in_progress = false;
        view.show_unlocked();
        self.phase = Phase::Idle;
        self.last_resolution = Some(resolution);
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn last_resolution(&self) -> Option<&AttemptResolution> {
        self.last_resolution.as_ref()
    }
}
