use crate::notice::Notice;
use crate::session::SessionState;
use crate::view::PageView;
use std::time::{Duration, Instant};
use url::Url;

/// Delay before opening the link, so the confirmation is visible.
pub const OPEN_DELAY: Duration = Duration::from_millis(500);
/// Delay after opening before the control is usable again.
pub const REENABLE_DELAY: Duration = Duration::from_millis(1000);

/// Opens the destination link outside the widget.
pub trait LinkOpener {
    fn open(&mut self, link: &Url) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Confirming { open_at: Instant },
    Cooling { enable_at: Instant },
}

/// Sends the user to the destination link once the reward is granted.
#[derive(Debug, Clone)]
pub struct LinkDispatch {
    phase: Phase,
}

impl Default for LinkDispatch {
    fn default() -> Self {
        Self { phase: Phase::Idle }
    }
}

impl LinkDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a dispatch. Does nothing and returns false before the reward
    /// is granted or while a previous dispatch is still running.
    pub fn dispatch(&mut self, now: Instant, session: &SessionState, view: &mut PageView) -> bool {
        if !session.reward_granted() {
            tracing::debug!("get link requested before the reward was granted");
            return false;
        }
        if self.phase != Phase::Idle {
            return false;
        }
        tracing::info!("redirecting to: {}", session.destination_link());
        if let Some(cta) = view.cta.as_mut() {
            cta.enabled = false;
            cta.confirming = true;
        }
        self.phase = Phase::Confirming {
            open_at: now + OPEN_DELAY,
        };
        true
    }

    pub fn poll(
        &mut self,
        now: Instant,
        session: &SessionState,
        view: &mut PageView,
        opener: &mut dyn LinkOpener,
    ) -> Vec<Notice> {
        let mut notices = Vec::new();
        if let Phase::Confirming { open_at } = self.phase {
            if now >= open_at {
                if let Err(e) = opener.open(session.destination_link()) {
                    tracing::error!("failed to open {}: {e}", session.destination_link());
                    notices.push(Notice::warning(format!("Could not open link: {e}")));
                }
                self.phase = Phase::Cooling {
                    enable_at: open_at + REENABLE_DELAY,
                };
            }
        }
        if let Phase::Cooling { enable_at } = self.phase {
            if now >= enable_at {
                if let Some(cta) = view.cta.as_mut() {
                    cta.enabled = true;
                    cta.confirming = false;
                }
                self.phase = Phase::Idle;
            }
        }
        notices
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }
}
