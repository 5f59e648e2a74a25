//! Ad presentation strategies.
//!
//! An [`AdPresenter`] starts an ad and hands back an [`AdPlayback`] that the
//! gate polls until it resolves. Playbacks are not cancellable: once started
//! the gate either sees their result or gives up on them after a timeout.

pub mod detect;
pub mod sdk;

use std::task::Poll;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdError {
    #[error("ad SDK is not loaded")]
    Unavailable,
    #[error("failed to invoke ad SDK: {0}")]
    Invocation(String),
    #[error("ad SDK reported failure code {0}")]
    Rejected(i32),
    #[error("ad SDK worker exited without a result")]
    WorkerLost,
    #[error("ad SDK did not respond in time")]
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdMode {
    Sdk,
    Fallback,
}

/// A started ad whose outcome is not known yet.
pub trait AdPlayback: Send {
    fn poll(&mut self, now: Instant) -> Poll<Result<(), AdError>>;
}

/// Something that can present an ad.
pub trait AdPresenter: Send {
    fn mode(&self) -> AdMode;

    /// Start an ad. An `Err` is a synchronous invocation fault.
    fn attempt_play(&mut self, now: Instant) -> Result<Box<dyn AdPlayback>, AdError>;
}

impl std::fmt::Debug for dyn AdPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdPresenter({:?})", self.mode())
    }
}

/// Simulated ad used when the provider SDK is not available. Always
/// succeeds once its duration has elapsed.
#[derive(Debug, Clone)]
pub struct FallbackPresenter {
    duration: Duration,
}

impl FallbackPresenter {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl AdPresenter for FallbackPresenter {
    fn mode(&self) -> AdMode {
        AdMode::Fallback
    }

    fn attempt_play(&mut self, now: Instant) -> Result<Box<dyn AdPlayback>, AdError> {
        tracing::info!("showing demo ad for {:?}", self.duration);
        Ok(Box::new(FallbackPlayback {
            done_at: now + self.duration,
        }))
    }
}

struct FallbackPlayback {
    done_at: Instant,
}

impl AdPlayback for FallbackPlayback {
    fn poll(&mut self, now: Instant) -> Poll<Result<(), AdError>> {
        if now >= self.done_at {
            Poll::Ready(Ok(()))
        } else {
            Poll::Pending
        }
    }
}
