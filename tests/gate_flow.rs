use channel_gate::ad::{AdError, AdMode, AdPlayback, AdPresenter, FallbackPresenter};
use channel_gate::channels::default_channels;
use channel_gate::gate::{
    AdGate, AttemptOutcome, AttemptResolution, AD_FAILED_MESSAGE, AD_WATCHED_MESSAGE,
    DEMO_AD_MESSAGE,
};
use channel_gate::notice::NoticeLevel;
use channel_gate::session::SessionState;
use channel_gate::settings::default_destination;
use channel_gate::view::{PageView, Region, GET_LABEL};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::Poll;
use std::time::{Duration, Instant};

const D: Duration = Duration::from_secs(5);
const TIMEOUT: Duration = Duration::from_secs(30);

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Resolves with `result` once `ready_after` has passed since the start.
struct ScriptedPresenter {
    ready_after: Option<Duration>,
    result: Result<(), AdError>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedPresenter {
    fn resolving(ready_after: Duration, result: Result<(), AdError>) -> Self {
        Self {
            ready_after: Some(ready_after),
            result,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn stalled() -> Self {
        Self {
            ready_after: None,
            result: Ok(()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

struct ScriptedPlayback {
    ready_at: Option<Instant>,
    result: Result<(), AdError>,
}

impl AdPlayback for ScriptedPlayback {
    fn poll(&mut self, now: Instant) -> Poll<Result<(), AdError>> {
        match self.ready_at {
            Some(at) if now >= at => Poll::Ready(self.result.clone()),
            _ => Poll::Pending,
        }
    }
}

impl AdPresenter for ScriptedPresenter {
    fn mode(&self) -> AdMode {
        AdMode::Sdk
    }

    fn attempt_play(&mut self, now: Instant) -> Result<Box<dyn AdPlayback>, AdError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedPlayback {
            ready_at: self.ready_after.map(|d| now + d),
            result: self.result.clone(),
        }))
    }
}

/// Fails synchronously, like a show function that throws when called.
struct FaultyPresenter;

impl AdPresenter for FaultyPresenter {
    fn mode(&self) -> AdMode {
        AdMode::Sdk
    }

    fn attempt_play(&mut self, _now: Instant) -> Result<Box<dyn AdPlayback>, AdError> {
        Err(AdError::Invocation("show_10310749 panicked".into()))
    }
}

fn gate_with(sdk: Box<dyn AdPresenter>) -> AdGate {
    AdGate::new(sdk, Box::new(FallbackPresenter::new(D)), D, TIMEOUT)
}

fn session(sdk_available: bool) -> SessionState {
    let mut session = SessionState::new(default_destination(), default_channels());
    session.sdk_available = sdk_available;
    session
}

#[test]
fn fallback_unlocks_exactly_at_duration() {
    let t0 = Instant::now();
    let mut gate = gate_with(Box::new(FaultyPresenter));
    let mut session = session(false);
    let mut view = PageView::bind(&Region::ALL);

    assert_eq!(
        gate.attempt(t0, &mut session, &mut view),
        AttemptOutcome::Started(AdMode::Fallback)
    );
    assert!(!view.cta_enabled());
    let overlay = view.countdown.as_ref().unwrap();
    assert!(overlay.visible);
    assert_eq!(overlay.message, DEMO_AD_MESSAGE);
    assert_eq!(overlay.remaining(), 5);

    assert!(gate.poll(t0 + ms(4999), &mut session, &mut view).is_empty());
    assert!(!session.reward_granted());
    assert!(session.ad_in_progress);

    let notices = gate.poll(t0 + D, &mut session, &mut view);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].text, AD_WATCHED_MESSAGE);
    assert!(session.reward_granted());
    assert!(!session.ad_in_progress);
    assert_eq!(gate.last_resolution(), Some(&AttemptResolution::Watched));

    let cta = view.cta.as_ref().unwrap();
    assert_eq!(cta.label, GET_LABEL);
    assert!(cta.enabled);
    assert!(view.step_watch.as_ref().unwrap().completed);
    assert!(view.step_get.as_ref().unwrap().active);
}

#[test]
fn second_trigger_while_playing_is_ignored() {
    let t0 = Instant::now();
    let presenter = ScriptedPresenter::resolving(ms(3000), Ok(()));
    let calls = presenter.calls.clone();
    let mut gate = gate_with(Box::new(presenter));
    let mut session = session(true);
    let mut view = PageView::bind(&Region::ALL);

    assert_eq!(
        gate.attempt(t0, &mut session, &mut view),
        AttemptOutcome::Started(AdMode::Sdk)
    );
    let first = view.countdown.as_ref().unwrap().countdown.clone().unwrap();
    assert_eq!(
        gate.attempt(t0 + ms(100), &mut session, &mut view),
        AttemptOutcome::Ignored
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let current = view.countdown.as_ref().unwrap().countdown.clone().unwrap();
    assert_eq!(current, first);
    assert_eq!(current.remaining(), 5);
    assert_eq!(current.next_deadline(), Some(t0 + ms(1000)));
}

#[test]
fn sdk_success_unlocks_as_soon_as_it_resolves() {
    let t0 = Instant::now();
    let mut gate = gate_with(Box::new(ScriptedPresenter::resolving(ms(2000), Ok(()))));
    let mut session = session(true);
    let mut view = PageView::bind(&Region::ALL);

    gate.attempt(t0, &mut session, &mut view);
    assert!(gate.poll(t0 + ms(1999), &mut session, &mut view).is_empty());
    assert!(!session.reward_granted());

    let notices = gate.poll(t0 + ms(2000), &mut session, &mut view);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert!(session.reward_granted());
    assert!(!gate.is_busy());
}

#[test]
fn sdk_failure_waits_for_the_full_countdown() {
    let t0 = Instant::now();
    let mut gate = gate_with(Box::new(ScriptedPresenter::resolving(
        ms(1000),
        Err(AdError::Rejected(1)),
    )));
    let mut session = session(true);
    let mut view = PageView::bind(&Region::ALL);

    gate.attempt(t0, &mut session, &mut view);
    let notices = gate.poll(t0 + ms(1000), &mut session, &mut view);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(notices[0].text, AD_FAILED_MESSAGE);
    assert!(!session.reward_granted());

    gate.poll(t0 + ms(4999), &mut session, &mut view);
    assert!(!session.reward_granted());

    assert!(gate.poll(t0 + D, &mut session, &mut view).is_empty());
    assert!(session.reward_granted());
    assert!(!view.countdown_visible());
    assert_eq!(
        gate.last_resolution(),
        Some(&AttemptResolution::Recovered(AdError::Rejected(1)))
    );
}

#[test]
fn synchronous_fault_recovers_after_countdown() {
    let t0 = Instant::now();
    let mut gate = gate_with(Box::new(FaultyPresenter));
    let mut session = session(true);
    let mut view = PageView::bind(&Region::ALL);

    assert_eq!(
        gate.attempt(t0, &mut session, &mut view),
        AttemptOutcome::Started(AdMode::Sdk)
    );
    let notices = gate.poll(t0, &mut session, &mut view);
    assert_eq!(notices[0].text, AD_FAILED_MESSAGE);
    assert!(session.ad_in_progress);

    gate.poll(t0 + D, &mut session, &mut view);
    assert!(session.reward_granted());
    assert!(matches!(
        gate.last_resolution(),
        Some(AttemptResolution::Recovered(AdError::Invocation(_)))
    ));
}

#[test]
fn stalled_sdk_times_out_into_the_failure_path() {
    let t0 = Instant::now();
    let mut gate = gate_with(Box::new(ScriptedPresenter::stalled()));
    let mut session = session(true);
    let mut view = PageView::bind(&Region::ALL);

    gate.attempt(t0, &mut session, &mut view);
    gate.poll(t0 + ms(29_999), &mut session, &mut view);
    assert!(!session.reward_granted());
    assert!(gate.is_busy());

    let notices = gate.poll(t0 + TIMEOUT, &mut session, &mut view);
    assert_eq!(notices[0].text, AD_FAILED_MESSAGE);
    assert!(session.reward_granted());
    assert_eq!(
        gate.last_resolution(),
        Some(&AttemptResolution::Recovered(AdError::TimedOut))
    );
}

#[test]
fn reward_never_reverts() {
    let t0 = Instant::now();
    let mut gate = gate_with(Box::new(FaultyPresenter));
    let mut session = session(false);
    let mut view = PageView::bind(&Region::ALL);

    gate.attempt(t0, &mut session, &mut view);
    gate.poll(t0 + D, &mut session, &mut view);
    assert!(session.reward_granted());
    assert!(!session.grant_reward());

    session.sdk_available = true;
    let t1 = t0 + ms(10_000);
    gate.attempt(t1, &mut session, &mut view);
    gate.poll(t1, &mut session, &mut view);
    assert!(session.reward_granted());
    gate.poll(t1 + D, &mut session, &mut view);
    assert!(session.reward_granted());
}

#[test]
fn force_unlock_skips_the_ad() {
    let t0 = Instant::now();
    let mut gate = gate_with(Box::new(ScriptedPresenter::stalled()));
    let mut session = session(true);
    let mut view = PageView::bind(&Region::ALL);

    gate.attempt(t0, &mut session, &mut view);
    gate.force_unlock(&mut session, &mut view);
    assert!(session.reward_granted());
    assert!(!session.ad_in_progress);
    assert!(!gate.is_busy());
    assert_eq!(gate.last_resolution(), Some(&AttemptResolution::Skipped));
}

#[test]
fn missing_regions_do_not_block_the_unlock() {
    let t0 = Instant::now();
    let mut gate = gate_with(Box::new(FaultyPresenter));
    let mut session = session(false);
    let mut view = PageView::bind(&[]);

    assert!(std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        gate.attempt(t0, &mut session, &mut view);
        gate.poll(t0 + D, &mut session, &mut view);
    }))
    .is_ok());
    assert!(session.reward_granted());
}
