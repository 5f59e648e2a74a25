use channel_gate::ad::detect::{
    SdkDetector, SdkProbe, SDK_FUNCTION_MISSING, SDK_NOT_REFERENCED, SDK_UNAVAILABLE_MESSAGE,
};
use channel_gate::channels::default_channels;
use channel_gate::notice::NoticeLevel;
use channel_gate::session::SessionState;
use channel_gate::settings::default_destination;
use channel_gate::view::{MessageTone, PageView, Region};
use std::cell::Cell;
use std::time::{Duration, Instant};

struct FakeProbe {
    referenced: bool,
    present: Cell<bool>,
    checks: Cell<u32>,
}

impl FakeProbe {
    fn new(referenced: bool, present: bool) -> Self {
        Self {
            referenced,
            present: Cell::new(present),
            checks: Cell::new(0),
        }
    }
}

impl SdkProbe for FakeProbe {
    fn script_referenced(&self) -> bool {
        self.referenced
    }

    fn callable_present(&self) -> bool {
        self.checks.set(self.checks.get() + 1);
        self.present.get()
    }

    fn callable_name(&self) -> &str {
        "show_10310749"
    }
}

const RECHECK: Duration = Duration::from_millis(2000);

fn setup() -> (SessionState, PageView, SdkDetector) {
    (
        SessionState::new(default_destination(), default_channels()),
        PageView::bind(&Region::ALL),
        SdkDetector::new(RECHECK),
    )
}

#[test]
fn missing_reference_records_error_without_recheck() {
    let t0 = Instant::now();
    let (mut session, mut view, mut detector) = setup();
    let probe = FakeProbe::new(false, true);

    assert!(detector.start(t0, &probe, &mut session).is_empty());
    assert_eq!(session.sdk_error.as_deref(), Some(SDK_NOT_REFERENCED));
    assert!(!session.sdk_available);
    assert!(!detector.is_pending());

    assert!(detector
        .poll(t0 + RECHECK * 3, &probe, &mut session, &mut view)
        .is_empty());
    assert_eq!(probe.checks.get(), 0);
}

#[test]
fn present_callable_is_available_immediately() {
    let t0 = Instant::now();
    let (mut session, _view, mut detector) = setup();
    let probe = FakeProbe::new(true, true);

    detector.start(t0, &probe, &mut session);
    assert!(session.sdk_available);
    assert!(session.sdk_error.is_none());
    assert!(!detector.is_pending());
}

#[test]
fn late_sdk_is_picked_up_by_the_recheck() {
    let t0 = Instant::now();
    let (mut session, mut view, mut detector) = setup();
    let probe = FakeProbe::new(true, false);

    detector.start(t0, &probe, &mut session);
    assert!(!session.sdk_available);
    assert_eq!(detector.next_deadline(), Some(t0 + RECHECK));

    detector.poll(t0 + Duration::from_millis(1999), &probe, &mut session, &mut view);
    assert!(detector.is_pending());
    assert_eq!(probe.checks.get(), 1);

    probe.present.set(true);
    assert!(detector
        .poll(t0 + RECHECK, &probe, &mut session, &mut view)
        .is_empty());
    assert!(session.sdk_available);
    assert!(!detector.is_pending());
}

#[test]
fn absent_sdk_is_rechecked_exactly_once() {
    let t0 = Instant::now();
    let (mut session, mut view, mut detector) = setup();
    let probe = FakeProbe::new(true, false);

    detector.start(t0, &probe, &mut session);
    let notices = detector.poll(t0 + RECHECK, &probe, &mut session, &mut view);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(notices[0].text, SDK_UNAVAILABLE_MESSAGE);
    assert_eq!(session.sdk_error.as_deref(), Some(SDK_FUNCTION_MISSING));
    assert!(!session.sdk_available);

    let overlay = view.countdown.as_ref().unwrap();
    assert_eq!(overlay.message, SDK_UNAVAILABLE_MESSAGE);
    assert_eq!(overlay.tone, MessageTone::Warning);

    assert!(detector
        .poll(t0 + RECHECK * 5, &probe, &mut session, &mut view)
        .is_empty());
    assert_eq!(probe.checks.get(), 2);
}

#[test]
fn manual_recheck_can_be_scheduled_again() {
    let t0 = Instant::now();
    let (mut session, mut view, mut detector) = setup();
    let probe = FakeProbe::new(true, false);

    detector.start(t0, &probe, &mut session);
    detector.poll(t0 + RECHECK, &probe, &mut session, &mut view);
    assert!(!detector.is_pending());

    let t1 = t0 + Duration::from_secs(10);
    detector.schedule_recheck(t1);
    probe.present.set(true);
    detector.poll(t1 + RECHECK, &probe, &mut session, &mut view);
    assert!(session.sdk_available);
    assert!(session.sdk_error.is_none());
}
