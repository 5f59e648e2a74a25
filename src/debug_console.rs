//! Manual diagnostics for developers.
//!
//! Not part of the widget's behaviour; the GUI only exposes these when
//! `debug_console` is enabled.

use crate::ad::detect::SdkProbe;
use crate::ad::sdk::SdkLoader;
use crate::controller::Controller;
use crate::gate::AttemptOutcome;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkStatusReport {
    pub callable: String,
    pub script_referenced: bool,
    pub callable_present: bool,
    pub sdk_available: bool,
    pub sdk_error: Option<String>,
}

impl std::fmt::Display for SdkStatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SDK status:")?;
        writeln!(f, "- reference configured: {}", self.script_referenced)?;
        writeln!(f, "- {} exists: {}", self.callable, self.callable_present)?;
        writeln!(f, "- SDK loaded: {}", self.sdk_available)?;
        write!(
            f,
            "- SDK error: {}",
            self.sdk_error.as_deref().unwrap_or("none")
        )
    }
}

/// Start the ad flow as if the button had been pressed.
pub fn test_ad(controller: &mut Controller, now: Instant) -> AttemptOutcome {
    tracing::info!("debug: testing ad");
    controller.watch_ad(now)
}

/// Skip straight to the get step.
pub fn skip_to_get(controller: &mut Controller) {
    tracing::info!("debug: skipping to get now");
    controller.force_unlock();
}

pub fn check_sdk(controller: &Controller, probe: &dyn SdkProbe) -> SdkStatusReport {
    let report = SdkStatusReport {
        callable: probe.callable_name().to_string(),
        script_referenced: probe.script_referenced(),
        callable_present: probe.callable_present(),
        sdk_available: controller.session().sdk_available,
        sdk_error: controller.session().sdk_error.clone(),
    };
    tracing::info!("{report}");
    report
}

/// Fetch the SDK again from `url`, reload it, and re-check availability
/// after the usual delay.
pub fn reload_sdk(controller: &mut Controller, loader: &SdkLoader, url: &str, now: Instant) {
    tracing::info!("debug: attempting to reload SDK from {url}");
    loader.spawn_reload(url.to_string());
    controller.schedule_sdk_recheck(now);
}
