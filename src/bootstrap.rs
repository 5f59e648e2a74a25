//! Startup wiring.
//!
//! Builds the session from configuration, binds the display regions that
//! exist, signals the embedding host, starts SDK detection and performs the
//! first render of the channel list.

use crate::ad::detect::{SdkDetector, SdkProbe};
use crate::ad::{AdPresenter, FallbackPresenter};
use crate::channels::{is_web_link, LoadedChannels};
use crate::controller::Controller;
use crate::gate::AdGate;
use crate::host::{self, HostBridge};
use crate::notice::Notice;
use crate::render::render;
use crate::session::SessionState;
use crate::settings::Settings;
use crate::view::PageView;
use std::time::Instant;

pub struct Bootstrap<'a> {
    pub settings: &'a Settings,
    pub channels: LoadedChannels,
}

impl Bootstrap<'_> {
    /// Run the startup sequence and hand back the controller together with
    /// any notices the checks produced.
    pub fn run(
        self,
        host: &mut dyn HostBridge,
        probe: &dyn SdkProbe,
        sdk: Box<dyn AdPresenter>,
        now: Instant,
    ) -> (Controller, Vec<Notice>) {
        tracing::info!("channel gate initialising");
        let settings = self.settings;
        let destination = match self.channels.link_override.as_deref() {
            Some(link) => match url::Url::parse(link) {
                Ok(url) if is_web_link(url.as_str()) => url,
                Ok(url) => {
                    tracing::warn!("feed link '{url}' is not a web link; using configured link");
                    settings.destination()
                }
                Err(e) => {
                    tracing::warn!("feed link '{link}' is invalid ({e}); using configured link");
                    settings.destination()
                }
            },
            None => settings.destination(),
        };

        let mut session = SessionState::new(destination, self.channels.channels);
        let mut view = PageView::bind(&settings.regions);
        tracing::debug!(regions = ?settings.regions, "display regions bound");

        session.embedded = host::announce(host);

        let gate = AdGate::new(
            sdk,
            Box::new(FallbackPresenter::new(settings.ad_duration())),
            settings.ad_duration(),
            settings.ad_timeout(),
        );
        let detector = SdkDetector::new(settings.sdk_recheck_delay());

        if let Some(list) = view.channel_list.as_mut() {
            render(session.channels(), list);
            if let Some(loading) = view.loading.as_mut() {
                loading.visible = false;
            }
        }

        let mut controller = Controller::new(session, view, gate, detector);
        let notices = controller.start_detection(now, probe);
        tracing::info!("app initialised");
        (controller, notices)
    }
}
