//! Display-surface model.
//!
//! The page is a set of named regions. A region that was not bound at
//! startup is `None`, and every operation that would touch it is skipped.

use crate::countdown::Countdown;
use crate::render::{CardSurface, CardView};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const WATCH_LABEL: &str = "Watch Ad";
pub const WATCH_ICON: &str = "fas fa-play-circle";
pub const GET_LABEL: &str = "🔥 Get Now";
pub const GET_ICON: &str = "fas fa-fire";
pub const DEFAULT_TIMER_MESSAGE: &str = "Please wait while the ad plays...";
pub const NO_CHANNELS_MESSAGE: &str = "No channels available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Cta,
    StepWatch,
    StepGet,
    Countdown,
    ChannelList,
    Loading,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Cta,
        Region::StepWatch,
        Region::StepGet,
        Region::Countdown,
        Region::ChannelList,
        Region::Loading,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtaStyle {
    Watch,
    Get,
}

/// Primary call-to-action control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtaButton {
    pub label: String,
    pub icon: String,
    pub style: CtaStyle,
    pub enabled: bool,
    /// Transient confirmation shown while the link is being opened.
    pub confirming: bool,
}

impl Default for CtaButton {
    fn default() -> Self {
        Self {
            label: WATCH_LABEL.into(),
            icon: WATCH_ICON.into(),
            style: CtaStyle::Watch,
            enabled: true,
            confirming: false,
        }
    }
}

impl CtaButton {
    pub fn switch_to_get(&mut self) {
        self.label = GET_LABEL.into();
        self.icon = GET_ICON.into();
        self.style = CtaStyle::Get;
        self.enabled = true;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepIndicator {
    pub active: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTone {
    Normal,
    Warning,
}

/// Countdown overlay with numeric readout and progress ring.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownOverlay {
    pub visible: bool,
    pub countdown: Option<Countdown>,
    pub message: String,
    pub tone: MessageTone,
}

impl Default for CountdownOverlay {
    fn default() -> Self {
        Self {
            visible: false,
            countdown: None,
            message: DEFAULT_TIMER_MESSAGE.into(),
            tone: MessageTone::Normal,
        }
    }
}

impl CountdownOverlay {
    /// Show the overlay with a fresh countdown, replacing any running one.
    pub fn start(&mut self, duration: Duration, now: Instant) {
        self.visible = true;
        self.countdown = Some(Countdown::start(duration, now));
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(countdown) = self.countdown.as_mut() else {
            return false;
        };
        let changed = countdown.tick(now);
        if !countdown.is_armed() {
            self.visible = false;
        }
        changed
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn set_message(&mut self, message: &str, tone: MessageTone) {
        self.message = message.into();
        self.tone = tone;
    }

    pub fn remaining(&self) -> u32 {
        self.countdown.as_ref().map(Countdown::remaining).unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        self.countdown.as_ref().is_some_and(Countdown::is_armed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Card(CardView),
    Placeholder(String),
}

/// Container the channel cards are rendered into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelListRegion {
    pub items: Vec<ListItem>,
}

impl CardSurface for ChannelListRegion {
    fn clear(&mut self) {
        self.items.clear();
    }

    fn card(&mut self, card: CardView) {
        self.items.push(ListItem::Card(card));
    }

    fn placeholder(&mut self, message: &str) {
        self.items.push(ListItem::Placeholder(message.into()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingPlaceholder {
    pub visible: bool,
}

impl Default for LoadingPlaceholder {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Everything the page shows, one optional field per region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    pub cta: Option<CtaButton>,
    pub step_watch: Option<StepIndicator>,
    pub step_get: Option<StepIndicator>,
    pub countdown: Option<CountdownOverlay>,
    pub channel_list: Option<ChannelListRegion>,
    pub loading: Option<LoadingPlaceholder>,
}

impl PageView {
    /// Bind the listed regions. Unlisted regions stay unbound.
    pub fn bind(regions: &[Region]) -> Self {
        let has = |r: Region| regions.contains(&r);
        let mut view = Self::default();
        if has(Region::Cta) {
            view.cta = Some(CtaButton::default());
        }
        if has(Region::StepWatch) {
            view.step_watch = Some(StepIndicator {
                active: true,
                completed: false,
            });
        }
        if has(Region::StepGet) {
            view.step_get = Some(StepIndicator::default());
        }
        if has(Region::Countdown) {
            view.countdown = Some(CountdownOverlay::default());
        }
        if has(Region::ChannelList) {
            view.channel_list = Some(ChannelListRegion::default());
        }
        if has(Region::Loading) {
            view.loading = Some(LoadingPlaceholder::default());
        }
        view
    }

    pub fn set_cta_enabled(&mut self, enabled: bool) {
        if let Some(cta) = self.cta.as_mut() {
            cta.enabled = enabled;
        }
    }

    pub fn cta_enabled(&self) -> bool {
        self.cta.as_ref().is_some_and(|c| c.enabled)
    }

    pub fn countdown_mut(&mut self) -> Option<&mut CountdownOverlay> {
        self.countdown.as_mut()
    }

    pub fn countdown_visible(&self) -> bool {
        self.countdown.as_ref().is_some_and(|c| c.visible)
    }

    /// Steps and button after the reward has been granted.
    pub fn show_unlocked(&mut self) {
        if let Some(step) = self.step_watch.as_mut() {
            step.completed = true;
        }
        if let Some(step) = self.step_get.as_mut() {
            step.active = true;
        }
        if let Some(cta) = self.cta.as_mut() {
            cta.switch_to_get();
        }
    }
}
