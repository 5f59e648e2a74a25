use crate::channels::ChannelEntry;
use url::Url;

/// In-memory state for one run of the widget.
///
/// Owned by the [`Controller`](crate::controller::Controller) and handed by
/// reference to the components that mutate it.
#[derive(Debug, Clone)]
pub struct SessionState {
    reward_granted: bool,
    pub ad_in_progress: bool,
    destination_link: Url,
    channels: Vec<ChannelEntry>,
    pub sdk_available: bool,
    pub sdk_error: Option<String>,
    pub embedded: bool,
}

impl SessionState {
    pub fn new(destination_link: Url, channels: Vec<ChannelEntry>) -> Self {
        Self {
            reward_granted: false,
            ad_in_progress: false,
            destination_link,
            channels,
            sdk_available: false,
            sdk_error: None,
            embedded: false,
        }
    }

    pub fn reward_granted(&self) -> bool {
        self.reward_granted
    }

    /// Grant the reward. Returns true only for the call that performed the
    /// transition; the flag never reverts.
    pub fn grant_reward(&mut self) -> bool {
        let first = !self.reward_granted;
        self.reward_granted = true;
        first
    }

    pub fn destination_link(&self) -> &Url {
        &self.destination_link
    }

    pub fn channels(&self) -> &[ChannelEntry] {
        &self.channels
    }
}
