use crate::channels::{default_channels, deserialize_channels, is_web_link, ChannelEntry};
use crate::view::Region;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_DESTINATION_LINK: &str =
    "https://www.canva.com/brand/join?token=7kZK8fOHGeTW6wTOrVT2Sg&brandingVariant=edu&referrer=team-invite";

/// Where the ad provider SDK comes from and where the loaded copy lives.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SdkSettings {
    /// Remote location of the SDK. Only a URL on `provider_domain` counts as
    /// a provider reference.
    #[serde(default = "default_sdk_url")]
    pub url: String,
    /// Local path of the SDK shared library.
    #[serde(default = "default_sdk_library")]
    pub library: String,
    #[serde(default = "default_provider_domain")]
    pub provider_domain: String,
}

impl Default for SdkSettings {
    fn default() -> Self {
        Self {
            url: default_sdk_url(),
            library: default_sdk_library(),
            provider_domain: default_provider_domain(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Ad zone identifier. The provider exports `show_<zone>`.
    #[serde(default = "default_zone_id")]
    pub ad_zone_id: String,
    /// Length of the visible countdown and of the fallback ad.
    #[serde(default = "default_ad_duration_ms")]
    pub ad_duration_ms: u64,
    /// Upper bound for a pending SDK call before it is treated as failed.
    #[serde(default = "default_ad_timeout_ms")]
    pub ad_timeout_ms: u64,
    /// Delay before the single SDK re-check at startup.
    #[serde(default = "default_sdk_recheck_ms")]
    pub sdk_recheck_ms: u64,
    #[serde(default)]
    pub sdk: SdkSettings,
    #[serde(default = "default_destination_link")]
    pub destination_link: String,
    #[serde(default = "default_channels", deserialize_with = "deserialize_channels")]
    pub channels: Vec<ChannelEntry>,
    /// Remote JSON feed of channels. Empty uses `channels`.
    #[serde(default)]
    pub channels_url: String,
    /// Display regions to bind. Regions not listed are treated as missing.
    #[serde(default = "default_regions")]
    pub regions: Vec<Region>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional log file written next to the console output.
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// Show the debug window (F12).
    #[serde(default)]
    pub debug_console: bool,
    #[serde(default = "default_window_size")]
    pub window_size: (i32, i32),
}

fn default_zone_id() -> String {
    "10310749".into()
}

fn default_ad_duration_ms() -> u64 {
    5000
}

fn default_ad_timeout_ms() -> u64 {
    30_000
}

fn default_sdk_recheck_ms() -> u64 {
    2000
}

fn default_sdk_url() -> String {
    "https://libtl.com/sdk".into()
}

fn default_sdk_library() -> String {
    std::path::Path::new("sdk")
        .join(libloading::library_filename("libtl_sdk"))
        .to_string_lossy()
        .to_string()
}

fn default_provider_domain() -> String {
    "libtl.com".into()
}

fn default_destination_link() -> String {
    DEFAULT_DESTINATION_LINK.into()
}

fn default_regions() -> Vec<Region> {
    Region::ALL.to_vec()
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

fn default_window_size() -> (i32, i32) {
    (420, 640)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ad_zone_id: default_zone_id(),
            ad_duration_ms: default_ad_duration_ms(),
            ad_timeout_ms: default_ad_timeout_ms(),
            sdk_recheck_ms: default_sdk_recheck_ms(),
            sdk: SdkSettings::default(),
            destination_link: default_destination_link(),
            channels: default_channels(),
            channels_url: String::new(),
            regions: default_regions(),
            debug_logging: false,
            log_file: None,
            enable_toasts: true,
            toast_duration: default_toast_duration(),
            debug_console: false,
            window_size: default_window_size(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Name of the provider's global show function for the configured zone.
    pub fn sdk_symbol(&self) -> String {
        format!("show_{}", self.ad_zone_id)
    }

    pub fn ad_duration(&self) -> std::time::Duration {
        clamped_delay(self.ad_duration_ms)
    }

    /// Timeout for a pending SDK call. Never shorter than the countdown.
    pub fn ad_timeout(&self) -> std::time::Duration {
        clamped_delay(self.ad_timeout_ms.max(self.ad_duration_ms))
    }

    pub fn sdk_recheck_delay(&self) -> std::time::Duration {
        clamped_delay(self.sdk_recheck_ms)
    }

    /// Parse the configured destination link, falling back to the built-in
    /// default when it is not a valid absolute URL.
    pub fn destination(&self) -> url::Url {
        match url::Url::parse(&self.destination_link) {
            Ok(link) if is_web_link(link.as_str()) => link,
            Ok(link) => {
                tracing::warn!("destination link '{link}' is not a web link; using default");
                default_destination()
            }
            Err(e) => {
                tracing::warn!(
                    "destination link '{}' is invalid ({e}); using default",
                    self.destination_link
                );
                default_destination()
            }
        }
    }
}

/// Longest delay any timer accepts from the settings file.
pub const MAX_DELAY_MS: u64 = 24 * 60 * 60 * 1000;

fn clamped_delay(ms: u64) -> std::time::Duration {
    if ms > MAX_DELAY_MS {
        tracing::warn!("delay of {ms} ms exceeds the {MAX_DELAY_MS} ms limit; clamping");
    }
    std::time::Duration::from_millis(ms.min(MAX_DELAY_MS))
}

pub fn default_destination() -> url::Url {
    url::Url::parse(DEFAULT_DESTINATION_LINK).expect("built-in destination link is a valid URL")
}
