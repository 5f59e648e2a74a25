use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_ICON: &str = "fab fa-telegram-plane";
pub const DEFAULT_COLOR: &str = "#0088cc";
pub const DEFAULT_LINK: &str = "#";

/// A promotional channel shown in the list.
///
/// Every field except `id` may be missing in the source data; the renderer
/// substitutes defaults instead of rejecting the entry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ChannelEntry {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn icon(&self) -> &str {
        non_empty(self.icon.as_deref()).unwrap_or(DEFAULT_ICON)
    }

    /// Only `http`/`https` links are kept; anything else becomes
    /// [`DEFAULT_LINK`].
    pub fn link(&self) -> &str {
        non_empty(self.link.as_deref())
            .filter(|link| is_web_link(link))
            .unwrap_or(DEFAULT_LINK)
    }

    pub fn color(&self) -> &str {
        non_empty(self.color.as_deref()).unwrap_or(DEFAULT_COLOR)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn is_web_link(link: &str) -> bool {
    url::Url::parse(link.trim()).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

pub fn default_channels() -> Vec<ChannelEntry> {
    vec![
        ChannelEntry {
            id: 1,
            name: Some("GeneratCPro BOT News".into()),
            description: Some("Latest updates about the bot".into()),
            icon: Some("fas fa-robot".into()),
            link: Some("https://t.me/+-ALd_P5x4dw4MmNk".into()),
            color: Some("#0088cc".into()),
        },
        ChannelEntry {
            id: 2,
            name: Some("Canva Pro Team Link".into()),
            description: Some("Direct link for FREE Canva Pro access".into()),
            icon: Some("fas fa-users".into()),
            link: Some("https://t.me/directcanvapro".into()),
            color: Some("#34b7f1".into()),
        },
    ]
}

/// Remote feed document. Either a bare list of channels or an object that
/// may also override the destination link.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChannelFeed {
    List(#[serde(deserialize_with = "deserialize_channels")] Vec<ChannelEntry>),
    Document {
        #[serde(default, deserialize_with = "deserialize_channels")]
        channels: Vec<ChannelEntry>,
        #[serde(default, deserialize_with = "deserialize_text")]
        link: Option<String>,
    },
}

/// Deserialize a channel array entry by entry. Entries without a usable
/// `id` are skipped and fields of the wrong type are treated as missing, so
/// one bad entry never costs the rest of the list.
pub fn deserialize_channels<'de, D>(deserializer: D) -> Result<Vec<ChannelEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| entry_from_value(index, value))
        .collect())
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => {
            tracing::warn!("ignoring non-text value {other}");
            None
        }
    })
}

fn entry_from_value(index: usize, value: Value) -> Option<ChannelEntry> {
    let Value::Object(map) = value else {
        tracing::warn!(index, "skipping channel entry that is not an object");
        return None;
    };
    let id = match map.get("id") {
        Some(Value::Number(n)) => n.as_u64().and_then(|id| u32::try_from(id).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    let Some(id) = id else {
        tracing::warn!(index, "skipping channel entry without a valid id");
        return None;
    };
    Some(ChannelEntry {
        id,
        name: text_field(&map, id, "name"),
        description: text_field(&map, id, "description"),
        icon: text_field(&map, id, "icon"),
        link: text_field(&map, id, "link"),
        color: text_field(&map, id, "color"),
    })
}

fn text_field(map: &Map<String, Value>, id: u32, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        _ => {
            tracing::warn!(id, field = key, "channel field has the wrong type; using default");
            None
        }
    }
}

impl ChannelFeed {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn into_parts(self) -> (Vec<ChannelEntry>, Option<String>) {
        match self {
            ChannelFeed::List(channels) => (channels, None),
            ChannelFeed::Document { channels, link } => {
                (channels, link.filter(|l| !l.trim().is_empty()))
            }
        }
    }
}

/// Sort by `id` and drop later entries that reuse an id.
pub fn normalize(mut channels: Vec<ChannelEntry>) -> Vec<ChannelEntry> {
    channels.sort_by_key(|c| c.id);
    let mut seen = HashSet::new();
    channels.retain(|c| {
        if seen.insert(c.id) {
            true
        } else {
            tracing::warn!(id = c.id, "duplicate channel id; keeping the first entry");
            false
        }
    });
    channels
}

/// Fetch and parse the remote channel feed at `url`.
pub fn fetch_feed(url: &str) -> anyhow::Result<ChannelFeed> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let body = client.get(url).send()?.error_for_status()?.text()?;
    ChannelFeed::parse(&body)
}

/// Channels and destination link after consulting the remote feed.
#[derive(Debug, Clone)]
pub struct LoadedChannels {
    pub channels: Vec<ChannelEntry>,
    pub link_override: Option<String>,
}

/// Resolve the channel list. A configured feed that cannot be fetched or
/// parsed falls back to the inline channels.
pub fn load_channels(inline: &[ChannelEntry], feed_url: &str) -> LoadedChannels {
    if feed_url.trim().is_empty() {
        return LoadedChannels {
            channels: normalize(inline.to_vec()),
            link_override: None,
        };
    }
    match fetch_feed(feed_url) {
        Ok(feed) => {
            let (channels, link_override) = feed.into_parts();
            tracing::info!(count = channels.len(), "loaded channel feed from {feed_url}");
            LoadedChannels {
                channels: normalize(channels),
                link_override,
            }
        }
        Err(e) => {
            tracing::error!("failed to load channel feed {feed_url}: {e}");
            LoadedChannels {
                channels: normalize(inline.to_vec()),
                link_override: None,
            }
        }
    }
}
