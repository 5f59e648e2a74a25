use crate::channels::{is_web_link, DEFAULT_LINK};
use crate::dispatch::LinkOpener;
use url::Url;

/// Opens links in the system's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&mut self, link: &Url) -> anyhow::Result<()> {
        open::that(link.as_str())?;
        Ok(())
    }
}

/// Open a channel card link. The `#` placeholder used for cards without a
/// link is ignored. Only `http` and `https` links are opened.
pub fn open_channel_link(link: &str) -> anyhow::Result<()> {
    if link.trim().is_empty() || link == DEFAULT_LINK {
        return Ok(());
    }
    if !is_web_link(link) {
        anyhow::bail!("refusing to open non-web link '{link}'");
    }
    let url = Url::parse(link.trim())?;
    open::that(url.as_str())?;
    Ok(())
}
