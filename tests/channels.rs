use channel_gate::channels::{
    load_channels, normalize, ChannelEntry, ChannelFeed, DEFAULT_COLOR, DEFAULT_LINK,
};

fn entry(id: u32, name: &str) -> ChannelEntry {
    ChannelEntry {
        id,
        name: Some(name.into()),
        description: None,
        icon: None,
        link: None,
        color: None,
    }
}

#[test]
fn feed_parses_bare_list() {
    let feed = ChannelFeed::parse(r#"[{ "id": 1, "name": "One" }, { "id": 2 }]"#).unwrap();
    let (channels, link) = feed.into_parts();
    assert_eq!(channels.len(), 2);
    assert_eq!(channels[0].name(), "One");
    assert_eq!(channels[1].name(), "");
    assert!(link.is_none());
}

#[test]
fn feed_parses_document_with_link() {
    let feed = ChannelFeed::parse(
        r##"{ "link": "https://example.com/x", "channels": [{ "id": 5, "color": "#ff0000" }] }"##,
    )
    .unwrap();
    let (channels, link) = feed.into_parts();
    assert_eq!(channels[0].color(), "#ff0000");
    assert_eq!(link.as_deref(), Some("https://example.com/x"));
}

#[test]
fn blank_feed_link_is_ignored() {
    let feed = ChannelFeed::parse(r#"{ "link": "  ", "channels": [] }"#).unwrap();
    assert!(feed.into_parts().1.is_none());
}

#[test]
fn malformed_document_is_an_error() {
    assert!(ChannelFeed::parse("{ oops").is_err());
}

#[test]
fn bad_entries_do_not_discard_the_list() {
    let feed = ChannelFeed::parse(
        r#"[{ "id": 1, "name": "Good" }, { "id": 2, "color": 123 }, { "name": "no id" }, "junk"]"#,
    )
    .unwrap();
    let (channels, _) = feed.into_parts();
    assert_eq!(channels.len(), 2);
    assert_eq!(channels[0].name(), "Good");
    assert_eq!(channels[1].id, 2);
    assert_eq!(channels[1].color(), DEFAULT_COLOR);
}

#[test]
fn document_keeps_link_when_an_entry_is_bad() {
    let feed = ChannelFeed::parse(
        r#"{ "link": "https://example.com/x", "channels": [{ "id": "4", "name": 9 }, { "id": -1 }] }"#,
    )
    .unwrap();
    let (channels, link) = feed.into_parts();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].id, 4);
    assert_eq!(channels[0].name(), "");
    assert_eq!(link.as_deref(), Some("https://example.com/x"));
}

#[test]
fn non_web_links_fall_back_to_placeholder() {
    let mut channel = entry(1, "a");
    for link in ["javascript:alert(1)", "file:///etc/passwd", "tg://resolve?domain=x"] {
        channel.link = Some(link.into());
        assert_eq!(channel.link(), DEFAULT_LINK);
    }
    channel.link = Some("https://t.me/directcanvapro".into());
    assert_eq!(channel.link(), "https://t.me/directcanvapro");
}

#[test]
fn normalize_sorts_and_drops_duplicate_ids() {
    let channels = normalize(vec![entry(3, "c"), entry(1, "a"), entry(3, "dup"), entry(2, "b")]);
    let names: Vec<_> = channels.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn no_feed_uses_inline_channels() {
    let loaded = load_channels(&[entry(2, "b"), entry(1, "a")], "");
    assert_eq!(loaded.channels[0].id, 1);
    assert!(loaded.link_override.is_none());
}

#[test]
fn unreachable_feed_falls_back_to_inline_channels() {
    let loaded = load_channels(&[entry(1, "a")], "http://127.0.0.1:9/channels.json");
    assert_eq!(loaded.channels.len(), 1);
    assert!(loaded.link_override.is_none());
}
