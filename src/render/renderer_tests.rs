//! Tests for LogRenderer and rendered views.

use super::*;
use crate::model::LogView;

fn anchor(raw: &str) -> Anchor {
    Anchor::new(raw).expect("valid anchor")
}

fn date(raw: &str) -> DateId {
    DateId::new(raw).expect("valid date")
}

fn record(ts: &str, author: &str, body: &str, offset: &str) -> MessageRecord {
    MessageRecord::new(ts, author, body, anchor(offset))
}

fn mono_renderer() -> LogRenderer {
    LogRenderer::new(Palette::new(["#abcdef"]).expect("valid palette"))
}

// ===== Message fragments =====

#[test]
fn message_fragment_markup_in_day_context() {
    let renderer = mono_renderer();
    let fragment = renderer.render_message(
        &record("2023-10-20T12:34:56", "nick", "hi \x02there\x02", "103"),
        LinkContext::Day,
    );

    assert_eq!(
        fragment.to_markup().as_str(),
        concat!(
            r##"<div class="message"><a id="103" class="time" href="#103">[12:34:56]</a> "##,
            r#"<span class="from" style="color: #abcdef">&lt;nick&gt;</span> "#,
            r#"<span class="text">hi <b>there</b></span></div>"#
        )
    );
}

#[test]
fn search_context_links_back_to_the_day() {
    let renderer = mono_renderer();
    let fragment = renderer.render_message(
        &record("2023-10-20T12:34:56", "nick", "x", "7"),
        LinkContext::Search,
    );

    assert_eq!(fragment.element_id, "2023-10-20-7");
    assert_eq!(fragment.href, "/2023-10-20#7");
}

#[test]
fn anchor_with_spaces_and_hash_is_percent_encoded() {
    let renderer = mono_renderer();
    let day = renderer.render_message(
        &record("2023-10-20T12:34:56", "nick", "x", "msg 2#a"),
        LinkContext::Day,
    );
    let search = renderer.render_message(
        &record("2023-10-20T12:34:56", "nick", "x", "msg 2#a"),
        LinkContext::Search,
    );

    assert_eq!(day.element_id, "msg%202%23a");
    assert_eq!(day.href, "#msg%202%23a");
    assert_eq!(day.anchor.as_str(), "msg 2#a");
    assert_eq!(search.href, "/2023-10-20#msg%202%23a");
}

#[test]
fn author_is_escaped_and_colored_by_palette() {
    let renderer = LogRenderer::default();
    let fragment = renderer.render_message(
        &record("2023-10-20T00:00:00", "<evil>", "x", "1"),
        LinkContext::Day,
    );

    assert_eq!(fragment.author_color, Palette::default().color_for("<evil>"));
    assert!(fragment
        .to_markup()
        .as_str()
        .contains("&lt;&lt;evil&gt;&gt;"));
}

#[test]
fn render_messages_preserves_order_and_anchors() {
    let renderer = LogRenderer::default();
    let records = vec![
        record("2023-10-20T10:00:00", "a", "one", "1"),
        record("2023-10-20T09:00:00", "b", "two", "2"),
        record("2023-10-20T11:00:00", "c", "three", "3"),
    ];

    let fragments = renderer.render_messages(&records, LinkContext::Day);

    let anchors: Vec<&str> = fragments.iter().map(|f| f.anchor.as_str()).collect();
    assert_eq!(anchors, vec!["1", "2", "3"]);
}

#[test]
fn malformed_body_does_not_affect_siblings() {
    let renderer = mono_renderer();
    let records = vec![
        record("2023-10-20T10:00:00", "a", "\x02\x034,\x1Dbroken", "1"),
        record("2023-10-20T10:00:01", "b", "fine", "2"),
    ];

    let fragments = renderer.render_messages(&records, LinkContext::Day);

    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[1].body.as_str(), "fine");
}

// ===== Date headers =====

#[test]
fn date_header_links_to_day() {
    let header = mono_renderer().render_date_header(&date("2023-10-20"));

    assert_eq!(
        header.as_str(),
        r#"<p class="date-header">from <a href="/2023-10-20">2023-10-20</a></p>"#
    );
}

// ===== Views =====

#[test]
fn empty_day_renders_placeholder_with_date() {
    let view = LogView::Day {
        date: Some(date("2023-10-20")),
        records: Vec::new(),
    };

    assert_eq!(
        mono_renderer().render_view(&view),
        RenderedView::placeholder("No results for date: 2023-10-20")
    );
}

#[test]
fn empty_search_renders_no_results() {
    let view = LogView::search("nothing", Vec::new());

    assert_eq!(
        mono_renderer().render_view(&view),
        RenderedView::placeholder(NO_RESULTS)
    );
}

#[test]
fn search_view_renders_sections_in_first_seen_order() {
    let view = LogView::search(
        "q",
        vec![
            record("2023-10-21T10:00:00", "a", "x", "1"),
            record("2023-10-19T10:00:00", "b", "y", "2"),
            record("2023-10-21T11:00:00", "c", "z", "3"),
        ],
    );

    let rendered = mono_renderer().render_view(&view);

    match &rendered {
        RenderedView::Search { sections, .. } => {
            assert_eq!(sections.len(), 2);
            assert_eq!(sections[0].date.as_str(), "2023-10-21");
            assert_eq!(sections[0].messages.len(), 2);
            assert_eq!(sections[1].date.as_str(), "2023-10-19");
        }
        other => panic!("Expected search view, got {:?}", other),
    }
    assert_eq!(rendered.message_count(), 3);
    let html = rendered.to_markup();
    let first_header = html.as_str().find("2023-10-21").unwrap_or(usize::MAX);
    let second_header = html.as_str().find("2023-10-19").unwrap_or(0);
    assert!(first_header < second_header);
}

#[test]
fn placeholder_markup_is_escaped() {
    let html = RenderedView::placeholder("<none>").to_markup();
    assert_eq!(html.as_str(), "<div class=\"placeholder\">&lt;none&gt;</div>\n");
}

// ===== Plaintext =====

#[test]
fn plaintext_strips_codes() {
    let view = LogView::Day {
        date: Some(date("2023-10-20")),
        records: vec![
            record("2023-10-20T12:00:00", "a", "\x02hi\x02", "1"),
            record("2023-10-20T12:00:05", "b", "http://x.example", "2"),
        ],
    };

    assert_eq!(
        render_plaintext(&view),
        "[12:00:00] <a> hi\n[12:00:05] <b> http://x.example\n"
    );
}

#[test]
fn plaintext_search_has_date_separators() {
    let view = LogView::search(
        "q",
        vec![
            record("2023-10-21T10:00:00", "a", "x", "1"),
            record("2023-10-19T10:00:00", "b", "y", "2"),
        ],
    );

    assert_eq!(
        render_plaintext(&view),
        "-- 2023-10-21 --\n[10:00:00] <a> x\n-- 2023-10-19 --\n[10:00:00] <b> y\n"
    );
}
