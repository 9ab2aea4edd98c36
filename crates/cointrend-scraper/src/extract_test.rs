use chrono::{TimeZone, Utc};

use super::*;

const LONG_A: &str =
    "Bitcoin climbed above its previous high as spot ETF inflows accelerated this week.";
const LONG_B: &str =
    "Analysts expect volatility to persist while macro data dominates trader attention.";

fn page(head: &str, body: &str) -> String {
    format!("<html><head>{head}</head><body>{body}</body></html>")
}

#[test]
fn keeps_long_paragraphs_in_document_order() {
    let html = page(
        "<title>BTC rallies</title>",
        &format!("<p>{LONG_A}</p><p>Short teaser.</p><div><p>{LONG_B}</p></div>"),
    );

    let article = extract_from_html(&html).expect("content present");

    assert_eq!(article.title, "BTC rallies");
    assert_eq!(article.content, format!("{LONG_A}\n\n{LONG_B}"));
}

#[test]
fn paragraph_of_exactly_fifty_chars_is_dropped() {
    let fifty = "x".repeat(MIN_PARAGRAPH_CHARS);
    let fifty_one = "y".repeat(MIN_PARAGRAPH_CHARS + 1);
    let html = page("", &format!("<p>{fifty}</p><p>{fifty_one}</p>"));

    let article = extract_from_html(&html).expect("content present");
    assert_eq!(article.content, fifty_one);
}

#[test]
fn whitespace_is_collapsed_before_length_check() {
    // 30 visible characters padded out with whitespace runs.
    let padded = format!("<p>{}</p>", "word      ".repeat(6));
    assert!(extract_from_html(&page("", &padded)).is_none());

    let html = page("", "<p>  Ether\n\n   staking   yields rose sharply after the upgrade went live  </p>");
    let article = extract_from_html(&html).expect("content present");
    assert_eq!(
        article.content,
        "Ether staking yields rose sharply after the upgrade went live"
    );
}

#[test]
fn nested_inline_markup_contributes_text() {
    let html = page(
        "",
        "<p>Solana <strong>outperformed</strong> the broader market as <a href=\"#\">DEX volume</a> hit a record.</p>",
    );
    let article = extract_from_html(&html).expect("content present");
    assert_eq!(
        article.content,
        "Solana outperformed the broader market as DEX volume hit a record."
    );
}

#[test]
fn no_substantive_paragraph_yields_none() {
    let html = page("<title>Empty</title>", "<p>Too short.</p><div>No paragraphs here at all, only a div with a fairly long sentence.</div>");
    assert!(extract_from_html(&html).is_none());
}

#[test]
fn missing_title_uses_placeholder() {
    let html = page("", &format!("<p>{LONG_A}</p>"));
    let article = extract_from_html(&html).expect("content present");
    assert_eq!(article.title, NO_TITLE);
}

#[test]
fn blank_title_falls_back_to_og_title() {
    let html = page(
        r#"<title>   </title><meta property="og:title" content="  Open Graph headline ">"#,
        &format!("<p>{LONG_A}</p>"),
    );
    let article = extract_from_html(&html).expect("content present");
    assert_eq!(article.title, "Open Graph headline");
}

#[test]
fn content_is_truncated_on_char_boundary() {
    // Multi-byte characters so a byte-based cut would split a code point.
    let para = "é".repeat(6_000);
    let html = page("", &format!("<p>{para}</p><p>{para}</p>"));

    let article = extract_from_html(&html).expect("content present");
    assert_eq!(article.content.chars().count(), MAX_CONTENT_CHARS);
    assert!(article.content.starts_with("éé"));
}

#[test]
fn published_time_meta_is_preferred() {
    let html = page(
        r#"<meta property="article:published_time" content="2026-03-01T09:15:00Z">
           <meta name="pubdate" content="2026-02-01T00:00:00Z">"#,
        &format!("<time datetime=\"2026-01-01T00:00:00Z\">Jan</time><p>{LONG_A}</p>"),
    );
    let article = extract_from_html(&html).expect("content present");
    assert_eq!(
        article.published_at,
        Some(Utc.with_ymd_and_hms(2026, 3, 1, 9, 15, 0).unwrap())
    );
}

#[test]
fn time_element_is_used_when_meta_absent() {
    let html = page(
        "",
        &format!("<time datetime=\"2026-03-02T10:00:00+02:00\">today</time><p>{LONG_A}</p>"),
    );
    let article = extract_from_html(&html).expect("content present");
    assert_eq!(
        article.published_at,
        Some(Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap())
    );
}

#[test]
fn unparseable_date_is_skipped_not_fatal() {
    let html = page(
        r#"<meta property="article:published_time" content="yesterday">"#,
        &format!("<p>{LONG_A}</p>"),
    );
    let article = extract_from_html(&html).expect("content present");
    assert!(article.published_at.is_none());
}

#[test]
fn truncate_chars_leaves_short_text_alone() {
    assert_eq!(truncate_chars("abc".to_string(), 10), "abc");
    assert_eq!(truncate_chars("abcdef".to_string(), 3), "abc");
}
