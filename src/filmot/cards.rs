use std::fmt;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::filmot::{collapsed_text, element_text};

/// One parsed result card. Every field is independently optional: result
/// pages vary, and a card with missing markup still counts as a result.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VideoRecord {
    pub card_id: Option<String>,
    pub index: Option<String>,
    pub video_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_link: Option<String>,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub views: Option<String>,
    pub likes: Option<String>,
    pub upload_date: Option<String>,
    pub language: Option<String>,
    pub scroll_text: Option<String>,
}

fn shown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unknown")
}

impl fmt::Display for VideoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<VideoRecord id={} title={} channel={} views={} likes={} uploaded={}>",
            shown(&self.video_id),
            shown(&self.title),
            shown(&self.channel),
            shown(&self.views),
            shown(&self.likes),
            shown(&self.upload_date),
        )
    }
}

/// Parses every result card out of a results page, in document order. A card
/// is any element whose id starts with `vcard`; missing sub-fields never drop
/// the card.
pub fn parse_video_cards(html: &str) -> Vec<VideoRecord> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse(r#"div[id^="vcard"]"#).expect("card selector");
    document.select(&card_selector).map(parse_card).collect()
}

fn parse_card(card: ElementRef) -> VideoRecord {
    let card_id = card.value().attr("id").map(str::to_owned);
    let index = card.value().attr("idx").map(str::to_owned);

    let fullpage_selector = Selector::parse("a.fullpagelnk").expect("fullpage selector");
    let video_id = card
        .select(&fullpage_selector)
        .next()
        .and_then(|anchor| anchor.value().attr("vid"))
        .map(str::to_owned);

    let thumbnail_selector = Selector::parse("img.thumb-image").expect("thumbnail selector");
    let thumbnail_url = card
        .select(&thumbnail_selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_owned);

    let watch_selector =
        Selector::parse(r#"a[href*="youtube.com/watch"]"#).expect("watch link selector");
    let video_link = card
        .select(&watch_selector)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::to_owned);

    let title_selector = Selector::parse("div.d-inline").expect("title selector");
    let title = card.select(&title_selector).next().map(element_text);

    let channel_selector = Selector::parse(r#"a[href^="/channel/"]"#).expect("channel selector");
    let channel = card.select(&channel_selector).next().map(element_text);

    let (views, likes, upload_date) = classify_badges(card);

    let sidebyside_selector =
        Selector::parse(r#"a[href*="/sidebyside"]"#).expect("language link selector");
    let img_selector = Selector::parse("img").expect("img selector");
    let language = card
        .select(&sidebyside_selector)
        .next()
        .and_then(|anchor| anchor.select(&img_selector).next())
        .and_then(|img| img.value().attr("alt"))
        .map(str::to_owned);

    let scroll_selector = Selector::parse("div.scroll-box").expect("snippet selector");
    let scroll_text = card.select(&scroll_selector).next().map(collapsed_text);

    VideoRecord {
        card_id,
        index,
        video_id,
        thumbnail_url,
        video_link,
        title,
        channel,
        views,
        likes,
        upload_date,
        language,
        scroll_text,
    }
}

/// Classifies a card's metric badges by their inner icon: an eye icon marks
/// the view count and a thumbs-up icon marks the like count. Any other badge
/// whose text carries at least one letter is taken as the upload date; the
/// first such badge wins.
fn classify_badges(card: ElementRef) -> (Option<String>, Option<String>, Option<String>) {
    let badge_selector = Selector::parse("span.badge").expect("badge selector");
    let eye_selector = Selector::parse("i.fa-eye").expect("eye icon selector");
    let thumbs_selector = Selector::parse("i.fa-thumbs-up").expect("thumbs icon selector");
    let mut views = None;
    let mut likes = None;
    let mut upload_date = None;
    for badge in card.select(&badge_selector) {
        let text = element_text(badge);
        if badge.select(&eye_selector).next().is_some() {
            views = Some(text);
        } else if badge.select(&thumbs_selector).next().is_some() {
            likes = Some(text);
        } else if upload_date.is_none()
            && !text.is_empty()
            && text.chars().any(char::is_alphabetic)
        {
            upload_date = Some(text);
        }
    }
    (views, likes, upload_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CARD_PAGE: &str = r#"
    <html><body><div id="videocontainer" class="row">
      <div id="vcard1" idx="0" class="col mb-3">
        <a class="fullpagelnk" vid="dQw4w9WgXcQ" href="/video/dQw4w9WgXcQ">
          <img class="thumb-image" src="https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg">
        </a>
        <div class="d-inline">Never Gonna Give You Up</div>
        <a href="https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42">watch</a>
        <a href="/channel/UCuAXFkgsw1L7xaCfnd5JJOw"> Rick Astley </a>
        <span class="badge badge-secondary"><i class="fas fa-eye"></i> 1,234</span>
        <span class="badge badge-secondary"><i class="fas fa-thumbs-up"></i> 56</span>
        <span class="badge badge-secondary">Jan 1, 2020</span>
        <a href="/sidebyside/dQw4w9WgXcQ"><img src="/flags/en.png" alt="English"></a>
        <div class="scroll-box">
          never gonna
          give   you up
        </div>
      </div>
      <div id="vcard2" idx="1" class="col mb-3">
        <span class="badge badge-secondary">Feb 2, 2021</span>
        <span class="badge badge-secondary"><i class="fas fa-thumbs-up"></i> 7</span>
        <span class="badge badge-secondary"><i class="fas fa-eye"></i> 890</span>
        <div class="d-inline">Second video</div>
      </div>
    </div></body></html>
    "#;

    #[test]
    fn parses_every_field_of_a_full_card() {
        let records = parse_video_cards(TWO_CARD_PAGE);
        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.card_id.as_deref(), Some("vcard1"));
        assert_eq!(first.index.as_deref(), Some("0"));
        assert_eq!(first.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            first.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg")
        );
        assert_eq!(
            first.video_link.as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42")
        );
        assert_eq!(first.title.as_deref(), Some("Never Gonna Give You Up"));
        assert_eq!(first.channel.as_deref(), Some("Rick Astley"));
        assert_eq!(first.language.as_deref(), Some("English"));
        assert_eq!(
            first.scroll_text.as_deref(),
            Some("never gonna give you up")
        );
    }

    #[test]
    fn badges_classify_by_icon_regardless_of_order() {
        let records = parse_video_cards(TWO_CARD_PAGE);
        assert_eq!(records[0].views.as_deref(), Some("1,234"));
        assert_eq!(records[0].likes.as_deref(), Some("56"));
        assert_eq!(records[0].upload_date.as_deref(), Some("Jan 1, 2020"));
        // second card lists its badges date-first
        assert_eq!(records[1].views.as_deref(), Some("890"));
        assert_eq!(records[1].likes.as_deref(), Some("7"));
        assert_eq!(records[1].upload_date.as_deref(), Some("Feb 2, 2021"));
    }

    #[test]
    fn cards_come_back_in_document_order() {
        let records = parse_video_cards(TWO_CARD_PAGE);
        assert_eq!(records[0].card_id.as_deref(), Some("vcard1"));
        assert_eq!(records[1].card_id.as_deref(), Some("vcard2"));
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse_video_cards(TWO_CARD_PAGE), parse_video_cards(TWO_CARD_PAGE));
    }

    #[test]
    fn bare_card_still_yields_a_record() {
        let html = r#"<html><body><div id="vcard77"></div></body></html>"#;
        let records = parse_video_cards(html);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.card_id.as_deref(), Some("vcard77"));
        assert_eq!(record.index, None);
        assert_eq!(record.video_id, None);
        assert_eq!(record.thumbnail_url, None);
        assert_eq!(record.video_link, None);
        assert_eq!(record.title, None);
        assert_eq!(record.channel, None);
        assert_eq!(record.views, None);
        assert_eq!(record.likes, None);
        assert_eq!(record.upload_date, None);
        assert_eq!(record.language, None);
        assert_eq!(record.scroll_text, None);
    }

    #[test]
    fn page_without_cards_yields_nothing() {
        let html = r#"<html><body><div id="accordion"></div></body></html>"#;
        assert!(parse_video_cards(html).is_empty());
    }

    #[test]
    fn elements_without_the_card_prefix_are_ignored() {
        let html = r#"<html><body>
            <div id="card1"></div>
            <div id="vc"></div>
            <div id="vcard1"></div>
        </body></html>"#;
        let records = parse_video_cards(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].card_id.as_deref(), Some("vcard1"));
    }

    #[test]
    fn numeric_iconless_badge_is_not_an_upload_date() {
        let html = r#"<html><body><div id="vcard1">
            <span class="badge">4321</span>
            <span class="badge">Mar 3, 2022</span>
        </div></body></html>"#;
        let records = parse_video_cards(html);
        assert_eq!(records[0].views, None);
        assert_eq!(records[0].upload_date.as_deref(), Some("Mar 3, 2022"));
    }

    #[test]
    fn first_letter_bearing_badge_wins_the_upload_date() {
        let html = r#"<html><body><div id="vcard1">
            <span class="badge">Apr 4, 2023</span>
            <span class="badge">May 5, 2024</span>
        </div></body></html>"#;
        let records = parse_video_cards(html);
        assert_eq!(records[0].upload_date.as_deref(), Some("Apr 4, 2023"));
    }

    #[test]
    fn unknown_fields_render_as_unknown() {
        let record = VideoRecord {
            video_id: Some("abc".to_owned()),
            ..VideoRecord::default()
        };
        assert_eq!(
            record.to_string(),
            "<VideoRecord id=abc title=unknown channel=unknown views=unknown likes=unknown uploaded=unknown>"
        );
    }
}
