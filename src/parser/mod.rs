pub mod text;

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use crate::model::{PageResult, PostRecord};
use crate::sentiment::SentimentScorer;
use text::{clean_text, KeywordSet};

/// CSS selectors locating posts, their title links and the next-page button.
/// Defaults match old.reddit.com listing markup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingLayout {
    pub post: String,
    pub title: String,
    pub next: String,
}

impl Default for ListingLayout {
    fn default() -> Self {
        ListingLayout {
            post: "div.thing".into(),
            title: "a.title".into(),
            next: "span.next-button".into(),
        }
    }
}

impl ListingLayout {
    pub fn compile(&self) -> Result<CompiledLayout> {
        Ok(CompiledLayout {
            post: parse_selector(&self.post)?,
            title: parse_selector(&self.title)?,
            next: parse_selector(&self.next)?,
            anchor: parse_selector("a")?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {:?}: {:?}", css, e))
}

#[derive(Debug, Clone)]
pub struct CompiledLayout {
    post: Selector,
    title: Selector,
    next: Selector,
    anchor: Selector,
}

/// Parse one listing page into records plus the raw next-page `href`.
///
/// Posts without a title link (or with a blank title) are skipped. With a
/// `filter`, posts whose title matches none of its keywords are skipped too.
pub fn extract_page(
    markup: &str,
    layout: &CompiledLayout,
    filter: Option<&KeywordSet>,
    scorer: &dyn SentimentScorer,
) -> PageResult {
    let document = Html::parse_document(markup);
    let mut records = Vec::new();

    for post in document.select(&layout.post) {
        let Some(link) = post.select(&layout.title).next() else {
            continue;
        };
        let title = stripped_text(link);
        if title.is_empty() {
            continue;
        }
        if filter.is_some_and(|kw| !kw.matches(&title)) {
            continue;
        }

        let sentiment = scorer.score(&clean_text(&title));
        records.push(PostRecord {
            post_url: link.value().attr("href").map(str::to_string),
            title,
            polarity: sentiment.polarity,
            subjectivity: sentiment.subjectivity,
        });
    }

    let next_page_url = document
        .select(&layout.next)
        .next()
        .and_then(|button| button.select(&layout.anchor).next())
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    PageResult {
        records,
        next_page_url,
    }
}

/// Text nodes trimmed individually and joined without a separator.
fn stripped_text(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::lexicon::Lexicon;
    use crate::sentiment::LexiconScorer;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn extract(markup: &str, filter: Option<&KeywordSet>) -> PageResult {
        let layout = ListingLayout::default().compile().unwrap();
        let scorer = LexiconScorer::new(Lexicon::builtin().unwrap());
        extract_page(markup, &layout, filter, &scorer)
    }

    #[test]
    fn listing_skips_untitled_post() {
        let page = extract(&fixture("listing_page"), None);
        assert_eq!(page.records.len(), 2);
        assert_eq!(
            page.next_page_url.as_deref(),
            Some("https://old.reddit.com/r/college/?count=25&after=t3_abc123")
        );
    }

    #[test]
    fn listing_record_fields() {
        let page = extract(&fixture("listing_page"), None);
        let first = &page.records[0];
        assert_eq!(first.title, "Finally passed organic chemistry, best feeling ever!");
        assert_eq!(
            first.post_url.as_deref(),
            Some("/r/college/comments/abc111/finally_passed_organic_chemistry/")
        );
        assert!(first.polarity > 0.0);

        let second = &page.records[1];
        assert_eq!(second.title, "Worst roommate situation, need advice");
        assert!(second.polarity < 0.0);
    }

    #[test]
    fn last_page_has_no_next_link() {
        let page = extract(&fixture("listing_last_page"), None);
        assert_eq!(page.records.len(), 1);
        assert!(page.next_page_url.is_none());
    }

    #[test]
    fn next_button_without_anchor() {
        let html = r#"<div class="thing"><a class="title" href="/x">Hello</a></div>
            <span class="next-button">next</span>"#;
        let page = extract(html, None);
        assert_eq!(page.records.len(), 1);
        assert!(page.next_page_url.is_none());
    }

    #[test]
    fn keyword_filter_drops_non_matching() {
        let keywords = KeywordSet::new(["roommate", "lease"]);
        let page = extract(&fixture("listing_page"), Some(&keywords));
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].title, "Worst roommate situation, need advice");
        assert!(page.next_page_url.is_some());
    }

    #[test]
    fn missing_href_and_blank_title() {
        let html = r#"
            <div class="thing"><a class="title">No link here</a></div>
            <div class="thing"><a class="title" href="/blank">   </a></div>"#;
        let page = extract(html, None);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].title, "No link here");
        assert!(page.records[0].post_url.is_none());
    }

    #[test]
    fn title_text_is_stripped_per_node() {
        let html = r#"<div class="thing"><a class="title" href="/t">
            Midterms <em>again</em>  </a></div>"#;
        let page = extract(html, None);
        assert_eq!(page.records[0].title, "Midtermsagain");
    }

    #[test]
    fn empty_markup() {
        let page = extract("", None);
        assert!(page.records.is_empty());
        assert!(page.next_page_url.is_none());
    }

    #[test]
    fn custom_layout() {
        let layout = ListingLayout {
            post: "li.post".into(),
            title: "h2 > a".into(),
            next: "nav.pager".into(),
        }
        .compile()
        .unwrap();
        let scorer = LexiconScorer::new(Lexicon::builtin().unwrap());
        let html = r#"<ul><li class="post"><h2><a href="/p/1">Good news</a></h2></li></ul>
            <nav class="pager"><a href="/page/2">more</a></nav>"#;
        let page = extract_page(html, &layout, None, &scorer);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.next_page_url.as_deref(), Some("/page/2"));
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let layout = ListingLayout {
            post: "div[".into(),
            ..ListingLayout::default()
        };
        assert!(layout.compile().is_err());
    }
}
