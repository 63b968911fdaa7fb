//! Steam Community: guide search and guide page download.
//!
//! Community pages sit behind an age gate for mature titles. The client's
//! cookie jar normally gets past it, but some pages still serve the
//! interstitial with a `Proceed()` button; those are fetched a second time,
//! following the interstitial's `document.location` target when it has one.

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::sync::LazyLock;

use super::SteamClient;

static PROCEED_TARGET: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r#"document\.location\s*=\s*"([^"]+)""#) {
        Ok(regex) => regex,
        Err(err) => panic!("Proceed target regex is invalid: {err}"),
    });

static GUIDE_ID: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"id=(\d+)") {
    Ok(regex) => regex,
    Err(err) => panic!("Guide id regex is invalid: {err}"),
});

struct ListingSelectors {
    listing_item: Selector,
    homecontent_item: Selector,
    link: Selector,
    title: Selector,
    description: Selector,
}

fn selector(css: &str) -> Selector {
    match Selector::parse(css) {
        Ok(selector) => selector,
        Err(err) => panic!("listing selector {css:?} is invalid: {err}"),
    }
}

static SELECTORS: LazyLock<ListingSelectors> = LazyLock::new(|| ListingSelectors {
    listing_item: selector("div.workshopItemCollectionContainer"),
    homecontent_item: selector("a.workshopItemCollection"),
    link: selector("a.workshopItemCollection"),
    title: selector(".workshopItemTitle"),
    description: selector(".workshopItemShortDesc"),
});

/// One guide from a search listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideSummary {
    /// Numeric guide id, or the raw link when it carries none.
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct HomeContent {
    #[serde(default)]
    results_html: String,
}

/// Whether a response is the age-check interstitial rather than content.
pub fn is_age_gate(final_url: &str, body: &str) -> bool {
    final_url.contains("/agecheck/") || body.contains(r#"onclick="Proceed()""#)
}

/// The URL an age-gate interstitial would navigate to.
pub fn proceed_target(body: &str) -> Option<String> {
    PROCEED_TARGET
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Pull the numeric id out of a guide link.
pub fn guide_id_from_link(link: &str) -> String {
    GUIDE_ID
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| link.to_string())
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn summarize(item: ElementRef<'_>) -> GuideSummary {
    let link = if item.value().name() == "a" {
        item.value().attr("href")
    } else {
        item.select(&SELECTORS.link)
            .next()
            .and_then(|a| a.value().attr("href"))
    }
    .unwrap_or_default();

    let text_of = |sel: &Selector| {
        item.select(sel)
            .next()
            .map(collapsed_text)
            .unwrap_or_default()
    };

    GuideSummary {
        id: guide_id_from_link(link),
        title: text_of(&SELECTORS.title),
        description: text_of(&SELECTORS.description),
    }
}

/// Guides on a `guides/?browsefilter=toprated` listing page.
pub fn parse_guide_listing(html: &str, limit: usize) -> Vec<GuideSummary> {
    let page = Html::parse_document(html);
    page.select(&SELECTORS.listing_item)
        .take(limit)
        .map(summarize)
        .collect()
}

/// Guides in the `results_html` fragment of the hub's `homecontent` feed.
pub fn parse_homecontent_listing(html: &str, limit: usize) -> Vec<GuideSummary> {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&SELECTORS.homecontent_item)
        .take(limit)
        .map(summarize)
        .collect()
}

pub fn format_guide_listing(app_id: u64, query: &str, guides: &[GuideSummary]) -> String {
    if guides.is_empty() {
        return format!("No guides found for '{}' (AppID {}).", query, app_id);
    }
    let mut lines = vec![format!("Top {} guides for '{}':", guides.len(), query)];
    lines.extend(guides.iter().enumerate().map(|(i, g)| {
        format!(
            "{}. ID: {}\n   Name: {}\n   Description: {}",
            i + 1,
            g.id,
            g.title,
            g.description
        )
    }));
    lines.join("\n")
}

impl SteamClient {
    /// GET a Community page, passing through the age gate if it appears.
    async fn community_page(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;
        let final_url = resp.url().to_string();
        let status = resp.status();
        let body = resp.text().await.context("Failed to read page body")?;

        if !is_age_gate(&final_url, &body) {
            if !status.is_success() {
                anyhow::bail!("HTTP status {} for {}", status, final_url);
            }
            return Ok(body);
        }

        let retry = match proceed_target(&body) {
            Some(target) => {
                tracing::debug!(%target, "following age gate redirect");
                self.http.get(target)
            }
            None => {
                tracing::debug!(url, "age gate without target, refetching");
                self.http.get(url).query(query)
            }
        };
        retry
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()?
            .text()
            .await
            .context("Failed to read page body")
    }

    /// Top-rated guides for `app_id` matching `query`, as listing text.
    ///
    /// Falls back to the community hub feed when the listing page has no
    /// guide items.
    pub async fn search_guides(&self, app_id: u64, query: &str) -> Result<String> {
        let limit = self.config.guide_search_limit;
        let listing_url = self.community_url(&format!("app/{}/guides/", app_id));
        let html = self
            .community_page(
                &listing_url,
                &[("searchText", query), ("browsefilter", "toprated")],
            )
            .await?;
        let mut guides = parse_guide_listing(&html, limit);

        if guides.is_empty() {
            tracing::debug!(app_id, "guide listing empty, trying homecontent feed");
            let feed_url = self.community_url(&format!("app/{}/homecontent/", app_id));
            let feed: HomeContent = self
                .http
                .get(&feed_url)
                .query(&[
                    ("userreviewsoffset", "0"),
                    ("p", "1"),
                    ("communityhub", "1"),
                    ("workshopitemspreview", "0"),
                    ("readytouseitemspreview", "0"),
                    ("mtxitemspreview", "0"),
                    ("itemspreview", "0"),
                    ("curations", "0"),
                ])
                .send()
                .await
                .with_context(|| format!("Request to {} failed", feed_url))?
                .error_for_status()?
                .json()
                .await
                .context("Invalid homecontent JSON")?;
            guides = parse_homecontent_listing(&feed.results_html, limit);
        }

        Ok(format_guide_listing(app_id, query, &guides))
    }

    /// Raw HTML of a guide's detail page.
    pub async fn fetch_guide_page(&self, guide_id: &str) -> Result<String> {
        let url = self.community_url("sharedfiles/filedetails/");
        self.community_page(&url, &[("id", guide_id)]).await
    }
}
