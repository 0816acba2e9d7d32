//! Marker-based extraction of quotes from listing and detail pages.
//!
//! A marker is a substring of an element's `class` attribute. The site
//! embeds build hashes in its class names, so markers only have to match a
//! stable fragment (`[class*="<marker>"]`). Everything that knows about the
//! page structure lives in [`ListingMarkers`] and [`DetailMarkers`].

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use crate::errors::CoreError;
use crate::models::quote::TokenQuote;

/// Markers for the "all assets" listing table.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingMarkers {
    /// One element per asset row
    pub row: String,
    /// Link carrying the display name; its href holds the canonical id
    pub name_link: String,
    pub ticker: String,
    pub price: String,
    pub change: String,
    /// Present on (or inside) the change node when the change is negative
    pub down: String,
}

impl Default for ListingMarkers {
    fn default() -> Self {
        Self {
            row: "cmc-table-row".into(),
            name_link: "cmc-table__column-name--name".into(),
            ticker: "cmc-table__cell--sort-by__symbol".into(),
            price: "cmc-table__cell--sort-by__price".into(),
            change: "cmc-table__cell--sort-by__percent-change-24-h".into(),
            down: "Caret-down".into(),
        }
    }
}

/// Markers for a single asset's detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailMarkers {
    /// Header whose first text node is the display name
    pub name: String,
    pub ticker: String,
    pub price: String,
    pub change: String,
    pub down: String,
}

impl Default for DetailMarkers {
    fn default() -> Self {
        Self {
            name: "nameHeader".into(),
            ticker: "nameSymbol".into(),
            price: "priceValue".into(),
            change: "priceChange".into(),
            down: "Caret-down".into(),
        }
    }
}

/// Build a `[class*="..."]` selector for a marker.
pub fn class_selector(marker: &str) -> Result<Selector, CoreError> {
    if marker.trim().is_empty() || marker.contains('"') {
        return Err(CoreError::InvalidMarker(format!("'{marker}'")));
    }
    Selector::parse(&format!("[class*=\"{marker}\"]"))
        .map_err(|e| CoreError::InvalidMarker(format!("'{marker}': {e:?}")))
}

/// Parse a number out of display text by dropping everything that is not
/// an ASCII digit or `.` ("$1,234.50" → 1234.5). The sign is dropped too;
/// direction comes from the down marker.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Second non-empty path segment of `href` resolved against `base`
/// ("/currencies/bitcoin/" → "bitcoin").
#[must_use]
pub fn canonical_id_from_href(href: &str, base: &Url) -> Option<String> {
    let url = base.join(href).ok()?;
    let id = url.path_segments()?.filter(|s| !s.is_empty()).nth(1)?;
    Some(id.to_string())
}

/// Parse every well-formed row of a listing page.
///
/// A row missing any marker, or whose price/change does not parse, is
/// skipped. Only an unusable marker table is an error.
pub fn parse_listing(
    html: &str,
    markers: &ListingMarkers,
    base: &Url,
) -> Result<Vec<TokenQuote>, CoreError> {
    let selectors = ListingSelectors::new(markers)?;
    let document = Html::parse_document(html);

    let mut quotes = Vec::new();
    let mut skipped = 0usize;
    for (index, row) in document.select(&selectors.row).enumerate() {
        match parse_row(row, &selectors, base) {
            Some(quote) => quotes.push(quote),
            None => {
                skipped += 1;
                trace!(row = index, "skipping listing row with missing markers");
            }
        }
    }

    trace!(parsed = quotes.len(), skipped, "listing parsed");
    Ok(quotes)
}

/// Parse a detail page into a quote for `canonical_id`.
pub fn parse_detail(
    html: &str,
    canonical_id: &str,
    markers: &DetailMarkers,
) -> Result<TokenQuote, CoreError> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let missing = |what: &str, marker: &str| CoreError::QuoteNotFound {
        id: canonical_id.to_string(),
        marker: format!("{what} marker '{marker}'"),
    };

    let name = root
        .select(&class_selector(&markers.name)?)
        .next()
        .and_then(first_text)
        .ok_or_else(|| missing("name", &markers.name))?;

    let ticker = root
        .select(&class_selector(&markers.ticker)?)
        .next()
        .map(full_text)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing("ticker", &markers.ticker))?;

    let price = root
        .select(&class_selector(&markers.price)?)
        .next()
        .and_then(|el| parse_number(&full_text(el)))
        .ok_or_else(|| missing("price", &markers.price))?;

    let down = class_selector(&markers.down)?;
    let daily_change_percent = root
        .select(&class_selector(&markers.change)?)
        .next()
        .and_then(|el| signed_change(el, &down, &markers.down))
        .ok_or_else(|| missing("change", &markers.change))?;

    Ok(TokenQuote {
        name,
        ticker,
        canonical_id: canonical_id.to_string(),
        price,
        daily_change_percent,
    })
}

// ── Internal helpers ────────────────────────────────────────────────

struct ListingSelectors<'m> {
    row: Selector,
    name_link: Selector,
    ticker: Selector,
    price: Selector,
    change: Selector,
    down: Selector,
    down_marker: &'m str,
}

impl<'m> ListingSelectors<'m> {
    fn new(markers: &'m ListingMarkers) -> Result<Self, CoreError> {
        Ok(Self {
            row: class_selector(&markers.row)?,
            name_link: class_selector(&markers.name_link)?,
            ticker: class_selector(&markers.ticker)?,
            price: class_selector(&markers.price)?,
            change: class_selector(&markers.change)?,
            down: class_selector(&markers.down)?,
            down_marker: &markers.down,
        })
    }
}

fn parse_row(row: ElementRef<'_>, sel: &ListingSelectors<'_>, base: &Url) -> Option<TokenQuote> {
    let link = row.select(&sel.name_link).next()?;
    let name = full_text(link);
    if name.is_empty() {
        return None;
    }
    let canonical_id = canonical_id_from_href(link.value().attr("href")?, base)?;

    let ticker = full_text(row.select(&sel.ticker).next()?);
    if ticker.is_empty() {
        return None;
    }

    let price = parse_number(&full_text(row.select(&sel.price).next()?))?;
    let daily_change_percent =
        signed_change(row.select(&sel.change).next()?, &sel.down, sel.down_marker)?;

    Some(TokenQuote {
        name,
        ticker,
        canonical_id,
        price,
        daily_change_percent,
    })
}

/// All descendant text, whitespace-collapsed.
fn full_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-blank descendant text node. Used where a header nests the
/// ticker after the name ("Bitcoin<small>BTC</small>").
fn first_text(el: ElementRef<'_>) -> Option<String> {
    el.text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

fn signed_change(el: ElementRef<'_>, down: &Selector, down_marker: &str) -> Option<f64> {
    let text = full_text(el);
    let value = parse_number(&text)?;
    let negative = text.starts_with('-')
        || el
            .value()
            .attr("class")
            .is_some_and(|c| c.contains(down_marker))
        || el.select(down).next().is_some();
    Some(if negative { -value } else { value })
}
