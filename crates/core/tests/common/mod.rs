// ═══════════════════════════════════════════════════════════════════
// Shared test helpers: fixture pages, mock market source, HTTP stub
// ═══════════════════════════════════════════════════════════════════
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crypto_tracker_core::errors::CoreError;
use crypto_tracker_core::models::quote::TokenQuote;
use crypto_tracker_core::providers::traits::MarketSource;

// ── Fixture pages ───────────────────────────────────────────────────

/// Listing page: four good rows, one row without a price cell.
pub const LISTING_HTML: &str = r#"<!DOCTYPE html>
<html><body>
<table class="cmc-table"><tbody>
<tr class="cmc-table-row">
  <td class="cmc-table__cell cmc-table__cell--sort-by__name"><div><a href="/currencies/bitcoin/" class="cmc-link cmc-table__column-name--name">Bitcoin</a></div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__symbol"><div>BTC</div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__price"><a href="/currencies/bitcoin/markets/" class="cmc-link">$43,210.50</a></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__percent-change-24-h"><div class="cmc--change-positive">2.35%</div></td>
</tr>
<tr class="cmc-table-row">
  <td class="cmc-table__cell cmc-table__cell--sort-by__name"><div><a href="/currencies/ethereum/" class="cmc-link cmc-table__column-name--name">Ethereum</a></div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__symbol"><div>ETH</div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__price"><a href="/currencies/ethereum/markets/" class="cmc-link">$2,300.00</a></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__percent-change-24-h"><div><span class="icon-Caret-down"></span>1.20%</div></td>
</tr>
<tr class="cmc-table-row">
  <td class="cmc-table__cell cmc-table__cell--sort-by__name"><div><a href="/currencies/dogecoin/" class="cmc-link cmc-table__column-name--name">Dogecoin</a></div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__symbol"><div>DOGE</div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__percent-change-24-h"><div>0.40%</div></td>
</tr>
<tr class="cmc-table-row">
  <td class="cmc-table__cell cmc-table__cell--sort-by__name"><div><a href="https://coinmarketcap.com/currencies/tether/" class="cmc-link cmc-table__column-name--name">Tether</a></div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__symbol"><div>USDT</div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__price"><div>$1.00</div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__percent-change-24-h"><div class="cmc--change-negative">-0.01%</div></td>
</tr>
<tr class="cmc-table-row">
  <td class="cmc-table__cell cmc-table__cell--sort-by__name"><div><a href="/currencies/shiba-inu/" class="cmc-link cmc-table__column-name--name">Shiba   Inu</a></div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__symbol"><div> SHIB </div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__price"><div>$0.00001</div></td>
  <td class="cmc-table__cell cmc-table__cell--sort-by__percent-change-24-h"><div>3.10%</div></td>
</tr>
</tbody></table>
</body></html>"#;

/// Detail page for bitcoin with a falling price.
pub const BITCOIN_DETAIL_HTML: &str = r#"<!DOCTYPE html>
<html><body>
<div class="sc-16r8icm-0 nameHeader"><img src="btc.png" alt="BTC"><h2 class="sc-1q9q90x-0 h1">Bitcoin<small class="nameSymbol">BTC</small></h2></div>
<div class="sc-16r8icm-0 priceTitle">
  <div class="priceValue "><span>$43,210.50</span></div>
  <span class="sc-15yy2pl-0 priceChange"><span class="icon-Caret-down"></span>1.75<!-- -->%</span>
</div>
</body></html>"#;

/// Detail page for ethereum with a rising price.
pub const ETHEREUM_DETAIL_HTML: &str = r#"<!DOCTYPE html>
<html><body>
<div class="nameHeader"><h2>Ethereum<small class="nameSymbol">ETH</small></h2></div>
<div class="priceValue"><span>$2,310.25</span></div>
<span class="priceChange"><span class="icon-Caret-up"></span>0.45%</span>
</body></html>"#;

/// Detail page whose price node is gone.
pub const DETAIL_WITHOUT_PRICE_HTML: &str = r#"<!DOCTYPE html>
<html><body>
<div class="nameHeader"><h2>Bitcoin<small class="nameSymbol">BTC</small></h2></div>
<span class="priceChange">1.75%</span>
</body></html>"#;

// ── Quotes ──────────────────────────────────────────────────────────

pub fn quote(name: &str, ticker: &str, id: &str, price: f64, change: f64) -> TokenQuote {
    TokenQuote {
        name: name.into(),
        ticker: ticker.into(),
        canonical_id: id.into(),
        price,
        daily_change_percent: change,
    }
}

pub fn bitcoin() -> TokenQuote {
    quote("Bitcoin", "BTC", "bitcoin", 40_000.0, 2.0)
}

pub fn ethereum() -> TokenQuote {
    quote("Ethereum", "ETH", "ethereum", 2_000.0, -4.0)
}

pub fn solana() -> TokenQuote {
    quote("Solana", "SOL", "solana", 100.0, 10.0)
}

// ── Mock market source ──────────────────────────────────────────────

/// In-memory market. Quotes can be listed, looked up, or both; ids can be
/// made to fail with a network error.
#[derive(Default)]
pub struct MockSource {
    listing: Vec<TokenQuote>,
    details: HashMap<String, TokenQuote>,
    failing: HashSet<String>,
    listing_down: bool,
    pub lookups: Mutex<Vec<String>>,
    pub list_calls: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listed and resolvable on its detail page.
    pub fn with_quote(mut self, quote: TokenQuote) -> Self {
        self.details.insert(quote.canonical_id.clone(), quote.clone());
        self.listing.push(quote);
        self
    }

    /// Listed, but the detail page lacks its markers.
    pub fn with_listed_only(mut self, quote: TokenQuote) -> Self {
        self.listing.push(quote);
        self
    }

    /// Resolvable on its detail page but absent from the listing.
    pub fn with_detail_only(mut self, quote: TokenQuote) -> Self {
        self.details.insert(quote.canonical_id.clone(), quote);
        self
    }

    /// Lookups of `id` fail with a network error.
    pub fn with_failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    /// The listing page cannot be fetched.
    pub fn with_listing_down(mut self) -> Self {
        self.listing_down = true;
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketSource for MockSource {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn list_all(&self) -> Result<Vec<TokenQuote>, CoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.listing_down {
            return Err(CoreError::Network("listing unreachable".into()));
        }
        Ok(self.listing.clone())
    }

    async fn lookup(&self, canonical_id: &str) -> Result<TokenQuote, CoreError> {
        self.lookups.lock().unwrap().push(canonical_id.to_string());
        if self.failing.contains(canonical_id) {
            return Err(CoreError::Network(format!("{canonical_id} unreachable")));
        }
        self.details
            .get(canonical_id)
            .cloned()
            .ok_or_else(|| CoreError::QuoteNotFound {
                id: canonical_id.to_string(),
                marker: "price marker 'priceValue'".into(),
            })
    }
}

/// Forwarding impl so tests can keep a handle on the mock after boxing it.
pub struct SharedSource(pub Arc<MockSource>);

#[async_trait]
impl MarketSource for SharedSource {
    fn name(&self) -> &str {
        self.0.name()
    }

    async fn list_all(&self) -> Result<Vec<TokenQuote>, CoreError> {
        self.0.list_all().await
    }

    async fn lookup(&self, canonical_id: &str) -> Result<TokenQuote, CoreError> {
        self.0.lookup(canonical_id).await
    }
}

// ── Loopback HTTP stub ──────────────────────────────────────────────

/// A tiny HTTP/1.1 server answering fixed routes; unknown paths get 404.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: Arc<Vec<(String, u16, String)>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, status, body)| (path.to_string(), status, body.to_string()))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let n = socket.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf).to_string();
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    seen.lock().unwrap().push(request);

                    let (status, body) = routes
                        .iter()
                        .find(|(p, _, _)| *p == path)
                        .map(|(_, s, b)| (*s, b.clone()))
                        .unwrap_or((404, "not found".to_string()));

                    let response = format!(
                        "HTTP/1.1 {status} Stub\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { base_url, requests }
    }

    /// Raw request heads received so far, lowercased.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.to_lowercase())
            .collect()
    }
}
