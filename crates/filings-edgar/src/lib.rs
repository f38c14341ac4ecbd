#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR filings provider.
//!
//! This crate provides access to SEC EDGAR periodic filings:
//!
//! - CIK (Central Index Key) lookup from ticker symbols
//! - Company facts from the EDGAR XBRL API
//! - Latest 10-K / 10-Q selection by filing date
//! - Balance sheet, income statement and cash flow extraction as DataFrames
//!
//! # Example
//!
//! ```no_run
//! use filings_edgar::EdgarProvider;
//! use filings_core::{FilingType, FilingsProvider, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)");
//!
//!     let symbol = Symbol::new("AAPL");
//!     if let Some(filing) = provider.latest_filing(&symbol, FilingType::Annual).await? {
//!         let statements = filing.statements()?;
//!         println!("{:?}", statements.balance_sheet);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod filing;

pub use filing::{BALANCE_SHEET, CASH_FLOW, EdgarFiling, INCOME_STATEMENT, LineItem};

use async_trait::async_trait;
use chrono::NaiveDate;
use filings_core::{Filing, FilingType, FilingsError, FilingsProvider, Result, Symbol};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// SEC company tickers URL
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Provider name reported in logs and errors.
const PROVIDER_NAME: &str = "SEC EDGAR";

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// SEC EDGAR filings provider.
///
/// Finds a company's latest 10-K or 10-Q in the EDGAR company-facts API and
/// exposes its statements through [`EdgarFiling`]. Implements rate limiting
/// per SEC requirements (max 10 requests/second).
#[derive(Debug)]
pub struct EdgarProvider {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    user_agent: String,
}

impl EdgarProvider {
    /// Create a new EDGAR provider with the specified user agent.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    ///
    /// # Example
    /// ```
    /// use filings_edgar::EdgarProvider;
    ///
    /// let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)");
    /// ```
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self::with_client(client, user_agent)
    }

    /// Create a new EDGAR provider with a custom HTTP client.
    ///
    /// The client is expected to send `user_agent` already; the string is kept
    /// for identification.
    pub fn with_client(client: reqwest::Client, user_agent: &str) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
            user_agent: user_agent.to_string(),
        }
    }

    /// Returns the user agent this provider identifies itself with.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Look up a company's CIK number from its ticker symbol.
    ///
    /// Returns the CIK as a zero-padded 10-digit string.
    pub async fn get_cik(&self, ticker: &str) -> Result<String> {
        if ticker.is_empty() {
            return Err(FilingsError::InvalidParameter("Empty ticker".to_string()));
        }

        let ticker_upper = ticker.to_uppercase();

        let data: HashMap<String, CompanyTickerInfo> = self
            .get_json(COMPANY_TICKERS_URL)
            .await?
            .ok_or_else(|| {
                FilingsError::Network("Company tickers list not available".to_string())
            })?;

        for company in data.values() {
            if company.ticker.to_uppercase() == ticker_upper {
                let cik = format!("{:0>10}", company.cik_str);
                debug!("Found CIK {} for ticker {}", cik, ticker);
                return Ok(cik);
            }
        }

        Err(FilingsError::SymbolNotFound(ticker.to_string()))
    }

    /// Resolves a symbol to a CIK, accepting numeric CIKs as given.
    async fn resolve_cik(&self, symbol: &Symbol) -> Result<String> {
        let id = symbol.as_str();
        if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
            return Ok(format!("{id:0>10}"));
        }
        self.get_cik(id).await
    }

    /// Fetch company facts from SEC EDGAR.
    ///
    /// Returns `None` when EDGAR has no XBRL facts for the company.
    async fn fetch_company_facts(&self, cik: &str) -> Result<Option<CompanyFactsResponse>> {
        let cik_padded = format!("{:0>10}", cik);
        let url = format!(
            "{}/api/xbrl/companyfacts/CIK{}.json",
            EDGAR_BASE_URL, cik_padded
        );
        self.get_json(&url).await
    }

    /// GETs and decodes a JSON document, honouring the rate limit.
    ///
    /// A 404 is reported as `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        self.rate_limiter.lock().await.wait().await;

        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FilingsError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FilingsError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after: None,
            });
        }
        if !status.is_success() {
            return Err(FilingsError::Network(format!(
                "Failed to fetch {url}: HTTP {status}"
            )));
        }

        let body = response
            .json()
            .await
            .map_err(|e| FilingsError::Parse(format!("Failed to parse {url}: {e}")))?;

        Ok(Some(body))
    }
}

#[async_trait]
impl FilingsProvider for EdgarProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn latest_filing(
        &self,
        symbol: &Symbol,
        filing_type: FilingType,
    ) -> Result<Option<Box<dyn Filing>>> {
        let cik = self.resolve_cik(symbol).await?;

        let Some(facts) = self.fetch_company_facts(&cik).await? else {
            debug!(symbol = %symbol, cik = %cik, "No XBRL facts for company");
            return Ok(None);
        };

        let filing = EdgarFiling::from_facts(symbol.clone(), &facts, filing_type);
        if let Some(filing) = &filing {
            debug!(
                symbol = %symbol,
                accession = filing.accession(),
                filed = %filing.filed(),
                form = filing_type.form(),
                "Selected latest filing"
            );
        }

        Ok(filing.map(|filing| Box::new(filing) as Box<dyn Filing>))
    }
}

// =============================================================================
// SEC API Response Types
// =============================================================================

/// Company ticker information from SEC JSON.
#[derive(Debug, Deserialize)]
struct CompanyTickerInfo {
    /// CIK as a number (SEC returns this as an integer)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
}

/// Response from the SEC EDGAR Company Facts API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompanyFactsResponse {
    /// CIK number
    pub(crate) cik: u64,
    /// Entity name
    #[serde(default)]
    pub(crate) entity_name: String,
    /// Facts organized by taxonomy and tag
    pub(crate) facts: HashMap<String, HashMap<String, TagFacts>>,
}

/// Facts for a specific XBRL tag.
#[derive(Debug, Deserialize)]
pub(crate) struct TagFacts {
    /// Units (USD, shares, etc.) containing the actual fact values
    pub(crate) units: Option<HashMap<String, Vec<FactValue>>>,
}

/// A single fact value with metadata.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FactValue {
    /// Start date of the period (absent for instant facts)
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// End date of the period
    pub(crate) end: String,
    /// Value
    pub(crate) val: f64,
    /// Accession number
    #[serde(default)]
    pub(crate) accn: Option<String>,
    /// Form type
    #[serde(default)]
    pub(crate) form: Option<String>,
    /// Filed date
    #[serde(default)]
    pub(crate) filed: Option<String>,
}

/// Parses an EDGAR `YYYY-MM-DD` date.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let provider = EdgarProvider::new("Test/1.0 (test@example.com)");
        assert_eq!(provider.name(), "SEC EDGAR");
        assert_eq!(provider.user_agent(), "Test/1.0 (test@example.com)");
    }

    #[test]
    fn test_cik_padding() {
        let cik = "320193";
        let padded = format!("{:0>10}", cik);
        assert_eq!(padded, "0000320193");
        assert_eq!(padded.len(), 10);
    }

    #[tokio::test]
    async fn test_numeric_symbol_is_cik() {
        let provider = EdgarProvider::new("Test/1.0 (test@example.com)");
        let cik = provider.resolve_cik(&Symbol::new("320193")).await.unwrap();
        assert_eq!(cik, "0000320193");
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected() {
        let provider = EdgarProvider::new("Test/1.0 (test@example.com)");
        assert!(matches!(
            provider.get_cik("").await,
            Err(FilingsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2023-09-30"),
            NaiveDate::from_ymd_opt(2023, 9, 30)
        );
        assert_eq!(parse_date("09/30/2023"), None);
    }
}
