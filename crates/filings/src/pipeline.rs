//! Statement pipeline: provider fallback, coercion and ratio analysis.

use std::sync::Arc;

use tracing::{debug, warn};

use filings_core::{Filing, FilingType, FilingsError, FilingsProvider, Result, Symbol};
use filings_ratios::{RatioAnalyzer, RatioReport};
use filings_table::{StatementTable, coerce};

/// Pipeline from a company symbol to normalized statements and ratios.
///
/// Providers are tried in registration order until one has a filing of the
/// requested type.
///
/// # Example
///
/// ```rust,ignore
/// use filings::{FilingType, StatementPipeline, Symbol};
///
/// let pipeline = StatementPipeline::new()
///     .with_edgar("MyApp/1.0 (contact@example.com)");
///
/// let report = pipeline.analyze(&Symbol::new("AAPL"), FilingType::Annual).await?;
/// for ratio in &report.current_ratio {
///     println!("{} {}: {:.2}", ratio.name(), ratio.period, ratio.value);
/// }
/// ```
#[derive(Default)]
pub struct StatementPipeline {
    providers: Vec<Arc<dyn FilingsProvider>>,
}

impl std::fmt::Debug for StatementPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementPipeline")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The three statements of one filing as period-indexed tables.
#[derive(Debug, Clone)]
pub struct PreparedStatements {
    /// Form type of the filing the statements came from.
    pub filing_type: FilingType,
    /// Balance sheet.
    pub balance_sheet: StatementTable,
    /// Income statement.
    pub income_statement: StatementTable,
    /// Cash flow statement, when the filing provides a usable one.
    pub cash_flow: Option<StatementTable>,
}

impl PreparedStatements {
    /// Creates a ratio analyzer over these statements.
    #[must_use]
    pub fn analyzer(&self) -> RatioAnalyzer {
        RatioAnalyzer::new(
            &self.balance_sheet,
            &self.income_statement,
            self.cash_flow.as_ref(),
        )
    }
}

impl StatementPipeline {
    /// Create a new pipeline with no providers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filings provider.
    pub fn register(&mut self, provider: Arc<dyn FilingsProvider>) {
        debug!(provider = provider.name(), "Registering filings provider");
        self.providers.push(provider);
    }

    /// Add a provider, builder style.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn FilingsProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Add the SEC EDGAR provider.
    #[cfg(feature = "edgar")]
    #[must_use]
    pub fn with_edgar(self, user_agent: &str) -> Self {
        self.with_provider(Arc::new(filings_edgar::EdgarProvider::new(user_agent)))
    }

    /// Returns the names of the registered providers, in order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Finds the latest filing, trying providers in order.
    ///
    /// A provider with no filing or a failing provider moves the search on.
    /// When no provider has the filing the result is the last provider error,
    /// or [`FilingsError::NotFound`] if none failed.
    pub async fn latest_filing(
        &self,
        symbol: &Symbol,
        filing_type: FilingType,
    ) -> Result<Box<dyn Filing>> {
        if self.providers.is_empty() {
            return Err(FilingsError::ProviderNotConfigured(
                "No filings providers registered".to_string(),
            ));
        }

        let mut last_error = None;
        for provider in &self.providers {
            debug!(
                provider = provider.name(),
                symbol = %symbol,
                form = filing_type.form(),
                "Fetching latest filing"
            );

            match provider.latest_filing(symbol, filing_type).await {
                Ok(Some(filing)) => return Ok(filing),
                Ok(None) => {
                    debug!(
                        provider = provider.name(),
                        symbol = %symbol,
                        "Provider has no filing, trying next"
                    );
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FilingsError::NotFound {
            symbol: symbol.to_string(),
            form: filing_type.form().to_string(),
        }))
    }

    /// Fetches the latest filing and coerces its statements into tables.
    ///
    /// A cash flow statement that cannot be coerced is dropped with a warning.
    pub async fn fetch_statements(
        &self,
        symbol: &Symbol,
        filing_type: FilingType,
    ) -> Result<PreparedStatements> {
        let filing = self.latest_filing(symbol, filing_type).await?;
        let statements = filing.statements()?;

        let balance_sheet = coerce(statements.balance_sheet, "balance_sheet")?;
        let income_statement = coerce(statements.income_statement, "income_statement")?;
        let cash_flow = match statements.cash_flow.map(|value| coerce(value, "cash_flow")) {
            Some(Ok(table)) => Some(table),
            Some(Err(e)) => {
                warn!(
                    symbol = %symbol,
                    error = %e,
                    "Cash flow statement unusable, continuing without it"
                );
                None
            }
            None => None,
        };

        debug!(
            symbol = %symbol,
            form = filing_type.form(),
            balance_sheet_rows = balance_sheet.height(),
            income_statement_rows = income_statement.height(),
            cash_flow = cash_flow.is_some(),
            "Prepared statements"
        );

        Ok(PreparedStatements {
            filing_type: filing.filing_type(),
            balance_sheet,
            income_statement,
            cash_flow,
        })
    }

    /// Fetches the latest filing and computes every supported ratio.
    pub async fn analyze(&self, symbol: &Symbol, filing_type: FilingType) -> Result<RatioReport> {
        self.fetch_statements(symbol, filing_type)
            .await?
            .analyzer()
            .report()
    }
}
