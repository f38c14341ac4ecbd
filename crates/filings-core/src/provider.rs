//! Provider traits for fetching filings.
//!
//! - [`FilingsProvider`] - Looks up a company's latest periodic filing
//! - [`Filing`] - One filing, able to hand out its financial statements

use async_trait::async_trait;
use std::fmt::Debug;
use tracing::warn;

use crate::{
    error::Result,
    form::FilingType,
    statement::{FilingStatements, StatementValue},
    types::Symbol,
};

/// Provider of regulatory filings.
#[async_trait]
pub trait FilingsProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Fetches the latest filing of the given type for a company.
    ///
    /// Returns `Ok(None)` when the company has no filing of that type.
    async fn latest_filing(
        &self,
        symbol: &Symbol,
        filing_type: FilingType,
    ) -> Result<Option<Box<dyn Filing>>>;
}

/// A single regulatory filing.
pub trait Filing: Send + Sync + Debug {
    /// The kind of report this filing is.
    fn filing_type(&self) -> FilingType;

    /// Extracts the balance sheet.
    fn balance_sheet(&self) -> Result<StatementValue>;

    /// Extracts the income statement.
    fn income_statement(&self) -> Result<StatementValue>;

    /// Extracts the cash flow statement.
    ///
    /// `Ok(None)` means the filing has no cash flow statement.
    fn cash_flow(&self) -> Result<Option<StatementValue>>;

    /// Extracts all three statements.
    ///
    /// The balance sheet and income statement are required. A failing cash
    /// flow extraction degrades to `None` so the other two are still usable.
    fn statements(&self) -> Result<FilingStatements> {
        let balance_sheet = self.balance_sheet()?;
        let income_statement = self.income_statement()?;
        let cash_flow = match self.cash_flow() {
            Ok(cash_flow) => cash_flow,
            Err(e) => {
                warn!(
                    form = self.filing_type().form(),
                    error = %e,
                    "Cash flow statement unavailable"
                );
                None
            }
        };

        Ok(FilingStatements {
            balance_sheet,
            income_statement,
            cash_flow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilingsError;
    use serde_json::json;

    #[derive(Debug)]
    struct BrokenCashFlow;

    impl Filing for BrokenCashFlow {
        fn filing_type(&self) -> FilingType {
            FilingType::Quarterly
        }

        fn balance_sheet(&self) -> Result<StatementValue> {
            Ok(StatementValue::Structured(json!({"period": ["2024Q1"]})))
        }

        fn income_statement(&self) -> Result<StatementValue> {
            Ok(StatementValue::Structured(json!({"period": ["2024Q1"]})))
        }

        fn cash_flow(&self) -> Result<Option<StatementValue>> {
            Err(FilingsError::StatementUnavailable("cash_flow".to_string()))
        }
    }

    #[derive(Debug)]
    struct NoBalanceSheet;

    impl Filing for NoBalanceSheet {
        fn filing_type(&self) -> FilingType {
            FilingType::Annual
        }

        fn balance_sheet(&self) -> Result<StatementValue> {
            Err(FilingsError::StatementUnavailable("balance_sheet".to_string()))
        }

        fn income_statement(&self) -> Result<StatementValue> {
            Ok(StatementValue::Structured(json!([])))
        }

        fn cash_flow(&self) -> Result<Option<StatementValue>> {
            Ok(None)
        }
    }

    #[test]
    fn test_cash_flow_failure_degrades() {
        let statements = BrokenCashFlow.statements().unwrap();
        assert!(statements.cash_flow.is_none());
    }

    #[test]
    fn test_balance_sheet_failure_propagates() {
        assert!(matches!(
            NoBalanceSheet.statements(),
            Err(FilingsError::StatementUnavailable(label)) if label == "balance_sheet"
        ));
    }
}
