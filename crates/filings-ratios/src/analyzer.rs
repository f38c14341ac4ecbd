//! Period-by-period ratio analysis over statement tables.

use filings_core::{FilingsError, RatioKind, RatioResult, Result};
use filings_table::StatementTable;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Ratio analyzer over a balance sheet, an income statement and an optional
/// cash flow statement.
///
/// The analyzer owns copies of its inputs. Unless a period set is supplied
/// with [`with_periods`](Self::with_periods), it works on the periods present
/// in both the balance sheet and the income statement, in lexicographic order.
///
/// Every ratio checks its required columns once, up front, and fails with
/// [`FilingsError::Schema`] if any are missing. Periods that are absent from a
/// source table or whose cells are not numeric are skipped. A zero denominator
/// yields `f64::INFINITY`.
#[derive(Debug, Clone)]
pub struct RatioAnalyzer {
    balance_sheet: StatementTable,
    income_statement: StatementTable,
    cash_flow: Option<StatementTable>,
    periods: Vec<String>,
}

/// Every ratio the available statements support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioReport {
    /// Current ratio per period.
    pub current_ratio: Vec<RatioResult>,
    /// Return on assets per period.
    pub return_on_assets: Vec<RatioResult>,
    /// Operating cash flow ratio per period, when a cash flow statement exists.
    pub operating_cash_flow_ratio: Option<Vec<RatioResult>>,
}

impl RatioAnalyzer {
    /// Creates an analyzer from period-indexed tables.
    #[must_use]
    pub fn new(
        balance_sheet: &StatementTable,
        income_statement: &StatementTable,
        cash_flow: Option<&StatementTable>,
    ) -> Self {
        let bs_periods: BTreeSet<&str> =
            balance_sheet.periods().iter().map(String::as_str).collect();
        let is_periods: BTreeSet<&str> =
            income_statement.periods().iter().map(String::as_str).collect();
        let periods = bs_periods
            .intersection(&is_periods)
            .map(|period| period.to_string())
            .collect();

        Self {
            balance_sheet: balance_sheet.clone(),
            income_statement: income_statement.clone(),
            cash_flow: cash_flow.cloned(),
            periods,
        }
    }

    /// Creates an analyzer from raw frames, promoting any `period` column to
    /// the row key.
    pub fn from_frames(
        balance_sheet: &DataFrame,
        income_statement: &DataFrame,
        cash_flow: Option<&DataFrame>,
    ) -> Result<Self> {
        let balance_sheet = StatementTable::new(balance_sheet.clone())?;
        let income_statement = StatementTable::new(income_statement.clone())?;
        let cash_flow = cash_flow
            .map(|df| StatementTable::new(df.clone()))
            .transpose()?;

        Ok(Self::new(&balance_sheet, &income_statement, cash_flow.as_ref()))
    }

    /// Replaces the working period set.
    ///
    /// Periods are used as given; each is still checked against every source
    /// table before use.
    #[must_use]
    pub fn with_periods<I, S>(mut self, periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.periods = periods.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the working period set.
    #[must_use]
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Returns the balance sheet.
    #[must_use]
    pub const fn balance_sheet(&self) -> &StatementTable {
        &self.balance_sheet
    }

    /// Returns the income statement.
    #[must_use]
    pub const fn income_statement(&self) -> &StatementTable {
        &self.income_statement
    }

    /// Returns the cash flow statement, if one was supplied.
    #[must_use]
    pub const fn cash_flow(&self) -> Option<&StatementTable> {
        self.cash_flow.as_ref()
    }

    /// Current ratio: current assets / current liabilities.
    pub fn current_ratio(&self) -> Result<Vec<RatioResult>> {
        self.balance_sheet
            .require_columns(&["current_assets", "current_liabilities"], "balance_sheet")?;

        Ok(self.compute(
            RatioKind::CurrentRatio,
            (&self.balance_sheet, "current_assets"),
            (&self.balance_sheet, "current_liabilities"),
        ))
    }

    /// Return on assets: net income / total assets.
    pub fn return_on_assets(&self) -> Result<Vec<RatioResult>> {
        self.income_statement
            .require_columns(&["net_income"], "income_statement")?;
        self.balance_sheet
            .require_columns(&["total_assets"], "balance_sheet")?;

        Ok(self.compute(
            RatioKind::ReturnOnAssets,
            (&self.income_statement, "net_income"),
            (&self.balance_sheet, "total_assets"),
        ))
    }

    /// Operating cash flow ratio: operating cash flow / current liabilities.
    ///
    /// Fails with [`FilingsError::StatementUnavailable`] when the analyzer has
    /// no cash flow statement.
    pub fn operating_cash_flow_ratio(&self) -> Result<Vec<RatioResult>> {
        let cash_flow = self
            .cash_flow
            .as_ref()
            .ok_or_else(|| FilingsError::StatementUnavailable("cash_flow".to_string()))?;
        cash_flow.require_columns(&["operating_cash_flow"], "cash_flow")?;
        self.balance_sheet
            .require_columns(&["current_liabilities"], "balance_sheet")?;

        Ok(self.compute(
            RatioKind::OperatingCashFlowRatio,
            (cash_flow, "operating_cash_flow"),
            (&self.balance_sheet, "current_liabilities"),
        ))
    }

    /// Computes every ratio the available statements support.
    ///
    /// The operating cash flow ratio is left out when there is no cash flow
    /// statement or it has no `operating_cash_flow` column.
    pub fn report(&self) -> Result<RatioReport> {
        let operating_cash_flow_ratio = match &self.cash_flow {
            Some(cf) if cf.has_column("operating_cash_flow") => {
                Some(self.operating_cash_flow_ratio()?)
            }
            _ => None,
        };

        Ok(RatioReport {
            current_ratio: self.current_ratio()?,
            return_on_assets: self.return_on_assets()?,
            operating_cash_flow_ratio,
        })
    }

    fn compute(
        &self,
        kind: RatioKind,
        (num_table, num_column): (&StatementTable, &str),
        (den_table, den_column): (&StatementTable, &str),
    ) -> Vec<RatioResult> {
        let mut results = Vec::with_capacity(self.periods.len());

        for period in &self.periods {
            if !num_table.contains_period(period) || !den_table.contains_period(period) {
                debug!(ratio = kind.name(), period = %period, "Period missing, skipping");
                continue;
            }

            let (Some(numerator), Some(denominator)) = (
                num_table.value(period, num_column),
                den_table.value(period, den_column),
            ) else {
                debug!(ratio = kind.name(), period = %period, "Non-numeric value, skipping");
                continue;
            };

            let value = if denominator == 0.0 {
                f64::INFINITY
            } else {
                numerator / denominator
            };
            results.push(RatioResult::new(kind, period.as_str(), value));
        }

        results
    }
}
