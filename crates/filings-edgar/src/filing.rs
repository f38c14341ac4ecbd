//! Statement extraction from a single EDGAR accession.

use chrono::NaiveDate;
use filings_core::{Filing, FilingType, FilingsError, Result, StatementValue, Symbol};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use crate::{CompanyFactsResponse, FactValue, parse_date};

/// Taxonomies searched for line items, in priority order.
const TAXONOMIES: [&str; 2] = ["us-gaap", "dei"];

/// Units tried for each tag, in priority order.
const UNITS: [&str; 4] = ["USD", "USD/shares", "shares", "pure"];

/// A statement column and the XBRL tags that may report it.
///
/// Tags are tried in order and the first one with facts in the filing wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    /// Column name in the statement frame
    pub column: &'static str,
    /// Candidate XBRL tags
    pub tags: &'static [&'static str],
}

const fn item(column: &'static str, tags: &'static [&'static str]) -> LineItem {
    LineItem { column, tags }
}

/// Balance sheet line items.
pub const BALANCE_SHEET: &[LineItem] = &[
    item("total_assets", &["Assets"]),
    item("current_assets", &["AssetsCurrent"]),
    item(
        "cash_and_equivalents",
        &[
            "CashAndCashEquivalentsAtCarryingValue",
            "Cash",
            "CashCashEquivalentsAndShortTermInvestments",
        ],
    ),
    item("inventory", &["InventoryNet", "Inventories"]),
    item(
        "accounts_receivable",
        &[
            "AccountsReceivableNetCurrent",
            "AccountsReceivableNet",
            "ReceivablesNetCurrent",
        ],
    ),
    item("total_liabilities", &["Liabilities"]),
    item("current_liabilities", &["LiabilitiesCurrent"]),
    item(
        "long_term_debt",
        &[
            "LongTermDebt",
            "LongTermDebtNoncurrent",
            "LongTermDebtAndCapitalLeaseObligations",
        ],
    ),
    item(
        "accounts_payable",
        &[
            "AccountsPayableCurrent",
            "AccountsPayableAndAccruedLiabilitiesCurrent",
        ],
    ),
    item(
        "stockholders_equity",
        &[
            "StockholdersEquity",
            "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
        ],
    ),
];

/// Income statement line items.
pub const INCOME_STATEMENT: &[LineItem] = &[
    item(
        "revenue",
        &[
            "Revenues",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "SalesRevenueNet",
            "RevenueFromContractWithCustomerIncludingAssessedTax",
        ],
    ),
    item(
        "cost_of_revenue",
        &["CostOfRevenue", "CostOfGoodsAndServicesSold", "CostOfGoodsSold"],
    ),
    item("gross_profit", &["GrossProfit"]),
    item("operating_income", &["OperatingIncomeLoss"]),
    item(
        "net_income",
        &[
            "NetIncomeLoss",
            "ProfitLoss",
            "NetIncomeLossAvailableToCommonStockholdersBasic",
        ],
    ),
    item("eps_basic", &["EarningsPerShareBasic"]),
    item("eps_diluted", &["EarningsPerShareDiluted"]),
    item("interest_expense", &["InterestExpense"]),
];

/// Cash flow statement line items.
pub const CASH_FLOW: &[LineItem] = &[
    item(
        "operating_cash_flow",
        &[
            "NetCashProvidedByUsedInOperatingActivities",
            "CashProvidedByUsedInOperatingActivities",
        ],
    ),
    item(
        "investing_cash_flow",
        &["NetCashProvidedByUsedInInvestingActivities"],
    ),
    item(
        "financing_cash_flow",
        &["NetCashProvidedByUsedInFinancingActivities"],
    ),
    item(
        "capital_expenditures",
        &[
            "PaymentsToAcquirePropertyPlantAndEquipment",
            "PaymentsForCapitalImprovements",
        ],
    ),
    item(
        "dividends_paid",
        &["PaymentsOfDividends", "PaymentsOfDividendsCommonStock"],
    ),
];

/// A fact reported in the selected accession.
#[derive(Debug, Clone)]
struct ReportedFact {
    start: Option<NaiveDate>,
    end: NaiveDate,
    value: f64,
}

impl ReportedFact {
    /// Days covered; instant facts span zero days.
    fn span(&self) -> i64 {
        self.start.map_or(0, |start| (self.end - start).num_days())
    }
}

/// One 10-K or 10-Q filing, reconstructed from EDGAR company facts.
///
/// Only the facts reported under the filing's accession number are kept, so
/// comparative periods presented in the filing appear as extra rows.
#[derive(Debug, Clone)]
pub struct EdgarFiling {
    symbol: Symbol,
    cik: u64,
    entity_name: String,
    accession: String,
    filed: NaiveDate,
    filing_type: FilingType,
    /// Facts keyed by XBRL tag, already narrowed to one unit.
    facts: HashMap<String, Vec<ReportedFact>>,
}

impl EdgarFiling {
    /// Selects the latest filing of `filing_type` and collects its facts.
    ///
    /// Returns `None` when the company has no fact reported on that form.
    pub(crate) fn from_facts(
        symbol: Symbol,
        response: &CompanyFactsResponse,
        filing_type: FilingType,
    ) -> Option<Self> {
        let (accession, filed) = latest_accession(response, filing_type)?;

        let mut facts = HashMap::new();
        for taxonomy in TAXONOMIES {
            let Some(tags) = response.facts.get(taxonomy) else {
                continue;
            };
            for (tag, tag_facts) in tags {
                if facts.contains_key(tag) {
                    continue;
                }
                let Some(units) = &tag_facts.units else {
                    continue;
                };
                let reported = UNITS
                    .iter()
                    .filter_map(|unit| units.get(*unit))
                    .map(|values| reported_in(values, &accession))
                    .find(|reported| !reported.is_empty());
                if let Some(reported) = reported {
                    facts.insert(tag.clone(), reported);
                }
            }
        }

        Some(Self {
            symbol,
            cik: response.cik,
            entity_name: response.entity_name.clone(),
            accession,
            filed,
            filing_type,
            facts,
        })
    }

    /// Returns the symbol the filing was requested for.
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the company's CIK.
    pub const fn cik(&self) -> u64 {
        self.cik
    }

    /// Returns the registrant name.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Returns the accession number.
    pub fn accession(&self) -> &str {
        &self.accession
    }

    /// Returns the date the filing was filed.
    pub const fn filed(&self) -> NaiveDate {
        self.filed
    }

    /// Builds one statement frame from `items`.
    ///
    /// Rows are the fact end dates in ascending order. Line items the filing
    /// does not report are left out.
    fn statement(&self, items: &[LineItem], label: &str) -> Result<DataFrame> {
        let mut periods = BTreeSet::new();
        let mut columns = Vec::new();

        for line in items {
            let Some(facts) = line.tags.iter().find_map(|tag| self.facts.get(*tag)) else {
                debug!(label, column = line.column, "Line item not reported");
                continue;
            };

            let mut by_end: BTreeMap<NaiveDate, &ReportedFact> = BTreeMap::new();
            for fact in facts {
                by_end
                    .entry(fact.end)
                    .and_modify(|kept| {
                        if fact.span() < kept.span() {
                            *kept = fact;
                        }
                    })
                    .or_insert(fact);
            }

            periods.extend(by_end.keys().copied());
            columns.push((line.column, by_end));
        }

        if columns.is_empty() {
            return Err(FilingsError::StatementUnavailable(label.to_string()));
        }

        let period_keys: Vec<String> = periods
            .iter()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .collect();

        let mut frame = Vec::with_capacity(columns.len() + 1);
        frame.push(Column::new("period".into(), period_keys));
        for (name, by_end) in columns {
            let values: Vec<Option<f64>> = periods
                .iter()
                .map(|date| by_end.get(date).map(|fact| fact.value))
                .collect();
            frame.push(Column::new(name.into(), values));
        }

        debug!(
            label,
            accession = %self.accession,
            rows = periods.len(),
            "Built statement"
        );
        Ok(DataFrame::new(frame)?)
    }
}

impl Filing for EdgarFiling {
    fn filing_type(&self) -> FilingType {
        self.filing_type
    }

    fn balance_sheet(&self) -> Result<StatementValue> {
        Ok(StatementValue::Table(
            self.statement(BALANCE_SHEET, "balance_sheet")?,
        ))
    }

    fn income_statement(&self) -> Result<StatementValue> {
        Ok(StatementValue::Table(
            self.statement(INCOME_STATEMENT, "income_statement")?,
        ))
    }

    fn cash_flow(&self) -> Result<Option<StatementValue>> {
        Ok(Some(StatementValue::Table(
            self.statement(CASH_FLOW, "cash_flow")?,
        )))
    }
}

/// Finds the accession with the latest filed date on `filing_type`'s form.
///
/// Ties on the filed date go to the greater accession number.
fn latest_accession(
    response: &CompanyFactsResponse,
    filing_type: FilingType,
) -> Option<(String, NaiveDate)> {
    let form = filing_type.form();

    response
        .facts
        .values()
        .flat_map(HashMap::values)
        .filter_map(|tag_facts| tag_facts.units.as_ref())
        .flat_map(HashMap::values)
        .flatten()
        .filter(|fact| fact.form.as_deref() == Some(form))
        .filter_map(|fact| {
            let accession = fact.accn.as_ref()?;
            let filed = parse_date(fact.filed.as_deref()?)?;
            Some((filed, accession))
        })
        .max()
        .map(|(filed, accession)| (accession.clone(), filed))
}

fn reported_in(values: &[FactValue], accession: &str) -> Vec<ReportedFact> {
    values
        .iter()
        .filter(|fact| fact.accn.as_deref() == Some(accession))
        .filter_map(|fact| {
            Some(ReportedFact {
                start: fact.start.as_deref().and_then(parse_date),
                end: parse_date(&fact.end)?,
                value: fact.val,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use filings_table::coerce;

    const FACTS: &str = r#"{
        "cik": 320193,
        "entityName": "Apple Inc.",
        "facts": {
            "dei": {
                "EntityCommonStockSharesOutstanding": {
                    "units": {"shares": [
                        {"end": "2023-10-20", "val": 15550061000, "accn": "0000320193-23-000106", "form": "10-K", "filed": "2023-11-03"}
                    ]}
                }
            },
            "us-gaap": {
                "Assets": {
                    "units": {"USD": [
                        {"end": "2022-09-24", "val": 352755000000, "accn": "0000320193-22-000108", "form": "10-K", "filed": "2022-10-28"},
                        {"end": "2022-09-24", "val": 352755000000, "accn": "0000320193-23-000106", "form": "10-K", "filed": "2023-11-03"},
                        {"end": "2023-09-30", "val": 352583000000, "accn": "0000320193-23-000106", "form": "10-K", "filed": "2023-11-03"},
                        {"end": "2023-12-30", "val": 353514000000, "accn": "0000320193-24-000006", "form": "10-Q", "filed": "2024-02-02"}
                    ]}
                },
                "AssetsCurrent": {
                    "units": {"USD": [
                        {"end": "2022-09-24", "val": 135405000000, "accn": "0000320193-23-000106", "form": "10-K", "filed": "2023-11-03"},
                        {"end": "2023-09-30", "val": 143566000000, "accn": "0000320193-23-000106", "form": "10-K", "filed": "2023-11-03"}
                    ]}
                },
                "LiabilitiesCurrent": {
                    "units": {"USD": [
                        {"end": "2022-09-24", "val": 153982000000, "accn": "0000320193-23-000106", "form": "10-K", "filed": "2023-11-03"},
                        {"end": "2023-09-30", "val": 145308000000, "accn": "0000320193-23-000106", "form": "10-K", "filed": "2023-11-03"}
                    ]}
                },
                "NetIncomeLoss": {
                    "units": {"USD": [
                        {"start": "2021-09-26", "end": "2022-09-24", "val": 99803000000, "accn": "0000320193-23-000106", "form": "10-K", "filed": "2023-11-03"},
                        {"start": "2022-09-25", "end": "2023-09-30", "val": 96995000000, "accn": "0000320193-23-000106", "form": "10-K", "filed": "2023-11-03"},
                        {"start": "2023-07-02", "end": "2023-12-30", "val": 56872000000, "accn": "0000320193-24-000006", "form": "10-Q", "filed": "2024-02-02"},
                        {"start": "2023-10-01", "end": "2023-12-30", "val": 33916000000, "accn": "0000320193-24-000006", "form": "10-Q", "filed": "2024-02-02"}
                    ]}
                },
                "EarningsPerShareBasic": {
                    "units": {"USD/shares": [
                        {"start": "2022-09-25", "end": "2023-09-30", "val": 6.16, "accn": "0000320193-23-000106", "form": "10-K", "filed": "2023-11-03"}
                    ]}
                }
            }
        }
    }"#;

    fn response() -> CompanyFactsResponse {
        serde_json::from_str(FACTS).unwrap()
    }

    fn annual() -> EdgarFiling {
        EdgarFiling::from_facts(Symbol::new("aapl"), &response(), FilingType::Annual).unwrap()
    }

    #[test]
    fn test_latest_accession_by_form() {
        let response = response();

        let (accession, filed) = latest_accession(&response, FilingType::Annual).unwrap();
        assert_eq!(accession, "0000320193-23-000106");
        assert_eq!(filed, NaiveDate::from_ymd_opt(2023, 11, 3).unwrap());

        let (accession, _) = latest_accession(&response, FilingType::Quarterly).unwrap();
        assert_eq!(accession, "0000320193-24-000006");
    }

    #[test]
    fn test_filing_metadata() {
        let filing = annual();
        assert_eq!(filing.symbol().as_str(), "AAPL");
        assert_eq!(filing.cik(), 320193);
        assert_eq!(filing.entity_name(), "Apple Inc.");
        assert_eq!(filing.filing_type(), FilingType::Annual);
    }

    #[test]
    fn test_balance_sheet_rows_from_accession() {
        let filing = annual();
        let table = coerce(filing.balance_sheet().unwrap(), "balance_sheet").unwrap();

        assert_eq!(table.periods(), ["2022-09-24", "2023-09-30"]);
        assert_eq!(table.value("2023-09-30", "total_assets"), Some(352583000000.0));
        assert_eq!(table.value("2022-09-24", "current_assets"), Some(135405000000.0));
        assert!(!table.has_column("inventory"));
    }

    #[test]
    fn test_income_statement_durations() {
        let filing = annual();
        let table = coerce(filing.income_statement().unwrap(), "income_statement").unwrap();

        assert_eq!(table.value("2023-09-30", "net_income"), Some(96995000000.0));
        assert_eq!(table.value("2022-09-24", "net_income"), Some(99803000000.0));
        assert_eq!(table.value("2023-09-30", "eps_basic"), Some(6.16));
        assert_eq!(table.value("2022-09-24", "eps_basic"), None);
    }

    #[test]
    fn test_missing_statement_unavailable() {
        let filing = annual();
        assert!(matches!(
            filing.cash_flow(),
            Err(FilingsError::StatementUnavailable(label)) if label == "cash_flow"
        ));

        let statements = filing.statements().unwrap();
        assert!(statements.cash_flow.is_none());
    }

    #[test]
    fn test_quarter_preferred_over_year_to_date() {
        let filing =
            EdgarFiling::from_facts(Symbol::new("AAPL"), &response(), FilingType::Quarterly)
                .unwrap();
        let table = coerce(filing.income_statement().unwrap(), "income_statement").unwrap();
        assert_eq!(table.periods(), ["2023-12-30"]);
        assert_eq!(table.value("2023-12-30", "net_income"), Some(33916000000.0));
    }

    #[test]
    fn test_no_matching_form() {
        let mut response = response();
        response.facts.remove("us-gaap");
        let filing = EdgarFiling::from_facts(Symbol::new("AAPL"), &response, FilingType::Quarterly);
        assert!(filing.is_none());
    }
}
