// src/pipeline/finalize.rs - Analytic row assembly and column naming
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::demographics::{demographic_columns, DemographicVector};
use crate::models::match_result::MatchResult;
use crate::models::records::{FinancePayload, IdeologyRecord};
use crate::pipeline::state_join::DemographicsTable;
use crate::utils::constants::NO_PARTY_AFFILIATION;

static COLUMN_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['();"]"#).expect("valid column punctuation regex"));

/// Columns ahead of the demographic block, in output order.
pub const ANALYTIC_FIXED_COLUMNS: [&str; 24] = [
    "representative",
    "state_name",
    "district_code",
    "party",
    "congress",
    "year_range",
    "born",
    "age",
    "nominate_dim1",
    "nominate_dim2",
    "nominate_number_of_votes",
    "representative_voteview",
    "representative_fec",
    "closeness",
    "fec_year_range",
    "resolution_failed",
    "running_as",
    "receipts",
    "contributions_from_individuals",
    "contributions_from_pacs",
    "contributions_and_loans_from_candidate",
    "disbursements",
    "cash_on_hand",
    "debts",
];

/// "Believe in God; don't know" -> "believe_in_god_dont_know".
pub fn snake_column_name(name: &str) -> String {
    COLUMN_PUNCTUATION
        .replace_all(&name.trim().to_lowercase(), "")
        .replace(' ', "_")
        .replace('/', "_")
}

pub fn analytic_headers() -> Vec<String> {
    ANALYTIC_FIXED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(demographic_columns().map(snake_column_name))
        .collect()
}

/// One row of the fused analytic table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticRow {
    pub representative: String,
    pub state_name: String,
    pub district_code: i32,
    pub party: String,
    pub congress: i32,
    pub year_range: String,
    pub born: Option<i32>,
    pub age: Option<i32>,
    pub nominate_dim1: f64,
    pub nominate_dim2: Option<f64>,
    pub nominate_number_of_votes: f64,
    pub representative_voteview: String,
    pub representative_fec: Option<String>,
    pub closeness: Option<f64>,
    pub fec_year_range: Option<String>,
    pub resolution_failed: bool,
    pub running_as: Option<String>,
    pub receipts: f64,
    pub contributions_from_individuals: f64,
    pub contributions_from_pacs: f64,
    pub contributions_and_loans_from_candidate: f64,
    pub disbursements: f64,
    pub cash_on_hand: f64,
    pub debts: f64,
    pub demographics: DemographicVector,
}

impl AnalyticRow {
    /// Unmatched rows keep their ideology fields; party falls back to
    /// "No Party Affiliation" and finance figures to 0.
    pub fn from_match(result: &MatchResult<IdeologyRecord, FinancePayload>, demographics: DemographicVector) -> Self {
        let source = &result.source;
        let payload = result.payload.as_ref();
        let money = |f: fn(&FinancePayload) -> f64| payload.map(f).unwrap_or(0.0);

        Self {
            representative: source.representative.clone(),
            state_name: source.state_name.clone(),
            district_code: source.district_code,
            party: payload
                .map(|p| p.party.clone())
                .unwrap_or_else(|| NO_PARTY_AFFILIATION.to_string()),
            congress: source.congress,
            year_range: source.year_range.to_string(),
            born: source.born,
            age: source.age,
            nominate_dim1: source.nominate_dim1,
            nominate_dim2: source.nominate_dim2,
            nominate_number_of_votes: source.nominate_number_of_votes,
            representative_voteview: source.representative.clone(),
            representative_fec: result.matched_representative.clone(),
            closeness: result.closeness,
            fec_year_range: result.matched_period.clone(),
            resolution_failed: result.failed,
            running_as: payload.map(|p| p.running_as.clone()),
            receipts: money(|p| p.receipts),
            contributions_from_individuals: money(|p| p.contributions_from_individuals),
            contributions_from_pacs: money(|p| p.contributions_from_pacs),
            contributions_and_loans_from_candidate: money(|p| p.contributions_and_loans_from_candidate),
            disbursements: money(|p| p.disbursements),
            cash_on_hand: money(|p| p.cash_on_hand),
            debts: money(|p| p.debts),
            demographics,
        }
    }

    /// Cells in [`analytic_headers`] order; missing values are empty.
    pub fn to_record(&self) -> Vec<String> {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        let mut record = vec![
            self.representative.clone(),
            self.state_name.clone(),
            self.district_code.to_string(),
            self.party.clone(),
            self.congress.to_string(),
            self.year_range.clone(),
            opt(&self.born),
            opt(&self.age),
            self.nominate_dim1.to_string(),
            opt(&self.nominate_dim2),
            self.nominate_number_of_votes.to_string(),
            self.representative_voteview.clone(),
            opt(&self.representative_fec),
            opt(&self.closeness),
            opt(&self.fec_year_range),
            self.resolution_failed.to_string(),
            opt(&self.running_as),
            self.receipts.to_string(),
            self.contributions_from_individuals.to_string(),
            self.contributions_from_pacs.to_string(),
            self.contributions_and_loans_from_candidate.to_string(),
            self.disbursements.to_string(),
            self.cash_on_hand.to_string(),
            self.debts.to_string(),
        ];
        record.extend(self.demographics.iter().map(opt));
        record
    }
}

/// One analytic row per fused row, demographics keyed on the ideology session.
pub fn assemble_rows(
    results: &[MatchResult<IdeologyRecord, FinancePayload>],
    demographics: &DemographicsTable,
) -> Vec<AnalyticRow> {
    results
        .iter()
        .map(|r| {
            let vector = demographics.for_session(&r.source.state_name, r.source.year_range);
            AnalyticRow::from_match(r, vector)
        })
        .collect()
}
