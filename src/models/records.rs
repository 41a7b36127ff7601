// src/models/records.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::{FIRST_CONGRESS, FIRST_CONGRESS_START_YEAR};

/// The four coordinates every resolvable record carries.
pub trait MatchKey {
    /// Free-text name; `None` when the upstream row had no name.
    fn representative(&self) -> Option<&str>;
    fn congress(&self) -> i32;
    fn state_name(&self) -> &str;
    fn district_code(&self) -> i32;
}

/// A record from the dataset being matched against. The payload is the fixed set of
/// target-only fields copied onto a source row when a match is accepted.
pub trait TargetRecord: MatchKey {
    type Payload: Clone + Send + Sync + 'static;

    /// Names of the payload fields, in output order.
    const PAYLOAD_FIELDS: &'static [&'static str];

    fn payload(&self) -> Self::Payload;

    /// Label of the period this record was filed under, e.g. "2007-2009".
    fn period_label(&self) -> String;
}

/// Calendar span of a congress or a filing cycle, rendered as "2007-2009".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Years of a numbered congress: the 101st ran 1989-1991.
    pub fn for_congress(congress: i32) -> Self {
        let start = FIRST_CONGRESS_START_YEAR + (congress - FIRST_CONGRESS) * 2;
        Self::new(start, start + 2)
    }

    /// FEC files are named after the election year that closes the cycle.
    pub fn for_filing_year(year: i32) -> Self {
        Self::new(year - 1, year + 1)
    }

    /// Congress whose session opens in `self.start`.
    pub fn congress(&self) -> i32 {
        FIRST_CONGRESS + (self.start - FIRST_CONGRESS_START_YEAR).div_euclid(2)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (start, end) = s.trim().split_once('-')?;
        let start = start.trim().parse().ok()?;
        let end = end.trim().parse().ok()?;
        Some(Self::new(start, end))
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl TryFrom<String> for YearRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid year range: {:?}", value))
    }
}

impl From<YearRange> for String {
    fn from(value: YearRange) -> Self {
        value.to_string()
    }
}

/// One VoteView House member-session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeologyRecord {
    pub representative: String,
    pub congress: i32,
    pub state_name: String,
    pub state_abbrev: String,
    pub district_code: i32,
    pub year_range: YearRange,
    pub party_code: Option<i32>,
    pub icpsr: Option<i64>,
    pub bioguide_id: Option<String>,
    pub born: Option<i32>,
    pub age: Option<i32>,
    pub nominate_dim1: f64,
    pub nominate_dim2: Option<f64>,
    pub nominate_number_of_votes: f64,
}

impl MatchKey for IdeologyRecord {
    fn representative(&self) -> Option<&str> {
        Some(self.representative.as_str()).filter(|s| !s.trim().is_empty())
    }

    fn congress(&self) -> i32 {
        self.congress
    }

    fn state_name(&self) -> &str {
        &self.state_name
    }

    fn district_code(&self) -> i32 {
        self.district_code
    }
}

/// One FEC candidate summary row for a two-year filing cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceRecord {
    pub representative: String,
    pub congress: i32,
    pub state_name: String,
    pub district_code: i32,
    pub year_range: YearRange,
    pub party: String,
    pub running_as: String,
    pub receipts: f64,
    pub contributions_from_individuals: f64,
    pub contributions_from_pacs: f64,
    pub contributions_and_loans_from_candidate: f64,
    pub disbursements: f64,
    pub cash_on_hand: f64,
    pub debts: f64,
}

/// Fields a matched ideology row receives from its finance counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancePayload {
    pub party: String,
    pub running_as: String,
    pub receipts: f64,
    pub contributions_from_individuals: f64,
    pub contributions_from_pacs: f64,
    pub contributions_and_loans_from_candidate: f64,
    pub disbursements: f64,
    pub cash_on_hand: f64,
    pub debts: f64,
}

pub const FINANCE_PAYLOAD_FIELDS: &[&str] = &[
    "party",
    "running_as",
    "receipts",
    "contributions_from_individuals",
    "contributions_from_pacs",
    "contributions_and_loans_from_candidate",
    "disbursements",
    "cash_on_hand",
    "debts",
];

impl FinancePayload {
    /// Values in `FINANCE_PAYLOAD_FIELDS` order.
    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.party.clone(),
            self.running_as.clone(),
            self.receipts.to_string(),
            self.contributions_from_individuals.to_string(),
            self.contributions_from_pacs.to_string(),
            self.contributions_and_loans_from_candidate.to_string(),
            self.disbursements.to_string(),
            self.cash_on_hand.to_string(),
            self.debts.to_string(),
        ]
    }
}

impl MatchKey for FinanceRecord {
    fn representative(&self) -> Option<&str> {
        Some(self.representative.as_str()).filter(|s| !s.trim().is_empty())
    }

    fn congress(&self) -> i32 {
        self.congress
    }

    fn state_name(&self) -> &str {
        &self.state_name
    }

    fn district_code(&self) -> i32 {
        self.district_code
    }
}

impl TargetRecord for FinanceRecord {
    type Payload = FinancePayload;

    const PAYLOAD_FIELDS: &'static [&'static str] = FINANCE_PAYLOAD_FIELDS;

    fn payload(&self) -> FinancePayload {
        FinancePayload {
            party: self.party.clone(),
            running_as: self.running_as.clone(),
            receipts: self.receipts,
            contributions_from_individuals: self.contributions_from_individuals,
            contributions_from_pacs: self.contributions_from_pacs,
            contributions_and_loans_from_candidate: self.contributions_and_loans_from_candidate,
            disbursements: self.disbursements,
            cash_on_hand: self.cash_on_hand,
            debts: self.debts,
        }
    }

    fn period_label(&self) -> String {
        self.year_range.to_string()
    }
}
