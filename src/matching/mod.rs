pub mod fuser;
pub mod resolver;
pub mod similarity;
pub mod window;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::records::{FinanceRecord, IdeologyRecord, YearRange};

    pub fn ideology(name: &str, congress: i32, state: &str, district: i32) -> IdeologyRecord {
        let year_range = YearRange::for_congress(congress);
        IdeologyRecord {
            representative: name.to_string(),
            congress,
            state_name: state.to_string(),
            state_abbrev: String::new(),
            district_code: district,
            year_range,
            party_code: Some(100),
            icpsr: None,
            bioguide_id: None,
            born: Some(1950),
            age: Some(year_range.start - 1950),
            nominate_dim1: -0.25,
            nominate_dim2: Some(0.1),
            nominate_number_of_votes: 600.0,
        }
    }

    pub fn finance(name: &str, congress: i32, state: &str, district: i32, receipts: f64) -> FinanceRecord {
        let start = YearRange::for_congress(congress).start;
        FinanceRecord {
            representative: name.to_string(),
            congress,
            state_name: state.to_string(),
            district_code: district,
            year_range: YearRange::for_filing_year(start + 1),
            party: "DEMOCRATIC PARTY".to_string(),
            running_as: "INCUMBENT".to_string(),
            receipts,
            contributions_from_individuals: receipts / 2.0,
            contributions_from_pacs: receipts / 4.0,
            contributions_and_loans_from_candidate: 0.0,
            disbursements: receipts * 0.9,
            cash_on_hand: receipts * 0.1,
            debts: 0.0,
        }
    }
}
