// src/utils/states.rs
use strsim::jaro_winkler;

const STATE_NAMES: [(&str, &str); 59] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AS", "American Samoa"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District Of Columbia"),
    ("FM", "Federated States Of Micronesia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("GU", "Guam"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MH", "Marshall Islands"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("MP", "Northern Mariana Islands"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PW", "Palau"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VI", "Virgin Islands"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Delegations without a full House vote. Both sources spell a few of these differently.
const NON_VOTING_TERRITORIES: [&str; 7] = [
    "american samoa",
    "district of columbia",
    "guam",
    "northern mariana",
    "northern mariana islands",
    "puerto rico",
    "virgin islands",
];

pub fn state_name_for_abbrev(abbrev: &str) -> Option<&'static str> {
    let abbrev = abbrev.trim();
    STATE_NAMES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(abbrev))
        .map(|(_, name)| *name)
}

pub fn is_non_voting_territory(state_name: &str) -> bool {
    let lowered = state_name.trim().to_lowercase();
    NON_VOTING_TERRITORIES.contains(&lowered.as_str())
}

/// Closest known name to `name` by Jaro-Winkler, for "did you mean" diagnostics on failed joins.
pub fn closest_known<'a, I>(name: &str, known: I) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let lowered = name.to_lowercase();
    known
        .into_iter()
        .map(|candidate| (candidate, jaro_winkler(&lowered, &candidate.to_lowercase())))
        .fold(None, |best: Option<(&'a str, f64)>, current| match best {
            Some(b) if b.1 >= current.1 => Some(b),
            _ => Some(current),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_lookup() {
        assert_eq!(state_name_for_abbrev("OH"), Some("Ohio"));
        assert_eq!(state_name_for_abbrev(" ny "), Some("New York"));
        assert_eq!(state_name_for_abbrev("XX"), None);
    }

    #[test]
    fn test_territories() {
        assert!(is_non_voting_territory("District Of Columbia"));
        assert!(is_non_voting_territory("District of Columbia"));
        assert!(is_non_voting_territory("Northern Mariana"));
        assert!(!is_non_voting_territory("Delaware"));
    }

    #[test]
    fn test_closest_known() {
        let known = ["Ohio", "Oregon", "Oklahoma"];
        let (name, score) = closest_known("Ohoi", known.iter().copied()).unwrap();
        assert_eq!(name, "Ohio");
        assert!(score > 0.8);
        assert!(closest_known("Ohio", std::iter::empty::<&str>()).is_none());
    }
}
