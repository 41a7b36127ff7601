// src/utils/constants.rs

/// Minimum closeness (0-100) for accepting a finance candidate as the same representative.
///
/// Calibrated on a single observed pair: VoteView's "SHAW, Eugene Clay, Jr." against
/// FEC's "SHAW, E CLAY JR" was scored 69 by the scorer the pipeline was tuned with,
/// and a `> 70` cutoff rejected that true match. Keep the exact value for compatibility.
pub const MATCH_ACCEPTANCE_THRESHOLD: f64 = 69.0;

/// Partial-ratio scores below this fall back to Jaro-Winkler.
pub const PARTIAL_RATIO_FALLBACK_BELOW: f64 = 70.0;

/// Jaro similarity must exceed this before the common-prefix boost applies.
pub const JARO_WINKLER_BOOST_THRESHOLD: f64 = 0.7;
pub const JARO_WINKLER_PREFIX_SCALE: f64 = 0.1;
pub const JARO_WINKLER_MAX_PREFIX: usize = 4;

/// Session offsets searched for each source record: current, prior, next.
pub const WINDOW_OFFSETS: [i32; 3] = [0, -1, 1];

/// The 101st congress opened in 1989; FEC summaries start there.
pub const FIRST_CONGRESS: i32 = 101;
pub const FIRST_CONGRESS_START_YEAR: i32 = 1989;
pub const LAST_CONGRESS: i32 = 116;

/// Sessions ending before this year use the earliest demographic year on file.
pub const DEMOGRAPHICS_CUTOFF_YEAR: i32 = 2008;

pub const NO_PARTY_AFFILIATION: &str = "No Party Affiliation";

/// Decimal places kept when averaging demographic indicators over a session.
pub const DEMOGRAPHIC_ROUNDING_DIGITS: i32 = 3;
