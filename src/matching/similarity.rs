// src/matching/similarity.rs - Name closeness scoring (partial ratio with Jaro-Winkler fallback)
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::utils::constants::{
    JARO_WINKLER_BOOST_THRESHOLD, JARO_WINKLER_MAX_PREFIX, JARO_WINKLER_PREFIX_SCALE,
    PARTIAL_RATIO_FALLBACK_BELOW,
};

static NAME_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[(),.]").expect("static punctuation pattern is valid"));

/// Scores how likely two representative names refer to the same person, 0-100.
pub trait NameScorer: Send + Sync {
    fn score(&self, source: &str, candidate: Option<&str>) -> f64;
}

/// Default scorer used by the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyNameScorer;

impl NameScorer for FuzzyNameScorer {
    fn score(&self, source: &str, candidate: Option<&str>) -> f64 {
        closeness(source, candidate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMethod {
    PartialRatio,
    JaroWinkler,
    /// No candidate name to compare against.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Closeness {
    pub score: f64,
    pub method: ScoreMethod,
}

/// Strip `(),.`, lowercase and trim. "SHAW, Eugene Clay, Jr." -> "shaw eugene clay jr".
pub fn normalize_representative(name: &str) -> String {
    NAME_PUNCTUATION
        .replace_all(name, "")
        .to_lowercase()
        .trim()
        .to_string()
}

/// Closeness of two raw names in [0, 100]. A missing candidate scores 0.
pub fn closeness(source: &str, candidate: Option<&str>) -> f64 {
    closeness_detail(source, candidate).score
}

pub fn closeness_detail(source: &str, candidate: Option<&str>) -> Closeness {
    let candidate = match candidate {
        Some(c) => c,
        None => {
            return Closeness {
                score: 0.0,
                method: ScoreMethod::Missing,
            }
        }
    };

    let a = normalize_representative(source);
    let b = normalize_representative(candidate);

    let primary = partial_ratio(&a, &b);
    let (score, method) = if primary < PARTIAL_RATIO_FALLBACK_BELOW {
        (jaro_winkler(&a, &b) * 100.0, ScoreMethod::JaroWinkler)
    } else {
        (primary, ScoreMethod::PartialRatio)
    };

    Closeness {
        score: score.clamp(0.0, 100.0),
        method,
    }
}

/// Best alignment of the shorter string against every equal-length window of the
/// longer one, as a whole-number percentage. Either side empty scores 0.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return 0.0;
    }

    let mut best = 0.0_f64;
    for window in long.windows(short.len()) {
        let common = lcs_len(short, window);
        let ratio = 2.0 * common as f64 / (2 * short.len()) as f64;
        if ratio > best {
            best = ratio;
            if common == short.len() {
                break;
            }
        }
    }
    (best * 100.0).round()
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Jaro similarity in [0, 1]: `(m/len1 + m/len2 + (m - t)/m) / 3`, where `t` is the
/// number of matched positions that disagree, not halved.
pub fn jaro(s1: &str, s2: &str) -> f64 {
    if s1 == s2 {
        return 1.0;
    }

    let s1: Vec<char> = s1.chars().collect();
    let s2: Vec<char> = s2.chars().collect();
    let (len1, len2) = (s1.len(), s2.len());
    if len1 == 0 || len2 == 0 {
        return 0.0;
    }

    let max_dist = (len1.max(len2) / 2).saturating_sub(1);
    let mut matched1 = vec![false; len1];
    let mut matched2 = vec![false; len2];
    let mut matches = 0usize;

    for i in 0..len1 {
        let lo = i.saturating_sub(max_dist);
        let hi = (i + max_dist + 1).min(len2);
        for j in lo..hi {
            if !matched2[j] && s1[i] == s2[j] {
                matched1[i] = true;
                matched2[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Every matched position whose characters disagree counts as one transposition.
    let mut transpositions = 0usize;
    let mut point = 0usize;
    for i in (0..len1).filter(|&i| matched1[i]) {
        while !matched2[point] {
            point += 1;
        }
        if s1[i] != s2[point] {
            transpositions += 1;
        }
        point += 1;
    }

    let m = matches as f64;
    let t = transpositions as f64;
    (m / len1 as f64 + m / len2 as f64 + (m - t) / m) / 3.0
}

/// Jaro-Winkler similarity in [0, 1].
pub fn jaro_winkler(s1: &str, s2: &str) -> f64 {
    let sim = jaro(s1, s2);
    if sim <= JARO_WINKLER_BOOST_THRESHOLD {
        return sim;
    }

    let prefix = s1
        .chars()
        .zip(s2.chars())
        .take_while(|(a, b)| a == b)
        .count()
        .min(JARO_WINKLER_MAX_PREFIX);

    sim + JARO_WINKLER_PREFIX_SCALE * prefix as f64 * (1.0 - sim)
}
