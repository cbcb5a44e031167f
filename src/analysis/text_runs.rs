//! Text-run analysis of buffers without readable geometry.
//!
//! DWG files and drawings whose structure could not be parsed still carry
//! block names, layer names and annotations as plain byte runs. Counting
//! keywords in those runs is a weak signal, reported with low confidence.

use crate::classify::Category;
use once_cell::sync::Lazy;
use regex::bytes::Regex as BytesRegex;
use regex::Regex;

/// Printable ASCII runs of at least three characters
static PRINTABLE_RUN: Lazy<BytesRegex> =
    Lazy::new(|| BytesRegex::new(r"(?-u)[ -~\t\n]{3,}").expect("valid regex"));
/// `12 db dugalj`
static QTY_BEFORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*db\s+(\w+)").expect("valid regex"));
/// `dugalj: 12 db`
static QTY_AFTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)[:\s]+(\d+)\s*db").expect("valid regex"));
static LENGTH_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+[\.,]?\d*)\s*(fm|m\b|méter|lm)").expect("valid regex"));

/// Length mentions outside this open range are not lengths
const LENGTH_RANGE_M: (f64, f64) = (1.0, 50_000.0);

/// Keyword groups counted in text runs. Narrower than the name rules: short
/// keywords such as `led` or `vez` hit far too often in binary noise.
const TEXT_KEYWORDS: &[(&str, Category, &[&str])] = &[
    ("socket", Category::Socket, &["dugalj", "konnektor", "socket", "aljzat"]),
    ("switch", Category::Switch, &["kapcsoló", "kapcsolo", "switch", "villanykapcs"]),
    (
        "luminaire",
        Category::Luminaire,
        &["lámpa", "lampa", "light", "luminaire", "ledfény", "downlight"],
    ),
    ("rcd", Category::Breaker, &["fi relé", "fi rele", "rcd", "rcbo"]),
    (
        "breaker",
        Category::Breaker,
        &["kismegszakító", "kismegszakito", "mcb", "megszakít"],
    ),
    (
        "panel",
        Category::Panel,
        &["elosztó", "eloszto", "panel", "szekrény", "szekreny", "tábla"],
    ),
    (
        "cable",
        Category::Cable,
        &["kábel", "kabel", "cable", "vezeték", "nayy", "nyy", "cyky", "nym"],
    ),
];

/// Count for one keyword group
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordCount {
    pub name: &'static str,
    pub category: Category,
    pub count: usize,
    /// Count came from an explicit `N db` quantity
    pub explicit: bool,
}

/// What the text runs of a buffer revealed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRunAnalysis {
    /// Groups with a non-zero count, in table order
    pub counts: Vec<KeywordCount>,
    /// Length mentions in meters, in buffer order
    pub lengths_m: Vec<f64>,
    /// Printable runs found at all
    pub run_count: usize,
}

impl TextRunAnalysis {
    pub fn found_anything(&self) -> bool {
        !self.counts.is_empty() || !self.lengths_m.is_empty()
    }

    pub fn total_length_m(&self) -> f64 {
        self.lengths_m.iter().sum()
    }
}

/// Printable runs of `bytes`, joined by spaces and lower-cased
pub fn printable_text(bytes: &[u8]) -> (String, usize) {
    let mut text = String::new();
    let mut runs = 0;
    for m in PRINTABLE_RUN.find_iter(bytes) {
        if runs > 0 {
            text.push(' ');
        }
        text.push_str(&String::from_utf8_lossy(m.as_bytes()));
        runs += 1;
    }
    (text.to_lowercase(), runs)
}

fn group_of(word: &str) -> Option<usize> {
    TEXT_KEYWORDS
        .iter()
        .position(|(_, _, keywords)| keywords.iter().any(|kw| word.contains(kw)))
}

/// Analyze lower-cased text
pub fn analyze_text(text: &str) -> Vec<KeywordCount> {
    let mut hits = vec![0usize; TEXT_KEYWORDS.len()];
    for (i, (_, _, keywords)) in TEXT_KEYWORDS.iter().enumerate() {
        hits[i] = keywords.iter().map(|kw| text.matches(kw).count()).sum();
    }

    // explicit quantities override hit counts; the largest one wins
    let mut explicit: Vec<Option<usize>> = vec![None; TEXT_KEYWORDS.len()];
    let quantities = QTY_BEFORE
        .captures_iter(text)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .chain(
            QTY_AFTER
                .captures_iter(text)
                .map(|c| (c[2].to_string(), c[1].to_string())),
        );
    for (qty, word) in quantities {
        let (Ok(qty), Some(group)) = (qty.parse::<usize>(), group_of(&word)) else {
            continue;
        };
        explicit[group] = Some(explicit[group].map_or(qty, |q| q.max(qty)));
    }

    TEXT_KEYWORDS
        .iter()
        .enumerate()
        .filter_map(|(i, (name, category, _))| {
            let (count, is_explicit) = match explicit[i] {
                Some(q) => (q, true),
                None => (hits[i], false),
            };
            (count > 0).then_some(KeywordCount {
                name,
                category: *category,
                count,
                explicit: is_explicit,
            })
        })
        .collect()
}

/// Length mentions (`120 m`, `35,5 fm`) within the plausible range
pub fn length_mentions(text: &str) -> Vec<f64> {
    LENGTH_MENTION
        .captures_iter(text)
        .filter_map(|c| c[1].replace(',', ".").parse::<f64>().ok())
        .filter(|v| *v > LENGTH_RANGE_M.0 && *v < LENGTH_RANGE_M.1)
        .collect()
}

/// Analyze the printable runs of a raw buffer
pub fn analyze(bytes: &[u8]) -> TextRunAnalysis {
    let (text, run_count) = printable_text(bytes);
    let analysis = TextRunAnalysis {
        counts: analyze_text(&text),
        lengths_m: length_mentions(&text),
        run_count,
    };
    log::debug!(
        "text runs: {} runs, {} keyword groups, {} length mentions",
        run_count,
        analysis.counts.len(),
        analysis.lengths_m.len()
    );
    analysis
}
