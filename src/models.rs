use serde::{Deserialize, Serialize};

/// An input cell from the selected geo column, typed once at ingestion.
///
/// The cascade never re-inspects the text to decide whether it "looks
/// numeric"; that decision is made here and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    /// Already a numeric code; passes through the resolver untouched.
    Numeric(i64),
    /// Free text to be resolved against the mapping table.
    Text(String),
    /// Empty/missing cell; passes through unresolved.
    Missing,
}

impl RawValue {
    /// Classify a raw CSV field. Empty (after trimming) is `Missing`,
    /// anything parseable as a number is `Numeric` (floats truncate toward
    /// zero, mirroring integer coercion of numeric spreadsheet cells),
    /// everything else is `Text`.
    pub fn from_field(field: &str) -> Self {
        let s = field.trim();
        if s.is_empty() {
            return RawValue::Missing;
        }
        if let Ok(n) = s.parse::<i64>() {
            return RawValue::Numeric(n);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return RawValue::Numeric(f as i64);
            }
        }
        RawValue::Text(s.to_string())
    }

    /// Rendered form for output tables: codes and text as-is, missing as
    /// an empty field.
    pub fn render(&self) -> String {
        match self {
            RawValue::Numeric(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
            RawValue::Missing => String::new(),
        }
    }
}

/// Which stage of the cascade produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStrategy {
    ExactMatch,
    FuzzyWhole,
    FuzzySplitSegment,
    FuzzyWord,
    FuzzyCityState,
    NoMatch,
}

impl MatchStrategy {
    pub const ALL: [MatchStrategy; 6] = [
        MatchStrategy::ExactMatch,
        MatchStrategy::FuzzyWhole,
        MatchStrategy::FuzzySplitSegment,
        MatchStrategy::FuzzyWord,
        MatchStrategy::FuzzyCityState,
        MatchStrategy::NoMatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::ExactMatch => "exact",
            MatchStrategy::FuzzyWhole => "fuzzy_whole",
            MatchStrategy::FuzzySplitSegment => "fuzzy_segment",
            MatchStrategy::FuzzyWord => "fuzzy_word",
            MatchStrategy::FuzzyCityState => "fuzzy_city_state",
            MatchStrategy::NoMatch => "no_match",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of resolving one raw value. Produced fresh per input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// The code on a match, otherwise the original value unchanged.
    pub value: RawValue,
    pub matched: bool,
    pub strategy: MatchStrategy,
    /// Similarity score 0-100; absent for pass-through and no-match cases.
    pub score: Option<f64>,
}

impl ResolutionResult {
    /// An unresolved pass-through of the original value.
    pub fn passthrough(value: RawValue) -> Self {
        Self {
            value,
            matched: false,
            strategy: MatchStrategy::NoMatch,
            score: None,
        }
    }
}
