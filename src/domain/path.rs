//! Learning path generation
//!
//! Picks and orders content for a learner. Candidates are filtered by
//! topic, scored by a keyword/length difficulty heuristic, ordered by
//! the learner's level and then packed first-fit into a fixed hour
//! budget in a single pass.
//!
//! Generation is pure: no I/O, no clock, no randomness. The same inputs
//! always produce the same path.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Keywords counted by [`complexity_score`]
pub const TECHNICAL_TERMS: [&str; 10] = [
    "algorithm",
    "function",
    "variable",
    "class",
    "object",
    "api",
    "database",
    "code",
    "programming",
    "development",
];

/// Reading speed used for time estimates
pub const WORDS_PER_MINUTE: usize = 200;

/// Characters of body text worth one keyword occurrence
const LENGTH_DIVISOR: f64 = 1000.0;

#[derive(Debug, Error, PartialEq)]
pub enum GenerateError {
    #[error("At least one topic must be selected")]
    NoTopics,

    #[error("Unknown time budget: '{0}' (expected short, medium or long)")]
    UnknownTimeBudget(String),
}

/// Anything a learning path can be built from
pub trait ContentItem {
    /// Stable identifier, for display and logging
    fn item_id(&self) -> String;

    /// Topics matched against the selected topics
    fn topics(&self) -> Vec<&str>;

    /// Text that is scored and timed
    fn body(&self) -> &str;
}

impl<T: ContentItem + ?Sized> ContentItem for &T {
    fn item_id(&self) -> String {
        (**self).item_id()
    }

    fn topics(&self) -> Vec<&str> {
        (**self).topics()
    }

    fn body(&self) -> &str {
        (**self).body()
    }
}

/// Experience level of the learner
///
/// Labels match exactly. Any other label, including a differently cased
/// one such as `Beginner`, is kept verbatim and, like `intermediate`, leaves
/// the candidate order untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Unrecognized(String),
}

impl Level {
    pub fn as_str(&self) -> &str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
            Level::Unrecognized(label) => label,
        }
    }

    /// Returns how candidates are ordered for this level
    pub fn ordering(&self) -> PathOrdering {
        match self {
            Level::Beginner => PathOrdering::SimplestFirst,
            Level::Advanced => PathOrdering::HardestFirst,
            // TODO: intermediate has no ordering of its own yet; decide whether it should
            // interleave or stay in catalog order before changing this.
            Level::Intermediate | Level::Unrecognized(_) => PathOrdering::Unchanged,
        }
    }
}

impl From<&str> for Level {
    fn from(label: &str) -> Self {
        match label {
            "beginner" => Level::Beginner,
            "intermediate" => Level::Intermediate,
            "advanced" => Level::Advanced,
            _ => Level::Unrecognized(label.to_string()),
        }
    }
}

impl From<String> for Level {
    fn from(label: String) -> Self {
        Level::from(label.as_str())
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Candidate ordering applied before packing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOrdering {
    /// Ascending complexity
    SimplestFirst,
    /// Descending complexity
    HardestFirst,
    /// Filtered order, as given
    Unchanged,
}

/// How much study time the learner has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeBudget {
    Short,
    Medium,
    Long,
}

impl TimeBudget {
    /// Budget in hours
    pub fn hours(&self) -> f64 {
        match self {
            TimeBudget::Short => 2.0,
            TimeBudget::Medium => 4.0,
            TimeBudget::Long => 6.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBudget::Short => "short",
            TimeBudget::Medium => "medium",
            TimeBudget::Long => "long",
        }
    }
}

impl std::str::FromStr for TimeBudget {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(TimeBudget::Short),
            "medium" => Ok(TimeBudget::Medium),
            "long" => Ok(TimeBudget::Long),
            _ => Err(GenerateError::UnknownTimeBudget(s.to_string())),
        }
    }
}

impl TryFrom<String> for TimeBudget {
    type Error = GenerateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeBudget> for String {
    fn from(budget: TimeBudget) -> Self {
        budget.as_str().to_string()
    }
}

impl std::fmt::Display for TimeBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// What the learner asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub selected_topics: Vec<String>,
    #[serde(default)]
    pub level: Level,
    pub time_budget: TimeBudget,
}

impl GenerationRequest {
    pub fn new<I, S>(topics: I, level: Level, time_budget: TimeBudget) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_topics: topics.into_iter().map(Into::into).collect(),
            level,
            time_budget,
        }
    }

    /// Builds a request from raw labels, rejecting an empty topic list or an
    /// unknown budget
    pub fn from_labels<I, S>(topics: I, level: &str, time_budget: &str) -> Result<Self, GenerateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = Self::new(topics, Level::from(level), time_budget.parse()?);
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.selected_topics.iter().all(|t| t.trim().is_empty()) {
            return Err(GenerateError::NoTopics);
        }
        Ok(())
    }

    fn matches<T: ContentItem>(&self, item: &T) -> bool {
        item.topics()
            .iter()
            .any(|topic| self.selected_topics.iter().any(|s| s == topic))
    }
}

/// One step of a learning path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry<T> {
    item: T,
    estimated_hours: f64,
    order: usize,
}

impl<T> PathEntry<T> {
    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn estimated_hours(&self) -> f64 {
        self.estimated_hours
    }

    /// 1-based position in the path
    pub fn order(&self) -> usize {
        self.order
    }
}

/// A generated learning path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult<T> {
    entries: Vec<PathEntry<T>>,
    accumulated_hours: f64,
    target_hours: f64,
    /// Candidates that matched a selected topic, before packing
    matched: usize,
}

impl<T> GenerationResult<T> {
    pub fn entries(&self) -> &[PathEntry<T>] {
        &self.entries
    }

    pub fn accumulated_hours(&self) -> f64 {
        self.accumulated_hours
    }

    pub fn target_hours(&self) -> f64 {
        self.target_hours
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explains an empty path; `None` when the path has entries
    pub fn message(&self) -> Option<&'static str> {
        if !self.entries.is_empty() {
            None
        } else if self.matched == 0 {
            Some("No blogs found matching the selected topics")
        } else {
            Some("No matching blogs fit within the time budget")
        }
    }
}

/// A candidate with its complexity score
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
    pub item: T,
    pub complexity: f64,
}

/// Counts whitespace-separated words; blank text has none
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Relative difficulty of a body of text
///
/// Sum of case-insensitive, non-overlapping occurrences of each of
/// [`TECHNICAL_TERMS`], plus one point per thousand characters. Only
/// meaningful when compared against other scores.
pub fn complexity_score(body: &str) -> f64 {
    let lowered = body.to_lowercase();
    let term_count: usize = TECHNICAL_TERMS
        .iter()
        .map(|term| lowered.matches(term).count())
        .sum();

    term_count as f64 + body.chars().count() as f64 / LENGTH_DIVISOR
}

/// Estimated reading time in hours
pub fn estimate_hours(body: &str) -> f64 {
    word_count(body) as f64 / WORDS_PER_MINUTE as f64 / 60.0
}

/// Scores candidates and orders them for `level`
///
/// Sorting is stable: equal scores keep their input order.
pub fn rank<T, I>(candidates: I, level: &Level) -> Vec<Scored<T>>
where
    T: ContentItem,
    I: IntoIterator<Item = T>,
{
    let mut scored: Vec<Scored<T>> = candidates
        .into_iter()
        .map(|item| {
            let complexity = complexity_score(item.body());
            Scored { item, complexity }
        })
        .collect();

    match level.ordering() {
        PathOrdering::SimplestFirst => {
            scored.sort_by(|a, b| a.complexity.total_cmp(&b.complexity))
        }
        PathOrdering::HardestFirst => {
            scored.sort_by(|a, b| b.complexity.total_cmp(&a.complexity))
        }
        PathOrdering::Unchanged => {}
    }

    scored
}

/// Generates a learning path from `candidates`
///
/// Returns [`GenerateError::NoTopics`] if no topic is selected. A request
/// that matches nothing is not an error: it yields an empty path with the
/// budget still reported.
pub fn generate<T, I>(
    candidates: I,
    request: &GenerationRequest,
) -> Result<GenerationResult<T>, GenerateError>
where
    T: ContentItem,
    I: IntoIterator<Item = T>,
{
    request.validate()?;

    let target_hours = request.time_budget.hours();
    let mut total = 0usize;
    let matching: Vec<T> = candidates
        .into_iter()
        .inspect(|_| total += 1)
        .filter(|item| request.matches(item))
        .collect();
    let matched = matching.len();

    debug!(
        candidates = total,
        matched,
        topics = ?request.selected_topics,
        "filtered candidates by topic"
    );

    let mut entries = Vec::new();
    let mut accumulated_hours = 0.0;

    for scored in rank(matching, &request.level) {
        let estimated_hours = estimate_hours(scored.item.body());

        if accumulated_hours + estimated_hours <= target_hours {
            accumulated_hours += estimated_hours;
            entries.push(PathEntry {
                item: scored.item,
                estimated_hours,
                order: entries.len() + 1,
            });
        } else {
            debug!(
                item = %scored.item.item_id(),
                estimated_hours,
                "skipped item that does not fit the remaining budget"
            );
        }
    }

    debug!(
        entries = entries.len(),
        accumulated_hours,
        target_hours,
        level = %request.level,
        "generated learning path"
    );

    Ok(GenerationResult {
        entries,
        accumulated_hours,
        target_hours,
        matched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Item {
        id: usize,
        topics: Vec<String>,
        body: String,
    }

    impl ContentItem for Item {
        fn item_id(&self) -> String {
            self.id.to_string()
        }

        fn topics(&self) -> Vec<&str> {
            self.topics.iter().map(String::as_str).collect()
        }

        fn body(&self) -> &str {
            &self.body
        }
    }

    fn item(id: usize, topics: &[&str], body: impl Into<String>) -> Item {
        Item {
            id,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            body: body.into(),
        }
    }

    /// A body that takes `hours` to read
    fn body_of_hours(hours: f64) -> String {
        let words = (hours * 60.0 * WORDS_PER_MINUTE as f64).round() as usize;
        "word ".repeat(words)
    }

    fn request(topics: &[&str], level: &str, budget: &str) -> GenerationRequest {
        GenerationRequest::from_labels(topics.iter().copied(), level, budget).unwrap()
    }

    #[test]
    fn word_count_ignores_surrounding_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("  one  two\nthree "), 3);
    }

    #[test]
    fn complexity_counts_terms_case_insensitively() {
        assert_eq!(complexity_score(""), 0.0);
        // "Code", "CODE" and "function" -> 3 terms, 18 chars
        let score = complexity_score("Code CODE function");
        assert!((score - (3.0 + 18.0 / 1000.0)).abs() < 1e-12);
    }

    #[test]
    fn complexity_counts_substrings() {
        let score = complexity_score("classes");
        assert!((score - (1.0 + 7.0 / 1000.0)).abs() < 1e-12);

        // "apiapi" has two non-overlapping "api"
        let score = complexity_score("apiapi");
        assert!((score - (2.0 + 6.0 / 1000.0)).abs() < 1e-12);
    }

    #[test]
    fn estimate_hours_uses_200_wpm() {
        assert_eq!(estimate_hours(""), 0.0);
        assert_eq!(estimate_hours(&"w ".repeat(12_000)), 1.0);
        assert_eq!(estimate_hours(&"w ".repeat(18_000)), 1.5);
    }

    #[test]
    fn budget_maps_to_hours() {
        assert_eq!("short".parse::<TimeBudget>().unwrap().hours(), 2.0);
        assert_eq!("medium".parse::<TimeBudget>().unwrap().hours(), 4.0);
        assert_eq!("long".parse::<TimeBudget>().unwrap().hours(), 6.0);
    }

    #[test]
    fn budget_labels_match_exactly() {
        assert!(matches!(
            "SHORT".parse::<TimeBudget>(),
            Err(GenerateError::UnknownTimeBudget(label)) if label == "SHORT"
        ));
        assert!(" short".parse::<TimeBudget>().is_err());
    }

    #[test]
    fn level_labels() {
        assert_eq!(Level::from("beginner"), Level::Beginner);
        assert_eq!(Level::from("advanced"), Level::Advanced);
        assert_eq!(
            Level::from("Beginner"),
            Level::Unrecognized("Beginner".to_string())
        );
        assert_eq!(Level::from("Beginner").ordering(), PathOrdering::Unchanged);
        assert_eq!(Level::from("intermediate").ordering(), PathOrdering::Unchanged);
        assert_eq!(
            Level::from("expert"),
            Level::Unrecognized("expert".to_string())
        );
        assert_eq!(Level::from("expert").ordering(), PathOrdering::Unchanged);
        assert_eq!(Level::from("expert").to_string(), "expert");
    }

    #[test]
    fn scenario_single_long_line_fits_short_budget() {
        let body = format!("{} function function", "x".repeat(2000));
        let candidates = vec![item(1, &["AI"], body)];

        let result = generate(candidates, &request(&["AI"], "beginner", "short")).unwrap();

        assert_eq!(result.target_hours(), 2.0);
        assert_eq!(result.entries().len(), 1);
        assert_eq!(result.entries()[0].order(), 1);
        assert!((result.accumulated_hours() - 3.0 / 200.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn scenario_topic_filter_excludes_non_matching() {
        let candidates = vec![
            item(1, &["Programming"], "code"),
            item(2, &["Cooking"], "algorithm ".repeat(50)),
        ];

        let result =
            generate(candidates, &request(&["Programming"], "advanced", "long")).unwrap();

        assert_eq!(result.matched(), 1);
        assert_eq!(result.entries().len(), 1);
        assert_eq!(result.entries()[0].item().id, 1);
    }

    #[test]
    fn scenario_empty_topics_is_validation_failure() {
        let err = GenerationRequest::from_labels(Vec::<String>::new(), "beginner", "short")
            .unwrap_err();
        assert_eq!(err, GenerateError::NoTopics);

        let req = GenerationRequest::new(Vec::<String>::new(), Level::Beginner, TimeBudget::Short);
        let err = generate(vec![item(1, &["AI"], "code")], &req).unwrap_err();
        assert_eq!(err, GenerateError::NoTopics);
    }

    #[test]
    fn blank_topics_count_as_empty() {
        let err = GenerationRequest::from_labels(["  ", ""], "beginner", "short").unwrap_err();
        assert_eq!(err, GenerateError::NoTopics);
    }

    #[test]
    fn scenario_full_pass_packs_later_smaller_items() {
        let candidates = vec![
            item(1, &["Rust"], body_of_hours(1.5)),
            item(2, &["Rust"], body_of_hours(1.5)),
            item(3, &["Rust"], body_of_hours(1.5)),
            item(4, &["Rust"], body_of_hours(0.5)),
        ];

        let result =
            generate(candidates, &request(&["Rust"], "intermediate", "medium")).unwrap();

        let ids: Vec<_> = result.entries().iter().map(|e| e.item().id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        assert_eq!(result.accumulated_hours(), 3.5);
        assert_eq!(result.target_hours(), 4.0);
    }

    #[test]
    fn scenario_unknown_budget_is_validation_failure() {
        let err = GenerationRequest::from_labels(["AI"], "beginner", "extra-long").unwrap_err();
        assert_eq!(err, GenerateError::UnknownTimeBudget("extra-long".to_string()));
    }

    #[test]
    fn exact_fit_is_included() {
        let candidates = vec![
            item(1, &["Rust"], body_of_hours(1.0)),
            item(2, &["Rust"], body_of_hours(1.0)),
        ];

        let result = generate(candidates, &request(&["Rust"], "beginner", "short")).unwrap();

        assert_eq!(result.entries().len(), 2);
        assert_eq!(result.accumulated_hours(), 2.0);
    }

    #[test]
    fn no_match_is_empty_result_not_error() {
        let candidates = vec![item(1, &["Cooking"], "recipe")];

        let result = generate(candidates, &request(&["Rust"], "beginner", "long")).unwrap();

        assert!(result.is_empty());
        assert_eq!(result.accumulated_hours(), 0.0);
        assert_eq!(result.target_hours(), 6.0);
        assert_eq!(
            result.message(),
            Some("No blogs found matching the selected topics")
        );
    }

    #[test]
    fn matched_but_too_long_has_distinct_message() {
        let candidates = vec![item(1, &["Rust"], body_of_hours(3.0))];

        let result = generate(candidates, &request(&["Rust"], "beginner", "short")).unwrap();

        assert!(result.is_empty());
        assert_eq!(result.matched(), 1);
        assert_eq!(
            result.message(),
            Some("No matching blogs fit within the time budget")
        );
    }

    #[test]
    fn beginner_sorts_simplest_first_and_advanced_hardest_first() {
        let candidates = vec![
            item(1, &["Rust"], "code code code"),
            item(2, &["Rust"], "plain"),
            item(3, &["Rust"], "code"),
        ];

        let beginner =
            generate(candidates.clone(), &request(&["Rust"], "beginner", "short")).unwrap();
        let ids: Vec<_> = beginner.entries().iter().map(|e| e.item().id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let advanced = generate(candidates, &request(&["Rust"], "advanced", "short")).unwrap();
        let ids: Vec<_> = advanced.entries().iter().map(|e| e.item().id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn ties_keep_input_order() {
        let candidates = vec![
            item(1, &["Rust"], "same"),
            item(2, &["Rust"], "same"),
            item(3, &["Rust"], "same"),
        ];

        for level in ["beginner", "advanced", "intermediate"] {
            let result =
                generate(candidates.clone(), &request(&["Rust"], level, "short")).unwrap();
            let ids: Vec<_> = result.entries().iter().map(|e| e.item().id).collect();
            assert_eq!(ids, vec![1, 2, 3], "level {}", level);
        }
    }

    #[test]
    fn generates_from_borrowed_candidates() {
        let candidates = vec![item(1, &["Rust"], "code"), item(2, &["Go"], "code")];

        let result = generate(&candidates, &request(&["Go"], "beginner", "short")).unwrap();

        assert_eq!(result.entries().len(), 1);
        assert_eq!(result.entries()[0].item().id, 2);
    }

    #[test]
    fn result_serializes_with_camel_case_fields() {
        let candidates = vec![item(1, &["Rust"], "code")];
        let result = generate(candidates, &request(&["Rust"], "beginner", "short")).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["targetHours"], 2.0);
        assert!(json["accumulatedHours"].is_number());
        assert_eq!(json["entries"][0]["order"], 1);
        assert!(json["entries"][0]["estimatedHours"].is_number());
        assert_eq!(json["entries"][0]["item"]["id"], 1);
    }

    #[test]
    fn request_deserializes_and_rejects_unknown_budget() {
        let req: GenerationRequest = serde_json::from_str(
            r#"{"selectedTopics": ["AI"], "level": "advanced", "timeBudget": "long"}"#,
        )
        .unwrap();
        assert_eq!(req.level, Level::Advanced);
        assert_eq!(req.time_budget, TimeBudget::Long);

        let bad = serde_json::from_str::<GenerationRequest>(
            r#"{"selectedTopics": ["AI"], "timeBudget": "extra-long"}"#,
        );
        assert!(bad.is_err());
    }

    const TOPIC_POOL: [&str; 5] = ["AI", "Rust", "Web", "Career", "Cooking"];

    fn arb_item() -> impl Strategy<Value = (Vec<String>, String)> {
        (
            proptest::sample::subsequence(TOPIC_POOL.to_vec(), 0..=3),
            0usize..20,
            0usize..15_000,
        )
            .prop_map(|(topics, terms, words)| {
                let topics = topics.into_iter().map(String::from).collect();
                let body = format!("{}{}", "code ".repeat(terms), "word ".repeat(words));
                (topics, body)
            })
    }

    fn arb_candidates() -> impl Strategy<Value = Vec<Item>> {
        proptest::collection::vec(arb_item(), 0..12).prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(id, (topics, body))| Item { id, topics, body })
                .collect()
        })
    }

    fn arb_request() -> impl Strategy<Value = GenerationRequest> {
        (
            proptest::sample::subsequence(TOPIC_POOL.to_vec(), 1..=3),
            prop_oneof![
                Just(Level::Beginner),
                Just(Level::Intermediate),
                Just(Level::Advanced),
                Just(Level::Unrecognized("expert".to_string())),
            ],
            prop_oneof![
                Just(TimeBudget::Short),
                Just(TimeBudget::Medium),
                Just(TimeBudget::Long),
            ],
        )
            .prop_map(|(topics, level, budget)| GenerationRequest::new(topics, level, budget))
    }

    proptest! {
        #[test]
        fn entries_always_match_a_selected_topic(
            candidates in arb_candidates(),
            req in arb_request(),
        ) {
            let result = generate(&candidates, &req).unwrap();
            for entry in result.entries() {
                prop_assert!(entry
                    .item()
                    .topics
                    .iter()
                    .any(|t| req.selected_topics.contains(t)));
            }
        }

        #[test]
        fn accumulated_hours_stay_within_budget(
            candidates in arb_candidates(),
            req in arb_request(),
        ) {
            let result = generate(&candidates, &req).unwrap();
            let sum: f64 = result.entries().iter().map(|e| e.estimated_hours()).sum();

            prop_assert!(result.accumulated_hours() <= result.target_hours());
            prop_assert!((result.accumulated_hours() - sum).abs() < 1e-9);
            prop_assert_eq!(result.target_hours(), req.time_budget.hours());
        }

        #[test]
        fn entries_follow_level_ordering(
            candidates in arb_candidates(),
            req in arb_request(),
        ) {
            let result = generate(&candidates, &req).unwrap();
            let scores: Vec<f64> = result
                .entries()
                .iter()
                .map(|e| complexity_score(e.item().body()))
                .collect();

            for pair in scores.windows(2) {
                match req.level.ordering() {
                    PathOrdering::SimplestFirst => prop_assert!(pair[0] <= pair[1]),
                    PathOrdering::HardestFirst => prop_assert!(pair[0] >= pair[1]),
                    PathOrdering::Unchanged => {}
                }
            }

            // Entries are a subsequence of the ranked candidate order
            let matching: Vec<&Item> = candidates
                .iter()
                .filter(|c| c.topics.iter().any(|t| req.selected_topics.contains(t)))
                .collect();
            let ranked: Vec<usize> = rank(matching, &req.level)
                .into_iter()
                .map(|s| s.item.id)
                .collect();
            let mut cursor = ranked.iter();
            for entry in result.entries() {
                prop_assert!(cursor.any(|id| *id == entry.item().id));
            }
        }

        #[test]
        fn generation_is_deterministic(
            candidates in arb_candidates(),
            req in arb_request(),
        ) {
            let first = generate(&candidates, &req).unwrap();
            let second = generate(&candidates, &req).unwrap();

            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }

        #[test]
        fn order_numbers_are_contiguous_from_one(
            candidates in arb_candidates(),
            req in arb_request(),
        ) {
            let result = generate(&candidates, &req).unwrap();
            for (k, entry) in result.entries().iter().enumerate() {
                prop_assert_eq!(entry.order(), k + 1);
            }
        }
    }
}
