//! Medicine name suggestions.
//!
//! Ranks catalog names against a partial query so the entry form can
//! offer completions and "did you mean" hints. Exact and prefix matches
//! outrank substring matches, which outrank fuzzy ones.

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::db::{Database, DbResult};

/// Suggestions returned when the caller does not say how many.
const DEFAULT_SUGGESTIONS: usize = 8;

/// Minimum score to be offered at all.
const MIN_SCORE: f64 = 0.4;

/// A ranked catalog name.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub score: f64,
}

/// Suggests medicine names from the catalog.
pub struct MedicineSuggester<'a> {
    db: &'a Database,
}

impl<'a> MedicineSuggester<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Rank catalog names against `query`, best first.
    ///
    /// A blank query lists the catalog in insertion order, the way the
    /// entry form pre-populates its dropdown. A `limit` of zero falls
    /// back to a small default.
    pub fn suggest(&self, query: &str, limit: usize) -> DbResult<Vec<Suggestion>> {
        let limit = if limit == 0 { DEFAULT_SUGGESTIONS } else { limit };
        let names = self.db.medicine_names()?;

        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(names
                .into_iter()
                .take(limit)
                .map(|name| Suggestion { name, score: 1.0 })
                .collect());
        }

        let mut scored: Vec<Suggestion> = names
            .into_iter()
            .map(|name| {
                let score = score_name(&query, &name.to_lowercase());
                Suggestion { name, score }
            })
            .filter(|s| s.score >= MIN_SCORE)
            .collect();

        // Stable sort: equal scores keep catalog order
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        Ok(scored)
    }
}

/// Score a lowercased catalog name against a lowercased query (0.0 - 1.0).
fn score_name(query: &str, name: &str) -> f64 {
    if name == query {
        return 1.0;
    }
    if name.starts_with(query) {
        return 0.95;
    }
    if name.contains(query) {
        return 0.9;
    }
    fuzzy_match(query, name)
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler favors shared prefixes, Levenshtein overall shape
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);

    jw * 0.6 + lev * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MedicineDetails;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        for name in ["甘草", "甘草片", "炙甘草", "黄芪", "金银花"] {
            db.upsert_medicine(&MedicineDetails::new(name, 10, "g"))
                .unwrap();
        }
        db
    }

    fn names(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let db = setup_db();
        let suggester = MedicineSuggester::new(&db);

        let results = suggester.suggest("甘草", 10).unwrap();
        assert_eq!(results[0].name, "甘草");
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn test_prefix_beats_substring() {
        let db = setup_db();
        let suggester = MedicineSuggester::new(&db);

        let results = suggester.suggest("甘草", 10).unwrap();
        let ranked = names(&results);

        let prefix = ranked.iter().position(|n| *n == "甘草片").unwrap();
        let substring = ranked.iter().position(|n| *n == "炙甘草").unwrap();
        assert!(prefix < substring);
    }

    #[test]
    fn test_unrelated_names_are_dropped() {
        let db = setup_db();
        let suggester = MedicineSuggester::new(&db);

        let results = suggester.suggest("甘草", 10).unwrap();
        assert!(!names(&results).contains(&"金银花"));
    }

    #[test]
    fn test_fuzzy_catches_near_misses() {
        let db = setup_db();
        let suggester = MedicineSuggester::new(&db);

        // Shares two of three characters with 甘草片
        let results = suggester.suggest("甘草丸", 10).unwrap();
        assert!(names(&results).contains(&"甘草片"));
    }

    #[test]
    fn test_blank_query_lists_catalog_order() {
        let db = setup_db();
        let suggester = MedicineSuggester::new(&db);

        let results = suggester.suggest("  ", 3).unwrap();
        assert_eq!(names(&results), vec!["甘草", "甘草片", "炙甘草"]);
    }

    #[test]
    fn test_limit_and_default() {
        let db = setup_db();
        let suggester = MedicineSuggester::new(&db);

        assert_eq!(suggester.suggest("", 2).unwrap().len(), 2);
        // Zero means the default cap, which exceeds this catalog
        assert_eq!(suggester.suggest("", 0).unwrap().len(), 5);
    }

    #[test]
    fn test_fuzzy_match() {
        assert!(fuzzy_match("甘草", "甘草") > 0.99);
        assert!(fuzzy_match("甘草", "黄芪") < 0.3);
    }
}
