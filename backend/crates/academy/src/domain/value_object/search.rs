//! Catalogue search criteria

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSort {
    Low,
    High,
}

/// Filters over published courses. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseSearch {
    /// Matched case-insensitively against title, subtitle and category
    pub query: String,
    /// Lower-cased category names
    pub categories: Vec<String>,
    /// Newest first when unset
    pub sort_by_price: Option<PriceSort>,
}

impl CourseSearch {
    pub fn new(query: Option<&str>, categories: Option<&str>, sort_by_price: Option<PriceSort>) -> Self {
        let categories = categories
            .unwrap_or_default()
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();

        Self {
            query: query.unwrap_or_default().trim().to_string(),
            categories,
            sort_by_price,
        }
    }

    /// In-process counterpart of the SQL filter
    pub fn matches(&self, title: &str, subtitle: Option<&str>, category: &str) -> bool {
        let needle = self.query.to_lowercase();
        let text_match = needle.is_empty()
            || title.to_lowercase().contains(&needle)
            || subtitle.is_some_and(|s| s.to_lowercase().contains(&needle))
            || category.to_lowercase().contains(&needle);
        let category_match =
            self.categories.is_empty() || self.categories.contains(&category.to_lowercase());
        text_match && category_match
    }

    /// ILIKE pattern with `%`, `_` and `\` escaped
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.query.len() + 2);
        escaped.push('%');
        for ch in self.query.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped.push('%');
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_split_and_normalized() {
        let search = CourseSearch::new(Some("  rust "), Some("Web, ,Data Science"), None);
        assert_eq!(search.query, "rust");
        assert_eq!(search.categories, vec!["web", "data science"]);
    }

    #[test]
    fn test_matches() {
        let search = CourseSearch::new(Some("react"), None, None);
        assert!(search.matches("Mastering React", None, "Web"));
        assert!(search.matches("Frontend", Some("with REACT hooks"), "Web"));
        assert!(!search.matches("Rust", None, "Systems"));

        let by_category = CourseSearch::new(None, Some("systems"), None);
        assert!(by_category.matches("Rust", None, "Systems"));
        assert!(!by_category.matches("React", None, "Web"));
        assert!(CourseSearch::default().matches("Anything", None, "Any"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let search = CourseSearch::new(Some("100%_off"), None, None);
        assert_eq!(search.like_pattern(), "%100\\%\\_off%");
    }

    #[test]
    fn test_price_sort_deserialize() {
        assert_eq!(
            serde_json::from_str::<PriceSort>("\"low\"").unwrap(),
            PriceSort::Low
        );
        assert!(serde_json::from_str::<PriceSort>("\"cheap\"").is_err());
    }
}
