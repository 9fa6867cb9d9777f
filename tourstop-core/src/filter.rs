//! Filtering of the catalog by free text, state and month.

use crate::catalog::Catalog;
use crate::event::TourEvent;

/// Filter inputs, read fresh from the input slots on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Trimmed, lowercased free-text query
    pub query: String,
    pub state: Option<String>,
    /// 1-12
    pub month: Option<u32>,
}

impl FilterState {
    /// Build a filter from raw slot values. Absent or empty slots are unset.
    /// A month that does not parse to 1-12 is treated as unset.
    pub fn from_inputs(query: Option<&str>, state: Option<&str>, month: Option<&str>) -> Self {
        let query = query.unwrap_or_default().trim().to_lowercase();
        let state = state.filter(|s| !s.is_empty()).map(str::to_string);
        let month = month.map(str::trim).filter(|m| !m.is_empty()).and_then(|m| {
            let parsed = m.parse::<u32>().ok().filter(|n| (1..=12).contains(n));
            if parsed.is_none() {
                tracing::debug!(month = m, "Ignoring unparseable month filter");
            }
            parsed
        });

        FilterState { query, state, month }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.state.is_none() && self.month.is_none()
    }

    pub fn matches_query(&self, event: &TourEvent) -> bool {
        self.query.is_empty() || event.search_text().contains(&self.query.to_lowercase())
    }

    pub fn matches_state(&self, event: &TourEvent) -> bool {
        match &self.state {
            Some(code) if !code.is_empty() => event.state == *code,
            _ => true,
        }
    }

    pub fn matches_month(&self, event: &TourEvent) -> bool {
        self.month.is_none_or(|m| event.month() == m)
    }

    pub fn matches(&self, event: &TourEvent) -> bool {
        self.matches_query(event) && self.matches_state(event) && self.matches_month(event)
    }
}

/// Records of `catalog` passing `filter`, in catalog order.
pub fn filter<'a>(catalog: &'a Catalog, filter: &FilterState) -> Vec<&'a TourEvent> {
    catalog.events().iter().filter(|e| filter.matches(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universities<'a>(list: &[&'a TourEvent]) -> Vec<&'a str> {
        list.iter().map(|e| e.university.as_str()).collect()
    }

    #[test]
    fn test_query_matches_university_or_city() {
        let catalog = Catalog::demo();
        let result = filter(&catalog, &FilterState::from_inputs(Some("michigan"), None, None));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].city, "Ann Arbor");

        let by_city = filter(&catalog, &FilterState::from_inputs(Some("  COLUMBUS "), None, None));
        assert_eq!(universities(&by_city), vec!["Ohio State University"]);
    }

    #[test]
    fn test_query_spans_university_and_city() {
        let catalog = Catalog::demo();
        let result = filter(&catalog, &FilterState::from_inputs(Some("university bloomington"), None, None));
        assert_eq!(universities(&result), vec!["Indiana University"]);
    }

    #[test]
    fn test_state_filter_keeps_catalog_order() {
        let catalog = Catalog::demo();
        let result = filter(&catalog, &FilterState::from_inputs(None, Some("IN"), None));
        assert_eq!(universities(&result), vec!["Indiana University", "Purdue University"]);
    }

    #[test]
    fn test_state_filter_is_exact() {
        let catalog = Catalog::demo();
        let result = filter(&catalog, &FilterState::from_inputs(None, Some("in"), None));
        assert!(result.is_empty());
    }

    #[test]
    fn test_month_filter() {
        let catalog = Catalog::demo();
        let result = filter(&catalog, &FilterState::from_inputs(None, None, Some("11")));
        assert_eq!(
            universities(&result),
            vec!["University of Michigan", "Purdue University", "Penn State University"]
        );
    }

    #[test]
    fn test_no_match_is_empty() {
        let catalog = Catalog::demo();
        assert!(filter(&catalog, &FilterState::from_inputs(Some("zzz"), None, None)).is_empty());
    }

    #[test]
    fn test_combined_predicates() {
        let catalog = Catalog::demo();
        let result = filter(&catalog, &FilterState::from_inputs(Some("university"), Some("IN"), Some("9")));
        assert_eq!(universities(&result), vec!["Indiana University"]);
    }

    #[test]
    fn test_empty_and_unparseable_slots_are_unset() {
        let state = FilterState::from_inputs(Some(""), Some(""), Some("abc"));
        assert!(state.is_empty());
        assert_eq!(FilterState::from_inputs(None, None, Some("13")).month, None);
        assert_eq!(FilterState::from_inputs(None, None, Some("09")).month, Some(9));

        let catalog = Catalog::demo();
        assert_eq!(filter(&catalog, &state).len(), catalog.len());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert!(filter(&catalog, &FilterState::default()).is_empty());
    }

    #[test]
    fn test_result_is_ordered_subsequence_and_partitions_catalog() {
        let catalog = Catalog::demo();
        let queries = [None, Some("state"), Some("university"), Some("ma")];
        let states = [None, Some("IN"), Some("PA"), Some("XX")];
        let months = [None, Some("9"), Some("10"), Some("11"), Some("12")];

        for q in queries {
            for s in states {
                for m in months {
                    let state = FilterState::from_inputs(q, s, m);
                    let result = filter(&catalog, &state);

                    // Subsequence in catalog order
                    let mut positions = result
                        .iter()
                        .map(|r| catalog.events().iter().position(|e| e.id == r.id).unwrap());
                    let mut last = None;
                    for pos in positions.by_ref() {
                        assert!(last.is_none_or(|l| pos > l), "order broken for {:?}", state);
                        last = Some(pos);
                    }

                    for event in catalog.events() {
                        let included = result.iter().any(|r| r.id == event.id);
                        assert_eq!(included, state.matches(event));
                    }
                }
            }
        }
    }
}
