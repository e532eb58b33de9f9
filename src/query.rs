use std::fmt;
use std::str::FromStr;

use crate::models::{Category, JobListing};

/// A filter criterion that is either unset (`Any`) or requires an exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector<T> {
    #[default]
    Any,
    Only(T),
}

impl<T: PartialEq> Selector<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Selector::Any => true,
            Selector::Only(wanted) => wanted == value,
        }
    }
}

impl<T: FromStr> FromStr for Selector<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("any") {
            Ok(Selector::Any)
        } else {
            s.trim().parse().map(Selector::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Any => write!(f, "Any"),
            Selector::Only(value) => write!(f, "{}", value),
        }
    }
}

/// Criteria for browsing listings. All set criteria must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub text: String,
    pub region: Selector<String>,
    pub category: Selector<Category>,
}

impl ListingQuery {
    pub fn new(
        text: impl Into<String>,
        region: Selector<String>,
        category: Selector<Category>,
    ) -> Self {
        Self {
            text: text.into(),
            region,
            category,
        }
    }

    pub fn matches(&self, job: &JobListing) -> bool {
        self.matches_text(job) && self.region.accepts(&job.region) && self.category.accepts(&job.category)
    }

    fn matches_text(&self, job: &JobListing) -> bool {
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let haystack = format!("{}{}{}", job.title, job.organization, job.description).to_lowercase();
        haystack.contains(&needle)
    }
}

/// Listings matching `query`, in their original order.
pub fn filter(listings: &[JobListing], query: &ListingQuery) -> Vec<JobListing> {
    listings
        .iter()
        .filter(|job| query.matches(job))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_jobs;

    fn ids(jobs: &[JobListing]) -> Vec<&str> {
        jobs.iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let seed = seed_jobs();
        assert_eq!(filter(&seed, &ListingQuery::default()), seed);
    }

    #[test]
    fn blank_text_is_treated_as_unset() {
        let seed = seed_jobs();
        let query = ListingQuery::new("   ", Selector::Any, Selector::Any);
        assert_eq!(filter(&seed, &query).len(), seed.len());
    }

    #[test]
    fn text_region_and_category_combine_with_and() {
        let seed = seed_jobs();
        let query = ListingQuery::new(
            "data",
            Selector::Only("RM".to_string()),
            Selector::Only(Category::FullTime),
        );
        assert_eq!(ids(&filter(&seed, &query)), ["J-004"]);
    }

    #[test]
    fn region_and_category_find_weekend_support() {
        let seed = seed_jobs();
        let query = ListingQuery::new(
            "",
            Selector::Only("RM".to_string()),
            Selector::Only(Category::PartTime),
        );
        assert_eq!(ids(&filter(&seed, &query)), ["J-002"]);
    }

    #[test]
    fn text_search_is_case_insensitive_and_spans_organization() {
        let seed = seed_jobs();
        let query = ListingQuery::new("  FINDATA ", Selector::Any, Selector::Any);
        assert_eq!(ids(&filter(&seed, &query)), ["J-004"]);
    }

    #[test]
    fn no_match_is_an_empty_result() {
        let seed = seed_jobs();
        let query = ListingQuery::new("astronaut", Selector::Any, Selector::Any);
        assert!(filter(&seed, &query).is_empty());
    }

    #[test]
    fn region_match_is_exact() {
        let seed = seed_jobs();
        let query = ListingQuery::new("", Selector::Only("rm".to_string()), Selector::Any);
        assert!(filter(&seed, &query).is_empty());
    }

    #[test]
    fn combined_result_is_within_each_single_criterion() {
        let seed = seed_jobs();
        let texts = ["", "data", "intern", "fundación", "a"];
        let regions = [Selector::Any, Selector::Only("RM".to_string()), Selector::Only("V".to_string())];
        let categories = [
            Selector::Any,
            Selector::Only(Category::Volunteer),
            Selector::Only(Category::FullTime),
        ];

        for text in texts {
            for region in &regions {
                for category in &categories {
                    let combined = filter(&seed, &ListingQuery::new(text, region.clone(), category.clone()));
                    let by_text = filter(&seed, &ListingQuery::new(text, Selector::Any, Selector::Any));
                    let by_region = filter(&seed, &ListingQuery::new("", region.clone(), Selector::Any));
                    let by_category = filter(&seed, &ListingQuery::new("", Selector::Any, category.clone()));
                    for job in &combined {
                        assert!(by_text.contains(job));
                        assert!(by_region.contains(job));
                        assert!(by_category.contains(job));
                    }
                    assert_eq!(
                        combined,
                        filter(&seed, &ListingQuery::new(text, region.clone(), category.clone()))
                    );
                }
            }
        }
    }

    #[test]
    fn selector_parses_any_sentinel() {
        assert_eq!("ANY".parse::<Selector<Category>>(), Ok(Selector::Any));
        assert_eq!(
            "part-time".parse::<Selector<Category>>(),
            Ok(Selector::Only(Category::PartTime))
        );
        assert_eq!(
            "VIII".parse::<Selector<String>>(),
            Ok(Selector::Only("VIII".to_string()))
        );
    }
}
