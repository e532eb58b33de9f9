//! Consistency checks over the seed data and the core operations, run against
//! the live cache. Backs the `check` command.

use std::collections::HashSet;

use crate::models::{Application, ApplicationStatus, Category, JobListing, ListingDraft, REGIONS};
use crate::query::{filter, ListingQuery, Selector};
use crate::seed::seed_jobs;
use crate::storage::Cache;

const SCRATCH_KEY: &str = "__check__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub info: Option<String>,
}

impl CheckResult {
    fn new(name: &'static str, passed: bool) -> Self {
        Self {
            name,
            passed,
            info: None,
        }
    }

    fn with_info(mut self, info: String) -> Self {
        self.info = Some(info);
        self
    }
}

pub fn run(cache: &Cache) -> Vec<CheckResult> {
    let seed = seed_jobs();
    let mut results = Vec::new();

    results.push(
        CheckResult::new("seed listings present", seed.len() >= 4)
            .with_info(format!("len={}", seed.len())),
    );

    results.push(CheckResult::new(
        "required fields present",
        seed.iter().all(has_required_fields),
    ));

    // Categories are typed; what's left to check is that they round-trip by name.
    results.push(CheckResult::new(
        "categories valid",
        seed.iter()
            .all(|j| j.category.as_str().parse::<Category>() == Ok(j.category)),
    ));

    results.push(CheckResult::new(
        "regions valid",
        seed.iter().all(|j| REGIONS.contains(&j.region.as_str())),
    ));

    results.push(CheckResult::new(
        "requirements are non-empty strings",
        seed.iter()
            .all(|j| j.requirements.iter().all(|r| !r.trim().is_empty())),
    ));

    results.push(CheckResult::new(
        "search 'data' finds J-004",
        contains_id(&filter(&seed, &ListingQuery::new("data", Selector::Any, Selector::Any)), "J-004"),
    ));

    results.push(check_publish_prepends(&seed));

    results.push(CheckResult::new(
        "AND filter RM + Part-time finds J-002",
        contains_id(
            &filter(
                &seed,
                &ListingQuery::new("", Selector::Only("RM".into()), Selector::Only(Category::PartTime)),
            ),
            "J-002",
        ),
    ));

    let ids: HashSet<&str> = seed.iter().map(|j| j.id.as_str()).collect();
    results.push(CheckResult::new("listing ids unique", ids.len() == seed.len()));

    results.push(check_transition(&seed));

    results.push(CheckResult::new(
        "AND filter text + RM + Full-time finds J-004",
        contains_id(
            &filter(
                &seed,
                &ListingQuery::new("data", Selector::Only("RM".into()), Selector::Only(Category::FullTime)),
            ),
            "J-004",
        ),
    ));

    results.push(check_persistence(cache));

    results
}

fn has_required_fields(job: &JobListing) -> bool {
    [
        &job.id,
        &job.title,
        &job.organization,
        &job.region,
        &job.locality,
        &job.work_mode,
        &job.hours_per_week,
        &job.description,
    ]
    .iter()
    .all(|f| !f.trim().is_empty())
        && !job.requirements.is_empty()
}

fn contains_id(jobs: &[JobListing], id: &str) -> bool {
    jobs.iter().any(|j| j.id == id)
}

fn check_publish_prepends(seed: &[JobListing]) -> CheckResult {
    let draft = ListingDraft {
        title: "UX Internship".into(),
        organization: "Acme".into(),
        locality: "Ñuñoa".into(),
        requirements: "Figma".into(),
        description: "Support the design team.".into(),
        ..ListingDraft::default()
    };
    let passed = match draft.into_listing("J-999".into()) {
        Ok(listing) => {
            let mut list = vec![listing];
            list.extend(seed.iter().cloned());
            list[0].id == "J-999"
        }
        Err(_) => false,
    };
    CheckResult::new("publishing inserts at the front", passed)
}

fn check_transition(seed: &[JobListing]) -> CheckResult {
    let Some(listing) = seed.first().cloned() else {
        return CheckResult::new("transition records status and timestamp", false);
    };
    let app = Application::from_listing(listing, "2024-01-01 09:00:00")
        .transition(ApplicationStatus::Interview, Some("2024-01-01 12:00"));
    let passed = app.status == ApplicationStatus::Interview
        && app
            .history
            .last()
            .is_some_and(|h| h.status == ApplicationStatus::Interview && h.timestamp == "2024-01-01 12:00");
    CheckResult::new("transition records status and timestamp", passed)
}

fn check_persistence(cache: &Cache) -> CheckResult {
    let name = "persistence round trip";
    let sample = serde_json::json!({ "a": 1 });
    let result = cache
        .try_save(SCRATCH_KEY, &sample)
        .and_then(|_| cache.try_load::<serde_json::Value>(SCRATCH_KEY));
    cache.remove(SCRATCH_KEY);

    match result {
        Ok(Some(value)) => CheckResult::new(name, value == sample),
        Ok(None) => CheckResult::new(name, false).with_info("nothing stored".into()),
        Err(e) => CheckResult::new(name, false).with_info(e.to_string()),
    }
}
