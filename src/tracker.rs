//! Status lifecycle of a single application.
//!
//! Applications are values: every transition returns a new `Application` and
//! leaves the original untouched. Any status may follow any other, including
//! itself. The history is an audit log of reviewer actions, so re-entering the
//! current status still appends an entry.

use crate::models::{Application, ApplicationStatus, HistoryEntry, JobListing};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time in the format stored in `appliedAt` and history.
pub fn now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

impl Application {
    /// A fresh application under review, stamped at `at`.
    pub fn from_listing(listing: JobListing, at: impl Into<String>) -> Self {
        let at = at.into();
        Self {
            listing,
            status: ApplicationStatus::UnderReview,
            applied_at: at.clone(),
            history: vec![HistoryEntry {
                status: ApplicationStatus::UnderReview,
                timestamp: at,
            }],
        }
    }

    /// Move to `status`, recording it at `at` or at the current time.
    pub fn transition(&self, status: ApplicationStatus, at: Option<&str>) -> Self {
        let timestamp = at.map(str::to_string).unwrap_or_else(now);
        let mut history = self.history.clone();
        history.push(HistoryEntry { status, timestamp });
        Self {
            status,
            history,
            ..self.clone()
        }
    }

    /// History is non-empty and ends in the current status.
    pub fn is_consistent(&self) -> bool {
        self.history.last().map(|h| h.status) == Some(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_jobs;

    fn application(id: &str) -> Application {
        let listing = seed_jobs()
            .into_iter()
            .find(|j| j.id == id)
            .unwrap();
        Application::from_listing(listing, "2024-01-01 09:00:00")
    }

    #[test]
    fn new_application_starts_under_review_with_one_entry() {
        let app = application("J-002");
        assert_eq!(app.status, ApplicationStatus::UnderReview);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.applied_at, "2024-01-01 09:00:00");
        assert!(app.is_consistent());
    }

    #[test]
    fn transition_appends_entry_with_given_timestamp() {
        let app = application("J-002");
        let next = app.transition(ApplicationStatus::Interview, Some("2024-01-01 12:00"));

        assert_eq!(next.status, ApplicationStatus::Interview);
        assert_eq!(next.history.len(), 2);
        assert_eq!(
            next.history.last(),
            Some(&HistoryEntry {
                status: ApplicationStatus::Interview,
                timestamp: "2024-01-01 12:00".to_string(),
            })
        );
        // the original value is untouched
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.status, ApplicationStatus::UnderReview);
    }

    #[test]
    fn every_status_is_reachable_from_every_status() {
        for from in ApplicationStatus::ALL {
            let start = application("J-001").transition(from, Some("t0"));
            for to in ApplicationStatus::ALL {
                let next = start.transition(to, Some("t1"));
                assert_eq!(next.status, to);
                assert_eq!(next.history.len(), start.history.len() + 1);
                assert!(next.is_consistent());
            }
        }
    }

    #[test]
    fn reentering_current_status_is_still_recorded() {
        let app = application("J-003")
            .transition(ApplicationStatus::UnderReview, Some("t1"))
            .transition(ApplicationStatus::UnderReview, Some("t2"));
        let statuses: Vec<_> = app.history.iter().map(|h| h.status).collect();
        assert_eq!(statuses, vec![ApplicationStatus::UnderReview; 3]);
    }

    #[test]
    fn history_keeps_construction_order() {
        let app = application("J-004")
            .transition(ApplicationStatus::Offer, Some("2024-03-01 10:00:00"))
            .transition(ApplicationStatus::Interview, Some("2024-02-01 10:00:00"));
        let stamps: Vec<_> = app.history.iter().map(|h| h.timestamp.as_str()).collect();
        assert_eq!(
            stamps,
            ["2024-01-01 09:00:00", "2024-03-01 10:00:00", "2024-02-01 10:00:00"]
        );
    }

    #[test]
    fn transition_without_override_stamps_now() {
        let next = application("J-005").transition(ApplicationStatus::Rejected, None);
        let stamp = &next.history[1].timestamp;
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
    }
}
