use crate::error::SessionError;
use crate::models::{
    Application, ApplicationStatus, Credential, CredentialStatus, JobListing, ListingDraft,
    Profile, Role, Tab,
};
use crate::query::{self, ListingQuery};
use crate::seed::{default_profile, seed_credentials, seed_jobs};
use crate::storage::{Cache, StorageKey};
use crate::tracker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    AlreadyApplied,
    UnknownListing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarnOutcome {
    Earned,
    AlreadyEarned,
}

/// Everything one user session owns. Each mutation replaces the affected
/// collection and then mirrors it to the cache; the cache is only read at
/// construction.
pub struct Session {
    cache: Cache,
    jobs: Vec<JobListing>,
    applications: Vec<Application>,
    credentials: Vec<Credential>,
    profile: Profile,
    active_tab: Tab,
    role: Role,
}

impl Session {
    pub fn open(cache: Cache) -> Self {
        let jobs = cache.load(StorageKey::Jobs.as_str(), seed_jobs());
        let applications = cache.load(StorageKey::Applications.as_str(), Vec::new());
        let credentials = cache.load(StorageKey::Credentials.as_str(), seed_credentials());
        let profile = cache.load(StorageKey::Profile.as_str(), default_profile());
        let active_tab = cache.load(StorageKey::ActiveTab.as_str(), Tab::Explore);
        let role = cache.load(StorageKey::CurrentRole.as_str(), Role::Candidate);

        tracing::debug!(
            storage = %cache.describe(),
            jobs = jobs.len(),
            applications = applications.len(),
            "session opened"
        );

        Self {
            cache,
            jobs,
            applications,
            credentials,
            profile,
            active_tab,
            role,
        }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn jobs(&self) -> &[JobListing] {
        &self.jobs
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn find_job(&self, id: &str) -> Option<&JobListing> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn find_application(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id() == id)
    }

    pub fn has_applied(&self, listing_id: &str) -> bool {
        self.find_application(listing_id).is_some()
    }

    pub fn search(&self, query: &ListingQuery) -> Vec<JobListing> {
        query::filter(&self.jobs, query)
    }

    // --- Applications ---

    pub fn apply(&mut self, listing_id: &str) -> ApplyOutcome {
        self.apply_at(listing_id, &tracker::now())
    }

    pub fn apply_at(&mut self, listing_id: &str, at: &str) -> ApplyOutcome {
        if self.has_applied(listing_id) {
            tracing::debug!(listing_id, "duplicate application ignored");
            return ApplyOutcome::AlreadyApplied;
        }
        let Some(listing) = self.find_job(listing_id).cloned() else {
            return ApplyOutcome::UnknownListing;
        };

        let mut applications = Vec::with_capacity(self.applications.len() + 1);
        applications.push(Application::from_listing(listing, at));
        applications.extend(self.applications.iter().cloned());
        self.replace_applications(applications);

        tracing::info!(listing_id, "applied");
        ApplyOutcome::Applied
    }

    pub fn set_status(
        &mut self,
        application_id: &str,
        status: ApplicationStatus,
        at: Option<&str>,
    ) -> Result<&Application, SessionError> {
        if !self.has_applied(application_id) {
            return Err(SessionError::UnknownApplication(application_id.to_string()));
        }

        let applications = self
            .applications
            .iter()
            .map(|a| {
                if a.id() == application_id {
                    a.transition(status, at)
                } else {
                    a.clone()
                }
            })
            .collect();
        self.replace_applications(applications);

        tracing::info!(application_id, status = %status, "status changed");
        self.find_application(application_id)
            .ok_or_else(|| SessionError::UnknownApplication(application_id.to_string()))
    }

    /// Withdraw an application. Returns whether one was removed.
    pub fn cancel(&mut self, application_id: &str) -> bool {
        if !self.has_applied(application_id) {
            return false;
        }
        let applications = self
            .applications
            .iter()
            .filter(|a| a.id() != application_id)
            .cloned()
            .collect();
        self.replace_applications(applications);

        tracing::info!(application_id, "application cancelled");
        true
    }

    // --- Credentials ---

    pub fn earn_credential(&mut self, id: &str) -> Result<EarnOutcome, SessionError> {
        let credential = self
            .credentials
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| SessionError::UnknownCredential(id.to_string()))?;
        if credential.is_earned() {
            return Ok(EarnOutcome::AlreadyEarned);
        }

        let credentials: Vec<Credential> = self
            .credentials
            .iter()
            .map(|c| {
                if c.id == id {
                    Credential {
                        status: CredentialStatus::Earned,
                        ..c.clone()
                    }
                } else {
                    c.clone()
                }
            })
            .collect();
        self.credentials = credentials;
        self.cache
            .save(StorageKey::Credentials.as_str(), &self.credentials);

        tracing::info!(credential_id = id, "credential earned");
        Ok(EarnOutcome::Earned)
    }

    // --- Profile ---

    pub fn save_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.cache.save(StorageKey::Profile.as_str(), &self.profile);
        tracing::info!("profile saved");
    }

    // --- Publishing ---

    /// Validate and publish a listing at the front of the collection. A draft
    /// missing required fields changes nothing.
    pub fn publish(&mut self, draft: ListingDraft) -> Result<&JobListing, SessionError> {
        let id = self.next_listing_id();
        let listing = draft.into_listing(id)?;

        let mut jobs = Vec::with_capacity(self.jobs.len() + 1);
        jobs.push(listing);
        jobs.extend(self.jobs.iter().cloned());
        self.jobs = jobs;
        self.cache.save(StorageKey::Jobs.as_str(), &self.jobs);

        let published = &self.jobs[0];
        tracing::info!(listing_id = %published.id, "listing published");
        Ok(published)
    }

    /// `J-NNN` one past the highest numeric suffix in use.
    fn next_listing_id(&self) -> String {
        let highest = self
            .jobs
            .iter()
            .filter_map(|j| j.id.strip_prefix("J-"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("J-{:03}", highest + 1)
    }

    // --- View state ---

    pub fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.cache.save(StorageKey::ActiveTab.as_str(), &self.active_tab);
    }

    pub fn toggle_role(&mut self) -> Role {
        self.role = self.role.toggled();
        self.cache.save(StorageKey::CurrentRole.as_str(), &self.role);
        self.role
    }

    /// Restore seed data and clear every persisted key. The current view and
    /// role stay as they are for the rest of this session.
    pub fn reset(&mut self) {
        self.jobs = seed_jobs();
        self.applications = Vec::new();
        self.credentials = seed_credentials();
        self.profile = default_profile();
        for key in StorageKey::ALL {
            self.cache.remove(key.as_str());
        }
        tracing::info!("local data reset");
    }

    fn replace_applications(&mut self, applications: Vec<Application>) {
        self.applications = applications;
        self.cache
            .save(StorageKey::Applications.as_str(), &self.applications);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::storage::tests::BrokenMedium;

    fn session() -> Session {
        Session::open(Cache::in_memory())
    }

    #[test]
    fn cold_start_uses_seed_data() {
        let s = session();
        assert_eq!(s.jobs().len(), 6);
        assert!(s.applications().is_empty());
        assert_eq!(s.credentials().len(), 3);
        assert_eq!(s.profile(), &default_profile());
        assert_eq!(s.active_tab(), Tab::Explore);
        assert_eq!(s.role(), Role::Candidate);
    }

    #[test]
    fn applying_twice_is_a_no_op() {
        let mut s = session();
        assert_eq!(s.apply("J-002"), ApplyOutcome::Applied);
        let after_first = s.applications().to_vec();
        assert_eq!(s.apply("J-002"), ApplyOutcome::AlreadyApplied);
        assert_eq!(s.applications(), after_first.as_slice());
    }

    #[test]
    fn applying_to_unknown_listing_changes_nothing() {
        let mut s = session();
        assert_eq!(s.apply("J-404"), ApplyOutcome::UnknownListing);
        assert!(s.applications().is_empty());
    }

    #[test]
    fn newest_application_comes_first() {
        let mut s = session();
        s.apply("J-001");
        s.apply("J-003");
        let ids: Vec<_> = s.applications().iter().map(|a| a.id()).collect();
        assert_eq!(ids, ["J-003", "J-001"]);
    }

    #[test]
    fn status_change_only_touches_the_target() {
        let mut s = session();
        s.apply_at("J-001", "t0");
        s.apply_at("J-002", "t0");
        let updated = s
            .set_status("J-002", ApplicationStatus::Interview, Some("2024-01-01 12:00"))
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Interview);
        assert_eq!(updated.history.len(), 2);

        let other = s.find_application("J-001").unwrap();
        assert_eq!(other.status, ApplicationStatus::UnderReview);
        assert_eq!(other.history.len(), 1);
    }

    #[test]
    fn status_change_on_unknown_application_is_an_error() {
        let mut s = session();
        assert_eq!(
            s.set_status("J-001", ApplicationStatus::Offer, None).unwrap_err(),
            SessionError::UnknownApplication("J-001".into())
        );
    }

    #[test]
    fn cancel_removes_and_reports() {
        let mut s = session();
        s.apply("J-004");
        assert!(s.cancel("J-004"));
        assert!(!s.cancel("J-004"));
        assert!(s.applications().is_empty());
        // a cancelled listing can be applied to again
        assert_eq!(s.apply("J-004"), ApplyOutcome::Applied);
    }

    #[test]
    fn earning_is_one_way() {
        let mut s = session();
        assert_eq!(s.earn_credential("C-001"), Ok(EarnOutcome::Earned));
        assert_eq!(s.earn_credential("C-001"), Ok(EarnOutcome::AlreadyEarned));
        assert!(s.credentials()[0].is_earned());
        assert!(!s.credentials()[1].is_earned());
        assert!(matches!(
            s.earn_credential("C-999"),
            Err(SessionError::UnknownCredential(_))
        ));
    }

    #[test]
    fn publish_prepends_with_next_id() {
        let mut s = session();
        let draft = ListingDraft {
            title: "UX Internship".into(),
            organization: "Acme".into(),
            locality: "Ñuñoa".into(),
            requirements: "Figma, ".into(),
            description: "Support the design team.".into(),
            ..ListingDraft::default()
        };
        let published = s.publish(draft).unwrap().clone();
        assert_eq!(published.id, "J-007");
        assert_eq!(published.requirements, vec!["Figma"]);
        assert_eq!(published.category, Category::Internship);
        assert_eq!(s.jobs()[0], published);
        assert_eq!(s.jobs().len(), 7);
    }

    #[test]
    fn publish_without_description_is_rejected() {
        let mut s = session();
        let before = s.jobs().to_vec();
        let draft = ListingDraft {
            title: "UX Internship".into(),
            locality: "Ñuñoa".into(),
            ..ListingDraft::default()
        };
        let err = s.publish(draft).unwrap_err();
        assert!(matches!(err, SessionError::Validation(ref v) if v.missing == ["description"]));
        assert_eq!(s.jobs(), before.as_slice());
    }

    #[test]
    fn state_is_mirrored_and_reloaded() {
        let mut s = session();
        s.apply_at("J-002", "t0");
        s.earn_credential("C-002").unwrap();
        s.set_tab(Tab::Credentials);
        s.toggle_role();

        let reopened = Session::open(s.cache);
        assert_eq!(reopened.applications().len(), 1);
        assert!(reopened.credentials()[1].is_earned());
        assert_eq!(reopened.active_tab(), Tab::Credentials);
        assert_eq!(reopened.role(), Role::Organization);
    }

    #[test]
    fn reset_restores_seeds_and_clears_storage() {
        let mut s = session();
        s.apply("J-001");
        s.earn_credential("C-003").unwrap();
        s.reset();

        assert!(s.applications().is_empty());
        assert_eq!(s.credentials(), seed_credentials().as_slice());
        for key in StorageKey::ALL {
            assert_eq!(s.cache().try_load::<serde_json::Value>(key.as_str()).unwrap(), None);
        }
    }

    #[test]
    fn broken_storage_degrades_to_memory_only() {
        let mut s = Session::open(Cache::new(Box::new(BrokenMedium)));
        assert_eq!(s.jobs().len(), 6);
        assert_eq!(s.apply("J-001"), ApplyOutcome::Applied);
        assert_eq!(s.applications().len(), 1);
    }
}
