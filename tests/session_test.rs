use emplea::config::Config;
use emplea::models::{ApplicationStatus, Category, HistoryEntry, ListingDraft, Role, Tab};
use emplea::query::{ListingQuery, Selector};
use emplea::storage::{open_cache, SqliteMedium, StorageMedium};
use emplea::{ApplyOutcome, Cache, EarnOutcome, Session, SessionError, StorageKey};

fn open(config: &Config) -> Session {
    Session::open(open_cache(&config.db_path()))
}

#[test]
fn given_seed_data_when_filtering_data_rm_full_time_then_only_j004_matches() {
    let session = Session::open(Cache::in_memory());
    let query = ListingQuery::new(
        "data",
        Selector::Only("RM".to_string()),
        Selector::Only(Category::FullTime),
    );

    let ids: Vec<String> = session.search(&query).into_iter().map(|j| j.id).collect();

    assert_eq!(session.jobs().len(), 6);
    assert_eq!(ids, vec!["J-004".to_string()]);
}

#[test]
fn given_application_to_j002_when_moved_to_interview_then_history_records_it() {
    let mut session = Session::open(Cache::in_memory());
    assert_eq!(session.apply("J-002"), ApplyOutcome::Applied);

    let app = session.find_application("J-002").unwrap();
    assert_eq!(app.status, ApplicationStatus::UnderReview);
    assert_eq!(app.history.len(), 1);

    let app = session
        .set_status("J-002", ApplicationStatus::Interview, Some("2024-01-01 12:00"))
        .unwrap();
    assert_eq!(app.status, ApplicationStatus::Interview);
    assert_eq!(app.history.len(), 2);
    assert_eq!(
        app.history.last(),
        Some(&HistoryEntry {
            status: ApplicationStatus::Interview,
            timestamp: "2024-01-01 12:00".to_string(),
        })
    );
}

#[test]
fn given_existing_application_when_applying_again_then_collection_is_unchanged() {
    let mut session = Session::open(Cache::in_memory());
    session.apply("J-001");
    let len = session.applications().len();

    assert_eq!(session.apply("J-001"), ApplyOutcome::AlreadyApplied);
    assert_eq!(session.applications().len(), len);
}

#[test]
fn given_pending_credential_when_earned_then_it_stays_earned() {
    let mut session = Session::open(Cache::in_memory());

    assert_eq!(session.earn_credential("C-001"), Ok(EarnOutcome::Earned));
    assert!(session.credentials()[0].is_earned());
    assert_eq!(session.earn_credential("C-001"), Ok(EarnOutcome::AlreadyEarned));
    assert!(session.credentials()[0].is_earned());
}

#[test]
fn given_draft_with_empty_description_when_publishing_then_nothing_changes() {
    let mut session = Session::open(Cache::in_memory());
    let before = session.jobs().to_vec();
    let draft = ListingDraft {
        title: "UX Internship".into(),
        organization: "Acme".into(),
        locality: "Santiago".into(),
        description: String::new(),
        ..ListingDraft::default()
    };

    let err = session.publish(draft).unwrap_err();

    match err {
        SessionError::Validation(v) => assert_eq!(v.missing, vec!["description"]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.jobs(), before.as_slice());
}

#[test]
fn given_sqlite_store_when_reopened_then_state_survives() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_data_dir(dir.path().join("nested"));

    {
        let mut session = open(&config);
        session.apply_at("J-003", "2024-02-02 10:00:00");
        session
            .set_status("J-003", ApplicationStatus::Offer, Some("2024-02-10 09:30:00"))
            .unwrap();
        session.earn_credential("C-002").unwrap();
        session.set_tab(Tab::Applications);
        session.toggle_role();
        let published = session
            .publish(ListingDraft {
                title: "Barista".into(),
                locality: "Ñuñoa".into(),
                category: Category::PartTime,
                description: "Weekend shifts.".into(),
                ..ListingDraft::default()
            })
            .unwrap();
        assert_eq!(published.id, "J-007");
    }

    let session = open(&config);
    let app = session.find_application("J-003").unwrap();
    assert_eq!(app.status, ApplicationStatus::Offer);
    assert_eq!(app.applied_at, "2024-02-02 10:00:00");
    assert_eq!(app.history.len(), 2);
    assert!(session.credentials()[1].is_earned());
    assert_eq!(session.active_tab(), Tab::Applications);
    assert_eq!(session.role(), Role::Organization);
    assert_eq!(session.jobs()[0].id, "J-007");
    assert_eq!(session.jobs().len(), 7);
}

#[test]
fn given_corrupt_stored_collection_when_opening_then_seed_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_data_dir(dir.path());
    {
        let medium = SqliteMedium::open(&config.db_path()).unwrap();
        medium.set(StorageKey::Jobs.as_str(), "[{\"id\": 1").unwrap();
        medium.set(StorageKey::ActiveTab.as_str(), "\"Tests\"").unwrap();
    }

    let session = open(&config);

    assert_eq!(session.jobs().len(), 6);
    assert_eq!(session.active_tab(), Tab::Explore);
}

#[test]
fn given_modified_store_when_reset_then_next_open_starts_from_seed() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_data_dir(dir.path());
    {
        let mut session = open(&config);
        session.apply("J-001");
        session.earn_credential("C-003").unwrap();
        session.reset();
    }

    let session = open(&config);
    assert!(session.applications().is_empty());
    assert!(session.credentials().iter().all(|c| !c.is_earned()));
    assert_eq!(session.jobs().len(), 6);
}

#[test]
fn given_unwritable_location_when_opening_then_session_runs_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "not a directory").unwrap();
    let config = Config::with_data_dir(blocker.join("sub"));

    let mut session = open(&config);

    assert_eq!(session.cache().describe(), "memory");
    assert_eq!(session.apply("J-005"), ApplyOutcome::Applied);
}
