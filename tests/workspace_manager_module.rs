use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::fs;
use std::time::Duration;
use taskspace::config::{WorkspaceSettings, METADATA_FILE_NAME};
use taskspace::workspace::{Workspace, WorkspaceError, WorkspaceManager, DEFAULT_SECTIONS};
use tempfile::tempdir;

fn section_names(workspace: &Workspace) -> Vec<String> {
    workspace
        .sections()
        .iter()
        .map(|section| section.as_str().to_string())
        .collect()
}

#[test]
fn workspace_manager_creates_default_and_extra_sections_before_metadata() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path().join("workspaces"));

    let workspace = manager
        .create_with_sections("review", &["drafts", "logs"])
        .expect("create workspace");

    assert!(workspace.id().starts_with("review-"));
    assert_eq!(workspace.task_type().as_str(), "review");
    assert_eq!(
        section_names(&workspace),
        vec!["input", "output", "resources", "scratch", "drafts", "logs"]
    );
    for section in workspace.sections() {
        assert!(workspace.path().join(section.as_str()).is_dir());
    }
    assert!(workspace.path().join(METADATA_FILE_NAME).is_file());
    assert_eq!(workspace.path().parent(), Some(manager.root()));
}

#[test]
fn workspace_manager_round_trips_handles_through_metadata() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path());

    let created = manager
        .create_with_sections("extract", &["notes"])
        .expect("create workspace");

    let opened = manager.open(created.id()).expect("open workspace");
    assert_eq!(opened, created);

    let loaded = Workspace::load(created.path()).expect("load workspace");
    assert_eq!(loaded.id(), created.id());
    assert_eq!(loaded.sections(), created.sections());
    assert_eq!(loaded.created_at(), created.created_at());
}

#[test]
fn workspace_manager_metadata_record_has_documented_shape() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path());
    let workspace = manager.create("summarize").expect("create workspace");

    let raw = fs::read_to_string(workspace.path().join(METADATA_FILE_NAME)).expect("read metadata");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("parse metadata");
    assert_eq!(value["id"], workspace.id());
    assert_eq!(value["taskType"], "summarize");
    assert!(value["createdAt"].is_string());
    assert_eq!(value["dirs"], serde_json::json!(DEFAULT_SECTIONS));
}

#[test]
fn workspace_manager_generates_distinct_ids_for_same_instant() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path());
    let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

    let first = manager.create_at::<&str>("batch", &[], now).expect("first");
    let second = manager.create_at::<&str>("batch", &[], now).expect("second");
    assert_ne!(first.id(), second.id());
    assert_eq!(manager.list().expect("list").len(), 2);
}

#[test]
fn workspace_manager_rejects_invalid_task_types_and_sections() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path().join("root"));

    let err = manager.create("bad type").expect_err("invalid task type");
    assert!(matches!(err, WorkspaceError::InvalidTaskType { .. }));

    let err = manager
        .create_with_sections("ok", &["../escape"])
        .expect_err("invalid section");
    assert!(matches!(err, WorkspaceError::InvalidSectionName { .. }));

    assert!(!manager.root().exists(), "nothing is created on validation failure");
}

#[test]
fn workspace_manager_reports_pre_epoch_clock_as_id_generation_failure() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path().join("root"));
    let before_epoch = Utc.timestamp_millis_opt(-1).single().expect("timestamp");

    let err = manager
        .create_at::<&str>("review", &[], before_epoch)
        .expect_err("pre-epoch clock");
    assert!(matches!(err, WorkspaceError::IdGeneration(_)), "{err:?}");
    assert!(err.to_string().contains("unix epoch"), "{err}");
    assert!(manager.list().expect("list").is_empty());
    assert!(manager.find_orphans().expect("orphans").is_empty());
}

#[test]
fn workspace_manager_lists_nothing_when_root_is_missing() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path().join("never-created"));
    assert!(manager.list().expect("list").is_empty());
    assert!(manager.find_orphans().expect("orphans").is_empty());
    assert_eq!(manager.prune_stale(Duration::ZERO).expect("prune"), 0);
}

#[test]
fn workspace_manager_list_skips_missing_and_corrupt_metadata() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path());
    let kept = manager.create("keep").expect("create workspace");

    fs::create_dir_all(temp.path().join("no-metadata/output")).expect("orphan dir");
    let corrupt = temp.path().join("corrupt");
    fs::create_dir_all(&corrupt).expect("corrupt dir");
    fs::write(corrupt.join(METADATA_FILE_NAME), "{\"id\": ").expect("corrupt metadata");
    let wrong_shape = temp.path().join("wrong-shape");
    fs::create_dir_all(&wrong_shape).expect("wrong shape dir");
    fs::write(wrong_shape.join(METADATA_FILE_NAME), "{\"id\": \"x\"}").expect("partial metadata");
    fs::write(temp.path().join("stray-file.txt"), "not a workspace").expect("stray file");

    let listed = manager.list().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id(), kept.id());

    let orphans = manager.find_orphans().expect("orphans");
    assert_eq!(
        orphans,
        vec![
            temp.path().join("corrupt"),
            temp.path().join("no-metadata"),
            temp.path().join("wrong-shape"),
        ]
    );
}

#[test]
fn workspace_manager_lists_oldest_first() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path());
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    let newer = manager
        .create_at::<&str>("t", &[], base + ChronoDuration::hours(2))
        .expect("newer");
    let older = manager.create_at::<&str>("t", &[], base).expect("older");

    let ids: Vec<String> = manager
        .list()
        .expect("list")
        .iter()
        .map(|ws| ws.id().to_string())
        .collect();
    assert_eq!(ids, vec![older.id().to_string(), newer.id().to_string()]);
}

#[test]
fn workspace_manager_cleanup_is_idempotent() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path());
    let workspace = manager.create("cleanup").expect("create workspace");

    manager.cleanup(&workspace).expect("first cleanup");
    assert!(!workspace.path().exists());
    manager.cleanup(&workspace).expect("second cleanup is a no-op");
    assert!(manager.list().expect("list").is_empty());
}

#[test]
fn workspace_manager_prune_removes_only_workspaces_at_or_past_max_age() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path());
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    let old = manager.create_at::<&str>("t", &[], base).expect("old");
    let boundary = manager
        .create_at::<&str>("t", &[], base + ChronoDuration::minutes(30))
        .expect("boundary");
    let fresh = manager
        .create_at::<&str>("t", &[], base + ChronoDuration::minutes(31))
        .expect("fresh");

    let now = base + ChronoDuration::minutes(90);
    let removed = manager
        .prune_stale_at(Duration::from_secs(60 * 60), now)
        .expect("prune");
    assert_eq!(removed, 2);
    assert!(!old.path().exists());
    assert!(!boundary.path().exists());
    assert!(fresh.path().exists());

    let again = manager
        .prune_stale_at(Duration::from_secs(60 * 60), now)
        .expect("prune again");
    assert_eq!(again, 0);
}

#[test]
fn workspace_manager_prune_zero_removes_fresh_workspace() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path());
    manager.create("fresh").expect("create workspace");

    assert_eq!(manager.prune_stale(Duration::ZERO).expect("prune"), 1);
    assert!(manager.list().expect("list").is_empty());
    assert_eq!(manager.prune_stale(Duration::ZERO).expect("prune again"), 0);
}

#[test]
fn workspace_manager_prune_never_touches_orphans() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path());
    let orphan = temp.path().join("half-created");
    fs::create_dir_all(orphan.join("input")).expect("orphan");

    assert_eq!(manager.prune_stale(Duration::ZERO).expect("prune"), 0);
    assert!(orphan.exists());

    assert!(manager.cleanup_path(&orphan).expect("reclaim orphan"));
    assert!(!orphan.exists());
    assert!(!manager.cleanup_path(&orphan).expect("already gone"));
}

#[test]
fn workspace_manager_cleanup_path_refuses_paths_outside_root() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path().join("root"));
    let outside = temp.path().join("elsewhere");
    fs::create_dir_all(&outside).expect("outside dir");

    let err = manager.cleanup_path(&outside).expect_err("outside root");
    assert!(matches!(err, WorkspaceError::OutsideRoot { .. }));
    assert!(outside.exists());
}

#[test]
fn workspace_manager_open_reports_not_found() {
    let temp = tempdir().expect("tempdir");
    let manager = WorkspaceManager::new(temp.path());

    assert!(manager.open("missing-id").expect_err("missing").is_not_found());
    assert!(manager.open("../etc").expect_err("traversal").is_not_found());
}

#[test]
fn workspace_manager_applies_settings_sections_and_stale_age() {
    let temp = tempdir().expect("tempdir");
    let mut settings = WorkspaceSettings::new(temp.path().join("managed"));
    settings.extra_sections = vec!["shared".to_string()];
    settings.stale_after_seconds = Some(3600);
    settings.validate().expect("valid settings");

    let manager = WorkspaceManager::from_settings(&settings);
    let workspace = manager
        .create_with_sections("t", &["local", "shared"])
        .expect("create workspace");
    assert_eq!(
        section_names(&workspace),
        vec!["input", "output", "resources", "scratch", "shared", "local"]
    );

    assert_eq!(manager.prune_configured().expect("prune configured"), 0);
    assert!(workspace.path().exists());
    assert_eq!(
        WorkspaceManager::new(temp.path().join("managed"))
            .prune_configured()
            .expect("unconfigured prune"),
        0
    );
}

#[test]
fn workspace_managers_over_different_roots_are_independent() {
    let temp = tempdir().expect("tempdir");
    let a = WorkspaceManager::new(temp.path().join("a"));
    let b = WorkspaceManager::new(temp.path().join("b"));

    a.create("one").expect("create in a");
    assert_eq!(a.list().expect("list a").len(), 1);
    assert!(b.list().expect("list b").is_empty());
}
