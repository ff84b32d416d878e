//! Session scenarios over the in-memory store.

use roster_client::notice::{self, NoticeReceiver};
use roster_client::{Config, MemoryStore, NoticeLevel, Session};
use roster_engine::{SortKey, SortSpec, Student, StudentDraft, StudentPatch};

fn five_students() -> Vec<Student> {
    vec![
        Student::new("s_1", "Alice Tran", "alice@example.com", "Computer Science"),
        Student::new("s_2", "Sok Dara", "dara@example.com", "Business"),
        Student::new("s_3", "John Roe", "john@example.com", "Engineering"),
        Student::new("s_4", "Malis Chea", "malis@example.com", "Arts"),
        Student::new("s_5", "Vanna Keo", "vanna@example.com", "Business"),
    ]
}

async fn loaded(records: Vec<Student>) -> (Session<MemoryStore>, MemoryStore, NoticeReceiver) {
    let store = MemoryStore::with_records(records);
    let (tx, rx) = notice::channel();
    let mut session = Session::new(store.clone(), tx);
    session.load().await.unwrap();
    (session, store, rx)
}

fn messages(rx: &mut NoticeReceiver) -> Vec<String> {
    notice::drain(rx).into_iter().map(|n| n.message).collect()
}

fn sorted_ids(records: &[Student]) -> Vec<String> {
    let mut ids: Vec<String> = records.iter().map(|s| s.id.clone()).collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn delete_then_undo_restores_the_record_set() {
    let (mut session, store, mut rx) = loaded(five_students()).await;
    let before = session.roster().records().to_vec();

    let removed = session.delete("s_3").await.unwrap();
    assert_eq!(removed.name, "John Roe");
    assert!(!session.roster().contains("s_3"));
    assert!(!store.records().iter().any(|s| s.id == "s_3"));

    assert_eq!(session.undo().await.unwrap(), 1);
    assert_eq!(sorted_ids(session.roster().records()), sorted_ids(&before));
    assert_eq!(session.roster().get("s_3"), Some(&before[2]));
    assert_eq!(sorted_ids(&store.records()), sorted_ids(&before));
    assert_eq!(
        messages(&mut rx),
        vec!["Deleted - you can undo", "Undo delete"]
    );
}

#[tokio::test]
async fn undo_persists_with_one_save() {
    let (mut session, store, _rx) = loaded(five_students()).await;
    session.delete("s_1").await.unwrap();
    session.undo().await.unwrap();

    let calls = store.calls();
    assert_eq!(calls, vec!["list", "delete:s_1", "save:5"]);
    assert!(!calls.iter().any(|c| c == "create"));
}

#[tokio::test]
async fn bulk_delete_selection_then_undo() {
    let (mut session, store, mut rx) = loaded(five_students()).await;
    for id in ["s_1", "s_3", "s_5"] {
        assert!(session.toggle(id).unwrap());
    }

    assert_eq!(session.bulk_delete_selected().await.unwrap(), 3);
    assert_eq!(sorted_ids(session.roster().records()), vec!["s_2", "s_4"]);
    assert!(session.roster().selection().is_empty());
    assert_eq!(store.records().len(), 2);

    assert_eq!(session.undo().await.unwrap(), 3);
    let ids: Vec<&str> = session
        .roster()
        .records()
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(ids, vec!["s_2", "s_4", "s_1", "s_3", "s_5"]);
    assert_eq!(
        messages(&mut rx),
        vec!["Deleted selected", "Undo bulk delete"]
    );
}

#[tokio::test]
async fn bulk_delete_with_nothing_selected() {
    let (mut session, store, mut rx) = loaded(five_students()).await;

    assert_eq!(session.bulk_delete_selected().await.unwrap(), 0);
    assert_eq!(session.bulk_delete(&["ghost".to_string()]).await.unwrap(), 0);
    assert_eq!(store.calls(), vec!["list"]);
    assert!(session.roster().undo_log().is_empty());
    assert_eq!(
        messages(&mut rx),
        vec!["No items selected", "No items selected"]
    );
}

#[tokio::test]
async fn partial_bulk_failure_restores_store_and_keeps_memory() {
    let (mut session, store, mut rx) = loaded(five_students()).await;
    store.fail_delete_of("s_3");

    let err = session
        .bulk_delete(&["s_1".to_string(), "s_3".to_string(), "s_5".to_string()])
        .await
        .unwrap_err();

    assert!(err.is_persistence());
    assert_eq!(session.roster().len(), 5);
    assert!(session.roster().undo_log().is_empty());
    assert_eq!(
        store.calls(),
        vec!["list", "delete:s_1", "delete:s_3", "save:5"]
    );
    assert_eq!(sorted_ids(&store.records()), sorted_ids(&five_students()));

    let notices = notice::drain(&mut rx);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn bulk_delete_failing_on_first_id_skips_the_restore() {
    let (mut session, store, _rx) = loaded(five_students()).await;
    store.fail_delete_of("s_1");
    let ids = ["s_1".to_string(), "s_3".to_string()];

    assert!(session.bulk_delete(&ids).await.unwrap_err().is_persistence());
    assert_eq!(store.calls(), vec!["list", "delete:s_1"]);
    assert_eq!(session.roster().len(), 5);
    assert!(session.roster().undo_log().is_empty());

    store.clear_failures();
    assert_eq!(session.bulk_delete(&ids).await.unwrap(), 2);
    assert_eq!(store.records().len(), 3);
}

#[tokio::test]
async fn failed_update_leaves_memory_alone() {
    let (mut session, store, _rx) = loaded(five_students()).await;
    store.fail_next();

    let patch = StudentPatch {
        major: Some("Law".into()),
        ..Default::default()
    };
    let err = session.update("s_4", patch).await.unwrap_err();
    assert!(err.is_persistence());
    assert_eq!(session.roster().get("s_4").unwrap().major, "Arts");
    assert_eq!(store.records()[3].major, "Arts");
}

#[tokio::test]
async fn failed_clone_appends_nothing() {
    let (mut session, store, mut rx) = loaded(five_students()).await;
    store.fail_next();

    assert!(session.clone_record("s_2").await.unwrap_err().is_persistence());
    assert_eq!(session.roster().len(), 5);
    assert_eq!(store.records().len(), 5);

    let notices = notice::drain(&mut rx);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn assigned_ids_reach_the_store() {
    let store = MemoryStore::new().omitting_ids();
    let (tx, _rx) = notice::channel();
    let mut session = Session::new(store.clone(), tx);

    let created = session
        .create(StudentDraft::new("A", "a@x", ""))
        .await
        .unwrap();
    assert_eq!(store.records(), vec![created.clone()]);
    assert_eq!(store.calls(), vec!["create", "save:1"]);

    session.delete(&created.id).await.unwrap();
    assert!(session.roster().is_empty());
    assert!(store.records().is_empty());
}

#[tokio::test]
async fn colliding_store_id_is_replaced_everywhere() {
    let (mut session, store, _rx) =
        loaded(vec![Student::new("mem_1", "Alice Tran", "alice@example.com", "")]).await;

    let created = session
        .create(StudentDraft::new("Sok Dara", "dara@example.com", "Business"))
        .await
        .unwrap();
    assert_ne!(created.id, "mem_1");
    assert_eq!(session.roster().get("mem_1").unwrap().name, "Alice Tran");
    assert_eq!(store.records(), session.roster().records().to_vec());
}

#[tokio::test]
async fn selection_never_holds_deleted_ids() {
    let (mut session, _store, _rx) = loaded(five_students()).await;
    session.toggle("s_2").unwrap();
    session.toggle("s_4").unwrap();

    session.delete("s_2").await.unwrap();
    assert_eq!(session.roster().selection().ids(), vec!["s_4".to_string()]);

    session.load().await.unwrap();
    assert!(session
        .roster()
        .selection()
        .iter()
        .all(|id| session.roster().contains(id)));

    assert!(session.toggle("s_2").unwrap_err().is_not_found());
}

#[tokio::test]
async fn clone_appends_a_copy_under_a_new_id() {
    let (mut session, store, mut rx) = loaded(five_students()).await;

    let copy = session.clone_record("s_2").await.unwrap();
    assert_eq!(copy.name, "Sok Dara (copy)");
    assert_eq!(copy.email, "dara@example.com");
    assert_eq!(copy.major, "Business");
    assert_ne!(copy.id, "s_2");
    assert_eq!(session.roster().len(), 6);
    assert_eq!(session.roster().records().last(), Some(&copy));
    assert_eq!(store.records().len(), 6);
    assert_eq!(messages(&mut rx), vec!["Cloned"]);

    assert!(session.clone_record("ghost").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn update_merges_and_rejects_missing_records() {
    let (mut session, store, mut rx) = loaded(five_students()).await;

    let patch = StudentPatch {
        major: Some("Law".into()),
        ..Default::default()
    };
    let updated = session.update("s_4", patch.clone()).await.unwrap();
    assert_eq!(updated.major, "Law");
    assert_eq!(updated.name, "Malis Chea");
    assert_eq!(store.records()[3].major, "Law");

    let err = session.update("ghost", patch).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!store.calls().iter().any(|c| c == "update:ghost"));

    let blank = StudentPatch {
        email: Some("  ".into()),
        ..Default::default()
    };
    assert!(session.update("s_4", blank).await.unwrap_err().is_validation());
    assert_eq!(
        messages(&mut rx),
        vec![
            "Updated",
            "Student ghost not found",
            "Please fill name and email"
        ]
    );
}

#[tokio::test]
async fn failed_undo_keeps_the_entry() {
    let (mut session, store, _rx) = loaded(five_students()).await;
    session.delete("s_1").await.unwrap();

    store.fail_next();
    assert!(session.undo().await.is_err());
    assert_eq!(session.roster().undo_log().len(), 1);
    assert!(!session.roster().contains("s_1"));

    assert_eq!(session.undo().await.unwrap(), 1);
    assert!(session.roster().contains("s_1"));
}

#[tokio::test]
async fn nothing_to_undo() {
    let (mut session, store, mut rx) = loaded(five_students()).await;
    assert_eq!(session.undo().await.unwrap(), 0);
    assert_eq!(store.calls(), vec!["list"]);
    assert_eq!(messages(&mut rx), vec!["Nothing to undo"]);
}

#[tokio::test]
async fn capped_undo_log_forgets_the_oldest_delete() {
    let config = Config {
        undo_depth: Some(2),
        ..Config::default()
    };
    let store = MemoryStore::with_records(five_students());
    let (tx, _rx) = notice::channel();
    let mut session = Session::with_config(store, &config, tx);
    session.load().await.unwrap();

    assert_eq!(session.roster().undo_log().capacity(), Some(2));

    for id in ["s_1", "s_2", "s_3"] {
        session.delete(id).await.unwrap();
    }
    assert_eq!(session.roster().undo_log().len(), 2);

    assert_eq!(session.undo().await.unwrap(), 1);
    assert_eq!(session.undo().await.unwrap(), 1);
    assert_eq!(session.undo().await.unwrap(), 0);
    assert!(session.roster().contains("s_2"));
    assert!(session.roster().contains("s_3"));
    assert!(!session.roster().contains("s_1"));
}

#[tokio::test]
async fn configured_page_size_drives_the_frame() {
    let config = Config {
        page_size: 2,
        ..Config::default()
    };
    let (tx, _rx) = notice::channel();
    let mut session = Session::with_config(MemoryStore::with_records(five_students()), &config, tx);
    session.load().await.unwrap();

    session.set_sort(SortSpec::asc(SortKey::Name));
    session.set_page(9);
    let frame = session.frame();
    assert_eq!(frame.total_pages, 3);
    assert_eq!(frame.current_page, 3);
    assert_eq!(frame.page_slice.len(), 1);
    assert_eq!(frame.page_slice[0].name, "Vanna Keo");
}

#[tokio::test]
async fn select_page_only_touches_visible_rows() {
    let (mut session, _store, _rx) = loaded(five_students()).await;
    session.set_page_size(2);
    session.next_page();
    session.select_page(true);

    let frame = session.frame();
    assert_eq!(frame.current_page, 2);
    assert_eq!(frame.selected_ids, vec!["s_2".to_string(), "s_4".to_string()]);

    session.select_page(false);
    assert!(session.frame().selected_ids.is_empty());
}

#[tokio::test]
async fn csv_export_then_import() {
    let (mut session, _store, _rx) = loaded(vec![
        Student::new("s_1", "Roe, John", "john@example.com", "Engineering"),
        Student::new("s_2", "Dara \"Dee\" Sok", "dara@example.com", ""),
    ])
    .await;
    let csv = session.export_csv();

    let (mut fresh, _store, mut rx) = loaded(vec![]).await;
    assert_eq!(fresh.import_csv(&csv).await.unwrap(), 2);

    let names: Vec<&str> = fresh.roster().records().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Roe, John", "Dara \"Dee\" Sok"]);
    assert_eq!(fresh.roster().records()[1].major, "");
    assert_eq!(messages(&mut rx), vec!["Imported 2 rows"]);
}

#[tokio::test]
async fn import_keeps_rows_without_required_fields() {
    let (mut session, _store, _rx) = loaded(vec![]).await;
    let imported = session
        .import_csv("FullName,Email,Major\n\"\",nobody@example.com,Arts\n")
        .await
        .unwrap();
    assert_eq!(imported, 1);
    assert_eq!(session.roster().records()[0].name, "");
}

#[tokio::test]
async fn majors_and_chart_counts() {
    let (mut session, _store, _rx) = loaded(five_students()).await;
    session
        .create(StudentDraft::new("No Major", "none@example.com", ""))
        .await
        .unwrap();

    assert_eq!(
        session.majors(),
        vec!["Computer Science", "Business", "Engineering", "Arts"]
    );
    let counts = session.major_counts();
    assert!(counts.contains(&("Business".to_string(), 2)));
    assert!(counts.contains(&("Undeclared".to_string(), 1)));
}
