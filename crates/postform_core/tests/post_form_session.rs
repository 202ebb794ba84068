use postform_core::{
    ConnectionManager, DbConfig, FormField, PostFormSession, PostRepository, SqlitePostRepository,
    SubmitOutcome,
};

fn session() -> PostFormSession {
    PostFormSession::start(ConnectionManager::new(DbConfig::in_memory())).unwrap()
}

fn fill(session: &mut PostFormSession, author: &str, category: &str, title: &str, content: &str) {
    session.set_author(author);
    session.set_category(category);
    session.set_title(title);
    session.set_content(content);
}

fn count(session: &mut PostFormSession, table: &str) -> i64 {
    session
        .connections_mut()
        .get_connection()
        .unwrap()
        .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get(0)
        })
        .unwrap()
}

#[test]
fn start_loads_existing_posts_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::default_in(dir.path());
    {
        let mut first = PostFormSession::start(ConnectionManager::new(config.clone())).unwrap();
        assert!(first.posts().is_empty());
        fill(&mut first, "a", "c", "older", "x");
        first.submit().unwrap();
        fill(&mut first, "a", "c", "newer", "x");
        first.submit().unwrap();
        first.close().unwrap();
    }

    let reopened = PostFormSession::start(ConnectionManager::new(config)).unwrap();
    let titles = reopened
        .post_rows()
        .into_iter()
        .map(|row| row.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["newer", "older"]);
}

#[test]
fn new_session_does_not_touch_storage() {
    let session = PostFormSession::new(ConnectionManager::new(DbConfig::in_memory()));
    assert!(session.posts().is_empty());
    assert!(!session.has_error());
    assert!(session.draft().is_empty());
}

#[test]
fn empty_author_is_rejected_without_writes() {
    let mut session = session();
    fill(&mut session, "", "X", "Y", "Z");

    let outcome = session.submit().unwrap();

    assert_eq!(outcome, SubmitOutcome::Rejected(FormField::Author));
    assert!(session.has_error());
    assert!(session.posts().is_empty());
    assert_eq!(session.draft().category(), "X");
    for table in ["author", "category", "post"] {
        assert_eq!(count(&mut session, table), 0, "{table} should stay empty");
    }
}

#[test]
fn each_empty_field_rejects_submit() {
    let cases = [
        (FormField::Author, ["", "c", "t", "b"]),
        (FormField::Category, ["a", "", "t", "b"]),
        (FormField::Title, ["a", "c", "", "b"]),
        (FormField::Content, ["a", "c", "t", ""]),
    ];

    for (expected, [author, category, title, content]) in cases {
        let mut session = session();
        fill(&mut session, author, category, title, content);
        assert_eq!(
            session.submit().unwrap(),
            SubmitOutcome::Rejected(expected)
        );
        assert!(session.has_error());
        assert_eq!(count(&mut session, "post"), 0);
    }
}

#[test]
fn valid_submit_stores_one_of_each_and_resets_form() {
    let mut session = session();
    fill(&mut session, "", "c", "t", "b");
    session.submit().unwrap();
    assert!(session.has_error());

    fill(&mut session, "Au1", "Cat1", "T1", "C1");
    let outcome = session.submit().unwrap();

    let SubmitOutcome::Saved(post_id) = outcome else {
        panic!("expected saved outcome, got {outcome:?}");
    };
    assert!(!session.has_error());
    assert!(session.draft().is_empty());
    assert_eq!(count(&mut session, "post"), 1);
    assert_eq!(count(&mut session, "author"), 1);
    assert_eq!(count(&mut session, "category"), 1);

    let rows = session.post_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, post_id);
    assert_eq!(rows[0].title, "T1");
    assert_eq!(rows[0].content, "C1");

    let conn = session.connections_mut().get_connection().unwrap();
    let stored = SqlitePostRepository::new(conn)
        .get_post(post_id)
        .unwrap()
        .expect("post round-trips");
    assert_eq!(stored.author.name, "Au1");
    assert_eq!(stored.categories[0].name, "Cat1");
}

#[test]
fn later_posts_are_listed_first() {
    let mut session = session();
    fill(&mut session, "a", "c", "A", "x");
    session.submit().unwrap();
    fill(&mut session, "a", "c", "B", "x");
    session.submit().unwrap();

    let titles = session
        .posts()
        .iter()
        .map(|post| post.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["B", "A"]);
}

#[test]
fn refresh_without_save_is_idempotent() {
    let mut session = session();
    fill(&mut session, "a", "c", "t", "x");
    session.submit().unwrap();

    let first = session.refresh_posts().unwrap().to_vec();
    let second = session.refresh_posts().unwrap().to_vec();
    assert_eq!(first, second);
}

#[test]
fn repeated_submit_of_same_values_stores_two_posts() {
    let mut session = session();
    fill(&mut session, "a", "c", "t", "x");
    let first = session.submit().unwrap();
    fill(&mut session, "a", "c", "t", "x");
    let second = session.submit().unwrap();

    assert_ne!(first, second);
    assert_eq!(session.posts().len(), 2);
    assert_eq!(count(&mut session, "author"), 2);
    assert_eq!(count(&mut session, "category"), 2);
}

#[test]
fn storage_failure_propagates_and_keeps_draft() {
    let mut session = session();
    session
        .connections_mut()
        .get_connection()
        .unwrap()
        .execute_batch("DROP TABLE post_categories_category;")
        .unwrap();

    fill(&mut session, "a", "c", "t", "x");
    assert!(session.submit().is_err());
    assert_eq!(session.draft().title(), "t");
    assert!(!session.has_error());
    assert_eq!(count(&mut session, "author"), 0);
}

#[test]
fn session_restarts_after_category_delete() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::default_in(dir.path());
    {
        let mut first = PostFormSession::start(ConnectionManager::new(config.clone())).unwrap();
        fill(&mut first, "a", "c1", "A", "x");
        first.submit().unwrap();
        fill(&mut first, "a", "c2", "B", "x");
        first.submit().unwrap();
        first
            .connections_mut()
            .get_connection()
            .unwrap()
            .execute_batch("DELETE FROM category WHERE id = 1;")
            .unwrap();
        first.close().unwrap();
    }

    let reopened = PostFormSession::start(ConnectionManager::new(config)).unwrap();
    let titles = reopened
        .post_rows()
        .into_iter()
        .map(|row| row.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["B", "A"]);
}

#[test]
fn refresh_failure_after_commit_still_reports_saved() {
    let mut session = session();
    fill(&mut session, "a", "c", "A", "x");
    session.submit().unwrap();
    assert!(!session.posts_stale());

    // Every later link insert also adds a post whose title is a blob, which
    // the list query cannot read back as text.
    session
        .connections_mut()
        .get_connection()
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER unreadable_post AFTER INSERT ON post_categories_category
             BEGIN
                 INSERT INTO post (title, content, author_id)
                 SELECT X'00', 'c', author_id FROM post WHERE id = NEW.post_id;
             END;",
        )
        .unwrap();

    fill(&mut session, "a", "c", "B", "x");
    let outcome = session.submit().unwrap();

    let SubmitOutcome::Saved(post_id) = outcome else {
        panic!("expected saved outcome, got {outcome:?}");
    };
    assert!(session.posts_stale());
    assert!(session.draft().is_empty());
    assert!(!session.has_error());
    let titles = session
        .posts()
        .iter()
        .map(|post| post.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["A"]);

    let stored: String = session
        .connections_mut()
        .get_connection()
        .unwrap()
        .query_row("SELECT title FROM post WHERE id = ?1;", [post_id.get()], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(stored, "B");
}
