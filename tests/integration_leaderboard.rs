use chrono::{DateTime, Duration, Local};

use typerank::auth::Authenticator;
use typerank::leaderboard::{self, SortBy, Timeframe};
use typerank::result::TestMode;
use typerank::scorer::{Scorer, SessionConfig, Transition};
use typerank::storage::{ResultStore, Store};

/// Type `text` into a fresh scorer with `gap_ms` between keys and return the finished scorer.
fn play(target: &str, typed: &str, gap_ms: i64, start: DateTime<Local>) -> Scorer {
    let mut scorer = Scorer::new(
        target.to_string(),
        SessionConfig {
            mode: TestMode::Words,
            duration_secs: 60,
        },
    );
    let mut now = start;
    for c in typed.chars() {
        now += Duration::milliseconds(gap_ms);
        scorer.type_char(c, now).unwrap();
    }
    assert!(scorer.has_finished());
    scorer
}

fn save(store: &mut Store, user_id: i64, scorer: &Scorer) -> i64 {
    let result = scorer.result().unwrap().clone();
    store
        .append_result_with_keystrokes(user_id, &result, scorer.keystrokes())
        .unwrap()
}

#[test]
fn played_tests_flow_into_rankings_and_streaks() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::open(dir.path().join("typerank.db")).unwrap();
    let now = Local::now();

    let fast = store.create_user("fast", now).unwrap();
    let careful = store.create_user("careful", now).unwrap();

    // fast: quick but sloppy
    let game = play("hello world", "hxllo wxrld", 60, now);
    save(&mut store, fast.id, &game);
    // careful: slow but exact, on two consecutive days
    let game = play("hello world", "hello world", 200, now - Duration::days(1));
    save(&mut store, careful.id, &game);
    let game = play("hello world", "hello world", 180, now);
    save(&mut store, careful.id, &game);

    let by_wpm =
        leaderboard::get_leaderboard(&store, TestMode::Words, 10, SortBy::Wpm, Timeframe::All, now)
            .unwrap();
    assert_eq!(by_wpm[0].username, "fast");
    assert_eq!(by_wpm[1].username, "careful");

    let by_acc = leaderboard::get_leaderboard(
        &store,
        TestMode::Words,
        10,
        SortBy::Accuracy,
        Timeframe::All,
        now,
    )
    .unwrap();
    assert_eq!(by_acc[0].username, "careful");
    assert_eq!(by_acc[0].accuracy, 100);

    let streak = leaderboard::compute_streak(&store, careful.id, now.date_naive()).unwrap();
    assert_eq!(streak.current, 2);
    assert_eq!(streak.longest, 2);

    let stats = leaderboard::user_stats(&store, careful.id, now.date_naive()).unwrap();
    assert_eq!(stats.total_tests, 2);
    assert_eq!(stats.total_characters_typed, 22);
}

#[test]
fn keystrokes_are_stored_per_test() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::open(dir.path().join("typerank.db")).unwrap();
    let now = Local::now();
    let user = store.create_user("ada", now).unwrap();

    let game = play("abc", "abx", 150, now);
    let test_id = save(&mut store, user.id, &game);

    let keys = typerank::analytics::stored_key_analytics(&store, user.id, Some(test_id)).unwrap();
    assert_eq!(keys.len(), 3);
    let x = keys.iter().find(|k| k.key == 'x').unwrap();
    assert_eq!(x.errors, 1);
    assert_eq!(x.accuracy, 0);
}

#[test]
fn results_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typerank.db");
    let now = Local::now();
    let token;
    {
        let mut store = Store::open(&path).unwrap();
        let user = store.create_user("ada", now).unwrap();
        token = store.login("ada", now).unwrap();
        let game = play("ok", "ok", 150, now);
        save(&mut store, user.id, &game);
    }

    let store = Store::open(&path).unwrap();
    let user = store.resolve(Some(&token), now).unwrap();
    let rows = leaderboard::history(&store, user.id, 10, 0).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username, "ada");
}

#[test]
fn disqualified_tests_are_still_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::open(dir.path().join("typerank.db")).unwrap();
    let now = Local::now();
    let user = store.create_user("bot", now).unwrap();

    let mut scorer = Scorer::new(
        "fast".to_string(),
        SessionConfig {
            mode: TestMode::Words,
            duration_secs: 60,
        },
    );
    let mut last = Transition::Stayed;
    for (i, c) in "fast".chars().enumerate() {
        last = scorer
            .type_char(c, now + Duration::milliseconds(10 * i as i64))
            .unwrap();
    }
    assert!(matches!(last, Transition::Completed(ref r) if r.disqualified));
    save(&mut store, user.id, &scorer);

    let rows = leaderboard::history(&store, user.id, 10, 0).unwrap();
    assert!(rows[0].result.disqualified);
}
