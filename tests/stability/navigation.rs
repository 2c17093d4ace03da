use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use leetcode_tracker::{
    ChannelNavigation, Difficulty, ExtractedRecord, NavigationEvent, NavigationKind,
    NavigationSource, Performance, SessionState, SessionTracker, Status, TestCases,
};
use tokio::time::timeout;

fn record(name: &str) -> ExtractedRecord {
    ExtractedRecord {
        problem_name: name.to_string(),
        difficulty: Difficulty::Easy,
        language: "Rust".into(),
        code: "fn main() {}".into(),
        status: Status::Accepted,
        test_cases: TestCases {
            passed: 1,
            total: 1,
        },
        performance: Performance::default(),
        tags: vec![],
        description_html: None,
        url: "https://leetcode.com/problems/a/".into(),
        timestamp: "2026-01-01T00:00:00.000Z".into(),
        notes: String::new(),
    }
}

#[test]
fn navigation_produces_a_new_state() {
    let initial = SessionState::new("/problems/a/").with_assembled(record("A"));
    let next = initial.navigated(&NavigationEvent::new(NavigationKind::Push, "/problems/b/"));

    assert_eq!(initial.page_version, 0);
    assert!(initial.last_assembled.is_some());

    assert_eq!(next.current_path, "/problems/b/");
    assert_eq!(next.page_version, 1);
    assert!(next.last_assembled.is_none());
}

#[test]
fn stale_assembly_is_not_cached() {
    let tracker = SessionTracker::new("/problems/a/");
    let version = tracker.page_version();
    tracker.observe(&NavigationEvent::new(NavigationKind::Replace, "/problems/b/"));

    assert!(!tracker.record_assembled(version, record("A")));
    assert!(tracker.state().last_assembled.is_none());

    assert!(tracker.record_assembled(tracker.page_version(), record("B")));
    let cached = tracker.state().last_assembled.unwrap();
    assert_eq!(cached.problem_name, "B");
}

#[tokio::test]
async fn channel_streams_are_independent() {
    let nav = ChannelNavigation::new();
    let mut first = nav.events();
    let mut second = nav.events();

    nav.emit(NavigationEvent::new(NavigationKind::Push, "/problems/b/"));
    nav.emit(NavigationEvent::new(NavigationKind::Pop, "/problems/a/"));

    for stream in [&mut first, &mut second] {
        let a = stream.next().await.unwrap();
        let b = stream.next().await.unwrap();
        assert_eq!(a.kind, NavigationKind::Push);
        assert_eq!(a.path, "/problems/b/");
        assert_eq!(b.kind, NavigationKind::Pop);
    }
}

#[tokio::test(start_paused = true)]
async fn tracker_follows_a_source() {
    let nav = Arc::new(ChannelNavigation::new());
    let tracker = SessionTracker::new("/problems/a/");
    let mut watcher = tracker.subscribe();
    let follower = tracker.spawn_follow(&*nav);

    nav.emit(NavigationEvent::new(NavigationKind::Push, "/problems/b/"));
    watcher.changed().await.unwrap();
    assert_eq!(watcher.borrow().current_path, "/problems/b/");

    nav.emit(NavigationEvent::new(NavigationKind::Pop, "/problems/a/"));
    watcher.changed().await.unwrap();

    let state = tracker.state();
    assert_eq!(state.current_path, "/problems/a/");
    assert_eq!(state.page_version, 2);
    follower.abort();
}

#[tokio::test]
async fn event_emitted_right_after_spawn_follow_is_observed() {
    let nav = ChannelNavigation::new();
    let tracker = SessionTracker::new("/problems/a/");
    let mut watcher = tracker.subscribe();
    let follower = tracker.spawn_follow(&nav);

    nav.emit(NavigationEvent::new(NavigationKind::Push, "/problems/b/"));
    timeout(Duration::from_secs(1), watcher.changed())
        .await
        .expect("event was dropped")
        .unwrap();

    let state = tracker.state();
    assert_eq!(state.page_version, 1);
    assert_eq!(state.current_path, "/problems/b/");
    follower.abort();
}

#[tokio::test]
async fn follow_consumes_a_stream_until_it_ends() {
    let tracker = SessionTracker::new("/problems/a/");
    let events = futures::stream::iter([
        NavigationEvent::new(NavigationKind::Push, "/problems/b/"),
        NavigationEvent::new(NavigationKind::Replace, "/problems/c/"),
    ])
    .boxed();

    tracker.follow(events).await;

    let state = tracker.state();
    assert_eq!(state.page_version, 2);
    assert_eq!(state.current_path, "/problems/c/");
}
