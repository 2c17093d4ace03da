use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use leetcode_tracker::stability::{page_ready, wait_for_stability, wait_until};
use tokio::sync::watch;
use tokio::time::{Instant, sleep};

use crate::common::{LOADING_URL, assert_elapsed, MockPage, SNAPSHOT_URL, config, fixture};

#[tokio::test(start_paused = true)]
async fn resolves_immediately_when_already_true() {
    let start = Instant::now();
    assert!(wait_until(None, Duration::from_millis(200), Duration::from_secs(5), || true).await);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn times_out_with_false() {
    let checks = AtomicUsize::new(0);
    let start = Instant::now();
    let ready = wait_until(None, Duration::from_millis(200), Duration::from_secs(1), || {
        checks.fetch_add(1, Ordering::SeqCst);
        false
    })
    .await;
    assert!(!ready);
    assert_elapsed(start, Duration::from_secs(1));
    // Initial check plus one per poll tick before the deadline.
    assert!(checks.load(Ordering::SeqCst) >= 5);
}

#[tokio::test(start_paused = true)]
async fn mutation_wakes_before_next_poll() {
    let (tx, rx) = watch::channel(0u64);
    let flag = Arc::new(AtomicBool::new(false));

    let setter = {
        let flag = flag.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(30)).await;
            flag.store(true, Ordering::SeqCst);
            tx.send_modify(|n| *n += 1);
            tx
        })
    };

    let start = Instant::now();
    let ready = wait_until(Some(rx), Duration::from_secs(10), Duration::from_secs(60), || {
        flag.load(Ordering::SeqCst)
    })
    .await;
    assert!(ready);
    assert_elapsed(start, Duration::from_millis(30));
    drop(setter.await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn closed_mutation_channel_falls_back_to_polling() {
    let (tx, rx) = watch::channel(0u64);
    drop(tx);
    let start = Instant::now();
    let ready = wait_until(Some(rx), Duration::from_millis(100), Duration::from_millis(450), || {
        start.elapsed() >= Duration::from_millis(250)
    })
    .await;
    assert!(ready);
    assert_elapsed(start, Duration::from_millis(300));
}

#[test]
fn readiness_signals() {
    assert!(page_ready(&MockPage::new(SNAPSHOT_URL, fixture("submission_snapshot"))));
    assert!(page_ready(&MockPage::new(SNAPSHOT_URL, fixture("dehydrated"))));
    // Editor present, no snapshot.
    assert!(page_ready(&MockPage::new(SNAPSHOT_URL, fixture("dom_only"))));
    assert!(!page_ready(&MockPage::new(LOADING_URL, fixture("loading"))));
}

#[tokio::test(start_paused = true)]
async fn hydration_ends_the_wait() {
    let page = MockPage::shared(SNAPSHOT_URL, fixture("loading"));
    let hydrate = {
        let page = page.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(1_250)).await;
            page.set_html(fixture("submission_snapshot"));
        })
    };

    let start = Instant::now();
    let ready = wait_for_stability(page.as_ref(), &config(), Duration::from_secs(5)).await;
    assert!(ready);
    assert_elapsed(start, Duration::from_millis(1_250));
    hydrate.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn never_ready_returns_false_at_timeout() {
    let page = MockPage::new(LOADING_URL, fixture("loading"));
    let start = Instant::now();
    assert!(!wait_for_stability(&page, &config(), Duration::from_secs(3)).await);
    assert_elapsed(start, Duration::from_secs(3));
}
