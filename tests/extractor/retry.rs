use std::time::Duration;

use leetcode_tracker::{Difficulty, ExtractorConfig, Extractor};
use tokio::time::{Instant, sleep};

use crate::common::{DOM_URL, MockPage, assert_elapsed, fixture, hydrated_dom_only};

#[tokio::test(start_paused = true)]
async fn late_snapshot_fills_the_gaps() {
    let page = MockPage::shared(DOM_URL, fixture("dom_only"));
    let hydrate = {
        let page = page.clone();
        tokio::spawn(async move {
            // Lands during the retry delay, after the first pass.
            sleep(Duration::from_millis(1_000)).await;
            page.set_html(hydrated_dom_only());
        })
    };

    let record = Extractor::new(page.clone()).extract_all().await.unwrap();
    hydrate.await.unwrap();

    assert_eq!(record.problem_name, "Valid Parentheses");
    assert_eq!(record.difficulty, Difficulty::Easy);
    assert_eq!(record.tags, vec!["String".to_string(), "Stack".to_string()]);
    assert!(
        record
            .description_html
            .as_deref()
            .unwrap()
            .starts_with("<p>Given a string")
    );
    // No snapshot code: the rendered lines are re-read.
    assert_eq!(
        record.code,
        "class Solution:\n  def isValid(self, s):\n    return not stack"
    );
}

#[tokio::test(start_paused = true)]
async fn complete_first_pass_skips_the_retry() {
    let page = MockPage::shared(DOM_URL, hydrated_dom_only());
    let start = Instant::now();
    let record = Extractor::new(page).extract_all().await.unwrap();

    assert_elapsed(start, Duration::from_millis(800));
    assert_eq!(record.problem_name, "Valid Parentheses");
    assert!(record.description_html.is_some());
}

#[tokio::test(start_paused = true)]
async fn retry_waits_are_configurable() {
    let config = ExtractorConfig::builder()
        .settle_delay(Duration::from_millis(10))
        .retry_delay(Duration::from_millis(20))
        .build();
    let page = MockPage::shared(DOM_URL, fixture("dom_only"));
    let start = Instant::now();

    let record = Extractor::builder(page)
        .config(config)
        .build()
        .extract_all()
        .await
        .unwrap();

    // Editor present: both stability waits return at once.
    assert_elapsed(start, Duration::from_millis(30));
    assert_eq!(record.description_html, None);
}

#[tokio::test(start_paused = true)]
async fn no_delays_config() {
    let config = ExtractorConfig::builder().no_delays().build();
    assert_eq!(config.settle_delay, Duration::ZERO);
    assert_eq!(config.poll_interval, Duration::from_millis(200));
    assert_eq!(config.max_restarts, 5);
    assert!(config.usable_code("12345678901"));
    assert!(!config.usable_code("1234567890"));
}
