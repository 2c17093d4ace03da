use std::sync::Arc;
use std::time::Duration;

use leetcode_tracker::code::is_failure_sentinel;
use leetcode_tracker::{
    Difficulty, EditorInstance, Extractor, Performance, StaticPage, Status, TestCases, UNKNOWN,
};
use tokio::time::Instant;

use crate::common::{
    DEHYDRATED_URL, DOM_URL, LOADING_URL, MockPage, SNAPSHOT_URL, assert_elapsed, fixture,
};

#[tokio::test(start_paused = true)]
async fn snapshot_fields_win_over_dom() {
    let page = StaticPage::new(SNAPSHOT_URL, fixture("submission_snapshot")).unwrap();
    let extractor = Extractor::new(Arc::new(page));

    let record = extractor.extract_all().await.expect("record");

    // The DOM says "Something Else Entirely", "Hard" and "Java".
    assert_eq!(record.problem_name, "Two Sum");
    assert_eq!(record.difficulty, Difficulty::Easy);
    assert_eq!(record.language, "C++");
    assert!(record.code.starts_with("class Solution {\npublic:\n    vector<int> twoSum"));
    assert_eq!(record.tags, vec!["Array".to_string(), "Hash Table".to_string()]);
    assert!(
        record
            .description_html
            .as_deref()
            .unwrap()
            .contains("<code>nums</code>")
    );

    // Results always come from the DOM.
    assert_eq!(record.status, Status::Accepted);
    assert_eq!(
        record.test_cases,
        TestCases {
            passed: 63,
            total: 63
        }
    );
    assert_eq!(
        record.performance,
        Performance {
            runtime: Some("3 ms".into()),
            memory: Some("14.2 MB".into()),
            runtime_percentile: Some("91.5%".into()),
            memory_percentile: Some("40%".into()),
        }
    );
    assert_eq!(record.url, SNAPSHOT_URL);
    assert!(record.timestamp.ends_with('Z'));
    assert_eq!(record.notes, "");
}

#[tokio::test(start_paused = true)]
async fn dehydrated_cache_only_page() {
    let page = StaticPage::new(DEHYDRATED_URL, fixture("dehydrated")).unwrap();
    let record = Extractor::new(Arc::new(page)).extract_all().await.unwrap();

    assert_eq!(record.problem_name, "Merge Intervals");
    assert_eq!(record.difficulty, Difficulty::Medium);
    assert_eq!(record.language, "python3");
    assert_eq!(
        record.code,
        "def merge(intervals):\n    intervals.sort()\n    return intervals"
    );
    assert_eq!(record.status, Status::Unknown);
}

#[tokio::test(start_paused = true)]
async fn dom_only_page_uses_heuristics() {
    let page = MockPage::shared(DOM_URL, fixture("dom_only"));
    let record = Extractor::new(page).extract_all().await.unwrap();

    assert_eq!(record.problem_name, "Valid Parentheses");
    assert_eq!(record.difficulty, Difficulty::Easy);
    assert_eq!(record.language, "Python3");
    assert_eq!(
        record.code,
        "class Solution:\n  def isValid(self, s):\n    return not stack"
    );
    assert_eq!(record.status, Status::WrongAnswer);
    assert_eq!(
        record.test_cases,
        TestCases {
            passed: 14,
            total: 16
        }
    );
    assert_eq!(record.performance.runtime.as_deref(), Some("12 ms"));
    assert_eq!(record.performance.runtime_percentile.as_deref(), Some("57.3%"));
    assert!(record.tags.is_empty());
    assert_eq!(record.description_html, None);
}

#[tokio::test(start_paused = true)]
async fn editor_model_beats_dom_lines() {
    let model = "class Solution:\n    def isValid(self, s: str) -> bool:\n        return not s";
    let page = MockPage::new(DOM_URL, fixture("dom_only")).with_instances(vec![EditorInstance {
        attached: true,
        value: Some(model.into()),
    }]);
    let record = Extractor::new(Arc::new(page)).extract_all().await.unwrap();
    assert_eq!(record.code, model);
}

#[tokio::test(start_paused = true)]
async fn never_hydrating_page_still_yields_a_record() {
    let page = MockPage::shared(LOADING_URL, fixture("loading"));
    let start = Instant::now();
    let record = Extractor::new(page).extract_all().await.expect("sentinel record");

    // settle + first wait + retry delay + retry wait
    assert_elapsed(start, Duration::from_millis(800 + 5_000 + 600 + 3_000));

    assert_eq!(record.problem_name, "Climbing Stairs");
    assert_eq!(record.difficulty, Difficulty::Unknown);
    assert_eq!(record.language, UNKNOWN);
    assert!(is_failure_sentinel(&record.code));
    assert!(record.code.contains(LOADING_URL));
    assert_eq!(record.status, Status::Unknown);
    assert_eq!(record.test_cases, TestCases::default());
    assert_eq!(record.performance, Performance::default());
    assert!(record.tags.is_empty());
    assert_eq!(record.description_html, None);
}

#[tokio::test(start_paused = true)]
async fn serialized_form_keeps_every_key() {
    let page = MockPage::shared(LOADING_URL, fixture("loading"));
    let record = Extractor::new(page).extract_all().await.unwrap();
    let json = serde_json::to_value(&record).unwrap();

    for key in [
        "problemName",
        "difficulty",
        "language",
        "code",
        "status",
        "testCases",
        "performance",
        "tags",
        "descriptionHTML",
        "url",
        "timestamp",
        "notes",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["difficulty"], "Unknown");
    assert_eq!(json["status"], "Unknown");
    assert_eq!(json["testCases"], serde_json::json!({"passed": 0, "total": 0}));
    assert!(json["performance"]["runtimePercentile"].is_null());
    assert!(json["descriptionHTML"].is_null());
}

#[tokio::test(start_paused = true)]
async fn concurrent_runs_are_serialized() {
    let page = StaticPage::new(SNAPSHOT_URL, fixture("submission_snapshot")).unwrap();
    let extractor = Extractor::new(Arc::new(page));

    let start = Instant::now();
    let (a, b) = tokio::join!(extractor.extract_all(), extractor.extract_all());
    assert_eq!(a.unwrap().problem_name, "Two Sum");
    assert_eq!(b.unwrap().problem_name, "Two Sum");
    // Two settle delays back to back.
    assert_elapsed(start, Duration::from_millis(1_600));
}
