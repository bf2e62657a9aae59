use super::*;
use crate::validation::ValidationError;
use crate::widgets::test_support::{MockStorefront, context};

use std::time::Duration;

fn widget(api: &Arc<MockStorefront>, debounce_ms: u64) -> SearchWidget {
    let settings = SearchSettings { debounce: Duration::from_millis(debounce_ms), min_chars: 2, limit: 5 };
    SearchWidget::new(context(api), settings)
}

#[tokio::test]
async fn short_query_hides_without_fetching() {
    let api = MockStorefront::new();
    let search = widget(&api, 0);

    assert_eq!(search.input(" a ").await.unwrap(), SearchOutcome::Hidden);
    assert!(!search.is_visible());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn query_fetches_limited_results() {
    let api = MockStorefront::new();
    let search = widget(&api, 0);

    let SearchOutcome::Results(results) = search.input(" shirt ").await.unwrap() else {
        panic!("expected results");
    };
    assert_eq!(results.len(), 5);
    assert!(search.is_visible());
    assert_eq!(search.query(), "shirt");
    assert_eq!(api.calls(), vec!["suggest shirt"]);
}

#[tokio::test]
async fn debounce_collapses_rapid_typing() {
    let api = MockStorefront::new();
    let search = widget(&api, 50);

    let (first, second) = tokio::join!(search.input("sh"), search.input("shi"));
    assert_eq!(first.unwrap(), SearchOutcome::Stale);
    assert!(matches!(second.unwrap(), SearchOutcome::Results(_)));
    assert_eq!(api.calls(), vec!["suggest shi"]);
}

#[tokio::test]
async fn slow_results_never_overwrite_newer_ones() {
    let api = MockStorefront::new();
    api.delay_suggest("slow", Duration::from_millis(100));
    let search = widget(&api, 0);

    let newer = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        search.input("fast").await
    };
    let (older, newer) = tokio::join!(search.input("slow"), newer);

    assert_eq!(older.unwrap(), SearchOutcome::Stale);
    assert!(matches!(newer.unwrap(), SearchOutcome::Results(_)));
    assert_eq!(search.query(), "fast");
    assert_eq!(search.results()[0].title, "fast 1");
}

#[tokio::test]
async fn shortening_query_hides_previous_results() {
    let api = MockStorefront::new();
    let search = widget(&api, 0);
    search.input("shirt").await.unwrap();
    search.input("s").await.unwrap();
    assert!(!search.is_visible());
    assert!(search.results().is_empty());
}

#[tokio::test]
async fn fetch_error_is_returned_for_newest_input() {
    let api = MockStorefront::new();
    api.fail_with(503, "unavailable");
    let search = widget(&api, 0);
    let err = search.input("shirt").await.unwrap_err();
    assert!(matches!(err, WidgetError::Api(_)));
}

#[tokio::test]
async fn submit_requires_a_term() {
    let api = MockStorefront::new();
    let search = widget(&api, 0);

    let err = search
        .handle(SearchAction::Submit("   ".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, WidgetError::Validation(ValidationError::EmptySearch)));
    assert_eq!(err.user_message(), "Please enter a search term");

    let outcome = search.handle(SearchAction::Submit(" linen ".into())).await.unwrap();
    assert_eq!(outcome, Outcome::Search(SearchOutcome::Submitted("linen".into())));
}

#[tokio::test]
async fn clear_hides_panel() {
    let api = MockStorefront::new();
    let search = widget(&api, 0);
    search.input("shirt").await.unwrap();
    search.handle(SearchAction::Clear).await.unwrap();
    assert!(!search.is_visible());
}
