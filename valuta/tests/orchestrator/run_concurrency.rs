use std::sync::Arc;
use std::time::Duration;

use crate::helpers::{oct, usd_bulletin, valuta_with};
use valuta_mock::MockFetcher;

fn slow_fetcher(delay: Duration) -> Arc<MockFetcher> {
    Arc::new(
        MockFetcher::builder()
            .responder(|date| Ok(usd_bulletin(date, "75,00")))
            .delay(delay)
            .build(),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn never_exceeds_the_ceiling_with_a_large_window() {
    let fetcher = slow_fetcher(Duration::from_millis(15));
    let valuta = valuta_with(&fetcher)
        .max_in_flight(4)
        .no_deadline()
        .build()
        .unwrap();

    let summary = valuta.run(60, oct(22)).await.unwrap();

    assert_eq!(summary.count, 60);
    assert_eq!(fetcher.call_count(), 60);
    assert!(fetcher.peak_in_flight() <= 4, "peak {}", fetcher.peak_in_flight());
    assert!(fetcher.peak_in_flight() >= 2, "units should overlap");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn default_ceiling_is_ten() {
    let fetcher = slow_fetcher(Duration::from_millis(15));
    let valuta = valuta_with(&fetcher).no_deadline().build().unwrap();

    valuta.run(90, oct(22)).await.unwrap();

    assert_eq!(fetcher.call_count(), 90);
    assert!(fetcher.peak_in_flight() <= 10, "peak {}", fetcher.peak_in_flight());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn each_day_of_the_window_is_fetched_exactly_once() {
    let fetcher = slow_fetcher(Duration::from_millis(1));
    let valuta = valuta_with(&fetcher).max_in_flight(3).build().unwrap();

    valuta.run(31, oct(31)).await.unwrap();

    let mut called = fetcher.calls();
    called.sort();
    let expected: Vec<_> = (1..=31).map(oct).collect();
    assert_eq!(called, expected);
}
