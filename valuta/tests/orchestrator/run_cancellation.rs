use std::sync::Arc;
use std::time::Duration;

use crate::helpers::{oct, usd_bulletin, valuta_with};
use valuta::{CancellationToken, ValutaError};
use valuta_mock::{DayBehavior, MockFetcher, RecordingReporter};

#[tokio::test]
async fn cancelled_before_start_fetches_nothing() {
    let fetcher = Arc::new(
        MockFetcher::builder()
            .responder(|date| Ok(usd_bulletin(date, "75,00")))
            .build(),
    );
    let reporter = Arc::new(RecordingReporter::new());
    let valuta = valuta_with(&fetcher)
        .reporter(reporter.clone())
        .build()
        .unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = valuta
        .run_with_cancellation(10, oct(22), &cancel)
        .await
        .unwrap_err();

    assert_eq!(err, ValutaError::Cancelled);
    assert_eq!(fetcher.call_count(), 0);
    assert_eq!(reporter.call_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancelling_mid_run_aborts_in_flight_units() {
    let fetcher = Arc::new(
        MockFetcher::builder()
            .fallback(DayBehavior::Hang)
            .build(),
    );
    let reporter = Arc::new(RecordingReporter::new());
    let valuta = valuta_with(&fetcher)
        .reporter(reporter.clone())
        .max_in_flight(3)
        .no_deadline()
        .build()
        .unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        valuta.run_with_cancellation(90, oct(22), &cancel),
    )
    .await
    .expect("cancellation must end the run")
    .unwrap_err();

    assert_eq!(err, ValutaError::Cancelled);
    assert!(err.is_cancellation());
    assert!(fetcher.call_count() <= 3);
    assert_eq!(reporter.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn deadline_exceeded_fails_the_run() {
    let fetcher = Arc::new(
        MockFetcher::builder()
            .returns(oct(22), usd_bulletin(oct(22), "75,00"))
            .hangs(oct(21))
            .build(),
    );
    let reporter = Arc::new(RecordingReporter::new());
    let valuta = valuta_with(&fetcher)
        .reporter(reporter.clone())
        .deadline(Duration::from_secs(10))
        .build()
        .unwrap();

    let err = valuta.run(2, oct(22)).await.unwrap_err();

    assert_eq!(
        err,
        ValutaError::DeadlineExceeded {
            deadline: Duration::from_secs(10)
        }
    );
    assert!(err.is_cancellation());
    assert_eq!(reporter.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_but_timely_run_meets_the_deadline() {
    let fetcher = Arc::new(
        MockFetcher::builder()
            .responder(|date| Ok(usd_bulletin(date, "75,00")))
            .delay(Duration::from_secs(2))
            .build(),
    );
    let valuta = valuta_with(&fetcher)
        .max_in_flight(2)
        .deadline(Duration::from_secs(10))
        .build()
        .unwrap();

    // Four days, two at a time, two seconds each.
    let summary = valuta.run(4, oct(22)).await.unwrap();
    assert_eq!(summary.count, 4);
}
