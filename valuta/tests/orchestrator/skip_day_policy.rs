use std::sync::Arc;

use crate::helpers::{oct, usd_bulletin, valuta_with};
use valuta::{CancellationToken, FailurePolicy, FetchError, ParseError, ValutaError};
use valuta_mock::{MockFetcher, bulletin_xml};

#[tokio::test]
async fn failing_days_are_skipped_and_listed() {
    let fetcher = Arc::new(
        MockFetcher::builder()
            .returns(oct(22), usd_bulletin(oct(22), "75,28"))
            .fails(oct(21), FetchError::Status { status: 500 })
            .returns(oct(20), bulletin_xml(oct(20), &[("Broken", 0, "1,00")]))
            .returns(oct(19), usd_bulletin(oct(19), "75,40"))
            .build(),
    );
    let valuta = valuta_with(&fetcher)
        .failure_policy(FailurePolicy::SkipDay)
        .build()
        .unwrap();

    let window = valuta
        .collect(4, oct(22), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(window.records.len(), 2);
    let mut skipped = window.skipped.clone();
    skipped.sort_by_key(ValutaError::date);
    assert_eq!(
        skipped,
        vec![
            ValutaError::parse(
                oct(20),
                ParseError::ZeroNominal {
                    currency: "Broken".into()
                }
            ),
            ValutaError::fetch(oct(21), FetchError::Status { status: 500 }),
        ]
    );
    assert_eq!(fetcher.call_count(), 4);
}

#[tokio::test]
async fn run_summarizes_surviving_days() {
    let fetcher = Arc::new(
        MockFetcher::builder()
            .returns(oct(22), usd_bulletin(oct(22), "75,28"))
            .fails(oct(21), FetchError::Request("timed out".into()))
            .returns(oct(20), usd_bulletin(oct(20), "75,30"))
            .build(),
    );
    let valuta = valuta_with(&fetcher)
        .failure_policy(FailurePolicy::SkipDay)
        .build()
        .unwrap();

    let summary = valuta.run(3, oct(22)).await.unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.max.date(), oct(20));
    assert_eq!(summary.min.date(), oct(22));
}

#[tokio::test]
async fn all_days_failing_is_no_data() {
    let fetcher = Arc::new(
        MockFetcher::builder()
            .responder(|_| Err(FetchError::Status { status: 500 }))
            .build(),
    );
    let valuta = valuta_with(&fetcher)
        .failure_policy(FailurePolicy::SkipDay)
        .build()
        .unwrap();

    let err = valuta.run(3, oct(22)).await.unwrap_err();
    assert_eq!(err, ValutaError::NoData { window_days: 3 });
}

#[tokio::test]
async fn cancellation_is_still_fatal() {
    let fetcher = Arc::new(MockFetcher::builder().build());
    let valuta = valuta_with(&fetcher)
        .failure_policy(FailurePolicy::SkipDay)
        .build()
        .unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = valuta
        .run_with_cancellation(3, oct(22), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err, ValutaError::Cancelled);
}
