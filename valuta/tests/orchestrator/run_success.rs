use std::sync::Arc;

use crate::helpers::{EUR, USD, oct, usd_bulletin, valuta_with};
use valuta::{CancellationToken, RateRecord};
use valuta_mock::{MockFetcher, RecordingReporter, bulletin_xml};

#[tokio::test]
async fn three_day_window_reports_max_min_average() {
    let fetcher = Arc::new(
        MockFetcher::builder()
            .returns(oct(22), usd_bulletin(oct(22), "75,28"))
            .returns(oct(21), usd_bulletin(oct(21), "75,29"))
            .returns(oct(20), usd_bulletin(oct(20), "75,30"))
            .build(),
    );
    let reporter = Arc::new(RecordingReporter::new());
    let valuta = valuta_with(&fetcher)
        .reporter(reporter.clone())
        .build()
        .unwrap();

    let summary = valuta.run(3, oct(22)).await.unwrap();

    assert_eq!(summary.max, RateRecord::new(USD, 75.30, oct(20)));
    assert_eq!(summary.min, RateRecord::new(USD, 75.28, oct(22)));
    assert!((summary.average - 75.29).abs() < 1e-9);
    assert_eq!(summary.count, 3);

    let mut called = fetcher.calls();
    called.sort();
    assert_eq!(called, vec![oct(20), oct(21), oct(22)]);
    assert_eq!(reporter.summaries(), vec![summary]);
}

#[tokio::test]
async fn every_currency_is_aggregated_together() {
    let fetcher = Arc::new(
        MockFetcher::builder()
            .returns(
                oct(22),
                bulletin_xml(oct(22), &[(USD, 1, "81,00"), (EUR, 1, "94,50")]),
            )
            .returns(
                oct(21),
                bulletin_xml(oct(21), &[("Japanese Yen", 100, "53,40")]),
            )
            .build(),
    );
    let valuta = valuta_with(&fetcher).build().unwrap();

    let summary = valuta.run(2, oct(22)).await.unwrap();

    assert_eq!(summary.max.name(), EUR);
    assert_eq!(summary.min.name(), "Japanese Yen");
    assert!((summary.min.rate() - 0.534).abs() < 1e-12);
    assert_eq!(summary.count, 3);
}

#[tokio::test]
async fn weekend_requests_collapsing_onto_one_bulletin_are_not_deduplicated() {
    // Saturday and Sunday both serve Friday's bulletin.
    let friday = usd_bulletin(oct(17), "80,00");
    let fetcher = Arc::new(
        MockFetcher::builder()
            .returns(oct(19), friday.clone())
            .returns(oct(18), friday.clone())
            .returns(oct(17), friday)
            .build(),
    );
    let valuta = valuta_with(&fetcher).build().unwrap();

    let window = valuta
        .collect(3, oct(19), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(window.records.len(), 3);
    assert!(window.records.iter().all(|r| r.date() == oct(17)));

    let summary = valuta.run(3, oct(19)).await.unwrap();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.max.date(), oct(17));
}

#[tokio::test]
async fn equal_extremes_resolve_to_earliest_date_whatever_the_completion_order() {
    // The later day finishes first; the tie must still go to the earlier bulletin.
    let fetcher = Arc::new(
        MockFetcher::builder()
            .returns(oct(22), usd_bulletin(oct(22), "70,00"))
            .returns(oct(21), usd_bulletin(oct(21), "70,00"))
            .delay_for(oct(21), std::time::Duration::from_millis(30))
            .build(),
    );
    let valuta = valuta_with(&fetcher).build().unwrap();

    let summary = valuta.run(2, oct(22)).await.unwrap();
    assert_eq!(summary.max.date(), oct(21));
    assert_eq!(summary.min.date(), oct(21));
}

#[tokio::test]
async fn custom_parser_closure_is_accepted() {
    let fetcher = Arc::new(
        MockFetcher::builder()
            .responder(|date| Ok(date.format("%Y-%m-%d").to_string().into_bytes()))
            .build(),
    );
    let parser = |bytes: &[u8]| -> Result<Vec<RateRecord>, valuta::ParseError> {
        let text = String::from_utf8_lossy(bytes);
        let date = chrono::NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map_err(|_| valuta::ParseError::InvalidDate { value: text.to_string() })?;
        Ok(vec![RateRecord::new("X", 1.0, date)])
    };
    let valuta = valuta::Valuta::builder()
        .fetcher(fetcher.clone())
        .parser(Arc::new(parser))
        .build()
        .unwrap();

    let summary = valuta.run(4, oct(22)).await.unwrap();
    assert_eq!(summary.count, 4);
    assert_eq!(summary.max.date(), oct(19));
}
