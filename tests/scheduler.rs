//! Scheduler cadence, cancellation and drain behaviour.

use std::sync::Arc;
use std::time::Duration;

use traffic_synth::catalog::{Category, FlowDefinition, ScenarioCatalog, ScenarioEntry};
use traffic_synth::config::GeneratorSettings;
use traffic_synth::Generator;

mod common;

use common::{RecordingResources, RecordingSink};

fn log_catalog(ids: &[&str]) -> Arc<ScenarioCatalog> {
    let mut catalog = ScenarioCatalog::new();
    for id in ids {
        catalog
            .register("logs", ScenarioEntry::log(*id, Category::Info, 1.0, "m"))
            .unwrap();
    }
    Arc::new(catalog)
}

fn flow_catalog() -> Arc<ScenarioCatalog> {
    let mut catalog = ScenarioCatalog::new();
    catalog
        .register_flow(
            "crud",
            FlowDefinition {
                id: "flow.slow".into(),
                weight: 1.0,
                collection: "/api/tutorials".into(),
                create_payload: serde_json::json!({ "title": "a" }),
                update_payload: serde_json::json!({ "title": "b" }),
            },
        )
        .unwrap();
    Arc::new(catalog)
}

fn settings(scenario: &str, interval_ms: u64, drain_on_cancel: bool) -> GeneratorSettings {
    GeneratorSettings {
        interval_ms,
        scenarios: vec![scenario.to_string()],
        seed: Some(7),
        drain_on_cancel,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_slow_sink_does_not_delay_cadence() {
    let sink = Arc::new(RecordingSink::with_delay(Duration::from_millis(250)));
    let generator = Generator::new(log_catalog(&["e"]), sink.clone(), Arc::new(RecordingResources::new()));

    let handle = generator.start(&settings("logs", 100, true)).unwrap();
    tokio::time::sleep(Duration::from_millis(370)).await;
    Generator::stop(&handle);
    handle.join().await.unwrap();

    let starts = sink.tick_starts();
    assert!(starts.len() >= 3, "expected at least 3 ticks, got {}", starts.len());

    for pair in starts.windows(2).take(2) {
        let gap = pair[1].1.duration_since(pair[0].1);
        assert!(
            gap >= Duration::from_millis(60) && gap <= Duration::from_millis(180),
            "tick {} → {} gap {:?} not ~100ms",
            pair[0].0,
            pair[1].0,
            gap
        );
    }
}

#[tokio::test]
async fn test_failing_entry_does_not_skip_siblings() {
    let sink = Arc::new(RecordingSink::failing_on("X"));
    let generator = Generator::new(
        log_catalog(&["A", "X", "B"]),
        sink.clone(),
        Arc::new(RecordingResources::new()),
    );

    let handle = generator.start(&settings("logs", 50, true)).unwrap();
    tokio::time::sleep(Duration::from_millis(180)).await;
    Generator::stop(&handle);
    let summary = handle.join().await.unwrap();

    let emissions = sink.snapshot();
    for tick in 0..summary.ticks_started {
        let ids: Vec<_> = emissions
            .iter()
            .filter(|e| e.tick == tick)
            .map(|e| e.entry_id.as_str())
            .collect();
        assert!(ids.contains(&"A") && ids.contains(&"B"), "tick {} emitted {:?}", tick, ids);
    }
}

#[tokio::test]
async fn test_stop_twice_schedules_nothing_more() {
    let sink = Arc::new(RecordingSink::new());
    let generator = Generator::new(log_catalog(&["e"]), sink.clone(), Arc::new(RecordingResources::new()));

    let handle = generator.start(&settings("logs", 30, true)).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    Generator::stop(&handle);
    Generator::stop(&handle);
    assert!(handle.is_stopped());

    let summary = handle.join().await.unwrap();
    let emitted = sink.snapshot().len();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(handle.ticks_started(), summary.ticks_started);
    assert_eq!(sink.snapshot().len(), emitted);
    Generator::stop(&handle);
}

#[tokio::test]
async fn test_drain_finishes_in_flight_flow() {
    let resources = Arc::new(RecordingResources {
        step_delay: Duration::from_millis(100),
        ..Default::default()
    });
    let generator = Generator::new(flow_catalog(), Arc::new(RecordingSink::new()), resources.clone());

    let handle = generator.start(&settings("crud", 10_000, true)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    Generator::stop(&handle);
    let summary = handle.join().await.unwrap();

    assert!(summary.drained);
    assert_eq!(summary.ticks_started, 1);
    assert_eq!(resources.calls(), vec!["create", "update:42", "delete:42"]);
}

#[tokio::test]
async fn test_drain_gives_up_after_deadline() {
    let resources = Arc::new(RecordingResources {
        step_delay: Duration::from_secs(5),
        ..Default::default()
    });
    let generator = Generator::new(flow_catalog(), Arc::new(RecordingSink::new()), resources.clone());

    let mut settings = settings("crud", 10_000, true);
    settings.drain_timeout_ms = 100;
    let handle = generator.start(&settings).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let stopped_at = std::time::Instant::now();
    Generator::stop(&handle);
    let summary = handle.join().await.unwrap();

    assert!(!summary.drained);
    assert!(stopped_at.elapsed() < Duration::from_secs(2), "drain took {:?}", stopped_at.elapsed());
    assert_eq!(resources.calls(), vec!["create"]);
}

#[tokio::test]
async fn test_abandon_discards_in_flight_flow() {
    let resources = Arc::new(RecordingResources {
        step_delay: Duration::from_millis(100),
        ..Default::default()
    });
    let generator = Generator::new(flow_catalog(), Arc::new(RecordingSink::new()), resources.clone());

    let handle = generator.start(&settings("crud", 10_000, false)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    Generator::stop(&handle);
    let summary = handle.join().await.unwrap();
    assert!(!summary.drained);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(resources.calls(), vec!["create"]);
}

#[tokio::test]
async fn test_failed_create_never_updates_or_deletes() {
    let resources = Arc::new(RecordingResources {
        create_result: common::failing_create(503),
        ..Default::default()
    });
    let generator = Generator::new(flow_catalog(), Arc::new(RecordingSink::new()), resources.clone());

    let handle = generator.start(&settings("crud", 40, true)).unwrap();
    tokio::time::sleep(Duration::from_millis(130)).await;
    Generator::stop(&handle);
    handle.join().await.unwrap();

    assert!(resources.count("create") >= 2);
    assert_eq!(resources.count("update"), 0);
    assert_eq!(resources.count("delete"), 0);
}
