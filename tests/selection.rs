//! End-to-end selection tests against stub probers
//!
//! Everything here runs offline: the probers answer from tables, sleep, or
//! panic on purpose, so the tests exercise fan-out, ranking and failure
//! handling without touching ICMP sockets.

use async_trait::async_trait;
use netselect::{
    models::{Host, ProbeOutcome, ProbeStatistics},
    prober::{ProbeError, ProbeRequest, Prober},
    selector::{NetSelector, SelectorConfig},
    stats::Ranker,
    error::install_panic_hook,
    AppError,
};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Answers with a fixed latency per address; missing addresses are unreachable
struct LatencyTable {
    latencies: HashMap<String, u64>,
    delay: Duration,
    calls: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl LatencyTable {
    fn new(entries: &[(&str, u64)]) -> Self {
        Self {
            latencies: entries.iter().map(|(a, ms)| (a.to_string(), *ms)).collect(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Prober for LatencyTable {
    async fn probe(&self, request: &ProbeRequest) -> Result<ProbeStatistics, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        match self.latencies.get(&request.address) {
            Some(&ms) => {
                let rtts = vec![Duration::from_millis(ms); request.attempts as usize];
                Ok(ProbeStatistics::from_rtts(request.attempts, rtts, None))
            }
            None => Err(ProbeError::unavailable(&request.address, "host unreachable")),
        }
    }

    fn name(&self) -> &str {
        "table"
    }
}

/// Panics for one address and answers for the rest
struct FlakyProber;

#[async_trait]
impl Prober for FlakyProber {
    async fn probe(&self, request: &ProbeRequest) -> Result<ProbeStatistics, ProbeError> {
        if request.address == "boom.example" {
            panic!("socket exploded");
        }
        Ok(ProbeStatistics::from_rtts(1, vec![Duration::from_millis(7)], None))
    }
}

fn hosts(addresses: &[&str]) -> Vec<Host> {
    addresses.iter().map(|a| Host::parse(a).unwrap()).collect()
}

fn addresses(outcomes: &[ProbeOutcome]) -> Vec<&str> {
    outcomes.iter().map(|o| o.host.address.as_str()).collect()
}

#[tokio::test]
async fn test_fast_slow_dead_ordering() {
    let prober = Arc::new(LatencyTable::new(&[("fast.example", 10), ("slow.example", 50)]));
    let ranked = NetSelector::with_prober(hosts(&["fast.example", "slow.example", "dead.example"]), prober)
        .select()
        .await
        .unwrap();

    assert_eq!(addresses(&ranked), vec!["fast.example", "slow.example", "dead.example"]);
    assert_eq!(ranked[0].statistics.avg_rtt, Duration::from_millis(10));
    assert!(!ranked[2].success);
    assert_eq!(ranked[2].statistics.avg_rtt, Duration::ZERO);
}

#[tokio::test]
async fn test_every_host_gets_exactly_one_outcome() {
    let list: Vec<String> = (0..25).map(|i| format!("h{}.example", i)).collect();
    let table: Vec<(&str, u64)> = list.iter().enumerate().map(|(i, a)| (a.as_str(), (i * 7 % 13) as u64)).collect();
    let prober = Arc::new(LatencyTable::new(&table));

    let borrowed: Vec<&str> = list.iter().map(String::as_str).collect();
    let ranked = NetSelector::with_prober(hosts(&borrowed), prober.clone())
        .with_config(SelectorConfig { concurrency: 6, attempts: 2, ..Default::default() })
        .select()
        .await
        .unwrap();

    assert_eq!(ranked.len(), 25);
    assert_eq!(prober.calls.load(Ordering::SeqCst), 25);

    let mut seen: Vec<&str> = addresses(&ranked);
    seen.sort_unstable();
    let mut expected = borrowed.clone();
    expected.sort_unstable();
    assert_eq!(seen, expected);
    assert!(Ranker::is_ranked(&ranked));
}

#[tokio::test]
async fn test_successes_always_precede_failures() {
    let prober = Arc::new(LatencyTable::new(&[("b.example", 900), ("d.example", 1)]));
    let ranked = NetSelector::with_prober(
        hosts(&["a.example", "b.example", "c.example", "d.example", "e.example"]),
        prober,
    )
    .with_config(SelectorConfig { concurrency: 2, ..Default::default() })
    .select()
    .await
    .unwrap();

    let split = ranked.iter().position(|o| !o.success).unwrap();
    assert_eq!(split, 2);
    assert!(ranked[..split].iter().all(|o| o.success));
    assert!(ranked[split..].iter().all(|o| !o.success && o.error.is_some()));
    assert_eq!(addresses(&ranked[..split]), vec!["d.example", "b.example"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_bound_is_respected() {
    let list: Vec<String> = (0..12).map(|i| format!("h{}.example", i)).collect();
    let table: Vec<(&str, u64)> = list.iter().map(|a| (a.as_str(), 5)).collect();
    let prober = Arc::new(LatencyTable::new(&table).with_delay(Duration::from_millis(30)));

    let borrowed: Vec<&str> = list.iter().map(String::as_str).collect();
    let ranked = NetSelector::with_prober(hosts(&borrowed), prober.clone())
        .with_config(SelectorConfig { concurrency: 3, ..Default::default() })
        .select()
        .await
        .unwrap();

    assert_eq!(ranked.len(), 12);
    let peak = prober.peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak concurrency was {}", peak);
    assert!(peak >= 2, "workers never overlapped");
}

#[tokio::test]
async fn test_invalid_configuration_probes_nothing() {
    let prober = Arc::new(LatencyTable::new(&[("fast.example", 10)]));

    for config in [
        SelectorConfig { attempts: 0, ..Default::default() },
        SelectorConfig { concurrency: 0, ..Default::default() },
        SelectorConfig { timeout: Duration::ZERO, ..Default::default() },
    ] {
        let err = NetSelector::with_prober(hosts(&["fast.example"]), prober.clone())
            .with_config(config)
            .select()
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_host_probes_nothing() {
    let prober = Arc::new(LatencyTable::new(&[("fast.example", 10)]));
    let mut list = hosts(&["fast.example", "slow.example"]);
    list[0].address = "https://".to_string();

    let err = NetSelector::with_prober(list, prober.clone()).select().await.unwrap_err();
    assert!(matches!(err, AppError::InvalidAddress(_)));
    assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_panicking_prober_becomes_failed_outcome() {
    let ranked = NetSelector::with_prober(
        hosts(&["boom.example", "ok.example"]),
        Arc::new(FlakyProber),
    )
    .with_config(SelectorConfig { concurrency: 2, ..Default::default() })
    .select()
    .await
    .unwrap();

    assert_eq!(addresses(&ranked), vec!["ok.example", "boom.example"]);
    assert!(matches!(ranked[1].error, Some(ProbeError::Unavailable { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panic_hook_leaves_batch_running() {
    install_panic_hook();

    let ranked = NetSelector::with_prober(
        hosts(&["ok.example", "boom.example", "fine.example"]),
        Arc::new(FlakyProber),
    )
    .with_config(SelectorConfig { concurrency: 3, ..Default::default() })
    .select()
    .await
    .unwrap();

    assert_eq!(ranked.len(), 3);
    assert!(ranked[0].success && ranked[1].success);
    assert_eq!(ranked[2].host.address, "boom.example");
    match &ranked[2].error {
        Some(ProbeError::Unavailable { reason, .. }) => assert!(reason.contains("panicked")),
        other => panic!("expected an unavailable error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_url_hosts_are_probed_by_hostname() {
    let prober = Arc::new(LatencyTable::new(&[("mirror.example", 12)]));
    let ranked = NetSelector::with_prober(hosts(&["https://mirror.example/debian/"]), prober)
        .select()
        .await
        .unwrap();

    assert!(ranked[0].success);
    assert_eq!(ranked[0].host.id, "https://mirror.example/debian/");
    assert_eq!(ranked[0].host.address, "mirror.example");
}

#[test]
fn test_selection_from_blocking_context() {
    let prober = Arc::new(LatencyTable::new(&[("a.example", 3)]));
    let ranked = tokio_test::block_on(NetSelector::with_prober(hosts(&["a.example"]), prober).select()).unwrap();
    assert_eq!(ranked.len(), 1);
    assert!(ranked[0].success);
}

/// `Some(ms)` for a successful outcome, `None` for a failure
fn outcome(index: usize, latency: Option<u64>) -> ProbeOutcome {
    let address = format!("h{}.example", index);
    let host = Host::parse(&address).unwrap();
    match latency {
        Some(ms) => ProbeOutcome::success(
            host,
            ProbeStatistics::from_rtts(1, vec![Duration::from_millis(ms)], None),
        ),
        None => ProbeOutcome::failure(host, ProbeError::unavailable(address, "down")),
    }
}

fn outcomes_strategy() -> impl Strategy<Value = Vec<ProbeOutcome>> {
    prop::collection::vec(prop::option::weighted(0.7, 0u64..500), 0..40).prop_map(|latencies| {
        latencies
            .into_iter()
            .enumerate()
            .map(|(i, latency)| outcome(i, latency))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_ranking_is_sorted_and_partitioned(outcomes in outcomes_strategy()) {
        let ranked = Ranker::rank(outcomes);
        prop_assert!(Ranker::is_ranked(&ranked));
    }

    #[test]
    fn prop_ranking_is_a_permutation(outcomes in outcomes_strategy()) {
        let mut before: Vec<String> = outcomes.iter().map(|o| o.host.address.clone()).collect();
        let mut after: Vec<String> = Ranker::rank(outcomes).iter().map(|o| o.host.address.clone()).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_ranking_is_idempotent(outcomes in outcomes_strategy()) {
        let once = Ranker::rank(outcomes);
        let twice = Ranker::rank(once.clone());
        prop_assert_eq!(addresses(&once), addresses(&twice));
    }

    #[test]
    fn prop_failures_keep_arrival_order(outcomes in outcomes_strategy()) {
        let arrival: Vec<String> = outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| o.host.address.clone())
            .collect();
        let ranked: Vec<String> = Ranker::rank(outcomes)
            .into_iter()
            .filter(|o| !o.success)
            .map(|o| o.host.address)
            .collect();
        prop_assert_eq!(arrival, ranked);
    }
}
