//! Metricano demo agent.
//!
//! Runs a few instrumented operations (one synchronous, two asynchronous)
//! in a loop and logs every flushed batch until Ctrl-C.
//!
//! Config is read from `$METRICANO_CONFIG` (default `metricano.yaml`);
//! built-in defaults apply when the file is absent.

use std::convert::Infallible;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future;
use tracing_subscriber::{fmt, EnvFilter};

use metricano_agent::boundary::{CallSite, InstrumentationBoundary, Measures};
use metricano_agent::config::{self, AgentConfig};
use metricano_agent::publish::LogPublisher;
use metricano_agent::MetricsAgent;
use metricano_core::CallDescriptor;

struct Program {
    boundary: InstrumentationBoundary,
    checksum_site: CallSite,
    answer_site: CallSite,
    fetch_site: CallSite,
    round: AtomicU64,
}

impl Program {
    fn new(boundary: InstrumentationBoundary) -> Self {
        Self {
            boundary,
            checksum_site: CallSite::new(CallDescriptor::of::<Program>("checksum")),
            answer_site: CallSite::new(CallDescriptor::of::<Program>("answer").with_type::<u32>()),
            fetch_site: CallSite::named(CallDescriptor::of::<Program>("flaky_fetch"), Some("demo.fetch")),
            round: AtomicU64::new(0),
        }
    }

    async fn run_round(&self) {
        let round = self.round.fetch_add(1, Ordering::Relaxed);

        let _ = self
            .boundary
            .run_sync(&self.checksum_site, || Ok::<_, Infallible>(checksum(round)));

        let answer = self.boundary.instrument(&self.answer_site, async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok::<u32, Infallible>(42)
        });
        let fetch = self.boundary.instrument(&self.fetch_site, flaky_fetch(round));

        let (_, fetched) = future::join(answer, fetch).await;
        if let Err(e) = fetched {
            tracing::debug!(error = %e, round, "fetch failed");
        }
    }
}

fn checksum(seed: u64) -> u64 {
    (0..10_000u64).fold(seed, |acc, x| acc.wrapping_mul(31).wrapping_add(x))
}

async fn flaky_fetch(round: u64) -> io::Result<usize> {
    tokio::time::sleep(Duration::from_millis(round % 7)).await;
    if round % 5 == 4 {
        return Err(io::Error::new(io::ErrorKind::TimedOut, "upstream timed out"));
    }
    Ok(round as usize)
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("METRICANO_CONFIG").unwrap_or_else(|_| "metricano.yaml".into());
    let cfg = if Path::new(&path).exists() {
        config::load_from_file(&path).expect("config load failed")
    } else {
        AgentConfig::default()
    };

    let agent = MetricsAgent::new(cfg);
    let publisher = Arc::new(LogPublisher::new(agent.cfg().log.percentile_fraction));
    let flusher = agent.publish_with(publisher);
    let program = Program::new(agent.boundary(Measures::ALL));

    tracing::info!(interval_ms = agent.cfg().flush.interval_ms, "metricano demo running");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = program.run_round() => {}
        }
    }

    match flusher.shutdown().await {
        Ok(stats) => tracing::info!(?stats, "metricano demo stopped"),
        Err(e) => tracing::warn!(error = %e, "flusher shutdown failed"),
    }
}
