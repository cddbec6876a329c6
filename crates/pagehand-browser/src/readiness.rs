//! Best-effort wait before reading page state.
//!
//! Every step is bounded and every failure is swallowed: callers proceed
//! optimistically whatever happens here.

use std::time::Duration;

use pagehand_config::ReadinessConfig;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::driver::{DriverError, PageDriver};
use crate::scripts;

const BODY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What the gate observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadinessReport {
    pub document_ready: bool,
    pub body_present: bool,
    /// Mutations seen during the sample window.
    pub mutations: Option<u64>,
    /// The extra wait was applied.
    pub extended: bool,
}

/// Wait for document readiness and DOM quiescence.
pub async fn wait_ready(page: &dyn PageDriver, config: &ReadinessConfig) -> ReadinessReport {
    let mut report = ReadinessReport::default();
    if let Err(e) = settle(page, config, &mut report).await {
        warn!("Page ready wait failed, continuing anyway: {}", e);
    }
    debug!(?report, "Readiness gate finished");
    report
}

async fn settle(
    page: &dyn PageDriver,
    config: &ReadinessConfig,
    report: &mut ReadinessReport,
) -> Result<(), DriverError> {
    page.wait_for_load(Duration::from_millis(config.timeout_ms))
        .await?;
    report.document_ready = true;

    report.body_present = wait_for_body(page, Duration::from_millis(config.body_timeout_ms)).await?;
    if !report.body_present {
        return Err(DriverError::Timeout("document.body did not appear".to_string()));
    }

    let window = Duration::from_millis(config.sample_window_ms);
    // The script resolves after the window; allow it a little slack.
    let sample = tokio::time::timeout(
        window + Duration::from_secs(1),
        page.evaluate(&scripts::mutation_sample(config.sample_window_ms)),
    )
    .await??;
    let mutations = sample.as_u64().unwrap_or(0);
    report.mutations = Some(mutations);

    if mutations >= config.mutation_threshold {
        debug!(mutations, "Page still changing, waiting {}ms more", config.extra_wait_ms);
        tokio::time::sleep(Duration::from_millis(config.extra_wait_ms)).await;
        report.extended = true;
    }

    Ok(())
}

pub(crate) async fn wait_for_body(page: &dyn PageDriver, timeout: Duration) -> Result<bool, DriverError> {
    let deadline = Instant::now() + timeout;
    loop {
        if page.evaluate(&scripts::body_present()).await?.as_bool() == Some(true) {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(BODY_POLL_INTERVAL).await;
    }
}
