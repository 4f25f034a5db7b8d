use std::time::Duration;

use async_trait::async_trait;

/// How a job wants to proceed after a tick. Mirrors the cadence/backoff
/// split used throughout the ambient stack: a job reports intent, the
/// runner decides how long to actually wait.
pub enum Continuation {
    /// Sleep the job's normal interval and tick again.
    Continue,
    /// Something went wrong; back off longer than usual before the next
    /// attempt instead of hammering a failing upstream.
    ContinueAfter(Duration),
    /// Stop the loop for good.
    Exit,
}

#[async_trait]
pub trait Job: Send + 'static {
    async fn tick(&mut self) -> Continuation;

    fn interval(&self) -> Duration;
}

/// Drives a job forever, honoring whatever cadence it reports. Both the
/// fast loop and the slow loop are instances of this — retry/backoff
/// policy lives here once instead of being duplicated between them.
pub async fn run(mut job: impl Job) {
    loop {
        match job.tick().await {
            Continuation::Continue => tokio::time::sleep(job.interval()).await,
            Continuation::ContinueAfter(delay) => tokio::time::sleep(delay).await,
            Continuation::Exit => break,
        }
    }
}
