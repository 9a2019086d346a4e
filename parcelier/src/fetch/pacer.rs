//! Fixed minimum spacing between queries.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Spaces queries at least `wait` apart, measured from when each query was
/// issued. The first query is immediate and there is no burst allowance.
#[derive(Debug)]
pub struct Pacer {
    wait: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(wait: Duration) -> Self {
        Self { wait, last: None }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Waits until the next query may be issued and marks it as issued.
    pub async fn ready(&mut self) {
        if let Some(last) = self.last {
            sleep_until(last + self.wait).await;
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_query_is_immediate() {
        let mut pacer = Pacer::new(Duration::from_millis(500));
        let start = Instant::now();
        pacer.ready().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queries_are_spaced() {
        let mut pacer = Pacer::new(Duration::from_millis(500));
        let start = Instant::now();

        for _ in 0..3 {
            pacer.ready().await;
        }

        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(start.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_time_counts_towards_wait() {
        let mut pacer = Pacer::new(Duration::from_millis(500));
        pacer.ready().await;

        tokio::time::sleep(Duration::from_millis(400)).await;
        let before = Instant::now();
        pacer.ready().await;

        let waited = before.elapsed();
        assert!(waited >= Duration::from_millis(100));
        assert!(waited < Duration::from_millis(500));
    }
}
