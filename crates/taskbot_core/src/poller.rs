use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::AppError;
use crate::notify::Notifier;
use crate::update::UpdateSource;
use std::time::Duration;

/// Sequential fetch/dispatch loop. Updates are handled strictly in arrival
/// order and the cursor moves past every update, even when handling failed.
#[derive(Debug, Clone)]
pub struct Poller {
    cursor: i64,
    interval: Duration,
    backoff: Duration,
}

impl Poller {
    pub fn new(interval: Duration, backoff: Duration) -> Self {
        Self {
            cursor: 0,
            interval,
            backoff,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.poll_interval(), config.error_backoff())
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Fetches and dispatches one batch, returning how many updates it held.
    pub fn poll_once<S, N>(
        &mut self,
        source: &mut S,
        dispatcher: &mut Dispatcher<N>,
    ) -> Result<usize, AppError>
    where
        S: UpdateSource,
        N: Notifier,
    {
        let updates = source.fetch_updates(self.cursor)?;

        for update in &updates {
            dispatcher.dispatch(update);
            self.cursor = update.sequence + 1;
        }

        Ok(updates.len())
    }

    /// Polls until the process is stopped.
    pub fn run<S, N>(&mut self, source: &mut S, dispatcher: &mut Dispatcher<N>) -> !
    where
        S: UpdateSource,
        N: Notifier,
    {
        tracing::info!("bot started");

        loop {
            match self.poll_once(source, dispatcher) {
                Ok(count) => {
                    if count > 0 {
                        tracing::debug!(count, cursor = self.cursor, "batch handled");
                    }
                    std::thread::sleep(self.interval);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "fetching updates failed");
                    std::thread::sleep(self.backoff);
                }
            }
        }
    }
}
