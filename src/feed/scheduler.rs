// src/feed/scheduler.rs
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinHandle;

use crate::config::ActiveTriggerList;
use crate::feed::{poll_once, StorySource};
use crate::sink::StorySink;

#[derive(Clone, Copy, Debug)]
pub struct PollerCfg {
    pub interval_secs: u64,
}

impl Default for PollerCfg {
    fn default() -> Self {
        Self { interval_secs: 120 }
    }
}

/// Spawn the periodic poll loop. The first poll runs immediately; abort the
/// returned handle to stop it.
pub fn spawn_poller(
    cfg: PollerCfg,
    sources: Vec<Box<dyn StorySource>>,
    triggers: ActiveTriggerList,
    mut sink: Box<dyn StorySink + Send>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = Duration::from_secs(cfg.interval_secs.max(1));
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            tracing::info!(target: "feed", "polling...");
            let matched = poll_once(&sources, &triggers).await;
            counter!("feed_polls_total").increment(1);

            match sink.deliver(&matched) {
                Ok(delivered) => {
                    tracing::info!(target: "sink", matched = matched.len(), delivered, "poll tick")
                }
                Err(e) => tracing::warn!(target: "sink", error = ?e, "sink delivery failed"),
            }
        }
    })
}
