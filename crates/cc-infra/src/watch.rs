//! Polling a VM until it reaches a status.

use std::time::Duration;

use cc_domain::VmStatus;
use tracing::debug;

use crate::types::VpsId;
use crate::{Error, Result, VpsProvider};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy)]
pub struct Watcher {
    pub expected: VmStatus,
    pub interval: Duration,
    pub timeout: Duration,
}

impl Watcher {
    pub fn new(expected: VmStatus) -> Self {
        Self {
            expected,
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_ok(&self, observed: VmStatus) -> bool {
        observed == self.expected
    }

    /// Poll `get_vps` until the VM reports the expected status.
    pub async fn wait(&self, provider: &dyn VpsProvider, id: &VpsId) -> Result<()> {
        let poll = async {
            let mut interval = tokio::time::interval(self.interval);
            loop {
                interval.tick().await;
                let vm = provider.get_vps(id).await?;
                debug!(server_id = %id, status = %vm.status, expected = %self.expected, "watching VM");
                if self.is_ok(vm.status) {
                    return Ok::<(), Error>(());
                }
            }
        };

        match tokio::time::timeout(self.timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(Error::WatchTimeout {
                id: *id,
                expected: self.expected,
                waited_secs: self.timeout.as_secs(),
            }),
        }
    }
}
