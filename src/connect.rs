//! Port acquisition with a fixed-interval retry while the device is busy

use log::{debug, warn};
use std::time::Duration;

use crate::transport::{OpenError, PortOpener};
use crate::types::DconError;

/// Interval between open attempts while the device is busy
pub const BUSY_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// How busy devices are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    /// Maximum number of open attempts, `None` to retry forever
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn forever(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    pub fn limited(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
        }
    }

    fn allows(&self, attempt: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempt < max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::forever(BUSY_RETRY_INTERVAL)
    }
}

/// Reported each time an open attempt finds the device busy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyNotice {
    pub device: String,
    /// 1-based number of the attempt that failed
    pub attempt: u32,
}

impl std::fmt::Display for BusyNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is busy, retrying", self.device)
    }
}

enum ConnectState<P> {
    Connecting { attempt: u32 },
    Open(P),
}

/// Open `device`, retrying while it is busy.
///
/// `on_busy` is called for every busy attempt that will be retried, before
/// waiting. Any other open failure is returned immediately.
pub fn open_port<O, F>(
    opener: &mut O,
    device: &str,
    policy: RetryPolicy,
    mut on_busy: F,
) -> Result<O::Port, DconError>
where
    O: PortOpener,
    F: FnMut(&BusyNotice),
{
    let mut state = ConnectState::Connecting { attempt: 1 };

    loop {
        state = match state {
            ConnectState::Open(port) => return Ok(port),
            ConnectState::Connecting { attempt } => match opener.open(device) {
                Ok(port) => {
                    debug!("Opened {} on attempt {}", device, attempt);
                    ConnectState::Open(port)
                }
                Err(OpenError::Busy) => {
                    warn!("Open attempt {} on {} failed: busy", attempt, device);
                    if !policy.allows(attempt) {
                        return Err(DconError::PortBusy {
                            device: device.to_string(),
                            attempts: attempt,
                        });
                    }

                    on_busy(&BusyNotice {
                        device: device.to_string(),
                        attempt,
                    });
                    std::thread::sleep(policy.interval);
                    ConnectState::Connecting {
                        attempt: attempt + 1,
                    }
                }
                Err(OpenError::Failed(cause)) => {
                    return Err(DconError::PortOpenFailed {
                        device: device.to_string(),
                        cause,
                    });
                }
            },
        };
    }
}
