use std::time::Duration;

use ureq::Agent;

/// Requests are attempted once and given up on after this long.
pub const TIMEOUT: Duration = Duration::from_secs(60);

/// Build a default agent.
pub fn new() -> Agent {
    Agent::config_builder().timeout_global(Some(TIMEOUT)).build().into()
}
