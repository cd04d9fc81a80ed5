use std::time::Duration;

pub(super) const fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

pub(super) const fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

pub(super) const fn default_max_attempts() -> usize {
    1
}

pub(super) const fn default_problem_limit() -> u32 {
    50
}
