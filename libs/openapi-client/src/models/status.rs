//! Resource status strings
//!
//! Applications, services and databases report status as
//! `"<lifecycle>:<health>"` (`running:healthy`, `exited:unhealthy`). The
//! convention is not enforced by the API, so any string is accepted.

/// A borrowed view over a status string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceStatus<'a> {
    pub lifecycle: &'a str,
    pub health: Option<&'a str>,
}

impl<'a> ResourceStatus<'a> {
    /// Split a status string on its first `:`
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(':') {
            Some((lifecycle, health)) => Self {
                lifecycle,
                health: Some(health),
            },
            None => Self {
                lifecycle: raw,
                health: None,
            },
        }
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.starts_with("running")
    }

    pub fn is_healthy(&self) -> bool {
        self.health == Some("healthy")
    }
}
