use chrono::{DateTime, Utc};

use crate::State;

/// Wall clock as a state, so tests can pin or advance it.
#[derive(Debug, Clone)]
pub struct Time {
    virt: DateTime<Utc>,
}

impl Default for Time {
    fn default() -> Self {
        Self { virt: Utc::now() }
    }
}

impl Time {
    pub fn at(virt: DateTime<Utc>) -> Self {
        Self { virt }
    }
}

impl State for Time {}

impl AsMut<DateTime<Utc>> for Time {
    fn as_mut(&mut self) -> &mut DateTime<Utc> {
        &mut self.virt
    }
}

impl AsRef<DateTime<Utc>> for Time {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.virt
    }
}
