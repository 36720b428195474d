/// Lifecycle of a stored entry relative to its dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateSyncStatus {
    /// Registered but never computed.
    #[default]
    Init,
    /// A dependency changed since the last run.
    Dirty,
    /// Up to date.
    Clean,
}

impl StateSyncStatus {
    pub fn needs_run(self) -> bool {
        matches!(self, Self::Init | Self::Dirty)
    }
}
