//! Outcome of a fail-soft store operation

use tracing::warn;

use crate::core::error::StoreError;

/// Result of a read-path operation before the fail-soft policy is applied.
///
/// `Absent` means the store was readable and the target does not exist;
/// `Failed` means the store itself could not be used. Callers of the public
/// facade only see the collapsed form ([`Lookup::found`]).
#[derive(Debug)]
pub enum Lookup<T> {
    /// Target exists
    Found(T),
    /// Store readable, target missing
    Absent,
    /// Store unreadable or unwritable
    Failed(StoreError),
}

impl<T> Lookup<T> {
    /// Collapse to an option, logging and discarding any store failure
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
            Lookup::Failed(err) if err.is_read_side() => {
                warn!("Treating unreadable store as empty: {}", err);
                None
            }
            Lookup::Failed(err) => {
                warn!("Discarding failed write: {}", err);
                None
            }
        }
    }

    /// True for [`Lookup::Failed`]
    pub fn is_failed(&self) -> bool {
        matches!(self, Lookup::Failed(_))
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::Absent, Lookup::Found)
    }
}
