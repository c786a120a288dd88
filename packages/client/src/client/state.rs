//! Client lifecycle

/// Where a [`TorClient`](super::TorClient) stands in its lifecycle.
///
/// `Unresolved -> PortResolved -> Verified | Unverified`. A re-check can move
/// between `Verified` and `Unverified`; requests never change the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No port has been resolved yet
    #[default]
    Unresolved,
    /// A listening proxy port was found, exit address not checked
    PortResolved,
    /// The last check saw a changed exit address
    Verified,
    /// The last check could not confirm a changed exit address
    Unverified,
}

impl ConnectionState {
    #[inline]
    pub fn is_verified(self) -> bool {
        self == ConnectionState::Verified
    }

    #[inline]
    pub fn is_resolved(self) -> bool {
        self != ConnectionState::Unresolved
    }
}
