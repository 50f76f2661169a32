//! Wallet session context.
//!
//! A [`WalletSession`] is passed explicitly to every board operation. It
//! carries the connected wallet address and an optional [`RoleHint`]. The
//! role only decides which permitted controls are emphasised; it never
//! changes whether an action is allowed.

mod role;
mod store;

pub use role::{ParseRoleHintError, RoleHint};
pub use store::{
    FileSessionStore, InMemorySessionStore, SESSION_FILE_NAME, SessionSnapshot, SessionStore,
    SessionStoreError,
};

use crate::task::domain::WalletAddress;
use crate::task::ports::{WalletError, WalletProvider};
use std::collections::BTreeMap;
use tracing::debug;

/// Connected wallet and role hint for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    address: Option<WalletAddress>,
    role: Option<RoleHint>,
    known_roles: BTreeMap<WalletAddress, RoleHint>,
}

impl WalletSession {
    /// Creates a disconnected session with no role.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session already connected to `address`.
    #[must_use]
    pub fn connected(address: WalletAddress) -> Self {
        let mut session = Self::new();
        session.connect(address);
        session
    }

    /// Restores role hints saved by [`Self::persist`].
    ///
    /// The wallet itself is not restored; callers reconnect explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError`] when the store cannot be read.
    pub fn restore(store: &dyn SessionStore) -> Result<Self, SessionStoreError> {
        let snapshot = store.load()?.unwrap_or_default();
        Ok(Self {
            address: None,
            role: snapshot.session_role,
            known_roles: snapshot.roles,
        })
    }

    /// Saves the role hints to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError`] when the store cannot be written.
    pub fn persist(&self, store: &dyn SessionStore) -> Result<(), SessionStoreError> {
        store.save(&SessionSnapshot {
            session_role: self.role,
            roles: self.known_roles.clone(),
        })
    }

    /// Returns the connected wallet address.
    #[must_use]
    pub const fn address(&self) -> Option<&WalletAddress> {
        self.address.as_ref()
    }

    /// Returns the current role hint.
    #[must_use]
    pub const fn role(&self) -> Option<RoleHint> {
        self.role
    }

    /// Returns whether a wallet is connected.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    /// Connects `address`, picking up the role last chosen for it.
    pub fn connect(&mut self, address: WalletAddress) {
        if self.role.is_none() {
            self.role = self.known_roles.get(&address).copied();
        }
        debug!(wallet = %address, role = ?self.role, "wallet connected");
        self.address = Some(address);
    }

    /// Asks `provider` for an address and connects it.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`WalletError`]; the session is left unchanged.
    pub async fn connect_with(
        &mut self,
        provider: &dyn WalletProvider,
    ) -> Result<WalletAddress, WalletError> {
        let address = provider.connect().await?;
        self.connect(address.clone());
        Ok(address)
    }

    /// Disconnects the wallet and forgets its role.
    pub fn disconnect(&mut self) {
        if let Some(address) = self.address.take() {
            self.known_roles.remove(&address);
            debug!(wallet = %address, "wallet disconnected");
        }
        self.role = None;
    }

    /// Records the role hint for this session and the connected address.
    pub fn set_role(&mut self, role: RoleHint) {
        self.role = Some(role);
        if let Some(address) = &self.address {
            self.known_roles.insert(address.clone(), role);
        }
    }

    /// Clears the session role. Per-address hints are kept.
    pub const fn clear_role(&mut self) {
        self.role = None;
    }
}
