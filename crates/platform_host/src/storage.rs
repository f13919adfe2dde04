//! Durable-state storage contract for the desktop's persistence domains.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`StateStore`] async methods.
pub type StateStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// One durably stored slice of the desktop.
///
/// Domains persist under independent namespaced keys and load and save
/// separately, so a corrupt value in one never poisons the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateDomain {
    /// The window collection.
    Windows,
    /// Secure vault items.
    Vault,
    /// Level, XP, and lifetime counters.
    Progression,
    /// The quest list.
    Quests,
    /// The achievement catalog.
    Achievements,
}

impl StateDomain {
    /// Every domain, in startup load order.
    pub const ALL: [Self; 5] = [
        Self::Windows,
        Self::Vault,
        Self::Progression,
        Self::Quests,
        Self::Achievements,
    ];

    /// The storage key this domain persists under.
    pub fn key(self) -> &'static str {
        match self {
            Self::Windows => "ariaos.windows.v1",
            Self::Vault => "ariaos.vault.v1",
            Self::Progression => "ariaos.progression.v1",
            Self::Quests => "ariaos.quests.v1",
            Self::Achievements => "ariaos.achievements.v1",
        }
    }
}

/// Host service for durable desktop state (JSON stored as text per domain).
pub trait StateStore {
    /// Loads the raw JSON string for a domain.
    fn load(&self, domain: StateDomain) -> StateStoreFuture<'_, Result<Option<String>, String>>;

    /// Saves a raw JSON string for a domain.
    fn save<'a>(
        &'a self,
        domain: StateDomain,
        raw_json: &'a str,
    ) -> StateStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// State store that persists nothing, for ephemeral sessions and baseline tests.
pub struct NoopStateStore;

impl StateStore for NoopStateStore {
    fn load(&self, _domain: StateDomain) -> StateStoreFuture<'_, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save<'a>(
        &'a self,
        _domain: StateDomain,
        _raw_json: &'a str,
    ) -> StateStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory state store keyed by each domain's storage key.
pub struct MemoryStateStore {
    inner: Rc<RefCell<HashMap<&'static str, String>>>,
}

impl MemoryStateStore {
    /// Seeds a domain with a raw value, for startup-path tests.
    pub fn seed(&self, domain: StateDomain, raw_json: &str) {
        self.inner
            .borrow_mut()
            .insert(domain.key(), raw_json.to_string());
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, domain: StateDomain) -> StateStoreFuture<'_, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().get(domain.key()).cloned()) })
    }

    fn save<'a>(
        &'a self,
        domain: StateDomain,
        raw_json: &'a str,
    ) -> StateStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(domain.key(), raw_json.to_string());
            Ok(())
        })
    }
}
