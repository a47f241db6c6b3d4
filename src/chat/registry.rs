/// Session registry — the shared nickname → client directory.
///
/// Single source of truth for routing and membership. All operations
/// take the lock once; in particular [`Registry::try_insert`] performs
/// the presence check and the insert under one write lock, so two
/// clients racing to claim the same name can never both win.
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

/// Handle to send lines to a connected, named client.
///
/// The registry holds these routing handles; the session task itself
/// owns the socket and forwards whatever arrives on `tx` to it. A send
/// to a session that is tearing down simply errors, and callers discard
/// that result.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub name: String,
    pub addr: SocketAddr,
    pub tx: mpsc::UnboundedSender<String>,
}

/// Shared, thread-safe name → client map.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<HashMap<String, ClientHandle>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim `handle.name`. Returns `false` (and drops the
    /// handle) if the name is already taken.
    pub async fn try_insert(&self, handle: ClientHandle) -> bool {
        let mut map = self.inner.write().await;
        match map.entry(handle.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(handle);
                true
            }
        }
    }

    /// Remove a name, returning its handle if it was present.
    pub async fn remove(&self, name: &str) -> Option<ClientHandle> {
        self.inner.write().await.remove(name)
    }

    /// Look up a name. Case-sensitive.
    pub async fn get(&self, name: &str) -> Option<ClientHandle> {
        self.inner.read().await.get(name).cloned()
    }

    /// Clone the current membership for iteration (broadcast). The lock
    /// is released before the caller touches any handle, so concurrent
    /// joins and departures never deadlock against a fan-out in
    /// progress — a member that vanished after the snapshot just has a
    /// dead `tx`.
    pub async fn snapshot(&self) -> Vec<ClientHandle> {
        self.inner.read().await.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(name: &str) -> (ClientHandle, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ClientHandle {
            name: name.to_owned(),
            addr: "127.0.0.1:0".parse().unwrap(),
            tx,
        };
        (handle, rx)
    }

    #[tokio::test]
    async fn insert_then_get() {
        let registry = Registry::new();
        let (alice, _rx) = handle("alice");

        assert!(registry.try_insert(alice).await);
        assert_eq!(registry.get("alice").await.unwrap().name, "alice");
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let registry = Registry::new();
        let (first, _rx1) = handle("alice");
        let (second, _rx2) = handle("alice");

        assert!(registry.try_insert(first).await);
        assert!(!registry.try_insert(second).await);
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let registry = Registry::new();
        let (alice, _rx) = handle("alice");
        registry.try_insert(alice).await;

        assert!(registry.get("Alice").await.is_none());
        assert!(registry.get("alice").await.is_some());
    }

    #[tokio::test]
    async fn remove_frees_the_name() {
        let registry = Registry::new();
        let (alice, _rx1) = handle("alice");
        registry.try_insert(alice).await;

        assert!(registry.remove("alice").await.is_some());
        assert!(registry.get("alice").await.is_none());
        assert!(registry.remove("alice").await.is_none());

        let (again, _rx2) = handle("alice");
        assert!(registry.try_insert(again).await);
    }

    #[tokio::test]
    async fn snapshot_reflects_membership() {
        let registry = Registry::new();
        let (alice, _rx1) = handle("alice");
        let (bob, _rx2) = handle("bob");
        registry.try_insert(alice).await;
        registry.try_insert(bob).await;
        registry.remove("alice").await;

        let names: Vec<String> = registry
            .snapshot()
            .await
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, vec!["bob".to_owned()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_claims_of_one_name_admit_exactly_one() {
        for _ in 0..50 {
            let registry = Registry::new();
            let mut tasks = Vec::new();
            for _ in 0..8 {
                let registry = registry.clone();
                tasks.push(tokio::spawn(async move {
                    let (h, _rx) = handle("alice");
                    registry.try_insert(h).await
                }));
            }

            let mut wins = 0;
            for task in tasks {
                if task.await.unwrap() {
                    wins += 1;
                }
            }
            assert_eq!(wins, 1);
        }
    }
}
