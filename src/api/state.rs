//! Application state for the engine's HTTP API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::advance::LifecycleManager;
use crate::config::{ConfigLoader, FinanceConfig};
use crate::store::{
    AllowAll, ApprovalPolicy, EntityStore, LogNotifier, MemoryReceiptStore, MemoryStore, Notifier,
    ReceiptStore,
};

/// Shared application state.
///
/// Contains the collaborators shared across all request handlers: the
/// lifecycle manager, the entity and receipt stores, the approval policy,
/// and the finance configuration.
#[derive(Clone)]
pub struct AppState {
    config: Arc<FinanceConfig>,
    manager: Arc<LifecycleManager>,
    store: Arc<dyn EntityStore>,
    receipts: Arc<dyn ReceiptStore>,
    approvals: Arc<dyn ApprovalPolicy>,
}

impl AppState {
    /// Creates an application state from a loaded configuration, wired to
    /// the in-memory collaborators: `MemoryStore`, `MemoryReceiptStore`,
    /// the logging notifier, and a permissive approval policy.
    pub fn new(loader: ConfigLoader) -> Self {
        Self::with_collaborators(
            loader.config().clone(),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryReceiptStore::new()),
            Arc::new(LogNotifier),
            Arc::new(AllowAll),
        )
    }

    /// Creates an application state over explicit collaborators.
    pub fn with_collaborators(
        config: FinanceConfig,
        store: Arc<dyn EntityStore>,
        receipts: Arc<dyn ReceiptStore>,
        notifier: Arc<dyn Notifier>,
        approvals: Arc<dyn ApprovalPolicy>,
    ) -> Self {
        let manager = Arc::new(LifecycleManager::new(
            config.clone(),
            Arc::clone(&store),
            notifier,
            Arc::clone(&approvals),
        ));
        Self {
            config: Arc::new(config),
            manager,
            store,
            receipts,
            approvals,
        }
    }

    /// The finance configuration.
    pub fn config(&self) -> &FinanceConfig {
        &self.config
    }

    /// The advance lifecycle manager.
    pub fn manager(&self) -> &LifecycleManager {
        &self.manager
    }

    /// The entity store.
    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    /// The receipt file store.
    pub fn receipts(&self) -> &dyn ReceiptStore {
        self.receipts.as_ref()
    }

    /// The approval capability predicate.
    pub fn approvals(&self) -> &dyn ApprovalPolicy {
        self.approvals.as_ref()
    }
}
