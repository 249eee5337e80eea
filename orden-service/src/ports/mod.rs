//! Ports the orden core requires from its collaborators

pub mod integrations;
pub mod notifications;
pub mod repository;

pub use integrations::{
    IntegrationError, ScriptExecutionRepository, StripeTransferClient, WebhookHandler,
    WebhookPoster,
};
pub use notifications::{NotificationDispatcher, NotificationError, NotificationTopic};
pub use repository::{
    CartProductRepository, CartRepository, CoreUserRepository, OrdenDetailsRepository,
    OrdenFilter, OrdenPayStatusRepository, OrdenRepository, OrdenRow, OrdenStatusRepository,
    RepoError, RepoResult, RestaurantBranchRepository, SupplierRepository,
};

use std::sync::Arc;

/// Every port the lifecycle manager and projector need, all mandatory
#[derive(Clone)]
pub struct OrdenStores {
    pub ordenes: Arc<dyn OrdenRepository>,
    pub details: Arc<dyn OrdenDetailsRepository>,
    pub statuses: Arc<dyn OrdenStatusRepository>,
    pub pay_statuses: Arc<dyn OrdenPayStatusRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub cart_products: Arc<dyn CartProductRepository>,
    pub users: Arc<dyn CoreUserRepository>,
    pub branches: Arc<dyn RestaurantBranchRepository>,
    pub suppliers: Arc<dyn SupplierRepository>,
}

impl OrdenStores {
    /// Use one store for every port
    pub fn uniform<S>(store: Arc<S>) -> Self
    where
        S: OrdenRepository
            + OrdenDetailsRepository
            + OrdenStatusRepository
            + OrdenPayStatusRepository
            + CartRepository
            + CartProductRepository
            + CoreUserRepository
            + RestaurantBranchRepository
            + SupplierRepository
            + 'static,
    {
        Self {
            ordenes: store.clone(),
            details: store.clone(),
            statuses: store.clone(),
            pay_statuses: store.clone(),
            carts: store.clone(),
            cart_products: store.clone(),
            users: store.clone(),
            branches: store.clone(),
            suppliers: store,
        }
    }
}

/// Ports used by the integration hook listener and event dispatcher
#[derive(Clone)]
pub struct HookPorts {
    pub webhooks: Arc<dyn WebhookHandler>,
    pub script_executions: Arc<dyn ScriptExecutionRepository>,
    pub stripe: Arc<dyn StripeTransferClient>,
    pub poster: Arc<dyn WebhookPoster>,
    pub notifications: Arc<dyn NotificationDispatcher>,
}
