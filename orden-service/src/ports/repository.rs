//! Repository ports
//!
//! Persistence contracts the orden core requires. Every history table is
//! insert-only; implementations must answer `get_last` with the latest row
//! per orden (max version for details, max `created_at` for statuses).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use shared::models::{
    BranchTag, CoreUser, RestaurantBranch, RestaurantSupplierRelation, SupplierBusiness,
    SupplierBusinessAccount, SupplierRestaurantRelation, SupplierUnit,
};
use shared::orden::{
    Cart, CartProduct, CartProductWithTax, Orden, OrdenDetails, OrdenPayStatus, OrdenSourceType,
    OrdenStatus, OrdenStatusType, OrdenType, PayMethodType, PayStatusType, PaymentReceipt,
    PaymentReceiptOrden,
};
use thiserror::Error;
use uuid::Uuid;

/// Repository error types
#[derive(Debug, Clone, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Filter set for orden search. All present fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdenFilter {
    pub orden_id: Option<Uuid>,
    pub orden_type: Option<OrdenType>,
    pub status: Option<OrdenStatusType>,
    pub paystatus: Option<PayStatusType>,
    pub restaurant_branch_ids: Option<Vec<Uuid>>,
    pub supplier_business_id: Option<Uuid>,
    pub supplier_unit_ids: Option<Vec<Uuid>>,
    pub payment_method: Option<PayMethodType>,
    /// Delivery date range, inclusive
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Raw orden row as returned by the store: identity plus the current
/// status, pay status and details packed as JSON (`row_num = 1` per orden).
#[derive(Debug, Clone, PartialEq)]
pub struct OrdenRow {
    pub orden: Orden,
    pub status: Option<Value>,
    pub paystatus: Option<Value>,
    pub details: Option<Value>,
}

#[async_trait]
pub trait OrdenRepository: Send + Sync {
    /// Insert a new orden; the store assigns id and `created_at`.
    /// The supplier business is recorded with the row so the orden counts
    /// toward numbering even if its details never land.
    async fn new(
        &self,
        orden_type: OrdenType,
        orden_number: String,
        source_type: Option<OrdenSourceType>,
        supplier_business_id: Uuid,
        created_by: Uuid,
    ) -> RepoResult<Orden>;

    /// Insert a fully built orden record
    async fn add(&self, orden: &Orden) -> RepoResult<()>;

    /// Migrate the orden type (draft → normal). The only permitted mutation.
    async fn update(&self, orden_id: Uuid, orden_type: OrdenType) -> RepoResult<()>;

    async fn get(&self, orden_id: Uuid) -> RepoResult<Option<Orden>>;

    async fn fetch(&self, orden_id: Uuid) -> RepoResult<Option<OrdenRow>>;

    /// Search through the orden-keyed path
    async fn search(&self, filter: &OrdenFilter) -> RepoResult<Vec<OrdenRow>>;

    /// Search through the details-keyed path
    async fn find(&self, filter: &OrdenFilter) -> RepoResult<Vec<OrdenRow>>;

    async fn count_by_supplier_business(&self, supplier_business_id: Uuid) -> RepoResult<u64>;

    /// Ordenes of a supplier business created in `[from, to)`
    async fn get_by_created_at_range(
        &self,
        supplier_business_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<Orden>>;
}

#[async_trait]
pub trait OrdenDetailsRepository: Send + Sync {
    /// Insert a details version. `(orden_id, version)` is unique.
    async fn new(&self, details: &OrdenDetails) -> RepoResult<()>;

    async fn get_last(&self, orden_id: Uuid) -> RepoResult<Option<OrdenDetails>>;

    async fn fetch_last(&self, orden_ids: &[Uuid]) -> RepoResult<Vec<OrdenDetails>>;
}

#[async_trait]
pub trait OrdenStatusRepository: Send + Sync {
    async fn new(&self, status: &OrdenStatus) -> RepoResult<()>;

    async fn get_last(&self, orden_id: Uuid) -> RepoResult<Option<OrdenStatus>>;

    /// Full history, oldest first
    async fn search(&self, orden_id: Uuid) -> RepoResult<Vec<OrdenStatus>>;
}

#[async_trait]
pub trait OrdenPayStatusRepository: Send + Sync {
    async fn new(&self, status: &OrdenPayStatus) -> RepoResult<()>;

    async fn get_last(&self, orden_id: Uuid) -> RepoResult<Option<OrdenPayStatus>>;

    /// Full history, oldest first
    async fn find(&self, orden_id: Uuid) -> RepoResult<Vec<OrdenPayStatus>>;

    async fn add_payment_receipt(&self, receipt: &PaymentReceipt) -> RepoResult<()>;

    /// Overwrite the receipt's scalar fields
    async fn edit_payment_receipt(&self, receipt: &PaymentReceipt) -> RepoResult<()>;

    async fn get_payment_receipt(&self, receipt_id: Uuid) -> RepoResult<Option<PaymentReceipt>>;

    async fn add_payment_receipt_association(
        &self,
        association: &PaymentReceiptOrden,
    ) -> RepoResult<()>;

    async fn find_payment_receipt_associations(
        &self,
        receipt_id: Uuid,
    ) -> RepoResult<Vec<PaymentReceiptOrden>>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Create an active cart
    async fn new(&self, created_by: Uuid) -> RepoResult<Cart>;

    /// Persist `active` / `closed_at`
    async fn update(&self, cart: &Cart) -> RepoResult<()>;
}

#[async_trait]
pub trait CartProductRepository: Send + Sync {
    async fn new(&self, line: &CartProduct) -> RepoResult<()>;

    /// Lines of one cart joined with their product definition
    async fn search_with_tax(&self, cart_id: Uuid) -> RepoResult<Vec<CartProductWithTax>>;

    /// Lines of several carts joined with their product definition
    async fn find_with_tax(&self, cart_ids: &[Uuid]) -> RepoResult<Vec<CartProductWithTax>>;
}

#[async_trait]
pub trait CoreUserRepository: Send + Sync {
    async fn get(&self, core_user_id: Uuid) -> RepoResult<Option<CoreUser>>;

    async fn get_by_auth_id(&self, auth_id: &str) -> RepoResult<Option<CoreUser>>;
}

#[async_trait]
pub trait RestaurantBranchRepository: Send + Sync {
    async fn get(&self, branch_id: Uuid) -> RepoResult<Option<RestaurantBranch>>;

    async fn get_tags(&self, branch_id: Uuid) -> RepoResult<Vec<BranchTag>>;
}

#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn get_business(&self, business_id: Uuid) -> RepoResult<Option<SupplierBusiness>>;

    async fn get_unit(&self, unit_id: Uuid) -> RepoResult<Option<SupplierUnit>>;

    /// Non-deleted units of a business, oldest first
    async fn list_units(&self, business_id: Uuid) -> RepoResult<Vec<SupplierUnit>>;

    async fn get_business_account(
        &self,
        business_id: Uuid,
    ) -> RepoResult<Option<SupplierBusinessAccount>>;

    /// Supplier business the core user works for
    async fn get_business_for_user(
        &self,
        core_user_id: Uuid,
    ) -> RepoResult<Option<SupplierBusiness>>;

    async fn find_supplier_restaurant_relation(
        &self,
        supplier_unit_id: Uuid,
        restaurant_branch_id: Uuid,
    ) -> RepoResult<Option<SupplierRestaurantRelation>>;

    async fn list_supplier_restaurant_relations(
        &self,
        restaurant_branch_id: Uuid,
    ) -> RepoResult<Vec<SupplierRestaurantRelation>>;

    async fn add_supplier_restaurant_relation(
        &self,
        relation: &SupplierRestaurantRelation,
    ) -> RepoResult<()>;

    async fn find_restaurant_supplier_relation(
        &self,
        restaurant_business_id: Uuid,
        supplier_business_id: Uuid,
    ) -> RepoResult<Option<RestaurantSupplierRelation>>;

    async fn add_restaurant_supplier_relation(
        &self,
        relation: &RestaurantSupplierRelation,
    ) -> RepoResult<()>;
}
