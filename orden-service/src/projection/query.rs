//! Orden query and projection
//!
//! Reconstitutes [`OrdenView`]s from the current rows of the append-only
//! histories. `search` and `find` only differ in the repository path used.

use super::decode::{DecodedRow, decode_row};
use crate::ports::{OrdenFilter, OrdenRow, OrdenStores, RepoResult};
use shared::models::{RestaurantBranch, SupplierBusiness, SupplierUnit};
use shared::orden::{
    CartProductWithTax, OrdenSupplierView, OrdenType, OrdenView, is_countable_quantity,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone, Copy, PartialEq, Eq)]
enum QueryPath {
    Search,
    Find,
}

/// Read-side projector over [`OrdenStores`]
#[derive(Clone)]
pub struct OrdenProjector {
    stores: OrdenStores,
}

/// Lookups shared across the rows of one projection
#[derive(Default)]
struct Directory {
    branches: HashMap<Uuid, Option<RestaurantBranch>>,
    units: HashMap<Uuid, Option<SupplierUnit>>,
    businesses: HashMap<Uuid, Option<SupplierBusiness>>,
}

impl OrdenProjector {
    pub fn new(stores: OrdenStores) -> Self {
        Self { stores }
    }

    pub async fn search(&self, filter: &OrdenFilter) -> RepoResult<Vec<OrdenView>> {
        self.query(filter, QueryPath::Search).await
    }

    pub async fn find(&self, filter: &OrdenFilter) -> RepoResult<Vec<OrdenView>> {
        self.query(filter, QueryPath::Find).await
    }

    /// Single orden by id
    pub async fn get(&self, orden_id: Uuid) -> RepoResult<Option<OrdenView>> {
        let Some(row) = self.stores.ordenes.fetch(orden_id).await? else {
            return Ok(None);
        };
        Ok(self.project(vec![row]).await?.pop())
    }

    async fn query(&self, filter: &OrdenFilter, path: QueryPath) -> RepoResult<Vec<OrdenView>> {
        let mut filter = filter.clone();
        if let Some(business_id) = filter.supplier_business_id
            && filter.supplier_unit_ids.is_none()
        {
            let units = self.stores.suppliers.list_units(business_id).await?;
            if units.is_empty() {
                return Ok(Vec::new());
            }
            filter.supplier_unit_ids = Some(units.into_iter().map(|u| u.id).collect());
        }

        let rows = match path {
            QueryPath::Search => self.stores.ordenes.search(&filter).await?,
            QueryPath::Find => self.stores.ordenes.find(&filter).await?,
        };
        tracing::debug!(rows = rows.len(), "Projecting orden rows");
        self.project(rows).await
    }

    /// Decode rows and attach cart, branch and supplier data
    pub async fn project(&self, rows: Vec<OrdenRow>) -> RepoResult<Vec<OrdenView>> {
        let decoded: Vec<DecodedRow> = rows.into_iter().map(decode_row).collect();

        let cart_ids: Vec<Uuid> = decoded
            .iter()
            .filter_map(|r| r.details.as_ref().map(|d| d.cart_id))
            .collect();
        let mut carts: HashMap<Uuid, Vec<CartProductWithTax>> = HashMap::new();
        if !cart_ids.is_empty() {
            for line in self.stores.cart_products.find_with_tax(&cart_ids).await? {
                if is_countable_quantity(line.product.quantity) {
                    carts.entry(line.product.cart_id).or_default().push(line);
                }
            }
        }

        let mut directory = Directory::default();
        let mut views = Vec::with_capacity(decoded.len());
        for row in decoded {
            let cart = row
                .details
                .as_ref()
                .and_then(|d| carts.get(&d.cart_id).cloned())
                .unwrap_or_default();
            let (branch, supplier) = match &row.details {
                Some(details) => (
                    self.branch(&mut directory, details.restaurant_branch_id).await?,
                    self.supplier(&mut directory, details.supplier_unit_id, row.orden.orden_type)
                        .await?,
                ),
                None => (None, None),
            };

            views.push(OrdenView {
                id: row.orden.id,
                orden_type: row.orden.orden_type,
                orden_number: row.orden.orden_number,
                source_type: row.orden.source_type,
                created_by: row.orden.created_by,
                created_at: row.orden.created_at,
                status: row.status,
                paystatus: row.paystatus,
                details: row.details,
                cart,
                branch,
                supplier,
            });
        }
        Ok(views)
    }

    async fn branch(
        &self,
        directory: &mut Directory,
        branch_id: Uuid,
    ) -> RepoResult<Option<RestaurantBranch>> {
        if let Some(cached) = directory.branches.get(&branch_id) {
            return Ok(cached.clone());
        }
        let branch = self.stores.branches.get(branch_id).await?;
        directory.branches.insert(branch_id, branch.clone());
        Ok(branch)
    }

    async fn supplier(
        &self,
        directory: &mut Directory,
        unit_id: Uuid,
        orden_type: OrdenType,
    ) -> RepoResult<Option<OrdenSupplierView>> {
        let unit = match directory.units.get(&unit_id) {
            Some(cached) => cached.clone(),
            None => {
                let unit = self.stores.suppliers.get_unit(unit_id).await?;
                directory.units.insert(unit_id, unit.clone());
                unit
            }
        };
        let Some(unit) = unit else {
            return Ok(None);
        };

        let business_id = unit.supplier_business_id;
        let business = match directory.businesses.get(&business_id) {
            Some(cached) => cached.clone(),
            None => {
                let business = self.stores.suppliers.get_business(business_id).await?;
                directory.businesses.insert(business_id, business.clone());
                business
            }
        };
        let Some(business) = business else {
            return Ok(None);
        };

        // Drafts belong to the house supplier; its account is not exposed
        let account = if orden_type == OrdenType::Normal {
            self.stores.suppliers.get_business_account(business_id).await?
        } else {
            None
        };

        Ok(Some(OrdenSupplierView {
            business,
            account,
            unit: Some(unit),
        }))
    }
}
