//! Pre-order optimizer
//!
//! Consolidates a batch of DRAFT ordenes of one branch into one NORMAL
//! orden per winning supplier:
//!
//! 1. Index catalog offers by [`ProductSignature`]
//! 2. Reduce draft lines with the same signature (quantities summed, the
//!    original unit price kept)
//! 3. Let the [`AssignmentStrategy`] pick a supplier per reduced line; lines
//!    nobody offers stay with their original (house) supplier
//! 4. Group by supplier business and synthesize one view per group

mod signature;
mod strategy;

pub use signature::ProductSignature;
pub use strategy::{AssignmentStrategy, Candidate, CheapestOffer};

use crate::cart::{CartCosts, compute_totals};
use crate::utils::money::line_subtotal;
use chrono::Utc;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::SupplierCatalog;
use shared::orden::{CartProduct, CartProductWithTax, OrdenSupplierView, OrdenType, OrdenView};
use std::collections::HashMap;
use uuid::Uuid;

/// Where an assigned line ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    /// Supplier catalog index
    Catalog(usize),
    /// Left with the supplier of this draft
    Draft(usize),
}

#[derive(Debug, Clone)]
struct ReducedLine {
    signature: ProductSignature,
    template: CartProductWithTax,
    quantity: f64,
    unit_price: f64,
    origin: usize,
}

pub struct PreOrderOptimizer {
    strategy: Box<dyn AssignmentStrategy>,
}

impl Default for PreOrderOptimizer {
    fn default() -> Self {
        Self::new(Box::new(CheapestOffer))
    }
}

impl PreOrderOptimizer {
    pub fn new(strategy: Box<dyn AssignmentStrategy>) -> Self {
        Self { strategy }
    }

    /// Assign suppliers to the lines of `drafts` and regroup per supplier
    pub fn optimize(
        &self,
        drafts: &[OrdenView],
        suppliers: &[SupplierCatalog],
    ) -> AppResult<Vec<OrdenView>> {
        let Some(template) = drafts.first() else {
            return Ok(Vec::new());
        };
        validate_batch(drafts)?;

        let mut index: HashMap<ProductSignature, Vec<Candidate<'_>>> = HashMap::new();
        for (catalog, supplier) in suppliers.iter().enumerate() {
            for offer in &supplier.offers {
                let signature =
                    ProductSignature::new(&offer.product.description, offer.product.sell_unit);
                index
                    .entry(signature)
                    .or_default()
                    .push(Candidate { catalog, offer });
            }
        }

        let reduced = reduce_lines(drafts);

        let mut groups: Vec<(Uuid, Owner, Vec<CartProductWithTax>)> = Vec::new();
        for line in reduced {
            let candidates = index
                .get(&line.signature)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let (owner, assigned) = match self.strategy.select(line.quantity, candidates) {
                Some(choice) => (Owner::Catalog(choice.catalog), priced_from_offer(&line, choice)),
                None => (Owner::Draft(line.origin), kept_line(&line)),
            };

            let business_id = match owner {
                Owner::Catalog(i) => Some(suppliers[i].business.id),
                Owner::Draft(i) => drafts[i].supplier_business_id(),
            }
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::NotFound,
                    format!("Supplier not found for product {}", line.signature.description()),
                )
            })?;

            match groups.iter_mut().find(|(id, _, _)| *id == business_id) {
                Some((_, _, lines)) => lines.push(assigned),
                None => groups.push((business_id, owner, vec![assigned])),
            }
        }

        let ordenes: Vec<OrdenView> = groups
            .into_iter()
            .map(|(_, owner, lines)| {
                let supplier = match owner {
                    Owner::Catalog(i) => Some(OrdenSupplierView {
                        business: suppliers[i].business.clone(),
                        account: suppliers[i].account.clone(),
                        unit: suppliers[i].unit.clone(),
                    }),
                    Owner::Draft(i) => drafts[i].supplier.clone(),
                };
                consolidated_view(template, supplier, lines)
            })
            .collect();

        tracing::info!(
            strategy = self.strategy.name(),
            drafts = drafts.len(),
            ordenes = ordenes.len(),
            "Draft ordenes consolidated"
        );
        Ok(ordenes)
    }
}

fn validate_batch(drafts: &[OrdenView]) -> AppResult<()> {
    let branch_of = |v: &OrdenView| v.details.as_ref().map(|d| d.restaurant_branch_id);
    let branch = branch_of(&drafts[0]);
    for draft in drafts {
        if draft.orden_type != OrdenType::Draft {
            return Err(AppError::validation(format!(
                "Orden {} is not a draft",
                draft.id
            )));
        }
        if branch.is_none() || branch_of(draft) != branch {
            return Err(AppError::validation(
                "Draft ordenes must belong to one restaurant branch",
            ));
        }
    }
    Ok(())
}

fn reduce_lines(drafts: &[OrdenView]) -> Vec<ReducedLine> {
    let mut reduced: Vec<ReducedLine> = Vec::new();
    let mut positions: HashMap<ProductSignature, usize> = HashMap::new();
    for (origin, draft) in drafts.iter().enumerate() {
        for line in draft.countable_lines() {
            let signature = ProductSignature::new(&line.description, line.product.sell_unit);
            match positions.get(&signature) {
                Some(&pos) => reduced[pos].quantity += line.product.quantity,
                None => {
                    positions.insert(signature.clone(), reduced.len());
                    reduced.push(ReducedLine {
                        signature,
                        template: line.clone(),
                        quantity: line.product.quantity,
                        unit_price: line.product.unit_price,
                        origin,
                    });
                }
            }
        }
    }
    reduced
}

fn priced_from_offer(line: &ReducedLine, choice: Candidate<'_>) -> CartProductWithTax {
    let offer = choice.offer;
    CartProductWithTax {
        product: CartProduct {
            cart_id: Uuid::nil(),
            supplier_product_id: offer.product.id,
            supplier_product_price_id: offer.price_id,
            quantity: line.quantity,
            unit_price: offer.price,
            subtotal: line_subtotal(line.quantity, offer.price),
            sell_unit: offer.product.sell_unit,
            comments: line.template.product.comments.clone(),
            created_by: line.template.product.created_by,
            created_at: Utc::now(),
        },
        description: offer.product.description.clone(),
        sku: offer.product.sku.clone(),
        tax_rate: offer.product.tax_rate,
        excise_rate: offer.product.excise_rate,
    }
}

/// The reduced line at its original price
fn kept_line(line: &ReducedLine) -> CartProductWithTax {
    let mut kept = line.template.clone();
    kept.product.cart_id = Uuid::nil();
    kept.product.quantity = line.quantity;
    kept.product.unit_price = line.unit_price;
    kept.product.subtotal = line_subtotal(line.quantity, line.unit_price);
    kept
}

/// Deep copy of `template` as a NORMAL orden carrying `lines`.
///
/// The view is not persisted: id and cart id are fresh.
fn consolidated_view(
    template: &OrdenView,
    supplier: Option<OrdenSupplierView>,
    mut lines: Vec<CartProductWithTax>,
) -> OrdenView {
    let cart_id = Uuid::new_v4();
    for line in &mut lines {
        line.product.cart_id = cart_id;
    }
    let totals = compute_totals(cart_id, lines, CartCosts::default());

    let mut view = template.clone();
    view.id = Uuid::new_v4();
    view.orden_type = OrdenType::Normal;
    if let Some(details) = view.details.as_mut() {
        details.orden_id = view.id;
        details.cart_id = cart_id;
        details.subtotal = totals.subtotal;
        details.subtotal_without_tax = totals.subtotal_without_tax;
        details.tax = totals.tax;
        details.shipping_cost = 0.0;
        details.packaging_cost = 0.0;
        details.service_fee = 0.0;
        details.total = totals.total;
        if let Some(unit) = supplier.as_ref().and_then(|s| s.unit.as_ref()) {
            details.supplier_unit_id = unit.id;
        }
    }
    view.cart = totals.lines;
    view.supplier = supplier;
    view
}

#[cfg(test)]
mod tests;
