//! Cart assembly
//!
//! Turns requested line items into a priced, tax-computed, closed cart.

use crate::ports::{CartProductRepository, CartRepository, RepoError};
use crate::utils::money::{line_subtotal, to_decimal, to_f64};
use chrono::Utc;
use rust_decimal::Decimal;
use shared::orden::{
    Cart, CartLineInput, CartProduct, CartProductWithTax, CartSnapshot, SellUnit,
    is_countable_quantity,
};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Invalid cart line: {0}")]
    InvalidLine(String),

    #[error("Cart has no line items")]
    Empty,

    #[error("Error creating cart: {0}")]
    Insert(String),

    #[error("Error closing cart {cart_id}: {source}")]
    Close { cart_id: Uuid, source: RepoError },

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Optional cost add-ons; absent values count as zero
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CartCosts {
    pub shipping_cost: Option<f64>,
    pub packaging_cost: Option<f64>,
    pub service_fee: Option<f64>,
}

/// Line with its final quantity, price and subtotal
#[derive(Debug, Clone, PartialEq)]
struct PricedLine {
    supplier_product_id: Uuid,
    supplier_product_price_id: Option<Uuid>,
    quantity: f64,
    unit_price: f64,
    subtotal: f64,
    sell_unit: SellUnit,
    comments: Option<String>,
}

/// Drop dust lines and price the rest.
///
/// An explicit subtotal is only honored when both quantity and unit price
/// are absent; such a line is recorded as one unit at the subtotal.
fn price_lines(lines: &[CartLineInput]) -> Result<Vec<PricedLine>, CartError> {
    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        let (quantity, unit_price, subtotal) = match (line.quantity, line.unit_price, line.subtotal)
        {
            (Some(q), _, _) if !is_countable_quantity(q) => continue,
            (Some(q), Some(p), _) => (q, p, line_subtotal(q, p)),
            (None, None, Some(s)) => (1.0, s, to_f64(to_decimal(s))),
            _ => {
                return Err(CartError::InvalidLine(format!(
                    "product {} needs quantity and unit price",
                    line.supplier_product_id
                )));
            }
        };
        if !unit_price.is_finite() || unit_price < 0.0 || !quantity.is_finite() {
            return Err(CartError::InvalidLine(format!(
                "product {} has an invalid price or quantity",
                line.supplier_product_id
            )));
        }
        priced.push(PricedLine {
            supplier_product_id: line.supplier_product_id,
            supplier_product_price_id: line.supplier_product_price_id,
            quantity,
            unit_price,
            subtotal,
            sell_unit: line.sell_unit,
            comments: line.comments.clone(),
        });
    }
    Ok(priced)
}

/// Compute totals from lines joined with their product tax rates
pub fn compute_totals(cart_id: Uuid, lines: Vec<CartProductWithTax>, costs: CartCosts) -> CartSnapshot {
    let lines: Vec<CartProductWithTax> = lines
        .into_iter()
        .filter(|l| is_countable_quantity(l.product.quantity))
        .collect();

    let subtotal: Decimal = lines.iter().map(|l| to_decimal(l.product.subtotal)).sum();
    let iva: Decimal = lines
        .iter()
        .map(|l| to_decimal(l.product.subtotal) * to_decimal(l.tax_rate))
        .sum();
    let ieps: Decimal = lines
        .iter()
        .map(|l| to_decimal(l.product.subtotal) * to_decimal(l.excise_rate))
        .sum();
    let tax = iva + ieps;
    let subtotal_without_tax = if tax.is_zero() { subtotal } else { subtotal - tax };

    let shipping = to_decimal(costs.shipping_cost.unwrap_or(0.0));
    let packaging = to_decimal(costs.packaging_cost.unwrap_or(0.0));
    let fee = to_decimal(costs.service_fee.unwrap_or(0.0));
    // Discount / cashback adjustments would apply to the total here
    let total = subtotal + shipping + packaging + fee;

    CartSnapshot {
        cart_id,
        lines,
        subtotal: to_f64(subtotal),
        subtotal_without_tax: to_f64(subtotal_without_tax),
        tax: to_f64(tax),
        shipping_cost: to_f64(shipping),
        packaging_cost: to_f64(packaging),
        service_fee: to_f64(fee),
        total: to_f64(total),
    }
}

/// Builds closed cart snapshots
#[derive(Clone)]
pub struct CartAssembler {
    carts: Arc<dyn CartRepository>,
    cart_products: Arc<dyn CartProductRepository>,
}

impl CartAssembler {
    pub fn new(carts: Arc<dyn CartRepository>, cart_products: Arc<dyn CartProductRepository>) -> Self {
        Self {
            carts,
            cart_products,
        }
    }

    /// Persist a new cart with `lines`, compute its totals and close it.
    ///
    /// The cart is closed whether or not assembly succeeds.
    pub async fn build_cart(
        &self,
        created_by: Uuid,
        lines: &[CartLineInput],
        costs: CartCosts,
    ) -> Result<CartSnapshot, CartError> {
        let priced = price_lines(lines)?;
        if priced.is_empty() {
            return Err(CartError::Empty);
        }

        let mut cart = self
            .carts
            .new(created_by)
            .await
            .map_err(|e| CartError::Insert(e.to_string()))?;

        let result = self.fill_and_total(&cart, created_by, priced, costs).await;

        cart.active = false;
        cart.closed_at = Some(Utc::now());
        let closed = self.carts.update(&cart).await;

        match (result, closed) {
            (Ok(snapshot), Ok(())) => {
                tracing::debug!(
                    cart_id = %cart.id,
                    lines = snapshot.lines.len(),
                    total = snapshot.total,
                    "Cart assembled"
                );
                Ok(snapshot)
            }
            (Ok(_), Err(e)) => Err(CartError::Close {
                cart_id: cart.id,
                source: e,
            }),
            (Err(e), close) => {
                if let Err(close_err) = close {
                    tracing::error!(cart_id = %cart.id, error = %close_err, "Failed to close cart after assembly error");
                }
                Err(e)
            }
        }
    }

    async fn fill_and_total(
        &self,
        cart: &Cart,
        created_by: Uuid,
        priced: Vec<PricedLine>,
        costs: CartCosts,
    ) -> Result<CartSnapshot, CartError> {
        for line in priced {
            let product = CartProduct {
                cart_id: cart.id,
                supplier_product_id: line.supplier_product_id,
                supplier_product_price_id: line.supplier_product_price_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.subtotal,
                sell_unit: line.sell_unit,
                comments: line.comments,
                created_by,
                created_at: Utc::now(),
            };
            if let Err(e) = self.cart_products.new(&product).await {
                tracing::warn!(
                    cart_id = %cart.id,
                    supplier_product_id = %product.supplier_product_id,
                    error = %e,
                    "Cart line insert failed"
                );
                return Err(CartError::Insert(e.to_string()));
            }
        }

        let with_tax = self.cart_products.search_with_tax(cart.id).await?;
        Ok(compute_totals(cart.id, with_tax, costs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: Option<f64>, unit_price: Option<f64>, subtotal: Option<f64>) -> CartLineInput {
        CartLineInput {
            supplier_product_id: Uuid::new_v4(),
            supplier_product_price_id: None,
            quantity,
            unit_price,
            subtotal,
            sell_unit: SellUnit::Kg,
            comments: None,
        }
    }

    fn taxed(subtotal: f64, quantity: f64, tax_rate: f64, excise_rate: f64) -> CartProductWithTax {
        CartProductWithTax {
            product: CartProduct {
                cart_id: Uuid::nil(),
                supplier_product_id: Uuid::new_v4(),
                supplier_product_price_id: None,
                quantity,
                unit_price: subtotal,
                subtotal,
                sell_unit: SellUnit::Unit,
                comments: None,
                created_by: Uuid::nil(),
                created_at: Utc::now(),
            },
            description: "producto".into(),
            sku: None,
            tax_rate,
            excise_rate,
        }
    }

    #[test]
    fn test_price_lines_drops_dust_and_uses_lump_sum() {
        let lines = vec![
            line(Some(0.0005), Some(10.0), None),
            line(Some(2.0), Some(12.5), None),
            line(None, None, Some(40.0)),
        ];
        let priced = price_lines(&lines).unwrap();
        assert_eq!(priced.len(), 2);
        assert_eq!(priced[0].subtotal, 25.0);
        assert_eq!(priced[1].quantity, 1.0);
        assert_eq!(priced[1].unit_price, 40.0);
        assert_eq!(priced[1].subtotal, 40.0);
    }

    #[test]
    fn test_price_lines_requires_pricing() {
        let err = price_lines(&[line(Some(1.0), None, Some(10.0))]).unwrap_err();
        assert!(matches!(err, CartError::InvalidLine(_)));
        let err = price_lines(&[line(None, None, None)]).unwrap_err();
        assert!(matches!(err, CartError::InvalidLine(_)));
    }

    #[test]
    fn test_compute_totals_iva_and_ieps() {
        let snapshot = compute_totals(
            Uuid::nil(),
            vec![taxed(100.0, 1.0, 0.16, 0.0), taxed(50.0, 1.0, 0.16, 0.08)],
            CartCosts {
                shipping_cost: Some(10.0),
                ..Default::default()
            },
        );
        assert_eq!(snapshot.subtotal, 150.0);
        assert_eq!(snapshot.tax, 28.0);
        assert_eq!(snapshot.subtotal_without_tax, 122.0);
        assert_eq!(snapshot.total, 160.0);
    }

    #[test]
    fn test_compute_totals_without_tax_keeps_subtotal() {
        let snapshot = compute_totals(
            Uuid::nil(),
            vec![taxed(80.0, 2.0, 0.0, 0.0), taxed(999.0, 0.0005, 0.16, 0.0)],
            CartCosts::default(),
        );
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.tax, 0.0);
        assert_eq!(snapshot.subtotal_without_tax, 80.0);
        assert_eq!(snapshot.total, 80.0);
    }
}
