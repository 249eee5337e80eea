//! Supplier assignment strategies

use shared::models::SupplierProductOffer;

/// Offer of one supplier catalog for a signature
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Index into the supplier catalogs given to the optimizer
    pub catalog: usize,
    pub offer: &'a SupplierProductOffer,
}

/// Picks the supplier for one reduced line
pub trait AssignmentStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` keeps the line with its original supplier
    fn select<'a>(&self, quantity: f64, candidates: &[Candidate<'a>]) -> Option<Candidate<'a>>;
}

/// Greedy, price-only: the lowest unit price wins; ties go to the catalog
/// listed first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestOffer;

impl AssignmentStrategy for CheapestOffer {
    fn name(&self) -> &'static str {
        "cheapest_offer"
    }

    fn select<'a>(&self, _quantity: f64, candidates: &[Candidate<'a>]) -> Option<Candidate<'a>> {
        let mut sorted: Vec<Candidate<'a>> = candidates
            .iter()
            .copied()
            .filter(|c| c.offer.price.is_finite() && c.offer.price >= 0.0)
            .collect();
        sorted.sort_by(|a, b| a.offer.price.total_cmp(&b.offer.price));
        sorted.into_iter().next()
    }
}
