use super::*;
use shared::error::ErrorKind;
use shared::models::{SupplierBusiness, SupplierProduct, SupplierProductOffer, SupplierUnit};
use shared::orden::{OrdenDetails, SellUnit};

fn business(name: &str) -> SupplierBusiness {
    SupplierBusiness {
        id: Uuid::new_v4(),
        name: name.to_string(),
        active: true,
        notification_preference: Default::default(),
    }
}

fn catalog(name: &str, offers: &[(&str, SellUnit, f64)]) -> SupplierCatalog {
    let business = business(name);
    let unit = SupplierUnit {
        id: Uuid::new_v4(),
        supplier_business_id: business.id,
        unit_name: format!("{name} CEDIS"),
        full_address: "Calle 1".to_string(),
        deleted: false,
    };
    let offers = offers
        .iter()
        .map(|(description, sell_unit, price)| SupplierProductOffer {
            product: SupplierProduct {
                id: Uuid::new_v4(),
                supplier_business_id: business.id,
                description: description.to_string(),
                sell_unit: *sell_unit,
                sku: None,
                tax_rate: 0.0,
                excise_rate: 0.0,
            },
            price_id: Some(Uuid::new_v4()),
            price: *price,
        })
        .collect();
    SupplierCatalog {
        business,
        account: None,
        unit: Some(unit),
        offers,
    }
}

fn line(description: &str, sell_unit: SellUnit, quantity: f64, unit_price: f64) -> CartProductWithTax {
    CartProductWithTax {
        product: CartProduct {
            cart_id: Uuid::new_v4(),
            supplier_product_id: Uuid::new_v4(),
            supplier_product_price_id: None,
            quantity,
            unit_price,
            subtotal: line_subtotal(quantity, unit_price),
            sell_unit,
            comments: None,
            created_by: Uuid::nil(),
            created_at: Utc::now(),
        },
        description: description.to_string(),
        sku: None,
        tax_rate: 0.0,
        excise_rate: 0.0,
    }
}

fn draft(branch_id: Uuid, house: &SupplierBusiness, cart: Vec<CartProductWithTax>) -> OrdenView {
    let id = Uuid::new_v4();
    let unit = SupplierUnit {
        id: Uuid::new_v4(),
        supplier_business_id: house.id,
        unit_name: "Alima".to_string(),
        full_address: "Casa".to_string(),
        deleted: false,
    };
    OrdenView {
        id,
        orden_type: OrdenType::Draft,
        orden_number: "1".to_string(),
        source_type: None,
        created_by: Uuid::nil(),
        created_at: Utc::now(),
        status: None,
        paystatus: None,
        details: Some(OrdenDetails {
            id: Uuid::new_v4(),
            orden_id: id,
            version: 1,
            restaurant_branch_id: branch_id,
            supplier_unit_id: unit.id,
            cart_id: Uuid::new_v4(),
            delivery_date: None,
            delivery_time: None,
            delivery_type: None,
            subtotal: 0.0,
            subtotal_without_tax: 0.0,
            tax: 0.0,
            shipping_cost: 0.0,
            packaging_cost: 0.0,
            service_fee: 0.0,
            total: 0.0,
            payment_method: None,
            comments: None,
            approved_by: None,
            created_by: Uuid::nil(),
            created_at: Utc::now(),
        }),
        cart,
        branch: None,
        supplier: Some(OrdenSupplierView {
            business: house.clone(),
            account: None,
            unit: Some(unit),
        }),
    }
}

#[test]
fn test_cheapest_supplier_wins() {
    let house = business("Alima");
    let drafts = vec![draft(
        Uuid::new_v4(),
        &house,
        vec![line("Jitomate", SellUnit::Kg, 3.0, 12.0)],
    )];
    let expensive = catalog("Caro", &[("Jitomate", SellUnit::Kg, 10.0)]);
    let cheap = catalog("Barato", &[("jitomate", SellUnit::Kg, 8.0)]);

    let ordenes = PreOrderOptimizer::default()
        .optimize(&drafts, &[expensive, cheap.clone()])
        .unwrap();

    assert_eq!(ordenes.len(), 1);
    let orden = &ordenes[0];
    assert_eq!(orden.supplier_business_id(), Some(cheap.business.id));
    assert_eq!(orden.orden_type, OrdenType::Normal);
    assert_ne!(orden.id, drafts[0].id);
    let details = orden.details.as_ref().unwrap();
    assert_eq!(details.subtotal, 24.0);
    assert_eq!(details.total, 24.0);
    assert_eq!(details.supplier_unit_id, cheap.unit.as_ref().unwrap().id);
    assert_eq!(orden.cart[0].product.unit_price, 8.0);
    assert_eq!(orden.cart[0].product.supplier_product_id, cheap.offers[0].product.id);
}

#[test]
fn test_unmatched_line_stays_with_house_supplier() {
    let house = business("Alima");
    let drafts = vec![draft(
        Uuid::new_v4(),
        &house,
        vec![
            line("Jitomate", SellUnit::Kg, 2.0, 12.0),
            line("Azafran", SellUnit::Gram, 5.0, 30.0),
        ],
    )];
    let supplier = catalog("Verduras", &[("Jitomate", SellUnit::Kg, 9.0)]);

    let ordenes = PreOrderOptimizer::default()
        .optimize(&drafts, &[supplier.clone()])
        .unwrap();

    assert_eq!(ordenes.len(), 2);
    let kept = ordenes
        .iter()
        .find(|o| o.supplier_business_id() == Some(house.id))
        .unwrap();
    assert_eq!(kept.cart.len(), 1);
    assert_eq!(kept.cart[0].description, "Azafran");
    assert_eq!(kept.cart[0].product.unit_price, 30.0);
    assert_eq!(kept.details.as_ref().unwrap().subtotal, 150.0);

    let moved = ordenes
        .iter()
        .find(|o| o.supplier_business_id() == Some(supplier.business.id))
        .unwrap();
    assert_eq!(moved.details.as_ref().unwrap().subtotal, 18.0);
}

#[test]
fn test_lines_reduced_across_drafts() {
    let house = business("Alima");
    let branch_id = Uuid::new_v4();
    let drafts = vec![
        draft(branch_id, &house, vec![line("Cebolla Blanca", SellUnit::Kg, 2.0, 10.0)]),
        draft(branch_id, &house, vec![line("cebolla  blanca", SellUnit::Kg, 3.0, 11.0)]),
    ];

    // Nobody offers it: summed quantity at the first unit price
    let ordenes = PreOrderOptimizer::default().optimize(&drafts, &[]).unwrap();

    assert_eq!(ordenes.len(), 1);
    assert_eq!(ordenes[0].cart.len(), 1);
    assert_eq!(ordenes[0].cart[0].product.quantity, 5.0);
    assert_eq!(ordenes[0].details.as_ref().unwrap().subtotal, 50.0);
}

#[test]
fn test_dust_lines_ignored() {
    let house = business("Alima");
    let drafts = vec![draft(
        Uuid::new_v4(),
        &house,
        vec![
            line("Papa", SellUnit::Kg, 1.0, 20.0),
            line("Ajo", SellUnit::Kg, 0.0005, 100.0),
        ],
    )];

    let ordenes = PreOrderOptimizer::default().optimize(&drafts, &[]).unwrap();

    assert_eq!(ordenes[0].cart.len(), 1);
    assert_eq!(ordenes[0].details.as_ref().unwrap().subtotal, 20.0);
}

#[test]
fn test_unresolvable_supplier_is_not_found() {
    let house = business("Alima");
    let mut orphan = draft(
        Uuid::new_v4(),
        &house,
        vec![line("Limon", SellUnit::Kg, 1.0, 15.0)],
    );
    orphan.supplier = None;

    let err = PreOrderOptimizer::default()
        .optimize(&[orphan], &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_rejects_non_draft_and_mixed_branches() {
    let house = business("Alima");
    let mut normal = draft(Uuid::new_v4(), &house, vec![line("Limon", SellUnit::Kg, 1.0, 15.0)]);
    normal.orden_type = OrdenType::Normal;
    let err = PreOrderOptimizer::default().optimize(&[normal], &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);

    let drafts = vec![
        draft(Uuid::new_v4(), &house, vec![line("Limon", SellUnit::Kg, 1.0, 15.0)]),
        draft(Uuid::new_v4(), &house, vec![line("Limon", SellUnit::Kg, 1.0, 15.0)]),
    ];
    let err = PreOrderOptimizer::default().optimize(&drafts, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

#[test]
fn test_empty_batch() {
    let ordenes = PreOrderOptimizer::default().optimize(&[], &[]).unwrap();
    assert!(ordenes.is_empty());
}
