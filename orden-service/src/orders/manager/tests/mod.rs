use super::*;
use crate::core::SystemPrincipal;
use crate::db::MemoryStore;
use crate::hooks::EventOutbox;
use shared::models::{
    CoreUser, RestaurantBranch, SupplierBusiness, SupplierBusinessAccount, SupplierProduct,
    SupplierUnit,
};
use shared::orden::{CartLineInput, OrdenType, SellUnit};
use std::sync::Arc;
use tokio::sync::mpsc;

mod test_edit;

const AUTH_ID: &str = "firebase-uid-1";

/// Seeded directory plus a manager over one in-memory store
struct Fixture {
    store: Arc<MemoryStore>,
    manager: OrdenManager,
    events: mpsc::Receiver<OrdenEvent>,
    system: SystemPrincipal,
    branch: RestaurantBranch,
    business: SupplierBusiness,
    unit: SupplierUnit,
    house_unit: SupplierUnit,
    /// 16% IVA
    tomato: SupplierProduct,
    /// 16% IVA + 8% IEPS
    soda: SupplierProduct,
}

fn product(business_id: Uuid, description: &str, tax_rate: f64, excise_rate: f64) -> SupplierProduct {
    SupplierProduct {
        id: Uuid::new_v4(),
        supplier_business_id: business_id,
        description: description.to_string(),
        sell_unit: SellUnit::Kg,
        sku: None,
        tax_rate,
        excise_rate,
    }
}

fn make_unit(business_id: Uuid, name: &str) -> SupplierUnit {
    SupplierUnit {
        id: Uuid::new_v4(),
        supplier_business_id: business_id,
        unit_name: name.to_string(),
        full_address: "Av. Central 100".to_string(),
        deleted: false,
    }
}

fn create_test_manager() -> Fixture {
    let store = Arc::new(MemoryStore::new());

    let user = CoreUser {
        id: Uuid::new_v4(),
        first_name: "Ana".into(),
        last_name: "Lopez".into(),
        email: "ana@proveedor.mx".into(),
        auth_id: Some(AUTH_ID.into()),
    };
    let system_user = CoreUser {
        id: Uuid::new_v4(),
        first_name: "Sistema".into(),
        last_name: String::new(),
        email: "admin@alima.la".into(),
        auth_id: None,
    };
    store.insert_user(user.clone());
    store.insert_user(system_user.clone());

    let branch = RestaurantBranch {
        id: Uuid::new_v4(),
        restaurant_business_id: Uuid::new_v4(),
        branch_name: "Sucursal Roma".into(),
        full_address: "Colima 1, Roma Nte.".into(),
        contact_email: Some("roma@restaurante.mx".into()),
        deleted: false,
    };
    store.insert_branch(branch.clone());

    let business = SupplierBusiness {
        id: Uuid::new_v4(),
        name: "Verduras del Centro".into(),
        active: true,
        notification_preference: Default::default(),
    };
    store.insert_business(business.clone());
    store.insert_business_account(SupplierBusinessAccount {
        supplier_business_id: business.id,
        legal_rep_name: Some("Luis Perez".into()),
        email: Some("ventas@verduras.mx".into()),
        phone_number: Some("5512345678".into()),
        displays_in_marketplace: true,
    });
    let unit = make_unit(business.id, "CEDIS Norte");
    store.insert_unit(unit.clone());
    store.link_user_to_business(user.id, business.id);

    let house = SupplierBusiness {
        id: Uuid::new_v4(),
        name: "Alima".into(),
        active: true,
        notification_preference: Default::default(),
    };
    store.insert_business(house.clone());
    let house_unit = make_unit(house.id, "Alima");
    store.insert_unit(house_unit.clone());

    let tomato = product(business.id, "Jitomate Saladet", 0.16, 0.0);
    let soda = product(business.id, "Refresco", 0.16, 0.08);
    store.insert_product(tomato.clone());
    store.insert_product(soda.clone());

    let config = Config {
        house_supplier_unit_id: house_unit.id,
        system_core_user_id: system_user.id,
        ..Config::default()
    };
    let (outbox, events) = EventOutbox::channel(64);
    let manager = OrdenManager::new(OrdenStores::uniform(store.clone()), outbox, &config);

    Fixture {
        store,
        manager,
        events,
        system: config.system_principal(),
        branch,
        business,
        unit,
        house_unit,
        tomato,
        soda,
    }
}

impl Fixture {
    fn actor(&self) -> Actor {
        Actor::user(AUTH_ID)
    }

    /// 2 kg of tomato at 50
    fn cart(&self) -> Vec<CartLineInput> {
        vec![CartLineInput::priced(self.tomato.id, 2.0, 50.0, SellUnit::Kg)]
    }

    fn terms(&self) -> OrdenTerms {
        OrdenTerms::new(self.branch.id, self.cart())
    }

    async fn create_normal(&self) -> OrdenView {
        self.manager
            .new_orden(
                &self.actor(),
                NewOrdenInput {
                    orden_type: OrdenType::Normal,
                    source_type: None,
                    supplier_unit_id: None,
                    terms: self.terms(),
                },
            )
            .await
            .unwrap()
    }

    /// Events queued so far
    fn drain_events(&mut self) -> Vec<OrdenEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}
