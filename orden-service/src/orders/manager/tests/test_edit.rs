use super::*;
use shared::error::{ErrorCode, ErrorKind};
use shared::orden::{PayMethodType, PayStatusType};

fn comments(text: &str) -> EditOrdenInput {
    EditOrdenInput {
        comments: Some(text.to_string()),
        ..Default::default()
    }
}

fn status(status: OrdenStatusType) -> EditOrdenInput {
    EditOrdenInput {
        status: Some(status),
        ..Default::default()
    }
}

// ========================================================================
// Details versioning
// ========================================================================

#[tokio::test]
async fn test_each_edit_adds_one_details_version() {
    let fx = create_test_manager();
    let orden = fx.create_normal().await;

    for i in 1..=3 {
        fx.manager
            .edit_orden(&fx.actor(), orden.id, comments(&format!("edit {i}")))
            .await
            .unwrap();
    }

    let history = fx.store.details_history(orden.id);
    let versions: Vec<i32> = history.iter().map(|d| d.version).collect();
    assert_eq!(versions, vec![1, 2, 3, 4]);

    let current = fx.manager.get_orden(orden.id).await.unwrap();
    let details = current.details.unwrap();
    assert_eq!(details.version, 4);
    assert_eq!(details.comments.as_deref(), Some("edit 3"));
    // Fields not edited are carried forward
    assert_eq!(details.cart_id, history[0].cart_id);
    assert_eq!(details.total, history[0].total);
    assert_eq!(details.delivery_time, history[0].delivery_time);
}

#[tokio::test]
async fn test_previous_versions_untouched() {
    let fx = create_test_manager();
    let orden = fx.create_normal().await;
    let v1 = fx.store.details_history(orden.id).remove(0);

    fx.manager
        .edit_orden(
            &fx.actor(),
            orden.id,
            EditOrdenInput {
                payment_method: Some(PayMethodType::Transfer),
                comments: Some("entregar temprano".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let history = fx.store.details_history(orden.id);
    assert_eq!(history[0], v1);
    assert_eq!(history[1].payment_method, Some(PayMethodType::Transfer));
}

#[tokio::test]
async fn test_cart_replacement_builds_new_closed_cart() {
    let mut fx = create_test_manager();
    let orden = fx.create_normal().await;
    let old_cart_id = orden.details.as_ref().unwrap().cart_id;
    fx.drain_events();

    let view = fx
        .manager
        .edit_orden(
            &fx.actor(),
            orden.id,
            EditOrdenInput {
                cart: Some(vec![CartLineInput::priced(
                    fx.soda.id,
                    4.0,
                    25.0,
                    SellUnit::Kg,
                )]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let details = view.details.as_ref().unwrap();
    assert_eq!(details.version, 2);
    assert_ne!(details.cart_id, old_cart_id);
    assert_eq!(details.subtotal, 100.0);
    assert_eq!(details.tax, 24.0);
    assert_eq!(details.subtotal_without_tax, 76.0);
    assert_eq!(view.cart.len(), 1);
    assert_eq!(view.cart[0].product.supplier_product_id, fx.soda.id);

    assert!(!fx.store.cart(old_cart_id).unwrap().active);
    assert!(!fx.store.cart(details.cart_id).unwrap().active);

    let events = fx.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], OrdenEvent::DetailsUpdated { .. }));
}

#[tokio::test]
async fn test_cost_edit_only_moves_total() {
    let fx = create_test_manager();
    let orden = fx.create_normal().await;
    let before = orden.details.clone().unwrap();

    let view = fx
        .manager
        .edit_orden(
            &fx.actor(),
            orden.id,
            EditOrdenInput {
                shipping_cost: Some(20.0),
                service_fee: Some(5.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = view.details.unwrap();
    assert_eq!(after.version, 2);
    assert_eq!(after.cart_id, before.cart_id);
    assert_eq!(after.subtotal, before.subtotal);
    assert_eq!(after.tax, before.tax);
    assert_eq!(after.shipping_cost, 20.0);
    assert_eq!(after.service_fee, 5.5);
    assert_eq!(after.total, 125.5);
    assert_eq!(fx.store.all_carts().len(), 1);
}

// ========================================================================
// Status track
// ========================================================================

#[tokio::test]
async fn test_status_only_edit_writes_no_details_version() {
    let mut fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.drain_events();

    let view = fx
        .manager
        .edit_orden(&fx.actor(), orden.id, status(OrdenStatusType::Delivered))
        .await
        .unwrap();

    assert_eq!(view.current_status(), Some(OrdenStatusType::Delivered));
    assert_eq!(fx.store.status_history(orden.id).len(), 2);
    assert_eq!(fx.store.details_history(orden.id).len(), 1);

    let events = fx.drain_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        OrdenEvent::StatusChanged {
            previous: Some(OrdenStatusType::Submitted),
            status: OrdenStatusType::Delivered,
            ..
        }
    ));
    assert!(matches!(
        &events[1],
        OrdenEvent::Delivered { orden_id, supplier_business_id }
            if *orden_id == orden.id && *supplier_business_id == fx.business.id
    ));
}

#[tokio::test]
async fn test_cancel_with_details_change_carries_terminal_status() {
    let mut fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.drain_events();

    fx.manager
        .edit_orden(
            &fx.actor(),
            orden.id,
            EditOrdenInput {
                status: Some(OrdenStatusType::Canceled),
                comments: Some("sin stock".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(fx.store.details_history(orden.id).len(), 2);
    let events = fx.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        OrdenEvent::DetailsUpdated {
            terminal_status: Some(OrdenStatusType::Canceled),
            ..
        }
    ));
}

#[tokio::test]
async fn test_non_terminal_status_with_details_change() {
    let mut fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.drain_events();

    fx.manager
        .edit_orden(
            &fx.actor(),
            orden.id,
            EditOrdenInput {
                status: Some(OrdenStatusType::Accepted),
                comments: Some("entrega por la tarde".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let events = fx.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        OrdenEvent::DetailsUpdated {
            terminal_status: None,
            ..
        }
    ));
}

#[tokio::test]
async fn test_status_history_is_append_only() {
    let fx = create_test_manager();
    let orden = fx.create_normal().await;
    let first = fx.store.status_history(orden.id).remove(0);

    fx.manager
        .edit_orden(&fx.actor(), orden.id, status(OrdenStatusType::Accepted))
        .await
        .unwrap();
    fx.manager
        .edit_orden(&fx.actor(), orden.id, status(OrdenStatusType::Shipping))
        .await
        .unwrap();

    let history = fx.store.status_history(orden.id);
    assert_eq!(history.len(), 3);
    assert_eq!(history[0], first);
    let last = fx.manager.get_orden(orden.id).await.unwrap();
    assert_eq!(last.current_status(), Some(OrdenStatusType::Shipping));
}

#[tokio::test]
async fn test_status_regression_refused() {
    let fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.manager
        .edit_orden(&fx.actor(), orden.id, status(OrdenStatusType::Shipping))
        .await
        .unwrap();

    let err = fx
        .manager
        .edit_orden(&fx.actor(), orden.id, status(OrdenStatusType::Accepted))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);

    // CANCELED is only reachable from SUBMITTED or ACCEPTED
    let err = fx
        .manager
        .edit_orden(&fx.actor(), orden.id, status(OrdenStatusType::Canceled))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(fx.store.status_history(orden.id).len(), 2);
}

#[tokio::test]
async fn test_rejected_edit_writes_nothing() {
    let fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.manager
        .edit_orden(&fx.actor(), orden.id, status(OrdenStatusType::Delivered))
        .await
        .unwrap();

    let err = fx
        .manager
        .edit_orden(
            &fx.actor(),
            orden.id,
            EditOrdenInput {
                status: Some(OrdenStatusType::Canceled),
                comments: Some("cancelar".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
    assert_eq!(fx.store.details_history(orden.id).len(), 1);
    assert_eq!(fx.store.status_history(orden.id).len(), 2);
}

#[tokio::test]
async fn test_cart_failure_keeps_committed_status() {
    let fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.store.fail_on(crate::db::FailPoint::CartProductInsert);

    let result = fx
        .manager
        .edit_orden(
            &fx.actor(),
            orden.id,
            EditOrdenInput {
                status: Some(OrdenStatusType::Accepted),
                cart: Some(fx.cart()),
                ..Default::default()
            },
        )
        .await;
    assert!(result.is_err());
    fx.store.clear_failures();

    // The status row landed before the cart was built
    let current = fx.manager.get_orden(orden.id).await.unwrap();
    assert_eq!(current.current_status(), Some(OrdenStatusType::Accepted));
    assert_eq!(fx.store.details_history(orden.id).len(), 1);
}

#[tokio::test]
async fn test_same_status_is_noop() {
    let mut fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.drain_events();

    fx.manager
        .edit_orden(&fx.actor(), orden.id, status(OrdenStatusType::Submitted))
        .await
        .unwrap();

    assert_eq!(fx.store.status_history(orden.id).len(), 1);
    assert!(fx.drain_events().is_empty());
}

#[tokio::test]
async fn test_paystatus_only_edit() {
    let mut fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.drain_events();

    let view = fx
        .manager
        .edit_orden(
            &fx.actor(),
            orden.id,
            EditOrdenInput {
                paystatus: Some(PayStatusType::Paid),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(view.current_paystatus(), Some(PayStatusType::Paid));
    assert_eq!(fx.store.pay_status_history(orden.id).len(), 2);
    assert_eq!(fx.store.status_history(orden.id).len(), 1);
    assert_eq!(fx.store.details_history(orden.id).len(), 1);
    assert!(fx.drain_events().is_empty());
}

#[tokio::test]
async fn test_draft_migrates_to_normal_only() {
    let fx = create_test_manager();
    let draft = fx
        .manager
        .new_orden(
            &fx.actor(),
            NewOrdenInput {
                orden_type: OrdenType::Draft,
                source_type: None,
                supplier_unit_id: None,
                terms: fx.terms(),
            },
        )
        .await
        .unwrap();

    let view = fx
        .manager
        .edit_orden(
            &fx.actor(),
            draft.id,
            EditOrdenInput {
                orden_type: Some(OrdenType::Normal),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(view.orden_type, OrdenType::Normal);

    let err = fx
        .manager
        .edit_orden(
            &fx.actor(),
            draft.id,
            EditOrdenInput {
                orden_type: Some(OrdenType::Draft),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

#[tokio::test]
async fn test_edit_unknown_orden() {
    let fx = create_test_manager();
    let err = fx
        .manager
        .edit_orden(&fx.actor(), Uuid::new_v4(), comments("x"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrdenNotFound);
}

// ========================================================================
// Confirm
// ========================================================================

#[tokio::test]
async fn test_confirm_is_idempotent() {
    let mut fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.drain_events();

    let first = fx.manager.confirm_orden(&fx.actor(), orden.id).await.unwrap();
    assert!(!first.is_already_confirmed());
    assert_eq!(first.view().current_status(), Some(OrdenStatusType::Accepted));

    let second = fx.manager.confirm_orden(&fx.actor(), orden.id).await.unwrap();
    assert!(second.is_already_confirmed());

    let accepted = fx
        .store
        .status_history(orden.id)
        .into_iter()
        .filter(|s| s.status == OrdenStatusType::Accepted)
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(fx.drain_events().len(), 1);
}

#[tokio::test]
async fn test_confirm_does_not_regress_delivered() {
    let fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.manager
        .edit_orden(&fx.actor(), orden.id, status(OrdenStatusType::Delivered))
        .await
        .unwrap();

    let outcome = fx.manager.confirm_orden(&fx.actor(), orden.id).await.unwrap();
    assert!(outcome.is_already_confirmed());
    assert_eq!(
        outcome.view().current_status(),
        Some(OrdenStatusType::Delivered)
    );
    assert_eq!(fx.store.status_history(orden.id).len(), 2);
}

#[tokio::test]
async fn test_confirm_canceled_orden_fails() {
    let fx = create_test_manager();
    let orden = fx.create_normal().await;
    fx.manager
        .edit_orden(&fx.actor(), orden.id, status(OrdenStatusType::Canceled))
        .await
        .unwrap();

    let err = fx
        .manager
        .confirm_orden(&fx.actor(), orden.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrdenCanceled);
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}
