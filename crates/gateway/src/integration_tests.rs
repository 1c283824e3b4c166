//! End-to-end gateway scenarios against in-memory stores.

use std::sync::Arc;

use chrono::{Duration, Utc};

use assetgate_auth::{NewAccount, Role};
use assetgate_core::CoreError;
use assetgate_equipment::{EquipmentDraft, EquipmentStatus, SetDraft};
use assetgate_infra::{InMemoryEquipmentStore, InMemoryIdentityStore, InMemorySetStore};
use assetgate_sessions::{InMemorySessionStore, SessionManager, SessionToken};

use crate::{MutationGateway, MutationOutcome, MutationRequest};

fn account(name: &str, email: &str) -> NewAccount {
    NewAccount {
        display_name: name.to_string(),
        email: email.to_string(),
        password: "correct horse".to_string(),
    }
}

fn gateway() -> MutationGateway {
    MutationGateway::new(
        Arc::new(InMemoryIdentityStore::new()),
        Arc::new(InMemoryEquipmentStore::new()),
        Arc::new(InMemorySetStore::new()),
        SessionManager::new(Arc::new(InMemorySessionStore::new())),
    )
}

/// Gateway plus a signed-in admin and a signed-in staff session.
async fn gateway_with_users() -> (MutationGateway, SessionToken, SessionToken) {
    let gw = gateway();
    gw.bootstrap_admin(account("Admin", "admin@example.com"))
        .await
        .unwrap();
    gw.register(account("Staff", "staff@example.com"))
        .await
        .unwrap();

    let (admin_session, admin) = gw.sign_in("admin@example.com", "correct horse").await.unwrap();
    let (staff_session, staff) = gw.sign_in("staff@example.com", "correct horse").await.unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(staff.role, Role::Staff);

    (gw, admin_session.token, staff_session.token)
}

fn draft(tag: &str) -> EquipmentDraft {
    EquipmentDraft {
        asset_tag: tag.into(),
        name: "Projector".into(),
        model: "PX-500".into(),
        status: EquipmentStatus::default(),
        location: "Room 204".into(),
        purchase_date: Utc::now(),
        notes: None,
        set_id: None,
    }
}

#[tokio::test]
async fn staff_creates_then_breaks_equipment_with_audit() {
    let (gw, _admin, staff) = gateway_with_users().await;

    let item = gw
        .execute(Some(&staff), MutationRequest::CreateEquipment(draft("EQ-1")))
        .await
        .unwrap()
        .into_equipment()
        .unwrap();
    assert_eq!(item.status, EquipmentStatus::Usable);

    let broken = gw
        .execute(
            Some(&staff),
            MutationRequest::ChangeEquipmentStatus {
                id: item.id,
                status: EquipmentStatus::Broken,
            },
        )
        .await
        .unwrap()
        .into_equipment()
        .unwrap();
    assert_eq!(broken.status, EquipmentStatus::Broken);

    let history = gw.equipment_history(Some(&staff), item.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_status, EquipmentStatus::Usable);
    assert_eq!(history[0].to_status, EquipmentStatus::Broken);
}

#[tokio::test]
async fn staff_cannot_delete_equipment() {
    let (gw, admin, staff) = gateway_with_users().await;

    let item = gw
        .execute(Some(&admin), MutationRequest::CreateEquipment(draft("EQ-1")))
        .await
        .unwrap()
        .into_equipment()
        .unwrap();

    let err = gw
        .execute(Some(&staff), MutationRequest::DeleteEquipment { id: item.id })
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::Forbidden);

    // Still there, and the admin may remove it.
    assert!(gw.get_equipment(Some(&staff), item.id).await.is_ok());
    gw.execute(Some(&admin), MutationRequest::DeleteEquipment { id: item.id })
        .await
        .unwrap();
}

#[tokio::test]
async fn public_scan_reads_but_never_writes() {
    let (gw, admin, _staff) = gateway_with_users().await;

    let item = gw
        .execute(Some(&admin), MutationRequest::CreateEquipment(draft("EQ-1")))
        .await
        .unwrap()
        .into_equipment()
        .unwrap();

    // No session at all: the scan lookup works...
    let detail = gw.scan_lookup(item.id).await.unwrap();
    assert_eq!(detail.item.id, item.id);

    // ...but any mutation without a session is unauthenticated.
    let err = gw
        .execute(
            None,
            MutationRequest::UpdateEquipment {
                id: item.id,
                draft: draft("EQ-1"),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::Unauthenticated);

    // And the non-public read is too.
    assert_eq!(
        gw.list_equipment(None).await.unwrap_err(),
        CoreError::Unauthenticated
    );
}

#[tokio::test]
async fn admin_cannot_change_own_role_or_delete_own_account() {
    let (gw, admin, _staff) = gateway_with_users().await;
    let me = gw.current_principal(Some(&admin)).await.unwrap().unwrap();

    for role in Role::ALL {
        let err = gw
            .execute(
                Some(&admin),
                MutationRequest::ChangeUserRole {
                    user_id: me.id,
                    role,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::Forbidden);
    }

    let err = gw
        .execute(Some(&admin), MutationRequest::DeleteUser { user_id: me.id })
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::Forbidden);

    // The account survived.
    assert!(gw.current_principal(Some(&admin)).await.unwrap().is_some());
}

#[tokio::test]
async fn staff_cannot_manage_users_at_all() {
    let (gw, _admin, staff) = gateway_with_users().await;
    let users = gw.list_users(Some(&staff)).await.unwrap_err();
    assert_eq!(users, CoreError::Forbidden);
}

#[tokio::test]
async fn noop_transition_writes_nothing() {
    let (gw, _admin, staff) = gateway_with_users().await;

    let item = gw
        .execute(Some(&staff), MutationRequest::CreateEquipment(draft("EQ-1")))
        .await
        .unwrap()
        .into_equipment()
        .unwrap();

    let unchanged = gw
        .execute(
            Some(&staff),
            MutationRequest::ChangeEquipmentStatus {
                id: item.id,
                status: EquipmentStatus::Usable,
            },
        )
        .await
        .unwrap()
        .into_equipment()
        .unwrap();

    assert_eq!(unchanged, item);
    assert!(gw
        .equipment_history(Some(&staff), item.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn role_changes_take_effect_on_the_next_request() {
    let (gw, admin, staff) = gateway_with_users().await;

    let item = gw
        .execute(Some(&admin), MutationRequest::CreateEquipment(draft("EQ-1")))
        .await
        .unwrap()
        .into_equipment()
        .unwrap();

    // Staff cannot delete yet.
    assert_eq!(
        gw.execute(Some(&staff), MutationRequest::DeleteEquipment { id: item.id })
            .await
            .unwrap_err(),
        CoreError::Forbidden
    );

    // Promote; the *existing* staff session picks the new role up
    // immediately because resolution is fresh per call.
    let staff_principal = gw.current_principal(Some(&staff)).await.unwrap().unwrap();
    gw.execute(
        Some(&admin),
        MutationRequest::ChangeUserRole {
            user_id: staff_principal.id,
            role: Role::Admin,
        },
    )
    .await
    .unwrap();

    gw.execute(Some(&staff), MutationRequest::DeleteEquipment { id: item.id })
        .await
        .unwrap();
}

#[tokio::test]
async fn deleted_accounts_lose_their_sessions_immediately() {
    let (gw, admin, staff) = gateway_with_users().await;

    let staff_principal = gw.current_principal(Some(&staff)).await.unwrap().unwrap();
    gw.execute(
        Some(&admin),
        MutationRequest::DeleteUser {
            user_id: staff_principal.id,
        },
    )
    .await
    .unwrap();

    assert_eq!(
        gw.list_equipment(Some(&staff)).await.unwrap_err(),
        CoreError::Unauthenticated
    );
}

#[tokio::test]
async fn sign_in_failures_are_uniform() {
    let (gw, _admin, _staff) = gateway_with_users().await;

    let wrong_password = gw
        .sign_in("staff@example.com", "wrong")
        .await
        .unwrap_err();
    let unknown_email = gw.sign_in("ghost@example.com", "wrong").await.unwrap_err();
    let malformed_email = gw.sign_in("not-an-email", "wrong").await.unwrap_err();

    assert_eq!(wrong_password, CoreError::Unauthenticated);
    assert_eq!(unknown_email, CoreError::Unauthenticated);
    assert_eq!(malformed_email, CoreError::Unauthenticated);
}

#[tokio::test]
async fn sign_out_ends_the_session_idempotently() {
    let (gw, admin, _staff) = gateway_with_users().await;

    gw.sign_out(&admin).await.unwrap();
    assert_eq!(
        gw.list_equipment(Some(&admin)).await.unwrap_err(),
        CoreError::Unauthenticated
    );
    gw.sign_out(&admin).await.unwrap();
}

#[tokio::test]
async fn expired_sessions_are_unauthenticated() {
    let identities = Arc::new(InMemoryIdentityStore::new());
    let gw = MutationGateway::new(
        identities,
        Arc::new(InMemoryEquipmentStore::new()),
        Arc::new(InMemorySetStore::new()),
        SessionManager::with_ttl(Arc::new(InMemorySessionStore::new()), Duration::zero()),
    );
    gw.register(account("Staff", "staff@example.com")).await.unwrap();
    let (session, _) = gw.sign_in("staff@example.com", "correct horse").await.unwrap();

    assert_eq!(
        gw.list_equipment(Some(&session.token)).await.unwrap_err(),
        CoreError::Unauthenticated
    );
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let gw = gateway();
    gw.register(account("Alice", "alice@example.com")).await.unwrap();
    let err = gw
        .register(account("Alice Again", "Alice@Example.com "))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));
}

#[tokio::test]
async fn dangling_set_reference_reads_as_unknown_set() {
    let (gw, admin, _staff) = gateway_with_users().await;

    let set = match gw
        .execute(
            Some(&admin),
            MutationRequest::CreateSet(SetDraft {
                name: "Lecture Kit".into(),
                location: "Building A".into(),
            }),
        )
        .await
        .unwrap()
    {
        MutationOutcome::Set(set) => set,
        other => panic!("expected a set, got {other:?}"),
    };

    let mut d = draft("EQ-1");
    d.set_id = Some(set.id);
    let item = gw
        .execute(Some(&admin), MutationRequest::CreateEquipment(d))
        .await
        .unwrap()
        .into_equipment()
        .unwrap();

    let before = gw.get_equipment(Some(&admin), item.id).await.unwrap();
    assert_eq!(before.set_name.as_deref(), Some("Lecture Kit"));

    gw.execute(Some(&admin), MutationRequest::DeleteSet { id: set.id })
        .await
        .unwrap();

    let after = gw.get_equipment(Some(&admin), item.id).await.unwrap();
    assert_eq!(after.set_name.as_deref(), Some("unknown set"));
}

#[tokio::test]
async fn dashboard_counts_follow_transitions() {
    let (gw, _admin, staff) = gateway_with_users().await;

    let a = gw
        .execute(Some(&staff), MutationRequest::CreateEquipment(draft("EQ-1")))
        .await
        .unwrap()
        .into_equipment()
        .unwrap();
    gw.execute(Some(&staff), MutationRequest::CreateEquipment(draft("EQ-2")))
        .await
        .unwrap();

    gw.execute(
        Some(&staff),
        MutationRequest::ChangeEquipmentStatus {
            id: a.id,
            status: EquipmentStatus::Lost,
        },
    )
    .await
    .unwrap();

    let stats = gw.dashboard_stats(Some(&staff)).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.usable, 1);
    assert_eq!(stats.lost, 1);
    assert_eq!(stats.broken, 0);
}

#[tokio::test]
async fn bootstrap_admin_is_idempotent() {
    let gw = gateway();
    gw.bootstrap_admin(account("Admin", "admin@example.com")).await.unwrap();
    gw.bootstrap_admin(account("Admin", "admin@example.com")).await.unwrap();
    let (_, principal) = gw.sign_in("admin@example.com", "correct horse").await.unwrap();
    assert_eq!(principal.role, Role::Admin);
}

#[tokio::test]
async fn status_change_without_a_session_is_unauthenticated() {
    let (gw, admin, _staff) = gateway_with_users().await;

    let item = gw
        .execute(Some(&admin), MutationRequest::CreateEquipment(draft("EQ-1")))
        .await
        .unwrap()
        .into_equipment()
        .unwrap();

    // Even a no-op request needs a resolvable principal.
    let err = gw
        .execute(
            None,
            MutationRequest::ChangeEquipmentStatus {
                id: item.id,
                status: EquipmentStatus::Usable,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::Unauthenticated);
}

#[tokio::test]
async fn unknown_equipment_is_not_found_even_for_admin() {
    let (gw, admin, _staff) = gateway_with_users().await;
    let err = gw
        .execute(
            Some(&admin),
            MutationRequest::ChangeEquipmentStatus {
                id: assetgate_core::EquipmentId::new(),
                status: EquipmentStatus::Lost,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::NotFound);
}
