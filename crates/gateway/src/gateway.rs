//! The mutation gateway.

use std::sync::Arc;

use chrono::Utc;

use assetgate_auth::{
    self as auth, normalize_email, policy, Action, AuthError, Identity, NewAccount, Principal,
    Role,
};
use assetgate_core::{CoreError, CoreResult, EquipmentId, UserId};
use assetgate_equipment::{lifecycle, StatusAuditEntry, TransitionPlan};
use assetgate_infra::{EquipmentStore, IdentityStore, SetStore};
use assetgate_sessions::{Session, SessionManager, SessionToken};

use crate::{MutationOutcome, MutationRequest};

/// The single enforcement point for authentication, authorization, and
/// the equipment lifecycle. No other code path mutates equipment, sets,
/// or identities.
#[derive(Clone)]
pub struct MutationGateway {
    identities: Arc<dyn IdentityStore>,
    equipment: Arc<dyn EquipmentStore>,
    sets: Arc<dyn SetStore>,
    sessions: SessionManager,
}

impl MutationGateway {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        equipment: Arc<dyn EquipmentStore>,
        sets: Arc<dyn SetStore>,
        sessions: SessionManager,
    ) -> Self {
        Self {
            identities,
            equipment,
            sets,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    // ─────────────────────────────────────────────────────────────────
    // Principal resolution
    // ─────────────────────────────────────────────────────────────────

    /// Resolve the acting principal for this call.
    ///
    /// Always re-reads the identity store: the session carries only a
    /// user id, so a role change or account deletion is effective on
    /// the very next request. A session whose identity is gone is
    /// dropped and treated as unauthenticated.
    async fn resolve_principal(
        &self,
        token: Option<&SessionToken>,
    ) -> CoreResult<Option<Principal>> {
        let Some(token) = token else {
            return Ok(None);
        };
        let Some(session) = self.sessions.resolve(token).await? else {
            return Ok(None);
        };
        match self.identities.get(session.user_id).await? {
            Some(identity) => Ok(Some(identity.to_principal())),
            None => {
                self.sessions.invalidate(token).await?;
                Ok(None)
            }
        }
    }

    /// Resolve and authorize in one step. Public actions tolerate an
    /// absent principal; everything else fails closed.
    pub(crate) async fn authorize(
        &self,
        token: Option<&SessionToken>,
        action: Action,
    ) -> CoreResult<Option<Principal>> {
        match self.resolve_principal(token).await? {
            Some(principal) => {
                if policy::is_allowed(principal.role, action) {
                    Ok(Some(principal))
                } else {
                    tracing::warn!(user_id = %principal.id, %action, "denied");
                    Err(CoreError::Forbidden)
                }
            }
            None if action.is_public() => Ok(None),
            None => Err(CoreError::Unauthenticated),
        }
    }

    async fn require_principal(&self, token: Option<&SessionToken>) -> CoreResult<Principal> {
        self.resolve_principal(token)
            .await?
            .ok_or(CoreError::Unauthenticated)
    }

    // ─────────────────────────────────────────────────────────────────
    // Account flows
    // ─────────────────────────────────────────────────────────────────

    /// Register a new account. Open to anyone; new accounts are STAFF.
    pub async fn register(&self, account: NewAccount) -> CoreResult<Principal> {
        let account = account.validate()?;
        self.insert_identity(account, Role::Staff).await
    }

    /// Ensure an ADMIN account exists for first deployment. Does
    /// nothing when the email is already registered.
    pub async fn bootstrap_admin(&self, account: NewAccount) -> CoreResult<()> {
        let account = account.validate()?;
        if self.identities.get_by_email(&account.email).await?.is_some() {
            return Ok(());
        }
        let principal = self.insert_identity(account, Role::Admin).await?;
        tracing::info!(user_id = %principal.id, "bootstrap admin created");
        Ok(())
    }

    async fn insert_identity(&self, account: NewAccount, role: Role) -> CoreResult<Principal> {
        let hash = auth::hash_password(&account.password)
            .map_err(|e| CoreError::storage(e.to_string()))?;
        let identity = Identity {
            id: UserId::new(),
            display_name: account.display_name,
            email: account.email,
            password_hash: hash,
            role,
            created_at: Utc::now(),
        };
        let principal = identity.to_principal();
        self.identities.insert(identity).await?;
        tracing::info!(user_id = %principal.id, "account registered");
        Ok(principal)
    }

    /// Verify a password credential and open a session.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller; a syntactically invalid email takes the same path as an
    /// unknown one.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> CoreResult<(Session, Principal)> {
        let identity = match normalize_email(email) {
            Ok(email) => self.identities.get_by_email(&email).await?,
            Err(_) => None,
        };

        let principal =
            auth::verify_credentials(identity.as_ref(), password).map_err(|e| match e {
                AuthError::InvalidCredentials => CoreError::Unauthenticated,
                AuthError::Password(e) => CoreError::storage(e.to_string()),
            })?;

        let session = self.sessions.create(principal.id).await?;
        Ok((session, principal))
    }

    /// Close a session. Idempotent.
    pub async fn sign_out(&self, token: &SessionToken) -> CoreResult<()> {
        self.sessions.invalidate(token).await
    }

    /// The principal behind a session, if any (e.g. for a whoami
    /// endpoint). Not an authorization check.
    pub async fn current_principal(
        &self,
        token: Option<&SessionToken>,
    ) -> CoreResult<Option<Principal>> {
        self.resolve_principal(token).await
    }

    // ─────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────

    /// Execute a mutation on behalf of the session holder.
    ///
    /// 1. resolve the principal — mutations are never public;
    /// 2. policy check against `request.action()` (lifecycle requests
    ///    defer this to the engine so that a no-op needs no permission);
    /// 3. delegate to the lifecycle engine or plain CRUD;
    /// 4. map store failures onto the shared taxonomy — nothing is
    ///    swallowed.
    pub async fn execute(
        &self,
        token: Option<&SessionToken>,
        request: MutationRequest,
    ) -> CoreResult<MutationOutcome> {
        let principal = self.require_principal(token).await?;

        // Lifecycle transitions get their own ordering: the engine
        // decides no-op before consulting the policy.
        if !matches!(request, MutationRequest::ChangeEquipmentStatus { .. }) {
            let action = request.action();
            if !policy::is_allowed(principal.role, action) {
                tracing::warn!(user_id = %principal.id, %action, "denied");
                return Err(CoreError::Forbidden);
            }
        }

        match request {
            MutationRequest::ChangeEquipmentStatus { id, status } => {
                self.change_equipment_status(&principal, id, status).await
            }
            MutationRequest::CreateEquipment(draft) => {
                let draft = draft.validate()?;
                let item = draft.into_item(EquipmentId::new(), Utc::now());
                self.equipment.insert(item.clone()).await?;
                tracing::info!(user_id = %principal.id, equipment_id = %item.id, "equipment created");
                Ok(MutationOutcome::Equipment(item))
            }
            MutationRequest::UpdateEquipment { id, draft } => {
                let draft = draft.validate()?;
                let stored = self.equipment.get(id).await?.ok_or(CoreError::NotFound)?;
                let updated = self
                    .equipment
                    .update(draft.apply_to(&stored, Utc::now()))
                    .await?;
                Ok(MutationOutcome::Equipment(updated))
            }
            MutationRequest::DeleteEquipment { id } => {
                self.equipment.delete(id).await?;
                tracing::info!(user_id = %principal.id, equipment_id = %id, "equipment deleted");
                Ok(MutationOutcome::Deleted)
            }
            MutationRequest::CreateSet(draft) => {
                let set = draft.validate()?.into_set(assetgate_core::SetId::new());
                self.sets.insert(set.clone()).await?;
                Ok(MutationOutcome::Set(set))
            }
            MutationRequest::UpdateSet { id, draft } => {
                let draft = draft.validate()?;
                let mut set = self.sets.get(id).await?.ok_or(CoreError::NotFound)?;
                set.name = draft.name;
                set.location = draft.location;
                let set = self.sets.update(set).await?;
                Ok(MutationOutcome::Set(set))
            }
            MutationRequest::DeleteSet { id } => {
                self.sets.delete(id).await?;
                Ok(MutationOutcome::Deleted)
            }
            MutationRequest::ChangeUserRole { user_id, role } => {
                // Identity comparison, not role: even an ADMIN cannot
                // touch their own role and lock themselves out.
                if user_id == principal.id {
                    tracing::warn!(user_id = %principal.id, "self role change refused");
                    return Err(CoreError::Forbidden);
                }
                let identity = self.identities.update_role(user_id, role).await?;
                tracing::info!(user_id = %user_id, role = %role, changed_by = %principal.id, "role changed");
                Ok(MutationOutcome::User(identity.to_principal()))
            }
            MutationRequest::DeleteUser { user_id } => {
                if user_id == principal.id {
                    tracing::warn!(user_id = %principal.id, "self account deletion refused");
                    return Err(CoreError::Forbidden);
                }
                self.identities.delete(user_id).await?;
                tracing::info!(user_id = %user_id, deleted_by = %principal.id, "account deleted");
                Ok(MutationOutcome::Deleted)
            }
        }
    }

    /// A status change: plan with the lifecycle engine, then apply via
    /// the store's compare-and-set so a concurrent transition surfaces
    /// as a conflict instead of being clobbered. The audit entry rides
    /// in the same atomic step.
    async fn change_equipment_status(
        &self,
        principal: &Principal,
        id: EquipmentId,
        requested: assetgate_equipment::EquipmentStatus,
    ) -> CoreResult<MutationOutcome> {
        let stored = self.equipment.get(id).await?.ok_or(CoreError::NotFound)?;

        match lifecycle::plan_transition(&stored, requested, Some(principal.role)) {
            Ok(TransitionPlan::NoOp) => Ok(MutationOutcome::Equipment(stored)),
            Ok(TransitionPlan::Apply { from, to }) => {
                let entry = StatusAuditEntry::record(id, from, to, principal.id, Utc::now());
                let updated = self.equipment.transition_status(id, entry).await?;
                tracing::info!(
                    user_id = %principal.id,
                    equipment_id = %id,
                    from = %from,
                    to = %to,
                    "status transition"
                );
                Ok(MutationOutcome::Equipment(updated))
            }
            Err(e) => {
                tracing::warn!(user_id = %principal.id, equipment_id = %id, "transition denied");
                Err(e)
            }
        }
    }

    pub(crate) fn equipment_store(&self) -> &Arc<dyn EquipmentStore> {
        &self.equipment
    }

    pub(crate) fn set_store(&self) -> &Arc<dyn SetStore> {
        &self.sets
    }

    pub(crate) fn identity_store(&self) -> &Arc<dyn IdentityStore> {
        &self.identities
    }
}
