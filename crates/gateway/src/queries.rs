//! Read queries, gated by the same policy as mutations.

use serde::Serialize;

use assetgate_auth::{Action, Principal};
use assetgate_core::{CoreError, CoreResult, EquipmentId};
use assetgate_equipment::set::UNKNOWN_SET_NAME;
use assetgate_equipment::{EquipmentItem, EquipmentSet, EquipmentStatus, StatusAuditEntry};
use assetgate_sessions::SessionToken;

use crate::MutationGateway;

/// Per-status equipment counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: u64,
    pub usable: u64,
    pub broken: u64,
    pub lost: u64,
}

/// An item together with its resolved set name. A dangling `set_id`
/// resolves to [`UNKNOWN_SET_NAME`] rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentDetail {
    #[serde(flatten)]
    pub item: EquipmentItem,
    pub set_name: Option<String>,
}

/// A set with its member items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetOverview {
    #[serde(flatten)]
    pub set: EquipmentSet,
    pub items: Vec<EquipmentItem>,
}

impl MutationGateway {
    /// All equipment, most recent purchase first.
    pub async fn list_equipment(
        &self,
        token: Option<&SessionToken>,
    ) -> CoreResult<Vec<EquipmentItem>> {
        self.authorize(token, Action::ViewEquipment).await?;
        Ok(self.equipment_store().list().await?)
    }

    /// One item with its resolved set name.
    pub async fn get_equipment(
        &self,
        token: Option<&SessionToken>,
        id: EquipmentId,
    ) -> CoreResult<EquipmentDetail> {
        self.authorize(token, Action::ViewEquipment).await?;
        self.detail(id).await
    }

    /// The public QR-scan read: one item by id, no session required,
    /// and nothing beyond that single item.
    pub async fn scan_lookup(&self, id: EquipmentId) -> CoreResult<EquipmentDetail> {
        self.authorize(None, Action::ScanLookup).await?;
        self.detail(id).await
    }

    async fn detail(&self, id: EquipmentId) -> CoreResult<EquipmentDetail> {
        let item = self
            .equipment_store()
            .get(id)
            .await?
            .ok_or(CoreError::NotFound)?;
        let set_name = match item.set_id {
            None => None,
            Some(set_id) => Some(
                self.set_store()
                    .get(set_id)
                    .await?
                    .map(|s| s.name)
                    .unwrap_or_else(|| UNKNOWN_SET_NAME.to_string()),
            ),
        };
        Ok(EquipmentDetail { item, set_name })
    }

    /// The lifecycle history of one item, oldest entry first.
    pub async fn equipment_history(
        &self,
        token: Option<&SessionToken>,
        id: EquipmentId,
    ) -> CoreResult<Vec<StatusAuditEntry>> {
        self.authorize(token, Action::ViewEquipment).await?;
        if self.equipment_store().get(id).await?.is_none() {
            return Err(CoreError::NotFound);
        }
        Ok(self.equipment_store().history(id).await?)
    }

    /// All sets with their members, by set name.
    pub async fn set_overview(
        &self,
        token: Option<&SessionToken>,
    ) -> CoreResult<Vec<SetOverview>> {
        self.authorize(token, Action::ViewEquipment).await?;
        let sets = self.set_store().list().await?;
        let items = self.equipment_store().list().await?;
        Ok(sets
            .into_iter()
            .map(|set| {
                let members = items
                    .iter()
                    .filter(|i| i.set_id == Some(set.id))
                    .cloned()
                    .collect();
                SetOverview { set, items: members }
            })
            .collect())
    }

    /// All registered accounts, newest first.
    pub async fn list_users(&self, token: Option<&SessionToken>) -> CoreResult<Vec<Principal>> {
        self.authorize(token, Action::ManageUsers).await?;
        let identities = self.identity_store().list().await?;
        Ok(identities.iter().map(|i| i.to_principal()).collect())
    }

    /// Equipment counts per status.
    pub async fn dashboard_stats(
        &self,
        token: Option<&SessionToken>,
    ) -> CoreResult<DashboardStats> {
        self.authorize(token, Action::ViewReports).await?;
        let store = self.equipment_store();
        let usable = store.count_by_status(EquipmentStatus::Usable).await?;
        let broken = store.count_by_status(EquipmentStatus::Broken).await?;
        let lost = store.count_by_status(EquipmentStatus::Lost).await?;
        Ok(DashboardStats {
            total: usable + broken + lost,
            usable,
            broken,
            lost,
        })
    }

    /// The most recently purchased items, for the dashboard.
    pub async fn recent_equipment(
        &self,
        token: Option<&SessionToken>,
        limit: usize,
    ) -> CoreResult<Vec<EquipmentItem>> {
        self.authorize(token, Action::ViewReports).await?;
        let mut items = self.equipment_store().list().await?;
        items.truncate(limit);
        Ok(items)
    }
}
