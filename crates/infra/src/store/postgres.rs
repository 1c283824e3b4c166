//! Postgres-backed stores (feature `postgres`).
//!
//! Same contracts as the in-memory stores; the compare-and-set status
//! transition and its audit insert run inside one transaction, so a
//! lost race rolls back cleanly with no orphaned audit entry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use assetgate_auth::{Identity, Role};
use assetgate_core::{AuditEntryId, EquipmentId, SetId, UserId};
use assetgate_equipment::{EquipmentItem, EquipmentSet, EquipmentStatus, StatusAuditEntry};

use super::{EquipmentStore, IdentityStore, SetStore, StoreError};

/// Schema expected by these stores; applied by deployment tooling.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS identities (
    id UUID PRIMARY KEY,
    display_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS equipment (
    id UUID PRIMARY KEY,
    asset_tag TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    model TEXT NOT NULL,
    status TEXT NOT NULL,
    location TEXT NOT NULL,
    purchase_date TIMESTAMPTZ NOT NULL,
    notes TEXT,
    set_id UUID,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS equipment_sets (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    location TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS equipment_status_audit (
    id UUID PRIMARY KEY,
    equipment_id UUID NOT NULL,
    from_status TEXT NOT NULL,
    to_status TEXT NOT NULL,
    changed_by UUID NOT NULL,
    occurred_at TIMESTAMPTZ NOT NULL
);
"#;

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn corrupt_row(what: &str, value: &str) -> StoreError {
    StoreError::Backend(format!("corrupt row: bad {what} '{value}'"))
}

fn row_to_identity(row: &PgRow) -> Result<Identity, StoreError> {
    let role_raw: String = row.try_get("role").map_err(backend)?;
    let role: Role = role_raw
        .parse()
        .map_err(|_| corrupt_row("role", &role_raw))?;
    Ok(Identity {
        id: UserId::from_uuid(row.try_get::<Uuid, _>("id").map_err(backend)?),
        display_name: row.try_get("display_name").map_err(backend)?,
        email: row.try_get("email").map_err(backend)?,
        password_hash: row.try_get("password_hash").map_err(backend)?,
        role,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(backend)?,
    })
}

fn row_to_item(row: &PgRow) -> Result<EquipmentItem, StoreError> {
    let status_raw: String = row.try_get("status").map_err(backend)?;
    let status: EquipmentStatus = status_raw
        .parse()
        .map_err(|_| corrupt_row("status", &status_raw))?;
    Ok(EquipmentItem {
        id: EquipmentId::from_uuid(row.try_get::<Uuid, _>("id").map_err(backend)?),
        asset_tag: row.try_get("asset_tag").map_err(backend)?,
        name: row.try_get("name").map_err(backend)?,
        model: row.try_get("model").map_err(backend)?,
        status,
        location: row.try_get("location").map_err(backend)?,
        purchase_date: row.try_get("purchase_date").map_err(backend)?,
        notes: row.try_get("notes").map_err(backend)?,
        set_id: row
            .try_get::<Option<Uuid>, _>("set_id")
            .map_err(backend)?
            .map(SetId::from_uuid),
        created_at: row.try_get("created_at").map_err(backend)?,
        updated_at: row.try_get("updated_at").map_err(backend)?,
    })
}

fn row_to_set(row: &PgRow) -> Result<EquipmentSet, StoreError> {
    Ok(EquipmentSet {
        id: SetId::from_uuid(row.try_get::<Uuid, _>("id").map_err(backend)?),
        name: row.try_get("name").map_err(backend)?,
        location: row.try_get("location").map_err(backend)?,
    })
}

fn row_to_audit(row: &PgRow) -> Result<StatusAuditEntry, StoreError> {
    let from_raw: String = row.try_get("from_status").map_err(backend)?;
    let to_raw: String = row.try_get("to_status").map_err(backend)?;
    Ok(StatusAuditEntry {
        id: AuditEntryId::from_uuid(row.try_get::<Uuid, _>("id").map_err(backend)?),
        equipment_id: EquipmentId::from_uuid(row.try_get::<Uuid, _>("equipment_id").map_err(backend)?),
        from_status: from_raw.parse().map_err(|_| corrupt_row("from_status", &from_raw))?,
        to_status: to_raw.parse().map_err(|_| corrupt_row("to_status", &to_raw))?,
        changed_by: UserId::from_uuid(row.try_get::<Uuid, _>("changed_by").map_err(backend)?),
        occurred_at: row.try_get("occurred_at").map_err(backend)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Identities
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    async fn insert(&self, identity: Identity) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO identities (id, display_name, email, password_hash, role, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(identity.id.as_uuid())
        .bind(&identity.display_name)
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .bind(identity.role.as_str())
        .bind(identity.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict(format!(
                "email already registered: {}",
                identity.email
            ))),
            Err(e) => Err(backend(e)),
        }
    }

    async fn get(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query("SELECT * FROM identities WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(row_to_identity).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query("SELECT * FROM identities WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(row_to_identity).transpose()
    }

    async fn list(&self) -> Result<Vec<Identity>, StoreError> {
        let rows = sqlx::query("SELECT * FROM identities ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows.iter().map(row_to_identity).collect()
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<Identity, StoreError> {
        let row = sqlx::query("UPDATE identities SET role = $1 WHERE id = $2 RETURNING *")
            .bind(role.as_str())
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(row_to_identity).transpose()?.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM identities WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Equipment
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PostgresEquipmentStore {
    pool: PgPool,
}

impl PostgresEquipmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentStore for PostgresEquipmentStore {
    async fn insert(&self, item: EquipmentItem) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO equipment
             (id, asset_tag, name, model, status, location, purchase_date, notes, set_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(item.id.as_uuid())
        .bind(&item.asset_tag)
        .bind(&item.name)
        .bind(&item.model)
        .bind(item.status.as_str())
        .bind(&item.location)
        .bind(item.purchase_date)
        .bind(&item.notes)
        .bind(item.set_id.map(|s| *s.as_uuid()))
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict(format!(
                "asset tag already in use: {}",
                item.asset_tag
            ))),
            Err(e) => Err(backend(e)),
        }
    }

    async fn get(&self, id: EquipmentId) -> Result<Option<EquipmentItem>, StoreError> {
        let row = sqlx::query("SELECT * FROM equipment WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(row_to_item).transpose()
    }

    async fn list(&self) -> Result<Vec<EquipmentItem>, StoreError> {
        let rows = sqlx::query("SELECT * FROM equipment ORDER BY purchase_date DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows.iter().map(row_to_item).collect()
    }

    async fn count_by_status(&self, status: EquipmentStatus) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM equipment WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        let n: i64 = row.try_get("n").map_err(backend)?;
        Ok(n as u64)
    }

    async fn update(&self, item: EquipmentItem) -> Result<EquipmentItem, StoreError> {
        // Status is deliberately absent from the SET list.
        let row = sqlx::query(
            "UPDATE equipment
             SET asset_tag = $1, name = $2, model = $3, location = $4,
                 purchase_date = $5, notes = $6, set_id = $7, updated_at = $8
             WHERE id = $9
             RETURNING *",
        )
        .bind(&item.asset_tag)
        .bind(&item.name)
        .bind(&item.model)
        .bind(&item.location)
        .bind(item.purchase_date)
        .bind(&item.notes)
        .bind(item.set_id.map(|s| *s.as_uuid()))
        .bind(item.updated_at)
        .bind(item.id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.as_ref().map(row_to_item).transpose()?.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: EquipmentId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn transition_status(
        &self,
        id: EquipmentId,
        entry: StatusAuditEntry,
    ) -> Result<EquipmentItem, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let row = sqlx::query(
            "UPDATE equipment SET status = $1, updated_at = $2
             WHERE id = $3 AND status = $4
             RETURNING *",
        )
        .bind(entry.to_status.as_str())
        .bind(entry.occurred_at)
        .bind(id.as_uuid())
        .bind(entry.from_status.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(backend)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(backend)?;
            // Distinguish a missing record from a lost race.
            return match self.get(id).await? {
                None => Err(StoreError::NotFound),
                Some(current) => Err(StoreError::Conflict(format!(
                    "status changed concurrently: expected {}, found {}",
                    entry.from_status, current.status
                ))),
            };
        };
        let updated = row_to_item(&row)?;

        sqlx::query(
            "INSERT INTO equipment_status_audit
             (id, equipment_id, from_status, to_status, changed_by, occurred_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(entry.id.as_uuid())
        .bind(entry.equipment_id.as_uuid())
        .bind(entry.from_status.as_str())
        .bind(entry.to_status.as_str())
        .bind(entry.changed_by.as_uuid())
        .bind(entry.occurred_at)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(updated)
    }

    async fn history(&self, id: EquipmentId) -> Result<Vec<StatusAuditEntry>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM equipment_status_audit WHERE equipment_id = $1 ORDER BY occurred_at ASC",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.iter().map(row_to_audit).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sets
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PostgresSetStore {
    pool: PgPool,
}

impl PostgresSetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SetStore for PostgresSetStore {
    async fn insert(&self, set: EquipmentSet) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO equipment_sets (id, name, location) VALUES ($1, $2, $3)")
            .bind(set.id.as_uuid())
            .bind(&set.name)
            .bind(&set.location)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn get(&self, id: SetId) -> Result<Option<EquipmentSet>, StoreError> {
        let row = sqlx::query("SELECT * FROM equipment_sets WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(row_to_set).transpose()
    }

    async fn list(&self) -> Result<Vec<EquipmentSet>, StoreError> {
        let rows = sqlx::query("SELECT * FROM equipment_sets ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows.iter().map(row_to_set).collect()
    }

    async fn update(&self, set: EquipmentSet) -> Result<EquipmentSet, StoreError> {
        let row = sqlx::query(
            "UPDATE equipment_sets SET name = $1, location = $2 WHERE id = $3 RETURNING *",
        )
        .bind(&set.name)
        .bind(&set.location)
        .bind(set.id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.as_ref().map(row_to_set).transpose()?.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: SetId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM equipment_sets WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
