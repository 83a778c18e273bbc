use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::domain::clock::Clock;
use crate::domain::hotel::{Guest, GuestError, GuestId, GuestManager};
use crate::domain::{
    ensure_new, ensure_persisted, DataAccessError, Entity, InvalidEntityError, ManagerError,
    ManagerResult,
};

#[derive(Clone, Debug)]
pub struct SqliteGuestManager {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteGuestManager {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[derive(sqlx::FromRow)]
struct GuestRow {
    id: i64,
    name: String,
    address: String,
    birthday: NaiveDate,
    credit_card: String,
}

impl From<GuestRow> for Guest {
    fn from(row: GuestRow) -> Self {
        Guest::builder()
            .id(row.id.into())
            .name(row.name)
            .address(row.address)
            .birthday(row.birthday)
            .credit_card(row.credit_card)
            .build()
    }
}

#[async_trait]
impl GuestManager for SqliteGuestManager {
    async fn create_guest(&self, guest: &mut Guest) -> ManagerResult<(), GuestError> {
        ensure_new(&*guest)?;
        guest
            .validate(self.clock.today())
            .map_err(ManagerError::Validation)?;
        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO guest (name, address, birthday, credit_card) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(guest.name())
        .bind(guest.address())
        .bind(guest.birthday())
        .bind(guest.credit_card())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        guest.set_id(Some(id.into()));
        debug!("Created guest {}", id);
        Ok(())
    }

    async fn update_guest(&self, guest: &Guest) -> ManagerResult<(), GuestError> {
        let id = ensure_persisted(guest)?;
        guest
            .validate(self.clock.today())
            .map_err(ManagerError::Validation)?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE guest SET name = ?, address = ?, birthday = ?, credit_card = ? WHERE id = ?",
        )
        .bind(guest.name())
        .bind(guest.address())
        .bind(guest.birthday())
        .bind(guest.credit_card())
        .bind(*id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() != 1 {
            warn!("Guest {} to update does not exist", id);
            return Err(InvalidEntityError::not_found::<Guest>(id).into());
        }
        tx.commit().await?;
        debug!("Updated guest {}", id);
        Ok(())
    }

    async fn delete_guest(&self, guest: &Guest) -> ManagerResult<(), GuestError> {
        let id = ensure_persisted(guest)?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM guest WHERE id = ?")
            .bind(*id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() != 1 {
            warn!("Guest {} to delete does not exist", id);
            return Err(InvalidEntityError::not_found::<Guest>(id).into());
        }
        tx.commit().await?;
        debug!("Deleted guest {}", id);
        Ok(())
    }

    async fn find_guest_by_id(&self, id: GuestId) -> Result<Option<Guest>, DataAccessError> {
        let row = sqlx::query_as::<_, GuestRow>(
            "SELECT id, name, address, birthday, credit_card FROM guest WHERE id = ?",
        )
        .bind(*id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Guest::from))
    }

    async fn find_all_guests(&self) -> Result<Vec<Guest>, DataAccessError> {
        let rows = sqlx::query_as::<_, GuestRow>(
            "SELECT id, name, address, birthday, credit_card FROM guest ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Guest::from).collect())
    }
}
