use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::domain::clock::Clock;
use crate::domain::hotel::{
    Accommodation, AccommodationError, AccommodationId, AccommodationManager, Guest, Room,
};
use crate::domain::{
    ensure_new, ensure_persisted, DataAccessError, Entity, InvalidEntityError, ManagerError,
    ManagerResult,
};

use super::{capacity, money};

/// 宿泊に宿泊客と客室を結合した SELECT 文。末尾に `$tail` を連結する
macro_rules! select_accommodation {
    ($($tail:literal),+) => {
        concat!(
            "SELECT a.id, a.date_from, a.date_to, a.total_price_amount, a.total_price_currency, ",
            "g.id AS guest_id, g.name AS guest_name, g.address AS guest_address, ",
            "g.birthday AS guest_birthday, g.credit_card AS guest_credit_card, ",
            "r.id AS room_id, r.name AS room_name, r.price_amount AS room_price_amount, ",
            "r.price_currency AS room_price_currency, r.capacity AS room_capacity ",
            "FROM accommodation a ",
            "JOIN guest g ON g.id = a.guest_id ",
            "JOIN room r ON r.id = a.room_id ",
            $($tail),+
        )
    };
}

/// `$column` で絞り込んだ、本日を期間に含む (両端を含む) 宿泊。
/// 複数ある場合は開始日が最も遅いもの、次にIDが最も大きいものを返す
macro_rules! select_current_stay {
    ($column:literal) => {
        select_accommodation!(
            "WHERE a.",
            $column,
            " = ? AND a.date_from <= ? AND a.date_to >= ? ",
            "ORDER BY a.date_from DESC, a.id DESC LIMIT 1"
        )
    };
}

#[derive(Clone, Debug)]
pub struct SqliteAccommodationManager {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteAccommodationManager {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    async fn current_stay(
        &self,
        query: &'static str,
        id: i64,
    ) -> Result<Option<Accommodation>, DataAccessError> {
        let today = self.clock.today();
        sqlx::query_as::<_, AccommodationRow>(query)
            .bind(id)
            .bind(today)
            .bind(today)
            .fetch_optional(&self.pool)
            .await?
            .map(Accommodation::try_from)
            .transpose()
    }
}

#[derive(sqlx::FromRow)]
struct AccommodationRow {
    id: i64,
    date_from: NaiveDate,
    date_to: NaiveDate,
    total_price_amount: i64,
    total_price_currency: String,
    guest_id: i64,
    guest_name: String,
    guest_address: String,
    guest_birthday: NaiveDate,
    guest_credit_card: String,
    room_id: i64,
    room_name: String,
    room_price_amount: i64,
    room_price_currency: String,
    room_capacity: i64,
}

impl TryFrom<AccommodationRow> for Accommodation {
    type Error = DataAccessError;

    fn try_from(row: AccommodationRow) -> Result<Self, Self::Error> {
        let guest = Guest::builder()
            .id(row.guest_id.into())
            .name(row.guest_name)
            .address(row.guest_address)
            .birthday(row.guest_birthday)
            .credit_card(row.guest_credit_card)
            .build();
        let room = Room::builder()
            .id(row.room_id.into())
            .name(row.room_name)
            .price(money(row.room_price_amount, &row.room_price_currency)?)
            .capacity(capacity(row.room_capacity)?)
            .build();
        Ok(Accommodation::builder()
            .id(row.id.into())
            .guest(Some(guest))
            .room(Some(room))
            .date_from(row.date_from)
            .date_to(row.date_to)
            .total_price(money(row.total_price_amount, &row.total_price_currency)?)
            .build())
    }
}

#[async_trait]
impl AccommodationManager for SqliteAccommodationManager {
    async fn create_accommodation(
        &self,
        accommodation: &mut Accommodation,
    ) -> ManagerResult<(), AccommodationError> {
        accommodation
            .validate_references()
            .map_err(ManagerError::Validation)?;
        ensure_new(&*accommodation)?;
        accommodation
            .validate(self.clock.today())
            .map_err(ManagerError::Validation)?;
        let (guest_id, room_id) = accommodation
            .reference_ids()
            .map_err(ManagerError::Validation)?;
        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO accommodation (guest_id, room_id, date_from, date_to, total_price_amount, total_price_currency) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(*guest_id)
        .bind(*room_id)
        .bind(accommodation.date_from())
        .bind(accommodation.date_to())
        .bind(accommodation.total_price().amount())
        .bind(accommodation.total_price().currency().code())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        accommodation.set_id(Some(id.into()));
        debug!(
            "Created accommodation {} of guest {} in room {}",
            id, guest_id, room_id
        );
        Ok(())
    }

    async fn update_accommodation(
        &self,
        accommodation: &Accommodation,
    ) -> ManagerResult<(), AccommodationError> {
        let id = ensure_persisted(accommodation)?;
        accommodation
            .validate(self.clock.today())
            .map_err(ManagerError::Validation)?;
        let (guest_id, room_id) = accommodation
            .reference_ids()
            .map_err(ManagerError::Validation)?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE accommodation SET guest_id = ?, room_id = ?, date_from = ?, date_to = ?, total_price_amount = ?, total_price_currency = ? WHERE id = ?",
        )
        .bind(*guest_id)
        .bind(*room_id)
        .bind(accommodation.date_from())
        .bind(accommodation.date_to())
        .bind(accommodation.total_price().amount())
        .bind(accommodation.total_price().currency().code())
        .bind(*id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() != 1 {
            warn!("Accommodation {} to update does not exist", id);
            return Err(InvalidEntityError::not_found::<Accommodation>(id).into());
        }
        tx.commit().await?;
        debug!("Updated accommodation {}", id);
        Ok(())
    }

    async fn delete_accommodation(
        &self,
        accommodation: &Accommodation,
    ) -> ManagerResult<(), AccommodationError> {
        let id = ensure_persisted(accommodation)?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM accommodation WHERE id = ?")
            .bind(*id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() != 1 {
            warn!("Accommodation {} to delete does not exist", id);
            return Err(InvalidEntityError::not_found::<Accommodation>(id).into());
        }
        tx.commit().await?;
        debug!("Deleted accommodation {}", id);
        Ok(())
    }

    async fn find_accommodation_by_id(
        &self,
        id: AccommodationId,
    ) -> Result<Option<Accommodation>, DataAccessError> {
        sqlx::query_as::<_, AccommodationRow>(select_accommodation!("WHERE a.id = ?"))
            .bind(*id)
            .fetch_optional(&self.pool)
            .await?
            .map(Accommodation::try_from)
            .transpose()
    }

    async fn find_all_accommodations(&self) -> Result<Vec<Accommodation>, DataAccessError> {
        sqlx::query_as::<_, AccommodationRow>(select_accommodation!("ORDER BY a.id"))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Accommodation::try_from)
            .collect()
    }

    async fn find_room_by_guest(&self, guest: &Guest) -> Result<Option<Room>, DataAccessError> {
        let Some(guest_id) = guest.id() else {
            return Ok(None);
        };
        let current = self
            .current_stay(select_current_stay!("guest_id"), *guest_id)
            .await?;
        Ok(current.and_then(|a| a.room().cloned()))
    }

    async fn find_guest_by_room(&self, room: &Room) -> Result<Option<Guest>, DataAccessError> {
        let Some(room_id) = room.id() else {
            return Ok(None);
        };
        let current = self
            .current_stay(select_current_stay!("room_id"), *room_id)
            .await?;
        Ok(current.and_then(|a| a.guest().cloned()))
    }
}
