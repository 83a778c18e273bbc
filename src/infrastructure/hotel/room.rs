use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::domain::clock::Clock;
use crate::domain::hotel::{Room, RoomError, RoomId, RoomManager};
use crate::domain::{
    ensure_new, ensure_persisted, DataAccessError, Entity, InvalidEntityError, ManagerError,
    ManagerResult,
};

use super::{capacity, money};

#[derive(Clone, Debug)]
pub struct SqliteRoomManager {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteRoomManager {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: i64,
    name: String,
    price_amount: i64,
    price_currency: String,
    capacity: i64,
}

impl TryFrom<RoomRow> for Room {
    type Error = DataAccessError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        Ok(Room::builder()
            .id(row.id.into())
            .name(row.name)
            .price(money(row.price_amount, &row.price_currency)?)
            .capacity(capacity(row.capacity)?)
            .build())
    }
}

#[async_trait]
impl RoomManager for SqliteRoomManager {
    async fn create_room(&self, room: &mut Room) -> ManagerResult<(), RoomError> {
        ensure_new(&*room)?;
        room.validate(self.clock.today())
            .map_err(ManagerError::Validation)?;
        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO room (name, price_amount, price_currency, capacity) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(room.name())
        .bind(room.price().amount())
        .bind(room.price().currency().code())
        .bind(i64::from(room.capacity()))
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        room.set_id(Some(id.into()));
        debug!("Created room {}", id);
        Ok(())
    }

    async fn update_room(&self, room: &Room) -> ManagerResult<(), RoomError> {
        let id = ensure_persisted(room)?;
        room.validate(self.clock.today())
            .map_err(ManagerError::Validation)?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE room SET name = ?, price_amount = ?, price_currency = ?, capacity = ? WHERE id = ?",
        )
        .bind(room.name())
        .bind(room.price().amount())
        .bind(room.price().currency().code())
        .bind(i64::from(room.capacity()))
        .bind(*id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() != 1 {
            warn!("Room {} to update does not exist", id);
            return Err(InvalidEntityError::not_found::<Room>(id).into());
        }
        tx.commit().await?;
        debug!("Updated room {}", id);
        Ok(())
    }

    async fn delete_room(&self, room: &Room) -> ManagerResult<(), RoomError> {
        let id = ensure_persisted(room)?;
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM room WHERE id = ?")
            .bind(*id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() != 1 {
            warn!("Room {} to delete does not exist", id);
            return Err(InvalidEntityError::not_found::<Room>(id).into());
        }
        tx.commit().await?;
        debug!("Deleted room {}", id);
        Ok(())
    }

    async fn find_room_by_id(&self, id: RoomId) -> Result<Option<Room>, DataAccessError> {
        sqlx::query_as::<_, RoomRow>(
            "SELECT id, name, price_amount, price_currency, capacity FROM room WHERE id = ?",
        )
        .bind(*id)
        .fetch_optional(&self.pool)
        .await?
        .map(Room::try_from)
        .transpose()
    }

    async fn find_all_rooms(&self) -> Result<Vec<Room>, DataAccessError> {
        sqlx::query_as::<_, RoomRow>(
            "SELECT id, name, price_amount, price_currency, capacity FROM room ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Room::try_from)
        .collect()
    }
}
