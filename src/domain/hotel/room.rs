use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::{Deref, Display, Error, From};
use serde::{Deserialize, Serialize};

use crate::domain::{DataAccessError, Entity, Id, ManagerResult};

use super::Money;

/// 客室マネージャー
#[async_trait]
pub trait RoomManager {
    /// 客室を登録し、IDを採番する
    async fn create_room(&self, room: &mut Room) -> ManagerResult<(), RoomError>;
    /// 客室の全項目を更新する
    async fn update_room(&self, room: &Room) -> ManagerResult<(), RoomError>;
    /// 客室を削除する
    async fn delete_room(&self, room: &Room) -> ManagerResult<(), RoomError>;
    /// IDで客室を検索する
    async fn find_room_by_id(&self, id: RoomId) -> Result<Option<Room>, DataAccessError>;
    /// 全客室を登録順に取得する
    async fn find_all_rooms(&self) -> Result<Vec<Room>, DataAccessError>;
}

/// 客室ID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct RoomId(i64);

impl Id for RoomId {
    type Inner = i64;
}

/// 客室エンティティ
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: Option<RoomId>,
    name: String,
    price: Money,
    capacity: u32,
}

impl Room {
    pub fn builder() -> RoomBuilder {
        RoomBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 一泊あたりの料金
    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_price(&mut self, price: Money) {
        self.price = price;
    }

    pub fn set_capacity(&mut self, capacity: u32) {
        self.capacity = capacity;
    }
}

impl Entity for Room {
    type Id = RoomId;
    type Error = RoomError;

    const ENTITY_NAME: &'static str = "room";

    fn id(&self) -> Option<Self::Id> {
        self.id
    }

    fn set_id(&mut self, id: Option<Self::Id>) {
        self.id = id;
    }

    fn validate(&self, _today: NaiveDate) -> Result<(), Self::Error> {
        if self.name.trim().is_empty() {
            return Err(RoomError::NameIsBlank);
        }
        if self.price.is_negative() {
            return Err(RoomError::NegativePrice);
        }
        if self.capacity < 1 {
            return Err(RoomError::InvalidCapacity);
        }
        Ok(())
    }
}

/// 客室ビルダー
#[derive(Clone, Debug, Default)]
pub struct RoomBuilder {
    id: Option<RoomId>,
    name: Option<String>,
    price: Option<Money>,
    capacity: Option<u32>,
}

impl RoomBuilder {
    pub fn id(mut self, id: RoomId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Room {
        Room {
            id: self.id,
            name: self.name.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            capacity: self.capacity.unwrap_or_default(),
        }
    }
}

/// 客室エラー
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// 名前が空欄です
    #[display(fmt = "Name cannot be blank")]
    NameIsBlank,
    /// 料金が負の値です
    #[display(fmt = "Price cannot be negative")]
    NegativePrice,
    /// 定員は1名以上です
    #[display(fmt = "Capacity must be at least one")]
    InvalidCapacity,
}

#[cfg(test)]
mod tests {
    use crate::domain::hotel::Currency;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 2, 29).unwrap()
    }

    fn economy() -> Room {
        Room::builder()
            .name("Economy")
            .price(Money::new(20000, Currency::CZK))
            .capacity(3)
            .build()
    }

    #[test]
    fn test_room_builder() {
        let room = economy();
        assert_eq!(room.id(), None);
        assert_eq!(room.name(), "Economy");
        assert_eq!(room.price(), &Money::new(20000, Currency::CZK));
        assert_eq!(room.capacity(), 3);
        assert_eq!(room.validate(today()), Ok(()));
    }

    #[test]
    fn test_room_validate() {
        let mut room = economy();
        room.set_name("");
        assert_eq!(room.validate(today()), Err(RoomError::NameIsBlank));

        let mut room = economy();
        room.set_price(Money::new(-1, Currency::CZK));
        assert_eq!(room.validate(today()), Err(RoomError::NegativePrice));

        let mut room = economy();
        room.set_capacity(0);
        assert_eq!(room.validate(today()), Err(RoomError::InvalidCapacity));
    }

    #[test]
    fn test_room_free_of_charge_is_valid() {
        let mut room = economy();
        room.set_price(Money::new(0, Currency::EUR));
        assert_eq!(room.validate(today()), Ok(()));
    }
}
