use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::{Deref, Display, Error, From};
use serde::{Deserialize, Serialize};

use crate::domain::{DataAccessError, Entity, Id, ManagerResult};

use super::{Guest, GuestId, Money, Room, RoomId};

/// 宿泊マネージャー
#[async_trait]
pub trait AccommodationManager {
    /// 宿泊を登録し、IDを採番する
    async fn create_accommodation(
        &self,
        accommodation: &mut Accommodation,
    ) -> ManagerResult<(), AccommodationError>;
    /// 宿泊の全項目を更新する
    async fn update_accommodation(
        &self,
        accommodation: &Accommodation,
    ) -> ManagerResult<(), AccommodationError>;
    /// 宿泊を削除する
    async fn delete_accommodation(
        &self,
        accommodation: &Accommodation,
    ) -> ManagerResult<(), AccommodationError>;
    /// IDで宿泊を検索する
    async fn find_accommodation_by_id(
        &self,
        id: AccommodationId,
    ) -> Result<Option<Accommodation>, DataAccessError>;
    /// 全宿泊を登録順に取得する
    async fn find_all_accommodations(&self) -> Result<Vec<Accommodation>, DataAccessError>;
    /// 宿泊客が現在滞在している客室を検索する
    async fn find_room_by_guest(&self, guest: &Guest) -> Result<Option<Room>, DataAccessError>;
    /// 客室に現在滞在している宿泊客を検索する
    async fn find_guest_by_room(&self, room: &Room) -> Result<Option<Guest>, DataAccessError>;
}

/// 宿泊ID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct AccommodationId(i64);

impl Id for AccommodationId {
    type Inner = i64;
}

/// 宿泊エンティティ
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accommodation {
    id: Option<AccommodationId>,
    guest: Option<Guest>,
    room: Option<Room>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    total_price: Money,
}

impl Accommodation {
    pub fn builder() -> AccommodationBuilder {
        AccommodationBuilder::default()
    }

    pub fn guest(&self) -> Option<&Guest> {
        self.guest.as_ref()
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    pub fn total_price(&self) -> &Money {
        &self.total_price
    }

    pub fn set_guest(&mut self, guest: Option<Guest>) {
        self.guest = guest;
    }

    pub fn set_room(&mut self, room: Option<Room>) {
        self.room = room;
    }

    pub fn set_date_from(&mut self, date_from: NaiveDate) {
        self.date_from = Some(date_from);
    }

    pub fn set_date_to(&mut self, date_to: NaiveDate) {
        self.date_to = Some(date_to);
    }

    pub fn set_total_price(&mut self, total_price: Money) {
        self.total_price = total_price;
    }

    /// 宿泊客と客室の指定を確認する。他の検証より先に行う
    pub fn validate_references(&self) -> Result<(), AccommodationError> {
        if self.guest.is_none() {
            return Err(AccommodationError::GuestRequired);
        }
        if self.room.is_none() {
            return Err(AccommodationError::RoomRequired);
        }
        Ok(())
    }

    /// 参照する登録済みの宿泊客IDと客室ID
    pub fn reference_ids(&self) -> Result<(GuestId, RoomId), AccommodationError> {
        let guest = self.guest.as_ref().ok_or(AccommodationError::GuestRequired)?;
        let room = self.room.as_ref().ok_or(AccommodationError::RoomRequired)?;
        let guest_id = guest.id().ok_or(AccommodationError::GuestNotPersisted)?;
        let room_id = room.id().ok_or(AccommodationError::RoomNotPersisted)?;
        Ok((guest_id, room_id))
    }

    fn validate_dates(
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<(), AccommodationError> {
        let from = date_from.ok_or(AccommodationError::DateFromRequired)?;
        let to = date_to.ok_or(AccommodationError::DateToRequired)?;
        if from > to {
            return Err(AccommodationError::InvalidDateRange { from, to });
        }
        Ok(())
    }
}

impl Entity for Accommodation {
    type Id = AccommodationId;
    type Error = AccommodationError;

    const ENTITY_NAME: &'static str = "accommodation";

    fn id(&self) -> Option<Self::Id> {
        self.id
    }

    fn set_id(&mut self, id: Option<Self::Id>) {
        self.id = id;
    }

    fn validate(&self, _today: NaiveDate) -> Result<(), Self::Error> {
        self.reference_ids()?;
        Self::validate_dates(self.date_from, self.date_to)?;
        if self.total_price.is_negative() {
            return Err(AccommodationError::NegativeTotalPrice);
        }
        Ok(())
    }
}

/// 宿泊ビルダー
#[derive(Clone, Debug, Default)]
pub struct AccommodationBuilder {
    id: Option<AccommodationId>,
    guest: Option<Guest>,
    room: Option<Room>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    total_price: Option<Money>,
}

impl AccommodationBuilder {
    pub fn id(mut self, id: AccommodationId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn guest(mut self, guest: Option<Guest>) -> Self {
        self.guest = guest;
        self
    }

    pub fn room(mut self, room: Option<Room>) -> Self {
        self.room = room;
        self
    }

    pub fn date_from(mut self, date_from: NaiveDate) -> Self {
        self.date_from = Some(date_from);
        self
    }

    pub fn date_to(mut self, date_to: NaiveDate) -> Self {
        self.date_to = Some(date_to);
        self
    }

    pub fn total_price(mut self, total_price: Money) -> Self {
        self.total_price = Some(total_price);
        self
    }

    pub fn build(self) -> Accommodation {
        Accommodation {
            id: self.id,
            guest: self.guest,
            room: self.room,
            date_from: self.date_from,
            date_to: self.date_to,
            total_price: self.total_price.unwrap_or_default(),
        }
    }
}

/// 宿泊エラー
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum AccommodationError {
    /// 宿泊客が指定されていません
    #[display(fmt = "Guest is not specified")]
    GuestRequired,
    /// 客室が指定されていません
    #[display(fmt = "Room is not specified")]
    RoomRequired,
    /// 宿泊客が未登録です
    #[display(fmt = "Guest has not been stored yet")]
    GuestNotPersisted,
    /// 客室が未登録です
    #[display(fmt = "Room has not been stored yet")]
    RoomNotPersisted,
    /// 開始日が指定されていません
    #[display(fmt = "Start date is not specified")]
    DateFromRequired,
    /// 終了日が指定されていません
    #[display(fmt = "End date is not specified")]
    DateToRequired,
    /// 開始日が終了日より後です
    #[display(fmt = "Start date {} is after end date {}", from, to)]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
    /// 合計金額が負の値です
    #[display(fmt = "Total price cannot be negative")]
    NegativeTotalPrice,
}
