use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::{Deref, Display, Error, From};
use serde::{Deserialize, Serialize};

use crate::domain::{DataAccessError, Entity, Id, ManagerResult};

/// 宿泊客マネージャー
#[async_trait]
pub trait GuestManager {
    /// 宿泊客を登録し、IDを採番する
    async fn create_guest(&self, guest: &mut Guest) -> ManagerResult<(), GuestError>;
    /// 宿泊客の全項目を更新する
    async fn update_guest(&self, guest: &Guest) -> ManagerResult<(), GuestError>;
    /// 宿泊客を削除する
    async fn delete_guest(&self, guest: &Guest) -> ManagerResult<(), GuestError>;
    /// IDで宿泊客を検索する
    async fn find_guest_by_id(&self, id: GuestId) -> Result<Option<Guest>, DataAccessError>;
    /// 全宿泊客を登録順に取得する
    async fn find_all_guests(&self) -> Result<Vec<Guest>, DataAccessError>;
}

/// 宿泊客ID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct GuestId(i64);

impl Id for GuestId {
    type Inner = i64;
}

/// 宿泊客エンティティ
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    id: Option<GuestId>,
    name: String,
    address: String,
    birthday: Option<NaiveDate>,
    credit_card: String,
}

impl Guest {
    pub fn builder() -> GuestBuilder {
        GuestBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    pub fn credit_card(&self) -> &str {
        &self.credit_card
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    pub fn set_birthday(&mut self, birthday: Option<NaiveDate>) {
        self.birthday = birthday;
    }

    pub fn set_credit_card(&mut self, credit_card: impl Into<String>) {
        self.credit_card = credit_card.into();
    }

    fn validate_name(name: &str) -> Result<(), GuestError> {
        match name.trim().is_empty() {
            true => Err(GuestError::NameIsBlank),
            false => Ok(()),
        }
    }

    fn validate_address(address: &str) -> Result<(), GuestError> {
        match address.trim().is_empty() {
            true => Err(GuestError::AddressIsBlank),
            false => Ok(()),
        }
    }

    fn validate_birthday(birthday: Option<NaiveDate>, today: NaiveDate) -> Result<(), GuestError> {
        match birthday {
            None => Err(GuestError::BirthdayRequired),
            Some(birthday) if birthday > today => {
                Err(GuestError::BirthdayInFuture { birthday, today })
            }
            Some(_) => Ok(()),
        }
    }

    fn validate_credit_card(credit_card: &str) -> Result<(), GuestError> {
        if credit_card.is_empty() {
            return Err(GuestError::CreditCardRequired);
        }
        if !credit_card.chars().all(|c| c.is_ascii_digit()) {
            return Err(GuestError::CreditCardMalformed);
        }
        Ok(())
    }
}

impl Entity for Guest {
    type Id = GuestId;
    type Error = GuestError;

    const ENTITY_NAME: &'static str = "guest";

    fn id(&self) -> Option<Self::Id> {
        self.id
    }

    fn set_id(&mut self, id: Option<Self::Id>) {
        self.id = id;
    }

    fn validate(&self, today: NaiveDate) -> Result<(), Self::Error> {
        Self::validate_name(&self.name)?;
        Self::validate_address(&self.address)?;
        Self::validate_birthday(self.birthday, today)?;
        Self::validate_credit_card(&self.credit_card)?;
        Ok(())
    }
}

/// 宿泊客ビルダー
#[derive(Clone, Debug, Default)]
pub struct GuestBuilder {
    id: Option<GuestId>,
    name: Option<String>,
    address: Option<String>,
    birthday: Option<NaiveDate>,
    credit_card: Option<String>,
}

impl GuestBuilder {
    pub fn id(mut self, id: GuestId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    pub fn credit_card(mut self, credit_card: impl Into<String>) -> Self {
        self.credit_card = Some(credit_card.into());
        self
    }

    pub fn build(self) -> Guest {
        Guest {
            id: self.id,
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            birthday: self.birthday,
            credit_card: self.credit_card.unwrap_or_default(),
        }
    }
}

/// 宿泊客エラー
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum GuestError {
    /// 名前が空欄です
    #[display(fmt = "Name cannot be blank")]
    NameIsBlank,
    /// 住所が空欄です
    #[display(fmt = "Address cannot be blank")]
    AddressIsBlank,
    /// 誕生日が指定されていません
    #[display(fmt = "Birthday is not specified")]
    BirthdayRequired,
    /// 誕生日が未来の日付です
    #[display(fmt = "Birthday {} is after today ({})", birthday, today)]
    BirthdayInFuture { birthday: NaiveDate, today: NaiveDate },
    /// クレジットカード番号が指定されていません
    #[display(fmt = "Credit card number is not specified")]
    CreditCardRequired,
    /// クレジットカード番号は数字のみです
    #[display(fmt = "Credit card number must contain digits only")]
    CreditCardMalformed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 2, 29).unwrap()
    }

    fn john() -> Guest {
        Guest::builder()
            .name("john")
            .address("Manesova 120, Brno")
            .birthday(NaiveDate::from_ymd_opt(1996, 11, 23).unwrap())
            .credit_card("1234")
            .build()
    }

    #[test]
    fn test_guest_builder() {
        let guest = john();
        assert_eq!(guest.id(), None);
        assert_eq!(guest.name(), "john");
        assert_eq!(guest.address(), "Manesova 120, Brno");
        assert_eq!(guest.birthday(), NaiveDate::from_ymd_opt(1996, 11, 23));
        assert_eq!(guest.credit_card(), "1234");
        assert!(!guest.is_persisted());
        assert_eq!(guest.validate(today()), Ok(()));
    }

    #[test]
    fn test_guest_validate_blank_fields() {
        let mut guest = john();
        guest.set_name("  ");
        assert_eq!(guest.validate(today()), Err(GuestError::NameIsBlank));

        let mut guest = john();
        guest.set_address("");
        assert_eq!(guest.validate(today()), Err(GuestError::AddressIsBlank));
    }

    #[test]
    fn test_guest_validate_birthday() {
        let mut guest = john();
        guest.set_birthday(None);
        assert_eq!(guest.validate(today()), Err(GuestError::BirthdayRequired));

        let tomorrow = today().succ_opt().unwrap();
        guest.set_birthday(Some(tomorrow));
        assert_eq!(
            guest.validate(today()),
            Err(GuestError::BirthdayInFuture {
                birthday: tomorrow,
                today: today(),
            })
        );

        // born today is fine
        guest.set_birthday(Some(today()));
        assert_eq!(guest.validate(today()), Ok(()));
    }

    #[test]
    fn test_guest_validate_credit_card() {
        let mut guest = john();
        guest.set_credit_card("");
        assert_eq!(guest.validate(today()), Err(GuestError::CreditCardRequired));

        guest.set_credit_card("1234-5678");
        assert_eq!(guest.validate(today()), Err(GuestError::CreditCardMalformed));
    }

    #[test]
    fn test_guest_error_display() {
        let error = GuestError::BirthdayInFuture {
            birthday: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            today: today(),
        };
        assert_eq!(
            error.to_string(),
            "Birthday 2020-01-01 is after today (2016-02-29)"
        );
    }
}
