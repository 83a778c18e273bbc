pub mod clock;
pub mod hotel;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    error::Error,
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
};
use thiserror::Error;

pub trait Id:
    Copy
    + Eq
    + Deref<Target = Self::Inner>
    + From<Self::Inner>
    + Display
    + Debug
    + Serialize
    + for<'de> Deserialize<'de>
{
    type Inner: FromStr;
}

/// 永続化されるエンティティ。IDは登録時にストアが採番し、それまでは `None`
pub trait Entity: Debug + Clone + PartialEq {
    type Id: Id;
    type Error: Error + 'static;

    const ENTITY_NAME: &'static str;

    fn id(&self) -> Option<Self::Id>;
    fn set_id(&mut self, id: Option<Self::Id>);
    /// 項目の検証。`today` はマネージャーの時計から与えられる
    fn validate(&self, today: NaiveDate) -> Result<(), Self::Error>;

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}

/// 登録前のエンティティにIDが無いことを確認する
pub fn ensure_new<E: Entity>(entity: &E) -> Result<(), InvalidEntityError> {
    match entity.id() {
        Some(id) => Err(InvalidEntityError::IdAlreadySet {
            entity: E::ENTITY_NAME,
            id: id.to_string(),
        }),
        None => Ok(()),
    }
}

/// 更新・削除対象のIDを取得する
pub fn ensure_persisted<E: Entity>(entity: &E) -> Result<E::Id, InvalidEntityError> {
    entity.id().ok_or(InvalidEntityError::IdMissing {
        entity: E::ENTITY_NAME,
    })
}

#[derive(Error, Debug)]
pub enum DataAccessError {
    #[error("Database connection error: {0}")]
    ConnectionError(Box<dyn Error + Send + Sync>),
    #[error("Database query error: {0}")]
    QueryError(Box<dyn Error + Send + Sync>),
    #[error("Data read error: {0}")]
    ReadError(Box<dyn Error + Send + Sync>),
    #[error("Data write error: {0}")]
    WriteError(Box<dyn Error + Send + Sync>),
    #[error("Client side error: {0}")]
    ClientSideError(Box<dyn Error + Send + Sync>),
}

/// 更新操作の前提条件エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidEntityError {
    #[error("{entity} already has id {id}")]
    IdAlreadySet { entity: &'static str, id: String },
    #[error("{entity} has no id")]
    IdMissing { entity: &'static str },
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: String },
}

impl InvalidEntityError {
    pub fn not_found<E: Entity>(id: E::Id) -> Self {
        Self::NotFound {
            entity: E::ENTITY_NAME,
            id: id.to_string(),
        }
    }
}

/// マネージャー操作のエラー。`E` はエンティティの検証エラー
#[derive(Error, Debug)]
pub enum ManagerError<E>
where
    E: Error + 'static,
{
    #[error("Validation error: {0}")]
    Validation(#[source] E),
    #[error("Invalid entity: {0}")]
    InvalidEntity(#[from] InvalidEntityError),
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}

pub type ManagerResult<T, E> = Result<T, ManagerError<E>>;
