mod accommodation;
mod guest;
mod room;

use crate::domain::{
    hotel::{Currency, Money},
    DataAccessError,
};

pub use self::accommodation::*;
pub use self::guest::*;
pub use self::room::*;

fn money(amount: i64, currency: &str) -> Result<Money, DataAccessError> {
    Ok(Money::new(amount, currency.parse::<Currency>()?))
}

fn capacity(value: i64) -> Result<u32, DataAccessError> {
    u32::try_from(value).map_err(|e| DataAccessError::ReadError(Box::new(e)))
}
