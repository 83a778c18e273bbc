mod accommodation;
mod guest;
mod money;
mod room;

pub use self::accommodation::*;
pub use self::guest::*;
pub use self::money::*;
pub use self::room::*;
