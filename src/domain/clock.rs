use std::fmt::Debug;

use chrono::{NaiveDate, Utc};

/// 現在日付の取得元
pub trait Clock: Debug + Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// 常に同じ日付を返す時計
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(NaiveDate);

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self(today)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_fixed_clock() {
        let today = NaiveDate::from_ymd_opt(2016, 2, 29).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(today));
        assert_eq!(clock.today(), today);
        assert_eq!(clock.today(), today);
    }
}
