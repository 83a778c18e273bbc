use std::{error::Error, sync::Arc};

use chrono::NaiveDate;
use superhotel::{
    domain::{
        clock::{Clock, SystemClock},
        hotel::{AccommodationManager, Guest, Room, RoomManager},
    },
    infrastructure::{
        self,
        hotel::{SqliteAccommodationManager, SqliteRoomManager},
    },
    SuperHotelConfig,
};
use sqlx::SqlitePool;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() {
    match SuperHotelConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .init();
            if let Err(error) = report(&config, Arc::new(SystemClock)).await {
                error!("Report failed: {}", error);
            }
        }
        Err(error) => {
            tracing_subscriber::fmt::init();
            error!("Configuration error: {}", error)
        }
    }
}

async fn report(config: &SuperHotelConfig, clock: Arc<dyn Clock>) -> Result<(), Box<dyn Error>> {
    let pool = infrastructure::connect(&config.database).await?;
    infrastructure::create_tables(&pool).await?;
    for line in report_on(pool, clock).await? {
        info!("{}", line);
    }
    Ok(())
}

/// 全宿泊の JSON と、客室ごとの本日の利用状況
async fn report_on(
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
) -> Result<Vec<String>, Box<dyn Error>> {
    let rooms = SqliteRoomManager::new(pool.clone(), clock.clone());
    let accommodations = SqliteAccommodationManager::new(pool, clock.clone());

    let stays = accommodations.find_all_accommodations().await?;
    let mut lines = vec![format!("{} accommodations stored", stays.len())];
    for stay in &stays {
        lines.push(serde_json::to_string(stay)?);
    }

    let today = clock.today();
    for room in rooms.find_all_rooms().await? {
        let guest = accommodations.find_guest_by_room(&room).await?;
        lines.push(occupancy(&room, guest.as_ref(), today));
    }
    Ok(lines)
}

fn occupancy(room: &Room, guest: Option<&Guest>, today: NaiveDate) -> String {
    match guest {
        Some(guest) => format!(
            "{} ({}/night, {} beds): {} on {}",
            room.name(),
            room.price(),
            room.capacity(),
            guest.name(),
            today
        ),
        None => format!(
            "{} ({}/night, {} beds): free on {}",
            room.name(),
            room.price(),
            room.capacity(),
            today
        ),
    }
}

#[cfg(test)]
mod tests {
    use superhotel::domain::{
        clock::FixedClock,
        hotel::{Accommodation, Currency, GuestManager, Money},
    };
    use superhotel::infrastructure::hotel::SqliteGuestManager;
    use superhotel::Database;

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
    fn test_occupancy() {
        let john = Guest::builder().name("john").build();
        assert_eq!(
            occupancy(&economy(), Some(&john), today()),
            "Economy (200.00 Kč/night, 3 beds): john on 2016-02-29"
        );
        assert_eq!(
            occupancy(&economy(), None, today()),
            "Economy (200.00 Kč/night, 3 beds): free on 2016-02-29"
        );
    }

    #[tokio::test]
    async fn test_report_on_empty_database() {
        let pool = infrastructure::connect(&Database::in_memory()).await.unwrap();
        infrastructure::create_tables(&pool).await.unwrap();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(today()));

        assert_eq!(
            report_on(pool, clock).await.unwrap(),
            vec!["0 accommodations stored".to_owned()]
        );
    }

    #[tokio::test]
    async fn test_report_on_seeded_database() {
        let pool = infrastructure::connect(&Database::in_memory()).await.unwrap();
        infrastructure::create_tables(&pool).await.unwrap();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(today()));
        let guests = SqliteGuestManager::new(pool.clone(), clock.clone());
        let rooms = SqliteRoomManager::new(pool.clone(), clock.clone());
        let accommodations = SqliteAccommodationManager::new(pool.clone(), clock.clone());

        let mut john = Guest::builder()
            .name("john")
            .address("Manesova 120, Brno")
            .birthday(NaiveDate::from_ymd_opt(1996, 11, 23).unwrap())
            .credit_card("1234")
            .build();
        let mut economy = economy();
        let mut luxury = Room::builder()
            .name("Luxury")
            .price(Money::new(40000, Currency::CZK))
            .capacity(2)
            .build();
        guests.create_guest(&mut john).await.unwrap();
        rooms.create_room(&mut economy).await.unwrap();
        rooms.create_room(&mut luxury).await.unwrap();
        let mut stay = Accommodation::builder()
            .guest(Some(john))
            .room(Some(economy))
            .date_from(NaiveDate::from_ymd_opt(2016, 2, 28).unwrap())
            .date_to(NaiveDate::from_ymd_opt(2016, 3, 1).unwrap())
            .total_price(Money::new(20000, Currency::CZK))
            .build();
        accommodations.create_accommodation(&mut stay).await.unwrap();

        let lines = report_on(pool, clock).await.unwrap();
        assert_eq!(
            lines,
            vec![
                "1 accommodations stored".to_owned(),
                serde_json::to_string(&stay).unwrap(),
                "Economy (200.00 Kč/night, 3 beds): john on 2016-02-29".to_owned(),
                "Luxury (400.00 Kč/night, 2 beds): free on 2016-02-29".to_owned(),
            ]
        );
        assert!(lines[1].contains("\"date_from\":\"2016-02-28\""));
    }
}
