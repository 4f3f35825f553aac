//! Seeded synthetic athlete table, for demos and load testing without the
//! real CSV files.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::record::{Medal, Record, Sex};

const COUNTRIES: [(&str, &str); 8] = [
    ("USA", "USA"),
    ("GBR", "UK"),
    ("FRA", "France"),
    ("GER", "Germany"),
    ("CHN", "China"),
    ("JPN", "Japan"),
    ("KEN", "Kenya"),
    ("BRA", "Brazil"),
];

const SPORTS: [(&str, [&str; 2]); 4] = [
    ("Athletics", ["100m", "Marathon"]),
    ("Swimming", ["200m Freestyle", "100m Butterfly"]),
    ("Judo", ["Lightweight", "Heavyweight"]),
    ("Rowing", ["Single Sculls", "Coxless Pairs"]),
];

const FIRST_GAMES: i32 = 1960;
const LAST_GAMES: i32 = 2016;

/// `athletes` synthetic careers of one to four consecutive Games each.
/// The same seed always yields the same table.
pub fn synthetic_records(athletes: usize, seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(athletes * 2);

    for id in 0..athletes {
        let sex = if rng.random_bool(0.5) { Sex::Female } else { Sex::Male };
        let (noc, region) = COUNTRIES[rng.random_range(0..COUNTRIES.len())];
        let (sport, events) = SPORTS[rng.random_range(0..SPORTS.len())];
        let event = events[rng.random_range(0..events.len())];
        let division = match sex {
            Sex::Female => "Women's",
            Sex::Male => "Men's",
        };

        let games: i32 = rng.random_range(1..=4);
        let first = FIRST_GAMES + 4 * rng.random_range(0..=(LAST_GAMES - FIRST_GAMES) / 4);
        let first_age: u32 = rng.random_range(14..=34);
        // a small share of rows carry no age, as the historical data does
        let age_known = rng.random_bool(0.95);

        for g in 0..games {
            let year = first + 4 * g;
            if year > LAST_GAMES {
                break;
            }
            records.push(Record {
                name: format!("Athlete {id:05}"),
                sex: Some(sex),
                age: age_known.then_some(first_age + 4 * g as u32),
                noc: noc.to_string(),
                region: Some(region.to_string()),
                sport: sport.to_string(),
                event: format!("{division} {event}"),
                year,
                medal: random_medal(&mut rng),
            });
        }
    }

    records
}

fn random_medal(rng: &mut impl Rng) -> Medal {
    match rng.random_range(0..100) {
        0..=4 => Medal::Gold,
        5..=9 => Medal::Silver,
        10..=14 => Medal::Bronze,
        _ => Medal::NoMedal,
    }
}
