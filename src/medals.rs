use ahash::AHashMap;

use crate::record::{Medal, Record};

/// Athletes shown in the hall of fame by default.
pub const HALL_OF_FAME_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedalTally {
    pub name: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalTally {
    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }

    pub fn count(&self, medal: Medal) -> u32 {
        match medal {
            Medal::Gold => self.gold,
            Medal::Silver => self.silver,
            Medal::Bronze => self.bronze,
            Medal::NoMedal => 0,
        }
    }
}

/// The `n` athletes with most medals, most decorated first. Equal totals
/// are ordered by gold, then silver, then name.
pub fn top_medalists(records: &[&Record], n: usize) -> Vec<MedalTally> {
    let mut tallies: AHashMap<&str, MedalTally> = AHashMap::new();
    for record in records.iter().filter(|r| r.medal.is_podium()) {
        let tally = tallies.entry(record.name.as_str()).or_insert_with(|| MedalTally {
            name: record.name.clone(),
            gold: 0,
            silver: 0,
            bronze: 0,
        });
        match record.medal {
            Medal::Gold => tally.gold += 1,
            Medal::Silver => tally.silver += 1,
            Medal::Bronze => tally.bronze += 1,
            Medal::NoMedal => {}
        }
    }

    let mut ranked: Vec<MedalTally> = tallies.into_values().collect();
    ranked.sort_by(|a, b| {
        b.total()
            .cmp(&a.total())
            .then_with(|| b.gold.cmp(&a.gold))
            .then_with(|| b.silver.cmp(&a.silver))
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::athlete;
    use crate::record::Sex;

    #[test]
    fn ranks_by_total_then_colour_then_name() {
        let records = vec![
            athlete("Phelps", Sex::Male, "USA", 2004, Medal::Gold),
            athlete("Phelps", Sex::Male, "USA", 2008, Medal::Gold),
            athlete("Phelps", Sex::Male, "USA", 2004, Medal::Bronze),
            athlete("Latynina", Sex::Female, "URS", 1956, Medal::Gold),
            athlete("Latynina", Sex::Female, "URS", 1960, Medal::Silver),
            athlete("Andrianov", Sex::Male, "URS", 1976, Medal::Gold),
            athlete("Andrianov", Sex::Male, "URS", 1980, Medal::Silver),
            athlete("Nobody", Sex::Male, "FRA", 2000, Medal::NoMedal),
        ];
        let view: Vec<&Record> = records.iter().collect();
        let top = top_medalists(&view, HALL_OF_FAME_SIZE);

        let names: Vec<&str> = top.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Phelps", "Andrianov", "Latynina"]);
        assert_eq!(top[0].total(), 3);
        assert_eq!(top[0].count(Medal::Bronze), 1);

        assert_eq!(top_medalists(&view, 1).len(), 1);
    }
}
