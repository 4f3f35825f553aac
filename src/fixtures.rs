//! Record builders shared by the unit tests.

use crate::record::{Medal, Record, Sex};

pub(crate) fn athlete(name: &str, sex: Sex, noc: &str, year: i32, medal: Medal) -> Record {
    Record {
        name: name.to_string(),
        sex: Some(sex),
        age: None,
        noc: noc.to_string(),
        region: None,
        sport: "Athletics".to_string(),
        event: "Men's 100m".to_string(),
        year,
        medal,
    }
}

impl Record {
    pub(crate) fn aged(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub(crate) fn in_sport(mut self, sport: &str) -> Self {
        self.sport = sport.to_string();
        self
    }

    pub(crate) fn in_event(mut self, event: &str) -> Self {
        self.event = event.to_string();
        self
    }

    pub(crate) fn from_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub(crate) fn without_sex(mut self) -> Self {
        self.sex = None;
        self
    }
}
