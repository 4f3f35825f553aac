use thiserror::Error;

use crate::record::{Record, Sex};

/// Single-choice filter that can also mean "no constraint".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn selected(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v),
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selection::All, Selection::Only)
    }
}

/// What a dashboard session asked to see. All set fields must match
/// exactly; unset fields impose nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub sex: Selection<Sex>,
    pub discipline: Selection<String>,
    pub country: Selection<String>,
    pub age: Option<u32>,
    pub event: Option<String>,
    pub year: Option<i32>,
}

impl FilterCriteria {
    /// The dashboard always asks for a sex, so it is the one mandatory field.
    pub fn new(sex: Sex) -> Self {
        FilterCriteria {
            sex: Selection::Only(sex),
            discipline: Selection::All,
            country: Selection::All,
            age: None,
            event: None,
            year: None,
        }
    }

    pub fn discipline(mut self, sport: impl Into<String>) -> Self {
        self.discipline = Selection::Only(sport.into());
        self
    }

    pub fn country(mut self, noc: impl Into<String>) -> Self {
        self.country = Selection::Only(noc.into());
        self
    }

    pub fn age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Same criteria with the sex constraint lifted (gender comparisons).
    pub fn across_sexes(&self) -> Self {
        FilterCriteria {
            sex: Selection::All,
            ..self.clone()
        }
    }

    /// Same criteria with the country constraint lifted (country rankings).
    pub fn across_countries(&self) -> Self {
        FilterCriteria {
            country: Selection::All,
            ..self.clone()
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        let sex_ok = match (&self.sex, record.sex) {
            (Selection::All, _) => true,
            (Selection::Only(wanted), Some(sex)) => *wanted == sex,
            (Selection::Only(_), None) => false,
        };

        sex_ok
            && self.discipline.admits(&record.sport)
            && self.country.admits(&record.noc)
            && self.age.map_or(true, |age| record.age == Some(age))
            && self.event.as_ref().map_or(true, |event| *event == record.event)
            && self.year.map_or(true, |year| record.year == year)
    }
}

/// Records matching every constraint of `criteria`, in input order.
/// Borrows the input; nothing is copied or changed.
pub fn filter_records<'a>(records: &'a [Record], criteria: &FilterCriteria) -> Vec<&'a Record> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgeInputError {
    #[error("Please enter a valid age.")]
    NotNumeric,
    #[error("Age must be between 0 and 99.")]
    OutOfRange,
}

pub const MAX_AGE_INPUT: u32 = 99;

/// Validates the free-text age field. Blank input means "any age".
pub fn parse_age_input(input: &str) -> Result<Option<u32>, AgeInputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(AgeInputError::NotNumeric);
    }
    match input.parse::<u32>() {
        Ok(age) if age <= MAX_AGE_INPUT => Ok(Some(age)),
        _ => Err(AgeInputError::OutOfRange),
    }
}
