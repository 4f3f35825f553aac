use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" | "Male" | "male" => Ok(Sex::Male),
            "F" | "Female" | "female" => Ok(Sex::Female),
            other => Err(format!("unknown sex `{other}`")),
        }
    }
}

/// Medal outcome of a single participation. Ordered best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
    NoMedal,
}

impl Medal {
    pub const ALL: [Medal; 4] = [Medal::Gold, Medal::Silver, Medal::Bronze, Medal::NoMedal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Medal::Gold => "Gold",
            Medal::Silver => "Silver",
            Medal::Bronze => "Bronze",
            Medal::NoMedal => "No Medal",
        }
    }

    pub fn is_podium(&self) -> bool {
        !matches!(self, Medal::NoMedal)
    }

    /// Lenient parse used by the loader: anything that is not a podium
    /// finish (`NA`, blank, `No medal`) counts as no medal.
    pub fn parse_lenient(s: &str) -> Medal {
        match s.trim() {
            "Gold" => Medal::Gold,
            "Silver" => Medal::Silver,
            "Bronze" => Medal::Bronze,
            _ => Medal::NoMedal,
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One athlete participation. Records are never mutated once loaded;
/// every view derives new tables from borrowed records.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub sex: Option<Sex>,
    pub age: Option<u32>,
    pub noc: String,
    pub region: Option<String>,
    pub sport: String,
    pub event: String,
    pub year: i32,
    pub medal: Medal,
}

impl Record {
    /// Display name for the record's country, falling back to the NOC code.
    pub fn country_label(&self) -> &str {
        self.region.as_deref().unwrap_or(&self.noc)
    }
}

// ─────────────────────────────────────────────────────────────
//  Event names
// ─────────────────────────────────────────────────────────────

/// Shortens an event title for display.
///
/// `Athletics Men's 100 metres` under sport `Athletics` becomes `Men's 100m`:
/// a leading `Athletics` token goes first, then a trailing `metres`
/// collapses to `m`, then the sport-name prefix is stripped.
pub fn normalize_event(sport: &str, event: &str) -> String {
    let mut out = event
        .strip_prefix("Athletics")
        .map(str::trim_start)
        .unwrap_or(event)
        .to_string();

    if let Some(head) = out.strip_suffix("metres") {
        out = format!("{}m", head.trim_end());
    }

    if !sport.is_empty() {
        if let Some(rest) = out.strip_prefix(sport) {
            out = rest.trim_start().to_string();
        }
    }

    out
}

// ─────────────────────────────────────────────────────────────
//  Country names
// ─────────────────────────────────────────────────────────────

/// NOC code → region display name.
#[derive(Debug, Clone, Default)]
pub struct RegionLookup {
    names: AHashMap<String, String>,
}

impl RegionLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, noc: impl Into<String>, region: impl Into<String>) {
        self.names.insert(noc.into(), region.into());
    }

    pub fn name_for(&self, noc: &str) -> Option<&str> {
        self.names.get(noc).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RegionLookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut lookup = RegionLookup::new();
        for (noc, region) in iter {
            lookup.insert(noc, region);
        }
        lookup
    }
}
