use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ExplorerError, Result};
use crate::filter::FilterCriteria;
use crate::record::{normalize_event, Medal, Record, RegionLookup, Sex};

#[derive(Debug, Deserialize)]
struct RawAthlete {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Sex", alias = "Gender", default)]
    sex: Option<String>,
    #[serde(rename = "Age", default)]
    age: Option<String>,
    #[serde(rename = "NOC")]
    noc: String,
    #[serde(rename = "Sport")]
    sport: String,
    #[serde(rename = "Event")]
    event: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Medal", default)]
    medal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRegion {
    #[serde(rename = "NOC")]
    noc: String,
    #[serde(rename = "region", alias = "Region", default)]
    region: Option<String>,
}

/// Ages come as integers, integral floats (`23.0`) or `NA`.
fn parse_age_field(raw: Option<&str>) -> Option<u32> {
    let value: f64 = raw?.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64)
        .then_some(value as u32)
}

impl RawAthlete {
    fn into_record(self, regions: &RegionLookup) -> Record {
        let region = regions.name_for(&self.noc).map(str::to_string);
        Record {
            sex: self.sex.as_deref().and_then(|s| s.parse::<Sex>().ok()),
            age: parse_age_field(self.age.as_deref()),
            event: normalize_event(&self.sport, &self.event),
            medal: self.medal.as_deref().map_or(Medal::NoMedal, Medal::parse_lenient),
            region,
            name: self.name,
            noc: self.noc,
            sport: self.sport,
            year: self.year,
        }
    }
}

/// Immutable in-memory athlete table, loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct sports, sorted, for the discipline picker.
    pub fn disciplines(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.sport.as_str()).collect();
        set.into_iter().collect()
    }

    /// Distinct NOC codes, sorted, for the country picker.
    pub fn countries(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.noc.as_str()).collect();
        set.into_iter().collect()
    }

    /// Discipline and country selections in `criteria` that name a value
    /// absent from the table, as `(filter, value)` pairs.
    pub fn unknown_filter_values<'c>(&self, criteria: &'c FilterCriteria) -> Vec<(&'static str, &'c str)> {
        let mut unknown = Vec::new();
        if let Some(sport) = criteria.discipline.selected() {
            if self.disciplines().binary_search(&sport.as_str()).is_err() {
                unknown.push(("discipline", sport.as_str()));
            }
        }
        if let Some(noc) = criteria.country.selected() {
            if self.countries().binary_search(&noc.as_str()).is_err() {
                unknown.push(("country", noc.as_str()));
            }
        }
        unknown
    }

    pub fn load(athletes: &Path, regions: Option<&Path>) -> Result<Self> {
        let lookup = match regions {
            Some(path) => load_regions(path)?,
            None => RegionLookup::new(),
        };
        let records = load_athletes(athletes, &lookup)?;
        Ok(Dataset::new(records))
    }
}

fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    let file = std::fs::File::open(path).map_err(|source| ExplorerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::Reader::from_reader(file))
}

pub fn load_regions(path: &Path) -> Result<RegionLookup> {
    let lookup = read_regions(open_csv(path)?, path)?;
    info!(path = %path.display(), regions = lookup.len(), "loaded region names");
    Ok(lookup)
}

pub fn read_regions<R: io::Read>(mut reader: csv::Reader<R>, origin: &Path) -> Result<RegionLookup> {
    let mut lookup = RegionLookup::new();
    for row in reader.deserialize::<RawRegion>() {
        let row = row.map_err(|source| ExplorerError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;
        if let Some(region) = row.region.filter(|r| !r.trim().is_empty()) {
            lookup.insert(row.noc, region);
        }
    }
    Ok(lookup)
}

pub fn load_athletes(path: &Path, regions: &RegionLookup) -> Result<Vec<Record>> {
    let records = read_athletes(open_csv(path)?, path, regions)?;
    info!(path = %path.display(), records = records.len(), "loaded athlete records");
    Ok(records)
}

pub fn read_athletes<R: io::Read>(
    mut reader: csv::Reader<R>,
    origin: &Path,
    regions: &RegionLookup,
) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for row in reader.deserialize::<RawAthlete>() {
        let raw = row.map_err(|source| ExplorerError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;
        records.push(raw.into_record(regions));
    }

    if !regions.is_empty() {
        let unmatched: BTreeSet<&str> = records
            .iter()
            .filter(|r| r.region.is_none())
            .map(|r| r.noc.as_str())
            .collect();
        if !unmatched.is_empty() {
            warn!(
                codes = unmatched.len(),
                "country codes without a region name; they are left out of region views"
            );
            debug!(?unmatched, "unmatched country codes");
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ATHLETES: &str = "\
Name,Sex,Age,NOC,Sport,Event,Year,Medal
Ana,F,23.0,FRA,Athletics,Athletics Women's 100 metres,1996,Gold
Ben,M,NA,USA,Swimming,Swimming Men's 200 metres,2000,NA
Cy,X,,ZZZ,Judo,Judo Men's Lightweight,2000,
";

    const REGIONS: &str = "\
NOC,region,notes
FRA,France,
USA,USA,
";

    fn reader(text: &str) -> csv::Reader<&[u8]> {
        csv::Reader::from_reader(text.as_bytes())
    }

    #[test]
    fn loads_and_normalises_rows() {
        let origin = Path::new("inline.csv");
        let regions = read_regions(reader(REGIONS), origin).unwrap();
        let records = read_athletes(reader(ATHLETES), origin, &regions).unwrap();

        assert_eq!(records.len(), 3);

        let ana = &records[0];
        assert_eq!(ana.sex, Some(Sex::Female));
        assert_eq!(ana.age, Some(23));
        assert_eq!(ana.event, "Women's 100m");
        assert_eq!(ana.region.as_deref(), Some("France"));
        assert_eq!(ana.medal, Medal::Gold);

        let ben = &records[1];
        assert_eq!(ben.age, None);
        assert_eq!(ben.medal, Medal::NoMedal);
        assert_eq!(ben.event, "Men's 200m");

        let cy = &records[2];
        assert_eq!(cy.sex, None);
        assert_eq!(cy.region, None);
        assert_eq!(cy.country_label(), "ZZZ");
    }

    #[test]
    fn gender_column_is_accepted() {
        let text = "Name,Gender,Age,NOC,Sport,Event,Year,Medal\nAna,Female,20,FRA,Judo,Judo x,2000,Silver\n";
        let records = read_athletes(reader(text), Path::new("g.csv"), &RegionLookup::new()).unwrap();
        assert_eq!(records[0].sex, Some(Sex::Female));
    }

    #[test]
    fn malformed_year_is_a_csv_error() {
        let text = "Name,Sex,Age,NOC,Sport,Event,Year,Medal\nAna,F,20,FRA,Judo,x,soon,Gold\n";
        let err = read_athletes(reader(text), Path::new("bad.csv"), &RegionLookup::new()).unwrap_err();
        assert!(matches!(err, ExplorerError::Csv { .. }));
    }

    #[test]
    fn age_field_parsing() {
        assert_eq!(parse_age_field(Some("23")), Some(23));
        assert_eq!(parse_age_field(Some(" 31.0 ")), Some(31));
        assert_eq!(parse_age_field(Some("23.5")), None);
        assert_eq!(parse_age_field(Some("-1")), None);
        assert_eq!(parse_age_field(Some("NA")), None);
        assert_eq!(parse_age_field(None), None);
    }

    #[test]
    fn picker_lists_are_sorted_and_distinct() {
        let origin = Path::new("inline.csv");
        let records = read_athletes(reader(ATHLETES), origin, &RegionLookup::new()).unwrap();
        let dataset = Dataset::new(records);
        assert_eq!(dataset.disciplines(), vec!["Athletics", "Judo", "Swimming"]);
        assert_eq!(dataset.countries(), vec!["FRA", "USA", "ZZZ"]);
    }

    #[test]
    fn names_selections_missing_from_the_table() {
        let origin = Path::new("inline.csv");
        let dataset = Dataset::new(read_athletes(reader(ATHLETES), origin, &RegionLookup::new()).unwrap());

        let known = FilterCriteria::new(Sex::Male).discipline("Judo").country("USA");
        assert!(dataset.unknown_filter_values(&known).is_empty());

        let typo = FilterCriteria::new(Sex::Male).discipline("Judoo").country("XXX");
        assert_eq!(
            dataset.unknown_filter_values(&typo),
            vec![("discipline", "Judoo"), ("country", "XXX")]
        );
    }
}
