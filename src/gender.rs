use crate::error::Result;
use crate::grouping::{group_and_count, GroupField, KeyValue};
use crate::record::{Record, Sex};
use crate::relative::{round_percent, shares, to_relative, RelativeCounts};

/// Female/male split of one Olympic year.
#[derive(Debug, Clone, PartialEq)]
pub struct GenderShare {
    pub year: i32,
    pub female: u64,
    pub male: u64,
    pub female_pct: Option<f64>,
    pub male_pct: Option<f64>,
}

/// Per-year participation split by sex, in year order. Records without a
/// recognised sex are left out.
pub fn gender_share_by_year(records: &[&Record]) -> Vec<GenderShare> {
    let grouped = group_and_count(records, &[GroupField::Year, GroupField::Sex]);

    let mut out: Vec<GenderShare> = Vec::new();
    for row in grouped.rows() {
        let (KeyValue::Year(year), KeyValue::Sex(sex)) = (&row.key[0], &row.key[1]) else {
            continue;
        };
        if out.last().map(|s| s.year) != Some(*year) {
            out.push(GenderShare {
                year: *year,
                female: 0,
                male: 0,
                female_pct: None,
                male_pct: None,
            });
        }
        if let Some(share) = out.last_mut() {
            match sex {
                Sex::Female => share.female += row.count,
                Sex::Male => share.male += row.count,
            }
        }
    }

    for share in &mut out {
        if let Some(pct) = shares(&[share.female as f64, share.male as f64]) {
            share.female_pct = Some(round_percent(pct[0]));
            share.male_pct = Some(round_percent(pct[1]));
        }
    }
    out
}

/// Sex split within each event.
pub fn event_gender_share(records: &[&Record]) -> Result<RelativeCounts> {
    let grouped = group_and_count(records, &[GroupField::Event, GroupField::Sex]);
    to_relative(&grouped, GroupField::Event.column_name())
}
