use ahash::AHashMap;

use crate::grouping::{GroupedCounts, KeyValue};
use crate::record::Record;
use crate::relative::round_percent;

/// A record together with its position in the athlete's career.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Participation<'a> {
    pub record: &'a Record,
    /// 1-based rank among the athlete's records, by year.
    pub ordinal: u32,
}

/// Numbers each athlete's records 1..k by year. Records in the same year
/// keep their input order. The output is aligned with `records`.
pub fn compute_participation_order<'a>(records: &[&'a Record]) -> Vec<Participation<'a>> {
    let mut by_name: AHashMap<&str, Vec<usize>> = AHashMap::new();
    for (i, record) in records.iter().enumerate() {
        by_name.entry(record.name.as_str()).or_default().push(i);
    }

    let mut ordinals = vec![0u32; records.len()];
    for indices in by_name.values_mut() {
        // stable: equal years keep their input order
        indices.sort_by_key(|&i| records[i].year);
        for (rank, &i) in indices.iter().enumerate() {
            ordinals[i] = rank as u32 + 1;
        }
    }

    records
        .iter()
        .zip(ordinals)
        .map(|(&record, ordinal)| Participation { record, ordinal })
        .collect()
}

fn max_ordinals<'a>(order: &[Participation<'a>]) -> AHashMap<&'a str, u32> {
    let mut max: AHashMap<&str, u32> = AHashMap::new();
    for p in order {
        let slot = max.entry(p.record.name.as_str()).or_default();
        *slot = (*slot).max(p.ordinal);
    }
    max
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipationMedalRate {
    pub participation: u32,
    /// Athletes with at least `participation` appearances.
    pub athletes_reaching: u64,
    /// Athletes whose `participation`-th appearance won a medal.
    pub medalists: u64,
    pub percentage: Option<f64>,
}

/// Share of athletes winning a medal on exactly their N-th participation,
/// out of those who got to N participations at all.
pub fn medal_rate_by_participation(records: &[&Record]) -> Vec<ParticipationMedalRate> {
    let order = compute_participation_order(records);
    let max = max_ordinals(&order);
    let deepest = max.values().copied().max().unwrap_or(0);

    let mut medalists = vec![0u64; deepest as usize + 1];
    for p in &order {
        if p.record.medal.is_podium() {
            medalists[p.ordinal as usize] += 1;
        }
    }

    (1..=deepest)
        .map(|n| {
            let athletes_reaching = max.values().filter(|&&m| m >= n).count() as u64;
            let medalists = medalists[n as usize];
            let percentage = (athletes_reaching > 0)
                .then(|| round_percent(100.0 * medalists as f64 / athletes_reaching as f64));
            ParticipationMedalRate {
                participation: n,
                athletes_reaching,
                medalists,
                percentage,
            }
        })
        .collect()
}

/// Counts per `(Participation, Medal)`.
pub fn participation_medal_counts(records: &[&Record]) -> GroupedCounts {
    let order = compute_participation_order(records);
    GroupedCounts::from_keys(
        vec!["Participation", "Medal"],
        order
            .iter()
            .map(|p| vec![KeyValue::Ordinal(p.ordinal), KeyValue::Medal(p.record.medal)]),
    )
}

/// How many athletes won their first medal on participation 1, 2, ...
/// Athletes who never medalled are not counted.
pub fn first_medal_participation(records: &[&Record]) -> GroupedCounts {
    let order = compute_participation_order(records);
    let mut first: AHashMap<&str, u32> = AHashMap::new();
    for p in order.iter().filter(|p| p.record.medal.is_podium()) {
        let slot = first.entry(p.record.name.as_str()).or_insert(p.ordinal);
        *slot = (*slot).min(p.ordinal);
    }

    GroupedCounts::from_keys(
        vec!["First Medal Participation"],
        first.into_values().map(|n| vec![KeyValue::Ordinal(n)]),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareerSpan {
    pub name: String,
    pub first_year: i32,
    pub last_year: i32,
    pub participations: u32,
    pub medals: u32,
}

impl CareerSpan {
    pub fn span_years(&self) -> i32 {
        self.last_year - self.first_year
    }
}

/// Per-athlete career summary, longest careers first (ties by name).
pub fn career_spans(records: &[&Record]) -> Vec<CareerSpan> {
    let mut spans: AHashMap<&str, CareerSpan> = AHashMap::new();
    for record in records {
        let span = spans.entry(record.name.as_str()).or_insert_with(|| CareerSpan {
            name: record.name.clone(),
            first_year: record.year,
            last_year: record.year,
            participations: 0,
            medals: 0,
        });
        span.first_year = span.first_year.min(record.year);
        span.last_year = span.last_year.max(record.year);
        span.participations += 1;
        if record.medal.is_podium() {
            span.medals += 1;
        }
    }

    let mut out: Vec<CareerSpan> = spans.into_values().collect();
    out.sort_by(|a, b| {
        b.span_years()
            .cmp(&a.span_years())
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}
