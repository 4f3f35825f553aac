use std::fmt;

use crate::grouping::{group_and_count, GroupField, GroupedCounts};
use crate::record::Record;

/// Bin edges, left-inclusive and right-exclusive.
pub const AGE_BINS: [u32; 9] = [10, 14, 17, 20, 23, 26, 30, 35, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeGroup {
    Age10To14,
    Age15To17,
    Age18To20,
    Age21To23,
    Age24To26,
    Age27To30,
    Age31To35,
    Age36Plus,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 8] = [
        AgeGroup::Age10To14,
        AgeGroup::Age15To17,
        AgeGroup::Age18To20,
        AgeGroup::Age21To23,
        AgeGroup::Age24To26,
        AgeGroup::Age27To30,
        AgeGroup::Age31To35,
        AgeGroup::Age36Plus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Age10To14 => "10-14",
            AgeGroup::Age15To17 => "15-17",
            AgeGroup::Age18To20 => "18-20",
            AgeGroup::Age21To23 => "21-23",
            AgeGroup::Age24To26 => "24-26",
            AgeGroup::Age27To30 => "27-30",
            AgeGroup::Age31To35 => "31-35",
            AgeGroup::Age36Plus => "36+",
        }
    }

    /// Y-axis position used when plotting the group. Fixed per label,
    /// never derived from the data.
    pub fn midpoint(&self) -> u32 {
        match self {
            AgeGroup::Age10To14 => 12,
            AgeGroup::Age15To17 => 16,
            AgeGroup::Age18To20 => 19,
            AgeGroup::Age21To23 => 22,
            AgeGroup::Age24To26 => 25,
            AgeGroup::Age27To30 => 28,
            AgeGroup::Age31To35 => 33,
            AgeGroup::Age36Plus => 40,
        }
    }

    /// Half-open `[low, high)` range covered by the group.
    pub fn bounds(&self) -> (u32, u32) {
        let i = *self as usize;
        (AGE_BINS[i], AGE_BINS[i + 1])
    }

    pub fn from_age(age: u32) -> Option<AgeGroup> {
        AgeGroup::ALL.into_iter().find(|group| {
            let (low, high) = group.bounds();
            (low..high).contains(&age)
        })
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Age group and plotting midpoint for a record, or `None` when the age is
/// missing or outside `[10, 100)`. Such records must be dropped from every
/// age-grouped view.
pub fn assign_age_group(record: &Record) -> Option<(AgeGroup, u32)> {
    let group = AgeGroup::from_age(record.age?)?;
    Some((group, group.midpoint()))
}

/// Athlete counts per `(Year, Age Group)`, ungrouped ages excluded.
pub fn group_by_year_and_age_group(records: &[&Record]) -> GroupedCounts {
    group_and_count(records, &[GroupField::Year, GroupField::AgeGroup])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::athlete;
    use crate::grouping::KeyValue;
    use crate::record::{Medal, Sex};
    use proptest::prelude::*;

    #[test]
    fn bin_edges_are_left_inclusive() {
        assert_eq!(AgeGroup::from_age(13), Some(AgeGroup::Age10To14));
        assert_eq!(AgeGroup::from_age(14), Some(AgeGroup::Age15To17));
        assert_eq!(AgeGroup::from_age(35), Some(AgeGroup::Age36Plus));
        assert_eq!(AgeGroup::from_age(99), Some(AgeGroup::Age36Plus));
        assert_eq!(AgeGroup::from_age(9), None);
        assert_eq!(AgeGroup::from_age(100), None);
    }

    #[test]
    fn assigns_label_and_midpoint() {
        let base = athlete("A", Sex::Male, "FRA", 1996, Medal::NoMedal);

        let r = base.clone().aged(13);
        assert_eq!(assign_age_group(&r).map(|(g, m)| (g.label(), m)), Some(("10-14", 12)));

        let r = base.clone().aged(14);
        assert_eq!(assign_age_group(&r).map(|(g, m)| (g.label(), m)), Some(("15-17", 16)));

        let r = base.clone().aged(99);
        assert_eq!(assign_age_group(&r).map(|(g, m)| (g.label(), m)), Some(("36+", 40)));

        assert_eq!(assign_age_group(&base.clone().aged(5)), None);
        assert_eq!(assign_age_group(&base), None);
    }

    #[test]
    fn ungrouped_ages_are_dropped_from_year_age_counts() {
        let records = vec![
            athlete("A", Sex::Male, "FRA", 1996, Medal::Gold).aged(13),
            athlete("B", Sex::Male, "FRA", 1996, Medal::NoMedal).aged(5),
            athlete("C", Sex::Male, "FRA", 1996, Medal::NoMedal),
            athlete("D", Sex::Male, "FRA", 1996, Medal::NoMedal).aged(12),
        ];
        let view: Vec<&Record> = records.iter().collect();
        let grouped = group_by_year_and_age_group(&view);

        assert_eq!(grouped.total(), 2);
        assert_eq!(grouped.rows().len(), 1);
        assert_eq!(
            grouped.rows()[0].key,
            vec![KeyValue::Year(1996), KeyValue::AgeGroup(AgeGroup::Age10To14)]
        );
    }

    #[test]
    fn bins_partition_the_covered_range() {
        let mut expected_low = AGE_BINS[0];
        for group in AgeGroup::ALL {
            let (low, high) = group.bounds();
            assert_eq!(low, expected_low);
            assert!(high > low);
            expected_low = high;
        }
        assert_eq!(expected_low, 100);
    }

    proptest! {
        #[test]
        fn every_covered_age_lands_in_exactly_one_bin(age in 10u32..100) {
            let hits = AgeGroup::ALL
                .iter()
                .filter(|g| { let (lo, hi) = g.bounds(); (lo..hi).contains(&age) })
                .count();
            prop_assert_eq!(hits, 1);
            prop_assert!(AgeGroup::from_age(age).is_some());
        }

        #[test]
        fn uncovered_ages_have_no_group(age in prop_oneof![0u32..10, 100u32..1000]) {
            prop_assert_eq!(AgeGroup::from_age(age), None);
        }
    }
}
