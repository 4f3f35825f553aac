use olympic_explorer::grouping::KeyValue;
use olympic_explorer::synth::synthetic_records;
use olympic_explorer::{
    assign_age_group, compute_participation_order, filter_records, group_and_count, to_relative,
    Dashboard, FilterCriteria, GroupField, Medal, Record, Sex, ValueMode, View,
};
use pretty_assertions::assert_eq;

fn record(name: &str, noc: &str, year: i32, medal: Medal, age: Option<u32>) -> Record {
    Record {
        name: name.to_string(),
        sex: Some(Sex::Male),
        age,
        noc: noc.to_string(),
        region: None,
        sport: "Athletics".to_string(),
        event: "Men's 100m".to_string(),
        year,
        medal,
    }
}

#[test]
fn french_men_by_year() {
    let records = vec![
        record("A", "FRA", 1996, Medal::Gold, None),
        record("A", "FRA", 2000, Medal::NoMedal, None),
        record("B", "FRA", 1996, Medal::NoMedal, None),
    ];
    let criteria = FilterCriteria::new(Sex::Male).country("FRA");
    let selected = filter_records(&records, &criteria);
    assert_eq!(selected.len(), 3);

    let by_year = group_and_count(&selected, &[GroupField::Year]);
    assert_eq!(by_year.get(&[KeyValue::Year(1996)]), Some(2));
    assert_eq!(by_year.get(&[KeyValue::Year(2000)]), Some(1));

    let by_year_name = group_and_count(&selected, &[GroupField::Year, GroupField::Name]);
    let relative = to_relative(&by_year_name, "Year").unwrap();
    let in_1996: Vec<Option<f64>> = relative
        .group(&KeyValue::Year(1996))
        .map(|r| r.percentage())
        .collect();
    assert_eq!(in_1996, vec![Some(50.0), Some(50.0)]);
}

#[test]
fn age_bins_and_exclusions() {
    let cases = [
        (Some(13), Some(("10-14", 12))),
        (Some(14), Some(("15-17", 16))),
        (Some(99), Some(("36+", 40))),
        (Some(5), None),
        (None, None),
    ];
    for (age, expected) in cases {
        let r = record("A", "FRA", 2000, Medal::NoMedal, age);
        assert_eq!(assign_age_group(&r).map(|(g, m)| (g.label(), m)), expected, "age {age:?}");
    }
}

#[test]
fn synthetic_dashboard_holds_invariants() {
    let records = synthetic_records(500, 2024);
    let dashboard = Dashboard::new(&records);

    for mode in [ValueMode::Absolute, ValueMode::Relative] {
        for sex in Sex::ALL {
            let views = dashboard.render(&FilterCriteria::new(sex), mode).unwrap();
            assert!(views.matched > 0);

            let View::Ready(flow) = &views.medal_flow else {
                panic!("flow graph missing for {sex}");
            };
            for country in flow.country_nodes() {
                let links: Vec<_> = flow.links_from(&country.noc).collect();
                assert_eq!(links.len(), 4);
                assert!(links.iter().all(|l| l.value >= 0.0));
                let sum: f64 = links.iter().map(|l| l.value).sum();
                if mode.is_relative() {
                    assert!((sum - 100.0).abs() <= 0.1, "{} sums to {sum}", country.noc);
                } else {
                    let total = records
                        .iter()
                        .filter(|r| r.noc == country.noc && r.sex == Some(sex))
                        .count();
                    assert_eq!(sum, total as f64);
                }
            }

            if let View::Ready(shares) = &views.gender_share {
                for year in shares {
                    let sum = year.female_pct.unwrap_or(0.0) + year.male_pct.unwrap_or(0.0);
                    assert!((sum - 100.0).abs() <= 0.1);
                }
            }
        }
    }
}

#[test]
fn participation_ordinals_cover_each_career() {
    let records = synthetic_records(200, 9);
    let view: Vec<&Record> = records.iter().collect();
    let order = compute_participation_order(&view);

    let mut by_name: std::collections::BTreeMap<&str, Vec<(i32, u32)>> = Default::default();
    for p in &order {
        by_name.entry(p.record.name.as_str()).or_default().push((p.record.year, p.ordinal));
    }
    for (name, mut entries) in by_name {
        entries.sort_by_key(|&(_, ordinal)| ordinal);
        let ordinals: Vec<u32> = entries.iter().map(|&(_, o)| o).collect();
        let expected: Vec<u32> = (1..=entries.len() as u32).collect();
        assert_eq!(ordinals, expected, "{name}");
        assert!(entries.windows(2).all(|w| w[0].0 <= w[1].0), "{name}");
    }
}

#[test]
fn unknown_country_selection_falls_back_to_top_countries() {
    let records = synthetic_records(300, 5);
    let criteria = FilterCriteria::new(Sex::Female).country("XXX");
    let views = Dashboard::new(&records)
        .render(&criteria, ValueMode::Absolute)
        .unwrap();

    assert_eq!(views.matched, 0);
    assert_eq!(views.age_distribution, View::NoData);
    let View::Ready(flow) = &views.medal_flow else {
        panic!("top countries should still be shown");
    };
    assert!(!flow.selected_country_available);
    assert_eq!(flow.country_nodes().count(), 3);
}
