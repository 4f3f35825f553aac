//! One dashboard session: filter once, derive every view from the result.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::age::group_by_year_and_age_group;
use crate::error::Result;
use crate::filter::{filter_records, FilterCriteria};
use crate::gender::{event_gender_share, gender_share_by_year, GenderShare};
use crate::grouping::{group_and_count, GroupField, GroupedCounts};
use crate::hover;
use crate::medals::{top_medalists, MedalTally, HALL_OF_FAME_SIZE};
use crate::participation::{
    career_spans, first_medal_participation, medal_rate_by_participation, CareerSpan,
    ParticipationMedalRate,
};
use crate::record::Record;
use crate::relative::{to_relative, RelativeCounts, ValueMode};
use crate::sankey::{medal_flow_for_selection, FlowGraph};
use crate::table::{write_parquet, Column, ToChunk};

/// A chart's data, or the "no data for this selection" placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum View<T> {
    Ready(T),
    NoData,
}

impl<T> View<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            View::Ready(t) => Some(t),
            View::NoData => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, View::Ready(_))
    }

    fn unless_empty(value: T, is_empty: impl FnOnce(&T) -> bool) -> Self {
        if is_empty(&value) {
            View::NoData
        } else {
            View::Ready(value)
        }
    }
}

impl<T> From<Option<T>> for View<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(View::NoData, View::Ready)
    }
}

/// Counts as-is, or as percentages of an outer group, depending on the mode.
#[derive(Debug, Clone, PartialEq)]
pub enum CountTable {
    Counts(GroupedCounts),
    Shares(RelativeCounts),
}

impl CountTable {
    fn build(grouped: GroupedCounts, outer: &str, mode: ValueMode) -> Result<Self> {
        Ok(match mode {
            ValueMode::Absolute => CountTable::Counts(grouped),
            ValueMode::Relative => CountTable::Shares(to_relative(&grouped, outer)?),
        })
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CountTable::Counts(t) => t.is_empty(),
            CountTable::Shares(t) => t.is_empty(),
        }
    }
}

impl ToChunk for CountTable {
    fn arrow_columns(&self) -> Vec<Column> {
        match self {
            CountTable::Counts(t) => t.arrow_columns(),
            CountTable::Shares(t) => t.arrow_columns(),
        }
    }

    fn num_rows(&self) -> usize {
        match self {
            CountTable::Counts(t) => t.num_rows(),
            CountTable::Shares(t) => t.num_rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    pub mode: ValueMode,
    /// Records left after filtering; zero means every view is `NoData`.
    pub matched: usize,
    /// `(Year, Age Group)`; relative mode divides by the year total.
    pub age_distribution: View<CountTable>,
    pub age_hover: String,
    pub participation_over_time: View<GroupedCounts>,
    /// `(Age Group, Medal)`; relative mode divides by the age group total.
    pub medal_by_age_group: View<CountTable>,
    /// Top countries plus the selected one, ignoring the country filter.
    pub medal_flow: View<FlowGraph>,
    /// Both sexes, all other filters kept.
    pub gender_share: View<Vec<GenderShare>>,
    pub event_gender: View<RelativeCounts>,
    pub participation_medal_rate: View<Vec<ParticipationMedalRate>>,
    pub first_medal: View<GroupedCounts>,
    pub career_spans: View<Vec<CareerSpan>>,
    pub hall_of_fame: View<Vec<MedalTally>>,
}

/// Read-only access to the loaded table. Sessions share nothing but this.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    records: &'a [Record],
}

impl<'a> Dashboard<'a> {
    pub fn new(records: &'a [Record]) -> Self {
        Dashboard { records }
    }

    pub fn render(&self, criteria: &FilterCriteria, mode: ValueMode) -> Result<DashboardViews> {
        let selected = filter_records(self.records, criteria);
        let country_context = filter_records(self.records, &criteria.across_countries());
        let sex_context = filter_records(self.records, &criteria.across_sexes());
        debug!(
            matched = selected.len(),
            country_context = country_context.len(),
            sex_context = sex_context.len(),
            "filtered records"
        );

        let age_distribution = View::unless_empty(
            CountTable::build(
                group_by_year_and_age_group(&selected),
                GroupField::Year.column_name(),
                mode,
            )?,
            CountTable::is_empty,
        );
        let medal_by_age_group = View::unless_empty(
            CountTable::build(
                group_and_count(&selected, &[GroupField::AgeGroup, GroupField::Medal]),
                GroupField::AgeGroup.column_name(),
                mode,
            )?,
            CountTable::is_empty,
        );
        let participation_over_time = View::unless_empty(
            group_and_count(&selected, &[GroupField::Year]),
            GroupedCounts::is_empty,
        );

        let medal_flow = View::from(medal_flow_for_selection(
            &country_context,
            criteria.country.selected().map(String::as_str),
            mode,
        ));
        if let View::Ready(graph) = &medal_flow {
            if criteria.country.selected().is_some() && !graph.selected_country_available {
                info!("selected country has no records in this context; showing top countries only");
            }
        }

        let views = DashboardViews {
            mode,
            matched: selected.len(),
            age_distribution,
            age_hover: hover::age_distribution_hover(mode),
            participation_over_time,
            medal_by_age_group,
            medal_flow,
            gender_share: View::unless_empty(gender_share_by_year(&sex_context), Vec::is_empty),
            event_gender: View::unless_empty(event_gender_share(&sex_context)?, RelativeCounts::is_empty),
            participation_medal_rate: View::unless_empty(
                medal_rate_by_participation(&selected),
                Vec::is_empty,
            ),
            first_medal: View::unless_empty(first_medal_participation(&selected), GroupedCounts::is_empty),
            career_spans: View::unless_empty(career_spans(&selected), Vec::is_empty),
            hall_of_fame: View::unless_empty(top_medalists(&selected, HALL_OF_FAME_SIZE), Vec::is_empty),
        };

        info!(
            matched = views.matched,
            ready = views.ready_count(),
            relative = mode.is_relative(),
            "rendered dashboard"
        );
        Ok(views)
    }
}

fn export_view<T: ToChunk + ?Sized>(
    table: Option<&T>,
    dir: &Path,
    name: &str,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    if let Some(table) = table {
        let path = dir.join(format!("{name}.parquet"));
        write_parquet(table, &path)?;
        written.push(path);
    }
    Ok(())
}

impl DashboardViews {
    pub fn ready_count(&self) -> usize {
        [
            self.age_distribution.is_ready(),
            self.participation_over_time.is_ready(),
            self.medal_by_age_group.is_ready(),
            self.medal_flow.is_ready(),
            self.gender_share.is_ready(),
            self.event_gender.is_ready(),
            self.participation_medal_rate.is_ready(),
            self.first_medal.is_ready(),
            self.career_spans.is_ready(),
            self.hall_of_fame.is_ready(),
        ]
        .into_iter()
        .filter(|ready| *ready)
        .count()
    }

    /// Writes every ready view to `dir` as `<view>.parquet` and returns the
    /// paths written. `NoData` views are skipped.
    pub fn export(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        export_view(self.age_distribution.ready(), dir, "age_distribution", &mut written)?;
        export_view(self.participation_over_time.ready(), dir, "participation_over_time", &mut written)?;
        export_view(self.medal_by_age_group.ready(), dir, "medal_by_age_group", &mut written)?;
        if let Some(graph) = self.medal_flow.ready() {
            export_view(Some(graph.nodes.as_slice()), dir, "medal_flow_nodes", &mut written)?;
            export_view(Some(graph.links.as_slice()), dir, "medal_flow_links", &mut written)?;
        }
        export_view(self.gender_share.ready().map(Vec::as_slice), dir, "gender_share", &mut written)?;
        export_view(self.event_gender.ready(), dir, "event_gender", &mut written)?;
        export_view(
            self.participation_medal_rate.ready().map(Vec::as_slice),
            dir,
            "participation_medal_rate",
            &mut written,
        )?;
        export_view(self.first_medal.ready(), dir, "first_medal", &mut written)?;
        export_view(self.career_spans.ready().map(Vec::as_slice), dir, "career_spans", &mut written)?;
        export_view(self.hall_of_fame.ready().map(Vec::as_slice), dir, "hall_of_fame", &mut written)?;
        Ok(written)
    }
}
