//! Transformation core of the Olympic athlete explorer: filtering, age
//! binning, grouped counts, per-group percentages, medal-flow graphs and
//! participation-order views over an in-memory athlete table, plus Arrow and
//! Parquet output for the chart renderer.

pub mod age;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod gender;
pub mod grouping;
pub mod hover;
pub mod logging;
pub mod medals;
pub mod participation;
pub mod record;
pub mod relative;
pub mod sankey;
pub mod synth;
pub mod table;
pub mod theme;

#[cfg(test)]
mod fixtures;

pub use age::{assign_age_group, group_by_year_and_age_group, AgeGroup};
pub use dashboard::{CountTable, Dashboard, DashboardViews, View};
pub use dataset::Dataset;
pub use error::{ExplorerError, Result};
pub use filter::{filter_records, parse_age_input, AgeInputError, FilterCriteria, Selection};
pub use grouping::{group_and_count, GroupField, GroupedCounts, KeyValue};
pub use participation::compute_participation_order;
pub use record::{Medal, Record, RegionLookup, Sex};
pub use relative::{to_relative, RelativeCounts, ValueMode};
pub use sankey::{build_medal_flow, countries_of_interest, FlowGraph};
pub use table::{write_parquet, ToChunk};
