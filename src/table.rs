//! Arrow/Parquet form of every view, for the chart renderer and for export.

use std::fs::File;
use std::path::Path;

use arrow2::array::{Array, MutablePrimitiveArray, MutableUtf8Array, PrimitiveArray, Utf8Array};
use arrow2::chunk::Chunk;
use arrow2::datatypes::{DataType, Field, Schema};
use arrow2::io::parquet::write::{
    transverse, CompressionOptions, Encoding, FileWriter, RowGroupIterator, Version, WriteOptions,
};
use tracing::info;

use crate::error::{ExplorerError, Result};
use crate::gender::GenderShare;
use crate::grouping::{GroupedCounts, KeyValue};
use crate::medals::MedalTally;
use crate::participation::{CareerSpan, ParticipationMedalRate};
use crate::relative::RelativeCounts;
use crate::sankey::{FlowLink, FlowNode, NodeKind};

pub type Column = (Field, Box<dyn Array>);

static WRITE_OPTIONS: WriteOptions = WriteOptions {
    write_statistics: true,
    compression: CompressionOptions::Snappy,
    version: Version::V2,
    data_pagesize_limit: None,
};

/// A view that can be laid out as named, ordered Arrow columns.
pub trait ToChunk {
    fn arrow_columns(&self) -> Vec<Column>;

    fn num_rows(&self) -> usize;

    fn schema(&self) -> Schema {
        let fields: Vec<Field> = self.arrow_columns().into_iter().map(|(field, _)| field).collect();
        Schema::from(fields)
    }

    fn to_chunk(&self) -> Result<Chunk<Box<dyn Array>>> {
        Ok(self.to_table()?.1)
    }

    fn to_table(&self) -> Result<(Schema, Chunk<Box<dyn Array>>)> {
        let (fields, arrays): (Vec<Field>, Vec<Box<dyn Array>>) = self.arrow_columns().into_iter().unzip();
        let chunk = Chunk::try_new(arrays)?;
        Ok((Schema::from(fields), chunk))
    }
}

// ─────────────────────────────────────────────────────────────
//  Column builders
// ─────────────────────────────────────────────────────────────

macro_rules! utf8_column {
    ($name:expr, $rows:expr, |$r:ident| $value:expr) => {{
        let mut col = MutableUtf8Array::<i32>::with_capacity($rows.len());
        for $r in $rows.iter() {
            col.push($value);
        }
        let array: Utf8Array<i32> = col.into();
        (
            Field::new($name, DataType::Utf8, true),
            Box::new(array) as Box<dyn Array>,
        )
    }};
}

macro_rules! prim_column {
    ($name:expr, $ty:ty, $dt:expr, $rows:expr, |$r:ident| $value:expr) => {{
        let mut col = MutablePrimitiveArray::<$ty>::with_capacity($rows.len());
        for $r in $rows.iter() {
            col.push($value);
        }
        let array: PrimitiveArray<$ty> = col.into();
        (Field::new($name, $dt, true), Box::new(array) as Box<dyn Array>)
    }};
}

/// Key column typed after its first value: years and ordinals stay
/// numeric, everything else is written as text.
fn key_column(name: &str, keys: &[&KeyValue]) -> Column {
    match keys.first() {
        Some(KeyValue::Year(_)) => prim_column!(name, i32, DataType::Int32, keys, |k| match k {
            KeyValue::Year(y) => Some(*y),
            _ => None,
        }),
        Some(KeyValue::Ordinal(_)) => prim_column!(name, u32, DataType::UInt32, keys, |k| match k {
            KeyValue::Ordinal(n) => Some(*n),
            _ => None,
        }),
        _ => utf8_column!(name, keys, |k| Some(k.to_string())),
    }
}

fn key_columns<'a>(names: &[&str], keys: impl Fn(usize) -> Vec<&'a KeyValue>) -> Vec<Column> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| key_column(name, &keys(i)))
        .collect()
}

fn age_midpoints(keys: &[&KeyValue]) -> Column {
    prim_column!("Age_Midpoint", u32, DataType::UInt32, keys, |k| match k {
        KeyValue::AgeGroup(g) => Some(g.midpoint()),
        _ => None,
    })
}

impl ToChunk for GroupedCounts {
    fn arrow_columns(&self) -> Vec<Column> {
        let rows = self.rows();
        let mut columns = key_columns(self.columns(), |i| rows.iter().map(|r| &r.key[i]).collect());
        if let Some(i) = self.column_index("Age Group") {
            let keys: Vec<&KeyValue> = rows.iter().map(|r| &r.key[i]).collect();
            columns.push(age_midpoints(&keys));
        }
        columns.push(prim_column!("Count", u64, DataType::UInt64, rows, |r| Some(r.count)));
        columns
    }

    fn num_rows(&self) -> usize {
        self.rows().len()
    }
}

impl ToChunk for RelativeCounts {
    fn arrow_columns(&self) -> Vec<Column> {
        let rows = self.rows();
        let mut columns = key_columns(self.columns(), |i| rows.iter().map(|r| &r.key[i]).collect());
        if let Some(i) = self.columns().iter().position(|c| *c == "Age Group") {
            let keys: Vec<&KeyValue> = rows.iter().map(|r| &r.key[i]).collect();
            columns.push(age_midpoints(&keys));
        }
        columns.push(prim_column!("Count", u64, DataType::UInt64, rows, |r| Some(r.count)));
        columns.push(prim_column!("Percentage", f64, DataType::Float64, rows, |r| r.percentage()));
        columns
    }

    fn num_rows(&self) -> usize {
        self.rows().len()
    }
}

impl ToChunk for [FlowNode] {
    fn arrow_columns(&self) -> Vec<Column> {
        vec![
            utf8_column!("id", self, |n| Some(n.id.as_str())),
            utf8_column!("label", self, |n| Some(n.label.as_str())),
            utf8_column!("NOC", self, |n| Some(n.noc.as_str())),
            utf8_column!("Medal", self, |n| match &n.kind {
                NodeKind::Country => None,
                NodeKind::Medal(m) => Some(m.as_str()),
            }),
            utf8_column!("color", self, |n| Some(n.color.as_str())),
        ]
    }

    fn num_rows(&self) -> usize {
        self.len()
    }
}

impl ToChunk for [FlowLink] {
    fn arrow_columns(&self) -> Vec<Column> {
        vec![
            prim_column!("source", u32, DataType::UInt32, self, |l| Some(l.source as u32)),
            prim_column!("target", u32, DataType::UInt32, self, |l| Some(l.target as u32)),
            prim_column!("value", f64, DataType::Float64, self, |l| Some(l.value)),
            utf8_column!("Medal", self, |l| Some(l.medal.as_str())),
            utf8_column!("NOC", self, |l| Some(l.noc.as_str())),
            utf8_column!("color", self, |l| Some(l.color.as_str())),
        ]
    }

    fn num_rows(&self) -> usize {
        self.len()
    }
}

impl ToChunk for [GenderShare] {
    fn arrow_columns(&self) -> Vec<Column> {
        vec![
            prim_column!("Year", i32, DataType::Int32, self, |s| Some(s.year)),
            prim_column!("Female", u64, DataType::UInt64, self, |s| Some(s.female)),
            prim_column!("Male", u64, DataType::UInt64, self, |s| Some(s.male)),
            prim_column!("Female %", f64, DataType::Float64, self, |s| s.female_pct),
            prim_column!("Male %", f64, DataType::Float64, self, |s| s.male_pct),
        ]
    }

    fn num_rows(&self) -> usize {
        self.len()
    }
}

impl ToChunk for [ParticipationMedalRate] {
    fn arrow_columns(&self) -> Vec<Column> {
        vec![
            prim_column!("Participation", u32, DataType::UInt32, self, |r| Some(r.participation)),
            prim_column!("Athletes", u64, DataType::UInt64, self, |r| Some(r.athletes_reaching)),
            prim_column!("Medalists", u64, DataType::UInt64, self, |r| Some(r.medalists)),
            prim_column!("Percentage", f64, DataType::Float64, self, |r| r.percentage),
        ]
    }

    fn num_rows(&self) -> usize {
        self.len()
    }
}

impl ToChunk for [CareerSpan] {
    fn arrow_columns(&self) -> Vec<Column> {
        vec![
            utf8_column!("Name", self, |s| Some(s.name.as_str())),
            prim_column!("First Year", i32, DataType::Int32, self, |s| Some(s.first_year)),
            prim_column!("Last Year", i32, DataType::Int32, self, |s| Some(s.last_year)),
            prim_column!("Span", i32, DataType::Int32, self, |s| Some(s.span_years())),
            prim_column!("Participations", u32, DataType::UInt32, self, |s| Some(s.participations)),
            prim_column!("Medals", u32, DataType::UInt32, self, |s| Some(s.medals)),
        ]
    }

    fn num_rows(&self) -> usize {
        self.len()
    }
}

impl ToChunk for [MedalTally] {
    fn arrow_columns(&self) -> Vec<Column> {
        vec![
            utf8_column!("Name", self, |t| Some(t.name.as_str())),
            prim_column!("Gold", u32, DataType::UInt32, self, |t| Some(t.gold)),
            prim_column!("Silver", u32, DataType::UInt32, self, |t| Some(t.silver)),
            prim_column!("Bronze", u32, DataType::UInt32, self, |t| Some(t.bronze)),
            prim_column!("Total", u32, DataType::UInt32, self, |t| Some(t.total())),
        ]
    }

    fn num_rows(&self) -> usize {
        self.len()
    }
}

// ─────────────────────────────────────────────────────────────
//  Parquet
// ─────────────────────────────────────────────────────────────

/// Writes `table` as a single-row-group Parquet file at `path`.
pub fn write_parquet<T: ToChunk + ?Sized>(table: &T, path: &Path) -> Result<()> {
    let (schema, chunk) = table.to_table()?;

    let encodings = schema
        .fields
        .iter()
        .map(|f| transverse(&f.data_type, |_| Encoding::Plain))
        .collect();
    let row_groups =
        RowGroupIterator::try_new(vec![Ok(chunk)].into_iter(), &schema, WRITE_OPTIONS, encodings)?;

    let file = File::create(path).map_err(|source| ExplorerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = FileWriter::try_new(file, schema, WRITE_OPTIONS)?;
    for group in row_groups {
        writer.write(group?)?;
    }
    writer.end(None)?;

    info!(path = %path.display(), rows = table.num_rows(), "wrote parquet table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::age::group_by_year_and_age_group;
    use crate::fixtures::athlete;
    use crate::grouping::{group_and_count, GroupField};
    use crate::record::{Medal, Record, Sex};
    use crate::relative::{to_relative, ValueMode};
    use crate::sankey::medal_flow_for_selection;

    fn records() -> Vec<Record> {
        vec![
            athlete("A", Sex::Male, "FRA", 1996, Medal::Gold).aged(13),
            athlete("A", Sex::Male, "FRA", 2000, Medal::NoMedal).aged(17),
            athlete("B", Sex::Male, "USA", 1996, Medal::NoMedal).aged(14),
        ]
    }

    fn names(schema: &Schema) -> Vec<&str> {
        schema.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn age_counts_carry_midpoints() {
        let records = records();
        let view: Vec<&Record> = records.iter().collect();
        let (schema, chunk) = group_by_year_and_age_group(&view).to_table().unwrap();

        assert_eq!(names(&schema), vec!["Year", "Age Group", "Age_Midpoint", "Count"]);
        assert_eq!(schema.fields[0].data_type, DataType::Int32);
        assert_eq!(schema.fields[1].data_type, DataType::Utf8);
        assert_eq!(chunk.len(), 3);

        let midpoints = chunk.arrays()[2]
            .as_any()
            .downcast_ref::<PrimitiveArray<u32>>()
            .unwrap();
        assert_eq!(midpoints.values().as_slice(), &[12, 16, 16]);
    }

    #[test]
    fn relative_counts_add_percentage_column() {
        let records = records();
        let view: Vec<&Record> = records.iter().collect();
        let grouped = group_and_count(&view, &[GroupField::Year, GroupField::Noc]);
        let (schema, chunk) = to_relative(&grouped, "Year").unwrap().to_table().unwrap();

        assert_eq!(names(&schema), vec!["Year", "NOC", "Count", "Percentage"]);
        let pct = chunk.arrays()[3]
            .as_any()
            .downcast_ref::<PrimitiveArray<f64>>()
            .unwrap();
        assert_eq!(pct.values().as_slice(), &[50.0, 50.0, 100.0]);
    }

    #[test]
    fn flow_graph_exports_nodes_and_links() {
        let records = records();
        let view: Vec<&Record> = records.iter().collect();
        let graph = medal_flow_for_selection(&view, Some("FRA"), ValueMode::Absolute).unwrap();

        let (node_schema, nodes) = graph.nodes.to_table().unwrap();
        let (_, links) = graph.links.to_table().unwrap();
        assert_eq!(names(&node_schema), vec!["id", "label", "NOC", "Medal", "color"]);
        assert_eq!(nodes.len(), 2 + 8);
        assert_eq!(links.len(), 8);
        assert_eq!(nodes.arrays()[3].null_count(), 2);
    }

    #[test]
    fn parquet_file_holds_every_row() {
        let records = records();
        let view: Vec<&Record> = records.iter().collect();
        let grouped = group_and_count(&view, &[GroupField::Year, GroupField::Medal]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("year_medal.parquet");
        write_parquet(&grouped, &path).unwrap();

        let mut file = File::open(&path).unwrap();
        let metadata = arrow2::io::parquet::read::read_metadata(&mut file).unwrap();
        assert_eq!(metadata.num_rows, grouped.rows().len());
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let grouped = group_and_count(&[], &[GroupField::Year]);
        let err = write_parquet(&grouped, Path::new("/nonexistent-dir/x.parquet")).unwrap_err();
        assert!(matches!(err, ExplorerError::Io { .. }));
        assert!(err.to_string().starts_with("I/O error on /nonexistent-dir/x.parquet"));
    }
}
