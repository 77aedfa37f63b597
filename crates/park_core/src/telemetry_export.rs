//! Parquet export: write simulation results for analysis tools.
//!
//! Two exports cover the result contract: per-queue daily averages and the
//! final rating list. Both use Arrow/Parquet for compatibility with data
//! analysis tooling (pandas, polars, etc.).

use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::park::Park;
use crate::telemetry::{collect_queue_stats, ParkTelemetry};

fn f64_field(name: &'static str) -> Field {
    Field::new(name, DataType::Float64, false)
}

fn u32_field(name: &'static str) -> Field {
    Field::new(name, DataType::UInt32, false)
}

fn utf8_field(name: &'static str) -> Field {
    Field::new(name, DataType::Utf8, false)
}

fn write_record_batch<P: AsRef<Path>>(
    path: P,
    schema: Schema,
    arrays: Vec<ArrayRef>,
) -> Result<(), Box<dyn Error>> {
    let schema = Arc::new(schema);
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Write every queue's per-day averages: one row per (queue, day).
pub fn write_queue_stats_parquet<P: AsRef<Path>>(path: P, park: &Park) -> Result<(), Box<dyn Error>> {
    let rows = collect_queue_stats(park);
    let mut queue_names = Vec::with_capacity(rows.len());
    let mut days = Vec::with_capacity(rows.len());
    let mut avg_lengths = Vec::with_capacity(rows.len());
    let mut avg_waits = Vec::with_capacity(rows.len());
    for row in &rows {
        queue_names.push(row.queue.clone());
        days.push(row.day);
        avg_lengths.push(row.avg_queue_length);
        avg_waits.push(row.avg_waiting_time_min);
    }

    let schema = Schema::new(vec![
        utf8_field("queue"),
        u32_field("day"),
        f64_field("avg_queue_length"),
        f64_field("avg_waiting_time_min"),
    ]);
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(queue_names)),
        Arc::new(UInt32Array::from(days)),
        Arc::new(Float64Array::from(avg_lengths)),
        Arc::new(Float64Array::from(avg_waits)),
    ];
    write_record_batch(path, schema, arrays)
}

/// Write the final rating list, one row per completed party in completion
/// order.
pub fn write_ratings_parquet<P: AsRef<Path>>(
    path: P,
    telemetry: &ParkTelemetry,
) -> Result<(), Box<dyn Error>> {
    let indices: Vec<u32> = (0..telemetry.ratings.len() as u32).collect();
    let schema = Schema::new(vec![u32_field("completion_index"), f64_field("rating")]);
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from(indices)),
        Arc::new(Float64Array::from(telemetry.ratings.clone())),
    ];
    write_record_batch(path, schema, arrays)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_queue_stats_and_ratings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut park = Park::new(3, 80);
        park.reception.queue.close_day();
        for facility in &mut park.facilities {
            facility.queue_regular.close_day();
            facility.queue_express.close_day();
        }
        for restaurant in &mut park.restaurants {
            restaurant.queue.close_day();
        }

        let stats_path = dir.path().join("queue_stats.parquet");
        write_queue_stats_parquet(&stats_path, &park).expect("write stats");
        assert!(stats_path.exists());

        let telemetry = ParkTelemetry {
            ratings: vec![9.5, 7.25, 4.0],
            ..Default::default()
        };
        let ratings_path = dir.path().join("ratings.parquet");
        write_ratings_parquet(&ratings_path, &telemetry).expect("write ratings");
        assert!(ratings_path.exists());
    }
}
