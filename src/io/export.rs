//! CSV export for offline run records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::sim::types::TickRecord;

/// Column header for the per-asset tick export.
const HEADER: &str = "tick,time_s,asset,type,real_v,expected_v,load_a,health,fault";

/// Exports run records to a CSV file at the given path.
///
/// Writes a header row followed by one row per asset per tick. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(records: &[TickRecord], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes run records as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(records: &[TickRecord], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in records {
        let s = &r.status;
        wtr.write_record(&[
            r.tick.to_string(),
            format!("{:.3}", r.time_s),
            s.id.to_string(),
            s.kind.to_string(),
            format!("{:.2}", s.real_value),
            format!("{:.2}", s.expected_value),
            format!("{:.2}", s.load_amps),
            s.health_status.to_string(),
            s.fault.map(|k| k.to_string()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetKind, SensorKey};
    use crate::sim::fault::FaultKind;
    use crate::sim::types::AssetStatus;
    use crate::twin::HealthStatus;

    fn make_record(tick: usize, fault: Option<FaultKind>) -> TickRecord {
        TickRecord {
            tick,
            time_s: tick as f64,
            status: AssetStatus {
                id: SensorKey::Home(1),
                name: "14 Main St, Bulawayo".to_string(),
                owner: Some("Mr. Dube".to_string()),
                kind: AssetKind::SmartHome,
                real_value: 229.61,
                expected_value: 230.0,
                health_status: HealthStatus::Normal,
                load_amps: 8.4,
                recommendation: "Home System Nominal.".to_string(),
                fault,
            },
        }
    }

    #[test]
    fn header_matches_columns() {
        let mut buf = Vec::new();
        write_csv(&[make_record(0, None)], &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output.lines().next(), Some(HEADER));
    }

    #[test]
    fn row_count_matches_record_count() {
        let records: Vec<TickRecord> = (0..12).map(|t| make_record(t, None)).collect();
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        // 1 header + 12 data rows
        assert_eq!(output.lines().count(), 13);
    }

    #[test]
    fn fields_with_spaces_and_faults_parse_back() {
        let records = vec![make_record(0, None), make_record(1, Some(FaultKind::GridSurge))];
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "home_1");
        assert_eq!(&rows[0][3], "Smart Home");
        assert_eq!(&rows[0][8], "");
        assert_eq!(&rows[1][8], "Grid Surge");
        let v: f64 = rows[1][4].parse().unwrap();
        assert_eq!(v, 229.61);
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        export_csv(&[make_record(0, None)], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("tick,time_s"));
    }
}
