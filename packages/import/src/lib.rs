#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bulk spreadsheet import for RTH metrics.
//!
//! Accepts CSV and XLSX files whose first row is a header. Columns are
//! detected by keyword, not position, so operators can upload the
//! published dataset without rearranging it. Parsing is deliberately
//! forgiving at the cell level (bad numbers become 0, missing cluster
//! becomes `cluster_0`) but strict at the file level: a missing required
//! header rejects the whole file before any row is processed.

use std::io::Cursor;

use calamine::{Data, Reader as _, Xlsx, XlsxError};
use rth_map_rth_models::{MetricRow, RthRecord};
use thiserror::Error;

/// Upload size cap, checked before any parsing.
pub const MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024;

/// Required header keywords, as shown to operators in error messages.
const REQUIRED_HEADERS: &[&str] = &[
    "KECAMATAN",
    "LUAS TAMAN",
    "LUAS PEMAKAMAN",
    "TOTAL RTH",
    "LUAS KECAMATAN",
    "CLUSTER",
];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Ukuran file maksimal 5MB")]
    TooLarge,
    #[error("Format file tidak didukung: {0}")]
    UnsupportedFormat(String),
    #[error("File tidak memiliki baris header")]
    MissingHeaderRow,
    #[error("Header wajib tidak ditemukan: {}", missing.join(", "))]
    MissingHeaders { missing: Vec<&'static str> },
    #[error("Tidak ada data valid yang ditemukan. Pastikan kolom KECAMATAN terisi.")]
    NoValidRows,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Xlsx(#[from] XlsxError),
    #[error("XLSX tidak memiliki worksheet")]
    MissingWorksheet,
    #[error("Gagal menulis CSV: {0}")]
    Export(String),
}

/// A metrics column recognized by header keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Kecamatan,
    LuasTaman,
    LuasPemakaman,
    TotalRth,
    LuasKecamatan,
    Cluster,
}

impl Column {
    /// Keyword containment on the uppercased header. `LUAS KECAMATAN`
    /// contains `KECAMATAN` too, so the name column requires the absence
    /// of `LUAS`.
    fn detect(header: &str) -> Option<Self> {
        let upper = header.to_uppercase();
        if upper.contains("KECAMATAN") && !upper.contains("LUAS") {
            Some(Self::Kecamatan)
        } else if upper.contains("LUAS") && upper.contains("TAMAN") {
            Some(Self::LuasTaman)
        } else if upper.contains("LUAS") && upper.contains("PEMAKAMAN") {
            Some(Self::LuasPemakaman)
        } else if upper.contains("TOTAL") && upper.contains("RTH") {
            Some(Self::TotalRth)
        } else if upper.contains("LUAS") && upper.contains("KECAMATAN") {
            Some(Self::LuasKecamatan)
        } else if upper.contains("CLUSTER") {
            Some(Self::Cluster)
        } else {
            None
        }
    }

    const fn required_header(self) -> &'static str {
        match self {
            Self::Kecamatan => "KECAMATAN",
            Self::LuasTaman => "LUAS TAMAN",
            Self::LuasPemakaman => "LUAS PEMAKAMAN",
            Self::TotalRth => "TOTAL RTH",
            Self::LuasKecamatan => "LUAS KECAMATAN",
            Self::Cluster => "CLUSTER",
        }
    }
}

/// One data row, cells paired with their detected column. Unrecognized
/// columns are dropped at parse time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(Column, String)>,
}

/// Maps the header row to columns, rejecting the file when any required
/// keyword is absent.
fn detect_columns(headers: &[String]) -> Result<Vec<Option<Column>>, ImportError> {
    let columns: Vec<Option<Column>> = headers.iter().map(|h| Column::detect(h)).collect();

    let missing: Vec<&'static str> = REQUIRED_HEADERS
        .iter()
        .zip([
            Column::Kecamatan,
            Column::LuasTaman,
            Column::LuasPemakaman,
            Column::TotalRth,
            Column::LuasKecamatan,
            Column::Cluster,
        ])
        .filter(|(_, column)| !columns.contains(&Some(*column)))
        .map(|(header, _)| *header)
        .collect();

    if missing.is_empty() {
        Ok(columns)
    } else {
        Err(ImportError::MissingHeaders { missing })
    }
}

fn collect_row(columns: &[Option<Column>], cells: impl Iterator<Item = String>) -> RawRow {
    let cells = columns
        .iter()
        .zip(cells)
        .filter_map(|(column, value)| column.map(|c| (c, value)))
        .collect();
    RawRow { cells }
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|_| ImportError::MissingHeaderRow)?
        .iter()
        .map(str::to_string)
        .collect();
    let columns = detect_columns(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(collect_row(
            &columns,
            record.iter().map(str::to_string),
        ));
    }
    Ok(rows)
}

fn parse_xlsx(bytes: &[u8]) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::MissingWorksheet)??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(ImportError::MissingHeaderRow)?
        .iter()
        .map(Data::to_string)
        .collect();
    let columns = detect_columns(&headers)?;

    Ok(rows
        .map(|row| {
            collect_row(
                &columns,
                row.iter().map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                }),
            )
        })
        .collect())
}

/// Parses an uploaded spreadsheet into raw rows. The format is picked by
/// file extension; the size cap and header check both reject the whole
/// file before any row is produced.
pub fn parse_spreadsheet(bytes: &[u8], filename: &str) -> Result<Vec<RawRow>, ImportError> {
    if bytes.len() > MAX_IMPORT_BYTES {
        return Err(ImportError::TooLarge);
    }

    let extension = filename
        .rsplit('.')
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => parse_csv(bytes),
        "xlsx" | "xls" => parse_xlsx(bytes),
        _ => Err(ImportError::UnsupportedFormat(filename.to_string())),
    }
}

/// Permissive numeric parse matching the source dataset's habits: commas
/// and internal whitespace are treated as decimal points, anything still
/// unparseable becomes 0.
fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c == ',' || c.is_whitespace() { '.' } else { c })
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

/// Turns raw rows into candidate metric rows.
///
/// A row is valid iff its kecamatan name is non-empty after trimming;
/// invalid rows are skipped and counted, not fatal. Zero valid rows is an
/// error so an all-blank sheet cannot wipe the dataset downstream.
pub fn validate(rows: &[RawRow]) -> Result<(Vec<MetricRow>, usize), ImportError> {
    let mut valid = Vec::new();
    let mut skipped = 0;

    for (index, raw) in rows.iter().enumerate() {
        let mut row = MetricRow::empty();
        for (column, value) in &raw.cells {
            match column {
                Column::Kecamatan => row.kecamatan = value.trim().to_string(),
                Column::LuasTaman => row.luas_taman = parse_number(value),
                Column::LuasPemakaman => row.luas_pemakaman = parse_number(value),
                Column::TotalRth => row.total_rth = parse_number(value),
                Column::LuasKecamatan => row.luas_kecamatan = parse_number(value),
                Column::Cluster => {
                    let cluster = value.trim();
                    if !cluster.is_empty() {
                        row.cluster = cluster.to_string();
                    }
                }
            }
        }

        if row.kecamatan.is_empty() {
            log::warn!("Baris {}: nama kecamatan kosong, dilewati", index + 1);
            skipped += 1;
        } else {
            valid.push(row);
        }
    }

    if valid.is_empty() {
        return Err(ImportError::NoValidRows);
    }
    Ok((valid, skipped))
}

/// Serializes stored records back to a CSV spreadsheet the importer
/// itself would accept.
pub fn export_csv(records: &[RthRecord]) -> Result<Vec<u8>, ImportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "KECAMATAN",
        "LUAS TAMAN",
        "LUAS PEMAKAMAN",
        "TOTAL RTH",
        "LUAS KECAMATAN",
        "CLUSTER",
        "TANGGAL UPDATE",
    ])?;
    for record in records {
        writer.write_record([
            record.kecamatan.as_str(),
            &record.luas_taman.to_string(),
            &record.luas_pemakaman.to_string(),
            &record.total_rth.to_string(),
            &record.luas_kecamatan.to_string(),
            record.cluster.as_str(),
            record.tanggal_update.as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| ImportError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_OK: &str = "\
No,Nama Kecamatan,Luas Taman (ha),Luas Pemakaman (ha),Total RTH (ha),Luas Kecamatan (ha),Cluster
1,Andir,2.23,2.58,4.81,373.5,cluster_1
2,Antapani,1.5,0.5,2.0,407.0,cluster_0
";

    #[test]
    fn csv_parses_by_header_keyword_not_position() {
        let rows = parse_spreadsheet(CSV_OK.as_bytes(), "rth.csv").unwrap();
        let (valid, skipped) = validate(&rows).unwrap();

        assert_eq!(skipped, 0);
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].kecamatan, "Andir");
        assert!((valid[0].luas_taman - 2.23).abs() < f64::EPSILON);
        assert!((valid[0].luas_kecamatan - 373.5).abs() < f64::EPSILON);
        assert_eq!(valid[1].cluster, "cluster_0");
    }

    #[test]
    fn missing_required_header_rejects_whole_file() {
        let csv = "\
Kecamatan,Luas Taman,Luas Pemakaman,Total RTH,Luas Kecamatan
Andir,1,2,3,100
";
        let err = parse_spreadsheet(csv.as_bytes(), "rth.csv").unwrap_err();
        match err {
            ImportError::MissingHeaders { missing } => assert_eq!(missing, ["CLUSTER"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_name_rows_are_skipped_and_counted() {
        let csv = "\
Kecamatan,Luas Taman,Luas Pemakaman,Total RTH,Luas Kecamatan,Cluster
Andir,1,2,3,100,cluster_0
   ,1,2,3,100,cluster_0
Cibiru,1,2,3,100,cluster_2
";
        let rows = parse_spreadsheet(csv.as_bytes(), "rth.csv").unwrap();
        let (valid, skipped) = validate(&rows).unwrap();
        assert_eq!(valid.len(), 2);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn all_blank_sheet_is_an_error() {
        let csv = "\
Kecamatan,Luas Taman,Luas Pemakaman,Total RTH,Luas Kecamatan,Cluster
,1,2,3,100,cluster_0
";
        let rows = parse_spreadsheet(csv.as_bytes(), "rth.csv").unwrap();
        assert!(matches!(validate(&rows), Err(ImportError::NoValidRows)));
    }

    #[test]
    fn comma_decimals_and_garbage_numbers_are_tolerated() {
        let csv = "\
Kecamatan,Luas Taman,Luas Pemakaman,Total RTH,Luas Kecamatan,Cluster
Andir,\"2,23\",n/a,4.81,373.5,
";
        let rows = parse_spreadsheet(csv.as_bytes(), "rth.csv").unwrap();
        let (valid, _) = validate(&rows).unwrap();

        assert!((valid[0].luas_taman - 2.23).abs() < f64::EPSILON);
        assert!((valid[0].luas_pemakaman - 0.0).abs() < f64::EPSILON);
        assert_eq!(valid[0].cluster, "cluster_0");
    }

    #[test]
    fn oversized_upload_is_rejected_before_parsing() {
        let bytes = vec![b'x'; MAX_IMPORT_BYTES + 1];
        assert!(matches!(
            parse_spreadsheet(&bytes, "rth.csv"),
            Err(ImportError::TooLarge)
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            parse_spreadsheet(b"x", "rth.pdf"),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn export_round_trips_through_the_importer() {
        let records = vec![RthRecord {
            id: 1,
            kecamatan: "Andir".to_string(),
            luas_taman: 2.23,
            luas_pemakaman: 2.58,
            total_rth: 4.81,
            luas_kecamatan: 373.5,
            cluster: "cluster_1".to_string(),
            tanggal_update: "2026-01-01T00:00:00Z".to_string(),
        }];
        let csv = export_csv(&records).unwrap();

        let rows = parse_spreadsheet(&csv, "export.csv").unwrap();
        let (valid, skipped) = validate(&rows).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(valid[0].kecamatan, "Andir");
        assert_eq!(valid[0].cluster, "cluster_1");
        assert!((valid[0].total_rth - 4.81).abs() < f64::EPSILON);
    }
}
