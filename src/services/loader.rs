use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    error::{AppError, AppResult},
    models::RatingRecord,
};

const EXPECTED_COLUMNS: usize = 4;

/// Reads rating records from a delimited file on disk
pub fn load_ratings<P: AsRef<Path>>(path: P) -> AppResult<Vec<RatingRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = read_ratings(file)?;

    tracing::info!(
        path = %path.display(),
        records = records.len(),
        "Loaded rating records"
    );

    Ok(records)
}

/// Parses rating records from any reader.
///
/// The first row is a header and is skipped; columns are taken by position as
/// user_id, product_id, rating, timestamp.
pub fn read_ratings<R: Read>(reader: R) -> AppResult<Vec<RatingRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    loop {
        match reader.read_record(&mut row) {
            Ok(true) => records.push(parse_record(&row)?),
            Ok(false) => break,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                return Err(AppError::DataFormat {
                    line,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(records)
}

fn parse_record(row: &StringRecord) -> AppResult<RatingRecord> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);
    let malformed = |message: String| AppError::DataFormat { line, message };

    if row.len() != EXPECTED_COLUMNS {
        return Err(malformed(format!(
            "expected {} columns (user_id, product_id, rating, timestamp), found {}",
            EXPECTED_COLUMNS,
            row.len()
        )));
    }

    let user_id = &row[0];
    let product_id = &row[1];
    if user_id.is_empty() {
        return Err(malformed("user_id is empty".to_string()));
    }
    if product_id.is_empty() {
        return Err(malformed("product_id is empty".to_string()));
    }

    let rating: f64 = row[2]
        .parse()
        .map_err(|_| malformed(format!("rating '{}' is not a number", &row[2])))?;
    if !rating.is_finite() {
        return Err(malformed(format!("rating '{}' is not finite", &row[2])));
    }

    Ok(RatingRecord::new(user_id, product_id, rating, &row[3]))
}
