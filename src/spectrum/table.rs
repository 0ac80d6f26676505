use std::io::Read;
use std::path::Path;

use anyhow::Context as _;
use num_complex::Complex64;

use crate::encode::write_atomically;
use crate::foundation::error::{ModevizError, ModevizResult};

/// Read a headerless `real,imag` table.
///
/// Blank lines and lines starting with `#` are skipped. Surrounding whitespace in fields is
/// ignored.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_complex_csv(path: &Path) -> ModevizResult<Vec<Complex64>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open table '{}'", path.display()))?;
    let values = parse_complex_csv(file, &path.display().to_string())?;
    tracing::debug!(rows = values.len(), "read complex table");
    Ok(values)
}

/// Parse a headerless `real,imag` table from any reader; `source_name` is used in errors.
pub fn parse_complex_csv(reader: impl Read, source_name: &str) -> ModevizResult<Vec<Complex64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for record in rdr.records() {
        // csv errors carry their own position.
        let record = record.with_context(|| format!("failed to read '{source_name}'"))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != 2 {
            return Err(ModevizError::validation(format!(
                "'{source_name}' line {line}: expected 2 fields (real,imag), found {}",
                record.len()
            )));
        }
        let field = |i: usize| -> ModevizResult<f64> {
            record[i].parse::<f64>().map_err(|e| {
                ModevizError::validation(format!(
                    "'{source_name}' line {line}: '{}' is not a number: {e}",
                    &record[i]
                ))
            })
        };
        out.push(Complex64::new(field(0)?, field(1)?));
    }
    Ok(out)
}

/// Write `values` as a headerless `real,imag` table.
pub fn write_complex_csv(path: &Path, values: &[Complex64]) -> ModevizResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for v in values {
        wtr.write_record([v.re.to_string(), v.im.to_string()])
            .context("failed to format table row")?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ModevizError::evaluation(format!("failed to flush table: {e}")))?;

    write_atomically(path, &bytes)?;
    tracing::info!(path = %path.display(), rows = values.len(), "wrote complex table");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/spectrum/table.rs"]
mod tests;
