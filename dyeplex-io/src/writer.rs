//! CSV export of presented crosstalk tables.

use crate::{Error, Result};
use dyeplex_core::{Dye, Filter};
use dyeplex_engine::PresentedMatrix;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header of the corner cell.
const CORNER: &str = "Dye \\ Filter";

/// Writer for presented crosstalk tables.
pub struct TableWriter {
    writer: BufWriter<File>,
}

impl TableWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Writes the table as CSV and flushes.
    ///
    /// # Errors
    /// See [`write_table_csv`].
    pub fn write_csv(
        &mut self,
        dyes: &[Dye],
        columns: &[Filter],
        presented: &PresentedMatrix,
    ) -> Result<()> {
        write_table_csv(&mut self.writer, dyes, columns, presented)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes a presented table as CSV.
///
/// `columns` are the matrix columns in original order; the header follows
/// `presented.columns`. One row per dye with its row sum, then a `Col Sum`
/// row ending in the grand total.
///
/// # Errors
/// Returns an error if the dyes do not match the table rows or a column
/// index is out of range, or on write failure.
pub fn write_table_csv<W: Write>(
    mut out: W,
    dyes: &[Dye],
    columns: &[Filter],
    presented: &PresentedMatrix,
) -> Result<()> {
    if dyes.len() != presented.ordered.len() {
        return Err(Error::InvalidFormat(format!(
            "{} dyes for {} table rows",
            dyes.len(),
            presented.ordered.len()
        )));
    }

    let mut header = vec![field(CORNER)];
    for &column in &presented.columns {
        let filter = columns.get(column).ok_or_else(|| {
            Error::InvalidFormat(format!("column {column} out of range ({})", columns.len()))
        })?;
        header.push(field(&filter.name));
    }
    header.push("Row Sum".to_string());
    writeln!(out, "{}", header.join(","))?;

    for ((dye, row), row_sum) in dyes.iter().zip(&presented.ordered).zip(&presented.row_sums) {
        let cells: Vec<String> = row.iter().map(f64::to_string).collect();
        writeln!(out, "{},{},{}", field(&dye.name), cells.join(","), row_sum)?;
    }

    let sums: Vec<String> = presented.col_sums.iter().map(f64::to_string).collect();
    writeln!(out, "Col Sum,{},{}", sums.join(","), presented.total)?;
    Ok(())
}

fn field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyeplex_core::{CrosstalkMatrix, FilterKind, FilterOrder, SpectralCurve};
    use dyeplex_engine::{reorder_and_normalize, NormalizationMode};
    use tempfile::NamedTempFile;

    fn filter(name: &str) -> Filter {
        Filter::new(name, name, SpectralCurve::empty(), FilterKind::Emission)
    }

    #[test]
    fn test_write_table_csv() {
        let dyes = vec![Dye::new("fam", "FAM"), Dye::new("hex", "HEX, 2")];
        let columns = vec![filter("m1"), filter("m2")];
        let matrix = CrosstalkMatrix::from_rows(vec![vec![4.0, 1.0], vec![2.0, 2.0]]);
        let presented = reorder_and_normalize(
            &matrix,
            &FilterOrder::from_indices(vec![1, 0]).unwrap(),
            NormalizationMode::Global,
        );

        let mut out = Vec::new();
        write_table_csv(&mut out, &dyes, &columns, &presented).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Dye \\ Filter,m2,m1,Row Sum");
        assert_eq!(lines[1], "FAM,0.25,1,1.25");
        assert_eq!(lines[2], "\"HEX, 2\",0.5,0.5,1");
        assert_eq!(lines[3], "Col Sum,0.75,1.5,2.25");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_row_mismatch_is_rejected() {
        let matrix = CrosstalkMatrix::from_rows(vec![vec![1.0]]);
        let presented =
            reorder_and_normalize(&matrix, &FilterOrder::identity(1), NormalizationMode::Global);
        let result = write_table_csv(Vec::new(), &[], &[filter("m1")], &presented);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_table_writer_file() {
        let file = NamedTempFile::new().unwrap();
        let matrix = CrosstalkMatrix::from_rows(vec![vec![2.0]]);
        let presented =
            reorder_and_normalize(&matrix, &FilterOrder::identity(1), NormalizationMode::PerColumn);

        let mut writer = TableWriter::create(file.path()).unwrap();
        writer
            .write_csv(&[Dye::new("fam", "FAM")], &[filter("m1")], &presented)
            .unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with("Dye \\ Filter,m1,Row Sum\n"));
        assert!(content.ends_with("Col Sum,1,1\n"));
    }
}
