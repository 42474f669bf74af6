//! CSV result tables: a labelled index column plus named value columns.

use std::path::Path;

use super::PostError;

pub fn write_table(
    path: &Path,
    index_label: &str,
    columns: &[String],
    rows: &[(String, Vec<f64>)],
) -> Result<(), PostError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push(index_label.to_string());
    header.extend(columns.iter().cloned());
    writer.write_record(&header)?;

    for (label, values) in rows {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(label.clone());
        record.extend(values.iter().map(|value| value.to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
