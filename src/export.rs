use crate::error::Result;
use std::io::Write;

/// Write `values` as CSV. Rows shorter than the widest row are padded with
/// empty fields so every record has the same length.
pub fn write_csv<W: Write>(values: &[Vec<String>], writer: W) -> Result<()> {
    let width = values.iter().map(Vec::len).max().unwrap_or(0);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for row in values {
        let padding = std::iter::repeat_n("", width - row.len());
        writer.write_record(row.iter().map(String::as_str).chain(padding))?;
    }

    writer.flush()?;
    Ok(())
}
