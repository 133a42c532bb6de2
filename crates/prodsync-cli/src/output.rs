use prodsync_core::{ProductRecord, CSV_COLUMNS};

pub fn render_json(records: &[ProductRecord]) -> anyhow::Result<String> {
    let mut body = serde_json::to_string_pretty(records)?;
    body.push('\n');
    Ok(body)
}

pub fn render_csv(records: &[ProductRecord]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.write_record(record.csv_record())?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
