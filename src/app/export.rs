use crate::app::table::TableView;
use crate::utils::error::Result;
use std::path::Path;

/// Writes every stored row, with the table's column names as header.
pub fn export_csv(view: &TableView, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(view.columns())?;
    for row in view.rows() {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;

    tracing::info!("📁 Exported {} rows to {}", view.rows().len(), path.display());
    Ok(view.rows().len())
}
