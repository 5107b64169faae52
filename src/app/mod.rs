// Presentation layer: table view over the stored countries and CSV export.

pub mod export;
pub mod table;
