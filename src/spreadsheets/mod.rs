pub mod export_xlsx;

pub use export_xlsx::{deals_workbook, export_deals_xlsx};
