use crate::domain::commission::CommissionCalculator;
use crate::domain::deal::Deal;
use crate::errors::{ResultResp, ServerError};
use crate::responses::xlsx_response;
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

const HEADERS: [&str; 10] = [
    "Address",
    "Status",
    "Listing Price",
    "Commission Rate (%)",
    "My Share (%)",
    "Est. Commission",
    "Est. Close",
    "Actual Close",
    "Paid",
    "Notes",
];

fn xlsx_err(what: &str) -> impl Fn(XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

fn iso(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// One row per deal, in the order given. Dates are ISO text so the sheet
/// sorts the same way the store does.
pub fn deals_workbook(deals: &[Deal], calc: &CommissionCalculator) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let money = Format::new().set_num_format("$#,##0");
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(xlsx_err(header))?;
    }

    for (i, deal) in deals.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, &deal.address)
            .map_err(xlsx_err("address"))?;
        worksheet
            .write_string(r, 1, deal.status.as_str())
            .map_err(xlsx_err("status"))?;
        worksheet
            .write_number_with_format(r, 2, deal.listing_price, &money)
            .map_err(xlsx_err("listing price"))?;
        worksheet
            .write_number(r, 3, deal.commission_rate)
            .map_err(xlsx_err("commission rate"))?;
        worksheet
            .write_number(r, 4, deal.my_share)
            .map_err(xlsx_err("share"))?;
        worksheet
            .write_number_with_format(r, 5, deal.commission(calc), &money)
            .map_err(xlsx_err("commission"))?;
        worksheet
            .write_string(r, 6, iso(deal.estimated_close_date))
            .map_err(xlsx_err("estimated close"))?;
        worksheet
            .write_string(r, 7, iso(deal.status.actual_close_date()))
            .map_err(xlsx_err("actual close"))?;
        worksheet
            .write_string(r, 8, iso(deal.status.paid_date()))
            .map_err(xlsx_err("paid date"))?;
        worksheet
            .write_string(r, 9, deal.notes.as_deref().unwrap_or(""))
            .map_err(xlsx_err("notes"))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_deals_xlsx(deals: &[Deal], calc: &CommissionCalculator, date: NaiveDate) -> ResultResp {
    let buffer = deals_workbook(deals, calc)?;
    xlsx_response(buffer, &format!("pipeline_{}.xlsx", date.format("%Y-%m-%d")))
}
