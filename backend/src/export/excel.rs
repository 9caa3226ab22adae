//! Spreadsheet rendering of reports
//!
//! One worksheet per report. Title merged across the table, blue header
//! row, thin borders, `#,##0.00` numbers, `dd-mm-yyyy` dates, low-stock
//! rows tinted red.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_xlsxwriter::{
    Color, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};
use shared::{
    CustomerPerformanceRow, ItemHistory, MonthlyReport, StockStatement, SupplierPerformanceRow,
};

use crate::error::{AppError, AppResult};

const HEADER_BLUE: u32 = 0x366092;
const LOW_STOCK_RED: u32 = 0xFFE6E6;
const SECTION_LAVENDER: u32 = 0xE6E6FA;
const MIN_COLUMN_WIDTH: f64 = 15.0;
const DATE_FORMAT: &str = "%d-%m-%Y";
const DATE_NUM_FORMAT: &str = "dd-mm-yyyy";

/// A value to place in one cell
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
    Blank,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn opt_text(value: Option<&str>) -> Self {
        value.map(Cell::text).unwrap_or(Cell::Blank)
    }

    fn opt_number(value: Option<Decimal>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Blank)
    }

    fn count(value: impl Into<Decimal>) -> Self {
        Cell::Number(value.into())
    }
}

struct Styles {
    title: Format,
    subtitle: Format,
    section: Format,
    header: Format,
    data: Format,
    number: Format,
    date: Format,
}

impl Styles {
    fn new(bold: bool, fill: Option<u32>) -> Self {
        let mut data = Format::new()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::VerticalCenter);
        if bold {
            data = data.set_bold();
        }
        if let Some(rgb) = fill {
            data = data.set_background_color(Color::RGB(rgb));
        }

        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_align(FormatAlign::Center),
            subtitle: Format::new().set_italic().set_align(FormatAlign::Center),
            section: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_background_color(Color::RGB(SECTION_LAVENDER)),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_BLUE))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin),
            number: data.clone().set_num_format("#,##0.00"),
            date: data
                .clone()
                .set_align(FormatAlign::Center)
                .set_num_format(DATE_NUM_FORMAT),
            data,
        }
    }
}

/// Cursor over one worksheet
struct SheetWriter<'a> {
    ws: &'a mut Worksheet,
    plain: Styles,
    bold: Styles,
    low: Styles,
    row: u32,
    width: u16,
}

impl<'a> SheetWriter<'a> {
    fn new(ws: &'a mut Worksheet, name: &str, width: u16) -> Result<Self, XlsxError> {
        ws.set_name(name)?;
        Ok(Self {
            ws,
            plain: Styles::new(false, None),
            bold: Styles::new(true, None),
            low: Styles::new(false, Some(LOW_STOCK_RED)),
            row: 0,
            width,
        })
    }

    fn last_col(&self) -> u16 {
        self.width.saturating_sub(1)
    }

    fn title(&mut self, text: &str) -> Result<(), XlsxError> {
        let last = self.last_col();
        self.ws
            .merge_range(self.row, 0, self.row, last, text, &self.plain.title)?;
        self.row += 2;
        Ok(())
    }

    fn subtitle(&mut self, text: &str) -> Result<(), XlsxError> {
        let last = self.last_col();
        self.ws
            .merge_range(self.row, 0, self.row, last, text, &self.plain.subtitle)?;
        self.row += 2;
        Ok(())
    }

    fn section(&mut self, text: &str) -> Result<(), XlsxError> {
        self.ws
            .write_string_with_format(self.row, 0, text, &self.plain.section)?;
        self.row += 1;
        Ok(())
    }

    fn header(&mut self, headers: &[&str]) -> Result<(), XlsxError> {
        for (col, header) in headers.iter().enumerate() {
            self.ws
                .write_string_with_format(self.row, col as u16, *header, &self.plain.header)?;
        }
        self.row += 1;
        Ok(())
    }

    fn label_value(&mut self, label: &str, value: Cell) -> Result<(), XlsxError> {
        self.cells(&[Cell::text(label), value], &Look::Plain)
    }

    fn cells(&mut self, cells: &[Cell], look: &Look) -> Result<(), XlsxError> {
        let styles = match look {
            Look::Plain => &self.plain,
            Look::Bold => &self.bold,
            Look::LowStock => &self.low,
        };
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => {
                    self.ws
                        .write_string_with_format(self.row, col, text, &styles.data)?;
                }
                Cell::Number(value) => {
                    self.ws.write_number_with_format(
                        self.row,
                        col,
                        value.to_f64().unwrap_or_default(),
                        &styles.number,
                    )?;
                }
                Cell::Date(date) => {
                    let serial = ExcelDateTime::from_ymd(
                        date.year() as u16,
                        date.month() as u8,
                        date.day() as u8,
                    )?;
                    self.ws
                        .write_datetime_with_format(self.row, col, &serial, &styles.date)?;
                }
                Cell::Blank => {
                    self.ws.write_blank(self.row, col, &styles.data)?;
                }
            }
        }
        self.row += 1;
        Ok(())
    }

    fn skip(&mut self) {
        self.row += 1;
    }

    fn finish(self) -> Result<(), XlsxError> {
        for col in 0..self.width {
            self.ws.set_column_width(col, MIN_COLUMN_WIDTH)?;
        }
        Ok(())
    }
}

enum Look {
    Plain,
    Bold,
    LowStock,
}

fn generated_line(company: &str) -> String {
    format!(
        "{} | Generated on: {}",
        company,
        Utc::now().date_naive().format(DATE_FORMAT)
    )
}

fn render<F>(build: F) -> AppResult<Vec<u8>>
where
    F: FnOnce(&mut Workbook) -> Result<(), XlsxError>,
{
    let mut workbook = Workbook::new();
    build(&mut workbook)
        .and_then(|_| workbook.save_to_buffer())
        .map_err(|e| AppError::Export(format!("Excel: {}", e)))
}

/// "Stock Statement" sheet with a TOTAL row
pub fn stock_statement(statement: &StockStatement, company: &str) -> AppResult<Vec<u8>> {
    render(|workbook| {
        let mut sheet = SheetWriter::new(workbook.add_worksheet(), "Stock Statement", 12)?;
        let summary = &statement.summary;

        sheet.title("CURRENT STOCK STATEMENT")?;
        sheet.subtitle(&format!(
            "{} | Total Items: {} | Low Stock Items: {}",
            generated_line(company),
            summary.total_items,
            summary.low_stock_items
        ))?;
        sheet.header(&[
            "S.No",
            "Item Name",
            "Category",
            "Unit",
            "Current Stock",
            "Min Stock",
            "Total Inward",
            "Total Outward",
            "OK Qty",
            "CR Qty",
            "MR Qty",
            "As Cast Qty",
        ])?;

        for (index, item) in statement.items.iter().enumerate() {
            let look = if item.is_low_stock {
                Look::LowStock
            } else {
                Look::Plain
            };
            sheet.cells(
                &[
                    Cell::count(index as u64 + 1),
                    Cell::text(&item.name),
                    Cell::text(&item.category),
                    Cell::text(&item.unit),
                    Cell::Number(item.current_stock),
                    Cell::Number(item.minimum_stock),
                    Cell::Number(item.total_inward),
                    Cell::Number(item.total_outward),
                    Cell::Number(item.total_ok_qty),
                    Cell::Number(item.total_cr_qty),
                    Cell::Number(item.total_mr_qty),
                    Cell::Number(item.total_as_cast_qty),
                ],
                &look,
            )?;
        }

        sheet.cells(
            &[
                Cell::text("TOTAL"),
                Cell::Blank,
                Cell::Blank,
                Cell::Blank,
                Cell::Number(summary.total_current_stock),
                Cell::Blank,
                Cell::Number(summary.total_inward),
                Cell::Number(summary.total_outward),
                Cell::Number(summary.total_ok_qty),
                Cell::Number(summary.total_cr_qty),
                Cell::Number(summary.total_mr_qty),
                Cell::Number(summary.total_as_cast_qty),
            ],
            &Look::Bold,
        )?;

        sheet.finish()
    })
}

/// "Monthly Report" sheet: inward and outward summaries then item breakdown
pub fn monthly_report(report: &MonthlyReport, company: &str) -> AppResult<Vec<u8>> {
    render(|workbook| {
        let mut sheet = SheetWriter::new(workbook.add_worksheet(), "Monthly Report", 9)?;
        let (inward, outward) = (&report.inward, &report.outward);

        sheet.title(&format!("MONTHLY REPORT - {}", report.period.title().to_uppercase()))?;
        sheet.subtitle(&generated_line(company))?;
        sheet.section("SUMMARY")?;

        sheet.section("INWARD SUMMARY")?;
        sheet.label_value("Total Entries", Cell::count(inward.total_entries))?;
        sheet.label_value("Total Quantity", Cell::Number(inward.total_quantity))?;
        sheet.label_value("Total Amount", Cell::Number(inward.total_amount))?;
        sheet.label_value("Unique Suppliers", Cell::count(inward.supplier_count))?;
        sheet.label_value("Unique Items", Cell::count(inward.item_count))?;
        sheet.skip();

        sheet.section("OUTWARD SUMMARY")?;
        sheet.label_value("Total Entries", Cell::count(outward.total_entries))?;
        sheet.label_value("Total Quantity", Cell::Number(outward.total_quantity))?;
        sheet.label_value("OK Quantity", Cell::Number(outward.total_ok_qty))?;
        sheet.label_value("CR Quantity", Cell::Number(outward.total_cr_qty))?;
        sheet.label_value("MR Quantity", Cell::Number(outward.total_mr_qty))?;
        sheet.label_value("As Cast Quantity", Cell::Number(outward.total_as_cast_qty))?;
        sheet.label_value("Total Amount", Cell::Number(outward.total_amount))?;
        sheet.label_value("Unique Customers", Cell::count(outward.customer_count))?;
        sheet.label_value("Rejection Rate %", Cell::Number(outward.rejection_rate()))?;
        sheet.skip();

        sheet.section("ITEM-WISE BREAKDOWN")?;
        sheet.header(&[
            "Item Name",
            "Category",
            "Unit",
            "Total Qty",
            "OK Qty",
            "CR Qty",
            "MR Qty",
            "As Cast Qty",
            "Rejection Rate %",
        ])?;
        for row in &report.item_breakdown {
            sheet.cells(
                &[
                    Cell::text(&row.item_name),
                    Cell::text(&row.item_category),
                    Cell::text(&row.item_unit),
                    Cell::Number(row.total_quantity),
                    Cell::Number(row.total_ok_qty),
                    Cell::Number(row.total_cr_qty),
                    Cell::Number(row.total_mr_qty),
                    Cell::Number(row.total_as_cast_qty),
                    Cell::Number(shared::round2(row.rejection_rate)),
                ],
                &Look::Plain,
            )?;
        }

        sheet.finish()
    })
}

/// "Item History" sheet: item details then both transaction tables
pub fn item_history(history: &ItemHistory, company: &str) -> AppResult<Vec<u8>> {
    render(|workbook| {
        let mut sheet = SheetWriter::new(workbook.add_worksheet(), "Item History", 10)?;
        let item = &history.item;

        sheet.title(&format!("ITEM HISTORY - {}", item.name))?;
        sheet.subtitle(&generated_line(company))?;

        sheet.section("Item Details")?;
        sheet.label_value("Name", Cell::text(&item.name))?;
        sheet.label_value("Category", Cell::text(&item.category))?;
        sheet.label_value("Unit", Cell::text(&item.unit))?;
        sheet.label_value("Current Stock", Cell::Number(item.current_stock))?;
        sheet.label_value("Minimum Stock", Cell::Number(item.minimum_stock))?;
        sheet.skip();

        sheet.section("INWARD TRANSACTIONS")?;
        sheet.header(&["Date", "Challan No", "Supplier", "Quantity", "Rate", "Amount", "Remarks"])?;
        for tx in &history.inward_transactions {
            sheet.cells(
                &[
                    Cell::Date(tx.date),
                    Cell::text(&tx.challan_no),
                    Cell::text(&tx.supplier_name),
                    Cell::Number(tx.quantity_received),
                    Cell::opt_number(tx.rate),
                    Cell::opt_number(tx.total_amount),
                    Cell::opt_text(tx.remarks.as_deref()),
                ],
                &Look::Plain,
            )?;
        }
        sheet.skip();

        sheet.section("OUTWARD TRANSACTIONS")?;
        sheet.header(&[
            "Date",
            "Challan No",
            "Customer",
            "OK Qty",
            "CR Qty",
            "MR Qty",
            "As Cast Qty",
            "Total Qty",
            "Rate",
            "Amount",
        ])?;
        for tx in &history.outward_transactions {
            sheet.cells(
                &[
                    Cell::Date(tx.date),
                    Cell::text(&tx.challan_no),
                    Cell::text(&tx.customer_name),
                    Cell::Number(tx.ok_qty),
                    Cell::Number(tx.cr_qty),
                    Cell::Number(tx.mr_qty),
                    Cell::Number(tx.as_cast_qty),
                    Cell::Number(tx.total_qty),
                    Cell::opt_number(tx.rate),
                    Cell::opt_number(tx.total_amount),
                ],
                &Look::Plain,
            )?;
        }

        sheet.finish()
    })
}

/// "Supplier Performance" sheet
pub fn supplier_performance(rows: &[SupplierPerformanceRow], company: &str) -> AppResult<Vec<u8>> {
    render(|workbook| {
        let mut sheet = SheetWriter::new(workbook.add_worksheet(), "Supplier Performance", 9)?;
        sheet.title("SUPPLIER PERFORMANCE")?;
        sheet.subtitle(&generated_line(company))?;
        sheet.header(&[
            "Supplier",
            "Contact",
            "Transactions",
            "Total Qty",
            "Total Amount",
            "Avg Qty",
            "Avg Amount",
            "First",
            "Last",
        ])?;
        for row in rows {
            sheet.cells(
                &[
                    Cell::text(&row.supplier_name),
                    Cell::opt_text(row.supplier_contact.as_deref()),
                    Cell::count(row.total_transactions),
                    Cell::Number(row.total_quantity),
                    Cell::Number(row.total_amount),
                    Cell::Number(row.average_quantity),
                    Cell::Number(row.average_amount),
                    Cell::Date(row.first_transaction),
                    Cell::Date(row.last_transaction),
                ],
                &Look::Plain,
            )?;
        }
        sheet.finish()
    })
}

/// "Customer Performance" sheet
pub fn customer_performance(rows: &[CustomerPerformanceRow], company: &str) -> AppResult<Vec<u8>> {
    render(|workbook| {
        let mut sheet = SheetWriter::new(workbook.add_worksheet(), "Customer Performance", 12)?;
        sheet.title("CUSTOMER PERFORMANCE")?;
        sheet.subtitle(&generated_line(company))?;
        sheet.header(&[
            "Customer",
            "Contact",
            "Transactions",
            "Total Qty",
            "OK Qty",
            "CR Qty",
            "MR Qty",
            "As Cast Qty",
            "Total Amount",
            "Rejection Rate %",
            "First",
            "Last",
        ])?;
        for row in rows {
            sheet.cells(
                &[
                    Cell::text(&row.customer_name),
                    Cell::opt_text(row.customer_contact.as_deref()),
                    Cell::count(row.total_transactions),
                    Cell::Number(row.total_quantity),
                    Cell::Number(row.total_ok_qty),
                    Cell::Number(row.total_cr_qty),
                    Cell::Number(row.total_mr_qty),
                    Cell::Number(row.total_as_cast_qty),
                    Cell::Number(row.total_amount),
                    Cell::Number(row.rejection_rate),
                    Cell::Date(row.first_transaction),
                    Cell::Date(row.last_transaction),
                ],
                &Look::Plain,
            )?;
        }
        sheet.finish()
    })
}
