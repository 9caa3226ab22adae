//! PDF rendering of the monthly report

use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use rust_decimal::Decimal;
use shared::MonthlyReport;

use crate::error::{AppError, AppResult};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 6.0;

/// Breakdown table columns as (header, x offset in mm)
const BREAKDOWN_COLUMNS: [(&str, f32); 8] = [
    ("Item", 0.0),
    ("Category", 48.0),
    ("Total", 80.0),
    ("OK", 98.0),
    ("CR", 114.0),
    ("MR", 130.0),
    ("As Cast", 146.0),
    ("Rej %", 166.0),
];

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::Export(format!("PDF: {}", e))
}

/// Top-to-bottom text cursor that starts a new page when it runs out of room
struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl PdfWriter {
    fn new(title: &str) -> AppResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn ensure_room(&mut self, lines: f32) {
        if self.y - lines * LINE_HEIGHT >= MARGIN {
            return;
        }
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Layer {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn text_at(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size, Mm(MARGIN + x), Mm(self.y), font);
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        self.ensure_room(1.0);
        self.text_at(text, size, 0.0, bold);
        self.y -= LINE_HEIGHT * (size / 10.0).max(1.0);
    }

    fn label_value(&mut self, label: &str, value: String) {
        self.ensure_room(1.0);
        self.text_at(label, 10.0, 5.0, false);
        self.text_at(&value, 10.0, 70.0, true);
        self.y -= LINE_HEIGHT;
    }

    fn row(&mut self, cells: &[String], bold: bool) {
        self.ensure_room(1.0);
        for ((_, x), cell) in BREAKDOWN_COLUMNS.iter().zip(cells) {
            self.text_at(cell, 8.0, *x, bold);
        }
        self.y -= LINE_HEIGHT;
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT / 2.0;
    }

    fn finish(self) -> AppResult<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn amount(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('.');
        cut
    }
}

/// A4 monthly summary: inward, outward and per-item breakdown
pub fn monthly_report(report: &MonthlyReport, company: &str) -> AppResult<Vec<u8>> {
    let title = format!("Monthly Report - {}", report.period.title());
    let mut pdf = PdfWriter::new(&title)?;
    let (inward, outward) = (&report.inward, &report.outward);

    pdf.line(company, 12.0, true);
    pdf.line(&title.to_uppercase(), 16.0, true);
    pdf.line(
        &format!(
            "Period: {} to {} | Generated on: {}",
            report.period.start_date.format("%d-%m-%Y"),
            report.period.end_date.format("%d-%m-%Y"),
            Utc::now().date_naive().format("%d-%m-%Y")
        ),
        9.0,
        false,
    );
    pdf.gap();

    pdf.line("INWARD SUMMARY", 12.0, true);
    pdf.label_value("Total Entries", inward.total_entries.to_string());
    pdf.label_value("Total Quantity", amount(inward.total_quantity));
    pdf.label_value("Total Amount", amount(inward.total_amount));
    pdf.label_value("Unique Suppliers", inward.supplier_count.to_string());
    pdf.label_value("Unique Items", inward.item_count.to_string());
    pdf.gap();

    pdf.line("OUTWARD SUMMARY", 12.0, true);
    pdf.label_value("Total Entries", outward.total_entries.to_string());
    pdf.label_value("Total Quantity", amount(outward.total_quantity));
    pdf.label_value("OK Quantity", amount(outward.total_ok_qty));
    pdf.label_value("CR Quantity", amount(outward.total_cr_qty));
    pdf.label_value("MR Quantity", amount(outward.total_mr_qty));
    pdf.label_value("As Cast Quantity", amount(outward.total_as_cast_qty));
    pdf.label_value("Total Amount", amount(outward.total_amount));
    pdf.label_value("Unique Customers", outward.customer_count.to_string());
    pdf.label_value("Rejection Rate %", amount(outward.rejection_rate()));
    pdf.gap();

    pdf.line("ITEM-WISE BREAKDOWN", 12.0, true);
    if report.item_breakdown.is_empty() {
        pdf.line("No outward entries in this period", 9.0, false);
    } else {
        let headers: Vec<String> = BREAKDOWN_COLUMNS.iter().map(|(h, _)| h.to_string()).collect();
        pdf.row(&headers, true);
        for row in &report.item_breakdown {
            pdf.row(
                &[
                    truncate(&row.item_name, 28),
                    truncate(&row.item_category, 18),
                    amount(row.total_quantity),
                    amount(row.total_ok_qty),
                    amount(row.total_cr_qty),
                    amount(row.total_mr_qty),
                    amount(row.total_as_cast_qty),
                    amount(shared::round2(row.rejection_rate)),
                ],
                false,
            );
        }
    }

    tracing::debug!(pages = pdf.pages, "Monthly PDF rendered");
    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{InwardMonthSummary, ItemBreakdownRow, MonthPeriod, OutwardMonthSummary};

    fn empty_report() -> MonthlyReport {
        MonthlyReport {
            period: MonthPeriod::new(11, 2024).unwrap(),
            inward: InwardMonthSummary::default(),
            outward: OutwardMonthSummary::default(),
            item_breakdown: vec![],
            detailed_inward: None,
            detailed_outward: None,
        }
    }

    #[test]
    fn test_monthly_pdf_has_pdf_header() {
        let bytes = monthly_report(&empty_report(), "Test Foundry").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_writer_starts_new_pages() {
        let mut pdf = PdfWriter::new("Pages").unwrap();
        for n in 0..60 {
            pdf.line(&format!("Line {}", n), 10.0, false);
        }
        assert_eq!(pdf.pages, 2);
        assert!(pdf.y >= MARGIN);
    }

    #[test]
    fn test_long_breakdown_spans_pages() {
        let mut report = empty_report();
        report.item_breakdown = (0..120)
            .map(|n| ItemBreakdownRow {
                item_id: uuid::Uuid::new_v4(),
                item_name: format!("Casting {}", n),
                item_category: "Castings".into(),
                item_unit: "pcs".into(),
                total_quantity: Decimal::from(10),
                total_ok_qty: Decimal::from(9),
                total_cr_qty: Decimal::ONE,
                total_mr_qty: Decimal::ZERO,
                total_as_cast_qty: Decimal::ZERO,
                total_amount: Decimal::ZERO,
                entry_count: 1,
                rejection_rate: Decimal::from(10),
            })
            .collect();
        let short = monthly_report(&empty_report(), "Test Foundry").unwrap();
        let long = monthly_report(&report, "Test Foundry").unwrap();
        assert!(long.starts_with(b"%PDF"));
        assert!(long.len() > short.len());
        assert!(long.windows(9).any(|w| w == b"Helvetica"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Flange", 10), "Flange");
        assert_eq!(truncate("Very long casting name", 8), "Very lo.");
    }
}
