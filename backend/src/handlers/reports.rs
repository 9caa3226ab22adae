//! Report handlers (admin only)
//!
//! Every report can come back as JSON or as a download; query values are
//! parsed here so a bad one is rejected with the name of its field.

use std::str::FromStr;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use shared::{
    validate_month, validate_year, ActivityAction, ApiResponse, EntityType, LedgerRow,
    MonthPeriod, ReportFormat,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::ApiQuery;
use crate::export::{self, ExportFile};
use crate::middleware::{AuthUser, CurrentUser};
use crate::services::{ActivityService, ReportService};
use crate::AppState;

/// Raw query string shared by every report endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub include_details: Option<String>,
    pub item_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_opt<T: FromStr>(field: &str, value: &Option<String>) -> AppResult<Option<T>> {
    present(value)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| AppError::validation(field, format!("Invalid value for {}", field)))
        })
        .transpose()
}

fn parse_date(field: &str, value: &Option<String>) -> AppResult<Option<NaiveDate>> {
    present(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::validation(field, format!("{} must be a date (YYYY-MM-DD)", field))
            })
        })
        .transpose()
}

impl ReportQuery {
    fn format(&self) -> AppResult<ReportFormat> {
        ReportFormat::parse(present(&self.format)).map_err(|msg| AppError::validation("format", msg))
    }

    /// Requested month, or the current one when neither part is given
    fn period(&self) -> AppResult<MonthPeriod> {
        let today = Utc::now().date_naive();
        let month = parse_opt::<u32>("month", &self.month)?.unwrap_or(today.month());
        let year = parse_opt::<i32>("year", &self.year)?.unwrap_or(today.year());
        validate_month(month).map_err(|msg| AppError::validation("month", msg))?;
        validate_year(year).map_err(|msg| AppError::validation("year", msg))?;
        MonthPeriod::new(month, year).map_err(|msg| AppError::validation("month", msg))
    }

    fn date_range(&self) -> AppResult<(Option<NaiveDate>, Option<NaiveDate>)> {
        Ok((
            parse_date("start_date", &self.start_date)?,
            parse_date("end_date", &self.end_date)?,
        ))
    }
}

/// Log the request, plus an export entry when a file is produced
async fn record_report(state: &AppState, user: &AuthUser, report: &str, format: ReportFormat) {
    let activity = ActivityService::new(state.db.clone());
    let details = json!({ "report": report, "format": format });

    activity
        .record(user, ActivityAction::ReportGenerate, EntityType::Report, None, Some(details.clone()))
        .await;
    if format != ReportFormat::Json {
        activity
            .record(user, ActivityAction::Export, EntityType::Report, None, Some(details))
            .await;
    }
}

fn unsupported(format: ReportFormat) -> AppError {
    AppError::validation(
        "format",
        format!("Format {} is not available for this report", format.extension()),
    )
}

fn report_service(state: &AppState) -> ReportService {
    ReportService::new(state.db.clone(), &state.config.reports)
}

/// Current stock against lifetime movements per item
pub async fn stock_statement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    current_user.0.require_admin()?;
    let format = query.format()?;
    let is_active = parse_opt::<bool>("is_active", &query.is_active)?;

    let statement = report_service(&state)
        .stock_statement(present(&query.category), is_active)
        .await?;
    record_report(&state, &current_user.0, "stock-statement", format).await;

    let company = &state.config.reports.company_name;
    let response = match format {
        ReportFormat::Json => Json(ApiResponse::ok(statement)).into_response(),
        ReportFormat::Csv => {
            ExportFile::new(format, "stock-statement", export::csv::to_csv(&statement.items)?)
                .into_response()
        }
        ReportFormat::Xlsx => ExportFile::new(
            format,
            "stock-statement",
            export::excel::stock_statement(&statement, company)?,
        )
        .into_response(),
        ReportFormat::Pdf => return Err(unsupported(format)),
    };
    Ok(response)
}

/// Inward and outward totals for one month
pub async fn monthly(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    current_user.0.require_admin()?;
    let format = query.format()?;
    monthly_response(state, current_user.0, &query, format).await
}

async fn monthly_response(
    state: AppState,
    user: AuthUser,
    query: &ReportQuery,
    format: ReportFormat,
) -> AppResult<Response> {
    let period = query.period()?;
    let include_details =
        parse_opt::<bool>("include_details", &query.include_details)?.unwrap_or(false);

    let report = report_service(&state).monthly(period, include_details).await?;
    record_report(&state, &user, "monthly", format).await;

    let stem = format!("monthly-report-{}-{:02}", report.period.year, report.period.month);
    let company = &state.config.reports.company_name;
    let response = match format {
        ReportFormat::Json => Json(ApiResponse::ok(report)).into_response(),
        ReportFormat::Csv => {
            ExportFile::new(format, &stem, export::csv::to_csv(&report.item_breakdown)?)
                .into_response()
        }
        ReportFormat::Xlsx => {
            ExportFile::new(format, &stem, export::excel::monthly_report(&report, company)?)
                .into_response()
        }
        ReportFormat::Pdf => {
            ExportFile::new(format, &stem, export::pdf::monthly_report(&report, company)?)
                .into_response()
        }
    };
    Ok(response)
}

/// Movements of one item
pub async fn item_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    current_user.0.require_admin()?;
    let format = query.format()?;
    let item_id = parse_opt::<Uuid>("item_id", &query.item_id)?
        .ok_or_else(|| AppError::validation("item_id", "item_id is required"))?;
    let (start_date, end_date) = query.date_range()?;
    let limit = parse_opt::<u32>("limit", &query.limit)?;

    let history = report_service(&state)
        .item_history(item_id, start_date, end_date, limit)
        .await?;
    record_report(&state, &current_user.0, "item-history", format).await;

    let company = &state.config.reports.company_name;
    let response = match format {
        ReportFormat::Json => Json(ApiResponse::ok(history)).into_response(),
        ReportFormat::Csv => {
            let rows: Vec<LedgerRow> = history
                .all_transactions
                .iter()
                .map(|entry| entry.to_ledger_row())
                .collect();
            ExportFile::new(format, "item-history", export::csv::to_csv(&rows)?).into_response()
        }
        ReportFormat::Xlsx => ExportFile::new(
            format,
            "item-history",
            export::excel::item_history(&history, company)?,
        )
        .into_response(),
        ReportFormat::Pdf => return Err(unsupported(format)),
    };
    Ok(response)
}

/// Inward totals per supplier
pub async fn supplier_performance(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    current_user.0.require_admin()?;
    let format = query.format()?;
    let (start_date, end_date) = query.date_range()?;

    let rows = report_service(&state)
        .supplier_performance(start_date, end_date)
        .await?;
    record_report(&state, &current_user.0, "supplier-performance", format).await;

    let company = &state.config.reports.company_name;
    let response = match format {
        ReportFormat::Json => Json(ApiResponse::ok(rows)).into_response(),
        ReportFormat::Csv => {
            ExportFile::new(format, "supplier-performance", export::csv::to_csv(&rows)?)
                .into_response()
        }
        ReportFormat::Xlsx => ExportFile::new(
            format,
            "supplier-performance",
            export::excel::supplier_performance(&rows, company)?,
        )
        .into_response(),
        ReportFormat::Pdf => return Err(unsupported(format)),
    };
    Ok(response)
}

/// Outward totals and rejection rates per customer
pub async fn customer_performance(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    current_user.0.require_admin()?;
    let format = query.format()?;
    let (start_date, end_date) = query.date_range()?;

    let rows = report_service(&state)
        .customer_performance(start_date, end_date)
        .await?;
    record_report(&state, &current_user.0, "customer-performance", format).await;

    let company = &state.config.reports.company_name;
    let response = match format {
        ReportFormat::Json => Json(ApiResponse::ok(rows)).into_response(),
        ReportFormat::Csv => {
            ExportFile::new(format, "customer-performance", export::csv::to_csv(&rows)?)
                .into_response()
        }
        ReportFormat::Xlsx => ExportFile::new(
            format,
            "customer-performance",
            export::excel::customer_performance(&rows, company)?,
        )
        .into_response(),
        ReportFormat::Pdf => return Err(unsupported(format)),
    };
    Ok(response)
}

/// Monthly report as a spreadsheet download
pub async fn export_excel(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    current_user.0.require_admin()?;
    monthly_response(state, current_user.0, &query, ReportFormat::Xlsx).await
}

/// Monthly report as a PDF download
pub async fn export_pdf(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    current_user.0.require_admin()?;
    monthly_response(state, current_user.0, &query, ReportFormat::Pdf).await
}
