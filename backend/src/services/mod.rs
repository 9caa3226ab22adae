//! Business logic services for the Stock Tracker

pub mod activity;
pub mod auth;
pub mod dashboard;
pub mod inward;
pub mod item;
pub mod outward;
pub mod party;
pub mod report;
pub mod user;

pub use activity::ActivityService;
pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use inward::InwardService;
pub use item::ItemService;
pub use outward::OutwardService;
pub use party::PartyService;
pub use report::ReportService;
pub use user::UserService;

/// `ILIKE` pattern matching `term` anywhere; `None` for a blank term
pub(crate) fn like_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{}%", escaped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("bolt"), Some("%bolt%".to_string()));
        assert_eq!(like_pattern("  "), None);
        assert_eq!(like_pattern("50%_off"), Some("%50\\%\\_off%".to_string()));
    }
}
