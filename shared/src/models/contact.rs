//! Post-sale contact model (contato)
//!
//! A contact is a scheduled follow-up tied to a purchase. Its status is
//! derived, never stored: the same pure function serves the API decorator
//! and anything else that needs it, so the precedence lives in one place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accepted spellings of the completed flag on incoming/outgoing payloads.
pub const COMPLETED_ALIASES: &[&str] = &["realizado", "completed", "concluido", "done", "feito"];

/// Contact as stored. Scalar columns only, maps via `FromRow`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Contact {
    pub id: i64,
    pub compra_id: i64,
    pub cliente_id: i64,
    /// Scheduled follow-up date, YYYY-MM-DD
    pub data_contato: String,
    /// Date of the originating purchase
    pub data_compra: Option<String>,
    /// Month offset from the purchase ("3-month check-in")
    pub meses: Option<i64>,
    pub realizado: bool,
    /// Completion timestamp (millis), set when `realizado` flips to true
    pub realizado_em: Option<i64>,
    pub criado_em: i64,
    pub atualizado_em: i64,
}

/// Derived follow-up status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Completed,
    Overdue,
    Pending,
}

impl ContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::Pending => "pending",
        }
    }

    /// Label shown by the SPA
    pub fn label_pt(self) -> &'static str {
        match self {
            Self::Completed => "Realizado",
            Self::Overdue => "Atrasado",
            Self::Pending => "Pendente",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "completed" => Some(Self::Completed),
            "overdue" => Some(Self::Overdue),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Derive a contact's status.
///
/// Precedence: explicit status field > completed flag > date comparison >
/// `pending`. Overdue iff not completed and the contact date is strictly
/// before today. An unparseable date never makes a contact overdue.
pub fn derive_status(
    explicit: Option<&str>,
    realizado: bool,
    data_contato: Option<&str>,
    today: NaiveDate,
) -> ContactStatus {
    if let Some(raw) = explicit
        && let Some(status) = ContactStatus::parse(raw)
    {
        return status;
    }
    if realizado {
        return ContactStatus::Completed;
    }
    if let Some(raw) = data_contato
        && let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && date < today
    {
        return ContactStatus::Overdue;
    }
    ContactStatus::Pending
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn completed_flag_wins_over_date() {
        let today = day("2024-06-15");
        assert_eq!(
            derive_status(None, true, Some("2024-01-01"), today),
            ContactStatus::Completed
        );
    }

    #[test]
    fn overdue_iff_past_and_not_completed() {
        let today = day("2024-06-15");
        assert_eq!(
            derive_status(None, false, Some("2024-06-14"), today),
            ContactStatus::Overdue
        );
        // today itself is not overdue
        assert_eq!(
            derive_status(None, false, Some("2024-06-15"), today),
            ContactStatus::Pending
        );
        assert_eq!(
            derive_status(None, false, Some("2024-07-01"), today),
            ContactStatus::Pending
        );
    }

    #[test]
    fn explicit_status_field_has_highest_precedence() {
        let today = day("2024-06-15");
        assert_eq!(
            derive_status(Some("overdue"), true, Some("2099-01-01"), today),
            ContactStatus::Overdue
        );
        // unknown explicit value falls through to the flag
        assert_eq!(
            derive_status(Some("???"), true, None, today),
            ContactStatus::Completed
        );
    }

    #[test]
    fn missing_or_invalid_date_defaults_to_pending() {
        let today = day("2024-06-15");
        assert_eq!(derive_status(None, false, None, today), ContactStatus::Pending);
        assert_eq!(
            derive_status(None, false, Some("15/06/2024"), today),
            ContactStatus::Pending
        );
    }
}
