//! Spreadsheet export integration
//!
//! Optional: the service only works once every prerequisite variable is
//! set, and reports the missing ones otherwise. Calls cross a network
//! boundary, so they carry a bounded timeout and are never retried;
//! failures surface to the caller as `NOT_CONFIGURED`/`NOT_FOUND`.

use std::time::Duration;

use serde_json::{Value, json};

use shared::error::{AppError, AppResult};

use crate::core::SheetsConfig;

#[derive(Debug)]
pub struct SheetsService {
    config: SheetsConfig,
}

impl SheetsService {
    pub fn new(config: SheetsConfig) -> Self {
        Self { config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// All three settings, or `NOT_CONFIGURED` listing what is missing.
    fn require_configured(&self) -> AppResult<(&str, &str, &str)> {
        let missing = self.config.missing();
        if !missing.is_empty() {
            return Err(AppError::not_configured(
                "Integração de planilha não configurada",
                missing,
            ));
        }
        // just checked all three are present
        Ok((
            self.config.api_url.as_deref().unwrap_or_default(),
            self.config.spreadsheet_id.as_deref().unwrap_or_default(),
            self.config.api_token.as_deref().unwrap_or_default(),
        ))
    }

    /// Append one user's client rows to the configured spreadsheet.
    /// Returns the number of rows sent.
    pub async fn export_clients(&self, user_id: &str, rows: Vec<Value>) -> AppResult<usize> {
        let (api_url, spreadsheet_id, token) = self.require_configured()?;
        let endpoint = format!(
            "{}/spreadsheets/{}/values:append",
            api_url.trim_end_matches('/'),
            spreadsheet_id
        );
        let count = rows.len();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .build()
            .map_err(|e| AppError::internal(format!("Falha ao montar cliente HTTP: {e}")))?;

        let response = client
            .post(&endpoint)
            .bearer_auth(token)
            .json(&json!({ "user": user_id, "rows": rows }))
            .send()
            .await
            .map_err(|e| {
                AppError::not_configured(
                    format!("Serviço de planilha indisponível: {e}"),
                    Vec::new(),
                )
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!(
                "Planilha {spreadsheet_id} não encontrada"
            )));
        }
        if !status.is_success() {
            return Err(AppError::not_configured(
                format!("Serviço de planilha respondeu {status}"),
                Vec::new(),
            ));
        }

        tracing::info!(user = %user_id, rows = count, "Clients exported to spreadsheet");
        Ok(count)
    }
}
