use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use crate::error::AppError;
use crate::parser::types::ParseWarning;
use crate::source::Fonte;
use crate::state::{AppState, Dataset, DatasetAccess};

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "data")]
pub enum ImportEvent {
    #[serde(rename_all = "camelCase")]
    Started { origem: String },
    #[serde(rename_all = "camelCase")]
    Complete {
        duration_ms: u64,
        total_tickets: usize,
        abertos: usize,
        encerrados: usize,
    },
    #[serde(rename_all = "camelCase")]
    Warning { line: usize, message: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub origem: String,
    pub total_tickets: usize,
    pub abertos: usize,
    pub encerrados: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<ParseWarning>,
    pub detected_columns: Vec<String>,
    pub missing_fields: Vec<String>,
    pub unique_status: Vec<String>,
    pub fetch_duration_ms: u64,
    pub parse_duration_ms: u64,
}

/// One ingestion cycle: fetch, parse, then replace the working set.
///
/// On failure the previously loaded dataset is left untouched.
pub async fn refresh_tickets(
    state: &AppState,
    fonte: &Fonte,
    delimiter: u8,
    on_event: impl Fn(ImportEvent),
) -> Result<ImportResult, AppError> {
    let start = Instant::now();
    let origem = fonte.descricao();
    on_event(ImportEvent::Started {
        origem: origem.clone(),
    });

    let carga = fonte.carregar(delimiter).await?;
    let parsed = carga.parsed;

    for w in &parsed.warnings {
        log::debug!("linha {}: {}", w.line, w.message);
        on_event(ImportEvent::Warning {
            line: w.line,
            message: w.message.clone(),
        });
    }

    let abertos = parsed.tickets.iter().filter(|t| t.is_aberto()).count();
    let encerrados = parsed.tickets.iter().filter(|t| t.is_encerrado()).count();
    let total_tickets = parsed.tickets.len();

    state.replace_dataset(Dataset {
        tickets: parsed.tickets,
        carregado_em: Utc::now(),
        origem: origem.clone(),
    })?;

    on_event(ImportEvent::Complete {
        duration_ms: start.elapsed().as_millis() as u64,
        total_tickets,
        abertos,
        encerrados,
    });

    Ok(ImportResult {
        origem,
        total_tickets,
        abertos,
        encerrados,
        skipped_rows: parsed.skipped_rows,
        warnings: parsed.warnings,
        detected_columns: parsed.detected_columns,
        missing_fields: parsed.missing_fields,
        unique_status: parsed.unique_status,
        fetch_duration_ms: carga.fetch_duration_ms,
        parse_duration_ms: parsed.parse_duration_ms,
    })
}
