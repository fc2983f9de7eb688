use std::time::Instant;

use serde::Serialize;

use crate::analyzer::dashboard::{build_dashboard, ticket_page};
use crate::error::AppError;
use crate::export::dashboard_report;
use crate::state::{AppState, DatasetAccess};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub path: String,
    pub size_bytes: u64,
    pub duration_ms: u64,
}

/// Writes the dashboard of the active filter to an XLSX workbook at `path`.
pub fn export_excel_dashboard(state: &AppState, path: &str) -> Result<ExportResult, AppError> {
    let start = Instant::now();

    let filtro = state.filtro()?;
    let bytes = state.dataset(|d| {
        let view = build_dashboard(&d.tickets, &filtro);
        let page = ticket_page(&d.tickets, &filtro, None);
        dashboard_report::generate_dashboard_report(&view, &page)
    })??;

    std::fs::write(path, &bytes)?;
    log::info!("Planilha exportada: {} ({} bytes)", path, bytes.len());

    Ok(ExportResult {
        path: path.to_string(),
        size_bytes: bytes.len() as u64,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::dashboard::tests::ticket;
    use crate::state::Dataset;

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("painel.xlsx");
        let state = AppState::default();
        state
            .replace_dataset(Dataset {
                tickets: vec![ticket("1", "Aberto", "Ana", "Rede")],
                carregado_em: chrono::Utc::now(),
                origem: "teste".into(),
            })
            .unwrap();

        let res = export_excel_dashboard(&state, path.to_str().unwrap()).unwrap();
        let written = std::fs::read(&path).unwrap();
        assert_eq!(res.size_bytes, written.len() as u64);
        assert_eq!(&written[..2], b"PK");
    }

    #[test]
    fn test_export_without_data_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("painel.xlsx");
        let state = AppState::default();
        assert!(export_excel_dashboard(&state, path.to_str().unwrap()).is_err());
        assert!(!path.exists());
    }
}
