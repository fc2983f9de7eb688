use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzer::dashboard::{build_dashboard, ticket_page, DashboardView, TicketPage};
use crate::analyzer::filter::{listar_agentes, FiltroSelecao};
use crate::error::AppError;
use crate::state::{AppState, DatasetAccess};

/// Dashboard payload plus where and when the data came from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub origem: String,
    pub carregado_em: DateTime<Utc>,
    #[serde(flatten)]
    pub view: DashboardView,
}

/// Every derived view for the current dataset under the active filter.
pub fn get_dashboard(state: &AppState) -> Result<DashboardResponse, AppError> {
    let filtro = state.filtro()?;
    state.dataset(|d| DashboardResponse {
        origem: d.origem.clone(),
        carregado_em: d.carregado_em,
        view: build_dashboard(&d.tickets, &filtro),
    })
}

/// Ticket table under the active filter, limited to `limite` rows.
pub fn get_tickets(state: &AppState, limite: Option<usize>) -> Result<TicketPage, AppError> {
    let filtro = state.filtro()?;
    state.dataset(|d| ticket_page(&d.tickets, &filtro, limite))
}

/// Agent selector values, from the unfiltered dataset.
pub fn get_agents(state: &AppState) -> Result<Vec<String>, AppError> {
    state.dataset(|d| listar_agentes(&d.tickets))
}

pub fn update_filter(state: &AppState, filtro: FiltroSelecao) -> Result<(), AppError> {
    log::debug!(
        "Filtro: agente={:?} status={}",
        filtro.agente,
        filtro.status
    );
    state.set_filtro(filtro)
}
