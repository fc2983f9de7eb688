use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::analyzer::filter::FiltroSelecao;
use crate::error::AppError;
use crate::parser::types::Ticket;

/// One ingestion cycle's working set. Replaced wholesale on every refresh.
#[derive(Debug)]
pub struct Dataset {
    pub tickets: Vec<Ticket>,
    pub carregado_em: DateTime<Utc>,
    pub origem: String,
}

/// Externally owned application state: the current dataset and the active
/// filter selection. The analyzer never holds state of its own.
#[derive(Default)]
pub struct AppState {
    pub dataset: Mutex<Option<Arc<Dataset>>>,
    pub filtro: Mutex<FiltroSelecao>,
}

impl AppState {
    pub fn new(filtro: FiltroSelecao) -> Self {
        AppState {
            dataset: Mutex::new(None),
            filtro: Mutex::new(filtro),
        }
    }
}

pub trait DatasetAccess {
    /// Run `f` on a snapshot of the current dataset, outside the lock.
    fn dataset<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Dataset) -> T;

    /// Swap in a freshly loaded dataset. Last write wins.
    fn replace_dataset(&self, dataset: Dataset) -> Result<(), AppError>;

    fn filtro(&self) -> Result<FiltroSelecao, AppError>;

    fn set_filtro(&self, filtro: FiltroSelecao) -> Result<(), AppError>;
}

fn poisoned<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Custom(format!("Mutex poisoned: {}", e))
}

impl DatasetAccess for AppState {
    fn dataset<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Dataset) -> T,
    {
        let snapshot = {
            let guard = self.dataset.lock().map_err(poisoned)?;
            guard.as_ref().cloned().ok_or(AppError::DatasetNotLoaded)?
        };
        Ok(f(&snapshot))
    }

    fn replace_dataset(&self, dataset: Dataset) -> Result<(), AppError> {
        let mut guard = self.dataset.lock().map_err(poisoned)?;
        *guard = Some(Arc::new(dataset));
        Ok(())
    }

    fn filtro(&self) -> Result<FiltroSelecao, AppError> {
        let guard = self.filtro.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    fn set_filtro(&self, filtro: FiltroSelecao) -> Result<(), AppError> {
        let mut guard = self.filtro.lock().map_err(poisoned)?;
        *guard = filtro;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::dashboard::tests::ticket;
    use crate::analyzer::filter::FiltroStatus;

    fn dataset(origem: &str, n: usize) -> Dataset {
        Dataset {
            tickets: (0..n)
                .map(|i| ticket(&i.to_string(), "Aberto", "Ana", ""))
                .collect(),
            carregado_em: Utc::now(),
            origem: origem.to_string(),
        }
    }

    #[test]
    fn test_dataset_not_loaded() {
        let state = AppState::default();
        let err = state.dataset(|d| d.tickets.len()).unwrap_err();
        assert!(matches!(err, AppError::DatasetNotLoaded));
    }

    #[test]
    fn test_replace_dataset_last_write_wins() {
        let state = AppState::default();
        state.replace_dataset(dataset("a", 2)).unwrap();
        state.replace_dataset(dataset("b", 5)).unwrap();
        let (origem, n) = state
            .dataset(|d| (d.origem.clone(), d.tickets.len()))
            .unwrap();
        assert_eq!(origem, "b");
        assert_eq!(n, 5);
    }

    #[test]
    fn test_filtro_roundtrip() {
        let state = AppState::new(FiltroSelecao::default());
        let filtro = FiltroSelecao::new(Some("Ana".into()), FiltroStatus::Encerrado);
        state.set_filtro(filtro.clone()).unwrap();
        assert_eq!(state.filtro().unwrap(), filtro);
    }
}
