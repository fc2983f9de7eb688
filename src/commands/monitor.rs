use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::import::{refresh_tickets, ImportResult};
use crate::error::AppError;
use crate::source::Fonte;
use crate::state::AppState;

pub struct MonitorOptions {
    pub intervalo: Duration,
    /// Stop after this many refresh cycles; None runs until Ctrl-C.
    pub ciclos: Option<usize>,
}

/// Periodic re-fetch. The first cycle runs immediately; each cycle replaces
/// the dataset on success and keeps the previous one on failure.
/// Runs until Ctrl-C or the requested cycle count; returns the cycles run.
pub async fn run_monitor(
    state: &AppState,
    fonte: &Fonte,
    delimiter: u8,
    opts: MonitorOptions,
    on_cycle: impl FnMut(Result<&ImportResult, &AppError>),
) -> Result<usize, AppError> {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Sinal Ctrl-C indisponível: {}", e);
            std::future::pending::<()>().await;
        }
    };
    run_monitor_until(state, fonte, delimiter, opts, on_cycle, ctrl_c).await
}

/// Same loop as [`run_monitor`], stopped by `parar` instead of Ctrl-C.
/// The stop is also watched while a refresh is in flight; an interrupted
/// refresh leaves the dataset untouched and is not counted.
pub async fn run_monitor_until(
    state: &AppState,
    fonte: &Fonte,
    delimiter: u8,
    opts: MonitorOptions,
    mut on_cycle: impl FnMut(Result<&ImportResult, &AppError>),
    parar: impl Future<Output = ()>,
) -> Result<usize, AppError> {
    tokio::pin!(parar);
    let mut interval = tokio::time::interval(opts.intervalo);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ciclos = 0usize;

    log::info!(
        "Monitorando {} a cada {}s",
        fonte.descricao(),
        opts.intervalo.as_secs()
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut parar => {
                log::info!("Monitor interrompido");
                break;
            }
        }

        let result = tokio::select! {
            r = refresh_tickets(state, fonte, delimiter, |_| {}) => r,
            _ = &mut parar => {
                log::info!("Monitor interrompido durante a atualização");
                break;
            }
        };
        match &result {
            Ok(r) => log::debug!("Ciclo {}: {} chamados", ciclos + 1, r.total_tickets),
            Err(e) if e.is_fetch_error() => {
                log::warn!("Falha ao baixar a planilha, dados anteriores mantidos: {}", e)
            }
            Err(e) => log::warn!("Falha ao ler a planilha, dados anteriores mantidos: {}", e),
        }
        on_cycle(result.as_ref());

        ciclos += 1;
        if opts.ciclos.is_some_and(|n| ciclos >= n) {
            break;
        }
    }

    Ok(ciclos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DatasetAccess;

    #[tokio::test]
    async fn test_monitor_runs_requested_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.csv");
        std::fs::write(&path, "id,status\n1,Aberto\n2,Fechado\n").unwrap();

        let state = AppState::default();
        let mut totais = Vec::new();
        let n = run_monitor(
            &state,
            &Fonte::arquivo(&path),
            b',',
            MonitorOptions {
                intervalo: Duration::from_millis(10),
                ciclos: Some(3),
            },
            |r| totais.push(r.map(|r| r.total_tickets).ok()),
        )
        .await
        .unwrap();

        assert_eq!(n, 3);
        assert_eq!(totais, vec![Some(2), Some(2), Some(2)]);
        assert_eq!(state.dataset(|d| d.tickets.len()).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_monitor_survives_failures() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::default();
        let mut falhas = 0;
        let n = run_monitor(
            &state,
            &Fonte::arquivo(dir.path().join("ausente.csv")),
            b',',
            MonitorOptions {
                intervalo: Duration::from_millis(5),
                ciclos: Some(2),
            },
            |r| {
                if r.is_err() {
                    falhas += 1;
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(n, 2);
        assert_eq!(falhas, 2);
        assert!(state.dataset(|d| d.tickets.len()).is_err());
    }
    #[tokio::test]
    async fn test_monitor_stops_during_slow_fetch() {
        // accepts connections through the backlog but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/export?format=csv", listener.local_addr().unwrap());
        let fonte = Fonte::planilha(url, Duration::from_secs(30)).unwrap();

        let state = AppState::default();
        let mut chamadas = 0;
        let n = tokio::time::timeout(
            Duration::from_secs(5),
            run_monitor_until(
                &state,
                &fonte,
                b',',
                MonitorOptions {
                    intervalo: Duration::from_secs(60),
                    ciclos: None,
                },
                |_| chamadas += 1,
                tokio::time::sleep(Duration::from_millis(100)),
            ),
        )
        .await
        .expect("stop must interrupt the pending refresh")
        .unwrap();

        assert_eq!(n, 0);
        assert_eq!(chamadas, 0);
        assert!(state.dataset(|d| d.tickets.len()).is_err());
        drop(listener);
    }
}
