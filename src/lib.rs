pub mod analyzer;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod parser;
pub mod render;
pub mod source;
pub mod state;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Formato};

/// `-v` → debug, `-vv` → trace; without flags RUST_LOG wins, else info.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    // log records are bridged by the subscriber's tracing-log feature
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let formato = cli.formato;

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Erro: runtime tokio: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli::execute(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{:?}", e);
            match formato {
                Formato::Json => {
                    println!("{}", serde_json::json!({ "erro": e }));
                }
                Formato::Texto => eprintln!("Erro: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::analyzer::dashboard::build_dashboard;
    use crate::analyzer::filter::{FiltroSelecao, FiltroStatus};
    use crate::parser::parse_csv_str;

    const FIXTURE: &str = include_str!("../fixtures/chamados.csv");

    #[test]
    fn test_e2e_fixture_parse() {
        let out = parse_csv_str(FIXTURE, b',').unwrap();
        assert_eq!(out.tickets.len(), 10);
        assert_eq!(out.skipped_rows, 0);
        assert!(out.missing_fields.is_empty());
        assert_eq!(
            out.unique_status,
            vec!["Aberto", "Em andamento", "Encerrado", "Fechado"]
        );

        let t3 = &out.tickets[2];
        assert_eq!(t3.id, "CH-1003");
        assert_eq!(t3.solucao, "Perfil ajustado, usuário liberado");
        assert_eq!(t3.satisfacao, 4);
        assert_eq!(t3.tma, 1300.0);

        // "sem resposta" is neither vocabulary nor a number
        assert_eq!(out.tickets[9].satisfacao, 0);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].line, 11);
    }

    #[test]
    fn test_e2e_dashboard_all() {
        let out = parse_csv_str(FIXTURE, b',').unwrap();
        let view = build_dashboard(&out.tickets, &FiltroSelecao::default());

        let k = &view.kpis;
        assert_eq!(k.total, 10);
        assert_eq!(k.abertos, 3);
        assert_eq!(k.encerrados, 6);
        assert_eq!(k.tempo_medio, 18); // 141 / 8
        assert_eq!(k.tma_medio, 523); // 3135 / 6
        assert_eq!(k.tecnico_mais_produtivo, "Ana Souza");

        let agentes: Vec<(&str, usize)> = view
            .por_agente
            .iter()
            .map(|c| (c.label.as_str(), c.count))
            .collect();
        assert_eq!(
            agentes,
            vec![
                ("Ana Souza", 4),
                ("Bruno Lima", 3),
                ("Carla Mendes", 2),
                ("Não atribuído", 1)
            ]
        );

        let motivos: Vec<(&str, usize)> = view
            .por_motivo
            .iter()
            .map(|c| (c.label.as_str(), c.count))
            .collect();
        assert_eq!(
            motivos,
            vec![
                ("Acesso ao sistema", 3),
                ("Impressora", 2),
                ("Rede", 2),
                ("E-mail", 2),
                ("Não especificado", 1)
            ]
        );

        let sat = &view.satisfacao;
        assert_eq!(sat.total, 6);
        assert_eq!(sat.media, 3.5);
        let faixas: Vec<(u8, usize)> = sat.distribuicao.iter().map(|f| (f.nota, f.count)).collect();
        assert_eq!(faixas, vec![(5, 2), (4, 2), (2, 1), (1, 1)]);

        assert_eq!(
            view.meta.agentes_disponiveis,
            vec!["Ana Souza", "Bruno Lima", "Carla Mendes"]
        );
    }

    #[test]
    fn test_e2e_dashboard_filtered() {
        let out = parse_csv_str(FIXTURE, b',').unwrap();
        let filtro = FiltroSelecao::new(Some("Ana Souza".into()), FiltroStatus::Encerrado);
        let view = build_dashboard(&out.tickets, &filtro);

        assert_eq!(view.meta.total_carregado, 10);
        assert_eq!(view.meta.total_filtrado, 3);
        assert_eq!(view.kpis.abertos, 0);
        assert_eq!(view.kpis.encerrados, 3);
        assert_eq!(view.kpis.tempo_medio, 18); // 55 / 3
        assert_eq!(view.satisfacao.media, 3.3);
        assert_eq!(view.por_agente.len(), 1);
    }
}
