use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::analyzer::filter::{FiltroSelecao, FiltroStatus};
use crate::commands::config::{get_config, update_config};
use crate::commands::dashboard::{get_agents, get_dashboard, get_tickets, update_filter};
use crate::commands::export::export_excel_dashboard;
use crate::commands::import::{refresh_tickets, ImportEvent};
use crate::commands::monitor::{run_monitor, MonitorOptions};
use crate::config::{default_config_path, AppConfig};
use crate::error::AppError;
use crate::render;
use crate::source::Fonte;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "dash-chamados",
    version,
    about = "Indicadores de chamados de suporte a partir da planilha publicada"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: <config_dir>/dash-chamados/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV export URL of the sheet, overrides the config file
    #[arg(long, global = true, env = "DASH_CHAMADOS_URL")]
    pub url: Option<String>,

    /// Read a local CSV file instead of downloading the sheet
    #[arg(long, global = true)]
    pub arquivo: Option<PathBuf>,

    /// Only tickets of this agent (exact name)
    #[arg(long, global = true)]
    pub agente: Option<String>,

    /// todos, aberto or encerrado
    #[arg(long, global = true, default_value = "todos")]
    pub status: FiltroStatus,

    #[arg(long, global = true, value_enum, default_value_t = Formato::Texto)]
    pub formato: Formato,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Formato {
    Texto,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// KPIs, rankings and satisfaction (default)
    Resumo,
    /// Ticket table of the active filter
    Chamados {
        /// Every row instead of the configured table size
        #[arg(long)]
        todos: bool,
    },
    /// Agent names accepted by --agente
    Agentes,
    /// Write the dashboard to an XLSX workbook
    Exportar { saida: PathBuf },
    /// Re-fetch periodically and print the dashboard after each cycle
    Monitorar {
        /// Seconds between cycles (default: refresh_interval_secs)
        #[arg(long)]
        intervalo: Option<u64>,
        /// Stop after this many cycles
        #[arg(long)]
        ciclos: Option<usize>,
    },
    /// Show the effective configuration
    Config {
        /// Write it back to the config file
        #[arg(long)]
        salvar: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_dashboard(state: &AppState, config: &AppConfig, formato: Formato) -> Result<(), AppError> {
    let resp = get_dashboard(state)?;
    match formato {
        Formato::Json => print_json(&resp),
        Formato::Texto => {
            println!("{}", render::render_dashboard(&resp, config));
            Ok(())
        }
    }
}

pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config_path = cli.config.clone().or_else(default_config_path);
    let mut config = match &config_path {
        Some(path) => get_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.sheet_url = url.clone();
    }

    let command = cli.command.unwrap_or(Commands::Resumo);

    if let Commands::Config { salvar } = command {
        if salvar {
            let path = config_path.ok_or_else(|| {
                AppError::Config("diretório de configuração indisponível, use --config".into())
            })?;
            update_config(&path, &config)?;
        }
        return match cli.formato {
            Formato::Json => print_json(&config),
            Formato::Texto => {
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
        };
    }

    let fonte = match &cli.arquivo {
        Some(path) => Fonte::arquivo(path),
        None => Fonte::planilha(&config.sheet_url, config.http_timeout())?,
    };
    let delimiter = config.delimiter_byte();
    let state = AppState::default();
    update_filter(&state, FiltroSelecao::new(cli.agente.clone(), cli.status))?;

    if let Commands::Monitorar { intervalo, ciclos } = command {
        let opts = MonitorOptions {
            intervalo: intervalo
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.refresh_interval()),
            ciclos,
        };
        let formato = cli.formato;
        run_monitor(&state, &fonte, delimiter, opts, |r| match r {
            Ok(_) => {
                if let Err(e) = print_dashboard(&state, &config, formato) {
                    log::error!("{}", e);
                }
            }
            Err(e) => eprintln!("Erro: {}", e),
        })
        .await?;
        return Ok(());
    }

    let import = refresh_tickets(&state, &fonte, delimiter, |event| {
        if let ImportEvent::Started { origem } = event {
            log::debug!("Carregando {}", origem);
        }
    })
    .await?;
    if !import.warnings.is_empty() {
        log::warn!("{} avisos de leitura (use -v para detalhes)", import.warnings.len());
    }
    if !import.missing_fields.is_empty() {
        log::info!("Colunas ausentes: {}", import.missing_fields.join(", "));
    }

    match command {
        Commands::Resumo => print_dashboard(&state, &config, cli.formato),
        Commands::Chamados { todos } => {
            let limite = if todos { None } else { Some(config.linhas_tabela) };
            let page = get_tickets(&state, limite)?;
            match cli.formato {
                Formato::Json => print_json(&page),
                Formato::Texto => {
                    println!("{}", render::render_tickets(&page));
                    Ok(())
                }
            }
        }
        Commands::Agentes => {
            let agentes = get_agents(&state)?;
            match cli.formato {
                Formato::Json => print_json(&agentes),
                Formato::Texto => {
                    for a in &agentes {
                        println!("{}", a);
                    }
                    Ok(())
                }
            }
        }
        Commands::Exportar { saida } => {
            let res = export_excel_dashboard(&state, &saida.to_string_lossy())?;
            match cli.formato {
                Formato::Json => print_json(&res),
                Formato::Texto => {
                    println!("Planilha exportada: {} ({} bytes)", res.path, res.size_bytes);
                    Ok(())
                }
            }
        }
        // handled above
        Commands::Config { .. } | Commands::Monitorar { .. } => Ok(()),
    }
}
