use std::path::Path;

use crate::config::AppConfig;
use crate::error::AppError;

pub fn get_config(path: &Path) -> Result<AppConfig, AppError> {
    crate::config::load_config(path)
}

pub fn update_config(path: &Path, config: &AppConfig) -> Result<(), AppError> {
    crate::config::save_config(path, config)?;
    log::info!("Configuração salva em {}", path.display());
    Ok(())
}
