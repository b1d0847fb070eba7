pub mod brand;
pub mod candidates;
pub mod config;
pub mod error;
pub mod marketing;
pub mod output;
pub mod pipeline;
pub mod poster;
pub mod raster;
pub mod screens;
pub mod sync;
pub mod typography;

use std::path::{Path, PathBuf};

/// Procura o diretório de configuração em vários locais possíveis.
/// Sem nenhum, usa `config/` (o arquivo é opcional).
pub fn find_config_dir(exe_dir: &Path) -> PathBuf {
    let candidates = [
        PathBuf::from("config"),
        exe_dir.join("config"),
        exe_dir.join("../config"),
        // target/release/: dois níveis acima fica a raiz do projeto
        exe_dir.join("../../config"),
    ];

    candidates
        .iter()
        .find(|dir| dir.join(config::SETTINGS_FILE).exists())
        .cloned()
        .unwrap_or_else(|| PathBuf::from("config"))
}

/// Diretório do executável atual, ou `.`.
pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configura o `tracing` para stderr; `RUST_LOG` não é lido, o nível vem do `-v`.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
