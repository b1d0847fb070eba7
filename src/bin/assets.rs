use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use store_assets_lib::config::{self, Layout};
use store_assets_lib::pipeline;
use store_assets_lib::typography::FontBook;

#[derive(Parser)]
#[command(
    name = "store-assets",
    about = "Gera logos, screenshots de loja e ícones do AgentTown"
)]
struct Cli {
    /// Diretório de configuração (default: ./config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log detalhado (cada arquivo gravado)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    store_assets_lib::init_logging(cli.verbose);

    let config_dir = cli
        .config
        .unwrap_or_else(|| store_assets_lib::find_config_dir(&store_assets_lib::exe_dir()));
    let settings = config::load_settings(&config_dir)?;
    let layout = Layout::new(settings.project_root(&config_dir));
    let fonts = FontBook::discover(&settings.fonts)?;

    println!("Gerando assets de loja em {}...", layout.root.display());
    let summary = pipeline::generate_store_assets(&layout, &settings, &fonts)?;

    println!("\nResultado:");
    println!("  Arquivos gravados: {}", summary.file_count());
    for dir in pipeline::updated_directories(&layout) {
        println!("  Atualizado: {}", dir.display());
    }

    Ok(())
}
