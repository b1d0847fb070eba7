use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use store_assets_lib::candidates;
use store_assets_lib::config::{self, Layout};
use store_assets_lib::error::AssetError;
use store_assets_lib::sync;

#[derive(Parser)]
#[command(
    name = "icon-candidates",
    about = "Gera candidatos de ícone via OpenAI e aplica um deles no app"
)]
struct Cli {
    /// API key (default: variável de ambiente ou arquivos .env)
    #[arg(long)]
    api_key: Option<String>,

    /// Quantos candidatos pedir
    #[arg(long, default_value_t = 4)]
    count: u32,

    /// Candidato a aplicar (1-based)
    #[arg(long, default_value_t = 1)]
    pick: usize,

    /// Prompt de geração
    #[arg(long, default_value = candidates::DEFAULT_PROMPT)]
    prompt: String,

    /// Não chama a API; usa os candidatos já salvos
    #[arg(long)]
    skip_generate: bool,

    /// Diretório de configuração (default: ./config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log detalhado
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    store_assets_lib::init_logging(cli.verbose);

    let config_dir = cli
        .config
        .clone()
        .unwrap_or_else(|| store_assets_lib::find_config_dir(&store_assets_lib::exe_dir()));
    let settings = config::load_settings(&config_dir)?;
    let layout = Layout::new(settings.project_root(&config_dir));
    let candidate_dir = layout.candidate_dir();

    let available = if cli.skip_generate {
        let found = candidates::existing_candidates(&candidate_dir)?;
        if found.is_empty() {
            return Err(AssetError::NoExistingCandidates(candidate_dir).into());
        }
        found
    } else {
        // seleção impossível falha antes de gastar uma chamada
        let count = cli.count.max(1);
        candidates::check_pick(cli.pick, count as usize)?;

        let api = &settings.image_api;
        let api_key = config::resolve_api_key(
            cli.api_key.as_deref(),
            std::env::var(&api.key_var).ok(),
            api,
            &layout.root,
        )?;

        println!("Solicitando {count} candidato(s) a {}...", api.model);
        let images = candidates::request_images(api, &api_key, &cli.prompt, count).await?;
        candidates::store_candidates_for_pick(&candidate_dir, &images, cli.pick)?
    };

    let chosen = candidates::select_candidate(&available, cli.pick)?;
    let written = sync::sync_icon_file(chosen, &layout)?;

    println!("\nResultado:");
    println!("  Candidates: {}", candidate_dir.display());
    println!("  Applied: {}", chosen.display());
    println!("  Updated: {}", layout.app_assets_dir().display());
    println!(
        "  Updated: {}",
        layout
            .ios_app_icon_path()
            .parent()
            .unwrap_or(&layout.root)
            .display()
    );
    println!("  Updated: {}", layout.ios_splash_legacy_dir().display());
    println!("  Updated: {}", layout.android_res_dir().display());
    println!("  Slots gravados: {}", written.len());

    Ok(())
}
