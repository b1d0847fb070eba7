use anyhow::Result;
use std::path::PathBuf;

use crate::config::{Layout, Settings, LOCALE_EN, LOCALE_ZH};
use crate::typography::FontBook;
use crate::{marketing, output, screens, sync};

/// O que uma execução de `store-assets` gravou.
#[derive(Debug, Default)]
pub struct Summary {
    pub logos: Vec<PathBuf>,
    pub screens: Vec<PathBuf>,
    pub icons: Vec<PathBuf>,
}

impl Summary {
    pub fn file_count(&self) -> usize {
        self.logos.len() + self.screens.len() + self.icons.len()
    }
}

/// Diretórios atualizados, para a mensagem final.
pub fn updated_directories(layout: &Layout) -> Vec<PathBuf> {
    vec![
        layout.logo_dir(),
        layout.ios_screenshot_dir(LOCALE_EN),
        layout.ios_screenshot_dir(LOCALE_ZH),
        layout.android_screenshot_dir(LOCALE_EN),
        layout.android_screenshot_dir(LOCALE_ZH),
        layout.android_images_dir(),
        layout.app_assets_dir(),
    ]
}

/// Valida os screenshots brutos e então gera logos, pôsteres e ícones.
/// Se a validação falhar, nada além do diretório `raw/` é criado.
pub fn generate_store_assets(layout: &Layout, settings: &Settings, fonts: &FontBook) -> Result<Summary> {
    let raw_dir = layout.raw_dir();
    output::ensure_dir(&raw_dir)?;
    let inputs = screens::resolve_raw_inputs(&raw_dir)?;
    tracing::info!(raw = %raw_dir.display(), "screenshots validados");

    let preset = settings.brand.preset;
    let logos = marketing::draw_logo_variants(layout, preset, fonts)?;
    let screens = screens::render_all_screens(layout, &inputs, preset, fonts)?;
    let icons = sync::generate_runtime_icons(layout, preset)?;

    let summary = Summary { logos, screens, icons };
    tracing::info!(files = summary.file_count(), "assets de loja gerados");
    Ok(summary)
}
