use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::brand::{render_brand_mark, BrandStyle, Mode, Preset, Theme};
use crate::config::Layout;
use crate::output::{self, Encoding};

/// Resolução canônica do ícone antes de qualquer exportação.
pub const CANONICAL_ICON_SIZE: u32 = 1024;
pub const FAVICON_SIZE: u32 = 48;

/// Ícone de launcher (`mipmap-<densidade>`).
pub const LAUNCHER_SIZES: &[(&str, u32)] = &[
    ("mdpi", 48),
    ("hdpi", 72),
    ("xhdpi", 96),
    ("xxhdpi", 144),
    ("xxxhdpi", 192),
];

/// Foreground do adaptive icon.
pub const FOREGROUND_SIZES: &[(&str, u32)] = &[
    ("mdpi", 108),
    ("hdpi", 162),
    ("xhdpi", 216),
    ("xxhdpi", 324),
    ("xxxhdpi", 432),
];

/// Logo da splash screen (`drawable-<densidade>`).
pub const SPLASH_SIZES: &[(&str, u32)] = &[
    ("mdpi", 288),
    ("hdpi", 432),
    ("xhdpi", 576),
    ("xxhdpi", 864),
    ("xxxhdpi", 1152),
];

/// Um grupo de slots Android: tabela de densidades + arquivos gravados em cada uma.
struct DensitySlot {
    dir_prefix: &'static str,
    file_names: &'static [&'static str],
    sizes: &'static [(&'static str, u32)],
    encoding: Encoding,
}

const ANDROID_SLOTS: &[DensitySlot] = &[
    DensitySlot {
        dir_prefix: "mipmap",
        file_names: &["ic_launcher.webp", "ic_launcher_round.webp"],
        sizes: LAUNCHER_SIZES,
        encoding: Encoding::WebP,
    },
    DensitySlot {
        dir_prefix: "mipmap",
        file_names: &["ic_launcher_foreground.webp"],
        sizes: FOREGROUND_SIZES,
        encoding: Encoding::WebP,
    },
    DensitySlot {
        dir_prefix: "drawable",
        file_names: &["splashscreen_logo.png"],
        sizes: SPLASH_SIZES,
        encoding: Encoding::Png,
    },
];

const APP_ICON_FILES: &[&str] = &["icon.png", "adaptive-icon.png", "splash-icon.png"];
const IOS_SPLASH_FILES: &[&str] = &["image.png", "image@2x.png", "image@3x.png"];

/// Destino de um ícone: caminho, lado em pixels e formato.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSlot {
    pub path: PathBuf,
    pub size: u32,
    pub encoding: Encoding,
}

impl IconSlot {
    fn png(path: PathBuf, size: u32) -> Self {
        Self {
            path,
            size,
            encoding: Encoding::Png,
        }
    }
}

/// Todos os slots de ícone/splash do app, derivados só das tabelas estáticas.
pub fn icon_manifest(layout: &Layout) -> Vec<IconSlot> {
    let mut slots = Vec::new();

    let app_dir = layout.app_assets_dir();
    for name in APP_ICON_FILES {
        slots.push(IconSlot::png(app_dir.join(name), CANONICAL_ICON_SIZE));
    }
    slots.push(IconSlot::png(app_dir.join("favicon.png"), FAVICON_SIZE));

    slots.push(IconSlot::png(layout.ios_app_icon_path(), CANONICAL_ICON_SIZE));
    let splash_dir = layout.ios_splash_legacy_dir();
    for name in IOS_SPLASH_FILES {
        slots.push(IconSlot::png(splash_dir.join(name), CANONICAL_ICON_SIZE));
    }

    let res_dir = layout.android_res_dir();
    for group in ANDROID_SLOTS {
        for (density, size) in group.sizes {
            let dir = res_dir.join(format!("{}-{density}", group.dir_prefix));
            for name in group.file_names {
                slots.push(IconSlot {
                    path: dir.join(name),
                    size: *size,
                    encoding: group.encoding,
                });
            }
        }
    }

    slots
}

/// Converte para RGB e garante 1024x1024 (Lanczos).
pub fn normalize_icon(img: DynamicImage) -> RgbImage {
    let icon = img.to_rgb8();
    if icon.dimensions() == (CANONICAL_ICON_SIZE, CANONICAL_ICON_SIZE) {
        return icon;
    }
    imageops::resize(
        &icon,
        CANONICAL_ICON_SIZE,
        CANONICAL_ICON_SIZE,
        FilterType::Lanczos3,
    )
}

/// Exporta o ícone canônico para todos os slots do manifesto.
pub fn sync_icon_assets(icon: &RgbImage, layout: &Layout) -> Result<Vec<PathBuf>> {
    let mut resized: HashMap<u32, RgbImage> = HashMap::new();
    let mut written = Vec::new();

    for slot in icon_manifest(layout) {
        let img: &RgbImage = if slot.size == icon.width() && slot.size == icon.height() {
            icon
        } else {
            resized.entry(slot.size).or_insert_with(|| {
                imageops::resize(icon, slot.size, slot.size, FilterType::Lanczos3)
            })
        };
        output::save_rgb(img, &slot.path, slot.encoding)?;
        written.push(slot.path);
    }

    tracing::info!(count = written.len(), "ícones sincronizados");
    Ok(written)
}

/// Abre um candidato escolhido e sincroniza todos os slots.
pub fn sync_icon_file(source: &Path, layout: &Layout) -> Result<Vec<PathBuf>> {
    let img = image::open(source)
        .with_context(|| format!("Não foi possível abrir ícone: {}", source.display()))?;
    sync_icon_assets(&normalize_icon(img), layout)
}

/// Ícones do app a partir da marca procedural (sem cartão, tema escuro).
pub fn generate_runtime_icons(layout: &Layout, preset: Preset) -> Result<Vec<PathBuf>> {
    let mark = render_brand_mark(
        &BrandStyle::new(CANONICAL_ICON_SIZE, Theme::Dark, Mode::Plain).with_preset(preset),
    );
    sync_icon_assets(&normalize_icon(DynamicImage::ImageRgba8(mark)), layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::collections::HashSet;

    #[test]
    fn test_manifest_covers_every_table_entry_once() {
        let layout = Layout::new("/app");
        let slots = icon_manifest(&layout);
        let expected = APP_ICON_FILES.len()
            + 1
            + 1
            + IOS_SPLASH_FILES.len()
            + ANDROID_SLOTS
                .iter()
                .map(|g| g.sizes.len() * g.file_names.len())
                .sum::<usize>();
        assert_eq!(slots.len(), expected);
        assert_eq!(slots.len(), 28);

        let unique: HashSet<_> = slots.iter().map(|s| s.path.clone()).collect();
        assert_eq!(unique.len(), slots.len(), "slot duplicado");
    }

    #[test]
    fn test_manifest_density_paths() {
        let layout = Layout::new("/app");
        let slots = icon_manifest(&layout);
        let find = |p: &str| {
            slots
                .iter()
                .find(|s| s.path == PathBuf::from(p))
                .unwrap_or_else(|| panic!("faltando {p}"))
                .clone()
        };
        let round = find("/app/android/app/src/main/res/mipmap-xxhdpi/ic_launcher_round.webp");
        assert_eq!((round.size, round.encoding), (144, Encoding::WebP));
        let splash = find("/app/android/app/src/main/res/drawable-xxxhdpi/splashscreen_logo.png");
        assert_eq!((splash.size, splash.encoding), (1152, Encoding::Png));
        let favicon = find("/app/assets/images/favicon.png");
        assert_eq!(favicon.size, FAVICON_SIZE);
    }

    #[test]
    fn test_normalize_icon_resizes_to_canonical() {
        let small = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([1, 2, 3])));
        assert_eq!(normalize_icon(small).dimensions(), (1024, 1024));
    }

    #[test]
    fn test_sync_writes_every_slot() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let source = dir.path().join("candidate-1.png");
        RgbImage::from_pixel(32, 32, Rgb([20, 200, 120]))
            .save(&source)
            .unwrap();

        let written = sync_icon_file(&source, &layout).unwrap();
        let manifest = icon_manifest(&layout);
        assert_eq!(written.len(), manifest.len());
        for slot in &manifest {
            let (w, h) = image::image_dimensions(&slot.path).unwrap();
            assert_eq!((w, h), (slot.size, slot.size), "{}", slot.path.display());
        }
    }
}
