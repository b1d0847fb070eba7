use anyhow::{Context, Result};
use image::RgbImage;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::brand::Preset;
use crate::config::{Layout, StoreLocale, LOCALE_EN, LOCALE_ZH};
use crate::error::AssetError;
use crate::marketing::{self, BRAND_NAME, FEATURE_TAGLINE};
use crate::output;
use crate::poster::{self, PosterCopy};
use crate::typography::FontBook;

/// Tamanho de referência dos screenshots antes de virar pôster.
pub const SOURCE_SIZE: (u32, u32) = (1170, 2532);
pub const IOS_SIZES: &[(u32, u32)] = &[(1290, 2796), (1242, 2688)];
pub const ANDROID_SIZE: (u32, u32) = (1080, 1920);

/// Screenshot bruto obrigatório, com nome legado aceito.
#[derive(Debug, Clone, Copy)]
pub struct RawShot {
    pub name: &'static str,
    pub legacy: Option<&'static str>,
}

pub const RAW_SHOTS: [RawShot; 3] = [
    RawShot {
        name: "screen-world-map.png",
        legacy: Some("screen-home.png"),
    },
    RawShot {
        name: "screen-mini-apps.png",
        legacy: Some("screen-town-map.png"),
    },
    RawShot {
        name: "screen-team-chat.png",
        legacy: None,
    },
];

/// Textos de um screenshot num locale.
#[derive(Debug, Clone, Copy)]
pub struct ShotCopy {
    pub key: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub badge: &'static str,
}

impl ShotCopy {
    pub fn poster_copy(&self) -> PosterCopy<'static> {
        PosterCopy {
            title: self.title,
            subtitle: self.subtitle,
            badge: self.badge,
        }
    }
}

pub struct LocaleCopy {
    pub locale: StoreLocale,
    /// Na mesma ordem de `RAW_SHOTS`.
    pub shots: [ShotCopy; 3],
}

pub const LOCALES: &[LocaleCopy] = &[
    LocaleCopy {
        locale: LOCALE_EN,
        shots: [
            ShotCopy {
                key: "01_world_map",
                title: "Agent World",
                subtitle: "Explore your AI neighborhood",
                badge: "AGENTTOWN",
            },
            ShotCopy {
                key: "02_mini_apps",
                title: "Mini App Builder",
                subtitle: "Create and run apps from chat",
                badge: "CREATE APP",
            },
            ShotCopy {
                key: "03_team_chat",
                title: "Team Collaboration",
                subtitle: "Chat, tasks, and bot execution in one place",
                badge: "TEAM CHAT",
            },
        ],
    },
    LocaleCopy {
        locale: LOCALE_ZH,
        shots: [
            ShotCopy {
                key: "01_world_map",
                title: "世界地图",
                subtitle: "在 AI 社区中探索你的 Bot 世界",
                badge: "AGENTTOWN",
            },
            ShotCopy {
                key: "02_mini_apps",
                title: "Mini App 生成器",
                subtitle: "在聊天中创建并运行应用",
                badge: "创建应用",
            },
            ShotCopy {
                key: "03_team_chat",
                title: "团队协作",
                subtitle: "聊天、任务与 Bot 执行一体化",
                badge: "团队聊天",
            },
        ],
    },
];

/// Os três screenshots brutos já resolvidos e validados.
#[derive(Debug, Clone)]
pub struct RawInputs {
    pub paths: [PathBuf; 3],
}

fn resolve_raw_path(raw_dir: &Path, shot: &RawShot) -> Option<PathBuf> {
    let primary = raw_dir.join(shot.name);
    if primary.exists() {
        return Some(primary);
    }
    shot.legacy
        .map(|legacy| raw_dir.join(legacy))
        .filter(|p| p.exists())
}

fn describe(shot: &RawShot) -> String {
    match shot.legacy {
        Some(legacy) => format!("{} (ou {legacy})", shot.name),
        None => shot.name.to_string(),
    }
}

pub fn file_hash(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Não foi possível ler {}", path.display()))?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// Garante os três screenshots: todos presentes e com conteúdos distintos.
/// Nada é renderizado antes desta checagem.
pub fn resolve_raw_inputs(raw_dir: &Path) -> Result<RawInputs> {
    let resolved: Vec<(RawShot, Option<PathBuf>)> = RAW_SHOTS
        .iter()
        .map(|shot| (*shot, resolve_raw_path(raw_dir, shot)))
        .collect();

    let missing: Vec<String> = resolved
        .iter()
        .filter(|(_, path)| path.is_none())
        .map(|(shot, _)| describe(shot))
        .collect();
    if !missing.is_empty() {
        return Err(AssetError::MissingInput(missing).into());
    }

    let paths: Vec<PathBuf> = resolved.into_iter().filter_map(|(_, p)| p).collect();
    let mut hashes = Vec::with_capacity(paths.len());
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut duplicates = Vec::new();
    for path in &paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let hash = file_hash(path)?;
        if let Some(first) = seen.get(&hash) {
            duplicates.push(format!("{name} = {first}"));
        } else {
            seen.insert(hash.clone(), name.clone());
        }
        hashes.push((name, hash));
    }
    if !duplicates.is_empty() {
        return Err(AssetError::DuplicateInput { duplicates, hashes }.into());
    }

    let paths: [PathBuf; 3] = paths
        .try_into()
        .map_err(|_| anyhow::anyhow!("esperados 3 screenshots"))?;
    Ok(RawInputs { paths })
}

/// Um pôster a gerar: locale, índice do screenshot, tamanho e destino.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterTarget {
    pub locale: usize,
    pub shot: usize,
    pub size: (u32, u32),
    pub path: PathBuf,
}

/// Todos os pôsteres: iOS `<key>_<w>x<h>.png` e Android `<n>.png` por locale.
pub fn poster_targets(layout: &Layout) -> Vec<PosterTarget> {
    let mut targets = Vec::new();
    for (li, copy) in LOCALES.iter().enumerate() {
        let ios_dir = layout.ios_screenshot_dir(copy.locale);
        for (si, shot) in copy.shots.iter().enumerate() {
            for &(w, h) in IOS_SIZES {
                targets.push(PosterTarget {
                    locale: li,
                    shot: si,
                    size: (w, h),
                    path: ios_dir.join(format!("{}_{w}x{h}.png", shot.key)),
                });
            }
        }
        let android_dir = layout.android_screenshot_dir(copy.locale);
        for si in 0..copy.shots.len() {
            targets.push(PosterTarget {
                locale: li,
                shot: si,
                size: ANDROID_SIZE,
                path: android_dir.join(format!("{}.png", si + 1)),
            });
        }
    }
    targets
}

fn load_shot(path: &Path) -> Result<RgbImage> {
    let img = image::open(path)
        .with_context(|| format!("Não foi possível abrir screenshot: {}", path.display()))?;
    Ok(poster::crop_cover(&img.to_rgb8(), SOURCE_SIZE))
}

/// Gera todos os pôsteres, o feature graphic e o ícone da listagem do Play.
pub fn render_all_screens(
    layout: &Layout,
    inputs: &RawInputs,
    preset: Preset,
    fonts: &FontBook,
) -> Result<Vec<PathBuf>> {
    let shots = inputs
        .paths
        .iter()
        .map(|p| load_shot(p))
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::new();
    for target in poster_targets(layout) {
        let copy = LOCALES[target.locale].shots[target.shot].poster_copy();
        poster::create_store_poster(&target.path, target.size, &copy, &shots[target.shot], true, fonts)?;
        tracing::info!(path = %target.path.display(), "pôster gerado");
        written.push(target.path);
    }

    let images_dir = layout.android_images_dir();
    let feature = images_dir.join("featureGraphic.png");
    marketing::create_feature_graphic(&feature, BRAND_NAME, FEATURE_TAGLINE, preset, fonts)?;
    written.push(feature);

    let icon = images_dir.join("icon.png");
    output::save_rgb(&marketing::play_icon(preset), &icon, output::Encoding::Png)?;
    written.push(icon);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::collections::HashSet;

    fn write_png(path: &Path, color: [u8; 3]) {
        RgbImage::from_pixel(6, 12, Rgb(color)).save(path).unwrap();
    }

    #[test]
    fn test_missing_inputs_are_all_listed() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("screen-mini-apps.png"), [1, 1, 1]);
        let err = resolve_raw_inputs(dir.path()).unwrap_err();
        match err.downcast_ref::<AssetError>() {
            Some(AssetError::MissingInput(missing)) => assert_eq!(
                missing,
                &vec![
                    "screen-world-map.png (ou screen-home.png)".to_string(),
                    "screen-team-chat.png".to_string(),
                ]
            ),
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn test_legacy_names_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("screen-home.png"), [1, 0, 0]);
        write_png(&dir.path().join("screen-town-map.png"), [0, 1, 0]);
        write_png(&dir.path().join("screen-team-chat.png"), [0, 0, 1]);
        let inputs = resolve_raw_inputs(dir.path()).unwrap();
        assert_eq!(inputs.paths[0], dir.path().join("screen-home.png"));
        assert_eq!(inputs.paths[1], dir.path().join("screen-town-map.png"));
    }

    #[test]
    fn test_primary_name_wins_over_legacy() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("screen-world-map.png"), [1, 0, 0]);
        write_png(&dir.path().join("screen-home.png"), [9, 9, 9]);
        write_png(&dir.path().join("screen-mini-apps.png"), [0, 1, 0]);
        write_png(&dir.path().join("screen-team-chat.png"), [0, 0, 1]);
        let inputs = resolve_raw_inputs(dir.path()).unwrap();
        assert_eq!(inputs.paths[0], dir.path().join("screen-world-map.png"));
    }

    #[test]
    fn test_duplicate_inputs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("screen-world-map.png"), [5, 5, 5]);
        write_png(&dir.path().join("screen-mini-apps.png"), [0, 1, 0]);
        write_png(&dir.path().join("screen-team-chat.png"), [5, 5, 5]);
        let err = resolve_raw_inputs(dir.path()).unwrap_err();
        match err.downcast_ref::<AssetError>() {
            Some(AssetError::DuplicateInput { duplicates, hashes }) => {
                assert_eq!(
                    duplicates,
                    &vec!["screen-team-chat.png = screen-world-map.png".to_string()]
                );
                assert_eq!(hashes.len(), 3);
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn test_poster_targets_fan_out() {
        let layout = Layout::new("/app");
        let targets = poster_targets(&layout);
        assert_eq!(targets.len(), LOCALES.len() * 3 * (IOS_SIZES.len() + 1));
        let unique: HashSet<_> = targets.iter().map(|t| t.path.clone()).collect();
        assert_eq!(unique.len(), targets.len());

        assert!(targets.iter().any(|t| t.path
            == PathBuf::from("/app/fastlane/screenshots/zh-Hans/02_mini_apps_1242x2688.png")
            && t.size == (1242, 2688)
            && t.shot == 1));
        assert!(targets.iter().any(|t| t.path
            == PathBuf::from(
                "/app/fastlane/metadata/android/en-US/images/phoneScreenshots/3.png"
            )
            && t.size == ANDROID_SIZE
            && t.shot == 2));
    }

    #[test]
    fn test_file_hash_is_sha256_hex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(
            file_hash(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
