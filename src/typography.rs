use ab_glyph::{FontArc, FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};

use crate::config::FontSettings;

/// Fontes procuradas em ordem. As primeiras cobrem CJK (textos zh).
const REGULAR_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    r"C:\Windows\Fonts\msyh.ttc",
    r"C:\Windows\Fonts\arial.ttf",
];

const BOLD_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    r"C:\Windows\Fonts\msyhbd.ttc",
    r"C:\Windows\Fonts\arialbd.ttf",
];

/// DejaVu Sans embutida: garante texto mesmo sem fontes no sistema
/// (sem glifos CJK).
const BUNDLED_REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
const BUNDLED_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// Fontes carregadas para os textos das artes. Sempre há uma face por peso:
/// a do sistema quando encontrada, senão a embutida.
#[derive(Clone)]
pub struct FontBook {
    regular: FontArc,
    bold: FontArc,
}

impl FontBook {
    pub fn discover(settings: &FontSettings) -> Result<Self> {
        let bundled = Self::bundled()?;
        let regular = first_loadable(
            settings
                .regular
                .iter()
                .cloned()
                .chain(REGULAR_CANDIDATES.iter().map(PathBuf::from)),
        );
        let bold = first_loadable(
            settings
                .bold
                .iter()
                .cloned()
                .chain(BOLD_CANDIDATES.iter().map(PathBuf::from)),
        );
        if regular.is_none() || bold.is_none() {
            tracing::warn!("fonte do sistema não encontrada; usando DejaVu Sans embutida (sem CJK)");
        }
        Ok(Self {
            regular: regular.unwrap_or(bundled.regular),
            bold: bold.unwrap_or(bundled.bold),
        })
    }

    /// Só as faces embutidas.
    pub fn bundled() -> Result<Self> {
        let regular =
            FontArc::try_from_slice(BUNDLED_REGULAR).context("Falha ao carregar fonte embutida")?;
        let bold =
            FontArc::try_from_slice(BUNDLED_BOLD).context("Falha ao carregar fonte embutida (bold)")?;
        Ok(Self { regular, bold })
    }

    pub fn face(&self, weight: Weight) -> &FontArc {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }
}

fn first_loadable(paths: impl Iterator<Item = PathBuf>) -> Option<FontArc> {
    paths.filter(|p| p.exists()).find_map(|p| match load_font(&p) {
        Ok(font) => {
            tracing::debug!(path = %p.display(), "fonte carregada");
            Some(font)
        }
        Err(e) => {
            tracing::warn!(path = %p.display(), "fonte ignorada: {e}");
            None
        }
    })
}

fn load_font(path: &Path) -> Result<FontArc> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Fonte não encontrada: {}", path.display()))?;
    // .ttc: usa a primeira face da coleção
    let font = FontVec::try_from_vec_and_index(bytes, 0)
        .with_context(|| format!("Falha ao carregar fonte {}", path.display()))?;
    Ok(FontArc::new(font))
}

/// Largura do texto em pixels.
pub fn measure(fonts: &FontBook, weight: Weight, px: f32, text: &str) -> u32 {
    text_size(PxScale::from(px), fonts.face(weight), text).0
}

/// Desenha o texto com o canto superior esquerdo em (`x`, `y`).
pub fn draw(
    canvas: &mut RgbaImage,
    fonts: &FontBook,
    weight: Weight,
    px: f32,
    (x, y): (i32, i32),
    color: Rgba<u8>,
    text: &str,
) {
    draw_text_mut(canvas, color, x, y, PxScale::from(px), fonts.face(weight), text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_grows_with_text() {
        let fonts = FontBook::bundled().unwrap();
        let short = measure(&fonts, Weight::Bold, 40.0, "AI");
        let long = measure(&fonts, Weight::Bold, 40.0, "AGENTTOWN");
        assert!(short > 0);
        assert!(long > short);
        assert_eq!(measure(&fonts, Weight::Regular, 10.0, ""), 0);
    }

    #[test]
    fn test_draw_with_bundled_font_marks_pixels() {
        let mut img = RgbaImage::from_pixel(120, 60, Rgba([0, 0, 0, 255]));
        draw(
            &mut img,
            &FontBook::bundled().unwrap(),
            Weight::Bold,
            32.0,
            (4, 4),
            Rgba([255, 255, 255, 255]),
            "Ag",
        );
        assert!(img.pixels().any(|p| p[0] > 128));
    }

    #[test]
    fn test_discover_always_has_faces() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        let settings = FontSettings {
            regular: vec![bogus.clone()],
            bold: vec![bogus],
        };
        let fonts = FontBook::discover(&settings).unwrap();
        assert!(measure(&fonts, Weight::Regular, 20.0, "AgentTown") > 0);
        assert!(measure(&fonts, Weight::Bold, 20.0, "AgentTown") > 0);
    }

    #[test]
    fn test_invalid_font_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        assert!(first_loadable(std::iter::once(bogus)).is_none());
    }
}
