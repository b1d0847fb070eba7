use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::path::Path;

/// Formato de gravação de um slot de asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Png,
    /// WebP sem perdas (o encoder do `image` só grava lossless).
    WebP,
}

impl Encoding {
    fn format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::WebP => ImageFormat::WebP,
        }
    }
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Não foi possível criar diretório: {}", dir.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Grava a imagem RGB, sobrescrevendo o que houver no caminho.
pub fn save_rgb(img: &RgbImage, path: &Path, encoding: Encoding) -> Result<()> {
    ensure_parent(path)?;
    img.save_with_format(path, encoding.format())
        .with_context(|| format!("Falha ao salvar {}", path.display()))?;
    tracing::debug!(path = %path.display(), w = img.width(), h = img.height(), "imagem salva");
    Ok(())
}

/// Achata o canvas para RGB e grava como PNG.
pub fn save_flattened(img: &RgbaImage, path: &Path) -> Result<()> {
    let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    save_rgb(&rgb, path, Encoding::Png)
}

/// Grava como PNG mantendo a transparência.
pub fn save_rgba(img: &RgbaImage, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Falha ao salvar {}", path.display()))?;
    tracing::debug!(path = %path.display(), w = img.width(), h = img.height(), "imagem salva");
    Ok(())
}
