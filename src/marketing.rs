//! Logos, feature graphic do Play e ícone da listagem.

use anyhow::Result;
use image::{DynamicImage, Rgba, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};

use crate::brand::{render_brand_mark, BrandStyle, Mode, Preset, Theme};
use crate::config::Layout;
use crate::output;
use crate::raster::{self, fill, overlay, soft_glow, Bounds, RoundedRect};
use crate::typography::{self, FontBook, Weight};

pub const BRAND_NAME: &str = "AgentTown";
const LOGO_TAGLINE: &str = "Chat-driven Mini Apps for AI Teams";
const LOGO_PILL: &str = "AI WORLD";
pub const FEATURE_TAGLINE: &str = "Chat-driven AI Mini Apps";

const ACCENT: Rgba<u8> = Rgba([34, 197, 94, 255]);

const HORIZONTAL_SIZE: (u32, u32) = (2048, 640);
const FEATURE_SIZE: (u32, u32) = (1024, 500);
const PLAY_ICON_SIZE: u32 = 512;

fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "dark",
        Theme::Light => "light",
    }
}

/// Logo horizontal: marca em cartão + nome + tagline + pílula.
pub fn compose_horizontal_logo(theme: Theme, preset: Preset, fonts: &FontBook) -> RgbaImage {
    let (width, height) = HORIZONTAL_SIZE;
    let dark = theme == Theme::Dark;
    let mut canvas = if dark {
        raster::vertical_gradient(width, height, [10, 16, 34], [17, 23, 42])
    } else {
        raster::vertical_gradient(width, height, [247, 250, 255], [234, 242, 252])
    };
    let w = width as f32;
    soft_glow(
        &mut canvas,
        Bounds::new(w - 520.0, 110.0, w - 120.0, 510.0),
        Rgba([34, 197, 94, 45]),
        44.0,
    );

    let mark_size = 420;
    let mark = render_brand_mark(&BrandStyle::new(mark_size, theme, Mode::Card).with_preset(preset));
    overlay(&mut canvas, &mark, 120, i64::from((height - mark_size) / 2));

    let (title, subtitle) = if dark {
        (Rgba([242, 247, 255, 255]), Rgba([168, 184, 208, 255]))
    } else {
        (Rgba([11, 23, 41, 255]), Rgba([71, 85, 105, 255]))
    };
    typography::draw(&mut canvas, fonts, Weight::Bold, 126.0, (600, 196), title, BRAND_NAME);
    typography::draw(&mut canvas, fonts, Weight::Regular, 42.0, (600, 340), subtitle, LOGO_TAGLINE);
    fill(
        &mut canvas,
        &RoundedRect::new(Bounds::new(600.0, 126.0, 835.0, 171.0), 22.0),
        Rgba([34, 197, 94, 32]),
    );
    typography::draw(&mut canvas, fonts, Weight::Bold, 30.0, (630, 130), ACCENT, LOGO_PILL);

    canvas
}

/// Feature graphic 1024x500 do Google Play.
pub fn compose_feature_graphic(title: &str, subtitle: &str, preset: Preset, fonts: &FontBook) -> RgbaImage {
    let (width, height) = FEATURE_SIZE;
    let mut canvas = raster::vertical_gradient(width, height, [8, 13, 36], [23, 20, 47]);
    soft_glow(
        &mut canvas,
        Bounds::new(560.0, -100.0, 1100.0, 470.0),
        Rgba([34, 197, 94, 95]),
        56.0,
    );
    soft_glow(
        &mut canvas,
        Bounds::new(420.0, 240.0, 920.0, 700.0),
        Rgba([220, 38, 127, 85]),
        56.0,
    );

    let mark = render_brand_mark(&BrandStyle::new(200, Theme::Dark, Mode::Card).with_preset(preset));
    overlay(&mut canvas, &mark, 70, 145);

    typography::draw(
        &mut canvas,
        fonts,
        Weight::Bold,
        78.0,
        (300, 165),
        Rgba([245, 249, 255, 255]),
        title,
    );
    typography::draw(
        &mut canvas,
        fonts,
        Weight::Regular,
        34.0,
        (300, 270),
        Rgba([180, 196, 218, 255]),
        subtitle,
    );
    canvas
}

pub fn create_feature_graphic(
    output_path: &Path,
    title: &str,
    subtitle: &str,
    preset: Preset,
    fonts: &FontBook,
) -> Result<()> {
    let canvas = compose_feature_graphic(title, subtitle, preset, fonts);
    output::save_flattened(&canvas, output_path)
}

/// Ícone 512 da listagem: marca sem cartão, tema escuro, sem alfa.
pub fn play_icon(preset: Preset) -> RgbImage {
    let mark = render_brand_mark(
        &BrandStyle::new(PLAY_ICON_SIZE, Theme::Dark, Mode::Plain).with_preset(preset),
    );
    DynamicImage::ImageRgba8(mark).to_rgb8()
}

/// Marcas 1024 (escura/clara), logos horizontais e ícone do Play.
pub fn draw_logo_variants(layout: &Layout, preset: Preset, fonts: &FontBook) -> Result<Vec<PathBuf>> {
    let logo_dir = layout.logo_dir();
    output::ensure_dir(&logo_dir)?;
    let mut written = Vec::new();

    for theme in [Theme::Dark, Theme::Light] {
        let mark = render_brand_mark(&BrandStyle::new(1024, theme, Mode::Card).with_preset(preset));
        let path = logo_dir.join(format!("agenttown-logo-mark-{}-1024.png", theme_name(theme)));
        output::save_rgba(&mark, &path)?;
        written.push(path);
    }

    for theme in [Theme::Dark, Theme::Light] {
        let (w, h) = HORIZONTAL_SIZE;
        let canvas = compose_horizontal_logo(theme, preset, fonts);
        let path = logo_dir.join(format!(
            "agenttown-logo-horizontal-{}-{w}x{h}.png",
            theme_name(theme)
        ));
        output::save_flattened(&canvas, &path)?;
        written.push(path);
    }

    let path = layout.generated_dir().join("agenttown-play-icon-512.png");
    output::save_rgb(&play_icon(preset), &path, output::Encoding::Png)?;
    written.push(path);

    tracing::info!(count = written.len(), dir = %logo_dir.display(), "logos gerados");
    Ok(written)
}
