//! Screenshots de loja: recorte "cover", moldura de celular e pôster com
//! textos sobre fundo temático.

use anyhow::Result;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbImage, RgbaImage};
use std::path::Path;

use crate::output;
use crate::raster::{self, fill, fill_with, rgba, soft_glow, soft_shadow, Bounds, RoundedRect, Stroke};
use crate::typography::{self, FontBook, Weight};

/// Padding horizontal total do badge (texto + 72px).
pub const BADGE_PADDING: u32 = 72;
const BADGE_HEIGHT: f32 = 70.0;
const BADGE_ORIGIN: (i32, i32) = (92, 110);

/// Textos de um pôster.
#[derive(Debug, Clone, Copy)]
pub struct PosterCopy<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub badge: &'a str,
}

/// Caixa (x, y, largura, altura) do recorte central com a proporção do alvo.
pub fn cover_crop_box((src_w, src_h): (u32, u32), (target_w, target_h): (u32, u32)) -> (u32, u32, u32, u32) {
    let (sw, sh) = (u64::from(src_w), u64::from(src_h));
    let (tw, th) = (u64::from(target_w.max(1)), u64::from(target_h.max(1)));
    // src_w/src_h > target_w/target_h, sem ponto flutuante
    if sw * th > tw * sh {
        let new_w = (sh * tw / th).clamp(1, sw);
        let left = (sw - new_w) / 2;
        (left as u32, 0, new_w as u32, src_h)
    } else {
        let new_h = (sw * th / tw).clamp(1, sh);
        let top = (sh - new_h) / 2;
        (0, top as u32, src_w, new_h as u32)
    }
}

/// Recorta no centro para a proporção do alvo e redimensiona para o tamanho
/// exato. Nunca distorce.
pub fn crop_cover(image: &RgbImage, target: (u32, u32)) -> RgbImage {
    let (x, y, w, h) = cover_crop_box(image.dimensions(), target);
    let cropped = imageops::crop_imm(image, x, y, w, h).to_image();
    imageops::resize(&cropped, target.0, target.1, FilterType::Lanczos3)
}

/// Coloca o screenshot numa moldura de celular com cantos arredondados e
/// sombra deslocada. A altura segue a proporção do screenshot.
pub fn add_phone_mockup(
    canvas: &mut RgbaImage,
    screenshot: &RgbImage,
    (x, y): (i64, i64),
    width: u32,
    radius: f32,
) {
    let width = width.max(1);
    let (sw, sh) = screenshot.dimensions();
    let height = (u64::from(width) * u64::from(sh) / u64::from(sw.max(1))).max(1) as u32;
    let shot = imageops::resize(screenshot, width, height, FilterType::Lanczos3);
    let (xf, yf) = (x as f32, y as f32);
    let (wf, hf) = (width as f32, height as f32);

    soft_shadow(
        canvas,
        &RoundedRect::new(Bounds::from_size(xf - 10.0, yf + 12.0, wf + 40.0, hf + 40.0), radius + 12.0),
        0.0,
        0.0,
        Rgba([0, 0, 0, 130]),
        20.0,
    );

    let frame = RoundedRect::new(Bounds::from_size(xf, yf, wf + 20.0, hf + 20.0), radius + 10.0);
    fill(canvas, &frame, Rgba([245, 248, 255, 255]));
    fill(
        canvas,
        &Stroke {
            shape: frame,
            width: 2.0,
        },
        Rgba([220, 229, 245, 255]),
    );

    let (ox, oy) = (x + 10, y + 10);
    let screen = RoundedRect::new(Bounds::from_size(ox as f32, oy as f32, wf, hf), radius);
    fill_with(canvas, &screen, |px, py| {
        let sx = (i64::from(px) - ox).clamp(0, i64::from(width) - 1) as u32;
        let sy = (i64::from(py) - oy).clamp(0, i64::from(height) - 1) as u32;
        let p = shot.get_pixel(sx, sy);
        rgba(p.0, 255)
    });
}

/// Largura do badge para um texto já medido.
pub fn badge_width(text_width: u32) -> u32 {
    text_width + BADGE_PADDING
}

struct PosterTheme {
    top: [u8; 3],
    bottom: [u8; 3],
    title: Rgba<u8>,
    subtitle: Rgba<u8>,
}

fn poster_theme(dark: bool) -> PosterTheme {
    if dark {
        PosterTheme {
            top: [7, 9, 34],
            bottom: [22, 24, 48],
            title: Rgba([247, 250, 255, 255]),
            subtitle: Rgba([190, 204, 224, 255]),
        }
    } else {
        PosterTheme {
            top: [240, 247, 255],
            bottom: [228, 244, 232],
            title: Rgba([15, 23, 42, 255]),
            subtitle: Rgba([71, 85, 105, 255]),
        }
    }
}

/// Monta o pôster em memória.
pub fn compose_store_poster(
    (width, height): (u32, u32),
    copy: &PosterCopy,
    screenshot: &RgbImage,
    dark: bool,
    fonts: &FontBook,
) -> RgbaImage {
    let theme = poster_theme(dark);
    let (w, h) = (width as f32, height as f32);
    let mut canvas = raster::vertical_gradient(width, height, theme.top, theme.bottom);

    soft_glow(
        &mut canvas,
        Bounds::new(w - 640.0, h - 980.0, w + 80.0, h - 220.0),
        Rgba([34, 197, 94, 82]),
        70.0,
    );
    soft_glow(
        &mut canvas,
        Bounds::new(-320.0, -140.0, 380.0, 560.0),
        Rgba([59, 130, 246, 75]),
        70.0,
    );

    let (bx, by) = BADGE_ORIGIN;
    let badge_w = badge_width(typography::measure(fonts, Weight::Bold, 40.0, copy.badge));
    fill(
        &mut canvas,
        &RoundedRect::new(
            Bounds::from_size(bx as f32, by as f32, badge_w as f32, BADGE_HEIGHT),
            BADGE_HEIGHT * 0.5,
        ),
        Rgba([34, 197, 94, 255]),
    );
    typography::draw(
        &mut canvas,
        fonts,
        Weight::Bold,
        40.0,
        (bx + 34, by + 14),
        Rgba([12, 22, 28, 255]),
        copy.badge,
    );
    typography::draw(&mut canvas, fonts, Weight::Bold, 112.0, (92, 225), theme.title, copy.title);
    typography::draw(
        &mut canvas,
        fonts,
        Weight::Regular,
        54.0,
        (92, 360),
        theme.subtitle,
        copy.subtitle,
    );

    let shot_w = width * 72 / 100;
    let shot_x = (width - shot_w) / 2;
    let shot_y = height * 44 / 100;
    let radius = if width > 1200 { 88.0 } else { 70.0 };
    add_phone_mockup(
        &mut canvas,
        screenshot,
        (i64::from(shot_x), i64::from(shot_y)),
        shot_w,
        radius,
    );

    canvas
}

/// Monta e grava o pôster como PNG RGB.
pub fn create_store_poster(
    output_path: &Path,
    size: (u32, u32),
    copy: &PosterCopy,
    screenshot: &RgbImage,
    dark: bool,
    fonts: &FontBook,
) -> Result<()> {
    let canvas = compose_store_poster(size, copy, screenshot, dark, fonts);
    output::save_flattened(&canvas, output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_cover_box_crops_wide_source_horizontally() {
        let (x, y, w, h) = cover_crop_box((2000, 1000), (1170, 2532));
        assert_eq!((y, h), (0, 1000));
        assert_eq!(w, 1000 * 1170 / 2532);
        assert_eq!(x, (2000 - w) / 2);
    }

    #[test]
    fn test_cover_box_crops_tall_source_vertically() {
        let (x, y, w, h) = cover_crop_box((1179, 2556), (1080, 1920));
        assert_eq!((x, w), (0, 1179));
        assert_eq!(h, 1179 * 1920 / 1080);
        assert_eq!(y, (2556 - h) / 2);
    }

    #[test]
    fn test_cover_box_keeps_target_ratio() {
        let sources = [(1170, 2532), (1290, 2796), (640, 480), (500, 500), (3, 1000)];
        let targets = [(1170, 2532), (1080, 1920), (1024, 500), (48, 48)];
        for src in sources {
            for target in targets {
                let (x, y, w, h) = cover_crop_box(src, target);
                assert!(x + w <= src.0 && y + h <= src.1);
                // proporção igual à do alvo, com erro de no máximo 1px no eixo recortado
                let expected_w = h as f64 * target.0 as f64 / target.1 as f64;
                let expected_h = w as f64 * target.1 as f64 / target.0 as f64;
                assert!(
                    (w as f64 - expected_w).abs() <= 1.0 || (h as f64 - expected_h).abs() <= 1.0,
                    "{src:?} -> {target:?}: {w}x{h}"
                );
            }
        }
    }

    #[test]
    fn test_crop_cover_exact_size() {
        let src = RgbImage::from_fn(300, 200, |x, _| Rgb([x as u8, 0, 0]));
        for target in [(117, 253), (90, 60), (64, 64)] {
            assert_eq!(crop_cover(&src, target).dimensions(), target);
        }
    }

    #[test]
    fn test_crop_cover_discards_sides() {
        // faixas laterais vermelhas, centro azul: o recorte retrato só vê azul
        let src = RgbImage::from_fn(300, 100, |x, _| {
            if (100..200).contains(&x) {
                Rgb([0, 0, 255])
            } else {
                Rgb([255, 0, 0])
            }
        });
        let out = crop_cover(&src, (50, 100));
        assert!(out.pixels().all(|p| p[2] > 200 && p[0] < 40), "bordas vazaram");
    }

    #[test]
    fn test_badge_width_grows_with_text() {
        let fonts = FontBook::bundled().unwrap();
        let short = badge_width(typography::measure(&fonts, Weight::Bold, 40.0, "AI"));
        let long = badge_width(typography::measure(&fonts, Weight::Bold, 40.0, "TEAM COLLABORATION"));
        assert!(short > BADGE_PADDING);
        assert!(long > short);
    }

    #[test]
    fn test_phone_mockup_rounds_corners() {
        let mut canvas = RgbaImage::from_pixel(400, 600, Rgba([0, 0, 0, 255]));
        let shot = RgbImage::from_pixel(100, 200, Rgb([255, 0, 0]));
        add_phone_mockup(&mut canvas, &shot, (50, 40), 200, 40.0);
        // centro da tela: screenshot
        assert_eq!(canvas.get_pixel(160, 250), &Rgba([255, 0, 0, 255]));
        // canto da tela: moldura, não screenshot
        let corner = canvas.get_pixel(66, 56);
        assert_eq!(corner, &Rgba([245, 248, 255, 255]));
    }

    fn sample_copy(title: &'static str, subtitle: &'static str) -> PosterCopy<'static> {
        PosterCopy {
            title,
            subtitle,
            badge: "AGENTTOWN",
        }
    }

    #[test]
    fn test_poster_has_requested_size() {
        let fonts = FontBook::bundled().unwrap();
        let shot = RgbImage::from_pixel(117, 253, Rgb([30, 120, 200]));
        let copy = sample_copy("Agent World", "Explore your AI neighborhood");
        let poster = compose_store_poster((540, 960), &copy, &shot, true, &fonts);
        assert_eq!(poster.dimensions(), (540, 960));
        // ponta direita do badge: verde, sem texto
        let badge_w = badge_width(typography::measure(&fonts, Weight::Bold, 40.0, copy.badge));
        let x = BADGE_ORIGIN.0 as u32 + badge_w - 20;
        assert_eq!(poster.get_pixel(x, 145), &Rgba([34, 197, 94, 255]));
    }

    #[test]
    fn test_poster_draws_title_and_subtitle() {
        let fonts = FontBook::bundled().unwrap();
        let shot = RgbImage::from_pixel(117, 253, Rgb([30, 120, 200]));
        let size = (1080, 1920);
        let with_text = compose_store_poster(
            size,
            &sample_copy("Agent World", "Explore your AI neighborhood"),
            &shot,
            true,
            &fonts,
        );
        let blank = compose_store_poster(size, &sample_copy("", ""), &shot, true, &fonts);

        let changed = (225..460)
            .flat_map(|y| (92..1000).map(move |x| (x, y)))
            .filter(|&(x, y)| with_text.get_pixel(x, y) != blank.get_pixel(x, y))
            .count();
        assert!(changed > 1000, "faixa de título/subtítulo sem texto ({changed} px)");
    }
}
