//! Marca do AgentTown desenhada proceduralmente: globo + balão de chat.
//!
//! Ordem fixa de composição: gradiente de fundo, brilhos desfocados, cartão
//! opcional, símbolo. Todas as medidas do símbolo são frações do tamanho,
//! então a mesma marca serve de 48 a 1024 px.

use image::{Rgba, RgbaImage};
use serde::Deserialize;

use crate::raster::{
    self, fill, fill_vertical_gradient, rgba, soft_fill, soft_glow, soft_shadow, Bounds, Capsule,
    Ellipse, Rgb8, RoundedRect, Stroke, Triangle, Union,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Símbolo sobre cartão arredondado com borda.
    Card,
    /// Símbolo direto sobre o fundo (ícones de app).
    Plain,
}

/// Revisões visuais da marca. Mesma assinatura, geometria e paleta distintas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Globo acima do balão de chat, paleta navy/verde.
    #[default]
    Classic,
    /// Globo dentro do balão, paleta violeta/ciano.
    Aurora,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandStyle {
    pub size: u32,
    pub theme: Theme,
    pub mode: Mode,
    pub preset: Preset,
}

impl BrandStyle {
    pub fn new(size: u32, theme: Theme, mode: Mode) -> Self {
        Self {
            size,
            theme,
            mode,
            preset: Preset::Classic,
        }
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    fn dark(&self) -> bool {
        self.theme == Theme::Dark
    }
}

struct Backdrop {
    top: Rgb8,
    bottom: Rgb8,
    border: Rgba<u8>,
    card: Rgba<u8>,
    hairline: Rgba<u8>,
    /// (caixa em frações do tamanho, cor)
    glows: &'static [([f32; 4], Rgba<u8>)],
}

const CLASSIC_DARK_GLOWS: &[([f32; 4], Rgba<u8>)] = &[
    ([0.15, -0.18, 0.92, 0.52], Rgba([43, 223, 149, 95])),
    ([-0.24, 0.46, 0.44, 1.14], Rgba([75, 158, 255, 70])),
    ([0.36, 0.60, 1.08, 1.24], Rgba([203, 35, 128, 72])),
];

const CLASSIC_LIGHT_GLOWS: &[([f32; 4], Rgba<u8>)] = &[
    ([0.15, -0.18, 0.92, 0.52], Rgba([52, 211, 153, 56])),
    ([-0.24, 0.46, 0.44, 1.14], Rgba([96, 165, 250, 52])),
];

const AURORA_DARK_GLOWS: &[([f32; 4], Rgba<u8>)] = &[
    ([-0.10, -0.20, 0.60, 0.45], Rgba([139, 92, 246, 90])),
    ([0.45, 0.55, 1.15, 1.20], Rgba([45, 212, 191, 80])),
];

const AURORA_LIGHT_GLOWS: &[([f32; 4], Rgba<u8>)] = &[
    ([-0.10, -0.20, 0.60, 0.45], Rgba([139, 92, 246, 50])),
    ([0.45, 0.55, 1.15, 1.20], Rgba([45, 212, 191, 48])),
];

fn backdrop(style: &BrandStyle) -> Backdrop {
    match (style.preset, style.theme) {
        (Preset::Classic, Theme::Dark) => Backdrop {
            top: [2, 10, 36],
            bottom: [8, 23, 66],
            border: Rgba([74, 103, 171, 196]),
            card: Rgba([7, 23, 64, 238]),
            hairline: Rgba([180, 220, 255, 38]),
            glows: CLASSIC_DARK_GLOWS,
        },
        (Preset::Classic, Theme::Light) => Backdrop {
            top: [240, 247, 255],
            bottom: [228, 239, 252],
            border: Rgba([170, 194, 225, 196]),
            card: Rgba([248, 252, 255, 248]),
            hairline: Rgba([153, 176, 206, 62]),
            glows: CLASSIC_LIGHT_GLOWS,
        },
        (Preset::Aurora, Theme::Dark) => Backdrop {
            top: [9, 8, 38],
            bottom: [28, 16, 72],
            border: Rgba([118, 96, 196, 196]),
            card: Rgba([18, 14, 58, 238]),
            hairline: Rgba([214, 200, 255, 38]),
            glows: AURORA_DARK_GLOWS,
        },
        (Preset::Aurora, Theme::Light) => Backdrop {
            top: [248, 246, 255],
            bottom: [236, 232, 252],
            border: Rgba([196, 184, 236, 196]),
            card: Rgba([252, 250, 255, 248]),
            hairline: Rgba([176, 160, 220, 62]),
            glows: AURORA_LIGHT_GLOWS,
        },
    }
}

/// Renderiza a marca. Função pura: mesmo estilo, mesmos pixels.
pub fn render_brand_mark(style: &BrandStyle) -> RgbaImage {
    let size = style.size.max(1);
    let s = size as f32;
    let look = backdrop(style);

    let mut canvas = raster::vertical_gradient(size, size, look.top, look.bottom);

    for (frac, color) in look.glows {
        let [l, t, r, b] = *frac;
        soft_glow(&mut canvas, Bounds::fraction(s, l, t, r, b), *color, s / 8.0);
    }

    let symbol = match style.mode {
        Mode::Card => {
            draw_card(&mut canvas, s, &look);
            s * 0.56
        }
        Mode::Plain => s * 0.64,
    };

    let center = (s * 0.5, s * 0.5);
    match style.preset {
        Preset::Classic => draw_globe_over_bubble(&mut canvas, center, symbol, style.dark()),
        Preset::Aurora => draw_globe_in_bubble(&mut canvas, center, symbol, style.dark()),
    }

    canvas
}

fn draw_card(canvas: &mut RgbaImage, s: f32, look: &Backdrop) {
    let pad = s * 0.07;
    let radius = s * 0.23;
    let card = Bounds::new(pad, pad, s - pad, s - pad);

    fill(canvas, &RoundedRect::new(card, radius), look.card);
    fill(
        canvas,
        &Stroke {
            shape: RoundedRect::new(card, radius),
            width: (s / 280.0).max(0.5),
        },
        look.border,
    );

    let inset = s / 340.0;
    fill(
        canvas,
        &Stroke {
            shape: RoundedRect::new(card.inset(inset), radius - inset),
            width: (s / 512.0).max(0.5),
        },
        look.hairline,
    );
}

/// Ponto de status: halo desfocado + disco com contorno branco.
fn draw_status_dot(canvas: &mut RgbaImage, (x, y): (f32, f32), r: f32, fill_color: Rgb8, halo: Rgba<u8>, blur: f32, stroke: f32) {
    soft_glow(
        canvas,
        Bounds::new(x - r * 3.0, y - r * 3.0, x + r * 3.0, y + r * 3.0),
        halo,
        blur,
    );
    let disc = Ellipse(Bounds::new(x - r, y - r, x + r, y + r));
    fill(canvas, &disc, rgba(fill_color, 255));
    fill(
        canvas,
        &Stroke {
            shape: disc,
            width: (stroke / 3.0).max(0.5),
        },
        Rgba([255, 255, 255, 248]),
    );
}

/// Linhas de meridiano, paralelo e equador sobre um globo de raio `r`.
fn draw_globe_lines(canvas: &mut RgbaImage, (cx, cy): (f32, f32), r: f32, stroke: f32, color: Rgba<u8>) {
    let meridian = Ellipse(Bounds::new(
        cx - r * 0.57,
        cy - r * 0.98,
        cx + r * 0.57,
        cy + r * 0.98,
    ));
    let parallel = Ellipse(Bounds::new(
        cx - r * 0.98,
        cy - r * 0.34,
        cx + r * 0.98,
        cy + r * 0.34,
    ));
    fill(canvas, &Stroke { shape: meridian, width: stroke }, color);
    fill(canvas, &Stroke { shape: parallel, width: stroke }, color);
    fill(
        canvas,
        &Capsule {
            from: (cx - r * 0.90, cy),
            to: (cx + r * 0.90, cy),
            width: stroke,
        },
        color,
    );
}

/// Sobreposição da cauda do balão com o corpo, em fração do símbolo.
const TAIL_OVERLAP: f32 = 1.0 / 160.0;

fn draw_globe_over_bubble(canvas: &mut RgbaImage, (cx, cy): (f32, f32), s: f32, dark: bool) {
    let line = if dark {
        Rgba([246, 252, 255, 248])
    } else {
        Rgba([22, 40, 77, 236])
    };
    let stroke = s / 52.0;

    // globo
    let r = s * 0.39;
    let gcy = cy - s * 0.20;
    let globe = Bounds::new(cx - r, gcy - r, cx + r, gcy + r);

    soft_glow(
        canvas,
        Bounds::new(
            globe.left - r * 0.35,
            globe.top - r * 0.30,
            globe.right + r * 0.35,
            globe.bottom + r * 0.45,
        ),
        if dark {
            Rgba([34, 197, 94, 130])
        } else {
            Rgba([16, 185, 129, 90])
        },
        s / 12.0,
    );

    let (globe_top, globe_bottom) = if dark {
        ([88, 246, 178], [25, 190, 123])
    } else {
        ([47, 219, 152], [20, 161, 109])
    };
    fill_vertical_gradient(canvas, &Ellipse(globe), globe_top, globe_bottom);

    let d = globe.width();
    soft_fill(
        canvas,
        &Ellipse(Bounds::new(
            globe.left + d * 0.12,
            globe.top + d * 0.04,
            globe.left + d * 0.56,
            globe.top + d * 0.46,
        )),
        Rgba([255, 255, 255, if dark { 62 } else { 46 }]),
        s / 58.0,
    );

    draw_globe_lines(canvas, (cx, gcy), r, stroke, line);

    draw_status_dot(
        canvas,
        (cx + r * 0.76, gcy + r * 0.70),
        s / 36.0,
        [34, 197, 94],
        Rgba([32, 221, 136, if dark { 128 } else { 90 }]),
        s / 84.0,
        stroke,
    );

    // balão
    let bw = s * 0.86;
    let bh = s * 0.30;
    let tail_h = s * 0.11;
    let bx = cx - bw * 0.5;
    let by = cy + s * 0.26;
    let body = RoundedRect::new(Bounds::from_size(bx, by, bw, bh), bh * 0.48);
    // a cauda entra um pouco no corpo para não deixar fresta
    let overlap = s * TAIL_OVERLAP;
    let tail = Triangle([
        (bx + bw * 0.44, by + bh - overlap),
        (bx + bw * 0.56, by + bh - overlap),
        (bx + bw * 0.50, by + bh + tail_h - s * 0.01),
    ]);

    let offset = s / 96.0;
    soft_shadow(
        canvas,
        &Union(body, tail),
        offset,
        offset + s / 160.0,
        Rgba([8, 22, 44, if dark { 120 } else { 72 }]),
        s / 64.0,
    );

    let (bubble_top, bubble_bottom) = if dark {
        ([250, 252, 255], [226, 234, 246])
    } else {
        ([247, 250, 255], [222, 233, 246])
    };
    fill_vertical_gradient(canvas, &body, bubble_top, bubble_bottom);
    fill(canvas, &tail, rgba(bubble_bottom, 255));

    soft_fill(
        canvas,
        &RoundedRect::new(
            Bounds::new(bx + bw * 0.08, by + bh * 0.20, bx + bw * 0.92, by + bh * 0.34),
            bh / 16.0,
        ),
        Rgba([204, 215, 232, if dark { 145 } else { 118 }]),
        s / 140.0,
    );
}

fn draw_globe_in_bubble(canvas: &mut RgbaImage, (cx, cy): (f32, f32), s: f32, dark: bool) {
    let stroke = s / 40.0;

    let bw = s * 0.84;
    let bh = s * 0.66;
    let bx = cx - bw * 0.5;
    let by = cy - s * 0.40;
    let body = RoundedRect::new(Bounds::from_size(bx, by, bw, bh), s * 0.22);
    let overlap = s * TAIL_OVERLAP;
    let tail = Triangle([
        (bx + bw * 0.18, by + bh - overlap),
        (bx + bw * 0.38, by + bh - overlap),
        (bx + bw * 0.10, by + bh + s * 0.16),
    ]);
    let bubble = Union(body, tail);

    soft_fill(
        canvas,
        &bubble,
        if dark {
            Rgba([124, 92, 255, 110])
        } else {
            Rgba([139, 92, 246, 70])
        },
        s / 10.0,
    );
    let offset = s / 80.0;
    soft_shadow(
        canvas,
        &bubble,
        offset,
        offset * 1.5,
        Rgba([10, 8, 40, if dark { 120 } else { 64 }]),
        s / 48.0,
    );

    let (top, bottom) = if dark {
        ([124, 92, 255], [56, 189, 248])
    } else {
        ([139, 92, 246], [14, 165, 233])
    };
    fill_vertical_gradient(canvas, &bubble, top, bottom);

    // brilho superior do balão
    soft_fill(
        canvas,
        &RoundedRect::new(
            Bounds::new(bx + bw * 0.10, by + bh * 0.06, bx + bw * 0.90, by + bh * 0.22),
            bh * 0.08,
        ),
        Rgba([255, 255, 255, if dark { 70 } else { 56 }]),
        s / 90.0,
    );

    let line = Rgba([246, 252, 255, 240]);
    let r = s * 0.22;
    let globe_center = (cx, by + bh * 0.5);
    let outline = Ellipse(Bounds::new(
        globe_center.0 - r,
        globe_center.1 - r,
        globe_center.0 + r,
        globe_center.1 + r,
    ));
    fill(canvas, &Stroke { shape: outline, width: stroke }, line);
    draw_globe_lines(canvas, globe_center, r, stroke, line);

    draw_status_dot(
        canvas,
        (bx + bw - s * 0.06, by + s * 0.06),
        s / 14.0,
        [52, 211, 153],
        Rgba([52, 211, 153, if dark { 120 } else { 84 }]),
        s / 60.0,
        stroke,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_deterministic() {
        for preset in [Preset::Classic, Preset::Aurora] {
            let style = BrandStyle::new(96, Theme::Dark, Mode::Card).with_preset(preset);
            let a = render_brand_mark(&style);
            let b = render_brand_mark(&style);
            assert_eq!(a.dimensions(), (96, 96));
            assert!(a == b, "{preset:?} não é determinístico");
        }
    }

    #[test]
    fn test_small_sizes_render() {
        for size in [1, 16, 48] {
            let img = render_brand_mark(&BrandStyle::new(size, Theme::Light, Mode::Plain));
            assert_eq!(img.dimensions(), (size, size));
        }
    }

    #[test]
    fn test_themes_and_presets_differ() {
        let dark = render_brand_mark(&BrandStyle::new(64, Theme::Dark, Mode::Plain));
        let light = render_brand_mark(&BrandStyle::new(64, Theme::Light, Mode::Plain));
        let aurora = render_brand_mark(
            &BrandStyle::new(64, Theme::Dark, Mode::Plain).with_preset(Preset::Aurora),
        );
        assert!(dark != light);
        assert!(dark != aurora);
    }

    #[test]
    fn test_plain_mark_is_opaque() {
        let img = render_brand_mark(&BrandStyle::new(64, Theme::Dark, Mode::Plain));
        assert!(img.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_geometry_scales_with_size() {
        // mesma marca em 64 e 256: reduzir a de 256 deve dar quase a de 64
        let small = render_brand_mark(&BrandStyle::new(64, Theme::Dark, Mode::Plain));
        let large = render_brand_mark(&BrandStyle::new(256, Theme::Dark, Mode::Plain));
        let reduced = image::imageops::resize(&large, 64, 64, image::imageops::FilterType::Triangle);
        let total: u64 = small
            .pixels()
            .zip(reduced.pixels())
            .map(|(a, b)| (0..3).map(|i| u64::from(a[i].abs_diff(b[i]))).sum::<u64>())
            .sum();
        let mean = total as f64 / (64.0 * 64.0 * 3.0);
        assert!(mean < 16.0, "diferença média {mean}");
    }

    #[test]
    fn test_bubble_sits_below_globe() {
        // Classic: o centro do balão é claro, o do globo é verde.
        let size = 256u32;
        let img = render_brand_mark(&BrandStyle::new(size, Theme::Dark, Mode::Plain));
        let s = size as f32 * 0.64;
        let center = size as f32 * 0.5;
        let bubble_y = (center + s * 0.26 + s * 0.10) as u32;
        let bubble = img.get_pixel(size / 2, bubble_y);
        assert!(bubble[0] > 200 && bubble[2] > 200, "{bubble:?}");
        let globe_y = (center - s * 0.20 - s * 0.39 * 0.5) as u32;
        let globe = img.get_pixel((center - s * 0.39 * 0.3) as u32, globe_y);
        assert!(globe[1] > globe[0] && globe[1] > globe[2], "{globe:?}");
    }
}
