//! Primitivas de desenho sobre `RgbaImage`: gradientes, formas com
//! anti-aliasing (via distância com sinal), máscaras e desfoque.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_ellipse_mut;
use imageproc::filter::gaussian_blur_f32;

/// Sigma máximo aplicado em resolução cheia. Acima disso o desfoque é feito
/// numa cópia reduzida e ampliada de volta.
const MAX_DIRECT_SIGMA: f32 = 6.0;

pub type Rgb8 = [u8; 3];

pub fn rgba(c: Rgb8, alpha: u8) -> Rgba<u8> {
    Rgba([c[0], c[1], c[2], alpha])
}

/// Retângulo em coordenadas de pixel (direita/baixo exclusivos).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Caixa relativa a um quadrado de lado `size` (frações).
    pub fn fraction(size: f32, l: f32, t: f32, r: f32, b: f32) -> Self {
        Self::new(size * l, size * t, size * r, size * b)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    pub fn inset(&self, d: f32) -> Self {
        Self::new(self.left + d, self.top + d, self.right - d, self.bottom - d)
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    fn union(&self, other: &Bounds) -> Self {
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Faixa de pixels inteiros coberta, recortada ao tamanho da imagem.
    fn pixel_span(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = (self.left.floor() as i64 - 1).max(0);
        let y0 = (self.top.floor() as i64 - 1).max(0);
        let x1 = (self.right.ceil() as i64 + 1).min(i64::from(width));
        let y1 = (self.bottom.ceil() as i64 + 1).min(i64::from(height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

/// Forma descrita por distância com sinal (negativa dentro).
pub trait Shape {
    fn distance(&self, x: f32, y: f32) -> f32;
    fn bounds(&self) -> Bounds;
}

#[derive(Debug, Clone, Copy)]
pub struct Ellipse(pub Bounds);

impl Shape for Ellipse {
    fn distance(&self, x: f32, y: f32) -> f32 {
        let (cx, cy) = self.0.center();
        let rx = (self.0.width() * 0.5).max(1e-3);
        let ry = (self.0.height() * 0.5).max(1e-3);
        let (px, py) = (x - cx, y - cy);
        let k0 = ((px / rx).powi(2) + (py / ry).powi(2)).sqrt();
        let k1 = ((px / (rx * rx)).powi(2) + (py / (ry * ry)).powi(2)).sqrt();
        if k1 <= f32::EPSILON {
            return -rx.min(ry);
        }
        k0 * (k0 - 1.0) / k1
    }

    fn bounds(&self) -> Bounds {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RoundedRect {
    pub rect: Bounds,
    pub radius: f32,
}

impl RoundedRect {
    pub fn new(rect: Bounds, radius: f32) -> Self {
        Self { rect, radius }
    }
}

impl Shape for RoundedRect {
    fn distance(&self, x: f32, y: f32) -> f32 {
        let (cx, cy) = self.rect.center();
        let hw = self.rect.width() * 0.5;
        let hh = self.rect.height() * 0.5;
        let r = self.radius.clamp(0.0, hw.min(hh).max(0.0));
        let qx = (x - cx).abs() - hw + r;
        let qy = (y - cy).abs() - hh + r;
        let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
        outside + qx.max(qy).min(0.0) - r
    }

    fn bounds(&self) -> Bounds {
        self.rect
    }
}

/// Segmento com espessura (pontas arredondadas).
#[derive(Debug, Clone, Copy)]
pub struct Capsule {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub width: f32,
}

impl Shape for Capsule {
    fn distance(&self, x: f32, y: f32) -> f32 {
        let (ax, ay) = self.from;
        let (bx, by) = self.to;
        let (pax, pay) = (x - ax, y - ay);
        let (bax, bay) = (bx - ax, by - ay);
        let len2 = (bax * bax + bay * bay).max(f32::EPSILON);
        let h = ((pax * bax + pay * bay) / len2).clamp(0.0, 1.0);
        let dx = pax - bax * h;
        let dy = pay - bay * h;
        (dx * dx + dy * dy).sqrt() - self.width * 0.5
    }

    fn bounds(&self) -> Bounds {
        let r = self.width * 0.5;
        Bounds::new(
            self.from.0.min(self.to.0) - r,
            self.from.1.min(self.to.1) - r,
            self.from.0.max(self.to.0) + r,
            self.from.1.max(self.to.1) + r,
        )
    }
}

/// Triângulo (qualquer orientação).
#[derive(Debug, Clone, Copy)]
pub struct Triangle(pub [(f32, f32); 3]);

impl Shape for Triangle {
    fn distance(&self, x: f32, y: f32) -> f32 {
        let p = self.0;
        let area = (p[1].0 - p[0].0) * (p[2].1 - p[0].1) - (p[1].1 - p[0].1) * (p[2].0 - p[0].0);
        let sign = if area >= 0.0 { 1.0 } else { -1.0 };
        let mut d = f32::MIN;
        for i in 0..3 {
            let (ax, ay) = p[i];
            let (bx, by) = p[(i + 1) % 3];
            let (ex, ey) = (bx - ax, by - ay);
            let len = (ex * ex + ey * ey).sqrt().max(f32::EPSILON);
            // normal externa da aresta
            let edge = sign * (ex * (y - ay) - ey * (x - ax)) / len;
            d = d.max(-edge);
        }
        d
    }

    fn bounds(&self) -> Bounds {
        let xs = self.0.map(|p| p.0);
        let ys = self.0.map(|p| p.1);
        Bounds::new(
            xs.iter().copied().fold(f32::MAX, f32::min),
            ys.iter().copied().fold(f32::MAX, f32::min),
            xs.iter().copied().fold(f32::MIN, f32::max),
            ys.iter().copied().fold(f32::MIN, f32::max),
        )
    }
}

/// Contorno interno de largura `width`, como o `outline` de uma forma.
#[derive(Debug, Clone, Copy)]
pub struct Stroke<S> {
    pub shape: S,
    pub width: f32,
}

impl<S: Shape> Shape for Stroke<S> {
    fn distance(&self, x: f32, y: f32) -> f32 {
        let half = self.width * 0.5;
        (self.shape.distance(x, y) + half).abs() - half
    }

    fn bounds(&self) -> Bounds {
        self.shape.bounds()
    }
}

/// União de duas formas.
#[derive(Debug, Clone, Copy)]
pub struct Union<A, B>(pub A, pub B);

impl<A: Shape, B: Shape> Shape for Union<A, B> {
    fn distance(&self, x: f32, y: f32) -> f32 {
        self.0.distance(x, y).min(self.1.distance(x, y))
    }

    fn bounds(&self) -> Bounds {
        self.0.bounds().union(&self.1.bounds())
    }
}

fn coverage(distance: f32) -> f32 {
    (0.5 - distance).clamp(0.0, 1.0)
}

fn blend_at(canvas: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>, cover: f32) {
    let alpha = (f32::from(color[3]) * cover).round() as u8;
    if alpha == 0 {
        return;
    }
    let mut src = color;
    src[3] = alpha;
    blend_over(canvas.get_pixel_mut(x, y), src);
}

/// Composição "over" com arredondamento; um fundo opaco continua opaco.
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for i in 0..3 {
        let c = (f32::from(src[i]) * sa + f32::from(dst[i]) * da * (1.0 - sa)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

/// Gradiente vertical opaco, interpolado linha a linha.
pub fn vertical_gradient(width: u32, height: u32, top: Rgb8, bottom: Rgb8) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    let span = height.saturating_sub(1).max(1) as f32;
    for y in 0..height {
        let color = rgba(lerp_color(top, bottom, y as f32 / span), 255);
        for x in 0..width {
            img.put_pixel(x, y, color);
        }
    }
    img
}

pub fn lerp_color(a: Rgb8, b: Rgb8, t: f32) -> Rgb8 {
    let mix = |i: usize| (f32::from(a[i]) * (1.0 - t) + f32::from(b[i]) * t) as u8;
    [mix(0), mix(1), mix(2)]
}

/// Preenche a forma com uma cor sólida.
pub fn fill<S: Shape>(canvas: &mut RgbaImage, shape: &S, color: Rgba<u8>) {
    fill_with(canvas, shape, |_, _| color);
}

/// Preenche a forma com a cor devolvida por `shade` para cada pixel.
pub fn fill_with<S, F>(canvas: &mut RgbaImage, shape: &S, shade: F)
where
    S: Shape,
    F: Fn(u32, u32) -> Rgba<u8>,
{
    let (w, h) = canvas.dimensions();
    let Some((x0, y0, x1, y1)) = shape.bounds().pixel_span(w, h) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let cover = coverage(shape.distance(x as f32 + 0.5, y as f32 + 0.5));
            if cover > 0.0 {
                blend_at(canvas, x, y, shade(x, y), cover);
            }
        }
    }
}

/// Preenche a forma com gradiente vertical entre o topo e a base dela.
pub fn fill_vertical_gradient<S: Shape>(canvas: &mut RgbaImage, shape: &S, top: Rgb8, bottom: Rgb8) {
    let b = shape.bounds();
    let span = (b.height() - 1.0).max(1.0);
    fill_with(canvas, shape, |_, y| {
        let t = ((y as f32 - b.top) / span).clamp(0.0, 1.0);
        rgba(lerp_color(top, bottom, t), 255)
    });
}

/// Desenha a forma numa máscara (cobertura máxima por pixel).
pub fn mask_shape<S: Shape>(mask: &mut GrayImage, shape: &S) {
    let (w, h) = mask.dimensions();
    let Some((x0, y0, x1, y1)) = shape.bounds().pixel_span(w, h) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let cover = coverage(shape.distance(x as f32 + 0.5, y as f32 + 0.5));
            let value = (cover * 255.0).round() as u8;
            let px = mask.get_pixel_mut(x, y);
            px[0] = px[0].max(value);
        }
    }
}

/// Desfoque gaussiano de máscara. Sigmas grandes são aplicados em escala
/// reduzida; o resultado continua determinístico.
pub fn soften(mask: &GrayImage, sigma: f32) -> GrayImage {
    if sigma < 0.5 {
        return mask.clone();
    }
    let factor = (sigma / MAX_DIRECT_SIGMA).ceil().max(1.0) as u32;
    if factor == 1 {
        return gaussian_blur_f32(mask, sigma);
    }
    let (w, h) = mask.dimensions();
    let small = imageops::resize(
        mask,
        w.div_ceil(factor).max(1),
        h.div_ceil(factor).max(1),
        FilterType::Triangle,
    );
    let small = gaussian_blur_f32(&small, sigma / factor as f32);
    imageops::resize(&small, w, h, FilterType::Triangle)
}

/// Compõe `color` sobre o canvas usando a máscara como cobertura, com a
/// origem da máscara em (`x`, `y`).
pub fn composite_mask(canvas: &mut RgbaImage, mask: &GrayImage, x: i64, y: i64, color: Rgba<u8>) {
    let (cw, ch) = canvas.dimensions();
    for (mx, my, Luma([m])) in mask.enumerate_pixels() {
        if *m == 0 {
            continue;
        }
        let cx = x + i64::from(mx);
        let cy = y + i64::from(my);
        if cx < 0 || cy < 0 || cx >= i64::from(cw) || cy >= i64::from(ch) {
            continue;
        }
        blend_at(canvas, cx as u32, cy as u32, color, f32::from(*m) / 255.0);
    }
}

/// Compõe `top` sobre o canvas com o canto superior esquerdo em (`x`, `y`).
pub fn overlay(canvas: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (cw, ch) = canvas.dimensions();
    for (tx, ty, px) in top.enumerate_pixels() {
        let cx = x + i64::from(tx);
        let cy = y + i64::from(ty);
        if cx < 0 || cy < 0 || cx >= i64::from(cw) || cy >= i64::from(ch) {
            continue;
        }
        blend_over(canvas.get_pixel_mut(cx as u32, cy as u32), *px);
    }
}

/// Elipse desfocada do tamanho do canvas (brilhos de fundo).
pub fn soft_glow(canvas: &mut RgbaImage, bbox: Bounds, color: Rgba<u8>, blur: f32) {
    let (w, h) = canvas.dimensions();
    let mut mask = GrayImage::new(w, h);
    let (cx, cy) = bbox.center();
    draw_filled_ellipse_mut(
        &mut mask,
        (cx.round() as i32, cy.round() as i32),
        (bbox.width() * 0.5).round() as i32,
        (bbox.height() * 0.5).round() as i32,
        Luma([255u8]),
    );
    let mask = soften(&mask, blur);
    composite_mask(canvas, &mask, 0, 0, color);
}

/// Sombra desfocada de uma forma, deslocada por (`dx`, `dy`).
pub fn soft_shadow<S: Shape>(canvas: &mut RgbaImage, shape: &S, dx: f32, dy: f32, color: Rgba<u8>, blur: f32) {
    let (w, h) = canvas.dimensions();
    let mut mask = GrayImage::new(w, h);
    mask_shape(&mut mask, &Offset { shape, dx, dy });
    let mask = soften(&mask, blur);
    composite_mask(canvas, &mask, 0, 0, color);
}

/// Desenha a forma desfocada (brilho com contorno de forma arbitrária).
pub fn soft_fill<S: Shape>(canvas: &mut RgbaImage, shape: &S, color: Rgba<u8>, blur: f32) {
    soft_shadow(canvas, shape, 0.0, 0.0, color, blur);
}

struct Offset<'a, S> {
    shape: &'a S,
    dx: f32,
    dy: f32,
}

impl<S: Shape> Shape for Offset<'_, S> {
    fn distance(&self, x: f32, y: f32) -> f32 {
        self.shape.distance(x - self.dx, y - self.dy)
    }

    fn bounds(&self) -> Bounds {
        self.shape.bounds().offset(self.dx, self.dy)
    }
}
