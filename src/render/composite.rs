use kurbo::{Affine, Point, Rect};

use crate::{
    foundation::core::Canvas,
    foundation::error::{VanishError, VanishResult},
    foundation::math::mul_div255_u8,
};

pub type PremulRgba8 = [u8; 4];

/// Borrowed premultiplied RGBA8 pixels with their dimensions.
#[derive(Clone, Copy, Debug)]
pub struct LayerRef<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
}

/// Premultiplied source-over with an extra layer opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Draw `layer` onto `dst` through `transform` (layer space to canvas space).
///
/// Sampling is nearest-neighbour via the inverse transform at pixel centres; only the
/// transformed bounding box is visited.
pub fn draw_layer(
    dst: &mut [u8],
    canvas: Canvas,
    layer: LayerRef<'_>,
    transform: Affine,
    opacity: f32,
) -> VanishResult<()> {
    if dst.len() != canvas.rgba_len() {
        return Err(VanishError::render(
            "draw_layer expects a destination matching the canvas",
        ));
    }
    if layer.pixels.len() != (layer.width as usize) * (layer.height as usize) * 4 {
        return Err(VanishError::render(
            "draw_layer expects layer pixels matching width*height*4",
        ));
    }
    if opacity <= 0.0 || layer.width == 0 || layer.height == 0 {
        return Ok(());
    }
    if transform.determinant().abs() < 1e-12 {
        return Ok(());
    }

    let inv = transform.inverse();
    let bbox = transform.transform_rect_bbox(Rect::new(
        0.0,
        0.0,
        f64::from(layer.width),
        f64::from(layer.height),
    ));
    let x0 = bbox.x0.floor().max(0.0) as u32;
    let y0 = bbox.y0.floor().max(0.0) as u32;
    let x1 = (bbox.x1.ceil().max(0.0) as u32).min(canvas.width);
    let y1 = (bbox.y1.ceil().max(0.0) as u32).min(canvas.height);

    let lw = f64::from(layer.width);
    let lh = f64::from(layer.height);
    for y in y0..y1 {
        for x in x0..x1 {
            let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if p.x < 0.0 || p.y < 0.0 || p.x >= lw || p.y >= lh {
                continue;
            }
            let si = ((p.y as usize) * (layer.width as usize) + p.x as usize) * 4;
            let src = [
                layer.pixels[si],
                layer.pixels[si + 1],
                layer.pixels[si + 2],
                layer.pixels[si + 3],
            ];
            if src[3] == 0 {
                continue;
            }
            let di = ((y as usize) * (canvas.width as usize) + x as usize) * 4;
            let out = over([dst[di], dst[di + 1], dst[di + 2], dst[di + 3]], src, opacity);
            dst[di..di + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
