//! Sub-pixel RGBA sampling over a source crop with reflect-101 borders.
//!
//! Integer coordinates address pixel centres. Coordinates are crop-local;
//! anything outside the crop is mirrored back in without repeating the edge
//! pixel (`gfedcb|abcdefgh|gfedcba`).

use image::RgbaImage;

use super::{Interpolation, PixelRect};

/// Keys cubic convolution parameter.
const KEYS_A: f64 = -0.5;

/// Mirror index `i` into `0..n` without repeating the border sample.
#[inline]
pub(crate) fn reflect101(i: i64, n: i64) -> i64 {
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let m = i.rem_euclid(period);
    if m >= n {
        period - m
    } else {
        m
    }
}

#[inline]
fn keys_weight(t: f64) -> f64 {
    let t = t.abs();
    if t <= 1.0 {
        ((KEYS_A + 2.0) * t - (KEYS_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((KEYS_A * t - 5.0 * KEYS_A) * t + 8.0 * KEYS_A) * t - 4.0 * KEYS_A
    } else {
        0.0
    }
}

/// Reads a rectangular region of an image as if it were its own image.
pub(crate) struct CropSampler<'a> {
    img: &'a RgbaImage,
    crop: PixelRect,
    kernel: Interpolation,
}

impl<'a> CropSampler<'a> {
    /// `crop` must already be clipped to `img`.
    pub fn new(img: &'a RgbaImage, crop: PixelRect, kernel: Interpolation) -> Self {
        debug_assert!(crop.x >= 0 && crop.y >= 0);
        debug_assert!(crop.x + crop.w as i64 <= img.width() as i64);
        debug_assert!(crop.y + crop.h as i64 <= img.height() as i64);
        Self { img, crop, kernel }
    }

    #[inline]
    fn texel(&self, ix: i64, iy: i64) -> [f64; 4] {
        let x = reflect101(ix, self.crop.w as i64) + self.crop.x;
        let y = reflect101(iy, self.crop.h as i64) + self.crop.y;
        let p = self.img.get_pixel(x as u32, y as u32).0;
        [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
    }

    /// Interpolated RGBA at crop-local `(x, y)`, each channel in `[0, 255]`.
    pub fn sample(&self, x: f64, y: f64) -> [f64; 4] {
        let out = match self.kernel {
            Interpolation::Bilinear => self.bilinear(x, y),
            Interpolation::Bicubic => self.bicubic(x, y),
        };
        out.map(|v| v.clamp(0.0, 255.0))
    }

    fn bilinear(&self, x: f64, y: f64) -> [f64; 4] {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (ix, iy) = (x0 as i64, y0 as i64);

        let p00 = self.texel(ix, iy);
        let p10 = self.texel(ix + 1, iy);
        let p01 = self.texel(ix, iy + 1);
        let p11 = self.texel(ix + 1, iy + 1);
        let mut out = [0.0; 4];
        for c in 0..4 {
            let top = p00[c] + fx * (p10[c] - p00[c]);
            let bot = p01[c] + fx * (p11[c] - p01[c]);
            out[c] = top + fy * (bot - top);
        }
        out
    }

    fn bicubic(&self, x: f64, y: f64) -> [f64; 4] {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (ix, iy) = (x0 as i64, y0 as i64);
        let wx = [
            keys_weight(fx + 1.0),
            keys_weight(fx),
            keys_weight(1.0 - fx),
            keys_weight(2.0 - fx),
        ];
        let wy = [
            keys_weight(fy + 1.0),
            keys_weight(fy),
            keys_weight(1.0 - fy),
            keys_weight(2.0 - fy),
        ];

        let mut out = [0.0; 4];
        for (j, wyj) in wy.iter().enumerate() {
            let mut row = [0.0; 4];
            for (i, wxi) in wx.iter().enumerate() {
                let p = self.texel(ix + i as i64 - 1, iy + j as i64 - 1);
                for c in 0..4 {
                    row[c] += wxi * p[c];
                }
            }
            for c in 0..4 {
                out[c] += wyj * row[c];
            }
        }
        out
    }
}
