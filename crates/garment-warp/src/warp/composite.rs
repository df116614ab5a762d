use image::{GrayImage, Rgba, RgbaImage};

use super::affine::AffineTransform;
use super::coverage::{soften, triangle_mask};
use super::sample::CropSampler;
use super::{BlendStrategy, CompositeConfig, PixelRect, SkippedTriangle, TriangleSkip, WarpStats};
use crate::polygon::Polygon;

/// One warped triangle, already clipped to the canvas.
struct Patch {
    rect: PixelRect,
    pixels: RgbaImage,
    /// Hard (unsoftened) destination triangle coverage.
    mask: GrayImage,
}

/// Warp `image` triangle by triangle from `src` onto a transparent canvas of
/// `canvas_size = [width, height]` shaped by `dst`.
///
/// `triangles` index both polygons. Triangles that reference missing points,
/// collapse to zero area or fall off either image are skipped and listed in
/// the returned [`WarpStats`]; the canvas always has the requested size.
pub fn warp_triangles(
    src: &Polygon,
    dst: &Polygon,
    triangles: &[[usize; 3]],
    image: &RgbaImage,
    canvas_size: [u32; 2],
    config: &CompositeConfig,
) -> (RgbaImage, WarpStats) {
    let [width, height] = canvas_size;
    let mut canvas = RgbaImage::new(width, height);
    let mut stats = WarpStats {
        triangles_total: triangles.len(),
        ..WarpStats::default()
    };

    let mut shared = match config.strategy {
        BlendStrategy::PerTriangle => None,
        BlendStrategy::SharedCoverage => Some(SharedCoverage::new(width, height)),
    };

    for (index, &tri) in triangles.iter().enumerate() {
        match warp_patch(src, dst, tri, image, canvas_size, config) {
            Ok(patch) => {
                match shared.as_mut() {
                    Some(acc) => acc.stamp(&patch),
                    None => {
                        let alpha = soften(patch.mask, config.dilate_px, config.blur_sigma);
                        blend_patch(&mut canvas, patch.rect, &patch.pixels, &alpha);
                    }
                }
                stats.triangles_warped += 1;
            }
            Err(reason) => {
                tracing::debug!(index, ?tri, %reason, "triangle skipped");
                stats.skipped.push(SkippedTriangle {
                    index,
                    triangle: tri,
                    reason,
                });
            }
        }
    }

    if let Some(acc) = shared {
        acc.resolve(&mut canvas, config);
    }

    if !stats.skipped.is_empty() {
        tracing::warn!(
            skipped = stats.skipped.len(),
            total = stats.triangles_total,
            index_out_of_range = stats.skipped_for(TriangleSkip::IndexOutOfRange),
            "some mesh triangles were not warped"
        );
    }
    (canvas, stats)
}

fn triangle_points(poly: &Polygon, tri: [usize; 3]) -> Option<[[f64; 2]; 3]> {
    Some([poly.get(tri[0])?, poly.get(tri[1])?, poly.get(tri[2])?])
}

fn warp_patch(
    src: &Polygon,
    dst: &Polygon,
    tri: [usize; 3],
    image: &RgbaImage,
    canvas_size: [u32; 2],
    config: &CompositeConfig,
) -> Result<Patch, TriangleSkip> {
    let (Some(src_tri), Some(dst_tri)) = (triangle_points(src, tri), triangle_points(dst, tri))
    else {
        return Err(TriangleSkip::IndexOutOfRange);
    };

    let pad = config.padding_px;
    let src_rect = PixelRect::around(&src_tri, pad).ok_or(TriangleSkip::DegenerateTriangle)?;
    let dst_rect = PixelRect::around(&dst_tri, pad).ok_or(TriangleSkip::DegenerateTriangle)?;
    let crop = src_rect
        .clip(image.width(), image.height())
        .ok_or(TriangleSkip::EmptySourceRegion)?;
    let out = dst_rect
        .clip(canvas_size[0], canvas_size[1])
        .ok_or(TriangleSkip::OutsideCanvas)?;

    let src_local = crop.local(&src_tri);
    let dst_local = out.local(&dst_tri);
    // backward map: every destination pixel pulls from the source crop
    let back = AffineTransform::from_triangles(&src_local, &dst_local)
        .and_then(|forward| forward.inverse())
        .ok_or(TriangleSkip::DegenerateTriangle)?;

    let sampler = CropSampler::new(image, crop, config.interpolation);
    let pixels = RgbaImage::from_fn(out.w, out.h, |u, v| {
        let s = back.apply([u as f64, v as f64]);
        Rgba(sampler.sample(s[0], s[1]).map(|c| c.round() as u8))
    });
    let mask = triangle_mask(out.w, out.h, &dst_local);

    Ok(Patch {
        rect: out,
        pixels,
        mask,
    })
}

/// `dst = dst·(1 − a) + warped·a` on every channel, alpha included.
fn blend_patch(canvas: &mut RgbaImage, rect: PixelRect, pixels: &RgbaImage, alpha: &GrayImage) {
    let (ox, oy) = (rect.x as u32, rect.y as u32);
    for (u, v, a) in alpha.enumerate_pixels() {
        if a[0] == 0 {
            continue;
        }
        let a = a[0] as f32 / 255.0;
        let src = pixels.get_pixel(u, v);
        let dst = canvas.get_pixel_mut(ox + u, oy + v);
        for c in 0..4 {
            dst[c] = (dst[c] as f32 * (1.0 - a) + src[c] as f32 * a).round() as u8;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Claim {
    None,
    /// Colour from a padding margin only.
    Margin,
    /// Inside a triangle.
    Interior,
}

/// Canvas-sized colour and coverage buffers for [`BlendStrategy::SharedCoverage`].
struct SharedCoverage {
    color: RgbaImage,
    coverage: GrayImage,
    claim: Vec<Claim>,
}

impl SharedCoverage {
    fn new(width: u32, height: u32) -> Self {
        Self {
            color: RgbaImage::new(width, height),
            coverage: GrayImage::new(width, height),
            claim: vec![Claim::None; width as usize * height as usize],
        }
    }

    /// First interior claim wins; margins only fill unclaimed pixels.
    fn stamp(&mut self, patch: &Patch) {
        let width = self.color.width() as usize;
        let (ox, oy) = (patch.rect.x as u32, patch.rect.y as u32);
        for (u, v, px) in patch.pixels.enumerate_pixels() {
            let (x, y) = (ox + u, oy + v);
            let idx = y as usize * width + x as usize;
            let interior = patch.mask.get_pixel(u, v)[0] > 0;
            let claim = if interior {
                Claim::Interior
            } else {
                Claim::Margin
            };
            let take = match claim {
                Claim::Interior => self.claim[idx] < Claim::Interior,
                _ => self.claim[idx] == Claim::None,
            };
            if take {
                self.claim[idx] = claim;
                self.color.put_pixel(x, y, *px);
                if interior {
                    self.coverage.put_pixel(x, y, image::Luma([255]));
                }
            }
        }
    }

    fn resolve(self, canvas: &mut RgbaImage, config: &CompositeConfig) {
        let (w, h) = self.coverage.dimensions();
        if w == 0 || h == 0 {
            return;
        }
        let alpha = soften(self.coverage, config.dilate_px, config.blur_sigma);
        blend_patch(
            canvas,
            PixelRect { x: 0, y: 0, w, h },
            &self.color,
            &alpha,
        );
    }
}
