use garment_warp::compose::{basic_overlay, composite_over};
use garment_warp::contour::garment_rgba;
use garment_warp::{GarmentCategory, GarmentWarper, LandmarkSet};
use image::ImageReader;
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 5 {
        eprintln!(
            "Usage: {} <garment.png> <photo.png> <landmarks.json> <shirt|pant|dress> [out.png]",
            args[0]
        );
        std::process::exit(2);
    }

    let warper = GarmentWarper::new();
    let garment = ImageReader::open(&args[1])?.decode()?;
    let garment = garment_rgba(&garment, &warper.config().contour);
    let photo = ImageReader::open(&args[2])?.decode()?.to_rgba8();
    let landmarks = LandmarkSet::from_json_file(Path::new(&args[3]))?;
    let category: GarmentCategory = args[4].parse()?;

    let photo_size = [photo.width(), photo.height()];
    let composed = match warper.warp(&garment, &landmarks, category, photo_size) {
        Ok(result) => {
            println!(
                "Warped {}/{} triangles over {} points.",
                result.diagnostics.triangles_warped,
                result.diagnostics.triangles_total,
                result.diagnostics.n_points
            );
            composite_over(&photo, &result.canvas, 1.5)
        }
        Err(err) => {
            println!("Mesh warp unavailable ({err}); using basic overlay.");
            basic_overlay(&photo, &garment)
        }
    };

    let out_path = args.get(5).map(String::as_str).unwrap_or("tryon.png");
    composed.save(out_path)?;
    println!("Wrote {out_path}");
    Ok(())
}
