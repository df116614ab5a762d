//! garment-warp CLI: fit a garment photo onto a person photo.

use clap::{Args, Parser, Subcommand, ValueEnum};
use garment_warp::compose::{basic_overlay, composite_over};
use garment_warp::contour::{extract_source_outline_dynamic, garment_rgba};
use garment_warp::{
    recommend_size, BlendStrategy, GarmentCategory, GarmentWarper, Interpolation, LandmarkSet,
    Outline, Polygon, TargetError, WarpConfig, WarpDiagnostics,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "garment-warp")]
#[command(about = "Warp garment images onto body-landmark silhouettes (piecewise-affine mesh)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Warp a garment onto a photo and write the composed image.
    Warp(CliWarpArgs),

    /// Write the destination outline for a category as JSON.
    Target {
        /// Landmark set (JSON).
        #[arg(long)]
        landmarks: PathBuf,
        #[arg(long, value_enum)]
        category: CategoryArg,
        /// Optional partial `WarpConfig` (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },

    /// Write the traced source outline of a garment image as JSON.
    Outline {
        #[arg(long)]
        garment: PathBuf,
        /// Resample the outline to this many points.
        #[arg(long)]
        points: Option<usize>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },

    /// Print a size recommendation from shoulder width.
    Size {
        #[arg(long)]
        landmarks: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct CliWarpArgs {
    /// Garment image with transparent (or near-white, without alpha) background.
    #[arg(long)]
    garment: PathBuf,

    /// Landmark set of the person photo (JSON).
    #[arg(long)]
    landmarks: PathBuf,

    /// Person photo.
    #[arg(long)]
    photo: PathBuf,

    #[arg(long, value_enum)]
    category: CategoryArg,

    /// Path to write the composed image.
    #[arg(long)]
    out: PathBuf,

    /// Path to write the bare warped canvas (RGBA, transparent outside the garment).
    #[arg(long)]
    canvas_out: Option<PathBuf>,

    /// Path to write a JSON report (polygons, mesh, diagnostics).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Optional partial `WarpConfig` (JSON). Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source resampling kernel.
    #[arg(long, value_enum)]
    interpolation: Option<InterpolationArg>,

    /// Seam handling between mesh triangles.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Keep the traced outline's own start point instead of aligning it.
    #[arg(long)]
    no_align: bool,

    /// Gaussian feather (sigma, px) of the garment edge when composing.
    #[arg(long, default_value = "1.5")]
    feather: f32,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    Shirt,
    Pant,
    Dress,
}

impl CategoryArg {
    fn to_core(self) -> GarmentCategory {
        match self {
            Self::Shirt => GarmentCategory::Shirt,
            Self::Pant => GarmentCategory::Pant,
            Self::Dress => GarmentCategory::Dress,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InterpolationArg {
    Bilinear,
    Bicubic,
}

impl InterpolationArg {
    fn to_core(self) -> Interpolation {
        match self {
            Self::Bilinear => Interpolation::Bilinear,
            Self::Bicubic => Interpolation::Bicubic,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    PerTriangle,
    SharedCoverage,
}

impl StrategyArg {
    fn to_core(self) -> BlendStrategy {
        match self {
            Self::PerTriangle => BlendStrategy::PerTriangle,
            Self::SharedCoverage => BlendStrategy::SharedCoverage,
        }
    }
}

impl CliWarpArgs {
    fn to_config(&self) -> CliResult<WarpConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(interpolation) = self.interpolation {
            config.composite.interpolation = interpolation.to_core();
        }
        if let Some(strategy) = self.strategy {
            config.composite.strategy = strategy.to_core();
        }
        if self.no_align {
            config.correspondence.align_start_points = false;
        }
        Ok(config)
    }
}

/// How the composed image was produced.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum WarpReport {
    Mesh {
        category: GarmentCategory,
        source: Polygon,
        destination: Polygon,
        triangles: Vec<[usize; 3]>,
        diagnostics: WarpDiagnostics,
    },
    BasicOverlay {
        category: GarmentCategory,
        error: String,
    },
}

fn load_config(path: Option<&Path>) -> CliResult<WarpConfig> {
    match path {
        Some(p) => {
            tracing::info!("Loading config: {}", p.display());
            WarpConfig::from_json_file(p)
        }
        None => Ok(WarpConfig::default()),
    }
}

fn load_image(path: &Path) -> CliResult<image::DynamicImage> {
    image::open(path).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", path.display(), e).into()
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, &json)?;
    Ok(())
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Warp(args) => run_warp(&args),
        Commands::Target {
            landmarks,
            category,
            config,
            out,
        } => run_target(&landmarks, category.to_core(), config.as_deref(), &out),
        Commands::Outline {
            garment,
            points,
            config,
            out,
        } => run_outline(&garment, points, config.as_deref(), &out),
        Commands::Size { landmarks } => run_size(&landmarks),
    }
}

// ── warp ───────────────────────────────────────────────────────────────

fn run_warp(args: &CliWarpArgs) -> CliResult<()> {
    let config = args.to_config()?;
    let category = args.category.to_core();

    tracing::info!("Loading garment: {}", args.garment.display());
    let garment = garment_rgba(&load_image(&args.garment)?, &config.contour);
    tracing::info!("Loading photo: {}", args.photo.display());
    let photo = load_image(&args.photo)?.to_rgba8();
    let landmarks = LandmarkSet::from_json_file(&args.landmarks)?;
    let (w, h) = photo.dimensions();
    tracing::info!("Photo size: {}x{}, {} landmarks", w, h, landmarks.len());

    let warper = GarmentWarper::with_config(config);
    let (composed, report) = match warper.warp(&garment, &landmarks, category, [w, h]) {
        Ok(result) => {
            tracing::info!(
                "Mesh: {} points, {}/{} triangles warped",
                result.diagnostics.n_points,
                result.diagnostics.triangles_warped,
                result.diagnostics.triangles_total,
            );
            if let Some(path) = &args.canvas_out {
                result.canvas.save(path)?;
                tracing::info!("Canvas written to {}", path.display());
            }
            let composed = composite_over(&photo, &result.canvas, args.feather);
            let report = WarpReport::Mesh {
                category,
                source: result.source,
                destination: result.destination,
                triangles: result.triangles,
                diagnostics: result.diagnostics,
            };
            (composed, report)
        }
        Err(err @ TargetError::MissingLandmarks { .. }) => {
            tracing::warn!("{err}; falling back to basic overlay");
            let report = WarpReport::BasicOverlay {
                category,
                error: err.to_string(),
            };
            (basic_overlay(&photo, &garment), report)
        }
    };

    composed.save(&args.out)?;
    tracing::info!("Image written to {}", args.out.display());

    if let Some(path) = &args.report {
        write_json(path, &report)?;
        tracing::info!("Report written to {}", path.display());
    }
    Ok(())
}

// ── target / outline / size ────────────────────────────────────────────

fn run_target(
    landmarks: &Path,
    category: GarmentCategory,
    config: Option<&Path>,
    out: &Path,
) -> CliResult<()> {
    let warper = GarmentWarper::with_config(load_config(config)?);
    let landmarks = LandmarkSet::from_json_file(landmarks)?;
    let polygon = warper.target_polygon(&landmarks, category)?;
    tracing::info!("{} outline: {} points", category, polygon.len());
    write_json(out, &polygon)?;
    tracing::info!("Outline written to {}", out.display());
    Ok(())
}

fn run_outline(
    garment: &Path,
    points: Option<usize>,
    config: Option<&Path>,
    out: &Path,
) -> CliResult<()> {
    let warper = GarmentWarper::with_config(load_config(config)?);
    let image = load_image(garment)?;
    let outline: Outline =
        extract_source_outline_dynamic(&image, points, &warper.config().contour);
    if outline.is_fallback() {
        tracing::warn!("No usable silhouette; wrote the bounding rectangle");
    }
    tracing::info!("Outline: {} points", outline.polygon.len());
    write_json(out, &outline)?;
    tracing::info!("Outline written to {}", out.display());
    Ok(())
}

fn run_size(landmarks: &Path) -> CliResult<()> {
    let landmarks = LandmarkSet::from_json_file(landmarks)?;
    match recommend_size(&landmarks) {
        Some(size) => println!("{size}"),
        None => {
            return Err("shoulders not detected; cannot recommend a size".into());
        }
    }
    Ok(())
}
