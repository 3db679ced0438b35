// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use eikonal_fmm::core::{Field, GridData, Seed};
use eikonal_fmm::io;
use eikonal_fmm::marching::ProgressInfo;
use eikonal_fmm::solver::FmmSolver;
use eikonal_fmm::weights::WeightMap;

#[derive(Parser)]
#[command(name = "eikonal-fmm", about = "Fast Marching Method geodesic distance solver")]
struct Cli {
    /// Input field: "uniform:<val>" (requires --size) or "file:<path>" (.npy)
    #[arg(short = 'f', long)]
    field: String,

    /// Grid size as rows,cols (only used with a uniform field)
    #[arg(short = 's', long)]
    size: Option<String>,

    /// Seed as x,y (column, row); repeatable for multiple seeds
    #[arg(long, num_args = 1, required = true)]
    seed: Vec<String>,

    /// Cost field strategy: identity, gradient, absdiff or laplacian (or 0-3)
    #[arg(short = 'w', long, default_value = "identity", value_parser = parse_weight_map)]
    weight_map: WeightMap,

    /// Divide gradient and Laplacian cost maps by their maximum
    #[arg(long)]
    normalize_weights: bool,

    /// Segmentation threshold; output becomes a 0/1 mask
    #[arg(short = 't', long)]
    threshold: Option<f64>,

    /// Keep raw distances instead of scaling them into [0, 1]
    #[arg(long)]
    no_normalize: bool,

    /// Maximum number of cells to finalize (-1 for unlimited)
    #[arg(long, default_value = "-1", allow_negative_numbers = true)]
    max_visits: i64,

    /// Output file path (.npy)
    #[arg(short = 'o', long, default_value = "output.npy")]
    output: PathBuf,

    /// Print marching progress to stderr (see --progress-interval)
    #[arg(long)]
    progress: bool,

    /// Finalized cells between progress reports (used with --progress)
    #[arg(long, default_value = "65536")]
    progress_interval: u64,
}

fn parse_weight_map(s: &str) -> std::result::Result<WeightMap, String> {
    s.parse::<WeightMap>().map_err(|e| e.to_string())
}

fn parse_pair(s: &str, what: &str) -> Result<(usize, usize)> {
    let parts: Vec<usize> = s
        .split(',')
        .map(|p| p.trim().parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid --{}: expected two comma-separated integers", what))?;
    if parts.len() != 2 {
        bail!("--{} has {} components, expected 2", what, parts.len());
    }
    Ok((parts[0], parts[1]))
}

fn load_input_field(mode: &str, size: Option<&str>) -> Result<Field> {
    if let Some(val_str) = mode.strip_prefix("uniform:") {
        let val: f64 = val_str.parse().context("invalid uniform field value")?;
        if !val.is_finite() || val < 0.0 {
            bail!("uniform field value must be non-negative and finite, got {}", val);
        }
        let Some(size) = size else {
            bail!("a uniform field requires --size rows,cols");
        };
        let (rows, cols) = parse_pair(size, "size")?;
        return Field::filled(rows, cols, val).map_err(|e| anyhow::anyhow!("{}", e));
    }

    if let Some(path_str) = mode.strip_prefix("file:") {
        let path = Path::new(path_str);
        return io::load_field(path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("failed to load {}", path.display()));
    }

    bail!(
        "unknown --field mode: '{}'. Expected 'uniform:<val>' or 'file:<path>'",
        mode
    );
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let field = load_input_field(&cli.field, cli.size.as_deref())?;
    let seeds = cli
        .seed
        .iter()
        .map(|s| parse_pair(s, "seed").map(Seed::from))
        .collect::<Result<Vec<_>>>()?;

    let mut solver = FmmSolver::new()
        .with_weight_map(cli.weight_map)
        .with_normalize_weights(cli.normalize_weights)
        .with_normalize_output(!cli.no_normalize)
        .with_max_visits(cli.max_visits)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    if let Some(threshold) = cli.threshold {
        solver = solver
            .with_segmentation_threshold(threshold)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
    }
    if cli.progress {
        solver = solver
            .with_progress(Box::new(|info: ProgressInfo| {
                eprintln!(
                    "[{:.1}s] finalized={} queued={}",
                    info.elapsed.as_secs_f64(),
                    info.cells_finalized,
                    info.queue_len,
                );
            }))
            .with_progress_interval(cli.progress_interval);
    }

    info!(
        "solving {}x{} field from {} seed(s) with {} weights",
        field.rows(),
        field.cols(),
        seeds.len(),
        cli.weight_map
    );
    let (out, report) = solver
        .solve_with_report(&field, &seeds)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    info!(
        "finalized {} cells, reached {} of {}",
        report.stats.visits,
        report.reached,
        out.num_cells()
    );

    io::save_field(&out, &cli.output)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    Ok(())
}
