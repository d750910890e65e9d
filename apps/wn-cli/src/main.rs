use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use wn_app::{analyze, render, AnalysisRequest, AppResult};
use wn_epanet::EpanetSolver;
use wn_impact::{ScalarField, Thresholds};
use wn_model::NetworkModel;

#[derive(Parser)]
#[command(name = "wn-cli")]
#[command(about = "Waternet CLI - pipe-closure service impact analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare service pressure before and after closing one pipe
    Analyze {
        /// Path to the EPANET INP model file
        model_path: PathBuf,
        /// Link id of the pipe to close
        pipe_id: String,
        /// Evaluation instant in simulation seconds
        #[arg(long, default_value_t = wn_app::DEFAULT_EVAL_TIME_S)]
        time: u32,
        /// Rows in the ranked summary table
        #[arg(long, default_value_t = wn_app::DEFAULT_TOP_N)]
        top_n: usize,
        /// Full-service threshold in bar
        #[arg(long, default_value_t = 3.0)]
        ok_min: f64,
        /// Upper bound of the very-low band in bar
        #[arg(long, default_value_t = 1.0)]
        very_low_max: f64,
        /// Scalar plotted by the continuous layer
        #[arg(long, value_enum, default_value_t = FieldArg::Drop)]
        field: FieldArg,
        /// Write the full per-node report to this CSV file
        #[arg(short, long)]
        csv: Option<PathBuf>,
        /// EPANET command-line binary to invoke
        #[arg(long, default_value = wn_epanet::DEFAULT_BINARY)]
        epanet: PathBuf,
    },
    /// List the model's links with kind and initial status
    Links {
        /// Path to the EPANET INP model file
        model_path: PathBuf,
    },
    /// Parse a model file and report inventory counts
    Validate {
        /// Path to the EPANET INP model file
        model_path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Base,
    Closed,
    Drop,
}

impl From<FieldArg> for ScalarField {
    fn from(f: FieldArg) -> Self {
        match f {
            FieldArg::Base => ScalarField::BasePressureM,
            FieldArg::Closed => ScalarField::ClosedPressureM,
            FieldArg::Drop => ScalarField::DropM,
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            model_path,
            pipe_id,
            time,
            top_n,
            ok_min,
            very_low_max,
            field,
            csv,
            epanet,
        } => cmd_analyze(
            &model_path,
            pipe_id,
            time,
            top_n,
            ok_min,
            very_low_max,
            field,
            csv.as_deref(),
            &epanet,
        ),
        Commands::Links { model_path } => cmd_links(&model_path),
        Commands::Validate { model_path } => cmd_validate(&model_path),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_analyze(
    model_path: &Path,
    pipe_id: String,
    time: u32,
    top_n: usize,
    ok_min: f64,
    very_low_max: f64,
    field: FieldArg,
    csv: Option<&Path>,
    epanet: &Path,
) -> AppResult<()> {
    let model = NetworkModel::from_file(model_path)?;
    let solver = EpanetSolver::with_binary(epanet);
    let request = AnalysisRequest {
        pipe_id,
        eval_time_s: time,
        top_n,
        thresholds: Thresholds {
            ok_min_bar: ok_min,
            very_low_max_bar: very_low_max,
        },
        field: field.into(),
    };

    let outcome = analyze(&solver, &model, &request)?;
    print!("{}", render::text_report(&outcome.summary, &request.thresholds));

    if let Some(path) = csv {
        std::fs::write(path, render::to_csv(&outcome.summary))?;
        println!("\n✓ Report written to {}", path.display());
    }
    Ok(())
}

fn cmd_links(model_path: &Path) -> AppResult<()> {
    let model = NetworkModel::from_file(model_path)?;
    if model.links().is_empty() {
        println!("No links in model");
        return Ok(());
    }
    println!("Links in model:");
    for link in model.links() {
        println!(
            "  {:<16} {:<6} {} -> {} ({})",
            link.id, link.kind, link.from_node, link.to_node, link.initial_status
        );
    }
    Ok(())
}

fn cmd_validate(model_path: &Path) -> AppResult<()> {
    let model = NetworkModel::from_file(model_path)?;
    let with_coords = model
        .nodes()
        .iter()
        .filter(|n| n.coordinates.is_some())
        .count();
    println!("✓ Model parsed");
    println!(
        "  {} nodes ({} with coordinates), {} links",
        model.nodes().len(),
        with_coords,
        model.links().len()
    );
    Ok(())
}
