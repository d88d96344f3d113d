//! Reqscan CLI
//!
//! Generates `requirements.txt` (and optionally `.env` / `.env.sample`) for a
//! Python source tree.
//!
//! # Usage
//!
//! ```bash
//! # Write ./project/requirements.txt
//! reqscan ./project
//!
//! # Print instead of writing, with the dependency closure two levels deep
//! reqscan ./project --print --transitive --max-depth 2
//!
//! # Offline, compat pins, extra libraries, env scaffolding
//! reqscan . --no-remote --pin-style compat --lib gunicorn,uvicorn==0.27.0 --generate-env --force
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use reqscan_core::config::{LibraryRequest, ReqscanConfig, ResolutionMode};
use reqscan_core::features::stdlib_filter::PythonVersion;
use reqscan_core::pipeline::{render_env, render_requirements, write_output, EnvFileKind, PinStyle};
use reqscan_core::shared::constants::resolution::DEFAULT_MAX_DEPTH;
use reqscan_core::{Result, ScanPipeline, ScanReport};

#[derive(Parser)]
#[command(name = "reqscan")]
#[command(about = "Generate requirements.txt and .env files from Python imports", long_about = None)]
struct Cli {
    /// File or directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Print requirements to stdout instead of writing a file
    #[arg(long)]
    print: bool,

    /// Overwrite existing output files
    #[arg(long)]
    force: bool,

    /// Requirements file to write (default: <PATH>/requirements.txt)
    #[arg(long)]
    savepath: Option<PathBuf>,

    /// Extra libraries, comma separated (NAME or NAME==VERSION)
    #[arg(long)]
    lib: Option<String>,

    /// Registry version policy: latest, compat
    #[arg(long)]
    mode: Option<String>,

    /// Requirement operator: exact, compat, gt, no-pin
    #[arg(long, default_value = "exact")]
    pin_style: String,

    /// Include transitive dependencies from the registry
    #[arg(long)]
    transitive: bool,

    /// Transitive depth (default 1)
    #[arg(long, requires = "transitive")]
    max_depth: Option<usize>,

    /// Also write .env and .env.sample
    #[arg(long)]
    generate_env: bool,

    /// Directories to skip, comma separated (names or root-relative paths)
    #[arg(long)]
    ignore: Option<String>,

    /// Never contact the package registry
    #[arg(long)]
    no_remote: bool,

    /// Target Python version for stdlib filtering
    #[arg(long)]
    python_version: Option<String>,

    /// Scan Jupyter notebooks too
    #[arg(long)]
    scan_notebooks: bool,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let pin_style = PinStyle::from_str(&cli.pin_style)?;
    debug!(?config, "configuration");

    let pipeline = ScanPipeline::from_config(config)?;
    let report = pipeline.run(&cli.path, cli.generate_env)?;

    for diagnostic in &report.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    let requirements = render_requirements(&report.packages, pin_style);
    let output_dir = output_dir(&cli.path);

    if cli.print {
        print!("{}", requirements);
        if cli.generate_env {
            print!("{}", render_env(&report.env_vars, EnvFileKind::Populated));
        }
        return Ok(());
    }

    let savepath = cli
        .savepath
        .clone()
        .unwrap_or_else(|| output_dir.join("requirements.txt"));
    write_output(&savepath, &requirements, cli.force)?;
    eprintln!("Wrote {} packages to {}", report.packages.len(), savepath.display());

    if cli.generate_env {
        write_env_files(&report, &output_dir, cli.force)?;
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ReqscanConfig> {
    let mut config = match cli.config {
        Some(ref path) => ReqscanConfig::from_yaml(path)?,
        None => ReqscanConfig::default(),
    };

    if let Some(ref mode) = cli.mode {
        config = config.mode(ResolutionMode::from_str(mode)?);
    }
    if let Some(ref version) = cli.python_version {
        config = config.python_version(PythonVersion::parse(version)?);
    }
    if let Some(ref lib) = cli.lib {
        config = config.libraries(LibraryRequest::parse_list(lib)?);
    }
    if let Some(ref ignore) = cli.ignore {
        config = config.exclude(
            ignore
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }
    if cli.transitive {
        let depth = cli.max_depth.unwrap_or(DEFAULT_MAX_DEPTH.max(1));
        config = config.max_depth(depth);
    }
    if cli.no_remote {
        config = config.offline();
    }
    if cli.scan_notebooks {
        config = config.scan_notebooks(true);
    }

    Ok(config.build()?)
}

/// Directory that receives default output files
fn output_dir(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        path.to_path_buf()
    }
}

fn write_env_files(report: &ScanReport, dir: &Path, force: bool) -> Result<()> {
    let populated = dir.join(".env");
    let sample = dir.join(".env.sample");
    write_output(&populated, &render_env(&report.env_vars, EnvFileKind::Populated), force)?;
    write_output(&sample, &render_env(&report.env_vars, EnvFileKind::Sample), force)?;
    eprintln!(
        "Wrote {} environment variables to {} and {}",
        report.env_vars.len(),
        populated.display(),
        sample.display()
    );
    Ok(())
}
