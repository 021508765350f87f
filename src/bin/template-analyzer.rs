//! List the layouts of every template in a directory and write a sample deck
//! on the best layout of the first one.

use anyhow::{Context, bail};
use clap::Parser;
use log::{error, info, warn};
use slidesmith::analyzer::{analyze, create_optimized_template};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Inspect PowerPoint templates
#[derive(Parser, Debug)]
#[command(
    name = "template-analyzer",
    about = "Show the layouts and placeholders of PowerPoint templates",
    version
)]
struct Args {
    /// Directory holding .pptx templates
    #[arg(value_name = "TEMPLATES_DIR", default_value = "templates")]
    dir: PathBuf,

    /// Where to write the optimized template (default: <TEMPLATES_DIR>/optimized.pptx)
    #[arg(long, value_name = "PATH")]
    optimized_out: Option<PathBuf>,
}

fn templates_in(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut templates = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Cannot read {}", dir.display()))? {
        let path = entry?.path();
        let is_pptx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pptx"));
        if path.is_file() && is_pptx {
            templates.push(path);
        }
    }
    templates.sort();
    Ok(templates)
}

fn run(args: Args) -> anyhow::Result<()> {
    let optimized = args
        .optimized_out
        .unwrap_or_else(|| args.dir.join("optimized.pptx"));
    let templates: Vec<PathBuf> = templates_in(&args.dir)?
        .into_iter()
        .filter(|path| *path != optimized)
        .collect();
    if templates.is_empty() {
        bail!("No .pptx templates found in {}", args.dir.display());
    }

    let mut first = None;
    for path in &templates {
        match analyze(path) {
            Ok(analysis) => {
                println!("{}", analysis);
                first.get_or_insert(path);
            },
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }
    let Some(source) = first else {
        bail!("None of the templates in {} could be read", args.dir.display());
    };

    let layout = create_optimized_template(source, &optimized)
        .with_context(|| format!("Cannot write {}", optimized.display()))?;
    info!("Created {} from {} using layout {:?}", optimized.display(), source.display(), layout);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        },
    }
}
