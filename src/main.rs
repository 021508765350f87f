//! Turn a topic into a PowerPoint deck.
//!
//! ```sh
//! slidesmith --topic "History of tea" --template templates/corporate.pptx -o tea.pptx
//! ```

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use slidesmith::config::Config;
use slidesmith::pipeline::{self, Overrides, Request};
use std::path::PathBuf;
use std::process::ExitCode;

/// Research a topic on the web and render generated slides onto a template
#[derive(Parser, Debug)]
#[command(
    name = "slidesmith",
    about = "Research a topic on the web, draft slides with an LLM and render them onto a PowerPoint template",
    version
)]
struct Args {
    /// Presentation topic
    #[arg(short, long, value_name = "TOPIC")]
    topic: String,

    /// Where to write the generated .pptx
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Template deck (.pptx or .potx) supplying layouts and theme
    #[arg(long, value_name = "TEMPLATE")]
    template: PathBuf,

    /// Prompt file with the named prompt sections
    #[arg(long, value_name = "FILE")]
    prompts: Option<PathBuf>,

    /// Directory of local images, also where downloads are saved
    #[arg(long, value_name = "DIR")]
    images_dir: Option<PathBuf>,

    /// Directory for cached search results
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Always query the search service
    #[arg(long)]
    no_cache: bool,

    /// Also write the slide outline as JSON
    #[arg(long, value_name = "FILE")]
    outline_out: Option<PathBuf>,
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_process_env().context("Invalid configuration")?;
    Overrides {
        prompt_file: args.prompts,
        images_dir: args.images_dir,
        cache_dir: args.cache_dir,
    }
    .apply(&mut config);

    let request = Request {
        topic: args.topic,
        template: args.template,
        output: args.output,
        outline_out: args.outline_out,
    };
    let report = pipeline::run(&config, &request, !args.no_cache)
        .with_context(|| format!("Cannot build a deck on {:?}", request.topic))?;

    info!(
        "Presentation with {} slides saved to {}",
        report.slides.len(),
        report.output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        },
    }
}
