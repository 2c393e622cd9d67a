use clap::{Parser, Subcommand};
use folio::{config, load, output, pipeline, tags};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Page planner for markdown blogs")]
#[command(long_about = "\
Page planner for markdown blogs

Reads a tree of markdown files, decides which are posts and which are pages,
derives their URLs, indexes their tags, and writes the list of pages a
renderer should produce.

Content structure:

  content/
  ├── config.toml                  # Site config (optional, sparse)
  ├── blog/
  │   ├── 2021/
  │   │   └── hello-world.md       # Post → /hello-world/
  │   └── 2022/
  │       └── second-post/
  │           └── index.md         # Post → /second-post/
  ├── pages/
  │   └── about.md                 # Page → /about/
  └── drafts/
      └── idea.md                  # No rule matches: skipped with a warning

Frontmatter (optional):
  ---
  title: Hello World
  date: 2021-03-04
  tags: [Python, SQL Server]
  ---

Tags are normalized to kebab-case: \"SQL Server\" and \"sql-server\" share
/tags/sql-server/, labelled with the first spelling seen.

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Directory for plan.json and tags.json
    #[arg(long, default_value = ".folio", global = true)]
    output: PathBuf,

    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the page plan and write plan.json and tags.json
    Plan,
    /// List every tag with its item count and icon
    Tags,
    /// Validate config and content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Plan => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let items = load::load_content(&cli.source)?;
            let plan = pipeline::build(&items, &site_config)?;

            std::fs::create_dir_all(&cli.output)?;
            write_json(&cli.output.join("plan.json"), &plan.directives)?;
            write_json(&cli.output.join("tags.json"), &plan.tags)?;
            output::print_plan_output(&plan);
            info!(output = %cli.output.display(), "wrote plan.json and tags.json");
        }
        Command::Tags => {
            let site_config = config::load_config(&cli.source)?;
            let items = load::load_content(&cli.source)?;
            let index = tags::TagIndex::build(&items);
            let icons = tags::TagIcons::from_config(&site_config.tags);
            output::print_tags_output(&index, &icons);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let items = load::load_content(&cli.source)?;
            let plan = pipeline::build(&items, &site_config)?;
            output::print_plan_output(&plan);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays the human summary.
fn init_logging(verbose: bool) {
    let default = if verbose { "folio=debug" } else { "folio=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
