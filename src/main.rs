use clap::{Parser, Subcommand};
use nobloat::{BuildOptions, build_site, config, load_site, output, watch};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nobloat")]
#[command(about = "Minimal static blog generator")]
#[command(long_about = "\
Minimal static blog generator

Dated markdown articles in, plain HTML, a sitemap and an Atom feed out.
No JavaScript, no front-matter, no database.

Site structure:

  ./
  ├── config.toml                          # Site config (optional)
  ├── style.css                            # Copied to the output if present
  └── articles/
      ├── 2024-03-09-hello-world.md        # Published 2024-03-09 as 2024-03-09-hello-world.html
      ├── 2023-11-30-older-post.md
      └── draft.md                         # No date prefix: skipped with a warning

Article format:
  The first line '# Title' is the post title. The first plain paragraph is
  the excerpt shown on the index page and in the feed. Supported blocks:
  '# ', '## ', '### ' headings, '- ' lists, '> ' quotes and ``` fences.

Run 'nobloat gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Config file [default: <source>/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site once (default)
    Build,
    /// Build, then rebuild whenever articles, stylesheet or config change
    Watch,
    /// Load and validate articles without writing anything
    Check {
        /// Print the loaded posts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = BuildOptions {
        source: cli.source,
        output: cli.output,
        config: cli.config,
    };

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let report = build_site(&options)?;
            output::print_build_output(&report);
        }
        Command::Watch => {
            watch::watch_and_rebuild(&options)?;
        }
        Command::Check { json } => {
            let site = load_site(&options)?;
            if json {
                println!("{}", output::format_check_json(&site.manifest)?);
            } else {
                output::print_check_output(
                    &site.manifest,
                    &options.config_path(),
                    &options.stylesheet(&site.config),
                );
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
