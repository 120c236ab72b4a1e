use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use webpify::imaging::WebpBackend;
use webpify::{config, convert, output, rewrite};

#[derive(Parser)]
#[command(name = "webpify")]
#[command(about = "Build-time WebP pipeline for static sites")]
#[command(long_about = "\
Build-time WebP pipeline for static sites

Prepares a site tree for deployment in two passes:

  convert    Walk the configured scan roots and transcode every JPEG/PNG
             to a lossy WebP file next to the original. Missing roots are
             skipped; a bad file is reported and the batch continues.

  rewrite    Find every *.html under the project root (node_modules, .git,
             dist and build are skipped) and upgrade <img> tags whose WebP
             counterpart exists on disk to:

                 <picture>
                   <source type=\"image/webp\" srcset=\"photo.webp\">
                   <img src=\"photo.jpg\" loading=\"lazy\">
                 </picture>

             Images hinting hero/header/banner/logo placement keep eager
             loading. Documents are only written when something changed,
             and already-wrapped images are left alone, so re-running is
             safe.

Run 'webpify run' for both passes in order, and 'webpify gen-config' to
print a documented webpify.toml with all options.")]
#[command(version)]
struct Cli {
    /// Project root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcode images under the scan roots to sibling .webp files
    Convert,
    /// Upgrade <img> references in HTML documents to <picture> groups
    Rewrite,
    /// Run the full pipeline: convert, then rewrite
    Run,
    /// Print a stock webpify.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Convert => {
            let config = config::load_config(&cli.root)?;
            run_convert(&cli.root, &config);
        }
        Command::Rewrite => {
            let config = config::load_config(&cli.root)?;
            run_rewrite(&cli.root, &config);
        }
        Command::Run => {
            let config = config::load_config(&cli.root)?;

            println!("==> Stage 1: Converting images under {}", cli.root.display());
            run_convert(&cli.root, &config);

            // The rewrite pass probes for the artifacts the convert pass
            // wrote, so it must only start once all of them are on disk.
            println!("==> Stage 2: Rewriting HTML documents");
            run_rewrite(&cli.root, &config);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_convert(root: &Path, config: &config::PipelineConfig) {
    let backend = WebpBackend::new();
    let summary = convert::convert(root, &config.convert, &backend, &mut |event| {
        output::print_convert_event(&event, root);
    });
    println!("{}", output::format_convert_summary(&summary));
}

fn run_rewrite(root: &Path, config: &config::PipelineConfig) {
    let summary = rewrite::rewrite_all(root, config, &mut |event| {
        output::print_rewrite_event(&event, root);
    });
    println!("{}", output::format_rewrite_summary(&summary));
}
