#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::style)]

use anyhow::Context;
use clap::Parser;
use linkbox::cli::Args;
use linkbox::convert::{ConvertOptions, Converter};
use linkbox::parser::detection;
use tokio::io::AsyncReadExt;
use tracing::Level;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let is_verbose = args.verbose;
    tracing_subscriber::fmt()
        .with_max_level(if is_verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let input = read_input(&args.input).await?;

    let converter = Converter::new(ConvertOptions {
        enhanced: args.enhanced,
        tag_prefix: args.tag_prefix.clone(),
    });

    let conversion = converter.convert(&input).await?;
    let rendered = conversion.render()?;

    match args.output.as_deref() {
        Some(path) => {
            if let Some(parent) = std::path::Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create output directory {:?}", parent))?;
            }
            tokio::fs::write(path, &rendered)
                .await
                .with_context(|| format!("Failed to write output to {}", path))?;
            tracing::info!("Output written to {}", path);
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Resolve the input argument to conversion input text.
///
/// A URL is passed through as-is so the converter can fetch it with relay
/// fallbacks; `-` reads stdin; anything else is a file path.
async fn read_input(arg: &str) -> anyhow::Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read from stdin")?;
        Ok(buf)
    } else if detection::is_link(arg) {
        Ok(arg.to_string())
    } else {
        tokio::fs::read_to_string(arg)
            .await
            .with_context(|| format!("Failed to read input from {}", arg))
    }
}
