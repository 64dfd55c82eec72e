//! PromptLens CLI
//!
//! Reads Stable Diffusion generation-parameter blobs and prints the prompt
//! tags, LoRAs and sampler settings they contain.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gen_params::{parse_with_config, GenerationParams, ParserConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod scan;

use scan::ScanReport;

#[derive(Parser)]
#[command(name = "promptlens")]
#[command(author, version, long_about = None)]
#[command(about = "Inspect Stable Diffusion generation parameters")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Parser configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single metadata blob
    Parse {
        /// File holding the metadata text; reads stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Also tokenize the negative prompt into tags
        #[arg(long)]
        negative_tags: bool,

        /// Minimum `key: value` pairs for the last line to count as parameters
        #[arg(long)]
        threshold: Option<usize>,
    },

    /// Parse every .txt metadata file in a folder
    Scan {
        /// Folder containing metadata sidecar files
        #[arg(short, long)]
        path: PathBuf,

        /// Write the full report to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also tokenize negative prompts into tags
        #[arg(long)]
        negative_tags: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { file, json, negative_tags, threshold } => {
            let enabled = negative_tags || config.extract_negative_tags;
            let mut config = config.with_negative_tags(enabled);
            if let Some(threshold) = threshold {
                config = config.with_threshold(threshold);
            }
            parse_blob(file.as_deref(), json, &config)
        }
        Commands::Scan { path, output, negative_tags } => {
            let enabled = negative_tags || config.extract_negative_tags;
            let config = config.with_negative_tags(enabled);
            scan_folder(&path, output.as_deref(), &config)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ParserConfig> {
    let Some(path) = path else {
        return Ok(ParserConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata file: {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read metadata from stdin")?;
            Ok(text)
        }
    }
}

fn parse_blob(file: Option<&Path>, json: bool, config: &ParserConfig) -> Result<()> {
    let text = read_input(file)?;
    let params = parse_with_config(&text, config).context("Failed to parse generation parameters")?;

    if json {
        let json = serde_json::to_string_pretty(&params)
            .context("Failed to serialize generation parameters to JSON")?;
        println!("{}", json);
    } else {
        print_params(&params);
    }

    Ok(())
}

fn print_params(params: &GenerationParams) {
    if let Some((width, height)) = params.size() {
        println!("📐 Size: {}x{}", width, height);
    }

    println!("\n⚙️  PARAMETERS");
    println!("=============");
    if params.parameters.is_empty() {
        println!("  (none)");
    }
    for (key, value) in &params.parameters {
        println!("  {}: {}", key, value);
    }

    println!("\n🧩 LORAS");
    println!("========");
    if params.loras.is_empty() {
        println!("  (none)");
    }
    for lora in &params.loras {
        println!("  {} ({})", lora.name, lora.value);
    }

    println!("\n🏷️  TAGS");
    println!("=======");
    println!("  {}", params.tags.join(", "));

    if !params.negative_tags.is_empty() {
        println!("\n🚫 NEGATIVE TAGS");
        println!("================");
        println!("  {}", params.negative_tags.join(", "));
    }
}

fn scan_folder(folder: &Path, output: Option<&Path>, config: &ParserConfig) -> Result<()> {
    println!("🔍 Scanning metadata in: {}", folder.display());

    let report = scan::scan_folder(folder, config)?;
    if report.entries.is_empty() && report.failures.is_empty() {
        println!("⚠️  No metadata files found in {}", folder.display());
        return Ok(());
    }

    print_report(&report);

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize scan report to JSON")?;
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write output to {}", output_path.display()))?;
        info!(path = %output_path.display(), "report written");
        println!("💾 Results saved to: {}", output_path.display());
    }

    Ok(())
}

fn print_report(report: &ScanReport) {
    println!("\n📈 SCAN RESULTS");
    println!("===============");
    println!("Parsed: {}", report.entries.len());
    println!("Failed: {}", report.failures.len());

    for entry in &report.entries {
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.path.display().to_string());
        let loras: Vec<&str> = entry.params.loras.iter().map(|l| l.name.as_str()).collect();

        println!("\n{}", name);
        println!("  📦 {}  🕒 {}", entry.size, entry.modified.as_deref().unwrap_or("unknown"));
        println!(
            "  ⚙️  {} parameters, {} tags",
            entry.params.parameters.len(),
            entry.params.tags.len()
        );
        if !loras.is_empty() {
            println!("  🧩 {}", loras.join(", "));
        }
    }

    for failure in &report.failures {
        println!("\n⚠️  {}: {}", failure.path.display(), failure.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_default() -> Result<()> {
        assert_eq!(load_config(None)?, ParserConfig::default());
        Ok(())
    }

    #[test]
    fn test_load_config_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("promptlens.json");
        std::fs::write(&path, r#"{"param_threshold": 4, "extract_negative_tags": true}"#)?;

        let config = load_config(Some(path.as_path()))?;
        assert_eq!(config.param_threshold, 4);
        assert!(config.extract_negative_tags);
        assert_eq!(config.negative_marker, "Negative prompt:");
        Ok(())
    }

    #[test]
    fn test_load_config_invalid() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json")?;
        assert!(load_config(Some(path.as_path())).is_err());
        assert!(load_config(Some(temp_dir.path().join("missing.json").as_path())).is_err());
        Ok(())
    }

    #[test]
    fn test_read_input_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("00001.txt");
        std::fs::write(&path, "a cat\nSteps: 20, Sampler: Euler, Seed: 1")?;
        assert_eq!(read_input(Some(path.as_path()))?, "a cat\nSteps: 20, Sampler: Euler, Seed: 1");
        Ok(())
    }

    #[test]
    fn test_cli_parses_arguments() {
        let args = ["promptlens", "-v", "parse", "meta.txt", "--json", "--threshold", "2"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Parse { file, json, negative_tags, threshold } => {
                assert_eq!(file, Some(PathBuf::from("meta.txt")));
                assert!(json);
                assert!(!negative_tags);
                assert_eq!(threshold, Some(2));
            }
            Commands::Scan { .. } => panic!("expected parse command"),
        }
    }
}
