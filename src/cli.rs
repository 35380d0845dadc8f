use crate::config::load_config;
use crate::ir::WheelDoc;
use crate::layout::generate_all;
use crate::render::write_output;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "drawheel", version, about = "Concentric wheel diagrams as draw.io files")]
pub struct Args {
    /// Input wheel description (JSON)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output directory, created if missing
    #[arg(short = 'o', long = "output", default_value = "./output")]
    pub output: PathBuf,

    /// Output file extension
    #[arg(short = 'e', long = "extension", value_enum, default_value = "drawio")]
    pub extension: Extension,

    /// Config JSON file (canvas geometry and drawing defaults)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Log level filter (e.g. "debug" or "drawheel=trace")
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Extension {
    Drawio,
    Xml,
}

impl Extension {
    fn as_str(self) -> &'static str {
        match self {
            Extension::Drawio => "drawio",
            Extension::Xml => "xml",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = load_config(args.config.as_deref())?;
    let contents = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let doc = WheelDoc::from_json(&contents)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("wheel");

    let results = generate_all(&doc, &config);
    if results.is_empty() {
        return Err(anyhow::anyhow!("no structures found in the input"));
    }

    let mut written = 0usize;
    for (name, result) in &results {
        match result {
            Ok(xml) => {
                let path = structure_path(&args.output, stem, name, args.extension);
                write_output(xml, Some(&path))?;
                info!(structure = %name, path = %path.display(), "wheel written");
                written += 1;
            }
            Err(err) => {
                // A broken structure must not block its siblings.
                error!(structure = %name, %err, "skipping structure");
            }
        }
    }

    if written == 0 {
        return Err(anyhow::anyhow!("every structure failed to generate"));
    }
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // try_init so embedding callers keep their own subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn structure_path(dir: &Path, stem: &str, name: &str, extension: Extension) -> PathBuf {
    // Structure names come from user JSON; keep the filename portable.
    let safe: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    dir.join(format!("{stem}_{safe}.{}", extension.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_paths_combine_stem_and_name() {
        let path = structure_path(Path::new("out"), "wheels", "Feelings", Extension::Drawio);
        assert_eq!(path, Path::new("out/wheels_Feelings.drawio"));
    }

    #[test]
    fn awkward_structure_names_are_sanitized() {
        let path = structure_path(Path::new("out"), "w", "a/b c", Extension::Xml);
        assert_eq!(path, Path::new("out/w_a_b_c.xml"));
    }
}
