mod config;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use chrono::Local;
use clap::Parser;
use sheet_core::core_api::Engine;
use sheet_core::sections::{Section, SectionConfig};
use sheet_render::{JsonStyle, RenderOptions, render_html, render_json_full, render_session};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{DEFAULT_OUTPUT_DIR, load_sections, resolve_config_path, save_sections};

const OUTPUT_SUFFIX: &str = "_sheet.html";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const DEFAULT_LOG_FILTER: &str = "pf2e_sheet=info,sheet_core=warn,sheet_render=warn";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "CHARACTER.json")]
    path: PathBuf,
    /// Directory the HTML sheet is written to.
    #[arg(long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
    /// Print the HTML sheet instead of writing a file.
    #[arg(long, conflicts_with = "json")]
    stdout: bool,
    /// Print the derived statistics as JSON.
    #[arg(long)]
    json: bool,
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, value_name = "SECTION", value_parser = parse_section)]
    enable: Vec<Section>,
    #[arg(long, value_name = "SECTION", value_parser = parse_section)]
    disable: Vec<Section>,
    /// Persist the effective section toggles to the resolved config file.
    #[arg(long = "save-config")]
    save_config: bool,
    #[arg(long)]
    title: Option<String>,
}

fn parse_section(raw: &str) -> Result<Section, String> {
    Section::from_key(raw).ok_or_else(|| {
        let known: Vec<&str> = Section::ALL.iter().map(|s| s.key()).collect();
        format!("unknown section `{raw}` (expected one of: {})", known.join(", "))
    })
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let location = resolve_config_path(cli.config.as_deref());
    let mut sections = load_sections(&location).unwrap_or_else(|e| {
        eprintln!("Error loading config {}", location.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });
    sections = apply_overrides(sections, &cli.enable, &cli.disable);

    if cli.save_config {
        save_sections(&location.path, &sections).unwrap_or_else(|e| {
            eprintln!("Error saving config: {e}");
            process::exit(1);
        });
    }

    let engine = Engine::new();
    let session = engine.open_path(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading character file: {}", cli.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });

    if cli.json {
        let json = render_json_full(&session, JsonStyle::CanonicalV1);
        let rendered = serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
        return;
    }

    let options = RenderOptions {
        title: cli.title.clone().unwrap_or_default(),
        generated_at: Some(Local::now().format(TIMESTAMP_FORMAT).to_string()),
    };
    let document = render_session(&session, &sections, &options);
    let html = render_html(&document);

    if cli.stdout {
        print!("{html}");
        return;
    }

    let out_path = output_path(&cli.output_dir, &cli.path);
    fs::create_dir_all(&cli.output_dir).unwrap_or_else(|e| {
        eprintln!("Error creating {}: {e}", cli.output_dir.display());
        process::exit(1);
    });
    fs::write(&out_path, html).unwrap_or_else(|e| {
        eprintln!("Error writing {}: {e}", out_path.display());
        process::exit(1);
    });
    info!(
        character = session.profile().name.as_str(),
        pages = document.pages.len(),
        path = %out_path.display(),
        "rendered character sheet"
    );
    println!("Wrote character sheet to {}", out_path.display());
}

/// Enables are applied first, so a section named by both flags ends up off.
fn apply_overrides(
    mut sections: SectionConfig,
    enable: &[Section],
    disable: &[Section],
) -> SectionConfig {
    for section in enable {
        sections.set(*section, true);
    }
    for section in disable {
        sections.set(*section, false);
    }
    sections
}

fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "character".to_string());
    output_dir.join(format!("{stem}{OUTPUT_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use sheet_core::sections::{Section, SectionConfig};

    use super::{DEFAULT_LOG_FILTER, apply_overrides, output_path, parse_section};

    #[test]
    fn output_path_uses_input_stem() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("chars/valeros.json")),
            Path::new("out").join("valeros_sheet.html")
        );
    }

    #[test]
    fn disable_wins_over_enable() {
        let sections = apply_overrides(
            SectionConfig::default().with(Section::Spells, false),
            &[Section::Spells, Section::InfoData],
            &[Section::InfoData],
        );
        assert!(sections.is_enabled(Section::Spells));
        assert!(!sections.is_enabled(Section::InfoData));
    }

    #[test]
    fn section_names_accept_legacy_spelling() {
        assert_eq!(parse_section("summary_stats"), Ok(Section::SummaryStats));
        assert!(parse_section("portrait").is_err());
    }

    #[test]
    fn default_log_filter_covers_library_warnings() {
        let filter = tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER)
            .expect("default filter should parse");
        let rendered = filter.to_string();
        assert!(rendered.contains("pf2e_sheet=info"));
        assert!(rendered.contains("sheet_core=warn"));
        assert!(rendered.contains("sheet_render=warn"));
    }
}
