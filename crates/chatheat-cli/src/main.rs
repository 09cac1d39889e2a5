mod config;
mod render;
mod settings;
mod upload;

use std::path::{Path, PathBuf};

use anyhow::Result;
use chatheat_core::{
    color_ranges, generate_report, ColorSchemeId, ErrorReport, Provider, COLOR_SCHEMES,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use config::ChatheatConfig;
use settings::{Appearance, Settings};

#[derive(Parser)]
#[command(name = "chatheat")]
#[command(author, version, about = "Calendar heatmaps of your AI chat history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Enable debug logging")]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Render an activity heatmap from a conversations.json export")]
    Render {
        #[arg(help = "Path to the exported conversations.json")]
        file: PathBuf,
        #[arg(short, long, value_parser = parse_provider, help = "Provider that produced the export (claude, chatgpt)")]
        provider: Option<Provider>,
        #[arg(short, long, value_parser = parse_scheme, help = "Color scheme id")]
        scheme: Option<ColorSchemeId>,
        #[arg(long, help = "Treat this as the current year (YYYY)")]
        year: Option<i32>,
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "List supported providers and how to export from them")]
    Providers {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "List color schemes and their count ranges")]
    Schemes {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "Show or change the light/dark appearance")]
    Appearance {
        #[arg(value_enum)]
        action: Option<AppearanceAction>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AppearanceAction {
    Light,
    Dark,
    Toggle,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli.command) {
        let source: &(dyn std::error::Error + 'static) = err.as_ref();
        let report = ErrorReport::from_error(source);
        tracing::debug!(code = %report.code, error = ?err, "command failed");
        eprintln!("\n  {}", format!("Error: {}", report.message).red());
        eprintln!("{}", format!("  ({})\n", report.code).bright_black());
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render {
            file,
            provider,
            scheme,
            year,
            json,
        } => run_render(&file, provider, scheme, year, json),
        Commands::Providers { json } => run_providers_command(json),
        Commands::Schemes { json } => run_schemes_command(json),
        Commands::Appearance { action } => run_appearance_command(action),
    }
}

fn parse_provider(s: &str) -> std::result::Result<Provider, String> {
    let provider = Provider::from_str(&s.to_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = Provider::selectable().map(|p| p.as_str()).collect();
        format!("unknown provider '{}' (expected one of: {})", s, known.join(", "))
    })?;

    if provider.is_disabled() {
        return Err(format!("{} exports are not supported yet", provider.display_name()));
    }
    Ok(provider)
}

fn parse_scheme(s: &str) -> std::result::Result<ColorSchemeId, String> {
    s.parse::<ColorSchemeId>().map_err(|e| e.to_string())
}

fn run_render(
    file: &Path,
    provider: Option<Provider>,
    scheme: Option<ColorSchemeId>,
    year: Option<i32>,
    json: bool,
) -> Result<()> {
    let config = ChatheatConfig::load();
    let provider = provider
        .or_else(|| config.default_provider())
        .unwrap_or(Provider::Claude);
    let scheme = scheme
        .or_else(|| config.default_scheme())
        .unwrap_or_default();
    let current_year = year.unwrap_or_else(chatheat_core::current_year);

    let payload = upload::read_upload(file)?;
    let report = generate_report(provider, &payload, scheme, current_year)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let settings = Settings::load_or_init();
        render::print_report(&report, settings.appearance);
    }

    Ok(())
}

fn run_providers_command(json: bool) -> Result<()> {
    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ProviderRow {
        #[serde(flatten)]
        descriptor: chatheat_core::ProviderDescriptor,
        export_path: &'static [&'static str],
    }

    if json {
        let rows: Vec<ProviderRow> = Provider::iter()
            .map(|p| ProviderRow {
                descriptor: p.descriptor(),
                export_path: p.export_path(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    use comfy_table::{ContentArrangement, Table};

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Provider", "Id", "Status", "How to export"]);

    for provider in Provider::iter() {
        let status = if provider.is_disabled() {
            "coming soon"
        } else {
            "supported"
        };
        let guide = if provider.export_path().is_empty() {
            "-".to_string()
        } else {
            format!(
                "{}, then upload conversations.json",
                provider.export_path().join(" > ")
            )
        };
        table.add_row(vec![
            provider.display_name().to_string(),
            provider.as_str().to_string(),
            status.to_string(),
            guide,
        ]);
    }

    println!("{table}");
    Ok(())
}

fn run_schemes_command(json: bool) -> Result<()> {
    if json {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct SchemeRow {
            #[serde(flatten)]
            scheme: &'static chatheat_core::ColorScheme,
            color_ranges: chatheat_core::ColorRanges,
        }

        let rows: Vec<SchemeRow> = COLOR_SCHEMES
            .iter()
            .map(|scheme| SchemeRow {
                scheme,
                color_ranges: color_ranges(scheme.id),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    use comfy_table::{ContentArrangement, Table};

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "0", "1", "2", "3", "4+"]);

    for scheme in COLOR_SCHEMES.iter() {
        let mut row = vec![scheme.id.as_str().to_string(), scheme.name.to_string()];
        row.extend(scheme.colors.iter().map(|c| c.to_string()));
        table.add_row(row);
    }

    println!("{table}");
    Ok(())
}

fn run_appearance_command(action: Option<AppearanceAction>) -> Result<()> {
    let mut settings = Settings::load_or_init();

    let updated = match action {
        None => None,
        Some(AppearanceAction::Light) => Some(Appearance::Light),
        Some(AppearanceAction::Dark) => Some(Appearance::Dark),
        Some(AppearanceAction::Toggle) => Some(settings.appearance.toggled()),
    };

    if let Some(appearance) = updated {
        settings.appearance = appearance;
        settings.save()?;
    }

    println!("{}", settings.appearance.as_str());
    Ok(())
}
