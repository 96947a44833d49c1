use clap::Args;
use country_config::config::{AppConfig, DataConfig};
use country_config::error::AppError;
use country_config::seeding::{compose_facilities, compose_locations, LocationGateway, LocationPushReport};
use country_config::telemetry;
use country_config::translations::{export_copy, translate_csv, CopySource, OpenAiTranslator};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ImportFacilitiesArgs {
    /// CSV of CRVS offices
    pub(crate) crvs_offices: PathBuf,
    /// CSV of health facilities
    pub(crate) health_facilities: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct TranslateCsvArgs {
    /// Copy CSV with id, description and en columns
    pub(crate) input: PathBuf,
    /// Destination for the CSV with si and ta columns added
    pub(crate) output: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ExportCopyArgs {
    /// Directory that receives Translations.xlsx
    #[arg(long, default_value = "copy-export")]
    pub(crate) output_dir: PathBuf,
    /// Read catalogues from this data directory instead of the configured one
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

/// Loads configuration and logging for a one-shot script. Importers resolve
/// `TOKEN` before calling this.
fn script_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) async fn run_import_locations() -> Result<(), AppError> {
    let token = LocationGateway::token_from_env()?;
    let config = script_config()?;

    let locations = compose_locations(&config.data.dir).await?;
    println!("Read {} locations from CSV's. Updating...", locations.len());

    let gateway = LocationGateway::for_gateway(&config.gateway, token)?;
    let report = gateway.put_locations(&locations).await?;
    print_push_report(&report);
    Ok(())
}

pub(crate) async fn run_import_facilities(args: ImportFacilitiesArgs) -> Result<(), AppError> {
    let token = LocationGateway::token_from_env()?;
    let config = script_config()?;

    let facilities = compose_facilities(&args.crvs_offices, &args.health_facilities).await?;
    println!("Read {} facilities from CSV's. Updating...", facilities.len());

    let gateway = LocationGateway::for_gateway(&config.gateway, token)?;
    let report = gateway.put_locations(&facilities).await?;
    print_push_report(&report);
    Ok(())
}

fn print_push_report(report: &LocationPushReport) {
    println!("...done updating {} locations", report.bundle.entry.len());
    if !report.failed.is_empty() {
        println!("{} failed:", report.failed.len());
        for name in &report.failed {
            println!("  - {name}");
        }
    }
}

pub(crate) async fn run_translate_csv(args: TranslateCsvArgs) -> Result<(), AppError> {
    let config = script_config()?;
    let translator = OpenAiTranslator::new(reqwest::Client::new(), &config.translation)?;

    let summary = translate_csv(&args.input, &args.output, &translator).await?;
    println!(
        "Translated {} of {} rows into {}",
        summary.translated,
        summary.rows,
        args.output.display()
    );
    Ok(())
}

pub(crate) fn run_export_copy(args: ExportCopyArgs) -> Result<(), AppError> {
    let config = script_config()?;
    let data = args
        .data_dir
        .map(|dir| DataConfig { dir })
        .unwrap_or(config.data);

    let workbook = export_copy(&CopySource::bundled(&data.dir), &args.output_dir)?;
    println!("{}", workbook.display());
    Ok(())
}
