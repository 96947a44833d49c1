use crate::scripts::{
    run_export_copy, run_import_facilities, run_import_locations, run_translate_csv,
    ExportCopyArgs, ImportFacilitiesArgs, TranslateCsvArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use country_config::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Country Configuration",
    about = "Serve the country configuration and run its reference-data scripts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Push the bundled administrative areas and facilities to the gateway (needs TOKEN)
    ImportLocations,
    /// Push CRVS offices and health facilities from two CSV files (needs TOKEN)
    ImportFacilities(ImportFacilitiesArgs),
    /// Machine-translate a copy CSV into Sinhala and Tamil
    TranslateCsv(TranslateCsvArgs),
    /// Export the message catalogues to Translations.xlsx, one worksheet each
    ExportCopy(ExportCopyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::ImportLocations => run_import_locations().await,
        Command::ImportFacilities(args) => run_import_facilities(args).await,
        Command::TranslateCsv(args) => run_translate_csv(args).await,
        Command::ExportCopy(args) => run_export_copy(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["country-config-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn import_facilities_takes_two_paths() {
        let cli = Cli::try_parse_from([
            "country-config-api",
            "import-facilities",
            "offices.csv",
            "health.csv",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::ImportFacilities(args)) => {
                assert_eq!(args.crvs_offices.to_str(), Some("offices.csv"));
                assert_eq!(args.health_facilities.to_str(), Some("health.csv"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn export_copy_defaults_output_dir() {
        let cli = Cli::try_parse_from(["country-config-api", "export-copy"]).expect("parses");
        match cli.command {
            Some(Command::ExportCopy(args)) => {
                assert_eq!(args.output_dir.to_str(), Some("copy-export"));
                assert!(args.data_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn export_copy_help_names_the_workbook() {
        use clap::CommandFactory;

        let command = Cli::command();
        let export = command
            .find_subcommand("export-copy")
            .expect("export-copy registered");
        let about = export.get_about().expect("about text").to_string();
        assert!(about.contains("Translations.xlsx"));
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from(["country-config-api", "serve", "--port", "4040"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(4040)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
