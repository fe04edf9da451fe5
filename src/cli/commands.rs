use crate::analyzers::ObservationAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::models::{DashboardPayload, ObservationFilter};
use crate::processors::Ingestor;
use crate::settings::Settings;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::SqliteStore;
use std::io::Read;
use std::path::Path;

const MAX_LISTED_SKIPS: usize = 10;

pub fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        settings.database_path = database;
    }

    init_logging(cli.verbose, &settings.log_level, cli.log_file.as_deref())?;
    tracing::debug!("Using database {}", settings.database_path.display());

    if let Some(parent) = settings.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut store = SqliteStore::open(&settings.database_path)?;

    match cli.command {
        Commands::Load {
            csv_file,
            truncate,
            batch_size,
            quiet,
        } => {
            let ingestor =
                Ingestor::new().with_batch_size(batch_size.unwrap_or(settings.batch_size));
            let progress = ProgressReporter::new_spinner("Loading observations...", quiet);

            let report = ingestor.load_file(&mut store, &csv_file, truncate, Some(&progress))?;
            drop(progress);

            for line in report.report_lines(MAX_LISTED_SKIPS) {
                println!("{}", line);
            }
        }

        Commands::Upload { file } => {
            let bytes = read_upload(&file)?;
            let ingestor = Ingestor::new().with_batch_size(settings.batch_size);

            let outcome = ingestor.import_upload(&mut store, &bytes)?;
            println!("{}", outcome.message());
        }

        Commands::Dashboard {
            city,
            start,
            end,
            json,
            pretty,
        } => {
            let filter =
                ObservationFilter::from_params(city.as_deref(), start.as_deref(), end.as_deref())?;
            let observations = store.query(&filter)?;
            tracing::debug!("{} observations match {:?}", observations.len(), filter);

            let stats = ObservationAnalyzer::new().analyze(&observations);

            if json {
                let payload = DashboardPayload::new(&stats, store.distinct_cities()?);
                println!("{}", payload.to_json(pretty)?);
            } else {
                println!("{}", stats.summary());
            }
        }

        Commands::Cities => {
            for city in store.distinct_cities()? {
                println!("{}", city);
            }
        }

        Commands::Info => {
            println!("Database: {}", settings.database_path.display());
            println!("{}", store.info()?.summary());
        }
    }

    Ok(())
}

fn read_upload(file: &Path) -> Result<Vec<u8>> {
    if file == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        Ok(std::fs::read(file)?)
    }
}
