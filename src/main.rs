use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use csv_pager::cli::CliArgs;
use csv_pager::config::config::Config;
use csv_pager::data::column_store::ColumnStore;
use csv_pager::data::record_source::CsvRecordSource;
use csv_pager::ui::app::App;
use csv_pager::utils::logging::init_file_logging;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    if args.generate_config {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => Config::get_config_path()?,
        };
        Config::write_default(&path)?;
        println!("Configuration file created at: {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if !args.no_log {
        if let Err(e) = init_file_logging(args.log_file.clone()) {
            eprintln!("Warning: logging disabled: {:#}", e);
        }
    }

    let Some(input) = args.open_input()? else {
        CliArgs::command().print_help()?;
        std::process::exit(1);
    };

    let source = CsvRecordSource::new(input, args.csv_options()?);
    let header_present = !args.no_header;
    let store = ColumnStore::initialize(source, header_present).context("Failed to read input")?;

    let mut app = App::new(store, header_present, &config)?;
    app.run()
}
