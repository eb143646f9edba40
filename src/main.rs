use stocklens::config::ConfigManager;
use stocklens::data::{cleaning, CsvConnector};
use stocklens::engines::metrics::MetricsEngine;
use stocklens::error::Result;
use stocklens::report::Insights;

fn main() -> Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    if let Some(path) = std::env::args().nth(1) {
        manager.load_from_file(&path)?;
    } else {
        log::info!("No config file given, using defaults");
    }
    let config = manager.get();

    let df = CsvConnector::load_and_validate(
        &config.data.csv_path,
        config.data.date_column.as_deref(),
        Some(config.data.min_rows),
    )?;

    let date_column = config
        .data
        .date_column
        .clone()
        .or_else(|| cleaning::detect_date_column(&df));

    let df = match &date_column {
        Some(column) => cleaning::filter_date_range(
            &df,
            column,
            config.analysis.start_date,
            config.analysis.end_date,
        )?,
        None => df,
    };

    let df = cleaning::clean_prices(&df, date_column.as_deref())?;
    let (dates, prices) = cleaning::split_date_column(&df, date_column.as_deref())?;

    // Wide yfinance-style exports carry per-field columns; keep the closes
    let has_close_columns = prices
        .get_column_names()
        .iter()
        .any(|col| col.as_str().contains("Close"));
    let prices = if has_close_columns {
        cleaning::select_close_columns(&prices, &config.analysis.tickers)?
    } else {
        prices
    };

    let engine = MetricsEngine::new(config.analysis.risk_free_rate);
    let report = engine.analyze(&prices)?;

    println!("Daily returns\n{}\n", report.daily_returns);
    println!("Cumulative returns\n{}\n", report.cumulative_returns);
    println!("Correlation matrix\n{}\n", report.correlation);
    println!("Key metrics\n{}\n", report.key_metrics()?);

    let insights = Insights::from_report(&report)?;
    println!("{}", insights);

    if let Some(output_path) = &config.data.output_path {
        let mut out = report.cumulative_returns.clone();
        if let Some(dates) = dates {
            out.insert_column(0, dates)?;
        }
        CsvConnector::save(&out, output_path)?;
        log::info!("Wrote cumulative returns to {}", output_path);
    }

    Ok(())
}
