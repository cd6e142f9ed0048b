use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use statrs::statistics::Statistics;

use relay_stats::{AggregatorConfig, AlgorithmTables};

#[derive(Parser)]
struct Config {
	#[arg(default_value = "data/evaluation_tests")]
	path: PathBuf,
	#[arg(short, long, default_value_t = relay_stats::DEFAULT_BUCKET_COUNT)]
	buckets: usize,
	#[arg(short, long, default_value = relay_stats::DEFAULT_METRIC)]
	metric: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
struct SummaryRecord {
	algorithm: String,
	drones: usize,
	seeds: usize,
	mean: f64,
	std_dev: Option<f64>, // sample std dev, undefined below two seeds
}

fn summarize(tables: &AlgorithmTables) -> Vec<SummaryRecord> {
	return tables.iter().flat_map(|(algorithm, table)| {
		table.buckets().iter().enumerate()
			.filter(|(_, seeds)| !seeds.is_empty())
			.map(move |(drones, seeds)| SummaryRecord {
				algorithm: algorithm.clone(),
				drones,
				seeds: seeds.len(),
				mean: seeds.values().mean(),
				std_dev: (seeds.len() > 1).then(|| seeds.values().std_dev()),
			})
	}).collect_vec();
}

/// Writes one CSV row per record, with a header, and returns the number of rows written.
fn write_summary<W: std::io::Write>(records: &[SummaryRecord], out: W) -> csv::Result<usize> {
	let mut writer = csv::Writer::from_writer(out);
	for record in records {
		log::debug!("{}, {} drones: {} seeds", record.algorithm, record.drones, record.seeds);
		writer.serialize(record)?;
	}
	writer.flush()?;
	return Ok(records.len());
}

fn main() -> anyhow::Result<()> {
	pretty_env_logger::init();
	let config = Config::parse();
	let aggregator_config = AggregatorConfig { bucket_count: config.buckets, metric: config.metric };

	let tables = relay_stats::collect_by_algorithm(&config.path, &aggregator_config)
		.with_context(|| format!("Cannot collect results from {}", config.path.display()))?;

	let written = write_summary(&summarize(&tables), std::io::stdout())?;
	log::info!("Summarized {written} buckets over {} algorithms", tables.len());

	Ok(())
}
