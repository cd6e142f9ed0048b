use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use relay_stats::AggregatorConfig;

#[derive(Parser)]
struct Config {
	#[arg(default_value = "data/evaluation_tests")]
	path: PathBuf,
	#[arg(short, long, default_value_t = relay_stats::DEFAULT_BUCKET_COUNT)]
	buckets: usize, // one per drone count, starting at zero
	#[arg(short, long, default_value = relay_stats::DEFAULT_METRIC)]
	metric: String,
	#[arg(long, name = "by-algorithm")]
	by_algorithm: bool,
}

fn main() -> anyhow::Result<()> {
	pretty_env_logger::init();
	let config = Config::parse();
	let aggregator_config = AggregatorConfig { bucket_count: config.buckets, metric: config.metric };

	if config.by_algorithm {
		let tables = relay_stats::collect_by_algorithm(&config.path, &aggregator_config)
			.with_context(|| format!("Cannot aggregate {}", config.path.display()))?;
		for (algorithm, table) in &tables {
			println!("{algorithm}: {table}");
		}
	} else {
		relay_stats::compute_data_avg_std(&config.path, &aggregator_config, &mut std::io::stdout())
			.with_context(|| format!("Cannot aggregate {}", config.path.display()))?;
	}

	Ok(())
}
