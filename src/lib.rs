#![allow(clippy::needless_return)]
//! Groups per-run simulation metrics by drone count and seed.
//!
//! Nothing here computes statistics. The tables are handed back to the caller, which is
//! expected to average over the seed dimension itself (see `stat_collector`).

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use itertools::Itertools;

pub mod result_file;
pub mod table;

pub use result_file::{read_metric, ResultFileName};
pub use table::AggregationTable;

/// One table per routing algorithm, keyed by the algorithm name from the filename.
pub type AlgorithmTables = BTreeMap<String, AggregationTable>;

pub const DEFAULT_BUCKET_COUNT: usize = 5;
pub const DEFAULT_METRIC: &str = "mean_number_of_relays";

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
	#[error("{0:?} is not a directory")]
	NotADirectory(PathBuf),
	#[error("IO error on {path:?}: {source}")]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("File name {0:?} does not follow simulation<sep><date><sep><id>__seed_<seed>_<drones>_<algorithm>.json")]
	MalformedFileName(String),
	#[error("Invalid JSON in {path:?}: {source}")]
	Json {
		path: PathBuf,
		source: serde_json::Error,
	},
	#[error("{path:?} has no field {metric:?}")]
	MissingMetric {
		path: PathBuf,
		metric: String,
	},
	#[error("Field {metric:?} in {path:?} is not a number")]
	NonNumericMetric {
		path: PathBuf,
		metric: String,
	},
	#[error("Cannot write the table: {0}")]
	Output(std::io::Error),
	#[error("Drone count {drones} does not fit in a table of {bucket_count} buckets")]
	BucketOutOfRange {
		drones: usize,
		bucket_count: usize,
	},
}

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
	pub bucket_count: usize,
	pub metric: String,
}

impl Default for AggregatorConfig {
	fn default() -> Self {
		return AggregatorConfig {
			bucket_count: DEFAULT_BUCKET_COUNT,
			metric: DEFAULT_METRIC.to_string(),
		};
	}
}

/// A result file found in the directory, with the metric already extracted.
#[derive(Debug, Clone)]
pub struct ResultEntry {
	pub path: PathBuf,
	pub name: ResultFileName,
	pub value: f64,
}

/// Lists the result files in `path`, sorted by name, and reads `metric` from each.
/// Stops at the first file that cannot be parsed or read.
pub fn read_entries(path: &Path, metric: &str) -> Result<Vec<ResultEntry>, AggregateError> {
	if !path.is_dir() {
		return Err(AggregateError::NotADirectory(path.to_path_buf()));
	}
	let io_err = |source| AggregateError::Io { path: path.to_path_buf(), source };

	let mut candidates = Vec::new();
	for dir_entry in fs::read_dir(path).map_err(io_err)? {
		let dir_entry = dir_entry.map_err(io_err)?;
		let file_name = dir_entry.file_name().to_string_lossy().to_string();
		if !ResultFileName::is_candidate(&file_name) || !dir_entry.path().is_file() {
			log::trace!("Skipping {:?}", dir_entry.path());
			continue;
		}
		candidates.push((file_name, dir_entry.path()));
	}

	let mut result = Vec::with_capacity(candidates.len());
	for (file_name, file_path) in candidates.into_iter().sorted() {
		let name = ResultFileName::parse(&file_name)?;
		let value = read_metric(&file_path, metric)?;
		log::debug!("{file_path:?}: run {}-{}, seed {}, {} drones, {}, {metric} = {value}", name.date, name.id, name.seed, name.drones, name.algorithm);
		result.push(ResultEntry { path: file_path, name, value });
	}

	return Ok(result);
}

/// Groups the configured metric of every result file in `path` into `table[drones][seed]`.
/// The routing algorithm is ignored, see [`collect_by_algorithm`] for the partitioned variant.
pub fn collect_table(path: impl AsRef<Path>, config: &AggregatorConfig) -> Result<AggregationTable, AggregateError> {
	let entries = read_entries(path.as_ref(), &config.metric)?;
	let mut table = AggregationTable::new(config.bucket_count);
	for entry in &entries {
		table.insert(entry.name.drones, entry.name.seed, entry.value)?;
	}
	log::info!("Aggregated {} result files from {:?}", entries.len(), path.as_ref());
	return Ok(table);
}

/// Like [`collect_table`], but keeps a separate table per routing algorithm.
pub fn collect_by_algorithm(path: impl AsRef<Path>, config: &AggregatorConfig) -> Result<AlgorithmTables, AggregateError> {
	let entries = read_entries(path.as_ref(), &config.metric)?;
	let mut tables = AlgorithmTables::new();
	for entry in &entries {
		tables
			.entry(entry.name.algorithm.clone())
			.or_insert_with(|| AggregationTable::new(config.bucket_count))
			.insert(entry.name.drones, entry.name.seed, entry.value)?;
	}
	log::info!("Aggregated {} result files for {} algorithms from {:?}", entries.len(), tables.len(), path.as_ref());
	return Ok(tables);
}

/// Prints the grouped table to `out` and returns it twice, as the averages and the standard
/// deviations.
///
/// Despite the name no statistics are computed: both handles point to the same table.
pub fn compute_data_avg_std(path: impl AsRef<Path>, config: &AggregatorConfig, out: &mut impl Write) -> Result<(Rc<AggregationTable>, Rc<AggregationTable>), AggregateError> {
	let table = Rc::new(collect_table(path, config)?);
	writeln!(out, "{table}").map_err(AggregateError::Output)?;
	return Ok((Rc::clone(&table), table));
}
