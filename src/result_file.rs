use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::AggregateError;

lazy_static! {
	static ref RESULT_FILE_NAME: Regex = Regex::new(
		r"^simulation[-_](?P<date>[^_]+)[-_](?P<id>[^-_]+)__seed_(?P<seed>\d+)_(?P<drones>\d+)_(?P<algorithm>[^.]+)\..*json$"
	).unwrap();
}

/// Metadata encoded in the name of a simulation result file, e.g.
/// `simulation-20240101-1__seed_0_3_AODV.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFileName {
	pub date: String,
	pub id: String,
	pub seed: u64,
	pub drones: usize,
	pub algorithm: String,
}

impl ResultFileName {
	/// Whether a directory entry should be treated as a result file at all.
	pub fn is_candidate(name: &str) -> bool {
		return name.starts_with("simulation") && name.ends_with(".json");
	}

	pub fn parse(name: &str) -> Result<Self, AggregateError> {
		let malformed = || AggregateError::MalformedFileName(name.to_string());
		let captures = RESULT_FILE_NAME.captures(name).ok_or_else(malformed)?;

		return Ok(ResultFileName {
			date: captures["date"].to_string(),
			id: captures["id"].to_string(),
			// digits only, so the parse fails on overflow alone
			seed: captures["seed"].parse().map_err(|_| malformed())?,
			drones: captures["drones"].parse().map_err(|_| malformed())?,
			algorithm: captures["algorithm"].to_string(),
		});
	}
}

/// Reads the numeric field `metric` out of the JSON body at `path`.
pub fn read_metric(path: &Path, metric: &str) -> Result<f64, AggregateError> {
	let file = File::open(path).map_err(|source| AggregateError::Io { path: path.to_path_buf(), source })?;
	let body: serde_json::Value = serde_json::from_reader(BufReader::new(file))
		.map_err(|source| AggregateError::Json { path: path.to_path_buf(), source })?;

	let value = body.get(metric).ok_or_else(|| AggregateError::MissingMetric {
		path: path.to_path_buf(),
		metric: metric.to_string(),
	})?;
	return value.as_f64().ok_or_else(|| AggregateError::NonNumericMetric {
		path: path.to_path_buf(),
		metric: metric.to_string(),
	});
}
