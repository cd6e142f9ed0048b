use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::AggregateError;

/// Metric values grouped by drone count (the bucket index), then by seed.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationTable {
	buckets: Vec<BTreeMap<u64, f64>>,
}

impl AggregationTable {
	pub fn new(bucket_count: usize) -> Self {
		return AggregationTable {
			buckets: vec![BTreeMap::new(); bucket_count],
		};
	}

	/// Stores `value` under `[drones][seed]` and returns the value it replaced, if any.
	pub fn insert(&mut self, drones: usize, seed: u64, value: f64) -> Result<Option<f64>, AggregateError> {
		let bucket_count = self.buckets.len();
		let bucket = self.buckets.get_mut(drones).ok_or(AggregateError::BucketOutOfRange { drones, bucket_count })?;

		let previous = bucket.insert(seed, value);
		if let Some(previous) = previous {
			log::warn!("Seed {seed} already recorded for {drones} drones, replacing {previous} with {value}");
		}
		return Ok(previous);
	}

	pub fn bucket(&self, drones: usize) -> Option<&BTreeMap<u64, f64>> {
		return self.buckets.get(drones);
	}

	pub fn buckets(&self) -> &[BTreeMap<u64, f64>] {
		return &self.buckets;
	}

	pub fn bucket_count(&self) -> usize {
		return self.buckets.len();
	}

	/// Total number of recorded values across all buckets.
	pub fn len(&self) -> usize {
		return self.buckets.iter().map(BTreeMap::len).sum();
	}

	pub fn is_empty(&self) -> bool {
		return self.buckets.iter().all(BTreeMap::is_empty);
	}
}

impl fmt::Display for AggregationTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let buckets = self.buckets.iter().enumerate().map(|(drones, seeds)| {
			let seeds = seeds.iter().map(|(seed, value)| format!("{seed}: {value:?}")).join(", ");
			return format!("{drones}: {{{seeds}}}");
		}).join(", ");
		return write!(f, "{{{buckets}}}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_table_has_empty_buckets() {
		let table = AggregationTable::new(5);
		assert_eq!(table.bucket_count(), 5);
		assert!(table.is_empty());
		assert_eq!(table.len(), 0);
		assert!(table.buckets().iter().all(BTreeMap::is_empty));
		assert!(table.bucket(5).is_none());
	}

	#[test]
	fn insert_out_of_range_fails() {
		let mut table = AggregationTable::new(5);
		let err = table.insert(5, 0, 1.0).unwrap_err();
		assert!(matches!(err, AggregateError::BucketOutOfRange { drones: 5, bucket_count: 5 }));
		assert!(table.is_empty());
	}

	#[test]
	fn duplicate_seed_replaces_value() {
		let mut table = AggregationTable::new(5);
		assert_eq!(table.insert(2, 7, 1.5).unwrap(), None);
		assert_eq!(table.insert(2, 7, 2.5).unwrap(), Some(1.5));
		assert_eq!(table.bucket(2).unwrap()[&7], 2.5);
		assert_eq!(table.len(), 1);
	}

	#[test]
	fn display_lists_buckets_in_order() {
		let mut table = AggregationTable::new(5);
		table.insert(3, 1, 2.0).unwrap();
		table.insert(3, 0, 4.5).unwrap();
		assert_eq!(table.to_string(), "{0: {}, 1: {}, 2: {}, 3: {0: 4.5, 1: 2.0}, 4: {}}");
	}
}
