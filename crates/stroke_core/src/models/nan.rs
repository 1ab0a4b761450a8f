//! Serde helpers for undefined samples.
//!
//! `serde_json` writes non-finite floats as `null`; these read `null` back as
//! `NaN` so results survive a JSON round trip.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use super::series::Metric;

pub fn f64_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

pub fn series_or_nan<'de, D>(deserializer: D) -> Result<BTreeMap<Metric, Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<Metric, Vec<Option<f64>>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, v.into_iter().map(|s| s.unwrap_or(f64::NAN)).collect()))
        .collect())
}
