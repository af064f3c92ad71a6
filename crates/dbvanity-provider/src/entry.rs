//! Provider statistics record

use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// One provider's statistics, all-time and over the last 24 hours.
///
/// `speed*` and `efficiency*` are derived from the other fields by
/// [`recompute_fields`] and are never stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDataEntry {
    pub provider_name: String,
    pub provider_id: String,
    pub number_of_jobs: u32,
    pub number_of_jobs_24h: u32,
    /// Addresses searched
    pub total_work: f64,
    pub total_work_24h: f64,
    /// GLM paid
    pub total_cost: f64,
    pub total_cost_24h: f64,
    pub total_work_hours: f64,
    pub total_work_hours_24h: f64,
    /// Most recent job
    pub job_id: String,
    /// ISO-8601
    pub last_job_date: String,
    pub longest_job: f64,
    pub longest_job_24h: f64,
    /// Addresses per second
    pub speed: f64,
    pub speed_24h: f64,
    /// Addresses per GLM
    pub efficiency: f64,
    pub efficiency_24h: f64,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && denominator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

/// Fill the derived speed and efficiency fields from the primary ones
pub fn recompute_fields(mut entry: ProviderDataEntry) -> ProviderDataEntry {
    entry.speed = ratio(entry.total_work, entry.total_work_hours * SECONDS_PER_HOUR);
    entry.speed_24h = ratio(entry.total_work_24h, entry.total_work_hours_24h * SECONDS_PER_HOUR);
    entry.efficiency = ratio(entry.total_work, entry.total_cost);
    entry.efficiency_24h = ratio(entry.total_work_24h, entry.total_cost_24h);
    entry
}

/// Ranking score in 0..=100.
///
/// Speed saturates at 10 M addresses/s and efficiency at 1 T addresses/GLM;
/// providers that never charged get full efficiency marks.
pub fn provider_score(provider: &ProviderDataEntry) -> f64 {
    let speed_part = (provider.speed / 10.0e6).min(1.0);
    let efficiency_part = if provider.total_cost == 0.0 {
        1.0
    } else {
        (provider.efficiency / 1.0e12).min(1.0)
    };
    (speed_part.max(0.0) + efficiency_part.max(0.0)) / 2.0 * 100.0
}
