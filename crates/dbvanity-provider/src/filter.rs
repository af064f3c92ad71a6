//! Provider filtering and ranking

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::entry::{provider_score, ProviderDataEntry};

/// A numeric provider statistic that can be bounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    Work,
    Work24h,
    Speed,
    Speed24h,
    Efficiency,
    Efficiency24h,
    WorkHours,
    WorkHours24h,
    TotalCost,
    TotalCost24h,
    NumberOfJobs,
    NumberOfJobs24h,
    LongestJob,
    LongestJob24h,
}

impl Stat {
    pub fn value(&self, p: &ProviderDataEntry) -> f64 {
        match self {
            Stat::Work => p.total_work,
            Stat::Work24h => p.total_work_24h,
            Stat::Speed => p.speed,
            Stat::Speed24h => p.speed_24h,
            Stat::Efficiency => p.efficiency,
            Stat::Efficiency24h => p.efficiency_24h,
            Stat::WorkHours => p.total_work_hours,
            Stat::WorkHours24h => p.total_work_hours_24h,
            Stat::TotalCost => p.total_cost,
            Stat::TotalCost24h => p.total_cost_24h,
            Stat::NumberOfJobs => f64::from(p.number_of_jobs),
            Stat::NumberOfJobs24h => f64::from(p.number_of_jobs_24h),
            Stat::LongestJob => p.longest_job,
            Stat::LongestJob24h => p.longest_job_24h,
        }
    }

    /// Multiplier from the unit bounds are given in to the stored unit
    /// (work in G addresses, speed in M addresses/s, efficiency in T addresses/GLM)
    pub fn unit_scale(&self) -> f64 {
        match self {
            Stat::Work | Stat::Work24h => 1e9,
            Stat::Speed | Stat::Speed24h => 1e6,
            Stat::Efficiency | Stat::Efficiency24h => 1e12,
            _ => 1.0,
        }
    }
}

/// Inclusive bounds in display units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Range {
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    fn contains(&self, value: f64, scale: f64) -> bool {
        self.min.map_or(true, |min| value >= min * scale)
            && self.max.map_or(true, |max| value <= max * scale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    ProviderName,
    LastJobDate,
    Score,
    Stat(Stat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Providers shown when no limit is chosen
pub const DEFAULT_DISPLAY_LIMIT: usize = 50;

/// Provider list query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring of the provider name
    pub provider_name_search: String,
    pub ranges: Vec<(Stat, Range)>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// Maximum providers returned (None = all)
    pub display_limit: Option<usize>,
}

impl Default for FilterCriteria {
    /// Active providers (at least one job and one work hour in 24h), best score first
    fn default() -> Self {
        Self {
            provider_name_search: String::new(),
            ranges: vec![
                (Stat::WorkHours24h, Range::at_least(1.0)),
                (Stat::NumberOfJobs24h, Range::at_least(1.0)),
            ],
            sort_by: SortBy::Score,
            sort_order: SortOrder::Desc,
            display_limit: Some(DEFAULT_DISPLAY_LIMIT),
        }
    }
}

/// Result of applying a [`FilterCriteria`]
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Providers passing the filter, before the display limit
    pub total_matches: usize,
    pub providers: Vec<ProviderDataEntry>,
}

impl FilterCriteria {
    /// Criteria with no bounds
    pub fn unfiltered() -> Self {
        Self {
            ranges: Vec::new(),
            ..Default::default()
        }
    }

    pub fn with_range(mut self, stat: Stat, range: Range) -> Self {
        self.ranges.push((stat, range));
        self
    }

    pub fn sorted(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn matches(&self, p: &ProviderDataEntry) -> bool {
        if !self.provider_name_search.is_empty()
            && !p
                .provider_name
                .to_lowercase()
                .contains(&self.provider_name_search.to_lowercase())
        {
            return false;
        }

        self.ranges
            .iter()
            .all(|(stat, range)| range.contains(stat.value(p), stat.unit_scale()))
    }

    fn compare(&self, a: &ProviderDataEntry, b: &ProviderDataEntry) -> Ordering {
        let ord = match self.sort_by {
            SortBy::ProviderName => a
                .provider_name
                .to_lowercase()
                .cmp(&b.provider_name.to_lowercase()),
            SortBy::LastJobDate => a.last_job_date.cmp(&b.last_job_date),
            SortBy::Score => provider_score(a)
                .partial_cmp(&provider_score(b))
                .unwrap_or(Ordering::Equal),
            SortBy::Stat(stat) => stat
                .value(a)
                .partial_cmp(&stat.value(b))
                .unwrap_or(Ordering::Equal),
        };

        match self.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }

    /// Filter, sort and truncate a provider list
    pub fn apply<'a, I>(&self, providers: I) -> FilterOutcome
    where
        I: IntoIterator<Item = &'a ProviderDataEntry>,
    {
        let mut matched: Vec<ProviderDataEntry> = providers
            .into_iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        matched.sort_by(|a, b| self.compare(a, b));

        let total_matches = matched.len();
        if let Some(limit) = self.display_limit {
            matched.truncate(limit);
        }

        FilterOutcome {
            total_matches,
            providers: matched,
        }
    }
}
