//! Dashboard pipeline: filter the loaded records, then aggregate the selected view.

use crate::config::DashboardConfig;
use crate::data::{FilterParams, RecordSet};
use crate::stats::{aggregate, Metric, ViewMode, ViewResult};
use serde::{Deserialize, Serialize};

/// Everything the user can change in the control panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardParams {
    pub filter: FilterParams,
    pub metric: Metric,
    pub view: ViewMode,
}

impl DashboardParams {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            filter: FilterParams {
                position_range: config.position_range,
                ..FilterParams::default()
            },
            metric: config.metric,
            view: config.view,
        }
    }
}

/// Output of one dashboard refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub result: ViewResult,
    /// Records left after filtering.
    pub matched: usize,
    /// Records in the loaded set.
    pub total: usize,
}

/// Run filter then aggregate. Pure: the record set is not modified.
pub fn compute_view(records: &RecordSet, params: &DashboardParams) -> DashboardView {
    let filtered = params.filter.apply(records.records());
    let result = aggregate(&filtered, params.view, params.metric);
    DashboardView {
        result,
        matched: filtered.len(),
        total: records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Classification, SerpRecord};

    #[test]
    fn params_take_config_defaults() {
        let config = DashboardConfig {
            position_range: (2, 6),
            view: ViewMode::BrandBreakdown,
            ..DashboardConfig::default()
        };
        let params = DashboardParams::from_config(&config);
        assert_eq!(params.filter.position_range, (2, 6));
        assert_eq!(params.filter.states, None);
        assert_eq!(params.metric, Metric::RawCount);
        assert_eq!(params.view, ViewMode::BrandBreakdown);
    }

    #[test]
    fn counts_matched_records() {
        let records = RecordSet::new(vec![
            SerpRecord::new("CA", "k", Some(2), Classification::Real),
            SerpRecord::new("CA", "k", Some(9), Classification::Other),
        ]);
        let view = compute_view(&records, &DashboardParams::default());
        assert_eq!(view.matched, 1);
        assert_eq!(view.total, 2);
        assert_eq!(view.result.view(), ViewMode::Overview);
    }
}
