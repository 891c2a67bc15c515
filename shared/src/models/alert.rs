//! Stock alert threshold policy
//!
//! A single [`AlertThresholds`] value owns the low/critical cutoffs. Both
//! the per-batch alert evaluation and the variant scan in the alerts
//! snapshot classify through it, so the two paths can never disagree.

use serde::{Deserialize, Serialize};

/// Low/critical stock cutoffs, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub critical_stock: i32,
    pub low_stock: i32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            critical_stock: 2,
            low_stock: 5,
        }
    }
}

/// Which band a post-movement stock level falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertBand {
    /// `stock <= critical` — upsert a HIGH priority active alert.
    Critical,
    /// `critical < stock <= low` — upsert a MEDIUM priority active alert.
    Low,
    /// `stock > low` — resolve any active alert, create nothing.
    Healthy,
}

impl AlertThresholds {
    pub fn classify(&self, stock: i32) -> AlertBand {
        if stock <= self.critical_stock {
            AlertBand::Critical
        } else if stock <= self.low_stock {
            AlertBand::Low
        } else {
            AlertBand::Healthy
        }
    }

    /// Inclusive threshold recorded on an alert row for a band.
    pub fn threshold_for(&self, band: AlertBand) -> Option<i32> {
        match band {
            AlertBand::Critical => Some(self.critical_stock),
            AlertBand::Low => Some(self.low_stock),
            AlertBand::Healthy => None,
        }
    }
}

/// Human-readable alert message for a band, `None` when healthy.
pub fn alert_message(band: AlertBand, stock: i32) -> Option<String> {
    match band {
        AlertBand::Critical => Some(format!("Critical stock: {} units remaining", stock)),
        AlertBand::Low => Some(format!("Low stock: {} units remaining", stock)),
        AlertBand::Healthy => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_partition_the_stock_axis() {
        let thresholds = AlertThresholds::default();
        assert_eq!(thresholds.classify(0), AlertBand::Critical);
        assert_eq!(thresholds.classify(2), AlertBand::Critical);
        assert_eq!(thresholds.classify(3), AlertBand::Low);
        assert_eq!(thresholds.classify(5), AlertBand::Low);
        assert_eq!(thresholds.classify(6), AlertBand::Healthy);
    }

    #[test]
    fn healthy_band_has_no_message() {
        let thresholds = AlertThresholds::default();
        assert_eq!(alert_message(thresholds.classify(10), 10), None);
        assert_eq!(
            alert_message(thresholds.classify(1), 1).as_deref(),
            Some("Critical stock: 1 units remaining")
        );
    }
}
