use serde::Serialize;

use super::types::{Customer, CustomerStatus};

/// Per-status customer counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CustomerStats {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub inactive: usize,
}

impl CustomerStats {
    /// Counts customers by status.
    pub fn from_customers(customers: &[Customer]) -> Self {
        customers
            .iter()
            .fold(Self::default(), |mut stats, customer| {
                stats.total += 1;
                match customer.status {
                    CustomerStatus::Active => stats.active += 1,
                    CustomerStatus::Pending => stats.pending += 1,
                    CustomerStatus::Inactive => stats.inactive += 1,
                }
                stats
            })
    }

    /// Returns the count for one status.
    pub fn count(&self, status: CustomerStatus) -> usize {
        match status {
            CustomerStatus::Active => self.active,
            CustomerStatus::Pending => self.pending,
            CustomerStatus::Inactive => self.inactive,
        }
    }

    /// Share of active customers, rounded to the nearest percent.
    pub fn active_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.active as f64 / self.total as f64) * 100.0).round() as u32
    }
}
