// src/model/customer.rs

use serde::Serialize;

/// Timing of a single customer through the single-server queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub index: usize,
    pub inter_arrival_time: f64,
    /// Sampled service duration. The served time can be shorter when the
    /// horizon cuts the service off.
    pub service_duration: f64,
    pub arrival_time: f64,
    pub service_start_time: f64,
    pub service_end_time: f64,
}

impl Customer {
    /// Builds the next customer from its predecessor. The server is FIFO and
    /// work-conserving: service starts at arrival or when the previous
    /// customer leaves, whichever is later. Service end is clamped to the
    /// horizon.
    pub fn next(
        previous: Option<&Customer>,
        inter_arrival_time: f64,
        service_duration: f64,
        horizon: f64,
    ) -> Self {
        let (index, arrival_time, server_free_at) = match previous {
            Some(prev) => (
                prev.index + 1,
                prev.arrival_time + inter_arrival_time,
                prev.service_end_time,
            ),
            None => (0, inter_arrival_time, f64::NEG_INFINITY),
        };
        let service_start_time = arrival_time.max(server_free_at);
        let service_end_time = (service_start_time + service_duration).min(horizon);

        Self {
            index,
            inter_arrival_time,
            service_duration,
            arrival_time,
            service_start_time,
            service_end_time,
        }
    }

    /// True when the customer arrived inside the simulated window.
    pub fn arrived_before(&self, horizon: f64) -> bool {
        self.arrival_time < horizon
    }

    /// Time in system, never negative even for customers cut off by the horizon.
    pub fn sojourn_time(&self) -> f64 {
        (self.service_end_time - self.arrival_time).max(0.0)
    }

    /// Time spent waiting before service, clamped at the horizon end.
    pub fn waiting_time(&self) -> f64 {
        (self.service_start_time.min(self.service_end_time) - self.arrival_time).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_customer_starts_on_arrival() {
        let c = Customer::next(None, 3.0, 4.0, 100.0);
        assert_eq!(c.index, 0);
        assert_eq!(c.arrival_time, 3.0);
        assert_eq!(c.service_start_time, 3.0);
        assert_eq!(c.service_end_time, 7.0);
    }

    #[test]
    fn customer_waits_for_busy_server() {
        let first = Customer::next(None, 1.0, 5.0, 100.0);
        let second = Customer::next(Some(&first), 2.0, 3.0, 100.0);
        assert_eq!(second.arrival_time, 3.0);
        assert_eq!(second.service_start_time, 6.0);
        assert_eq!(second.service_end_time, 9.0);
        assert_eq!(second.waiting_time(), 3.0);
        assert_eq!(second.sojourn_time(), 6.0);
    }

    #[test]
    fn service_end_is_clamped_to_horizon() {
        let c = Customer::next(None, 8.0, 5.0, 10.0);
        assert_eq!(c.service_end_time, 10.0);
        assert_eq!(c.service_duration, 5.0);
    }
}
