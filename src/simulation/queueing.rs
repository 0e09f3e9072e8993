// src/simulation/queueing.rs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::SimError;
use crate::model::customer::Customer;
use crate::model::distribution::DiscreteDistribution;
use crate::simulation::cancel::{self, CancellationToken};
use crate::simulation::config::QueueConfig;

/// Occupancy at one sample instant. Serialize so it can be written to CSV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineSample {
    pub time: f64,
    pub waiting: u32,
    pub in_system: u32,
    pub server_busy: u8,
}

/// Occupancy series sampled every `step` from 0 up to (excluding) the horizon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    pub step: f64,
    /// Customers that have arrived but not started service.
    pub waiting: Vec<u32>,
    /// Customers that have arrived but not finished service.
    pub in_system: Vec<u32>,
    /// 1 while the single server is serving someone.
    pub server_busy: Vec<u8>,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.server_busy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.server_busy.is_empty()
    }

    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.step
    }

    pub fn samples(&self) -> impl Iterator<Item = TimelineSample> + '_ {
        (0..self.len()).map(move |i| TimelineSample {
            time: self.time_at(i),
            waiting: self.waiting[i],
            in_system: self.in_system[i],
            server_busy: self.server_busy[i],
        })
    }

    /// Builds the series with an interval sweep: each customer adds +1/-1 at
    /// the first sample of each of its half-open intervals, then a prefix sum
    /// yields the counts at every instant.
    fn sweep(customers: &[Customer], len: usize, step: f64) -> Self {
        let mut waiting = vec![0i64; len + 1];
        let mut in_system = vec![0i64; len + 1];
        let mut busy = vec![0i64; len + 1];

        for c in customers {
            let arrival = first_sample_at_or_after(c.arrival_time, step, len);
            let start = first_sample_at_or_after(c.service_start_time, step, len);
            let end = first_sample_at_or_after(c.service_end_time, step, len);

            mark(&mut waiting, arrival, start);
            mark(&mut in_system, arrival, end);
            mark(&mut busy, start, end);
        }

        Self {
            step,
            waiting: prefix_counts(&waiting, len),
            in_system: prefix_counts(&in_system, len),
            server_busy: prefix_counts(&busy, len)
                .into_iter()
                .map(|count| count.min(1) as u8)
                .collect(),
        }
    }
}

/// Index of the first sample instant `k * step` that is `>= x`, or `len`.
fn first_sample_at_or_after(x: f64, step: f64, len: usize) -> usize {
    let mut k = ((x / step).ceil().max(0.0) as usize).min(len);
    // Settle rounding at grid points so the comparison matches the instants.
    while k > 0 && ((k - 1) as f64) * step >= x {
        k -= 1;
    }
    while k < len && (k as f64) * step < x {
        k += 1;
    }
    k
}

fn mark(diff: &mut [i64], from: usize, to: usize) {
    if from < to {
        diff[from] += 1;
        diff[to] -= 1;
    }
}

fn prefix_counts(diff: &[i64], len: usize) -> Vec<u32> {
    diff[..len]
        .iter()
        .scan(0i64, |running, delta| {
            *running += delta;
            Some(*running as u32)
        })
        .collect()
}

/// Closed-form M/M/1 results for the observed rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalyticMetrics {
    pub p0: f64,
    pub l: f64,
    pub lq: f64,
    pub w: f64,
    pub wq: f64,
}

impl AnalyticMetrics {
    /// Fails with `SimError::UnstableSystem` unless `lambda / mu < 1`.
    pub fn from_rates(lambda: f64, mu: f64) -> Result<Self, SimError> {
        let rho = lambda / mu;
        if rho.is_nan() || rho >= 1.0 {
            return Err(SimError::UnstableSystem { rho });
        }
        let idle = 1.0 - rho;
        Ok(Self {
            p0: idle,
            l: rho / idle,
            lq: rho * rho / idle,
            w: 1.0 / (mu * idle),
            wq: rho / (mu * idle),
        })
    }
}

/// Estimates measured on the simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SimulatedMetrics {
    /// Fraction of sample instants with the server idle.
    pub p0: f64,
    /// Mean number in system over the timeline.
    pub l: f64,
    /// Mean number waiting over the timeline.
    pub lq: f64,
    /// Mean time in system of customers that arrived before the horizon.
    /// Customers arriving at or after the horizon never entered the
    /// observed window and are left out of the average rather than
    /// counted as zero.
    pub w: f64,
    /// Mean wait before service of the same customers.
    pub wq: f64,
}

impl SimulatedMetrics {
    fn measure(customers: &[Customer], timeline: &Timeline, horizon: f64) -> Self {
        let samples = timeline.len().max(1) as f64;
        let busy: f64 = timeline.server_busy.iter().map(|&b| b as f64).sum();
        let in_system: f64 = timeline.in_system.iter().map(|&n| n as f64).sum();
        let waiting: f64 = timeline.waiting.iter().map(|&n| n as f64).sum();

        let observed: Vec<&Customer> = customers
            .iter()
            .filter(|c| c.arrived_before(horizon))
            .collect();
        let mean_of = |f: fn(&Customer) -> f64| {
            if observed.is_empty() {
                0.0
            } else {
                observed.iter().map(|&c| f(c)).sum::<f64>() / observed.len() as f64
            }
        };

        Self {
            p0: 1.0 - busy / samples,
            l: in_system / samples,
            lq: waiting / samples,
            w: mean_of(Customer::sojourn_time),
            wq: mean_of(Customer::waiting_time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueueMetrics {
    /// Arrival rate, 1 / mean inter-arrival time of the drawn samples.
    pub lambda: f64,
    /// Service rate, 1 / mean service time of the drawn samples.
    pub mu: f64,
    /// Traffic intensity lambda / mu.
    pub rho: f64,
    pub analytic: AnalyticMetrics,
    pub simulated: SimulatedMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueResult {
    pub customers: Vec<Customer>,
    pub timeline: Timeline,
    pub metrics: QueueMetrics,
}

/// Single-server FIFO queue driven by discrete arrival and service tables.
#[derive(Debug, Clone, Default)]
pub struct QueueSimulator {
    config: QueueConfig,
    cancel: Option<CancellationToken>,
}

impl QueueSimulator {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Polls `token` between customers and stops with `SimError::Cancelled`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Runs with a generator seeded from the configuration, so the same
    /// seed always reproduces the same run.
    pub fn run(
        &self,
        arrivals: &DiscreteDistribution,
        service: &DiscreteDistribution,
    ) -> Result<QueueResult, SimError> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.run_with_rng(arrivals, service, &mut rng)
    }

    /// Draws every inter-arrival time first, then every service time.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        arrivals: &DiscreteDistribution,
        service: &DiscreteDistribution,
        rng: &mut R,
    ) -> Result<QueueResult, SimError> {
        self.config.validate()?;
        let inter_arrivals = arrivals.sample_n(self.config.num_customers, rng);
        let services = service.sample_n(self.config.num_customers, rng);
        self.run_with_samples(&inter_arrivals, &services)
    }

    /// Runs on pre-drawn samples. `num_customers` is taken from the sample
    /// length; the remaining configuration still applies.
    pub fn run_with_samples(
        &self,
        inter_arrivals: &[f64],
        services: &[f64],
    ) -> Result<QueueResult, SimError> {
        if inter_arrivals.len() != services.len() {
            return Err(SimError::InvalidQueueConfig(format!(
                "{} inter-arrival samples but {} service samples",
                inter_arrivals.len(),
                services.len()
            )));
        }
        if let Some(bad) = inter_arrivals
            .iter()
            .chain(services)
            .find(|v| !v.is_finite() || **v <= 0.0)
        {
            return Err(SimError::InvalidQueueConfig(format!(
                "samples must be positive, got {bad}"
            )));
        }
        let config = QueueConfig {
            num_customers: inter_arrivals.len(),
            ..self.config.clone()
        };
        config.validate()?;

        let lambda = 1.0 / mean(inter_arrivals);
        let mu = 1.0 / mean(services);
        let analytic = AnalyticMetrics::from_rates(lambda, mu)?;

        let mut customers: Vec<Customer> = Vec::with_capacity(inter_arrivals.len());
        for (i, (&gap, &duration)) in inter_arrivals.iter().zip(services).enumerate() {
            cancel::check(self.cancel.as_ref(), i)?;
            let next = Customer::next(customers.last(), gap, duration, config.horizon);
            customers.push(next);
        }

        let timeline = Timeline::sweep(&customers, config.timeline_len(), config.sample_step);
        let simulated = SimulatedMetrics::measure(&customers, &timeline, config.horizon);

        let metrics = QueueMetrics {
            lambda,
            mu,
            rho: lambda / mu,
            analytic,
            simulated,
        };
        tracing::info!(
            customers = customers.len(),
            samples = timeline.len(),
            rho = metrics.rho,
            w_analytic = analytic.w,
            w_simulated = simulated.w,
            "queue simulation complete"
        );

        Ok(QueueResult {
            customers,
            timeline,
            metrics,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Runs the queue once from explicit parameters.
pub fn simulate_queue(
    arrivals: &DiscreteDistribution,
    service: &DiscreteDistribution,
    num_customers: usize,
    horizon: f64,
    sample_step: f64,
    seed: u64,
) -> Result<QueueResult, SimError> {
    QueueSimulator::new(QueueConfig {
        num_customers,
        horizon,
        sample_step,
        seed,
        ..QueueConfig::default()
    })
    .run(arrivals, service)
}
