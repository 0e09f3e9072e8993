use proptest::prelude::*;
use stock_queue_sim::io::demand::reference_demand;
use stock_queue_sim::simulation::config::reference_strategies;
use stock_queue_sim::{
    simulate_inventory, CostModel, DemandSeries, InventoryConfig, InventorySimulator, Policy,
    StrategyComparator,
};

fn policy_strategy() -> impl Strategy<Value = Policy> {
    (0i64..50, 0i64..100).prop_map(|(s, gap)| Policy::new(s, s + gap).unwrap())
}

fn costs_strategy() -> impl Strategy<Value = CostModel> {
    (0.0f64..10.0, 0.0f64..20.0, 0.0f64..300.0)
        .prop_map(|(h, p, l)| CostModel::new(h, p, l).unwrap())
}

proptest! {
    #[test]
    fn running_costs_never_decrease(
        policy in policy_strategy(),
        demand in prop::collection::vec(0u32..120, 1..40),
        costs in costs_strategy(),
    ) {
        let result = simulate_inventory(&policy, &DemandSeries::from(demand), costs, None).unwrap();
        for pair in result.records.windows(2) {
            prop_assert!(pair[1].running_total_cost >= pair[0].running_total_cost);
            prop_assert!(pair[1].running_holding_cost >= pair[0].running_holding_cost);
            prop_assert!(pair[1].running_shortage_cost >= pair[0].running_shortage_cost);
            prop_assert!(pair[1].running_ordering_cost >= pair[0].running_ordering_cost);
        }
    }

    #[test]
    fn stock_stays_between_zero_and_order_up_to_level(
        policy in policy_strategy(),
        demand in prop::collection::vec(0u32..120, 1..40),
        costs in costs_strategy(),
    ) {
        let result = simulate_inventory(&policy, &DemandSeries::from(demand), costs, None).unwrap();
        for record in &result.records {
            prop_assert!(record.stock_after_demand <= policy.order_up_to() as u64);
            if record.order_quantity > 0 {
                prop_assert_eq!(record.stock_after_demand, policy.order_up_to() as u64);
                prop_assert_eq!(
                    record.order_quantity as i64,
                    policy.order_up_to() as i64 - record.net_stock
                );
            }
        }
    }
}

#[test]
fn comparator_picks_the_cheapest_independent_run() {
    let costs = CostModel::new(2.0, 5.0, 23.0).unwrap();
    let demand = reference_demand();
    let mut policies = reference_strategies();
    policies.push(Policy::new(5, 30).unwrap());

    let simulator = InventorySimulator::new(InventoryConfig {
        costs,
        ..InventoryConfig::default()
    });
    let rows = StrategyComparator::new(simulator)
        .compare(&policies, &demand)
        .unwrap();

    let cheapest = policies
        .iter()
        .map(|p| (*p, simulate_inventory(p, &demand, costs, None).unwrap().total_cost()))
        .fold(None::<(Policy, f64)>, |best, (p, cost)| match best {
            Some((_, best_cost)) if best_cost <= cost => best,
            _ => Some((p, cost)),
        })
        .unwrap();

    assert_eq!(rows[0].policy, cheapest.0);
    assert_eq!(rows[0].total_cost, cheapest.1);
    assert!(rows.windows(2).all(|w| w[0].total_cost <= w[1].total_cost));
}
