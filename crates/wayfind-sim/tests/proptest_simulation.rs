use proptest::prelude::*;
use wayfind_sim::{SimulationConfig, Simulator};

fn arb_config() -> impl Strategy<Value = SimulationConfig> {
    (any::<u64>(), 1usize..16, 0u8..=100, 0u32..30, 0u32..6, any::<bool>()).prop_map(
        |(seed, node_count, edge_percent, max_weight, mutation_rounds, revalidate_on_run)| SimulationConfig {
            seed,
            node_count,
            edge_percent,
            max_weight,
            mutation_rounds,
            revalidate_on_run,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_seed_and_shape_passes_the_oracle(config in arb_config()) {
        let result = Simulator::new(config).expect("valid config").run().expect("run");
        prop_assert_eq!(result.rounds.len(), config.mutation_rounds as usize + 1);
        for round in &result.rounds {
            prop_assert!(round.oracle.passed, "round {}: {:?}", round.round, round.oracle.violations);
            prop_assert!(round.reachable >= 1 && round.reachable <= round.node_count);
        }
    }

    #[test]
    fn reruns_of_a_seed_agree(config in arb_config()) {
        let first = Simulator::new(config).expect("valid config").run().expect("run");
        let second = Simulator::new(config).expect("valid config").run().expect("run");
        for (a, b) in first.rounds.iter().zip(&second.rounds) {
            prop_assert_eq!(a.source, b.source);
            prop_assert_eq!(&a.mutations, &b.mutations);
            prop_assert_eq!(a.reachable, b.reachable);
        }
    }
}
