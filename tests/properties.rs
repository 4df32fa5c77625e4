use proptest::prelude::*;
use vecluster::{ClusterEngine, Dataset, InitMethod, KMeansConfig};

/// (vectors, k) with 1 <= k <= N
fn dataset_and_k() -> impl Strategy<Value = (Vec<Vec<f64>>, usize)> {
    (1usize..6, 1usize..40).prop_flat_map(|(dimension, n)| {
        (
            proptest::collection::vec(proptest::collection::vec(-100.0f64..100.0, dimension), n),
            1..=n,
        )
    })
}

fn init_method() -> impl Strategy<Value = InitMethod> {
    prop_oneof![Just(InitMethod::RandomSample), Just(InitMethod::PlusPlus)]
}

proptest! {
    #[test]
    fn prop_result_shape((vectors, k) in dataset_and_k(), seed in any::<u64>(), init in init_method()) {
        let dataset = Dataset::new(vectors).unwrap();
        let engine = ClusterEngine::new(KMeansConfig::new(k).with_seed(seed).with_init(init));
        let result = engine.cluster(&dataset).unwrap();

        prop_assert_eq!(result.assignments.len(), dataset.len());
        prop_assert!(result.assignments.iter().all(|&label| label < k));
        prop_assert_eq!(result.centroids.len(), k);
        prop_assert!(result.centroids.iter().all(|c| c.len() == dataset.dimension()));
        prop_assert!(result.centroids.iter().flatten().all(|x| x.is_finite()));
        prop_assert!(result.iterations >= 1);
    }

    #[test]
    fn prop_deterministic_given_seed((vectors, k) in dataset_and_k(), seed in any::<u64>(), init in init_method()) {
        let dataset = Dataset::new(vectors).unwrap();
        let config = KMeansConfig::new(k).with_seed(seed).with_init(init);

        let a = ClusterEngine::new(config.clone()).cluster(&dataset).unwrap();
        let b = ClusterEngine::new(config.clone()).cluster(&dataset).unwrap();
        let c = ClusterEngine::new(config.with_parallel(false)).cluster(&dataset).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
    }

    #[test]
    fn prop_inertia_non_increasing((vectors, k) in dataset_and_k(), seed in any::<u64>()) {
        let dataset = Dataset::new(vectors).unwrap();
        let engine = ClusterEngine::new(KMeansConfig::new(k).with_seed(seed).with_tolerance(0.0));
        let result = engine.cluster(&dataset).unwrap();

        let slack = |x: f64| x * 1e-12 + 1e-9;
        for pair in result.inertia_history.windows(2) {
            prop_assert!(pair[1] <= pair[0] + slack(pair[0]), "history rose: {:?}", result.inertia_history);
        }
        let last = *result.inertia_history.last().unwrap();
        prop_assert!(result.inertia <= last + slack(last));
    }

    #[test]
    fn prop_single_cluster_is_mean((vectors, _) in dataset_and_k(), seed in any::<u64>()) {
        let dataset = Dataset::new(vectors).unwrap();
        let result = ClusterEngine::new(KMeansConfig::new(1).with_seed(seed))
            .cluster(&dataset)
            .unwrap();

        let n = dataset.len() as f64;
        for d in 0..dataset.dimension() {
            let mean = dataset.iter().map(|v| v[d]).sum::<f64>() / n;
            prop_assert!((result.centroids[0][d] - mean).abs() <= 1e-9);
        }
        prop_assert!(result.assignments.iter().all(|&label| label == 0));
    }
}
