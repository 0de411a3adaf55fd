//! Invariants of correlation and group comparison

use proptest::prelude::*;
use psy_compare::{pearson, GroupComparisonEngine, SignificanceTest};
use std::collections::BTreeMap;

proptest! {
    #[test]
    fn pearson_is_bounded_and_symmetric(
        pairs in prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), 2..60),
    ) {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let r = pearson(&x, &y);
        prop_assert!((-1.0..=1.0).contains(&r));
        prop_assert!((r - pearson(&y, &x)).abs() < 1e-12);
    }

    #[test]
    fn identical_groups_never_differ(values in prop::collection::vec(0.0f64..100.0, 2..40)) {
        let engine = GroupComparisonEngine::new();
        let t = engine.t_test("a", &values, "b", &values);
        prop_assert_eq!(t.t_statistic, 0.0);
        prop_assert!(!t.significant);

        let anova = engine.anova(&[&values, &values, &values]);
        prop_assert!(anova.f_statistic.abs() < 1e-6);
        prop_assert!(!anova.significant);
    }

    #[test]
    fn test_kind_follows_group_count(
        groups in prop::collection::btree_map("[a-e]", prop::collection::vec(0.0f64..100.0, 1..10), 0..5),
    ) {
        let count = groups.len();
        let comparison = GroupComparisonEngine::new()
            .compare_samples("g", groups.into_iter().collect::<BTreeMap<_, _>>());
        match (count, &comparison.significance_test) {
            (0 | 1, None) => {}
            (2, Some(SignificanceTest::TTest(_))) => {}
            (n, Some(SignificanceTest::Anova(a))) if n > 2 => {
                prop_assert_eq!(a.df_between, n - 1);
                prop_assert!((0.0..=1.0).contains(&a.eta_squared));
            }
            (n, other) => prop_assert!(false, "{} groups produced {:?}", n, other),
        }
    }
}
