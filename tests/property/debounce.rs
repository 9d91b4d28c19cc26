//! Last-write-wins under arbitrary typing rhythms.
//!
//! For any sequence of inputs with gaps shorter than the debounce window, the
//! engine sees exactly one query: the final input. Runs on a paused clock so
//! every case is deterministic.

use crate::common::*;
use proptest::prelude::*;
use sitefind::harness::HostOptions;
use sitefind::OverlayConfig;
use tokio::task::LocalSet;

fn run_case(inputs: &[String], gaps: &[u64]) -> Vec<(String, String)> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();
    LocalSet::new().block_on(&runtime, async {
        let t = test_session(OverlayConfig::default(), HostOptions::default());
        t.session.open();
        settle(1).await;
        for (input, gap) in inputs.iter().zip(gaps) {
            t.session.on_query_input(input);
            settle(*gap).await;
        }
        settle(500).await;
        t.engine.queries()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_only_final_input_reaches_engine(
        inputs in prop::collection::vec("[a-z]{1,6}", 1..8),
        gaps in prop::collection::vec(0u64..99, 8),
    ) {
        let queries = run_case(&inputs, &gaps);
        let last = inputs.last().cloned().unwrap();
        prop_assert_eq!(queries, vec![(last, "all".to_string())]);
    }
}
