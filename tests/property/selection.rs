//! Selection cursor invariants.
//!
//! 1. **Bounds**: the cursor is always `-1` or a valid index
//! 2. **Clamping**: moving past either end leaves the cursor at that end
//! 3. **Empty lists**: nothing moves the cursor when there are no results

use crate::common::sample_records;
use proptest::prelude::*;
use sitefind::render::Panel;
use sitefind::{OverlayConfig, Selection};

#[derive(Debug, Clone)]
enum Op {
    Down,
    Up,
    Select(usize),
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Down),
        4 => Just(Op::Up),
        1 => (0usize..20).prop_map(Op::Select),
        1 => Just(Op::Reset),
    ]
}

fn apply(sel: &mut Selection, op: &Op, len: usize) {
    match op {
        Op::Down => {
            sel.move_down(len);
        }
        Op::Up => {
            sel.move_up(len);
        }
        Op::Select(i) => {
            sel.select(*i, len);
        }
        Op::Reset => sel.reset(),
    }
}

proptest! {
    #[test]
    fn prop_cursor_stays_in_bounds(len in 0usize..12, ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut sel = Selection::default();
        for op in &ops {
            apply(&mut sel, op, len);
            prop_assert!(sel.in_bounds(len));
            let signed = sel.as_signed();
            prop_assert!(signed >= -1 && signed < len as isize);
        }
    }

    #[test]
    fn prop_empty_list_never_selects(ops in prop::collection::vec(op_strategy(), 0..32)) {
        let mut sel = Selection::default();
        for op in &ops {
            apply(&mut sel, op, 0);
            prop_assert_eq!(sel.index(), None);
        }
    }

    #[test]
    fn prop_down_saturates_at_last(len in 1usize..12, presses in 0usize..30) {
        let mut sel = Selection::default();
        for _ in 0..presses {
            sel.move_down(len);
        }
        let expected = if presses == 0 { None } else { Some((presses - 1).min(len - 1)) };
        prop_assert_eq!(sel.index(), expected);
    }

    #[test]
    fn prop_up_saturates_at_first(len in 1usize..12, downs in 0usize..12, ups in 1usize..30) {
        let mut sel = Selection::default();
        for _ in 0..downs {
            sel.move_down(len);
        }
        for _ in 0..ups {
            sel.move_up(len);
        }
        let start = if downs == 0 { 0 } else { (downs - 1).min(len - 1) };
        let expected = if downs == 0 { 0 } else { start.saturating_sub(ups) };
        prop_assert_eq!(sel.index(), Some(expected));
    }

    #[test]
    fn prop_panel_marks_exactly_the_selection(len in 1usize..10, pick in 0usize..10) {
        let records = sample_records(len);
        let mut sel = Selection::default();
        let picked = sel.select(pick, len);
        let panel = Panel::from_results(&records, sel, &OverlayConfig::default());
        let marked: Vec<usize> = panel.items().iter().filter(|i| i.selected).map(|i| i.position).collect();
        if picked {
            prop_assert_eq!(marked, vec![pick]);
        } else {
            prop_assert!(marked.is_empty());
        }
        prop_assert_eq!(panel.items().len(), len);
    }
}
