use etab_core::{
    CellRef, Document, EditOutcome, EngineConfig, EtabError, HistoryMode, RecalcStrategy,
};

fn cell(name: &str) -> CellRef {
    CellRef::from_str(name).unwrap()
}

fn doc_with(mode: HistoryMode) -> Document {
    Document::with_config(EngineConfig {
        history_mode: mode,
        ..EngineConfig::default()
    })
}

fn raw(doc: &Document, name: &str) -> String {
    doc.grid().raw(&cell(name))
}

fn shown(doc: &Document, name: &str) -> String {
    doc.grid().display(&cell(name))
}

#[test]
fn twenty_undos_after_twenty_five_edits() {
    for mode in [HistoryMode::Delta, HistoryMode::Snapshot] {
        let mut doc = doc_with(mode);
        for n in 1..=25 {
            doc.set_cell_text(cell("A1"), &n.to_string());
        }
        assert_eq!(doc.history().undo_len(), 20);

        for _ in 0..20 {
            doc.undo().unwrap();
        }
        assert_eq!(raw(&doc, "A1"), "5", "{mode:?}");
        assert!(matches!(doc.undo(), Err(EtabError::NothingToUndo)));
    }
}

#[test]
fn undo_then_redo_restores_both_sides() {
    for mode in [HistoryMode::Delta, HistoryMode::Snapshot] {
        let mut doc = doc_with(mode);
        doc.set_cell_text(cell("A1"), "5");
        doc.set_cell_text(cell("B1"), "=A1+3");
        doc.set_cell_text(cell("A1"), "10");
        assert_eq!(shown(&doc, "B1"), "13");

        doc.undo().unwrap();
        assert_eq!(raw(&doc, "A1"), "5");
        assert_eq!(shown(&doc, "B1"), "8");

        doc.redo().unwrap();
        assert_eq!(raw(&doc, "A1"), "10");
        assert_eq!(shown(&doc, "B1"), "13");
        assert!(!doc.can_redo());
    }
}

#[test]
fn undo_removes_new_cell() {
    let mut doc = doc_with(HistoryMode::Delta);
    doc.set_cell_text(cell("C3"), "=2*2");
    assert!(doc.formulas().contains(&cell("C3")));

    doc.undo().unwrap();
    assert!(doc.grid().get(&cell("C3")).is_none());
    assert!(!doc.formulas().contains(&cell("C3")));
}

#[test]
fn new_edit_after_undo_clears_redo() {
    let mut doc = doc_with(HistoryMode::Delta);
    doc.set_cell_text(cell("A1"), "1");
    doc.set_cell_text(cell("A1"), "2");
    doc.undo().unwrap();
    assert!(doc.can_redo());

    doc.set_cell_text(cell("A1"), "3");
    assert!(matches!(doc.redo(), Err(EtabError::NothingToRedo)));
    assert_eq!(raw(&doc, "A1"), "3");
}

#[test]
fn empty_history_errors() {
    let mut doc = Document::new();
    assert!(matches!(doc.undo(), Err(EtabError::NothingToUndo)));
    assert!(matches!(doc.redo(), Err(EtabError::NothingToRedo)));
}

#[test]
fn restoration_does_not_record_history() {
    let mut doc = doc_with(HistoryMode::Delta);
    doc.set_cell_text(cell("A1"), "1");
    doc.set_cell_text(cell("A1"), "2");
    doc.undo().unwrap();
    assert_eq!(doc.history().undo_len(), 1);
    assert_eq!(doc.history().redo_len(), 1);
    assert!(!doc.is_applying_internal_update());
}

#[test]
fn unchanged_text_is_not_recorded() {
    let mut doc = doc_with(HistoryMode::Delta);
    doc.set_cell_text(cell("A1"), "1");
    assert_eq!(doc.set_cell_text(cell("A1"), "1"), EditOutcome::Unchanged);
    assert_eq!(doc.history().undo_len(), 1);
}

#[test]
fn snapshot_undo_keeps_grown_grid() {
    let mut doc = doc_with(HistoryMode::Snapshot);
    doc.set_cell_text(cell("A1"), "1");
    doc.add_row();
    doc.add_column();
    doc.set_cell_text(cell("K11"), "corner");
    assert_eq!((doc.grid().rows(), doc.grid().cols()), (11, 11));

    doc.undo().unwrap();
    assert_eq!(raw(&doc, "K11"), "");
    assert_eq!((doc.grid().rows(), doc.grid().cols()), (11, 11));

    doc.undo().unwrap();
    assert_eq!(raw(&doc, "A1"), "");
}

#[test]
fn reactive_undo_refreshes_restored_cell_only() {
    let mut doc = Document::with_config(EngineConfig {
        recalc: RecalcStrategy::Reactive,
        ..EngineConfig::default()
    });
    doc.set_cell_text(cell("A1"), "5");
    doc.set_cell_text(cell("B1"), "=A1+3");
    doc.set_cell_text(cell("B1"), "=A1*3");
    assert_eq!(shown(&doc, "B1"), "15");

    doc.undo().unwrap();
    assert_eq!(shown(&doc, "B1"), "8");
}

#[test]
fn history_depth_is_configurable() {
    let mut doc = Document::with_config(EngineConfig {
        history_depth: 3,
        ..EngineConfig::default()
    });
    for n in 1..=10 {
        doc.set_cell_text(cell("A1"), &n.to_string());
    }
    assert_eq!(doc.history().undo_len(), 3);
    for _ in 0..3 {
        doc.undo().unwrap();
    }
    assert_eq!(raw(&doc, "A1"), "7");
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn edit() -> impl Strategy<Value = (usize, usize, String)> {
        (0usize..3, 0usize..3, prop_oneof!["[0-9]{1,3}", "=[A-C][1-3]\\+1", Just(String::new())])
    }

    proptest! {
        #[test]
        fn undo_all_then_redo_all(edits in prop::collection::vec(edit(), 1..15)) {
            let mut doc = Document::new();
            for (row, col, text) in &edits {
                doc.set_cell_text(CellRef::new(*row, *col), text);
            }
            let final_texts = doc.grid().raw_texts();
            let final_displays: Vec<String> = doc
                .grid()
                .cell_refs()
                .iter()
                .map(|r| doc.grid().display(r))
                .collect();

            while doc.can_undo() {
                doc.undo().unwrap();
            }
            prop_assert!(doc.grid().raw_texts().is_empty());
            prop_assert!(doc.formulas().is_empty());

            while doc.can_redo() {
                doc.redo().unwrap();
            }
            prop_assert_eq!(doc.grid().raw_texts(), final_texts);
            let displays: Vec<String> = doc
                .grid()
                .cell_refs()
                .iter()
                .map(|r| doc.grid().display(r))
                .collect();
            prop_assert_eq!(displays, final_displays);
        }
    }
}
