//! Cross-crate integration test helpers.
//!
//! Scenarios that run the editor, the report binder and the backup ledger
//! against real files, with assertions that hold for any input.

use regatta_codec::{BoatRecord, RaceRecord};
use regatta_core::{CoreResult, DocumentEditor};
use std::collections::HashSet;
use std::path::Path;

/// Appends each batch in turn and checks the returned ids.
///
/// Every batch must get consecutive ids starting right after the previous
/// maximum, so ids are distinct and strictly increasing across batches.
/// Returns all assigned ids.
pub fn append_race_batches(
    editor: &DocumentEditor,
    path: &Path,
    batches: &[Vec<RaceRecord>],
) -> CoreResult<Vec<i64>> {
    let mut all = Vec::new();
    let mut previous_max = editor.races(path)?.iter().filter_map(|r| r.race_id).max();

    for batch in batches {
        let ids = editor.append_races(path, path, batch)?;
        assert_eq!(ids.len(), batch.len(), "one id per appended race");
        for pair in ids.windows(2) {
            assert_eq!(pair[1], pair[0] + 1, "ids within a batch are consecutive");
        }
        if let (Some(prev), Some(first)) = (previous_max, ids.first()) {
            assert_eq!(*first, prev + 1, "batch continues from the previous maximum");
        }
        previous_max = ids.last().copied().or(previous_max);
        all.extend(ids);
    }

    let distinct: HashSet<_> = all.iter().collect();
    assert_eq!(distinct.len(), all.len(), "ids are distinct");
    Ok(all)
}

/// Applies `patch` to the boat with the patch's `YID` and checks that
/// fields absent from the patch kept their old values.
pub fn update_and_verify_overlay(
    editor: &DocumentEditor,
    path: &Path,
    patch: &BoatRecord,
) -> CoreResult<BoatRecord> {
    let yid = patch.yid.expect("patch must carry a YID");
    let before = find_boat(editor, path, yid)?;
    editor.update_fleet_by_key(path, path, patch)?;
    let after = find_boat(editor, path, yid)?;

    fn pick<T: Clone>(patched: &Option<T>, old: &Option<T>) -> Option<T> {
        patched.clone().or_else(|| old.clone())
    }
    assert_eq!(after.yid, Some(yid));
    assert_eq!(after.yacht_name, pick(&patch.yacht_name, &before.yacht_name));
    assert_eq!(after.sail_no, pick(&patch.sail_no, &before.sail_no));
    assert_eq!(after.owner, pick(&patch.owner, &before.owner));
    assert_eq!(after.club, pick(&patch.club, &before.club));
    assert_eq!(after.class_id, pick(&patch.class_id, &before.class_id));
    for (name, old) in &before.handicaps {
        let expected = patch.handicap(name).unwrap_or(*old);
        assert_eq!(after.handicap(name), Some(expected), "allowance {name}");
    }
    Ok(after)
}

/// Reads the boat with `yid`.
pub fn find_boat(editor: &DocumentEditor, path: &Path, yid: i64) -> CoreResult<BoatRecord> {
    Ok(editor
        .fleet(path)?
        .into_iter()
        .find(|b| b.yid == Some(yid))
        .unwrap_or_else(|| panic!("no boat with YID {yid}")))
}

/// The `(name, id)` keys of every report directive.
pub fn report_keys(editor: &DocumentEditor, path: &Path) -> CoreResult<Vec<(String, String)>> {
    Ok(editor
        .reports(path)?
        .into_iter()
        .map(|directive| (directive.name, directive.id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::generators::*;
    use crate::logging::init_test_logging;
    use proptest::prelude::*;
    use regatta_core::{ErrorKind, IdBase, NewDocument, StoreConfig};
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_first_race_id_is_one() {
        init_test_logging();
        with_workspace(|ws| {
            let path = ws.sample_document("event.orcsc");
            let ids = ws
                .editor
                .append_races(&path, &path, &[sample_race("R1"), sample_race("R2")])
                .unwrap();
            assert_eq!(ids, [1, 2]);
        });
    }

    #[test]
    fn test_legacy_offset_starts_races_at_two() {
        let ws = TestWorkspace::with_config(StoreConfig::new().id_base(IdBase::LegacyRaceOffset));
        let path = ws.sample_document("event.orcsc");

        let races = ws.editor.append_races(&path, &path, &[sample_race("R1")]).unwrap();
        let boats = ws
            .editor
            .append_fleet(&path, &path, &[sample_boat("Hope", "ISR 1")])
            .unwrap();
        assert_eq!(races, [2]);
        assert_eq!(boats, [1]);
    }

    #[test]
    fn test_delete_then_append_does_not_reuse_max() {
        with_workspace(|ws| {
            let path = ws.sample_document("event.orcsc");
            let ids = ws
                .editor
                .append_races(&path, &path, &[sample_race("R1"), sample_race("R2")])
                .unwrap();
            ws.editor.delete_race(&path, &path, ids[0]).unwrap();

            let next = ws.editor.append_races(&path, &path, &[sample_race("R3")]).unwrap();
            assert_eq!(next, [3]);
        });
    }

    #[test]
    fn test_failed_mutation_leaves_file_untouched() {
        with_workspace(|ws| {
            let path = ws.sample_document("event.orcsc");
            let before = fs::read_to_string(&path).unwrap();

            let err = ws.editor.delete_boat(&path, &path, 42).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
            assert_eq!(fs::read_to_string(&path).unwrap(), before);
        });
    }

    #[test]
    fn test_certificate_import_gets_next_yid() {
        with_workspace(|ws| {
            let path = ws.sample_document("event.orcsc");
            ws.editor
                .append_fleet(&path, &path, &[sample_boat("Hope", "ISR 1")])
                .unwrap();

            let cert = json!({ "YachtName": "Faith", "SailNo": "GRE 7", "GPH": 598.1 });
            let yid = ws
                .editor
                .add_fleet_from_external_record(&path, &path, &cert, Some("O1"))
                .unwrap();
            assert_eq!(yid, 2);

            let boat = find_boat(&ws.editor, &path, yid).unwrap();
            assert_eq!(boat.yacht_name.as_deref(), Some("Faith"));
            assert_eq!(boat.handicap("GPH"), Some(598.1));
        });
    }

    #[test]
    fn test_delete_class_drops_its_reports() {
        with_workspace(|ws| {
            let path = ws.sample_document("event.orcsc");
            ws.editor.delete_class(&path, &path, "Z").unwrap();

            let keys = report_keys(&ws.editor, &path).unwrap();
            assert_eq!(keys.len(), 4);
            assert!(keys.iter().all(|(_, id)| id != "Z"));
        });
    }

    #[test]
    fn test_backup_edit_restore_cycle() {
        init_test_logging();
        with_workspace(|ws| {
            let path = ws.sample_document("event.orcsc");
            let original = fs::read_to_string(&path).unwrap();

            let init = ws.ledger.create_backup(&path, "init").unwrap();
            ws.editor
                .append_races(&path, &path, &[sample_race("R1")])
                .unwrap();
            ws.ledger.create_backup(&path, "edit").unwrap();

            let listed: Vec<_> = ws
                .ledger
                .list_backups(&path)
                .unwrap()
                .into_iter()
                .map(|e| e.change_summary)
                .collect();
            assert_eq!(listed, ["edit", "init"]);

            ws.ledger.restore_backup(&init).unwrap();

            let remaining = ws.ledger.list_backups(&path).unwrap();
            assert_eq!(remaining.len(), 1);
            assert_eq!(remaining[0].change_summary, "init");
            assert_eq!(fs::read_to_string(&path).unwrap(), original);
            assert_eq!(ws.editor.summary(&path).unwrap().races, 0);
        });
    }

    #[test]
    fn test_backups_in_subdirectories_are_separate() {
        with_workspace(|ws| {
            fs::create_dir_all(ws.path("a")).unwrap();
            fs::create_dir_all(ws.path("b")).unwrap();
            let a = ws.sample_document("a/event.orcsc");
            let b = ws.sample_document("b/event.orcsc");

            ws.ledger.create_backup(&a, "a").unwrap();
            ws.ledger.create_backup(&b, "b").unwrap();

            assert_eq!(ws.ledger.list_backups(&a).unwrap().len(), 1);
            assert_eq!(ws.ledger.list_backups(&b).unwrap()[0].change_summary, "b");
        });
    }

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn race_ids_increase_across_batches(batches in race_batches_strategy()) {
            let ws = TestWorkspace::new();
            let path = ws.sample_document("event.orcsc");

            let ids = append_race_batches(&ws.editor, &path, &batches).unwrap();
            let total: usize = batches.iter().map(Vec::len).sum();
            prop_assert_eq!(ids.first().copied(), Some(1));
            prop_assert_eq!(ids.len(), total);
            prop_assert_eq!(ws.editor.summary(&path).unwrap().races, total);
        }

        #[test]
        fn update_overlays_only_patched_fields(
            boat in boat_strategy(),
            owner in proptest::option::of("[A-Z][a-z]{2,8}"),
            allowance in proptest::option::of(allowance_strategy()),
        ) {
            let ws = TestWorkspace::new();
            let path = ws.sample_document("event.orcsc");
            let yid = ws.editor.append_fleet(&path, &path, &[boat]).unwrap()[0];

            let mut patch = BoatRecord { yid: Some(yid), owner, ..BoatRecord::default() };
            if let Some(value) = allowance {
                patch.set_handicap("GPH", value);
            }
            let after = update_and_verify_overlay(&ws.editor, &path, &patch).unwrap();
            if let Some(value) = allowance {
                prop_assert_eq!(after.handicap("GPH"), Some(value));
            }
        }

        #[test]
        fn binding_yields_two_plus_two_per_class(classes in distinct_classes_strategy(6)) {
            let ws = TestWorkspace::new();
            let path = ws.create("event.orcsc", &NewDocument::new(sample_event()));

            ws.editor.append_classes(&path, &path, &classes).unwrap();
            let keys = report_keys(&ws.editor, &path).unwrap();
            prop_assert_eq!(keys.len(), 2 + 2 * classes.len());

            let distinct: HashSet<_> = keys.iter().collect();
            prop_assert_eq!(distinct.len(), keys.len());
        }
    }
}
