//! Report directive binding.
//!
//! The `reports` section carries one directive per `(name, id)` key. Two
//! event-wide directives have an empty id; every class gets an entry list
//! and a race-results directive keyed by its `ClassId`, generated from the
//! template of the class's scoring family.

use regatta_codec::{ClassRecord, Record, ReportDirective, XmlElement, YachtClass};
use tracing::debug;

/// Event-wide results report.
pub const EVENT_RESULTS: &str = "TEventResults";
/// Start-line scratch sheet.
pub const SCRATCH_SHEET: &str = "TScratchSheet";
/// Per-class entry list.
pub const ENTRY_LIST: &str = "TEntryList";
/// Per-class race results.
pub const RACE_RESULTS: &str = "TRaceResults";

/// Directive names generated once per class.
pub const PER_CLASS_REPORTS: [&str; 2] = [ENTRY_LIST, RACE_RESULTS];

const REPORT_ELEMENT: &str = "report";

/// Counts from one bind pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindOutcome {
    /// Directives removed because their key was regenerated.
    pub removed: usize,
    /// Directives inserted.
    pub inserted: usize,
}

/// Regenerates report directives inside a `reports` element.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBinder;

impl ReportBinder {
    /// Creates a binder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Rebinds the event-wide directives and the per-class directives of
    /// `classes`.
    ///
    /// Any existing directive sharing a regenerated key is removed first, so
    /// each key occurs once afterwards. Directives of classes not listed are
    /// kept.
    pub fn bind(&self, reports: &mut XmlElement, classes: &[ClassRecord]) -> BindOutcome {
        let mut outcome = BindOutcome::default();

        for name in [EVENT_RESULTS, SCRATCH_SHEET] {
            outcome.removed += remove_named(reports, name, None);
            reports.push(event_wide(name).to_element());
            outcome.inserted += 1;
        }

        for name in PER_CLASS_REPORTS {
            for class in classes {
                outcome.removed += remove_named(reports, name, Some(&class.class_id));
                reports.push(per_class(name, class).to_element());
                outcome.inserted += 1;
            }
        }

        debug!(
            classes = classes.len(),
            removed = outcome.removed,
            inserted = outcome.inserted,
            "bound report directives"
        );
        outcome
    }

    /// Removes every per-class directive of `class_id`.
    pub fn unbind_class(&self, reports: &mut XmlElement, class_id: &str) -> usize {
        PER_CLASS_REPORTS
            .iter()
            .map(|name| remove_named(reports, name, Some(class_id)))
            .sum()
    }
}

fn remove_named(reports: &mut XmlElement, name: &str, id: Option<&str>) -> usize {
    reports.remove_children(|el| {
        el.name == REPORT_ELEMENT
            && el.attribute("name") == Some(name)
            && id.map_or(true, |id| el.attribute("id").unwrap_or("") == id)
    })
}

fn event_wide(name: &str) -> ReportDirective {
    let mut directive = ReportDirective::new(name, "");
    match name {
        EVENT_RESULTS => {
            directive.title = Some("Overall Results".to_string());
            directive.orientation = Some("Landscape".to_string());
            directive.sort_by = Some("Rank".to_string());
        }
        _ => {
            directive.title = Some("Scratch Sheet".to_string());
            directive.orientation = Some("Portrait".to_string());
            directive.sort_by = Some("SailNo".to_string());
        }
    }
    directive
}

fn per_class(name: &str, class: &ClassRecord) -> ReportDirective {
    let label = class.class_name.as_deref().unwrap_or(&class.class_id);
    let family = class.family();
    let mut directive = ReportDirective::new(name, class.class_id.clone());
    directive.layout = Some(family.as_str().to_string());

    let (title, orientation, columns, sort_by) = match (name, family) {
        (ENTRY_LIST, YachtClass::Orc) => (
            "Entry List class",
            "Landscape",
            "SailNo,YachtName,Owner,Club,CDL,GPH",
            "SailNo",
        ),
        (ENTRY_LIST, YachtClass::OneDesign) => (
            "Entry List class",
            "Portrait",
            "BowNo,SailNo,YachtName,Skipper,Club",
            "BowNo",
        ),
        (_, YachtClass::Orc) => (
            "Results class",
            "Landscape",
            "Rank,SailNo,YachtName,Elapsed,Corrected,Points",
            "Rank",
        ),
        (_, YachtClass::OneDesign) => (
            "Results class",
            "Portrait",
            "Rank,SailNo,YachtName,Finish,Points",
            "Rank",
        ),
    };
    directive.title = Some(format!("{title} {label}"));
    directive.orientation = Some(orientation.to_string());
    directive.columns = Some(columns.to_string());
    directive.sort_by = Some(sort_by.to_string());
    directive
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn classes() -> Vec<ClassRecord> {
        vec![
            ClassRecord::new("O1", "ORC1", YachtClass::Orc),
            ClassRecord::new("Z", "Amami", YachtClass::OneDesign),
        ]
    }

    fn keys(reports: &XmlElement) -> Vec<(String, String)> {
        reports
            .children_named(REPORT_ELEMENT)
            .map(|el| {
                (
                    el.attribute("name").unwrap_or("").to_string(),
                    el.attribute("id").unwrap_or("").to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn bind_produces_two_plus_two_per_class() {
        let mut reports = XmlElement::new("reports");
        let outcome = ReportBinder::new().bind(&mut reports, &classes());

        assert_eq!(outcome.inserted, 6);
        let keys = keys(&reports);
        assert_eq!(keys.len(), 6);
        assert_eq!(keys.iter().collect::<HashSet<_>>().len(), 6);
        assert_eq!(keys[2], (ENTRY_LIST.to_string(), "O1".to_string()));
        assert_eq!(keys[4], (RACE_RESULTS.to_string(), "O1".to_string()));
    }

    #[test]
    fn rebinding_replaces_instead_of_duplicating() {
        let binder = ReportBinder::new();
        let mut reports = XmlElement::new("reports");
        binder.bind(&mut reports, &classes());
        let outcome = binder.bind(&mut reports, &classes());

        assert_eq!(outcome.removed, 6);
        assert_eq!(keys(&reports).len(), 6);
    }

    #[test]
    fn other_classes_and_logos_survive() {
        let binder = ReportBinder::new();
        let mut reports = XmlElement::new("reports")
            .with_child(XmlElement::new("logo").with_attribute("name", "center"));
        binder.bind(&mut reports, &classes());
        binder.bind(&mut reports, &[ClassRecord::new("O2", "ORC2", YachtClass::Orc)]);

        assert_eq!(keys(&reports).len(), 8);
        assert_eq!(reports.children_named("logo").count(), 1);
    }

    #[test]
    fn family_selects_template() {
        let mut reports = XmlElement::new("reports");
        ReportBinder::new().bind(&mut reports, &classes());

        let amami = reports
            .children_named(REPORT_ELEMENT)
            .find(|el| el.attribute("id") == Some("Z") && el.attribute("name") == Some(ENTRY_LIST))
            .unwrap();
        assert_eq!(amami.child_text("Layout"), Some("OneDesign"));
        assert_eq!(amami.attribute("title"), Some("Entry List class Amami"));
    }

    #[test]
    fn unbind_removes_only_that_class() {
        let binder = ReportBinder::new();
        let mut reports = XmlElement::new("reports");
        binder.bind(&mut reports, &classes());

        assert_eq!(binder.unbind_class(&mut reports, "Z"), 2);
        assert_eq!(keys(&reports).len(), 4);
    }
}
