//! The document editor.
//!
//! Every operation is a full read-modify-write cycle: the input file is
//! parsed, transformed in memory, re-indented and written to the output
//! path, which may be the input path itself. Nothing is cached between
//! calls, so accessors always see the file as it is on disk.
//!
//! ## Identifiers
//!
//! `RaceId` and `YID` are assigned by the editor as `max(existing) + 1`,
//! sequentially in input order. Identifiers present on the records passed
//! in are ignored. See [`IdBase`](crate::config::IdBase) for the starting
//! value of an empty section.

use crate::certificate::boat_from_certificate;
use crate::config::{StoreConfig, DEFAULT_TEMPLATE};
use crate::document::{ScoringDocument, Section};
use crate::error::{CoreError, CoreResult};
use crate::reports::{BindOutcome, ReportBinder};
use regatta_codec::{
    apply_patch, encode, BoatRecord, ClassRecord, EventRecord, LogoRecord, RaceRecord, Record,
    ReportDirective, Row,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const LOGO_ELEMENT: &str = "logo";
const REPORT_ELEMENT: &str = "report";

/// Row counts per section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentSummary {
    /// Title of the event row, if set.
    pub event_title: Option<String>,
    /// Number of classes.
    pub classes: usize,
    /// Number of races.
    pub races: usize,
    /// Number of boats.
    pub boats: usize,
    /// Number of report directives.
    pub reports: usize,
    /// Number of logo entries.
    pub logos: usize,
}

/// Initial content for [`DocumentEditor::create_from_template`].
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    /// The event row.
    pub event: EventRecord,
    /// Classes to add; reports are bound for them.
    pub classes: Vec<ClassRecord>,
    /// Races to add.
    pub races: Vec<RaceRecord>,
    /// Boats to add.
    pub boats: Vec<BoatRecord>,
}

impl NewDocument {
    /// Starts a document with only an event.
    #[must_use]
    pub fn new(event: EventRecord) -> Self {
        Self {
            event,
            ..Self::default()
        }
    }

    /// Builder: sets the classes.
    #[must_use]
    pub fn classes(mut self, classes: Vec<ClassRecord>) -> Self {
        self.classes = classes;
        self
    }

    /// Builder: sets the races.
    #[must_use]
    pub fn races(mut self, races: Vec<RaceRecord>) -> Self {
        self.races = races;
        self
    }

    /// Builder: sets the boats.
    #[must_use]
    pub fn boats(mut self, boats: Vec<BoatRecord>) -> Self {
        self.boats = boats;
        self
    }
}

/// Reads and edits scoring documents on disk.
#[derive(Debug, Clone, Default)]
pub struct DocumentEditor {
    config: StoreConfig,
    binder: ReportBinder,
}

impl DocumentEditor {
    /// Creates an editor with the given configuration.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            binder: ReportBinder::new(),
        }
    }

    /// Creates an editor with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(StoreConfig::default())
    }

    /// The editor configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends rows to a section as new records, filling schema defaults.
    ///
    /// No identifiers are assigned.
    ///
    /// # Errors
    ///
    /// Returns `SectionNotFound` if the document lacks the section.
    pub fn append(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        section: Section,
        rows: &[Row],
    ) -> CoreResult<usize> {
        self.modify(input, output, |doc| {
            let schema = section.schema();
            let target = doc.section_mut(section)?;
            for row in rows {
                let mut row = row.clone();
                row.apply_defaults(schema);
                target.push(encode(schema, &row));
            }
            info!(section = %section, count = rows.len(), "appended rows");
            Ok(rows.len())
        })
    }

    /// Appends classes and binds their report directives.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a class with an empty id, and `Conflict` for
    /// a duplicate id when duplicate checking is enabled.
    pub fn append_classes(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        classes: &[ClassRecord],
    ) -> CoreResult<BindOutcome> {
        self.modify(input, output, |doc| self.add_classes(doc, classes))
    }

    /// Appends races, assigning sequential `RaceId`s.
    ///
    /// Returns the assigned ids in input order.
    pub fn append_races(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        races: &[RaceRecord],
    ) -> CoreResult<Vec<i64>> {
        self.modify(input, output, |doc| self.add_races(doc, races))
    }

    /// Appends boats, assigning sequential `YID`s.
    ///
    /// Returns the assigned ids in input order.
    pub fn append_fleet(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        boats: &[BoatRecord],
    ) -> CoreResult<Vec<i64>> {
        self.modify(input, output, |doc| self.add_boats(doc, boats))
    }

    /// Maps a certificate record to a boat and appends it.
    ///
    /// Returns the assigned `YID`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the record cannot be mapped.
    pub fn add_fleet_from_external_record(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        record: &serde_json::Value,
        class_id: Option<&str>,
    ) -> CoreResult<i64> {
        let boat = boat_from_certificate(record, class_id)?;
        let ids = self.append_fleet(input, output, std::slice::from_ref(&boat))?;
        ids.first()
            .copied()
            .ok_or_else(|| CoreError::malformed("no YID assigned"))
    }

    /// Overlays the set fields of `updated` onto the boat with the same YID.
    ///
    /// Fields `updated` leaves unset are not touched.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `updated` has no YID and `RowNotFound` if no
    /// boat carries it.
    pub fn update_fleet_by_key(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        updated: &BoatRecord,
    ) -> CoreResult<()> {
        let yid = updated
            .yid
            .ok_or_else(|| CoreError::validation("boat update requires a YID"))?;
        let mut patch = updated.to_row();
        patch.remove("YID");
        self.update_by_key(input, output, Section::Fleet, "YID", &yid.to_string(), &patch)
    }

    /// Overlays `patch` onto the first row whose `key_field` equals
    /// `key_value`.
    pub fn update_by_key(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        section: Section,
        key_field: &str,
        key_value: &str,
        patch: &Row,
    ) -> CoreResult<()> {
        self.modify(input, output, |doc| {
            let row = doc.find_by_key_mut(section, key_field, key_value)?;
            apply_patch(section.schema(), row, patch);
            info!(section = %section, key = key_value, fields = patch.len(), "updated row");
            Ok(())
        })
    }

    /// Removes the first row whose `key_field` equals `key_value`.
    ///
    /// # Errors
    ///
    /// Returns `RowNotFound` if no row matches.
    pub fn delete_by_key(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        section: Section,
        key_field: &str,
        key_value: &str,
    ) -> CoreResult<()> {
        self.modify(input, output, |doc| {
            doc.remove_by_key(section, key_field, key_value)?;
            info!(section = %section, key = key_value, "deleted row");
            Ok(())
        })
    }

    /// Removes a class and its per-class report directives.
    pub fn delete_class(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        class_id: &str,
    ) -> CoreResult<()> {
        self.modify(input, output, |doc| {
            doc.remove_by_key(Section::Cls, "ClassId", class_id)?;
            let unbound = match doc.section_mut(Section::Reports) {
                Ok(reports) => self.binder.unbind_class(reports, class_id),
                Err(_) => 0,
            };
            info!(class_id, unbound, "deleted class");
            Ok(())
        })
    }

    /// Removes a race by id.
    pub fn delete_race(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        race_id: i64,
    ) -> CoreResult<()> {
        self.delete_by_key(input, output, Section::Race, "RaceId", &race_id.to_string())
    }

    /// Removes a boat by YID.
    pub fn delete_boat(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        yid: i64,
    ) -> CoreResult<()> {
        self.delete_by_key(input, output, Section::Fleet, "YID", &yid.to_string())
    }

    /// Replaces every event row with `event`.
    pub fn replace_event_singleton(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        event: &EventRecord,
    ) -> CoreResult<()> {
        self.modify(input, output, |doc| set_event(doc, event))
    }

    /// Replaces every logo entry in `reports` with `logos`.
    pub fn replace_logos(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        logos: &[LogoRecord],
    ) -> CoreResult<()> {
        self.modify(input, output, |doc| set_logos(doc, logos))
    }

    /// Creates a new document at `output` from the configured template.
    ///
    /// The event row is replaced, classes are appended with their reports
    /// bound, the configured logos are written, and races and boats are
    /// appended with fresh ids. Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` if a configured template file is missing.
    pub fn create_from_template(
        &self,
        output: impl AsRef<Path>,
        content: &NewDocument,
    ) -> CoreResult<PathBuf> {
        let output = output.as_ref();
        let mut doc = self.load_template()?;

        set_event(&mut doc, &content.event)?;
        if !content.classes.is_empty() {
            self.add_classes(&mut doc, &content.classes)?;
        }
        set_logos(&mut doc, &self.config.logos)?;
        if !content.races.is_empty() {
            self.add_races(&mut doc, &content.races)?;
        }
        if !content.boats.is_empty() {
            self.add_boats(&mut doc, &content.boats)?;
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        doc.save(output)?;
        info!(path = %output.display(), "created document from template");
        Ok(output.to_path_buf())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Reads the event row.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the document has no event row.
    pub fn event(&self, path: impl AsRef<Path>) -> CoreResult<EventRecord> {
        let doc = ScoringDocument::load(path.as_ref())?;
        let rows = doc.row_elements(Section::Event)?;
        let row = rows
            .first()
            .ok_or_else(|| CoreError::malformed("document has no Event/ROW"))?;
        Ok(EventRecord::from_element(row)?)
    }

    /// Reads all classes.
    pub fn classes(&self, path: impl AsRef<Path>) -> CoreResult<Vec<ClassRecord>> {
        read_records(path.as_ref(), Section::Cls)
    }

    /// Reads all races.
    pub fn races(&self, path: impl AsRef<Path>) -> CoreResult<Vec<RaceRecord>> {
        read_records(path.as_ref(), Section::Race)
    }

    /// Reads all boats.
    pub fn fleet(&self, path: impl AsRef<Path>) -> CoreResult<Vec<BoatRecord>> {
        read_records(path.as_ref(), Section::Fleet)
    }

    /// Reads the logo entries.
    pub fn logos(&self, path: impl AsRef<Path>) -> CoreResult<Vec<LogoRecord>> {
        let doc = ScoringDocument::load(path.as_ref())?;
        doc.section(Section::Reports)?
            .children_named(LOGO_ELEMENT)
            .map(|el| LogoRecord::from_element(el).map_err(CoreError::from))
            .collect()
    }

    /// Reads the report directives.
    pub fn reports(&self, path: impl AsRef<Path>) -> CoreResult<Vec<ReportDirective>> {
        let doc = ScoringDocument::load(path.as_ref())?;
        doc.section(Section::Reports)?
            .children_named(REPORT_ELEMENT)
            .map(|el| ReportDirective::from_element(el).map_err(CoreError::from))
            .collect()
    }

    /// Reads a section's rows as raw text.
    pub fn rows(&self, path: impl AsRef<Path>, section: Section) -> CoreResult<Vec<Row>> {
        ScoringDocument::load(path.as_ref())?.rows(section)
    }

    /// Counts rows per section.
    pub fn summary(&self, path: impl AsRef<Path>) -> CoreResult<DocumentSummary> {
        let doc = ScoringDocument::load(path.as_ref())?;
        let reports = doc.section(Section::Reports)?;
        let event_title = doc
            .row_elements(Section::Event)?
            .first()
            .and_then(|row| row.child_text("EventTitle"))
            .map(str::to_string);

        Ok(DocumentSummary {
            event_title,
            classes: doc.row_elements(Section::Cls)?.len(),
            races: doc.row_elements(Section::Race)?.len(),
            boats: doc.row_elements(Section::Fleet)?.len(),
            reports: reports.children_named(REPORT_ELEMENT).count(),
            logos: reports.children_named(LOGO_ELEMENT).count(),
        })
    }

    // =========================================================================
    // In-memory steps
    // =========================================================================

    fn modify<T>(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        op: impl FnOnce(&mut ScoringDocument) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut doc = ScoringDocument::load(input.as_ref())?;
        let result = op(&mut doc)?;
        doc.save(output.as_ref())?;
        Ok(result)
    }

    fn load_template(&self) -> CoreResult<ScoringDocument> {
        match &self.config.template_path {
            Some(path) => ScoringDocument::load(path).map_err(|e| match e {
                CoreError::DocumentNotFound { path } => CoreError::TemplateNotFound { path },
                other => other,
            }),
            None => ScoringDocument::parse(DEFAULT_TEMPLATE),
        }
    }

    fn add_classes(
        &self,
        doc: &mut ScoringDocument,
        classes: &[ClassRecord],
    ) -> CoreResult<BindOutcome> {
        let mut seen = existing_class_ids(doc)?;
        for class in classes {
            if class.class_id.trim().is_empty() {
                return Err(CoreError::validation("class requires a ClassId"));
            }
            if !seen.insert(class.class_id.clone()) && self.config.reject_duplicate_class_ids {
                return Err(CoreError::conflict(format!(
                    "ClassId {} already exists",
                    class.class_id
                )));
            }
        }

        for class in classes {
            doc.push(Section::Cls, class.to_element())?;
        }
        let outcome = self.binder.bind(doc.section_mut(Section::Reports)?, classes);
        info!(
            count = classes.len(),
            reports = outcome.inserted,
            "appended classes"
        );
        Ok(outcome)
    }

    fn add_races(&self, doc: &mut ScoringDocument, races: &[RaceRecord]) -> CoreResult<Vec<i64>> {
        self.check_class_refs(doc, races.iter().map(|r| r.class_id.as_deref()))?;

        let ids = self.next_ids(doc, Section::Race, races.len())?;
        for (race, &id) in races.iter().zip(&ids) {
            let mut race = race.clone();
            race.race_id = Some(id);
            doc.push(Section::Race, race.to_element())?;
        }
        info!(count = ids.len(), first = ?ids.first(), "appended races");
        Ok(ids)
    }

    fn add_boats(&self, doc: &mut ScoringDocument, boats: &[BoatRecord]) -> CoreResult<Vec<i64>> {
        self.check_class_refs(doc, boats.iter().map(|b| b.class_id.as_deref()))?;

        let ids = self.next_ids(doc, Section::Fleet, boats.len())?;
        for (boat, &id) in boats.iter().zip(&ids) {
            let mut boat = boat.clone();
            boat.yid = Some(id);
            doc.push(Section::Fleet, boat.to_element())?;
        }
        info!(count = ids.len(), first = ?ids.first(), "appended boats");
        Ok(ids)
    }

    /// Ids for `count` new rows of `section`, continuing from the current
    /// maximum.
    fn next_ids(&self, doc: &ScoringDocument, section: Section, count: usize) -> CoreResult<Vec<i64>> {
        let key = section
            .key_field()
            .ok_or_else(|| CoreError::validation(format!("{section} rows carry no id")))?;
        let mut next = match doc.max_key(section, key)? {
            Some(max) => max.checked_add(1),
            None => Some(self.config.id_base.first_id(section)),
        };

        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = next.ok_or_else(|| CoreError::malformed(format!("{section} {key} overflows")))?;
            ids.push(id);
            next = id.checked_add(1);
        }
        Ok(ids)
    }

    fn check_class_refs<'a>(
        &self,
        doc: &ScoringDocument,
        refs: impl Iterator<Item = Option<&'a str>>,
    ) -> CoreResult<()> {
        if !self.config.check_class_refs {
            return Ok(());
        }
        let known = existing_class_ids(doc)?;
        for class_id in refs.flatten() {
            if !known.contains(class_id) {
                return Err(CoreError::validation(format!("unknown ClassId {class_id}")));
            }
        }
        Ok(())
    }
}

fn set_event(doc: &mut ScoringDocument, event: &EventRecord) -> CoreResult<()> {
    let section = doc.section_mut(Section::Event)?;
    let removed = section.children.len();
    section.children.clear();
    section.text = None;
    section.push(event.to_element());
    info!(removed, "replaced event row");
    Ok(())
}

fn set_logos(doc: &mut ScoringDocument, logos: &[LogoRecord]) -> CoreResult<()> {
    let reports = doc.section_mut(Section::Reports)?;
    let removed = reports.remove_children(|el| el.name == LOGO_ELEMENT);
    for logo in logos {
        reports.push(logo.to_element());
    }
    info!(removed, written = logos.len(), "replaced logos");
    Ok(())
}

fn existing_class_ids(doc: &ScoringDocument) -> CoreResult<HashSet<String>> {
    Ok(doc
        .row_elements(Section::Cls)?
        .into_iter()
        .filter_map(|row| row.child_text("ClassId"))
        .map(str::to_string)
        .collect())
}

fn read_records<R: Record>(path: &Path, section: Section) -> CoreResult<Vec<R>> {
    let doc = ScoringDocument::load(path)?;
    doc.row_elements(section)?
        .into_iter()
        .map(|el| R::from_element(el).map_err(CoreError::from))
        .collect()
}
