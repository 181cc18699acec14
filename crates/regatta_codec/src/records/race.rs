//! Race rows and scoring codes.

use super::{opt_bool, opt_datetime, opt_integer, opt_string, Record};
use crate::error::CodecResult;
use crate::row::Row;
use crate::schema::{FieldDefault, FieldKind, FieldSpec, RecordSchema};
use chrono::NaiveDateTime;
use std::fmt;

/// Scoring codes understood by the scoring program.
pub const SCORING_CODES: &[&str] = &[
    "TN_Inshore_Low",
    "TN_Inshore_Medium",
    "TN_Inshore_High",
    "CTOT",
    "TMF_Offshore",
    "TMF_Inshore",
];

/// Schema of a `Race/ROW` element.
pub const RACE_SCHEMA: RecordSchema = RecordSchema {
    kind: "race",
    element: "ROW",
    fields: &[
        FieldSpec::child("RaceId", FieldKind::Integer),
        FieldSpec::child("RaceName", FieldKind::Text),
        FieldSpec::child("StartTime", FieldKind::DateTime),
        FieldSpec::child("ClassId", FieldKind::Text),
        FieldSpec::child("Distance", FieldKind::Text),
        FieldSpec::child("CourseId", FieldKind::Integer),
        FieldSpec::child("Provisional", FieldKind::Bool).with_default(FieldDefault::Bool(false)),
        FieldSpec::child("CountryId", FieldKind::Text),
        FieldSpec::child("ScoringType", FieldKind::Enum(SCORING_CODES))
            .with_default(FieldDefault::Text("TMF_Offshore")),
        FieldSpec::child("Discardable", FieldKind::Bool).with_default(FieldDefault::Bool(false)),
        FieldSpec::child("Coeff", FieldKind::Integer).with_default(FieldDefault::Integer(1)),
        FieldSpec::child("CountryId2", FieldKind::Text),
        FieldSpec::child("ScoringType2", FieldKind::Integer),
        FieldSpec::child("RaceNo", FieldKind::Integer),
        FieldSpec::child("HeatNo", FieldKind::Integer),
        FieldSpec::child("DayNo", FieldKind::Integer),
        FieldSpec::child("HeatStat", FieldKind::Integer),
        FieldSpec::child("BoatIWUsed", FieldKind::Bool).with_default(FieldDefault::Bool(false)),
        FieldSpec::child("FinishOffset", FieldKind::Text),
    ],
};

/// How corrected times are computed for a race.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScoringCode {
    /// Time-on-time, triple number, windward/leeward, light wind.
    TripleNumberLow,
    /// Time-on-time, triple number, windward/leeward, medium wind.
    TripleNumberMedium,
    /// Time-on-time, triple number, windward/leeward, heavy wind.
    TripleNumberHigh,
    /// Time-on-time with a custom factor.
    CustomTot,
    /// Time-on-time, coastal/long distance.
    CoastalLongDistance,
    /// Time-on-time, windward/leeward.
    WindwardLeeward,
    /// A code this crate does not know; kept verbatim.
    Other(String),
}

impl ScoringCode {
    /// Parses a document code or the descriptive name used by callers.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "TN_Inshore_Low" | "TOT_Triple_Number_Windward_Leeward_Low" => Self::TripleNumberLow,
            "TN_Inshore_Medium" | "TOT_Triple_Number_Windward_Leeward_Medium" => {
                Self::TripleNumberMedium
            }
            "TN_Inshore_High" | "TOT_Triple_Number_Windward_Leeward_High" => Self::TripleNumberHigh,
            "CTOT" | "TOT_Custom" => Self::CustomTot,
            "TMF_Offshore" | "TOT_Coastal_Long_distance" => Self::CoastalLongDistance,
            "TMF_Inshore" | "TOT_Windward_Leeward" => Self::WindwardLeeward,
            other => Self::Other(other.to_string()),
        }
    }

    /// The code written into the document.
    #[must_use]
    pub fn as_code(&self) -> &str {
        match self {
            Self::TripleNumberLow => "TN_Inshore_Low",
            Self::TripleNumberMedium => "TN_Inshore_Medium",
            Self::TripleNumberHigh => "TN_Inshore_High",
            Self::CustomTot => "CTOT",
            Self::CoastalLongDistance => "TMF_Offshore",
            Self::WindwardLeeward => "TMF_Inshore",
            Self::Other(code) => code,
        }
    }

    /// Returns true for codes listed in [`SCORING_CODES`].
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for ScoringCode {
    fn default() -> Self {
        Self::CoastalLongDistance
    }
}

impl fmt::Display for ScoringCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A race row. `race_id` is assigned by the store on append.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RaceRecord {
    /// Store-assigned key.
    pub race_id: Option<i64>,
    /// Display name.
    pub race_name: Option<String>,
    /// Start time.
    pub start_time: Option<NaiveDateTime>,
    /// Class the race belongs to (not checked against `Cls`).
    pub class_id: Option<String>,
    /// Course distance.
    pub distance: Option<String>,
    /// Course identifier.
    pub course_id: Option<i64>,
    /// Whether results are provisional.
    pub provisional: Option<bool>,
    /// Country of the rating set.
    pub country_id: Option<String>,
    /// Scoring code.
    pub scoring_type: Option<ScoringCode>,
    /// Whether the race may be discarded.
    pub discardable: Option<bool>,
    /// Points coefficient.
    pub coeff: Option<i64>,
    /// Country of the secondary rating set.
    pub country_id2: Option<String>,
    /// Secondary scoring type.
    pub scoring_type2: Option<i64>,
    /// Race number.
    pub race_no: Option<i64>,
    /// Heat number.
    pub heat_no: Option<i64>,
    /// Day number.
    pub day_no: Option<i64>,
    /// Heat status.
    pub heat_stat: Option<i64>,
    /// Whether the inshore/windward rating was used.
    pub boat_iw_used: Option<bool>,
    /// Finish offset.
    pub finish_offset: Option<String>,
}

impl RaceRecord {
    /// Creates a race with the fields callers normally supply.
    #[must_use]
    pub fn new(
        race_name: impl Into<String>,
        start_time: NaiveDateTime,
        class_id: impl Into<String>,
        scoring_type: ScoringCode,
    ) -> Self {
        Self {
            race_name: Some(race_name.into()),
            start_time: Some(start_time),
            class_id: Some(class_id.into()),
            scoring_type: Some(scoring_type),
            ..Self::default()
        }
    }
}

impl Record for RaceRecord {
    const SCHEMA: &'static RecordSchema = &RACE_SCHEMA;

    fn to_row(&self) -> Row {
        Row::new()
            .with_opt("RaceId", self.race_id)
            .with_opt("RaceName", self.race_name.clone())
            .with_opt("StartTime", self.start_time)
            .with_opt("ClassId", self.class_id.clone())
            .with_opt("Distance", self.distance.clone())
            .with_opt("CourseId", self.course_id)
            .with_opt("Provisional", self.provisional)
            .with_opt("CountryId", self.country_id.clone())
            .with_opt(
                "ScoringType",
                self.scoring_type.as_ref().map(|c| c.as_code().to_string()),
            )
            .with_opt("Discardable", self.discardable)
            .with_opt("Coeff", self.coeff)
            .with_opt("CountryId2", self.country_id2.clone())
            .with_opt("ScoringType2", self.scoring_type2)
            .with_opt("RaceNo", self.race_no)
            .with_opt("HeatNo", self.heat_no)
            .with_opt("DayNo", self.day_no)
            .with_opt("HeatStat", self.heat_stat)
            .with_opt("BoatIWUsed", self.boat_iw_used)
            .with_opt("FinishOffset", self.finish_offset.clone())
    }

    fn from_row(row: &Row) -> CodecResult<Self> {
        Ok(Self {
            race_id: opt_integer(row, "RaceId")?,
            race_name: opt_string(row, "RaceName"),
            start_time: opt_datetime(row, "StartTime")?,
            class_id: opt_string(row, "ClassId"),
            distance: opt_string(row, "Distance"),
            course_id: opt_integer(row, "CourseId")?,
            provisional: opt_bool(row, "Provisional")?,
            country_id: opt_string(row, "CountryId"),
            scoring_type: opt_string(row, "ScoringType").map(|s| ScoringCode::parse(&s)),
            discardable: opt_bool(row, "Discardable")?,
            coeff: opt_integer(row, "Coeff")?,
            country_id2: opt_string(row, "CountryId2"),
            scoring_type2: opt_integer(row, "ScoringType2")?,
            race_no: opt_integer(row, "RaceNo")?,
            heat_no: opt_integer(row, "HeatNo")?,
            day_no: opt_integer(row, "DayNo")?,
            heat_stat: opt_integer(row, "HeatStat")?,
            boat_iw_used: opt_bool(row, "BoatIWUsed")?,
            finish_offset: opt_string(row, "FinishOffset"),
        })
    }
}
