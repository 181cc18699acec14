//! Fleet (boat) rows.

use super::{opt_datetime, opt_float, opt_integer, opt_string, Record};
use crate::error::CodecResult;
use crate::row::Row;
use crate::schema::{FieldDefault, FieldKind, FieldSpec, RecordSchema};
use chrono::NaiveDateTime;

const fn allowance(name: &'static str) -> FieldSpec {
    FieldSpec::child(name, FieldKind::Float)
}

/// Numeric handicap-allowance fields of a boat, in document order.
///
/// These are only populated when a boat comes from a certificate lookup.
pub const HANDICAP_FIELDS: &[&str] = &[
    "GPH",
    "APHD",
    "APHT",
    "CTOD",
    "CTOT",
    "ILCWA",
    "TMF_Inshore",
    "MHRD",
    "MHRT",
    "OSN",
    "TMF_Offshore",
    "TND_Offshore_Low",
    "TN_Offshore_Low",
    "TND_Offshore_Medium",
    "TN_Offshore_Medium",
    "TND_Offshore_High",
    "TN_Offshore_High",
    "TND_Inshore_Low",
    "TN_Inshore_Low",
    "TND_Inshore_Medium",
    "TN_Inshore_Medium",
    "TND_Inshore_High",
    "TN_Inshore_High",
    "Pred_Up_TOD",
    "Pred_Up_TOT",
    "Pred_Down_TOD",
    "Pred_Down_TOT",
    "US_PREDUP_L_TOD",
    "US_PREDUP_L_TOT",
    "US_PREDUP_M_TOD",
    "US_PREDUP_M_TOT",
    "US_PREDUP_H_TOD",
    "US_PREDUP_H_TOT",
    "US_PREDDN_L_TOD",
    "US_PREDDN_L_TOT",
    "US_PREDDN_M_TOD",
    "US_PREDDN_M_TOT",
    "US_PREDDN_H_TOD",
    "US_PREDDN_H_TOT",
    "US_CHIMAC_UP_TOT",
    "US_CHIMAC_AP_TOT",
    "US_CHIMAC_DN_TOT",
    "US_BAYMAC_CV_TOT",
    "US_BAYMAC_SH_TOT",
    "US_HARVMOON_TOD",
    "US_HARVMOON_TOT",
    "US_VICMAUI_TOT",
    "KR_PREDR_TOD",
    "RSA_CD_INS_TOD",
    "RSA_CD_INS_TOT",
    "RSA_CD_OFF_TOD",
    "RSA_CD_OFF_TOT",
    "BRA_ALL_UP_TOT",
    "BRA_ALL_DN_TOT",
    "BRA_7030_TOT",
    "BRA_3070_TOT",
    "US_5B_L_TOD",
    "US_5B_L_TOT",
    "US_5B_LM_TOD",
    "US_5B_LM_TOT",
    "US_5B_M_TOD",
    "US_5B_M_TOT",
    "US_5B_MH_TOD",
    "US_5B_MH_TOT",
    "US_5B_H_TOD",
    "US_5B_H_TOT",
];

/// Schema of a `Fleet/ROW` element.
pub const FLEET_SCHEMA: RecordSchema = RecordSchema {
    kind: "boat",
    element: "ROW",
    fields: &[
        FieldSpec::child("YID", FieldKind::Integer),
        FieldSpec::child("SailNo", FieldKind::Text),
        FieldSpec::child("YachtName", FieldKind::Text),
        FieldSpec::child("BowNo", FieldKind::Text),
        FieldSpec::child("ClassId", FieldKind::Text),
        FieldSpec::child("DivId", FieldKind::Text),
        FieldSpec::child("LOA", FieldKind::Float),
        FieldSpec::child("CDL", FieldKind::Float),
        FieldSpec::child("YClass", FieldKind::Text),
        FieldSpec::child("Owner", FieldKind::Text),
        FieldSpec::child("Skipper", FieldKind::Text),
        FieldSpec::child("Sponsor", FieldKind::Text),
        FieldSpec::child("Club", FieldKind::Text),
        FieldSpec::child("Nation", FieldKind::Text).with_default(FieldDefault::Text("ISR")),
        FieldSpec::child("EMail", FieldKind::Text),
        FieldSpec::child("Phone", FieldKind::Text),
        FieldSpec::child("CertType", FieldKind::Text),
        FieldSpec::child("IssueDate", FieldKind::DateTime),
        FieldSpec::child("NatAuth", FieldKind::Text),
        FieldSpec::child("Points", FieldKind::Text),
        FieldSpec::child("BIN", FieldKind::Text),
        FieldSpec::child("RefNo", FieldKind::Text),
        FieldSpec::child("Family", FieldKind::Text),
        FieldSpec::child("HeatNo", FieldKind::Integer),
        allowance("GPH"),
        allowance("APHD"),
        allowance("APHT"),
        allowance("CTOD"),
        allowance("CTOT").with_default(FieldDefault::Integer(1)),
        allowance("ILCWA"),
        allowance("TMF_Inshore").with_default(FieldDefault::Integer(0)),
        allowance("MHRD"),
        allowance("MHRT"),
        allowance("OSN"),
        allowance("TMF_Offshore"),
        allowance("TND_Offshore_Low"),
        allowance("TN_Offshore_Low"),
        allowance("TND_Offshore_Medium"),
        allowance("TN_Offshore_Medium"),
        allowance("TND_Offshore_High"),
        allowance("TN_Offshore_High"),
        allowance("TND_Inshore_Low"),
        allowance("TN_Inshore_Low"),
        allowance("TND_Inshore_Medium"),
        allowance("TN_Inshore_Medium"),
        allowance("TND_Inshore_High"),
        allowance("TN_Inshore_High"),
        allowance("Pred_Up_TOD"),
        allowance("Pred_Up_TOT"),
        allowance("Pred_Down_TOD"),
        allowance("Pred_Down_TOT"),
        allowance("US_PREDUP_L_TOD"),
        allowance("US_PREDUP_L_TOT"),
        allowance("US_PREDUP_M_TOD"),
        allowance("US_PREDUP_M_TOT"),
        allowance("US_PREDUP_H_TOD"),
        allowance("US_PREDUP_H_TOT"),
        allowance("US_PREDDN_L_TOD"),
        allowance("US_PREDDN_L_TOT"),
        allowance("US_PREDDN_M_TOD"),
        allowance("US_PREDDN_M_TOT"),
        allowance("US_PREDDN_H_TOD"),
        allowance("US_PREDDN_H_TOT"),
        allowance("US_CHIMAC_UP_TOT"),
        allowance("US_CHIMAC_AP_TOT"),
        allowance("US_CHIMAC_DN_TOT"),
        allowance("US_BAYMAC_CV_TOT"),
        allowance("US_BAYMAC_SH_TOT"),
        allowance("US_HARVMOON_TOD"),
        allowance("US_HARVMOON_TOT"),
        allowance("US_VICMAUI_TOT"),
        allowance("KR_PREDR_TOD"),
        allowance("RSA_CD_INS_TOD"),
        allowance("RSA_CD_INS_TOT"),
        allowance("RSA_CD_OFF_TOD"),
        allowance("RSA_CD_OFF_TOT"),
        allowance("BRA_ALL_UP_TOT"),
        allowance("BRA_ALL_DN_TOT"),
        allowance("BRA_7030_TOT"),
        allowance("BRA_3070_TOT"),
        allowance("US_5B_L_TOD"),
        allowance("US_5B_L_TOT"),
        allowance("US_5B_LM_TOD"),
        allowance("US_5B_LM_TOT"),
        allowance("US_5B_M_TOD"),
        allowance("US_5B_M_TOT"),
        allowance("US_5B_MH_TOD"),
        allowance("US_5B_MH_TOT"),
        allowance("US_5B_H_TOD"),
        allowance("US_5B_H_TOT"),
    ],
};

/// A boat row. `yid` is assigned by the store on append.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoatRecord {
    /// Store-assigned key.
    pub yid: Option<i64>,
    /// Sail number.
    pub sail_no: Option<String>,
    /// Yacht name.
    pub yacht_name: Option<String>,
    /// Bow number.
    pub bow_no: Option<String>,
    /// Class the boat races in (not checked against `Cls`).
    pub class_id: Option<String>,
    /// Division.
    pub div_id: Option<String>,
    /// Length overall in metres.
    pub loa: Option<f64>,
    /// Class-division length.
    pub cdl: Option<f64>,
    /// Boat model.
    pub y_class: Option<String>,
    /// Owner name.
    pub owner: Option<String>,
    /// Skipper name.
    pub skipper: Option<String>,
    /// Sponsor.
    pub sponsor: Option<String>,
    /// Club.
    pub club: Option<String>,
    /// Nation code.
    pub nation: Option<String>,
    /// Contact e-mail.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Certificate type.
    pub cert_type: Option<String>,
    /// Certificate issue date.
    pub issue_date: Option<NaiveDateTime>,
    /// National authority.
    pub nat_auth: Option<String>,
    /// Boat identification number from the certificate.
    pub bin: Option<String>,
    /// Certificate reference number.
    pub ref_no: Option<String>,
    /// Certificate family.
    pub family: Option<String>,
    /// Heat number.
    pub heat_no: Option<i64>,
    /// Handicap allowances keyed by a [`HANDICAP_FIELDS`] name.
    pub handicaps: Vec<(String, f64)>,
}

impl BoatRecord {
    /// Creates a boat with name, sail number and class.
    #[must_use]
    pub fn new(
        yacht_name: impl Into<String>,
        sail_no: impl Into<String>,
        class_id: impl Into<String>,
    ) -> Self {
        Self {
            yacht_name: Some(yacht_name.into()),
            sail_no: Some(sail_no.into()),
            class_id: Some(class_id.into()),
            ..Self::default()
        }
    }

    /// Sets an allowance, replacing an existing value.
    pub fn set_handicap(&mut self, name: &str, value: f64) {
        match self.handicaps.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.handicaps.push((name.to_string(), value)),
        }
    }

    /// Returns an allowance by name.
    #[must_use]
    pub fn handicap(&self, name: &str) -> Option<f64> {
        self.handicaps
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

impl Record for BoatRecord {
    const SCHEMA: &'static RecordSchema = &FLEET_SCHEMA;

    fn to_row(&self) -> Row {
        let mut row = Row::new()
            .with_opt("YID", self.yid)
            .with_opt("SailNo", self.sail_no.clone())
            .with_opt("YachtName", self.yacht_name.clone())
            .with_opt("BowNo", self.bow_no.clone())
            .with_opt("ClassId", self.class_id.clone())
            .with_opt("DivId", self.div_id.clone())
            .with_opt("LOA", self.loa)
            .with_opt("CDL", self.cdl)
            .with_opt("YClass", self.y_class.clone())
            .with_opt("Owner", self.owner.clone())
            .with_opt("Skipper", self.skipper.clone())
            .with_opt("Sponsor", self.sponsor.clone())
            .with_opt("Club", self.club.clone())
            .with_opt("Nation", self.nation.clone())
            .with_opt("EMail", self.email.clone())
            .with_opt("Phone", self.phone.clone())
            .with_opt("CertType", self.cert_type.clone())
            .with_opt("IssueDate", self.issue_date)
            .with_opt("NatAuth", self.nat_auth.clone())
            .with_opt("BIN", self.bin.clone())
            .with_opt("RefNo", self.ref_no.clone())
            .with_opt("Family", self.family.clone())
            .with_opt("HeatNo", self.heat_no);
        for (name, value) in &self.handicaps {
            row = row.with(name.clone(), *value);
        }
        row
    }

    fn from_row(row: &Row) -> CodecResult<Self> {
        let mut handicaps = Vec::new();
        for name in HANDICAP_FIELDS {
            if let Some(value) = opt_float(row, name)? {
                handicaps.push(((*name).to_string(), value));
            }
        }
        Ok(Self {
            yid: opt_integer(row, "YID")?,
            sail_no: opt_string(row, "SailNo"),
            yacht_name: opt_string(row, "YachtName"),
            bow_no: opt_string(row, "BowNo"),
            class_id: opt_string(row, "ClassId"),
            div_id: opt_string(row, "DivId"),
            loa: opt_float(row, "LOA")?,
            cdl: opt_float(row, "CDL")?,
            y_class: opt_string(row, "YClass"),
            owner: opt_string(row, "Owner"),
            skipper: opt_string(row, "Skipper"),
            sponsor: opt_string(row, "Sponsor"),
            club: opt_string(row, "Club"),
            nation: opt_string(row, "Nation"),
            email: opt_string(row, "EMail"),
            phone: opt_string(row, "Phone"),
            cert_type: opt_string(row, "CertType"),
            issue_date: opt_datetime(row, "IssueDate")?,
            nat_auth: opt_string(row, "NatAuth"),
            bin: opt_string(row, "BIN"),
            ref_no: opt_string(row, "RefNo"),
            family: opt_string(row, "Family"),
            heat_no: opt_integer(row, "HeatNo")?,
            handicaps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_handicap_field_is_a_float_in_the_schema() {
        for name in HANDICAP_FIELDS {
            let spec = FLEET_SCHEMA.field(name).unwrap();
            assert_eq!(spec.kind, FieldKind::Float, "{name}");
        }
    }

    #[test]
    fn new_boat_gets_nation_and_factor_defaults() {
        let el = BoatRecord::new("Hope", "ISR 1234", "O1").to_element();
        assert_eq!(el.child_text("Nation"), Some("ISR"));
        assert_eq!(el.child_text("CTOT"), Some("1"));
        assert_eq!(el.child_text("TMF_Inshore"), Some("0"));
        assert!(el.child("YID").is_none());
    }

    #[test]
    fn handicaps_follow_schema_order() {
        let mut boat = BoatRecord::new("Hope", "ISR 1", "O1");
        boat.set_handicap("TN_Inshore_Low", 1.2);
        boat.set_handicap("GPH", 612.4);
        let el = boat.to_element();

        let gph = el.children.iter().position(|c| c.name == "GPH").unwrap();
        let tn = el.children.iter().position(|c| c.name == "TN_Inshore_Low").unwrap();
        assert!(gph < tn);
    }

    #[test]
    fn decodes_allowances() {
        let mut boat = BoatRecord::new("Hope", "ISR 1", "O1");
        boat.yid = Some(3);
        boat.set_handicap("APHT", 580.5);
        let back = BoatRecord::from_element(&boat.to_element()).unwrap();

        assert_eq!(back.yid, Some(3));
        assert_eq!(back.handicap("APHT"), Some(580.5));
        assert_eq!(back.handicap("CTOT"), Some(1.0));
    }

    #[test]
    fn set_handicap_replaces() {
        let mut boat = BoatRecord::default();
        boat.set_handicap("OSN", 1.0);
        boat.set_handicap("OSN", 2.0);
        assert_eq!(boat.handicaps.len(), 1);
        assert_eq!(boat.handicap("OSN"), Some(2.0));
    }
}
