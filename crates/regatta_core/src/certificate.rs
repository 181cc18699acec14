//! Mapping of ORC certificate records onto fleet rows.
//!
//! Certificates arrive as JSON objects, one per entry of the `rms` array
//! published by the ORC data service. Only the identity fields and the
//! allowances the scoring document knows about are carried over.

use crate::error::{CoreError, CoreResult};
use regatta_codec::{parse_datetime, BoatRecord, HANDICAP_FIELDS};
use serde_json::{Map, Value};

/// Nested object some certificate exports use for allowances.
const ALLOWANCES_KEY: &str = "Allowances";

/// Builds a boat from one certificate record.
///
/// Allowances are looked up at the top level first and then inside a nested
/// `Allowances` object. Numbers may be JSON numbers or numeric strings.
/// Unknown fields are ignored.
///
/// # Errors
///
/// Returns `Validation` if the record is not an object, has no yacht name,
/// or carries an unreadable issue date.
pub fn boat_from_certificate(record: &Value, class_id: Option<&str>) -> CoreResult<BoatRecord> {
    let cert = record
        .as_object()
        .ok_or_else(|| CoreError::validation("certificate record must be a JSON object"))?;

    let yacht_name = text(cert, "YachtName")
        .ok_or_else(|| CoreError::validation("certificate has no YachtName"))?;

    let mut boat = BoatRecord {
        yacht_name: Some(yacht_name),
        sail_no: text(cert, "SailNo"),
        class_id: class_id.map(str::to_string),
        y_class: text(cert, "Class"),
        owner: text(cert, "Owner"),
        nation: text(cert, "CountryId").or_else(|| text(cert, "NatAuth")),
        nat_auth: text(cert, "NatAuth"),
        cert_type: text(cert, "CertType"),
        bin: text(cert, "BIN"),
        ref_no: text(cert, "RefNo"),
        family: text(cert, "Family"),
        loa: number(cert, "LOA"),
        cdl: number(cert, "CDL"),
        ..BoatRecord::default()
    };

    if let Some(raw) = text(cert, "IssueDate") {
        let issued = parse_datetime("IssueDate", &raw)
            .map_err(|e| CoreError::validation(format!("certificate IssueDate: {e}")))?;
        boat.issue_date = Some(issued);
    }

    let nested = cert.get(ALLOWANCES_KEY).and_then(Value::as_object);
    for name in HANDICAP_FIELDS {
        let value = number(cert, name).or_else(|| nested.and_then(|n| number(n, name)));
        if let Some(value) = value {
            boat.set_handicap(name, value);
        }
    }

    Ok(boat)
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_identity_and_allowances() {
        let cert = json!({
            "YachtName": "Hope",
            "SailNo": "ISR 1234",
            "CountryId": "ISR",
            "Family": 1,
            "IssueDate": "2024-02-01T00:00:00.000Z",
            "LOA": 10.3,
            "GPH": "612.4",
            "TMF_Inshore": 1.0123,
            "Allowances": { "TN_Inshore_Low": 0.8912, "WindSpeeds": [6, 8, 10] },
            "Designer": "Someone"
        });
        let boat = boat_from_certificate(&cert, Some("O1")).unwrap();

        assert_eq!(boat.yacht_name.as_deref(), Some("Hope"));
        assert_eq!(boat.class_id.as_deref(), Some("O1"));
        assert_eq!(boat.family.as_deref(), Some("1"));
        assert_eq!(boat.handicap("GPH"), Some(612.4));
        assert_eq!(boat.handicap("TMF_Inshore"), Some(1.0123));
        assert_eq!(boat.handicap("TN_Inshore_Low"), Some(0.8912));
        assert!(boat.issue_date.is_some());
        assert!(boat.yid.is_none());
    }

    #[test]
    fn top_level_allowance_wins() {
        let cert = json!({
            "YachtName": "Hope",
            "OSN": 600.0,
            "Allowances": { "OSN": 700.0 }
        });
        let boat = boat_from_certificate(&cert, None).unwrap();
        assert_eq!(boat.handicap("OSN"), Some(600.0));
    }

    #[test]
    fn nation_falls_back_to_national_authority() {
        let cert = json!({ "YachtName": "Hope", "NatAuth": "GRE" });
        let boat = boat_from_certificate(&cert, None).unwrap();
        assert_eq!(boat.nation.as_deref(), Some("GRE"));
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = boat_from_certificate(&json!({ "SailNo": "X" }), None).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);

        let err = boat_from_certificate(&json!([1, 2]), None).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
    }
}
