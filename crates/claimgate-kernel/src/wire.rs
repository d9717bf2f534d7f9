//! Wire boundary: the only path from untyped JSON values into the model.
//!
//! One parser per field kind. Each consumes a `serde_json::Value` and either
//! returns a typed value or fails with a [`WireError`] that names the field,
//! renders the offending value, and carries a stable category code.
//!
//! Entity parsers (`parse_claim`, `parse_step`, `parse_evidence_object`,
//! `parse_report`) compose the field parsers and then hand the typed fields
//! to the entity smart constructors, which re-check local invariants.
//! Parsing stops at the first failure; exhaustive reporting happens later,
//! in the structural validator.

use crate::claim::{Claim, ClaimFields, ClaimLabel, ClaimSpan};
use crate::error::{WireError, duplicate_values, render};
use crate::evidence::{
    EvidenceFields, EvidenceObject, EvidenceSource, EvidenceStatus, EvidenceType,
    IndeterminateReason, PayloadKind, PayloadRef, SourceKind,
};
use crate::report::ScientificReport;
use crate::step::{DerivationStep, StepFields, StepStatus};
use crate::token::{Token, TokenClass, classify_token, json_type_name};
use serde_json::{Map, Value};

/// A closed enumeration with exactly one canonical spelling per variant.
pub trait WireEnum: Sized + Copy + 'static {
    /// Field name used in error messages.
    const FIELD: &'static str;
    /// Category reported when a well-formed token is not a member.
    const CATEGORY: &'static str;

    fn variants() -> &'static [Self];
    fn spelling(self) -> &'static str;
}

/// Declare a closed wire enumeration: the enum, its canonical spellings,
/// `WireEnum`, `Display`, and string serialization.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($field:literal, $category:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $spelling:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $spelling, )+
                }
            }
        }

        impl $crate::wire::WireEnum for $name {
            const FIELD: &'static str = $field;
            const CATEGORY: &'static str = $category;

            fn variants() -> &'static [Self] {
                Self::ALL
            }

            fn spelling(self) -> &'static str {
                self.as_str()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}
pub(crate) use wire_enum;

fn spellings<T: WireEnum>() -> String {
    T::variants()
        .iter()
        .map(|v| v.spelling())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Exact, case-sensitive membership in a closed set.
pub fn parse_enum<T: WireEnum>(wire: &Value) -> Result<T, WireError> {
    let s = classify_token(wire, TokenClass::Enumerant)
        .map_err(|fault| WireError::token(T::FIELD, wire, fault))?;
    if let Some(variant) = T::variants().iter().copied().find(|v| v.spelling() == s) {
        return Ok(variant);
    }
    let hint = T::variants()
        .iter()
        .map(|v| v.spelling())
        .find(|spelling| spelling.eq_ignore_ascii_case(s));
    Err(WireError::NotAMember {
        field: T::FIELD,
        category: T::CATEGORY,
        found: render(wire),
        expected: spellings::<T>(),
        hint,
    })
}

pub fn parse_claim_label(wire: &Value) -> Result<ClaimLabel, WireError> {
    parse_enum(wire)
}

pub fn parse_step_status(wire: &Value) -> Result<StepStatus, WireError> {
    parse_enum(wire)
}

pub fn parse_evidence_type(wire: &Value) -> Result<EvidenceType, WireError> {
    parse_enum(wire)
}

pub fn parse_evidence_status(wire: &Value) -> Result<EvidenceStatus, WireError> {
    parse_enum(wire)
}

pub fn parse_indeterminate_reason(wire: &Value) -> Result<IndeterminateReason, WireError> {
    parse_enum(wire)
}

fn parse_identifier(field: &'static str, wire: &Value) -> Result<Token, WireError> {
    Token::from_wire(wire).map_err(|fault| WireError::token(field, wire, fault))
}

pub fn parse_evidence_id(wire: &Value) -> Result<Token, WireError> {
    parse_identifier("evidence_id", wire)
}

pub fn parse_claim_id(wire: &Value) -> Result<Token, WireError> {
    parse_identifier("claim_id", wire)
}

pub fn parse_step_id(wire: &Value) -> Result<Token, WireError> {
    parse_identifier("step_id", wire)
}

pub fn parse_report_id(wire: &Value) -> Result<Token, WireError> {
    parse_identifier("report_id", wire)
}

/// A list of identifiers: container type first, then each element, then
/// duplicates (all of them, not just the first).
fn parse_id_list(
    field: &'static str,
    wire: &Value,
    element: fn(&Value) -> Result<Token, WireError>,
) -> Result<Vec<Token>, WireError> {
    let Value::Array(items) = wire else {
        return Err(WireError::WrongType {
            field,
            expected: "list",
            found: json_type_name(wire),
        });
    };
    let mut ids = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let id = element(item).map_err(|e| WireError::at(format!("{field}[{idx}]"), e))?;
        ids.push(id);
    }
    let duplicates = duplicate_values(ids.iter().map(Token::as_str));
    if !duplicates.is_empty() {
        return Err(WireError::DuplicateEntries { field, duplicates });
    }
    Ok(ids)
}

pub fn parse_evidence_ids(wire: &Value) -> Result<Vec<Token>, WireError> {
    parse_id_list("evidence_ids", wire, parse_evidence_id)
}

pub fn parse_claim_ids(wire: &Value) -> Result<Vec<Token>, WireError> {
    parse_id_list("claim_ids", wire, parse_claim_id)
}

pub fn parse_depends_on(wire: &Value) -> Result<Vec<Token>, WireError> {
    parse_id_list("depends_on", wire, parse_step_id)
}

/// `[start, end]`, two non-negative integers. Offsets are not checked
/// against the statement.
pub fn parse_claim_span(wire: &Value) -> Result<ClaimSpan, WireError> {
    let invalid = || WireError::InvalidClaimSpan {
        found: render(wire),
    };
    let Value::Array(items) = wire else {
        return Err(invalid());
    };
    let [start, end] = items.as_slice() else {
        return Err(invalid());
    };
    let offset = |v: &Value| v.as_u64().and_then(|n| usize::try_from(n).ok());
    match (offset(start), offset(end)) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(invalid()),
    }
}

/// Free text: must be a string. Blankness is a model invariant.
fn parse_text(field: &'static str, wire: &Value) -> Result<String, WireError> {
    match wire {
        Value::String(s) => Ok(s.clone()),
        other => Err(WireError::WrongType {
            field,
            expected: "string",
            found: json_type_name(other),
        }),
    }
}

fn parse_tagged<K: WireEnum>(
    field: &'static str,
    value_category: &'static str,
    wire: &Value,
) -> Result<(K, Token), WireError> {
    let object = WireObject::new(field, wire, &["kind", "value"], &[])?;
    let kind_wire = object.required("kind")?;
    let value_wire = object.required("value")?;

    let kind = parse_enum::<K>(kind_wire).map_err(|_| WireError::UnknownKind {
        field,
        category: K::CATEGORY,
        found: render(kind_wire),
        expected: spellings::<K>(),
    })?;
    let value = Token::from_wire(value_wire).map_err(|fault| WireError::MalformedValue {
        field,
        category: value_category,
        found: render(value_wire),
        fault,
    })?;
    Ok((kind, value))
}

pub fn parse_evidence_source(wire: &Value) -> Result<EvidenceSource, WireError> {
    let (kind, value) = parse_tagged::<SourceKind>("source", "invalid-source-value", wire)?;
    Ok(EvidenceSource::new(kind, value))
}

pub fn parse_payload_ref(wire: &Value) -> Result<PayloadRef, WireError> {
    let (kind, value) = parse_tagged::<PayloadKind>("payload_ref", "invalid-payload-value", wire)?;
    Ok(PayloadRef::new(kind, value))
}

/// A JSON object checked for type, required keys, and unknown keys.
struct WireObject<'a> {
    field: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> WireObject<'a> {
    fn new(
        field: &'static str,
        wire: &'a Value,
        required: &[&'static str],
        optional: &[&'static str],
    ) -> Result<Self, WireError> {
        let Value::Object(map) = wire else {
            return Err(WireError::WrongType {
                field,
                expected: "object",
                found: json_type_name(wire),
            });
        };
        if let Some(&key) = required.iter().find(|key| !map.contains_key(**key)) {
            return Err(WireError::MissingField { field, key });
        }
        if let Some(key) = map
            .keys()
            .find(|key| !required.contains(&key.as_str()) && !optional.contains(&key.as_str()))
        {
            return Err(WireError::UnknownField {
                field,
                key: key.clone(),
            });
        }
        Ok(Self { field, map })
    }

    fn required(&self, key: &'static str) -> Result<&'a Value, WireError> {
        self.map.get(key).ok_or(WireError::MissingField {
            field: self.field,
            key,
        })
    }

    /// Absent and explicit `null` both mean "not present".
    fn optional(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Parse a required field. Failures are located at `key`.
    fn field<T>(
        &self,
        key: &'static str,
        parse: impl FnOnce(&Value) -> Result<T, WireError>,
    ) -> Result<T, WireError> {
        parse(self.required(key)?).map_err(|e| within(key, e))
    }

    fn optional_field<T>(
        &self,
        key: &'static str,
        parse: impl FnOnce(&Value) -> Result<T, WireError>,
    ) -> Result<Option<T>, WireError> {
        self.optional(key)
            .map(|v| parse(v).map_err(|e| within(key, e)))
            .transpose()
    }

    fn text(&self, key: &'static str) -> Result<String, WireError> {
        self.field(key, |v| parse_text(key, v))
    }

    fn optional_text(&self, key: &'static str) -> Result<Option<String>, WireError> {
        self.optional_field(key, |v| parse_text(key, v))
    }
}

/// Locate a field failure at `key`, unless a list parser already located it
/// at `key[idx]`.
fn within(key: &'static str, error: WireError) -> WireError {
    let prefix = format!("{key}[");
    let located = matches!(&error, WireError::At { path, .. } if path.starts_with(&prefix));
    if located {
        return error;
    }
    WireError::at(key, error)
}

const CLAIM_REQUIRED: [&str; 4] = ["claim_id", "statement", "claim_label", "evidence_ids"];
const CLAIM_OPTIONAL: [&str; 3] = ["step_id", "verify_falsify", "claim_span"];

pub fn parse_claim(wire: &Value) -> Result<Claim, WireError> {
    let object = WireObject::new("claim", wire, &CLAIM_REQUIRED, &CLAIM_OPTIONAL)?;
    let fields = ClaimFields {
        claim_id: object.field("claim_id", parse_claim_id)?,
        statement: object.text("statement")?,
        claim_label: object.field("claim_label", parse_claim_label)?,
        step_id: object.optional_field("step_id", parse_step_id)?,
        evidence_ids: object.field("evidence_ids", parse_evidence_ids)?,
        verify_falsify: object.optional_text("verify_falsify")?,
        claim_span: object.optional_field("claim_span", parse_claim_span)?,
    };
    Ok(Claim::new(fields)?)
}

const STEP_REQUIRED: [&str; 4] = ["step_id", "claim_ids", "step_status", "depends_on"];
const STEP_OPTIONAL: [&str; 1] = ["status_reason"];

pub fn parse_step(wire: &Value) -> Result<DerivationStep, WireError> {
    let object = WireObject::new("step", wire, &STEP_REQUIRED, &STEP_OPTIONAL)?;
    let fields = StepFields {
        step_id: object.field("step_id", parse_step_id)?,
        claim_ids: object.field("claim_ids", parse_claim_ids)?,
        step_status: object.field("step_status", parse_step_status)?,
        depends_on: object.field("depends_on", parse_depends_on)?,
        status_reason: object.optional_text("status_reason")?,
    };
    Ok(DerivationStep::new(fields)?)
}

const EVIDENCE_REQUIRED: [&str; 5] = [
    "evidence_id",
    "evidence_type",
    "source",
    "status",
    "payload_ref",
];
const EVIDENCE_OPTIONAL: [&str; 2] = ["status_reason", "notes"];

pub fn parse_evidence_object(wire: &Value) -> Result<EvidenceObject, WireError> {
    let object = WireObject::new("evidence", wire, &EVIDENCE_REQUIRED, &EVIDENCE_OPTIONAL)?;
    let fields = EvidenceFields {
        evidence_id: object.field("evidence_id", parse_evidence_id)?,
        evidence_type: object.field("evidence_type", parse_evidence_type)?,
        source: object.field("source", parse_evidence_source)?,
        status: object.field("status", parse_evidence_status)?,
        payload_ref: object.field("payload_ref", parse_payload_ref)?,
        status_reason: object.optional_field("status_reason", parse_indeterminate_reason)?,
        notes: object.optional_text("notes")?,
    };
    Ok(EvidenceObject::new(fields)?)
}

fn parse_entities<T>(
    field: &'static str,
    wire: &Value,
    entity: fn(&Value) -> Result<T, WireError>,
) -> Result<Vec<T>, WireError> {
    let Value::Array(items) = wire else {
        return Err(WireError::WrongType {
            field,
            expected: "list",
            found: json_type_name(wire),
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| entity(item).map_err(|e| WireError::at(format!("{field}[{idx}]"), e)))
        .collect()
}

const REPORT_REQUIRED: [&str; 3] = ["claims", "steps", "evidence"];
const REPORT_OPTIONAL: [&str; 1] = ["report_id"];

/// Document entry point: a JSON object with `claims`, `steps`, `evidence`,
/// and an optional `report_id`.
pub fn parse_report(wire: &Value) -> Result<ScientificReport, WireError> {
    let object = WireObject::new("report", wire, &REPORT_REQUIRED, &REPORT_OPTIONAL)?;
    let report_id = object.optional_field("report_id", parse_report_id)?;
    let claims = parse_entities("claims", object.required("claims")?, parse_claim)?;
    let steps = parse_entities("steps", object.required("steps")?, parse_step)?;
    let evidence = parse_entities(
        "evidence",
        object.required("evidence")?,
        parse_evidence_object,
    )?;
    Ok(ScientificReport::new(claims, steps, evidence, report_id)?)
}
