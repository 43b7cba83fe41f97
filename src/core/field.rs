//! Field values and formatting for the comparison table

use crate::core::vehicle::VehicleRecord;
use serde::{Deserialize, Serialize};

/// Placeholder rendered for any value a record does not carry
pub const MISSING: &str = "–";

/// A polymorphic field value read off a vehicle record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Get the value as a number if possible
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(_) => None,
        }
    }

    /// Get the value as text if possible
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Reads one field off a record; `None` when the record lacks it
pub type Accessor = fn(&VehicleRecord) -> Option<FieldValue>;

/// Renders a possibly absent value; must never panic
pub type Formatter = fn(Option<&FieldValue>) -> String;

/// A labelled, formatted column of the comparison table
#[derive(Clone, Copy)]
pub struct CompareField {
    pub label: &'static str,
    pub accessor: Accessor,
    pub formatter: Formatter,
}

impl CompareField {
    pub const fn new(label: &'static str, accessor: Accessor, formatter: Formatter) -> Self {
        Self {
            label,
            accessor,
            formatter,
        }
    }

    /// Read and format this field for one record
    pub fn render(&self, record: &VehicleRecord) -> String {
        let value = (self.accessor)(record);
        (self.formatter)(value.as_ref())
    }
}

impl std::fmt::Debug for CompareField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompareField")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Formatters used by the default comparison table
pub mod format {
    use super::{FieldValue, MISSING};

    fn with_unit(value: Option<&FieldValue>, unit: &str) -> String {
        match value.and_then(FieldValue::as_f64) {
            Some(n) => format!("{} {}", number(n), unit),
            None => MISSING.to_string(),
        }
    }

    /// Integral values without decimals, everything else with at most two
    pub fn number(value: f64) -> String {
        if value.fract() == 0.0 {
            format!("{}", value as i64)
        } else {
            let fixed = format!("{:.2}", value);
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }

    /// Group an integer with the Swiss thousands separator (52'990)
    pub fn grouped(value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('\'');
            }
            out.push(ch);
        }
        if value < 0 {
            out.insert(0, '-');
        }
        out
    }

    pub fn chf(value: Option<&FieldValue>) -> String {
        match value.and_then(FieldValue::as_f64) {
            Some(n) => format!("CHF {}", grouped(n.round() as i64)),
            None => MISSING.to_string(),
        }
    }

    pub fn km(value: Option<&FieldValue>) -> String {
        with_unit(value, "km")
    }

    pub fn kwh(value: Option<&FieldValue>) -> String {
        with_unit(value, "kWh")
    }

    pub fn kw(value: Option<&FieldValue>) -> String {
        with_unit(value, "kW")
    }

    pub fn seconds(value: Option<&FieldValue>) -> String {
        with_unit(value, "s")
    }

    pub fn kmh(value: Option<&FieldValue>) -> String {
        with_unit(value, "km/h")
    }

    pub fn liters(value: Option<&FieldValue>) -> String {
        with_unit(value, "l")
    }

    pub fn consumption(value: Option<&FieldValue>) -> String {
        with_unit(value, "kWh/100 km")
    }

    pub fn plain(value: Option<&FieldValue>) -> String {
        match value {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => s.clone(),
            Some(FieldValue::Text(_)) | None => MISSING.to_string(),
            Some(other) => other.as_f64().map(number).unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

fn float(value: Option<f64>) -> Option<FieldValue> {
    value.map(FieldValue::Float)
}

fn text(value: &Option<String>) -> Option<FieldValue> {
    value.clone().map(FieldValue::Text)
}

/// Rows shown in the side-by-side vehicle comparison, in display order
pub fn vehicle_compare_fields() -> Vec<CompareField> {
    vec![
        CompareField::new("Preis", |v| float(v.price_chf), format::chf),
        CompareField::new("Reichweite (WLTP)", |v| float(v.range_wltp_km), format::km),
        CompareField::new("Batterie", |v| float(v.battery_kwh), format::kwh),
        CompareField::new("Verbrauch", |v| float(v.consumption_kwh_100km), format::consumption),
        CompareField::new("0–100 km/h", |v| float(v.acceleration_0_100), format::seconds),
        CompareField::new("Höchstgeschwindigkeit", |v| float(v.top_speed_kmh), format::kmh),
        CompareField::new("DC-Laden", |v| float(v.charging_dc_kw), format::kw),
        CompareField::new("AC-Laden", |v| float(v.charging_ac_kw), format::kw),
        CompareField::new("Kofferraum", |v| float(v.cargo_liters), format::liters),
        CompareField::new(
            "Sitze",
            |v| v.seats.map(|s| FieldValue::Integer(s as i64)),
            format::plain,
        ),
        CompareField::new("Antrieb", |v| text(&v.drivetrain), format::plain),
        CompareField::new("Kategorie", |v| text(&v.category), format::plain),
    ]
}
