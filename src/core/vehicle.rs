//! Vehicle records as served by the vehicle database endpoints

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single vehicle from the database
///
/// The portal only ever holds copies returned by the Remote Data Service and
/// never mutates them. Only the identity and name fields are required; every
/// other field may be missing from a payload and decodes to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: String,
    pub brand: String,
    pub model: String,

    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub price_chf: Option<f64>,
    #[serde(default)]
    pub range_wltp_km: Option<f64>,
    #[serde(default)]
    pub battery_kwh: Option<f64>,
    #[serde(default)]
    pub acceleration_0_100: Option<f64>,
    #[serde(default)]
    pub charging_dc_kw: Option<f64>,
    #[serde(default)]
    pub charging_ac_kw: Option<f64>,
    #[serde(default)]
    pub consumption_kwh_100km: Option<f64>,
    #[serde(default)]
    pub top_speed_kmh: Option<f64>,
    #[serde(default)]
    pub cargo_liters: Option<f64>,
    #[serde(default)]
    pub seats: Option<u32>,
    /// AWD, FWD or RWD
    #[serde(default)]
    pub drivetrain: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl VehicleRecord {
    /// Minimal record with only identity fields set
    pub fn new(id: impl Into<String>, brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            model: model.into(),
            variant: None,
            category: None,
            year: None,
            price_chf: None,
            range_wltp_km: None,
            battery_kwh: None,
            acceleration_0_100: None,
            charging_dc_kw: None,
            charging_ac_kw: None,
            consumption_kwh_100km: None,
            top_speed_kmh: None,
            cargo_liters: None,
            seats: None,
            drivetrain: None,
            image_url: None,
        }
    }

    /// "Brand Model Variant", skipping the variant when absent
    pub fn display_name(&self) -> String {
        match self.variant.as_deref().map(str::trim) {
            Some(variant) if !variant.is_empty() => {
                format!("{} {} {}", self.brand, self.model, variant)
            }
            _ => format!("{} {}", self.brand, self.model),
        }
    }
}

/// Field the vehicle list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "price_chf")]
    PriceChf,
    #[serde(rename = "range_wltp_km")]
    RangeWltpKm,
    #[serde(rename = "battery_kwh")]
    BatteryKwh,
    #[serde(rename = "acceleration_0_100")]
    Acceleration0100,
}

impl SortField {
    /// All sort fields in menu order
    pub const ALL: [SortField; 4] = [
        SortField::PriceChf,
        SortField::RangeWltpKm,
        SortField::BatteryKwh,
        SortField::Acceleration0100,
    ];

    /// Name sent as `sort_by`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::PriceChf => "price_chf",
            SortField::RangeWltpKm => "range_wltp_km",
            SortField::BatteryKwh => "battery_kwh",
            SortField::Acceleration0100 => "acceleration_0_100",
        }
    }

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            SortField::PriceChf => "Preis",
            SortField::RangeWltpKm => "Reichweite",
            SortField::BatteryKwh => "Batterie",
            SortField::Acceleration0100 => "Beschleunigung",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Name sent as `sort_order`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record_deserializes() {
        let record: VehicleRecord = serde_json::from_value(json!({
            "id": "1",
            "brand": "Tesla",
            "model": "Model 3",
            "variant": "Long Range",
            "price_chf": 52990,
            "range_wltp_km": 678,
            "battery_kwh": 82,
            "consumption_kwh_100km": 14.2,
            "acceleration_0_100": 4.4,
            "top_speed_kmh": 233,
            "charging_dc_kw": 250,
            "charging_ac_kw": 11,
            "cargo_liters": 561,
            "seats": 5,
            "drivetrain": "AWD",
            "year": 2024,
            "category": "Limousine",
            "image_url": null
        }))
        .unwrap();

        assert_eq!(record.price_chf, Some(52990.0));
        assert_eq!(record.seats, Some(5));
        assert_eq!(record.image_url, None);
        assert_eq!(record.display_name(), "Tesla Model 3 Long Range");
    }

    #[test]
    fn test_sparse_record_deserializes() {
        let record: VehicleRecord =
            serde_json::from_value(json!({"id": "x", "brand": "Fiat", "model": "500e"})).unwrap();

        assert_eq!(record.range_wltp_km, None);
        assert_eq!(record.drivetrain, None);
        assert_eq!(record.display_name(), "Fiat 500e");
    }

    #[test]
    fn test_sort_field_wire_names() {
        for field in SortField::ALL {
            let json = serde_json::to_value(field).unwrap();
            assert_eq!(json, field.as_str());
        }
        assert_eq!(SortField::default(), SortField::PriceChf);
    }

    #[test]
    fn test_sort_order_reversed() {
        assert_eq!(SortOrder::default(), SortOrder::Asc);
        assert_eq!(SortOrder::Asc.reversed(), SortOrder::Desc);
        assert_eq!(SortOrder::Desc.to_string(), "desc");
    }
}
