//! Cost aggregation for the itemized budget section.
//!
//! Clients send amounts as numbers or free-form strings. Each amount is read the
//! way a lenient form parser would: the longest leading decimal literal wins and
//! anything unreadable counts as zero. The total is always recomputed here; a
//! client-supplied total is never consulted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Itemized budget with a derived total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub labor_costs: f64,
    pub materials_supplies: f64,
    pub equipment_costs: f64,
    pub contracted_services: f64,
    pub other_costs: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub fn from_amounts(
        labor_costs: f64,
        materials_supplies: f64,
        equipment_costs: f64,
        contracted_services: f64,
        other_costs: f64,
    ) -> Self {
        let total =
            labor_costs + materials_supplies + equipment_costs + contracted_services + other_costs;
        Self {
            labor_costs,
            materials_supplies,
            equipment_costs,
            contracted_services,
            other_costs,
            total,
        }
    }
}

/// The five raw cost fields exactly as a client submitted them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostInputs {
    #[serde(default)]
    pub labor_costs: Option<Value>,
    #[serde(default)]
    pub materials_supplies: Option<Value>,
    #[serde(default)]
    pub equipment_costs: Option<Value>,
    #[serde(default)]
    pub contracted_services: Option<Value>,
    #[serde(default)]
    pub other_costs: Option<Value>,
}

impl CostInputs {
    pub fn aggregate(&self) -> CostBreakdown {
        CostBreakdown::from_amounts(
            parse_amount(self.labor_costs.as_ref()),
            parse_amount(self.materials_supplies.as_ref()),
            parse_amount(self.equipment_costs.as_ref()),
            parse_amount(self.contracted_services.as_ref()),
            parse_amount(self.other_costs.as_ref()),
        )
    }
}

/// Read a single amount, defaulting to zero for missing or non-numeric input.
pub fn parse_amount(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => leading_number(raw),
        _ => None,
    };
    parsed.filter(|amount| !amount.is_nan()).unwrap_or(0.0)
}

fn leading_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let integer_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - integer_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut fraction_end = end + 1;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        mantissa_digits += fraction_end - (end + 1);
        if mantissa_digits > 0 {
            end = fraction_end;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exponent_end = end + 1;
        if exponent_end < bytes.len() && matches!(bytes[exponent_end], b'+' | b'-') {
            exponent_end += 1;
        }
        let digits_start = exponent_end;
        while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
            exponent_end += 1;
        }
        if exponent_end > digits_start {
            end = exponent_end;
        }
    }

    text[..end].parse::<f64>().ok()
}
