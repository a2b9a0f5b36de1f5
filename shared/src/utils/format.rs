//! Currency, weight and file-size formatting plus chart colours.

use crate::WeightUnit;

const LBS_TO_KG: f64 = 0.453592;
const KG_TO_LBS: f64 = 2.20462;

/// Fallback colour for unknown species or categories (gray-500)
const DEFAULT_COLOR: &str = "#6b7280";

/// Format an amount the way en-US locale currency formatting does,
/// e.g. `$1,234.56` or `-€12.00`. Unknown codes are written as a prefix.
pub fn format_currency(amount: f64, currency_code: &str) -> String {
    let code = currency_code.trim().to_ascii_uppercase();
    let (symbol, decimals) = currency_style(&code);

    let magnitude = group_thousands(amount.abs(), decimals);
    let is_zero = magnitude.chars().all(|c| !c.is_ascii_digit() || c == '0');
    let sign = if amount < 0.0 && !is_zero { "-" } else { "" };

    match symbol {
        Some(symbol) => format!("{}{}{}", sign, symbol, magnitude),
        None => format!("{}{}\u{a0}{}", sign, code, magnitude),
    }
}

fn currency_style(code: &str) -> (Option<&'static str>, usize) {
    match code {
        "USD" => (Some("$"), 2),
        "CAD" => (Some("CA$"), 2),
        "AUD" => (Some("A$"), 2),
        "MXN" => (Some("MX$"), 2),
        "EUR" => (Some("€"), 2),
        "GBP" => (Some("£"), 2),
        "JPY" => (Some("¥"), 0),
        "KRW" => (Some("₩"), 0),
        _ => (None, 2),
    }
}

/// Fixed decimals with comma thousands separators
fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value);
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// One decimal place and a unit suffix: `1250.0 lbs`
pub fn format_weight(value: f64, unit: WeightUnit) -> String {
    format!("{:.1} {}", value, unit)
}

/// Convert between pounds and kilograms. No rounding; round when displaying.
pub fn convert_weight(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    match (from, to) {
        (WeightUnit::Lbs, WeightUnit::Kg) => value * LBS_TO_KG,
        (WeightUnit::Kg, WeightUnit::Lbs) => value * KG_TO_LBS,
        _ => value,
    }
}

/// Human readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2.25 MB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);

    let fixed = format!("{:.2}", scaled);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent])
}

/// Chart colour for a species name
pub fn species_color(species: &str) -> &'static str {
    match species {
        "cattle" => "#ef4444",
        "swine" => "#f97316",
        "sheep" => "#eab308",
        "goats" => "#22c55e",
        "poultry" => "#3b82f6",
        _ => DEFAULT_COLOR,
    }
}

/// Chart colour for an expense category name
pub fn category_color(category: &str) -> &'static str {
    match category {
        "feed" => "#22c55e",
        "medical" => "#ef4444",
        "equipment" => "#3b82f6",
        "show" => "#8b5cf6",
        _ => DEFAULT_COLOR,
    }
}
