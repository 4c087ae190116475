use std::io::{self, Write};

use crate::instance::{Instance, FEATURE_NAMES};
use crate::service::{Prediction, CLASS_NAMES};

/// Writes one response block: each instance followed by its prediction.
pub fn write_response<W: Write + ?Sized>(
    out: &mut W,
    request_id: usize,
    instances: &[Instance],
    predictions: &[Prediction],
) -> io::Result<()> {
    write!(out, "\n==> Response from request #{}:\n\n", request_id)?;
    for (i, (instance, prediction)) in instances.iter().zip(predictions).enumerate() {
        write_group(out, &format!("Instance {}:", i + 1), &FEATURE_NAMES, &instance.features)?;
        write_group(out, &format!("Prediction {}:", i + 1), &CLASS_NAMES, &prediction.scores)?;
    }
    out.flush()
}

fn write_group<W: Write + ?Sized>(
    out: &mut W,
    heading: &str,
    names: &[&str],
    values: &[f64],
) -> io::Result<()> {
    for (row, (name, value)) in names.iter().zip(values).enumerate() {
        let lead = if row == 0 { heading } else { "\t" };
        // labels shorter than a tab stop need a second tab to align
        let sep = if name.len() < 8 { "\t\t" } else { "\t" };
        writeln!(out, "{}\t{}:{}{}", lead, name, sep, format_score(*value))?;
    }
    writeln!(out)
}

/// Shortest round-trip rendering that keeps a fractional part on integral
/// values and switches to a signed two-digit exponent outside `[1e-4, 1e16)`.
pub fn format_score(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        plain + ".0"
    }
}
