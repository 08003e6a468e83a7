use std::fmt::Write;

use crate::app::{TranslationUnit, UnitId, UnitStatus, UnitStore};
use crate::language::TargetLanguage;

/// Users see units numbered from 1.
pub fn unit_label(id: UnitId) -> String {
    format!("UNIT #{}", id + 1)
}

/// One status line per unit, under a header naming the target language.
pub fn render_grid(units: &UnitStore, language: TargetLanguage) -> String {
    let mut out = format!(
        "Bulk HTML Translator | target: {language} | in flight: {}\n",
        units.in_flight()
    );
    for unit in units.iter() {
        let _ = write!(
            out,
            "{:<9} {:<15} in: {:>6} B  out: {:>6} B",
            unit_label(unit.id),
            unit.status().label(),
            unit.input_html.len(),
            unit.output_html.len()
        );
        if let Some(ref err) = unit.error {
            let _ = write!(out, "  ! {err}");
        }
        out.push('\n');
    }
    out
}

/// Full input and output of a single unit.
pub fn render_unit(unit: &TranslationUnit) -> String {
    let mut out = format!("{} [{}]\n", unit_label(unit.id), unit.status());
    out.push_str("--- input ---\n");
    out.push_str(if unit.input_html.is_empty() {
        "(empty)"
    } else {
        unit.input_html.as_str()
    });
    out.push_str("\n--- output ---\n");
    out.push_str(if unit.output_html.is_empty() {
        "(empty)"
    } else {
        unit.output_html.as_str()
    });
    out.push('\n');
    if let Some(ref err) = unit.error {
        let _ = writeln!(out, "--- error ---\n{err}");
    }
    out
}

/// Short line printed when a translation completes.
pub fn render_notice(unit: &TranslationUnit) -> String {
    match (unit.status(), &unit.error) {
        (UnitStatus::Error, Some(err)) => format!("{}: Error: {err}", unit_label(unit.id)),
        (status, _) => format!("{}: {status}", unit_label(unit.id)),
    }
}
