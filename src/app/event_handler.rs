use super::state::{BackendEvent, UnitId, UnitStore};

/// Apply a backend event to the store. Returns the id of the unit it touched.
pub fn handle_backend_event(units: &mut UnitStore, event: BackendEvent) -> Option<UnitId> {
    match event {
        BackendEvent::TranslationFinished {
            id,
            generation,
            result,
        } => {
            let applied = units.update(id, |unit| {
                if generation < unit.generation {
                    log::warn!(
                        "UNIT #{}: applying result of an older request (gen {generation} < {})",
                        id + 1,
                        unit.generation
                    );
                }
                match result {
                    Ok(html) => {
                        log::info!("UNIT #{}: done ({} bytes)", id + 1, html.len());
                        unit.output_html = html;
                        unit.is_success = true;
                        unit.error = None;
                    }
                    Err(message) => {
                        unit.error = Some(message);
                        unit.is_success = false;
                    }
                }
                unit.is_loading = false;
            });
            applied.then_some(id)
        }
    }
}

/// Copy a unit's output to the clipboard. Returns false when there is nothing to copy.
pub fn copy_output(units: &UnitStore, id: UnitId) -> Result<bool, Box<dyn std::error::Error>> {
    match units.get(id) {
        Some(unit) if !unit.output_html.is_empty() => {
            crate::clipboard::copy_to_clipboard(&unit.output_html)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}
