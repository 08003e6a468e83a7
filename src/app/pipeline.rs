use super::state::{AppState, BackendEvent, UnitId};
use crate::prompt::sanitize;

/// Translate one unit with the current target language.
///
/// Returns false without touching anything when the id is unknown or the input
/// is blank. Otherwise the unit is marked loading and the remote call runs on a
/// spawned task; its outcome arrives later as a [`BackendEvent`]. Nothing is
/// cancelled: a later edit or a second dispatch for the same unit does not stop
/// this call, and whichever completion lands last is what the unit shows.
pub fn translate_unit(state: &mut AppState, id: UnitId) -> bool {
    let language = state.target_language;
    let Some(unit) = state.units.get_mut(id) else {
        log::debug!("Ignoring translate for unknown unit {id}");
        return false;
    };
    if !unit.has_input() {
        return false;
    }

    unit.is_loading = true;
    unit.error = None;
    unit.is_success = false;
    unit.generation += 1;

    let generation = unit.generation;
    let html = unit.input_html.clone();
    let translator = state.translator.clone();
    let sender = state.backend_sender.clone();

    log::info!(
        "UNIT #{}: translating {} bytes into {language}",
        id + 1,
        html.len()
    );

    tokio::spawn(async move {
        let result = match translator.translate(&html, language).await {
            Ok(raw) => Ok(sanitize(&raw)),
            Err(e) => {
                log::error!("UNIT #{}: translation error: {e}", id + 1);
                Err(e.user_message())
            }
        };
        let _ = sender
            .send(BackendEvent::TranslationFinished {
                id,
                generation,
                result,
            })
            .await;
    });

    true
}

/// Fire translate-one for every unit that has input and is not already in flight.
///
/// Works from a snapshot taken at call time and does not wait for anything.
/// Returns how many units were dispatched.
pub fn translate_all(state: &mut AppState) -> usize {
    let ready: Vec<UnitId> = state
        .units
        .snapshot()
        .into_iter()
        .filter(|u| u.has_input() && !u.is_loading)
        .map(|u| u.id)
        .collect();

    let dispatched = ready
        .into_iter()
        .filter(|&id| translate_unit(state, id))
        .count();

    log::info!(
        "Translate all: dispatched {dispatched} unit(s) into {}",
        state.target_language
    );
    dispatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::session::wait_until_idle;
    use crate::app::test_support::{new_state, ScriptedTranslator};
    use crate::error::TRANSLATE_FAILED_MESSAGE;
    use crate::language::TargetLanguage;
    use std::sync::Arc;

    #[tokio::test]
    async fn blank_input_is_a_no_op() {
        let translator = ScriptedTranslator::echo();
        let (mut state, rx) = new_state(translator.clone());
        state.units.set_input(2, "   \n\t");
        let before = state.units.snapshot();

        assert!(!translate_unit(&mut state, 2));
        assert!(!translate_unit(&mut state, 7));

        assert_eq!(state.units.snapshot(), before);
        assert!(rx.is_empty());
        tokio::task::yield_now().await;
        assert!(translator.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_unit_is_ignored() {
        let (mut state, _rx) = new_state(ScriptedTranslator::echo());
        assert!(!translate_unit(&mut state, 20));
    }

    #[tokio::test]
    async fn fenced_response_is_sanitized_into_output() {
        let translator = ScriptedTranslator::new(|_| Ok("```html\n<p>Bonjour</p>\n```".into()));
        let (mut state, rx) = new_state(translator.clone());
        state.target_language = TargetLanguage::French;
        state.units.set_input(3, "<p>Hello</p>");

        assert!(translate_unit(&mut state, 3));
        wait_until_idle(&mut state, &rx).await;

        let unit = state.units.get(3).unwrap();
        assert_eq!(unit.output_html, "<p>Bonjour</p>");
        assert!(unit.is_success);
        assert!(!unit.is_loading);
        assert_eq!(unit.error, None);
        assert_eq!(
            translator.calls(),
            vec![("<p>Hello</p>".to_string(), TargetLanguage::French)]
        );
    }

    #[tokio::test]
    async fn failure_keeps_previous_output() {
        let translator = ScriptedTranslator::failing();
        let (mut state, rx) = new_state(translator);
        state.units.set_input(1, "<p>Hello</p>");
        state.units.update(1, |u| u.output_html = "<p>Hola</p>".into());

        translate_unit(&mut state, 1);
        wait_until_idle(&mut state, &rx).await;

        let unit = state.units.get(1).unwrap();
        assert!(!unit.is_loading);
        assert!(!unit.is_success);
        assert_eq!(unit.error.as_deref(), Some(TRANSLATE_FAILED_MESSAGE));
        assert_eq!(unit.output_html, "<p>Hola</p>");
    }

    #[tokio::test]
    async fn dispatch_marks_loading_and_clears_status() {
        let translator = ScriptedTranslator::echo().gated();
        let (mut state, rx) = new_state(translator.clone());
        state.units.set_input(0, "<b>Hi</b>");
        state.units.update(0, |u| {
            u.error = Some("old".into());
            u.is_success = true;
        });

        translate_unit(&mut state, 0);
        let unit = state.units.get(0).unwrap();
        assert!(unit.is_loading);
        assert!(!unit.is_success);
        assert_eq!(unit.error, None);

        translator.release(1);
        wait_until_idle(&mut state, &rx).await;
        assert!(state.units.get(0).unwrap().is_success);
    }

    #[tokio::test]
    async fn translate_all_dispatches_only_populated_units() {
        let translator = ScriptedTranslator::new(|html| {
            if html.contains("bad") {
                Err(crate::error::TranslateError::MissingApiKey)
            } else {
                Ok(format!("{html}!"))
            }
        });
        let (mut state, rx) = new_state(translator.clone());
        state.units.set_input(0, "<p>bad</p>");
        state.units.set_input(5, "<p>good</p>");

        assert_eq!(translate_all(&mut state), 2);
        wait_until_idle(&mut state, &rx).await;

        assert_eq!(translator.calls().len(), 2);
        let failed = state.units.get(0).unwrap();
        let ok = state.units.get(5).unwrap();
        assert!(failed.error.is_some() && !failed.is_success);
        assert!(ok.is_success && ok.error.is_none());
        assert_eq!(ok.output_html, "<p>good</p>!");
        assert!(state
            .units
            .iter()
            .filter(|u| u.id != 0 && u.id != 5)
            .all(|u| u.output_html.is_empty() && u.error.is_none()));
    }

    #[tokio::test]
    async fn translate_all_skips_units_in_flight() {
        let translator = ScriptedTranslator::echo().gated();
        let (mut state, rx) = new_state(translator.clone());
        state.units.set_input(0, "<p>a</p>");
        state.units.set_input(1, "<p>b</p>");

        translate_unit(&mut state, 0);
        assert_eq!(translate_all(&mut state), 1);
        assert_eq!(state.units.in_flight(), 2);

        translator.release(2);
        wait_until_idle(&mut state, &rx).await;
        assert_eq!(translator.calls().len(), 2);
    }

    #[tokio::test]
    async fn edit_during_flight_does_not_cancel() {
        let translator = ScriptedTranslator::new(|html| Ok(html.replace("Hello", "Ciao"))).gated();
        let (mut state, rx) = new_state(Arc::clone(&translator));
        state.units.set_input(9, "<p>Hello</p>");

        translate_unit(&mut state, 9);
        state.units.set_input(9, "<p>Goodbye</p>");

        translator.release(1);
        wait_until_idle(&mut state, &rx).await;

        let unit = state.units.get(9).unwrap();
        assert_eq!(unit.input_html, "<p>Goodbye</p>");
        assert_eq!(unit.output_html, "<p>Ciao</p>");
        assert!(unit.is_success);
    }

    #[tokio::test]
    async fn language_is_captured_at_dispatch() {
        let translator = ScriptedTranslator::echo().gated();
        let (mut state, rx) = new_state(translator.clone());
        state.target_language = TargetLanguage::German;
        state.units.set_input(4, "<p>x</p>");

        translate_unit(&mut state, 4);
        state.target_language = TargetLanguage::Italian;

        translator.release(1);
        wait_until_idle(&mut state, &rx).await;
        assert_eq!(translator.calls()[0].1, TargetLanguage::German);
    }
}
