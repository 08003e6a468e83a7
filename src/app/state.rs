use std::fmt;
use std::sync::Arc;

use crate::language::TargetLanguage;
use crate::translator::Translator;

/// Number of translation slots, fixed for the whole session.
pub const UNIT_COUNT: usize = 20;

pub type UnitId = usize;

/// Events sent from spawned translation tasks to the loop that owns the state.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    TranslationFinished {
        id: UnitId,
        generation: u64,
        /// Sanitized HTML on success, user-facing message on failure.
        result: Result<String, String>,
    },
}

/// One slot of the bulk grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationUnit {
    pub id: UnitId,
    pub input_html: String,
    pub output_html: String,
    pub is_loading: bool,
    pub is_success: bool,
    pub error: Option<String>,
    /// Bumped on every input edit and every dispatch. Diagnostic only.
    pub generation: u64,
}

/// Status shown next to a unit, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    Ready,
    Translating,
    Done,
    Error,
}

impl UnitStatus {
    pub fn label(self) -> &'static str {
        match self {
            UnitStatus::Ready => "Ready",
            UnitStatus::Translating => "Translating...",
            UnitStatus::Done => "Done",
            UnitStatus::Error => "Error",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TranslationUnit {
    pub fn new(id: UnitId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn has_input(&self) -> bool {
        !self.input_html.trim().is_empty()
    }

    pub fn status(&self) -> UnitStatus {
        if self.is_loading {
            UnitStatus::Translating
        } else if self.is_success {
            UnitStatus::Done
        } else if self.error.is_some() {
            UnitStatus::Error
        } else {
            UnitStatus::Ready
        }
    }
}

/// The fixed, ordered set of units. Units are never added or removed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitStore {
    units: Vec<TranslationUnit>,
}

impl Default for UnitStore {
    fn default() -> Self {
        Self {
            units: (0..UNIT_COUNT).map(TranslationUnit::new).collect(),
        }
    }
}

impl UnitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: UnitId) -> Option<&TranslationUnit> {
        self.units.get(id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut TranslationUnit> {
        self.units.get_mut(id)
    }

    /// Apply `f` to the unit with `id`. Returns false for an unknown id.
    pub fn update(&mut self, id: UnitId, f: impl FnOnce(&mut TranslationUnit)) -> bool {
        match self.units.get_mut(id) {
            Some(unit) => {
                f(unit);
                true
            }
            None => false,
        }
    }

    /// User edit: replaces the input and marks any shown result as stale.
    /// Output and error are left as they were.
    pub fn set_input(&mut self, id: UnitId, html: impl Into<String>) -> bool {
        let html = html.into();
        self.update(id, |unit| {
            unit.input_html = html;
            unit.is_success = false;
            unit.generation += 1;
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranslationUnit> {
        self.units.iter()
    }

    pub fn snapshot(&self) -> Vec<TranslationUnit> {
        self.units.clone()
    }

    pub fn in_flight(&self) -> usize {
        self.units.iter().filter(|u| u.is_loading).count()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }
}

/// Everything the coordinator operations need, passed explicitly.
pub struct AppState {
    pub units: UnitStore,
    pub target_language: TargetLanguage,
    pub translator: Arc<dyn Translator>,
    pub backend_sender: async_channel::Sender<BackendEvent>,
}

impl AppState {
    pub fn new(
        translator: Arc<dyn Translator>,
        target_language: TargetLanguage,
        sender: async_channel::Sender<BackendEvent>,
    ) -> Self {
        Self {
            units: UnitStore::new(),
            target_language,
            translator,
            backend_sender: sender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_has_fixed_ids() {
        let store = UnitStore::new();
        assert_eq!(store.iter().count(), UNIT_COUNT);
        for (i, unit) in store.iter().enumerate() {
            assert_eq!(unit.id, i);
            assert_eq!(unit.status(), UnitStatus::Ready);
        }
        assert!(store.get(UNIT_COUNT).is_none());
    }

    #[test]
    fn editing_input_only_clears_success() {
        let mut store = UnitStore::new();
        store.update(4, |u| {
            u.output_html = "<p>Hallo</p>".into();
            u.is_success = true;
        });

        assert!(store.set_input(4, "<p>Hello again</p>"));

        let unit = store.get(4).unwrap();
        assert!(!unit.is_success);
        assert_eq!(unit.output_html, "<p>Hallo</p>");
        assert_eq!(unit.input_html, "<p>Hello again</p>");
        assert_eq!(unit.generation, 1);
    }

    #[test]
    fn editing_keeps_previous_error() {
        let mut store = UnitStore::new();
        store.update(0, |u| u.error = Some("boom".into()));
        store.set_input(0, "<i>x</i>");
        assert_eq!(store.get(0).unwrap().error.as_deref(), Some("boom"));
        assert_eq!(store.get(0).unwrap().status(), UnitStatus::Error);
    }

    #[test]
    fn unknown_id_is_rejected() {
        let mut store = UnitStore::new();
        assert!(!store.set_input(99, "x"));
        assert!(!store.update(20, |u| u.is_loading = true));
        assert!(store.is_idle());
    }

    #[test]
    fn status_precedence_matches_flags() {
        let mut unit = TranslationUnit::new(0);
        unit.error = Some("e".into());
        assert_eq!(unit.status(), UnitStatus::Error);
        unit.is_success = true;
        assert_eq!(unit.status(), UnitStatus::Done);
        unit.is_loading = true;
        assert_eq!(unit.status(), UnitStatus::Translating);
        assert_eq!(unit.status().to_string(), "Translating...");
    }

    #[test]
    fn whitespace_input_counts_as_empty() {
        let mut unit = TranslationUnit::new(1);
        unit.input_html = " \n\t ".into();
        assert!(!unit.has_input());
    }
}
