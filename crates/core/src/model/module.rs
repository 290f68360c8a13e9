use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ContentItem, ItemPosition, ModuleId};
use crate::section::{Section, all_sections, section_of};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModuleError {
    #[error("module must have at least one content item")]
    Empty,
}

//
// ─── BOUNDARY NORMALIZATION ────────────────────────────────────────────────────
//

/// Normalizes an authored boundary list against a module of `item_count` items.
///
/// Drops out-of-range values, inserts the mandatory leading `0`, dedupes and
/// sorts ascending. Idempotent: normalizing a normalized list is a no-op.
#[must_use]
pub fn normalize_boundaries(boundaries: &[usize], item_count: usize) -> Vec<usize> {
    let mut normalized: Vec<usize> = boundaries
        .iter()
        .copied()
        .filter(|&b| b < item_count)
        .collect();
    normalized.push(0);
    normalized.sort_unstable();
    normalized.dedup();
    normalized
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// Opaque prompt strings passed through to the chat collaborator.
///
/// The engine never interprets these; they configure the collaborator for
/// each phase of the flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePrompts {
    pub reading: String,
    pub experiment: String,
    pub conclude: String,
}

/// The authored instructional unit a learner works through.
///
/// Items are in reading order; `section_boundaries` is kept normalized (see
/// [`normalize_boundaries`]) from construction onward. Read-only during a
/// learning session: the authoring collaborator owns edits, and a module is
/// re-validated on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ModuleRecord")]
pub struct Module {
    id: ModuleId,
    title: String,
    items: Vec<ContentItem>,
    section_boundaries: Vec<usize>,
    prompts: ModulePrompts,
    experiment_content: String,
}

/// Stored shape of a module. Deserialization goes through [`Module::new`], so
/// a loaded module is validated and normalized exactly like an authored one.
#[derive(Deserialize)]
struct ModuleRecord {
    id: ModuleId,
    title: String,
    items: Vec<ContentItem>,
    section_boundaries: Vec<usize>,
    prompts: ModulePrompts,
    experiment_content: String,
}

impl TryFrom<ModuleRecord> for Module {
    type Error = ModuleError;

    fn try_from(record: ModuleRecord) -> Result<Self, ModuleError> {
        Module::new(
            record.id,
            record.title,
            record.items,
            &record.section_boundaries,
            record.prompts,
            record.experiment_content,
        )
    }
}

impl Module {
    /// Creates a module, normalizing the authored boundary list.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::Empty` when `items` is empty; the engine refuses
    /// to run a session over an inconsistent content model.
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        items: Vec<ContentItem>,
        section_boundaries: &[usize],
        prompts: ModulePrompts,
        experiment_content: impl Into<String>,
    ) -> Result<Self, ModuleError> {
        if items.is_empty() {
            return Err(ModuleError::Empty);
        }
        let section_boundaries = normalize_boundaries(section_boundaries, items.len());
        Ok(Self {
            id,
            title: title.into(),
            items,
            section_boundaries,
            prompts,
            experiment_content: experiment_content.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Item at a 1-indexed learner position, if in range.
    #[must_use]
    pub fn item_at(&self, position: ItemPosition) -> Option<&ContentItem> {
        self.items.get(position.index0())
    }

    #[must_use]
    pub fn section_boundaries(&self) -> &[usize] {
        &self.section_boundaries
    }

    #[must_use]
    pub fn prompts(&self) -> &ModulePrompts {
        &self.prompts
    }

    #[must_use]
    pub fn experiment_content(&self) -> &str {
        &self.experiment_content
    }

    //
    // ─── SECTION VIEWS ─────────────────────────────────────────────────────────
    //
    // Sections are derived on demand; nothing here is cached across a
    // boundary edit.

    /// Section owning the given learner position.
    #[must_use]
    pub fn section_at(&self, position: ItemPosition) -> Section {
        section_of(position.index0(), &self.section_boundaries, self.items.len())
    }

    /// Every section in order.
    #[must_use]
    pub fn sections(&self) -> Vec<Section> {
        all_sections(&self.section_boundaries, self.items.len())
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.section_boundaries.len()
    }

    #[must_use]
    pub fn last_section_index(&self) -> usize {
        self.section_boundaries.len() - 1
    }

    /// Flattened reading text for chat prompts; non-text items become
    /// bracketed placeholders.
    #[must_use]
    pub fn flattened_text(&self) -> String {
        self.items
            .iter()
            .map(ContentItem::prompt_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Flattened text of one section, used for engagement evaluation.
    #[must_use]
    pub fn section_text(&self, section: Section) -> String {
        self.items[section.start..section.end]
            .iter()
            .map(ContentItem::prompt_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn text_items(n: usize) -> Vec<ContentItem> {
        (1..=n)
            .map(|i| ContentItem::text(format!("Paragraph {i}")).unwrap())
            .collect()
    }

    fn module_with(boundaries: &[usize], n: usize) -> Module {
        Module::new(
            ModuleId::new(1),
            "Test",
            text_items(n),
            boundaries,
            ModulePrompts::default(),
            "",
        )
        .unwrap()
    }

    #[test]
    fn empty_module_is_rejected() {
        let err = Module::new(
            ModuleId::new(1),
            "Test",
            Vec::new(),
            &[0],
            ModulePrompts::default(),
            "",
        )
        .unwrap_err();
        assert_eq!(err, ModuleError::Empty);
    }

    #[test]
    fn normalize_inserts_zero_sorts_and_dedupes() {
        // Editor-supplied list from a boundary edit.
        assert_eq!(normalize_boundaries(&[2, 0, 2], 5), vec![0, 2]);
        assert_eq!(normalize_boundaries(&[], 5), vec![0]);
        assert_eq!(normalize_boundaries(&[4, 2], 5), vec![0, 2, 4]);
    }

    #[test]
    fn normalize_drops_out_of_range_values() {
        assert_eq!(normalize_boundaries(&[0, 5, 9], 5), vec![0]);
        assert_eq!(normalize_boundaries(&[3], 3), vec![0]);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_boundaries(&[4, 1, 1, 7, 0], 6);
        let twice = normalize_boundaries(&once, 6);
        assert_eq!(once, twice);
        assert!(once.contains(&0));
        assert!(once.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn module_normalizes_on_construction() {
        let module = module_with(&[2, 0, 2, 99], 5);
        assert_eq!(module.section_boundaries(), &[0, 2]);
        assert_eq!(module.section_count(), 2);
    }

    #[test]
    fn deserialization_renormalizes_stored_boundaries() {
        // Hand-edited or stale stored data: boundaries unsorted and out of
        // range for a one-item module.
        let json = serde_json::json!({
            "id": 1,
            "title": "Test",
            "items": [{"type": "text", "content": "Paragraph 1"}],
            "section_boundaries": [7, 3],
            "prompts": {"reading": "", "experiment": "", "conclude": ""},
            "experiment_content": ""
        });
        let module: Module = serde_json::from_value(json).unwrap();
        assert_eq!(module.section_boundaries(), &[0]);
    }

    #[test]
    fn deserialization_rejects_empty_items() {
        let json = serde_json::json!({
            "id": 1,
            "title": "Test",
            "items": [],
            "section_boundaries": [0],
            "prompts": {"reading": "", "experiment": "", "conclude": ""},
            "experiment_content": ""
        });
        let err = serde_json::from_value::<Module>(json).unwrap_err();
        assert!(err.to_string().contains("at least one content item"));
    }

    #[test]
    fn valid_module_round_trips_through_serde() {
        let module = module_with(&[0, 2], 4);
        let json = serde_json::to_value(&module).unwrap();
        let loaded: Module = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, module);
    }

    #[test]
    fn section_views_pair_consecutive_boundaries() {
        let module = module_with(&[0, 2, 4], 5);
        let sections = module.sections();
        assert_eq!(sections.len(), 3);
        assert_eq!((sections[1].start, sections[1].end), (2, 4));
        assert_eq!((sections[2].start, sections[2].end), (4, 5));
        assert_eq!(module.last_section_index(), 2);
    }

    #[test]
    fn flattening_replaces_non_text_items() {
        let items = vec![
            ContentItem::text("one").unwrap(),
            ContentItem::image("https://example.com/a.png").unwrap(),
            ContentItem::text("two").unwrap(),
        ];
        let module = Module::new(
            ModuleId::new(1),
            "Test",
            items,
            &[0],
            ModulePrompts::default(),
            "",
        )
        .unwrap();
        assert_eq!(module.flattened_text(), "one\n[Image content]\ntwo");
    }

    #[test]
    fn section_text_covers_only_that_section() {
        let module = module_with(&[0, 2], 4);
        let sections = module.sections();
        assert_eq!(module.section_text(sections[0]), "Paragraph 1\nParagraph 2");
        assert_eq!(module.section_text(sections[1]), "Paragraph 3\nParagraph 4");
    }
}
