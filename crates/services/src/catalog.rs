use std::sync::Arc;

use study_core::model::{StudentId, Subject, SubjectDraft, SubjectId};
use study_remote::SubjectStore;

use crate::error::CatalogError;

/// The list of subjects for one student, plus the current selection.
///
/// Subjects come from the backend; the catalog patches itself from
/// authoritative responses and never guesses ids.
pub struct SubjectCatalog {
    store: Arc<dyn SubjectStore>,
    owner: StudentId,
    subjects: Vec<Subject>,
    selected: Option<SubjectId>,
}

impl SubjectCatalog {
    #[must_use]
    pub fn new(store: Arc<dyn SubjectStore>, owner: StudentId) -> Self {
        Self {
            store,
            owner,
            subjects: Vec::new(),
            selected: None,
        }
    }

    /// Fetches the student's subjects and auto-selects the first when
    /// nothing is selected yet.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` when the backend call fails; the
    /// catalog keeps its last-known-good contents in that case.
    pub async fn load(&mut self) -> Result<(), CatalogError> {
        let subjects = self.store.list_subjects(self.owner).await?;
        self.subjects = subjects;

        let selection_gone = self
            .selected
            .is_none_or(|id| !self.subjects.iter().any(|s| s.id() == id));
        if selection_gone {
            self.selected = self.subjects.first().map(Subject::id);
        }
        Ok(())
    }

    /// Creates a subject and auto-selects it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for an empty name, before any
    /// network call; `CatalogError::Store` when the backend rejects the
    /// draft (catalog unchanged).
    pub async fn create(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<SubjectId, CatalogError> {
        let draft = SubjectDraft::new(name, description, self.owner)?;
        let subject = self.store.create_subject(&draft).await?;
        let id = subject.id();
        self.subjects.push(subject);
        self.selected = Some(id);
        Ok(id)
    }

    /// Deletes a subject; the backend cascades to its cards.
    ///
    /// When the deleted subject was selected, the first remaining subject
    /// becomes selected, or the selection clears if none remain.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` when the backend call fails; the
    /// catalog is left unchanged.
    pub async fn delete(&mut self, id: SubjectId) -> Result<(), CatalogError> {
        self.store.delete_subject(id).await?;
        self.subjects.retain(|subject| subject.id() != id);
        if self.selected == Some(id) {
            self.selected = self.subjects.first().map(Subject::id);
        }
        Ok(())
    }

    /// Selects a subject already in the catalog. Returns false for an
    /// unknown id, leaving the selection unchanged.
    pub fn select(&mut self, id: SubjectId) -> bool {
        if self.subjects.iter().any(|subject| subject.id() == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    // Accessors
    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn selected(&self) -> Option<SubjectId> {
        self.selected
    }

    #[must_use]
    pub fn selected_subject(&self) -> Option<&Subject> {
        let id = self.selected?;
        self.subjects.iter().find(|subject| subject.id() == id)
    }

    #[must_use]
    pub fn owner(&self) -> StudentId {
        self.owner
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_remote::InMemoryStore;

    fn draft(name: &str) -> SubjectDraft {
        SubjectDraft::new(name, "", StudentId::new(1)).unwrap()
    }

    fn catalog_with(store: Arc<InMemoryStore>) -> SubjectCatalog {
        SubjectCatalog::new(store, StudentId::new(1))
    }

    #[tokio::test]
    async fn load_auto_selects_the_first_subject() {
        let store = Arc::new(InMemoryStore::new());
        let first = store.seed_subject(&draft("First")).unwrap();
        store.seed_subject(&draft("Second")).unwrap();

        let mut catalog = catalog_with(store);
        catalog.load().await.unwrap();

        assert_eq!(catalog.subjects().len(), 2);
        assert_eq!(catalog.selected(), Some(first.id()));
    }

    #[tokio::test]
    async fn load_keeps_an_existing_valid_selection() {
        let store = Arc::new(InMemoryStore::new());
        store.seed_subject(&draft("First")).unwrap();
        let second = store.seed_subject(&draft("Second")).unwrap();

        let mut catalog = catalog_with(store);
        catalog.load().await.unwrap();
        assert!(catalog.select(second.id()));
        catalog.load().await.unwrap();

        assert_eq!(catalog.selected(), Some(second.id()));
    }

    #[tokio::test]
    async fn create_appends_and_selects() {
        let store = Arc::new(InMemoryStore::new());
        let mut catalog = catalog_with(store);

        let id = catalog.create("Mathematics", "calculus").await.unwrap();
        assert_eq!(catalog.selected(), Some(id));
        assert_eq!(catalog.selected_subject().unwrap().name(), "Mathematics");
    }

    #[tokio::test]
    async fn create_with_empty_name_is_caught_locally() {
        let store = Arc::new(InMemoryStore::new());
        let mut catalog = catalog_with(store);

        let err = catalog.create("   ", "").await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn deleting_the_selected_subject_reselects_the_first_remaining() {
        let store = Arc::new(InMemoryStore::new());
        let first = store.seed_subject(&draft("First")).unwrap();
        let second = store.seed_subject(&draft("Second")).unwrap();

        let mut catalog = catalog_with(store);
        catalog.load().await.unwrap();
        catalog.delete(first.id()).await.unwrap();

        assert_eq!(catalog.selected(), Some(second.id()));
    }

    #[tokio::test]
    async fn deleting_the_last_subject_clears_the_selection() {
        let store = Arc::new(InMemoryStore::new());
        let only = store.seed_subject(&draft("Only")).unwrap();

        let mut catalog = catalog_with(store);
        catalog.load().await.unwrap();
        catalog.delete(only.id()).await.unwrap();

        assert_eq!(catalog.selected(), None);
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn select_rejects_unknown_ids() {
        let store = Arc::new(InMemoryStore::new());
        let mut catalog = catalog_with(store);
        assert!(!catalog.select(SubjectId::new(99)));
        assert_eq!(catalog.selected(), None);
    }
}
