//! The session controller tying catalog, gateway, cursor, and overlays
//! together behind one mutable facade.
//!
//! The controller owns the working card set: the built-in demonstration
//! cards visible for the current view plus the backend cards of the
//! selected subject, in that order. Every backend mutation is applied to
//! local state only from the authoritative response, and responses that
//! arrive after the selection moved on are dropped.

use std::sync::Arc;

use study_core::model::{
    seed, Card, CardDraft, CardSource, Difficulty, StudentId, Subject, SubjectId,
};
use study_core::session::{
    Control, FocusContext, KeyEvent, Overlay, OverlayFsm, SessionCursor, SessionIntent,
    filter_cards, route_key,
};
use study_remote::{CardStore, StoreError, SubjectStore};

use crate::catalog::SubjectCatalog;
use crate::error::{CatalogError, GatewayError, SessionError};
use crate::gateway::CardMutationGateway;
use crate::notice::Notice;

/// Focusable control count per overlay, used to size the Tab cycle.
fn focusable_controls(overlay: Overlay) -> usize {
    match overlay {
        // Topic, difficulty, question, answer, save, cancel.
        Overlay::AddCard | Overlay::EditCard => 6,
        // Name, description, create, cancel.
        Overlay::Subject => 4,
        // Confirm, cancel.
        Overlay::DeleteCard | Overlay::DeleteSubject => 2,
        // Close button.
        Overlay::Help => 1,
        Overlay::OptionsMenu | Overlay::SubjectMenu => 0,
    }
}

pub struct StudySessionController {
    catalog: SubjectCatalog,
    gateway: CardMutationGateway,
    seed_cards: Vec<Card>,
    remote_cards: Vec<Card>,
    /// The subject `remote_cards` were fetched for; refresh failures keep
    /// the cards only while this still matches the selection.
    remote_subject: Option<SubjectId>,
    cards: Vec<Card>,
    difficulty: Difficulty,
    cursor: SessionCursor,
    overlay: OverlayFsm,
    notices: Vec<Notice>,
    pending_delete_card: Option<CardSource>,
    pending_delete_subject: Option<SubjectId>,
    focus_return: Option<Control>,
}

impl StudySessionController {
    #[must_use]
    pub fn new(
        subjects: Arc<dyn SubjectStore>,
        cards: Arc<dyn CardStore>,
        owner: StudentId,
    ) -> Self {
        let mut controller = Self {
            catalog: SubjectCatalog::new(subjects, owner),
            gateway: CardMutationGateway::new(cards),
            seed_cards: seed::demo_cards(),
            remote_cards: Vec::new(),
            remote_subject: None,
            cards: Vec::new(),
            difficulty: Difficulty::Easy,
            cursor: SessionCursor::default(),
            overlay: OverlayFsm::default(),
            notices: Vec::new(),
            pending_delete_card: None,
            pending_delete_subject: None,
            focus_return: None,
        };
        controller.rebuild_cards();
        controller
    }

    //
    // ─── LOADING ───────────────────────────────────────────────────────────────
    //

    /// Fetches subjects and the selected subject's cards.
    ///
    /// Never fails: a transport error leaves last-known-good state and
    /// queues a banner notice so the session keeps running on local data.
    pub async fn load(&mut self) {
        if let Err(err) = self.catalog.load().await {
            self.note_catalog("list subjects", &err);
        }
        self.refresh_cards().await;
    }

    /// Refetches the selected subject's cards, replacing the remote part
    /// of the working set.
    ///
    /// The response is dropped when the selection moved while the request
    /// was in flight. A fetch failure for the subject the cards already
    /// belong to keeps them last-known-good; cards held for a different
    /// subject are never shown under the new one.
    pub async fn refresh_cards(&mut self) {
        let Some(subject) = self.catalog.selected_subject().cloned() else {
            self.remote_cards.clear();
            self.remote_subject = None;
            self.rebuild_cards();
            return;
        };

        let fetched = self.gateway.load(&subject).await;
        if self.catalog.selected() != Some(subject.id()) {
            return;
        }
        match fetched {
            Ok(cards) => {
                self.remote_cards = cards;
                self.remote_subject = Some(subject.id());
            }
            Err(err) => {
                if self.remote_subject != Some(subject.id()) {
                    self.remote_cards.clear();
                    self.remote_subject = None;
                }
                self.note_gateway("load cards", &err);
            }
        }
        self.rebuild_cards();
    }

    //
    // ─── SUBJECTS ──────────────────────────────────────────────────────────────
    //

    /// Selects a subject from the catalog, ending any running session.
    pub async fn select_subject(&mut self, id: SubjectId) -> bool {
        if !self.catalog.select(id) {
            return false;
        }
        self.cursor.back();
        self.refresh_cards().await;
        true
    }

    /// Creates a subject and selects it.
    ///
    /// # Errors
    ///
    /// Returns the validation error for an empty name (shown inline, no
    /// notice); backend rejections queue a blocking notice as well.
    pub async fn create_subject(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<SubjectId, SessionError> {
        match self.catalog.create(name, description).await {
            Ok(id) => {
                self.cursor.back();
                self.refresh_cards().await;
                Ok(id)
            }
            Err(err) => {
                self.note_catalog("create subject", &err);
                Err(err.into())
            }
        }
    }

    /// Asks for confirmation before deleting a subject.
    pub fn request_delete_subject(&mut self, id: SubjectId, opener: Control) {
        self.pending_delete_subject = Some(id);
        self.open_overlay(Overlay::DeleteSubject, opener);
    }

    /// Deletes the subject awaiting confirmation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoCurrentCard`-style state errors never;
    /// a backend failure is returned and queued as a notice, with the
    /// catalog left unchanged.
    pub async fn confirm_delete_subject(&mut self) -> Result<(), SessionError> {
        let Some(id) = self.pending_delete_subject.take() else {
            return Ok(());
        };
        self.close_open_overlay();
        match self.catalog.delete(id).await {
            Ok(()) => {
                self.cursor.back();
                self.refresh_cards().await;
                Ok(())
            }
            Err(err) => {
                self.note_catalog("delete subject", &err);
                Err(err.into())
            }
        }
    }

    //
    // ─── CARDS ─────────────────────────────────────────────────────────────────
    //

    /// Creates a card in the selected subject; the new card joins the
    /// working set immediately from the backend's response.
    ///
    /// # Errors
    ///
    /// `NoSubjectSelected` when nothing is selected; validation errors
    /// before any network call; backend failures also queue a notice.
    pub async fn create_card(&mut self, draft: CardDraft) -> Result<(), SessionError> {
        let subject = self.selected_subject_cloned()?;
        match self.gateway.create(&subject, draft).await {
            Ok(card) => {
                if self.catalog.selected() == Some(subject.id()) {
                    self.remote_cards.push(card);
                    self.remote_subject = Some(subject.id());
                    self.rebuild_cards();
                }
                Ok(())
            }
            Err(err) => {
                self.note_gateway("create card", &err);
                Err(err.into())
            }
        }
    }

    /// Replaces a card's fields from the backend's authoritative response.
    ///
    /// # Errors
    ///
    /// `SeedImmutable` for demonstration cards, validation errors before
    /// any network call, backend failures with a queued notice.
    pub async fn update_card(
        &mut self,
        source: CardSource,
        draft: CardDraft,
    ) -> Result<(), SessionError> {
        let subject = self.selected_subject_cloned()?;
        match self.gateway.update(&subject, source, draft).await {
            Ok(card) => {
                if self.catalog.selected() == Some(subject.id()) {
                    if let Some(slot) = self
                        .remote_cards
                        .iter_mut()
                        .find(|candidate| candidate.source() == source)
                    {
                        *slot = card;
                    }
                    self.rebuild_cards();
                    // The edit may have moved the card out of the filter.
                    self.cursor.card_removed(self.filtered().len());
                }
                Ok(())
            }
            Err(err) => {
                self.note_gateway("update card", &err);
                Err(err.into())
            }
        }
    }

    /// Asks for confirmation before deleting the card on screen.
    ///
    /// # Errors
    ///
    /// `NoCurrentCard` while browsing; `SeedImmutable` for demonstration
    /// cards, without opening the dialog.
    pub fn request_delete_card(&mut self, opener: Control) -> Result<(), SessionError> {
        let source = self.current_card().ok_or(SessionError::NoCurrentCard)?.source();
        if source.is_seed() {
            return Err(GatewayError::SeedImmutable.into());
        }
        self.pending_delete_card = Some(source);
        self.open_overlay(Overlay::DeleteCard, opener);
        Ok(())
    }

    /// Deletes the card awaiting confirmation, then re-establishes the
    /// cursor invariant over the shrunk filtered set.
    ///
    /// # Errors
    ///
    /// Backend failures are returned and queued as a notice; the working
    /// set is left unchanged.
    pub async fn confirm_delete_card(&mut self) -> Result<(), SessionError> {
        let Some(source) = self.pending_delete_card.take() else {
            return Ok(());
        };
        self.close_open_overlay();
        match self.gateway.delete(source).await {
            Ok(()) => {
                self.remote_cards.retain(|card| card.source() != source);
                self.rebuild_cards();
                self.cursor.card_removed(self.filtered().len());
                Ok(())
            }
            Err(err) => {
                self.note_gateway("delete card", &err);
                Err(err.into())
            }
        }
    }

    /// Closes a pending confirmation dialog without acting.
    pub fn cancel_delete(&mut self) -> Option<Control> {
        self.pending_delete_card = None;
        self.pending_delete_subject = None;
        self.close_open_overlay()
    }

    //
    // ─── STUDY SESSION ─────────────────────────────────────────────────────────
    //

    /// Enters the studying state at the first filtered card.
    ///
    /// # Errors
    ///
    /// `CursorError::EmptySet` when no card matches the difficulty.
    pub fn start_studying(&mut self) -> Result<(), SessionError> {
        let count = self.filtered().len();
        self.cursor.start(count)?;
        Ok(())
    }

    pub fn next_card(&mut self) {
        let count = self.filtered().len();
        self.cursor.next(count);
    }

    pub fn previous_card(&mut self) {
        let count = self.filtered().len();
        self.cursor.previous(count);
    }

    pub fn toggle_answer(&mut self) {
        self.cursor.toggle_answer();
    }

    pub fn back_to_browsing(&mut self) {
        self.cursor.back();
    }

    /// Switches the difficulty filter. Mid-session the cursor restarts at
    /// the first card of the new filtered set, or returns to browsing
    /// when the set is empty.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty == difficulty {
            return;
        }
        self.difficulty = difficulty;
        if self.cursor.is_studying() {
            let count = self.filtered().len();
            if self.cursor.start(count).is_err() {
                self.cursor.back();
            }
        }
    }

    //
    // ─── OVERLAYS AND KEYBOARD ─────────────────────────────────────────────────
    //

    /// Opens an overlay, replacing whatever was open.
    pub fn open_overlay(&mut self, overlay: Overlay, opener: Control) {
        self.overlay.open(overlay, opener, focusable_controls(overlay));
    }

    /// Closes the open overlay, clearing any pending confirmation, and
    /// yields the control focus returns to.
    pub fn close_overlay(&mut self) -> Option<Control> {
        match self.overlay.current() {
            Some(Overlay::DeleteCard) => self.pending_delete_card = None,
            Some(Overlay::DeleteSubject) => self.pending_delete_subject = None,
            _ => {}
        }
        self.close_open_overlay()
    }

    /// The control focus should land on after the most recent overlay
    /// close, consumed by the view once acted on.
    pub fn take_focus_return(&mut self) -> Option<Control> {
        self.focus_return.take()
    }

    /// Routes a key event and applies the resulting intent.
    ///
    /// Returns the applied intent so the caller can mark the event as
    /// consumed, or `None` when the key falls through to the browser.
    pub fn handle_key(
        &mut self,
        event: KeyEvent,
        focus: FocusContext,
    ) -> Option<SessionIntent> {
        let intent = route_key(
            event,
            focus,
            self.overlay.current(),
            self.cursor.is_studying(),
        )?;
        match intent {
            SessionIntent::PreviousCard => self.previous_card(),
            SessionIntent::NextCard => self.next_card(),
            SessionIntent::ToggleAnswer => self.toggle_answer(),
            SessionIntent::BackToBrowsing => self.back_to_browsing(),
            SessionIntent::OpenAddCard => {
                self.open_overlay(Overlay::AddCard, Control::Flashcard);
            }
            SessionIntent::ToggleHelp => {
                if self.overlay.current() == Some(Overlay::Help) {
                    self.close_open_overlay();
                } else {
                    self.open_overlay(Overlay::Help, Control::HelpButton);
                }
            }
            SessionIntent::CloseOverlay => {
                self.close_overlay();
            }
            SessionIntent::FocusNext => self.overlay.focus_next(),
            SessionIntent::FocusPrevious => self.overlay.focus_previous(),
        }
        Some(intent)
    }

    //
    // ─── VIEW ACCESSORS ────────────────────────────────────────────────────────
    //

    /// The whole working set: demonstration cards first, then backend
    /// cards in fetch order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The working set narrowed to the current difficulty, the set the
    /// cursor moves over.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Card> {
        filter_cards(&self.cards, self.difficulty)
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        let index = self.cursor.index()?;
        self.filtered().get(index).copied()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn is_studying(&self) -> bool {
        self.cursor.is_studying()
    }

    #[must_use]
    pub fn answer_revealed(&self) -> bool {
        self.cursor.answer_revealed()
    }

    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.cursor.progress(self.filtered().len())
    }

    #[must_use]
    pub fn position_label(&self) -> Option<String> {
        self.cursor.position_label(self.filtered().len())
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        self.catalog.subjects()
    }

    /// Subject names contributed by the demonstration cards, shown in the
    /// catalog even when the backend has no decks.
    #[must_use]
    pub fn seed_subject_names(&self) -> Vec<String> {
        seed::demo_subject_names()
    }

    #[must_use]
    pub fn selected_subject(&self) -> Option<&Subject> {
        self.catalog.selected_subject()
    }

    #[must_use]
    pub fn open_overlay_kind(&self) -> Option<Overlay> {
        self.overlay.current()
    }

    #[must_use]
    pub fn focused_control(&self) -> Option<usize> {
        self.overlay.focused()
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hands the queued notices to the caller for display.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn close_open_overlay(&mut self) -> Option<Control> {
        let opener = self.overlay.close();
        if opener.is_some() {
            self.focus_return = opener;
        }
        opener
    }

    fn selected_subject_cloned(&self) -> Result<Subject, SessionError> {
        self.catalog
            .selected_subject()
            .cloned()
            .ok_or(SessionError::NoSubjectSelected)
    }

    /// Recombines the working set. Demonstration cards are visible when no
    /// subject is selected or when the selected subject shares their name,
    /// so the demo deck merges with a real deck of the same name.
    fn rebuild_cards(&mut self) {
        let selected_name = self
            .catalog
            .selected_subject()
            .map(|subject| subject.name().to_owned());
        self.cards = self
            .seed_cards
            .iter()
            .filter(|card| match &selected_name {
                None => true,
                Some(name) => card.subject_name() == name,
            })
            .chain(self.remote_cards.iter())
            .cloned()
            .collect();
    }

    fn note_store(&mut self, operation: &'static str, err: &StoreError) {
        self.notices.push(Notice::from_store(operation, err));
    }

    fn note_catalog(&mut self, operation: &'static str, err: &CatalogError) {
        if let CatalogError::Store(store) = err {
            self.note_store(operation, store);
        }
    }

    fn note_gateway(&mut self, operation: &'static str, err: &GatewayError) {
        if let GatewayError::Store(store) = err {
            self.note_store(operation, store);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::notice::Severity;
    use study_core::model::{CardId, SubjectDraft};
    use study_core::session::Key;
    use study_remote::{CardRecord, InMemoryStore, NewCardRecord};

    /// In-memory store whose card listing can be made to fail, standing
    /// in for a backend that went away mid-session.
    struct FlakyStore {
        inner: InMemoryStore,
        fail_card_lists: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: InMemoryStore::new(),
                fail_card_lists: AtomicBool::new(false),
            }
        }

        fn fail_card_lists(&self) {
            self.fail_card_lists.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SubjectStore for FlakyStore {
        async fn list_subjects(&self, owner: StudentId) -> Result<Vec<Subject>, StoreError> {
            self.inner.list_subjects(owner).await
        }

        async fn create_subject(&self, draft: &SubjectDraft) -> Result<Subject, StoreError> {
            self.inner.create_subject(draft).await
        }

        async fn delete_subject(&self, id: SubjectId) -> Result<(), StoreError> {
            self.inner.delete_subject(id).await
        }
    }

    #[async_trait]
    impl CardStore for FlakyStore {
        async fn list_cards(&self, subject: SubjectId) -> Result<Vec<CardRecord>, StoreError> {
            if self.fail_card_lists.load(Ordering::SeqCst) {
                return Err(StoreError::Unreachable("connection refused".into()));
            }
            self.inner.list_cards(subject).await
        }

        async fn create_card(&self, record: &NewCardRecord) -> Result<CardRecord, StoreError> {
            self.inner.create_card(record).await
        }

        async fn update_card(
            &self,
            id: CardId,
            record: &NewCardRecord,
        ) -> Result<CardRecord, StoreError> {
            self.inner.update_card(id, record).await
        }

        async fn delete_card(&self, id: CardId) -> Result<(), StoreError> {
            self.inner.delete_card(id).await
        }
    }

    fn controller_on_flaky(store: &Arc<FlakyStore>) -> StudySessionController {
        let subjects: Arc<dyn SubjectStore> = store.clone();
        let cards: Arc<dyn CardStore> = store.clone();
        StudySessionController::new(subjects, cards, StudentId::new(1))
    }

    fn controller_on(store: &Arc<InMemoryStore>) -> StudySessionController {
        let subjects: Arc<dyn SubjectStore> = store.clone();
        let cards: Arc<dyn CardStore> = store.clone();
        StudySessionController::new(subjects, cards, StudentId::new(1))
    }

    fn draft(question: &str, difficulty: Difficulty) -> CardDraft {
        CardDraft {
            topic: String::new(),
            difficulty,
            question: question.into(),
            answer: "A".into(),
        }
    }

    #[tokio::test]
    async fn fresh_controller_shows_the_demo_card() {
        let store = Arc::new(InMemoryStore::new());
        let controller = controller_on(&store);

        assert_eq!(controller.cards().len(), 1);
        assert!(controller.cards()[0].is_seed());
        assert_eq!(controller.filtered().len(), 1);
    }

    #[tokio::test]
    async fn selecting_a_subject_hides_unrelated_demo_cards() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        let id = controller.create_subject("Rust", "").await.unwrap();

        assert_eq!(controller.selected_subject().unwrap().id(), id);
        assert!(controller.cards().is_empty());
    }

    #[tokio::test]
    async fn demo_cards_merge_with_a_deck_of_the_same_name() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        controller
            .create_subject("Artificial Intelligence", "")
            .await
            .unwrap();
        controller
            .create_card(draft("What is a transformer?", Difficulty::Easy))
            .await
            .unwrap();

        assert_eq!(controller.cards().len(), 2);
        assert!(controller.cards()[0].is_seed());
        assert!(!controller.cards()[1].is_seed());
    }

    #[tokio::test]
    async fn created_card_is_visible_without_a_refetch() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        controller.create_subject("Rust", "").await.unwrap();
        controller
            .create_card(draft("What is a borrow?", Difficulty::Easy))
            .await
            .unwrap();

        assert_eq!(controller.cards().len(), 1);
        assert_eq!(controller.cards()[0].question(), "What is a borrow?");
    }

    #[tokio::test]
    async fn create_card_without_a_subject_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        let err = controller
            .create_card(draft("Q", Difficulty::Easy))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NoSubjectSelected));
    }

    #[tokio::test]
    async fn arrow_keys_cycle_and_hide_the_answer() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        controller.create_subject("Rust", "").await.unwrap();
        controller.create_card(draft("q1", Difficulty::Easy)).await.unwrap();
        controller.create_card(draft("q2", Difficulty::Easy)).await.unwrap();
        controller.start_studying().unwrap();

        controller.handle_key(KeyEvent::plain(Key::Char('s')), FocusContext::General);
        assert!(controller.answer_revealed());

        controller.handle_key(KeyEvent::plain(Key::ArrowRight), FocusContext::General);
        assert_eq!(controller.current_card().unwrap().question(), "q2");
        assert!(!controller.answer_revealed());

        controller.handle_key(KeyEvent::plain(Key::ArrowRight), FocusContext::General);
        assert_eq!(controller.current_card().unwrap().question(), "q1");
    }

    #[tokio::test]
    async fn switching_difficulty_mid_session_restarts_or_exits() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        controller.create_subject("Rust", "").await.unwrap();
        controller.create_card(draft("easy", Difficulty::Easy)).await.unwrap();
        controller.create_card(draft("hard", Difficulty::Hard)).await.unwrap();
        controller.start_studying().unwrap();

        controller.set_difficulty(Difficulty::Hard);
        assert!(controller.is_studying());
        assert_eq!(controller.current_card().unwrap().question(), "hard");

        controller.set_difficulty(Difficulty::Medium);
        assert!(!controller.is_studying());
    }

    #[tokio::test]
    async fn deleting_the_last_card_returns_to_browsing() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        controller.create_subject("Rust", "").await.unwrap();
        controller.create_card(draft("only", Difficulty::Easy)).await.unwrap();
        controller.start_studying().unwrap();

        controller.request_delete_card(Control::Flashcard).unwrap();
        assert_eq!(controller.open_overlay_kind(), Some(Overlay::DeleteCard));
        controller.confirm_delete_card().await.unwrap();

        assert!(!controller.is_studying());
        assert!(controller.filtered().is_empty());
        assert_eq!(controller.open_overlay_kind(), None);
    }

    #[tokio::test]
    async fn demo_cards_cannot_be_deleted() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        controller.start_studying().unwrap();

        let err = controller.request_delete_card(Control::Flashcard).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Gateway(GatewayError::SeedImmutable)
        ));
        assert_eq!(controller.open_overlay_kind(), None);
    }

    #[tokio::test]
    async fn escape_closes_the_delete_dialog_without_deleting() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        controller.create_subject("Rust", "").await.unwrap();
        controller.create_card(draft("keep", Difficulty::Easy)).await.unwrap();
        controller.start_studying().unwrap();
        controller.request_delete_card(Control::Flashcard).unwrap();

        controller.handle_key(KeyEvent::plain(Key::Escape), FocusContext::General);
        assert_eq!(controller.open_overlay_kind(), None);

        controller.confirm_delete_card().await.unwrap();
        assert_eq!(controller.filtered().len(), 1);
    }

    #[tokio::test]
    async fn question_mark_toggles_the_help_overlay() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);

        controller.handle_key(KeyEvent::plain(Key::Char('?')), FocusContext::General);
        assert_eq!(controller.open_overlay_kind(), Some(Overlay::Help));
        controller.handle_key(KeyEvent::plain(Key::Char('?')), FocusContext::General);
        assert_eq!(controller.open_overlay_kind(), None);
    }

    #[tokio::test]
    async fn deleting_the_selected_subject_reselects_and_refetches() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        let first = controller.create_subject("First", "").await.unwrap();
        controller.create_subject("Second", "").await.unwrap();
        assert!(controller.select_subject(first).await);
        controller.create_card(draft("gone", Difficulty::Easy)).await.unwrap();

        controller.request_delete_subject(first, Control::SubjectsButton);
        controller.confirm_delete_subject().await.unwrap();

        assert_eq!(controller.selected_subject().unwrap().name(), "Second");
        assert!(controller.cards().is_empty());
    }

    #[tokio::test]
    async fn backend_rejection_queues_a_blocking_notice() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        controller.create_subject("Maths", "").await.unwrap();

        let err = controller.create_subject("Maths", "").await.unwrap_err();
        assert!(!err.is_validation());

        let notices = controller.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity(), Severity::Blocking);
        assert_eq!(notices[0].operation(), Some("create subject"));
    }

    #[tokio::test]
    async fn refresh_failure_keeps_the_last_known_cards() {
        let store = Arc::new(FlakyStore::new());
        let mut controller = controller_on_flaky(&store);
        controller.create_subject("Rust", "").await.unwrap();
        controller.create_card(draft("kept", Difficulty::Easy)).await.unwrap();
        assert_eq!(controller.cards().len(), 1);

        store.fail_card_lists();
        controller.load().await;

        assert_eq!(controller.cards().len(), 1);
        assert_eq!(controller.cards()[0].question(), "kept");
        let notices = controller.drain_notices();
        assert!(notices.iter().any(|n| n.severity() == Severity::Banner));
    }

    #[tokio::test]
    async fn refresh_failure_never_shows_another_subjects_cards() {
        let store = Arc::new(FlakyStore::new());
        let mut controller = controller_on_flaky(&store);
        let first = controller.create_subject("First", "").await.unwrap();
        controller.create_card(draft("mine", Difficulty::Easy)).await.unwrap();
        let second = controller.create_subject("Second", "").await.unwrap();
        assert!(controller.select_subject(first).await);
        assert_eq!(controller.cards().len(), 1);

        store.fail_card_lists();
        assert!(controller.select_subject(second).await);

        // The first subject's cards must not appear under the second.
        assert!(controller.cards().is_empty());
        let notices = controller.drain_notices();
        assert!(notices.iter().any(|n| n.severity() == Severity::Banner));
    }

    #[tokio::test]
    async fn escape_returns_focus_to_the_overlay_opener() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);
        controller.create_subject("Rust", "").await.unwrap();
        controller.create_card(draft("q", Difficulty::Easy)).await.unwrap();
        controller.start_studying().unwrap();

        controller.handle_key(KeyEvent::plain(Key::Char('a')), FocusContext::General);
        assert_eq!(controller.open_overlay_kind(), Some(Overlay::AddCard));
        controller.handle_key(KeyEvent::plain(Key::Escape), FocusContext::General);

        assert_eq!(controller.take_focus_return(), Some(Control::Flashcard));
        assert_eq!(controller.take_focus_return(), None);
    }

    #[tokio::test]
    async fn closing_help_returns_focus_to_the_help_button() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);

        controller.handle_key(KeyEvent::plain(Key::Char('?')), FocusContext::General);
        assert!(controller.take_focus_return().is_none());
        controller.handle_key(KeyEvent::plain(Key::Char('?')), FocusContext::General);
        assert_eq!(controller.take_focus_return(), Some(Control::HelpButton));
    }

    #[tokio::test]
    async fn empty_subject_name_is_caught_locally_without_a_notice() {
        let store = Arc::new(InMemoryStore::new());
        let mut controller = controller_on(&store);

        let err = controller.create_subject("  ", "").await.unwrap_err();
        assert!(err.is_validation());
        assert!(controller.notices().is_empty());
    }
}
