//! View/filter/edit controller
//!
//! Owns the transient UI session state and mediates every user-triggered
//! mutation. The controller never mutates the item collection itself: each
//! successful operation issues exactly one external write per affected item
//! and trusts the feed to push the authoritative state back. The visible
//! latency between "save" and "row updates" is accepted behavior.

use std::sync::Arc;

use inventaire_domain::{InventaireError, Item, ItemDraft, ItemRecord, Location, Result};
use tracing::{debug, info, warn};

use super::ports::{CategoryStore, ItemStore};
use super::view::{self, UiState};

/// Result of a category rename cascade.
///
/// In the shared variant a session can see every item but may only rewrite
/// its own, so a rename leaves foreign items on the old name. The counts
/// make that split explicit instead of silent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameOutcome {
    /// Owned items rewritten to the new category name
    pub updated: usize,
    /// Visible items left untouched because another session owns them
    pub skipped_foreign: usize,
    /// Owned items whose rewrite failed (logged, not retried)
    pub failed: usize,
}

/// One rendered frame: visible rows plus the derived filter options
#[derive(Debug)]
pub struct RenderedView<'a> {
    pub rows: Vec<&'a Item>,
    pub team_leader_options: Vec<String>,
}

/// Session-scoped inventory controller
pub struct InventoryController {
    session: String,
    categories: Vec<String>,
    state: UiState,
    items: Arc<dyn ItemStore>,
    category_store: Arc<dyn CategoryStore>,
}

impl InventoryController {
    /// Create a controller for an authenticated session.
    ///
    /// `categories` is the session's category set as loaded at login.
    pub fn new(
        session: impl Into<String>,
        categories: Vec<String>,
        items: Arc<dyn ItemStore>,
        category_store: Arc<dyn CategoryStore>,
    ) -> Self {
        Self {
            session: session.into(),
            categories,
            state: UiState::default(),
            items,
            category_store,
        }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn active_tab(&self) -> Location {
        self.state.active_tab
    }

    pub fn set_active_tab(&mut self, tab: Location) {
        self.state.active_tab = tab;
    }

    /// `None` means "All"
    pub fn set_category_filter(&mut self, category: Option<String>) {
        self.state.filters.category = category;
    }

    /// `None` means "All"
    pub fn set_team_leader_filter(&mut self, team_leader: Option<String>) {
        self.state.filters.team_leader = team_leader;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.filters.search = search.into();
    }

    /// Reset UI state to defaults (logout path)
    pub fn reset(&mut self) {
        self.state = UiState::default();
    }

    /// Compute one frame from the current snapshot.
    ///
    /// The team-leader options are re-derived from the collection first; a
    /// previously selected leader that is no longer present resets the
    /// filter to "All" before the rows are computed.
    pub fn render<'a>(&mut self, items: &'a [Item]) -> RenderedView<'a> {
        let team_leader_options = view::team_leader_options(items, self.state.active_tab);
        self.state.filters.team_leader =
            view::reconcile_selection(self.state.filters.team_leader.take(), &team_leader_options);

        let rows = view::visible_rows(items, &self.state);
        RenderedView { rows, team_leader_options }
    }

    /// Open the edit form for an existing item.
    ///
    /// Returns the prefilled draft, or `NotFound` when the identity is no
    /// longer in the collection (deleted by another session meanwhile).
    pub fn begin_edit(&mut self, identity: &str, items: &[Item]) -> Result<ItemDraft> {
        let item = items
            .iter()
            .find(|i| i.identity == identity)
            .ok_or_else(|| InventaireError::NotFound("item not found".to_string()))?;

        self.state.edit_target = Some(identity.to_string());
        Ok(ItemDraft::from(item))
    }

    pub fn cancel_edit(&mut self) {
        self.state.edit_target = None;
    }

    /// Validate the draft and issue exactly one external write.
    ///
    /// With an active edit target this is an update-by-identity; otherwise a
    /// create owned by the current session. The collection is never touched
    /// locally; the feed echoes the change back. On success the edit form
    /// is considered closed (edit target cleared).
    pub async fn save_item(&mut self, draft: &ItemDraft, items: &[Item]) -> Result<()> {
        let record_base = self.validate_draft(draft)?;

        match self.state.edit_target.clone() {
            Some(target) => {
                // The item may have been deleted between modal-open and
                // save; writing would create a new, wrong record.
                let existing = items
                    .iter()
                    .find(|i| i.identity == target)
                    .ok_or_else(|| InventaireError::NotFound("item not found".to_string()))?;

                let record = ItemRecord { owner: existing.owner.clone(), ..record_base };
                let identity = self.items.write_item(Some(&target), &record).await?;
                debug!(identity = %identity, "item updated");
            }
            None => {
                let record = ItemRecord { owner: self.session.clone(), ..record_base };
                let identity = self.items.write_item(None, &record).await?;
                debug!(identity = %identity, "item created");
            }
        }

        self.state.edit_target = None;
        Ok(())
    }

    /// Issue one external delete; the row disappears on the next push.
    pub async fn delete_item(&self, identity: &str) -> Result<()> {
        self.items.delete_item(identity).await
    }

    /// Add a category and persist the updated set.
    pub async fn add_category(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InventaireError::Validation("category name is required".to_string()));
        }
        if self.categories.iter().any(|c| c == name) {
            return Err(InventaireError::Validation("category already exists".to_string()));
        }

        let mut next = self.categories.clone();
        next.push(name.to_string());
        self.category_store.write_category_set(&self.session, &next).await?;
        self.categories = next;
        Ok(())
    }

    /// Rename a category and cascade the new name onto every owned item
    /// still referencing the old one, one write per item.
    ///
    /// Foreign items stay on the old name: a session may see all items but
    /// only rewrite the ones it created.
    pub async fn rename_category(
        &mut self,
        old_name: &str,
        new_name: &str,
        items: &[Item],
    ) -> Result<RenameOutcome> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(InventaireError::Validation("category name is required".to_string()));
        }
        if new_name == old_name {
            debug!(category = old_name, "rename to identical name, nothing to do");
            return Ok(RenameOutcome::default());
        }
        if self.categories.iter().any(|c| c == new_name) {
            return Err(InventaireError::Validation("category already exists".to_string()));
        }

        let position = self
            .categories
            .iter()
            .position(|c| c == old_name)
            .ok_or_else(|| InventaireError::NotFound(format!("unknown category: {old_name}")))?;

        let mut next = self.categories.clone();
        next[position] = new_name.to_string();
        self.category_store.write_category_set(&self.session, &next).await?;

        let mut outcome = RenameOutcome::default();
        for item in items.iter().filter(|i| i.category == old_name) {
            if item.owner != self.session {
                outcome.skipped_foreign += 1;
                continue;
            }

            let mut record = item.to_record();
            record.category = new_name.to_string();
            match self.items.write_item(Some(&item.identity), &record).await {
                Ok(_) => outcome.updated += 1,
                Err(err) => {
                    // Matches the original behavior: individual cascade
                    // failures do not abort the rename.
                    warn!(identity = %item.identity, error = %err, "category cascade write failed");
                    outcome.failed += 1;
                }
            }
        }

        self.categories = next;
        info!(
            old = old_name,
            new = new_name,
            updated = outcome.updated,
            skipped_foreign = outcome.skipped_foreign,
            failed = outcome.failed,
            "category renamed"
        );
        Ok(outcome)
    }

    /// Delete a category, refused while any owned item still references it.
    ///
    /// Foreign items referencing the category are intentionally not checked;
    /// the ownership model scopes the guard to what this session can
    /// rewrite.
    pub async fn delete_category(&mut self, name: &str, items: &[Item]) -> Result<()> {
        let position = self
            .categories
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| InventaireError::NotFound(format!("unknown category: {name}")))?;

        let in_use = items.iter().any(|i| i.category == name && i.owner == self.session);
        if in_use {
            return Err(InventaireError::Validation(
                "category is used by at least one of your items".to_string(),
            ));
        }

        let mut next = self.categories.clone();
        next.remove(position);
        self.category_store.write_category_set(&self.session, &next).await?;
        self.categories = next;
        Ok(())
    }

    /// Draft validation; returns the writable record with a placeholder
    /// owner (the caller fills it in per create/update path).
    fn validate_draft(&self, draft: &ItemDraft) -> Result<ItemRecord> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(InventaireError::Validation("a name is required".to_string()));
        }

        if !self.categories.iter().any(|c| c == &draft.category) {
            return Err(InventaireError::Validation(format!(
                "unknown category: {}",
                draft.category
            )));
        }

        let quantity = draft
            .quantity
            .trim()
            .parse::<i64>()
            .map_err(|_| InventaireError::Validation("invalid quantity".to_string()))?;
        let quantity = u32::try_from(quantity)
            .map_err(|_| InventaireError::Validation("invalid quantity".to_string()))?;

        Ok(ItemRecord {
            owner: String::new(),
            name: name.to_string(),
            category: draft.category.clone(),
            quantity,
            date: optional(&draft.date),
            site: optional(&draft.site),
            team_leader: optional(&draft.team_leader),
            location: draft.location.unwrap_or(self.state.active_tab),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use inventaire_domain::constants::default_categories;
    use inventaire_domain::Result as DomainResult;
    use tokio::sync::Mutex as TokioMutex;

    use super::*;

    type WriteLog = TokioMutex<Vec<(Option<String>, ItemRecord)>>;

    #[derive(Default)]
    struct MockItemStore {
        writes: WriteLog,
        deletes: TokioMutex<Vec<String>>,
        fail_writes: bool,
    }

    impl MockItemStore {
        fn failing() -> Self {
            Self { fail_writes: true, ..Self::default() }
        }

        async fn writes(&self) -> Vec<(Option<String>, ItemRecord)> {
            self.writes.lock().await.clone()
        }
    }

    #[async_trait]
    impl ItemStore for MockItemStore {
        async fn write_item(
            &self,
            identity: Option<&str>,
            record: &ItemRecord,
        ) -> DomainResult<String> {
            if self.fail_writes {
                return Err(InventaireError::Write("store unavailable".to_string()));
            }
            self.writes.lock().await.push((identity.map(str::to_string), record.clone()));
            Ok(identity.unwrap_or("assigned-1").to_string())
        }

        async fn delete_item(&self, identity: &str) -> DomainResult<()> {
            self.deletes.lock().await.push(identity.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockCategoryStore {
        saved: TokioMutex<Vec<Vec<String>>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl CategoryStore for MockCategoryStore {
        async fn read_category_set(&self, _session: &str) -> DomainResult<Vec<String>> {
            Ok(default_categories())
        }

        async fn write_category_set(
            &self,
            _session: &str,
            categories: &[String],
        ) -> DomainResult<()> {
            if self.fail_writes {
                return Err(InventaireError::Write("store unavailable".to_string()));
            }
            self.saved.lock().await.push(categories.to_vec());
            Ok(())
        }
    }

    fn controller_with(
        items: Arc<MockItemStore>,
        categories: Arc<MockCategoryStore>,
    ) -> InventoryController {
        InventoryController::new("user-1", default_categories(), items, categories)
    }

    fn stored_item(identity: &str, owner: &str, category: &str, leader: Option<&str>) -> Item {
        Item {
            identity: identity.to_string(),
            owner: owner.to_string(),
            name: "Perceuse".to_string(),
            category: category.to_string(),
            quantity: 3,
            date: None,
            site: None,
            team_leader: leader.map(str::to_string),
            location: Location::Chantier,
        }
    }

    fn draft(name: &str, quantity: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            category: "Visseuses".to_string(),
            quantity: quantity.to_string(),
            ..ItemDraft::default()
        }
    }

    #[tokio::test]
    async fn save_rejects_negative_quantity_without_writing() {
        // Scenario D: quantity "-1" blocks the write, modal stays open
        let store = Arc::new(MockItemStore::default());
        let mut controller = controller_with(store.clone(), Arc::new(MockCategoryStore::default()));
        let items = vec![stored_item("item-1", "user-1", "Visseuses", None)];
        controller.begin_edit("item-1", &items).unwrap();

        let err = controller.save_item(&draft("Perceuse", "-1"), &items).await.unwrap_err();
        assert!(matches!(err, InventaireError::Validation(_)));
        assert!(store.writes().await.is_empty());
        assert_eq!(controller.state().edit_target.as_deref(), Some("item-1"));
    }

    #[tokio::test]
    async fn save_rejects_blank_name_and_unknown_category() {
        let store = Arc::new(MockItemStore::default());
        let mut controller = controller_with(store.clone(), Arc::new(MockCategoryStore::default()));

        let err = controller.save_item(&draft("   ", "2"), &[]).await.unwrap_err();
        assert!(matches!(err, InventaireError::Validation(_)));

        let mut bad_category = draft("Perceuse", "2");
        bad_category.category = "Inconnue".to_string();
        let err = controller.save_item(&bad_category, &[]).await.unwrap_err();
        assert!(matches!(err, InventaireError::Validation(_)));

        assert!(store.writes().await.is_empty());
    }

    #[tokio::test]
    async fn create_defaults_location_to_active_tab_and_owner_to_session() {
        let store = Arc::new(MockItemStore::default());
        let mut controller = controller_with(store.clone(), Arc::new(MockCategoryStore::default()));
        controller.set_active_tab(Location::Atelier);

        let mut d = draft("  Perceuse  ", "4");
        d.site = "  ".to_string();
        controller.save_item(&d, &[]).await.unwrap();

        let writes = store.writes().await;
        assert_eq!(writes.len(), 1);
        let (identity, record) = &writes[0];
        assert!(identity.is_none());
        assert_eq!(record.owner, "user-1");
        assert_eq!(record.name, "Perceuse");
        assert_eq!(record.quantity, 4);
        assert_eq!(record.location, Location::Atelier);
        assert_eq!(record.site, None);
    }

    #[tokio::test]
    async fn update_preserves_original_owner_and_closes_edit() {
        let store = Arc::new(MockItemStore::default());
        let mut controller = controller_with(store.clone(), Arc::new(MockCategoryStore::default()));
        let items = vec![stored_item("item-9", "user-2", "Visseuses", None)];

        controller.begin_edit("item-9", &items).unwrap();
        controller.save_item(&draft("Perceuse", "7"), &items).await.unwrap();

        let writes = store.writes().await;
        assert_eq!(writes.len(), 1);
        let (identity, record) = &writes[0];
        assert_eq!(identity.as_deref(), Some("item-9"));
        // Shared variant: editing a foreign item keeps its creator as owner
        assert_eq!(record.owner, "user-2");
        assert!(controller.state().edit_target.is_none());
    }

    #[tokio::test]
    async fn saving_a_vanished_edit_target_fails_without_writing() {
        let store = Arc::new(MockItemStore::default());
        let mut controller = controller_with(store.clone(), Arc::new(MockCategoryStore::default()));
        let before = vec![stored_item("item-1", "user-1", "Visseuses", None)];
        controller.begin_edit("item-1", &before).unwrap();

        // Another session deleted the item between modal-open and save
        let err = controller.save_item(&draft("Perceuse", "2"), &[]).await.unwrap_err();
        assert!(matches!(err, InventaireError::NotFound(_)));
        assert!(store.writes().await.is_empty());
    }

    #[tokio::test]
    async fn begin_edit_unknown_identity_is_not_found() {
        let mut controller = controller_with(
            Arc::new(MockItemStore::default()),
            Arc::new(MockCategoryStore::default()),
        );
        let err = controller.begin_edit("missing", &[]).unwrap_err();
        assert!(matches!(err, InventaireError::NotFound(_)));
        assert!(controller.state().edit_target.is_none());
    }

    #[tokio::test]
    async fn failed_write_leaves_edit_target_in_place() {
        let store = Arc::new(MockItemStore::failing());
        let mut controller = controller_with(store, Arc::new(MockCategoryStore::default()));
        let items = vec![stored_item("item-1", "user-1", "Visseuses", None)];
        controller.begin_edit("item-1", &items).unwrap();

        let err = controller.save_item(&draft("Perceuse", "2"), &items).await.unwrap_err();
        assert!(matches!(err, InventaireError::Write(_)));
        assert_eq!(controller.state().edit_target.as_deref(), Some("item-1"));
    }

    #[tokio::test]
    async fn rename_cascades_only_owned_items() {
        let store = Arc::new(MockItemStore::default());
        let category_store = Arc::new(MockCategoryStore::default());
        let mut controller = controller_with(store.clone(), category_store.clone());
        let items = vec![
            stored_item("mine", "user-1", "Rivets", None),
            stored_item("theirs", "user-2", "Rivets", None),
            stored_item("other-cat", "user-1", "Batteries", None),
        ];

        let outcome = controller.rename_category("Rivets", "Rivets inox", &items).await.unwrap();
        assert_eq!(outcome, RenameOutcome { updated: 1, skipped_foreign: 1, failed: 0 });

        let writes = store.writes().await;
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0.as_deref(), Some("mine"));
        assert_eq!(writes[0].1.category, "Rivets inox");

        // Position preserved in the stored set
        let saved = category_store.saved.lock().await;
        let position = saved[0].iter().position(|c| c == "Rivets inox");
        assert_eq!(position, default_categories().iter().position(|c| c == "Rivets"));
        assert!(controller.categories().iter().any(|c| c == "Rivets inox"));
        assert!(!controller.categories().iter().any(|c| c == "Rivets"));
    }

    #[tokio::test]
    async fn rename_to_existing_name_is_rejected() {
        let mut controller = controller_with(
            Arc::new(MockItemStore::default()),
            Arc::new(MockCategoryStore::default()),
        );
        let err = controller.rename_category("Rivets", "Batteries", &[]).await.unwrap_err();
        assert!(matches!(err, InventaireError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_category_refused_while_an_owned_item_uses_it() {
        // Scenario C: owned item on "Rivets" blocks the delete
        let category_store = Arc::new(MockCategoryStore::default());
        let mut controller =
            controller_with(Arc::new(MockItemStore::default()), category_store.clone());
        let items = vec![stored_item("mine", "user-1", "Rivets", None)];

        let err = controller.delete_category("Rivets", &items).await.unwrap_err();
        assert!(matches!(err, InventaireError::Validation(_)));
        assert!(category_store.saved.lock().await.is_empty());
        assert!(controller.categories().iter().any(|c| c == "Rivets"));
    }

    #[tokio::test]
    async fn delete_category_ignores_foreign_usage() {
        // Intentional ownership scope: other sessions' items are not checked
        let mut controller = controller_with(
            Arc::new(MockItemStore::default()),
            Arc::new(MockCategoryStore::default()),
        );
        let items = vec![stored_item("theirs", "user-2", "Rivets", None)];

        controller.delete_category("Rivets", &items).await.unwrap();
        assert!(!controller.categories().iter().any(|c| c == "Rivets"));
    }

    #[tokio::test]
    async fn add_category_rejects_duplicates_and_blank_names() {
        let mut controller = controller_with(
            Arc::new(MockItemStore::default()),
            Arc::new(MockCategoryStore::default()),
        );

        assert!(matches!(
            controller.add_category("  ").await.unwrap_err(),
            InventaireError::Validation(_)
        ));
        assert!(matches!(
            controller.add_category("Rivets").await.unwrap_err(),
            InventaireError::Validation(_)
        ));

        controller.add_category("Echafaudages").await.unwrap();
        assert!(controller.categories().iter().any(|c| c == "Echafaudages"));
    }

    #[tokio::test]
    async fn failed_category_write_leaves_local_set_unchanged() {
        let category_store = Arc::new(MockCategoryStore { fail_writes: true, ..Default::default() });
        let mut controller =
            controller_with(Arc::new(MockItemStore::default()), category_store);
        let before = controller.categories().to_vec();

        let err = controller.add_category("Echafaudages").await.unwrap_err();
        assert!(matches!(err, InventaireError::Write(_)));
        assert_eq!(controller.categories(), before.as_slice());
    }

    #[tokio::test]
    async fn render_resets_vanished_leader_selection() {
        let mut controller = controller_with(
            Arc::new(MockItemStore::default()),
            Arc::new(MockCategoryStore::default()),
        );
        controller.set_team_leader_filter(Some("Dupont".to_string()));

        let with_dupont = vec![stored_item("a", "user-1", "Visseuses", Some("Dupont"))];
        let frame = controller.render(&with_dupont);
        assert_eq!(frame.rows.len(), 1);
        assert_eq!(controller.state().filters.team_leader.as_deref(), Some("Dupont"));

        // Dupont disappears from the next snapshot: selection falls back to
        // All and the remaining rows are no longer leader-filtered.
        let without_dupont = vec![stored_item("b", "user-1", "Visseuses", Some("Martin"))];
        let frame = controller.render(&without_dupont);
        assert_eq!(frame.team_leader_options, vec!["All", "Martin"]);
        assert!(controller.state().filters.team_leader.is_none());
        assert_eq!(frame.rows.len(), 1);
    }

    #[tokio::test]
    async fn reset_restores_default_state() {
        let mut controller = controller_with(
            Arc::new(MockItemStore::default()),
            Arc::new(MockCategoryStore::default()),
        );
        controller.set_active_tab(Location::Atelier);
        controller.set_search("perceuse");
        controller.set_category_filter(Some("Rivets".to_string()));

        controller.reset();
        assert_eq!(controller.state(), &UiState::default());
    }
}
