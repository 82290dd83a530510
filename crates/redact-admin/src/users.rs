//! Users view with optimistic block/delete

use redact_client::{AdminApi, ClientError};
use redact_core::AdminUser;
use redact_core::admin::fallback_users;
use tracing::{debug, warn};

/// Where the displayed list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutationId(u64);

#[derive(Debug, Clone)]
enum MutationKind {
    ToggleBlock { previous: bool },
    Delete { index: usize, user: AdminUser },
}

#[derive(Debug, Clone)]
struct PendingMutation {
    id: MutationId,
    user_id: u64,
    kind: MutationKind,
    /// A newer mutation for the same user was confirmed
    overridden: bool,
}

/// Result of settling a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Confirmed,
    /// The local change was undone
    RolledBack { notice: String },
    /// The call failed, but a later mutation already changed the same user
    Superseded { notice: String },
}

#[derive(Debug)]
pub struct UsersView {
    users: Vec<AdminUser>,
    source: DataSource,
    /// In issue order
    pending: Vec<PendingMutation>,
    next_id: u64,
}

impl UsersView {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            source: DataSource::Remote,
            pending: Vec::new(),
            next_id: 1,
        }
    }

    pub fn users(&self) -> &[AdminUser] {
        &self.users
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Fetch the list, falling back to the built-in users on any failure.
    /// Returns the error that forced the fallback.
    pub async fn load(&mut self, api: &dyn AdminApi) -> Option<ClientError> {
        self.pending.clear();

        match api.list_users().await {
            Ok(users) => {
                debug!("Loaded {} users", users.len());
                self.users = users;
                self.source = DataSource::Remote;
                None
            }
            Err(e) => {
                warn!("Falling back to built-in users: {}", e);
                self.users = fallback_users();
                self.source = DataSource::Fallback;
                Some(e)
            }
        }
    }

    /// Flip `blocked` locally. Returns the mutation and the new state to send.
    pub fn begin_toggle_block(&mut self, user_id: u64) -> Option<(MutationId, bool)> {
        let user = self.users.iter_mut().find(|u| u.id == user_id)?;
        let previous = user.blocked;
        user.blocked = !previous;
        let block = user.blocked;

        let id = self.track(user_id, MutationKind::ToggleBlock { previous });
        Some((id, block))
    }

    /// Remove locally, remembering the position for a rollback
    pub fn begin_delete(&mut self, user_id: u64) -> Option<MutationId> {
        let index = self.users.iter().position(|u| u.id == user_id)?;
        let user = self.users.remove(index);
        Some(self.track(user_id, MutationKind::Delete { index, user }))
    }

    fn track(&mut self, user_id: u64, kind: MutationKind) -> MutationId {
        let id = MutationId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingMutation {
            id,
            user_id,
            kind,
            overridden: false,
        });
        id
    }

    /// Apply the remote result of a mutation. `None` for an unknown id.
    ///
    /// A failure is rolled back only while it is the newest unsettled change
    /// for its user. Otherwise the next newer pending change inherits the
    /// state this one replaced, so its own rollback lands on the last state
    /// the server actually holds.
    pub fn settle(&mut self, id: MutationId, result: Result<(), ClientError>) -> Option<Outcome> {
        let position = self.pending.iter().position(|m| m.id == id)?;
        let mutation = self.pending.remove(position);
        let user_id = mutation.user_id;

        let err = match result {
            Ok(()) => {
                for older in self.pending[..position]
                    .iter_mut()
                    .filter(|m| m.user_id == user_id)
                {
                    older.overridden = true;
                }
                return Some(Outcome::Confirmed);
            }
            Err(e) => e,
        };

        let notice = match &mutation.kind {
            MutationKind::ToggleBlock { .. } => {
                format!("Action failed for {}: {}", self.name_of(user_id), err)
            }
            MutationKind::Delete { user, .. } => {
                format!("Delete failed for {}: {}", user.name, err)
            }
        };
        warn!("{}", notice);

        if mutation.overridden {
            return Some(Outcome::Superseded { notice });
        }

        // Pending entries after `position` were issued later
        if let Some(newer) = self.pending[position..]
            .iter_mut()
            .find(|m| m.user_id == user_id)
        {
            if let MutationKind::ToggleBlock { previous } = mutation.kind {
                match &mut newer.kind {
                    MutationKind::ToggleBlock {
                        previous: newer_previous,
                    } => *newer_previous = previous,
                    MutationKind::Delete { user, .. } => user.blocked = previous,
                }
            }
            return Some(Outcome::Superseded { notice });
        }

        match mutation.kind {
            MutationKind::ToggleBlock { previous } => {
                if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
                    user.blocked = previous;
                }
            }
            MutationKind::Delete { index, user } => {
                let index = index.min(self.users.len());
                self.users.insert(index, user);
            }
        }
        Some(Outcome::RolledBack { notice })
    }

    fn name_of(&self, user_id: u64) -> String {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| format!("user {}", user_id))
    }

    /// Flip and send in one step
    pub async fn toggle_block(&mut self, api: &dyn AdminApi, user_id: u64) -> Option<Outcome> {
        let (id, block) = self.begin_toggle_block(user_id)?;
        let result = api.set_blocked(user_id, block).await.map(|_| ());
        self.settle(id, result)
    }

    /// Remove and send in one step
    pub async fn delete(&mut self, api: &dyn AdminApi, user_id: u64) -> Option<Outcome> {
        let id = self.begin_delete(user_id)?;
        let result = api.delete_user(user_id).await;
        self.settle(id, result)
    }
}

impl Default for UsersView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use redact_core::LogEntry;

    /// Serves a fixed list; mutations succeed or fail as configured
    struct FakeApi {
        users: Option<Vec<AdminUser>>,
        fail_mutations: bool,
    }

    #[async_trait]
    impl AdminApi for FakeApi {
        async fn list_users(&self) -> redact_client::Result<Vec<AdminUser>> {
            self.users.clone().ok_or(ClientError::Unreachable {
                reason: "offline".to_string(),
            })
        }

        async fn set_blocked(&self, id: u64, block: bool) -> redact_client::Result<AdminUser> {
            if self.fail_mutations {
                return Err(ClientError::Http {
                    status: 500,
                    status_text: "Internal Server Error".to_string(),
                });
            }
            Ok(AdminUser::new(id, "x", "x@example.com", block))
        }

        async fn delete_user(&self, _id: u64) -> redact_client::Result<()> {
            if self.fail_mutations {
                return Err(ClientError::Http {
                    status: 404,
                    status_text: "Not Found".to_string(),
                });
            }
            Ok(())
        }

        async fn list_logs(&self) -> redact_client::Result<Vec<LogEntry>> {
            Ok(Vec::new())
        }
    }

    fn offline() -> FakeApi {
        FakeApi {
            users: None,
            fail_mutations: true,
        }
    }

    fn error() -> ClientError {
        ClientError::Unreachable {
            reason: "offline".to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_falls_back() {
        let mut view = UsersView::new();
        let err = view.load(&offline()).await;

        assert!(err.is_some());
        assert_eq!(view.source(), DataSource::Fallback);
        assert_eq!(view.users(), fallback_users().as_slice());
    }

    #[tokio::test]
    async fn test_load_remote() {
        let api = FakeApi {
            users: Some(vec![AdminUser::new(9, "Mei", "mei@example.com", false)]),
            fail_mutations: false,
        };
        let mut view = UsersView::new();
        assert!(view.load(&api).await.is_none());
        assert_eq!(view.source(), DataSource::Remote);
        assert_eq!(view.users().len(), 1);
    }

    #[tokio::test]
    async fn test_block_flips_immediately() {
        let mut view = UsersView::new();
        view.load(&offline()).await;

        let (id, block) = view.begin_toggle_block(1).unwrap();
        assert!(block);
        assert!(view.users()[0].blocked);
        assert_eq!(view.pending_count(), 1);

        assert_eq!(view.settle(id, Ok(())), Some(Outcome::Confirmed));
        assert!(view.users()[0].blocked);
        assert_eq!(view.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_block_rolls_back() {
        let mut view = UsersView::new();
        view.load(&offline()).await;

        let outcome = view.toggle_block(&offline(), 2).await.unwrap();

        assert!(matches!(outcome, Outcome::RolledBack { ref notice } if notice.contains("Anita")));
        assert!(view.users()[1].blocked);
    }

    #[tokio::test]
    async fn test_failed_delete_reinserts_at_index() {
        let mut view = UsersView::new();
        view.load(&offline()).await;

        let outcome = view.delete(&offline(), 2).await.unwrap();

        assert!(matches!(outcome, Outcome::RolledBack { .. }));
        let ids: Vec<u64> = view.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_overwrite() {
        let mut view = UsersView::new();
        view.load(&offline()).await;

        let (first, _) = view.begin_toggle_block(1).unwrap();
        let (second, _) = view.begin_toggle_block(1).unwrap();
        assert!(!view.users()[0].blocked);

        // The first call fails after the second one was issued
        let outcome = view.settle(first, Err(error())).unwrap();
        assert!(matches!(outcome, Outcome::Superseded { .. }));
        assert!(!view.users()[0].blocked);

        assert_eq!(view.settle(second, Ok(())), Some(Outcome::Confirmed));
        assert!(!view.users()[0].blocked);
    }

    #[tokio::test]
    async fn test_successful_delete() {
        let api = FakeApi {
            users: Some(fallback_users()),
            fail_mutations: false,
        };
        let mut view = UsersView::new();
        view.load(&api).await;

        assert_eq!(view.delete(&api, 3).await, Some(Outcome::Confirmed));
        assert_eq!(view.users().len(), 2);
        assert_eq!(view.delete(&api, 3).await, None);
    }

    #[tokio::test]
    async fn test_newer_failure_then_older_failure_restores_original() {
        let mut view = UsersView::new();
        view.load(&offline()).await;
        let original = view.users()[0].blocked;

        let (first, _) = view.begin_toggle_block(1).unwrap();
        let (second, _) = view.begin_toggle_block(1).unwrap();

        let outcome = view.settle(second, Err(error())).unwrap();
        assert!(matches!(outcome, Outcome::RolledBack { .. }));
        assert_eq!(view.users()[0].blocked, !original);

        let outcome = view.settle(first, Err(error())).unwrap();
        assert!(matches!(outcome, Outcome::RolledBack { .. }));
        assert_eq!(view.users()[0].blocked, original);
        assert_eq!(view.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_older_failure_is_inherited_by_newer_toggle() {
        let mut view = UsersView::new();
        view.load(&offline()).await;
        let original = view.users()[0].blocked;

        let (first, _) = view.begin_toggle_block(1).unwrap();
        let (second, _) = view.begin_toggle_block(1).unwrap();

        assert!(matches!(
            view.settle(first, Err(error())),
            Some(Outcome::Superseded { .. })
        ));
        assert!(matches!(
            view.settle(second, Err(error())),
            Some(Outcome::RolledBack { .. })
        ));
        assert_eq!(view.users()[0].blocked, original);
    }

    #[tokio::test]
    async fn test_failed_toggle_and_delete_restore_original_state() {
        // Delete fails first, then the toggle
        let mut view = UsersView::new();
        view.load(&offline()).await;
        let (toggle, _) = view.begin_toggle_block(1).unwrap();
        let delete = view.begin_delete(1).unwrap();

        view.settle(delete, Err(error()));
        view.settle(toggle, Err(error()));
        assert_eq!(view.users(), fallback_users().as_slice());

        // Toggle fails first, then the delete
        let mut view = UsersView::new();
        view.load(&offline()).await;
        let (toggle, _) = view.begin_toggle_block(1).unwrap();
        let delete = view.begin_delete(1).unwrap();

        assert!(matches!(
            view.settle(toggle, Err(error())),
            Some(Outcome::Superseded { .. })
        ));
        assert!(view.users().iter().all(|u| u.id != 1));
        view.settle(delete, Err(error()));
        assert_eq!(view.users(), fallback_users().as_slice());
    }

    #[tokio::test]
    async fn test_confirmed_newer_change_wins_over_older_failure() {
        let mut view = UsersView::new();
        view.load(&offline()).await;
        let original = view.users()[0].blocked;

        let (first, _) = view.begin_toggle_block(1).unwrap();
        let (second, _) = view.begin_toggle_block(1).unwrap();

        assert_eq!(view.settle(second, Ok(())), Some(Outcome::Confirmed));
        assert!(matches!(
            view.settle(first, Err(error())),
            Some(Outcome::Superseded { .. })
        ));
        assert_eq!(view.users()[0].blocked, original);
    }

    #[test]
    fn test_settle_unknown_mutation() {
        let mut view = UsersView::new();
        assert_eq!(view.settle(MutationId(42), Ok(())), None);
    }
}
