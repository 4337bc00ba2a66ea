use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::file_entry::{EntryId, FileEntry};
use crate::state::AppState;

/// Identifies the navigation a listing request was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingTicket {
    pub navigation_version: u64,
    pub sequence: u64,
    pub folder_id: Option<EntryId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "count", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Applied(usize),
    /// The response was superseded before it arrived.
    Discarded,
}

pub fn issue_ticket(state: &AppState) -> ListingTicket {
    let nav = state.lock_navigation();
    ListingTicket {
        navigation_version: nav.version,
        sequence: state.next_refresh_sequence(),
        folder_id: nav.state.folder_id.clone(),
    }
}

/// Re-fetches the current folder and replaces the cache wholesale.
/// On failure the previous listing stays in place.
pub async fn refresh_listing(state: &AppState) -> Result<RefreshOutcome, AppError> {
    let ticket = issue_ticket(state);
    debug!(
        folder = ?ticket.folder_id,
        sequence = ticket.sequence,
        "listing refresh issued"
    );
    let entries = state
        .remote()
        .list_folder_contents(ticket.folder_id.as_ref())
        .await
        .map_err(AppError::capture)?;
    Ok(apply_listing(state, &ticket, entries))
}

pub fn apply_listing(
    state: &AppState,
    ticket: &ListingTicket,
    entries: Vec<FileEntry>,
) -> RefreshOutcome {
    let nav = state.lock_navigation();
    if nav.version != ticket.navigation_version {
        debug!(
            folder = ?ticket.folder_id,
            issued_for = ticket.navigation_version,
            current = nav.version,
            "discarding stale listing"
        );
        return RefreshOutcome::Discarded;
    }

    let mut listing = state.lock_listing();
    if ticket.sequence < listing.applied_sequence {
        debug!(
            sequence = ticket.sequence,
            applied = listing.applied_sequence,
            "discarding out-of-order listing"
        );
        return RefreshOutcome::Discarded;
    }

    let (entries, foreign): (Vec<FileEntry>, Vec<FileEntry>) = entries
        .into_iter()
        .partition(|entry| entry.is_in_folder(ticket.folder_id.as_ref()));
    if !foreign.is_empty() {
        warn!(
            folder = ?ticket.folder_id,
            dropped = foreign.len(),
            "service returned entries from another folder"
        );
    }

    let count = entries.len();
    listing.folder_id = ticket.folder_id.clone();
    listing.entries = entries;
    listing.applied_sequence = ticket.sequence;
    listing.loaded = true;
    debug!(folder = ?ticket.folder_id, count, "listing applied");
    RefreshOutcome::Applied(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::navigation_service::{navigate_home, navigate_to};
    use crate::test_support::{file, folder, Call, FakeRemote};
    use std::sync::Arc;

    fn drive() -> Vec<FileEntry> {
        vec![
            folder("a", "Alpha", None, 0),
            folder("b", "Beta", None, 1),
            file("root-1", "readme.md", None, 2),
            file("a-1", "alpha-notes.txt", Some("a"), 3),
            file("a-2", "alpha-plan.txt", Some("a"), 4),
            file("b-1", "beta.png", Some("b"), 5),
        ]
    }

    fn test_state() -> (AppState, Arc<FakeRemote>) {
        let remote = Arc::new(FakeRemote::with_entries(drive()));
        (AppState::new(remote.clone()), remote)
    }

    fn ids(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_refresh_lists_only_current_folder() {
        let (state, remote) = test_state();

        navigate_to(&state, Some(EntryId::new("a")), "Alpha");
        let outcome = refresh_listing(&state).await.unwrap();

        assert_eq!(outcome, RefreshOutcome::Applied(2));
        let entries = state.current_entries();
        assert_eq!(ids(&entries), vec!["a-1", "a-2"]);
        assert!(entries
            .iter()
            .all(|e| e.parent_id == Some(EntryId::new("a"))));
        assert_eq!(
            remote.calls(),
            vec![Call::ListFolder(Some(EntryId::new("a")))]
        );
    }

    #[tokio::test]
    async fn test_root_listing_includes_top_level_folders_and_files() {
        let (state, _) = test_state();
        refresh_listing(&state).await.unwrap();
        assert_eq!(ids(&state.current_entries()), vec!["a", "b", "root-1"]);
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let (state, remote) = test_state();
        navigate_to(&state, Some(EntryId::new("a")), "Alpha");
        refresh_listing(&state).await.unwrap();

        remote.remove_remotely("a-1");
        remote.insert_remotely(file("a-3", "alpha-late.txt", Some("a"), 9));
        refresh_listing(&state).await.unwrap();

        assert_eq!(ids(&state.current_entries()), vec!["a-2", "a-3"]);
    }

    #[tokio::test]
    async fn test_listing_invariant_holds_across_navigation_sequence() {
        let (state, _) = test_state();
        let route = [Some("a"), None, Some("b"), Some("a"), None];

        for target in route {
            match target {
                Some(id) => navigate_to(&state, Some(EntryId::new(id)), id),
                None => navigate_home(&state),
            };
            refresh_listing(&state).await.unwrap();

            let current = state.navigation().folder_id;
            assert!(state
                .current_entries()
                .iter()
                .all(|e| e.parent_id == current));
        }
    }

    #[tokio::test]
    async fn test_late_listing_for_previous_folder_is_discarded() {
        let (state, remote) = test_state();
        let gate = remote.hold_listing(Some("a"));

        navigate_to(&state, Some(EntryId::new("a")), "Alpha");
        let refresh_a = refresh_listing(&state);
        let switch_to_b = async {
            tokio::task::yield_now().await;
            navigate_to(&state, Some(EntryId::new("b")), "Beta");
            let outcome = refresh_listing(&state).await;
            gate.notify_one();
            outcome
        };

        let (a_outcome, b_outcome) = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            async { tokio::join!(refresh_a, switch_to_b) },
        )
        .await
        .expect("refreshes should complete");

        assert_eq!(a_outcome.unwrap(), RefreshOutcome::Discarded);
        assert_eq!(b_outcome.unwrap(), RefreshOutcome::Applied(1));
        assert_eq!(state.navigation().folder_name, "Beta");
        assert_eq!(ids(&state.current_entries()), vec!["b-1"]);
        assert_eq!(
            remote.count(|c| matches!(c, Call::ListFolder(_))),
            2
        );
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_listing() {
        let (state, remote) = test_state();
        navigate_to(&state, Some(EntryId::new("a")), "Alpha");
        refresh_listing(&state).await.unwrap();

        remote.remove_remotely("a-1");
        remote.fail("list_folder_contents");
        let result = refresh_listing(&state).await;

        assert!(result.is_err());
        assert_eq!(ids(&state.current_entries()), vec!["a-1", "a-2"]);

        remote.recover("list_folder_contents");
        refresh_listing(&state).await.unwrap();
        assert_eq!(ids(&state.current_entries()), vec!["a-2"]);
    }

    #[test]
    fn test_older_ticket_does_not_overwrite_newer_listing() {
        let (state, _) = test_state();
        let older = issue_ticket(&state);
        let newer = issue_ticket(&state);

        assert_eq!(
            apply_listing(&state, &newer, vec![file("n", "new.txt", None, 2)]),
            RefreshOutcome::Applied(1)
        );
        assert_eq!(
            apply_listing(&state, &older, vec![file("o", "old.txt", None, 1)]),
            RefreshOutcome::Discarded
        );
        assert_eq!(ids(&state.current_entries()), vec!["n"]);
    }

    #[test]
    fn test_entries_from_other_folders_are_dropped() {
        let (state, _) = test_state();
        navigate_to(&state, Some(EntryId::new("a")), "Alpha");
        let ticket = issue_ticket(&state);

        let outcome = apply_listing(
            &state,
            &ticket,
            vec![
                file("a-1", "alpha-notes.txt", Some("a"), 3),
                file("b-1", "beta.png", Some("b"), 5),
            ],
        );

        assert_eq!(outcome, RefreshOutcome::Applied(1));
        assert_eq!(ids(&state.current_entries()), vec!["a-1"]);
    }
}
