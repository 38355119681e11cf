//! Thread and action fixtures

use std::collections::BTreeMap;

use threadsync::client::{reduce_thread_infos, ActionSanitizer, InconsistencyDetector, ThreadReducerResult};
use threadsync::shared::action::{FullSyncPayload, UpdatesPayload};
use threadsync::shared::{
    Action, ActionSummary, ClientUpdateInfo, MemberInfo, PlatformDetails, RawThreadInfo,
    ThreadStore, UpdatesResult,
};

/// A thread with the given unread flag and no members
pub fn thread(id: &str, unread: bool) -> RawThreadInfo {
    let mut thread = RawThreadInfo::new(id, 7, 1_600_000_000_000);
    thread.name = Some(format!("Thread {}", id));
    thread.current_user.unread = unread;
    thread
}

/// A read thread with the given members, in order
pub fn thread_with_members(id: &str, members: &[&str]) -> RawThreadInfo {
    let mut thread = thread(id, false);
    thread.members = members
        .iter()
        .map(|member| MemberInfo::new(*member, Some("member".to_string())))
        .collect();
    thread
}

pub fn store(threads: Vec<RawThreadInfo>) -> ThreadStore {
    ThreadStore::from_threads(threads)
}

/// PROCESS_UPDATES carrying `events`
pub fn process_updates(events: Vec<ClientUpdateInfo>) -> Action {
    Action::ProcessUpdates(UpdatesPayload::new(UpdatesResult::new(0, events)))
}

/// LOG_IN_SUCCESS with the given authoritative snapshot
pub fn log_in(threads: Vec<RawThreadInfo>) -> Action {
    let thread_infos: BTreeMap<_, _> = threads
        .into_iter()
        .map(|thread| (thread.id.clone(), thread))
        .collect();
    Action::LogInSuccess(FullSyncPayload {
        thread_infos,
        updates_current_as_of: 0,
    })
}

/// Collaborators needed to run the reducer outside a driver
pub struct Harness {
    pub history: Vec<ActionSummary>,
    pub sanitizer: ActionSanitizer,
    pub platform_details: PlatformDetails,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            history: vec![ActionSummary {
                action_type: "PROCESS_UPDATES".to_string(),
                time: 1_000,
                summary: "1 updates".to_string(),
            }],
            sanitizer: ActionSanitizer::default(),
            platform_details: PlatformDetails::default(),
        }
    }
}

impl Harness {
    pub fn reduce(&self, state: &ThreadStore, action: &Action) -> ThreadReducerResult {
        let detector =
            InconsistencyDetector::new(&self.history, &self.sanitizer, &self.platform_details);
        reduce_thread_infos(state, action, &detector)
    }
}
