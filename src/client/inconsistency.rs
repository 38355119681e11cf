//! # Inconsistency Detector
//!
//! Compares the thread map before and after a server CHECK_STATE correction.
//! If the server had to change anything, the client had silently diverged;
//! that divergence is captured as a [`ClientThreadInconsistencyReport`] for
//! out-of-band diagnosis. The detector never corrects anything itself: the
//! server's state has already been adopted by the time it runs.

use crate::client::action_log::ActionHistory;
use crate::client::sanitize::ActionSanitizer;
use crate::shared::action::Action;
use crate::shared::report::{ClientThreadInconsistencyReport, PlatformDetails, ReportType};
use crate::shared::thread::ThreadInfos;

/// Builds inconsistency reports from its injected collaborators
pub struct InconsistencyDetector<'a> {
    history: &'a dyn ActionHistory,
    sanitizer: &'a ActionSanitizer,
    platform_details: &'a PlatformDetails,
}

impl<'a> InconsistencyDetector<'a> {
    pub fn new(
        history: &'a dyn ActionHistory,
        sanitizer: &'a ActionSanitizer,
        platform_details: &'a PlatformDetails,
    ) -> Self {
        Self {
            history,
            sanitizer,
            platform_details,
        }
    }

    /// Reports for the divergence between `before` and `after`; empty when
    /// the two maps are structurally equal
    pub fn detect(
        &self,
        action: &Action,
        before: &ThreadInfos,
        after: &ThreadInfos,
    ) -> Vec<ClientThreadInconsistencyReport> {
        self.detect_at(action, before, after, chrono::Utc::now().timestamp_millis())
    }

    /// Same as [`detect`](Self::detect) with an explicit report time
    pub fn detect_at(
        &self,
        action: &Action,
        before: &ThreadInfos,
        after: &ThreadInfos,
        time: i64,
    ) -> Vec<ClientThreadInconsistencyReport> {
        if before == after {
            return Vec::new();
        }
        tracing::warn!(
            "Thread inconsistency detected after {}: {} threads before, {} after",
            action.action_type(),
            before.len(),
            after.len()
        );
        vec![ClientThreadInconsistencyReport {
            report_type: ReportType::ThreadInconsistency,
            platform_details: self.platform_details.clone(),
            before_action: before.clone(),
            action: self.sanitizer.sanitize(action),
            push_result: after.clone(),
            last_actions: self.history.interesting_action_summaries(),
            time,
        }]
    }
}
