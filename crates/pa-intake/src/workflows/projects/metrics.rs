//! Document counters on a project, kept in step with uploads and removals.

use super::domain::{Document, ProjectMetrics};

impl ProjectMetrics {
    /// Every upload counts toward the project total.
    pub fn record_upload(&mut self) {
        self.total_documents += 1;
    }

    /// Undo the counters a document contributed. No floor is applied, so
    /// counters that were edited by hand may go negative.
    pub fn record_removal(&mut self, document: &Document) {
        self.total_documents -= 1;
        if document.is_processed() {
            self.processed_documents -= 1;
        }
    }
}
