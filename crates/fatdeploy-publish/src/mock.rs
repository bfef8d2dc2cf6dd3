use crate::{PublishError, Publisher, PublishRequest};
use std::collections::HashSet;
use std::sync::Mutex;

/// Test double that records every publish request and can be primed to fail
/// for selected artifact file names.
#[derive(Default)]
pub struct RecordingPublisher {
    calls: Mutex<Vec<PublishRequest>>,
    fail_files: Mutex<HashSet<String>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prime a failure: any request whose file name matches will be rejected.
    pub fn fail_for(&self, file_name: &str) {
        if let Ok(mut fail) = self.fail_files.lock() {
            fail.insert(file_name.to_owned());
        }
    }

    /// Snapshot of all requests seen so far, including rejected ones.
    pub fn calls(&self) -> Vec<PublishRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Publisher for RecordingPublisher {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn publish(&self, request: &PublishRequest) -> Result<(), PublishError> {
        let file_name = request
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.calls
            .lock()
            .map_err(|e| PublishError::Rejected(format!("mutex poisoned: {e}")))?
            .push(request.clone());

        let primed = self
            .fail_files
            .lock()
            .map_err(|e| PublishError::Rejected(format!("mutex poisoned: {e}")))?
            .contains(&file_name);
        if primed {
            return Err(PublishError::Rejected(format!(
                "primed failure for {file_name}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatdeploy_schema::Coordinate;
    use std::path::PathBuf;

    fn request(file: &str) -> PublishRequest {
        PublishRequest::for_bundle(
            Coordinate::new("g", "a", "1.0").unwrap(),
            PathBuf::from(file),
        )
    }

    #[test]
    fn records_every_call() {
        let publisher = RecordingPublisher::new();
        publisher.publish(&request("/w/a.jar")).unwrap();
        publisher.publish(&request("/w/b.jar")).unwrap();
        assert_eq!(publisher.calls().len(), 2);
    }

    #[test]
    fn primed_failure_is_rejected_but_still_recorded() {
        let publisher = RecordingPublisher::new();
        publisher.fail_for("a.jar");

        let err = publisher.publish(&request("/w/a.jar")).unwrap_err();
        assert!(matches!(err, PublishError::Rejected(_)));
        assert_eq!(publisher.calls().len(), 1);

        publisher.publish(&request("/w/b.jar")).unwrap();
        assert_eq!(publisher.calls().len(), 2);
    }
}
