//! Overriding one member of a collaborator while the rest stays real.
//!
//! Doubles are injected, not patched in at runtime. The seam is a trait:
//! production code gets the real implementation, tests get a patched type
//! that answers the overridden member from a recorder and delegates the
//! rest to the real implementation.

use std::sync::Arc;

use async_trait::async_trait;
use understudy::recorder::AsyncRecorder;

#[async_trait]
trait Directory: Send + Sync {
    async fn lookup(&self, path: &str) -> Result<Vec<String>, String>;
    fn label(&self) -> String;
}

struct LiveDirectory;

#[async_trait]
impl Directory for LiveDirectory {
    async fn lookup(&self, path: &str) -> Result<Vec<String>, String> {
        // Stands in for a network call.
        Ok(vec![format!("{path}/alice"), format!("{path}/bob")])
    }

    fn label(&self) -> String {
        "live directory".to_string()
    }
}

/// `lookup` answers from a recorder, `label` stays real.
struct PatchedDirectory {
    lookup: AsyncRecorder<String, Result<Vec<String>, String>>,
    rest: LiveDirectory,
}

#[async_trait]
impl Directory for PatchedDirectory {
    async fn lookup(&self, path: &str) -> Result<Vec<String>, String> {
        self.lookup.call(path.to_string()).await
    }

    fn label(&self) -> String {
        self.rest.label()
    }
}

struct Roster {
    directory: Arc<dyn Directory>,
}

impl Roster {
    async fn members(&self, team: &str) -> Result<Vec<String>, String> {
        self.directory.lookup(team).await
    }

    fn source(&self) -> String {
        self.directory.label()
    }
}

#[tokio::test]
async fn test_overridden_member_answers_from_recorder() {
    let patched = Arc::new(PatchedDirectory {
        lookup: AsyncRecorder::resolving(Ok(vec!["carol".to_string()])),
        rest: LiveDirectory,
    });
    let roster = Roster {
        directory: patched.clone(),
    };

    let members = roster.members("/users").await;

    assert_eq!(members, Ok(vec!["carol".to_string()]));
    assert!(patched.lookup.was_called_with(&"/users".to_string()));
    assert_eq!(patched.lookup.call_count(), 1);
}

#[tokio::test]
async fn test_untouched_member_stays_real() {
    let patched = Arc::new(PatchedDirectory {
        lookup: AsyncRecorder::resolving(Ok(Vec::new())),
        rest: LiveDirectory,
    });
    let roster = Roster { directory: patched };

    assert_eq!(roster.source(), "live directory");
}

#[tokio::test]
async fn test_overridden_member_rejects_unchanged() {
    let patched = Arc::new(PatchedDirectory {
        lookup: AsyncRecorder::resolving(Ok(Vec::new())),
        rest: LiveDirectory,
    });
    patched.lookup.rejects("service offline".to_string());
    let roster = Roster {
        directory: patched.clone(),
    };

    let members = roster.members("/users").await;

    assert_eq!(members, Err("service offline".to_string()));
    let calls = patched.lookup.calls();
    assert_eq!(calls[0].result, Err("service offline".to_string()));
}

#[tokio::test]
async fn test_live_directory_reaches_production_code() {
    let roster = Roster {
        directory: Arc::new(LiveDirectory),
    };

    let members = roster.members("/staff").await.unwrap();

    assert_eq!(members, vec!["/staff/alice", "/staff/bob"]);
    assert_eq!(roster.source(), "live directory");
}
