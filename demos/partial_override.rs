//! Example: Overriding part of a collaborator
//!
//! This example demonstrates the trait-seam pattern: production code gets
//! the real collaborator, tests get a patched type that answers one method
//! from a recorder and delegates the rest to the real implementation.

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

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("🎭 understudy - Partial Override Example\n");

    example_live_collaborator().await;
    example_patched_collaborator().await;

    println!("\n✅ Partial override example completed!");
}

/// Production wiring: the real implementation answers everything
async fn example_live_collaborator() {
    println!("📌 Example 1: The Live Collaborator");
    println!("   Production code receives the real implementation\n");

    let roster = Roster {
        directory: Arc::new(LiveDirectory),
    };

    println!("   source() -> {:?}", roster.source());
    println!("   members(\"/staff\") -> {:?}", roster.members("/staff").await);
    println!();
}

/// Test wiring: one method is doubled, the rest stays real
async fn example_patched_collaborator() {
    println!("📌 Example 2: The Patched Collaborator");
    println!("   `lookup` is doubled and recorded, `label` stays real\n");

    let patched = Arc::new(PatchedDirectory {
        lookup: AsyncRecorder::resolving(Ok(vec!["carol".to_string()])),
        rest: LiveDirectory,
    });
    let roster = Roster {
        directory: patched.clone(),
    };

    println!("   members(\"/users\") -> {:?}", roster.members("/users").await);
    println!("   source() -> {:?} (delegated to the real one)", roster.source());

    println!(
        "   recorder saw /users: {}",
        patched.lookup.was_called_with(&"/users".to_string())
    );

    patched.lookup.rejects("service offline".to_string());
    println!("   after rejects(): {:?}", roster.members("/users").await);
    println!("   recorded calls: {}", patched.lookup.call_count());
    println!();
}
