//! Example: Completion signals for callback-style code
//!
//! This example demonstrates how to await work that reports through a
//! callback instead of returning a future, using `completion::channel`.

use std::thread;
use std::time::Duration;

use understudy::completion::channel;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("🎭 understudy - Completion Signal Examples\n");

    example_callback_completion().await;
    example_payload_and_rejection().await;
    example_abandoned_handle().await;

    println!("\n✅ All completion examples completed!");
}

fn schedule(cb: impl FnOnce() + Send + 'static) {
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        cb();
    });
}

/// Awaiting a plain callback
async fn example_callback_completion() {
    println!("📌 Example 1: Awaiting a Callback");
    println!("   The waiter parks until the callback fires the handle\n");

    let (done, waiter) = channel();

    println!("   Scheduling background work...");
    schedule(move || {
        println!("   Callback running on a worker thread");
        done.complete();
    });

    match waiter.wait().await {
        Ok(()) => println!("   ✓ Completion observed"),
        Err(err) => println!("   ✗ Completion failed: {err}"),
    }
    println!();
}

/// Payload delivery and rejection
async fn example_payload_and_rejection() {
    println!("📌 Example 2: Payloads and Rejections");
    println!("   A completion can carry a value or a failure reason\n");

    let (done, waiter) = channel::<String>();
    schedule(move || {
        done.resolve("payload ready".to_string());
    });
    match waiter.wait().await {
        Ok(payload) => println!("   Resolved with: {payload:?}"),
        Err(err) => println!("   Unexpected failure: {err}"),
    }

    let (done, waiter) = channel::<String>();
    schedule(move || {
        done.reject("disk full");
    });
    match waiter.wait().await {
        Ok(payload) => println!("   Unexpected payload: {payload:?}"),
        Err(err) => {
            println!("   Rejected: {err}");
            println!("   is_rejection_with(\"disk full\") -> {}", err.is_rejection_with("disk full"));
        }
    }
    println!();
}

/// A dropped handle is a failure, not a hang
async fn example_abandoned_handle() {
    println!("📌 Example 3: Abandoned Handles");
    println!("   Work that dies without reporting wakes the waiter with an error\n");

    let (done, waiter) = channel::<()>();
    schedule(move || {
        // The worker gives up before firing anything.
        drop(done);
    });

    match waiter.wait().await {
        Ok(()) => println!("   Unexpected completion"),
        Err(err) => println!("   ✓ Abandonment surfaced: {err}"),
    }
    println!();
}
