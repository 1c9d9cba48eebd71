//! Example: Recording calls through a double
//!
//! This example demonstrates how to wrap functions with `Recorder` and
//! `AsyncRecorder`, script their outcomes, and inspect the recorded history.

use understudy::assertions::matcher::{contains_str, gt};
use understudy::recorder::{AsyncRecorder, Recorder};

fn main() {
    println!("🎭 understudy - Call Recording Examples\n");

    example_wrapping_a_function();
    example_scripted_outcomes();
    example_inspecting_history();
    example_async_recorder();

    println!("\n✅ All recording examples completed!");
}

/// Wrapping a real function and watching it work
fn example_wrapping_a_function() {
    println!("📌 Example 1: Wrapping a Function");
    println!("   Every call through the double is recorded\n");

    let double = Recorder::new(|x: i32| x + 1);

    println!("   call(0) -> {}", double.call(0));
    println!("   call(1) -> {}", double.call(1));

    let calls = double.calls();
    println!("   Recorded {} calls", calls.len());
    println!(
        "   First call: args={}, result={}",
        calls[0].args, calls[0].result
    );
    println!();
}

/// One-shot resolutions drain before the persistent fallback
fn example_scripted_outcomes() {
    println!("📌 Example 2: Scripted Outcomes");
    println!("   Queue one-shot values, then fall back to a persistent one\n");

    let filter = Recorder::new(|_: i32| true);
    filter.then_returns(true).then_returns(false);
    filter.returns(true);

    let inputs = [11, 12, 13, 14];
    let kept: Vec<i32> = inputs.iter().copied().filter(|n| filter.call(*n)).collect();

    println!("   Inputs: {:?}", inputs);
    println!("   Kept:   {:?}", kept);

    let outcomes: Vec<bool> = filter.calls().iter().map(|c| c.result).collect();
    println!("   Outcomes: {:?} (once, once, fallback, fallback)", outcomes);
    println!();
}

/// Asking the history questions
fn example_inspecting_history() {
    println!("📌 Example 3: Inspecting History");
    println!("   The recorded calls answer questions about usage\n");

    let greet = Recorder::new(|name: String| format!("hello, {name}"));
    greet.call("ada".to_string());
    greet.call("grace".to_string());

    println!("   call_count() -> {}", greet.call_count());
    println!(
        "   was_called_with(\"ada\") -> {}",
        greet.was_called_with(&"ada".to_string())
    );
    println!(
        "   was_called_matching(contains_str(\"race\")) -> {}",
        greet.was_called_matching(&contains_str("race"))
    );

    if let Some(last) = greet.last_call() {
        println!("   last_call() args: {:?}, result: {:?}", last.args, last.result);
        println!("   target ran for {:?}", last.duration);
    }

    let scores = Recorder::new(|points: u32| points * 10);
    scores.call(5);
    println!(
        "   scores.was_called_matching(gt(4)) -> {}",
        scores.was_called_matching(&gt(4))
    );
    println!();
}

/// The async recorder works the same way for futures
fn example_async_recorder() {
    println!("📌 Example 4: Async Recorder");
    println!("   Wrap async functions and script their resolutions\n");

    futures::executor::block_on(async {
        let fetch = AsyncRecorder::new(|id: u32| async move {
            Ok::<String, String>(format!("user-{id}"))
        });

        println!("   call(7).await -> {:?}", fetch.call(7).await);

        fetch.then_rejects("connection refused".to_string());
        println!("   next call rejects: {:?}", fetch.call(8).await);
        println!("   after that, the target answers again: {:?}", fetch.call(9).await);

        println!("   history holds {} calls, failures included", fetch.call_count());
    });
    println!();
}
