//! Integration tests for the runtime layer.

use core_async::runtime::DedicatedRuntime;
use core_async::{task, time};
use std::sync::Arc;

#[core_async::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    let result = handle.await.unwrap();
    assert_eq!(result, 42);
}

#[core_async::test]
async fn test_sleep() {
    let start = time::Instant::now();
    time::sleep(time::Duration::from_millis(50)).await;
    let elapsed = start.elapsed();
    assert!(elapsed >= time::Duration::from_millis(50));
}

#[core_async::test]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(100)).await;
        42
    })
    .await;

    assert!(result.is_err());
}

#[core_async::test]
async fn test_interleaved_tasks_keep_independent_state() {
    let first = task::spawn(async {
        let mut ticks = 0;
        for _ in 0..3 {
            time::sleep(time::Duration::from_millis(2)).await;
            ticks += 1;
        }
        ticks
    });
    let second = task::spawn(async {
        let mut ticks = 0;
        for _ in 0..5 {
            time::sleep(time::Duration::from_millis(1)).await;
            ticks += 1;
        }
        ticks
    });

    assert_eq!(first.await.unwrap(), 3);
    assert_eq!(second.await.unwrap(), 5);
}

#[test]
fn test_dedicated_runtime_serves_many_threads() {
    let runtime = Arc::new(DedicatedRuntime::new("shared-runtime-test"));
    let mut threads = Vec::new();

    for i in 0..4u64 {
        let runtime = Arc::clone(&runtime);
        threads.push(std::thread::spawn(move || {
            runtime
                .run(async move {
                    time::sleep(time::Duration::from_millis(5 * (4 - i))).await;
                    i * 10
                })
                .unwrap()
        }));
    }

    let mut results: Vec<u64> = threads.into_iter().map(|t| t.join().unwrap()).collect();
    results.sort_unstable();
    assert_eq!(results, vec![0, 10, 20, 30]);

    runtime.shutdown();
    assert!(!runtime.is_active());
}

#[test]
fn test_dedicated_runtime_restarts_after_shutdown() {
    let runtime = DedicatedRuntime::new("restart-test");
    assert_eq!(runtime.run(async { 1 }).unwrap(), 1);
    runtime.shutdown();
    assert_eq!(runtime.run(async { 2 }).unwrap(), 2);
    runtime.shutdown();
}
