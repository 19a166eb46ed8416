use sequentis::time::{now, sleep, sleep_until};
use sequentis::{RuntimeBuilder, task};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::task::Poll;
use std::time::{Duration, Instant};

#[test]
fn test_block_on_returns_output() {
    let rt = RuntimeBuilder::new().build();

    assert_eq!(rt.block_on(async { 42 }), 42);
}

#[test]
fn test_spawn_and_join() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(async {
        let a = task::spawn(async { 10 });
        let b = task::spawn(async { 20 });
        a.await + b.await
    });

    assert_eq!(result, 30);
}

#[test]
fn test_spawned_task_runs_without_being_awaited() {
    let rt = RuntimeBuilder::new().start_paused(true).build();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    rt.block_on(async move {
        let _detached = task::spawn(async move {
            c.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(1)).await;
    });

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_runtime_spawn_before_block_on() {
    let rt = RuntimeBuilder::new().build();
    let handle = rt.spawn(async { "spawned early" });

    assert_eq!(rt.block_on(handle), "spawned early");
}

#[sequentis::test]
async fn test_sleep_basic() {
    let start = Instant::now();
    sleep(Duration::from_millis(50)).await;
    let elapsed = start.elapsed();

    assert!(
        elapsed >= Duration::from_millis(50),
        "Sleep should wait at least the specified duration"
    );
}

#[sequentis::test]
async fn test_sleep_zero_duration() {
    let start = Instant::now();
    sleep(Duration::ZERO).await;

    assert!(
        start.elapsed() < Duration::from_millis(10),
        "Zero duration sleep should be fast"
    );
}

#[sequentis::test(start_paused = true)]
async fn test_paused_sleep_advances_clock_exactly() {
    let start = now();
    let wall = Instant::now();

    sleep(Duration::from_secs(60)).await;

    assert_eq!(now() - start, Duration::from_secs(60));
    assert!(
        wall.elapsed() < Duration::from_secs(5),
        "A paused clock should not wait in real time"
    );
}

#[sequentis::test(start_paused = true)]
async fn test_paused_timers_fire_in_deadline_order() {
    let start = now();
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let handles: Vec<_> = [30u64, 10, 20]
        .into_iter()
        .map(|millis| {
            let order = order.clone();
            task::spawn(async move {
                sleep_until(start + Duration::from_millis(millis)).await;
                order.lock().expect("lock").push(millis);
            })
        })
        .collect();

    for handle in handles {
        handle.await;
    }

    assert_eq!(*order.lock().expect("lock"), vec![10, 20, 30]);
}

#[test]
fn test_dropped_sleep_does_not_advance_paused_clock() {
    let rt = RuntimeBuilder::new().start_paused(true).build();
    let token = sequentis::CancellationToken::new();

    let remote = token.clone();
    let thread = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(10));
        remote.cancel();
    });

    rt.block_on(async {
        let start = now();

        let mut long = Box::pin(sleep(Duration::from_secs(3600)));
        std::future::poll_fn(|cx| {
            assert!(long.as_mut().poll(cx).is_pending());
            Poll::Ready(())
        })
        .await;
        drop(long);

        token.cancelled().await;

        assert_eq!(now(), start, "The cancelled timer must not move the clock");
    });

    thread.join().expect("cancel thread panicked");
}

#[test]
#[should_panic(expected = "spawn must be called within the context of a runtime")]
fn test_spawn_outside_runtime_panics() {
    let _ = task::spawn(async {});
}

#[test]
fn test_join_handle_reports_finished() {
    let rt = RuntimeBuilder::new().start_paused(true).build();

    rt.block_on(async {
        let handle = task::spawn(async { 5 });
        assert!(!handle.is_finished());

        sleep(Duration::from_millis(1)).await;
        assert!(handle.is_finished());
        assert_eq!(handle.await, 5);
    });
}

#[test]
fn test_wake_from_another_thread() {
    let rt = RuntimeBuilder::new().build();
    let token = sequentis::CancellationToken::new();

    let remote = token.clone();
    let thread = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        remote.cancel();
    });

    rt.block_on(async { token.cancelled().await });

    assert!(token.is_cancelled());
    thread.join().expect("cancel thread panicked");
}

#[sequentis::test(start_paused = true)]
async fn test_sleep_deadline_is_measured_on_runtime_clock() {
    let start = now();

    assert_eq!(
        sleep(Duration::from_secs(5)).deadline(),
        start + Duration::from_secs(5)
    );
    assert_eq!(sleep_until(start).deadline(), start);
}

#[sequentis::test(start_paused = true)]
async fn test_sleep_with_huge_duration_does_not_overflow() {
    let start = now();
    let mut forever = Box::pin(sleep(Duration::MAX));

    assert!(forever.deadline() > start + Duration::from_secs(86_400 * 365));

    std::future::poll_fn(|cx| {
        assert!(forever.as_mut().poll(cx).is_pending());
        Poll::Ready(())
    })
    .await;
}

#[test]
fn test_event_interval_of_one_still_runs_every_task() {
    let rt = RuntimeBuilder::new().event_interval(1).build();

    let total = rt.block_on(async {
        let handles: Vec<_> = (1..=10u32).map(|n| task::spawn(async move { n })).collect();

        let mut total = 0;
        for handle in handles {
            total += handle.await;
        }
        total
    });

    assert_eq!(total, 55);
}

#[test]
#[should_panic(expected = "event_interval must be > 0")]
fn test_zero_event_interval_panics() {
    let _ = RuntimeBuilder::new().event_interval(0);
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[test]
fn test_dropping_runtime_drops_never_polled_task() {
    let dropped = Arc::new(AtomicBool::new(false));
    let rt = RuntimeBuilder::new().build();

    let guard = SetOnDrop(dropped.clone());
    let _handle = rt.spawn(async move {
        let _guard = guard;
    });

    drop(rt);
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn test_dropping_runtime_drops_task_parked_on_timer() {
    let dropped = Arc::new(AtomicBool::new(false));
    let rt = RuntimeBuilder::new().start_paused(true).build();

    let guard = SetOnDrop(dropped.clone());
    rt.block_on(async move {
        let _parked = task::spawn(async move {
            let _guard = guard;
            sleep(Duration::from_secs(3600)).await;
        });

        sleep(Duration::from_millis(1)).await;
    });

    assert!(!dropped.load(Ordering::SeqCst), "The task is still parked");

    drop(rt);
    assert!(dropped.load(Ordering::SeqCst));
}
