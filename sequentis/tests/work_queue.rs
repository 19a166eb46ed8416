use sequentis::{Order, RuntimeBuilder, Task, WorkQueue, task};

#[test]
fn test_plain_value_resolves_to_itself() {
    let rt = RuntimeBuilder::new().build();
    let mut queue: WorkQueue<f64, ()> = WorkQueue::new();

    queue.add_value(std::f64::consts::PI);
    let task = queue.next_task().expect("one task queued");

    assert!(task.is_resolved());
    assert_eq!(rt.block_on(task), Ok(Some(std::f64::consts::PI)));
}

#[test]
fn test_lifo_read_returns_last_added() {
    let rt = RuntimeBuilder::new().build();
    let mut queue: WorkQueue<&'static str, ()> = WorkQueue::new();

    queue.add_value("A");
    queue.add_value("B");
    queue.add_value("C");

    let task = queue.read_task(Order::Lifo).expect("queue is not empty");

    assert_eq!(rt.block_on(task), Ok(Some("C")));
}

#[test]
fn test_len_tracks_reads() {
    let mut queue: WorkQueue<u8, ()> = WorkQueue::new();

    for n in 0..3 {
        queue.add_value(n);
    }
    assert_eq!(queue.len(), 3);

    assert!(queue.read_task(Order::Fifo).is_some());
    assert_eq!(queue.len(), 2);

    assert!(queue.read_task(Order::Lifo).is_some());
    assert!(queue.read_task(Order::Fifo).is_some());
    assert_eq!(queue.len(), 0);

    assert!(queue.read_task(Order::Fifo).is_none());
    assert_eq!(queue.len(), 0, "Reading an empty queue changes nothing");
}

#[test]
fn test_empty_signal_differs_from_empty_task() {
    let rt = RuntimeBuilder::new().build();
    let mut queue: WorkQueue<u8, ()> = WorkQueue::new();

    queue.add(Task::empty());

    let task = queue.next_task().expect("an empty task is still a task");
    assert_eq!(rt.block_on(task), Ok(None));
    assert!(queue.next_task().is_none());
}

#[test]
fn test_default_order_is_fifo() {
    assert_eq!(Order::default(), Order::Fifo);
}

#[test]
fn test_join_handle_converts_into_pending_task() {
    let rt = RuntimeBuilder::new().build();

    let outcome = rt.block_on(async {
        let mut queue: WorkQueue<u32, &'static str> = WorkQueue::new();
        queue.add(task::spawn(async { Ok(21 * 2) }));

        let task = queue.next_task().expect("one task queued");
        assert!(!task.is_resolved());
        task.await
    });

    assert_eq!(outcome, Ok(Some(42)));
}

#[test]
fn test_rejected_task_resolves_to_error() {
    let rt = RuntimeBuilder::new().build();
    let task: Task<u32, &'static str> = Task::rejected("nope");

    assert!(task.is_resolved());
    assert_eq!(rt.block_on(task), Err("nope"));
}

#[test]
fn test_extend_and_clear() {
    let mut queue: WorkQueue<u32, ()> = WorkQueue::new();

    queue.extend((0..4).map(Task::resolved));
    assert_eq!(queue.len(), 4);

    queue.clear();
    assert!(queue.is_empty());
}
