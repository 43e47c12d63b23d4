use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use oxide_elmish::{ElmishError, MessageQueue};

#[test]
fn given_pushed_messages_pop_should_return_them_in_push_order() {
    let queue = MessageQueue::new();

    queue.push(1).unwrap();
    queue.push(2).unwrap();
    queue.push(3).unwrap();

    assert_eq!(queue.size(), 3);
    assert_eq!(queue.pop(), Some(1));
    assert_eq!(queue.pop(), Some(2));
    assert_eq!(queue.pop(), Some(3));
    assert_eq!(queue.size(), 0);
}

#[test]
fn given_an_empty_queue_pop_should_return_none() {
    let queue: MessageQueue<i32> = MessageQueue::new();

    assert_eq!(queue.pop(), None);
}

#[test]
fn given_a_notification_should_fire_once_per_push() {
    let queue = MessageQueue::new();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    queue.on_push(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    queue.push("a").unwrap();
    queue.push("b").unwrap();

    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[test]
fn given_a_replaced_notification_only_the_latest_should_fire() {
    let queue = MessageQueue::new();
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let counter = first.clone();
    queue.on_push(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let counter = second.clone();
    queue.on_push(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    queue.push(()).unwrap();

    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn given_a_push_from_inside_the_notification_should_land_at_the_tail() {
    let queue = MessageQueue::new();
    let inner = queue.clone();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    queue.on_push(move || {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            inner.push("from notification")?;
        }
        Ok(())
    });

    queue.push("first").unwrap();
    queue.push("second").unwrap();

    assert_eq!(queue.pop(), Some("first"));
    assert_eq!(queue.pop(), Some("from notification"));
    assert_eq!(queue.pop(), Some("second"));
}

#[test]
fn given_a_failing_notification_push_should_report_it_and_keep_the_message() {
    let queue = MessageQueue::new();
    queue.on_push(|| Err(ElmishError::UninitializedModel));

    assert_eq!(queue.push(7), Err(ElmishError::UninitializedModel));
    assert_eq!(queue.size(), 1);
}
