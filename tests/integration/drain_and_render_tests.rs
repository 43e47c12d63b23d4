use std::sync::{Arc, Mutex};

use oxide_elmish::{create_test_spawner, Init, Runtime};

use super::{build_element, TestLogic, TestMessage, TestModel, TestView};

#[test]
fn given_no_messages_should_render_initial_view_once() {
    let element = build_element().build();

    element.spawner.run_all();

    assert_eq!(element.renders.count(), 1);
    assert_eq!(element.counts(), vec![0]);
    assert!(element.seen().is_empty());
}

#[test]
fn given_a_single_send_should_render_the_updated_model() {
    let element = build_element().build();

    element.send.send(TestMessage::Increment).unwrap();

    assert_eq!(element.counts(), vec![0, 1]);
}

#[test]
fn given_increment_then_decrement_sent_as_a_burst_should_render_once_with_the_last_model() {
    let element = build_element().build();

    element
        .send
        .send_all([TestMessage::Increment, TestMessage::Decrement])
        .unwrap();

    // 1. Initial render (count=0)
    // 2. After the burst settled (count=1, then count=0)
    assert_eq!(element.counts(), vec![0, 0]);
    assert_eq!(element.seen(), vec![0, 1]);
}

#[test]
fn given_consecutive_single_sends_should_render_after_each_one() {
    let element = build_element().build();

    element.send.send(TestMessage::Increment).unwrap();
    element.send.send(TestMessage::Decrement).unwrap();

    assert_eq!(element.counts(), vec![0, 1, 0]);
}

#[test]
fn given_a_burst_should_apply_each_message_to_the_model_the_previous_one_produced() {
    let element = build_element().build();

    element
        .send
        .send_all([
            TestMessage::Increment,
            TestMessage::Increment,
            TestMessage::Decrement,
            TestMessage::Increment,
        ])
        .unwrap();

    assert_eq!(element.seen(), vec![0, 1, 2, 1]);
    assert_eq!(element.counts(), vec![0, 2]);
}

#[test]
fn given_an_empty_burst_should_not_render() {
    let element = build_element().build();

    element.send.send_all(Vec::<TestMessage>::new()).unwrap();

    assert_eq!(element.renders.count(), 1);
}

#[test]
fn given_view_callback_invoked_should_render_again() {
    let element = build_element().build();

    // Cloned out first: the callback renders synchronously.
    let on_increment = element
        .renders
        .with_renders(|renders| renders[0].on_increment.clone());
    on_increment();

    assert_eq!(element.counts(), vec![0, 1]);
}

#[test]
fn given_a_send_during_the_initial_render_should_process_it_after_initialization() {
    let counts = Arc::new(Mutex::new(Vec::new()));
    let recorded = counts.clone();
    let renderer = move |view: TestView| {
        let first = {
            let mut counts = recorded.lock().unwrap();
            counts.push(view.count);
            counts.len() == 1
        };
        if first {
            (view.on_increment)();
        }
    };

    let logic = TestLogic {
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let _send = Runtime::new(logic, renderer, create_test_spawner())
        .use_element(Init::Model(TestModel::initial()))
        .unwrap();

    assert_eq!(*counts.lock().unwrap(), vec![0, 1]);
}

#[test]
fn given_a_send_during_a_later_render_should_drain_it_after_that_render() {
    let counts = Arc::new(Mutex::new(Vec::new()));
    let recorded = counts.clone();
    let renderer = move |view: TestView| {
        recorded.lock().unwrap().push(view.count);
        if view.count == 1 {
            (view.on_increment)();
        }
    };

    let logic = TestLogic {
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let send = Runtime::new(logic, renderer, create_test_spawner())
        .use_element(Init::Model(TestModel::initial()))
        .unwrap();

    send.send(TestMessage::Increment).unwrap();

    assert_eq!(*counts.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn given_interleaved_single_sends_and_bursts_should_preserve_push_order() {
    let element = build_element().build();

    element.send.send(TestMessage::Increment).unwrap();
    element
        .send
        .send_all([TestMessage::Decrement, TestMessage::Decrement])
        .unwrap();
    element.send.send(TestMessage::Increment).unwrap();

    assert_eq!(element.seen(), vec![0, 1, 0, -1]);
    assert_eq!(element.counts(), vec![0, 1, -1, 0]);
}
