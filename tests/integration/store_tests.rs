use std::sync::{Arc, Mutex};

use oxide_elmish::{
    create_test_spawner, ElmishError, Init, ModelStore, Runtime, State, Store, TestRenderer,
};

use super::{TestLogic, TestMessage, TestModel, TestView};

fn start_counter<Storage>(
    store: Storage,
    init: Init<TestModel, TestMessage>,
) -> (oxide_elmish::Sender<TestMessage>, TestRenderer<TestView>)
where
    Storage: ModelStore<TestModel> + Send + 'static,
{
    let renders = TestRenderer::new();
    let logic = TestLogic {
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let send = Runtime::new(logic, renders.clone(), create_test_spawner())
        .with_store(store)
        .use_element(init)
        .unwrap();
    (send, renders)
}

fn counter(count: i32) -> TestModel {
    TestModel {
        count,
        ..TestModel::initial()
    }
}

#[test]
fn given_a_put_should_read_the_same_value_back() {
    let store = Store::new();
    let key = store.key();

    store.put(key, 1);

    assert_eq!(store.get(key), Ok(1));
}

#[test]
fn given_an_existing_value_put_should_overwrite_it() {
    let store = Store::new();
    let key = store.key();

    store.put(key, 1);
    store.put(key, 2);

    assert_eq!(store.get(key), Ok(2));
}

#[test]
fn given_a_never_written_key_get_should_fail_with_key_not_found() {
    let store: Store<i32> = Store::new();
    let key = store.key();

    assert_eq!(store.get(key), Err(ElmishError::KeyNotFound(key.id())));
}

#[test]
fn given_a_key_exists_should_only_be_true_after_a_put() {
    let store = Store::new();
    let key = store.key();

    assert!(!store.exists(key));
    store.put(key, "data");
    assert!(store.exists(key));
}

#[test]
fn given_separately_minted_keys_should_never_collide() {
    let first: Store<i32> = Store::new();
    let second: Store<i32> = Store::new();

    let a = first.key();
    let b = first.key();
    let c = second.key();
    let copy = a;

    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_eq!(a, copy);

    first.put(a, 1);
    assert!(!first.exists(b));
    assert!(!second.exists(a));
}

#[test]
fn given_a_reference_model_get_should_preserve_identity() {
    let store = Store::new();
    let key = store.key();
    let model = Arc::new(String::from("shared"));

    store.put(key, model.clone());

    assert!(Arc::ptr_eq(&store.get(key).unwrap(), &model));
}

#[test]
fn given_a_fresh_state_get_should_be_empty() {
    let state: State<i32> = State::new();

    assert_eq!(state.get(), None);
    assert!(!state.exists());
}

#[test]
fn given_a_state_put_should_overwrite_the_single_slot() {
    let state = State::new();

    state.put(1);
    state.put(2);

    assert_eq!(state.get(), Some(2));
    assert!(state.exists());
}

#[test]
fn given_a_shared_state_the_runtime_should_persist_every_processed_model() {
    let state = State::new();
    let (send, _renders) = start_counter(state.clone(), Init::Model(counter(0)));

    assert_eq!(state.get().map(|model| model.count), Some(0));

    send.send_all([TestMessage::Increment, TestMessage::Increment])
        .unwrap();

    assert_eq!(state.get().map(|model| model.count), Some(2));
}

#[test]
fn given_two_keys_in_one_store_elements_should_stay_independent() {
    let store = Store::new();
    let left = store.key();
    let right = store.key();

    let (send_left, renders_left) = start_counter(store.bind(left), Init::Model(counter(0)));
    let (send_right, renders_right) = start_counter(store.bind(right), Init::Model(counter(10)));

    send_left.send(TestMessage::Increment).unwrap();
    send_right.send(TestMessage::Decrement).unwrap();
    send_right.send(TestMessage::Decrement).unwrap();

    assert_eq!(store.get(left).map(|model| model.count), Ok(1));
    assert_eq!(store.get(right).map(|model| model.count), Ok(8));
    assert_eq!(renders_left.count(), 2);
    assert_eq!(renders_right.count(), 3);
}

#[test]
fn given_a_key_with_a_stored_model_use_element_should_resume_without_running_init() {
    let store = Store::new();
    let key = store.key();

    let (first, _renders) = start_counter(store.bind(key), Init::Model(counter(0)));
    first.send(TestMessage::Increment).unwrap();

    let (second, renders) = start_counter(
        store.bind(key),
        Init::with(|| panic!("init must not run for a stored model")),
    );

    assert_eq!(renders.count(), 1);
    renders.last(|view| assert_eq!(view.count, 1));

    second.send(TestMessage::Increment).unwrap();
    assert_eq!(store.get(key).map(|model| model.count), Ok(2));
}
