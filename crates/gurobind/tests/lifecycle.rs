use gurobind::{EnvState, Environment, Model, VarData};
use gurobind_sys::{GRB_ERROR_NO_LICENSE, GRB_ERROR_OUT_OF_MEMORY};
use gurobind_testkit::Stub;
use std::collections::HashSet;

#[test]
fn test_each_environment_freed_exactly_once() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let stub = Stub::new();
    let envs: Vec<_> = (0..5)
        .map(|_| Environment::empty(stub.clone()).expect("env"))
        .collect();
    assert_eq!(stub.live_envs(), 5);
    drop(envs);

    assert_eq!(stub.call_count("GRBfreeenv"), 5);
    let created: HashSet<_> = stub.envs_created().into_iter().collect();
    let freed = stub.envs_freed();
    let unique: HashSet<_> = freed.iter().copied().collect();
    assert_eq!(freed.len(), unique.len(), "an environment was freed twice");
    assert_eq!(created, unique);
}

#[test]
fn test_model_release_frees_only_the_model() {
    let stub = Stub::new();
    let env = Environment::new(stub.clone(), None).expect("env");
    let first = Model::new(&env, Some("a"), 1, VarData::default()).expect("model");
    let second = Model::new(&env, Some("b"), 1, VarData::default()).expect("model");
    assert_eq!(stub.live_models(), 2);

    drop(first);
    assert_eq!(stub.models_freed().len(), 1);
    assert_eq!(stub.call_count("GRBfreeenv"), 0);
    assert_eq!(second.get_str_attr("ModelName").as_deref(), Ok("b"));

    drop(second);
    assert_eq!(stub.live_models(), 0);
    assert_eq!(stub.live_envs(), 1);
    drop(env);
    assert_eq!(stub.live_envs(), 0);
}

#[test]
fn test_failed_creation_leaves_nothing_live() {
    let stub = Stub::new();
    stub.fail_next(GRB_ERROR_NO_LICENSE);
    let err = Environment::empty(stub.clone()).unwrap_err();
    assert_eq!(err.native_code(), Some(GRB_ERROR_NO_LICENSE));
    assert_eq!(stub.live_envs(), 0);

    let env = Environment::new(stub.clone(), None).expect("env");
    stub.fail_next(GRB_ERROR_OUT_OF_MEMORY);
    let err = Model::new(&env, None, 3, VarData::default()).unwrap_err();
    assert_eq!(err.native_code(), Some(GRB_ERROR_OUT_OF_MEMORY));
    assert_eq!(stub.live_models(), 0);
    assert_eq!(stub.call_count("GRBfreemodel"), 0);
}

#[test]
fn test_start_failure_keeps_env_empty() {
    let stub = Stub::new();
    let mut env = Environment::empty(stub.clone()).expect("env");
    stub.fail_next(GRB_ERROR_NO_LICENSE);
    let err = env.start().unwrap_err();
    assert_eq!(err.native_code(), Some(GRB_ERROR_NO_LICENSE));
    assert_eq!(env.state(), EnvState::Empty);

    env.start().expect("second start");
    assert_eq!(env.state(), EnvState::Started);
}

#[test]
fn test_environment_moves_across_threads() {
    let stub = Stub::new();
    let env = Environment::new(stub.clone(), None).expect("env");
    let handle = std::thread::spawn(move || {
        env.set_int_param("Threads", 1).expect("set Threads");
        drop(env);
    });
    handle.join().expect("thread panicked");
    assert_eq!(stub.live_envs(), 0);
}
