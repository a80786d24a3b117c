use gurobind::{Environment, Model, ModelStatus, SolverConfig, VarData};
use gurobind_sys::{
    GRB_ERROR_DATA_NOT_AVAILABLE, GRB_ERROR_IIS_NOT_INFEASIBLE, GRB_ERROR_INVALID_ARGUMENT,
    GRB_ERROR_NUMERIC, GRB_ERROR_UNKNOWN_PARAMETER, GRB_MAXIMIZE,
};
use gurobind_testkit::Stub;

fn model_env() -> (Stub, Environment<Stub>) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
    let stub = Stub::new();
    let env = Environment::new(stub.clone(), None).expect("env");
    (stub, env)
}

#[test]
fn test_int_param_roundtrip_on_both_scopes() {
    let (_stub, env) = model_env();
    env.set_int_param("Seed", 17).expect("env param");
    assert_eq!(env.get_int_param("Seed"), Ok(17));

    // A model copies its environment's parameters at creation.
    let model = Model::new(&env, None, 1, VarData::default()).expect("model");
    assert_eq!(model.get_int_param("Seed"), Ok(17));
    model.set_int_param("Seed", 3).expect("model param");
    assert_eq!(model.get_int_param("Seed"), Ok(3));
    assert_eq!(env.get_int_param("Seed"), Ok(17));

    model.set_str_param("ResultFile", "out.sol").expect("str param");
    assert_eq!(model.get_str_param("ResultFile").as_deref(), Ok("out.sol"));
    let err = model.get_float_param("Bogus").unwrap_err();
    assert_eq!(err.native_code(), Some(GRB_ERROR_UNKNOWN_PARAMETER));
}

#[test]
fn test_array_set_then_get() {
    let (_stub, env) = model_env();
    let mut model = Model::new(&env, None, 4, VarData::default()).expect("model");
    model
        .set_float_attr_array("LB", 1, 2, &[1.0, 2.0])
        .expect("set LB");
    assert_eq!(
        model.get_float_attr_array("LB", 0, 4),
        Ok(vec![0.0, 1.0, 2.0, 0.0])
    );
    model
        .set_int_attr_array("BranchPriority", 0, 2, &[5_i32, 6])
        .expect("set priorities");
    assert_eq!(model.get_int_attr_array("BranchPriority", 0, 2), Ok(vec![5, 6]));
    model.set_float_attr_element("Obj", 3, -1.0).expect("set Obj");
    assert_eq!(model.get_float_attr_element("Obj", 3), Ok(-1.0));
}

#[test]
fn test_values_shorter_than_len_are_rejected() {
    let (stub, env) = model_env();
    let mut model = Model::new(&env, None, 4, VarData::default()).expect("model");
    stub.clear_calls();
    let err = model
        .set_float_attr_array("UB", 0, 3, &[1.0, 2.0])
        .unwrap_err();
    assert_eq!(err.param(), Some("set_float_attr_array:values"));
    let err = model.get_int_attr_array("BranchPriority", 0, 0).unwrap_err();
    assert_eq!(err.param(), Some("get_int_attr_array:len"));
    assert!(stub.calls().is_empty());
}

#[test]
fn test_native_codes_pass_through_unmodified() {
    let (stub, env) = model_env();
    let mut model = Model::new(&env, None, 2, VarData::default()).expect("model");

    stub.fail_next(GRB_ERROR_NUMERIC);
    let err = model.optimize().unwrap_err();
    assert_eq!(err.native_code(), Some(GRB_ERROR_NUMERIC));
    assert_eq!(err.code(), "NATIVE_STATUS");

    // No solution yet.
    let err = model.objective_value().unwrap_err();
    assert_eq!(err.native_code(), Some(GRB_ERROR_DATA_NOT_AVAILABLE));

    stub.fail_next(GRB_ERROR_NUMERIC);
    let err = model.get_float_attr_array("LB", 0, 2).unwrap_err();
    assert_eq!(err.native_code(), Some(GRB_ERROR_NUMERIC));

    // Read-only attribute.
    let err = model.set_int_attr("NumVars", 9).unwrap_err();
    assert_eq!(err.native_code(), Some(GRB_ERROR_INVALID_ARGUMENT));
}

#[test]
fn test_crossed_bounds_yield_infeasible_and_iis() {
    let (_stub, env) = model_env();
    let mut model = Model::new(&env, None, 3, VarData::default()).expect("model");

    let err = model.compute_iis().unwrap_err();
    assert_eq!(err.native_code(), Some(GRB_ERROR_IIS_NOT_INFEASIBLE));

    model.set_float_attr_element("LB", 1, 5.0).expect("lb");
    model.set_float_attr_element("UB", 1, 2.0).expect("ub");
    model.optimize().expect("optimize");
    let status = model.status().expect("status");
    assert_eq!(status, ModelStatus::Infeasible);
    assert!(!status.has_solution());

    model.compute_iis().expect("iis");
    assert_eq!(model.get_int_attr("IISMinimal"), Ok(1));
    assert_eq!(model.get_int_attr_array("IISLB", 0, 3), Ok(vec![0, 1, 0]));
    assert_eq!(model.get_int_attr_list("IISUB", 1, &[1_i32]), Ok(vec![1]));
}

#[test]
fn test_scalar_attributes() {
    let (_stub, env) = model_env();
    let mut model = Model::new(&env, Some("first"), 1, VarData::default()).expect("model");
    model.set_str_attr("ModelName", "second").expect("rename");
    assert_eq!(model.get_str_attr("ModelName").as_deref(), Ok("second"));
    model.set_int_attr("ModelSense", GRB_MAXIMIZE).expect("sense");
    assert_eq!(model.get_int_attr("ModelSense"), Ok(GRB_MAXIMIZE));
    model.set_float_attr("ObjCon", 4.0).expect("constant");
    assert_eq!(model.get_float_attr("ObjCon"), Ok(4.0));
    model.set_str_attr_element("VarName", 0, "z").expect("var name");
    assert_eq!(model.get_str_attr_element("VarName", 0).as_deref(), Ok("z"));
}

#[test]
fn test_config_applies_before_start() {
    let stub = Stub::new();
    let mut env = Environment::empty(stub.clone()).expect("env");
    let config = SolverConfig::from_json_str(
        r#"{"time_limit": 5.0, "mip_gap": 0.02, "log_to_console": false}"#,
    )
    .expect("config");
    config.apply(&env).expect("apply");
    env.start().expect("start");

    assert_eq!(env.get_float_param("TimeLimit"), Ok(5.0));
    assert_eq!(env.get_float_param("MIPGap"), Ok(0.02));
    assert_eq!(env.get_int_param("LogToConsole"), Ok(0));
    assert_eq!(stub.call_count("GRBsetdblparam"), 2);
    assert_eq!(stub.call_count("GRBsetintparam"), 1);
}
