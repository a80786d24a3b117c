use gurobind::{Buffer, Environment, Model, ModelStatus, Sense, SparseTerms, VarData, VarType};
use gurobind_testkit::Stub;

#[test]
fn test_two_variable_scenario() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let stub = Stub::new();
    let mut env = Environment::empty(stub.clone()).expect("empty env");
    env.set_int_param("OutputFlag", 0).expect("set OutputFlag");
    env.start().expect("start env");

    // Two continuous variables in [0, 10] with objective coefficient 1.
    let obj = [1.0, 1.0];
    let lb = [0.0, 0.0];
    let ub = [10.0, 10.0];
    let mut model = Model::new(
        &env,
        Some("smoke"),
        2,
        VarData {
            obj: Some(Buffer::from(&obj)),
            lb: Some(Buffer::from(&lb)),
            ub: Some(Buffer::from(&ub)),
            ..VarData::default()
        },
    )
    .expect("new model");

    // x0 + x1 <= 10
    model
        .add_constr(
            SparseTerms::new(2, &[0_i32, 1], &[1.0, 1.0]),
            Sense::LessEqual,
            10.0,
            Some("cap"),
        )
        .expect("add constraint");
    model.optimize().expect("optimize");

    assert_eq!(model.status(), Ok(ModelStatus::Optimal));
    assert_eq!(model.num_vars(), Ok(2));
    assert_eq!(model.num_constrs(), Ok(1));
    let obj_value = model.objective_value().expect("objective value");
    assert!(obj_value.abs() < 1e-9, "Expected objective ~0, got {obj_value}");
    assert_eq!(model.solution(), Ok(vec![0.0, 0.0]));

    drop(model);
    drop(env);
    assert_eq!(
        stub.calls(),
        vec![
            "GRBemptyenv",
            "GRBsetintparam",
            "GRBstartenv",
            "GRBnewmodel",
            "GRBaddconstr",
            "GRBoptimize",
            "GRBgetintattr",
            "GRBgetintattr",
            "GRBgetintattr",
            "GRBgetdblattr",
            "GRBgetintattr",
            "GRBgetdblattrarray",
            "GRBfreemodel",
            "GRBfreeenv",
        ]
    );
}

#[test]
fn test_bounded_variable_moves_objective() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let env = Environment::new(Stub::new(), None).expect("env");
    let mut model = Model::new(&env, None, 0, VarData::default()).expect("model");
    model
        .add_var(
            SparseTerms::new(0, &[] as &[i32], &[] as &[f64]),
            2.0,
            3.0,
            8.0,
            VarType::Integer,
            Some("y"),
        )
        .expect("add var");
    model.set_float_attr("ObjCon", 1.5).expect("objective constant");
    model.optimize().expect("optimize");

    assert_eq!(model.status(), Ok(ModelStatus::Optimal));
    let obj_value = model.objective_value().expect("objective value");
    assert!(
        (obj_value - 7.5).abs() < 1e-9,
        "Expected objective ~7.5, got {obj_value}"
    );
    assert_eq!(model.get_float_attr_element("X", 0), Ok(3.0));
    assert_eq!(model.get_str_attr_element("VarName", 0).as_deref(), Ok("y"));
}
