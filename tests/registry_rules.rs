use cascade::{Engine, RuleBody};

#[test]
fn unknown_name_returns_none() {
    let engine = Engine::new();

    assert!(engine.definition("non-existing").is_none());
}

#[test]
fn setting_and_retrieving_a_rule() {
    let engine = Engine::new();
    engine.rule("test", "some.dep > another.dep");

    let def = engine.definition("test").expect("definition stored");
    assert_eq!(def.len(), 1);
    assert!(matches!(def.bodies()[0], RuleBody::Reference(_)));
}

#[test]
fn configuration_calls_chain() {
    let engine = Engine::new();
    engine
        .rule("one", RuleBody::immediate(|| Ok(())))
        .rule("two", RuleBody::immediate(|| Ok(())))
        .rule("three", "one > two");

    assert_eq!(engine.registry().len(), 3);
}

#[test]
fn deleting_a_rule() {
    let engine = Engine::new();
    engine.rule("toDelete", "will be deleted");
    engine.remove_rule("toDelete");

    assert!(engine.definition("toDelete").is_none());
}

#[test]
fn removing_an_unknown_rule_is_a_noop() {
    let engine = Engine::new();
    engine.remove_rule("never-registered");

    assert!(engine.registry().is_empty());
}

#[test]
fn clearing_removes_every_rule() {
    let engine = Engine::new();
    engine.rule("NAME1", "");
    engine.rule("NAME2", "");

    engine.clear_rules();

    assert!(engine.definition("NAME1").is_none());
    assert!(engine.definition("NAME2").is_none());
    assert!(engine.registry().is_empty());
}

#[test]
fn second_registration_appends_rather_than_overwrites() {
    let engine = Engine::new();
    engine.rule("myFunction", RuleBody::immediate(|| Ok(())));
    engine.rule("myFunction", RuleBody::immediate(|| Ok(())));

    let def = engine.definition("myFunction").expect("definition stored");
    assert_eq!(def.len(), 2);
}

#[test]
fn bulk_registration_installs_each_entry() {
    let engine = Engine::new();
    engine.rules([
        ("one", RuleBody::immediate(|| Ok(()))),
        ("two", RuleBody::immediate(|| Ok(()))),
        ("three", RuleBody::reference("one > two")),
    ]);

    assert_eq!(engine.registry().len(), 3);
    assert!(matches!(
        engine.definition("three").unwrap().bodies()[0],
        RuleBody::Reference(_)
    ));
}

#[test]
fn body_at_reads_by_index() {
    let engine = Engine::new();
    engine.rule("r", RuleBody::immediate(|| Ok(())));
    engine.rule("r", RuleBody::reference("other"));

    assert!(matches!(
        engine.registry().body_at("r", 0),
        Some(RuleBody::Immediate(_))
    ));
    assert!(matches!(
        engine.registry().body_at("r", 1),
        Some(RuleBody::Reference(_))
    ));
    assert!(engine.registry().body_at("r", 2).is_none());
    assert!(engine.registry().body_at("missing", 0).is_none());
}
