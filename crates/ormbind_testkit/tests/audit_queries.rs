//! End-to-end tests for audit criteria over in-memory metadata.

use ormbind_audit::{
    AuditConfiguration, AuditCriterion, AuditEntity, AuditError, AuditQuery, Connective,
    ParameterValue, Parameters, PropertyAuditExpression, PropertyNameGetter, QueryBuilder,
    RevisionType,
};
use ormbind_testkit::prelude::*;
use std::sync::Arc;
use std::thread;

fn contribute(criterion: &dyn AuditCriterion) -> (Result<(), AuditError>, Parameters) {
    let metadata = person_metadata();
    let service = audit_service(&metadata);
    let mut qb = QueryBuilder::new("Person_AUD", "e");
    let mut parameters = Parameters::new("e", Connective::And);
    let result =
        criterion.add_to_query(&service, metadata.as_ref(), PERSON, &mut qb, &mut parameters);
    (result, parameters)
}

#[test]
fn scalar_property_comparison_emits_one_clause() {
    let (result, parameters) = contribute(&PropertyAuditExpression::new("age".into(), "age", "="));
    result.unwrap();
    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters.render().0, "e.age = e.age");
}

#[test]
fn relation_property_comparison_emits_nothing() {
    for (left, right) in [("manager", "age"), ("age", "manager"), ("friends", "friends")] {
        let (result, parameters) =
            contribute(&PropertyAuditExpression::new(left.into(), right, "="));
        assert!(matches!(
            result,
            Err(AuditError::UnsupportedRelationOperation { .. })
        ));
        assert!(parameters.is_empty());
    }
}

#[test]
fn deferred_property_resolves_per_entity() {
    let getter = PropertyNameGetter::deferred(|entity| {
        Ok(if entity == PERSON { "name" } else { "title" }.to_string())
    });
    let (result, parameters) = contribute(&PropertyAuditExpression::new(getter, "name", "<>"));
    result.unwrap();
    assert_eq!(parameters.render().0, "e.name <> e.name");
}

#[test]
fn full_query_renders() {
    init_test_logging();
    let metadata = person_metadata();
    let service = audit_service(&metadata);

    let query = AuditQuery::for_entity(PERSON)
        .add(AuditEntity::id().eq(42))
        .add(AuditEntity::or(
            AuditEntity::property("age").between(18, 30),
            AuditEntity::related_id("manager").eq(7),
        ))
        .add(AuditEntity::revision_type().ne(RevisionType::Del))
        .add_order(AuditEntity::revision_number().desc());

    let rendered = query.build(&service, metadata.as_ref()).unwrap().to_query();
    assert_eq!(
        rendered.text,
        "select e from Person_AUD e where e.originalId.id = :_p0 \
         and ((e.age >= :_p1 and e.age <= :_p2) or e.manager.id = :_p3) \
         and e.REVTYPE <> :_p4 order by e.originalId.REV.id desc"
    );
    assert_eq!(rendered.parameters.len(), 5);
    assert_eq!(rendered.parameters["_p4"], ParameterValue::Integer(2));
}

#[test]
fn configuration_renames_paths() {
    let metadata = person_metadata();
    let configuration = AuditConfiguration::default()
        .with_original_id_prop_name("oid")
        .with_revision_field_name("rev")
        .with_modified_flag_suffix("_changed")
        .with_audit_entity_suffix("_HIST")
        .with_entity_alias("h");
    let service = audit_service_with(configuration, &metadata);

    let query = AuditQuery::for_entity(PERSON)
        .add(AuditEntity::property("name").has_changed())
        .add(AuditEntity::revision_number().gt(1));
    let rendered = query.build(&service, metadata.as_ref()).unwrap().to_query();
    assert_eq!(
        rendered.text,
        "select h from Person_HIST h where h.name_changed = :_p0 and h.oid.rev.id > :_p1"
    );
}

#[test]
fn unknown_entity_is_reported() {
    let metadata = person_metadata();
    let service = audit_service(&metadata);
    let err = AuditQuery::for_entity("Invoice")
        .add(AuditEntity::property("total").gt(0))
        .build(&service, metadata.as_ref())
        .unwrap_err();
    assert_eq!(err, AuditError::unknown_entity("Invoice"));
}

#[test]
fn criteria_are_shared_across_threads() {
    let metadata = person_metadata();
    let service = Arc::new(audit_service(&metadata));
    let criterion: Arc<dyn AuditCriterion> =
        Arc::new(AuditEntity::property("age").ge_property("age"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let metadata = Arc::clone(&metadata);
            let service = Arc::clone(&service);
            let criterion = Arc::clone(&criterion);
            thread::spawn(move || {
                let mut qb = QueryBuilder::new("Person_AUD", "e");
                let mut parameters = Parameters::new("e", Connective::And);
                criterion
                    .add_to_query(&service, metadata.as_ref(), PERSON, &mut qb, &mut parameters)
                    .unwrap();
                parameters.render().0
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "e.age >= e.age");
    }
}

#[test]
fn metadata_registered_later_is_visible() {
    let metadata = person_metadata();
    let service = audit_service(&metadata);
    let query = AuditQuery::for_entity(PERSON).add(AuditEntity::property("salary").gt(0));
    assert!(query.build(&service, metadata.as_ref()).is_err());

    metadata.add_property(PERSON, "salary");
    assert!(query.build(&service, metadata.as_ref()).is_ok());
}
