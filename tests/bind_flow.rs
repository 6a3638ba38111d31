use std::cell::RefCell;
use std::rc::Rc;

use bevy::prelude::*;
use gridbind::schema::{PropertyValue, SchemaBuilder, WidgetType};
use gridbind::widgets::{Edit, EditorContext, ObjectId};
use gridbind::{BindOutcome, GridView, HeadlessGridView, PropertyChanged, RebindController};
use proptest::prelude::*;

fn transform_schema(builder: &mut SchemaBuilder, name: &str) {
    builder.set_headers(&["Property", "Value"]).unwrap();
    builder.begin_group("Transform");
    builder.add_item("position", Vec3::new(1.0, 2.0, 3.0), WidgetType::Vector3);
    builder.add_item("scale", 1.0, WidgetType::Real);
    builder.end_group();
    builder.add_item("name", name, WidgetType::String);
}

fn recorder() -> (Rc<RefCell<Vec<PropertyChanged>>>, gridbind::Listener) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let listener: gridbind::Listener = Rc::new(move |change: &PropertyChanged| sink.borrow_mut().push(change.clone()));
    (seen, listener)
}

#[test]
fn same_schema_and_target_keep_the_pair() {
    let mut controller = RebindController::default();
    let mut view = HeadlessGridView::default();
    let mut builder = SchemaBuilder::new();

    transform_schema(&mut builder, "crate");
    let first = controller.apply(&mut builder, Some(ObjectId(1)), &mut view, None);
    let grid = controller.grid().unwrap().clone();
    let group = grid.model.borrow().roots()[0];
    view.set_expanded(group, true);
    view.set_scroll(120.0);

    transform_schema(&mut builder, "crate");
    let second = controller.apply(&mut builder, Some(ObjectId(1)), &mut view, None);

    assert_eq!((first, second), (BindOutcome::Rebuilt, BindOutcome::Reused));
    let current = controller.grid().unwrap();
    assert!(Rc::ptr_eq(&current.model, &grid.model));
    assert!(Rc::ptr_eq(&current.dispatch, &grid.dispatch));
    assert!(view.is_expanded(group));
    assert_eq!(view.scroll(), 120.0);
    assert_eq!(builder.depth(), 0);
}

#[test]
fn changed_target_rebuilds_and_pushes_values() {
    let mut controller = RebindController::default();
    let mut view = HeadlessGridView::default();
    let mut builder = SchemaBuilder::new();

    transform_schema(&mut builder, "crate");
    controller.apply(&mut builder, Some(ObjectId(1)), &mut view, None);
    let old = controller.grid().unwrap().clone();
    old.model.borrow_mut().set_value("scale", PropertyValue::Float(9.0));
    view.set_scroll(50.0);

    transform_schema(&mut builder, "crate");
    let outcome = controller.apply(&mut builder, Some(ObjectId(2)), &mut view, None);

    assert_eq!(outcome, BindOutcome::Rebuilt);
    let new = controller.grid().unwrap();
    assert!(!new.same_pair(&old));
    assert!(view.grid().unwrap().same_pair(new));
    assert_eq!(view.scroll(), 0.0);
    assert_eq!(controller.value("scale"), Some(PropertyValue::Float(1.0)));
    assert_eq!(controller.value("position"), Some(PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0))));
}

#[test]
fn changed_schema_rebuilds() {
    let mut controller = RebindController::default();
    let mut view = HeadlessGridView::default();
    let mut builder = SchemaBuilder::new();

    transform_schema(&mut builder, "crate");
    controller.apply(&mut builder, None, &mut view, None);
    transform_schema(&mut builder, "barrel");
    assert_eq!(controller.apply(&mut builder, None, &mut view, None), BindOutcome::Rebuilt);
    assert_eq!(controller.value("name"), Some(PropertyValue::from("barrel")));
    assert_eq!(view.attach_count(), 2);
}

#[test]
fn rebind_moves_listener_to_the_new_model() {
    let mut controller = RebindController::default();
    let mut view = HeadlessGridView::default();
    let mut builder = SchemaBuilder::new();
    let (seen, listener) = recorder();

    transform_schema(&mut builder, "crate");
    controller.apply(&mut builder, Some(ObjectId(1)), &mut view, Some(listener.clone()));
    let old = controller.grid().unwrap().clone();
    assert!(seen.borrow().is_empty());

    transform_schema(&mut builder, "crate");
    controller.apply(&mut builder, Some(ObjectId(2)), &mut view, Some(listener));
    assert_eq!(old.model.borrow().listener_count(), 0);

    old.model.borrow_mut().set_value("name", PropertyValue::from("stale"));
    assert!(seen.borrow().is_empty());

    assert!(controller.set_value("name", PropertyValue::from("fresh")));
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].property, "name");
    assert_eq!(seen[0].cell.map(|c| (c.row, c.column)), Some((0, 1)));
}

#[test]
fn reused_bind_keeps_a_single_subscription() {
    let mut controller = RebindController::default();
    let mut view = HeadlessGridView::default();
    let mut builder = SchemaBuilder::new();
    let (seen, listener) = recorder();

    for _ in 0..3 {
        transform_schema(&mut builder, "crate");
        controller.apply(&mut builder, None, &mut view, Some(listener.clone()));
    }
    controller.set_value("scale", PropertyValue::Float(2.0));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn edit_commit_reaches_listener_and_view() {
    let mut controller = RebindController::default();
    let mut view = HeadlessGridView::default();
    let mut builder = SchemaBuilder::new();
    let (seen, listener) = recorder();
    let context = EditorContext::default();

    transform_schema(&mut builder, "crate");
    controller.apply(&mut builder, None, &mut view, Some(listener));
    view.refresh();

    let grid = controller.grid().unwrap().clone();
    let mut editor = grid
        .dispatch
        .begin_edit(&grid.model.borrow(), "position", &context)
        .unwrap();
    assert_eq!(editor.display(), "1,2,3");
    assert!(editor.apply(Edit::Axis(1, "5".into()), &context));
    assert!(editor.commit(&mut grid.model.borrow_mut(), &context));

    assert_eq!(controller.value("position"), Some(PropertyValue::Vec3(Vec3::new(1.0, 5.0, 3.0))));
    assert_eq!(seen.borrow().len(), 1);

    let dirty = view.refresh();
    let node = grid.model.borrow().node_for_property("position").unwrap();
    assert_eq!(dirty, [node]);
    assert_eq!(grid.model.borrow().node(node).unwrap().text, "1,5,3");
}

#[test]
fn constraint_follows_combo_selection() {
    let mut controller = RebindController::default();
    let mut view = HeadlessGridView::default();
    let mut builder = SchemaBuilder::new();
    let context = EditorContext::default();

    builder.add_item("kind", "plain", WidgetType::ComboBox).params("plain,special");
    builder
        .add_item("mode", "A", WidgetType::ComboBox)
        .params("A,B")
        .constrain("kind", &["special"]);
    controller.apply(&mut builder, None, &mut view, None);

    let grid = controller.grid().unwrap().clone();
    let mode = grid.model.borrow().node_for_property("mode").unwrap();
    assert!(!grid.model.borrow().node(mode).unwrap().enabled);

    let mut kind = grid.dispatch.begin_edit(&grid.model.borrow(), "kind", &context).unwrap();
    assert!(kind.apply(Edit::Select(1), &context));
    assert!(kind.commit(&mut grid.model.borrow_mut(), &context));
    assert!(grid.model.borrow().node(mode).unwrap().enabled);
    assert!(grid.dispatch.begin_edit(&grid.model.borrow(), "mode", &context).is_some());
}

#[test]
fn unbind_then_bind_rebuilds() {
    let mut controller = RebindController::default();
    let mut view = HeadlessGridView::default();
    let mut builder = SchemaBuilder::new();

    transform_schema(&mut builder, "crate");
    let text = builder.result();
    let values = builder.initial_values().clone();
    controller.bind(&text, &values, None, &mut view, None);
    controller.unbind(&mut view);
    view.detach();
    assert_eq!(controller.bind(&text, &values, None, &mut view, None), BindOutcome::Rebuilt);
}

proptest! {
    #[test]
    fn identical_builder_sessions_reuse(names in proptest::collection::vec("[a-z]{1,6}", 1..6)) {
        let mut controller = RebindController::default();
        let mut view = HeadlessGridView::default();
        let mut builder = SchemaBuilder::new();

        let session = |builder: &mut SchemaBuilder| {
            builder.begin_group("Group");
            for (i, name) in names.iter().enumerate() {
                builder.add_item(name, i as i64, WidgetType::Int);
            }
            builder.end_group();
        };

        session(&mut builder);
        controller.apply(&mut builder, None, &mut view, None);
        session(&mut builder);
        prop_assert_eq!(controller.apply(&mut builder, None, &mut view, None), BindOutcome::Reused);
        prop_assert_eq!(view.attach_count(), 1);
    }
}
