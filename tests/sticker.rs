use glam::{Vec2, Vec3};
use map_sticker_ext::behavior::sticker::Axis;
use map_sticker_ext::behavior::{BehaviorKind, OffsetMode};
use map_sticker_ext::entity::EntityId;
use map_sticker_ext::math::{rotate_offset, Transform};
use map_sticker_ext::property::SerializedContent;
use map_sticker_ext::scene::Scene;
use rstest::rstest;

const DT: f64 = 1.0 / 60.0;

fn assert_close(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < 1e-3,
        "expected {expected:?}, got {actual:?}"
    );
}

fn spawn(scene: &mut Scene, name: &str, position: Vec3) -> EntityId {
    scene.spawn(name, Transform::from_position(position), Vec2::ONE)
}

fn spawn_sticker(
    scene: &mut Scene,
    name: &str,
    position: Vec3,
    properties: &[(&str, &str)],
) -> EntityId {
    let id = spawn(scene, name, position);
    let schema = BehaviorKind::Sticker3D.schema();
    let mut content = SerializedContent::new();
    (schema.initialize_content)(&mut content);
    for (name, value) in properties {
        assert!((schema.update_property)(&mut content, name, value));
    }
    scene.add_behavior(id, BehaviorKind::Sticker3D, &content).unwrap();
    id
}

fn position(scene: &Scene, id: EntityId) -> Vec3 {
    scene.entity(id).unwrap().transform.position
}

fn translate(scene: &mut Scene, id: EntityId, by: Vec3) {
    let p = position(scene, id);
    scene.set_position(id, p + by);
}

#[test]
fn moving_the_root_of_a_chain_moves_every_link_in_one_tick() {
    let mut scene = Scene::default();
    let a = spawn(&mut scene, "A", Vec3::ZERO);
    let b = spawn_sticker(&mut scene, "B", Vec3::new(10.0, 0.0, 0.0), &[]);
    let c = spawn_sticker(&mut scene, "C", Vec3::new(10.0, 5.0, 2.0), &[]);
    // stuck leaf-first so creation order and dependency order differ
    assert!(scene.stick_to(c, b));
    assert!(scene.stick_to(b, a));

    let v = Vec3::new(3.0, -4.0, 5.0);
    translate(&mut scene, a, v);
    scene.step(DT);

    assert_close(position(&scene, b), Vec3::new(10.0, 0.0, 0.0) + v);
    assert_close(position(&scene, c), Vec3::new(10.0, 5.0, 2.0) + v);
}

#[rstest]
#[case(OffsetMode::World)]
#[case(OffsetMode::Local)]
fn child_tracks_parent_every_tick(#[case] mode: OffsetMode) {
    let mut scene = Scene::default();
    let parent = spawn(&mut scene, "parent", Vec3::new(1.0, 2.0, 3.0));
    let child = spawn_sticker(&mut scene, "child", Vec3::new(6.0, 2.0, 4.0), &[]);
    assert!(scene.stick_to_with_mode(child, parent, mode));
    let offset = Vec3::new(5.0, 0.0, 1.0);

    for tick in 0..30 {
        let t = tick as f32;
        scene.set_position(parent, Vec3::new(t * 2.0, -t, 0.5 * t));
        scene.set_rotation(parent, Vec3::new(0.0, 0.0, t * 12.0));
        scene.step(DT);

        let parent_t = scene.entity(parent).unwrap().transform;
        let expected = match mode {
            OffsetMode::World => parent_t.position + offset,
            OffsetMode::Local => parent_t.position + rotate_offset(offset, parent_t.rotation),
        };
        assert_close(position(&scene, child), expected);
        assert!(scene.is_stuck(child));
    }
}

#[test]
fn local_offset_quarter_turn() {
    let mut scene = Scene::default();
    let parent = spawn(&mut scene, "parent", Vec3::ZERO);
    let local = [("offsetMode", "Local")];
    let child = spawn_sticker(&mut scene, "child", Vec3::new(10.0, 0.0, 0.0), &local);
    assert!(scene.stick_to(child, parent));

    scene.set_rotation(parent, Vec3::new(0.0, 0.0, 90.0));
    scene.step(DT);

    assert_close(position(&scene, child), Vec3::new(0.0, 10.0, 0.0));
    let rotation = scene.entity(child).unwrap().transform.rotation;
    assert_close(rotation, Vec3::new(0.0, 0.0, 90.0));
}

#[rstest]
#[case(Vec3::new(90.0, 0.0, 0.0), Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 0.0, 5.0))]
#[case(Vec3::new(0.0, 90.0, 0.0), Vec3::new(0.0, 0.0, 5.0), Vec3::new(5.0, 0.0, 0.0))]
#[case(Vec3::new(0.0, 0.0, 90.0), Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 5.0, 0.0))]
#[case(Vec3::new(180.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, -2.0, -3.0))]
fn local_offset_follows_each_parent_axis(
    #[case] rotation: Vec3,
    #[case] offset: Vec3,
    #[case] expected: Vec3,
) {
    let mut scene = Scene::default();
    let origin = Vec3::new(2.0, -1.0, 4.0);
    let parent = spawn(&mut scene, "parent", origin);
    let local = [("offsetMode", "Local")];
    let child = spawn_sticker(&mut scene, "child", origin + offset, &local);
    assert!(scene.stick_to(child, parent));

    scene.set_rotation(parent, rotation);
    scene.step(DT);

    assert_close(position(&scene, child), origin + expected);
}

#[test]
fn rotation_is_left_alone_when_not_following() {
    let mut scene = Scene::default();
    let parent = spawn(&mut scene, "parent", Vec3::ZERO);
    let child = spawn_sticker(&mut scene, "child", Vec3::X, &[("followRotation", "false")]);
    scene.set_rotation(child, Vec3::new(0.0, 0.0, 15.0));
    assert!(scene.stick_to(child, parent));
    assert!(!scene.follows_rotation(child));

    scene.set_rotation(parent, Vec3::new(0.0, 0.0, 90.0));
    scene.step(DT);
    let rotation = scene.entity(child).unwrap().transform.rotation;
    assert_eq!(rotation, Vec3::new(0.0, 0.0, 15.0));
}

#[test]
fn unstick_then_restick() {
    let mut scene = Scene::default();
    let parent = spawn(&mut scene, "parent", Vec3::ZERO);
    let child = spawn_sticker(&mut scene, "child", Vec3::new(1.0, 1.0, 1.0), &[]);

    assert!(scene.stick_to(child, parent));
    scene.unstick(child);
    assert!(!scene.is_stuck(child));
    scene.unstick(child);
    assert!(!scene.is_stuck(child));

    translate(&mut scene, parent, Vec3::new(100.0, 0.0, 0.0));
    scene.step(DT);
    assert_eq!(position(&scene, child), Vec3::new(1.0, 1.0, 1.0));

    assert!(scene.stick_to(child, parent));
    assert!(scene.is_stuck(child));
}

#[rstest]
#[case(OffsetMode::World, Axis::X, 12.5)]
#[case(OffsetMode::Local, Axis::Y, -3.25)]
#[case(OffsetMode::Local, Axis::Z, 0.0)]
fn offset_components_round_trip(
    #[case] mode: OffsetMode,
    #[case] axis: Axis,
    #[case] value: f32,
) {
    let mut scene = Scene::default();
    let parent = spawn(&mut scene, "parent", Vec3::ZERO);
    let child = spawn_sticker(&mut scene, "child", Vec3::new(4.0, 4.0, 4.0), &[]);
    assert!(scene.stick_to_with_mode(child, parent, mode));

    assert!(scene.set_offset(child, axis, value));
    assert_eq!(scene.offset(child, axis), value);
}

#[test]
fn offset_edits_apply_on_the_next_tick() {
    let mut scene = Scene::default();
    let parent = spawn(&mut scene, "parent", Vec3::new(5.0, 5.0, 5.0));
    let child = spawn_sticker(&mut scene, "child", Vec3::new(5.0, 5.0, 5.0), &[]);
    assert!(scene.stick_to(child, parent));

    scene.set_offset(child, Axis::Z, 7.0);
    scene.step(DT);
    assert_close(position(&scene, child), Vec3::new(5.0, 5.0, 12.0));
}

#[test]
fn destroy_with_parent_cascades_down_the_chain() {
    let mut scene = Scene::default();
    let a = spawn(&mut scene, "A", Vec3::ZERO);
    let b = spawn_sticker(&mut scene, "B", Vec3::X, &[("destroyWithStuckToObject", "1")]);
    let c = spawn_sticker(&mut scene, "C", Vec3::Y, &[("destroyWithStuckToObject", "true")]);
    assert!(scene.stick_to(b, a));
    assert!(scene.stick_to(c, b));

    scene.destroy(a);
    let report = scene.step(DT);

    assert_eq!(report.destroyed, vec![b, c]);
    assert!(report.unstuck.is_empty());
    assert!(!scene.is_alive(b));
    assert!(!scene.is_alive(c));
}

#[test]
fn orphaned_child_keeps_its_last_transform() {
    let mut scene = Scene::default();
    let parent = spawn(&mut scene, "parent", Vec3::ZERO);
    let child = spawn_sticker(&mut scene, "child", Vec3::new(2.0, 0.0, 0.0), &[]);
    assert!(scene.stick_to(child, parent));

    translate(&mut scene, parent, Vec3::new(0.0, 3.0, 0.0));
    scene.step(DT);
    scene.destroy(parent);
    assert!(!scene.is_stuck(child));

    let report = scene.step(DT);
    assert_eq!(report.unstuck, vec![child]);
    assert!(scene.is_alive(child));
    assert_close(position(&scene, child), Vec3::new(2.0, 3.0, 0.0));
}

#[test]
fn stale_parent_handle_never_resolves_to_a_new_object() {
    let mut scene = Scene::default();
    let parent = spawn(&mut scene, "parent", Vec3::ZERO);
    let child = spawn_sticker(&mut scene, "child", Vec3::X, &[]);
    assert!(scene.stick_to(child, parent));

    scene.destroy(parent);
    let newcomer = spawn(&mut scene, "newcomer", Vec3::new(50.0, 0.0, 0.0));
    assert_eq!(newcomer.index(), parent.index());
    assert!(!scene.is_stuck(child));

    scene.step(DT);
    assert_close(position(&scene, child), Vec3::X);
}
