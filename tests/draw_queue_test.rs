use cgmath::{Deg, Matrix4, Vector3, Vector4};
use rally_ngin::{
    data_structures::transform::{ModelTransform, Transform},
    render::{DrawPass, DrawQueues},
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Bind(&'static str),
    Draw(&'static str, ModelTransform),
}

/// Recording pass implementation: remembers the bind/draw sequence the
/// batcher emits so tests can assert on it.
#[derive(Default)]
struct RecordingPass {
    events: Vec<Event>,
}

impl DrawPass<&'static str> for RecordingPass {
    fn bind(&mut self, resources: &&'static str) {
        self.events.push(Event::Bind(*resources));
    }

    fn draw(&mut self, resources: &&'static str, transform: &ModelTransform) {
        self.events.push(Event::Draw(*resources, transform.clone()));
    }
}

fn at(x: f32, y: f32, z: f32) -> ModelTransform {
    Vector3::new(x, y, z).into()
}

#[test]
fn should_bind_once_per_slot_and_draw_in_fifo_order() {
    let mut queues = DrawQueues::new();
    let tank = queues.register("tank");
    queues.enqueue(tank, Vector3::new(1.0, 0.0, 0.0));
    queues.enqueue(tank, Vector3::new(2.0, 0.0, 0.0));

    let mut pass = RecordingPass::default();
    queues.flush(&mut pass);

    assert_eq!(
        pass.events,
        vec![
            Event::Bind("tank"),
            Event::Draw("tank", at(1.0, 0.0, 0.0)),
            Event::Draw("tank", at(2.0, 0.0, 0.0)),
        ]
    );
}

#[test]
fn should_batch_interleaved_enqueues_by_slot_in_registration_order() {
    let mut queues = DrawQueues::new();
    let tank = queues.register("tank");
    let tree = queues.register("tree");
    queues.enqueue(tree, Vector3::new(0.0, 0.0, 1.0));
    queues.enqueue(tank, Vector3::new(1.0, 0.0, 0.0));
    queues.enqueue(tree, Vector3::new(0.0, 0.0, 2.0));

    let mut pass = RecordingPass::default();
    queues.flush(&mut pass);

    // slot order wins over submission order; within a slot FIFO holds
    assert_eq!(
        pass.events,
        vec![
            Event::Bind("tank"),
            Event::Draw("tank", at(1.0, 0.0, 0.0)),
            Event::Bind("tree"),
            Event::Draw("tree", at(0.0, 0.0, 1.0)),
            Event::Draw("tree", at(0.0, 0.0, 2.0)),
        ]
    );
}

#[test]
fn should_skip_empty_slots_entirely() {
    let mut queues = DrawQueues::new();
    let _tank = queues.register("tank");
    let tree = queues.register("tree");
    queues.enqueue(tree, Vector3::new(0.0, 0.0, 0.0));

    let mut pass = RecordingPass::default();
    queues.flush(&mut pass);

    assert_eq!(
        pass.events,
        vec![Event::Bind("tree"), Event::Draw("tree", at(0.0, 0.0, 0.0))]
    );
}

#[test]
fn should_leave_all_queues_empty_after_flush() {
    let mut queues = DrawQueues::new();
    let tank = queues.register("tank");
    queues.enqueue(tank, Vector3::new(1.0, 2.0, 3.0));
    assert!(!queues.is_empty());

    queues.flush(&mut RecordingPass::default());
    assert!(queues.is_empty());

    // a second flush with nothing enqueued performs no binds and no draws
    let mut pass = RecordingPass::default();
    queues.flush(&mut pass);
    assert!(pass.events.is_empty());
}

#[test]
fn should_start_empty_and_flush_without_events() {
    let mut queues: DrawQueues<&'static str> = DrawQueues::new();
    queues.register("tank");
    assert!(queues.is_empty());
    let mut pass = RecordingPass::default();
    queues.flush(&mut pass);
    assert!(pass.events.is_empty());
}

#[test]
fn should_expose_slot_resources() {
    let mut queues = DrawQueues::new();
    let tank = queues.register("tank");
    assert_eq!(*queues.resources(tank), "tank");
}

#[test]
fn should_apply_origin_after_basis() {
    let mut transform = Transform::new();
    transform.origin = Vector3::new(1.0, 2.0, 3.0);
    transform.rotate(Deg(90.0), Vector3::unit_y());
    let matrix = transform.to_matrix();
    // the basis rotates x onto -z, then the origin translates
    let rotated = matrix * Vector4::new(1.0, 0.0, 0.0, 1.0);
    assert!((rotated.x - 1.0).abs() < 1e-6);
    assert!((rotated.y - 2.0).abs() < 1e-6);
    assert!((rotated.z - 2.0).abs() < 1e-6);
}

#[test]
fn should_compose_mesh_offset_and_sub_transform() {
    let mut transform = ModelTransform::new(Transform::from(Vector3::new(10.0, 0.0, 0.0)));
    transform
        .mesh
        .insert("turret".to_string(), Transform::from(Vector3::new(0.0, 1.0, 0.0)));

    let offset = Vector3::new(0.0, 0.0, 5.0);
    let with_sub = transform.matrix_for("turret", offset);
    let expected = Matrix4::from_translation(Vector3::new(10.0, 1.0, 5.0));
    assert_eq!(with_sub, expected);

    // meshes without a sub-transform get base placement plus offset only
    let without_sub = transform.matrix_for("hull", offset);
    assert_eq!(
        without_sub,
        Matrix4::from_translation(Vector3::new(10.0, 0.0, 5.0))
    );
}

#[test]
fn should_expose_rotated_basis_columns() {
    let mut transform = Transform::new();
    assert_eq!(transform.xbasis(), Vector3::unit_x());
    assert_eq!(transform.ybasis(), Vector3::unit_y());
    assert_eq!(transform.zbasis(), Vector3::unit_z());

    transform.rotate(Deg(90.0), Vector3::unit_y());
    // rotating around y leaves that column in place and swings x onto -z
    let close = |a: Vector3<f32>, b: Vector3<f32>| {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6 && (a.z - b.z).abs() < 1e-6
    };
    assert!(close(transform.xbasis(), Vector3::new(0.0, 0.0, -1.0)));
    assert!(close(transform.ybasis(), Vector3::unit_y()));
    assert!(close(transform.zbasis(), Vector3::new(1.0, 0.0, 0.0)));
}

#[test]
fn should_scale_origin_together_with_basis() {
    let mut transform = Transform::from(Vector3::new(2.0, 0.0, 0.0));
    transform.scale(Vector3::new(0.5, 0.5, 0.5));
    assert_eq!(transform.origin, Vector3::new(1.0, 0.0, 0.0));
    let scaled = transform.to_matrix() * Vector4::new(2.0, 0.0, 0.0, 1.0);
    assert_eq!(scaled, Vector4::new(2.0, 0.0, 0.0, 1.0));
}
