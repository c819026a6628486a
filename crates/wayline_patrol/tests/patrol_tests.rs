//! Integration tests for wayline_patrol

use approx::assert_relative_eq;
use glam::Vec3;
use wayline_graph::{Color, WaypointGraph};
use wayline_patrol::*;

/// Regular hexagon on the XZ plane
fn hexagon(radius: f32) -> Vec<Vec3> {
    (0..6)
        .map(|i| {
            let angle = std::f32::consts::FRAC_PI_3 * i as f32;
            Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .collect()
}

fn arrivals(events: &[PatrolEvent]) -> Vec<Vec3> {
    events
        .iter()
        .filter_map(|event| match event {
            PatrolEvent::Arrived { waypoint } => Some(*waypoint),
            _ => None,
        })
        .collect()
}

fn run(controller: &mut PatrolController, body: &mut KinematicBody, dt: f32, ticks: usize) -> Vec<PatrolEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        controller.tick(body);
        body.integrate(dt);
        events.extend(controller.drain_events());
    }
    events
}

#[test]
fn test_two_point_scenario() {
    let config = PatrolConfig::without_rotation()
        .with_speed(5.0)
        .with_distance_precision(0.01);
    let mut controller = PatrolController::new(config).unwrap();
    controller.start(PatrolPath::new([Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]));
    let mut body = KinematicBody::default();

    let mut reached = None;
    for tick in 0..10 {
        controller.tick(&mut body);
        let events = controller.drain_events();
        if arrivals(&events).contains(&Vec3::new(10.0, 0.0, 0.0)) {
            reached = Some(tick);
            assert!(events.contains(&PatrolEvent::LoopRestarted));
            break;
        }
        body.integrate(1.0);
    }

    assert!(reached.is_some());
    assert_eq!(body.position, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(controller.target(), Vec3::ZERO);
    assert_eq!(controller.phase(), PatrolPhase::Moving);
    assert_eq!(body.velocity, Vec3::new(-5.0, 0.0, 0.0));
}

#[test]
fn test_arrival_within_expected_ticks() {
    let target = Vec3::new(0.0, 0.0, 10.0);
    let speed = 5.0;
    let dt = 0.02;
    let mut controller = PatrolController::new(PatrolConfig::without_rotation().with_speed(speed)).unwrap();
    controller.start(PatrolPath::new([target]));
    let mut body = KinematicBody::default();

    let bound = (10.0 / (speed * dt)).ceil() as usize + 3;
    let mut ticks = 0;
    loop {
        controller.tick(&mut body);
        ticks += 1;
        if !arrivals(&controller.drain_events()).is_empty() {
            break;
        }
        assert!(ticks <= bound, "no arrival after {} ticks", ticks);
        body.integrate(dt);
    }

    // Snapped, not merely close
    assert_eq!(body.position, target);
}

#[test]
fn test_cycle_restarts_in_order() {
    let a = Vec3::ZERO;
    let b = Vec3::new(4.0, 0.0, 0.0);
    let c = Vec3::new(4.0, 0.0, 3.0);
    let mut controller = PatrolController::new(PatrolConfig::without_rotation()).unwrap();
    controller.start(PatrolPath::new([a, b, c]));
    let mut body = KinematicBody::at(a);

    let events = run(&mut controller, &mut body, 0.02, 400);
    let visited = arrivals(&events);

    assert!(visited.len() >= 7, "only {} arrivals", visited.len());
    assert_eq!(&visited[..7], &[a, b, c, a, b, c, a]);
    let restarts = events
        .iter()
        .filter(|event| **event == PatrolEvent::LoopRestarted)
        .count();
    assert!(restarts >= 2);
}

#[test]
fn test_single_point_keeps_arriving() {
    let point = Vec3::new(1.0, 2.0, 3.0);
    let mut controller = PatrolController::new(PatrolConfig::without_rotation()).unwrap();
    controller.start(PatrolPath::new([point]));
    let mut body = KinematicBody::default();

    run(&mut controller, &mut body, 0.02, 200);
    let events = run(&mut controller, &mut body, 0.02, 5);

    assert_eq!(body.position, point);
    assert_eq!(body.velocity, Vec3::ZERO);
    assert_eq!(arrivals(&events), vec![point; 5]);
}

#[test]
fn test_empty_path_is_idle() {
    let mut controller = PatrolController::new(PatrolConfig::default()).unwrap();
    controller.start(PatrolPath::from_graph(&WaypointGraph::new()));
    let mut body = KinematicBody::at(Vec3::ONE);

    let events = run(&mut controller, &mut body, 0.02, 20);

    assert!(events.is_empty());
    assert_eq!(controller.phase(), PatrolPhase::Idle);
    assert_eq!(body.position, Vec3::ONE);
}

#[test]
fn test_speed_change_keeps_direction() {
    let target = Vec3::new(30.0, 0.0, 40.0);
    let mut controller = PatrolController::new(PatrolConfig::without_rotation()).unwrap();
    controller.start(PatrolPath::new([target]));
    let mut body = KinematicBody::default();

    run(&mut controller, &mut body, 0.02, 3);
    let before = body.velocity.normalize();

    controller.set_speed(8.0).unwrap();
    run(&mut controller, &mut body, 0.02, 1);

    assert_relative_eq!(body.velocity.length(), 8.0, epsilon = 1e-4);
    assert!(body.velocity.normalize().abs_diff_eq(before, 1e-5));
}

#[test]
fn test_rotation_faces_next_waypoint() {
    let config = PatrolConfig::default().with_rotation(0.1, 0.5);
    let mut controller = PatrolController::new(config).unwrap();
    let target = Vec3::new(-6.0, 0.0, 0.0);
    controller.start(PatrolPath::new([target]));
    let mut body = KinematicBody::default();

    let mut ticks = 0;
    while controller.phase() != PatrolPhase::Moving {
        controller.tick(&mut body);
        ticks += 1;
        assert!(ticks <= 12, "still turning after {} ticks", ticks);
        assert_eq!(body.velocity.length_squared() > 0.0, controller.phase() == PatrolPhase::Moving);
    }

    let forward = body.rotation * Vec3::Z;
    assert!(forward.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-4));
}

#[test]
fn test_hexagon_lap_from_graph() {
    let graph = WaypointGraph::from_positions(hexagon(5.0), Color::WHITE);
    assert!(graph.is_closed_loop());

    let path = PatrolPath::from_graph(&graph);
    assert_relative_eq!(path.loop_length(), 30.0, epsilon = 1e-3);

    let mut world = PatrolWorld::new(WorldConfig::default().with_max_substeps(64)).unwrap();
    let start = graph.positions()[0];
    let agent = world
        .spawn_on_graph(start, PatrolConfig::without_rotation().with_speed(10.0), &graph)
        .unwrap();

    // Two laps of 30 units at 10 units per second, plus slack
    for _ in 0..8 {
        world.update(1.0);
    }

    let events = world.drain_events();
    let restarts = events
        .iter()
        .filter(|(id, event)| *id == agent && *event == PatrolEvent::LoopRestarted)
        .count();
    assert!(restarts >= 2, "only {} laps", restarts);
}

#[test]
fn test_agents_are_independent() {
    let mut world = PatrolWorld::new(WorldConfig::default().with_timestep(0.25)).unwrap();
    let square = [
        Vec3::ZERO,
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 2.0),
        Vec3::new(0.0, 0.0, 2.0),
    ];
    let fast = world
        .spawn(Vec3::ZERO, PatrolConfig::without_rotation().with_speed(8.0), PatrolPath::new(square))
        .unwrap();
    let slow = world
        .spawn(Vec3::ZERO, PatrolConfig::without_rotation().with_speed(1.0), PatrolPath::new(square))
        .unwrap();

    for _ in 0..20 {
        world.update(0.25);
    }

    let events = world.drain_events();
    let count = |agent: AgentId| {
        events
            .iter()
            .filter(|(id, event)| *id == agent && matches!(event, PatrolEvent::Arrived { .. }))
            .count()
    };
    assert!(count(fast) > count(slow));

    world.despawn(fast);
    assert_eq!(world.len(), 1);
    assert!(world.agent(slow).is_some());
}

#[test]
fn test_restart_agent_on_new_path() {
    let mut world = PatrolWorld::new(WorldConfig::default()).unwrap();
    let agent = world
        .spawn(Vec3::ZERO, PatrolConfig::without_rotation(), PatrolPath::default())
        .unwrap();
    world.update(0.1);
    assert!(!world.agent(agent).unwrap().controller.is_patrolling());

    world.restart_agent(agent, PatrolPath::new([Vec3::X])).unwrap();
    world.update(0.1);

    let controller = &world.agent(agent).unwrap().controller;
    assert!(controller.is_patrolling());
    assert_eq!(controller.path().len(), 1);
}
