use std::net::UdpSocket;
use std::sync::Mutex;
use glam::Vec3;
use super::*;
use crate::camera::SceneCapture;
use crate::graphics_device::mock_graphics_device::{MockGraphicsDevice, MockTexture};
use crate::graphics_device::{ImmediateQueue, Texture, TextureFormat};
use crate::osc::{PoseMatrix, PoseTarget};
use crate::publish::{LocalPublishRegistry, PublishRegistry};

fn local_config() -> CamConfig {
    CamConfig {
        osc_port: 0,
        bind_address: "127.0.0.1".to_string(),
        receive_poll_interval_ms: 10,
        ..CamConfig::default()
    }
}

fn actor(config: CamConfig, host: SceneCapture) -> (OscCamActor<SceneCapture>, Arc<LocalPublishRegistry>) {
    let device: DeviceHandle = Arc::new(Mutex::new(MockGraphicsDevice::new()));
    let registry = Arc::new(LocalPublishRegistry::new());
    let actor = OscCamActor::new(
        config,
        host,
        device.clone(),
        registry.clone(),
        Box::new(ImmediateQueue::new(device)),
    );
    (actor, registry)
}

fn capture_with_target() -> SceneCapture {
    let target: Arc<dyn Texture> =
        Arc::new(MockTexture::new("capture", 320, 240, TextureFormat::B8G8R8A8_UNORM));
    SceneCapture::with_render_target(target)
}

// ============================================================================
// Tests: begin_play / end_play
// ============================================================================

#[test]
fn test_begin_play_opens_port_and_sets_view_target() {
    let (mut actor, _registry) = actor(local_config(), SceneCapture::new());

    actor.begin_play().unwrap();

    assert!(actor.is_listening());
    assert_ne!(actor.listen_addr().unwrap().port(), 0);
    assert!(actor.host().is_view_target());
}

#[test]
fn test_begin_play_without_auto_view_target() {
    let config = CamConfig { auto_set_view_target: false, ..local_config() };
    let (mut actor, _registry) = actor(config, SceneCapture::new());

    actor.begin_play().unwrap();

    assert!(!actor.host().is_view_target());
}

#[test]
fn test_bind_failure_keeps_actor_running() {
    let occupied = UdpSocket::bind("127.0.0.1:0").unwrap();
    let config = CamConfig {
        osc_port: occupied.local_addr().unwrap().port(),
        ..local_config()
    };
    let (mut actor, _registry) = actor(config, capture_with_target());

    assert!(actor.begin_play().is_err());
    assert!(!actor.is_listening());

    assert_eq!(actor.tick(), TickOutcome::Created);
    assert_eq!(actor.tick(), TickOutcome::Copied);
}

#[test]
fn test_end_play_closes_then_unpublishes() {
    let (mut actor, registry) = actor(local_config(), capture_with_target());
    actor.begin_play().unwrap();
    actor.tick();
    assert_eq!(registry.names(), vec!["OSCSpoutCam"]);

    actor.end_play();

    assert!(!actor.is_listening());
    assert!(registry.names().is_empty());
    assert!(!actor.publisher().is_active());
}

#[test]
fn test_begin_play_twice_reopens() {
    let (mut actor, _registry) = actor(local_config(), SceneCapture::new());

    actor.begin_play().unwrap();
    actor.begin_play().unwrap();

    assert!(actor.is_listening());
}

// ============================================================================
// Tests: tick
// ============================================================================

#[test]
fn test_tick_without_render_target_still_moves_camera() {
    let (mut actor, _registry) = actor(local_config(), SceneCapture::new());
    actor
        .store()
        .write(PoseTarget::Modelview, PoseMatrix([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 2.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]));

    assert_eq!(actor.tick(), TickOutcome::Idle);

    let placed = actor.host().world_transform();
    assert!(placed.translation.abs_diff_eq(Vec3::new(0.0, 0.0, 200.0), 1e-4));
    assert!(actor.host().teleported());
    assert!(actor.host().custom_projection().is_some());
}

#[test]
fn test_custom_unit_scale_reaches_host() {
    let config = CamConfig { unit_scale: 1.0, ..local_config() };
    let (mut actor, _registry) = actor(config, SceneCapture::new());
    actor
        .store()
        .write(PoseTarget::Modelview, PoseMatrix([
            1.0, 0.0, 0.0, 3.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]));

    let update = actor.apply_pose();

    assert!(update.transform.translation.abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-4));
}

#[test]
fn test_rename_through_actor() {
    let (mut actor, registry) = actor(local_config(), capture_with_target());
    actor.tick();

    actor.set_publish_name("Renamed");

    assert_eq!(actor.tick(), TickOutcome::TornDown);
    assert_eq!(actor.tick(), TickOutcome::Created);
    assert_eq!(registry.names(), vec!["Renamed"]);
    assert_eq!(actor.config().publish_name, "Renamed");
}

#[test]
fn test_drop_releases_publication() {
    let (mut actor, registry) = actor(local_config(), capture_with_target());
    actor.tick();

    drop(actor);

    assert!(registry.names().is_empty());
}
