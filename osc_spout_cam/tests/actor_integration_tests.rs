//! Integration tests for the OSC camera actor
//!
//! A real UDP socket on localhost feeds the actor; a counting device and an
//! in-process registry stand in for the GPU transport. No GPU required.
//!
//! Run with: cargo test --test actor_integration_tests

use std::net::UdpSocket;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use osc_spout_cam::glam::{Mat4, Vec3};
use osc_spout_cam::oscam::{CamConfig, OscCamActor, Result};
use osc_spout_cam::oscam::camera::SceneCapture;
use osc_spout_cam::oscam::device::{
    DeviceHandle, GraphicsDevice, ImmediateQueue, NativeHandle, RenderThread, SharedHandle,
    SharedTexture, SharedTextureDesc, Texture, TextureFormat, TextureInfo, TextureUsage,
};
use osc_spout_cam::oscam::osc::{BundleBuilder, MessageBuilder};
use osc_spout_cam::oscam::publish::{
    LocalPublishRegistry, PublishRegistry, TickOutcome, shared_registry,
};
use serial_test::serial;

// ============================================================================
// TEST DEVICE
// ============================================================================

#[derive(Default)]
struct Counters {
    created: AtomicUsize,
    released: AtomicUsize,
    copies: AtomicUsize,
    flushes: AtomicUsize,
}

struct TestTexture {
    info: TextureInfo,
    native: u64,
    counters: Option<Arc<Counters>>,
}

impl Texture for TestTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn native_handle(&self) -> Option<NativeHandle> {
        Some(NativeHandle(self.native))
    }
}

impl Drop for TestTexture {
    fn drop(&mut self) {
        if let Some(counters) = &self.counters {
            counters.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

struct TestDevice {
    counters: Arc<Counters>,
}

impl GraphicsDevice for TestDevice {
    fn create_shared_texture(&mut self, desc: &SharedTextureDesc) -> Result<SharedTexture> {
        let id = self.counters.created.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        Ok(SharedTexture {
            texture: Arc::new(TestTexture {
                info: TextureInfo {
                    width: desc.width,
                    height: desc.height,
                    format: desc.format,
                    usage: desc.usage,
                },
                native: id,
                counters: Some(self.counters.clone()),
            }),
            handle: SharedHandle(id),
        })
    }

    fn copy_texture(&mut self, _dst: &dyn Texture, _src: &dyn Texture) -> Result<()> {
        self.counters.copies.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.counters.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn render_target(format: TextureFormat) -> Arc<dyn Texture> {
    Arc::new(TestTexture {
        info: TextureInfo {
            width: 1280,
            height: 720,
            format,
            usage: TextureUsage::RENDER_TARGET | TextureUsage::COPY_SRC,
        },
        native: 77,
        counters: None,
    })
}

fn local_config() -> CamConfig {
    CamConfig {
        osc_port: 0,
        bind_address: "127.0.0.1".to_string(),
        receive_poll_interval_ms: 10,
        ..CamConfig::default()
    }
}

/// Wire form of a column-vector matrix (rows first)
fn wire(matrix: Mat4) -> Vec<f32> {
    matrix.transpose().to_cols_array().to_vec()
}

// ============================================================================
// END-TO-END TESTS
// ============================================================================

#[test]
fn test_integration_pose_stream_moves_camera_and_publishes() {
    let counters = Arc::new(Counters::default());
    let device: DeviceHandle = Arc::new(Mutex::new(TestDevice { counters: counters.clone() }));
    let registry = Arc::new(LocalPublishRegistry::new());
    let host = SceneCapture::with_render_target(render_target(TextureFormat::B8G8R8A8_TYPELESS));
    let mut actor = OscCamActor::new(
        local_config(),
        host,
        device.clone(),
        registry.clone(),
        Box::new(ImmediateQueue::new(device)),
    );
    actor.begin_play().unwrap();
    let addr = actor.listen_addr().unwrap();

    // Camera 2 m up and 5 m back, sent as one bundle
    let model = Mat4::from_translation(Vec3::new(0.0, 2.0, 5.0));
    let projection = Mat4::perspective_rh_gl(1.0, 16.0 / 9.0, 0.1, 100.0);
    let datagram = BundleBuilder::new()
        .packet(MessageBuilder::new("/model").floats(&wire(model)).build())
        .packet(MessageBuilder::new("/proj").floats(&wire(projection)).build())
        .build();
    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    sender.send_to(&datagram, addr).unwrap();

    let expected = Vec3::new(-500.0, 0.0, 200.0);
    let deadline = Instant::now() + Duration::from_secs(2);
    let mut outcomes = Vec::new();
    loop {
        outcomes.push(actor.tick());
        if actor.host().world_transform().translation.abs_diff_eq(expected, 1e-3) {
            break;
        }
        assert!(Instant::now() < deadline, "pose never arrived");
        thread::sleep(Duration::from_millis(5));
    }
    outcomes.push(actor.tick());

    assert_eq!(outcomes[0], TickOutcome::Created);
    assert!(outcomes[1..].iter().all(|o| *o == TickOutcome::Copied));

    let projection = actor.host().custom_projection().unwrap().to_cols_array_2d();
    assert_eq!(projection[2][2], 0.0);
    assert_eq!(projection[2][3], 1.0);

    let info = registry.lookup("OSCSpoutCam").unwrap();
    assert_eq!((info.width, info.height), (1280, 720));
    assert_eq!(info.format, TextureFormat::B8G8R8A8_UNORM);
    assert!(counters.copies.load(Ordering::SeqCst) >= 1);
    assert_eq!(
        counters.copies.load(Ordering::SeqCst),
        counters.flushes.load(Ordering::SeqCst)
    );

    actor.end_play();

    assert!(registry.names().is_empty());
    assert_eq!(counters.created.load(Ordering::SeqCst), 1);
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
    assert!(!actor.is_listening());
}

#[test]
fn test_integration_malformed_datagram_is_ignored() {
    let counters = Arc::new(Counters::default());
    let device: DeviceHandle = Arc::new(Mutex::new(TestDevice { counters }));
    let mut actor = OscCamActor::new(
        local_config(),
        SceneCapture::new(),
        device.clone(),
        Arc::new(LocalPublishRegistry::new()),
        Box::new(ImmediateQueue::new(device)),
    );
    actor.begin_play().unwrap();
    let addr = actor.listen_addr().unwrap();

    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    let short = MessageBuilder::new("/model").floats(&[1.0; 12]).build();
    sender.send_to(&short, addr).unwrap();

    let deadline = Instant::now() + Duration::from_secs(2);
    while actor.listener_stats().unwrap().dropped == 0 {
        assert!(Instant::now() < deadline, "datagram never arrived");
        thread::sleep(Duration::from_millis(5));
    }

    actor.tick();
    assert_eq!(actor.host().world_transform().translation, Vec3::ZERO);
}

#[test]
fn test_integration_render_thread_publication() {
    let counters = Arc::new(Counters::default());
    let device: DeviceHandle = Arc::new(Mutex::new(TestDevice { counters: counters.clone() }));
    let registry = Arc::new(LocalPublishRegistry::new());
    let queue = RenderThread::spawn(device.clone()).unwrap();
    let host = SceneCapture::with_render_target(render_target(TextureFormat::R8G8B8A8_UNORM));
    let mut actor = OscCamActor::new(local_config(), host, device, registry.clone(), Box::new(queue));

    for _ in 0..5 {
        actor.tick();
    }
    // Joins the render thread: every queued copy has run
    drop(actor);

    assert_eq!(counters.copies.load(Ordering::SeqCst), 4);
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
    assert!(registry.is_empty());
}

#[test]
#[serial]
fn test_integration_shared_registry_visible_to_receivers() {
    let counters = Arc::new(Counters::default());
    let device: DeviceHandle = Arc::new(Mutex::new(TestDevice { counters }));
    let config = CamConfig {
        publish_name: "IntegrationSharedCam".to_string(),
        ..local_config()
    };
    let host = SceneCapture::with_render_target(render_target(TextureFormat::R8G8B8A8_UNORM));
    let mut actor = OscCamActor::new(
        config,
        host,
        device.clone(),
        shared_registry(),
        Box::new(ImmediateQueue::new(device)),
    );

    actor.tick();
    let info = shared_registry().lookup("IntegrationSharedCam").unwrap();
    assert_eq!(info.handle, SharedHandle(1));

    actor.end_play();
    assert!(shared_registry().lookup("IntegrationSharedCam").is_none());
}
