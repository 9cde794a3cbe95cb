use geoanchor::api::{spawn_tick_loop, SharedTracker, TrackingCore, TrackingEvent};
use geoanchor::core::{
    AnchorObservation, CameraFrame, EarthState, EarthTrackingState, GeospatialFrame,
    GeospatialTransform,
};
use geoanchor::session::{
    AccuracyAuthorization, AuthorizationStatus, GeospatialSession, MockGeospatialSession,
    MockLocationAuthorizer, PermissionGate, SessionError, SessionFactory, TerrainAnchorSpec,
};
use geoanchor::utils::ConfigurationManager;
use geoanchor::InMemoryScene;
use nalgebra::{Matrix4, Vector3};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Fused frames replayed by the demo session, one per second of camera time
fn demo_script() -> Vec<GeospatialFrame> {
    let shop = Uuid::new_v4();
    let station = Uuid::new_v4();
    let fix = |horizontal: f64, heading_acc: f64| {
        GeospatialTransform::new(36.091526, 136.211851, 18.4)
            .with_accuracy(horizontal, 3.1)
            .with_heading(271.5, heading_acc)
    };

    vec![
        GeospatialFrame::new(Duration::ZERO).with_earth_state(EarthState::ErrorResourceExhausted),
        GeospatialFrame::new(Duration::ZERO).with_tracking_state(EarthTrackingState::Tracking),
        GeospatialFrame::new(Duration::ZERO).with_tracking_state(EarthTrackingState::Paused),
        GeospatialFrame::new(Duration::ZERO).with_transform(fix(32.0, 40.0)),
        GeospatialFrame::new(Duration::ZERO)
            .with_transform(fix(8.5, 12.0))
            .with_anchor(AnchorObservation::tracked(shop, Matrix4::new_translation(&Vector3::new(2.0, 0.0, -4.0)))),
        GeospatialFrame::new(Duration::ZERO)
            .with_transform(fix(14.0, 19.0))
            .with_anchor(AnchorObservation::tracked(shop, Matrix4::new_translation(&Vector3::new(2.1, 0.0, -4.0))))
            .with_anchor(AnchorObservation::untracked(station, Matrix4::identity())),
        GeospatialFrame::new(Duration::ZERO)
            .with_transform(fix(26.0, 30.0))
            .with_anchor(AnchorObservation::tracked(station, Matrix4::new_translation(&Vector3::new(-6.0, 0.0, -12.0)))),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() == 2 && args[1] == "--print-config" {
        let manager = ConfigurationManager::new();
        println!("{}", serde_json::to_string_pretty(manager.config())?);
        return Ok(());
    }

    if args.len() > 2 {
        let program = args.first().map_or("geoanchor", String::as_str);
        eprintln!("Usage: {} [config.json]", program);
        eprintln!("   or: {} --print-config", program);
        std::process::exit(1);
    }

    let mut manager = match args.get(1) {
        Some(path) => ConfigurationManager::from_file(path)?,
        None => ConfigurationManager::new(),
    };
    if manager.config().terrain_anchors.is_empty() {
        manager.add_terrain_anchor(TerrainAnchorSpec::new(36.091526, 136.211851))?;
    }
    let validation = manager.validate_config(manager.config());
    for warning in &validation.warnings {
        eprintln!("Warning: {}", warning);
    }

    let factory: SessionFactory = Box::new(|| {
        let mut session = MockGeospatialSession::new();
        for frame in demo_script() {
            session.push_frame(frame);
        }
        session.push_fusion_error("camera image unavailable");
        Ok(Box::new(session) as Box<dyn GeospatialSession>)
    });

    let core = TrackingCore::new(manager.config().clone(), InMemoryScene::new(), factory);
    let tracker = SharedTracker::new(core);
    tracker.register_event_callback(Box::new(|event| match event {
        TrackingEvent::StateChanged { old_state, new_state } => {
            println!("state: {} -> {}", old_state, new_state);
        }
        TrackingEvent::AnchorMaterialized { identity } => println!("anchor placed: {}", identity),
        TrackingEvent::SessionFailed(alert) => {
            println!("{}\n{}\n[{}]", alert.title, alert.message, alert.action);
        }
        _ => {}
    }));

    let mut gate = PermissionGate::new(MockLocationAuthorizer::undetermined());
    let decision = gate.on_authorization_changed(&tracker);
    info!(?decision, "authorization checked");
    gate.authorizer_mut()
        .grant(AuthorizationStatus::AuthorizedWhenInUse, AccuracyAuthorization::Full);
    let decision = gate.on_authorization_changed(&tracker);
    info!(?decision, "authorization checked");

    let (frames, worker) = spawn_tick_loop(tracker.clone(), 8);
    let script_len = demo_script().len() + 1;
    for i in 0..script_len {
        frames.send(CameraFrame::at_secs(1.0 + i as f64))?;
    }
    drop(frames);
    if worker.join().is_err() {
        return Err("tick loop panicked".into());
    }

    tracker.report_transport_failure(SessionError::TransportFailure {
        description: "Camera access was interrupted.".to_string(),
        failure_reason: Some("Another application is using the camera.".to_string()),
        recovery_suggestion: Some("Close other camera applications and try again.".to_string()),
    });

    let snapshot = tracker.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
