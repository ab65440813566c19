//! Window and event loop.
//!
//! One redraw is one frame: deliver the latest observation, tick, present.
//! Observations come either from the keyboard-driven [`SimulatedHand`] or
//! from a tracker thread via [`spawn_tracker`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::{Config, TrackerConfig};
use crate::error::AppError;
use crate::gpu::GpuState;
use crate::input::{Input, KeyCode, SimulatedHand};
use crate::session::Session;
use crate::tracking::{spawn_tracker, ObservationReceiver, ReplayTracker};

const STATS_INTERVAL: Duration = Duration::from_secs(5);

enum HandSource {
    Simulated(SimulatedHand),
    Tracked(ObservationReceiver),
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    session: Session,
    input: Input,
    source: HandSource,
    error: Option<AppError>,
    frames: u32,
    last_stats: Instant,
}

impl App {
    fn new(session: Session, source: HandSource) -> Self {
        Self {
            window: None,
            gpu_state: None,
            session,
            input: Input::new(),
            source,
            error: None,
            frames: 0,
            last_stats: Instant::now(),
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title("Gesture Particles")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);
        self.window = Some(window.clone());

        let particle_size = self.session.config().particle_size;
        self.gpu_state = Some(pollster::block_on(GpuState::new(
            window,
            self.session.field().len() as u32,
            particle_size,
        ))?);
        Ok(())
    }

    fn deliver_observation(&mut self) {
        match &mut self.source {
            HandSource::Simulated(hand) => {
                hand.update(&self.input);
                let landmarks = hand.landmarks();
                self.session.observe(landmarks.as_ref());
            }
            HandSource::Tracked(rx) => {
                if let Some(observation) = rx.poll() {
                    self.session.observe(observation.as_ref());
                }
            }
        }
    }

    fn log_stats(&mut self) {
        self.frames += 1;
        let elapsed = self.last_stats.elapsed();
        if elapsed < STATS_INTERVAL {
            return;
        }

        let fps = self.frames as f32 / elapsed.as_secs_f32();
        let dropped = match &self.source {
            HandSource::Tracked(rx) => rx.dropped(),
            HandSource::Simulated(_) => 0,
        };
        log::info!(
            "{:.1} fps, shape {}, {} retargets, {} observations superseded",
            fps,
            self.session.state().effective_shape(),
            self.session.retarget_count(),
            dropped
        );
        self.frames = 0;
        self.last_stats = Instant::now();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.input
                    .set_window_size(physical_size.width, physical_size.height);
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.input.key_pressed(KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }

                self.deliver_observation();
                self.session.tick();

                if let Some(gpu_state) = &mut self.gpu_state {
                    match self.session.present(gpu_state) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            gpu_state.resize(winit::dpi::PhysicalSize {
                                width: gpu_state.config.width,
                                height: gpu_state.config.height,
                            })
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::error!("Render error: {:?}", e),
                    }
                }

                self.input.begin_frame();
                self.log_stats();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Open the window and run until it is closed.
///
/// Starts the configured hand source (a replay thread or the simulated
/// hand), then drives the session from the event loop.
pub fn run(config: Config) -> Result<(), AppError> {
    config.validate()?;

    let source = match &config.tracker {
        TrackerConfig::Simulated => {
            log::info!("Using simulated hand: keys 0-5 set fingers, F fist, H hide, scroll pinch");
            HandSource::Simulated(SimulatedHand::default())
        }
        TrackerConfig::Replay { path, fps, looped } => {
            let tracker = ReplayTracker::open(path, *fps, *looped)?;
            HandSource::Tracked(spawn_tracker(tracker))
        }
    };

    let session = Session::new(config);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(session, source);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
