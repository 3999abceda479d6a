//! Application state and event loop handler.
//!
//! Two screens: the title screen (server address entry) and gameplay.
//! Gameplay runs a fixed-timestep simulation; each tick is input ->
//! movement -> collision revert -> state send, and connection loss
//! triggers a reconnect with whatever address the player typed.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{Key, KeyCode, NamedKey, PhysicalKey},
    window::{CursorGrabMode, CursorIcon, Window, WindowId},
};

use bean_core::{
    BeanCamera, BeanColor, BeanController, CameraMode, LocalBean, SeededRandom,
};

use crate::config::ClientConfig;
use crate::gamepad::{GamepadAction, GamepadHandler};
use crate::input::InputHandler;
use crate::net::NetClient;
use crate::renderer::meshes::{self, mesh_names};
use crate::renderer::Renderer;
use crate::scene;
use crate::title::TitleScreen;
use crate::vr::{VrOptions, VrSession};

/// Which screen the player is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameScreen {
    Title,
    Gameplay,
}

/// Main application state.
pub struct App {
    config: ClientConfig,

    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,

    screen: GameScreen,
    title: TitleScreen,

    bean: LocalBean,
    camera: BeanCamera,
    controller: BeanController,

    input: InputHandler,
    gamepad: GamepadHandler,
    cursor_pos: (f32, f32),
    cursor_grabbed: bool,

    net: Option<NetClient>,
    was_connected: bool,

    vr: VrSession,

    rng: SeededRandom,
    started: Instant,
    last_frame: Option<Instant>,
    accumulated: f32,
}

impl App {
    pub fn new(config: ClientConfig, vr_options: VrOptions) -> Self {
        // Seed from the clock; everything downstream stays deterministic.
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(1);
        let mut rng = SeededRandom::new(seed);

        let bean = LocalBean::new(BeanColor::random(&mut rng));
        let mut camera = BeanCamera::default();
        camera.sync_with_bean(&bean);

        let controller = BeanController {
            move_speed: config.move_speed,
            look_sensitivity: config.look_sensitivity,
            ..Default::default()
        };

        let title = TitleScreen::new(&config.server_addr);

        Self {
            title,
            window: None,
            renderer: None,
            screen: GameScreen::Title,
            bean,
            camera,
            controller,
            input: InputHandler::new(),
            gamepad: GamepadHandler::new(),
            cursor_pos: (0.0, 0.0),
            cursor_grabbed: false,
            net: None,
            was_connected: false,
            vr: VrSession::new(vr_options),
            rng,
            started: Instant::now(),
            last_frame: None,
            accumulated: 0.0,
            config,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                tracing::error!("window creation failed: {err}");
                event_loop.exit();
                return;
            }
        };

        let mut renderer = match pollster::block_on(Renderer::new(window.clone())) {
            Ok(renderer) => renderer,
            Err(err) => {
                tracing::error!("renderer creation failed: {err}");
                event_loop.exit();
                return;
            }
        };

        renderer.register_mesh(mesh_names::GROUND, &meshes::create_ground_mesh());
        renderer.register_mesh(mesh_names::BEAN, &meshes::create_bean_mesh());

        if let Err(err) = self.vr.init_runtime() {
            tracing::error!("VR runtime unavailable: {err}");
        }

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.last_frame = Some(Instant::now());
        tracing::info!("window and renderer initialized");
    }

    /// Switch to gameplay: capture the pointer and open the connection.
    fn start_gameplay(&mut self) {
        self.screen = GameScreen::Gameplay;
        self.input.reset();
        self.set_cursor_grab(true);
        self.connect();
    }

    fn connect(&mut self) {
        self.net = match NetClient::connect(&self.title.address) {
            Ok(net) => Some(net),
            Err(err) => {
                tracing::warn!("connect to {:?} failed: {err}", self.title.address);
                None
            }
        };
        self.was_connected = false;
    }

    fn set_cursor_grab(&mut self, grab: bool) {
        let Some(window) = &self.window else { return };
        if grab {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                tracing::warn!("cursor grab failed: {err}");
            }
            window.set_cursor_visible(false);
            self.cursor_grabbed = true;
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
            self.cursor_grabbed = false;
        }
    }

    /// One fixed simulation tick.
    fn tick(&mut self, dt: f32) {
        match self.screen {
            GameScreen::Title => self.tick_title(),
            GameScreen::Gameplay => self.tick_gameplay(dt),
        }
    }

    fn tick_title(&mut self) {
        let (width, height) = self.surface_size();
        self.title.tick(self.cursor_pos, width, height);

        if let Some(window) = &self.window {
            window.set_cursor(if self.title.hovered {
                CursorIcon::Text
            } else {
                CursorIcon::Default
            });
        }
    }

    fn tick_gameplay(&mut self, dt: f32) {
        for action in self.gamepad.poll() {
            match action {
                GamepadAction::FirstPerson => self.switch_camera(CameraMode::FirstPerson),
                GamepadAction::ThirdPerson => self.switch_camera(CameraMode::ThirdPerson),
                GamepadAction::Recolor => self.bean.color = BeanColor::random(&mut self.rng),
                GamepadAction::Connect => {
                    if self.net.is_none() {
                        self.connect();
                    }
                }
            }
        }

        let mut input = self.input.take_tick_input();
        self.gamepad.apply_to_input(&mut input, dt);
        self.controller.update(&mut self.bean, &input, dt);

        // Bump into other beans: step straight back out.
        if let Some(net) = &self.net {
            let roster = net.roster_snapshot();
            let local_id = net.local_player_id();
            self.bean
                .resolve_collisions(roster.live_players(local_id).map(|(_, p)| p.bounds()));
        }

        self.camera.sync_with_bean(&self.bean);

        let mut connection_lost = false;
        if let Some(net) = &mut self.net {
            net.update(dt);
            if net.is_connected() {
                self.was_connected = true;
                if let Err(err) = net.send_state(&self.bean) {
                    tracing::debug!("state send failed: {err}");
                }
            } else if self.was_connected {
                connection_lost = true;
            }
        }
        if connection_lost {
            // The server stopped talking to us; try again.
            tracing::info!("connection lost, reconnecting");
            self.connect();
        }
    }

    fn switch_camera(&mut self, mode: CameraMode) {
        if self.bean.camera_mode != mode {
            self.bean.set_camera_mode(mode);
            self.camera.sync_with_bean(&self.bean);
        }
    }

    fn surface_size(&self) -> (f32, f32) {
        self.renderer
            .as_ref()
            .map(|r| {
                let size = r.size();
                (size.width.max(1) as f32, size.height.max(1) as f32)
            })
            .unwrap_or((
                self.config.window_width as f32,
                self.config.window_height as f32,
            ))
    }

    /// Advance time, run due ticks, and draw a frame.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let tick_duration = self.config.tick_duration();
        let dt = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(tick_duration);
        self.last_frame = Some(now);

        // Fixed timestep with an accumulator; clamp to avoid a spiral of
        // death after a long stall.
        self.accumulated = (self.accumulated + dt).min(0.25);
        while self.accumulated >= tick_duration {
            self.tick(tick_duration);
            self.accumulated -= tick_duration;
        }

        if let Err(err) = self.vr.poll_events() {
            tracing::error!("VR event polling failed: {err}");
        }

        let scene = match self.screen {
            GameScreen::Title => {
                let (width, height) = self.surface_size();
                scene::title_scene(&self.title, width, height)
            }
            GameScreen::Gameplay => {
                if let Some(renderer) = &self.renderer {
                    self.camera.aspect = renderer.aspect();
                }
                let (roster, local_id) = match &self.net {
                    Some(net) => (net.roster_snapshot(), net.local_player_id()),
                    None => (bean_core::Roster::new(), None),
                };
                scene::gameplay_scene(
                    &self.camera,
                    &self.bean,
                    &roster,
                    local_id,
                    self.gamepad.active(),
                    self.started.elapsed().as_secs_f32(),
                )
            }
        };

        let Some(renderer) = &mut self.renderer else {
            return;
        };
        match renderer.render(&scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.size();
                renderer.resize(size);
            }
            Err(err) => {
                tracing::error!("render error: {err:?}, exiting");
                event_loop.exit();
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn handle_key(&mut self, event: winit::event::KeyEvent) {
        let pressed = event.state == ElementState::Pressed;

        match self.screen {
            GameScreen::Title => {
                if !pressed {
                    return;
                }
                match &event.logical_key {
                    Key::Named(NamedKey::Enter) => self.start_gameplay(),
                    Key::Named(NamedKey::Backspace) => self.title.backspace(),
                    Key::Named(NamedKey::Space) => self.title.input_text(" "),
                    Key::Character(text) => self.title.input_text(text),
                    _ => {}
                }
            }
            GameScreen::Gameplay => {
                self.input.process_key(event.physical_key, event.state);

                if pressed && !event.repeat {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Digit1) => {
                            self.switch_camera(CameraMode::FirstPerson)
                        }
                        PhysicalKey::Code(KeyCode::Digit2) => {
                            self.switch_camera(CameraMode::ThirdPerson)
                        }
                        PhysicalKey::Code(KeyCode::Digit4) => {
                            self.bean.color = BeanColor::random(&mut self.rng)
                        }
                        PhysicalKey::Code(KeyCode::Digit5) => self.set_cursor_grab(false),
                        PhysicalKey::Code(KeyCode::Digit6) => self.set_cursor_grab(true),
                        _ => {}
                    }
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.init_window(event_loop);
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested, exiting");
                self.net = None; // sends Bye and joins the receive thread
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
            }

            WindowEvent::RedrawRequested => self.frame(event_loop),

            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event),

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_pos = (position.x as f32, position.y as f32);
            }

            WindowEvent::Focused(false) => self.input.reset(),

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.screen == GameScreen::Gameplay && self.cursor_grabbed {
                self.input.process_mouse_motion(delta.0, delta.1);
            }
        }
    }
}
