//! Interactive solar system viewer
//!
//! A sun and up to nine planets under mutual gravity, stepped at a fixed rate
//! with the Euler-Cromer integrator from the `solar_sim` library.
//!
//! Controls:
//! - Left mouse drag: Orbit camera
//! - Scroll: Zoom in/out
//! - Space: Start/stop
//! - R: Reset simulation
//! - A: Add planet
//! - Delete/Backspace: Delete last planet
//! - C: Switch camera focus
//! - T: Toggle trails

mod controls;
mod equations_ui;
mod scene;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use common::{Camera3D, GraphicsContext};
use controls::{Command, ControlPanel};
use equations_ui::{draw_equations_sidebar, SOLAR_SYSTEM_EQUATIONS, SOLAR_SYSTEM_VARIABLES};
use scene::SceneView;
use solar_sim::{SimConfig, SimResult, Simulation};
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Parser, Debug)]
#[command(about = "Interactive N-body solar system")]
struct Args {
    /// YAML file with simulation settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file used by "Save system" and "Load system"
    #[arg(short, long)]
    system_file: Option<PathBuf>,
}

fn load_config(args: &Args) -> SimResult<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_yaml_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(path) = &args.system_file {
        config.system_file = path.clone();
    }
    Ok(config)
}

/// Lets one simulation step through per `1 / rate` seconds of wall time
struct FramePacer {
    interval: Duration,
    accumulated: Duration,
}

impl FramePacer {
    fn new(rate: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / rate.max(1) as f64),
            accumulated: Duration::ZERO,
        }
    }

    /// Add elapsed time; true when a step is due.
    ///
    /// Carried time is capped at two intervals, so a stall releases at most two
    /// steps on consecutive frames instead of a burst.
    fn advance(&mut self, elapsed: Duration) -> bool {
        self.accumulated = (self.accumulated + elapsed).min(self.interval * 2);
        if self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            true
        } else {
            false
        }
    }
}

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    simulation: Simulation,
    camera: Camera3D,
    scene: SceneView,
    controls: ControlPanel,
    pacer: FramePacer,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, simulation: Simulation) -> Self {
        let mut camera = Camera3D::new(ctx.aspect_ratio());
        camera.distance = 120.0;
        camera.update_orbital();

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            scene: SceneView::new(simulation.bodies().len()),
            controls: ControlPanel::new(&simulation),
            pacer: FramePacer::new(simulation.config().frame_rate),
            ctx,
            simulation,
            camera,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
    }

    fn execute(&mut self, command: Command) {
        let result = match command {
            Command::ToggleRun => {
                self.simulation.toggle();
                Ok(())
            }
            Command::Reset => {
                self.simulation.reset();
                Ok(())
            }
            Command::AddPlanet => self.simulation.add_default_planet().map(|_| ()),
            Command::DeleteLastPlanet => {
                self.simulation.delete_last_planet();
                Ok(())
            }
            Command::Save => self.simulation.save_default().map(|_| ()),
            Command::Load => self.simulation.load_default().map(|_| ()),
            Command::SetGravity(input) => self.simulation.set_gravitational_constant_text(&input),
            Command::SetParameter { index, field, input } => {
                self.simulation.set_parameter_text(index, field, &input)
            }
            Command::CycleFocus => {
                self.scene.cycle_focus(self.simulation.bodies().len());
                Ok(())
            }
        };

        match result {
            Ok(()) => self.controls.report("Error: none"),
            Err(err) => self.controls.report_error(&err),
        }
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        let events = self.simulation.drain_events();
        if events.is_empty() {
            return;
        }
        self.scene.apply_events(&events, self.simulation.bodies().len());
        self.controls.apply_events(&events, &self.simulation);
    }

    fn update(&mut self, elapsed: Duration) {
        if self.pacer.advance(elapsed) {
            match self.simulation.tick() {
                Ok(true) => self.scene.record(self.simulation.bodies()),
                Ok(false) => {}
                Err(err) => self.controls.report_error(&err),
            }
        }
        self.dispatch_events();

        if let Some(body) = self.simulation.body(self.scene.focus()) {
            self.camera.follow(body.position.as_vec3());
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut commands = Vec::new();
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            let readouts = [
                ("Time", format!("{:.1}", self.simulation.time())),
                ("Bodies", format!("{}", self.simulation.bodies().len())),
                ("Energy", format!("{:.4e}", self.simulation.total_energy())),
                ("|Σp|", format!("{:.4e}", self.simulation.total_momentum().length())),
                ("CoM", {
                    let com = self.simulation.registry().center_of_mass();
                    format!("({:.2}, {:.2}, {:.2})", com.x, com.y, com.z)
                }),
            ];
            draw_equations_sidebar(
                ctx,
                "Euler-Cromer Gravity",
                SOLAR_SYSTEM_EQUATIONS,
                SOLAR_SYSTEM_VARIABLES,
                &readouts,
            );

            commands = self.controls.show(ctx, &self.simulation);
            self.controls.show_telemetry(ctx, &self.simulation);

            egui::CentralPanel::default()
                .frame(egui::Frame::none())
                .show(ctx, |ui| {
                    let (response, painter) =
                        ui.allocate_painter(ui.available_size(), egui::Sense::drag());
                    if response.dragged() {
                        let delta = response.drag_delta();
                        self.camera.orbit(-delta.x * 0.01, delta.y * 0.01);
                    }
                    if response.hovered() {
                        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
                        if scroll != 0.0 {
                            self.camera.zoom(scroll * 0.2);
                        }
                    }

                    let rect = response.rect;
                    self.camera.update_aspect_ratio(rect.width() / rect.height().max(1.0));
                    self.scene.draw(
                        &painter,
                        rect,
                        &self.camera,
                        self.simulation.bodies(),
                        &self.controls.options,
                    );

                    let state = if self.simulation.is_running() {
                        egui::RichText::new("RUNNING").color(egui::Color32::GREEN)
                    } else {
                        egui::RichText::new("STOPPED").color(egui::Color32::YELLOW)
                    };
                    ui.put(
                        egui::Rect::from_min_size(rect.min + egui::vec2(8.0, 8.0), egui::vec2(80.0, 20.0)),
                        egui::Label::new(state),
                    );
                });
        });

        self.egui
            .state
            .handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self
            .egui
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui
                .renderer
                .update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let space = wgpu::Color {
                r: 0.005,
                g: 0.005,
                b: 0.02,
                a: 1.0,
            };
            let mut render_pass = GraphicsContext::clear_pass(&mut encoder, &view, space);
            self.egui
                .renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for command in commands {
            self.execute(command);
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        let command = match key {
            KeyCode::Space => Command::ToggleRun,
            KeyCode::KeyR => Command::Reset,
            KeyCode::KeyA => Command::AddPlanet,
            KeyCode::Delete | KeyCode::Backspace => Command::DeleteLastPlanet,
            KeyCode::KeyC => Command::CycleFocus,
            KeyCode::KeyT => {
                self.controls.options.trails = !self.controls.options.trails;
                return;
            }
            _ => return,
        };
        self.execute(command);
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let simulation = match load_config(&args).and_then(Simulation::new) {
        Ok(simulation) => simulation,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    let (ctx, event_loop) = match pollster::block_on(GraphicsContext::new(
        "Solar System - Rust/wgpu",
        1400,
        860,
    )) {
        Ok(pair) => pair,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    let mut app = App::new(ctx, simulation);
    let mut last_time = Instant::now();

    let result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => app.resize(*size),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                ..
                            },
                        ..
                    } if !consumed => app.handle_key(*key, *state),
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let elapsed = now - last_time;
                        last_time = now;

                        app.update(elapsed);
                        match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                            Err(e) => log::warn!("Render error: {:?}", e),
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    });

    if let Err(err) = result {
        log::error!("Event loop error: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_releases_one_step_per_interval() {
        let mut pacer = FramePacer::new(24);
        let frame = Duration::from_millis(10);
        let steps = (0..100).filter(|_| pacer.advance(frame)).count();
        // One second of 10 ms frames at 24 Hz
        assert!((23..=25).contains(&steps), "got {} steps", steps);
    }

    #[test]
    fn pacer_does_not_build_up_a_backlog() {
        let mut pacer = FramePacer::new(24);
        assert!(pacer.advance(Duration::from_secs(5)));
        assert!(pacer.advance(Duration::ZERO));
        assert!(!pacer.advance(Duration::ZERO));
    }

    #[test]
    fn system_file_flag_overrides_config() {
        let args = Args {
            config: None,
            system_file: Some(PathBuf::from("elsewhere.csv")),
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.system_file, PathBuf::from("elsewhere.csv"));
        assert_eq!(config.max_bodies, 10);
    }
}
