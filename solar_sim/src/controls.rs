//! Control panel and telemetry plots
//!
//! The panel never touches the simulation directly: it returns [`Command`]s that
//! the app applies between frames.

use egui::{Color32, Context, RichText, Sense, Shape, Stroke, Ui};
use solar_sim::{BodyField, SimError, SimEvent, Simulation};

use crate::scene::DrawOptions;

/// Time span shown by the telemetry plots
const PLOT_WINDOW: f64 = 40.0;

/// A user request for the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ToggleRun,
    Reset,
    AddPlanet,
    DeleteLastPlanet,
    Save,
    Load,
    SetGravity(String),
    SetParameter {
        index: usize,
        field: BodyField,
        input: String,
    },
    CycleFocus,
}

/// Field picker and text input for one body
#[derive(Debug, Clone, Default)]
struct BodyEditor {
    field: Option<BodyField>,
    input: String,
}

pub struct ControlPanel {
    pub options: DrawOptions,
    gravity_input: String,
    editors: Vec<BodyEditor>,
    status: String,
    status_is_error: bool,
}

impl ControlPanel {
    pub fn new(simulation: &Simulation) -> Self {
        Self {
            options: DrawOptions::default(),
            gravity_input: simulation.gravitational_constant().to_string(),
            editors: vec![BodyEditor::default(); simulation.bodies().len()],
            status: "Error: none".to_string(),
            status_is_error: false,
        }
    }

    pub fn report_error(&mut self, err: &SimError) {
        self.status = format!("ERROR: {}", err);
        self.status_is_error = true;
    }

    pub fn report(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.status_is_error = false;
    }

    pub fn apply_events(&mut self, events: &[SimEvent], simulation: &Simulation) {
        self.editors
            .resize_with(simulation.bodies().len(), BodyEditor::default);
        for event in events {
            match event {
                SimEvent::GravityChanged(g) => self.gravity_input = g.to_string(),
                SimEvent::Saved(count) => self.report(format!("System saved ({} planets)", count)),
                SimEvent::Loaded(count) => self.report(format!("System loaded ({} planets)", count)),
                SimEvent::Halted(reason) => {
                    self.status = format!("Simulation halted: {}", reason);
                    self.status_is_error = true;
                }
                _ => {}
            }
        }
    }

    pub fn show(&mut self, ctx: &Context, simulation: &Simulation) -> Vec<Command> {
        let mut commands = Vec::new();

        egui::SidePanel::left("controls_panel")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading(RichText::new("Solar System").color(Color32::LIGHT_BLUE));
                ui.separator();

                self.run_controls(ui, simulation, &mut commands);
                ui.separator();
                self.display_controls(ui, &mut commands);
                ui.separator();
                self.gravity_controls(ui, simulation, &mut commands);
                ui.separator();

                let color = if self.status_is_error {
                    Color32::LIGHT_RED
                } else {
                    Color32::LIGHT_GREEN
                };
                ui.label(RichText::new(&self.status).color(color));
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.body_editors(ui, simulation, &mut commands);
                });
            });

        commands
    }

    fn run_controls(&self, ui: &mut Ui, simulation: &Simulation, commands: &mut Vec<Command>) {
        ui.horizontal(|ui| {
            let label = if simulation.is_running() { "⏸ Stop" } else { "▶ Start" };
            if ui
                .add_enabled(simulation.bodies().len() > 1, egui::Button::new(label))
                .clicked()
            {
                commands.push(Command::ToggleRun);
            }
            if ui.button("Reset simulation").clicked() {
                commands.push(Command::Reset);
            }
        });
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!simulation.registry().is_full(), egui::Button::new("Add planet"))
                .clicked()
            {
                commands.push(Command::AddPlanet);
            }
            if ui
                .add_enabled(simulation.bodies().len() > 1, egui::Button::new("Delete last planet"))
                .clicked()
            {
                commands.push(Command::DeleteLastPlanet);
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Save system").clicked() {
                commands.push(Command::Save);
            }
            if ui.button("Load system").clicked() {
                commands.push(Command::Load);
            }
        });
    }

    fn display_controls(&mut self, ui: &mut Ui, commands: &mut Vec<Command>) {
        if ui.button("Switch camera focus").clicked() {
            commands.push(Command::CycleFocus);
        }
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.options.trails, "Trails");
            ui.checkbox(&mut self.options.forces, "Forces");
            ui.checkbox(&mut self.options.velocities, "Velocities");
        });
        ui.add(egui::Slider::new(&mut self.options.ambient, 0.0..=1.0).text("Ambient light"));
    }

    fn gravity_controls(&mut self, ui: &mut Ui, simulation: &Simulation, commands: &mut Vec<Command>) {
        ui.horizontal(|ui| {
            ui.label(format!("G: {}", simulation.gravitational_constant()));
            ui.label(RichText::new("(real value: 6.67e-11)").small().italics());
        });
        ui.horizontal(|ui| {
            let response = ui.text_edit_singleline(&mut self.gravity_input);
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if submitted || ui.button("Set G").clicked() {
                commands.push(Command::SetGravity(self.gravity_input.clone()));
            }
        });
        if let Some(sun) = simulation.body(0) {
            ui.label(format!("Mass of the sun: {}", sun.mass));
        }
    }

    fn body_editors(&mut self, ui: &mut Ui, simulation: &Simulation, commands: &mut Vec<Command>) {
        for (index, body) in simulation.bodies().iter().enumerate() {
            let Some(editor) = self.editors.get_mut(index) else {
                continue;
            };

            ui.group(|ui| {
                ui.label(RichText::new(body.label()).strong().color(Color32::YELLOW));
                ui.label(RichText::new(body.summary()).small().monospace());

                ui.horizontal(|ui| {
                    let selected = editor
                        .field
                        .map(|f| f.label())
                        .unwrap_or("choose what to edit");
                    egui::ComboBox::from_id_source(("field", index))
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for field in BodyField::ALL {
                                if ui
                                    .selectable_value(&mut editor.field, Some(field), field.label())
                                    .clicked()
                                {
                                    editor.input = field.read(body).to_string();
                                }
                            }
                        });

                    if let Some(field) = editor.field {
                        let response = ui.text_edit_singleline(&mut editor.input);
                        let submitted =
                            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        if submitted || ui.button("Set").clicked() {
                            commands.push(Command::SetParameter {
                                index,
                                field,
                                input: editor.input.clone(),
                            });
                        }
                    }
                });
            });
        }
    }

    /// Force and distance of the first planet over time
    pub fn show_telemetry(&self, ctx: &Context, simulation: &Simulation) {
        egui::TopBottomPanel::bottom("telemetry_panel")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                let samples: Vec<_> = simulation.telemetry().copied().collect();
                ui.columns(2, |columns| {
                    plot(
                        &mut columns[0],
                        "Planet 1: force magnitude",
                        samples.iter().map(|s| (s.time, s.force)),
                    );
                    plot(
                        &mut columns[1],
                        "Planet 1: distance from the sun",
                        samples.iter().map(|s| (s.time, s.distance)),
                    );
                });
            });
    }
}

/// Scrolling line plot of `(time, value)` points, y starting at zero
fn plot(ui: &mut Ui, title: &str, points: impl Iterator<Item = (f64, f64)>) {
    ui.label(RichText::new(title).small());
    let points: Vec<(f64, f64)> = points.collect();
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 2.0, Color32::WHITE);

    let Some(&(t_last, _)) = points.last() else {
        return;
    };
    let t_min = (t_last - PLOT_WINDOW).max(0.0);
    let t_max = t_min + PLOT_WINDOW;
    let y_max = points
        .iter()
        .filter(|(t, _)| *t >= t_min)
        .map(|(_, v)| *v)
        .fold(0.0_f64, f64::max)
        .max(f64::EPSILON)
        * 1.1;

    let line: Vec<egui::Pos2> = points
        .iter()
        .filter(|(t, _)| *t >= t_min)
        .map(|(t, v)| {
            let x = rect.left() + ((t - t_min) / (t_max - t_min)) as f32 * rect.width();
            let y = rect.bottom() - (v / y_max) as f32 * rect.height();
            egui::pos2(x, y)
        })
        .collect();
    if line.len() > 1 {
        painter.add(Shape::line(line, Stroke::new(1.5, Color32::BLUE)));
    }
    painter.text(
        rect.left_top() + egui::vec2(4.0, 2.0),
        egui::Align2::LEFT_TOP,
        format!("{:.3}", y_max / 1.1),
        egui::FontId::monospace(10.0),
        Color32::DARK_GRAY,
    );
}
