//! Equations sidebar
//!
//! Shows the force law and the update rules the integrator applies each step.

use egui::{Color32, Context, RichText};

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
    readouts: &[(&str, String)],
) {
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(title).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::Grid::new("readouts_grid")
                .num_columns(2)
                .spacing([10.0, 4.0])
                .show(ui, |ui| {
                    for (name, value) in readouts {
                        ui.label(RichText::new(*name).strong());
                        ui.label(RichText::new(value).monospace());
                        ui.end_row();
                    }
                });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("Equations").strong(), |ui| {
                    for eq in equations {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(RichText::new(*symbol).monospace().color(Color32::LIGHT_GREEN));
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });
            });
        });
}

pub const SOLAR_SYSTEM_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Newton's Law of Gravitation",
        formula: "F⃗₁ = -G·m₁·m₂ / |r⃗|² · r̂,  r⃗ = x⃗₁ - x⃗₂",
        description: "Pull on body 1 toward body 2",
    },
    Equation {
        name: "Total Force",
        formula: "F⃗ᵢ = Σⱼ≠ᵢ F⃗ᵢⱼ",
        description: "All pairs, evaluated at the current positions",
    },
    Equation {
        name: "Momentum Update",
        formula: "p⃗ ← p⃗ + F⃗·Δt",
        description: "Every body, before any position moves",
    },
    Equation {
        name: "Position Update (Euler-Cromer)",
        formula: "x⃗ ← x⃗ + p⃗·Δt / m",
        description: "Uses the momentum just updated",
    },
    Equation {
        name: "Circular Orbit Speed",
        formula: "v = √(G·M / r)",
        description: "Initial speed of a newly added planet",
    },
    Equation {
        name: "Total Energy",
        formula: "E = Σ p²/2m - Σᵢ<ⱼ G·mᵢ·mⱼ / rᵢⱼ",
        description: "Bounded, not exactly conserved, by the method",
    },
];

pub const SOLAR_SYSTEM_VARIABLES: &[(&str, &str)] = &[
    ("G", "Gravitational constant (editable)"),
    ("M, m", "Mass of the sun, of a planet"),
    ("x⃗", "Position"),
    ("p⃗", "Momentum (m·v⃗)"),
    ("r⃗, r̂", "Separation and its direction"),
    ("F⃗", "Gravitational force"),
    ("Δt", "Fixed time step"),
    ("E", "Total energy"),
];
