//! Transcript bubbles drawn from rendered turn views.

use chrono::Local;
use client_core::{render::RECOMMENDATIONS_SUMMARY, DisplayNode, TurnView};
use egui::{Color32, RichText};
use shared::domain::TurnId;

const BUBBLE_GAP: f32 = 6.0;

fn bubble(ui: &mut egui::Ui, fill: Color32, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
        ui.set_width(ui.available_width());
        add_contents(ui);
    });
    ui.add_space(BUBBLE_GAP);
}

pub fn user_bubble(ui: &mut egui::Ui, label: &str) {
    let fill = ui.visuals().faint_bg_color;
    bubble(ui, fill, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("You:").strong());
            ui.label(label);
        });
    });
}

pub fn assistant_bubble(ui: &mut egui::Ui, view: &TurnView) {
    let fill = if view.failed {
        ui.visuals().error_fg_color.gamma_multiply(0.15)
    } else {
        ui.visuals().extreme_bg_color
    };

    let (answer, rest) = match view.body.nodes.split_first() {
        Some((DisplayNode::Answer(answer), rest)) => (Some(answer.as_str()), rest),
        _ => (None, view.body.nodes.as_slice()),
    };

    bubble(ui, fill, |ui| {
        ui.horizontal_wrapped(|ui| {
            let marker = if view.failed { "AI (error):" } else { "AI:" };
            ui.label(RichText::new(marker).strong());
            if let Some(answer) = answer {
                ui.label(answer);
            }
        });
        for node in rest {
            draw_node(ui, view.id, node);
        }
        let time = view.completed_at.with_timezone(&Local).format("%H:%M");
        ui.small(time.to_string());
    });
}

pub fn thinking_bubble(ui: &mut egui::Ui) {
    let fill = ui.visuals().extreme_bg_color;
    bubble(ui, fill, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new("AI:").strong());
            ui.spinner();
            ui.weak("Thinking...");
        });
    });
}

fn draw_node(ui: &mut egui::Ui, turn_id: TurnId, node: &DisplayNode) {
    match node {
        DisplayNode::Answer(answer) => {
            ui.label(answer.as_str());
        }
        DisplayNode::Confidence(confidence) => {
            let color = ui.visuals().weak_text_color();
            ui.label(
                RichText::new(format!("Confidence: {confidence}"))
                    .small()
                    .color(color),
            );
        }
        DisplayNode::Recommendations(items) => {
            ui.label(RichText::new(RECOMMENDATIONS_SUMMARY).strong());
            for (index, item) in items.iter().enumerate() {
                ui.label(format!("{}. {item}", index + 1));
            }
        }
        DisplayNode::ExtractedFields(lines) => {
            for line in lines {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(format!("{}:", line.key)).strong());
                    ui.label(line.value.as_str());
                });
            }
        }
        DisplayNode::Entities(body) | DisplayNode::Coverage(body) | DisplayNode::RawText(body) => {
            let summary = node.summary().unwrap_or_default();
            let copyable = matches!(node, DisplayNode::RawText(_));
            egui::CollapsingHeader::new(summary)
                .id_salt((turn_id, summary))
                .default_open(false)
                .show(ui, |ui| {
                    ui.label(RichText::new(body.as_str()).monospace());
                    if copyable && ui.small_button("Copy").clicked() {
                        ui.ctx().copy_text(body.clone());
                    }
                });
        }
    }
}
