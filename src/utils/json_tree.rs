use eframe::egui::{self, Color32, RichText};
use serde_json::Value;

const KEY_COLOR: Color32 = Color32::from_rgb(161, 89, 225);
const STRING_COLOR: Color32 = Color32::from_rgb(0, 150, 90);
const NUMBER_COLOR: Color32 = Color32::from_rgb(40, 120, 220);
const LITERAL_COLOR: Color32 = Color32::from_rgb(200, 120, 30);

/// Levels expanded when the tree is first shown.
const OPEN_DEPTH: usize = 2;

/// Draws `value` as a collapsible tree. Read-only.
pub fn show(ui: &mut egui::Ui, id: &str, value: &Value) {
    egui::Frame::none()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            show_node(ui, id, None, value, 0);
        });
}

fn show_node(ui: &mut egui::Ui, id: &str, key: Option<&str>, value: &Value, depth: usize) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            egui::CollapsingHeader::new(node_label(key, value))
                .id_source(id)
                .default_open(depth < OPEN_DEPTH)
                .show(ui, |ui| {
                    for (child_key, child) in map {
                        let child_id = format!("{}/{}", id, child_key);
                        show_node(ui, &child_id, Some(child_key), child, depth + 1);
                    }
                });
        }
        Value::Array(items) if !items.is_empty() => {
            egui::CollapsingHeader::new(node_label(key, value))
                .id_source(id)
                .default_open(depth < OPEN_DEPTH)
                .show(ui, |ui| {
                    for (index, child) in items.iter().enumerate() {
                        let child_key = index.to_string();
                        let child_id = format!("{}/{}", id, index);
                        show_node(ui, &child_id, Some(&child_key), child, depth + 1);
                    }
                });
        }
        leaf => {
            ui.horizontal_wrapped(|ui| {
                if let Some(key) = key {
                    ui.label(RichText::new(format!("\"{}\":", key)).color(KEY_COLOR).monospace());
                }
                ui.label(
                    RichText::new(scalar_text(leaf))
                        .color(scalar_color(leaf))
                        .monospace(),
                );
            });
        }
    }
}

/// Header text for a container node, e.g. `"items": [3 items]`.
pub fn node_label(key: Option<&str>, value: &Value) -> String {
    let summary = match value {
        Value::Object(map) => format!("{{{} {}}}", map.len(), plural(map.len(), "key", "keys")),
        Value::Array(items) => format!("[{} {}]", items.len(), plural(items.len(), "item", "items")),
        other => scalar_text(other),
    };

    match key {
        Some(key) => format!("\"{}\": {}", key, summary),
        None => summary,
    }
}

pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        other => other.to_string(),
    }
}

fn scalar_color(value: &Value) -> Color32 {
    match value {
        Value::String(_) => STRING_COLOR,
        Value::Number(_) => NUMBER_COLOR,
        _ => LITERAL_COLOR,
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
