use serde_json::Value;

use crate::body_info::{BodyInfo, Classification};
use crate::loader::UniverseLoader;
use crate::values::{color_value, double_value, duration_value, str_field, FieldMap, TimeUnit};

impl UniverseLoader {
    /// Descriptive fields of a body item. Malformed values keep their defaults; they
    /// never fail the body.
    pub fn load_body_info(&self, item: &FieldMap) -> BodyInfo {
        let mut info = BodyInfo::default();

        if let Some(class) = str_field(item, "class") {
            info.classification = class.parse().unwrap_or(Classification::Other);
        }
        if let Some(description) = str_field(item, "description") {
            info.description = description.to_string();
        }

        if let Some(label) = item.get("label").and_then(Value::as_object) {
            info.label_color = color_value(label.get("color"), info.label_color)
                .unwrap_or(info.label_color);
            info.label_fade_size = double_value(label.get("fadeSize"), 0.0).unwrap_or(0.0);
        }

        info.trajectory_plot_color = info.label_color;
        if let Some(plot) = item.get("trajectoryPlot").and_then(Value::as_object) {
            load_trajectory_plot(&mut info, plot);
        }

        info
    }
}

fn load_trajectory_plot(info: &mut BodyInfo, plot: &FieldMap) {
    if let Some(count) = plot.get("sampleCount").and_then(Value::as_i64) {
        info.set_trajectory_plot_samples(count);
    }

    let duration = duration_value(plot.get("duration"), TimeUnit::Day, 0.0).unwrap_or(0.0);
    if duration != 0.0 {
        info.trajectory_plot_duration = Some(duration);
    }
    info.trajectory_plot_lead = duration_value(plot.get("lead"), TimeUnit::Day, 0.0).unwrap_or(0.0);

    if let Some(fade) = plot.get("fade").and_then(Value::as_f64) {
        info.set_trajectory_plot_fade(fade);
    }
    if let Ok(color) = color_value(plot.get("color"), info.trajectory_plot_color) {
        info.trajectory_plot_color = color;
    }
}
