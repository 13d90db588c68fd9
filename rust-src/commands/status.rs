//! Status line command for Claude Code's `statusLine` hook.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use anyhow::Result;
use crossterm::style::{Color, Stylize};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::config::{Settings, CONTEXT_LIMIT};
use crate::data::TranscriptScanner;
use crate::estimation::ContextEstimator;
use crate::models::lenient::{lenient, lenient_or_default};
use crate::models::ContextUsage;


/// Payload Claude Code pipes to the status line command.
///
/// Every field decodes leniently, so one odd value never hides the rest.
#[derive(Debug, Default, Deserialize)]
pub struct HostPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<HostModel>,
    /// `None` when absent, malformed or an empty object.
    #[serde(default, deserialize_with = "non_empty_window")]
    pub context_window: Option<HostContextWindow>,
}


#[derive(Debug, Default, Deserialize)]
pub struct HostModel {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub display_name: String,
}


#[derive(Debug, Default, Deserialize)]
pub struct HostContextWindow {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub used_percentage: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub context_window_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_usage: Option<CurrentUsage>,
}


#[derive(Debug, Default, Deserialize)]
pub struct CurrentUsage {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub input_tokens: u64,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub output_tokens: u64,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub cache_creation_input_tokens: u64,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub cache_read_input_tokens: u64,
}


impl HostContextWindow {
    pub fn window_size(&self) -> u64 {
        self.context_window_size.unwrap_or(CONTEXT_LIMIT)
    }
}


fn non_empty_window<'de, D>(deserializer: D) -> Result<Option<HostContextWindow>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) if !map.is_empty() => {
            Ok(serde_json::from_value(Value::Object(map)).ok())
        }
        _ => Ok(None),
    }
}


/// What the context segment displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextSegment {
    pub percentage: f64,
    pub tokens: u64,
    pub window: u64,
}


impl From<&HostContextWindow> for ContextSegment {
    fn from(ctx: &HostContextWindow) -> Self {
        let mut tokens = ctx.current_usage.as_ref().map_or(0, |u| {
            u.cache_read_input_tokens
                + u.cache_creation_input_tokens
                + u.input_tokens
                + u.output_tokens
        });
        if tokens == 0 && ctx.used_percentage > 0.0 {
            tokens = (ctx.window_size() as f64 * ctx.used_percentage / 100.0) as u64;
        }
        Self {
            percentage: ctx.used_percentage,
            tokens,
            window: ctx.window_size(),
        }
    }
}


impl From<&ContextUsage> for ContextSegment {
    fn from(usage: &ContextUsage) -> Self {
        Self {
            percentage: usage.percentage,
            tokens: usage.estimated_tokens,
            window: usage.context_limit,
        }
    }
}


impl ContextSegment {
    pub fn render(&self) -> String {
        let icon = if self.percentage >= 65.0 { "⚠️" } else { "📊" };
        let text = format!(
            "{icon} CTX:{}% ({}k/{}k)",
            self.percentage,
            self.tokens / 1000,
            self.window / 1000
        );
        format!("{}", text.with(context_color(self.percentage)))
    }
}


/// Green while safe, then yellow, orange and red as the window fills.
pub fn context_color(percentage: f64) -> Color {
    let (r, g, b) = if percentage < 40.0 {
        (0, 255, 0)
    } else if percentage < 65.0 {
        (255, 255, 0)
    } else if percentage < 80.0 {
        (255, 165, 0)
    } else {
        (255, 100, 100)
    };
    Color::Rgb { r, g, b }
}


/// Display label for the active model.
pub fn model_label(host: Option<&HostModel>, env_model: Option<&str>) -> &'static str {
    if let Some(model) = host.filter(|m| !m.display_name.is_empty()) {
        if model.display_name.contains("Opus") {
            if model.display_name.contains("4.5") || model.id.contains("4-5") {
                return "Opus 4.5";
            }
            return "Opus 4";
        }
        return "Sonnet 4";
    }

    match env_model {
        Some(name) if name.to_lowercase().contains("opus") => "Opus 4",
        _ => "Sonnet 4",
    }
}


/// Build the full status line.
pub fn render_status_line(
    project_path: &Path,
    payload: &HostPayload,
    estimate: Option<ContextUsage>,
    env_model: Option<&str>,
) -> String {
    let project_name = project_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());

    let mut parts = vec![
        format!("📁 {project_name}"),
        format!("🤖 {}", model_label(payload.model.as_ref(), env_model)),
    ];

    let segment = match &payload.context_window {
        Some(ctx) => Some(ContextSegment::from(ctx)),
        None => estimate.as_ref().map(ContextSegment::from),
    };
    if let Some(segment) = segment {
        parts.push(segment.render());
    }

    parts.join(" | ")
}


/// Parse the host payload; anything unreadable is treated as absent.
pub fn parse_payload(raw: &str) -> HostPayload {
    if raw.trim().is_empty() {
        return HostPayload::default();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        debug!(error = %e, "ignoring malformed status line payload");
        HostPayload::default()
    })
}


fn read_stdin_payload() -> HostPayload {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return HostPayload::default();
    }

    let mut raw = String::new();
    match stdin.read_to_string(&mut raw) {
        Ok(_) => parse_payload(&raw),
        Err(e) => {
            debug!(error = %e, "cannot read status line payload");
            HostPayload::default()
        }
    }
}


/// Run the status line command.
pub fn run(settings: &Settings) -> Result<()> {
    let payload = read_stdin_payload();

    // Only scan transcripts when the host did not report the context window.
    let estimate = if payload.context_window.is_none() {
        ContextEstimator::new(TranscriptScanner::new(&settings.projects_dir))
            .estimate(&settings.project_path)
    } else {
        None
    };

    let env_model = std::env::var("CLAUDE_MODEL").ok();
    println!(
        "{}",
        render_status_line(&settings.project_path, &payload, estimate, env_model.as_deref())
    );

    Ok(())
}
