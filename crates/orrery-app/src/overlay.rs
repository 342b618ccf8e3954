//! Debug overlay: camera readout shown in the window title while visible.

use crate::context::AppContext;

pub fn overlay_text(ctx: &AppContext) -> String {
    let state = ctx.observer().state();
    let [r, g, b] = ctx.settings().background_color;
    let channel = ["R", "G", "B"][ctx.background_channel()];
    format!(
        "pos ({:.2}, {:.2}, {:.2}) | yaw {:.1} pitch {:.1} | front ({:.2}, {:.2}, {:.2}) | mouse look {} | bg ({r:.2}, {g:.2}, {b:.2}) edit {channel} | {}",
        state.position.x,
        state.position.y,
        state.position.z,
        state.yaw,
        state.pitch,
        state.front.x,
        state.front.y,
        state.front.z,
        if ctx.observer().capture_enabled() { "on" } else { "off" },
        if ctx.blinn() { "blinn-phong" } else { "phong" },
    )
}

/// `base` alone, or `base` followed by the overlay when it is visible.
pub fn window_title(base: &str, ctx: &AppContext) -> String {
    if ctx.ui_visible() {
        format!("{base} | {}", overlay_text(ctx))
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use orrery_config::{Config, PersistedSettings};
    use orrery_input::{ControlAction, InputSink};

    #[test]
    fn test_text_reports_pose_and_flags() {
        let ctx = AppContext::new(&Config::default(), PersistedSettings::default(), Scene::new());
        let text = overlay_text(&ctx);
        assert!(text.contains("pos (-11.10, 0.50, 38.38)"), "{text}");
        assert!(text.contains("-1.00)"), "{text}");
        assert!(text.contains("mouse look on"));
        assert!(text.contains("phong"));
        assert!(text.contains("bg (0.00, 0.00, 0.00) edit R"), "{text}");
    }

    #[test]
    fn test_title_only_shows_overlay_when_visible() {
        let mut ctx = AppContext::new(&Config::default(), PersistedSettings::default(), Scene::new());
        assert_eq!(window_title("Solar system", &ctx), "Solar system");

        ctx.on_key(ControlAction::ToggleOverlay, true);
        let title = window_title("Solar system", &ctx);
        assert!(title.starts_with("Solar system | pos"));
        assert!(title.contains("mouse look off"));
    }
}
