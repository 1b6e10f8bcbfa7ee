use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{Srgb, Srgba};

const BACKGROUND: Srgba<f64> = Srgba::new(0.04, 0.06, 0.11, 1.0);

pub struct ThemeColors {
    pub background: Srgba<f64>,
    pub gate_frame: Srgba<f64>,
    pub gate_ring: Srgba<f64>,
    pub gate_glyph: Srgba<f64>,
    pub chevron_lit: Srgba<f64>,
    pub chevron_dim: Srgba<f64>,
    pub wormhole: Srgba<f64>,
    pub sector: Srgba<f64>,
    pub sector_hovered: Srgba<f64>,
    pub sector_entered: Srgba<f64>,
    pub sector_outline: Srgba<f64>,
    pub dial_button: Srgba<f64>,
    pub control: Srgba<f64>,
    pub text: Srgba<f64>,
    pub status_text: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            background: BACKGROUND,
            gate_frame: Srgba::new(0.36, 0.39, 0.43, 1.0),
            gate_ring: Srgba::new(0.43, 0.46, 0.51, 1.0),
            gate_glyph: Srgba::new(0.66, 0.69, 0.74, 1.0),
            chevron_lit: Srgba::new(1.0, 0.57, 0.18, 1.0),
            chevron_dim: Srgba::new(0.38, 0.31, 0.2, 1.0),
            wormhole: Srgba::new(0.11, 0.41, 0.63, 1.0),
            sector: Srgba::new(0.22, 0.25, 0.29, 0.9),
            sector_hovered: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.32, 0.36, 0.42, 1.0),
                Some(0.9),
            ),
            sector_entered: Srgba::new(0.55, 0.33, 0.14, 0.9),
            sector_outline: Srgba::new(0.11, 0.13, 0.15, 1.0),
            dial_button: Self::lookup_color(
                context,
                "error_bg_color",
                Srgba::new(0.72, 0.2, 0.12, 1.0),
                Some(1.0),
            ),
            control: Srgba::new(0.4, 0.23, 0.12, 1.0),
            text: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.88, 0.92, 0.96, 1.0),
                Some(1.0),
            ),
            status_text: Srgba::new(0.72, 0.79, 0.86, 1.0),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        match context.lookup_color(name) {
            Some(rgba) => to_srgba(&rgba, alpha_override),
            None => {
                log::trace!("theme colour '{}' not defined, using fallback", name);
                fallback
            }
        }
    }
}

fn to_srgba(rgba: &gdk::RGBA, alpha_override: Option<f64>) -> Srgba<f64> {
    Srgba::new(
        rgba.red() as f64,
        rgba.green() as f64,
        rgba.blue() as f64,
        alpha_override.unwrap_or(rgba.alpha() as f64),
    )
}

/// The window shows through wherever the cairo scene leaves gaps, so both share the night sky.
fn window_css(background: Srgba<f64>) -> String {
    let rgb: Srgb<u8> = background.color.into_format();
    format!(
        ".dhd-window, .dhd-drawing-area {{ background-color: rgba({}, {}, {}, {:.2}); }}",
        rgb.red, rgb.green, rgb.blue, background.alpha
    )
}

pub fn load_css() {
    let Some(display) = gdk::Display::default() else {
        log::warn!("No display available; skipping DHD stylesheet");
        return;
    };
    let provider = gtk::CssProvider::new();
    provider.load_from_data(&window_css(BACKGROUND));
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_srgba_respects_alpha_override() {
        let rgba = gdk::RGBA::new(1.0, 0.5, 0.0, 0.25);
        let kept = to_srgba(&rgba, None);
        assert_eq!(kept.alpha, 0.25);
        assert_eq!(kept.red, 1.0);
        assert_eq!(to_srgba(&rgba, Some(0.9)).alpha, 0.9);
    }

    #[test]
    fn test_window_css_uses_background() {
        assert_eq!(
            window_css(BACKGROUND),
            ".dhd-window, .dhd-drawing-area { background-color: rgba(10, 15, 28, 1.00); }"
        );
    }
}
