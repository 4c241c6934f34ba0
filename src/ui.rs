/// UI rendering: status bar and help overlay
use crate::config::{StatusBarStyle, StatusPosition};
use crate::draw::Color;
use crate::input::InputState;

// ============================================================================
// UI Layout Constants (not configurable)
// ============================================================================

/// Background rectangle X offset
const STATUS_BG_OFFSET_X: f64 = 5.0;
/// Background rectangle Y offset
const STATUS_BG_OFFSET_Y: f64 = 3.0;
/// Background rectangle width padding
const STATUS_BG_WIDTH_PAD: f64 = 10.0;
/// Background rectangle height padding
const STATUS_BG_HEIGHT_PAD: f64 = 8.0;
/// Color indicator dot X offset
const STATUS_DOT_OFFSET_X: f64 = 3.0;

/// Fallback character width for monospace font estimation
const HELP_CHAR_WIDTH_ESTIMATE: f64 = 9.0;

/// Builds the status line from the outbound editor state.
///
/// The shape count reads the published snapshot (what external collaborators
/// observe), not the live frame buffer.
pub fn status_text(input_state: &InputState) -> String {
    let count = input_state.scene.published().len();
    let settings = &input_state.settings;

    let enabled = input_state.scene.enabled_kinds().as_list();
    let kinds = if enabled.is_empty() {
        "none".to_string()
    } else {
        enabled
            .iter()
            .map(|k| k.label())
            .collect::<Vec<_>>()
            .join("+")
    };

    let selection = match input_state.scene.selected_shape() {
        Some(shape) => format!("{}#{}", shape.kind.label(), shape.id),
        None => "-".to_string(),
    };

    format!(
        "[{} shapes] [sel {}] [{}] [{}x{}] [pad {}] [ground {}]  F10=Help",
        count,
        selection,
        kinds,
        settings.shape_width as i32,
        settings.shape_height as i32,
        settings.polygon_padding as i32,
        settings.ground_height as i32,
    )
}

/// Render status bar showing shape count, selection, and current settings
pub fn render_status_bar(
    ctx: &cairo::Context,
    input_state: &InputState,
    position: StatusPosition,
    style: &StatusBarStyle,
    screen_width: u32,
    screen_height: u32,
) {
    let text = status_text(input_state);

    // The dot previews the fill new shapes will get.
    let dot_color = Color::from_hex(&input_state.settings.shape_color);

    // Set font
    ctx.set_font_size(style.font_size);
    ctx.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);

    // Measure text
    let extents = match ctx.text_extents(&text) {
        Ok(ext) => ext,
        Err(e) => {
            log::warn!("Failed to measure status bar text: {}, skipping status bar", e);
            return; // Gracefully skip rendering if font measurement fails
        }
    };
    let text_width = extents.width();
    let text_height = extents.height();

    // Calculate position using configurable padding
    let padding = style.padding;
    let (x, y) = match position {
        StatusPosition::TopLeft => (padding, padding + text_height),
        StatusPosition::TopRight => (
            screen_width as f64 - text_width - padding,
            padding + text_height,
        ),
        StatusPosition::BottomLeft => (padding, screen_height as f64 - padding),
        StatusPosition::BottomRight => (
            screen_width as f64 - text_width - padding,
            screen_height as f64 - padding,
        ),
    };

    // Draw semi-transparent background
    let [r, g, b, a] = style.bg_color;
    ctx.set_source_rgba(r, g, b, a);
    ctx.rectangle(
        x - STATUS_BG_OFFSET_X,
        y - text_height - STATUS_BG_OFFSET_Y,
        text_width + STATUS_BG_WIDTH_PAD,
        text_height + STATUS_BG_HEIGHT_PAD,
    );
    let _ = ctx.fill();

    // Draw default-fill indicator dot
    let dot_x = x + STATUS_DOT_OFFSET_X;
    let dot_y = y - text_height / 2.0;
    ctx.set_source_rgba(dot_color.r, dot_color.g, dot_color.b, dot_color.a);
    ctx.arc(
        dot_x,
        dot_y,
        style.dot_radius,
        0.0,
        2.0 * std::f64::consts::PI,
    );
    let _ = ctx.fill();

    // Draw text
    let [r, g, b, a] = style.text_color;
    ctx.set_source_rgba(r, g, b, a);
    ctx.move_to(x, y);
    let _ = ctx.show_text(&text);
}

/// Render help overlay showing all keybindings
pub fn render_help_overlay(
    ctx: &cairo::Context,
    style: &crate::config::HelpOverlayStyle,
    screen_width: u32,
    screen_height: u32,
) {
    let help_text = vec![
        "━━━━━━━━━━━━━━━━━━━━━ WAYSKETCH CONTROLS ━━━━━━━━━━━━━━━━━━━━━",
        "",
        "  POINTER                              SHAPE TYPES",
        "    Left click      Place shape          1            Toggle rectangles",
        "    Left drag       Move shape           2            Toggle circles",
        "    Right click     Delete shape         3            Toggle triangles",
        "",
        "  SETTINGS                             COLORS",
        "    Scroll          Shape width          D            Window/door palette",
        "    Shift+Scroll    Shape height         Shift+D      Reset shape color",
        "    + / -           Building padding     F            Building palette",
        "    [ / ]           Ground height        G            Ground palette",
        "    Tab             Canvas size",
        "",
        "  ACTIONS",
        "    E               Clear all shapes     Ctrl+S       Export PNG",
        "    F10             Toggle help          Escape/Ctrl+Q  Exit",
        "",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━",
        "  A selected shape recolors with D; without a selection D cycles the default",
    ];

    // Set font
    ctx.set_font_size(style.font_size);
    ctx.select_font_face(
        "Monospace",
        cairo::FontSlant::Normal,
        cairo::FontWeight::Normal,
    );

    // Find longest line for width
    let mut max_width: f64 = 0.0;
    for line in &help_text {
        let extents = match ctx.text_extents(line) {
            Ok(ext) => ext,
            Err(e) => {
                log::warn!(
                    "Failed to measure help text line '{}': {}, using fallback width",
                    line,
                    e
                );
                // Use a fallback width estimate based on character count
                let fallback_width = line.len() as f64 * HELP_CHAR_WIDTH_ESTIMATE;
                max_width = max_width.max(fallback_width);
                continue;
            }
        };
        if extents.width() > max_width {
            max_width = extents.width();
        }
    }

    let box_width = max_width + style.padding * 2.0;
    let box_height = (help_text.len() as f64) * style.line_height + style.padding * 2.0;

    // Center the box
    let box_x = (screen_width as f64 - box_width) / 2.0;
    let box_y = (screen_height as f64 - box_height) / 2.0;

    // Draw semi-transparent background
    let [r, g, b, a] = style.bg_color;
    ctx.set_source_rgba(r, g, b, a);
    ctx.rectangle(box_x, box_y, box_width, box_height);
    let _ = ctx.fill();

    // Draw border
    let [r, g, b, a] = style.border_color;
    ctx.set_source_rgba(r, g, b, a);
    ctx.set_line_width(style.border_width);
    ctx.rectangle(box_x, box_y, box_width, box_height);
    let _ = ctx.stroke();

    // Draw text
    let [r, g, b, a] = style.text_color;
    ctx.set_source_rgba(r, g, b, a);
    for (i, line) in help_text.iter().enumerate() {
        let text_x = box_x + style.padding;
        let text_y = box_y + style.padding + (i as f64 + 1.0) * style.line_height;

        ctx.move_to(text_x, text_y);
        let _ = ctx.show_text(line);
    }
}
