use cairo::{Context, ImageSurface};
use waysketch::config::{Config, HelpOverlayStyle, StatusBarStyle, StatusPosition};
use waysketch::input::InputState;

fn make_input_state() -> InputState {
    InputState::from_config(&Config::default())
}

fn surface_with_context(width: i32, height: i32) -> (ImageSurface, Context) {
    let surface = ImageSurface::create(cairo::Format::ARgb32, width, height).unwrap();
    let ctx = Context::new(&surface).unwrap();
    (surface, ctx)
}

fn surface_has_pixels(surface: &mut ImageSurface) -> bool {
    surface
        .data()
        .map(|data| data.iter().any(|byte| *byte != 0))
        .unwrap_or(false)
}

#[test]
fn render_status_bar_draws_for_all_positions() {
    let input = make_input_state();
    let style = StatusBarStyle::default();
    let positions = [
        StatusPosition::TopLeft,
        StatusPosition::TopRight,
        StatusPosition::BottomLeft,
        StatusPosition::BottomRight,
    ];

    for position in positions {
        let (mut surface, ctx) = surface_with_context(768, 512);
        waysketch::ui::render_status_bar(&ctx, &input, position, &style, 768, 512);
        drop(ctx);
        assert!(
            surface_has_pixels(&mut surface),
            "status bar should render pixels for {:?}",
            position
        );
    }
}

#[test]
fn render_help_overlay_draws_content() {
    let style = HelpOverlayStyle::default();
    let (mut surface, ctx) = surface_with_context(800, 600);
    waysketch::ui::render_help_overlay(&ctx, &style, 800, 600);
    drop(ctx);
    assert!(surface_has_pixels(&mut surface));
}
