//! Interaction state machine and input state management.

use super::events::{Key, MouseButton};
use super::modifiers::Modifiers;
use super::settings::EditorSettings;
use crate::config::{presets, Config};
use crate::draw::shape::ShapeKind;
use crate::draw::Color;
use crate::scene::Scene;

/// Current pointer gesture state machine.
///
/// Intent is decided at press time: pressing an existing shape always starts
/// a drag (a zero-distance drag is a harmless no-op), pressing empty canvas
/// always places a shape. The captured grab offset makes "dragging with no
/// shape" unrepresentable.
#[derive(Debug)]
pub enum PointerState {
    /// Not interacting - waiting for the next press
    Idle,
    /// A shape is being dragged (left button held)
    Dragging {
        /// Id of the shape under drag
        id: u64,
        /// Pointer X minus shape origin X, captured at press
        grab_dx: f64,
        /// Pointer Y minus shape origin Y, captured at press
        grab_dy: f64,
        /// Whether any motion happened since the press
        moved: bool,
    },
}

/// Main input state containing the scene and all interaction state.
///
/// This struct owns the scene, the runtime settings, the pointer state
/// machine, and the UI flags. It processes all keyboard and mouse events to
/// update the editor state and determine when redraws are needed.
pub struct InputState {
    /// The scene: shapes, selection, rotation
    pub scene: Scene,
    /// Runtime settings (sizes, colors, canvas dimensions)
    pub settings: EditorSettings,
    /// Pointer gesture state machine
    pub pointer: PointerState,
    /// Shape under the cursor for visual feedback (never set while dragging)
    pub hovered: Option<u64>,
    /// Current modifier key state
    pub modifiers: Modifiers,
    /// Whether the user requested to exit
    pub should_exit: bool,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
    /// Whether the help overlay is currently visible (toggled with F10)
    pub show_help: bool,
    /// Pending image export request (taken by the backend)
    pending_export: bool,
}

impl InputState {
    /// Creates the input state from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(EditorSettings::from_config(config))
    }

    /// Creates the input state with the given runtime settings.
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            scene: Scene::new(),
            settings,
            pointer: PointerState::Idle,
            hovered: None,
            modifiers: Modifiers::new(),
            should_exit: false,
            needs_redraw: true,
            show_help: false,
            pending_export: false,
        }
    }

    /// True while a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.pointer, PointerState::Dragging { .. })
    }

    /// Id of the shape under drag, if any.
    pub fn dragged_shape(&self) -> Option<u64> {
        match self.pointer {
            PointerState::Dragging { id, .. } => Some(id),
            PointerState::Idle => None,
        }
    }

    /// Takes and clears any pending export request.
    ///
    /// Called by the backend, which owns the surface needed to produce the
    /// image.
    pub fn take_pending_export(&mut self) -> bool {
        std::mem::take(&mut self.pending_export)
    }

    fn in_canvas(&self, x: f64, y: f64) -> bool {
        x >= 0.0
            && x <= self.settings.canvas_width as f64
            && y >= 0.0
            && y <= self.settings.canvas_height as f64
    }

    /// Processes a mouse button press event.
    ///
    /// # Behavior
    /// - Presses outside the canvas are ignored entirely
    /// - Right button on a shape: delete it immediately
    /// - Left button on a shape: select it and start dragging
    /// - Left button on empty canvas: place the next rotated shape kind
    pub fn on_mouse_press(&mut self, button: MouseButton, x: f64, y: f64) {
        if !self.in_canvas(x, y) {
            return;
        }

        match button {
            MouseButton::Right => {
                if let Some(id) = self.scene.shape_at(x, y) {
                    log::debug!("Deleting shape {id}");
                    self.scene.delete_shape(id);
                    if self.hovered == Some(id) {
                        self.hovered = None;
                    }
                    self.needs_redraw = true;
                }
            }
            MouseButton::Left => {
                if !matches!(self.pointer, PointerState::Idle) {
                    return;
                }
                if let Some(shape) = self
                    .scene
                    .shape_at(x, y)
                    .and_then(|id| self.scene.shape(id))
                {
                    // Direct manipulation: pressing a shape always starts a
                    // drag, even if the pointer never moves.
                    let id = shape.id;
                    self.pointer = PointerState::Dragging {
                        id,
                        grab_dx: x - shape.x,
                        grab_dy: y - shape.y,
                        moved: false,
                    };
                    self.scene.select(Some(id));
                } else {
                    self.scene.select(None);
                    let kind = self.scene.next_shape_kind();
                    log::debug!("Placing {} at ({x:.0}, {y:.0})", kind.label());
                    self.scene.add_shape(
                        kind,
                        x,
                        y,
                        self.settings.size_defaults(),
                        self.settings.bounds(),
                    );
                }
                self.needs_redraw = true;
            }
            MouseButton::Middle => {}
        }
    }

    /// Processes pointer motion.
    ///
    /// While dragging, the shape follows the pointer minus the captured grab
    /// offset, clamped to the canvas. While idle, motion only refreshes the
    /// hover feedback.
    pub fn on_mouse_motion(&mut self, x: f64, y: f64) {
        match &mut self.pointer {
            PointerState::Dragging {
                id,
                grab_dx,
                grab_dy,
                moved,
            } => {
                let id = *id;
                let (nx, ny) = (x - *grab_dx, y - *grab_dy);
                *moved = true;
                self.scene.move_shape(id, nx, ny, self.settings.bounds());
                self.needs_redraw = true;
            }
            PointerState::Idle => self.update_hover(x, y),
        }
    }

    /// Processes a mouse button release.
    ///
    /// Releasing a drag publishes the final position immediately and returns
    /// to idle.
    pub fn on_mouse_release(&mut self, button: MouseButton, _x: f64, _y: f64) {
        if button != MouseButton::Left {
            return;
        }
        if self.is_dragging() {
            self.scene.publish_now();
            self.pointer = PointerState::Idle;
            self.needs_redraw = true;
        }
    }

    /// Recomputes the hovered shape for visual feedback.
    ///
    /// Must not run while dragging: the dragged shape's emphasis takes
    /// precedence and hover would fight it.
    pub fn update_hover(&mut self, x: f64, y: f64) {
        if self.is_dragging() {
            return;
        }
        let hovered = if self.in_canvas(x, y) {
            self.scene.shape_at(x, y)
        } else {
            None
        };
        if hovered != self.hovered {
            self.hovered = hovered;
            self.needs_redraw = true;
        }
    }

    /// Processes a key press event.
    ///
    /// Handles the keyboard collaborator layer: shape-kind toggles, settings
    /// adjustments, palette cycling, clear, export, help, and exit.
    pub fn on_key_press(&mut self, key: Key) {
        match key {
            Key::Shift => {
                self.modifiers.shift = true;
                return;
            }
            Key::Ctrl => {
                self.modifiers.ctrl = true;
                return;
            }
            _ => {}
        }

        match key {
            Key::Char('1') => self.toggle_kind(ShapeKind::Rectangle),
            Key::Char('2') => self.toggle_kind(ShapeKind::Circle),
            Key::Char('3') => self.toggle_kind(ShapeKind::Triangle),
            Key::Char('e' | 'E') => {
                log::info!("Clearing all shapes");
                self.scene.clear();
                self.needs_redraw = true;
            }
            Key::Char('d' | 'D') => {
                self.recolor_binding();
                self.needs_redraw = true;
            }
            Key::Char('f' | 'F') => {
                self.settings.cycle_polygon_color();
                self.needs_redraw = true;
            }
            Key::Char('g' | 'G') => {
                self.settings.cycle_ground_color();
                self.needs_redraw = true;
            }
            Key::Char('s' | 'S') if self.modifiers.ctrl => {
                self.pending_export = true;
            }
            Key::Char('q' | 'Q') if self.modifiers.ctrl => {
                self.should_exit = true;
            }
            Key::Char('[') => {
                self.settings.adjust_ground_height(-10.0);
                self.needs_redraw = true;
            }
            Key::Char(']') => {
                self.settings.adjust_ground_height(10.0);
                self.needs_redraw = true;
            }
            Key::Plus => {
                self.settings.adjust_polygon_padding(5.0);
                self.needs_redraw = true;
            }
            Key::Minus => {
                self.settings.adjust_polygon_padding(-5.0);
                self.needs_redraw = true;
            }
            Key::Tab => {
                self.settings.cycle_canvas_size();
                self.needs_redraw = true;
            }
            Key::F10 => {
                self.show_help = !self.show_help;
                self.needs_redraw = true;
            }
            Key::Escape => {
                self.should_exit = true;
            }
            _ => {}
        }
    }

    /// Processes a key release event (modifier tracking only).
    pub fn on_key_release(&mut self, key: Key) {
        match key {
            Key::Shift => self.modifiers.shift = false,
            Key::Ctrl => self.modifiers.ctrl = false,
            _ => {}
        }
    }

    /// Processes a discrete scroll step. Positive steps grow the default
    /// shape size; Shift retargets from width to height.
    pub fn on_scroll(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        let delta = 5.0 * steps as f64;
        if self.modifiers.shift {
            self.settings.adjust_shape_height(delta);
        } else {
            self.settings.adjust_shape_width(delta);
        }
        self.needs_redraw = true;
    }

    fn toggle_kind(&mut self, kind: ShapeKind) {
        self.scene.toggle_kind(kind);
        log::info!(
            "Enabled kinds: {:?}",
            self.scene
                .enabled_kinds()
                .as_list()
                .iter()
                .map(|k| k.label())
                .collect::<Vec<_>>()
        );
        self.needs_redraw = true;
    }

    /// The `D` binding: recolor the selection when one exists, otherwise
    /// advance the default shape fill. Shift+D clears the selected shape's
    /// override back to the default fill.
    fn recolor_binding(&mut self) {
        match self.scene.selected_shape() {
            Some(shape) => {
                let id = shape.id;
                if self.modifiers.shift {
                    self.scene.recolor(id, None);
                    return;
                }
                let current = shape
                    .color
                    .map(Color::to_hex)
                    .unwrap_or_else(|| self.settings.shape_color.clone());
                let next = presets::next_preset(presets::SHAPE_PRESETS, &current);
                self.scene.recolor(id, Some(Color::from_hex(next.color)));
            }
            None => self.settings.cycle_shape_color(),
        }
    }
}
