// Wayland backend using an xdg-toplevel window
use anyhow::{Context, Result};
use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState},
    delegate_compositor, delegate_keyboard, delegate_output, delegate_pointer,
    delegate_registry, delegate_seat, delegate_shm, delegate_xdg_shell, delegate_xdg_window,
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    seat::{
        Capability, SeatHandler, SeatState,
        keyboard::{KeyEvent, KeyboardHandler, Keysym, Modifiers, RawModifiers},
        pointer::{PointerEvent, PointerEventKind, PointerHandler},
    },
    shell::{
        WaylandSurface,
        xdg::{
            XdgShell,
            window::{Window, WindowConfigure, WindowDecorations, WindowHandler},
        },
    },
    shm::{Shm, ShmHandler, slot::SlotPool},
};
use wayland_client::{
    Connection, Dispatch, QueueHandle,
    globals::registry_queue_init,
    protocol::{wl_buffer, wl_keyboard, wl_output, wl_pointer, wl_seat, wl_shm, wl_surface},
};

use crate::config::Config;
use crate::draw::render::ColorCache;
use crate::export;
use crate::input::{InputState, Key, MouseButton};

/// Number of shm buffers backing the window surface.
const BUFFER_COUNT: usize = 2;

/// Wayland backend state
pub struct WaylandBackend {
    config: Config,
}

/// Internal Wayland state
struct WaylandState {
    // Wayland protocol objects
    registry_state: RegistryState,
    compositor_state: CompositorState,
    xdg_shell: XdgShell,
    shm: Shm,
    output_state: OutputState,
    seat_state: SeatState,

    // Surface and buffer
    window: Option<Window>,
    pool: Option<SlotPool>,
    width: u32,
    height: u32,
    // Last size requested from settings; distinct from the surface size so a
    // compositor-imposed size does not get re-fought every loop iteration.
    requested_width: u32,
    requested_height: u32,
    configured: bool,

    // Frame synchronization
    frame_callback_pending: bool,

    // Configuration
    config: Config,

    // Input and render state
    input_state: InputState,
    color_cache: ColorCache,
    current_mouse_x: f64,
    current_mouse_y: f64,
}

impl WaylandBackend {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&mut self) -> Result<()> {
        info!("Starting Wayland backend");

        // Connect to Wayland compositor
        let conn =
            Connection::connect_to_env().context("Failed to connect to Wayland compositor")?;
        debug!("Connected to Wayland display");

        // Initialize registry and event queue
        let (globals, mut event_queue) =
            registry_queue_init(&conn).context("Failed to initialize Wayland registry")?;
        let qh = event_queue.handle();

        // Bind global interfaces
        let compositor_state =
            CompositorState::bind(&globals, &qh).context("wl_compositor not available")?;
        debug!("Bound compositor");

        let xdg_shell = XdgShell::bind(&globals, &qh).context("xdg_wm_base not available")?;
        debug!("Bound xdg shell");

        let shm = Shm::bind(&globals, &qh).context("wl_shm not available")?;
        debug!("Bound shared memory");

        let output_state = OutputState::new(&globals, &qh);
        let seat_state = SeatState::new(&globals, &qh);
        let registry_state = RegistryState::new(&globals);

        // Initialize input state with config defaults
        let input_state = InputState::from_config(&self.config);
        let color_cache = ColorCache::new(&input_state.settings);
        info!(
            "Canvas {}x{}, default shape {}x{}",
            input_state.settings.canvas_width,
            input_state.settings.canvas_height,
            input_state.settings.shape_width,
            input_state.settings.shape_height
        );

        let config = std::mem::take(&mut self.config);

        // Create application state
        let mut state = WaylandState {
            registry_state,
            compositor_state,
            xdg_shell,
            shm,
            output_state,
            seat_state,
            window: None,
            pool: None,
            width: input_state.settings.canvas_width,
            height: input_state.settings.canvas_height,
            requested_width: input_state.settings.canvas_width,
            requested_height: input_state.settings.canvas_height,
            configured: false,
            frame_callback_pending: false,
            config,
            input_state,
            color_cache,
            current_mouse_x: 0.0,
            current_mouse_y: 0.0,
        };

        // Create the canvas window
        info!("Creating xdg toplevel window");
        let wl_surface = state.compositor_state.create_surface(&qh);
        let window =
            state
                .xdg_shell
                .create_window(wl_surface, WindowDecorations::RequestServer, &qh);
        window.set_title("Waysketch");
        window.set_app_id("dev.waysketch.Waysketch");
        // The canvas has a fixed pixel size; pin the window to it.
        window.set_min_size(Some((state.width, state.height)));
        window.set_max_size(Some((state.width, state.height)));
        window.commit();
        state.window = Some(window);
        info!("Window created");

        // Track consecutive render failures for error recovery
        let mut consecutive_render_failures = 0u32;
        const MAX_RENDER_FAILURES: u32 = 10;

        // Main event loop
        let mut loop_error: Option<anyhow::Error> = None;
        loop {
            if state.input_state.should_exit {
                info!("Exit requested, breaking event loop");
                break;
            }

            match event_queue.blocking_dispatch(&mut state) {
                Ok(_) => {
                    if state.input_state.should_exit {
                        info!("Exit requested after dispatch, breaking event loop");
                        break;
                    }
                }
                Err(e) => {
                    warn!("Event queue error: {}", e);
                    loop_error = Some(anyhow::anyhow!("Wayland event queue error: {}", e));
                    break;
                }
            }

            // Handle a pending export request with up-to-date colors.
            if state.input_state.take_pending_export() {
                state.color_cache.refresh(&state.input_state.settings);
                match export::export_frame(
                    &state.input_state,
                    state.color_cache.colors(),
                    &state.config.export,
                ) {
                    Ok(path) => info!("Exported image to {}", path.display()),
                    Err(e) => warn!("Image export failed: {}", e),
                }
            }

            // A canvas-size change (Tab binding) resizes the surface before
            // the next draw.
            state.apply_canvas_resize();

            // Publish coalesced scene mutations at most once per interval.
            if state.input_state.scene.maybe_publish() {
                state.input_state.needs_redraw = true;
            }

            // Render if configured and needs redraw, but only if no frame
            // callback is pending. This throttles rendering to the display
            // refresh rate.
            let can_render = state.configured
                && state.input_state.needs_redraw
                && !state.frame_callback_pending;

            if can_render {
                match state.render(&qh) {
                    Ok(()) => {
                        consecutive_render_failures = 0;
                        state.input_state.needs_redraw = false;
                        state.frame_callback_pending = true;
                    }
                    Err(e) => {
                        consecutive_render_failures += 1;
                        warn!(
                            "Rendering error (attempt {}/{}): {}",
                            consecutive_render_failures, MAX_RENDER_FAILURES, e
                        );

                        if consecutive_render_failures >= MAX_RENDER_FAILURES {
                            return Err(anyhow::anyhow!(
                                "Too many consecutive render failures ({}), exiting: {}",
                                consecutive_render_failures,
                                e
                            ));
                        }

                        // Clear redraw flag to avoid an infinite error loop;
                        // the scene itself stays intact and editable.
                        state.input_state.needs_redraw = false;
                    }
                }
            }
        }

        info!("Wayland backend exiting");

        match loop_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl WaylandState {
    /// Adopts a changed canvas size from settings: re-pins the window size
    /// and drops the buffer pool so the next render reallocates it.
    fn apply_canvas_resize(&mut self) {
        let target_w = self.input_state.settings.canvas_width;
        let target_h = self.input_state.settings.canvas_height;
        if self.requested_width == target_w && self.requested_height == target_h {
            return;
        }

        info!(
            "Canvas resized {}x{} -> {}x{}",
            self.requested_width, self.requested_height, target_w, target_h
        );
        self.requested_width = target_w;
        self.requested_height = target_h;
        self.width = target_w;
        self.height = target_h;
        self.pool = None;

        if let Some(window) = &self.window {
            window.set_min_size(Some((target_w, target_h)));
            window.set_max_size(Some((target_w, target_h)));
            window.commit();
        }
        self.input_state.needs_redraw = true;
    }

    fn render(&mut self, qh: &QueueHandle<Self>) -> Result<()> {
        let window = self.window.as_ref().context("Window not created")?;
        let wl_surface = window.wl_surface();

        // Refresh the parsed color cache only when a color string changed.
        self.color_cache.refresh(&self.input_state.settings);

        // Hover feedback is frame-derived: shapes may appear or vanish under
        // a stationary cursor. Skipped while dragging.
        self.input_state
            .update_hover(self.current_mouse_x, self.current_mouse_y);

        // Create pool if needed
        if self.pool.is_none() {
            let buffer_size = (self.width * self.height * 4) as usize;
            let pool_size = buffer_size * BUFFER_COUNT;
            info!(
                "Creating new SlotPool ({}x{}, {} bytes, {} buffers)",
                self.width, self.height, pool_size, BUFFER_COUNT
            );
            let pool = SlotPool::new(pool_size, &self.shm).context("Failed to create slot pool")?;
            self.pool = Some(pool);
        }

        let pool = self.pool.as_mut().context("Buffer pool not initialized")?;

        let (buffer, canvas) = pool
            .create_buffer(
                self.width as i32,
                self.height as i32,
                (self.width * 4) as i32,
                wl_shm::Format::Argb8888,
            )
            .context("Failed to create buffer")?;

        // SAFETY: This creates a Cairo surface over the shm buffer slice.
        // Invariants:
        // 1. `canvas` is a valid mutable slice of exactly width * height * 4 bytes
        // 2. The ARgb32 format matches the Argb8888 buffer layout (4 bytes/pixel)
        // 3. The stride (width * 4) matches the buffer's row length
        // 4. `cairo_surface` and `ctx` are dropped before the buffer is
        //    attached and committed, so Cairo never touches the memory after
        //    ownership transfers to the compositor
        // 5. No other references to this memory exist during Cairo's usage
        let cairo_surface = unsafe {
            cairo::ImageSurface::create_for_data_unsafe(
                canvas.as_mut_ptr(),
                cairo::Format::ARgb32,
                self.width as i32,
                self.height as i32,
                (self.width * 4) as i32,
            )
            .context("Failed to create Cairo surface")?
        };

        let ctx = cairo::Context::new(&cairo_surface).context("Failed to create Cairo context")?;

        // The four scene layers: background, ground, silhouette, shapes.
        crate::draw::render::render_scene(&ctx, &self.input_state, self.color_cache.colors());

        // Collaborator chrome above the scene.
        if self.config.ui.show_status_bar {
            crate::ui::render_status_bar(
                &ctx,
                &self.input_state,
                self.config.ui.status_bar_position,
                &self.config.ui.status_bar_style,
                self.width,
                self.height,
            );
        }

        if self.input_state.show_help {
            crate::ui::render_help_overlay(
                &ctx,
                &self.config.ui.help_overlay_style,
                self.width,
                self.height,
            );
        }

        cairo_surface.flush();
        drop(ctx);
        drop(cairo_surface);

        // Attach buffer and commit
        wl_surface.attach(Some(buffer.wl_buffer()), 0, 0);
        wl_surface.damage_buffer(0, 0, self.width as i32, self.height as i32);
        wl_surface.frame(qh, wl_surface.clone());
        wl_surface.commit();

        Ok(())
    }
}

// Implement required trait delegates
delegate_compositor!(WaylandState);
delegate_output!(WaylandState);
delegate_shm!(WaylandState);
delegate_xdg_shell!(WaylandState);
delegate_xdg_window!(WaylandState);
delegate_seat!(WaylandState);
delegate_keyboard!(WaylandState);
delegate_pointer!(WaylandState);
delegate_registry!(WaylandState);

// Implement CompositorHandler
impl CompositorHandler for WaylandState {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_factor: i32,
    ) {
        debug!("Scale factor changed");
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {
        debug!("Transform changed");
    }

    fn frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
        // Frame callback - compositor is ready for the next frame
        self.frame_callback_pending = false;
    }

    fn surface_enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
        debug!("Surface entered output");
    }

    fn surface_leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
        debug!("Surface left output");
    }
}

// Implement OutputHandler
impl OutputHandler for WaylandState {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
        debug!("New output detected");
    }

    fn update_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
        debug!("Output updated");
    }

    fn output_destroyed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
        debug!("Output destroyed");
    }
}

// Implement ShmHandler
impl ShmHandler for WaylandState {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm
    }
}

// Implement WindowHandler
impl WindowHandler for WaylandState {
    fn request_close(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _window: &Window) {
        info!("Window close requested by compositor");
        self.input_state.should_exit = true;
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _window: &Window,
        configure: WindowConfigure,
        _serial: u32,
    ) {
        // The compositor may leave the size up to us; fall back to the
        // requested canvas dimensions.
        let width = configure
            .new_size
            .0
            .map(|w| w.get())
            .unwrap_or(self.requested_width);
        let height = configure
            .new_size
            .1
            .map(|h| h.get())
            .unwrap_or(self.requested_height);

        info!("Window configured: {}x{}", width, height);

        let size_changed = self.width != width || self.height != height;
        self.width = width;
        self.height = height;

        // Recreate pool if dimensions changed
        if size_changed && self.pool.is_some() {
            info!("Surface size changed - recreating SlotPool");
            self.pool = None;
        }

        // Mark as configured and request first draw
        self.configured = true;
        self.input_state.needs_redraw = true;
    }
}

// Implement SeatHandler
impl SeatHandler for WaylandState {
    fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    fn new_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _seat: wl_seat::WlSeat) {
        debug!("New seat available");
    }

    fn new_capability(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        if capability == Capability::Keyboard {
            info!("Keyboard capability available");
            if self.seat_state.get_keyboard(qh, &seat, None).is_ok() {
                debug!("Keyboard initialized");
            }
        }

        if capability == Capability::Pointer {
            info!("Pointer capability available");
            if self.seat_state.get_pointer(qh, &seat).is_ok() {
                debug!("Pointer initialized");
            }
        }
    }

    fn remove_capability(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        if capability == Capability::Keyboard {
            info!("Keyboard capability removed");
        }
        if capability == Capability::Pointer {
            info!("Pointer capability removed");
        }
    }

    fn remove_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _seat: wl_seat::WlSeat) {
        debug!("Seat removed");
    }
}

// Implement KeyboardHandler
impl KeyboardHandler for WaylandState {
    fn enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _surface: &wl_surface::WlSurface,
        _serial: u32,
        _raw: &[u32],
        _keysyms: &[Keysym],
    ) {
        debug!("Keyboard focus entered");
    }

    fn leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _surface: &wl_surface::WlSurface,
        _serial: u32,
    ) {
        debug!("Keyboard focus left");
    }

    fn press_key(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _serial: u32,
        event: KeyEvent,
    ) {
        let key = keysym_to_key(event.keysym);
        debug!("Key pressed: {:?}", key);
        self.input_state.on_key_press(key);
    }

    fn release_key(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _serial: u32,
        event: KeyEvent,
    ) {
        let key = keysym_to_key(event.keysym);
        debug!("Key released: {:?}", key);
        self.input_state.on_key_release(key);
    }

    fn update_modifiers(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _serial: u32,
        modifiers: Modifiers,
        _layout: RawModifiers,
        _group: u32,
    ) {
        // Authoritative modifier state from the compositor.
        self.input_state.modifiers.ctrl = modifiers.ctrl;
        self.input_state.modifiers.shift = modifiers.shift;
    }

    fn repeat_key(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _keyboard: &wl_keyboard::WlKeyboard,
        _serial: u32,
        event: KeyEvent,
    ) {
        // Key repeat behaves like a regular press (padding and size keys
        // benefit from autorepeat).
        let key = keysym_to_key(event.keysym);
        self.input_state.on_key_press(key);
    }
}

// Implement PointerHandler
impl PointerHandler for WaylandState {
    fn pointer_frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _pointer: &wl_pointer::WlPointer,
        events: &[PointerEvent],
    ) {
        use smithay_client_toolkit::seat::pointer::{BTN_LEFT, BTN_MIDDLE, BTN_RIGHT};

        for event in events {
            match event.kind {
                PointerEventKind::Enter { .. } => {
                    self.current_mouse_x = event.position.0;
                    self.current_mouse_y = event.position.1;
                    self.input_state
                        .update_hover(self.current_mouse_x, self.current_mouse_y);
                }
                PointerEventKind::Leave { .. } => {
                    // Hover feedback ends with the pointer.
                    self.input_state.update_hover(-1.0, -1.0);
                }
                PointerEventKind::Motion { .. } => {
                    self.current_mouse_x = event.position.0;
                    self.current_mouse_y = event.position.1;
                    self.input_state
                        .on_mouse_motion(self.current_mouse_x, self.current_mouse_y);
                }
                PointerEventKind::Press { button, .. } => {
                    let mb = match button {
                        BTN_LEFT => MouseButton::Left,
                        BTN_MIDDLE => MouseButton::Middle,
                        BTN_RIGHT => MouseButton::Right,
                        _ => continue,
                    };

                    self.input_state
                        .on_mouse_press(mb, event.position.0, event.position.1);
                }
                PointerEventKind::Release { button, .. } => {
                    let mb = match button {
                        BTN_LEFT => MouseButton::Left,
                        BTN_MIDDLE => MouseButton::Middle,
                        BTN_RIGHT => MouseButton::Right,
                        _ => continue,
                    };

                    self.input_state
                        .on_mouse_release(mb, event.position.0, event.position.1);
                }
                PointerEventKind::Axis { vertical, .. } => {
                    // Use discrete steps if available, otherwise fall back to
                    // absolute motion with a threshold for tiny movements.
                    let scroll_direction = if vertical.discrete != 0 {
                        vertical.discrete
                    } else if vertical.absolute.abs() > 0.1 {
                        if vertical.absolute > 0.0 { 1 } else { -1 }
                    } else {
                        0
                    };

                    // Scroll down grows the default size, up shrinks it.
                    self.input_state.on_scroll(scroll_direction);
                }
            }
        }
    }
}

// Implement ProvidesRegistryState
impl ProvidesRegistryState for WaylandState {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    registry_handlers![OutputState, SeatState];
}

// Implement Dispatch for wl_buffer (required for buffer lifecycle)
impl Dispatch<wl_buffer::WlBuffer, ()> for WaylandState {
    fn event(
        _state: &mut Self,
        _proxy: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            debug!("Buffer released by compositor");
        }
    }
}

// Convert Wayland keysym to our Key enum
fn keysym_to_key(keysym: Keysym) -> Key {
    match keysym {
        Keysym::Escape => Key::Escape,
        Keysym::Tab => Key::Tab,
        Keysym::Shift_L | Keysym::Shift_R => Key::Shift,
        Keysym::Control_L | Keysym::Control_R => Key::Ctrl,
        Keysym::plus | Keysym::equal => Key::Plus,
        Keysym::minus | Keysym::underscore => Key::Minus,
        Keysym::F10 => Key::F10,
        _ => {
            // Map printable ASCII directly; this covers the digit toggles,
            // palette keys, and bracket bindings.
            let raw = keysym.raw();
            if (0x20..=0x7E).contains(&raw) {
                Key::Char(raw as u8 as char)
            } else {
                Key::Unknown
            }
        }
    }
}
