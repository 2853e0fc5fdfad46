use anyhow::Context;
use trackball::{CameraController, CameraUniform, Settings, Viewport};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

struct AppHandler {
    window: Option<Window>,
    controller: Option<CameraController>,
    settings: Settings,
    uniform: CameraUniform,
}

impl AppHandler {
    fn new(settings: Settings) -> Self {
        Self {
            window: None,
            controller: None,
            settings,
            uniform: CameraUniform::new(),
        }
    }
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Trackball")
            .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0));

        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                let size = window.inner_size();
                let controller = CameraController::new(
                    &self.settings.trackball,
                    Viewport::from_size(size.width.max(1), size.height.max(1)),
                );
                self.uniform.update(controller.camera());
                self.controller = Some(controller);
                self.window = Some(window);
            }
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }
            WindowEvent::KeyboardInput { event: key, .. }
                if key.state == ElementState::Pressed
                    && key.logical_key == Key::Named(NamedKey::Escape) =>
            {
                event_loop.exit();
                return;
            }
            _ => {}
        }

        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        if controller.handle_event(&event) {
            self.uniform.update(controller.camera());
            log::debug!("view matrix: {:?}", self.uniform.view);
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::load();
    log::info!(
        "trackball radius {}, zoom step {}",
        settings.trackball.radius,
        settings.trackball.zoom_step
    );

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut handler = AppHandler::new(settings);
    event_loop
        .run_app(&mut handler)
        .context("event loop terminated with an error")?;

    Ok(())
}
