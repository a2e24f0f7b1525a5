use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::assets::SceneAssets;
use crate::config::LanyardConfig;
use crate::error::RunError;
use crate::frame::FrameDriver;
use crate::gpu::GpuState;
use crate::input::Pointer;
use crate::time::FrameClock;

/// winit application: one window, one renderer, one scene.
pub struct App {
    config: LanyardConfig,
    assets: SceneAssets,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    driver: Option<FrameDriver>,
    pointer: Pointer,
    clock: FrameClock,
    error: Option<RunError>,
}

impl App {
    pub fn new(config: LanyardConfig, assets: SceneAssets) -> Self {
        let clock = FrameClock::new().with_max_delta(config.rope.max_frame_delta);
        Self {
            config,
            assets,
            window: None,
            gpu_state: None,
            driver: None,
            pointer: Pointer::new(),
            clock,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<RunError> {
        self.error.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), &self.config, &self.assets))?;

        self.driver = Some(FrameDriver::from_assets(
            self.config.clone(),
            &self.assets,
            (size.width, size.height),
        ));
        self.gpu_state = Some(gpu_state);
        self.window = Some(window);
        log::info!("Window ready at {}x{}", size.width, size.height);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu_state), Some(driver)) = (&mut self.gpu_state, &mut self.driver) else {
            return;
        };

        let dt = self.clock.tick();
        match driver.tick(dt, gpu_state) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(pointer_event) = self.pointer.handle_event(&event) {
            if let Some(driver) = &mut self.driver {
                driver.handle_pointer(pointer_event);
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let Some(driver) = &mut self.driver {
                    driver.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
