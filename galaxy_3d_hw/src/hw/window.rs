/// Window seam used by the device layer
///
/// The device layer needs three things from the platform window: its current
/// client size, its native handle and the ability to minimize/restore it when
/// the application loses or regains focus in exclusive fullscreen.

use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use winit::window::Window;
use crate::error::{Error, Result};
use crate::hw::types::NativeWindow;

/// Window a presentation surface can be bound to
pub trait SurfaceWindow: HasWindowHandle {
    /// Current client-area size in pixels
    fn surface_size(&self) -> (u32, u32);

    /// Minimize (`true`) or restore (`false`) the window
    fn set_minimized(&self, minimized: bool);
}

impl SurfaceWindow for Window {
    fn surface_size(&self) -> (u32, u32) {
        let size = self.inner_size();
        (size.width, size.height)
    }

    fn set_minimized(&self, minimized: bool) {
        Window::set_minimized(self, minimized);
    }
}

/// Native window handle of `window`
///
/// Fails with [`Error::WindowHandleUnavailable`] carrying the platform error
/// when the platform layer cannot supply a Win32 handle.
pub fn native_window(window: &dyn SurfaceWindow) -> Result<NativeWindow> {
    let handle = window
        .window_handle()
        .map_err(|e| Error::WindowHandleUnavailable(e.to_string()))?;

    match handle.as_raw() {
        RawWindowHandle::Win32(win32) => Ok(NativeWindow(win32.hwnd.get())),
        other => Err(Error::WindowHandleUnavailable(format!(
            "unsupported window handle: {:?}",
            other
        ))),
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
