/// Application activation hooks
///
/// While the surface is in exclusive fullscreen, losing focus must hand the
/// display back to the desktop: fullscreen is left and the window minimized.
/// Regaining focus restores the window and re-enters fullscreen according to
/// the current engine setting. Windowed surfaces are left alone.

use crate::hw::swap_chain::SwapChainManager;
use crate::hw::window::SurfaceWindow;
use crate::{engine_debug, engine_warn};

const SOURCE: &str = "galaxy3d::hw::activation";

/// Handle the application becoming active
///
/// Returns `true` if the surface was touched.
pub fn on_app_activate(
    swap_chain: &SwapChainManager,
    window: &dyn SurfaceWindow,
    fullscreen_setting: bool,
) -> bool {
    if !swap_chain.is_fullscreen() {
        return false;
    }

    engine_debug!(SOURCE, "Activate: restoring window, fullscreen {}", fullscreen_setting);
    window.set_minimized(false);
    if let Err(e) = swap_chain.swap_chain().set_fullscreen_state(fullscreen_setting) {
        engine_warn!(SOURCE, "Failed to re-enter fullscreen: {}", e);
    }
    true
}

/// Handle the application going to the background
///
/// Returns `true` if the surface was touched.
pub fn on_app_deactivate(swap_chain: &SwapChainManager, window: &dyn SurfaceWindow) -> bool {
    if !swap_chain.is_fullscreen() {
        return false;
    }

    engine_debug!(SOURCE, "Deactivate: leaving fullscreen, minimizing window");
    if let Err(e) = swap_chain.swap_chain().set_fullscreen_state(false) {
        engine_warn!(SOURCE, "Failed to leave fullscreen: {}", e);
    }
    window.set_minimized(true);
    true
}
