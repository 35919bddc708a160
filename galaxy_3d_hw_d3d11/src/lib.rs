/*!
# Galaxy 3D Engine - Direct3D 11 Hardware Backend

Direct3D 11 implementation of the galaxy_3d_hw native seam.

This crate wraps DXGI and Direct3D 11 through the `windows` crate: adapter
enumeration, device creation, both swap chain paths, back buffers, depth
buffers and their views. On other platforms it compiles to an empty crate.

Pass [`D3d11Api`] to `Hw::new` to drive the device layer with this backend.
*/

#[cfg(windows)]
mod d3d11;
#[cfg(windows)]
mod d3d11_device;
#[cfg(windows)]
mod d3d11_format;
#[cfg(windows)]
mod d3d11_swap_chain;
#[cfg(windows)]
mod d3d11_texture;

#[cfg(windows)]
pub use d3d11::{D3d11Adapter, D3d11Api, D3d11ExtendedFactory, D3d11Factory};
#[cfg(windows)]
pub use d3d11_device::{D3d11Context, D3d11Device};
#[cfg(windows)]
pub use d3d11_swap_chain::{D3d11FrameLatencyWaiter, D3d11SwapChain};
#[cfg(windows)]
pub use d3d11_texture::{D3d11DepthStencilView, D3d11RenderTargetView, D3d11Texture2D};
