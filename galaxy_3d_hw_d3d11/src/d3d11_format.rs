/// Conversions between device layer types and DXGI/D3D11 enumerations

use galaxy_3d_hw::galaxy3d::hw::{
    DsvDimension, FeatureLevel, Format, FormatSupport, SampleDesc, Scaling, SwapChainFlags,
    SwapEffect, Usage,
};
use windows::Win32::Graphics::Direct3D::{
    D3D_FEATURE_LEVEL, D3D_FEATURE_LEVEL_10_0, D3D_FEATURE_LEVEL_10_1, D3D_FEATURE_LEVEL_11_0,
    D3D_FEATURE_LEVEL_11_1,
};
use windows::Win32::Graphics::Direct3D11::{
    D3D11_DSV_DIMENSION, D3D11_DSV_DIMENSION_TEXTURE2D, D3D11_DSV_DIMENSION_TEXTURE2DMS,
    D3D11_USAGE, D3D11_USAGE_DEFAULT, D3D11_USAGE_DYNAMIC, D3D11_USAGE_IMMUTABLE,
    D3D11_USAGE_STAGING,
};
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::{
    DXGI_SCALING, DXGI_SCALING_ASPECT_RATIO_STRETCH, DXGI_SCALING_NONE, DXGI_SCALING_STRETCH,
    DXGI_SWAP_CHAIN_FLAG, DXGI_SWAP_EFFECT, DXGI_SWAP_EFFECT_DISCARD,
    DXGI_SWAP_EFFECT_FLIP_DISCARD, DXGI_SWAP_EFFECT_FLIP_SEQUENTIAL, DXGI_SWAP_EFFECT_SEQUENTIAL,
};

// ===== PIXEL FORMATS =====

pub(crate) fn format_to_dxgi(format: Format) -> DXGI_FORMAT {
    match format {
        Format::Unknown => DXGI_FORMAT_UNKNOWN,
        Format::R8G8B8A8_UNORM => DXGI_FORMAT_R8G8B8A8_UNORM,
        Format::R8G8B8A8_UNORM_SRGB => DXGI_FORMAT_R8G8B8A8_UNORM_SRGB,
        Format::B8G8R8A8_UNORM => DXGI_FORMAT_B8G8R8A8_UNORM,
        Format::R10G10B10A2_UNORM => DXGI_FORMAT_R10G10B10A2_UNORM,
        Format::R16G16B16A16_FLOAT => DXGI_FORMAT_R16G16B16A16_FLOAT,
        Format::D32_FLOAT_S8X24_UINT => DXGI_FORMAT_D32_FLOAT_S8X24_UINT,
        Format::D24_UNORM_S8_UINT => DXGI_FORMAT_D24_UNORM_S8_UINT,
        Format::D32_FLOAT => DXGI_FORMAT_D32_FLOAT,
        Format::D16_UNORM => DXGI_FORMAT_D16_UNORM,
    }
}

/// Formats the device layer does not know map to `Format::Unknown`
pub(crate) fn format_from_dxgi(format: DXGI_FORMAT) -> Format {
    match format {
        DXGI_FORMAT_R8G8B8A8_UNORM => Format::R8G8B8A8_UNORM,
        DXGI_FORMAT_R8G8B8A8_UNORM_SRGB => Format::R8G8B8A8_UNORM_SRGB,
        DXGI_FORMAT_B8G8R8A8_UNORM => Format::B8G8R8A8_UNORM,
        DXGI_FORMAT_R10G10B10A2_UNORM => Format::R10G10B10A2_UNORM,
        DXGI_FORMAT_R16G16B16A16_FLOAT => Format::R16G16B16A16_FLOAT,
        DXGI_FORMAT_D32_FLOAT_S8X24_UINT => Format::D32_FLOAT_S8X24_UINT,
        DXGI_FORMAT_D24_UNORM_S8_UINT => Format::D24_UNORM_S8_UINT,
        DXGI_FORMAT_D32_FLOAT => Format::D32_FLOAT,
        DXGI_FORMAT_D16_UNORM => Format::D16_UNORM,
        _ => Format::Unknown,
    }
}

/// `D3D11_FORMAT_SUPPORT` mask as returned by `CheckFormatSupport`
pub(crate) fn format_support_from_d3d11(mask: u32) -> FormatSupport {
    FormatSupport::from_bits_truncate(mask)
}

// ===== FEATURE LEVELS =====

pub(crate) fn feature_level_to_d3d(level: FeatureLevel) -> D3D_FEATURE_LEVEL {
    match level {
        FeatureLevel::Level10_0 => D3D_FEATURE_LEVEL_10_0,
        FeatureLevel::Level10_1 => D3D_FEATURE_LEVEL_10_1,
        FeatureLevel::Level11_0 => D3D_FEATURE_LEVEL_11_0,
        FeatureLevel::Level11_1 => D3D_FEATURE_LEVEL_11_1,
    }
}

/// `None` for levels outside the candidate range
pub(crate) fn feature_level_from_d3d(level: D3D_FEATURE_LEVEL) -> Option<FeatureLevel> {
    match level {
        D3D_FEATURE_LEVEL_10_0 => Some(FeatureLevel::Level10_0),
        D3D_FEATURE_LEVEL_10_1 => Some(FeatureLevel::Level10_1),
        D3D_FEATURE_LEVEL_11_0 => Some(FeatureLevel::Level11_0),
        D3D_FEATURE_LEVEL_11_1 => Some(FeatureLevel::Level11_1),
        _ => None,
    }
}

// ===== SWAP CHAIN =====

pub(crate) fn swap_effect_to_dxgi(effect: SwapEffect) -> DXGI_SWAP_EFFECT {
    match effect {
        SwapEffect::Discard => DXGI_SWAP_EFFECT_DISCARD,
        SwapEffect::Sequential => DXGI_SWAP_EFFECT_SEQUENTIAL,
        SwapEffect::FlipSequential => DXGI_SWAP_EFFECT_FLIP_SEQUENTIAL,
        SwapEffect::FlipDiscard => DXGI_SWAP_EFFECT_FLIP_DISCARD,
    }
}

pub(crate) fn swap_effect_from_dxgi(effect: DXGI_SWAP_EFFECT) -> SwapEffect {
    match effect {
        DXGI_SWAP_EFFECT_SEQUENTIAL => SwapEffect::Sequential,
        DXGI_SWAP_EFFECT_FLIP_SEQUENTIAL => SwapEffect::FlipSequential,
        DXGI_SWAP_EFFECT_FLIP_DISCARD => SwapEffect::FlipDiscard,
        _ => SwapEffect::Discard,
    }
}

pub(crate) fn scaling_to_dxgi(scaling: Scaling) -> DXGI_SCALING {
    match scaling {
        Scaling::Stretch => DXGI_SCALING_STRETCH,
        Scaling::None => DXGI_SCALING_NONE,
        Scaling::AspectRatioStretch => DXGI_SCALING_ASPECT_RATIO_STRETCH,
    }
}

pub(crate) fn swap_chain_flags_to_dxgi(flags: SwapChainFlags) -> DXGI_SWAP_CHAIN_FLAG {
    DXGI_SWAP_CHAIN_FLAG(flags.bits() as i32)
}

pub(crate) fn sample_to_dxgi(sample: SampleDesc) -> DXGI_SAMPLE_DESC {
    DXGI_SAMPLE_DESC {
        Count: sample.count,
        Quality: sample.quality,
    }
}

pub(crate) fn sample_from_dxgi(sample: DXGI_SAMPLE_DESC) -> SampleDesc {
    SampleDesc {
        count: sample.Count,
        quality: sample.Quality,
    }
}

// ===== TEXTURES AND VIEWS =====

pub(crate) fn usage_to_d3d11(usage: Usage) -> D3D11_USAGE {
    match usage {
        Usage::Default => D3D11_USAGE_DEFAULT,
        Usage::Immutable => D3D11_USAGE_IMMUTABLE,
        Usage::Dynamic => D3D11_USAGE_DYNAMIC,
        Usage::Staging => D3D11_USAGE_STAGING,
    }
}

pub(crate) fn usage_from_d3d11(usage: D3D11_USAGE) -> Usage {
    match usage {
        D3D11_USAGE_IMMUTABLE => Usage::Immutable,
        D3D11_USAGE_DYNAMIC => Usage::Dynamic,
        D3D11_USAGE_STAGING => Usage::Staging,
        _ => Usage::Default,
    }
}

pub(crate) fn dsv_dimension_to_d3d11(dimension: DsvDimension) -> D3D11_DSV_DIMENSION {
    match dimension {
        DsvDimension::Texture2D => D3D11_DSV_DIMENSION_TEXTURE2D,
        DsvDimension::Texture2DMs => D3D11_DSV_DIMENSION_TEXTURE2DMS,
    }
}

pub(crate) fn dsv_dimension_from_d3d11(dimension: D3D11_DSV_DIMENSION) -> DsvDimension {
    if dimension == D3D11_DSV_DIMENSION_TEXTURE2DMS {
        DsvDimension::Texture2DMs
    } else {
        DsvDimension::Texture2D
    }
}

#[cfg(test)]
#[path = "d3d11_format_tests.rs"]
mod tests;
