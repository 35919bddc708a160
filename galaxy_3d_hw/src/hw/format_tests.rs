/// Tests for format selection

use std::rc::Rc;
use super::*;
use crate::hw::mock_native::{Journal, MockBehavior, MockDevice};

fn device_with(behavior: MockBehavior) -> (MockDevice, crate::hw::mock_native::SharedJournal) {
    let journal = Journal::new_shared();
    (MockDevice::new(journal.clone(), Rc::new(behavior)), journal)
}

fn depth_only(supported: &[Format]) -> MockBehavior {
    let mut behavior = MockBehavior::default();
    for format in DEPTH_STENCIL_FORMATS {
        behavior.format_support.insert(format, FormatSupport::TEXTURE2D);
    }
    for &format in supported {
        behavior = behavior.with_support(format, FormatSupport::TEXTURE2D | FormatSupport::DEPTH_STENCIL);
    }
    behavior
}

// ============================================================================
// select_format
// ============================================================================

#[test]
fn test_select_format_returns_first_supported() {
    let (device, _) = device_with(MockBehavior::default());
    let format = select_format(&device, FormatSupport::DEPTH_STENCIL, &DEPTH_STENCIL_FORMATS);
    assert_eq!(format, Format::D32_FLOAT_S8X24_UINT);
}

#[test]
fn test_select_format_skips_unsupported_earlier_candidates() {
    let (device, _) = device_with(depth_only(&[Format::D32_FLOAT, Format::D16_UNORM]));
    let format = select_format(&device, FormatSupport::DEPTH_STENCIL, &DEPTH_STENCIL_FORMATS);
    assert_eq!(format, Format::D32_FLOAT);
}

#[test]
fn test_select_format_is_order_sensitive() {
    let (device, _) = device_with(depth_only(&[Format::D24_UNORM_S8_UINT, Format::D16_UNORM]));

    let forward = select_format(
        &device,
        FormatSupport::DEPTH_STENCIL,
        &[Format::D24_UNORM_S8_UINT, Format::D16_UNORM],
    );
    let reversed = select_format(
        &device,
        FormatSupport::DEPTH_STENCIL,
        &[Format::D16_UNORM, Format::D24_UNORM_S8_UINT],
    );

    assert_eq!(forward, Format::D24_UNORM_S8_UINT);
    assert_eq!(reversed, Format::D16_UNORM);
}

#[test]
fn test_select_format_none_supported_returns_unknown() {
    let (device, _) = device_with(depth_only(&[]));
    let format = select_format(&device, FormatSupport::DEPTH_STENCIL, &DEPTH_STENCIL_FORMATS);
    assert_eq!(format, Format::Unknown);
}

#[test]
fn test_select_format_empty_candidates_returns_unknown() {
    let (device, journal) = device_with(MockBehavior::default());
    let format = select_format(&device, FormatSupport::DISPLAY, &[]);
    assert_eq!(format, Format::Unknown);
    assert_eq!(journal.borrow().calls("check_format_support"), 0);
}

#[test]
fn test_select_format_stops_at_first_match() {
    let (device, journal) = device_with(depth_only(&[Format::D24_UNORM_S8_UINT]));
    select_format(&device, FormatSupport::DEPTH_STENCIL, &DEPTH_STENCIL_FORMATS);

    assert_eq!(
        journal.borrow().call_details("check_format_support"),
        vec!["D32_FLOAT_S8X24_UINT".to_string(), "D24_UNORM_S8_UINT".to_string()]
    );
}

#[test]
fn test_select_format_queries_device_every_time() {
    let (device, journal) = device_with(MockBehavior::default());
    select_format(&device, FormatSupport::DISPLAY, &BACK_BUFFER_FORMATS);
    select_format(&device, FormatSupport::DISPLAY, &BACK_BUFFER_FORMATS);
    assert_eq!(journal.borrow().calls("check_format_support"), 2);
}

#[test]
fn test_select_back_buffer_format() {
    let (device, _) = device_with(MockBehavior::default());
    let format = select_format(&device, FormatSupport::DISPLAY, &BACK_BUFFER_FORMATS);
    assert_eq!(format, Format::R8G8B8A8_UNORM);
}

// ============================================================================
// check_format_support
// ============================================================================

#[test]
fn test_check_format_support_requires_every_bit() {
    let (device, _) = device_with(MockBehavior::default());
    assert!(check_format_support(&device, Format::R8G8B8A8_UNORM, FormatSupport::DISPLAY));
    assert!(check_format_support(
        &device,
        Format::R8G8B8A8_UNORM,
        FormatSupport::DISPLAY | FormatSupport::RENDER_TARGET,
    ));
    assert!(!check_format_support(
        &device,
        Format::R8G8B8A8_UNORM,
        FormatSupport::DISPLAY | FormatSupport::DEPTH_STENCIL,
    ));
}

#[test]
fn test_check_format_support_unknown_format() {
    let (device, _) = device_with(MockBehavior::default());
    assert!(!check_format_support(&device, Format::R16G16B16A16_FLOAT, FormatSupport::TEXTURE2D));
}

// ============================================================================
// Format helpers
// ============================================================================

#[test]
fn test_depth_preference_order() {
    assert_eq!(DEPTH_STENCIL_FORMATS[0], Format::D32_FLOAT_S8X24_UINT);
    assert_eq!(DEPTH_STENCIL_FORMATS[3], Format::D16_UNORM);
    assert!(DEPTH_STENCIL_FORMATS.iter().all(|format| format.is_depth()));
}

#[test]
fn test_stencil_formats() {
    assert!(Format::D24_UNORM_S8_UINT.has_stencil());
    assert!(!Format::D32_FLOAT.has_stencil());
    assert!(!Format::R8G8B8A8_UNORM.is_depth());
}

#[test]
fn test_to_texture_format() {
    assert_eq!(Format::R8G8B8A8_UNORM.to_texture_format(), TextureFormat::R8G8B8A8_UNORM);
    assert_eq!(Format::D32_FLOAT_S8X24_UINT.to_texture_format(), TextureFormat::D32_SFLOAT_S8_UINT);
    assert_eq!(Format::Unknown.to_texture_format(), TextureFormat::Unknown);
}
