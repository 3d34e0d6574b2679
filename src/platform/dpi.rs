//! DPI scale discovery for the primary monitor

use tracing::{debug, warn};
use windows::Win32::Foundation::POINT;
use windows::Win32::Graphics::Gdi::{MONITOR_DEFAULTTOPRIMARY, MonitorFromPoint};
use windows::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};

/// DPI at which one logical unit is one device pixel
pub const BASE_DPI: u32 = 96;

/// Scale factor of the primary monitor (1.0 = 96 DPI, 1.25 = 120 DPI, etc.)
///
/// Falls back to 1.0 when the monitor or its DPI cannot be queried.
pub fn primary_scale_factor() -> f64 {
    unsafe {
        let hmonitor = MonitorFromPoint(POINT { x: 0, y: 0 }, MONITOR_DEFAULTTOPRIMARY);
        if hmonitor.0 == 0 {
            warn!("no primary monitor; assuming {} DPI", BASE_DPI);
            return 1.0;
        }

        let mut dpi_x: u32 = BASE_DPI;
        let mut dpi_y: u32 = BASE_DPI;
        if GetDpiForMonitor(hmonitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y).is_err() || dpi_x == 0 {
            warn!("failed to query monitor DPI; assuming {} DPI", BASE_DPI);
            return 1.0;
        }

        debug!(dpi_x, dpi_y, "primary monitor DPI");
        dpi_x as f64 / BASE_DPI as f64
    }
}
