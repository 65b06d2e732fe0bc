mod xcap_capture_device;

pub use xcap_capture_device::XcapCaptureDevice;
