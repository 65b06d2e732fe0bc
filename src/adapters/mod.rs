mod http_plate_authority_client;
mod shared_authentication_context;
mod still_image_capture_device;
mod tesseract_text_recognizer;

pub use http_plate_authority_client::HttpPlateAuthorityClient;
pub use shared_authentication_context::SharedAuthenticationContext;
pub use still_image_capture_device::StillImageCaptureDevice;
pub use tesseract_text_recognizer::TesseractTextRecognizer;
