mod plate_authority;
mod text_recognizer;

pub use plate_authority::PlateAuthority;
pub use text_recognizer::TextRecognizer;
