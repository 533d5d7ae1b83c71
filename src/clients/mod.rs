pub mod recognition_client;

pub use recognition_client::{HttpRecognitionClient, RecognitionService};
