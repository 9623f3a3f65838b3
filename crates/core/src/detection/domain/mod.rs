pub mod detection_decoder;
