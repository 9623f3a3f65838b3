pub mod tensor_encoder;
