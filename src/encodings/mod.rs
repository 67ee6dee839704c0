//! Objects used to encode labelling problems into integer linear programs.

mod labelling_encoder;
pub use labelling_encoder::ForcedLabel;
pub use labelling_encoder::LabellingEncoder;
pub use labelling_encoder::LabellingEncoding;
