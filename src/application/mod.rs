pub mod inference;

pub use inference::{
    Inference, InferenceError, InferencePorts, InferenceService, InferenceSettings, MemeStage,
};
