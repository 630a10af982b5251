pub mod estimators;
pub mod etl;
pub mod forecast;
pub mod linalg;
pub mod loader;
pub mod location;
pub mod pipeline;
pub mod predictor;
pub mod registry;
pub mod summary;
pub mod trainer;

pub use crate::domain::model::{Dataset, TrainedModels};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
