pub mod classifier;
pub mod config;
pub mod consultation;
pub mod context;
pub mod error;
pub mod io;
pub mod knowledge;
pub mod paths;
pub mod recommend;
pub mod rules;
pub mod scorer;
pub mod transcript;
pub mod types;

pub use consultation::Consultation;
pub use error::{ConsultError, Result};
