pub mod error;
pub mod sample;
pub mod traits;
pub mod types;

pub use error::*;
pub use sample::SampleProvider;
pub use traits::*;
pub use types::*;
