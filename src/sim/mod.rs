pub mod driver;
pub mod process;
pub mod request;

pub use driver::{ProcessInstance, Race};
pub use process::{ProcessDescriptor, validate_descriptors};
pub use request::SimulationRequest;
