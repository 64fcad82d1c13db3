pub mod registry;


pub use registry::{HealthEntry, HealthRegistry, HealthReport, HEALTH_OK};
