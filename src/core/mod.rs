pub mod classify;
pub mod prober;
pub mod session;
pub mod target;

pub use crate::domain::model::{Category, PlatformDefinition, ProbeReport, ProbeResult, ProbeStatus};
pub use crate::domain::ports::{ConfigProvider, HttpTransport, Storage};
pub use crate::utils::error::Result;
