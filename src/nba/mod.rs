pub mod endpoints;
pub mod error;
pub mod grab;
pub mod metrics;
pub mod params;
pub mod per;
pub mod recordset;
pub mod retry;
pub mod shooting;
pub mod storage;
