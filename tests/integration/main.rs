//! Host-side integration test harness.
//!
//! One binary, several focused modules, sharing the mock adapters in
//! [`mock_hw`].

mod fan_service_tests;
mod mock_hw;
