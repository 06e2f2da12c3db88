//! Hardware drivers: peripheral init, tick timers, IR front end, button.

pub mod button;
pub mod hw_init;
pub mod hw_timer;
pub mod ir_rx;
pub mod ir_tx;
pub mod watchdog;
