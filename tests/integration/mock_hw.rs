//! Mock hardware adapters for integration tests.
//!
//! Records every IR transmission and observer publication so tests can
//! assert on the full history without touching real GPIO or RMT.

use std::collections::HashMap;

use fanbridge::app::ports::{
    IrTransmitPort, LineSensePort, StateSink, StorageError, StoragePort, TimerDisplayPort,
};
use fanbridge::fan::FanStateSnapshot;
use fanbridge::ir::{decode, IrFrame, PAYLOAD_LEN};
use fanbridge::panel::SenseLine;

// ── MockHardware ──────────────────────────────────────────────

/// Scriptable sense lines + recording IR sink.
///
/// Lines default to logic high: every status line is active-low, so a
/// fresh mock models a completely dark panel.
pub struct MockHardware {
    levels: [bool; SenseLine::COUNT],
    /// Total number of sense-line reads (scan suppression asserts on this).
    pub line_reads: usize,
    /// Every transmitted frame, in order.
    pub frames: Vec<IrFrame>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            levels: [true; SenseLine::COUNT],
            line_reads: 0,
            frames: Vec::new(),
        }
    }

    pub fn set_level(&mut self, line: SenseLine, level: bool) {
        self.levels[line.index()] = level;
    }

    /// Light the Normal-mode matrix cell (row 0, column 1).
    pub fn light_normal_mode(&mut self) {
        self.set_level(SenseLine::Col2, false);
    }

    /// Light exactly one timer cell: pull column 1 low and drive only
    /// the given row.
    pub fn light_only_timer_row(&mut self, row: usize) {
        self.set_level(SenseLine::Col1, false);
        for (r, line) in SenseLine::ROWS.iter().enumerate() {
            self.set_level(*line, r == row);
        }
    }

    /// Payload bytes of every transmitted frame (all frames decode —
    /// they came out of our own encoder).
    pub fn payloads(&self) -> Vec<[u8; PAYLOAD_LEN]> {
        self.frames
            .iter()
            .map(|f| {
                let bytes = decode(f).expect("transmitted frames must decode");
                let mut payload = [0u8; PAYLOAD_LEN];
                payload.copy_from_slice(&bytes[..PAYLOAD_LEN]);
                payload
            })
            .collect()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSensePort for MockHardware {
    fn read_line(&mut self, line: SenseLine) -> bool {
        self.line_reads += 1;
        self.levels[line.index()]
    }
}

impl IrTransmitPort for MockHardware {
    fn transmit(&mut self, frame: &IrFrame) {
        self.frames.push(frame.clone());
    }
}

// ── RecordingObserver ─────────────────────────────────────────

/// Captures state publications and timer labels.
pub struct RecordingObserver {
    pub snapshots: Vec<FanStateSnapshot>,
    pub labels: Vec<&'static str>,
}

#[allow(dead_code)]
impl RecordingObserver {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn last_snapshot(&self) -> Option<&FanStateSnapshot> {
        self.snapshots.last()
    }
}

impl Default for RecordingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSink for RecordingObserver {
    fn publish(&mut self, snapshot: &FanStateSnapshot) {
        self.snapshots.push(*snapshot);
    }
}

impl TimerDisplayPort for RecordingObserver {
    fn publish_label(&mut self, label: &'static str) {
        self.labels.push(label);
    }
}

// ── MockNvs ───────────────────────────────────────────────────

pub struct MockNvs {
    store: HashMap<String, Vec<u8>>,
}

impl MockNvs {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }
}

impl Default for MockNvs {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MockNvs {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let k = format!("{}::{}", namespace, key);
        match self.store.get(&k) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let k = format!("{}::{}", namespace, key);
        self.store.insert(k, data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{}::{}", namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{}::{}", namespace, key))
    }
}
