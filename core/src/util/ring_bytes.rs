use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Bounded byte buffer that keeps the most recent `cap` bytes written to it.
/// Shared between a pump task and the code collecting the captured output.
#[derive(Clone)]
pub struct RingBytes {
    inner: Arc<Mutex<VecDeque<u8>>>,
    cap: usize,
    dropped: Arc<Mutex<u64>>,
}

impl RingBytes {
    pub fn new(cap: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(cap.min(64 * 1024)))),
            cap,
            dropped: Arc::new(Mutex::new(0)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<u8>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, data: &[u8]) {
        let mut g = self.lock();
        let (data, skipped) = if data.len() > self.cap {
            (&data[data.len() - self.cap..], data.len() - self.cap)
        } else {
            (data, 0)
        };
        let overflow = g.len().saturating_add(data.len()).saturating_sub(self.cap);
        if overflow > 0 {
            g.drain(..overflow);
        }
        g.extend(data);
        drop(g);

        let lost = (skipped + overflow) as u64;
        if lost > 0 {
            let mut d = self.dropped.lock().unwrap_or_else(|p| p.into_inner());
            *d += lost;
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let g = self.lock();
        let mut vec = Vec::with_capacity(g.len());
        vec.extend(g.iter().copied());
        vec
    }

    /// Lossy UTF-8 view of the retained bytes.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.to_bytes()).into_owned()
    }

    /// Number of bytes discarded because the buffer was full.
    pub fn dropped_bytes(&self) -> u64 {
        *self.dropped.lock().unwrap_or_else(|p| p.into_inner())
    }
}
