//! Delivers the message to any writer; stdout for dry runs.

use crate::domain::error::SignalError;
use crate::ports::notify_port::NotifyPort;
use std::io::Write;
use std::sync::Mutex;

pub struct WriterNotifier<W: Write> {
    out: Mutex<W>,
}

pub type StdoutNotifier = WriterNotifier<std::io::Stdout>;

impl StdoutNotifier {
    pub fn stdout() -> Self {
        WriterNotifier::new(std::io::stdout())
    }
}

impl<W: Write> WriterNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> NotifyPort for WriterNotifier<W> {
    fn deliver(&self, text: &str) -> Result<(), SignalError> {
        let mut out = self.out.lock().map_err(|_| SignalError::Delivery {
            reason: "output writer poisoned".to_string(),
        })?;
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }
}
