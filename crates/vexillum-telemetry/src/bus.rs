//! Event bus: buffered event dispatch with pluggable sinks.
//!
//! Events go through a `std::sync::mpsc` channel and reach the sinks on
//! [`EventBus::flush`].

use std::sync::mpsc;

use crate::events::SimulationEvent;
use crate::sinks::EventSink;

/// Buffered event bus for simulation telemetry.
pub struct EventBus {
    sender: mpsc::Sender<SimulationEvent>,
    receiver: mpsc::Receiver<SimulationEvent>,
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    /// Creates a new event bus with no sinks.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            sinks: Vec::new(),
        }
    }

    /// Builder form of [`add_sink`](Self::add_sink).
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.add_sink(sink);
        self
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Queue an event for the next [`flush`](Self::flush).
    pub fn emit(&self, event: SimulationEvent) {
        // The receiver lives as long as `self`.
        let _ = self.sender.send(event);
    }

    /// Deliver every queued event to every sink, in emission order.
    /// Returns the number of events delivered.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(event) = self.receiver.try_recv() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
            delivered += 1;
        }
        delivered
    }

    /// Flush, then let every sink finalize.
    pub fn finish(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
