use super::*;
use tokio::sync::mpsc::UnboundedSender;

/// Destination for presentation updates.
/// Implementations must return promptly: actors report from inside
/// their loops and never wait on a renderer.
pub trait Sink: Send + Sync {
    fn report(&self, event: Event);
}

/// Forwards every event to a channel consumer (a renderer, a test).
/// Sending on an unbounded channel never blocks; a dropped receiver
/// silently discards further events.
impl Sink for UnboundedSender<Event> {
    fn report(&self, event: Event) {
        if let Err(e) = self.send(event) {
            log::trace!("[sink] receiver gone, dropping {}", e.0);
        }
    }
}

/// Writes events to the log. Ticks go to trace so a running
/// game does not drown the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct Log;

impl Sink for Log {
    fn report(&self, event: Event) {
        match event {
            Event::Countdown { .. } | Event::Freeze { .. } => log::trace!("{}", event),
            Event::Score { .. } => log::info!("{}", event),
            Event::GameOver { .. } => log::info!("{}", event),
            _ => log::debug!("{}", event),
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Sink for Silent {
    fn report(&self, _: Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;
    #[test]
    fn channel_sink_forwards() {
        let (tx, mut rx) = unbounded_channel();
        tx.report(Event::Removed { slot: 2 });
        assert_eq!(rx.try_recv().ok(), Some(Event::Removed { slot: 2 }));
    }
    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (tx, rx) = unbounded_channel();
        drop(rx);
        tx.report(Event::Removed { slot: 2 });
    }
}
