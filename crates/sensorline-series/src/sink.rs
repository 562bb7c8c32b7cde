use crate::error::SinkError;
use crate::series::Snapshot;

/// Consumer of series snapshots: a renderer or an exporter.
///
/// `accept` is called once per accepted sample with the window as it stands
/// after the append, so `snapshot.latest()` is the new sample. `close` is
/// called once when the driving loop stops.
pub trait Sink {
    fn accept(&mut self, snapshot: &Snapshot) -> Result<(), SinkError>;

    fn close(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn accept(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        (**self).accept(snapshot)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        (**self).close()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn accept(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        (**self).accept(snapshot)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        (**self).close()
    }
}

/// Fans every call out to two sinks in order.
impl<A: Sink, B: Sink> Sink for (A, B) {
    fn accept(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        self.0.accept(snapshot)?;
        self.1.accept(snapshot)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let first = self.0.close();
        let second = self.1.close();
        first.and(second)
    }
}

/// Keeps every snapshot it receives.
#[derive(Debug, Default)]
pub struct CollectingSink {
    snapshots: Vec<Snapshot>,
    closed: bool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Sink for CollectingSink {
    fn accept(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        self.snapshots.push(snapshot.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use crate::series::BoundedSeries;

    #[test]
    fn collecting_sink_records_snapshots() {
        let mut series = BoundedSeries::default();
        let mut sink = CollectingSink::new();

        series.append(Sample::new(0.0, 1.0, 2.0));
        sink.accept(&series.snapshot()).unwrap();
        series.append(Sample::new(1.0, 3.0, 4.0));
        sink.accept(&series.snapshot()).unwrap();

        assert_eq!(sink.snapshots().len(), 2);
        assert_eq!(sink.snapshots()[1].len(), 2);
    }

    #[test]
    fn accept_after_close_fails() {
        let mut sink = CollectingSink::new();
        sink.close().unwrap();
        assert!(sink.is_closed());
        let err = sink.accept(&Snapshot::default()).unwrap_err();
        assert!(matches!(err, SinkError::Closed));
    }

    #[test]
    fn pair_fans_out_and_closes_both() {
        let mut pair = (CollectingSink::new(), CollectingSink::new());
        pair.accept(&Snapshot::default()).unwrap();
        pair.close().unwrap();
        assert_eq!(pair.0.snapshots().len(), 1);
        assert_eq!(pair.1.snapshots().len(), 1);
        assert!(pair.0.is_closed() && pair.1.is_closed());
    }

    #[test]
    fn boxed_sink_forwards() {
        let mut boxed: Box<dyn Sink> = Box::new(CollectingSink::new());
        boxed.accept(&Snapshot::default()).unwrap();
        boxed.close().unwrap();
        assert!(matches!(
            boxed.accept(&Snapshot::default()),
            Err(SinkError::Closed)
        ));
    }
}
