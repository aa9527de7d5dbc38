use std::io::{ErrorKind, Write};

use crate::builder::FrameBuilder;
use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::frame::Frame;

/// Builds frames and writes them to any `Write` stream.
///
/// Owns a single transmit buffer that every outbound frame is built into, so
/// sending never allocates.
pub struct FrameWriter<T> {
    inner: T,
    builder: FrameBuilder,
    tx: Frame,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with a fresh frame ID sequence.
    pub fn new(inner: T) -> Self {
        Self::with_builder(inner, FrameBuilder::new())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: &FrameConfig) -> Self {
        Self::with_builder(inner, FrameBuilder::with_config(config))
    }

    /// Create a frame writer around an existing builder.
    pub fn with_builder(inner: T, builder: FrameBuilder) -> Self {
        Self {
            inner,
            builder,
            tx: Frame::new(),
        }
    }

    /// Send a local AT command; returns the frame ID to match the response.
    pub fn send_command(&mut self, payload: &[u8]) -> Result<u8> {
        let frame_id = self.builder.build_command_into(&mut self.tx, payload)?;
        write_all(&mut self.inner, self.tx.as_bytes())?;
        self.flush()?;
        Ok(frame_id)
    }

    /// Send `payload` to `address` (0 for broadcast); returns the frame ID to
    /// match the transmit status.
    pub fn send_data(&mut self, address: u64, payload: &[u8]) -> Result<u8> {
        let frame_id = self
            .builder
            .build_data_into(&mut self.tx, address, payload)?;
        write_all(&mut self.inner, self.tx.as_bytes())?;
        self.flush()?;
        Ok(frame_id)
    }

    /// Write an already built frame as is.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        write_all(&mut self.inner, frame.as_bytes())?;
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// The builder supplying frame IDs.
    pub fn builder(&self) -> &FrameBuilder {
        &self.builder
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn write_all<T: Write>(inner: &mut T, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match inner.write(&bytes[offset..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::BuildError;
    use crate::frame::FRAME_CAPACITY;
    use crate::reader::FrameReader;
    use crate::sequence::FrameIdSequencer;

    #[test]
    fn send_command_writes_datasheet_frame() {
        let builder = FrameBuilder::with_sequencer(FrameIdSequencer::starting_after(0x51));
        let mut writer = FrameWriter::with_builder(Cursor::new(Vec::<u8>::new()), builder);

        let frame_id = writer.send_command(b"NH").unwrap();

        assert_eq!(frame_id, 0x52);
        assert_eq!(
            writer.into_inner().into_inner(),
            vec![0x7E, 0x00, 0x04, 0x08, 0x52, 0x4E, 0x48, 0x0F]
        );
    }

    #[test]
    fn written_frames_read_back() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        assert_eq!(writer.send_data(0x0013_A200_4000_0001, b"one").unwrap(), 1);
        assert_eq!(writer.send_command(b"NITEST").unwrap(), 2);
        assert_eq!(writer.send_data(0, b"three").unwrap(), 3);

        let wire = writer.into_inner().into_inner();
        let mut reader = FrameReader::new(Cursor::new(wire));

        assert_eq!(&reader.read_frame().unwrap().as_bytes()[17..20], b"one");
        assert_eq!(&reader.read_frame().unwrap().as_bytes()[5..11], b"NITEST");
        assert_eq!(&reader.read_frame().unwrap().as_bytes()[17..22], b"three");
        assert_eq!(reader.receiver().error_count(), 0);
    }

    #[test]
    fn oversized_payload_rejected_without_writing() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        let err = writer.send_data(0, &[0u8; FRAME_CAPACITY]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::Build(BuildError::CapacityExceeded { .. })
        ));
        assert!(writer.get_ref().get_ref().is_empty());
        assert_eq!(writer.builder().sequencer().last(), 0);
    }

    #[test]
    fn config_limits_frames() {
        let cfg = FrameConfig {
            max_frame_len: 8,
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), &cfg);

        assert!(writer.send_command(b"NH").is_ok());
        assert!(writer.send_command(b"NHX").is_err());
    }

    #[test]
    fn write_frame_passes_bytes_through() {
        let frame = Frame::from_bytes(&[0x7E, 0x00, 0x02, 0x8A, 0x00, 0x75]).unwrap();
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.write_frame(&frame).unwrap();
        assert_eq!(writer.into_inner().into_inner(), frame.as_bytes());
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = FrameWriter::new(sink);

        writer.send_command(b"AP").unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let writer_impl = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };

        let mut writer = FrameWriter::new(writer_impl);
        writer.send_data(0, b"retry").unwrap();

        let inner = writer.into_inner();
        assert_eq!(inner.data.len(), 18 + 5);
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.send_command(b"AP").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
