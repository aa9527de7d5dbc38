//! Builds a few frames, pushes them through a noisy in-memory link and reads
//! them back.
//!
//! Run with:
//!   cargo run --example loopback --features logging

use std::io::Cursor;

use digimesh::frame::{frame_type_name, FrameReader, FrameWriter};
use digimesh::logging::{init_logging, LogFormat, LogLevel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogFormat::Text, LogLevel::Trace);

    let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
    writer.send_command(b"NITEST")?;
    writer.send_data(0, b"hello, mesh")?;
    writer.send_data(0x0013_A200_4000_0001, b"direct")?;

    // Line noise before the first frame.
    let mut link = vec![0x00, 0x13, 0xFF];
    link.extend_from_slice(writer.get_ref().get_ref());

    let mut reader = FrameReader::new(Cursor::new(link));
    while let Ok(frame) = reader.read_frame() {
        let raw_type = frame.frame_type().map(|t| t.as_u8()).unwrap_or_default();
        eprintln!(
            "{} id={:?} {} bytes",
            frame_type_name(raw_type),
            frame.frame_id(),
            frame.len()
        );
    }

    eprintln!("dropped: {}", reader.receiver().error_count());
    Ok(())
}
